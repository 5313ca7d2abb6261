use bootloader::{Bootloader, LoadError, ProcessImage};
use tracing::{error, info};
use types::boot::SUPEXEC_RETURN;
use types::Privilege;
use vm::cpu::{Cpu, CpuEvent};
use vm::host_interface::{HostInterface, StdHost};
use vm::memory::AddressSpace;
use vm::registers::Register;

use crate::config::KernelConfig;
use crate::error::{Halt, HaltReason};
use crate::path::{PathError, Sandbox};
use crate::state::KernelState;
use crate::trap::{Dispatcher, Flow};
use crate::xbios::SUPEXEC_REGISTERS;

/// One emulated TOS session: the guest address space, kernel state and the
/// host console, driven by an external CPU core.
///
/// Single-threaded. The CPU calls back through [`Machine::trap`], or the
/// whole program is driven by [`Machine::run`].
#[derive(Debug)]
pub struct Machine<H: HostInterface = StdHost> {
    config: KernelConfig,
    bootloader: Bootloader,
    dispatcher: Dispatcher,
    space: AddressSpace,
    state: KernelState,
    host: H,
    image: Option<ProcessImage>,
}

fn halt(pc: u32, reason: HaltReason) -> Halt {
    error!(pc = format_args!("0x{pc:06x}"), %reason, "emulation halted");
    Halt::new(pc, reason)
}

impl Machine<StdHost> {
    /// A session on the process console, configured from the environment.
    pub fn from_env() -> Result<Self, PathError> {
        Self::new(KernelConfig::from_env(), StdHost::new())
    }
}

impl<H: HostInterface> Machine<H> {
    pub fn new(config: KernelConfig, host: H) -> Result<Self, PathError> {
        let sandbox = Sandbox::new(&config.base_path)?;
        info!(root = %sandbox.root().display(), "guest drive C: mapped");
        Ok(Self {
            bootloader: Bootloader::with_config(config.boot),
            dispatcher: Dispatcher::new(config.trace_syscalls),
            space: AddressSpace::new(),
            state: KernelState::new(sandbox),
            host,
            image: None,
            config,
        })
    }

    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    pub fn image(&self) -> Option<&ProcessImage> {
        self.image.as_ref()
    }

    pub fn space(&self) -> &AddressSpace {
        &self.space
    }

    pub fn space_mut(&mut self) -> &mut AddressSpace {
        &mut self.space
    }

    pub fn state(&self) -> &KernelState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut KernelState {
        &mut self.state
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Builds the process image for `program` and hands its heap to the
    /// allocator. A previous program is discarded even if loading fails.
    pub fn load<S: AsRef<str>>(
        &mut self,
        program: &[u8],
        args: &[S],
    ) -> Result<&ProcessImage, LoadError> {
        self.image = None;
        let image = self.bootloader.build(program, args, &mut self.space)?;
        self.state.reset_process(image.heap);
        info!(
            entry = format_args!("0x{:06x}", image.entry_point()),
            heap = image.heap.len(),
            "program loaded"
        );
        Ok(self.image.insert(image))
    }

    /// Sets up `cpu` to run the loaded program from its first instruction.
    pub fn start(&mut self, cpu: &mut dyn Cpu) -> Result<(), Halt> {
        let pc = cpu.reg(Register::Pc);
        let image = self
            .image
            .as_ref()
            .ok_or_else(|| halt(pc, HaltReason::NotLoaded))?;
        image
            .enter(cpu, &mut self.space)
            .map_err(|err| halt(pc, err.into()))
    }

    /// Services a trap raised by `cpu`.
    pub fn trap(&mut self, vector: u8, cpu: &mut dyn Cpu) -> Result<Flow, Halt> {
        let pc = cpu.reg(Register::Pc);
        self.dispatcher
            .dispatch(vector, cpu, &mut self.space, &mut self.state, &mut self.host)
            .map_err(|reason| halt(pc, reason))
    }

    /// Finishes a Supexec routine once it has returned to the trampoline:
    /// pops the caller's program counter and restores its registers and
    /// mode. Returns false when there was nothing to finish.
    pub fn resume_supexec(&mut self, cpu: &mut dyn Cpu) -> Result<bool, Halt> {
        if cpu.reg(Register::Pc) != SUPEXEC_RETURN {
            return Ok(false);
        }
        let Some(frame) = self.state.supexec.pop() else {
            return Ok(false);
        };
        let sp = cpu.sp();
        let resume = self
            .space
            .read_u32(sp, Privilege::Supervisor)
            .map_err(|err| halt(SUPEXEC_RETURN, err.into()))?;
        cpu.set_reg(Register::SP, sp.wrapping_add(4));
        for (reg, value) in SUPEXEC_REGISTERS.into_iter().zip(frame.saved) {
            cpu.set_reg(reg, value);
        }
        cpu.set_privilege(frame.mode);
        cpu.set_reg(Register::Pc, resume);
        Ok(true)
    }

    /// Starts the loaded program and steps `cpu` until it terminates.
    ///
    /// On exit the image is torn down and the exit code returned. A halt
    /// leaves memory in place for inspection; call [`Machine::terminate`]
    /// afterwards.
    pub fn run(&mut self, cpu: &mut dyn Cpu) -> Result<i32, Halt> {
        self.start(cpu)?;
        loop {
            self.resume_supexec(cpu)?;
            let pc = cpu.reg(Register::Pc);
            match cpu.step(&mut self.space) {
                Ok(CpuEvent::Executed) => {}
                Ok(CpuEvent::Trap(vector)) => {
                    if let Flow::Exit(code) = self.trap(vector, cpu)? {
                        info!(code, "program terminated");
                        self.terminate();
                        return Ok(code);
                    }
                }
                Err(err) => return Err(halt(pc, err.into())),
            }
        }
    }

    /// Releases the image and every open file. Safe to call repeatedly.
    pub fn terminate(&mut self) {
        match self.image.take() {
            Some(image) => image.teardown(&mut self.space),
            None => self.space.reset(),
        }
        self.state.handles.close_all();
        self.state.supexec.clear();
    }
}
