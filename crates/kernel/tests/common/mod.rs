#![allow(dead_code)]

use bootloader::BootConfig;
use kernel::{Flow, Halt, KernelConfig, Machine};
use tempfile::TempDir;
use types::exec::EXEC_MAGIC;
use vm::host_interface::BufferedHost;
use vm::memory::{AddressSpace, RouterError};
use vm::{Cpu, CpuEvent, Register, RegisterFile};

pub const RAM_TOP: u32 = 0x4_0000;
/// Where tests leave strings and buffers for the guest.
pub const SCRATCH: u32 = 0x2_0000;
/// Program counter at the time of a trap.
pub const TRAP_PC: u32 = 0x904;

/// Register-only stand-in for the 68000 core.
#[derive(Debug, Default)]
pub struct TestCpu {
    pub regs: RegisterFile,
}

impl Cpu for TestCpu {
    fn reg(&self, reg: Register) -> u32 {
        self.regs.get(reg)
    }

    fn set_reg(&mut self, reg: Register, value: u32) {
        self.regs.set(reg, value);
    }

    fn step(&mut self, _bus: &mut AddressSpace) -> Result<CpuEvent, RouterError> {
        Ok(CpuEvent::Executed)
    }
}

pub type Step = Box<dyn FnMut(&mut RegisterFile, &mut AddressSpace) -> Result<CpuEvent, RouterError>>;

/// A core that replays a fixed list of steps, then keeps executing NOPs.
pub struct ScriptedCpu {
    pub regs: RegisterFile,
    pub script: std::collections::VecDeque<Step>,
    pub steps: usize,
}

impl ScriptedCpu {
    pub fn new(script: Vec<Step>) -> Self {
        Self {
            regs: RegisterFile::new(),
            script: script.into(),
            steps: 0,
        }
    }
}

impl Cpu for ScriptedCpu {
    fn reg(&self, reg: Register) -> u32 {
        self.regs.get(reg)
    }

    fn set_reg(&mut self, reg: Register, value: u32) {
        self.regs.set(reg, value);
    }

    fn step(&mut self, bus: &mut AddressSpace) -> Result<CpuEvent, RouterError> {
        self.steps += 1;
        match self.script.pop_front() {
            Some(mut step) => step(&mut self.regs, bus),
            None => Ok(CpuEvent::Executed),
        }
    }
}

/// A stack argument.
#[derive(Clone, Copy, Debug)]
pub enum Arg {
    W(u16),
    L(u32),
}

pub fn frame(code: u16, args: &[Arg]) -> Vec<u8> {
    let mut bytes = code.to_be_bytes().to_vec();
    for arg in args {
        match arg {
            Arg::W(w) => bytes.extend_from_slice(&w.to_be_bytes()),
            Arg::L(l) => bytes.extend_from_slice(&l.to_be_bytes()),
        }
    }
    bytes
}

/// Minimal executable: `nop; rts`.
pub fn tiny_program() -> Vec<u8> {
    let mut bytes = EXEC_MAGIC.to_be_bytes().to_vec();
    for value in [4u32, 0, 0, 0, 0, 0] {
        bytes.extend_from_slice(&value.to_be_bytes());
    }
    bytes.extend_from_slice(&1u16.to_be_bytes());
    bytes.extend_from_slice(&[0x4E, 0x71, 0x4E, 0x75]);
    bytes
}

pub fn config(dir: &TempDir) -> KernelConfig {
    let mut config = KernelConfig::new(dir.path());
    config.boot = BootConfig { ram_top: RAM_TOP };
    config
}

pub struct Harness {
    pub machine: Machine<BufferedHost>,
    pub cpu: TestCpu,
    pub dir: TempDir,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_input(b"")
    }

    pub fn with_input(input: &[u8]) -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut machine =
            Machine::new(config(&dir), BufferedHost::with_input(input)).expect("sandbox");
        machine
            .load(&tiny_program(), &["ARG"])
            .expect("tiny program loads");
        let mut cpu = TestCpu::default();
        machine.start(&mut cpu).expect("start");
        Self { machine, cpu, dir }
    }

    /// Pushes a syscall frame, raises the trap and pops the frame again.
    /// A call that switched stacks leaves the new stack pointer alone.
    pub fn call(&mut self, vector: u8, code: u16, args: &[Arg]) -> Result<Flow, Halt> {
        let bytes = frame(code, args);
        let sp = self.cpu.sp() - bytes.len() as u32;
        let mode = self.cpu.privilege();
        self.machine
            .space_mut()
            .write_bytes(sp, &bytes, mode)
            .expect("frame fits on the stack");
        self.cpu.set_reg(Register::SP, sp);
        self.cpu.set_reg(Register::Pc, TRAP_PC);
        let flow = self.machine.trap(vector, &mut self.cpu);
        if self.cpu.privilege() == mode {
            let sp = self.cpu.sp() + bytes.len() as u32;
            self.cpu.set_reg(Register::SP, sp);
        }
        flow
    }

    pub fn gemdos(&mut self, code: u16, args: &[Arg]) -> u32 {
        let flow = self.call(0x21, code, args).expect("call does not halt");
        assert_eq!(flow, Flow::Resume);
        self.d0()
    }

    pub fn bios(&mut self, code: u16, args: &[Arg]) -> u32 {
        let flow = self.call(0x2D, code, args).expect("call does not halt");
        assert_eq!(flow, Flow::Resume);
        self.d0()
    }

    pub fn xbios(&mut self, code: u16, args: &[Arg]) -> u32 {
        let flow = self.call(0x2E, code, args).expect("call does not halt");
        assert_eq!(flow, Flow::Resume);
        self.d0()
    }

    pub fn d0(&self) -> u32 {
        self.cpu.reg(Register::D0)
    }

    /// Writes a NUL-terminated string into user RAM.
    pub fn put_str(&mut self, addr: u32, text: &str) -> u32 {
        let mut bytes = text.as_bytes().to_vec();
        bytes.push(0);
        self.put_bytes(addr, &bytes);
        addr
    }

    pub fn put_bytes(&mut self, addr: u32, bytes: &[u8]) {
        self.machine
            .space_mut()
            .write_bytes(addr, bytes, types::Privilege::User)
            .expect("user ram");
    }

    pub fn get_bytes(&mut self, addr: u32, len: u32) -> Vec<u8> {
        self.machine
            .space_mut()
            .read_bytes(addr, len, types::Privilege::Supervisor)
            .expect("mapped")
    }

    pub fn output(&self) -> &[u8] {
        self.machine.host().output()
    }
}

/// A legacy error code as it appears in D0.
pub fn code(value: i32) -> u32 {
    value as u32
}
