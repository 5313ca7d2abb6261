//! Trap entry: picks the OS layer from the vector, runs the call and puts
//! the result in D0.

use tracing::{info, trace};
use vm::cpu::Cpu;
use vm::host_interface::HostInterface;
use vm::memory::AddressSpace;
use vm::registers::Register;
use vm::stack::StackArgs;

use crate::bios::BIOS_CALLS;
use crate::error::{HaltReason, Subsystem};
use crate::state::KernelState;
use crate::syscall::gemdos::GEMDOS_CALLS;
use crate::syscall::{Resolved, SyscallContext, SyscallTable, into_register};
use crate::xbios::XBIOS_CALLS;

/// `TRAP #1`
pub const TRAP_GEMDOS: u8 = 0x21;
/// `TRAP #2`, the AES/VDI entry.
pub const TRAP_GEM: u8 = 0x22;
/// `TRAP #13`
pub const TRAP_BIOS: u8 = 0x2D;
/// `TRAP #14`
pub const TRAP_XBIOS: u8 = 0x2E;

/// What the CPU does after a trap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Resume,
    /// The program terminated with this code.
    Exit(i32),
}

#[derive(Debug)]
pub struct Dispatcher {
    gemdos: SyscallTable,
    bios: SyscallTable,
    xbios: SyscallTable,
    trace_calls: bool,
}

impl Dispatcher {
    pub fn new(trace_calls: bool) -> Self {
        Self {
            gemdos: SyscallTable::new(Subsystem::Gemdos, GEMDOS_CALLS),
            bios: SyscallTable::new(Subsystem::Bios, BIOS_CALLS),
            xbios: SyscallTable::new(Subsystem::Xbios, XBIOS_CALLS),
            trace_calls,
        }
    }

    /// Table serving `vector`.
    pub fn table(&self, vector: u8) -> Result<&SyscallTable, HaltReason> {
        match vector {
            TRAP_GEMDOS => Ok(&self.gemdos),
            TRAP_BIOS => Ok(&self.bios),
            TRAP_XBIOS => Ok(&self.xbios),
            TRAP_GEM => Err(HaltReason::UnsupportedTrap {
                vector,
                name: "AES/VDI",
            }),
            _ => Err(HaltReason::UnsupportedTrap {
                vector,
                name: "unassigned",
            }),
        }
    }

    /// Services one trap to completion.
    pub fn dispatch(
        &self,
        vector: u8,
        cpu: &mut dyn Cpu,
        space: &mut AddressSpace,
        state: &mut KernelState,
        host: &mut dyn HostInterface,
    ) -> Result<Flow, HaltReason> {
        let table = self.table(vector)?;
        let code = StackArgs::from_cpu(&*space, &*cpu).function_code()?;

        let (call, handler) = match table.resolve(code) {
            Resolved::Implemented(call, handler) => (call, handler),
            Resolved::Unimplemented(call) => {
                return Err(HaltReason::Unimplemented {
                    subsystem: table.subsystem(),
                    name: call.name,
                    code,
                });
            }
            Resolved::Unknown(code) => {
                return Err(HaltReason::Unknown {
                    subsystem: table.subsystem(),
                    code,
                });
            }
        };

        if self.trace_calls {
            info!(
                subsystem = %table.subsystem(),
                call = call.name,
                sp = format_args!("0x{:06x}", cpu.sp()),
                "syscall"
            );
        } else {
            trace!(subsystem = %table.subsystem(), call = call.name, "syscall");
        }

        let mut ctx = SyscallContext::new(cpu, space, state, host);
        let value = into_register(handler(&mut ctx))?;
        ctx.cpu.set_reg(Register::RESULT, value);
        let exit = ctx.exit_code();

        if self.trace_calls {
            info!(call = call.name, result = format_args!("0x{value:08x}"), "syscall done");
        } else {
            trace!(call = call.name, result = format_args!("0x{value:08x}"), "syscall done");
        }

        Ok(match exit {
            Some(code) => Flow::Exit(code),
            None => Flow::Resume,
        })
    }
}
