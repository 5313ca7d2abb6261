use std::fmt;

use thiserror::Error;
use vm::memory::RouterError;

/// The three trap-based OS layers a program can call into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Subsystem {
    Gemdos,
    Bios,
    Xbios,
}

impl fmt::Display for Subsystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Subsystem::Gemdos => "GEMDOS",
            Subsystem::Bios => "BIOS",
            Subsystem::Xbios => "XBIOS",
        })
    }
}

/// Why emulation had to stop. These are never reported to the guest.
#[derive(Debug, Error)]
pub enum HaltReason {
    #[error("{subsystem} call {name} (0x{code:02x}) is not implemented")]
    Unimplemented {
        subsystem: Subsystem,
        name: &'static str,
        code: u16,
    },
    #[error("unknown {subsystem} call 0x{code:02x}")]
    Unknown { subsystem: Subsystem, code: u16 },
    #[error("trap vector 0x{vector:02x} ({name}) is not supported")]
    UnsupportedTrap { vector: u8, name: &'static str },
    #[error("{call}: {detail}")]
    Unsupported { call: &'static str, detail: String },
    #[error("guest memory fault: {0}")]
    Memory(#[from] RouterError),
    #[error("no program is loaded")]
    NotLoaded,
}

/// A halt together with where the CPU was when it happened.
#[derive(Debug, Error)]
#[error("emulation halted at pc 0x{pc:06x}: {reason}")]
pub struct Halt {
    pub pc: u32,
    pub reason: HaltReason,
}

impl Halt {
    pub fn new(pc: u32, reason: HaltReason) -> Self {
        Self { pc, reason }
    }
}
