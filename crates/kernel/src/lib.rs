//! The TOS kernel layer: GEMDOS, BIOS and XBIOS serviced on the host.
//!
//! A [`Machine`] owns the guest address space and all kernel state. An
//! external 68000 core executes the program and hands every `TRAP`
//! instruction to [`Machine::trap`]; arguments are read from the guest
//! stack, the call runs against the host and its result lands in D0.
//!
//! Calls fail in one of two ways. Conditions a real TOS would report come
//! back to the program as negative GEMDOS codes. Everything else (unknown or
//! unimplemented calls, bad trap vectors, memory faults inside a handler)
//! stops emulation with a [`Halt`].

pub mod allocator;
pub mod bios;
pub mod config;
pub mod error;
pub mod handles;
pub mod machine;
pub mod path;
pub mod state;
pub mod syscall;
pub mod trap;
pub mod xbios;

pub use allocator::{AllocError, MemoryAllocator};
pub use config::KernelConfig;
pub use error::{Halt, HaltReason, Subsystem};
pub use machine::Machine;
pub use state::KernelState;
pub use trap::{Dispatcher, Flow};
