//! Machine-level plumbing shared by the image builder and the kernel: the
//! guest address space, the CPU contract and the host console.

pub mod cpu;
pub mod host_interface;
pub mod memory;
pub mod registers;
pub mod stack;

pub use cpu::{Cpu, CpuEvent};
pub use memory::{AddressSpace, MemoryArea, RouterError, Width};
pub use registers::{Register, RegisterFile};
pub use stack::StackArgs;
