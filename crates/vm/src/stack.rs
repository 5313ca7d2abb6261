//! Syscall argument access.
//!
//! TOS passes arguments on the caller's stack: the function code is the word
//! at SP+0 and the remaining arguments follow at fixed offsets. All reads go
//! through [`AddressSpace::peek`] so fetching arguments never has side
//! effects.

use crate::cpu::Cpu;
use crate::memory::{AddressSpace, RouterError, Width};
use types::Privilege;

#[derive(Clone, Copy)]
pub struct StackArgs<'a> {
    space: &'a AddressSpace,
    sp: u32,
    mode: Privilege,
}

impl<'a> StackArgs<'a> {
    pub fn new(space: &'a AddressSpace, sp: u32, mode: Privilege) -> Self {
        Self { space, sp, mode }
    }

    /// Arguments at the CPU's active stack pointer.
    pub fn from_cpu(space: &'a AddressSpace, cpu: &dyn Cpu) -> Self {
        Self::new(space, cpu.sp(), cpu.privilege())
    }

    pub fn sp(&self) -> u32 {
        self.sp
    }

    fn at(&self, offset: u32, width: Width) -> Result<u32, RouterError> {
        self.space
            .peek(self.sp.wrapping_add(offset), width, self.mode)
    }

    pub fn u8(&self, offset: u32) -> Result<u8, RouterError> {
        self.at(offset, Width::Byte).map(|v| v as u8)
    }

    pub fn u16(&self, offset: u32) -> Result<u16, RouterError> {
        self.at(offset, Width::Word).map(|v| v as u16)
    }

    pub fn i16(&self, offset: u32) -> Result<i16, RouterError> {
        self.u16(offset).map(|v| v as i16)
    }

    pub fn u32(&self, offset: u32) -> Result<u32, RouterError> {
        self.at(offset, Width::Long)
    }

    pub fn i32(&self, offset: u32) -> Result<i32, RouterError> {
        self.u32(offset).map(|v| v as i32)
    }

    /// The function code every trap carries at SP+0.
    pub fn function_code(&self) -> Result<u16, RouterError> {
        self.u16(0)
    }
}
