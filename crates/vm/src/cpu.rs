use crate::memory::{AddressSpace, RouterError};
use crate::registers::Register;
use types::Privilege;

/// What happened during one [`Cpu::step`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CpuEvent {
    /// An instruction retired normally.
    Executed,
    /// The instruction raised the exception with this vector number
    /// (`TRAP #n` is vector `0x20 + n`). Arguments are still on the stack
    /// pointed to by A7.
    Trap(u8),
}

/// Contract the kernel needs from a 68000 core.
///
/// The instruction interpreter itself lives outside this workspace; it
/// performs every memory access through the [`AddressSpace`] it is given.
pub trait Cpu {
    fn reg(&self, reg: Register) -> u32;
    fn set_reg(&mut self, reg: Register, value: u32);

    /// Executes one instruction.
    fn step(&mut self, bus: &mut AddressSpace) -> Result<CpuEvent, RouterError>;

    fn privilege(&self) -> Privilege {
        Privilege::from_sr(self.reg(Register::Sr))
    }

    fn set_privilege(&mut self, mode: Privilege) {
        let sr = self.reg(Register::Sr);
        let sr = match mode {
            Privilege::Supervisor => sr | Privilege::SR_SUPERVISOR,
            Privilege::User => sr & !Privilege::SR_SUPERVISOR,
        };
        self.set_reg(Register::Sr, sr);
    }

    fn sp(&self) -> u32 {
        self.reg(Register::SP)
    }
}
