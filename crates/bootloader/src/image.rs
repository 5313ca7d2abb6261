use types::basepage::Basepage;
use types::boot::{BASEPAGE_ADDR, SUPER_STACK_TOP};
use types::exec::ExecHeader;
use types::{HeapRange, Privilege};
use vm::cpu::Cpu;
use vm::memory::{AddressSpace, RouterError};
use vm::registers::Register;

/// A loaded program: what was decoded and where it went.
#[derive(Debug, Clone)]
pub struct ProcessImage {
    pub header: ExecHeader,
    pub basepage: Basepage,
    /// Range the heap allocator manages.
    pub heap: HeapRange,
    /// End of user RAM; the user stack grows down from here.
    pub ram_top: u32,
    /// Number of relocated longwords.
    pub fixups: usize,
}

impl ProcessImage {
    pub fn entry_point(&self) -> u32 {
        self.basepage.p_tbase
    }

    /// Initial user stack pointer. The basepage address sits at SP+4, as a
    /// program started by Pexec would find it.
    pub fn user_stack(&self) -> u32 {
        self.ram_top - 8
    }

    /// Points the CPU at the first instruction in user mode.
    pub fn enter(&self, cpu: &mut dyn Cpu, space: &mut AddressSpace) -> Result<(), RouterError> {
        let sp = self.user_stack();
        space.write_u32(sp, 0, Privilege::User)?;
        space.write_u32(sp + 4, BASEPAGE_ADDR, Privilege::User)?;

        cpu.set_reg(Register::Sr, 0x0000);
        cpu.set_reg(Register::Ssp, SUPER_STACK_TOP);
        cpu.set_reg(Register::Usp, sp);
        cpu.set_reg(Register::Pc, self.entry_point());
        Ok(())
    }

    /// Releases every area the image registered. Safe to call repeatedly.
    pub fn teardown(&self, space: &mut AddressSpace) {
        space.reset();
    }
}
