use types::Privilege;

/// 68000 programmer-visible registers.
///
/// `A7` is the active stack pointer. `Usp` and `Ssp` name the user and
/// supervisor stack pointers regardless of which one is currently active.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Register {
    D0,
    D1,
    D2,
    D3,
    D4,
    D5,
    D6,
    D7,
    A0,
    A1,
    A2,
    A3,
    A4,
    A5,
    A6,
    A7, // active stack pointer
    Pc,
    Sr,
    Usp,
    Ssp,
}

impl Register {
    /// Syscall results are returned here.
    pub const RESULT: Register = Register::D0;
    pub const SP: Register = Register::A7;
}

/// Plain register storage with 68000 stack-pointer banking: flipping the
/// S bit in SR swaps A7 with the inactive stack pointer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegisterFile {
    d: [u32; 8],
    a: [u32; 8],
    pc: u32,
    sr: u32,
    /// Whichever of USP/SSP is not currently in A7.
    inactive_sp: u32,
}

impl RegisterFile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn privilege(&self) -> Privilege {
        Privilege::from_sr(self.sr)
    }

    pub fn get(&self, reg: Register) -> u32 {
        let supervisor = self.privilege().is_supervisor();
        match reg {
            Register::D0 => self.d[0],
            Register::D1 => self.d[1],
            Register::D2 => self.d[2],
            Register::D3 => self.d[3],
            Register::D4 => self.d[4],
            Register::D5 => self.d[5],
            Register::D6 => self.d[6],
            Register::D7 => self.d[7],
            Register::A0 => self.a[0],
            Register::A1 => self.a[1],
            Register::A2 => self.a[2],
            Register::A3 => self.a[3],
            Register::A4 => self.a[4],
            Register::A5 => self.a[5],
            Register::A6 => self.a[6],
            Register::A7 => self.a[7],
            Register::Pc => self.pc,
            Register::Sr => self.sr,
            Register::Usp if supervisor => self.inactive_sp,
            Register::Usp => self.a[7],
            Register::Ssp if supervisor => self.a[7],
            Register::Ssp => self.inactive_sp,
        }
    }

    pub fn set(&mut self, reg: Register, value: u32) {
        let supervisor = self.privilege().is_supervisor();
        match reg {
            Register::D0 => self.d[0] = value,
            Register::D1 => self.d[1] = value,
            Register::D2 => self.d[2] = value,
            Register::D3 => self.d[3] = value,
            Register::D4 => self.d[4] = value,
            Register::D5 => self.d[5] = value,
            Register::D6 => self.d[6] = value,
            Register::D7 => self.d[7] = value,
            Register::A0 => self.a[0] = value,
            Register::A1 => self.a[1] = value,
            Register::A2 => self.a[2] = value,
            Register::A3 => self.a[3] = value,
            Register::A4 => self.a[4] = value,
            Register::A5 => self.a[5] = value,
            Register::A6 => self.a[6] = value,
            Register::A7 => self.a[7] = value,
            Register::Pc => self.pc = value,
            Register::Sr => {
                let was = self.privilege();
                self.sr = value & 0xFFFF;
                if self.privilege() != was {
                    std::mem::swap(&mut self.a[7], &mut self.inactive_sp);
                }
            }
            Register::Usp if supervisor => self.inactive_sp = value,
            Register::Usp => self.a[7] = value,
            Register::Ssp if supervisor => self.a[7] = value,
            Register::Ssp => self.inactive_sp = value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entering_supervisor_banks_stack_pointers() {
        let mut regs = RegisterFile::new();
        regs.set(Register::Ssp, 0x800);
        regs.set(Register::A7, 0x1000);
        assert_eq!(regs.get(Register::Usp), 0x1000);

        regs.set(Register::Sr, 0x2000);
        assert_eq!(regs.get(Register::A7), 0x800);
        assert_eq!(regs.get(Register::Usp), 0x1000);

        regs.set(Register::Sr, 0);
        assert_eq!(regs.get(Register::A7), 0x1000);
        assert_eq!(regs.get(Register::Ssp), 0x800);
    }
}
