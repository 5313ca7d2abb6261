//! Access rights attached to guest memory areas.

use bitflags::bitflags;

bitflags! {
    /// Which privilege levels may read or write an area.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct AccessFlags: u8 {
        const USER_READ = 1 << 0;
        const USER_WRITE = 1 << 1;
        const SUPER_READ = 1 << 2;
        const SUPER_WRITE = 1 << 3;

        const USER_RW = Self::USER_READ.bits() | Self::USER_WRITE.bits();
        const SUPER_RW = Self::SUPER_READ.bits() | Self::SUPER_WRITE.bits();
    }
}

/// Privilege level of the CPU at the time of an access.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Privilege {
    User,
    Supervisor,
}

impl Privilege {
    /// Status register S bit.
    pub const SR_SUPERVISOR: u32 = 0x2000;

    pub fn from_sr(sr: u32) -> Self {
        if sr & Self::SR_SUPERVISOR != 0 {
            Privilege::Supervisor
        } else {
            Privilege::User
        }
    }

    pub fn is_supervisor(self) -> bool {
        matches!(self, Privilege::Supervisor)
    }
}

impl AccessFlags {
    /// The supervisor may touch anything the user may, plus super-only areas.
    pub fn can_read(self, mode: Privilege) -> bool {
        match mode {
            Privilege::User => self.contains(Self::USER_READ),
            Privilege::Supervisor => self.intersects(Self::USER_READ | Self::SUPER_READ),
        }
    }

    pub fn can_write(self, mode: Privilege) -> bool {
        match mode {
            Privilege::User => self.contains(Self::USER_WRITE),
            Privilege::Supervisor => self.intersects(Self::USER_WRITE | Self::SUPER_WRITE),
        }
    }

    pub fn allows(self, mode: Privilege, write: bool) -> bool {
        if write {
            self.can_write(mode)
        } else {
            self.can_read(mode)
        }
    }

    /// Side-effect-free reads accept either right.
    pub fn can_peek(self, mode: Privilege) -> bool {
        self.can_read(mode) || self.can_write(mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supervisor_sees_user_areas() {
        assert!(AccessFlags::USER_READ.can_read(Privilege::Supervisor));
        assert!(!AccessFlags::USER_READ.can_write(Privilege::Supervisor));
        assert!(!AccessFlags::SUPER_RW.can_read(Privilege::User));
        assert!(AccessFlags::SUPER_RW.can_write(Privilege::Supervisor));
    }

    #[test]
    fn allows_picks_the_right() {
        let read_only = AccessFlags::USER_READ;
        assert!(read_only.allows(Privilege::User, false));
        assert!(!read_only.allows(Privilege::User, true));
        assert!(AccessFlags::SUPER_RW.allows(Privilege::Supervisor, true));
    }

    #[test]
    fn peek_accepts_write_only_areas() {
        let write_only = AccessFlags::USER_WRITE;
        assert!(!write_only.can_read(Privilege::User));
        assert!(write_only.can_peek(Privilege::User));
    }

    #[test]
    fn privilege_follows_status_register() {
        assert_eq!(Privilege::from_sr(0x2700), Privilege::Supervisor);
        assert_eq!(Privilege::from_sr(0x0000), Privilege::User);
    }
}
