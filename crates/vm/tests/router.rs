use std::cell::RefCell;
use std::rc::Rc;

use vm::memory::{
    Access, AccessFlags, AddressSpace, AreaHandler, MemoryArea, Privilege, RouterError, Width,
};

fn user_ram(base: u32, len: usize) -> MemoryArea {
    MemoryArea::host("ram", base, vec![0u8; len], AccessFlags::USER_RW)
}

#[test]
fn test_long_write_is_big_endian() {
    let mut space = AddressSpace::new();
    space.register(user_ram(0x900, 0x100)).unwrap();

    space
        .write(0x910, Width::Long, 0x1234_5678, Privilege::User)
        .unwrap();
    assert_eq!(
        space.read(0x910, Width::Long, Privilege::User).unwrap(),
        0x1234_5678
    );
    let raw = space.read_bytes(0x910, 4, Privilege::User).unwrap();
    assert_eq!(raw, vec![0x12, 0x34, 0x56, 0x78]);
    assert_eq!(space.read_u16(0x912, Privilege::User).unwrap(), 0x5678);
    assert_eq!(space.read_u8(0x911, Privilege::User).unwrap(), 0x34);
}

#[test]
fn test_every_width_reads_back() {
    let mut space = AddressSpace::new();
    space.register(user_ram(0x900, 0x10)).unwrap();
    for (addr, width, value) in [
        (0x900, Width::Byte, 0xAB),
        (0x902, Width::Word, 0xCDEF),
        (0x904, Width::Long, 0xDEAD_BEEF),
    ] {
        space.write(addr, width, value, Privilege::User).unwrap();
        assert_eq!(space.read(addr, width, Privilege::User).unwrap(), value);
        assert_eq!(space.peek(addr, width, Privilege::User).unwrap(), value);
    }
}

#[test]
fn test_overlap_is_rejected() {
    let mut space = AddressSpace::new();
    space.register(user_ram(0x900, 0x100)).unwrap();

    // One shared byte at either end is enough.
    let err = space.register(user_ram(0x9FF, 0x10)).unwrap_err();
    assert!(matches!(err, RouterError::Overlap { base: 0x9FF, .. }));
    let err = space.register(user_ram(0x800, 0x101)).unwrap_err();
    assert!(matches!(err, RouterError::Overlap { .. }));
    // Fully containing an existing area.
    assert!(space.register(user_ram(0x800, 0x1000)).is_err());
    assert_eq!(space.len(), 1);
}

#[test]
fn test_adjacent_areas_coexist() {
    let mut space = AddressSpace::new();
    space.register(user_ram(0x900, 0x100)).unwrap();
    space.register(user_ram(0xA00, 0x100)).unwrap();
    space.register(user_ram(0x800, 0x100)).unwrap();
    let bases: Vec<u32> = space.areas().map(|a| a.base()).collect();
    assert_eq!(bases, vec![0x800, 0x900, 0xA00]);
}

#[test]
fn test_unregister_and_reset() {
    let mut space = AddressSpace::new();
    space.register(user_ram(0x900, 0x100)).unwrap();
    space.register(user_ram(0xA00, 0x100)).unwrap();

    assert_eq!(space.unregister(0x901).unwrap_err(), RouterError::NotFound(0x901));
    let area = space.unregister(0x900).unwrap();
    assert_eq!(area.len(), 0x100);
    assert_eq!(
        space.read(0x900, Width::Byte, Privilege::User),
        Err(RouterError::Unmapped(0x900))
    );

    space.reset();
    assert!(space.is_empty());
    space.reset();
    assert!(space.is_empty());
}

#[test]
fn test_zero_length_area_is_rejected() {
    let mut space = AddressSpace::new();
    let err = space.register(user_ram(0x900, 0)).unwrap_err();
    assert_eq!(err, RouterError::EmptyArea("ram"));
}

#[test]
fn test_access_rights_follow_privilege() {
    let mut space = AddressSpace::new();
    space
        .register(MemoryArea::host(
            "vectors",
            0x0,
            vec![0u8; 0x200],
            AccessFlags::SUPER_RW,
        ))
        .unwrap();
    space
        .register(MemoryArea::host(
            "basepage",
            0x800,
            vec![0u8; 0x100],
            AccessFlags::USER_READ,
        ))
        .unwrap();

    assert_eq!(
        space.read(0x8, Width::Long, Privilege::User),
        Err(RouterError::AccessDenied {
            addr: 0x8,
            access: Access::Read,
            mode: Privilege::User,
        })
    );
    space
        .write(0x8, Width::Long, 0xFC_0000, Privilege::Supervisor)
        .unwrap();
    assert_eq!(
        space.read(0x8, Width::Long, Privilege::Supervisor).unwrap(),
        0xFC_0000
    );

    // Read-only for everyone, including the supervisor.
    assert!(space.read(0x800, Width::Long, Privilege::User).is_ok());
    assert!(space.read(0x800, Width::Long, Privilege::Supervisor).is_ok());
    assert!(matches!(
        space.write(0x800, Width::Byte, 1, Privilege::User),
        Err(RouterError::AccessDenied { access: Access::Write, .. })
    ));
    assert!(matches!(
        space.write(0x800, Width::Byte, 1, Privilege::Supervisor),
        Err(RouterError::AccessDenied { .. })
    ));
}

#[test]
fn test_crossing_area_end_is_unmapped() {
    let mut space = AddressSpace::new();
    space.register(user_ram(0x900, 0x100)).unwrap();
    space.register(user_ram(0xA00, 0x100)).unwrap();

    assert_eq!(
        space.read(0x9FE, Width::Long, Privilege::User),
        Err(RouterError::Unmapped(0x9FE))
    );
    assert!(space.write_bytes(0x9FF, &[1, 2], Privilege::User).is_err());
    assert!(space.read(0x9FC, Width::Long, Privilege::User).is_ok());
}

#[derive(Debug)]
struct Latch {
    writes: Rc<RefCell<Vec<(u32, u8)>>>,
}

impl AreaHandler for Latch {
    fn read_u8(&mut self, offset: u32) -> u8 {
        offset as u8 | 0x80
    }

    fn write_u8(&mut self, offset: u32, value: u8) {
        self.writes.borrow_mut().push((offset, value));
    }

    fn peek_u8(&self, offset: u32) -> u8 {
        offset as u8
    }
}

#[test]
fn test_callback_area_splits_bytes_msb_first() {
    let writes = Rc::new(RefCell::new(Vec::new()));
    let mut space = AddressSpace::new();
    space
        .register(MemoryArea::callback(
            "latch",
            0xFF_8000,
            0x10,
            AccessFlags::SUPER_RW | AccessFlags::USER_RW,
            Box::new(Latch {
                writes: writes.clone(),
            }),
        ))
        .unwrap();

    space
        .write(0xFF_8004, Width::Word, 0xBEEF, Privilege::User)
        .unwrap();
    assert_eq!(*writes.borrow(), vec![(4, 0xBE), (5, 0xEF)]);

    assert_eq!(
        space.read(0xFF_8000, Width::Word, Privilege::User).unwrap(),
        0x8081
    );
    // Peeking goes through the side-effect-free hook.
    assert_eq!(
        space.peek(0xFF_8002, Width::Long, Privilege::User).unwrap(),
        0x0203_0405
    );
}

#[test]
fn test_peek_cstring_stops_at_nul_or_limit() {
    let mut space = AddressSpace::new();
    space.register(user_ram(0x900, 0x20)).unwrap();
    space
        .write_bytes(0x900, b"HELLO\0WORLD", Privilege::User)
        .unwrap();

    assert_eq!(
        space.peek_cstring(0x900, 64, Privilege::User).unwrap(),
        Some(b"HELLO".to_vec())
    );
    assert_eq!(space.peek_cstring(0x900, 3, Privilege::User).unwrap(), None);

    space.write_bytes(0x900, &[b'A'; 0x20], Privilege::User).unwrap();
    assert_eq!(
        space.peek_cstring(0x900, 0x100, Privilege::User),
        Err(RouterError::Unmapped(0x920))
    );
}
