use vm::memory::{AccessFlags, AddressSpace, MemoryArea, Privilege};
use vm::{Register, RegisterFile, StackArgs};

#[test]
fn test_arguments_are_read_relative_to_sp() {
    let mut space = AddressSpace::new();
    space
        .register(MemoryArea::host(
            "ram",
            0x900,
            vec![0u8; 0x100],
            AccessFlags::USER_RW,
        ))
        .unwrap();

    // Fseek(-4, 6, 2): code, offset.l, handle.w, mode.w
    let frame = [0x00, 0x42, 0xFF, 0xFF, 0xFF, 0xFC, 0x00, 0x06, 0x00, 0x02];
    space.write_bytes(0x9F0, &frame, Privilege::User).unwrap();

    let args = StackArgs::new(&space, 0x9F0, Privilege::User);
    assert_eq!(args.function_code().unwrap(), 0x42);
    assert_eq!(args.i32(2).unwrap(), -4);
    assert_eq!(args.u16(6).unwrap(), 6);
    assert_eq!(args.u16(8).unwrap(), 2);
    assert_eq!(args.u8(9).unwrap(), 2);
    assert_eq!(args.i16(2).unwrap(), -1);
    // Reading past the area fails instead of wrapping into other memory.
    assert!(args.u32(0x10).is_err());
}

#[test]
fn test_register_file_feeds_stack_args() {
    let mut space = AddressSpace::new();
    space
        .register(MemoryArea::host(
            "sstack",
            0x600,
            vec![0u8; 0x200],
            AccessFlags::SUPER_RW,
        ))
        .unwrap();
    space
        .write_u16(0x7F0, 0x0030, Privilege::Supervisor)
        .unwrap();

    let mut regs = RegisterFile::new();
    regs.set(Register::Sr, 0x2700);
    regs.set(Register::A7, 0x7F0);
    let args = StackArgs::new(&space, regs.get(Register::SP), regs.privilege());
    assert_eq!(args.function_code().unwrap(), 0x30);

    // The same frame is invisible from user mode.
    let user = StackArgs::new(&space, 0x7F0, Privilege::User);
    assert!(user.function_code().is_err());
}
