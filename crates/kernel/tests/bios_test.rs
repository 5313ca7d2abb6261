mod common;

use common::{Arg, Harness, TRAP_PC};
use kernel::bios::*;
use kernel::xbios::*;
use kernel::HaltReason;
use types::boot::{SUPER_STACK_TOP, SUPEXEC_RETURN};
use types::Privilege;
use vm::{Cpu, Register};

#[test]
fn test_console_device_io() {
    let mut h = Harness::with_input(b"q");
    assert_eq!(h.bios(SYSCALL_BCONSTAT, &[Arg::W(DEV_CON)]), 0xFFFF_FFFF);
    assert_eq!(h.bios(SYSCALL_BCONSTAT, &[Arg::W(1)]), 0);
    assert_eq!(h.bios(SYSCALL_BCONIN, &[Arg::W(DEV_CON)]), u32::from(b'q'));
    assert_eq!(h.bios(SYSCALL_BCONSTAT, &[Arg::W(DEV_CON)]), 0);

    assert_eq!(h.bios(SYSCALL_BCONOUT, &[Arg::W(DEV_CON), Arg::W(u16::from(b'!'))]), 0);
    // Other devices swallow output.
    assert_eq!(h.bios(SYSCALL_BCONOUT, &[Arg::W(0), Arg::W(u16::from(b'?'))]), 0);
    assert_eq!(h.output(), b"!");

    assert_eq!(h.bios(SYSCALL_BCOSTAT, &[Arg::W(DEV_CON)]), 0xFFFF_FFFF);
    assert_eq!(h.bios(SYSCALL_BCOSTAT, &[Arg::W(3)]), 0);
}

#[test]
fn test_setexc_swaps_vectors() {
    println!("=== Testing Setexc ===");
    let mut h = Harness::new();
    // Vector 0x21 (TRAP #1) lives at 0x84.
    assert_eq!(h.bios(SYSCALL_SETEXC, &[Arg::W(0x21), Arg::L(0xFFFF_FFFF)]), 0);
    assert_eq!(h.bios(SYSCALL_SETEXC, &[Arg::W(0x21), Arg::L(0x1234)]), 0);
    assert_eq!(h.bios(SYSCALL_SETEXC, &[Arg::W(0x21), Arg::L(0xFFFF_FFFF)]), 0x1234);
    assert_eq!(
        h.machine.space().peek(0x84, vm::Width::Long, Privilege::Supervisor),
        Ok(0x1234)
    );

    // Past the vector page nothing is mapped.
    let halt = h
        .call(0x2D, SYSCALL_SETEXC, &[Arg::W(0x90), Arg::L(0)])
        .unwrap_err();
    assert!(matches!(halt.reason, HaltReason::Memory(_)));
    println!("✓ {halt}");

    // Slot 0x80 is the read-only Supexec trampoline.
    let halt = h
        .call(0x2D, SYSCALL_SETEXC, &[Arg::W(0x80), Arg::L(0x1234)])
        .unwrap_err();
    assert!(matches!(halt.reason, HaltReason::Memory(_)));
}

#[test]
fn test_xbios_queries() {
    let mut h = Harness::new();
    assert_eq!(h.xbios(SYSCALL_GETREZ, &[]), 8);
    assert_eq!(h.xbios(SYSCALL_BIOSKEYS, &[]), 0);
    let keep = Arg::L(0xFFFF_FFFF);
    assert_eq!(h.xbios(SYSCALL_KEYTBL, &[keep, keep, keep]), 0);

    let halt = h
        .call(0x2E, SYSCALL_KEYTBL, &[Arg::L(0x2_0000), keep, keep])
        .unwrap_err();
    assert!(matches!(halt.reason, HaltReason::Unsupported { call: "Keytbl", .. }));
}

#[test]
fn test_duplicate_code_resolves_to_first_entry() {
    let mut h = Harness::new();
    let halt = h.call(0x2E, 0x05, &[]).unwrap_err();
    assert!(matches!(
        halt.reason,
        HaltReason::Unimplemented { name: "Setscreen", .. }
    ));
}

#[test]
fn test_supexec_round_trip() {
    println!("=== Testing Supexec ===");
    let mut h = Harness::new();
    let usp = h.cpu.sp();
    h.cpu.set_reg(Register::D3, 0x3333);
    h.cpu.set_reg(Register::A6, 0x6666);

    assert_eq!(h.xbios(SYSCALL_SUPEXEC, &[Arg::L(0x2_0000)]), 0);
    assert_eq!(h.cpu.reg(Register::Pc), 0x2_0000);
    assert_eq!(h.cpu.privilege(), Privilege::Supervisor);
    let ssp = h.cpu.sp();
    assert_eq!(ssp, SUPER_STACK_TOP - 8);
    let space = h.machine.space();
    assert_eq!(space.peek(ssp, vm::Width::Long, Privilege::Supervisor), Ok(SUPEXEC_RETURN));
    assert_eq!(space.peek(ssp + 4, vm::Width::Long, Privilege::Supervisor), Ok(TRAP_PC));

    // The routine clobbers callee-saved registers and returns with RTS.
    h.cpu.set_reg(Register::D3, 0xDEAD);
    h.cpu.set_reg(Register::A6, 0xBEEF);
    h.cpu.set_reg(Register::D0, 0x42);
    h.cpu.set_reg(Register::Pc, SUPEXEC_RETURN);
    h.cpu.set_reg(Register::SP, ssp + 4);

    assert!(h.machine.resume_supexec(&mut h.cpu).unwrap());
    assert_eq!(h.cpu.reg(Register::Pc), TRAP_PC);
    assert_eq!(h.cpu.privilege(), Privilege::User);
    // The caller pops its own frame after the trap.
    assert_eq!(h.cpu.sp(), usp - 6);
    assert_eq!(h.cpu.reg(Register::D3), 0x3333);
    assert_eq!(h.cpu.reg(Register::A6), 0x6666);
    assert_eq!(h.cpu.reg(Register::D0), 0x42);
    assert_eq!(h.cpu.reg(Register::Ssp), SUPER_STACK_TOP);

    // Nothing pending: landing on the trampoline is left to the CPU.
    h.cpu.set_reg(Register::Pc, SUPEXEC_RETURN);
    assert!(!h.machine.resume_supexec(&mut h.cpu).unwrap());
    println!("✓ routine returned to 0x{TRAP_PC:x}");
}
