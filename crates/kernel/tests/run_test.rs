mod common;

use common::{Arg, ScriptedCpu, Step, config, frame, tiny_program};
use kernel::{HaltReason, Machine};
use types::boot::{BASEPAGE_ADDR, USER_RAM_BASE};
use types::Privilege;
use vm::host_interface::BufferedHost;
use vm::memory::{AddressSpace, RouterError};
use vm::{CpuEvent, Register, RegisterFile, Width};

type Outcome = Result<CpuEvent, RouterError>;

/// A step that pushes a syscall frame and raises `TRAP #vector`.
fn trap(vector: u8, code: u16, args: Vec<Arg>) -> Step {
    Box::new(move |regs: &mut RegisterFile, bus: &mut AddressSpace| -> Outcome {
        let bytes = frame(code, &args);
        let sp = regs.get(Register::A7) - bytes.len() as u32;
        bus.write_bytes(sp, &bytes, regs.privilege())?;
        regs.set(Register::A7, sp);
        Ok(CpuEvent::Trap(vector))
    })
}

fn executed() -> Step {
    Box::new(|_: &mut RegisterFile, _: &mut AddressSpace| -> Outcome {
        Ok(CpuEvent::Executed)
    })
}

fn machine() -> (Machine<BufferedHost>, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let machine = Machine::new(config(&dir), BufferedHost::new()).unwrap();
    (machine, dir)
}

#[test]
fn test_program_runs_to_pterm() {
    println!("=== Testing run loop ===");
    let (mut machine, _dir) = machine();
    machine.load(&tiny_program(), &["one", "two"]).unwrap();

    let message: Step = Box::new(|regs: &mut RegisterFile, bus: &mut AddressSpace| -> Outcome {
        // The program finds its basepage above the return address.
        let sp = regs.get(Register::A7);
        assert_eq!(bus.peek(sp + 4, Width::Long, Privilege::User), Ok(BASEPAGE_ADDR));
        assert_eq!(regs.get(Register::Pc), USER_RAM_BASE);
        bus.write_bytes(0x2_0000, b"bye\0", Privilege::User)?;
        Ok(CpuEvent::Executed)
    });
    let mut cpu = ScriptedCpu::new(vec![
        message,
        trap(0x21, 0x09, vec![Arg::L(0x2_0000)]),
        executed(),
        trap(0x21, 0x4C, vec![Arg::W(3)]),
    ]);

    assert_eq!(machine.run(&mut cpu).unwrap(), 3);
    assert_eq!(cpu.steps, 4);
    assert_eq!(machine.host().output(), b"bye");
    assert!(machine.space().is_empty());
    assert!(machine.image().is_none());
    println!("✓ exit code 3 after {} steps", cpu.steps);
}

#[test]
fn test_halt_keeps_memory_for_inspection() {
    let (mut machine, _dir) = machine();
    machine.load(&tiny_program(), &[] as &[&str]).unwrap();
    let mut cpu = ScriptedCpu::new(vec![executed(), trap(0x21, 0x4B, vec![])]);

    let halt = machine.run(&mut cpu).unwrap_err();
    assert!(matches!(halt.reason, HaltReason::Unimplemented { name: "Pexec", .. }));
    assert!(!machine.space().is_empty());

    machine.terminate();
    machine.terminate();
    assert!(machine.space().is_empty());
}

#[test]
fn test_bus_error_halts() {
    let (mut machine, _dir) = machine();
    machine.load(&tiny_program(), &[] as &[&str]).unwrap();
    let fault: Step = Box::new(|regs: &mut RegisterFile, bus: &mut AddressSpace| -> Outcome {
        regs.set(Register::Pc, 0x910);
        bus.read(0x8, Width::Long, regs.privilege())?;
        Ok(CpuEvent::Executed)
    });
    let mut cpu = ScriptedCpu::new(vec![executed(), fault]);
    let halt = machine.run(&mut cpu).unwrap_err();
    assert!(matches!(
        halt.reason,
        HaltReason::Memory(RouterError::AccessDenied { addr: 0x8, .. })
    ));
    assert_eq!(halt.pc, USER_RAM_BASE);
}

#[test]
fn test_run_without_program() {
    let (mut machine, _dir) = machine();
    let mut cpu = ScriptedCpu::new(vec![]);
    let halt = machine.run(&mut cpu).unwrap_err();
    assert!(matches!(halt.reason, HaltReason::NotLoaded));
}

#[test]
fn test_failed_load_discards_previous_program() {
    let (mut machine, _dir) = machine();
    machine.load(&tiny_program(), &[] as &[&str]).unwrap();
    assert!(machine.load(b"not a program", &[] as &[&str]).is_err());
    assert!(machine.image().is_none());
    assert!(machine.space().is_empty());
}

#[test]
fn test_supexec_returns_through_run_loop() {
    println!("=== Testing Supexec under the run loop ===");
    let (mut machine, _dir) = machine();
    machine.load(&tiny_program(), &[] as &[&str]).unwrap();

    // The routine reads a supervisor-only vector and returns with RTS.
    let routine: Step = Box::new(|regs: &mut RegisterFile, bus: &mut AddressSpace| -> Outcome {
        assert_eq!(regs.get(Register::Pc), 0x3000);
        let value = bus.read(0x84, Width::Long, regs.privilege())?;
        regs.set(Register::D0, value);
        let sp = regs.get(Register::A7);
        let ret = bus.read(sp, Width::Long, regs.privilege())?;
        regs.set(Register::A7, sp + 4);
        regs.set(Register::Pc, ret);
        Ok(CpuEvent::Executed)
    });
    let check: Step = Box::new(|regs: &mut RegisterFile, _: &mut AddressSpace| -> Outcome {
        assert_eq!(regs.privilege(), Privilege::User);
        assert_eq!(regs.get(Register::Pc), USER_RAM_BASE);
        Ok(CpuEvent::Executed)
    });
    let mut cpu = ScriptedCpu::new(vec![
        trap(0x2E, 0x26, vec![Arg::L(0x3000)]),
        routine,
        check,
        trap(0x21, 0x00, vec![]),
    ]);
    assert_eq!(machine.run(&mut cpu).unwrap(), 0);
    assert_eq!(cpu.steps, 4);
    println!("✓ routine ran in supervisor mode and came back");
}
