//! BIOS (`TRAP #13`) calls. Only the console device is backed.

use tracing::debug;
use types::Privilege;

use crate::syscall::{Call, SyscallContext, SyscallResult, host_failure};

pub const SYSCALL_BCONSTAT: u16 = 0x01;
pub const SYSCALL_BCONIN: u16 = 0x02;
pub const SYSCALL_BCONOUT: u16 = 0x03;
pub const SYSCALL_SETEXC: u16 = 0x05;
pub const SYSCALL_BCOSTAT: u16 = 0x08;

/// BIOS device number of the console.
pub const DEV_CON: u16 = 2;

/// Setexc vector argument that only queries.
const SETEXC_QUERY: u32 = 0xFFFF_FFFF;

const READY: u32 = 0xFFFF_FFFF;

pub static BIOS_CALLS: &[Call] = &[
    Call::implemented("Bconin", SYSCALL_BCONIN, sys_bconin),
    Call::implemented("Bconout", SYSCALL_BCONOUT, sys_bconout),
    Call::implemented("Bconstat", SYSCALL_BCONSTAT, sys_bconstat),
    Call::implemented("Bcostat", SYSCALL_BCOSTAT, sys_bcostat),
    Call::unimplemented("Drvmap", 0x0A),
    Call::unimplemented("Getbpb", 0x07),
    Call::unimplemented("Getmpb", 0x00),
    Call::unimplemented("Kbshift", 0x0B),
    Call::unimplemented("Mediach", 0x09),
    Call::unimplemented("Rwabs", 0x04),
    Call::implemented("Setexc", SYSCALL_SETEXC, sys_setexc),
    Call::unimplemented("Tickcal", 0x06),
];

pub fn sys_bconstat(ctx: &mut SyscallContext<'_>) -> SyscallResult {
    let dev = ctx.arg_u16(2)?;
    if dev == DEV_CON && ctx.host.input_ready() {
        return Ok(READY);
    }
    Ok(0)
}

/// Waits for a console byte. End of input reads as 0xFF.
pub fn sys_bconin(ctx: &mut SyscallContext<'_>) -> SyscallResult {
    let dev = ctx.arg_u16(2)?;
    if dev != DEV_CON {
        return Ok(0);
    }
    match ctx.host.read_byte() {
        Ok(Some(byte)) => Ok(u32::from(byte)),
        Ok(None) => Ok(0xFF),
        Err(err) => Err(host_failure("Bconin", err)),
    }
}

pub fn sys_bconout(ctx: &mut SyscallContext<'_>) -> SyscallResult {
    let dev = ctx.arg_u16(2)?;
    let ch = ctx.arg_u16(4)?;
    if dev == DEV_CON {
        ctx.host
            .write(&[ch as u8])
            .map_err(|err| host_failure("Bconout", err))?;
    }
    Ok(0)
}

pub fn sys_bcostat(ctx: &mut SyscallContext<'_>) -> SyscallResult {
    let dev = ctx.arg_u16(2)?;
    Ok(if dev == DEV_CON { READY } else { 0 })
}

/// `Setexc(number, vector)`: installs an exception vector and returns the
/// previous one. A vector of -1 leaves the table untouched.
///
/// Only slots inside the low page (numbers below 0x80) are backed. Higher
/// numbers land on the Supexec trampoline or unmapped memory and halt the
/// machine with a memory error, like any other router violation.
pub fn sys_setexc(ctx: &mut SyscallContext<'_>) -> SyscallResult {
    let number = ctx.arg_u16(2)?;
    let vector = ctx.arg_u32(4)?;
    let addr = u32::from(number) * 4;
    let previous = ctx.space.read_u32(addr, Privilege::Supervisor)?;
    if vector != SETEXC_QUERY {
        debug!(number, vector = format_args!("0x{vector:06x}"), "Setexc");
        ctx.space.write_u32(addr, vector, Privilege::Supervisor)?;
    }
    Ok(previous)
}
