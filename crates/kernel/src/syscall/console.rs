//! Character I/O on the host console.

use types::error::ERANGE;

use super::{SyscallContext, SyscallResult, fail, host_failure};

/// Longest string Cconws will print in one call.
pub const CCONWS_LIMIT: usize = 0x8000;

/// Crawio argument asking for input instead of output.
const CRAWIO_READ: u16 = 0x00FF;

/// Returned for "ready" by the status calls.
const READY: u32 = 0xFFFF_FFFF;

/// Blocking read of one byte. End of input reads as 0xFF.
fn read_char(ctx: &mut SyscallContext<'_>, call: &'static str) -> SyscallResult {
    match ctx.host.read_byte() {
        Ok(Some(byte)) => Ok(u32::from(byte)),
        Ok(None) => Ok(0xFF),
        Err(err) => Err(host_failure(call, err)),
    }
}

fn write_char(ctx: &mut SyscallContext<'_>, call: &'static str, byte: u8) -> SyscallResult {
    ctx.host.write(&[byte]).map_err(|err| host_failure(call, err))?;
    Ok(0)
}

pub fn sys_cconin(ctx: &mut SyscallContext<'_>) -> SyscallResult {
    read_char(ctx, "Cconin")
}

pub fn sys_crawcin(ctx: &mut SyscallContext<'_>) -> SyscallResult {
    read_char(ctx, "Crawcin")
}

pub fn sys_cnecin(ctx: &mut SyscallContext<'_>) -> SyscallResult {
    read_char(ctx, "Cnecin")
}

pub fn sys_cconout(ctx: &mut SyscallContext<'_>) -> SyscallResult {
    let ch = ctx.arg_u16(2)?;
    write_char(ctx, "Cconout", ch as u8)
}

pub fn sys_crawio(ctx: &mut SyscallContext<'_>) -> SyscallResult {
    let w = ctx.arg_u16(2)?;
    if w != CRAWIO_READ {
        return write_char(ctx, "Crawio", w as u8);
    }
    if !ctx.host.input_ready() {
        return Ok(0);
    }
    read_char(ctx, "Crawio")
}

/// Prints a NUL-terminated string and returns its length.
pub fn sys_cconws(ctx: &mut SyscallContext<'_>) -> SyscallResult {
    let addr = ctx.arg_u32(2)?;
    let Some(text) = ctx.guest_string(addr, CCONWS_LIMIT)? else {
        return fail(ERANGE);
    };
    ctx.host
        .write(&text)
        .map_err(|err| host_failure("Cconws", err))?;
    Ok(text.len() as u32)
}

/// Reads a line into a LINE buffer: `maxlen`, `actuallen`, then the bytes.
pub fn sys_cconrs(ctx: &mut SyscallContext<'_>) -> SyscallResult {
    let addr = ctx.arg_u32(2)?;
    let max = ctx.read_guest(addr, 1)?[0];
    ctx.check_buffer(addr.wrapping_add(1), u32::from(max) + 1, true)?;
    let mut line = ctx
        .host
        .read_line(usize::from(max))
        .map_err(|err| host_failure("Cconrs", err))?;
    while matches!(line.last(), Some(b'\n' | b'\r')) {
        line.pop();
    }

    let mut record = Vec::with_capacity(line.len() + 1);
    record.push(line.len() as u8);
    record.extend_from_slice(&line);
    ctx.write_guest(addr.wrapping_add(1), &record)?;
    Ok(0)
}

pub fn sys_cconis(ctx: &mut SyscallContext<'_>) -> SyscallResult {
    Ok(if ctx.host.input_ready() { READY } else { 0 })
}

pub fn sys_cconos(_ctx: &mut SyscallContext<'_>) -> SyscallResult {
    Ok(READY)
}
