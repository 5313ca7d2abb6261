//! Process control, supervisor mode, clock and version queries.

use tracing::info;
use types::dostime::{pack_date, pack_time};
use types::error::EINVFN;
use types::Privilege;
use vm::registers::Register;

use super::{SyscallContext, SyscallResult, fail};

/// GEMDOS 0.21, as reported by Sversion (minor byte first).
pub const GEMDOS_VERSION: u32 = 0x1500;

/// Super argument values with a special meaning.
const SUPER_ENTER: u32 = 0;
const SUPER_INQUIRE: u32 = 1;

pub fn sys_pterm0(ctx: &mut SyscallContext<'_>) -> SyscallResult {
    info!(code = 0, "Pterm0");
    ctx.request_exit(0);
    Ok(0)
}

pub fn sys_pterm(ctx: &mut SyscallContext<'_>) -> SyscallResult {
    let code = i32::from(ctx.arg_i16(2)?);
    info!(code, "Pterm");
    ctx.request_exit(code);
    Ok(0)
}

/// Switches between user and supervisor mode.
///
/// `Super(0)` enters supervisor mode and returns the stack pointer in use
/// before the switch. `Super(1)` only asks. Any other value becomes the user
/// stack pointer and drops back to user mode.
pub fn sys_super(ctx: &mut SyscallContext<'_>) -> SyscallResult {
    let stack = ctx.arg_u32(2)?;
    match stack {
        SUPER_ENTER => {
            let previous = ctx.cpu.sp();
            ctx.cpu.set_privilege(Privilege::Supervisor);
            Ok(previous)
        }
        SUPER_INQUIRE => Ok(u32::from(ctx.cpu.privilege().is_supervisor())),
        usp => {
            ctx.cpu.set_reg(Register::Usp, usp);
            ctx.cpu.set_privilege(Privilege::User);
            Ok(0)
        }
    }
}

pub fn sys_sversion(_ctx: &mut SyscallContext<'_>) -> SyscallResult {
    Ok(GEMDOS_VERSION)
}

pub fn sys_tgetdate(ctx: &mut SyscallContext<'_>) -> SyscallResult {
    let now = ctx.host.now();
    Ok(u32::from(pack_date(now.year(), u8::from(now.month()), now.day())))
}

pub fn sys_tgettime(ctx: &mut SyscallContext<'_>) -> SyscallResult {
    let now = ctx.host.now();
    Ok(u32::from(pack_time(now.hour(), now.minute(), now.second())))
}

/// MiNT extensions probed by runtime libraries. Answering "no such
/// function" makes them fall back to plain GEMDOS.
pub fn sys_not_available(_ctx: &mut SyscallContext<'_>) -> SyscallResult {
    fail(EINVFN)
}
