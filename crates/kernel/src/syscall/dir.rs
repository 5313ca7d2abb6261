//! Drive and directory calls. The guest has a single drive, `C:`.

use std::fs;

use tracing::warn;
use types::error::{EACCDN, EDRIVE, ERANGE};

use super::file::{host_path, path_error_code};
use super::{SyscallContext, SyscallResult, fail};

/// Drive number of `C:` as Dgetdrv reports it (A: is 0).
pub const CURRENT_DRIVE: u32 = 2;

/// Size of the buffer Dgetpath may fill, terminator included.
pub const DGETPATH_LEN: usize = 128;

pub fn sys_dgetdrv(_ctx: &mut SyscallContext<'_>) -> SyscallResult {
    Ok(CURRENT_DRIVE)
}

pub fn sys_dcreate(ctx: &mut SyscallContext<'_>) -> SyscallResult {
    let path = host_path(ctx, 2)?;
    match fs::create_dir(&path) {
        Ok(()) => Ok(0),
        Err(err) => {
            warn!(path = %path.display(), %err, "Dcreate");
            fail(EACCDN)
        }
    }
}

pub fn sys_dsetpath(ctx: &mut SyscallContext<'_>) -> SyscallResult {
    let addr = ctx.arg_u32(2)?;
    let guest = ctx.guest_path(addr)?;
    match ctx.state.sandbox.set_cwd(&guest) {
        Ok(()) => Ok(0),
        Err(err) => {
            warn!(path = %String::from_utf8_lossy(&guest), %err, "Dsetpath");
            fail(path_error_code(&err))
        }
    }
}

/// `Dgetpath(buf, drive)`. Drive 0 is the current drive, 3 is `C:`.
pub fn sys_dgetpath(ctx: &mut SyscallContext<'_>) -> SyscallResult {
    let buf = ctx.arg_u32(2)?;
    let drive = ctx.arg_u16(6)?;
    if drive != 0 && u32::from(drive) != CURRENT_DRIVE + 1 {
        return fail(EDRIVE);
    }
    let mut path = ctx.state.sandbox.guest_cwd().into_bytes();
    path.push(0);
    if path.len() > DGETPATH_LEN {
        return fail(ERANGE);
    }
    ctx.write_guest(buf, &path)?;
    Ok(0)
}
