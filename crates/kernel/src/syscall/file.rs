//! File handle calls backed by host files inside the sandbox.

use std::fs::{self, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::PathBuf;

use time::OffsetDateTime;
use tracing::{trace, warn};
use types::dostime::{pack_date, pack_datime, pack_time};
use types::error::{
    EACCDN, EFILNF, EIHNDL, EINTRN, EINVAL, ENHNDL, ENMFIL, EPTHNF, EPTHOV, ERANGE,
};

use super::{SyscallContext, SyscallError, SyscallResult, fail, host_failure};
use crate::handles::{Console, Slot};
use crate::path::PathError;

/// Attribute bits reported by Fattrib.
pub const FA_READONLY: u32 = 0x01;
pub const FA_DIR: u32 = 0x10;

/// Fopen access modes (low two bits of the mode word).
const O_RDONLY: u16 = 0;
const O_WRONLY: u16 = 1;
const O_RDWR: u16 = 2;

/// Fseek origins.
const SEEK_SET: u16 = 0;
const SEEK_CUR: u16 = 1;
const SEEK_END: u16 = 2;

/// GEMDOS code for a path that failed translation.
pub fn path_error_code(err: &PathError) -> i32 {
    match err {
        PathError::TooLong => EPTHOV,
        PathError::Escape | PathError::NotADirectory(_) => EPTHNF,
        PathError::Root { .. } => EINTRN,
    }
}

/// Reads the path argument at `offset` and maps it into the sandbox.
pub(crate) fn host_path(ctx: &SyscallContext<'_>, offset: u32) -> Result<PathBuf, SyscallError> {
    let addr = ctx.arg_u32(offset)?;
    let guest = ctx.guest_path(addr)?;
    ctx.state.sandbox.resolve(&guest).map_err(|err| {
        warn!(path = %String::from_utf8_lossy(&guest), %err, "path rejected");
        SyscallError::Code(path_error_code(&err))
    })
}

/// GEMDOS code for a failed host seek.
pub fn seek_error_code(err: &io::Error) -> i32 {
    match err.raw_os_error() {
        Some(libc::EBADF) => EIHNDL,
        Some(libc::ESPIPE) => EACCDN,
        Some(libc::EINVAL) => EINVAL,
        Some(_) => EINTRN,
        None if err.kind() == io::ErrorKind::InvalidInput => EINVAL,
        None => EINTRN,
    }
}

pub fn sys_fcreate(ctx: &mut SyscallContext<'_>) -> SyscallResult {
    let path = host_path(ctx, 2)?;
    if ctx.state.handles.is_full() {
        return fail(ENHNDL);
    }
    if let Some(parent) = path.parent() {
        if let Err(err) = fs::create_dir_all(parent) {
            warn!(path = %path.display(), %err, "Fcreate: parent directories");
            return fail(EACCDN);
        }
    }
    let file = match fs::File::create(&path) {
        Ok(file) => file,
        Err(err) => {
            warn!(path = %path.display(), %err, "Fcreate");
            return fail(EACCDN);
        }
    };
    match ctx.state.handles.insert(file, &path) {
        Some(handle) => Ok(handle as u32),
        None => fail(ENHNDL),
    }
}

pub fn sys_fopen(ctx: &mut SyscallContext<'_>) -> SyscallResult {
    let path = host_path(ctx, 2)?;
    let mode = ctx.arg_u16(6)? & 3;
    let mut options = OpenOptions::new();
    match mode {
        O_RDONLY => options.read(true),
        O_WRONLY => options.write(true),
        O_RDWR => options.read(true).write(true),
        _ => return fail(EINVAL),
    };
    if ctx.state.handles.is_full() {
        return fail(ENHNDL);
    }
    let file = match options.open(&path) {
        Ok(file) if !path.is_dir() => file,
        Ok(_) => return fail(EFILNF),
        Err(err) => {
            trace!(path = %path.display(), %err, "Fopen");
            return fail(EFILNF);
        }
    };
    match ctx.state.handles.insert(file, &path) {
        Some(handle) => Ok(handle as u32),
        None => fail(ENHNDL),
    }
}

pub fn sys_fclose(ctx: &mut SyscallContext<'_>) -> SyscallResult {
    let handle = ctx.arg_i16(2)?;
    if ctx.state.handles.close(handle) {
        Ok(0)
    } else {
        fail(EIHNDL)
    }
}

/// `Fread(handle, count, buf)`
pub fn sys_fread(ctx: &mut SyscallContext<'_>) -> SyscallResult {
    let handle = ctx.arg_i16(2)?;
    let count = ctx.arg_u32(4)?;
    let buf = ctx.arg_u32(8)?;
    ctx.check_buffer(buf, count, true)?;

    let data = match ctx.state.handles.get_mut(handle) {
        Some(Slot::File(open)) => {
            let mut data = Vec::new();
            (&mut open.file)
                .take(u64::from(count))
                .read_to_end(&mut data)
                .map_err(|err| host_failure("Fread", err))?;
            data
        }
        Some(Slot::Console(Console::In)) => ctx
            .host
            .read_line(count as usize)
            .map_err(|err| host_failure("Fread", err))?,
        Some(Slot::Console(Console::Out)) => return fail(EACCDN),
        Some(Slot::Reserved) | None => return fail(EIHNDL),
    };
    ctx.write_guest(buf, &data)?;
    Ok(data.len() as u32)
}

/// `Fwrite(handle, count, buf)`
pub fn sys_fwrite(ctx: &mut SyscallContext<'_>) -> SyscallResult {
    let handle = ctx.arg_i16(2)?;
    let count = ctx.arg_u32(4)?;
    let buf = ctx.arg_u32(8)?;
    if ctx.state.handles.get(handle).is_none() {
        return fail(EIHNDL);
    }
    let data = ctx.read_guest(buf, count)?;

    match ctx.state.handles.get_mut(handle) {
        Some(Slot::File(open)) => open
            .file
            .write_all(&data)
            .map_err(|err| host_failure("Fwrite", err))?,
        Some(Slot::Console(Console::Out)) => ctx
            .host
            .write(&data)
            .map_err(|err| host_failure("Fwrite", err))?,
        Some(Slot::Console(Console::In)) => return fail(EACCDN),
        Some(Slot::Reserved) | None => return fail(EIHNDL),
    }
    Ok(count)
}

pub fn sys_fdelete(ctx: &mut SyscallContext<'_>) -> SyscallResult {
    let path = host_path(ctx, 2)?;
    match fs::remove_file(&path) {
        Ok(()) => Ok(0),
        Err(err) => {
            trace!(path = %path.display(), %err, "Fdelete");
            fail(EFILNF)
        }
    }
}

/// `Fseek(offset, handle, seekmode)`, returning the new absolute position.
pub fn sys_fseek(ctx: &mut SyscallContext<'_>) -> SyscallResult {
    let offset = ctx.arg_i32(2)?;
    let handle = ctx.arg_i16(6)?;
    let whence = ctx.arg_u16(8)?;
    let target = match whence {
        SEEK_SET => match u64::try_from(offset) {
            Ok(pos) => SeekFrom::Start(pos),
            Err(_) => return fail(EINVAL),
        },
        SEEK_CUR => SeekFrom::Current(i64::from(offset)),
        SEEK_END => SeekFrom::End(i64::from(offset)),
        _ => return fail(EINVAL),
    };

    let open = match ctx.state.handles.get_mut(handle) {
        Some(Slot::File(open)) => open,
        Some(Slot::Console(_)) => return fail(EACCDN),
        Some(Slot::Reserved) | None => return fail(EIHNDL),
    };
    match open.file.seek(target) {
        Ok(pos) => match u32::try_from(pos) {
            Ok(pos) => Ok(pos),
            Err(_) => fail(ERANGE),
        },
        Err(err) => {
            warn!(handle, %err, "Fseek");
            fail(seek_error_code(&err))
        }
    }
}

/// `Fattrib(name, wflag, attr)`; attributes can only be queried.
pub fn sys_fattrib(ctx: &mut SyscallContext<'_>) -> SyscallResult {
    let path = host_path(ctx, 2)?;
    let wflag = ctx.arg_u16(6)?;
    if wflag != 0 {
        return fail(EINVAL);
    }
    let Ok(meta) = fs::metadata(&path) else {
        return fail(EFILNF);
    };
    let mut attr = 0;
    if meta.is_dir() {
        attr |= FA_DIR;
    }
    if meta.permissions().readonly() {
        attr |= FA_READONLY;
    }
    Ok(attr)
}

/// `Fdatime(timeptr, handle, wflag)`; timestamps can only be queried.
pub fn sys_fdatime(ctx: &mut SyscallContext<'_>) -> SyscallResult {
    let ptr = ctx.arg_u32(2)?;
    let handle = ctx.arg_i16(6)?;
    let wflag = ctx.arg_u16(8)?;
    if wflag != 0 {
        return fail(EINVAL);
    }
    ctx.check_buffer(ptr, 4, true)?;

    let offset = ctx.host.local_offset();
    let stamp = match ctx.state.handles.get(handle) {
        Some(Slot::File(open)) => {
            let modified = open.file.metadata().and_then(|meta| meta.modified());
            match modified {
                Ok(time) => OffsetDateTime::from(time).to_offset(offset),
                Err(err) => {
                    warn!(handle, %err, "Fdatime");
                    return fail(if err.raw_os_error() == Some(libc::EBADF) {
                        EIHNDL
                    } else {
                        EINTRN
                    });
                }
            }
        }
        Some(Slot::Console(_)) => ctx.host.now(),
        Some(Slot::Reserved) | None => return fail(EIHNDL),
    };

    let date = pack_date(stamp.year(), u8::from(stamp.month()), stamp.day());
    let time = pack_time(stamp.hour(), stamp.minute(), stamp.second());
    ctx.write_guest(ptr, &pack_datime(date, time).to_be_bytes())?;
    Ok(0)
}

pub fn sys_fsetdta(ctx: &mut SyscallContext<'_>) -> SyscallResult {
    ctx.state.dta = ctx.arg_u32(2)?;
    Ok(0)
}

pub fn sys_fgetdta(ctx: &mut SyscallContext<'_>) -> SyscallResult {
    Ok(ctx.state.dta)
}

/// Directory search is not available: the path is validated, then nothing
/// is found.
pub fn sys_fsfirst(ctx: &mut SyscallContext<'_>) -> SyscallResult {
    let path = host_path(ctx, 2)?;
    trace!(path = %path.display(), "Fsfirst: search unsupported");
    fail(EFILNF)
}

pub fn sys_fsnext(_ctx: &mut SyscallContext<'_>) -> SyscallResult {
    fail(ENMFIL)
}
