//! Legacy GEMDOS/BIOS error codes.
//!
//! Handlers return these in D0; they are never raised as Rust errors.
//! See <http://toshyp.atari.org/en/005003.html>.

pub const E_OK: i32 = 0;
/// Invalid argument.
pub const EINVAL: i32 = -25;
/// Invalid function number.
pub const EINVFN: i32 = -32;
/// File not found.
pub const EFILNF: i32 = -33;
/// Path not found.
pub const EPTHNF: i32 = -34;
/// No more handles.
pub const ENHNDL: i32 = -35;
/// Access denied.
pub const EACCDN: i32 = -36;
/// Invalid handle.
pub const EIHNDL: i32 = -37;
/// Insufficient memory.
pub const ENSMEM: i32 = -39;
/// Invalid memory block address.
pub const EIMBA: i32 = -40;
/// Invalid drive.
pub const EDRIVE: i32 = -46;
/// No more files.
pub const ENMFIL: i32 = -49;
/// Range error (buffer too small or outside guest memory).
pub const ERANGE: i32 = -64;
/// Internal error.
pub const EINTRN: i32 = -65;
/// Invalid program load format.
pub const EPLFMT: i32 = -66;
/// Memory block growth failure.
pub const EGSBF: i32 = -67;
/// Path overflow.
pub const EPTHOV: i32 = -70;

/// Reinterprets a signed return code as the raw D0 value.
#[inline]
pub const fn to_reg(code: i32) -> u32 {
    code as u32
}

/// Human readable name for a code, used in traces.
pub fn name(code: i32) -> &'static str {
    match code {
        E_OK => "E_OK",
        EINVAL => "EINVAL",
        EINVFN => "EINVFN",
        EFILNF => "EFILNF",
        EPTHNF => "EPTHNF",
        ENHNDL => "ENHNDL",
        EACCDN => "EACCDN",
        EIHNDL => "EIHNDL",
        ENSMEM => "ENSMEM",
        EIMBA => "EIMBA",
        EDRIVE => "EDRIVE",
        ENMFIL => "ENMFIL",
        ERANGE => "ERANGE",
        EINTRN => "EINTRN",
        EPLFMT => "EPLFMT",
        EGSBF => "EGSBF",
        EPTHOV => "EPTHOV",
        _ => "?",
    }
}
