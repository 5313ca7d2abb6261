//! GEMDOS (`TRAP #1`) function table.

use super::console::*;
use super::dir::*;
use super::file::*;
use super::memory::*;
use super::process::*;
use super::Call;

pub const SYSCALL_PTERM0: u16 = 0x00;
pub const SYSCALL_CCONIN: u16 = 0x01;
pub const SYSCALL_CCONOUT: u16 = 0x02;
pub const SYSCALL_CRAWIO: u16 = 0x06;
pub const SYSCALL_CRAWCIN: u16 = 0x07;
pub const SYSCALL_CNECIN: u16 = 0x08;
pub const SYSCALL_CCONWS: u16 = 0x09;
pub const SYSCALL_CCONRS: u16 = 0x0A;
pub const SYSCALL_CCONIS: u16 = 0x0B;
pub const SYSCALL_CCONOS: u16 = 0x10;
pub const SYSCALL_DGETDRV: u16 = 0x19;
pub const SYSCALL_FSETDTA: u16 = 0x1A;
pub const SYSCALL_SUPER: u16 = 0x20;
pub const SYSCALL_TGETDATE: u16 = 0x2A;
pub const SYSCALL_TGETTIME: u16 = 0x2C;
pub const SYSCALL_FGETDTA: u16 = 0x2F;
pub const SYSCALL_SVERSION: u16 = 0x30;
pub const SYSCALL_DCREATE: u16 = 0x39;
pub const SYSCALL_DSETPATH: u16 = 0x3B;
pub const SYSCALL_FCREATE: u16 = 0x3C;
pub const SYSCALL_FOPEN: u16 = 0x3D;
pub const SYSCALL_FCLOSE: u16 = 0x3E;
pub const SYSCALL_FREAD: u16 = 0x3F;
pub const SYSCALL_FWRITE: u16 = 0x40;
pub const SYSCALL_FDELETE: u16 = 0x41;
pub const SYSCALL_FSEEK: u16 = 0x42;
pub const SYSCALL_FATTRIB: u16 = 0x43;
pub const SYSCALL_DGETPATH: u16 = 0x47;
pub const SYSCALL_MALLOC: u16 = 0x48;
pub const SYSCALL_MFREE: u16 = 0x49;
pub const SYSCALL_MSHRINK: u16 = 0x4A;
pub const SYSCALL_PTERM: u16 = 0x4C;
pub const SYSCALL_FSFIRST: u16 = 0x4E;
pub const SYSCALL_FSNEXT: u16 = 0x4F;
pub const SYSCALL_FDATIME: u16 = 0x57;

/// Every documented GEMDOS and MiNT call. Calls without a handler halt
/// emulation with their name.
pub static GEMDOS_CALLS: &[Call] = &[
    Call::unimplemented("Cauxin", 0x03),
    Call::unimplemented("Cauxis", 0x12),
    Call::unimplemented("Cauxos", 0x13),
    Call::unimplemented("Cauxout", 0x04),
    Call::implemented("Cconin", SYSCALL_CCONIN, sys_cconin),
    Call::implemented("Cconis", SYSCALL_CCONIS, sys_cconis),
    Call::implemented("Cconos", SYSCALL_CCONOS, sys_cconos),
    Call::implemented("Cconout", SYSCALL_CCONOUT, sys_cconout),
    Call::implemented("Cconrs", SYSCALL_CCONRS, sys_cconrs),
    Call::implemented("Cconws", SYSCALL_CCONWS, sys_cconws),
    Call::implemented("Cnecin", SYSCALL_CNECIN, sys_cnecin),
    Call::unimplemented("Cprnos", 0x11),
    Call::unimplemented("Cprnout", 0x05),
    Call::implemented("Crawcin", SYSCALL_CRAWCIN, sys_crawcin),
    Call::implemented("Crawio", SYSCALL_CRAWIO, sys_crawio),
    Call::unimplemented("Dclosedir", 0x12B),
    Call::unimplemented("Dcntl", 0x130),
    Call::implemented("Dcreate", SYSCALL_DCREATE, sys_dcreate),
    Call::unimplemented("Ddelete", 0x3A),
    Call::unimplemented("Dfree", 0x36),
    Call::unimplemented("Dgetcwd", 0x13B),
    Call::implemented("Dgetdrv", SYSCALL_DGETDRV, sys_dgetdrv),
    Call::implemented("Dgetpath", SYSCALL_DGETPATH, sys_dgetpath),
    Call::unimplemented("Dlock", 0x135),
    Call::unimplemented("Dopendir", 0x128),
    Call::unimplemented("Dpathconf", 0x124),
    Call::unimplemented("Dreaddir", 0x129),
    Call::unimplemented("Drewinddir", 0x12A),
    Call::unimplemented("Dsetdrv", 0x0E),
    Call::implemented("Dsetpath", SYSCALL_DSETPATH, sys_dsetpath),
    Call::implemented("Fattrib", SYSCALL_FATTRIB, sys_fattrib),
    Call::unimplemented("Fchmod", 0x132),
    Call::unimplemented("Fchown", 0x131),
    Call::implemented("Fclose", SYSCALL_FCLOSE, sys_fclose),
    Call::implemented("Fcntl", 0x104, sys_not_available),
    Call::implemented("Fcreate", SYSCALL_FCREATE, sys_fcreate),
    Call::implemented("Fdatime", SYSCALL_FDATIME, sys_fdatime),
    Call::implemented("Fdelete", SYSCALL_FDELETE, sys_fdelete),
    Call::unimplemented("Fdup", 0x45),
    Call::unimplemented("Fforce", 0x46),
    Call::unimplemented("Fgetchar", 0x107),
    Call::implemented("Fgetdta", SYSCALL_FGETDTA, sys_fgetdta),
    Call::unimplemented("Finstat", 0x105),
    Call::unimplemented("Flink", 0x12D),
    Call::unimplemented("Flock", 0x5C),
    Call::unimplemented("Fmidipipe", 0x126),
    Call::implemented("Fopen", SYSCALL_FOPEN, sys_fopen),
    Call::unimplemented("Foutstat", 0x106),
    Call::unimplemented("Fpipe", 0x100),
    Call::unimplemented("Fputchar", 0x108),
    Call::implemented("Fread", SYSCALL_FREAD, sys_fread),
    Call::unimplemented("Freadlink", 0x12F),
    Call::unimplemented("Frename", 0x56),
    Call::implemented("Fseek", SYSCALL_FSEEK, sys_fseek),
    Call::unimplemented("Fselect", 0x11D),
    Call::implemented("Fsetdta", SYSCALL_FSETDTA, sys_fsetdta),
    Call::implemented("Fsfirst", SYSCALL_FSFIRST, sys_fsfirst),
    Call::implemented("Fsnext", SYSCALL_FSNEXT, sys_fsnext),
    Call::unimplemented("Fsymlink", 0x12E),
    Call::implemented("Fwrite", SYSCALL_FWRITE, sys_fwrite),
    Call::implemented("Fxattr", 0x12C, sys_not_available),
    Call::unimplemented("Maddalt", 0x14),
    Call::implemented("Malloc", SYSCALL_MALLOC, sys_malloc),
    Call::implemented("Mfree", SYSCALL_MFREE, sys_mfree),
    Call::implemented("Mshrink", SYSCALL_MSHRINK, sys_mshrink),
    Call::unimplemented("Mxalloc", 0x44),
    Call::unimplemented("Pause", 0x121),
    Call::implemented("Pdomain", 0x119, sys_not_available),
    Call::unimplemented("Pexec", 0x4B),
    Call::unimplemented("Pfork", 0x11B),
    Call::implemented("Pgetegid", 0x139, sys_not_available),
    Call::implemented("Pgeteuid", 0x138, sys_not_available),
    Call::implemented("Pgetgid", 0x114, sys_not_available),
    Call::unimplemented("Pgetpgrp", 0x10D),
    Call::unimplemented("Pgetpid", 0x10B),
    Call::unimplemented("Pgetppid", 0x10C),
    Call::implemented("Pgetuid", 0x10F, sys_not_available),
    Call::unimplemented("Pkill", 0x111),
    Call::unimplemented("Pmsg", 0x125),
    Call::unimplemented("Pnice", 0x10A),
    Call::unimplemented("Prenice", 0x127),
    Call::unimplemented("Prusage", 0x11E),
    Call::unimplemented("Psemaphore", 0x134),
    Call::unimplemented("Psetgid", 0x115),
    Call::unimplemented("Psetlimit", 0x11F),
    Call::unimplemented("Psetpgrp", 0x10E),
    Call::unimplemented("Psetuid", 0x110),
    Call::unimplemented("Psigaction", 0x137),
    Call::unimplemented("Psigblock", 0x116),
    Call::unimplemented("Psignal", 0x112),
    Call::unimplemented("Psigpause", 0x136),
    Call::unimplemented("Psigpending", 0x123),
    Call::unimplemented("Psigreturn", 0x11A),
    Call::unimplemented("Psigsetmask", 0x117),
    Call::implemented("Pterm", SYSCALL_PTERM, sys_pterm),
    Call::implemented("Pterm0", SYSCALL_PTERM0, sys_pterm0),
    Call::unimplemented("Ptermres", 0x31),
    Call::implemented("Pumask", 0x133, sys_not_available),
    Call::unimplemented("Pusrval", 0x118),
    Call::unimplemented("Pvfork", 0x113),
    Call::unimplemented("Pwait", 0x109),
    Call::unimplemented("Pwait3", 0x11C),
    Call::unimplemented("Pwaitpid", 0x13A),
    Call::unimplemented("Salert", 0x13C),
    Call::implemented("Super", SYSCALL_SUPER, sys_super),
    Call::implemented("Sversion", SYSCALL_SVERSION, sys_sversion),
    Call::unimplemented("Pyield", 0xFF),
    Call::unimplemented("Sysconf", 0x122),
    Call::unimplemented("Talarm", 0x120),
    Call::implemented("Tgetdate", SYSCALL_TGETDATE, sys_tgetdate),
    Call::implemented("Tgettime", SYSCALL_TGETTIME, sys_tgettime),
    Call::unimplemented("Tsetdate", 0x2B),
    Call::unimplemented("Tsettime", 0x2D),
    Call::implemented("Ssystem", 0x154, sys_not_available),
    Call::implemented("Ffstat64", 0x15D, sys_not_available),
    Call::implemented("Tgettimeofday", 0x155, sys_not_available),
    Call::implemented("Fstat64", 0x14B, sys_not_available),
    Call::implemented("Psysctl", 0x15E, sys_not_available),
];
