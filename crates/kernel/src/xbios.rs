//! XBIOS (`TRAP #14`) calls. Almost everything here drives hardware the
//! emulator does not have; those entries only exist to name the call when
//! emulation stops.

use tracing::debug;
use types::boot::SUPEXEC_RETURN;
use types::Privilege;
use vm::registers::Register;

use crate::error::HaltReason;
use crate::state::{SUPEXEC_SAVED, SupexecFrame};
use crate::syscall::{Call, SyscallContext, SyscallResult};

pub const SYSCALL_GETREZ: u16 = 0x04;
pub const SYSCALL_KEYTBL: u16 = 0x10;
pub const SYSCALL_BIOSKEYS: u16 = 0x18;
pub const SYSCALL_SUPEXEC: u16 = 0x26;

/// Not a real ST resolution, so programs do not try to draw.
pub const GETREZ_RESULT: u32 = 8;

/// Keytbl pointer meaning "keep the current table".
const KEYTBL_KEEP: u32 = 0xFFFF_FFFF;

/// Registers a Supexec routine may use freely are D0-D2/A0-A2; the rest is
/// restored when it returns.
pub const SUPEXEC_REGISTERS: [Register; SUPEXEC_SAVED] = [
    Register::D3,
    Register::D4,
    Register::D5,
    Register::D6,
    Register::D7,
    Register::A3,
    Register::A4,
    Register::A5,
    Register::A6,
];

pub static XBIOS_CALLS: &[Call] = &[
    Call::unimplemented("Bconmap", 0x2C),
    Call::implemented("Bioskeys", SYSCALL_BIOSKEYS, sys_bioskeys),
    Call::unimplemented("Blitmode", 0x40),
    Call::unimplemented("Buffoper", 0x88),
    Call::unimplemented("Buffptr", 0x8D),
    Call::unimplemented("Cursconf", 0x15),
    Call::unimplemented("Dbmsg", 0x0B),
    Call::unimplemented("Devconnect", 0x8B),
    Call::unimplemented("DMAread", 0x2A),
    Call::unimplemented("DMAwrite", 0x2B),
    Call::unimplemented("Dosound", 0x20),
    Call::unimplemented("Dsp_Available", 0x6A),
    Call::unimplemented("Dsp_BlkBytes", 0x7C),
    Call::unimplemented("Dsp_BlkHandShake", 0x61),
    Call::unimplemented("Dsp_BlkUnpacked", 0x62),
    Call::unimplemented("Dsp_BlkWords", 0x7B),
    Call::unimplemented("Dsp_DoBlock", 0x60),
    Call::unimplemented("Dsp_ExecBoot", 0x6E),
    Call::unimplemented("Dsp_ExecProg", 0x6D),
    Call::unimplemented("Dsp_FlushSubroutines", 0x73),
    Call::unimplemented("Dsp_GetProgAbility", 0x72),
    Call::unimplemented("Dsp_GetWordSize", 0x67),
    Call::unimplemented("Dsp_Hf0", 0x77),
    Call::unimplemented("Dsp_Hf1", 0x78),
    Call::unimplemented("Dsp_Hf2", 0x79),
    Call::unimplemented("Dsp_Hf3", 0x7A),
    Call::unimplemented("Dsp_HStat", 0x7D),
    Call::unimplemented("Dsp_InqSubrAbility", 0x75),
    Call::unimplemented("Dsp_InStream", 0x63),
    Call::unimplemented("Dsp_IOStream", 0x65),
    Call::unimplemented("Dsp_LoadProg", 0x6C),
    Call::unimplemented("Dsp_LoadSubroutine", 0x74),
    Call::unimplemented("Dsp_Lock", 0x68),
    Call::unimplemented("Dsp_LodToBinary", 0x6F),
    Call::unimplemented("Dsp_MultBlocks", 0x7F),
    Call::unimplemented("Dsp_OutStream", 0x64),
    Call::unimplemented("Dsp_RemoveInterrupts", 0x66),
    Call::unimplemented("Dsp_RequestUniqueAbility", 0x71),
    Call::unimplemented("Dsp_Reserve", 0x6B),
    Call::unimplemented("Dsp_RunSubroutine", 0x76),
    Call::unimplemented("Dsp_SetVectors", 0x7E),
    Call::unimplemented("Dsp_TriggerHC", 0x70),
    Call::unimplemented("Dsp_Unlock", 0x69),
    Call::unimplemented("Dsptristate", 0x89),
    Call::unimplemented("EgetPalette", 0x55),
    Call::unimplemented("EgetShift", 0x51),
    Call::unimplemented("EsetBank", 0x52),
    Call::unimplemented("EsetColor", 0x53),
    Call::unimplemented("EsetGray", 0x56),
    Call::unimplemented("EsetPalette", 0x54),
    Call::unimplemented("EsetShift", 0x50),
    Call::unimplemented("EsetSmear", 0x57),
    Call::unimplemented("Flopfmt", 0x0A),
    Call::unimplemented("Floprate", 0x29),
    Call::unimplemented("Floprd", 0x08),
    Call::unimplemented("Flopver", 0x13),
    Call::unimplemented("Flopwr", 0x09),
    Call::implemented("Getrez", SYSCALL_GETREZ, sys_getrez),
    Call::unimplemented("Gettime", 0x17),
    Call::unimplemented("Giaccess", 0x1C),
    Call::unimplemented("Gpio", 0x8A),
    Call::unimplemented("Ikbdws", 0x19),
    Call::unimplemented("Initmous", 0x00),
    Call::unimplemented("Iorec", 0x0E),
    Call::unimplemented("Jdisint", 0x1A),
    Call::unimplemented("Jenabint", 0x1B),
    Call::unimplemented("Kbdvbase", 0x22),
    Call::unimplemented("Kbrate", 0x23),
    Call::implemented("Keytbl", SYSCALL_KEYTBL, sys_keytbl),
    Call::unimplemented("Locksnd", 0x80),
    Call::unimplemented("Logbase", 0x03),
    Call::unimplemented("Metainit", 0x30),
    Call::unimplemented("Mfpint", 0x0D),
    Call::unimplemented("Midiws", 0x0C),
    Call::unimplemented("NVMaccess", 0x2E),
    Call::unimplemented("Offgibit", 0x1D),
    Call::unimplemented("Ongibit", 0x1E),
    Call::unimplemented("Physbase", 0x02),
    Call::unimplemented("Protobt", 0x12),
    Call::unimplemented("Prtblk", 0x24),
    Call::unimplemented("Puntaes", 0x27),
    Call::unimplemented("Random", 0x11),
    Call::unimplemented("Rsconf", 0x0F),
    Call::unimplemented("Scrdmp", 0x14),
    Call::unimplemented("Setbuffer", 0x83),
    Call::unimplemented("Setcolor", 0x07),
    Call::unimplemented("Setinterrupt", 0x87),
    Call::unimplemented("Setmode", 0x84),
    Call::unimplemented("Setmontracks", 0x86),
    Call::unimplemented("Setpalette", 0x06),
    Call::unimplemented("Setprt", 0x21),
    Call::unimplemented("Setscreen", 0x05),
    Call::unimplemented("Settime", 0x16),
    Call::unimplemented("Settracks", 0x85),
    Call::unimplemented("Sndstatus", 0x8C),
    Call::unimplemented("Soundcmd", 0x82),
    Call::unimplemented("Ssbrk", 0x01),
    Call::implemented("Supexec", SYSCALL_SUPEXEC, sys_supexec),
    Call::unimplemented("Unlocksnd", 0x81),
    Call::unimplemented("VgetMonitor", 0x59),
    Call::unimplemented("VgetRGB", 0x5E),
    Call::unimplemented("VgetSize", 0x5B),
    Call::unimplemented("VsetMask", 0x92),
    Call::unimplemented("VsetMode", 0x58),
    Call::unimplemented("VsetRGB", 0x5D),
    // Falcon alias of Setscreen; the lookup keeps the first entry.
    Call::unimplemented("VsetScreen", 0x05),
    Call::unimplemented("VsetSync", 0x5A),
    Call::unimplemented("Vsync", 0x25),
    Call::unimplemented("WavePlay", 0xA5),
    Call::unimplemented("Xbtimer", 0x1F),
];

pub fn sys_getrez(_ctx: &mut SyscallContext<'_>) -> SyscallResult {
    Ok(GETREZ_RESULT)
}

pub fn sys_bioskeys(_ctx: &mut SyscallContext<'_>) -> SyscallResult {
    Ok(0)
}

/// `Keytbl(unshift, shift, capslock)`. Only the query form is supported.
pub fn sys_keytbl(ctx: &mut SyscallContext<'_>) -> SyscallResult {
    let tables = [ctx.arg_u32(2)?, ctx.arg_u32(6)?, ctx.arg_u32(10)?];
    if tables.iter().any(|&ptr| ptr != KEYTBL_KEEP) {
        return Err(HaltReason::Unsupported {
            call: "Keytbl",
            detail: format!(
                "installing key tables (0x{:x}, 0x{:x}, 0x{:x})",
                tables[0], tables[1], tables[2]
            ),
        }
        .into());
    }
    Ok(0)
}

/// `Supexec(routine)`: runs `routine` in supervisor mode.
///
/// The routine is entered with [`SUPEXEC_RETURN`] as its return address.
/// When it returns there the machine pops the original program counter and
/// restores the caller's registers and mode.
pub fn sys_supexec(ctx: &mut SyscallContext<'_>) -> SyscallResult {
    let routine = ctx.arg_u32(2)?;
    let frame = SupexecFrame {
        saved: SUPEXEC_REGISTERS.map(|reg| ctx.cpu.reg(reg)),
        mode: ctx.cpu.privilege(),
    };
    let resume = ctx.cpu.reg(Register::Pc);

    ctx.cpu.set_privilege(Privilege::Supervisor);
    let sp = ctx.cpu.sp().wrapping_sub(8);
    ctx.space.write_u32(sp.wrapping_add(4), resume, Privilege::Supervisor)?;
    ctx.space.write_u32(sp, SUPEXEC_RETURN, Privilege::Supervisor)?;
    ctx.cpu.set_reg(Register::SP, sp);
    ctx.cpu.set_reg(Register::Pc, routine);
    ctx.state.supexec.push(frame);

    debug!(
        routine = format_args!("0x{routine:06x}"),
        resume = format_args!("0x{resume:06x}"),
        "Supexec"
    );
    Ok(0)
}
