use bootloader::ProcessImage;
use kernel::syscall::{Entry, SyscallTable};
use types::{AccessFlags, Privilege};
use vm::memory::AddressSpace;

/// `r`/`w` pairs for user and supervisor mode, e.g. `U:r- S:rw`.
pub fn describe_flags(flags: AccessFlags) -> String {
    let pair = |mode| {
        let r = if flags.can_read(mode) { 'r' } else { '-' };
        let w = if flags.can_write(mode) { 'w' } else { '-' };
        format!("{r}{w}")
    };
    format!("U:{} S:{}", pair(Privilege::User), pair(Privilege::Supervisor))
}

pub fn header_lines(image: &ProcessImage) -> Vec<String> {
    let h = &image.header;
    vec![
        format!("magic      0x{:04x}", h.magic),
        format!("text       0x{:08x}", h.tsize),
        format!("data       0x{:08x}", h.dsize),
        format!("bss        0x{:08x}", h.bsize),
        format!("symbols    0x{:08x}", h.ssize),
        format!("flags      0x{:08x}", h.flags),
        format!(
            "absflag    0x{:04x} ({} fixups applied)",
            h.absflag, image.fixups
        ),
    ]
}

pub fn basepage_lines(image: &ProcessImage) -> Vec<String> {
    let bp = &image.basepage;
    let fields = [
        ("p_lowtpa", bp.p_lowtpa),
        ("p_hitpa", bp.p_hitpa),
        ("p_tbase", bp.p_tbase),
        ("p_tlen", bp.p_tlen),
        ("p_dbase", bp.p_dbase),
        ("p_dlen", bp.p_dlen),
        ("p_bbase", bp.p_bbase),
        ("p_blen", bp.p_blen),
        ("p_dta", bp.p_dta),
        ("p_parent", bp.p_parent),
        ("p_env", bp.p_env),
    ];
    let mut lines: Vec<String> = fields
        .iter()
        .map(|(name, value)| format!("{name:<10} 0x{value:08x}"))
        .collect();
    lines.push(format!(
        "p_cmdlin   {:?}",
        String::from_utf8_lossy(bp.command_line())
    ));
    lines
}

pub fn memory_map_lines(space: &AddressSpace) -> Vec<String> {
    space
        .areas()
        .map(|area| {
            format!(
                "0x{:06x}..0x{:06x}  {}  {}",
                area.base(),
                area.end(),
                describe_flags(area.flags()),
                area.name()
            )
        })
        .collect()
}

pub fn heap_line(image: &ProcessImage) -> String {
    format!(
        "heap 0x{:06x}..0x{:06x} ({} bytes), user stack at 0x{:06x}",
        image.heap.floor,
        image.heap.top,
        image.heap.len(),
        image.user_stack()
    )
}

/// One line per call: code, name and whether it has a handler.
pub fn call_lines(table: &SyscallTable) -> Vec<String> {
    let mut calls: Vec<_> = table.calls().iter().collect();
    calls.sort_by_key(|call| call.code);
    calls
        .into_iter()
        .map(|call| {
            let status = match call.entry {
                Entry::Implemented(_) => "implemented",
                Entry::Unimplemented => "halts",
            };
            format!("0x{:03x}  {:<26} {status}", call.code, call.name)
        })
        .collect()
}
