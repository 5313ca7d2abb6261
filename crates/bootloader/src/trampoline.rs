use vm::memory::AreaHandler;

/// `NOP`
const NOP: [u8; 2] = [0x4E, 0x71];

/// Backing for the Supexec return address.
///
/// A supervisor routine started by Supexec returns here. The kernel notices
/// the program counter landing on this area before the next instruction is
/// fetched; the CPU only ever sees harmless NOPs. Writes are refused by the
/// area's rights, so the handler never sees one.
#[derive(Debug, Clone, Copy, Default)]
pub struct Trampoline;

impl AreaHandler for Trampoline {
    fn read_u8(&mut self, offset: u32) -> u8 {
        self.peek_u8(offset)
    }

    fn write_u8(&mut self, _offset: u32, _value: u8) {}

    fn peek_u8(&self, offset: u32) -> u8 {
        NOP[(offset % 2) as usize]
    }
}
