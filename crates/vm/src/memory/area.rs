use std::fmt;

use types::endian::{read_be16, read_be32, write_be16, write_be32};
use types::AccessFlags;

/// Access width on the 68000 bus.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Width {
    Byte,
    Word,
    Long,
}

impl Width {
    pub const fn bytes(self) -> u32 {
        match self {
            Width::Byte => 1,
            Width::Word => 2,
            Width::Long => 4,
        }
    }

    pub const fn mask(self) -> u32 {
        match self {
            Width::Byte => 0xFF,
            Width::Word => 0xFFFF,
            Width::Long => 0xFFFF_FFFF,
        }
    }
}

/// Device-style backing for an area. Offsets are relative to the area base.
///
/// Multi-byte accesses are split into bytes, most significant first, so a
/// handler only ever deals with single bytes.
pub trait AreaHandler: fmt::Debug {
    fn read_u8(&mut self, offset: u32) -> u8;
    fn write_u8(&mut self, offset: u32, value: u8);
    /// Read without side effects, used for diagnostics and argument fetches.
    fn peek_u8(&self, offset: u32) -> u8;
}

pub enum Backing {
    Host(Vec<u8>),
    Callback(Box<dyn AreaHandler>),
}

impl fmt::Debug for Backing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backing::Host(buf) => write!(f, "Host({} bytes)", buf.len()),
            Backing::Callback(handler) => write!(f, "Callback({handler:?})"),
        }
    }
}

/// A contiguous range of guest addresses with uniform access rights.
#[derive(Debug)]
pub struct MemoryArea {
    name: &'static str,
    base: u32,
    len: u32,
    flags: AccessFlags,
    backing: Backing,
}

impl MemoryArea {
    /// An area backed by `buf`; its length is the buffer length.
    pub fn host(name: &'static str, base: u32, buf: Vec<u8>, flags: AccessFlags) -> Self {
        let len = u32::try_from(buf.len()).unwrap_or(u32::MAX);
        Self {
            name,
            base,
            len,
            flags,
            backing: Backing::Host(buf),
        }
    }

    pub fn callback(
        name: &'static str,
        base: u32,
        len: u32,
        flags: AccessFlags,
        handler: Box<dyn AreaHandler>,
    ) -> Self {
        Self {
            name,
            base,
            len,
            flags,
            backing: Backing::Callback(handler),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn base(&self) -> u32 {
        self.base
    }

    pub fn len(&self) -> u32 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// One past the last address; may be 2^32.
    pub fn end(&self) -> u64 {
        u64::from(self.base) + u64::from(self.len)
    }

    pub fn flags(&self) -> AccessFlags {
        self.flags
    }

    pub fn contains(&self, addr: u32) -> bool {
        addr >= self.base && u64::from(addr) < self.end()
    }

    /// True when `[addr, addr + size)` lies entirely inside this area.
    pub fn contains_range(&self, addr: u32, size: u32) -> bool {
        self.contains(addr) && u64::from(addr) + u64::from(size) <= self.end()
    }

    /// Host buffer, when the area is host backed.
    pub fn bytes(&self) -> Option<&[u8]> {
        match &self.backing {
            Backing::Host(buf) => Some(buf),
            Backing::Callback(_) => None,
        }
    }

    pub fn bytes_mut(&mut self) -> Option<&mut [u8]> {
        match &mut self.backing {
            Backing::Host(buf) => Some(buf),
            Backing::Callback(_) => None,
        }
    }

    // The helpers below assume the caller already checked the range.

    pub(crate) fn load(&mut self, offset: u32, width: Width) -> u32 {
        match &mut self.backing {
            Backing::Host(buf) => load_be(buf, offset as usize, width),
            Backing::Callback(handler) => {
                (0..width.bytes()).fold(0u32, |acc, idx| {
                    (acc << 8) | u32::from(handler.read_u8(offset + idx))
                })
            }
        }
    }

    pub(crate) fn peek(&self, offset: u32, width: Width) -> u32 {
        match &self.backing {
            Backing::Host(buf) => load_be(buf, offset as usize, width),
            Backing::Callback(handler) => {
                (0..width.bytes()).fold(0u32, |acc, idx| {
                    (acc << 8) | u32::from(handler.peek_u8(offset + idx))
                })
            }
        }
    }

    pub(crate) fn store(&mut self, offset: u32, width: Width, value: u32) {
        let value = value & width.mask();
        match &mut self.backing {
            Backing::Host(buf) => {
                let at = offset as usize;
                match width {
                    Width::Byte => buf[at] = value as u8,
                    Width::Word => {
                        write_be16(buf, at, value as u16);
                    }
                    Width::Long => {
                        write_be32(buf, at, value);
                    }
                }
            }
            Backing::Callback(handler) => {
                let size = width.bytes();
                for idx in 0..size {
                    let shift = 8 * (size - 1 - idx);
                    handler.write_u8(offset + idx, (value >> shift) as u8);
                }
            }
        }
    }
}

fn load_be(buf: &[u8], at: usize, width: Width) -> u32 {
    let value = match width {
        Width::Byte => buf.get(at).copied().map(u32::from),
        Width::Word => read_be16(buf, at).map(u32::from),
        Width::Long => read_be32(buf, at),
    };
    value.unwrap_or_default()
}
