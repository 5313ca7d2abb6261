//! GEMDOS executable (`.PRG`/`.TOS`/`.TTP`) header.

use thiserror::Error;

use crate::endian::{read_be16, read_be32};

/// `BRA.S` over the header; every GEMDOS executable starts with it.
pub const EXEC_MAGIC: u16 = 0x601A;
/// Size of the fixed header in bytes.
pub const HEADER_SIZE: usize = 28;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum HeaderError {
    #[error("executable is {len} bytes, shorter than the {HEADER_SIZE}-byte header")]
    TooShort { len: usize },
    #[error("bad magic word 0x{0:04x} (expected 0x601a)")]
    BadMagic(u16),
}

/// Decoded program header. All fields are in host order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecHeader {
    pub magic: u16,
    pub tsize: u32,
    pub dsize: u32,
    pub bsize: u32,
    pub ssize: u32,
    pub reserved: u32,
    pub flags: u32,
    pub absflag: u16,
}

impl ExecHeader {
    /// Parses the header at the start of `bytes`.
    pub fn parse(bytes: &[u8]) -> Result<Self, HeaderError> {
        if bytes.len() < HEADER_SIZE {
            return Err(HeaderError::TooShort { len: bytes.len() });
        }
        // Length was checked above, every read below is in range.
        let field = |offset| read_be32(bytes, offset).unwrap_or_default();
        let magic = read_be16(bytes, 0).unwrap_or_default();
        if magic != EXEC_MAGIC {
            return Err(HeaderError::BadMagic(magic));
        }
        Ok(Self {
            magic,
            tsize: field(2),
            dsize: field(6),
            bsize: field(10),
            ssize: field(14),
            reserved: field(18),
            flags: field(22),
            absflag: read_be16(bytes, 26).unwrap_or_default(),
        })
    }

    /// Bytes of text+data that are copied into memory.
    pub fn load_len(&self) -> u64 {
        u64::from(self.tsize) + u64::from(self.dsize)
    }

    /// Bytes the program occupies once bss is included.
    pub fn image_len(&self) -> u64 {
        self.load_len() + u64::from(self.bsize)
    }

    /// File offset of the relocation table (after text, data and symbols).
    pub fn fixup_offset(&self) -> u64 {
        HEADER_SIZE as u64 + self.load_len() + u64::from(self.ssize)
    }

    /// A zero `absflag` means the program carries a relocation table.
    pub fn is_relocatable(&self) -> bool {
        self.absflag == 0
    }
}
