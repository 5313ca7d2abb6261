//! The 256-byte process basepage.

use crate::endian::{read_be32, write_be32};

pub const BASEPAGE_LEN: usize = 0x100;
/// Offset of `p_undef` (reserved, zeroed).
pub const UNDEF_OFFSET: usize = 0x30;
pub const UNDEF_LEN: usize = 80;
/// Offset of `p_cmdlin`: length byte followed by the tail.
pub const CMDLINE_OFFSET: usize = 0x80;
pub const CMDLINE_LEN: usize = 128;
/// Longest tail that fits with its length byte and terminating NUL.
pub const CMDLINE_MAX: usize = 125;

/// Host-order view of a basepage. [`Basepage::to_bytes`] produces the
/// big-endian image the guest sees.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Basepage {
    pub p_lowtpa: u32,
    pub p_hitpa: u32,
    pub p_tbase: u32,
    pub p_tlen: u32,
    pub p_dbase: u32,
    pub p_dlen: u32,
    pub p_bbase: u32,
    pub p_blen: u32,
    pub p_dta: u32,
    pub p_parent: u32,
    pub p_reserved: u32,
    pub p_env: u32,
    pub p_undef: [u8; UNDEF_LEN],
    pub p_cmdlin: [u8; CMDLINE_LEN],
}

impl Basepage {
    /// Lays out segments back to back starting right after the basepage.
    pub fn new(lowtpa: u32, hitpa: u32, tlen: u32, dlen: u32, blen: u32) -> Self {
        let p_tbase = lowtpa.wrapping_add(BASEPAGE_LEN as u32);
        let p_dbase = p_tbase.wrapping_add(tlen);
        let p_bbase = p_dbase.wrapping_add(dlen);
        Self {
            p_lowtpa: lowtpa,
            p_hitpa: hitpa,
            p_tbase,
            p_tlen: tlen,
            p_dbase,
            p_dlen: dlen,
            p_bbase,
            p_blen: blen,
            p_dta: 0,
            p_parent: 0,
            p_reserved: 0,
            p_env: 0,
            p_undef: [0; UNDEF_LEN],
            p_cmdlin: [0; CMDLINE_LEN],
        }
    }

    /// Fills `p_cmdlin` with the arguments joined by spaces. The first byte
    /// holds the length; the tail is cut at [`CMDLINE_MAX`] bytes.
    pub fn set_command_line<S: AsRef<str>>(&mut self, args: &[S]) {
        let joined = args
            .iter()
            .map(|arg| arg.as_ref())
            .collect::<Vec<_>>()
            .join(" ");
        let tail = &joined.as_bytes()[..joined.len().min(CMDLINE_MAX)];
        self.p_cmdlin = [0; CMDLINE_LEN];
        self.p_cmdlin[0] = tail.len() as u8;
        self.p_cmdlin[1..=tail.len()].copy_from_slice(tail);
    }

    /// The command tail without its length byte.
    pub fn command_line(&self) -> &[u8] {
        let len = usize::from(self.p_cmdlin[0]).min(CMDLINE_MAX);
        &self.p_cmdlin[1..=len]
    }

    fn longs(&self) -> [u32; 12] {
        [
            self.p_lowtpa,
            self.p_hitpa,
            self.p_tbase,
            self.p_tlen,
            self.p_dbase,
            self.p_dlen,
            self.p_bbase,
            self.p_blen,
            self.p_dta,
            self.p_parent,
            self.p_reserved,
            self.p_env,
        ]
    }

    pub fn to_bytes(&self) -> [u8; BASEPAGE_LEN] {
        let mut out = [0u8; BASEPAGE_LEN];
        for (idx, value) in self.longs().into_iter().enumerate() {
            write_be32(&mut out, idx * 4, value);
        }
        out[UNDEF_OFFSET..UNDEF_OFFSET + UNDEF_LEN].copy_from_slice(&self.p_undef);
        out[CMDLINE_OFFSET..].copy_from_slice(&self.p_cmdlin);
        out
    }

    /// Decodes a basepage image; `None` if fewer than 256 bytes are given.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < BASEPAGE_LEN {
            return None;
        }
        let long = |idx: usize| read_be32(bytes, idx * 4);
        let mut page = Self {
            p_lowtpa: long(0)?,
            p_hitpa: long(1)?,
            p_tbase: long(2)?,
            p_tlen: long(3)?,
            p_dbase: long(4)?,
            p_dlen: long(5)?,
            p_bbase: long(6)?,
            p_blen: long(7)?,
            p_dta: long(8)?,
            p_parent: long(9)?,
            p_reserved: long(10)?,
            p_env: long(11)?,
            p_undef: [0; UNDEF_LEN],
            p_cmdlin: [0; CMDLINE_LEN],
        };
        page.p_undef
            .copy_from_slice(&bytes[UNDEF_OFFSET..UNDEF_OFFSET + UNDEF_LEN]);
        page.p_cmdlin
            .copy_from_slice(&bytes[CMDLINE_OFFSET..CMDLINE_OFFSET + CMDLINE_LEN]);
        Some(page)
    }
}
