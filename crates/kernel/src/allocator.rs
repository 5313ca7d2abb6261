//! Guest heap bookkeeping for Malloc/Mfree/Mshrink.
//!
//! Blocks are kept in a vector sorted by base address. Allocation is
//! first-fit from the lowest address; freed space is found again by
//! looking at the gaps between live blocks, so nothing has to be merged.

use thiserror::Error;
use tracing::trace;
use types::HeapRange;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Block {
    pub base: u32,
    pub len: u32,
}

impl Block {
    pub fn end(&self) -> u32 {
        self.base + self.len
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AllocError {
    #[error("no block starts at 0x{0:06x}")]
    IllegalAddress(u32),
    #[error("block at 0x{base:06x} is 0x{len:x} bytes and cannot grow to 0x{requested:x}")]
    TooLarge { base: u32, len: u32, requested: u32 },
}

/// Free space between two neighbours (or the range ends).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Gap {
    /// Where a block placed in this gap goes in `blocks`.
    index: usize,
    base: u32,
    len: u32,
}

#[derive(Debug, Clone)]
pub struct MemoryAllocator {
    blocks: Vec<Block>,
    floor: u32,
    top: u32,
}

impl MemoryAllocator {
    pub fn new(range: HeapRange) -> Self {
        Self {
            blocks: Vec::new(),
            floor: range.floor,
            top: range.top,
        }
    }

    pub fn floor(&self) -> u32 {
        self.floor
    }

    pub fn top(&self) -> u32 {
        self.top
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    fn gaps(&self) -> impl Iterator<Item = Gap> + '_ {
        (0..=self.blocks.len()).map(move |index| {
            let base = match index {
                0 => self.floor,
                _ => self.blocks[index - 1].end(),
            };
            let end = self
                .blocks
                .get(index)
                .map_or(self.top, |block| block.base);
            Gap {
                index,
                base,
                len: end.saturating_sub(base),
            }
        })
    }

    /// Size of the biggest gap, 0 if the range is full.
    pub fn largest_free(&self) -> u32 {
        self.gaps().map(|gap| gap.len).max().unwrap_or(0)
    }

    /// Reserves `len` bytes in the first gap strictly larger than `len`.
    /// Returns the block base, or 0 when nothing fits.
    pub fn allocate(&mut self, len: u32) -> u32 {
        if len == 0 {
            return 0;
        }
        let Some(gap) = self.gaps().find(|gap| gap.len > len) else {
            trace!(len, "allocate: no gap large enough");
            return 0;
        };
        self.blocks.insert(gap.index, Block { base: gap.base, len });
        trace!(
            base = format_args!("0x{:06x}", gap.base),
            len,
            blocks = self.blocks.len(),
            "allocate"
        );
        gap.base
    }

    fn position(&self, base: u32) -> Result<usize, AllocError> {
        self.blocks
            .binary_search_by_key(&base, |block| block.base)
            .map_err(|_| AllocError::IllegalAddress(base))
    }

    /// Releases the block starting exactly at `base`.
    pub fn free(&mut self, base: u32) -> Result<Block, AllocError> {
        let index = self.position(base)?;
        Ok(self.blocks.remove(index))
    }

    /// Cuts a block down to `len` bytes. Growing is refused; shrinking to
    /// zero releases the block, so no two blocks ever share a base.
    pub fn shrink(&mut self, base: u32, len: u32) -> Result<(), AllocError> {
        let index = self.position(base)?;
        if len == 0 {
            self.blocks.remove(index);
            return Ok(());
        }
        let block = &mut self.blocks[index];
        if len > block.len {
            return Err(AllocError::TooLarge {
                base,
                len: block.len,
                requested: len,
            });
        }
        block.len = len;
        Ok(())
    }
}

impl Default for MemoryAllocator {
    fn default() -> Self {
        Self::new(HeapRange::default())
    }
}
