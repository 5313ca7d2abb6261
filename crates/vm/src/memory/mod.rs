//! Guest address space: an ordered table of memory areas.
//!
//! Every guest access is resolved here. An access is allowed when the area
//! containing the address carries the matching right for the current
//! privilege level; accesses that would cross the end of their area are
//! treated as unmapped rather than spilling into a neighbour.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;
use tracing::debug;

mod area;

pub use area::{AreaHandler, Backing, MemoryArea, Width};
pub use types::{AccessFlags, Privilege};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    Read,
    Write,
    Peek,
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Access::Read => "read",
            Access::Write => "write",
            Access::Peek => "peek",
        })
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RouterError {
    #[error("area '{name}' at 0x{base:06x}..0x{end:06x} overlaps '{existing}'")]
    Overlap {
        name: &'static str,
        base: u32,
        end: u64,
        existing: &'static str,
    },
    #[error("area '{0}' has zero length")]
    EmptyArea(&'static str),
    #[error("no area starts at 0x{0:06x}")]
    NotFound(u32),
    #[error("address 0x{0:06x} is not mapped")]
    Unmapped(u32),
    #[error("{mode:?} {access} of 0x{addr:06x} denied")]
    AccessDenied {
        addr: u32,
        access: Access,
        mode: Privilege,
    },
}

#[derive(Debug, Default)]
pub struct AddressSpace {
    areas: BTreeMap<u32, MemoryArea>,
}

impl AddressSpace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an area. Fails if any byte of it is already mapped.
    pub fn register(&mut self, area: MemoryArea) -> Result<(), RouterError> {
        if area.is_empty() {
            return Err(RouterError::EmptyArea(area.name()));
        }
        // Only the closest area starting below our end can reach into us.
        let end = area.end();
        let below_end = u32::try_from(end).map_or(u32::MAX, |e| e.saturating_sub(1));
        if let Some((_, prev)) = self.areas.range(..=below_end).next_back() {
            if prev.end() > u64::from(area.base()) {
                return Err(RouterError::Overlap {
                    name: area.name(),
                    base: area.base(),
                    end,
                    existing: prev.name(),
                });
            }
        }
        debug!(
            area = area.name(),
            base = format_args!("0x{:06x}", area.base()),
            len = format_args!("0x{:x}", area.len()),
            flags = ?area.flags(),
            "register area"
        );
        self.areas.insert(area.base(), area);
        Ok(())
    }

    /// Removes the area starting exactly at `base` and hands it back.
    pub fn unregister(&mut self, base: u32) -> Result<MemoryArea, RouterError> {
        let area = self
            .areas
            .remove(&base)
            .ok_or(RouterError::NotFound(base))?;
        debug!(area = area.name(), "unregister area");
        Ok(area)
    }

    /// Drops every area and its backing store.
    pub fn reset(&mut self) {
        if !self.areas.is_empty() {
            debug!(count = self.areas.len(), "reset address space");
        }
        self.areas.clear();
    }

    pub fn len(&self) -> usize {
        self.areas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }

    /// Areas in ascending base order.
    pub fn areas(&self) -> impl Iterator<Item = &MemoryArea> {
        self.areas.values()
    }

    pub fn area_at(&self, addr: u32) -> Option<&MemoryArea> {
        self.areas
            .range(..=addr)
            .next_back()
            .map(|(_, area)| area)
            .filter(|area| area.contains(addr))
    }

    fn area_at_mut(&mut self, addr: u32) -> Option<&mut MemoryArea> {
        self.areas
            .range_mut(..=addr)
            .next_back()
            .map(|(_, area)| area)
            .filter(|area| area.contains(addr))
    }

    fn check(
        area: &MemoryArea,
        addr: u32,
        size: u32,
        access: Access,
        mode: Privilege,
    ) -> Result<(), RouterError> {
        if !area.contains_range(addr, size) {
            return Err(RouterError::Unmapped(addr));
        }
        let allowed = match access {
            Access::Read => area.flags().can_read(mode),
            Access::Write => area.flags().can_write(mode),
            Access::Peek => area.flags().can_peek(mode),
        };
        if allowed {
            Ok(())
        } else {
            Err(RouterError::AccessDenied { addr, access, mode })
        }
    }

    pub fn read(&mut self, addr: u32, width: Width, mode: Privilege) -> Result<u32, RouterError> {
        let area = self.area_at_mut(addr).ok_or(RouterError::Unmapped(addr))?;
        Self::check(area, addr, width.bytes(), Access::Read, mode)?;
        let offset = addr - area.base();
        Ok(area.load(offset, width))
    }

    pub fn write(
        &mut self,
        addr: u32,
        width: Width,
        value: u32,
        mode: Privilege,
    ) -> Result<(), RouterError> {
        let area = self.area_at_mut(addr).ok_or(RouterError::Unmapped(addr))?;
        Self::check(area, addr, width.bytes(), Access::Write, mode)?;
        let offset = addr - area.base();
        area.store(offset, width, value);
        Ok(())
    }

    /// Side-effect-free read. Needs read or write rights.
    pub fn peek(&self, addr: u32, width: Width, mode: Privilege) -> Result<u32, RouterError> {
        let area = self.area_at(addr).ok_or(RouterError::Unmapped(addr))?;
        Self::check(area, addr, width.bytes(), Access::Peek, mode)?;
        Ok(area.peek(addr - area.base(), width))
    }

    pub fn read_u8(&mut self, addr: u32, mode: Privilege) -> Result<u8, RouterError> {
        self.read(addr, Width::Byte, mode).map(|v| v as u8)
    }

    pub fn read_u16(&mut self, addr: u32, mode: Privilege) -> Result<u16, RouterError> {
        self.read(addr, Width::Word, mode).map(|v| v as u16)
    }

    pub fn read_u32(&mut self, addr: u32, mode: Privilege) -> Result<u32, RouterError> {
        self.read(addr, Width::Long, mode)
    }

    pub fn write_u8(&mut self, addr: u32, value: u8, mode: Privilege) -> Result<(), RouterError> {
        self.write(addr, Width::Byte, u32::from(value), mode)
    }

    pub fn write_u16(&mut self, addr: u32, value: u16, mode: Privilege) -> Result<(), RouterError> {
        self.write(addr, Width::Word, u32::from(value), mode)
    }

    pub fn write_u32(&mut self, addr: u32, value: u32, mode: Privilege) -> Result<(), RouterError> {
        self.write(addr, Width::Long, value, mode)
    }

    /// Copies `len` guest bytes out. The whole range must sit in one area.
    pub fn read_bytes(
        &mut self,
        addr: u32,
        len: u32,
        mode: Privilege,
    ) -> Result<Vec<u8>, RouterError> {
        if len == 0 {
            return Ok(Vec::new());
        }
        let area = self.area_at_mut(addr).ok_or(RouterError::Unmapped(addr))?;
        Self::check(area, addr, len, Access::Read, mode)?;
        let offset = addr - area.base();
        if let Some(buf) = area.bytes() {
            let at = offset as usize;
            return Ok(buf[at..at + len as usize].to_vec());
        }
        Ok((0..len)
            .map(|idx| area.load(offset + idx, Width::Byte) as u8)
            .collect())
    }

    /// Copies `data` into guest memory. The whole range must sit in one area.
    pub fn write_bytes(
        &mut self,
        addr: u32,
        data: &[u8],
        mode: Privilege,
    ) -> Result<(), RouterError> {
        if data.is_empty() {
            return Ok(());
        }
        let len = u32::try_from(data.len()).map_err(|_| RouterError::Unmapped(addr))?;
        let area = self.area_at_mut(addr).ok_or(RouterError::Unmapped(addr))?;
        Self::check(area, addr, len, Access::Write, mode)?;
        let offset = addr - area.base();
        if let Some(buf) = area.bytes_mut() {
            let at = offset as usize;
            buf[at..at + data.len()].copy_from_slice(data);
            return Ok(());
        }
        for (idx, byte) in (0u32..).zip(data) {
            area.store(offset + idx, Width::Byte, u32::from(*byte));
        }
        Ok(())
    }

    /// Reads a NUL-terminated string without side effects.
    ///
    /// Returns the bytes before the terminator, or `None` if no NUL shows up
    /// within `limit` bytes. Running off the end of the area is `Unmapped`.
    pub fn peek_cstring(
        &self,
        addr: u32,
        limit: usize,
        mode: Privilege,
    ) -> Result<Option<Vec<u8>>, RouterError> {
        let area = self.area_at(addr).ok_or(RouterError::Unmapped(addr))?;
        Self::check(area, addr, 1, Access::Peek, mode)?;
        let mut out = Vec::new();
        let mut cursor = addr;
        while out.len() < limit {
            if !area.contains(cursor) {
                return Err(RouterError::Unmapped(cursor));
            }
            let byte = area.peek(cursor - area.base(), Width::Byte) as u8;
            if byte == 0 {
                return Ok(Some(out));
            }
            out.push(byte);
            cursor = cursor.checked_add(1).ok_or(RouterError::Unmapped(cursor))?;
        }
        Ok(None)
    }
}
