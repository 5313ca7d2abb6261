//! GEMDOS file handles.
//!
//! Handles 0-5 are the standard handles. 0 reads the console, 1 and 2 write
//! to it, 3-5 stand for the serial and printer ports and are never backed.
//! Handles from 6 upward map to host files.

use std::fs::File;
use std::path::{Path, PathBuf};

pub const MAX_HANDLES: usize = 10;
pub const FIRST_FILE_HANDLE: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Console {
    In,
    Out,
}

#[derive(Debug)]
pub struct OpenFile {
    pub file: File,
    pub path: PathBuf,
}

#[derive(Debug)]
pub enum Slot {
    Console(Console),
    /// AUX/PRN style handle with nothing behind it.
    Reserved,
    File(OpenFile),
}

#[derive(Debug)]
pub struct HandleTable {
    slots: Vec<Option<Slot>>,
}

impl HandleTable {
    pub fn new() -> Self {
        let mut slots: Vec<Option<Slot>> = (0..MAX_HANDLES).map(|_| None).collect();
        slots[0] = Some(Slot::Console(Console::In));
        slots[1] = Some(Slot::Console(Console::Out));
        slots[2] = Some(Slot::Console(Console::Out));
        for slot in &mut slots[3..FIRST_FILE_HANDLE] {
            *slot = Some(Slot::Reserved);
        }
        Self { slots }
    }

    fn index(handle: i16) -> Option<usize> {
        usize::try_from(handle).ok().filter(|&idx| idx < MAX_HANDLES)
    }

    /// Stores `file` in the lowest free slot. `None` when the table is full.
    pub fn insert(&mut self, file: File, path: &Path) -> Option<i16> {
        let idx = (FIRST_FILE_HANDLE..MAX_HANDLES).find(|&idx| self.slots[idx].is_none())?;
        self.slots[idx] = Some(Slot::File(OpenFile {
            file,
            path: path.to_path_buf(),
        }));
        i16::try_from(idx).ok()
    }

    pub fn is_full(&self) -> bool {
        self.slots[FIRST_FILE_HANDLE..].iter().all(Option::is_some)
    }

    pub fn get(&self, handle: i16) -> Option<&Slot> {
        self.slots.get(Self::index(handle)?)?.as_ref()
    }

    pub fn get_mut(&mut self, handle: i16) -> Option<&mut Slot> {
        self.slots.get_mut(Self::index(handle)?)?.as_mut()
    }

    /// Closes a file handle. Standard handles stay open and report success.
    /// Returns false for a handle that is not open.
    pub fn close(&mut self, handle: i16) -> bool {
        match Self::index(handle) {
            Some(idx) if idx < FIRST_FILE_HANDLE => true,
            Some(idx) => self.slots[idx].take().is_some(),
            None => false,
        }
    }

    pub fn open_files(&self) -> usize {
        self.slots[FIRST_FILE_HANDLE..]
            .iter()
            .filter(|slot| slot.is_some())
            .count()
    }

    /// Drops every host file, keeping the standard handles.
    pub fn close_all(&mut self) {
        for slot in &mut self.slots[FIRST_FILE_HANDLE..] {
            *slot = None;
        }
    }
}

impl Default for HandleTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_fills_from_first_file_handle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("x");
        let mut table = HandleTable::new();
        for expected in 6..10 {
            let file = File::create(&path).unwrap();
            assert_eq!(table.insert(file, &path), Some(expected));
        }
        assert_eq!(table.insert(File::create(&path).unwrap(), &path), None);
        assert!(table.close(7));
        assert!(!table.close(7));
        assert_eq!(table.insert(File::create(&path).unwrap(), &path), Some(7));
        assert_eq!(table.open_files(), 4);
    }

    #[test]
    fn standard_handles() {
        let mut table = HandleTable::new();
        assert!(matches!(table.get(0), Some(Slot::Console(Console::In))));
        assert!(matches!(table.get(2), Some(Slot::Console(Console::Out))));
        assert!(matches!(table.get(4), Some(Slot::Reserved)));
        assert!(table.get(6).is_none());
        assert!(table.get(-1).is_none());
        assert!(table.get(10).is_none());
        assert!(table.close(1));
        assert!(table.get(1).is_some());
        assert!(!table.close(-3));
    }
}
