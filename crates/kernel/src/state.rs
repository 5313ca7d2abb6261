use types::boot::DTA_ADDR;
use types::{HeapRange, Privilege};

use crate::allocator::MemoryAllocator;
use crate::handles::HandleTable;
use crate::path::Sandbox;

/// Registers a Supexec routine may clobber that the caller expects intact.
pub const SUPEXEC_SAVED: usize = 9;

/// Caller state parked while a Supexec routine runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupexecFrame {
    /// D3-D7 then A3-A6.
    pub saved: [u32; SUPEXEC_SAVED],
    pub mode: Privilege,
}

/// Everything the kernel remembers between traps.
#[derive(Debug)]
pub struct KernelState {
    pub allocator: MemoryAllocator,
    /// Disk transfer address.
    pub dta: u32,
    pub handles: HandleTable,
    pub sandbox: Sandbox,
    pub supexec: Vec<SupexecFrame>,
}

impl KernelState {
    pub fn new(sandbox: Sandbox) -> Self {
        Self {
            allocator: MemoryAllocator::default(),
            dta: DTA_ADDR,
            handles: HandleTable::new(),
            sandbox,
            supexec: Vec::new(),
        }
    }

    /// Forgets the previous process and takes over a fresh heap range.
    pub fn reset_process(&mut self, heap: HeapRange) {
        self.allocator = MemoryAllocator::new(heap);
        self.dta = DTA_ADDR;
        self.handles.close_all();
        self.supexec.clear();
    }
}
