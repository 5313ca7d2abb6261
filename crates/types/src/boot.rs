//! Fixed guest memory map and the handoff from the image builder to the
//! kernel.
//!
//! ```text
//! 0x000000 ..0x000200  exception vectors, system variables  (supervisor)
//! 0x000200 ..0x000204  Supexec return trampoline             (supervisor read)
//! 0x000380 ..0x000600  processor save area / system vars     (supervisor)
//! 0x000600 ..0x000800  supervisor stack                      (supervisor)
//! 0x000800 ..0x000900  basepage                              (user read)
//! 0x000900 ..0xFA0000  TPA: text, data, bss, heap, user stack (user r/w)
//! ```

/// Low static page holding the exception vectors.
pub const LOW_PAGE_BASE: u32 = 0x000;
pub const LOW_PAGE_LEN: u32 = 0x200;

/// Return address pushed for Supexec routines. Fetching from here hands
/// control back to the kernel.
pub const SUPEXEC_RETURN: u32 = 0x200;
pub const SUPEXEC_RETURN_LEN: u32 = 4;

/// Mid static page (processor state save area in real TOS).
pub const MID_PAGE_BASE: u32 = 0x380;
pub const MID_PAGE_LEN: u32 = 0x280;

/// Supervisor stack; the initial SSP is its top.
pub const SUPER_STACK_BASE: u32 = 0x600;
pub const SUPER_STACK_LEN: u32 = 0x200;
pub const SUPER_STACK_TOP: u32 = SUPER_STACK_BASE + SUPER_STACK_LEN;

/// The basepage of the single running process.
pub const BASEPAGE_ADDR: u32 = 0x800;
pub const BASEPAGE_SIZE: u32 = 0x100;

/// Offsets into the basepage used as fixed pointers.
pub const ENV_ADDR: u32 = BASEPAGE_ADDR + 0x30;
pub const DTA_ADDR: u32 = BASEPAGE_ADDR + 0x80;

/// First byte of user RAM; text is loaded here.
pub const USER_RAM_BASE: u32 = BASEPAGE_ADDR + BASEPAGE_SIZE;
/// Cartridge ROM starts here, user RAM stops below it.
pub const USER_RAM_TOP: u32 = 0xFA_0000;
pub const USER_RAM_LEN: u32 = USER_RAM_TOP - USER_RAM_BASE;

/// Lowest address the heap allocator may ever hand out.
pub const HEAP_FLOOR: u32 = USER_RAM_BASE;

/// Range handed from the image builder to the kernel allocator.
///
/// The loader sets `floor` to the end of bss rounded up to 16 bytes, never
/// below [`HEAP_FLOOR`], so heap blocks cannot overlap the loaded program.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HeapRange {
    /// First address past the loaded program.
    pub floor: u32,
    /// Exclusive upper bound; fixed for the lifetime of the process.
    pub top: u32,
}

impl HeapRange {
    pub const fn new(floor: u32, top: u32) -> Self {
        Self { floor, top }
    }

    pub const fn len(&self) -> u32 {
        self.top.saturating_sub(self.floor)
    }

    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for HeapRange {
    fn default() -> Self {
        Self::new(HEAP_FLOOR, USER_RAM_LEN)
    }
}
