use thiserror::Error;
use tracing::debug;

use types::basepage::Basepage;
use types::boot::{
    BASEPAGE_ADDR, BASEPAGE_SIZE, DTA_ADDR, ENV_ADDR, HEAP_FLOOR, HeapRange, LOW_PAGE_BASE,
    LOW_PAGE_LEN, MID_PAGE_BASE, MID_PAGE_LEN, SUPER_STACK_BASE, SUPER_STACK_LEN,
    SUPEXEC_RETURN, SUPEXEC_RETURN_LEN, USER_RAM_BASE, USER_RAM_TOP,
};
use types::exec::{ExecHeader, HEADER_SIZE, HeaderError};
use types::AccessFlags;
use vm::memory::{AddressSpace, MemoryArea, RouterError};

use crate::image::ProcessImage;
use crate::relocate;
use crate::trampoline::Trampoline;

/// Heap blocks start on this boundary above the program.
const HEAP_ALIGN: u32 = 16;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("invalid executable: {0}")]
    InvalidFormat(#[from] HeaderError),
    #[error("executable truncated: header declares 0x{expected:x} bytes of text+data, file has 0x{actual:x}")]
    Truncated { expected: u64, actual: u64 },
    #[error("program needs 0x{needed:x} bytes but only 0x{available:x} are available")]
    TooLarge { needed: u64, available: u32 },
    #[error("out of host memory allocating {area} (0x{len:x} bytes)")]
    OutOfMemory { area: &'static str, len: usize },
    #[error("relocation at offset 0x{offset:x} is outside the program")]
    BadRelocation { offset: u64 },
    #[error(transparent)]
    Router(#[from] RouterError),
}

/// Boot configuration options consumed by the loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootConfig {
    /// End of user RAM. Real machines stop at the cartridge ROM.
    pub ram_top: u32,
}

impl Default for BootConfig {
    fn default() -> Self {
        Self {
            ram_top: USER_RAM_TOP,
        }
    }
}

/// Builds process images into a guest address space.
#[derive(Debug, Default)]
pub struct Bootloader {
    pub config: BootConfig,
}

impl Bootloader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: BootConfig) -> Self {
        Self { config }
    }

    /// Loads `program` and replaces the contents of `space` with its memory
    /// map. `args` become the basepage command tail.
    ///
    /// On failure `space` is left empty.
    pub fn build<S: AsRef<str>>(
        &self,
        program: &[u8],
        args: &[S],
        space: &mut AddressSpace,
    ) -> Result<ProcessImage, LoadError> {
        let result = self.try_build(program, args, space);
        if result.is_err() {
            space.reset();
        }
        result
    }

    fn try_build<S: AsRef<str>>(
        &self,
        program: &[u8],
        args: &[S],
        space: &mut AddressSpace,
    ) -> Result<ProcessImage, LoadError> {
        let header = ExecHeader::parse(program)?;

        let load_len = header.load_len();
        let payload = (program.len() - HEADER_SIZE) as u64;
        if payload < load_len {
            return Err(LoadError::Truncated {
                expected: load_len,
                actual: payload,
            });
        }

        let ram_top = self.config.ram_top;
        let ram_len = ram_top.saturating_sub(USER_RAM_BASE);
        // The allocator's top is the size of user RAM; what lies above it is
        // left for the user stack.
        let managed_top = ram_len;
        let available = managed_top.saturating_sub(USER_RAM_BASE);
        if header.image_len() > u64::from(available) {
            return Err(LoadError::TooLarge {
                needed: header.image_len(),
                available,
            });
        }

        let low = zeroed("low page", LOW_PAGE_LEN)?;
        let mid = zeroed("mid page", MID_PAGE_LEN)?;
        let sstack = zeroed("supervisor stack", SUPER_STACK_LEN)?;
        let mut ram = zeroed("user ram", ram_len)?;

        // Only text and data come from the file; bss stays zeroed.
        let load_len = load_len as usize;
        ram[..load_len].copy_from_slice(&program[HEADER_SIZE..HEADER_SIZE + load_len]);

        let mut fixups = 0;
        if header.is_relocatable() {
            let table = usize::try_from(header.fixup_offset())
                .ok()
                .and_then(|at| program.get(at..))
                .unwrap_or_default();
            fixups = relocate::apply(&mut ram[..load_len], table, USER_RAM_BASE)?;
        }

        let mut basepage = Basepage::new(
            BASEPAGE_ADDR,
            ram_top,
            header.tsize,
            header.dsize,
            header.bsize,
        );
        basepage.p_dta = DTA_ADDR;
        basepage.p_env = ENV_ADDR;
        basepage.set_command_line(args);

        space.reset();
        space.register(MemoryArea::host(
            "low page",
            LOW_PAGE_BASE,
            low,
            AccessFlags::SUPER_RW,
        ))?;
        space.register(MemoryArea::callback(
            "supexec return",
            SUPEXEC_RETURN,
            SUPEXEC_RETURN_LEN,
            AccessFlags::SUPER_READ,
            Box::new(Trampoline),
        ))?;
        space.register(MemoryArea::host(
            "mid page",
            MID_PAGE_BASE,
            mid,
            AccessFlags::SUPER_RW,
        ))?;
        space.register(MemoryArea::host(
            "supervisor stack",
            SUPER_STACK_BASE,
            sstack,
            AccessFlags::SUPER_RW,
        ))?;
        space.register(MemoryArea::host(
            "basepage",
            BASEPAGE_ADDR,
            basepage.to_bytes().to_vec(),
            AccessFlags::USER_READ,
        ))?;
        space.register(MemoryArea::host(
            "user ram",
            USER_RAM_BASE,
            ram,
            AccessFlags::USER_RW,
        ))?;

        // The heap starts past bss, 16-byte aligned, rather than at the
        // start of user RAM: handing out 0x900 would overlap the program.
        let program_end = basepage.p_bbase + header.bsize;
        let floor = align_up(program_end, HEAP_ALIGN).max(HEAP_FLOOR);
        let heap = HeapRange::new(floor.min(managed_top), managed_top);

        debug!(
            tbase = format_args!("0x{:06x}", basepage.p_tbase),
            dbase = format_args!("0x{:06x}", basepage.p_dbase),
            bbase = format_args!("0x{:06x}", basepage.p_bbase),
            heap_floor = format_args!("0x{:06x}", heap.floor),
            heap_top = format_args!("0x{:06x}", heap.top),
            fixups,
            "process image built"
        );

        Ok(ProcessImage {
            header,
            basepage,
            heap,
            ram_top,
            fixups,
        })
    }
}

fn zeroed(area: &'static str, len: u32) -> Result<Vec<u8>, LoadError> {
    let len = len as usize;
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| LoadError::OutOfMemory { area, len })?;
    buf.resize(len, 0);
    Ok(buf)
}

const fn align_up(value: u32, align: u32) -> u32 {
    value.saturating_add(align - 1) & !(align - 1)
}

// The basepage occupies the bytes right below the text segment.
const _: () = assert!(BASEPAGE_ADDR + BASEPAGE_SIZE == USER_RAM_BASE);
