//! Process-image builder for GEMDOS executables.
//!
//! This crate:
//! - validates and decodes the program header,
//! - lays out the basepage, text, data and bss in host-backed buffers,
//! - applies the relocation table of position-dependent programs,
//! - registers the fixed TOS memory map with the guest address space,
//!   including the read-only Supexec return trampoline.
//!
//! The kernel takes over from the returned [`ProcessImage`].

pub mod bootloader;
pub mod image;
pub mod relocate;
pub mod trampoline;

pub use bootloader::{BootConfig, Bootloader, LoadError};
pub use image::ProcessImage;
