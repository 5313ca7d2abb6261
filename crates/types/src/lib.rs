//! Shared layouts and constants for the TOS kernel layer.
//!
//! Everything in here describes data the guest can see: the big-endian wire
//! helpers, the executable header, the basepage record, the fixed memory map
//! and the legacy GEMDOS error vocabulary. The bootloader and the kernel both
//! depend on this crate so they agree on layout without depending on each
//! other.

pub mod endian;

pub mod error;

pub mod exec;
pub use exec::{ExecHeader, HeaderError};

pub mod basepage;
pub use basepage::Basepage;

pub mod boot;
pub use boot::HeapRange;

pub mod mmu;
pub use mmu::{AccessFlags, Privilege};

pub mod dostime;
