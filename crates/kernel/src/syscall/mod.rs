//! Syscall tables and the context handlers run in.
//!
//! Each OS layer declares a static list of [`Call`]s. A [`SyscallTable`]
//! indexes that list by function code once, at construction. Handlers read
//! their own arguments from the caller's stack through [`SyscallContext`]
//! and return the value that lands in D0.

use std::collections::HashMap;
use std::fmt;
use std::io;

use tracing::warn;
use types::error::{self, EINTRN, EPTHOV, ERANGE};
use types::Privilege;
use vm::cpu::Cpu;
use vm::host_interface::HostInterface;
use vm::memory::{AddressSpace, RouterError};
use vm::stack::StackArgs;

use crate::error::{HaltReason, Subsystem};
use crate::path::MAX_GUEST_PATH;
use crate::state::KernelState;

pub mod console;
pub mod dir;
pub mod file;
pub mod gemdos;
pub mod memory;
pub mod process;

/// How a handler fails.
#[derive(Debug)]
pub enum SyscallError {
    /// Reported to the guest as a negative GEMDOS code in D0.
    Code(i32),
    /// Stops emulation.
    Halt(HaltReason),
}

impl From<HaltReason> for SyscallError {
    fn from(reason: HaltReason) -> Self {
        SyscallError::Halt(reason)
    }
}

impl From<RouterError> for SyscallError {
    fn from(err: RouterError) -> Self {
        SyscallError::Halt(HaltReason::Memory(err))
    }
}

pub type SyscallResult = Result<u32, SyscallError>;
pub type Handler = fn(&mut SyscallContext<'_>) -> SyscallResult;

/// Shorthand for returning a legacy error code.
pub fn fail<T>(code: i32) -> Result<T, SyscallError> {
    Err(SyscallError::Code(code))
}

#[derive(Clone, Copy)]
pub enum Entry {
    Implemented(Handler),
    Unimplemented,
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entry::Implemented(_) => f.write_str("Implemented"),
            Entry::Unimplemented => f.write_str("Unimplemented"),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Call {
    pub name: &'static str,
    pub code: u16,
    pub entry: Entry,
}

impl Call {
    pub const fn implemented(name: &'static str, code: u16, handler: Handler) -> Self {
        Self {
            name,
            code,
            entry: Entry::Implemented(handler),
        }
    }

    pub const fn unimplemented(name: &'static str, code: u16) -> Self {
        Self {
            name,
            code,
            entry: Entry::Unimplemented,
        }
    }
}

/// Outcome of looking up a function code.
#[derive(Clone, Copy)]
pub enum Resolved<'t> {
    Implemented(&'t Call, Handler),
    Unimplemented(&'t Call),
    Unknown(u16),
}

#[derive(Debug)]
pub struct SyscallTable {
    subsystem: Subsystem,
    calls: &'static [Call],
    index: HashMap<u16, usize>,
}

impl SyscallTable {
    /// Indexes `calls` by code. When a code is declared twice the first
    /// declaration wins.
    pub fn new(subsystem: Subsystem, calls: &'static [Call]) -> Self {
        let mut index = HashMap::with_capacity(calls.len());
        for (idx, call) in calls.iter().enumerate() {
            index.entry(call.code).or_insert(idx);
        }
        Self {
            subsystem,
            calls,
            index,
        }
    }

    pub fn subsystem(&self) -> Subsystem {
        self.subsystem
    }

    pub fn calls(&self) -> &'static [Call] {
        self.calls
    }

    pub fn resolve(&self, code: u16) -> Resolved<'static> {
        let calls = self.calls;
        match self.index.get(&code).map(|&idx| &calls[idx]) {
            Some(call) => match call.entry {
                Entry::Implemented(handler) => Resolved::Implemented(call, handler),
                Entry::Unimplemented => Resolved::Unimplemented(call),
            },
            None => Resolved::Unknown(code),
        }
    }
}

/// Everything a handler may touch while servicing one trap.
pub struct SyscallContext<'a> {
    pub cpu: &'a mut dyn Cpu,
    pub space: &'a mut AddressSpace,
    pub state: &'a mut KernelState,
    pub host: &'a mut dyn HostInterface,
    exit: Option<i32>,
}

impl<'a> SyscallContext<'a> {
    pub fn new(
        cpu: &'a mut dyn Cpu,
        space: &'a mut AddressSpace,
        state: &'a mut KernelState,
        host: &'a mut dyn HostInterface,
    ) -> Self {
        Self {
            cpu,
            space,
            state,
            host,
            exit: None,
        }
    }

    pub fn args(&self) -> StackArgs<'_> {
        StackArgs::from_cpu(&*self.space, &*self.cpu)
    }

    pub fn mode(&self) -> Privilege {
        self.cpu.privilege()
    }

    pub fn arg_u16(&self, offset: u32) -> Result<u16, SyscallError> {
        Ok(self.args().u16(offset)?)
    }

    pub fn arg_i16(&self, offset: u32) -> Result<i16, SyscallError> {
        Ok(self.args().i16(offset)?)
    }

    pub fn arg_u32(&self, offset: u32) -> Result<u32, SyscallError> {
        Ok(self.args().u32(offset)?)
    }

    pub fn arg_i32(&self, offset: u32) -> Result<i32, SyscallError> {
        Ok(self.args().i32(offset)?)
    }

    /// Ends the process once the current trap completes.
    pub fn request_exit(&mut self, code: i32) {
        self.exit = Some(code);
    }

    pub fn exit_code(&self) -> Option<i32> {
        self.exit
    }

    /// Fails with `ERANGE` unless `len` bytes at `addr` sit inside one
    /// area the caller may read (or write, with `write`). Run it before any
    /// host I/O whose result would land in the buffer.
    pub fn check_buffer(&self, addr: u32, len: u32, write: bool) -> Result<(), SyscallError> {
        let mode = self.mode();
        match self.space.area_at(addr) {
            _ if len == 0 => Ok(()),
            Some(area) if area.contains_range(addr, len) && area.flags().allows(mode, write) => {
                Ok(())
            }
            _ => {
                warn!(addr = format_args!("0x{addr:06x}"), len, "guest buffer out of range");
                fail(ERANGE)
            }
        }
    }

    /// Copies a guest buffer out. A pointer that does not map is `ERANGE`.
    pub fn read_guest(&mut self, addr: u32, len: u32) -> Result<Vec<u8>, SyscallError> {
        let mode = self.mode();
        self.space
            .read_bytes(addr, len, mode)
            .map_err(|err| bad_buffer(addr, err))
    }

    /// Copies into a guest buffer. A pointer that does not map is `ERANGE`.
    pub fn write_guest(&mut self, addr: u32, data: &[u8]) -> Result<(), SyscallError> {
        let mode = self.mode();
        self.space
            .write_bytes(addr, data, mode)
            .map_err(|err| bad_buffer(addr, err))
    }

    /// Reads a NUL-terminated guest string of at most `limit` bytes.
    /// Returns `None` if the terminator is not found in time.
    pub fn guest_string(&self, addr: u32, limit: usize) -> Result<Option<Vec<u8>>, SyscallError> {
        self.space
            .peek_cstring(addr, limit, self.mode())
            .map_err(|err| bad_buffer(addr, err))
    }

    /// A guest path argument; over-long paths are `EPTHOV`.
    pub fn guest_path(&self, addr: u32) -> Result<Vec<u8>, SyscallError> {
        match self.guest_string(addr, MAX_GUEST_PATH)? {
            Some(path) => Ok(path),
            None => fail(EPTHOV),
        }
    }
}

/// Host I/O failures are reported to the guest as `EINTRN`.
pub fn host_failure(call: &'static str, err: io::Error) -> SyscallError {
    warn!(call, %err, "host i/o failed");
    SyscallError::Code(EINTRN)
}

fn bad_buffer(addr: u32, err: RouterError) -> SyscallError {
    warn!(addr = format_args!("0x{addr:06x}"), %err, "guest buffer rejected");
    SyscallError::Code(ERANGE)
}

/// Converts a handler outcome into the D0 value, or the halt.
pub fn into_register(result: SyscallResult) -> Result<u32, HaltReason> {
    match result {
        Ok(value) => Ok(value),
        Err(SyscallError::Code(code)) => Ok(error::to_reg(code)),
        Err(SyscallError::Halt(reason)) => Err(reason),
    }
}
