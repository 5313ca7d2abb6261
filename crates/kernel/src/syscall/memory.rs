//! Heap calls on top of [`MemoryAllocator`](crate::allocator::MemoryAllocator).

use tracing::trace;
use types::error::{EGSBF, EIMBA};

use super::{SyscallContext, SyscallResult, fail};
use crate::allocator::AllocError;

/// Malloc argument asking for the size of the largest free block.
const MALLOC_QUERY: i32 = -1;

pub fn sys_malloc(ctx: &mut SyscallContext<'_>) -> SyscallResult {
    let amount = ctx.arg_i32(2)?;
    if amount == MALLOC_QUERY {
        return Ok(ctx.state.allocator.largest_free());
    }
    let base = ctx.state.allocator.allocate(amount as u32);
    trace!(amount, base = format_args!("0x{base:06x}"), "Malloc");
    Ok(base)
}

pub fn sys_mfree(ctx: &mut SyscallContext<'_>) -> SyscallResult {
    let base = ctx.arg_u32(2)?;
    match ctx.state.allocator.free(base) {
        Ok(_) => Ok(0),
        Err(_) => fail(EIMBA),
    }
}

/// `Mshrink(0, block, newsiz)`: the leading word is unused.
pub fn sys_mshrink(ctx: &mut SyscallContext<'_>) -> SyscallResult {
    let base = ctx.arg_u32(4)?;
    let len = ctx.arg_u32(8)?;
    match ctx.state.allocator.shrink(base, len) {
        Ok(()) => Ok(0),
        Err(AllocError::IllegalAddress(_)) => fail(EIMBA),
        Err(AllocError::TooLarge { .. }) => fail(EGSBF),
    }
}
