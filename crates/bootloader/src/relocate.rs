//! GEMDOS relocation (fixup) tables.
//!
//! The table follows the symbol table. It starts with a big-endian longword
//! holding the offset of the first fixup (zero means there are none). Each
//! following byte moves the cursor: `1` skips 254 bytes without fixing,
//! `0` ends the table and any other value advances by that many bytes and
//! fixes the longword found there.

use types::endian::{read_be32, write_be32};

use crate::LoadError;

const SKIP: u8 = 1;
const SKIP_DISTANCE: u64 = 254;

/// Adds `base` to every longword named by `table` in `image` (text+data).
/// Returns the number of longwords patched.
pub fn apply(image: &mut [u8], table: &[u8], base: u32) -> Result<usize, LoadError> {
    // A table that is missing altogether is treated as empty.
    let Some(first) = read_be32(table, 0) else {
        return Ok(0);
    };
    if first == 0 {
        return Ok(0);
    }

    let mut offset = u64::from(first);
    fix(image, offset, base)?;
    let mut count = 1;

    for &step in &table[4..] {
        match step {
            0 => break,
            SKIP => offset += SKIP_DISTANCE,
            _ => {
                offset += u64::from(step);
                fix(image, offset, base)?;
                count += 1;
            }
        }
    }
    Ok(count)
}

fn fix(image: &mut [u8], offset: u64, base: u32) -> Result<(), LoadError> {
    let at = usize::try_from(offset).map_err(|_| LoadError::BadRelocation { offset })?;
    let value = read_be32(image, at).ok_or(LoadError::BadRelocation { offset })?;
    write_be32(image, at, value.wrapping_add(base));
    Ok(())
}
