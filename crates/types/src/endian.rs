//! Guest byte order helpers.
//!
//! The 68000 is big-endian. Every value that crosses between guest memory and
//! host code goes through one of these functions so the rest of the crate
//! never touches raw byte order.

/// Converts a word read from guest memory into host order.
#[inline]
pub const fn be16_to_host(value: u16) -> u16 {
    u16::from_be(value)
}

/// Converts a host word into guest (big-endian) order.
#[inline]
pub const fn host_to_be16(value: u16) -> u16 {
    value.to_be()
}

/// Converts a longword read from guest memory into host order.
#[inline]
pub const fn be32_to_host(value: u32) -> u32 {
    u32::from_be(value)
}

/// Converts a host longword into guest (big-endian) order.
#[inline]
pub const fn host_to_be32(value: u32) -> u32 {
    value.to_be()
}

/// Reads a big-endian word at `offset`, or `None` if it would run past `buf`.
pub fn read_be16(buf: &[u8], offset: usize) -> Option<u16> {
    let end = offset.checked_add(2)?;
    let bytes = buf.get(offset..end)?;
    Some(u16::from_be_bytes([bytes[0], bytes[1]]))
}

/// Reads a big-endian longword at `offset`, or `None` if it would run past `buf`.
pub fn read_be32(buf: &[u8], offset: usize) -> Option<u32> {
    let end = offset.checked_add(4)?;
    let bytes = buf.get(offset..end)?;
    Some(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

/// Stores `value` big-endian at `offset`. Returns false when out of bounds.
pub fn write_be16(buf: &mut [u8], offset: usize, value: u16) -> bool {
    match offset
        .checked_add(2)
        .and_then(|end| buf.get_mut(offset..end))
    {
        Some(dst) => {
            dst.copy_from_slice(&value.to_be_bytes());
            true
        }
        None => false,
    }
}

/// Stores `value` big-endian at `offset`. Returns false when out of bounds.
pub fn write_be32(buf: &mut [u8], offset: usize, value: u32) -> bool {
    match offset
        .checked_add(4)
        .and_then(|end| buf.get_mut(offset..end))
    {
        Some(dst) => {
            dst.copy_from_slice(&value.to_be_bytes());
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn longword_is_stored_most_significant_first() {
        let mut buf = [0u8; 6];
        assert!(write_be32(&mut buf, 1, 0x1234_5678));
        assert_eq!(buf, [0x00, 0x12, 0x34, 0x56, 0x78, 0x00]);
        assert_eq!(read_be32(&buf, 1), Some(0x1234_5678));
    }

    #[test]
    fn out_of_range_access_is_rejected() {
        let mut buf = [0u8; 3];
        assert_eq!(read_be32(&buf, 0), None);
        assert_eq!(read_be16(&buf, 2), None);
        assert!(!write_be16(&mut buf, usize::MAX, 1));
    }

    #[test]
    fn register_conversion_matches_wire_order() {
        let wire = u32::from_ne_bytes([0x60, 0x1A, 0x00, 0x01]);
        assert_eq!(be32_to_host(wire), 0x601A_0001);
        assert_eq!(host_to_be16(0x601A).to_ne_bytes(), [0x60, 0x1A]);
        assert_eq!(be16_to_host(host_to_be16(0xBEEF)), 0xBEEF);
        assert_eq!(host_to_be32(0x0102_0304).to_ne_bytes(), [1, 2, 3, 4]);
    }
}
