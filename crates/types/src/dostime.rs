//! Packed DOS date and time words.

/// Packs a calendar date: day in bits 0-4, month in 5-8, years since 1980
/// in 9-15. Years outside 1980..=2107 are clamped.
pub fn pack_date(year: i32, month: u8, day: u8) -> u16 {
    let years = (year - 1980).clamp(0, 0x7F) as u16;
    (u16::from(day) & 0x1F) | ((u16::from(month) & 0x0F) << 5) | (years << 9)
}

/// Packs a wall-clock time with two-second resolution.
pub fn pack_time(hour: u8, minute: u8, second: u8) -> u16 {
    (u16::from(second / 2) & 0x1F)
        | ((u16::from(minute) & 0x3F) << 5)
        | ((u16::from(hour) & 0x1F) << 11)
}

/// The `Fdatime` layout: time in the low word, date in the high word.
pub fn pack_datime(date: u16, time: u16) -> u32 {
    (u32::from(date) << 16) | u32::from(time)
}
