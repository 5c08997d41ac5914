//! Lookup tables shared by the numeric, UUID and date codecs.
//!
//! All tables are built by const evaluation, so they exist before the first
//! codec call and are never written afterwards.

#![allow(clippy::cast_possible_truncation)]

/// Two ASCII digits for every value in `0..100`, packed as `hi << 8 | lo`.
/// Bit 16 is set when the high digit is a leading zero.
pub(crate) const DIGITS: [u32; 100] = {
    let mut table = [0u32; 100];
    let mut i = 0;
    while i < 100 {
        let leading_zero = if i < 10 { 1 << 16 } else { 0 };
        let hi = (i / 10) as u32 + b'0' as u32;
        let lo = (i % 10) as u32 + b'0' as u32;
        table[i] = leading_zero | (hi << 8) | lo;
        i += 1;
    }
    table
};

/// Lowercase hex pair for every byte value, packed as `hi << 8 | lo`.
pub(crate) const HEX_PAIRS: [u16; 256] = {
    const CHARS: &[u8; 16] = b"0123456789abcdef";
    let mut table = [0u16; 256];
    let mut i = 0;
    while i < 256 {
        table[i] = ((CHARS[i >> 4] as u16) << 8) | CHARS[i & 15] as u16;
        i += 1;
    }
    table
};

/// Marks a byte that is not an ASCII hex digit in [`HEX_VALUES`].
pub(crate) const INVALID_NIBBLE: u8 = 0xFF;

/// Nibble value of every ASCII hex digit (either case); everything else maps
/// to [`INVALID_NIBBLE`].
pub(crate) const HEX_VALUES: [u8; 256] = {
    let mut table = [INVALID_NIBBLE; 256];
    let mut i: u8 = 0;
    loop {
        table[i as usize] = match i {
            b'0'..=b'9' => i - b'0',
            b'a'..=b'f' => i - b'a' + 10,
            b'A'..=b'F' => i - b'A' + 10,
            _ => INVALID_NIBBLE,
        };
        if i == 255 {
            break table;
        }
        i += 1;
    }
};

/// `10^0` through `10^15`; every entry is exact in binary64.
pub(crate) const POW_10: [f64; 16] = {
    let mut table = [0f64; 16];
    let mut power: u64 = 1;
    let mut i = 0;
    while i < 16 {
        table[i] = power as f64;
        power *= 10;
        i += 1;
    }
    table
};

#[inline]
pub(crate) fn write2(value: u32, buf: &mut [u8]) {
    let v = DIGITS[value as usize];
    buf[0] = (v >> 8) as u8;
    buf[1] = v as u8;
}

#[inline]
pub(crate) fn write3(value: u32, buf: &mut [u8]) {
    debug_assert!(value < 1000, "only 3 digit numbers are supported: {value}");
    let hi = value / 100;
    buf[0] = hi as u8 + b'0';
    write2(value - hi * 100, &mut buf[1..]);
}

#[inline]
pub(crate) fn write4(value: u32, buf: &mut [u8]) {
    debug_assert!(value < 10_000, "only 4 digit numbers are supported: {value}");
    let q = value / 100;
    let v1 = DIGITS[q as usize];
    let v2 = DIGITS[(value - ((q << 6) + (q << 5) + (q << 2))) as usize];
    buf[0] = (v1 >> 8) as u8;
    buf[1] = v1 as u8;
    buf[2] = (v2 >> 8) as u8;
    buf[3] = v2 as u8;
}

/// Reads two ASCII digits. The caller has checked them with [`all_digits`].
#[inline]
pub(crate) fn read2(buf: &[u8]) -> u32 {
    let v1 = u32::from(buf[0] - b'0');
    (v1 << 3) + (v1 << 1) + u32::from(buf[1] - b'0')
}

/// Reads four ASCII digits. The caller has checked them with [`all_digits`].
#[inline]
pub(crate) fn read4(buf: &[u8]) -> u32 {
    let v2 = u32::from(buf[1] - b'0');
    let v3 = u32::from(buf[2] - b'0');
    u32::from(buf[0] - b'0') * 1000
        + (v2 << 6)
        + (v2 << 5)
        + (v2 << 2)
        + (v3 << 3)
        + (v3 << 1)
        + u32::from(buf[3] - b'0')
}

#[inline]
pub(crate) fn all_digits(buf: &[u8]) -> bool {
    buf.iter().all(u8::is_ascii_digit)
}

#[inline]
pub(crate) fn write_hex_byte(byte: u8, buf: &mut [u8]) {
    let pair = HEX_PAIRS[byte as usize];
    buf[0] = (pair >> 8) as u8;
    buf[1] = pair as u8;
}
