//! Stable 32-bit rolling string hash.
//!
//! Scores are derived from this hash, so it is defined purely in terms of
//! wrapping `i32` arithmetic and never depends on the platform word size.

/// Hash a string to a non-negative integer.
///
/// Iterates UTF-16 code units and applies `acc = (acc << 5) - acc + unit`
/// with 32-bit wraparound, then takes the absolute value. `i32::MIN` has no
/// positive `i32` counterpart, which is why the result is a `u32`.
#[inline]
pub fn string_hash(s: &str) -> u32 {
    let mut acc: i32 = 0;
    for unit in s.encode_utf16() {
        acc = acc
            .wrapping_shl(5)
            .wrapping_sub(acc)
            .wrapping_add(i32::from(unit));
    }
    acc.unsigned_abs()
}
