//! Z-order (Morton) codes for 16-bit grid coordinates.
//!
//! Used by GPU-side consumers to pack tiles with spatial locality; the
//! refinement itself never depends on them.

/// Spread the low 16 bits of `n` onto the even bit positions.
#[inline]
fn part1by1(n: u16) -> u32 {
    let mut x = u32::from(n);
    x = (x | (x << 8)) & 0x00FF_00FF;
    x = (x | (x << 4)) & 0x0F0F_0F0F;
    x = (x | (x << 2)) & 0x3333_3333;
    x = (x | (x << 1)) & 0x5555_5555;
    x
}

/// Gather the even bit positions of `x` into 16 bits.
#[inline]
fn compact1by1(x: u32) -> u16 {
    let mut x = x & 0x5555_5555;
    x = (x | (x >> 1)) & 0x3333_3333;
    x = (x | (x >> 2)) & 0x0F0F_0F0F;
    x = (x | (x >> 4)) & 0x00FF_00FF;
    x = (x | (x >> 8)) & 0x0000_FFFF;
    x as u16
}

/// Interleave `x` (even bits) and `y` (odd bits).
#[inline]
pub fn morton_code(x: u16, y: u16) -> u32 {
    part1by1(x) | (part1by1(y) << 1)
}

/// Inverse of [`morton_code`].
#[inline]
pub fn morton_decode(code: u32) -> (u16, u16) {
    (compact1by1(code), compact1by1(code >> 1))
}
