use crate::Q;

/// An element of `Z_q` for q = 3329, stored canonically in [0, q).
///
/// Storage is `u16`; arithmetic widens as needed. All operations are total
/// and data-independent: reductions go through mask selects, never through
/// branches on the value.
#[derive(Clone, Copy, Default)]
pub struct Z(u16);

#[allow(clippy::inline_always)]
impl Z {
    /// Barrett constant ⌊2^32 / q⌋; one multiply-shift bounds the remainder below 2q.
    const M: u64 = (1u64 << 32) / (Q as u64);
    #[allow(clippy::cast_possible_truncation)]
    const Q16: u16 = Q as u16;
    const Q32: u32 = Q;

    /// Const constructor for compile-time tables; `v` must already be canonical.
    pub(crate) const fn const_new(v: u16) -> Self { Self(v) }

    #[allow(dead_code)]
    pub fn get_u16(self) -> u16 { self.0 }

    pub fn get_u32(self) -> u32 { u32::from(self.0) }

    pub fn set_u16(&mut self, a: u16) { self.0 = a }

    #[inline(always)]
    pub fn add(self, other: Self) -> Self {
        let sum = self.0.wrapping_add(other.0); // both < q, so sum < 2^13
        let trial = sum.wrapping_sub(Self::Q16);
        let mask = 0u16.wrapping_sub(trial >> 15); // all-ones iff the subtract borrowed
        Self(trial.wrapping_add(Self::Q16 & mask))
    }

    #[inline(always)]
    pub fn sub(self, other: Self) -> Self {
        let diff = self.0.wrapping_sub(other.0);
        let mask = 0u16.wrapping_sub(diff >> 15);
        Self(diff.wrapping_add(Self::Q16 & mask))
    }

    #[inline(always)]
    #[allow(clippy::cast_possible_truncation)]
    pub fn mul(self, other: Self) -> Self {
        let prod = self.get_u32() * other.get_u32();
        let quot = ((u64::from(prod) * Self::M) >> 32) as u32;
        let rem = prod - quot * Self::Q32; // rem < 2q
        let trial = rem.wrapping_sub(Self::Q32);
        let mask = 0u32.wrapping_sub(trial >> 31);
        Self(trial.wrapping_add(Self::Q32 & mask) as u16)
    }
}


/// Unpacks three little-endian bytes into two 12-bit elements. The bit-width
/// admits values up to 4095, so canonicality must be checked wherever the
/// bytes cross a trust boundary.
pub(crate) fn from_bytes_12(bytes: &[u8]) -> (Z, Z) {
    let lo = u16::from(bytes[0]) | (u16::from(bytes[1]) & 0x0F) << 8;
    let hi = u16::from(bytes[1]) >> 4 | u16::from(bytes[2]) << 4;
    (Z(lo), Z(hi))
}


/// Packs two canonical elements into three bytes, 12 bits each little-endian.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn to_bytes_12(a: Z, b: Z, bytes: &mut [u8]) {
    bytes[0] = a.0 as u8;
    bytes[1] = ((a.0 >> 8) | (b.0 << 4)) as u8;
    bytes[2] = (b.0 >> 4) as u8;
}
