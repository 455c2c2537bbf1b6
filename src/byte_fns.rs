use crate::helpers::ensure;
use crate::types::{from_bytes_12, to_bytes_12, Z};
use crate::Q;

// Serializers for the d-bit little-endian packing of 256 coefficients into
// 32·d bytes, d ∈ {1, 4, 5, 10, 11, 12}. The 12-bit case is the canonical
// key encoding and runs through the field's 3-byte pair codec; the narrower
// widths stream through a bit buffer.


/// Packs 256 coefficients of at most `d` bits each into `bytes` (32·d long).
/// Coefficients wider than `d` bits are masked down, which is what the
/// compression map relies on at the 2^d wrap-around.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn byte_encode(d: u32, coeffs: &[Z; 256], bytes: &mut [u8]) {
    debug_assert_eq!(bytes.len(), 32 * d as usize, "encode: output not 32 * d bytes");

    if d == 12 {
        for (pair, chunk) in coeffs.chunks_exact(2).zip(bytes.chunks_exact_mut(3)) {
            to_bytes_12(pair[0], pair[1], chunk);
        }
        return;
    }

    let mask = (1u32 << d) - 1;
    let mut acc = 0u32;
    let mut acc_bits = 0;
    let mut byte_index = 0;
    for coeff in coeffs {
        acc |= (coeff.get_u32() & mask) << acc_bits;
        acc_bits += d;
        while acc_bits >= 8 {
            bytes[byte_index] = acc as u8;
            acc >>= 8;
            acc_bits -= 8;
            byte_index += 1;
        }
    }
}


/// Unpacks 32·d bytes into 256 coefficients of `d` bits each. For d = 12 the
/// coefficients are additionally checked canonical (< q), since the encoding
/// admits values the field does not.
pub(crate) fn byte_decode(d: u32, bytes: &[u8]) -> Result<[Z; 256], &'static str> {
    debug_assert_eq!(bytes.len(), 32 * d as usize, "decode: input not 32 * d bytes");
    let mut coeffs = [Z::default(); 256];

    if d == 12 {
        for (pair, chunk) in coeffs.chunks_exact_mut(2).zip(bytes.chunks_exact(3)) {
            let (lo, hi) = from_bytes_12(chunk);
            pair[0] = lo;
            pair[1] = hi;
        }
        ensure!(
            coeffs.iter().all(|c| c.get_u32() < Q),
            "decode: 12-bit coefficient not canonical"
        );
        return Ok(coeffs);
    }

    let mask = (1u64 << d) - 1;
    let mut acc = 0u64;
    let mut acc_bits = 0;
    let mut int_index = 0;
    for byte in bytes {
        acc |= u64::from(*byte) << acc_bits;
        acc_bits += 8;
        while acc_bits >= d {
            #[allow(clippy::cast_possible_truncation)]
            coeffs[int_index].set_u16((acc & mask) as u16);
            acc >>= d;
            acc_bits -= d;
            int_index += 1;
        }
    }
    Ok(coeffs)
}
