use crate::types::Z;
use crate::Q;
use sha3::digest::XofReader;


/// Uniform rejection sampler (`Parse`): reads the SHAKE-128 stream three
/// bytes at a time, splits each group into two 12-bit candidates and keeps
/// those below q until 256 coefficients are accepted. The output is a
/// uniform element of `R_q` in NTT domain.
///
/// Rejection here depends only on the public seed ρ, so the variable trip
/// count leaks nothing secret.
pub(crate) fn sample_uniform(mut xof_reader: impl XofReader) -> [Z; 256] {
    let mut a_hat = [Z::default(); 256];
    let mut group = [0u8; 3];
    let mut accepted = 0usize;

    #[allow(clippy::cast_possible_truncation)]
    while accepted < 256 {
        xof_reader.read(&mut group);
        let d1 = u32::from(group[0]) | (u32::from(group[1]) & 0x0F) << 8;
        let d2 = u32::from(group[1]) >> 4 | u32::from(group[2]) << 4;

        if d1 < Q {
            a_hat[accepted].set_u16(d1 as u16);
            accepted += 1;
        }
        if (d2 < Q) & (accepted < 256) {
            a_hat[accepted].set_u16(d2 as u16);
            accepted += 1;
        }
    }
    a_hat
}


/// Centered binomial sampler (`CBD_η`): consumes 64·η bytes and produces 256
/// coefficients distributed as the difference of two η-bit popcounts, i.e.
/// values in [-η, η] reduced into `Z_q`. η is implied by the input length.
#[must_use]
pub(crate) fn sample_cbd(bytes: &[u8]) -> [Z; 256] {
    let eta = bytes.len() >> 6;
    debug_assert_eq!(bytes.len(), 64 * eta, "cbd: input not 64 * eta bytes");
    let mut f = [Z::default(); 256];
    let mask = (1u32 << eta) - 1;
    let mut acc = 0u32;
    let mut acc_bits = 0;
    let mut index = 0;
    for byte in bytes {
        acc |= u32::from(*byte) << acc_bits;
        acc_bits += 8;
        while acc_bits >= 2 * eta {
            let x = count_ones(acc & mask);
            let y = count_ones((acc >> eta) & mask);
            let (mut zx, mut zy) = (Z::default(), Z::default());
            zx.set_u16(x);
            zy.set_u16(y);
            f[index] = zx.sub(zy);
            acc >>= 2 * eta;
            acc_bits -= 2 * eta;
            index += 1;
        }
    }
    f
}


// Branch-free popcount over at most 8 bits (u32 helps perf)
#[allow(clippy::cast_possible_truncation)]
fn count_ones(x: u32) -> u16 {
    let x = (x & 0x5555_5555) + ((x >> 1) & 0x5555_5555);
    let x = (x & 0x3333_3333) + ((x >> 2) & 0x3333_3333);
    let x = (x & 0x0F0F_0F0F) + ((x >> 4) & 0x0F0F_0F0F);
    x as u16
}
