use crate::types::Z;
use crate::{Q, ZETA};

// The negacyclic transform over Z_q[X]/(X^256+1) with ζ = 17: seven
// Cooley-Tukey layers forward, seven Gentleman-Sande layers back, and a
// pointwise product acting on 128 residual linear factors.

/// 128^{-1} mod q, applied coefficient-wise by the inverse transform.
const INV_128: u16 = 3303;


/// Forward NTT: maps a polynomial in coefficient basis to evaluation basis.
/// Constant-time over coefficient values; twiddle lookups are driven only by
/// loop indices.
#[must_use]
#[allow(clippy::module_name_repetitions)]
pub(crate) fn ntt(f: &[Z; 256]) -> [Z; 256] {
    let mut f_hat = *f;
    let mut i = 1;
    let mut len = 128;
    while len >= 2 {
        for start in (0..256).step_by(2 * len) {
            let zeta = ZETA_TABLE[i << 1]; // ζ^{BitRev7(i)}
            i += 1;
            for j in start..(start + len) {
                let t = f_hat[j + len].mul(zeta);
                f_hat[j + len] = f_hat[j].sub(t);
                f_hat[j] = f_hat[j].add(t);
            }
        }
        len >>= 1;
    }
    f_hat
}


/// Inverse NTT: Gentleman-Sande butterflies, then every coefficient is
/// scaled by 128^{-1} to undo the transform's growth.
#[must_use]
#[allow(clippy::module_name_repetitions)]
pub(crate) fn ntt_inv(f_hat: &[Z; 256]) -> [Z; 256] {
    let mut f = *f_hat;
    let mut i = 127;
    let mut len = 2;
    while len <= 128 {
        for start in (0..256).step_by(2 * len) {
            let zeta = ZETA_TABLE[i << 1]; // ζ^{BitRev7(i)}
            i -= 1;
            for j in start..(start + len) {
                let t = f[j];
                f[j] = t.add(f[j + len]);
                f[j + len] = zeta.mul(f[j + len].sub(t));
            }
        }
        len <<= 1;
    }
    let mut scale = Z::default();
    scale.set_u16(INV_128);
    f.iter_mut().for_each(|c| *c = c.mul(scale));
    f
}


/// Pointwise product of two NTT-domain polynomials: 128 independent products
/// of linear factors `(a0 + a1·X)(b0 + b1·X) mod (X^2 - γ_i)` with
/// γ_i = ζ^{2·BitRev7(i)+1}.
#[must_use]
pub(crate) fn multiply_ntts(f_hat: &[Z; 256], g_hat: &[Z; 256]) -> [Z; 256] {
    let mut h_hat = [Z::default(); 256];
    for i in 0..128 {
        let gamma = ZETA_TABLE[0x80 | i]; // ζ^{2·BitRev7(i)+1}
        let (c0, c1) = base_case_multiply(
            f_hat[2 * i],
            f_hat[2 * i + 1],
            g_hat[2 * i],
            g_hat[2 * i + 1],
            gamma,
        );
        h_hat[2 * i] = c0;
        h_hat[2 * i + 1] = c1;
    }
    h_hat
}


/// One linear-factor product: c0 = a0·b0 + a1·b1·γ, c1 = a0·b1 + a1·b0.
#[must_use]
fn base_case_multiply(a0: Z, a1: Z, b0: Z, b1: Z, gamma: Z) -> (Z, Z) {
    let c0 = a0.mul(b0).add(a1.mul(b1).mul(gamma));
    let c1 = a0.mul(b1).add(a1.mul(b0));
    (c0, c1)
}


// Powers of ζ in bit-reversed order, computed at compile time. Entry
// bitrev8(n) holds ζ^n, which makes ζ^{BitRev7(i)} = table[i << 1] and
// ζ^{2·BitRev7(i)+1} = table[0x80 | i] for i < 128.
#[must_use]
#[allow(clippy::cast_possible_truncation)] // const fns cannot use u32::from() etc...
const fn gen_zeta_table() -> [Z; 256] {
    let mut table = [Z::const_new(0); 256];
    let mut power = 1u32;
    let mut n = 0u32;
    while n < 256 {
        table[(n as u8).reverse_bits() as usize] = Z::const_new(power as u16);
        power = (power * ZETA) % Q;
        n += 1;
    }
    table
}

static ZETA_TABLE: [Z; 256] = gen_zeta_table();


#[cfg(test)]
mod tests {
    use super::{gen_zeta_table, multiply_ntts, ntt, ntt_inv};
    use crate::types::Z;
    use crate::Q;
    use rand::{Rng, SeedableRng};

    fn random_poly(rng: &mut impl Rng) -> [Z; 256] {
        core::array::from_fn(|_| {
            let mut c = Z::default();
            c.set_u16(rng.gen_range(0..Q as u16));
            c
        })
    }

    // O(256^2) reference product in Z_q[X]/(X^256 + 1)
    fn schoolbook_negacyclic(a: &[Z; 256], b: &[Z; 256]) -> [Z; 256] {
        let mut out = [Z::default(); 256];
        for i in 0..256 {
            for j in 0..256 {
                let prod = a[i].mul(b[j]);
                let k = (i + j) % 256;
                if i + j < 256 {
                    out[k] = out[k].add(prod);
                } else {
                    out[k] = out[k].sub(prod); // X^256 = -1
                }
            }
        }
        out
    }

    #[test]
    fn test_zeta_table_spot_values() {
        let table = gen_zeta_table();
        assert_eq!(table[0].get_u16(), 1); // ζ^0
        assert_eq!(table[4].get_u16(), 2580); // ζ^32
    }

    #[test]
    fn test_round_trip() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(123);
        for _i in 0..50 {
            let f = random_poly(&mut rng);
            let back = ntt_inv(&ntt(&f));
            for j in 0..256 {
                assert_eq!(f[j].get_u16(), back[j].get_u16());
            }
        }
    }

    #[test]
    fn test_pointwise_matches_schoolbook() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(456);
        for _i in 0..5 {
            let a = random_poly(&mut rng);
            let b = random_poly(&mut rng);
            let via_ntt = ntt_inv(&multiply_ntts(&ntt(&a), &ntt(&b)));
            let reference = schoolbook_negacyclic(&a, &b);
            for j in 0..256 {
                assert_eq!(via_ntt[j].get_u16(), reference[j].get_u16());
            }
        }
    }
}
