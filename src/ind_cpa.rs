use crate::byte_fns::{byte_decode, byte_encode};
use crate::hashes::{g, prf, xof};
use crate::helpers::{
    add_vecs, compress_vector, decompress_vector, dot_t_prod, mul_mat_t_vec, mul_mat_vec,
};
use crate::ntt::{ntt, ntt_inv};
use crate::sampling::{sample_cbd, sample_uniform};
use crate::types::Z;

// The IND-CPA public-key encryption layer (Kyber.CPAPKE, algorithms 4, 5
// and 6 of the round-3 Kyber specification). The CCA wrapper in cca_kem.rs
// never touches ring arithmetic directly; everything module-LWE happens here.


/// `CPAPKE.KeyGen(d)`: expands the 32-byte seed into the module-LWE key pair
/// `t_hat = A_hat ∘ s_hat + e_hat`.
///
/// * `d` - 32-byte key generation seed
/// * `ek_pke` - output encryption key, `ByteEncode_12(t_hat) ‖ rho` (384·K+32 bytes)
/// * `dk_pke` - output decryption key, `ByteEncode_12(s_hat)` (384·K bytes)
#[allow(clippy::similar_names)]
pub(crate) fn cpa_key_gen<const K: usize, const ETA1_64: usize>(
    d: &[u8; 32], ek_pke: &mut [u8], dk_pke: &mut [u8],
) {
    debug_assert_eq!(ek_pke.len(), 384 * K + 32, "cpa keygen: ek len not 384 * K + 32");
    debug_assert_eq!(dk_pke.len(), 384 * K, "cpa keygen: dk len not 384 * K");

    // (rho, sigma) <- G(d ‖ k); the module dimension is appended as a single
    // byte so the three parameter sets derive unrelated seed pairs
    let mut salted = [0u8; 33];
    salted[0..32].copy_from_slice(d);
    salted[32] = K.to_le_bytes()[0];
    let (rho, sigma) = g(&[&salted]);

    let a_hat = expand_matrix(&rho);

    // s and e are CBD_eta1 draws over PRF(sigma, N) with N = 0..2k-1
    let mut n = 0;
    let s: [[Z; 256]; K] = core::array::from_fn(|_| {
        let poly = sample_cbd(&prf::<ETA1_64>(&sigma, n));
        n += 1;
        poly
    });
    let e: [[Z; 256]; K] = core::array::from_fn(|_| {
        let poly = sample_cbd(&prf::<ETA1_64>(&sigma, n));
        n += 1;
        poly
    });

    let s_hat: [[Z; 256]; K] = core::array::from_fn(|i| ntt(&s[i]));
    let e_hat: [[Z; 256]; K] = core::array::from_fn(|i| ntt(&e[i]));

    // t_hat = A_hat ∘ s_hat + e_hat
    let t_hat = add_vecs(&mul_mat_vec(&a_hat, &s_hat), &e_hat);

    for (i, chunk) in ek_pke.chunks_mut(384).enumerate().take(K) {
        byte_encode(12, &t_hat[i], chunk);
    }
    ek_pke[384 * K..].copy_from_slice(&rho);

    for (i, chunk) in dk_pke.chunks_mut(384).enumerate() {
        byte_encode(12, &s_hat[i], chunk);
    }
}


/// Rebuilds `A_hat[i][j] = Parse(XOF(rho ‖ j ‖ i))`, deterministic in
/// (rho, i, j) and always in NTT domain. Shared by key generation,
/// encryption and the re-encryption inside decapsulation, which regenerates
/// the matrix rather than caching it.
fn expand_matrix<const K: usize>(rho: &[u8; 32]) -> [[[Z; 256]; K]; K] {
    core::array::from_fn(|i| {
        core::array::from_fn(|j| sample_uniform(xof(rho, j.to_le_bytes()[0], i.to_le_bytes()[0])))
    })
}


/// `CPAPKE.Enc(ek_pke, m, r)`: encrypts the 32-byte message under the coins
/// `r`, producing `c1 = Compress_du(u)` and `c2 = Compress_dv(v)`.
///
/// Fails only when `ek_pke` carries non-canonical coefficients, which the
/// public-key deserializer already screens for.
#[allow(clippy::many_single_char_names)]
pub(crate) fn cpa_encrypt<const K: usize, const ETA1_64: usize, const ETA2_64: usize>(
    du: u32, dv: u32, ek_pke: &[u8], m: &[u8; 32], r: &[u8; 32], ct: &mut [u8],
) -> Result<(), &'static str> {
    debug_assert_eq!(ek_pke.len(), 384 * K + 32, "cpa encrypt: ek len not 384 * K + 32");
    debug_assert_eq!(
        ct.len(),
        32 * (du as usize * K + dv as usize),
        "cpa encrypt: ct len not 32 * (du * K + dv)"
    );

    let mut t_hat = [[Z::default(); 256]; K];
    for (i, chunk) in ek_pke.chunks(384).enumerate().take(K) {
        t_hat[i] = byte_decode(12, chunk)?;
    }
    let mut rho = [0u8; 32];
    rho.copy_from_slice(&ek_pke[384 * K..384 * K + 32]);

    let a_hat = expand_matrix::<K>(&rho);

    // y is CBD_eta1 over PRF(r, 0..k-1); e1, e2 are CBD_eta2 with the nonce
    // counter continuing through k..2k
    let mut n = 0;
    let y: [[Z; 256]; K] = core::array::from_fn(|_| {
        let poly = sample_cbd(&prf::<ETA1_64>(r, n));
        n += 1;
        poly
    });
    let e1: [[Z; 256]; K] = core::array::from_fn(|_| {
        let poly = sample_cbd(&prf::<ETA2_64>(r, n));
        n += 1;
        poly
    });
    let e2 = sample_cbd(&prf::<ETA2_64>(r, n));

    let y_hat: [[Z; 256]; K] = core::array::from_fn(|i| ntt(&y[i]));

    // u = NTT^{-1}(A_hat^T ∘ y_hat) + e1
    let mut u = mul_mat_t_vec(&a_hat, &y_hat);
    for u_i in &mut u {
        *u_i = ntt_inv(u_i);
    }
    u = add_vecs(&u, &e1);

    // v = NTT^{-1}(t_hat^T ∘ y_hat) + e2 + Decompress_1(ByteDecode_1(m))
    let mut mu = byte_decode(1, m)?;
    decompress_vector(1, &mut mu);
    let mut v = ntt_inv(&dot_t_prod(&t_hat, &y_hat));
    v = add_vecs(&add_vecs(&[v], &[e2]), &[mu])[0];

    let step = 32 * du as usize;
    for (i, chunk) in ct.chunks_mut(step).enumerate().take(K) {
        compress_vector(du, &mut u[i]);
        byte_encode(du, &u[i], chunk);
    }
    compress_vector(dv, &mut v);
    byte_encode(dv, &v, &mut ct[K * step..]);

    Ok(())
}


/// `CPAPKE.Dec(dk_pke, c)`: recovers `m` as
/// `Compress_1(v' - NTT^{-1}(s_hat^T ∘ NTT(u')))`. Total for any input of
/// the declared sizes; the secret-dependent arithmetic is branch-free.
pub(crate) fn cpa_decrypt<const K: usize>(
    du: u32, dv: u32, dk_pke: &[u8], ct: &[u8],
) -> Result<[u8; 32], &'static str> {
    debug_assert_eq!(dk_pke.len(), 384 * K, "cpa decrypt: dk len not 384 * K");
    debug_assert_eq!(
        ct.len(),
        32 * (du as usize * K + dv as usize),
        "cpa decrypt: ct len not 32 * (du * K + dv)"
    );

    let c1 = &ct[0..32 * du as usize * K];
    let c2 = &ct[32 * du as usize * K..];

    let mut u = [[Z::default(); 256]; K];
    for (i, chunk) in c1.chunks(32 * du as usize).enumerate().take(K) {
        u[i] = byte_decode(du, chunk)?;
        decompress_vector(du, &mut u[i]);
    }
    let mut v = byte_decode(dv, c2)?;
    decompress_vector(dv, &mut v);

    let mut s_hat = [[Z::default(); 256]; K];
    for (i, chunk) in dk_pke.chunks(384).enumerate() {
        s_hat[i] = byte_decode(12, chunk)?;
    }

    let u_hat: [[Z; 256]; K] = core::array::from_fn(|i| ntt(&u[i]));
    let su = ntt_inv(&dot_t_prod(&s_hat, &u_hat));
    let mut w = [Z::default(); 256];
    for i in 0..256 {
        w[i] = v[i].sub(su[i]);
    }

    compress_vector(1, &mut w);
    let mut m = [0u8; 32];
    byte_encode(1, &w, &mut m);
    Ok(m)
}


#[cfg(test)]
mod tests {
    use super::{cpa_decrypt, cpa_encrypt, cpa_key_gen};
    use rand_core::{RngCore, SeedableRng};

    macro_rules! round_trip_test {
        ($name:ident, $k:literal, $eta1:literal, $du:literal, $dv:literal, $seed:literal) => {
            #[test]
            fn $name() {
                const ETA1_64: usize = $eta1 * 64;
                const ETA2_64: usize = 2 * 64;
                const EK_LEN: usize = 384 * $k + 32;
                const CT_LEN: usize = 32 * ($du * $k + $dv);

                let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64($seed);
                for _i in 0..25 {
                    let mut d = [0u8; 32];
                    let mut m = [0u8; 32];
                    let mut r = [0u8; 32];
                    rng.fill_bytes(&mut d);
                    rng.fill_bytes(&mut m);
                    rng.fill_bytes(&mut r);

                    let mut ek = [0u8; EK_LEN];
                    let mut dk = [0u8; 384 * $k];
                    cpa_key_gen::<$k, ETA1_64>(&d, &mut ek, &mut dk);

                    let mut ct = [0u8; CT_LEN];
                    cpa_encrypt::<$k, ETA1_64, ETA2_64>($du, $dv, &ek, &m, &r, &mut ct).unwrap();
                    let m2 = cpa_decrypt::<$k>($du, $dv, &dk, &ct).unwrap();
                    assert_eq!(m, m2);
                }
            }
        };
    }

    round_trip_test!(test_round_trip_k2, 2, 3, 10, 4, 123);
    round_trip_test!(test_round_trip_k3, 3, 2, 10, 4, 456);
    round_trip_test!(test_round_trip_k4, 4, 2, 11, 5, 789);

    #[test]
    fn test_encrypt_rejects_non_canonical_key() {
        let ff_ek = [0xFFu8; 800];
        let mut ct = [0u8; 768];
        let res =
            cpa_encrypt::<2, 192, 128>(10, 4, &ff_ek, &[0u8; 32], &[0u8; 32], &mut ct);
        assert!(res.is_err());
    }

    #[test]
    fn test_keygen_deterministic() {
        let d = [5u8; 32];
        let mut ek1 = [0u8; 800];
        let mut dk1 = [0u8; 768];
        let mut ek2 = [0u8; 800];
        let mut dk2 = [0u8; 768];
        cpa_key_gen::<2, 192>(&d, &mut ek1, &mut dk1);
        cpa_key_gen::<2, 192>(&d, &mut ek2, &mut dk2);
        assert_eq!(ek1, ek2);
        assert_eq!(dk1, dk2);
    }
}
