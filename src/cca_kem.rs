use crate::hashes::{g, h, kdf};
use crate::ind_cpa::{cpa_decrypt, cpa_encrypt, cpa_key_gen};
use crate::SharedSecretKdf;
use subtle::{ConditionallySelectable, ConstantTimeEq};

// The Fujisaki-Okamoto wrapper (Kyber.CCAKEM, algorithms 7, 8 and 9 of the
// round-3 Kyber specification). Decapsulation never reports failure: a
// forged ciphertext yields a pseudorandom stream keyed by the rejection
// secret z.


/// `CCAKEM.KeyGen(d, z)`: runs the CPA key generation and appends the
/// material implicit rejection needs later.
///
/// * `pk` - output, `ek_pke` (384·K+32 bytes)
/// * `sk` - output, `dk_pke ‖ pk ‖ H(pk) ‖ z` (768·K+96 bytes)
pub(crate) fn kem_key_gen<const K: usize, const ETA1_64: usize>(
    d: &[u8; 32], z: &[u8; 32], pk: &mut [u8], sk: &mut [u8],
) {
    debug_assert_eq!(pk.len(), 384 * K + 32, "kem keygen: pk len not 384 * K + 32");
    debug_assert_eq!(sk.len(), 768 * K + 96, "kem keygen: sk len not 768 * K + 96");

    let p1 = 384 * K;
    cpa_key_gen::<K, ETA1_64>(d, pk, &mut sk[..p1]);

    let h_pk = h(pk);
    let p2 = p1 + pk.len();
    let p3 = p2 + h_pk.len();
    sk[p1..p2].copy_from_slice(pk);
    sk[p2..p3].copy_from_slice(&h_pk);
    sk[p3..].copy_from_slice(z);
}


/// `CCAKEM.Enc(pk, m)`: hashes the caller's 32 random bytes before use, binds
/// the encryption coins to message and key, and returns the shared-secret
/// stream `SHAKE-256(K_bar ‖ H(c))`.
pub(crate) fn kem_encaps<const K: usize, const ETA1_64: usize, const ETA2_64: usize>(
    du: u32, dv: u32, m: &[u8; 32], pk: &[u8], ct: &mut [u8],
) -> Result<SharedSecretKdf, &'static str> {
    debug_assert_eq!(pk.len(), 384 * K + 32, "kem encaps: pk len not 384 * K + 32");
    debug_assert_eq!(
        ct.len(),
        32 * (du as usize * K + dv as usize),
        "kem encaps: ct len not 32 * (du * K + dv)"
    );

    // m is hashed so the shared secret never depends directly on raw RNG output
    let m_hashed = h(m);

    // (K_bar, r) <- G(H(m) ‖ H(pk))
    let h_pk = h(pk);
    let (k_bar, r) = g(&[&m_hashed, &h_pk]);

    cpa_encrypt::<K, ETA1_64, ETA2_64>(du, dv, pk, &m_hashed, &r, ct)?;

    Ok(SharedSecretKdf(kdf(&k_bar, &h(ct))))
}


/// `CCAKEM.Dec(sk, c)`: decrypt, re-derive the coins, re-encrypt, and select
/// the KDF pre-image between `K_bar'` and `z` with a byte-wise constant-time
/// conditional keyed by the ciphertext comparison. The SHAKE state is
/// initialized identically on both paths.
#[allow(clippy::similar_names)]
pub(crate) fn kem_decaps<
    const K: usize,
    const ETA1_64: usize,
    const ETA2_64: usize,
    const CT_LEN: usize,
>(
    du: u32, dv: u32, sk: &[u8], ct: &[u8; CT_LEN],
) -> Result<SharedSecretKdf, &'static str> {
    debug_assert_eq!(sk.len(), 768 * K + 96, "kem decaps: sk len not 768 * K + 96");
    debug_assert_eq!(
        ct.len(),
        32 * (du as usize * K + dv as usize),
        "kem decaps: ct len not 32 * (du * K + dv)"
    );

    // sk = dk_pke ‖ pk ‖ H(pk) ‖ z
    let dk_pke = &sk[0..384 * K];
    let pk = &sk[384 * K..768 * K + 32];
    let h_pk = &sk[768 * K + 32..768 * K + 64];
    let mut z = [0u8; 32];
    z.copy_from_slice(&sk[768 * K + 64..768 * K + 96]);

    let m_prime = cpa_decrypt::<K>(du, dv, dk_pke, ct)?;

    // (K_bar', r') <- G(m' ‖ H(pk)), then deterministic re-encryption
    let (k_bar_prime, r_prime) = g(&[&m_prime, h_pk]);
    let mut ct_prime = [0u8; CT_LEN];
    cpa_encrypt::<K, ETA1_64, ETA2_64>(du, dv, pk, &m_prime, &r_prime, &mut ct_prime)?;

    // Implicit rejection: swap in z iff the ciphertexts differ. The compare
    // OR-accumulates over the full length and the select is byte-wise.
    let mut precursor = k_bar_prime;
    precursor.conditional_assign(&z, ct.as_ref().ct_ne(&ct_prime));

    Ok(SharedSecretKdf(kdf(&precursor, &h(ct))))
}


#[cfg(test)]
mod tests {
    use super::{kem_decaps, kem_encaps, kem_key_gen};

    // Kyber512-sized constants
    const K: usize = 2;
    const ETA1_64: usize = 3 * 64;
    const ETA2_64: usize = 2 * 64;
    const DU: u32 = 10;
    const DV: u32 = 4;
    const PK_LEN: usize = 800;
    const SK_LEN: usize = 1632;
    const CT_LEN: usize = 768;

    #[test]
    fn test_encaps_decaps_agree() {
        let (d, z, m) = ([11u8; 32], [22u8; 32], [33u8; 32]);
        let mut pk = [0u8; PK_LEN];
        let mut sk = [0u8; SK_LEN];
        kem_key_gen::<K, ETA1_64>(&d, &z, &mut pk, &mut sk);

        let mut ct = [0u8; CT_LEN];
        let mut sender = kem_encaps::<K, ETA1_64, ETA2_64>(DU, DV, &m, &pk, &mut ct).unwrap();
        let mut receiver = kem_decaps::<K, ETA1_64, ETA2_64, CT_LEN>(DU, DV, &sk, &ct).unwrap();

        let mut ss_s = [0u8; 32];
        let mut ss_r = [0u8; 32];
        sender.squeeze(&mut ss_s);
        receiver.squeeze(&mut ss_r);
        assert_eq!(ss_s, ss_r);
    }

    #[test]
    fn test_tampered_ciphertext_rejects() {
        let (d, z, m) = ([1u8; 32], [2u8; 32], [3u8; 32]);
        let mut pk = [0u8; PK_LEN];
        let mut sk = [0u8; SK_LEN];
        kem_key_gen::<K, ETA1_64>(&d, &z, &mut pk, &mut sk);

        let mut ct = [0u8; CT_LEN];
        let mut sender = kem_encaps::<K, ETA1_64, ETA2_64>(DU, DV, &m, &pk, &mut ct).unwrap();
        let mut ss_s = [0u8; 32];
        sender.squeeze(&mut ss_s);

        ct[5] ^= 0x40;
        let mut receiver = kem_decaps::<K, ETA1_64, ETA2_64, CT_LEN>(DU, DV, &sk, &ct).unwrap();
        let mut ss_r = [0u8; 32];
        receiver.squeeze(&mut ss_r);
        assert_ne!(ss_s, ss_r);
    }
}
