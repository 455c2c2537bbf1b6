use kyber_kem::kyber_512;
use kyber_kem::traits::{KeyGen, SerDes};
use rand_chacha::rand_core::SeedableRng;
use rand_core::RngCore;

// Highlights the validation performed at the deserialization boundaries
#[test]
fn fails_512() {
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(123);
    for _i in 0..100 {
        let mut bad_pk_bytes = [0u8; kyber_512::PK_LEN];
        rng.fill_bytes(&mut bad_pk_bytes);
        let bad_pk = kyber_512::PublicKey::try_from_bytes(bad_pk_bytes);
        // 512 random 12-bit coefficients essentially never all land below q
        assert!(bad_pk.is_err());

        let mut bad_sk_bytes = [0u8; kyber_512::SK_LEN];
        rng.fill_bytes(&mut bad_sk_bytes);
        let bad_sk = kyber_512::SecretKey::try_from_bytes(bad_sk_bytes);
        // random bytes also fail the embedded H(pk) consistency check
        assert!(bad_sk.is_err());

        let mut bad_ct_bytes = [0u8; kyber_512::CT_LEN];
        rng.fill_bytes(&mut bad_ct_bytes);
        let bad_ct = kyber_512::CipherText::try_from_bytes(bad_ct_bytes);
        // only size constrains a ciphertext; decapsulating one is implicit rejection's job
        assert!(bad_ct.is_ok());

        // non-corresponding serialized keypairs are flagged
        assert!(!kyber_512::KG::validate_keypair_vartime(&bad_pk_bytes, &bad_sk_bytes));
    }
}
