use kyber_kem::traits::{Decaps, Encaps, KeyGen, SerDes};
use kyber_kem::{kyber_1024, kyber_512, kyber_768};
use rand_chacha::rand_core::SeedableRng;
use rand_core::RngCore;
use sha3::digest::{ExtendableOutput, Update, XofReader};
use sha3::{Digest, Sha3_256, Shake256};


// The stream a tampered ciphertext must map to: SHAKE-256(z || SHA3-256(ct))
fn rejection_secret(z: &[u8], ct: &[u8]) -> [u8; 32] {
    let mut h = Sha3_256::new();
    Digest::update(&mut h, ct);
    let ct_hash = h.finalize();

    let mut shake = Shake256::default();
    shake.update(z);
    shake.update(&ct_hash);
    let mut out = [0u8; 32];
    shake.finalize_xof().read(&mut out);
    out
}


macro_rules! rejection_test {
    ($name:ident, $param:ident, $seed:literal) => {
        #[test]
        fn $name() {
            let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64($seed);
            for _i in 0..10 {
                let mut d = [0u8; 32];
                let mut z = [0u8; 32];
                let mut m = [0u8; 32];
                rng.fill_bytes(&mut d);
                rng.fill_bytes(&mut z);
                rng.fill_bytes(&mut m);

                let (pk, sk) = $param::KG::keygen_from_seed(d, z);
                let (mut sender_kdf, ct) = pk.encaps_from_seed(&m);
                let ss_good = sender_kdf.shared_secret().into_bytes();

                // flip one byte anywhere in the ciphertext
                let mut ct_bytes = ct.into_bytes();
                let pos = (rng.next_u32() as usize) % ct_bytes.len();
                ct_bytes[pos] ^= 1 << (rng.next_u32() % 8);

                let tampered = $param::CipherText::try_from_bytes(ct_bytes).unwrap();
                let mut receiver_kdf = sk.try_decaps(&tampered).unwrap();
                let ss_reject = receiver_kdf.shared_secret().into_bytes();

                // never the real secret, always the z-keyed pseudorandom value
                assert_ne!(ss_reject, ss_good);
                assert_eq!(ss_reject, rejection_secret(&z, &ct_bytes));
            }
        }
    };
}

rejection_test!(test_implicit_rejection_512, kyber_512, 11);
rejection_test!(test_implicit_rejection_768, kyber_768, 22);
rejection_test!(test_implicit_rejection_1024, kyber_1024, 33);
