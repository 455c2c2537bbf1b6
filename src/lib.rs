#![no_std]
#![deny(clippy::pedantic)]
#![deny(warnings)]
#![deny(missing_docs)]
#![doc = include_str!("../README.md")]


///
/// Implements the round-3 CRYSTALS-Kyber IND-CCA2-secure key encapsulation
/// mechanism over Z_3329[X]/(X^256+1) at the three NIST security levels.
/// See <https://pq-crystals.org/kyber/data/kyber-specification-round3-20210804.pdf>
//
// Supports automatically clearing sensitive data on drop
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::traits::SerDes;
use sha3::digest::XofReader;
use sha3::Shake256Reader;

// Functionality map per the round-3 Kyber specification
//
// Algorithm 1 Parse                        --> sampling.rs
// Algorithm 2 CBD_eta                      --> sampling.rs
// Algorithm 3 Decode_l (and Encode_l)      --> byte_fns.rs
// Algorithm 4 CPAPKE.KeyGen                --> ind_cpa.rs
// Algorithm 5 CPAPKE.Enc                   --> ind_cpa.rs
// Algorithm 6 CPAPKE.Dec                   --> ind_cpa.rs
// Algorithm 7 CCAKEM.KeyGen                --> cca_kem.rs
// Algorithm 8 CCAKEM.Enc                   --> cca_kem.rs
// Algorithm 9 CCAKEM.Dec                   --> cca_kem.rs
// NTT, NTT^-1 and the basecase products    --> ntt.rs
// XOF, PRF, H, G and the output KDF        --> hashes.rs
// Compress_d and Decompress_d              --> helpers.rs
//
// The three parameter sets are modules in this file with injected macro code
// that connects them into the functionality in cca_kem.rs.

mod byte_fns;
mod cca_kem;
mod hashes;
mod helpers;
mod ind_cpa;
mod ntt;
mod sampling;
mod types;

/// All functionality is covered by traits, such that consumers can utilize trait objects as desired.
pub mod traits;

// Relevant to all parameter sets
const _N: u32 = 256;
const Q: u32 = 3329;
const ZETA: u32 = 17;

/// Shared secret length in bytes, common to all parameter sets.
pub const SSK_LEN: usize = 32;


/// The 32-byte shared secret agreed by both parties.
#[derive(Clone, Debug, Zeroize, ZeroizeOnDrop)]
pub struct SharedSecretKey([u8; SSK_LEN]);

impl SerDes for SharedSecretKey {
    type ByteArray = [u8; SSK_LEN];

    fn into_bytes(self) -> Self::ByteArray { self.0 }

    fn try_from_bytes(ssk: Self::ByteArray) -> Result<Self, &'static str> {
        // No opportunity for validation, but using a Result for a future possibility
        Ok(SharedSecretKey(ssk))
    }
}

// Conservative (constant-time) paranoia...
impl PartialEq for SharedSecretKey {
    fn eq(&self, other: &Self) -> bool {
        let mut result = true;
        for i in 0..self.0.len() {
            result &= self.0[i] == other.0[i];
        }
        result
    }
}


/// The finalized SHAKE-256 stream produced by encapsulation and
/// decapsulation. The first 32 bytes are the shared secret; callers needing
/// more key material keep squeezing and both sides obtain the same stream.
/// The entire sponge state is around 200 bytes, so the handle copies cheaply.
#[derive(Clone)]
pub struct SharedSecretKdf(pub(crate) Shake256Reader);

impl SharedSecretKdf {
    /// Squeezes the next `out.len()` bytes of the stream into `out`.
    pub fn squeeze(&mut self, out: &mut [u8]) { self.0.read(out); }

    /// Reads the next 32 bytes of the stream as a `SharedSecretKey`.
    /// On a fresh handle this is *the* shared secret.
    #[must_use]
    pub fn shared_secret(&mut self) -> SharedSecretKey {
        let mut ssk = [0u8; SSK_LEN];
        self.0.read(&mut ssk);
        SharedSecretKey(ssk)
    }
}


// This common functionality is injected into each parameter set module
macro_rules! functionality {
    () => {
        const ETA1_64: usize = ETA1 as usize * 64; // Currently, Rust does not allow expressions involving constants...
        const ETA2_64: usize = ETA2 as usize * 64; // ...in generics, so these are handled manually.

        use crate::byte_fns::byte_decode;
        use crate::cca_kem::{kem_decaps, kem_encaps, kem_key_gen};
        use crate::hashes::h;
        use crate::traits::{Decaps, Encaps, KeyGen, SerDes};
        use crate::SharedSecretKdf;
        use rand_core::CryptoRngCore;
        use zeroize::{Zeroize, ZeroizeOnDrop};

        /// Correctly sized public (encapsulation) key for this parameter set.
        #[derive(Clone, Zeroize, ZeroizeOnDrop)]
        pub struct PublicKey([u8; PK_LEN]);

        /// Correctly sized secret (decapsulation) key for this parameter set.
        #[derive(Clone, Zeroize, ZeroizeOnDrop)]
        pub struct SecretKey([u8; SK_LEN]);

        /// Correctly sized ciphertext for this parameter set.
        #[derive(Clone, Zeroize, ZeroizeOnDrop)]
        pub struct CipherText([u8; CT_LEN]);

        /// Key generation entry point for this parameter set; the output
        /// structs are opaque and serialize via `SerDes`.
        pub struct KG();

        impl KeyGen for KG {
            type PublicByteArray = [u8; PK_LEN];
            type PublicKey = PublicKey;
            type SecretByteArray = [u8; SK_LEN];
            type SecretKey = SecretKey;

            fn try_keygen_with_rng(
                rng: &mut impl CryptoRngCore,
            ) -> Result<(PublicKey, SecretKey), &'static str> {
                let mut d = [0u8; 32];
                rng.try_fill_bytes(&mut d).map_err(|_| "keygen: rng failed for d seed")?;
                let mut z = [0u8; 32];
                rng.try_fill_bytes(&mut z).map_err(|_| "keygen: rng failed for z seed")?;
                Ok(Self::keygen_from_seed(d, z))
            }

            fn keygen_from_seed(d: [u8; 32], z: [u8; 32]) -> (PublicKey, SecretKey) {
                let (mut pk, mut sk) = ([0u8; PK_LEN], [0u8; SK_LEN]);
                kem_key_gen::<K, ETA1_64>(&d, &z, &mut pk, &mut sk);
                (PublicKey(pk), SecretKey(sk))
            }

            fn validate_keypair_vartime(pk: &Self::PublicByteArray, sk: &Self::SecretByteArray) -> bool {
                let p1 = 384 * K;
                let p2 = p1 + PK_LEN;
                let same_pk = *pk == sk[p1..p2];
                let same_h = h(pk) == sk[p2..p2 + 32];
                same_pk & same_h
            }
        }

        impl Encaps for PublicKey {
            type CipherText = CipherText;
            type SharedSecretKdf = SharedSecretKdf;

            fn try_encaps_with_rng(
                &self, rng: &mut impl CryptoRngCore,
            ) -> Result<(SharedSecretKdf, CipherText), &'static str> {
                let mut m = [0u8; 32];
                rng.try_fill_bytes(&mut m).map_err(|_| "encaps: rng failed for message")?;
                let mut ct = [0u8; CT_LEN];
                let kdf = kem_encaps::<K, ETA1_64, ETA2_64>(DU, DV, &m, &self.0, &mut ct)?;
                Ok((kdf, CipherText(ct)))
            }

            fn encaps_from_seed(&self, m: &[u8; 32]) -> (SharedSecretKdf, CipherText) {
                let mut ct = [0u8; CT_LEN];
                // a key held in this struct was validated at construction
                let kdf = kem_encaps::<K, ETA1_64, ETA2_64>(DU, DV, m, &self.0, &mut ct)
                    .expect("validated public key cannot fail encryption");
                (kdf, CipherText(ct))
            }
        }

        impl Decaps for SecretKey {
            type CipherText = CipherText;
            type SharedSecretKdf = SharedSecretKdf;

            fn try_decaps(&self, ct: &CipherText) -> Result<SharedSecretKdf, &'static str> {
                kem_decaps::<K, ETA1_64, ETA2_64, CT_LEN>(DU, DV, &self.0, &ct.0)
            }
        }

        impl SerDes for PublicKey {
            type ByteArray = [u8; PK_LEN];

            fn into_bytes(self) -> Self::ByteArray { self.0 }

            fn try_from_bytes(pk: Self::ByteArray) -> Result<Self, &'static str> {
                // The t_hat coefficients must decode canonically; taking a
                // fixed-size array settles the length check statically.
                for i in 0..K {
                    let _t_hat = byte_decode(12, &pk[384 * i..384 * (i + 1)])?;
                }
                Ok(PublicKey(pk))
            }
        }

        impl SerDes for SecretKey {
            type ByteArray = [u8; SK_LEN];

            fn into_bytes(self) -> Self::ByteArray { self.0 }

            fn try_from_bytes(sk: Self::ByteArray) -> Result<Self, &'static str> {
                // s_hat and the embedded public key must decode canonically,
                // and the embedded H(pk) must match the embedded pk.
                for i in 0..2 * K {
                    let _s_hat = byte_decode(12, &sk[384 * i..384 * (i + 1)])?;
                }
                let p1 = 384 * K;
                let p2 = p1 + PK_LEN;
                if h(&sk[p1..p2]) != sk[p2..p2 + 32] {
                    return Err("secret key: embedded public key hash mismatch");
                }
                Ok(SecretKey(sk))
            }
        }

        impl SerDes for CipherText {
            type ByteArray = [u8; CT_LEN];

            fn into_bytes(self) -> Self::ByteArray { self.0 }

            fn try_from_bytes(ct: Self::ByteArray) -> Result<Self, &'static str> {
                // Only the (static) size constrains a ciphertext; a Result is
                // kept for symmetry and future validation opportunities.
                Ok(CipherText(ct))
            }
        }
    };
}


/// Functionality for the Kyber512 parameter set (NIST security category 1).
#[cfg(feature = "kyber-512")]
pub mod kyber_512 {
    //! Typical usage flow:
    //! 1. The originator runs `KG::try_keygen()` and sends the serialized public key out-of-band.
    //! 2. The remote party deserializes it, runs `try_encaps()`, and obtains the KDF stream plus a ciphertext.
    //! 3. The ciphertext travels back over any channel; the originator runs `try_decaps(ct)`.
    //! 4. Both sides squeeze the same stream; the first 32 bytes are the shared secret.

    const K: usize = 2;
    const ETA1: u32 = 3;
    const ETA2: u32 = 2;
    const DU: u32 = 10;
    const DV: u32 = 4;

    /// Serialized public key length in bytes.
    pub const PK_LEN: usize = 800;
    /// Serialized secret key length in bytes.
    pub const SK_LEN: usize = 1632;
    /// Serialized ciphertext length in bytes.
    pub const CT_LEN: usize = 768;

    functionality!();
}


/// Functionality for the Kyber768 parameter set (NIST security category 3).
#[cfg(feature = "kyber-768")]
pub mod kyber_768 {
    //! Typical usage flow:
    //! 1. The originator runs `KG::try_keygen()` and sends the serialized public key out-of-band.
    //! 2. The remote party deserializes it, runs `try_encaps()`, and obtains the KDF stream plus a ciphertext.
    //! 3. The ciphertext travels back over any channel; the originator runs `try_decaps(ct)`.
    //! 4. Both sides squeeze the same stream; the first 32 bytes are the shared secret.

    const K: usize = 3;
    const ETA1: u32 = 2;
    const ETA2: u32 = 2;
    const DU: u32 = 10;
    const DV: u32 = 4;

    /// Serialized public key length in bytes.
    pub const PK_LEN: usize = 1184;
    /// Serialized secret key length in bytes.
    pub const SK_LEN: usize = 2400;
    /// Serialized ciphertext length in bytes.
    pub const CT_LEN: usize = 1088;

    functionality!();
}


/// Functionality for the Kyber1024 parameter set (NIST security category 5).
#[cfg(feature = "kyber-1024")]
pub mod kyber_1024 {
    //! Typical usage flow:
    //! 1. The originator runs `KG::try_keygen()` and sends the serialized public key out-of-band.
    //! 2. The remote party deserializes it, runs `try_encaps()`, and obtains the KDF stream plus a ciphertext.
    //! 3. The ciphertext travels back over any channel; the originator runs `try_decaps(ct)`.
    //! 4. Both sides squeeze the same stream; the first 32 bytes are the shared secret.

    const K: usize = 4;
    const ETA1: u32 = 2;
    const ETA2: u32 = 2;
    const DU: u32 = 11;
    const DV: u32 = 5;

    /// Serialized public key length in bytes.
    pub const PK_LEN: usize = 1568;
    /// Serialized secret key length in bytes.
    pub const SK_LEN: usize = 3168;
    /// Serialized ciphertext length in bytes.
    pub const CT_LEN: usize = 1568;

    functionality!();
}
