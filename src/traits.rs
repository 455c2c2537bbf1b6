use rand_core::CryptoRngCore;

#[cfg(feature = "default-rng")]
use rand_core::OsRng;


/// The `KeyGen` trait is defined to allow trait objects.
pub trait KeyGen {
    /// The (public) encapsulation key sent from the originator to the remote party.
    type PublicKey;
    /// The (private) decapsulation key retained by the originator.
    type SecretKey;
    /// A serialized public key byte array of the correct length.
    type PublicByteArray;
    /// A serialized secret key byte array of the correct length.
    type SecretByteArray;

    /// Generates a public and secret key pair specific to this security
    /// parameter set, drawing the `d` and `z` seeds from the OS default
    /// random number generator.
    ///
    /// # Errors
    /// Returns an error if the random number generator fails.
    ///
    /// # Examples
    /// ```rust
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// # #[cfg(all(feature = "kyber-768", feature = "default-rng"))] {
    /// use kyber_kem::kyber_768; // Could also be kyber_512 or kyber_1024.
    /// use kyber_kem::traits::{Decaps, Encaps, KeyGen, SerDes};
    ///
    /// let (alice_pk, alice_sk) = kyber_768::KG::try_keygen()?; // Alice generates her keypair
    /// let pk_bytes = alice_pk.into_bytes(); // Alice sends the public key bytes to Bob
    ///
    /// let bob_pk = kyber_768::PublicKey::try_from_bytes(pk_bytes)?; // Bob deserializes
    /// let (mut bob_kdf, ct) = bob_pk.try_encaps()?; // Bob gets his KDF stream and a ciphertext
    /// let ct_bytes = ct.into_bytes(); // Bob sends the ciphertext bytes to Alice
    ///
    /// let alice_ct = kyber_768::CipherText::try_from_bytes(ct_bytes)?; // Alice deserializes
    /// let mut alice_kdf = alice_sk.try_decaps(&alice_ct)?; // Alice runs decaps for her stream
    ///
    /// assert_eq!(bob_kdf.shared_secret(), alice_kdf.shared_secret()); // Same shared secret
    /// # }
    /// # Ok(())}
    /// ```
    #[cfg(feature = "default-rng")]
    fn try_keygen() -> Result<(Self::PublicKey, Self::SecretKey), &'static str> {
        Self::try_keygen_with_rng(&mut OsRng)
    }

    /// Generates a key pair using the provided random number generator to
    /// draw the `d` and `z` seeds (in that order).
    ///
    /// # Errors
    /// Returns an error if the random number generator fails.
    ///
    /// # Examples
    /// ```rust
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// # #[cfg(all(feature = "kyber-512", feature = "default-rng"))] {
    /// use kyber_kem::kyber_512; // Could also be kyber_768 or kyber_1024.
    /// use kyber_kem::traits::{Decaps, Encaps, KeyGen, SerDes};
    /// use rand_core::OsRng;
    ///
    /// let (alice_pk, alice_sk) = kyber_512::KG::try_keygen_with_rng(&mut OsRng)?;
    /// let pk_bytes = alice_pk.into_bytes(); // Alice sends the public key bytes to Bob
    ///
    /// let bob_pk = kyber_512::PublicKey::try_from_bytes(pk_bytes)?;
    /// let (mut bob_kdf, ct) = bob_pk.try_encaps_with_rng(&mut OsRng)?;
    /// let ct_bytes = ct.into_bytes(); // Bob sends the ciphertext bytes to Alice
    ///
    /// let alice_ct = kyber_512::CipherText::try_from_bytes(ct_bytes)?;
    /// let mut alice_kdf = alice_sk.try_decaps(&alice_ct)?;
    ///
    /// assert_eq!(bob_kdf.shared_secret(), alice_kdf.shared_secret());
    /// # }
    /// # Ok(())}
    /// ```
    fn try_keygen_with_rng(
        rng: &mut impl CryptoRngCore,
    ) -> Result<(Self::PublicKey, Self::SecretKey), &'static str>;

    /// Deterministic key generation from the 32-byte key seed `d` and the
    /// 32-byte implicit-rejection seed `z`. This is the entry point known
    /// answer tests drive; production callers normally prefer the
    /// rng-sourced functions above.
    ///
    /// # Examples
    /// ```rust
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// # #[cfg(feature = "kyber-512")] {
    /// use kyber_kem::kyber_512;
    /// use kyber_kem::traits::{Decaps, Encaps, KeyGen};
    ///
    /// let (pk, sk) = kyber_512::KG::keygen_from_seed([0u8; 32], [1u8; 32]);
    /// let (mut sender_kdf, ct) = pk.encaps_from_seed(&[2u8; 32]);
    /// let mut receiver_kdf = sk.try_decaps(&ct)?;
    ///
    /// assert_eq!(sender_kdf.shared_secret(), receiver_kdf.shared_secret());
    /// # }
    /// # Ok(())}
    /// ```
    #[must_use]
    fn keygen_from_seed(d: [u8; 32], z: [u8; 32]) -> (Self::PublicKey, Self::SecretKey);

    /// Checks that a serialized public and secret key correspond, e.g. after
    /// both were stored to disk and retrieved. Not constant-time; for use on
    /// the key owner's side only.
    ///
    /// # Examples
    /// ```rust
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// # #[cfg(all(feature = "kyber-512", feature = "default-rng"))] {
    /// use kyber_kem::kyber_512;
    /// use kyber_kem::traits::{KeyGen, SerDes};
    ///
    /// let (pk, sk) = kyber_512::KG::try_keygen()?;
    /// let pk_bytes = pk.into_bytes(); // Serialize and perhaps store-then-restore the public key
    /// let sk_bytes = sk.into_bytes(); // Serialize and perhaps store-then-restore the secret key
    /// assert!(kyber_512::KG::validate_keypair_vartime(&pk_bytes, &sk_bytes));
    /// # }
    /// # Ok(())}
    /// ```
    fn validate_keypair_vartime(pk: &Self::PublicByteArray, sk: &Self::SecretByteArray) -> bool;
}


/// The `Encaps` trait covers the sender side: produce a ciphertext and the
/// shared-secret KDF stream from a public key.
pub trait Encaps {
    /// The squeezable KDF handle carrying the shared secret stream.
    type SharedSecretKdf;
    /// The ciphertext transmitted to the key owner.
    type CipherText;

    /// Encapsulates against this public key with a fresh 32-byte message
    /// from the OS default random number generator. The first 32 bytes of
    /// the returned stream are the shared secret.
    ///
    /// # Errors
    /// Returns an error when the random number generator fails.
    ///
    /// # Examples
    /// ```rust
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// # #[cfg(all(feature = "kyber-1024", feature = "default-rng"))] {
    /// use kyber_kem::kyber_1024; // Could also be kyber_512 or kyber_768.
    /// use kyber_kem::traits::{Decaps, Encaps, KeyGen, SerDes};
    ///
    /// let (alice_pk, alice_sk) = kyber_1024::KG::try_keygen()?;
    /// let pk_bytes = alice_pk.into_bytes(); // Alice sends the public key bytes to Bob
    ///
    /// let bob_pk = kyber_1024::PublicKey::try_from_bytes(pk_bytes)?;
    /// let (mut bob_kdf, ct) = bob_pk.try_encaps()?;
    /// let ct_bytes = ct.into_bytes(); // Bob sends the ciphertext bytes to Alice
    ///
    /// let alice_ct = kyber_1024::CipherText::try_from_bytes(ct_bytes)?;
    /// let mut alice_kdf = alice_sk.try_decaps(&alice_ct)?;
    ///
    /// assert_eq!(bob_kdf.shared_secret(), alice_kdf.shared_secret());
    /// # }
    /// # Ok(())}
    /// ```
    #[cfg(feature = "default-rng")]
    fn try_encaps(&self) -> Result<(Self::SharedSecretKdf, Self::CipherText), &'static str> {
        self.try_encaps_with_rng(&mut OsRng)
    }

    /// Encapsulates with a caller-provided random number generator supplying
    /// the 32-byte message.
    ///
    /// # Errors
    /// Returns an error when the random number generator fails.
    ///
    /// # Examples
    /// ```rust
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// # #[cfg(all(feature = "kyber-768", feature = "default-rng"))] {
    /// use kyber_kem::kyber_768;
    /// use kyber_kem::traits::{Decaps, Encaps, KeyGen, SerDes};
    /// use rand_core::OsRng;
    ///
    /// let (alice_pk, alice_sk) = kyber_768::KG::try_keygen_with_rng(&mut OsRng)?;
    /// let pk_bytes = alice_pk.into_bytes();
    ///
    /// let bob_pk = kyber_768::PublicKey::try_from_bytes(pk_bytes)?;
    /// let (mut bob_kdf, ct) = bob_pk.try_encaps_with_rng(&mut OsRng)?;
    ///
    /// let mut alice_kdf = alice_sk.try_decaps(&ct)?;
    /// assert_eq!(bob_kdf.shared_secret(), alice_kdf.shared_secret());
    /// # }
    /// # Ok(())}
    /// ```
    fn try_encaps_with_rng(
        &self, rng: &mut impl CryptoRngCore,
    ) -> Result<(Self::SharedSecretKdf, Self::CipherText), &'static str>;

    /// Deterministic encapsulation from a caller-provided 32-byte message.
    /// The message is hashed before use, so even a low-quality `m` never
    /// reaches the encryption coins directly.
    ///
    /// # Examples
    /// ```rust
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// # #[cfg(feature = "kyber-512")] {
    /// use kyber_kem::kyber_512;
    /// use kyber_kem::traits::{Decaps, Encaps, KeyGen};
    ///
    /// let (pk, sk) = kyber_512::KG::keygen_from_seed([0u8; 32], [1u8; 32]);
    /// let (mut kdf1, ct) = pk.encaps_from_seed(&[2u8; 32]);
    /// let mut kdf2 = sk.try_decaps(&ct)?;
    ///
    /// // the first 32 bytes are the shared secret; more may be squeezed
    /// let mut okm1 = [0u8; 64];
    /// let mut okm2 = [0u8; 64];
    /// kdf1.squeeze(&mut okm1);
    /// kdf2.squeeze(&mut okm2);
    /// assert_eq!(okm1, okm2);
    /// # }
    /// # Ok(())}
    /// ```
    #[must_use]
    fn encaps_from_seed(&self, m: &[u8; 32]) -> (Self::SharedSecretKdf, Self::CipherText);
}


/// The `Decaps` trait covers the key owner's side: recover the shared-secret
/// KDF stream from a ciphertext. There is no failure path for forged input;
/// implicit rejection hands back an unrelated pseudorandom stream instead.
pub trait Decaps {
    /// The ciphertext received from the encapsulating party.
    type CipherText;
    /// The squeezable KDF handle carrying the shared secret stream.
    type SharedSecretKdf;

    /// Decapsulates the ciphertext under this secret key, in constant time
    /// over all secret-derived values. A tampered or forged ciphertext
    /// yields a stream keyed by the secret rejection value `z`, which is
    /// indistinguishable from a genuine shared secret to anyone lacking the
    /// secret key.
    ///
    /// # Errors
    /// Returns an error only on internal invariant violations, never as a
    /// function of ciphertext validity.
    ///
    /// # Examples
    /// ```rust
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// # #[cfg(all(feature = "kyber-512", feature = "default-rng"))] {
    /// use kyber_kem::kyber_512;
    /// use kyber_kem::traits::{Decaps, Encaps, KeyGen, SerDes};
    ///
    /// let (alice_pk, alice_sk) = kyber_512::KG::try_keygen()?;
    /// let pk_bytes = alice_pk.into_bytes();
    ///
    /// let bob_pk = kyber_512::PublicKey::try_from_bytes(pk_bytes)?;
    /// let (mut bob_kdf, ct) = bob_pk.try_encaps()?;
    ///
    /// let alice_ct = kyber_512::CipherText::try_from_bytes(ct.into_bytes())?;
    /// let mut alice_kdf = alice_sk.try_decaps(&alice_ct)?;
    /// assert_eq!(bob_kdf.shared_secret(), alice_kdf.shared_secret());
    /// # }
    /// # Ok(())}
    /// ```
    fn try_decaps(&self, ct: &Self::CipherText) -> Result<Self::SharedSecretKdf, &'static str>;
}


/// The `SerDes` trait provides the fixed-length byte layouts of the three
/// wire objects.
pub trait SerDes {
    /// The fixed-size byte array type used for serialization.
    type ByteArray;

    /// Produces the serialized byte array.
    fn into_bytes(self) -> Self::ByteArray;

    /// Consumes a byte array of the correct fixed size; performs the
    /// validation possible for the type (coefficient canonicality for public
    /// keys, embedded-hash consistency for secret keys).
    ///
    /// # Errors
    /// Returns an error on malformed input.
    ///
    /// # Examples
    /// ```rust
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// # #[cfg(feature = "kyber-768")] {
    /// use kyber_kem::kyber_768;
    /// use kyber_kem::traits::{KeyGen, SerDes};
    ///
    /// let (pk, _sk) = kyber_768::KG::keygen_from_seed([5u8; 32], [6u8; 32]);
    /// let pk_bytes = pk.into_bytes();
    /// let pk2 = kyber_768::PublicKey::try_from_bytes(pk_bytes)?;
    /// assert_eq!(pk2.into_bytes(), pk_bytes);
    /// # }
    /// # Ok(())}
    /// ```
    fn try_from_bytes(ba: Self::ByteArray) -> Result<Self, &'static str>
    where
        Self: Sized;
}
