//! Thin shim over the FIPS 202 primitives. Every hash the scheme consumes
//! goes through one of these five functions; no other module names a `sha3`
//! digest type directly.

use sha3::digest::{ExtendableOutput, Update, XofReader};
use sha3::{Digest, Sha3_256, Sha3_512, Shake128, Shake128Reader, Shake256, Shake256Reader};


/// `H` — SHA3-256 of the concatenated input, 32 bytes out. Hashes public
/// keys, ciphertexts and the encapsulation message.
#[must_use]
pub(crate) fn h(bytes: &[u8]) -> [u8; 32] {
    let mut hasher = Sha3_256::new();
    Digest::update(&mut hasher, bytes);
    hasher.finalize().into()
}


/// `G` — SHA3-512 over the concatenation of the given parts, split into two
/// 32-byte halves. Derives (ρ, σ) in key generation and (K̄, r) in the
/// encapsulation/decapsulation hash chain.
#[must_use]
pub(crate) fn g(parts: &[&[u8]]) -> ([u8; 32], [u8; 32]) {
    let mut hasher = Sha3_512::new();
    parts.iter().for_each(|p| Digest::update(&mut hasher, p));
    let digest = hasher.finalize();
    let mut a = [0u8; 32];
    let mut b = [0u8; 32];
    a.copy_from_slice(&digest[0..32]);
    b.copy_from_slice(&digest[32..64]);
    (a, b)
}


/// `XOF` — SHAKE-128 absorbed with ρ and the two matrix indices, returned as
/// an incremental reader. The rejection sampler squeezes an a-priori unknown
/// number of blocks from it.
#[must_use]
pub(crate) fn xof(rho: &[u8; 32], i: u8, j: u8) -> Shake128Reader {
    let mut hasher = Shake128::default();
    hasher.update(rho);
    hasher.update(&[i]);
    hasher.update(&[j]);
    hasher.finalize_xof()
}


/// `PRF` — SHAKE-256 over a 32-byte seed and a one-byte nonce, producing the
/// `64·η` bytes one centered-binomial draw consumes.
#[must_use]
pub(crate) fn prf<const ETA_64: usize>(seed: &[u8; 32], nonce: u8) -> [u8; ETA_64] {
    let mut hasher = Shake256::default();
    hasher.update(seed);
    hasher.update(&[nonce]);
    let mut out = [0u8; ETA_64];
    hasher.finalize_xof().read(&mut out);
    out
}


/// `KDF` — SHAKE-256 absorbed with the 32-byte secret precursor and the
/// ciphertext hash, finalized and handed back as a squeezable stream. Both
/// the accept and the reject path of decapsulation build their stream here,
/// so sponge initialization is identical on each.
#[must_use]
pub(crate) fn kdf(precursor: &[u8; 32], ct_hash: &[u8; 32]) -> Shake256Reader {
    let mut hasher = Shake256::default();
    hasher.update(precursor);
    hasher.update(ct_hash);
    hasher.finalize_xof()
}


#[cfg(test)]
mod tests {
    use super::{g, h, kdf, prf, xof};
    use hex_literal::hex;
    use sha3::digest::XofReader;

    // FIPS 202 answer vectors for the empty message pin padding, domain
    // separators and rates of all four primitives.

    #[test]
    fn test_h_fips202_vectors() {
        assert_eq!(
            h(b""),
            hex!("a7ffc6f8bf1ed76651c14756a061d662f580ff4de43b49fa82d80a4b80f8434a")
        );
        assert_eq!(
            h(b"abc"),
            hex!("3a985da74fe225b2045c172d6bd390bd855f086e3e9d525b46bfe24511431532")
        );
    }

    #[test]
    fn test_g_fips202_vector() {
        let (a, b) = g(&[b""]);
        assert_eq!(
            a,
            hex!("a69f73cca23a9ac5c8b567dc185a756e97c982164fe25859e0d1dcc1475c80a6")
        );
        assert_eq!(
            b,
            hex!("15b2123af1f5f94c11e3e9402c3ac558f500199d95b6d3e301758586281dcd26")
        );
        // split halves agree with one SHA3-512 pass over the concatenation
        let (a2, b2) = g(&[b"ab", b"c"]);
        let (a3, b3) = g(&[b"abc"]);
        assert_eq!(a2, a3);
        assert_eq!(b2, b3);
    }

    #[test]
    fn test_xof_incremental_squeeze() {
        // the rejection sampler relies on reading the stream in pieces
        let rho = [0u8; 32];
        let mut r1 = xof(&rho, 1, 2);
        let mut r2 = xof(&rho, 1, 2);
        let mut whole = [0u8; 48];
        let mut first = [0u8; 16];
        let mut rest = [0u8; 32];
        r1.read(&mut whole);
        r2.read(&mut first);
        r2.read(&mut rest);
        assert_eq!(whole[0..16], first);
        assert_eq!(whole[16..48], rest);
        let mut r3 = xof(&rho, 2, 1);
        let mut swapped = [0u8; 48];
        r3.read(&mut swapped);
        assert_ne!(whole, swapped); // indices are absorbed in order
    }

    #[test]
    fn test_prf_determinism_and_separation() {
        let seed = [7u8; 32];
        let a = prf::<128>(&seed, 0);
        let b = prf::<128>(&seed, 0);
        let c = prf::<128>(&seed, 1);
        assert_eq!(a, b);
        assert_ne!(a, c);
        // prefix property: a longer squeeze starts with the shorter one
        let long = prf::<192>(&seed, 0);
        assert_eq!(a[..], long[0..128]);
    }

    #[test]
    fn test_kdf_stream_continuation() {
        let pre = [1u8; 32];
        let ct_hash = [2u8; 32];
        let mut r1 = kdf(&pre, &ct_hash);
        let mut r2 = kdf(&pre, &ct_hash);
        let mut whole = [0u8; 64];
        r1.read(&mut whole);
        let mut half1 = [0u8; 32];
        let mut half2 = [0u8; 32];
        r2.read(&mut half1);
        r2.read(&mut half2);
        assert_eq!(whole[0..32], half1);
        assert_eq!(whole[32..64], half2);
    }
}
