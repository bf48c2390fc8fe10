//! Passphrase-derived XOR obfuscation.
//!
//! The transform XORs data against a SHA-256 digest of the passphrase,
//! consuming key bytes cyclically. Applying it twice restores the input, so
//! encryption and decryption are the same operation. The 32-byte key repeats
//! across the payload and leaks structure to anyone who looks; this hides
//! assets from casual inspection only and is NOT cryptographically secure
//! confidentiality.

use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

pub const DERIVED_KEY_LEN: usize = 32;

/// SHA-256 of the passphrase's UTF-8 bytes. Deterministic, so the packaging
/// step and the running application derive identical keys from the same
/// secret.
pub fn derive_key(secret: &str) -> Zeroizing<Vec<u8>> {
    let digest = Sha256::digest(secret.as_bytes());
    Zeroizing::new(digest.to_vec())
}

/// Self-inverse cyclic XOR. A zero-length key is the identity transform,
/// never a division by zero in the cycling index.
pub fn transform(data: &[u8], key: &[u8]) -> Vec<u8> {
    if key.is_empty() {
        return data.to_vec();
    }
    data.iter()
        .enumerate()
        .map(|(i, byte)| byte ^ key[i % key.len()])
        .collect()
}

pub fn encrypt(data: &[u8], secret: &str) -> Vec<u8> {
    transform(data, &derive_key(secret))
}

/// Identical to [`encrypt`]; the transform is its own inverse.
pub fn decrypt(data: &[u8], secret: &str) -> Vec<u8> {
    transform(data, &derive_key(secret))
}

/// Short hex prefix of the derived key, safe to put in logs where the
/// passphrase itself must never appear.
pub fn key_fingerprint(secret: &str) -> String {
    let key = derive_key(secret);
    hex::encode(&key[..4])
}
