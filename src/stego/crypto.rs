// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Optional payload encryption.
//!
//! [`Transform`] is the sealed-payload boundary: a tagged choice between
//! no encryption and passphrase-based authenticated encryption. The sealed
//! blob layout is:
//!
//! ```text
//! [16 bytes] PBKDF2 salt (random)
//! [12 bytes] AES-GCM-SIV nonce (random)
//! [N bytes ] ciphertext + 16-byte authentication tag
//! ```
//!
//! The key is derived with PBKDF2-HMAC-SHA256 (100 000 iterations, 32-byte
//! output). AES-256-GCM-SIV is used for its nonce-misuse resistance: the
//! nonce is random and travels next to the ciphertext.

use aes_gcm_siv::aead::Aead;
use aes_gcm_siv::{Aes256GcmSiv, KeyInit, Nonce};
use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use zeroize::Zeroizing;

use super::error::StegoError;

/// PBKDF2 salt length in bytes.
pub const SALT_LEN: usize = 16;
/// AES-GCM-SIV nonce length in bytes.
pub const NONCE_LEN: usize = 12;
/// AES-GCM-SIV authentication tag length in bytes.
pub const TAG_LEN: usize = 16;
/// PBKDF2-HMAC-SHA256 iteration count.
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// Fixed sealed-blob overhead beyond the plaintext.
pub const SEAL_OVERHEAD: usize = SALT_LEN + NONCE_LEN + TAG_LEN;

/// The payload transform applied before framing.
///
/// `Identity` passes bytes through; `Passphrase` applies the authenticated
/// encryption scheme above. Embed and extract must agree on the variant.
#[derive(Debug, Clone, Copy)]
pub enum Transform<'a> {
    Identity,
    Passphrase(&'a str),
}

impl Transform<'_> {
    /// Seal a plaintext payload for embedding.
    pub fn seal(&self, plaintext: &[u8]) -> Vec<u8> {
        match self {
            Self::Identity => plaintext.to_vec(),
            Self::Passphrase(pw) => seal_with_passphrase(plaintext, pw),
        }
    }

    /// Open an extracted payload.
    ///
    /// # Errors
    /// - [`StegoError::MalformedCiphertext`] if the blob cannot contain
    ///   salt, nonce, and tag.
    /// - [`StegoError::AuthenticationFailed`] on a wrong passphrase or
    ///   tampered ciphertext.
    pub fn open(&self, sealed: &[u8]) -> Result<Vec<u8>, StegoError> {
        match self {
            Self::Identity => Ok(sealed.to_vec()),
            Self::Passphrase(pw) => open_with_passphrase(sealed, pw),
        }
    }
}

/// Derive the AES-256 key from passphrase and salt.
fn derive_key(passphrase: &str, salt: &[u8]) -> Zeroizing<[u8; 32]> {
    let mut key = Zeroizing::new([0u8; 32]);
    pbkdf2_hmac::<Sha256>(passphrase.as_bytes(), salt, PBKDF2_ITERATIONS, &mut *key);
    key
}

fn seal_with_passphrase(plaintext: &[u8], passphrase: &str) -> Vec<u8> {
    use rand::RngCore;
    let mut rng = rand::thread_rng();

    let mut salt = [0u8; SALT_LEN];
    rng.fill_bytes(&mut salt);
    let mut nonce_bytes = [0u8; NONCE_LEN];
    rng.fill_bytes(&mut nonce_bytes);

    let key = derive_key(passphrase, &salt);
    let cipher = Aes256GcmSiv::new_from_slice(&*key).expect("valid key length");
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce_bytes), plaintext)
        .expect("AES-GCM-SIV encrypt should not fail");

    let mut out = Vec::with_capacity(SEAL_OVERHEAD + plaintext.len());
    out.extend_from_slice(&salt);
    out.extend_from_slice(&nonce_bytes);
    out.extend_from_slice(&ciphertext);
    out
}

fn open_with_passphrase(sealed: &[u8], passphrase: &str) -> Result<Vec<u8>, StegoError> {
    if sealed.len() < SEAL_OVERHEAD {
        return Err(StegoError::MalformedCiphertext);
    }
    let salt = &sealed[..SALT_LEN];
    let nonce_bytes = &sealed[SALT_LEN..SALT_LEN + NONCE_LEN];
    let ciphertext = &sealed[SALT_LEN + NONCE_LEN..];

    let key = derive_key(passphrase, salt);
    let cipher = Aes256GcmSiv::new_from_slice(&*key).expect("valid key length");
    cipher
        .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
        .map_err(|_| StegoError::AuthenticationFailed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_is_identity() {
        let t = Transform::Identity;
        let data = b"plain bytes".to_vec();
        assert_eq!(t.seal(&data), data);
        assert_eq!(t.open(&data).unwrap(), data);
    }

    #[test]
    fn seal_open_roundtrip() {
        let t = Transform::Passphrase("secret123");
        let msg = b"Hello, steganography!";
        let sealed = t.seal(msg);
        assert_eq!(sealed.len(), msg.len() + SEAL_OVERHEAD);
        assert_eq!(t.open(&sealed).unwrap(), msg);
    }

    #[test]
    fn wrong_passphrase_fails() {
        let sealed = Transform::Passphrase("correct").seal(b"secret message");
        let result = Transform::Passphrase("wrong").open(&sealed);
        assert!(matches!(result, Err(StegoError::AuthenticationFailed)));
    }

    #[test]
    fn tampered_ciphertext_fails() {
        let t = Transform::Passphrase("pw");
        let mut sealed = t.seal(b"data");
        let last = sealed.len() - 1;
        sealed[last] ^= 0x01;
        assert!(matches!(t.open(&sealed), Err(StegoError::AuthenticationFailed)));
    }

    #[test]
    fn truncated_blob_is_malformed() {
        let t = Transform::Passphrase("pw");
        assert!(matches!(
            t.open(&[0u8; SEAL_OVERHEAD - 1]),
            Err(StegoError::MalformedCiphertext)
        ));
        assert!(matches!(t.open(&[]), Err(StegoError::MalformedCiphertext)));
    }

    #[test]
    fn empty_message_works() {
        let t = Transform::Passphrase("pass");
        let sealed = t.seal(b"");
        assert_eq!(sealed.len(), SEAL_OVERHEAD);
        assert_eq!(t.open(&sealed).unwrap(), b"");
    }

    #[test]
    fn sealing_is_randomized() {
        // Fresh salt + nonce each call: repeated seals differ.
        let t = Transform::Passphrase("pass");
        let a = t.seal(b"same message");
        let b = t.seal(b"same message");
        assert_ne!(a, b);
    }

    #[test]
    fn key_derivation_depends_on_salt() {
        let k1 = derive_key("pass", &[0u8; SALT_LEN]);
        let k2 = derive_key("pass", &[1u8; SALT_LEN]);
        assert_ne!(*k1, *k2);
    }
}
