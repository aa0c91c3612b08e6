//! Encrypt-then-MAC envelope around a single string value.
//!
//! **Ordering:** the tag is verified before the ciphertext is decrypted or its
//! padding inspected. Unauthenticated CBC is malleable, and checking padding
//! first turns every failed read into a padding oracle.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use rand::{rngs::OsRng, RngCore};
use subtle::ConstantTimeEq;
use thiserror::Error;

use super::algorithms::{BlockCipher, CipherAlgorithm, KeyedHash, MacAlgorithm};
use super::keys::KeyMaterial;

/// Errors produced by the cipher layer.
#[derive(Debug, Error)]
pub enum CipherError {
    /// Keys do not fit the selected algorithms. Fatal at startup.
    #[error("cipher configuration error: {0}")]
    Configuration(String),

    /// The stored envelope is not valid base64 or is too short to hold an IV and a tag.
    #[error("malformed envelope")]
    MalformedEnvelope,

    /// The authentication tag does not match the IV and ciphertext.
    #[error("envelope authentication failed")]
    Authentication,

    /// Padding was malformed after a successful tag check.
    #[error("invalid padding")]
    Padding,
}

impl CipherError {
    /// `true` for errors caused by the stored value rather than by configuration.
    pub fn is_integrity_fault(&self) -> bool {
        !matches!(self, CipherError::Configuration(_))
    }
}

/// Encrypts and decrypts single field values with a fixed pair of keys.
///
/// Stateless apart from the immutable keys, so one instance can be shared
/// across threads behind an `Arc`.
pub struct FieldCipher {
    cipher: Box<dyn BlockCipher>,
    mac: Box<dyn KeyedHash>,
    keys: KeyMaterial,
}

impl FieldCipher {
    /// Build a cipher from explicit algorithm implementations and keys.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::Configuration`] if either key length does not
    /// match what its algorithm requires.
    pub fn new(
        cipher: Box<dyn BlockCipher>,
        mac: Box<dyn KeyedHash>,
        keys: KeyMaterial,
    ) -> Result<Self, CipherError> {
        check_len(cipher.name(), "cipher", cipher.key_len(), keys.cipher_key().len())?;
        check_len(mac.name(), "MAC", mac.key_len(), keys.mac_key().len())?;
        Ok(Self { cipher, mac, keys })
    }

    /// Build a cipher from configuration-selected algorithms.
    pub fn from_config(
        cipher: CipherAlgorithm,
        mac: MacAlgorithm,
        keys: KeyMaterial,
    ) -> Result<Self, CipherError> {
        Self::new(cipher.build(), mac.build(), keys)
    }

    /// Names of the configured algorithms, for startup logging.
    pub fn algorithms(&self) -> (&'static str, &'static str) {
        (self.cipher.name(), self.mac.name())
    }

    /// Encrypt `plaintext` into a base64 envelope `IV || ciphertext || tag`.
    ///
    /// A fresh IV is drawn from the OS CSPRNG on every call, so encrypting the
    /// same value twice yields different envelopes.
    pub fn encrypt(&self, plaintext: &str) -> Result<String, CipherError> {
        let mut iv = vec![0u8; self.cipher.block_len()];
        OsRng.fill_bytes(&mut iv);

        let ciphertext = self
            .cipher
            .encrypt_padded(self.keys.cipher_key(), &iv, plaintext.as_bytes())?;
        let tag = self.mac.compute(self.keys.mac_key(), &[iv.as_slice(), ciphertext.as_slice()])?;

        let mut envelope = Vec::with_capacity(iv.len() + ciphertext.len() + tag.len());
        envelope.extend_from_slice(&iv);
        envelope.extend_from_slice(&ciphertext);
        envelope.extend_from_slice(&tag);
        Ok(STANDARD.encode(envelope))
    }

    /// Decrypt a base64 envelope produced by [`FieldCipher::encrypt`].
    ///
    /// # Errors
    ///
    /// - [`CipherError::MalformedEnvelope`] if the envelope is not base64, is
    ///   shorter than an IV plus a tag, or decrypts to invalid UTF-8.
    /// - [`CipherError::Authentication`] if the tag does not verify. Nothing is
    ///   decrypted in that case.
    /// - [`CipherError::Padding`] if the padding is malformed after verification.
    pub fn decrypt(&self, envelope: &str) -> Result<String, CipherError> {
        let bytes = STANDARD
            .decode(envelope)
            .map_err(|_| CipherError::MalformedEnvelope)?;

        let iv_len = self.cipher.block_len();
        let tag_len = self.mac.tag_len();
        if bytes.len() < iv_len + tag_len {
            return Err(CipherError::MalformedEnvelope);
        }

        let (iv, rest) = bytes.split_at(iv_len);
        let (ciphertext, tag) = rest.split_at(rest.len() - tag_len);

        let expected = self.mac.compute(self.keys.mac_key(), &[iv, ciphertext])?;
        if !bool::from(expected.ct_eq(tag)) {
            return Err(CipherError::Authentication);
        }

        let plaintext = self
            .cipher
            .decrypt_padded(self.keys.cipher_key(), iv, ciphertext)?;
        String::from_utf8(plaintext).map_err(|_| CipherError::MalformedEnvelope)
    }
}

impl std::fmt::Debug for FieldCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldCipher")
            .field("cipher", &self.cipher.name())
            .field("mac", &self.mac.name())
            .field("keys", &self.keys)
            .finish()
    }
}

fn check_len(algorithm: &str, which: &str, expected: usize, actual: usize) -> Result<(), CipherError> {
    if expected != actual {
        return Err(CipherError::Configuration(format!(
            "{which} key for {algorithm} must be {expected} bytes, got {actual}"
        )));
    }
    Ok(())
}
