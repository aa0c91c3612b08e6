//! Sentinel prefix marking a stored string as ciphertext.
//!
//! With the prefix, sealing an already sealed value and opening a plaintext
//! value are both no-ops, so callers may apply them unconditionally.

use serde::{Deserialize, Serialize};

use super::cipher::{CipherError, FieldCipher};

/// Prefix prepended to every stored envelope. Part of the storage format.
pub const ENCRYPTED_VALUE_PREFIX: &str = "//Encrypted:";

/// `true` if `value` is present and carries the sentinel prefix.
pub fn is_encrypted(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.starts_with(ENCRYPTED_VALUE_PREFIX))
}

impl FieldCipher {
    /// Encrypt `value` for storage, returning `PREFIX + envelope`.
    ///
    /// Values that already carry the prefix are returned unchanged.
    pub fn encrypt_field(&self, value: &str) -> Result<String, CipherError> {
        if is_encrypted(Some(value)) {
            return Ok(value.to_owned());
        }
        Ok(format!("{ENCRYPTED_VALUE_PREFIX}{}", self.encrypt(value)?))
    }

    /// Decrypt a stored value.
    ///
    /// Values without the prefix are returned unchanged. A prefixed value that
    /// fails to decrypt is an error, never a fallback to the stored text.
    pub fn decrypt_field(&self, value: &str) -> Result<String, CipherError> {
        match value.strip_prefix(ENCRYPTED_VALUE_PREFIX) {
            Some(envelope) => self.decrypt(envelope),
            None => Ok(value.to_owned()),
        }
    }
}

/// A column value that is stored encrypted.
///
/// Holds the stored representation only; reading the plaintext requires the
/// [`FieldCipher`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncryptedString(String);

impl EncryptedString {
    /// Encrypt `plaintext` into a storable value.
    pub fn seal(cipher: &FieldCipher, plaintext: &str) -> Result<Self, CipherError> {
        cipher.encrypt_field(plaintext).map(Self)
    }

    /// Wrap a value loaded from storage as-is.
    pub fn from_stored(stored: impl Into<String>) -> Self {
        Self(stored.into())
    }

    /// Decrypt back to plaintext.
    pub fn open(&self, cipher: &FieldCipher) -> Result<String, CipherError> {
        cipher.decrypt_field(&self.0)
    }

    /// The stored representation.
    pub fn as_stored(&self) -> &str {
        &self.0
    }

    /// `true` if the stored value carries the sentinel prefix.
    pub fn is_sealed(&self) -> bool {
        is_encrypted(Some(&self.0))
    }
}
