//! [`KeyMaterial`]: the cipher key and MAC key handed to a [`FieldCipher`](super::FieldCipher).

use base64::{engine::general_purpose::STANDARD, Engine as _};
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::cipher::CipherError;

/// The two secret keys used by a field cipher.
///
/// Loaded once at process start and immutable afterwards. The bytes are
/// overwritten with zeroes on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct KeyMaterial {
    cipher_key: Vec<u8>,
    mac_key: Vec<u8>,
}

impl KeyMaterial {
    /// Wrap raw key bytes.
    ///
    /// Lengths are checked later against the selected algorithms by
    /// [`FieldCipher::new`](super::FieldCipher::new).
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::Configuration`] if either key is empty or all
    /// zeroes. A zero key is a placeholder, never a usable default.
    pub fn new(cipher_key: Vec<u8>, mac_key: Vec<u8>) -> Result<Self, CipherError> {
        let keys = Self { cipher_key, mac_key };
        if is_blank(&keys.cipher_key) {
            return Err(CipherError::Configuration(
                "cipher key must not be empty or all zeroes".into(),
            ));
        }
        if is_blank(&keys.mac_key) {
            return Err(CipherError::Configuration(
                "MAC key must not be empty or all zeroes".into(),
            ));
        }
        Ok(keys)
    }

    /// Decode both keys from standard base64, as they appear in configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::Configuration`] on invalid base64 or blank keys.
    pub fn from_base64(cipher_key: &str, mac_key: &str) -> Result<Self, CipherError> {
        let cipher_key = STANDARD
            .decode(cipher_key.trim())
            .map_err(|_| CipherError::Configuration("cipher key is not valid base64".into()))?;
        let mac_key = STANDARD
            .decode(mac_key.trim())
            .map_err(|_| CipherError::Configuration("MAC key is not valid base64".into()))?;
        Self::new(cipher_key, mac_key)
    }

    pub(crate) fn cipher_key(&self) -> &[u8] {
        &self.cipher_key
    }

    pub(crate) fn mac_key(&self) -> &[u8] {
        &self.mac_key
    }
}

fn is_blank(key: &[u8]) -> bool {
    key.iter().all(|b| *b == 0)
}

impl std::fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Lengths only; never key bytes.
        f.debug_struct("KeyMaterial")
            .field("cipher_key", &format_args!("[REDACTED; {}]", self.cipher_key.len()))
            .field("mac_key", &format_args!("[REDACTED; {}]", self.mac_key.len()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_all_zero_keys() {
        assert!(KeyMaterial::new(vec![0u8; 16], vec![1u8; 32]).is_err());
        assert!(KeyMaterial::new(vec![1u8; 16], vec![0u8; 32]).is_err());
    }

    #[test]
    fn rejects_empty_keys() {
        assert!(KeyMaterial::new(Vec::new(), vec![1u8; 32]).is_err());
    }

    #[test]
    fn decodes_base64() {
        let cipher = STANDARD.encode([0x42u8; 16]);
        let mac = STANDARD.encode([0x24u8; 32]);
        let keys = KeyMaterial::from_base64(&cipher, &mac).unwrap();
        assert_eq!(keys.cipher_key(), &[0x42u8; 16]);
        assert_eq!(keys.mac_key(), &[0x24u8; 32]);
    }

    #[test]
    fn rejects_bad_base64() {
        let mac = STANDARD.encode([0x24u8; 32]);
        let err = KeyMaterial::from_base64("not base64!", &mac).unwrap_err();
        assert!(matches!(err, CipherError::Configuration(_)));
    }

    #[test]
    fn debug_is_redacted() {
        let keys = KeyMaterial::new(vec![0xAB; 16], vec![0xCD; 32]).unwrap();
        let printed = format!("{keys:?}");
        assert!(printed.contains("REDACTED"));
        assert!(!printed.contains("171"));
    }
}
