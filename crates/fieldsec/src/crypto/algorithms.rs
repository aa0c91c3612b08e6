//! Pluggable block-cipher and keyed-hash implementations.
//!
//! [`FieldCipher`](super::FieldCipher) only talks to the [`BlockCipher`] and
//! [`KeyedHash`] traits, so the AES key size and the HMAC digest are chosen at
//! configuration time via [`CipherAlgorithm`] and [`MacAlgorithm`].

use aes::cipher::{
    block_padding::Pkcs7, BlockCipher as RawBlockCipher, BlockDecryptMut, BlockEncryptMut,
    KeyIvInit,
};
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::{Sha256, Sha512};

use super::cipher::CipherError;

/// AES block (and therefore IV) length in bytes.
pub const AES_BLOCK_LEN: usize = 16;

/// A block cipher run in CBC mode with PKCS#7 padding.
pub trait BlockCipher: Send + Sync {
    /// Short algorithm name, used in configuration errors and logs.
    fn name(&self) -> &'static str;

    /// Exact key length in bytes.
    fn key_len(&self) -> usize;

    /// Block length in bytes. The IV has the same length.
    fn block_len(&self) -> usize;

    /// Pad `plaintext` to a block multiple and encrypt it.
    fn encrypt_padded(&self, key: &[u8], iv: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, CipherError>;

    /// Decrypt `ciphertext` and strip its padding.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::Padding`] if the padding is malformed.
    fn decrypt_padded(&self, key: &[u8], iv: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>, CipherError>;
}

/// A keyed hash producing a fixed-length authentication tag.
pub trait KeyedHash: Send + Sync {
    /// Short algorithm name, used in configuration errors and logs.
    fn name(&self) -> &'static str;

    /// Exact key length in bytes.
    fn key_len(&self) -> usize;

    /// Length of the produced tag in bytes.
    fn tag_len(&self) -> usize;

    /// Compute the tag over the concatenation of `parts`.
    fn compute(&self, key: &[u8], parts: &[&[u8]]) -> Result<Vec<u8>, CipherError>;
}

// ---------------------------------------------------------------------------
// AES-CBC
// ---------------------------------------------------------------------------

/// AES-128 in CBC mode.
#[derive(Debug, Clone, Copy, Default)]
pub struct Aes128Cbc;

/// AES-256 in CBC mode.
#[derive(Debug, Clone, Copy, Default)]
pub struct Aes256Cbc;

impl BlockCipher for Aes128Cbc {
    fn name(&self) -> &'static str {
        "aes-128-cbc"
    }

    fn key_len(&self) -> usize {
        16
    }

    fn block_len(&self) -> usize {
        AES_BLOCK_LEN
    }

    fn encrypt_padded(&self, key: &[u8], iv: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, CipherError> {
        cbc_encrypt::<aes::Aes128>(self.name(), key, iv, plaintext)
    }

    fn decrypt_padded(&self, key: &[u8], iv: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>, CipherError> {
        cbc_decrypt::<aes::Aes128>(self.name(), key, iv, ciphertext)
    }
}

impl BlockCipher for Aes256Cbc {
    fn name(&self) -> &'static str {
        "aes-256-cbc"
    }

    fn key_len(&self) -> usize {
        32
    }

    fn block_len(&self) -> usize {
        AES_BLOCK_LEN
    }

    fn encrypt_padded(&self, key: &[u8], iv: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, CipherError> {
        cbc_encrypt::<aes::Aes256>(self.name(), key, iv, plaintext)
    }

    fn decrypt_padded(&self, key: &[u8], iv: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>, CipherError> {
        cbc_decrypt::<aes::Aes256>(self.name(), key, iv, ciphertext)
    }
}

fn cbc_encrypt<C>(name: &str, key: &[u8], iv: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, CipherError>
where
    C: BlockEncryptMut + RawBlockCipher + aes::cipher::KeyInit,
{
    let encryptor = cbc::Encryptor::<C>::new_from_slices(key, iv)
        .map_err(|_| CipherError::Configuration(format!("{name}: invalid key or IV length")))?;
    Ok(encryptor.encrypt_padded_vec_mut::<Pkcs7>(plaintext))
}

fn cbc_decrypt<C>(name: &str, key: &[u8], iv: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>, CipherError>
where
    C: BlockDecryptMut + RawBlockCipher + aes::cipher::KeyInit,
{
    let decryptor = cbc::Decryptor::<C>::new_from_slices(key, iv)
        .map_err(|_| CipherError::Configuration(format!("{name}: invalid key or IV length")))?;
    decryptor
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| CipherError::Padding)
}

// ---------------------------------------------------------------------------
// HMAC
// ---------------------------------------------------------------------------

/// HMAC over SHA-256. Keys are one digest output (32 bytes) long.
#[derive(Debug, Clone, Copy, Default)]
pub struct HmacSha256;

/// HMAC over SHA-512. Keys are one digest output (64 bytes) long.
#[derive(Debug, Clone, Copy, Default)]
pub struct HmacSha512;

impl KeyedHash for HmacSha256 {
    fn name(&self) -> &'static str {
        "hmac-sha256"
    }

    fn key_len(&self) -> usize {
        32
    }

    fn tag_len(&self) -> usize {
        32
    }

    fn compute(&self, key: &[u8], parts: &[&[u8]]) -> Result<Vec<u8>, CipherError> {
        let mut mac = Hmac::<Sha256>::new_from_slice(key)
            .map_err(|e| CipherError::Configuration(format!("{}: {e}", self.name())))?;
        for part in parts {
            mac.update(part);
        }
        Ok(mac.finalize().into_bytes().to_vec())
    }
}

impl KeyedHash for HmacSha512 {
    fn name(&self) -> &'static str {
        "hmac-sha512"
    }

    fn key_len(&self) -> usize {
        64
    }

    fn tag_len(&self) -> usize {
        64
    }

    fn compute(&self, key: &[u8], parts: &[&[u8]]) -> Result<Vec<u8>, CipherError> {
        let mut mac = Hmac::<Sha512>::new_from_slice(key)
            .map_err(|e| CipherError::Configuration(format!("{}: {e}", self.name())))?;
        for part in parts {
            mac.update(part);
        }
        Ok(mac.finalize().into_bytes().to_vec())
    }
}

// ---------------------------------------------------------------------------
// Configuration-time selection
// ---------------------------------------------------------------------------

/// Block cipher selected by configuration (`CIPHER_ALGORITHM`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CipherAlgorithm {
    #[default]
    #[serde(rename = "aes-128-cbc")]
    Aes128Cbc,
    #[serde(rename = "aes-256-cbc")]
    Aes256Cbc,
}

impl CipherAlgorithm {
    /// Instantiate the selected implementation.
    pub fn build(self) -> Box<dyn BlockCipher> {
        match self {
            CipherAlgorithm::Aes128Cbc => Box::new(Aes128Cbc),
            CipherAlgorithm::Aes256Cbc => Box::new(Aes256Cbc),
        }
    }
}

/// Keyed hash selected by configuration (`MAC_ALGORITHM`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MacAlgorithm {
    #[default]
    HmacSha256,
    HmacSha512,
}

impl MacAlgorithm {
    /// Instantiate the selected implementation.
    pub fn build(self) -> Box<dyn KeyedHash> {
        match self {
            MacAlgorithm::HmacSha256 => Box::new(HmacSha256),
            MacAlgorithm::HmacSha512 => Box::new(HmacSha512),
        }
    }
}
