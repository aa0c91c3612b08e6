//! Encrypt-then-MAC protection of individual string fields.
//!
//! # Stored format
//!
//! ```text
//! //Encrypted:<base64(IV || ciphertext || tag)>
//! ```
//!
//! The IV is one cipher block, the ciphertext is CBC with PKCS#7 padding, and
//! the tag is a keyed hash over `IV || ciphertext`. Changing the prefix or the
//! byte layout requires re-encrypting every stored value.
//!
//! # Module invariants
//!
//! - The tag is checked in constant time **before** any decryption or padding
//!   removal is attempted.
//! - Key material is supplied at construction and never defaulted.

pub mod algorithms;
pub mod cipher;
pub mod keys;
pub mod marker;

pub use algorithms::{BlockCipher, CipherAlgorithm, KeyedHash, MacAlgorithm};
pub use cipher::{CipherError, FieldCipher};
pub use keys::KeyMaterial;
pub use marker::{is_encrypted, EncryptedString, ENCRYPTED_VALUE_PREFIX};
