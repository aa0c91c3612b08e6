//! Fixtures shared by unit tests.

use std::sync::Arc;

use fieldsec::crypto::{CipherAlgorithm, MacAlgorithm};
use fieldsec::{FieldCipher, KeyMaterial};
use rand::{rngs::OsRng, RngCore};

use crate::server::state::AppState;

fn random_key(len: usize) -> Vec<u8> {
    let mut key = vec![0u8; len];
    OsRng.fill_bytes(&mut key);
    key
}

/// A field cipher with fresh random keys.
pub fn random_field_cipher() -> FieldCipher {
    let keys = KeyMaterial::new(random_key(16), random_key(32)).unwrap();
    FieldCipher::from_config(CipherAlgorithm::Aes128Cbc, MacAlgorithm::HmacSha256, keys).unwrap()
}

pub fn test_cipher() -> Arc<FieldCipher> {
    Arc::new(random_field_cipher())
}

/// Empty stores, default principal header.
pub fn test_state() -> AppState {
    AppState::new(random_field_cipher(), "X-Principal-Id".into())
}
