//! Structured logging setup.
//!
//! # Telemetry invariants
//!
//! - **No plaintext field values or key material** may appear in any log field.
//!   Principal ids, record ids, and permission names are fine.
//! - Log level is configurable via `LOG_LEVEL` (default: `info`); `RUST_LOG`
//!   takes precedence when set.

pub mod init;

pub use init::init_telemetry;
