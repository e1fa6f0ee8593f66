//! Content fingerprints for trackchanges.
//!
//! A fingerprint is a SHA-1 digest computed by walking a value's structure.
//! Change sets record the fingerprint of the state they were computed
//! against so consumers can detect a diverged target before applying them.
//!
//! # Key Types
//!
//! - [`ContentHasher`] -- Incremental structural hasher
//! - [`fingerprint`] -- One-shot fingerprint of a value
//! - [`verify_base`] -- Compare a value against a change set's base hash

pub mod hasher;

pub use hasher::{fingerprint, verify_base, ContentHasher, ABSENT_SENTINEL};
