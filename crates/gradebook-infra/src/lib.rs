//! Infrastructure layer for Gradebook.
//!
//! Contains implementations of the ports defined in `gradebook-core`: SQLite
//! storage, Argon2 password hashing and the Consul discovery registry client,
//! plus configuration loading and data directory resolution.

pub mod config;
pub mod crypto;
pub mod discovery;
pub mod filesystem;
pub mod sqlite;
