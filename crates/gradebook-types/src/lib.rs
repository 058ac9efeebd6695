//! Shared domain types for Gradebook.
//!
//! This crate contains the core domain types used across the Gradebook
//! workspace: the `Outcome` result value, accounts, courses, teaching classes,
//! grades, service/discovery configuration, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod academic;
pub mod config;
pub mod discovery;
pub mod error;
pub mod grade;
pub mod outcome;
