//! Repository trait definitions (ports).
//!
//! These traits define the storage interface that the infrastructure layer
//! (gradebook-infra) implements. The core crate never depends on any
//! specific storage technology.

pub mod account;
pub mod course;
pub mod enrollment;
pub mod grade;
