//! Business logic services (use cases).
//!
//! Services orchestrate repository calls and business rules. They depend on
//! traits (ports), never on concrete infrastructure implementations.

pub mod auth;
pub mod enrollment;
pub mod grade;
pub mod gradebook;
pub mod hash;
pub mod profile;
pub mod seed;

#[cfg(test)]
pub(crate) mod testing;
