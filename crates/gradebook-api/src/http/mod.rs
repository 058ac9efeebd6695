//! HTTP layer of the grade service.
//!
//! Axum-based routes mounted per component group: `common` serves `/health`
//! and `/info`, `grades` serves the grade API under `/api/v1/`. Every API
//! response uses the envelope format.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod response;
pub mod router;
