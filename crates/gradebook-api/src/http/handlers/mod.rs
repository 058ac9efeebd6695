//! Route handlers, one module per area.

pub mod auth;
pub mod grade;
pub mod health;
