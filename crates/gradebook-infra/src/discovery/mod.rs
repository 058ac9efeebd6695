//! Discovery registry clients.

pub mod consul;
