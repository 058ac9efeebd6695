//! Business logic and port definitions for Gradebook.
//!
//! This crate defines the "ports" (repository, password hashing and discovery
//! registry traits) that the infrastructure layer implements, plus the
//! services the terminal controller and HTTP handlers call through the
//! [`Gradebook`](service::gradebook::Gradebook) facade. It depends only on
//! `gradebook-types`, never on `gradebook-infra` or any database/IO crate.

pub mod discovery;
pub mod repository;
pub mod service;
