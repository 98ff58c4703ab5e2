//! services/api/src/lib.rs
//!
//! The HTTP face of the study service: adapters for the core ports, configuration
//! and the axum router.

pub mod adapters;
pub mod config;
pub mod error;
pub mod web;
