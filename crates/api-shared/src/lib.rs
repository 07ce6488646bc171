//! # API Shared
//!
//! Shared utilities and definitions for the intake service's REST API.
//!
//! Contains:
//! - REST wire types (request/response bodies with OpenAPI schemas)
//! - The shared `HealthService`
//! - The API-key access-gate middleware
//!
//! Used by the server binary for common functionality; the core crates
//! stay free of API concerns.

pub mod auth;
pub mod health;
pub mod wire;

pub use health::HealthService;
pub use wire::*;
