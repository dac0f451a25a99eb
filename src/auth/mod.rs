//! Authentication module
//!
//! - [`JwtService`] - token generation and validation
//! - [`CurrentUser`] - per-request caller identity (id + admin flag)
//! - [`extractor`] - axum extractor resolving [`CurrentUser`] from the
//!   Authorization header

pub mod extractor;
pub mod jwt;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
