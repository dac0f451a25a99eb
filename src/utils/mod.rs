//! Shared utilities
//!
//! - [`error`] - application error type and response envelope
//! - [`logger`] - tracing subscriber setup

pub mod error;
pub mod logger;

pub use error::{AppError, AppResponse, AppResult, ok};
