//! Middleware del sistema
//!
//! Autenticación, CORS y rate limiting.

pub mod auth;
pub mod cors;
pub mod rate_limit;
