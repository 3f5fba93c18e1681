//! Authentication infrastructure module
//!
//! This module provides the JWT-backed token authority for account sessions.

mod jwt;

pub use jwt::{JwtConfig, JwtTokenAuthority};
