//! Authentication primitives.
//!
//! - [`jwt`] -- HS256 access-token validation (and generation, for tooling
//!   and tests; the identity provider issues production tokens).

pub mod jwt;
