//! Request extractors that resolve who is calling.
//!
//! - [`auth::AuthUser`] -- Resolves the calling user from a JWT Bearer token.

pub mod auth;
