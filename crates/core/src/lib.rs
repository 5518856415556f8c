//! Domain logic for the shoot booking service.
//!
//! Everything in this crate is pure: no database, no HTTP. The `db` and
//! `api` crates load rows, hand them to these functions, and act on the
//! decisions they return.

pub mod budget;
pub mod calendar;
pub mod error;
pub mod form;
pub mod lifecycle;
pub mod policy;
pub mod principal;
pub mod readiness;
pub mod resources;
pub mod shoot;
pub mod types;
