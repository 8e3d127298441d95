//! Jatim Bissa Core - Shared domain types.
//!
//! Types used by every part of the dashboard:
//! - `admin` - the server-rendered admin dashboard
//! - `cli` - command-line tools for policy and backend debugging
//!
//! # Architecture
//!
//! The core crate holds only types - no I/O, no HTTP clients. Entity records
//! themselves are owned by the remote REST backend; this crate only names
//! them (typed ids), validates the values the dashboard sends (emails) and
//! enumerates the closed sets the backend uses (roles, statuses).
//!
//! # Modules
//!
//! - [`types`] - Newtype ids, emails, roles and status enums

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
