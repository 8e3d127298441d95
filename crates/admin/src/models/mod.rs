//! Request-scoped domain models for the dashboard.
//!
//! Entity records are owned by the REST backend; see [`crate::entities`] for
//! their wire and view shapes. This module only holds state the dashboard
//! itself keeps per request.

pub mod session;

pub use session::{Session, keys as session_keys};
