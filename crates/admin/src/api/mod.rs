//! REST backend access.
//!
//! - `client` - HTTP client, login, and the [`EntityBackend`] trait
//! - `error` - Backend error taxonomy and user-facing messages
//! - `normalize` - Collection response shapes

mod client;
mod error;
pub mod normalize;

pub use client::{ApiClient, AuthedClient, EntityBackend, LoginResponse, LoginUser};
pub use error::{ApiError, FieldErrors};
