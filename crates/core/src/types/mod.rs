//! Core types for Jatim Bissa.

pub mod email;
pub mod id;
pub mod role;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use role::{Role, RoleError};
pub use status::*;
