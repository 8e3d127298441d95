//! Command implementations.

pub mod guard;
pub mod list;
