//! Jatim Bissa admin dashboard library.
//!
//! Server-rendered dashboard for the Jatim Bissa job-placement platform.
//! Every record lives in the remote REST backend; this crate guards the
//! pages, drives the generic list controller and renders the results.
//!
//! # Modules
//!
//! - [`api`] - REST backend client and error taxonomy
//! - [`entities`] - Wire and view models of the managed records
//! - [`listing`] - Filtering, pagination, validation and the list controller
//! - [`services`] - Route guard and sign-in
//! - [`middleware`] - Session cookies, guard middleware, request ids, headers
//! - [`routes`] - Page handlers

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod app;
pub mod components;
pub mod config;
pub mod entities;
pub mod error;
pub mod listing;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

pub use app::router;
pub use config::DashboardConfig;
pub use state::AppState;
