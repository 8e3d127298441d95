//! HTTP middleware stack for the dashboard.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (added in `main`)
//! 2. `TraceLayer` (request span with method, uri, status, latency)
//! 3. Request ID (recorded in the span and the Sentry scope)
//! 4. Security headers
//! 5. Route guard (redirects before any guarded page renders)

pub mod auth;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use auth::{CurrentSession, RequireSession, SessionRejection, route_guard};
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
pub use security_headers::security_headers_middleware;
pub use session::{CookieSession, MemorySession, SessionProvider};
