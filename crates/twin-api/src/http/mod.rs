//! HTTP layer for the digital twin API.
//!
//! Four JSON routes at the root path, CORS restricted to the configured
//! origins, request tracing, and `{"detail": ...}` error bodies.

pub mod error;
pub mod handlers;
pub mod router;
