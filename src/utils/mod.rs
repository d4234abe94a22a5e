//! Utility functions and helper modules.
//!
//! Request introspection: client IP, user agent, bearer token and route
//! pattern.

pub mod http;
pub mod route;

pub use http::*;
pub use route::*;
