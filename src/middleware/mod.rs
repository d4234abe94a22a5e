//! Custom middleware implementations for the API.
//!
//! Request IDs, metrics collection and optional bearer authentication.

pub mod identity;
pub mod metrics;
pub mod request_id;

pub use identity::*;
pub use metrics::*;
pub use request_id::*;
