//! HTTP request handlers for API endpoints.

pub mod health;
pub mod metrics;
pub mod openapi;
pub mod searches;
pub mod user;
pub mod version;
pub mod weather;

pub use health::*;
pub use metrics::*;
pub use openapi::*;
pub use searches::*;
pub use user::*;
pub use version::*;
pub use weather::*;
