//! Data models and schemas for the weather lookup API.
//!
//! This module contains all the data structures used throughout the application,
//! including weather payloads, view models, request/response envelopes and audit types.

pub mod api;
pub mod audit;
pub mod auth;
pub mod search;
pub mod view;
pub mod weather;

pub use api::*;
pub use audit::*;
pub use auth::*;
pub use search::*;
pub use view::*;
pub use weather::*;
