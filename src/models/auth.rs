//! Identity-related data models.

use paperclip::actix::Apiv2Schema;
use serde::{Deserialize, Serialize};

/// Request model for account registration
#[derive(Debug, Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: Option<String>,
    pub email: String,
    pub password: String,
}

/// Request model for user login
#[derive(Debug, Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Public view of a registered user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Apiv2Schema)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// Response model for successful registration or login
#[derive(Debug, Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct AuthResponse {
    /// Opaque bearer token
    pub token: String,
    pub user: UserProfile,
}

#[derive(Debug, Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct MeResponse {
    pub user: UserProfile,
}
