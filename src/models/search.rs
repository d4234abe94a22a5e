//! Search-history records.

use crate::models::WeatherRecord;
use paperclip::actix::Apiv2Schema;
use serde::{Deserialize, Serialize};

/// One persisted weather lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Apiv2Schema)]
pub struct SearchRecord {
    pub id: String,
    /// Owner's user id, absent for anonymous lookups
    pub user: Option<String>,
    pub city: String,
    pub response: WeatherRecord,
    /// RFC 3339 creation time
    pub created_at: String,
}

/// Response model for the search listing endpoints
#[derive(Debug, Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct SearchListResponse {
    pub searches: Vec<SearchRecord>,
}
