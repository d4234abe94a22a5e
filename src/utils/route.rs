//! Route pattern extraction for metric labels.

use actix_web::HttpRequest;

/// The matched resource pattern, so that metric labels stay bounded.
/// Unmatched requests share a single `/unknown` label.
pub fn extract_route_pattern(req: &HttpRequest) -> String {
    req.match_pattern()
        .unwrap_or_else(|| "/unknown".to_string())
}
