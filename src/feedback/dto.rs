use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    /// 0 to 10, one decimal place in the UI.
    pub rating: f64,
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FeedbackSummary {
    pub average_rating: Option<f64>,
    pub total_ratings: i64,
}

#[derive(Debug, Serialize)]
pub struct RecentComment {
    pub comment: String,
    pub rating: f64,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    5
}
