use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    /// 3 to 6 meal photos, base64-encoded.
    pub images_b64: Vec<String>,
    #[serde(default)]
    pub content_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    /// Full generated text, shown to the user.
    pub analysis: String,
    /// Whether the habit line was persisted (false for guests and repeats).
    pub saved: bool,
}

#[derive(Debug, Serialize)]
pub struct HabitItem {
    pub analysis_text: String,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Deserialize)]
pub struct DeleteAnalysisRequest {
    pub analysis_text: String,
}

#[derive(Debug, Serialize)]
pub struct PopularHabit {
    pub habit: String,
    pub count: i64,
}

#[derive(Debug, Serialize)]
pub struct TrendHabit {
    pub habit: String,
    pub first_seen: OffsetDateTime,
}
