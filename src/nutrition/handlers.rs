use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::services::AuthUser,
    error::AppError,
    nutrition::dto::{DailyNutrition, HistoryQuery},
    nutrition::repo,
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new().route("/nutrition/history", get(history))
}

#[instrument(skip(state))]
pub async fn history(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Query(q): Query<HistoryQuery>,
) -> Result<Json<Vec<DailyNutrition>>, AppError> {
    let user_id = identity.registered("view your nutrition history")?;

    let rows = repo::daily_history(&state.db, user_id, q.limit).await?;
    let days = rows
        .into_iter()
        .map(|r| {
            DailyNutrition::new(
                r.entry_date,
                r.carbs.unwrap_or_default(),
                r.protein.unwrap_or_default(),
                r.fat.unwrap_or_default(),
                r.calories.unwrap_or_default(),
            )
        })
        .collect();
    Ok(Json(days))
}
