use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::services::AuthUser,
    error::AppError,
    feedback::{
        dto::{FeedbackRequest, FeedbackSummary, RecentComment, RecentQuery},
        repo,
    },
    identity::Identity,
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/feedback", post(submit))
        .route("/feedback/summary", get(summary))
        .route("/feedback/recent", get(recent))
}

#[instrument(skip(state, payload))]
pub async fn submit(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Json(payload): Json<FeedbackRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    if !(0.0..=10.0).contains(&payload.rating) {
        return Err(AppError::invalid("Rating must be between 0 and 10"));
    }

    // Anonymous feedback is welcome; it is simply not attributed.
    let user_id = match &identity {
        Identity::Registered(id) => Some(*id),
        Identity::Anonymous(_) => None,
    };

    repo::insert(&state.db, user_id, payload.rating, payload.comment.as_deref()).await?;
    Ok(Json(serde_json::json!({
        "message": "Thank you for your feedback!"
    })))
}

#[instrument(skip(state))]
pub async fn summary(
    State(state): State<AppState>,
) -> Result<Json<FeedbackSummary>, AppError> {
    let (average_rating, total_ratings) = repo::average_and_count(&state.db).await?;
    Ok(Json(FeedbackSummary {
        average_rating,
        total_ratings,
    }))
}

#[instrument(skip(state))]
pub async fn recent(
    State(state): State<AppState>,
    Query(q): Query<RecentQuery>,
) -> Result<Json<Vec<RecentComment>>, AppError> {
    let rows = repo::recent_comments(&state.db, q.limit).await?;
    Ok(Json(
        rows.into_iter()
            .map(|r| RecentComment {
                comment: r.comment,
                rating: r.rating,
                created_at: r.created_at,
            })
            .collect(),
    ))
}
