use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tracing::{instrument, warn};

use crate::{
    ai::ImagePart,
    analysis::{
        dto::{
            AnalyzeRequest, AnalyzeResponse, DeleteAnalysisRequest, HabitItem, PopularHabit,
            TrendHabit,
        },
        repo, services,
    },
    auth::services::AuthUser,
    error::AppError,
    identity::Identity,
    prompts,
    state::AppState,
};

/// Habit lines longer than this are chatter, not nicknames, and are kept
/// out of listings.
const MAX_HABIT_LEN: usize = 60;

const RANK_LIMIT: i64 = 5;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/analysis",
            post(analyze).get(list_habits).delete(delete_habit),
        )
        .route("/analysis/popular", get(popular_habits))
        .route("/analysis/trends", get(trend_habits))
}

#[instrument(skip(state, payload))]
pub async fn analyze(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Json(payload): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let count = payload.images_b64.len();
    if count == 0 {
        return Err(AppError::invalid("Please upload images to begin analysis"));
    }
    if count < 3 {
        return Err(AppError::invalid(format!(
            "Please upload {} more images for analysis",
            3 - count
        )));
    }
    if count > 6 {
        return Err(AppError::invalid(
            "You can upload a maximum of 6 images for analysis",
        ));
    }

    let mime = payload
        .content_type
        .unwrap_or_else(|| "image/jpeg".to_string());
    let images: Vec<ImagePart> = payload
        .images_b64
        .into_iter()
        .map(|data_b64| ImagePart {
            mime_type: mime.clone(),
            data_b64,
        })
        .collect();

    let analysis = state
        .generator
        .generate(prompts::ANALYSIS_PROMPT, &images)
        .await?;

    // Guests see the analysis; only registered users get it recorded.
    let saved = match (&identity, services::first_line(&analysis)) {
        (Identity::Registered(user_id), Some(habit)) => {
            match repo::record(&state.db, *user_id, &habit).await {
                Ok(inserted) => inserted,
                Err(e) => {
                    warn!(error = %e, user_id, "could not record analysis result");
                    false
                }
            }
        }
        _ => false,
    };

    Ok(Json(AnalyzeResponse { analysis, saved }))
}

#[instrument(skip(state))]
pub async fn list_habits(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> Result<Json<Vec<HabitItem>>, AppError> {
    let user_id = identity.registered("view your diet analysis history")?;

    let rows = repo::list(&state.db, user_id).await?;
    let items = rows
        .into_iter()
        .filter(|r| r.analysis_text.len() < MAX_HABIT_LEN)
        .map(|r| HabitItem {
            analysis_text: r.analysis_text,
            created_at: r.created_at,
        })
        .collect();
    Ok(Json(items))
}

#[instrument(skip(state, payload))]
pub async fn delete_habit(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Json(payload): Json<DeleteAnalysisRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let user_id = identity.registered("delete analysis results")?;
    if payload.analysis_text.is_empty() {
        return Err(AppError::invalid("Invalid user ID or analysis text"));
    }

    repo::delete(&state.db, user_id, &payload.analysis_text).await?;
    Ok(Json(serde_json::json!({
        "message": "Analysis deleted successfully"
    })))
}

#[instrument(skip(state))]
pub async fn popular_habits(
    State(state): State<AppState>,
) -> Result<Json<Vec<PopularHabit>>, AppError> {
    let rows = repo::popular(&state.db, RANK_LIMIT).await?;
    Ok(Json(
        rows.into_iter()
            .map(|r| PopularHabit {
                habit: r.analysis_text,
                count: r.count,
            })
            .collect(),
    ))
}

#[instrument(skip(state))]
pub async fn trend_habits(
    State(state): State<AppState>,
) -> Result<Json<Vec<TrendHabit>>, AppError> {
    let rows = repo::trends(&state.db, RANK_LIMIT).await?;
    Ok(Json(
        rows.into_iter()
            .map(|r| TrendHabit {
                habit: r.analysis_text,
                first_seen: r.first_appearance,
            })
            .collect(),
    ))
}
