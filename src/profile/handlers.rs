use axum::{
    extract::State,
    routing::{get, post, put},
    Json, Router,
};
use rand::thread_rng;
use tracing::{info, instrument, warn};

use crate::{
    auth::services::AuthUser,
    error::AppError,
    identity::Identity,
    nutrition::repo as nutrition_repo,
    profile::{
        calculator,
        dto::{
            AssessmentResponse, GeneratedNutrition, NutritionTarget, Profile, ProfileResponse,
            SaveOutcome,
        },
        repo, sync,
    },
    prompts,
    session::Session,
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/profile", get(get_profile).put(save_profile))
        .route("/profile/nutrition", put(save_nutrition))
        .route("/profile/nutrition/generate", post(generate_nutrition))
        .route("/profile/nutrition/assess", post(assess_nutrition))
}

/// Lazily reconcile the session profile with storage for registered users.
/// Failures leave the session unsynced (session-only degraded mode) and a
/// later request retries.
pub async fn ensure_synced(state: &AppState, identity: &Identity) -> Session {
    let key = identity.session_key();
    let session = state.sessions.get(&key);
    if session.synced {
        return session;
    }
    if let Identity::Registered(user_id) = identity {
        match sync::reconcile(&state.db, *user_id, session.profile.as_ref()).await {
            Ok(merged) => {
                return state.sessions.update(&key, |s| {
                    s.profile = Some(merged);
                    s.synced = true;
                });
            }
            Err(e) => warn!(error = %e, user_id, "profile sync failed"),
        }
    }
    session
}

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> Json<ProfileResponse> {
    let session = ensure_synced(&state, &identity).await;
    Json(ProfileResponse::from(session.profile.unwrap_or_default()))
}

#[instrument(skip(state, payload))]
pub async fn save_profile(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Json(payload): Json<Profile>,
) -> Result<Json<SaveOutcome>, AppError> {
    if payload.is_blank() {
        return Err(AppError::invalid("Invalid user ID or profile data"));
    }

    let key = identity.session_key();
    // The form overwrites demographics; a generated nutrition target
    // already in the session survives unless the payload carries one.
    let kept = state.sessions.get(&key).profile.and_then(|p| p.nutrition);
    let mut profile = payload;
    profile.nutrition = profile.nutrition.or(kept);
    state.sessions.update(&key, |s| s.profile = Some(profile.clone()));

    match &identity {
        Identity::Registered(user_id) => {
            repo::save_profile(&state.db, *user_id, &profile).await?;
            info!(user_id, "profile saved");
            Ok(Json(SaveOutcome {
                persisted: true,
                message: "Profile saved successfully".into(),
            }))
        }
        Identity::Anonymous(_) => Ok(Json(SaveOutcome {
            persisted: false,
            message: "Information saved".into(),
        })),
    }
}

#[instrument(skip(state, payload))]
pub async fn save_nutrition(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Json(payload): Json<NutritionTarget>,
) -> Result<Json<SaveOutcome>, AppError> {
    let key = identity.session_key();
    let session = state.sessions.update(&key, |s| {
        let mut profile = s.profile.take().unwrap_or_default();
        profile.nutrition = Some(payload);
        s.profile = Some(profile);
    });

    let persisted = persist_with_snapshot(&state, &identity, &session, &payload).await?;
    Ok(Json(SaveOutcome {
        persisted,
        message: if persisted {
            "Nutrition requirements saved".into()
        } else {
            "Information saved".into()
        },
    }))
}

#[instrument(skip(state))]
pub async fn generate_nutrition(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> Result<Json<GeneratedNutrition>, AppError> {
    let session = ensure_synced(&state, &identity).await;
    let profile = session.profile.clone().unwrap_or_default();

    let target = calculator::compute_targets(&profile, &mut thread_rng());

    let key = identity.session_key();
    let session = state.sessions.update(&key, |s| {
        let mut profile = s.profile.take().unwrap_or_default();
        profile.nutrition = Some(target);
        s.profile = Some(profile);
    });

    let persisted = persist_with_snapshot(&state, &identity, &session, &target).await?;
    info!(calories = target.calories, persisted, "nutrition targets generated");
    Ok(Json(GeneratedNutrition {
        nutrition: target,
        persisted,
    }))
}

/// Persist the session profile and append a history snapshot for registered
/// users; guests keep everything session-only (demo mode).
async fn persist_with_snapshot(
    state: &AppState,
    identity: &Identity,
    session: &Session,
    target: &NutritionTarget,
) -> Result<bool, AppError> {
    match identity {
        Identity::Registered(user_id) => {
            if let Some(profile) = &session.profile {
                repo::save_profile(&state.db, *user_id, profile).await?;
            }
            match nutrition_repo::record_snapshot(&state.db, identity, target).await {
                Ok(()) => Ok(true),
                Err(AppError::GuestSession(_)) => Ok(false),
                Err(e) => Err(e),
            }
        }
        Identity::Anonymous(_) => Ok(false),
    }
}

#[instrument(skip(state))]
pub async fn assess_nutrition(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> Result<Json<AssessmentResponse>, AppError> {
    let session = ensure_synced(&state, &identity).await;
    let profile = session.profile.unwrap_or_default();
    let nutrition = profile.nutrition.unwrap_or_default();

    if nutrition.is_empty() {
        return Err(AppError::invalid(
            "All nutrition values are zero. Please generate valid nutrition requirements.",
        ));
    }

    let context = format!(
        "Personal information: age {}, gender {}, weight {} kg, height {} cm, \
         activity level {}, goal {}.\n\
         Daily Nutrition Requirements:\nCalories: {}\nCarbs: {}g\nProtein: {}g\nFat: {}g",
        profile.age,
        profile.gender,
        profile.weight_kg,
        profile.height_cm,
        profile.activity_level,
        profile.goal,
        nutrition.calories,
        nutrition.carbs_g,
        nutrition.protein_g,
        nutrition.fat_g,
    );
    let prompt = format!("{}\n\n{}", prompts::ASSESSMENT_PROMPT, context);

    let assessment = state.generator.generate(&prompt, &[]).await?;
    Ok(Json(AssessmentResponse { assessment }))
}
