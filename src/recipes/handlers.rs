use axum::{
    extract::{Path, State},
    routing::{delete, post, put},
    Json, Router,
};
use serde::Deserialize;
use time::OffsetDateTime;
use tracing::{info, instrument};

use crate::{
    auth::services::AuthUser,
    error::AppError,
    profile::handlers::ensure_synced,
    prompts,
    recipes::{
        dto::{GeneratedRecipe, MealType, RecipeSaved, SaveRecipeRequest, SavedRecipeItem},
        repo, services,
    },
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/recipes", post(save_recipe).get(list_recipes))
        .route("/recipes/generate", post(generate_recipe))
        .route("/recipes/preferences", put(set_preferences))
        .route("/recipes/:id", delete(delete_recipe))
}

/// Recipe-tab choices kept in the session and folded into the prompt.
#[derive(Debug, Deserialize)]
pub struct PreferencesRequest {
    #[serde(default)]
    pub meal_type: Option<MealType>,
    #[serde(default)]
    pub cook_styles: Option<Vec<String>>,
    #[serde(default)]
    pub cook_time_minutes: Option<u32>,
    #[serde(default)]
    pub ingredient_limit: Option<u32>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub recipe_styles: Option<Vec<String>>,
}

#[instrument(skip(state, payload))]
pub async fn set_preferences(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Json(payload): Json<PreferencesRequest>,
) -> Json<serde_json::Value> {
    state.sessions.update(&identity.session_key(), |s| {
        if let Some(meal) = payload.meal_type {
            s.meal_choice = Some(meal);
        }
        if let Some(styles) = payload.cook_styles {
            s.cook_styles = styles;
        }
        if let Some(minutes) = payload.cook_time_minutes {
            s.cook_time_minutes = Some(minutes);
        }
        if let Some(limit) = payload.ingredient_limit {
            s.ingredient_limit = Some(limit);
        }
        if let Some(notes) = payload.notes {
            s.notes = notes;
        }
        if let Some(styles) = payload.recipe_styles {
            s.recipe_styles = styles;
        }
    });
    Json(serde_json::json!({ "message": "Preferences updated" }))
}

#[instrument(skip(state))]
pub async fn generate_recipe(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> Result<Json<GeneratedRecipe>, AppError> {
    let session = ensure_synced(&state, &identity).await;

    let profile = session.profile.clone().ok_or_else(|| {
        AppError::invalid("Please fill in your personal information first")
    })?;
    let nutrition = profile.nutrition.ok_or_else(|| {
        AppError::invalid("Please generate or enter your nutrition requirements first")
    })?;
    if nutrition.is_empty() {
        return Err(AppError::invalid(
            "All nutrition values are zero. Please generate valid nutrition requirements.",
        ));
    }

    let context = format!(
        "Notes: {}\n\
         Profile: age {}, gender {}, weight {} kg, height {} cm, activity level {}, goal {}.\n\
         Daily Nutrition Requirements:\nCalories: {}\nCarbs: {}g\nProtein: {}g\nFat: {}g\n\
         Recipe style: {}\n\
         Cooking method: {}\n\
         Cooking time (minutes): {}\n\
         Meal: {}\n\
         Ingredient limit (kinds): {}",
        session.notes,
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
        session.recipe_styles.join(", "),
        session.cook_styles.join(", "),
        session.cook_time_minutes.unwrap_or(5),
        session.meal_choice.unwrap_or_default(),
        session.ingredient_limit.unwrap_or(3),
    );
    let prompt = format!("{}\n\n{}", prompts::RECIPE_PROMPT, context);

    let recipe = state.generator.generate(&prompt, &[]).await?;
    state.sessions.update(&identity.session_key(), |s| {
        s.last_recipe = Some(recipe.clone());
    });
    info!(chars = recipe.len(), "recipe generated");
    Ok(Json(GeneratedRecipe { recipe }))
}

#[instrument(skip(state, payload))]
pub async fn save_recipe(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Json(payload): Json<SaveRecipeRequest>,
) -> Result<Json<RecipeSaved>, AppError> {
    let user_id = identity.registered("save recipes")?;

    let session = state.sessions.get(&identity.session_key());
    let content = payload
        .content
        .or_else(|| session.last_recipe.clone())
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| AppError::invalid("Invalid user ID or recipe content"))?;

    let title = services::derive_title(&content);
    let meal_type = services::resolve_meal_type(session.meal_choice, &title, &content);
    let full_title = services::timestamped_title(&title, OffsetDateTime::now_utc());

    let id = repo::insert(&state.db, user_id, &full_title, &content, meal_type).await?;
    Ok(Json(RecipeSaved {
        id,
        recipe_title: full_title,
        meal_type,
        message: "Recipe saved successfully".into(),
    }))
}

#[instrument(skip(state))]
pub async fn list_recipes(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> Result<Json<Vec<SavedRecipeItem>>, AppError> {
    let user_id = identity.registered("view your saved recipes")?;

    let rows = repo::list(&state.db, user_id).await?;
    let items = rows
        .into_iter()
        .map(|r| SavedRecipeItem {
            id: r.id,
            recipe_title: r.recipe_title.unwrap_or_default(),
            recipe_content: r.recipe_content.unwrap_or_default(),
            meal_type: r
                .meal_type
                .and_then(|s| s.parse().ok())
                .unwrap_or_default(),
            saved_at: r.saved_at,
        })
        .collect();
    Ok(Json(items))
}

#[instrument(skip(state))]
pub async fn delete_recipe(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    let user_id = identity.registered("delete recipes")?;
    repo::delete(&state.db, id, user_id).await?;
    Ok(Json(serde_json::json!({
        "message": "Recipe deleted successfully"
    })))
}
