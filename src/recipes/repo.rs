use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use tracing::info;

use crate::error::AppError;
use crate::recipes::dto::MealType;

#[derive(Debug, FromRow)]
pub struct RecipeRow {
    pub id: i64,
    pub recipe_title: Option<String>,
    pub recipe_content: Option<String>,
    pub meal_type: Option<String>,
    pub saved_at: OffsetDateTime,
}

/// Always inserts: repeated saves of similar content create new rows, kept
/// distinguishable by the timestamp suffix in the title.
pub async fn insert(
    db: &PgPool,
    user_id: i64,
    title: &str,
    content: &str,
    meal_type: MealType,
) -> sqlx::Result<i64> {
    let (id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO saved_recipes (user_id, recipe_title, recipe_content, meal_type)
        VALUES ($1, $2, $3, $4)
        RETURNING id
        "#,
    )
    .bind(user_id)
    .bind(title)
    .bind(content)
    .bind(meal_type.to_string())
    .fetch_one(db)
    .await?;
    info!(user_id, recipe_id = id, "recipe saved");
    Ok(id)
}

pub async fn list(db: &PgPool, user_id: i64) -> sqlx::Result<Vec<RecipeRow>> {
    sqlx::query_as::<_, RecipeRow>(
        r#"
        SELECT id, recipe_title, recipe_content, meal_type, saved_at
        FROM saved_recipes
        WHERE user_id = $1
        ORDER BY meal_type, saved_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await
}

/// Delete by `(id, user_id)` inside a transaction; zero rows affected rolls
/// back and reports NotFound.
pub async fn delete(db: &PgPool, recipe_id: i64, user_id: i64) -> Result<(), AppError> {
    let mut tx = db.begin().await?;

    let result = sqlx::query(
        r#"
        DELETE FROM saved_recipes
        WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(recipe_id)
    .bind(user_id)
    .execute(&mut *tx)
    .await?;

    if result.rows_affected() == 0 {
        tx.rollback().await?;
        return Err(AppError::NotFound("Recipe"));
    }

    tx.commit().await?;
    info!(user_id, recipe_id, "recipe deleted");
    Ok(())
}
