use sqlx::PgPool;
use tracing::info;

use crate::recipes::services::infer_meal_type;

/// Create missing tables and apply additive column evolution. Idempotent;
/// runs at every startup.
pub async fn ensure_schema(db: &PgPool) -> sqlx::Result<()> {
    let statements = [
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id BIGSERIAL PRIMARY KEY,
            username VARCHAR(50) UNIQUE NOT NULL,
            email VARCHAR(100) UNIQUE NOT NULL,
            password_hash VARCHAR(255) NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS user_profiles (
            id BIGSERIAL PRIMARY KEY,
            user_id BIGINT REFERENCES users(id) ON DELETE CASCADE,
            name VARCHAR(100),
            age INTEGER,
            gender VARCHAR(20),
            weight FLOAT,
            height FLOAT,
            activity_level VARCHAR(50),
            goal VARCHAR(50),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP,
            UNIQUE(user_id)
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS user_nutrition (
            id BIGSERIAL PRIMARY KEY,
            user_id BIGINT REFERENCES users(id) ON DELETE CASCADE,
            carbs INTEGER,
            protein INTEGER,
            fat INTEGER,
            calories INTEGER,
            updated_at TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP,
            UNIQUE(user_id)
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS nutrition_history (
            id BIGSERIAL PRIMARY KEY,
            user_id BIGINT REFERENCES users(id) ON DELETE CASCADE,
            carbs INTEGER,
            protein INTEGER,
            fat INTEGER,
            calories INTEGER,
            recorded_at TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS analysis_results (
            id BIGSERIAL PRIMARY KEY,
            user_id BIGINT REFERENCES users(id) ON DELETE CASCADE,
            analysis_text TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS feedback (
            id BIGSERIAL PRIMARY KEY,
            user_id BIGINT REFERENCES users(id) ON DELETE SET NULL,
            rating FLOAT NOT NULL,
            comment TEXT,
            created_at TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS saved_recipes (
            id BIGSERIAL PRIMARY KEY,
            user_id BIGINT REFERENCES users(id) ON DELETE CASCADE,
            recipe_title TEXT,
            recipe_content TEXT,
            saved_at TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    ];

    for ddl in statements {
        sqlx::query(ddl).execute(db).await?;
    }

    ensure_meal_type_column(db).await
}

/// Additive evolution for `saved_recipes.meal_type`: add the column when
/// absent, then backfill existing rows with the same inference rule used
/// for new saves.
async fn ensure_meal_type_column(db: &PgPool) -> sqlx::Result<()> {
    let present: Option<(i32,)> = sqlx::query_as(
        r#"
        SELECT 1
        FROM information_schema.columns
        WHERE table_name = 'saved_recipes' AND column_name = 'meal_type'
        "#,
    )
    .fetch_optional(db)
    .await?;

    if present.is_some() {
        return Ok(());
    }

    sqlx::query("ALTER TABLE saved_recipes ADD COLUMN meal_type TEXT DEFAULT 'Other'")
        .execute(db)
        .await?;
    info!("added meal_type column to saved_recipes");

    backfill_meal_types(db).await
}

async fn backfill_meal_types(db: &PgPool) -> sqlx::Result<()> {
    let rows: Vec<(i64, Option<String>, Option<String>)> = sqlx::query_as(
        r#"
        SELECT id, recipe_title, recipe_content
        FROM saved_recipes
        "#,
    )
    .fetch_all(db)
    .await?;

    let total = rows.len();
    for (id, title, content) in rows {
        let meal_type = infer_meal_type(
            title.as_deref().unwrap_or_default(),
            content.as_deref().unwrap_or_default(),
        );
        sqlx::query("UPDATE saved_recipes SET meal_type = $1 WHERE id = $2")
            .bind(meal_type.to_string())
            .bind(id)
            .execute(db)
            .await?;
    }

    if total > 0 {
        info!(rows = total, "backfilled recipe meal types");
    }
    Ok(())
}
