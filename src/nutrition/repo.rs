use sqlx::{FromRow, PgPool};
use time::Date;
use tracing::debug;

use crate::error::AppError;
use crate::identity::Identity;
use crate::profile::dto::NutritionTarget;

/// Append one nutrition snapshot. Append-only: rows are never updated or
/// deleted by normal flow. Anonymous identities fail gracefully with the
/// guest-mode message instead of reaching the database.
pub async fn record_snapshot(
    db: &PgPool,
    identity: &Identity,
    target: &NutritionTarget,
) -> Result<(), AppError> {
    let user_id = identity.registered("save nutrition history")?;

    sqlx::query(
        r#"
        INSERT INTO nutrition_history (user_id, carbs, protein, fat, calories)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(user_id)
    .bind(target.carbs_g)
    .bind(target.protein_g)
    .bind(target.fat_g)
    .bind(target.calories)
    .execute(db)
    .await?;

    debug!(user_id, calories = target.calories, "nutrition snapshot recorded");
    Ok(())
}

#[derive(Debug, FromRow)]
pub struct DailyRow {
    pub carbs: Option<i32>,
    pub protein: Option<i32>,
    pub fat: Option<i32>,
    pub calories: Option<i32>,
    pub entry_date: Date,
}

/// Latest snapshot per day, oldest first, capped at `limit` days.
pub async fn daily_history(db: &PgPool, user_id: i64, limit: i64) -> sqlx::Result<Vec<DailyRow>> {
    sqlx::query_as::<_, DailyRow>(
        r#"
        WITH latest_entries AS (
            SELECT
                carbs, protein, fat, calories,
                DATE(recorded_at) AS entry_date,
                ROW_NUMBER() OVER (
                    PARTITION BY DATE(recorded_at)
                    ORDER BY recorded_at DESC
                ) AS rn
            FROM nutrition_history
            WHERE user_id = $1
        )
        SELECT carbs, protein, fat, calories, entry_date
        FROM latest_entries
        WHERE rn = 1
        ORDER BY entry_date ASC
        LIMIT $2
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(db)
    .await
}
