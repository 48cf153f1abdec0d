use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::error::AppError;

#[derive(Debug, FromRow)]
pub struct AnalysisRow {
    pub analysis_text: String,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, FromRow)]
pub struct PopularRow {
    pub analysis_text: String,
    pub count: i64,
}

#[derive(Debug, FromRow)]
pub struct TrendRow {
    pub analysis_text: String,
    pub first_appearance: OffsetDateTime,
}

pub async fn exists(db: &PgPool, user_id: i64, analysis_text: &str) -> sqlx::Result<bool> {
    let row: Option<(i32,)> = sqlx::query_as(
        r#"
        SELECT 1 FROM analysis_results
        WHERE user_id = $1 AND analysis_text = $2
        LIMIT 1
        "#,
    )
    .bind(user_id)
    .bind(analysis_text)
    .fetch_optional(db)
    .await?;
    Ok(row.is_some())
}

/// Insert unless the exact `(user_id, analysis_text)` pair is already
/// stored; idempotent under retry. Returns whether a row was written.
pub async fn record(db: &PgPool, user_id: i64, analysis_text: &str) -> sqlx::Result<bool> {
    if exists(db, user_id, analysis_text).await? {
        debug!(user_id, "analysis already recorded, skipping insert");
        return Ok(false);
    }

    sqlx::query(
        r#"
        INSERT INTO analysis_results (user_id, analysis_text)
        VALUES ($1, $2)
        "#,
    )
    .bind(user_id)
    .bind(analysis_text)
    .execute(db)
    .await?;
    info!(user_id, "analysis recorded");
    Ok(true)
}

/// Delete by exact pair inside a transaction; a zero-row match rolls back
/// and surfaces as NotFound, never a partial commit.
pub async fn delete(db: &PgPool, user_id: i64, analysis_text: &str) -> Result<(), AppError> {
    let mut tx = db.begin().await?;

    let result = sqlx::query(
        r#"
        DELETE FROM analysis_results
        WHERE user_id = $1 AND analysis_text = $2
        "#,
    )
    .bind(user_id)
    .bind(analysis_text)
    .execute(&mut *tx)
    .await?;

    if result.rows_affected() == 0 {
        tx.rollback().await?;
        return Err(AppError::NotFound("Analysis"));
    }

    tx.commit().await?;
    info!(user_id, "analysis deleted");
    Ok(())
}

pub async fn list(db: &PgPool, user_id: i64) -> sqlx::Result<Vec<AnalysisRow>> {
    sqlx::query_as::<_, AnalysisRow>(
        r#"
        SELECT analysis_text, created_at
        FROM analysis_results
        WHERE user_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await
}

/// Most frequent habit lines across all users.
pub async fn popular(db: &PgPool, limit: i64) -> sqlx::Result<Vec<PopularRow>> {
    sqlx::query_as::<_, PopularRow>(
        r#"
        SELECT analysis_text, COUNT(*) AS count
        FROM analysis_results
        GROUP BY analysis_text
        ORDER BY count DESC
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(db)
    .await
}

/// Habit lines by most recent first appearance anywhere in the table.
pub async fn trends(db: &PgPool, limit: i64) -> sqlx::Result<Vec<TrendRow>> {
    sqlx::query_as::<_, TrendRow>(
        r#"
        WITH first_appearances AS (
            SELECT analysis_text, MIN(created_at) AS first_appearance
            FROM analysis_results
            GROUP BY analysis_text
        )
        SELECT analysis_text, first_appearance
        FROM first_appearances
        ORDER BY first_appearance DESC
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(db)
    .await
}
