use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use tracing::info;

/// Append feedback; `user_id` is NULL for anonymous submissions.
pub async fn insert(
    db: &PgPool,
    user_id: Option<i64>,
    rating: f64,
    comment: Option<&str>,
) -> sqlx::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO feedback (user_id, rating, comment)
        VALUES ($1, $2, $3)
        "#,
    )
    .bind(user_id)
    .bind(rating)
    .bind(comment)
    .execute(db)
    .await?;
    info!(rating, anonymous = user_id.is_none(), "feedback saved");
    Ok(())
}

pub async fn average_and_count(db: &PgPool) -> sqlx::Result<(Option<f64>, i64)> {
    let row: (Option<f64>, i64) =
        sqlx::query_as(r#"SELECT AVG(rating), COUNT(*) FROM feedback"#)
            .fetch_one(db)
            .await?;
    Ok(row)
}

#[derive(Debug, FromRow)]
pub struct CommentRow {
    pub comment: String,
    pub rating: f64,
    pub created_at: OffsetDateTime,
}

pub async fn recent_comments(db: &PgPool, limit: i64) -> sqlx::Result<Vec<CommentRow>> {
    sqlx::query_as::<_, CommentRow>(
        r#"
        SELECT comment, rating, created_at
        FROM feedback
        WHERE comment IS NOT NULL AND comment != ''
        ORDER BY created_at DESC
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(db)
    .await
}
