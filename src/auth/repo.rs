use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: OffsetDateTime,
}

impl User {
    pub async fn find_by_username(db: &PgPool, username: &str) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(db)
        .await
    }

    pub async fn find_by_id(db: &PgPool, id: i64) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }

    /// True when another account already holds the username or email.
    pub async fn name_or_email_taken(
        db: &PgPool,
        username: &str,
        email: &str,
        exclude_id: Option<i64>,
    ) -> sqlx::Result<bool> {
        let row: Option<(i64,)> = sqlx::query_as(
            r#"
            SELECT id FROM users
            WHERE (username = $1 OR email = $2) AND id != COALESCE($3, -1)
            LIMIT 1
            "#,
        )
        .bind(username)
        .bind(email)
        .bind(exclude_id)
        .fetch_optional(db)
        .await?;
        Ok(row.is_some())
    }

    /// Create a new user with hashed password.
    pub async fn create(
        db: &PgPool,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> sqlx::Result<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, username, email, password_hash, created_at
            "#,
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .fetch_one(db)
        .await
    }

    /// Update username/email, and the password hash when one is supplied.
    pub async fn update_account(
        db: &PgPool,
        id: i64,
        username: &str,
        email: &str,
        password_hash: Option<&str>,
    ) -> sqlx::Result<()> {
        match password_hash {
            Some(hash) => {
                sqlx::query(
                    r#"
                    UPDATE users
                    SET username = $1, email = $2, password_hash = $3
                    WHERE id = $4
                    "#,
                )
                .bind(username)
                .bind(email)
                .bind(hash)
                .bind(id)
                .execute(db)
                .await?;
            }
            None => {
                sqlx::query(
                    r#"
                    UPDATE users
                    SET username = $1, email = $2
                    WHERE id = $3
                    "#,
                )
                .bind(username)
                .bind(email)
                .bind(id)
                .execute(db)
                .await?;
            }
        }
        Ok(())
    }
}
