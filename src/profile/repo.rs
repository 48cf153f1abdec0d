use sqlx::{FromRow, PgPool};
use tracing::warn;

use crate::profile::dto::{NutritionTarget, Profile};

/// Result of a profile lookup. The no-row and connection-failure cases are
/// deliberately kept apart here even though the API renders `Found` and
/// `Missing` the same way (a default-overlaid profile).
#[derive(Debug)]
pub enum ProfileLookup {
    Found(Profile),
    Missing,
    Unavailable(sqlx::Error),
}

#[derive(Debug, FromRow)]
struct ProfileRow {
    name: Option<String>,
    age: Option<i32>,
    gender: Option<String>,
    weight: Option<f64>,
    height: Option<f64>,
    activity_level: Option<String>,
    goal: Option<String>,
}

#[derive(Debug, FromRow)]
struct NutritionRow {
    carbs: Option<i32>,
    protein: Option<i32>,
    fat: Option<i32>,
    calories: Option<i32>,
}

/// Upsert the profile row and, when present, the nutrition row. Exactly one
/// row per user in each table; concurrent writers race last-write-wins.
pub async fn save_profile(db: &PgPool, user_id: i64, profile: &Profile) -> sqlx::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO user_profiles
            (user_id, name, age, gender, weight, height, activity_level, goal)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        ON CONFLICT (user_id)
        DO UPDATE SET
            name = EXCLUDED.name,
            age = EXCLUDED.age,
            gender = EXCLUDED.gender,
            weight = EXCLUDED.weight,
            height = EXCLUDED.height,
            activity_level = EXCLUDED.activity_level,
            goal = EXCLUDED.goal,
            updated_at = CURRENT_TIMESTAMP
        "#,
    )
    .bind(user_id)
    .bind(&profile.name)
    .bind(profile.age)
    .bind(profile.gender.to_string())
    .bind(profile.weight_kg)
    .bind(profile.height_cm)
    .bind(profile.activity_level.to_string())
    .bind(profile.goal.to_string())
    .execute(db)
    .await?;

    if let Some(nutrition) = &profile.nutrition {
        sqlx::query(
            r#"
            INSERT INTO user_nutrition (user_id, carbs, protein, fat, calories)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (user_id)
            DO UPDATE SET
                carbs = EXCLUDED.carbs,
                protein = EXCLUDED.protein,
                fat = EXCLUDED.fat,
                calories = EXCLUDED.calories,
                updated_at = CURRENT_TIMESTAMP
            "#,
        )
        .bind(user_id)
        .bind(nutrition.carbs_g)
        .bind(nutrition.protein_g)
        .bind(nutrition.fat_g)
        .bind(nutrition.calories)
        .execute(db)
        .await?;
    }

    Ok(())
}

/// Load the stored profile, overlaying row values on the form defaults.
/// Absence of a profile row is `Missing`; any query failure is
/// `Unavailable`, never conflated with absence.
pub async fn load_profile(db: &PgPool, user_id: i64) -> ProfileLookup {
    let row = match sqlx::query_as::<_, ProfileRow>(
        r#"
        SELECT name, age, gender, weight, height, activity_level, goal
        FROM user_profiles
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(db)
    .await
    {
        Ok(Some(row)) => row,
        Ok(None) => return ProfileLookup::Missing,
        Err(e) => {
            warn!(error = %e, user_id, "profile lookup failed");
            return ProfileLookup::Unavailable(e);
        }
    };

    let nutrition = match sqlx::query_as::<_, NutritionRow>(
        r#"
        SELECT carbs, protein, fat, calories
        FROM user_nutrition
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(db)
    .await
    {
        Ok(row) => row,
        Err(e) => {
            warn!(error = %e, user_id, "nutrition lookup failed");
            return ProfileLookup::Unavailable(e);
        }
    };

    let mut profile = Profile {
        name: row.name.unwrap_or_default(),
        age: row.age.unwrap_or_default(),
        gender: row
            .gender
            .and_then(|s| s.parse().ok())
            .unwrap_or_default(),
        weight_kg: row.weight.unwrap_or_default(),
        height_cm: row.height.unwrap_or_default(),
        activity_level: row
            .activity_level
            .and_then(|s| s.parse().ok())
            .unwrap_or_default(),
        goal: row.goal.and_then(|s| s.parse().ok()).unwrap_or_default(),
        nutrition: None,
    };
    profile.nutrition = nutrition.map(|n| NutritionTarget {
        carbs_g: n.carbs.unwrap_or_default(),
        protein_g: n.protein.unwrap_or_default(),
        fat_g: n.fat.unwrap_or_default(),
        calories: n.calories.unwrap_or_default(),
    });

    ProfileLookup::Found(profile)
}
