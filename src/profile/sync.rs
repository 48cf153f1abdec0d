use sqlx::PgPool;
use tracing::{debug, info};

use crate::error::AppError;
use crate::profile::dto::Profile;
use crate::profile::repo::{self, ProfileLookup};

/// Merge a session-held profile with the stored one. Each demographic field
/// keeps the session value unless it is falsy (empty string, zero, or the
/// enum's form default), in which case storage wins. Nutrition flips the
/// priority: the stored target is kept whenever it exists with at least one
/// non-zero field, otherwise the session's. Intentional policy, not a bug.
pub fn merge_profiles(session: &Profile, stored: &Profile) -> Profile {
    let nutrition = match stored.nutrition {
        Some(target) if !target.is_empty() => Some(target),
        _ => session.nutrition,
    };

    Profile {
        name: if session.name.is_empty() {
            stored.name.clone()
        } else {
            session.name.clone()
        },
        age: if session.age == 0 { stored.age } else { session.age },
        gender: if session.gender == Default::default() {
            stored.gender
        } else {
            session.gender
        },
        weight_kg: if session.weight_kg == 0.0 {
            stored.weight_kg
        } else {
            session.weight_kg
        },
        height_cm: if session.height_cm == 0.0 {
            stored.height_cm
        } else {
            session.height_cm
        },
        activity_level: if session.activity_level == Default::default() {
            stored.activity_level
        } else {
            session.activity_level
        },
        goal: if session.goal == Default::default() {
            stored.goal
        } else {
            session.goal
        },
        nutrition,
    }
}

/// Reconcile the session profile with storage on login. Returns the profile
/// the session should adopt. Runs at most once per session lifetime (the
/// caller guards with the session's `synced` flag).
///
/// - storage missing, session present: persist the session profile verbatim
/// - storage present, session absent: adopt storage, no write
/// - both present: merge, write the merge back so both sides converge
/// - storage unreachable: fail; the session continues unpersisted and a
///   later call retries
pub async fn reconcile(
    db: &PgPool,
    user_id: i64,
    session_profile: Option<&Profile>,
) -> Result<Profile, AppError> {
    match repo::load_profile(db, user_id).await {
        ProfileLookup::Missing => {
            if let Some(profile) = session_profile {
                if !profile.is_blank() {
                    repo::save_profile(db, user_id, profile).await?;
                    info!(user_id, "session profile persisted on first sync");
                }
                Ok(profile.clone())
            } else {
                Ok(Profile::default())
            }
        }
        ProfileLookup::Found(stored) => match session_profile {
            None => {
                debug!(user_id, "adopting stored profile into session");
                Ok(stored)
            }
            Some(session) => {
                let merged = merge_profiles(session, &stored);
                repo::save_profile(db, user_id, &merged).await?;
                debug!(user_id, "merged session and stored profiles");
                Ok(merged)
            }
        },
        ProfileLookup::Unavailable(e) => Err(AppError::Persistence(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::dto::{ActivityLevel, Gender, Goal, NutritionTarget};

    fn stored() -> Profile {
        Profile {
            name: "Alex".into(),
            age: 45,
            gender: Gender::Female,
            weight_kg: 70.0,
            height_cm: 168.0,
            activity_level: ActivityLevel::VeryActive,
            goal: Goal::FatLoss,
            nutrition: Some(NutritionTarget {
                carbs_g: 100,
                protein_g: 150,
                fat_g: 50,
                calories: 1450,
            }),
        }
    }

    #[test]
    fn falsy_session_fields_fall_back_to_storage() {
        let session = Profile {
            weight_kg: 0.0,
            nutrition: Some(NutritionTarget::default()),
            ..Profile::default()
        };
        let merged = merge_profiles(&session, &stored());
        assert_eq!(merged.weight_kg, 70.0);
        assert_eq!(merged.age, 45);
        assert_eq!(merged.name, "Alex");
        assert_eq!(merged.gender, Gender::Female);
        assert_eq!(merged.activity_level, ActivityLevel::VeryActive);
        assert_eq!(merged.goal, Goal::FatLoss);
    }

    #[test]
    fn non_empty_session_fields_win() {
        let session = Profile {
            name: "Sam".into(),
            age: 30,
            gender: Gender::Other,
            weight_kg: 82.5,
            height_cm: 180.0,
            activity_level: ActivityLevel::Sedentary,
            goal: Goal::MuscleGain,
            nutrition: None,
        };
        let merged = merge_profiles(&session, &stored());
        assert_eq!(merged.name, "Sam");
        assert_eq!(merged.age, 30);
        assert_eq!(merged.gender, Gender::Other);
        assert_eq!(merged.weight_kg, 82.5);
        assert_eq!(merged.activity_level, ActivityLevel::Sedentary);
        assert_eq!(merged.goal, Goal::MuscleGain);
    }

    #[test]
    fn stored_nutrition_with_values_is_preferred() {
        let session = Profile {
            nutrition: Some(NutritionTarget {
                carbs_g: 999,
                protein_g: 999,
                fat_g: 999,
                calories: 999,
            }),
            ..Profile::default()
        };
        let merged = merge_profiles(&session, &stored());
        assert_eq!(merged.nutrition, stored().nutrition);
    }

    #[test]
    fn all_zero_stored_nutrition_yields_to_session() {
        let mut db_profile = stored();
        db_profile.nutrition = Some(NutritionTarget::default());
        let session = Profile {
            nutrition: Some(NutritionTarget {
                carbs_g: 250,
                protein_g: 120,
                fat_g: 60,
                calories: 2020,
            }),
            ..Profile::default()
        };
        let merged = merge_profiles(&session, &db_profile);
        assert_eq!(merged.nutrition, session.nutrition);
    }

    #[test]
    fn absent_stored_nutrition_yields_to_session() {
        let mut db_profile = stored();
        db_profile.nutrition = None;
        let session = Profile {
            nutrition: Some(NutritionTarget {
                carbs_g: 1,
                protein_g: 2,
                fat_g: 3,
                calories: 39,
            }),
            ..Profile::default()
        };
        let merged = merge_profiles(&session, &db_profile);
        assert_eq!(merged.nutrition, session.nutrition);
    }
}
