use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stored as its display string in `user_profiles.gender`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    #[default]
    Male,
    Female,
    Other,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityLevel {
    Sedentary,
    #[serde(rename = "Lightly Active")]
    LightlyActive,
    #[default]
    #[serde(rename = "Moderately Active")]
    ModeratelyActive,
    #[serde(rename = "Very Active")]
    VeryActive,
    #[serde(rename = "Extra Active")]
    ExtraActive,
}

impl ActivityLevel {
    pub fn multiplier(self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::LightlyActive => 1.375,
            ActivityLevel::ModeratelyActive => 1.55,
            ActivityLevel::VeryActive => 1.725,
            ActivityLevel::ExtraActive => 1.9,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Goal {
    #[serde(rename = "Muscle Gain")]
    MuscleGain,
    #[serde(rename = "Fat Loss")]
    FatLoss,
    #[default]
    #[serde(rename = "Stay Active")]
    StayActive,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        };
        f.write_str(s)
    }
}

impl FromStr for Gender {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Male" => Ok(Gender::Male),
            "Female" => Ok(Gender::Female),
            "Other" => Ok(Gender::Other),
            _ => Err(()),
        }
    }
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ActivityLevel::Sedentary => "Sedentary",
            ActivityLevel::LightlyActive => "Lightly Active",
            ActivityLevel::ModeratelyActive => "Moderately Active",
            ActivityLevel::VeryActive => "Very Active",
            ActivityLevel::ExtraActive => "Extra Active",
        };
        f.write_str(s)
    }
}

impl FromStr for ActivityLevel {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Sedentary" => Ok(ActivityLevel::Sedentary),
            "Lightly Active" => Ok(ActivityLevel::LightlyActive),
            "Moderately Active" => Ok(ActivityLevel::ModeratelyActive),
            "Very Active" => Ok(ActivityLevel::VeryActive),
            "Extra Active" => Ok(ActivityLevel::ExtraActive),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Goal::MuscleGain => "Muscle Gain",
            Goal::FatLoss => "Fat Loss",
            Goal::StayActive => "Stay Active",
        };
        f.write_str(s)
    }
}

impl FromStr for Goal {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Muscle Gain" => Ok(Goal::MuscleGain),
            "Fat Loss" => Ok(Goal::FatLoss),
            "Stay Active" => Ok(Goal::StayActive),
            _ => Err(()),
        }
    }
}

/// Daily macro and calorie targets, in grams / kcal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NutritionTarget {
    pub carbs_g: i32,
    pub protein_g: i32,
    pub fat_g: i32,
    pub calories: i32,
}

impl NutritionTarget {
    /// True when every field is zero; such a target never wins a merge.
    pub fn is_empty(&self) -> bool {
        self.carbs_g == 0 && self.protein_g == 0 && self.fat_g == 0 && self.calories == 0
    }
}

/// A user's demographic profile plus (optionally) their nutrition targets.
/// Field defaults match what the UI seeds an untouched form with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub age: i32,
    #[serde(default)]
    pub gender: Gender,
    #[serde(default)]
    pub weight_kg: f64,
    #[serde(default)]
    pub height_cm: f64,
    #[serde(default)]
    pub activity_level: ActivityLevel,
    #[serde(default)]
    pub goal: Goal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nutrition: Option<NutritionTarget>,
}

impl Profile {
    /// True when the form was never filled in: nothing worth persisting.
    pub fn is_blank(&self) -> bool {
        self.name.is_empty()
            && self.age == 0
            && self.weight_kg == 0.0
            && self.height_cm == 0.0
            && self.nutrition.map_or(true, |n| n.is_empty())
    }
}

/// Shape returned by `GET /profile`: always fully populated, nutrition
/// zeros standing in for "never generated".
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    #[serde(flatten)]
    pub profile: Profile,
    pub nutrition: NutritionTarget,
}

impl From<Profile> for ProfileResponse {
    fn from(mut profile: Profile) -> Self {
        let nutrition = profile.nutrition.take().unwrap_or_default();
        Self { profile, nutrition }
    }
}

/// Outcome of a save that may quietly skip persistence for guests.
#[derive(Debug, Serialize)]
pub struct SaveOutcome {
    pub persisted: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct GeneratedNutrition {
    pub nutrition: NutritionTarget,
    pub persisted: bool,
}

#[derive(Debug, Serialize)]
pub struct AssessmentResponse {
    pub assessment: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enums_round_trip_through_stored_strings() {
        for level in [
            ActivityLevel::Sedentary,
            ActivityLevel::LightlyActive,
            ActivityLevel::ModeratelyActive,
            ActivityLevel::VeryActive,
            ActivityLevel::ExtraActive,
        ] {
            assert_eq!(level.to_string().parse::<ActivityLevel>(), Ok(level));
        }
        assert_eq!("Fat Loss".parse::<Goal>(), Ok(Goal::FatLoss));
        assert_eq!("Female".parse::<Gender>(), Ok(Gender::Female));
        assert!("fat loss".parse::<Goal>().is_err());
    }

    #[test]
    fn defaults_match_the_untouched_form() {
        let p = Profile::default();
        assert_eq!(p.gender, Gender::Male);
        assert_eq!(p.activity_level, ActivityLevel::ModeratelyActive);
        assert_eq!(p.goal, Goal::StayActive);
        assert!(p.is_blank());
    }

    #[test]
    fn profile_with_any_data_is_not_blank() {
        let p = Profile {
            weight_kg: 70.0,
            ..Profile::default()
        };
        assert!(!p.is_blank());

        let q = Profile {
            nutrition: Some(NutritionTarget {
                carbs_g: 100,
                protein_g: 0,
                fat_g: 0,
                calories: 400,
            }),
            ..Profile::default()
        };
        assert!(!q.is_blank());
    }

    #[test]
    fn profile_serde_uses_display_names() {
        let p = Profile {
            activity_level: ActivityLevel::VeryActive,
            goal: Goal::MuscleGain,
            ..Profile::default()
        };
        let json = serde_json::to_string(&p).unwrap();
        assert!(json.contains("\"Very Active\""));
        assert!(json.contains("\"Muscle Gain\""));
    }
}
