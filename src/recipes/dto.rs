use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use time::OffsetDateTime;

/// Meal slot a recipe belongs to. Stored as its display string in
/// `saved_recipes.meal_type`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
    #[default]
    Other,
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MealType::Breakfast => "Breakfast",
            MealType::Lunch => "Lunch",
            MealType::Dinner => "Dinner",
            MealType::Snack => "Snack",
            MealType::Other => "Other",
        };
        f.write_str(s)
    }
}

impl FromStr for MealType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Breakfast" => Ok(MealType::Breakfast),
            "Lunch" => Ok(MealType::Lunch),
            "Dinner" => Ok(MealType::Dinner),
            "Snack" => Ok(MealType::Snack),
            "Other" => Ok(MealType::Other),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SaveRecipeRequest {
    /// Full recipe text; when omitted, the session's last generated recipe
    /// is saved instead.
    pub content: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SavedRecipeItem {
    pub id: i64,
    pub recipe_title: String,
    pub recipe_content: String,
    pub meal_type: MealType,
    pub saved_at: OffsetDateTime,
}

#[derive(Debug, Serialize)]
pub struct GeneratedRecipe {
    pub recipe: String,
}

#[derive(Debug, Serialize)]
pub struct RecipeSaved {
    pub id: i64,
    pub recipe_title: String,
    pub meal_type: MealType,
    pub message: String,
}
