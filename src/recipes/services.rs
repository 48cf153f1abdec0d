use time::macros::format_description;
use time::OffsetDateTime;

use crate::recipes::dto::MealType;

/// Section headers that must not be mistaken for a dish name.
const GENERIC_HEADERS: [&str; 5] = [
    "ingredients:",
    "instructions:",
    "directions:",
    "steps:",
    "method:",
];

const TITLE_MAX_LEN: usize = 100;

/// Derive a recipe title from generated content: the second non-empty line
/// (recipes lead with a meal/nutrition banner, the dish name comes next),
/// unless that line is a generic section header, in which case the first
/// line is used. Markdown emphasis is stripped and the result truncated.
pub fn derive_title(content: &str) -> String {
    let mut non_empty = content.lines().map(str::trim).filter(|l| !l.is_empty());

    let first = non_empty.next().unwrap_or("Saved Recipe");
    let title = match non_empty.next() {
        Some(second) if !GENERIC_HEADERS.contains(&second.to_lowercase().as_str()) => second,
        _ => first,
    };

    let cleaned: String = title
        .chars()
        .filter(|c| *c != '#' && *c != '*')
        .collect::<String>()
        .trim()
        .to_string();
    cleaned.chars().take(TITLE_MAX_LEN).collect()
}

/// Keyword search over the title first, then the content; the explicit
/// meal-name words take precedence over dish-word heuristics.
pub fn infer_meal_type(title: &str, content: &str) -> MealType {
    let title = title.to_lowercase();
    let content = content.to_lowercase();

    for (keyword, meal) in [
        ("breakfast", MealType::Breakfast),
        ("lunch", MealType::Lunch),
        ("dinner", MealType::Dinner),
        ("snack", MealType::Snack),
    ] {
        if title.contains(keyword) || content.contains(keyword) {
            return meal;
        }
    }

    let title_has = |words: &[&str]| words.iter().any(|w| title.contains(w));
    if title_has(&["morning", "toast", "cereal", "oatmeal", "pancake"]) {
        MealType::Breakfast
    } else if title_has(&["sandwich", "salad", "soup"]) {
        MealType::Lunch
    } else if title_has(&["roast", "steak", "chicken", "fish", "supper"]) {
        MealType::Dinner
    } else if title_has(&["cookie", "bar", "nuts", "fruit"]) {
        MealType::Snack
    } else {
        MealType::Other
    }
}

/// Append the save timestamp so repeated saves of similar content keep
/// distinguishable titles.
pub fn timestamped_title(title: &str, now: OffsetDateTime) -> String {
    let fmt = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    format!("{} ({})", title, now.format(&fmt).unwrap_or_default())
}

/// Meal type for a save: an explicit session choice beats inference.
pub fn resolve_meal_type(
    session_choice: Option<MealType>,
    title: &str,
    content: &str,
) -> MealType {
    match session_choice {
        Some(meal) if meal != MealType::Other => meal,
        _ => infer_meal_type(title, content),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SALAD_RECIPE: &str =
        "Lunch (500 cal)\nGrilled Chicken Salad\nIngredients\nchicken\nlettuce";

    #[test]
    fn title_is_second_non_empty_line() {
        assert_eq!(derive_title(SALAD_RECIPE), "Grilled Chicken Salad");
    }

    #[test]
    fn title_skips_blank_lines() {
        let content = "\n\n**Dinner (700 cal)**\n\n  Herb Roasted Salmon  \nInstructions:";
        assert_eq!(derive_title(content), "Herb Roasted Salmon");
    }

    #[test]
    fn generic_header_second_line_falls_back_to_first() {
        let content = "Simple Oatmeal\nIngredients:\noats\nmilk";
        assert_eq!(derive_title(content), "Simple Oatmeal");
    }

    #[test]
    fn markdown_emphasis_is_stripped() {
        let content = "Breakfast\n## **Banana Pancakes**\nIngredients:";
        assert_eq!(derive_title(content), "Banana Pancakes");
    }

    #[test]
    fn long_titles_are_truncated() {
        let long = "x".repeat(300);
        let content = format!("header\n{long}\nmore");
        assert_eq!(derive_title(&content).len(), 100);
    }

    #[test]
    fn empty_content_falls_back_to_placeholder() {
        assert_eq!(derive_title(""), "Saved Recipe");
        assert_eq!(derive_title("\n\n"), "Saved Recipe");
    }

    #[test]
    fn timestamp_suffix_keeps_titles_distinguishable() {
        let now = time::macros::datetime!(2026-08-07 12:30:05 UTC);
        assert_eq!(
            timestamped_title("Grilled Chicken Salad", now),
            "Grilled Chicken Salad (2026-08-07 12:30:05)"
        );
    }

    #[test]
    fn meal_name_keywords_win() {
        assert_eq!(
            infer_meal_type("Quick Lunch Bowl", "rice and beans"),
            MealType::Lunch
        );
        assert_eq!(
            infer_meal_type("Protein Bowl", "great for breakfast"),
            MealType::Breakfast
        );
    }

    #[test]
    fn dish_words_classify_when_no_meal_name_present() {
        assert_eq!(infer_meal_type("Banana Oatmeal", ""), MealType::Breakfast);
        assert_eq!(infer_meal_type("Tomato Soup", ""), MealType::Lunch);
        assert_eq!(infer_meal_type("Pan-Seared Steak", ""), MealType::Dinner);
        assert_eq!(infer_meal_type("Trail Mix with Nuts", ""), MealType::Snack);
        assert_eq!(infer_meal_type("Mystery Dish", ""), MealType::Other);
    }

    #[test]
    fn session_choice_overrides_inference() {
        assert_eq!(
            resolve_meal_type(Some(MealType::Snack), "Grilled Chicken Salad", ""),
            MealType::Snack
        );
        // "Other" is the unset sentinel, inference still applies; "salad"
        // is checked before "chicken".
        assert_eq!(
            resolve_meal_type(Some(MealType::Other), "Grilled Chicken Salad", ""),
            MealType::Lunch
        );
        assert_eq!(
            resolve_meal_type(None, "Tomato Soup", ""),
            MealType::Lunch
        );
    }
}
