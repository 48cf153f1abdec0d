use serde::{Deserialize, Serialize};
use time::Date;

/// One charted day: the day's latest snapshot plus the macro split in
/// integer percent.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct DailyNutrition {
    pub date: Date,
    pub carbs_g: i32,
    pub protein_g: i32,
    pub fat_g: i32,
    pub calories: i32,
    pub carbs_pct: i32,
    pub protein_pct: i32,
    pub fat_pct: i32,
}

impl DailyNutrition {
    pub fn new(date: Date, carbs_g: i32, protein_g: i32, fat_g: i32, calories: i32) -> Self {
        let (carbs_pct, protein_pct, fat_pct) = macro_percentages(carbs_g, protein_g, fat_g);
        Self {
            date,
            carbs_g,
            protein_g,
            fat_g,
            calories,
            carbs_pct,
            protein_pct,
            fat_pct,
        }
    }
}

/// Share of total macro grams, rounded to whole percent. An all-zero day
/// renders as 0/0/0 rather than dividing by zero.
pub fn macro_percentages(carbs_g: i32, protein_g: i32, fat_g: i32) -> (i32, i32, i32) {
    let total = carbs_g + protein_g + fat_g;
    if total == 0 {
        return (0, 0, 0);
    }
    let pct = |g: i32| (f64::from(g) / f64::from(total) * 100.0).round() as i32;
    (pct(carbs_g), pct(protein_g), pct(fat_g))
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentages_sum_close_to_hundred() {
        let (c, p, f) = macro_percentages(250, 120, 60);
        assert_eq!(c, 58);
        assert_eq!(p, 28);
        assert_eq!(f, 14);
        assert_eq!(c + p + f, 100);
    }

    #[test]
    fn zero_day_does_not_divide_by_zero() {
        assert_eq!(macro_percentages(0, 0, 0), (0, 0, 0));
    }

    #[test]
    fn single_macro_day_is_all_of_it() {
        assert_eq!(macro_percentages(150, 0, 0), (100, 0, 0));
    }
}
