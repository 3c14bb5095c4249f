// File: ./src/model/plan.rs
// Wire types for the personal meal plan: date-keyed daily plans holding four
// meal buckets of line items, weekly summaries, and the request bodies for
// the mutating endpoints.
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Serving quantities move in quarter-serving steps and never drop below a
/// quarter serving.
pub const SERVING_STEP: f64 = 0.25;
pub const SERVING_FLOOR: f64 = 0.25;

/// Snap a serving quantity to two decimal places (quarter steps survive
/// float arithmetic intact).
pub fn quantize_servings(servings: f64) -> f64 {
    (servings * 100.0).round() / 100.0
}

/// The unit of meal-plan organization. Not the same thing as a dining hall
/// serving period; see `model::period` for the mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealBucket {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealBucket {
    pub const ALL: [MealBucket; 4] = [
        MealBucket::Breakfast,
        MealBucket::Lunch,
        MealBucket::Dinner,
        MealBucket::Snack,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MealBucket::Breakfast => "Breakfast",
            MealBucket::Lunch => "Lunch",
            MealBucket::Dinner => "Dinner",
            MealBucket::Snack => "Snack",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MealBucket::Breakfast => "breakfast",
            MealBucket::Lunch => "lunch",
            MealBucket::Dinner => "dinner",
            MealBucket::Snack => "snack",
        }
    }
}

impl fmt::Display for MealBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One plan line item. Owned by the user's plan; the menu item it points to
/// is referenced by id with a snapshot of its name and provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealItem {
    pub id: i64,
    pub menu_item_id: i64,
    pub menu_item_name: String,
    pub meal_type: MealBucket,
    pub servings: f64,
    pub calories_per_serving: f64,
    pub protein_per_serving: Option<f64>,
    pub carbs_per_serving: Option<f64>,
    pub fat_per_serving: Option<f64>,
    pub total_calories: f64,
    pub total_protein: f64,
    pub total_carbs: f64,
    pub total_fat: f64,
    #[serde(default)]
    pub dining_hall: String,
    #[serde(default)]
    pub station_name: String,
    #[serde(default)]
    pub added_at: String,
}

impl MealItem {
    /// Set the serving quantity and recompute the derived totals from the
    /// per-serving figures. Missing per-serving macros contribute zero to
    /// totals (display still says "unknown", that is the menu side's job).
    pub fn set_servings(&mut self, servings: f64) {
        self.servings = servings;
        self.total_calories = self.calories_per_serving * servings;
        self.total_protein = self.protein_per_serving.unwrap_or(0.0) * servings;
        self.total_carbs = self.carbs_per_serving.unwrap_or(0.0) * servings;
        self.total_fat = self.fat_per_serving.unwrap_or(0.0) * servings;
    }
}

/// The four meal buckets of one day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DayMeals {
    #[serde(default)]
    pub breakfast: Vec<MealItem>,
    #[serde(default)]
    pub lunch: Vec<MealItem>,
    #[serde(default)]
    pub dinner: Vec<MealItem>,
    #[serde(default)]
    pub snack: Vec<MealItem>,
}

impl DayMeals {
    pub fn bucket(&self, bucket: MealBucket) -> &[MealItem] {
        match bucket {
            MealBucket::Breakfast => &self.breakfast,
            MealBucket::Lunch => &self.lunch,
            MealBucket::Dinner => &self.dinner,
            MealBucket::Snack => &self.snack,
        }
    }

    pub fn bucket_mut(&mut self, bucket: MealBucket) -> &mut Vec<MealItem> {
        match bucket {
            MealBucket::Breakfast => &mut self.breakfast,
            MealBucket::Lunch => &mut self.lunch,
            MealBucket::Dinner => &mut self.dinner,
            MealBucket::Snack => &mut self.snack,
        }
    }

    pub fn iter_all(&self) -> impl Iterator<Item = &MealItem> {
        self.breakfast
            .iter()
            .chain(self.lunch.iter())
            .chain(self.dinner.iter())
            .chain(self.snack.iter())
    }

    pub fn find_mut(&mut self, id: i64) -> Option<&mut MealItem> {
        self.breakfast
            .iter_mut()
            .chain(self.lunch.iter_mut())
            .chain(self.dinner.iter_mut())
            .chain(self.snack.iter_mut())
            .find(|item| item.id == id)
    }

    /// Remove the item with the given id from whichever bucket holds it.
    pub fn remove(&mut self, id: i64) -> Option<MealItem> {
        for bucket in MealBucket::ALL {
            let items = self.bucket_mut(bucket);
            if let Some(pos) = items.iter().position(|item| item.id == id) {
                return Some(items.remove(pos));
            }
        }
        None
    }

    pub fn insert(&mut self, item: MealItem) {
        self.bucket_mut(item.meal_type).push(item);
    }

    pub fn meal_count(&self) -> usize {
        self.iter_all().count()
    }
}

/// Optional per-metric targets, attached to the plan (not per day).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Goals {
    pub calories: Option<f64>,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPlan {
    pub date: NaiveDate,
    pub total_calories: f64,
    pub total_protein: f64,
    pub total_carbs: f64,
    pub total_fat: f64,
    pub meals: DayMeals,
    #[serde(default)]
    pub goals: Goals,
}

/// One entry of a week summary. Always derived from daily plan data, never
/// stored on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub has_meals: bool,
    pub total_calories: f64,
    pub meal_count: u32,
    #[serde(default)]
    pub breakfast_count: u32,
    #[serde(default)]
    pub lunch_count: u32,
    #[serde(default)]
    pub dinner_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekPlan {
    #[serde(default)]
    pub plan_id: i64,
    pub week_start_date: NaiveDate,
    pub daily_calorie_goal: Option<f64>,
    pub daily_protein_goal: Option<f64>,
    pub daily_carbs_goal: Option<f64>,
    pub daily_fat_goal: Option<f64>,
    #[serde(default)]
    pub week_summary: Vec<DaySummary>,
}

impl WeekPlan {
    pub fn goals(&self) -> Goals {
        Goals {
            calories: self.daily_calorie_goal,
            protein: self.daily_protein_goal,
            carbs: self.daily_carbs_goal,
            fat: self.daily_fat_goal,
        }
    }
}

/// Body of POST /plan/add-item/. Servings defaults server-side to 1 when
/// omitted.
#[derive(Debug, Clone, Serialize)]
pub struct AddMealItem {
    pub date: NaiveDate,
    pub menu_item_id: i64,
    pub meal_type: MealBucket,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub servings: Option<f64>,
}

/// Body of PATCH /plan/goals/ -- a subset of the four goal fields.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GoalsUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_calorie_goal: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_protein_goal: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_carbs_goal: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_fat_goal: Option<f64>,
}
