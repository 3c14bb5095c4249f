// File: ./src/model/nutrition.rs
// Reduces plan line items into calorie/macro totals per bucket and per day,
// and computes goal-completion percentages. Aggregation never fails: bad or
// missing input degrades to zero contributions.
use crate::model::plan::{DailyPlan, DayMeals, DaySummary, Goals, MealBucket, MealItem};
use chrono::NaiveDate;

// Fallback targets used when the user has not set a goal.
pub const DEFAULT_CALORIE_GOAL: f64 = 2000.0;
pub const DEFAULT_PROTEIN_GOAL: f64 = 150.0;
pub const DEFAULT_CARBS_GOAL: f64 = 250.0;
pub const DEFAULT_FAT_GOAL: f64 = 65.0;

/// Whole-day totals across all four buckets.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DayTotals {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

pub fn bucket_calories(items: &[MealItem]) -> f64 {
    items.iter().map(|i| i.total_calories).sum()
}

pub fn day_totals(meals: &DayMeals) -> DayTotals {
    let mut totals = DayTotals::default();
    for item in meals.iter_all() {
        totals.calories += item.total_calories;
        totals.protein += item.total_protein;
        totals.carbs += item.total_carbs;
        totals.fat += item.total_fat;
    }
    totals
}

/// Completion percentage for one metric, clamped to 100.
///
/// A missing goal falls back to the metric's default. A goal of zero (not
/// reachable through this crate, but possible in stored data) counts as
/// fully met rather than dividing by zero.
pub fn goal_percentage(current: f64, goal: Option<f64>, fallback: f64) -> u8 {
    let goal = match goal {
        Some(g) if g > 0.0 => g,
        Some(_) => return 100,
        None => fallback,
    };
    ((current / goal).min(1.0) * 100.0).round() as u8
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricProgress {
    pub current: f64,
    pub goal: f64,
    pub percentage: u8,
}

fn metric(current: f64, goal: Option<f64>, fallback: f64) -> MetricProgress {
    MetricProgress {
        current,
        goal: goal.filter(|g| *g > 0.0).unwrap_or(fallback),
        percentage: goal_percentage(current, goal, fallback),
    }
}

/// Progress against all four goals for one day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyProgress {
    pub calories: MetricProgress,
    pub protein: MetricProgress,
    pub carbs: MetricProgress,
    pub fat: MetricProgress,
}

pub fn daily_progress(totals: DayTotals, goals: Goals) -> DailyProgress {
    DailyProgress {
        calories: metric(totals.calories, goals.calories, DEFAULT_CALORIE_GOAL),
        protein: metric(totals.protein, goals.protein, DEFAULT_PROTEIN_GOAL),
        carbs: metric(totals.carbs, goals.carbs, DEFAULT_CARBS_GOAL),
        fat: metric(totals.fat, goals.fat, DEFAULT_FAT_GOAL),
    }
}

pub fn plan_progress(plan: &DailyPlan) -> DailyProgress {
    daily_progress(day_totals(&plan.meals), plan.goals)
}

/// Derive one week-summary entry from a day's buckets.
pub fn summarize_day(date: NaiveDate, meals: &DayMeals) -> DaySummary {
    let meal_count = meals.meal_count() as u32;
    DaySummary {
        date,
        has_meals: meal_count > 0,
        total_calories: day_totals(meals).calories,
        meal_count,
        breakfast_count: meals.bucket(MealBucket::Breakfast).len() as u32,
        lunch_count: meals.bucket(MealBucket::Lunch).len() as u32,
        dinner_count: meals.bucket(MealBucket::Dinner).len() as u32,
    }
}

/// Derive summaries for a whole window by reusing the per-day computation.
pub fn summarize_days<'a, I>(days: I) -> Vec<DaySummary>
where
    I: IntoIterator<Item = (NaiveDate, &'a DayMeals)>,
{
    days.into_iter()
        .map(|(date, meals)| summarize_day(date, meals))
        .collect()
}
