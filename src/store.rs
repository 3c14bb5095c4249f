// File: ./src/store.rs
// Client-side state for the planner: the selected date's daily plan, the
// surrounding week, and the currently browsed menu. Mutations are optimistic:
// the local state changes first, the request runs, and the settle step either
// adopts the server's answer or rolls back to the last known good value.
use crate::client::ApiClient;
use crate::error::ApiError;
use crate::model::menu::DayMenu;
use crate::model::nutrition;
use crate::model::plan::{
    AddMealItem, DailyPlan, MealBucket, MealItem, WeekPlan, SERVING_FLOOR, SERVING_STEP,
    quantize_servings,
};
use crate::week;
use chrono::NaiveDate;
use log::{debug, warn};
use std::collections::{HashMap, HashSet};

/// Identifies which menu a response belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuKey {
    pub hall: String,
    pub period: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepDirection {
    Increment,
    Decrement,
}

/// Local planner state. One instance per session; not thread-safe on its
/// own, callers serialize access.
#[derive(Debug, Default)]
pub struct PlanStore {
    pub selected_date: Option<NaiveDate>,
    pub daily: Option<DailyPlan>,
    pub week: Option<WeekPlan>,
    pub menu: Option<DayMenu>,
    menu_key: Option<MenuKey>,
    /// Item ids with a mutation in flight. A second mutation on the same id
    /// is silently ignored until the first settles.
    pending: HashSet<i64>,
    /// Last server-confirmed serving quantity per item, for rollback.
    last_good: HashMap<i64, f64>,
}

impl PlanStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pending(&self, id: i64) -> bool {
        self.pending.contains(&id)
    }

    /// Record which menu the next menu response must match.
    pub fn begin_menu_fetch(&mut self, hall: &str, period: &str) {
        self.menu_key = Some(MenuKey {
            hall: hall.to_string(),
            period: period.to_string(),
        });
    }

    /// Adopt a menu response, unless the user has since asked for a
    /// different hall or period.
    pub fn apply_menu(&mut self, menu: DayMenu) {
        let matches = self.menu_key.as_ref().is_some_and(|key| {
            key.hall == menu.dining_hall && key.period == menu.period.name
        });
        if !matches {
            debug!(
                "discarding stale menu response for {}/{}",
                menu.dining_hall, menu.period.name
            );
            return;
        }
        self.menu = Some(menu);
    }

    /// Adopt a daily plan response, unless the selection has moved on.
    pub fn apply_daily(&mut self, plan: DailyPlan) {
        if self.selected_date != Some(plan.date) {
            debug!("discarding stale daily plan for {}", plan.date);
            return;
        }
        self.daily = Some(plan);
    }

    /// Adopt a week plan response, unless the selected date left its window.
    pub fn apply_week(&mut self, plan: WeekPlan) {
        let matches = self
            .selected_date
            .is_some_and(|date| week::week_start(date) == plan.week_start_date);
        if !matches {
            debug!(
                "discarding stale week plan starting {}",
                plan.week_start_date
            );
            return;
        }
        self.week = Some(plan);
    }

    pub fn select_date(&mut self, date: NaiveDate) {
        self.selected_date = Some(date);
    }

    /// Optimistically step an item's servings by a quarter. Returns the new
    /// quantity to send to the server, or `None` when the step is a no-op:
    /// the item is unknown, a mutation is already pending on it, or a
    /// decrement would go below the floor.
    pub fn step_servings(&mut self, id: i64, direction: StepDirection) -> Option<f64> {
        if self.pending.contains(&id) {
            debug!("ignoring serving step on {id}: mutation already pending");
            return None;
        }

        let (previous, next) = {
            let daily = self.daily.as_mut()?;
            let item = daily.meals.find_mut(id)?;
            let previous = item.servings;
            let next = match direction {
                StepDirection::Increment => quantize_servings(previous + SERVING_STEP),
                StepDirection::Decrement => {
                    if previous <= SERVING_FLOOR {
                        return None;
                    }
                    quantize_servings((previous - SERVING_STEP).max(SERVING_FLOOR))
                }
            };
            item.set_servings(next);
            (previous, next)
        };

        self.last_good.entry(id).or_insert(previous);
        self.pending.insert(id);
        self.recompute_totals();
        Some(next)
    }

    /// Settle a serving mutation: adopt the server's item on success, roll
    /// back to the last known good quantity on failure.
    pub fn settle_servings(&mut self, id: i64, result: Result<MealItem, ApiError>) {
        self.pending.remove(&id);
        match result {
            Ok(confirmed) => {
                self.last_good.insert(id, confirmed.servings);
                if let Some(daily) = self.daily.as_mut()
                    && let Some(item) = daily.meals.find_mut(id)
                {
                    *item = confirmed;
                }
            }
            Err(err) => {
                warn!("serving update for {id} failed, rolling back: {err}");
                if let Some(good) = self.last_good.get(&id).copied()
                    && let Some(daily) = self.daily.as_mut()
                    && let Some(item) = daily.meals.find_mut(id)
                {
                    item.set_servings(good);
                }
            }
        }
        self.recompute_totals();
    }

    /// Optimistically remove an item from the plan. Returns the removed item
    /// so the delete request can be issued; `None` when the item is unknown
    /// or already has a pending mutation.
    pub fn remove_item(&mut self, id: i64) -> Option<MealItem> {
        if self.pending.contains(&id) {
            debug!("ignoring delete on {id}: mutation already pending");
            return None;
        }
        let removed = self.daily.as_mut()?.meals.remove(id)?;
        self.pending.insert(id);
        self.recompute_totals();
        Some(removed)
    }

    /// Settle a delete. A failed delete does NOT restore the item locally:
    /// the server state is unknown, so the caller must refetch the day.
    pub fn settle_delete(&mut self, id: i64, result: Result<(), ApiError>) -> Result<(), ApiError> {
        self.pending.remove(&id);
        self.last_good.remove(&id);
        if let Err(err) = &result {
            warn!("delete of {id} failed, plan needs a refetch: {err}");
        }
        result
    }

    /// Insert a server-confirmed item into its bucket.
    pub fn insert_item(&mut self, item: MealItem) {
        self.last_good.insert(item.id, item.servings);
        if let Some(daily) = self.daily.as_mut() {
            daily.meals.insert(item);
        }
        self.recompute_totals();
    }

    fn recompute_totals(&mut self) {
        if let Some(daily) = self.daily.as_mut() {
            let totals = nutrition::day_totals(&daily.meals);
            daily.total_calories = totals.calories;
            daily.total_protein = totals.protein;
            daily.total_carbs = totals.carbs;
            daily.total_fat = totals.fat;
        }
    }
}

/// Step an item's servings and push the change to the server, settling the
/// store either way. Returns the committed quantity, `None` when the step
/// was a local no-op.
pub async fn commit_servings(
    client: &ApiClient,
    store: &mut PlanStore,
    id: i64,
    direction: StepDirection,
) -> Result<Option<f64>, ApiError> {
    let Some(next) = store.step_servings(id, direction) else {
        return Ok(None);
    };
    let result = client.update_servings(id, next).await;
    let failure = result.as_ref().err().cloned();
    store.settle_servings(id, result);
    match failure {
        Some(err) => Err(err),
        None => Ok(Some(next)),
    }
}

/// Remove an item locally and delete it on the server. On failure the local
/// copy stays gone and the error propagates so the caller can refetch.
pub async fn commit_delete(
    client: &ApiClient,
    store: &mut PlanStore,
    id: i64,
) -> Result<bool, ApiError> {
    if store.remove_item(id).is_none() {
        return Ok(false);
    }
    let result = client.delete_meal_item(id).await;
    store.settle_delete(id, result)?;
    Ok(true)
}

/// Add a menu item to the plan. The bucket must already be resolved (see
/// `model::period::resolve_bucket`); an ambiguous period never reaches this
/// function.
pub async fn add_to_plan(
    client: &ApiClient,
    store: &mut PlanStore,
    date: NaiveDate,
    menu_item_id: i64,
    bucket: MealBucket,
    servings: Option<f64>,
) -> Result<MealItem, ApiError> {
    let body = AddMealItem {
        date,
        menu_item_id,
        meal_type: bucket,
        servings,
    };
    let created = client.add_meal_item(&body).await?;
    if store.selected_date == Some(date) {
        store.insert_item(created.clone());
    }
    Ok(created)
}
