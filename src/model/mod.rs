// Domain types and pure logic: wire formats, period normalization, menu
// filtering, and nutrition aggregation. Nothing in here performs IO.
pub mod filter;
pub mod menu;
pub mod nutrition;
pub mod period;
pub mod plan;

pub use filter::{AllergenMode, MenuFilter};
pub use menu::{DayMenu, MenuItem, Station};
pub use period::{NormalizedPeriod, normalize_period, resolve_bucket};
pub use plan::{DailyPlan, MealBucket, MealItem, WeekPlan};
