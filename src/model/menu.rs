// File: ./src/model/menu.rs
// Wire types for the menu side of the API: a day's menu is one serving
// period holding stations, each station an ordered list of items. These are
// read-only snapshots; nothing here is mutated after deserialization.
use serde::{Deserialize, Serialize};

/// Upstream sentinel meaning the vendor never supplied allergen data.
pub const ALLERGEN_UNKNOWN: &str = "Information Not Available";
/// What the sentinel must be rendered as, everywhere allergens are shown.
pub const ALLERGEN_UNKNOWN_DISPLAY: &str = "Incomplete Allergen Info";

/// Per-serving nutrition facts. The backend sends every field as a nullable
/// string; values that are missing or fail to parse display as "unknown" and
/// are never shown as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionFacts {
    pub calories: Option<String>,
    pub protein: Option<String>,
    pub total_carbohydrates: Option<String>,
    pub cholesterol: Option<String>,
    pub total_fat: Option<String>,
    pub trans_fat: Option<String>,
    pub saturated_fat: Option<String>,
    pub total_sugars: Option<String>,
    pub dietary_fiber: Option<String>,
    pub sodium: Option<String>,
    pub serving_size: Option<String>,
}

/// Parse one numeric-as-string nutrition value. Anything that is not a
/// finite number counts as absent.
pub fn parse_numeric(raw: Option<&str>) -> Option<f64> {
    raw?.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Format a nutrition value for display: rounded number, or "unknown".
pub fn display_numeric(raw: Option<&str>) -> String {
    match parse_numeric(raw) {
        Some(v) => format!("{}", v.round()),
        None => "unknown".to_string(),
    }
}

impl NutritionFacts {
    pub fn calories_value(&self) -> Option<f64> {
        parse_numeric(self.calories.as_deref())
    }

    pub fn protein_value(&self) -> Option<f64> {
        parse_numeric(self.protein.as_deref())
    }

    pub fn carbs_value(&self) -> Option<f64> {
        parse_numeric(self.total_carbohydrates.as_deref())
    }

    pub fn fat_value(&self) -> Option<f64> {
        parse_numeric(self.total_fat.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allergen {
    pub name: String,
}

impl Allergen {
    /// Display name with the upstream "no data" sentinel rewritten.
    pub fn display_name(&self) -> &str {
        if self.name == ALLERGEN_UNKNOWN {
            ALLERGEN_UNKNOWN_DISPLAY
        } else {
            &self.name
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: i64,
    pub item_name: String,
    pub item_description: Option<String>,
    pub ingredients: Option<String>,
    pub item_category: Option<String>,
    #[serde(default)]
    pub is_gluten: bool,
    #[serde(default)]
    pub is_vegan: bool,
    #[serde(default)]
    pub is_vegetarian: bool,
    #[serde(default)]
    pub allergens: Vec<Allergen>,
    pub nutrition_info: Option<NutritionFacts>,
}

impl MenuItem {
    /// Parsed calories, if the backend sent a usable number.
    pub fn calories(&self) -> Option<f64> {
        self.nutrition_info.as_ref().and_then(|n| n.calories_value())
    }

    /// An item is a "main item" when it carries calories > 0; everything
    /// else (unparsable or zero calories) renders in the sides bucket.
    pub fn is_main_item(&self) -> bool {
        self.calories().is_some_and(|c| c.round() > 0.0)
    }

    pub fn allergen_names(&self) -> Vec<&str> {
        self.allergens.iter().map(|a| a.name.as_str()).collect()
    }

    /// Allergen names for display, sentinel rewritten.
    pub fn allergen_display(&self) -> Vec<&str> {
        self.allergens.iter().map(|a| a.display_name()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub number: String,
    #[serde(default)]
    pub menu_items: Vec<MenuItem>,
}

impl Station {
    pub fn main_items(&self) -> Vec<&MenuItem> {
        self.menu_items.iter().filter(|i| i.is_main_item()).collect()
    }

    pub fn sides(&self) -> Vec<&MenuItem> {
        self.menu_items.iter().filter(|i| !i.is_main_item()).collect()
    }
}

/// A dining hall's named serving window (free text: "Breakfast", "Brunch",
/// "Late Night", ...). Distinct from the plan's meal buckets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Period {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub vendor_id: String,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
    #[serde(default)]
    pub stations: Vec<Station>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HallHours {
    #[serde(default)]
    pub open_time: String,
    #[serde(default)]
    pub close_time: String,
}

/// One hall's menu for one date, holding the single active period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayMenu {
    pub dining_hall: String,
    pub date: String,
    pub day_name: String,
    #[serde(default)]
    pub hall_hours: HallHours,
    pub period: Period,
}

/// One entry of the hall's currently offered periods. An empty list from the
/// server means the hall is closed today.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodOption {
    pub key: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AvailablePeriods {
    #[serde(default)]
    pub periods: Vec<PeriodOption>,
}
