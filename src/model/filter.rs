// File: ./src/model/filter.rs
// Logic for filtering a day menu's stations by search text and allergens.
//
// Filtering is pure recomputation over the snapshot: no memory of prior
// results, and running the same filter twice yields the same output. An item
// must pass both the search predicate and the allergen predicate; stations
// left empty afterwards are dropped entirely.
use crate::model::menu::{MenuItem, Station};
use std::collections::HashSet;

/// Whether the selected allergens hide matching items or are the only items
/// shown. Exclude is the default, matching the common "hide what I cannot
/// eat" use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AllergenMode {
    #[default]
    Exclude,
    Include,
}

#[derive(Debug, Clone, Default)]
pub struct MenuFilter {
    pub search: String,
    pub allergens: HashSet<String>,
    pub mode: AllergenMode,
}

impl MenuFilter {
    pub fn new(search: impl Into<String>, allergens: HashSet<String>, mode: AllergenMode) -> Self {
        Self {
            search: search.into(),
            allergens,
            mode,
        }
    }

    /// True when the filter matches everything.
    pub fn is_empty(&self) -> bool {
        self.search.trim().is_empty() && self.allergens.is_empty()
    }

    /// Search predicate: case-insensitive substring against name OR
    /// description OR ingredients; an empty search matches everything.
    fn matches_search(&self, item: &MenuItem) -> bool {
        let needle = self.search.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }

        let name_match = item.item_name.to_lowercase().contains(&needle);
        let desc_match = item
            .item_description
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains(&needle));
        let ingr_match = item
            .ingredients
            .as_deref()
            .is_some_and(|i| i.to_lowercase().contains(&needle));

        name_match || desc_match || ingr_match
    }

    /// Allergen predicate: exclude drops on intersection with the selected
    /// set, include keeps only on intersection; an empty set matches
    /// everything regardless of mode.
    fn matches_allergens(&self, item: &MenuItem) -> bool {
        if self.allergens.is_empty() {
            return true;
        }

        let hit = item
            .allergens
            .iter()
            .any(|a| self.allergens.contains(&a.name));

        match self.mode {
            AllergenMode::Exclude => !hit,
            AllergenMode::Include => hit,
        }
    }

    pub fn matches(&self, item: &MenuItem) -> bool {
        self.matches_search(item) && self.matches_allergens(item)
    }

    /// Apply the filter to a station list, keeping only matching items and
    /// pruning stations that end up empty. Side classification does not
    /// affect inclusion; sides are filtered like main items.
    pub fn filter_stations(&self, stations: &[Station]) -> Vec<Station> {
        stations
            .iter()
            .map(|station| {
                let menu_items: Vec<MenuItem> = station
                    .menu_items
                    .iter()
                    .filter(|item| self.matches(item))
                    .cloned()
                    .collect();
                Station {
                    id: station.id,
                    name: station.name.clone(),
                    number: station.number.clone(),
                    menu_items,
                }
            })
            .filter(|station| !station.menu_items.is_empty())
            .collect()
    }

    /// Number of items surviving the filter, for "Found N items" readouts.
    pub fn match_count(&self, stations: &[Station]) -> usize {
        stations
            .iter()
            .flat_map(|s| s.menu_items.iter())
            .filter(|item| self.matches(item))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::menu::Allergen;

    fn item(id: i64, name: &str, desc: Option<&str>, ingr: Option<&str>, allergens: &[&str]) -> MenuItem {
        MenuItem {
            id,
            item_name: name.to_string(),
            item_description: desc.map(String::from),
            ingredients: ingr.map(String::from),
            item_category: None,
            is_gluten: false,
            is_vegan: false,
            is_vegetarian: false,
            allergens: allergens
                .iter()
                .map(|a| Allergen {
                    name: a.to_string(),
                })
                .collect(),
            nutrition_info: None,
        }
    }

    fn station(id: i64, name: &str, items: Vec<MenuItem>) -> Station {
        Station {
            id,
            name: name.to_string(),
            number: String::new(),
            menu_items: items,
        }
    }

    #[test]
    fn test_search_matches_name_description_or_ingredients() {
        let f = MenuFilter::new("chicken", HashSet::new(), AllergenMode::Exclude);

        assert!(f.matches(&item(1, "Grilled Chicken", None, None, &[])));
        assert!(f.matches(&item(2, "Sandwich", Some("with chicken breast"), None, &[])));
        assert!(f.matches(&item(3, "Soup", None, Some("Chicken stock, celery"), &[])));
        assert!(!f.matches(&item(4, "Tofu Bowl", Some("vegan"), Some("tofu, rice"), &[])));
    }

    #[test]
    fn test_empty_search_matches_everything() {
        let f = MenuFilter::new("  ", HashSet::new(), AllergenMode::Exclude);
        assert!(f.matches(&item(1, "Anything", None, None, &["Milk"])));
    }

    #[test]
    fn test_allergen_exclude_and_include_modes() {
        let mut set = HashSet::new();
        set.insert("Milk".to_string());

        let exclude = MenuFilter::new("", set.clone(), AllergenMode::Exclude);
        assert!(!exclude.matches(&item(1, "Mac & Cheese", None, None, &["Milk", "Wheat"])));
        assert!(exclude.matches(&item(2, "Rice", None, None, &["Soy"])));

        let include = MenuFilter::new("", set, AllergenMode::Include);
        assert!(include.matches(&item(1, "Mac & Cheese", None, None, &["Milk", "Wheat"])));
        assert!(!include.matches(&item(2, "Rice", None, None, &["Soy"])));
    }

    #[test]
    fn test_empty_allergen_set_matches_regardless_of_mode() {
        let include = MenuFilter::new("", HashSet::new(), AllergenMode::Include);
        assert!(include.matches(&item(1, "Rice", None, None, &[])));
        assert!(include.matches(&item(2, "Mac", None, None, &["Milk"])));
    }

    #[test]
    fn test_empty_stations_are_pruned() {
        let stations = vec![
            station(1, "Grill", vec![item(1, "Burger", None, None, &[])]),
            station(2, "Salad Bar", vec![item(2, "Caesar", None, None, &["Eggs"])]),
        ];

        let mut set = HashSet::new();
        set.insert("Eggs".to_string());
        let f = MenuFilter::new("", set, AllergenMode::Exclude);

        let out = f.filter_stations(&stations);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].name, "Grill");
    }

    #[test]
    fn test_filter_is_idempotent() {
        let stations = vec![
            station(
                1,
                "Grill",
                vec![
                    item(1, "Cheeseburger", None, None, &["Milk"]),
                    item(2, "Hamburger", None, None, &[]),
                ],
            ),
            station(2, "Bakery", vec![item(3, "Muffin", None, None, &["Milk", "Eggs"])]),
        ];

        let mut set = HashSet::new();
        set.insert("Milk".to_string());
        let f = MenuFilter::new("burger", set, AllergenMode::Exclude);

        let once = f.filter_stations(&stations);
        let twice = f.filter_stations(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_empty_filter_returns_stations_unchanged() {
        let stations = vec![
            station(1, "Grill", vec![item(1, "Burger", None, None, &["Wheat"])]),
            station(2, "Salad Bar", vec![item(2, "Caesar", None, None, &[])]),
        ];

        let f = MenuFilter::default();
        assert!(f.is_empty());
        let out = f.filter_stations(&stations);
        assert_eq!(out, stations);
    }
}
