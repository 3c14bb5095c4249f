// File: ./src/model/period.rs
// Maps a free-text dining-period label ("Brunch Buffet", "Late Night Grill",
// "All Day") onto a plan bucket. The decision is purely lexical; when the
// label gives no answer the caller must ask the user and never re-infer.
use crate::model::plan::MealBucket;

/// Outcome of normalizing a period label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizedPeriod {
    Breakfast,
    Lunch,
    Dinner,
    /// Ambiguous label; plan insertion must block until a human picks one
    /// of the three concrete buckets.
    NeedsChoice,
}

impl NormalizedPeriod {
    pub fn bucket(self) -> Option<MealBucket> {
        match self {
            NormalizedPeriod::Breakfast => Some(MealBucket::Breakfast),
            NormalizedPeriod::Lunch => Some(MealBucket::Lunch),
            NormalizedPeriod::Dinner => Some(MealBucket::Dinner),
            NormalizedPeriod::NeedsChoice => None,
        }
    }

    pub fn needs_choice(self) -> bool {
        self == NormalizedPeriod::NeedsChoice
    }
}

/// Normalize a dining-period label into a plan bucket.
///
/// Case-insensitive substring checks, first match wins. The order below is
/// authoritative: labels like "Late Lunch" match several keywords and must
/// resolve by this exact sequence.
pub fn normalize_period(label: &str) -> NormalizedPeriod {
    let value = label.to_lowercase();

    if value.contains("breakfast") {
        return NormalizedPeriod::Breakfast;
    }
    if value.contains("brunch") {
        return NormalizedPeriod::Lunch;
    }
    if value.contains("lunch") {
        return NormalizedPeriod::Lunch;
    }
    if value.contains("dinner") {
        return NormalizedPeriod::Dinner;
    }
    if value.contains("late") {
        return NormalizedPeriod::Dinner;
    }

    // All-day stations or anything unusual
    NormalizedPeriod::NeedsChoice
}

/// Resolve the bucket an add-to-plan action should target. An explicit user
/// choice always wins; otherwise the normalized label decides. `None` means
/// the label was ambiguous and no choice was supplied: block the insertion.
pub fn resolve_bucket(period_label: &str, choice: Option<MealBucket>) -> Option<MealBucket> {
    if let Some(bucket) = choice {
        return Some(bucket);
    }
    normalize_period(period_label).bucket()
}
