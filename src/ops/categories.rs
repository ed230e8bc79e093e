use std::collections::BTreeSet;

use crate::model::item::Record;
use crate::ops::sort::compare_names;

/// The catch-all category, always offered last in the picker
pub const OTHER: &str = "Other";

/// Vendor categories offered before the user has created any of their own
pub const DEFAULT_CATEGORIES: [&str; 19] = [
    "Photographer",
    "Caterer",
    "Florist",
    "DJ",
    "Venue",
    "Wedding Planner",
    "Officiant",
    "Baker",
    "Dress Shop",
    "Suit/Tux Rental",
    "Hair Stylist",
    "Makeup Artist",
    "Musician",
    "Stationery",
    "Transportation",
    "Rentals",
    "Favors",
    "Jeweler",
    "Videographer",
];

/// Distinct categories in use, sorted (the filter popover's checklist)
pub fn distinct_categories<T: Record>(items: &[T]) -> Vec<String> {
    let set: BTreeSet<&str> = items
        .iter()
        .map(|item| item.category())
        .filter(|c| !c.is_empty())
        .collect();
    let mut cats: Vec<String> = set.into_iter().map(str::to_string).collect();
    cats.sort_by(|a, b| compare_names(a, b));
    cats
}

/// Options for the category picker: defaults merged with the user's own,
/// de-duplicated and sorted, with "Other" pinned at the end.
pub fn picker_options(custom: &[String]) -> Vec<String> {
    let mut merged: BTreeSet<String> = DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect();
    merged.extend(custom.iter().map(|c| c.trim().to_string()).filter(|c| !c.is_empty()));
    merged.remove(OTHER);

    let mut options: Vec<String> = merged.into_iter().collect();
    options.sort_by(|a, b| compare_names(a, b));
    options.push(OTHER.to_string());
    options
}
