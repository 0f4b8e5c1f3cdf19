//! # Inventory Level Calculator
//!
//! Joins projected purchases and monthly usage into purchased/used/net levels.
//! The join is driven by the purchase side: an ingredient that is used but was
//! never shipped has no level.

use crate::inventory_model::InventoryLevel;
use log::debug;
use std::collections::BTreeMap;

/// Inventory levels for every ingredient with a shipment definition
///
/// `used` defaults to zero when the ingredient was not consumed. `net` keeps its
/// sign here; flooring happens only in the re-order prediction. The result is
/// sorted by name (case-sensitive, byte order).
pub fn compute_levels(
    purchases: &BTreeMap<String, f64>,
    usage: &BTreeMap<String, f64>,
) -> Vec<InventoryLevel> {
    let mut levels: Vec<InventoryLevel> = purchases
        .iter()
        .map(|(name, purchased)| {
            let used = usage.get(name).copied().unwrap_or(0.0);
            InventoryLevel::new(name, *purchased, used)
        })
        .collect();
    levels.sort_by(|a, b| a.name.cmp(&b.name));

    let unshipped = usage.keys().filter(|name| !purchases.contains_key(*name)).count();
    if unshipped > 0 {
        debug!("{} used ingredients have no shipment and no inventory level", unshipped);
    }

    levels
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: &[(&str, f64)]) -> BTreeMap<String, f64> {
        entries
            .iter()
            .map(|(name, value)| (name.to_string(), *value))
            .collect()
    }

    #[test]
    fn test_net_is_exact_difference_and_may_be_negative() {
        let levels = compute_levels(
            &map(&[("Beef", 1000.0), ("Rice", 500.0)]),
            &map(&[("Beef", 1500.0), ("Rice", 120.0)]),
        );

        assert_eq!(levels[0], InventoryLevel::new("Beef", 1000.0, 1500.0));
        assert_eq!(levels[0].net, -500.0);
        assert_eq!(levels[1].net, 380.0);
    }

    #[test]
    fn test_purchased_but_unused_has_zero_used() {
        let levels = compute_levels(&map(&[("Cilantro", 4535.92)]), &BTreeMap::new());
        assert_eq!(levels.len(), 1);
        assert_eq!(levels[0].used, 0.0);
        assert_eq!(levels[0].net, 4535.92);
    }

    #[test]
    fn test_used_but_never_shipped_is_excluded() {
        let levels = compute_levels(&map(&[("Rice", 10.0)]), &map(&[("Basil", 3.0), ("Rice", 1.0)]));
        assert_eq!(levels.len(), 1);
        assert_eq!(levels[0].name, "Rice");
    }

    #[test]
    fn test_sorted_case_sensitive() {
        let levels = compute_levels(
            &map(&[("egg", 1.0), ("White onion", 1.0), ("Bokchoy", 1.0), ("Egg", 1.0)]),
            &BTreeMap::new(),
        );
        let names: Vec<&str> = levels.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Bokchoy", "Egg", "White onion", "egg"]);
    }
}
