//! Catalog filter: narrows the crop catalog by text, season and region.
//!
//! The filter is a pure function over its inputs. Each item is tested against
//! three independent predicates and kept only when all three hold; groups
//! left without items are dropped. Order is never changed, so the output is
//! always a subsequence of the input.
//!
//! Membership maps are open-world: a crop missing from the season or region
//! map matches every season or region.

use crate::model::{
    CropCatalog, CropGroup, CropName, FilterCriteria, RegionMembership, SeasonMembership,
};

/// Apply `criteria` to `catalog`. An empty result is a valid "no results"
/// state, not an error.
pub fn filter_catalog(
    catalog: &CropCatalog,
    criteria: &FilterCriteria,
    seasons: &SeasonMembership,
    regions: &RegionMembership,
) -> CropCatalog {
    let query = criteria.query.trim().to_lowercase();

    let groups = catalog
        .groups()
        .iter()
        .filter_map(|group| {
            let items: Vec<CropName> = group
                .items
                .iter()
                .filter(|item| {
                    matches_text(item, &query)
                        && seasons.admits_filter(item.as_str(), criteria.season)
                        && regions.admits_filter(item.as_str(), &criteria.region)
                })
                .cloned()
                .collect();

            (!items.is_empty()).then(|| CropGroup {
                name: group.name.clone(),
                items,
            })
        })
        .collect();

    CropCatalog::new(groups)
}

/// `query` must already be trimmed and lower-cased.
fn matches_text(item: &CropName, query: &str) -> bool {
    query.is_empty() || item.as_str().to_lowercase().contains(query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Region, RegionFilter, Season, SeasonFilter};
    use pretty_assertions::assert_eq;

    fn vegetables() -> CropCatalog {
        CropCatalog::new(vec![CropGroup::new(
            "Vegetables",
            ["Potato", "Onion", "Tomato"],
        )])
    }

    fn season_map() -> SeasonMembership {
        let mut m = SeasonMembership::new();
        m.insert("Potato", [Season::Rabi]);
        m.insert("Tomato", [Season::Kharif, Season::Rabi]);
        m
    }

    #[test]
    fn test_text_query_narrows_items() {
        let criteria = FilterCriteria::new("to", SeasonFilter::All, RegionFilter::All);
        let out = filter_catalog(
            &vegetables(),
            &criteria,
            &season_map(),
            &RegionMembership::new(),
        );
        // "Potato" contains "to" too
        assert_eq!(
            out,
            CropCatalog::new(vec![CropGroup::new("Vegetables", ["Potato", "Tomato"])])
        );
    }

    #[test]
    fn test_query_is_trimmed_and_case_insensitive() {
        let criteria = FilterCriteria::new("  TOMA ", SeasonFilter::All, RegionFilter::All);
        let out = filter_catalog(
            &vegetables(),
            &criteria,
            &season_map(),
            &RegionMembership::new(),
        );
        assert_eq!(
            out,
            CropCatalog::new(vec![CropGroup::new("Vegetables", ["Tomato"])])
        );
    }

    #[test]
    fn test_season_filter_uses_open_world_default() {
        let criteria = FilterCriteria::new("", SeasonFilter::Only(Season::Kharif), RegionFilter::All);
        let out = filter_catalog(
            &vegetables(),
            &criteria,
            &season_map(),
            &RegionMembership::new(),
        );
        // Potato is Rabi-only; Onion has no entry and stays.
        assert_eq!(
            out,
            CropCatalog::new(vec![CropGroup::new("Vegetables", ["Onion", "Tomato"])])
        );
    }

    #[test]
    fn test_region_excludes_known_crop_outside_region() {
        let mut regions = RegionMembership::new();
        regions.insert("Tomato", [Region::new("Karnataka")]);

        let criteria = FilterCriteria::new(
            "tomato",
            SeasonFilter::Only(Season::Rabi),
            RegionFilter::from_str_loose("Punjab"),
        );
        let out = filter_catalog(&vegetables(), &criteria, &season_map(), &regions);
        assert!(out.is_empty());
    }

    #[test]
    fn test_empty_groups_are_dropped() {
        let catalog = CropCatalog::new(vec![
            CropGroup::new("Fibres", ["Cotton", "Jute"]),
            CropGroup::new("Vegetables", ["Onion"]),
        ]);
        let criteria = FilterCriteria::new("onion", SeasonFilter::All, RegionFilter::All);
        let out = filter_catalog(
            &catalog,
            &criteria,
            &SeasonMembership::new(),
            &RegionMembership::new(),
        );
        assert_eq!(out.groups().len(), 1);
        assert_eq!(out.groups()[0].name, "Vegetables");
    }

    #[test]
    fn test_whitespace_only_query_matches_everything() {
        let criteria = FilterCriteria::new("   ", SeasonFilter::All, RegionFilter::All);
        let out = filter_catalog(
            &vegetables(),
            &criteria,
            &season_map(),
            &RegionMembership::new(),
        );
        assert_eq!(out, vegetables());
    }
}
