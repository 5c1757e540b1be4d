//! Parse `membership.yaml`: which seasons and regions each crop belongs to.
//!
//! ```yaml
//! seasons:
//!   Wheat: [Rabi]
//! regions:
//!   Wheat: [Punjab, Haryana]
//! ```
//!
//! Crops left out of either map match every season / region, so a missing
//! file is the same as two empty maps.

use std::path::Path;

use serde::Deserialize;

use crate::loader::error::{read_optional, LoadError};
use crate::model::{RegionMembership, SeasonMembership};

#[derive(Deserialize, Debug, Default)]
pub struct Memberships {
    #[serde(default)]
    pub seasons: SeasonMembership,
    #[serde(default)]
    pub regions: RegionMembership,
}

pub const FILE_NAME: &str = "membership.yaml";

pub fn parse_membership(data_dir: &Path) -> Result<Memberships, LoadError> {
    let path = data_dir.join(FILE_NAME);
    match read_optional(&path)? {
        Some(content) => {
            let parsed = parse_membership_yaml(&content, &path)?;
            tracing::debug!(
                seasons = parsed.seasons.len(),
                regions = parsed.regions.len(),
                "loaded membership"
            );
            Ok(parsed)
        }
        None => {
            tracing::debug!(path = %path.display(), "no membership file, everything matches");
            Ok(Memberships::default())
        }
    }
}

pub fn parse_membership_yaml(content: &str, path: &Path) -> Result<Memberships, LoadError> {
    // An empty document deserialises as unit, not as an empty map.
    if content.trim().is_empty() {
        return Ok(Memberships::default());
    }
    serde_yaml::from_str(content).map_err(|e| LoadError::invalid(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Region, Season};

    #[test]
    fn test_parse_both_maps() {
        let yaml = r#"
seasons:
  Rice: [Kharif, Rabi, Zaid]
  Wheat: [rabi]
regions:
  Wheat: [Punjab, haryana]
"#;
        let m = parse_membership_yaml(yaml, Path::new(FILE_NAME)).unwrap();
        assert_eq!(m.seasons.get("Rice").unwrap().len(), 3);
        assert!(m.seasons.get("Wheat").unwrap().contains(&Season::Rabi));
        // Known regions are canonicalised
        assert!(m
            .regions
            .get("Wheat")
            .unwrap()
            .contains(&Region::new("Haryana")));
    }

    #[test]
    fn test_missing_sections_default_empty() {
        let m = parse_membership_yaml("seasons:\n  Potato: [Rabi]\n", Path::new(FILE_NAME)).unwrap();
        assert_eq!(m.seasons.len(), 1);
        assert!(m.regions.is_empty());
    }

    #[test]
    fn test_empty_document() {
        let m = parse_membership_yaml("   \n", Path::new(FILE_NAME)).unwrap();
        assert!(m.seasons.is_empty());
    }

    #[test]
    fn test_unknown_season_is_invalid() {
        let err = parse_membership_yaml("seasons:\n  Rice: [Monsoon]\n", Path::new(FILE_NAME))
            .unwrap_err();
        assert!(err.to_string().contains("unknown season"));
    }
}
