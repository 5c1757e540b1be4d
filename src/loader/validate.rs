//! Consistency checks across the reference tables.
//!
//! None of these fail a load: they are reported so a bad edit to a data file
//! shows up in the log instead of silently hiding a crop.

use std::collections::HashSet;
use std::fmt;

use crate::model::FarmData;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum ValidationIssue {
    DuplicateGroup(String),
    EmptyGroup(String),
    DuplicateItem { group: String, crop: String },
    UnknownSeasonCrop(String),
    UnknownRegionCrop(String),
    UnknownRegion { crop: String, region: String },
    UnknownProfileCrop(String),
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateGroup(name) => write!(f, "group '{name}' appears more than once"),
            Self::EmptyGroup(name) => write!(f, "group '{name}' has no items"),
            Self::DuplicateItem { group, crop } => {
                write!(f, "'{crop}' is listed twice in group '{group}'")
            }
            Self::UnknownSeasonCrop(crop) => {
                write!(f, "season membership for '{crop}', which is not in the catalog")
            }
            Self::UnknownRegionCrop(crop) => {
                write!(f, "region membership for '{crop}', which is not in the catalog")
            }
            Self::UnknownRegion { crop, region } => {
                write!(f, "'{crop}' lists unknown region '{region}'")
            }
            Self::UnknownProfileCrop(crop) => {
                write!(f, "profile for '{crop}', which is not in the catalog")
            }
        }
    }
}

/// Check a snapshot. Issues come back sorted so repeated loads log them in
/// the same order.
pub fn validate(data: &FarmData) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let catalog = &data.catalog;

    let mut group_names = HashSet::new();
    for group in catalog.groups() {
        if !group_names.insert(group.name.as_str()) {
            issues.push(ValidationIssue::DuplicateGroup(group.name.clone()));
        }
        if group.items.is_empty() {
            issues.push(ValidationIssue::EmptyGroup(group.name.clone()));
        }
        let mut seen = HashSet::new();
        for item in &group.items {
            if !seen.insert(item.as_str()) {
                issues.push(ValidationIssue::DuplicateItem {
                    group: group.name.clone(),
                    crop: item.to_string(),
                });
            }
        }
    }

    for (crop, _) in data.seasons.iter() {
        if !catalog.contains(crop.as_str()) {
            issues.push(ValidationIssue::UnknownSeasonCrop(crop.to_string()));
        }
    }

    for (crop, regions) in data.regions.iter() {
        if !catalog.contains(crop.as_str()) {
            issues.push(ValidationIssue::UnknownRegionCrop(crop.to_string()));
        }
        issues.extend(
            regions
                .iter()
                .filter(|r| !r.is_known())
                .map(|r| ValidationIssue::UnknownRegion {
                    crop: crop.to_string(),
                    region: r.to_string(),
                }),
        );
    }

    for crop in data.profiles.keys() {
        if !catalog.contains(crop.as_str()) {
            issues.push(ValidationIssue::UnknownProfileCrop(crop.to_string()));
        }
    }

    issues.sort();
    issues
}
