use std::borrow::Borrow;
use std::collections::{BTreeSet, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

use super::enums::{Season, SeasonFilter};

// ---------------------------------------------------------------------------
// CropName: newtype for type safety
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CropName(pub String);

impl CropName {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Agmarknet commodity price search for this crop.
    pub fn agmarknet_url(&self) -> String {
        format!(
            "https://agmarknet.gov.in/SearchCmmMkt.aspx?Tx_Commodity={}",
            urlencoding::encode(&self.0)
        )
    }
}

impl fmt::Display for CropName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for CropName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<String> for CropName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for CropName {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Official minimum support price reference.
pub const MSP_URL: &str = "https://cacp.dacnet.gov.in/";

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropGroup {
    pub name: String,
    #[serde(default)]
    pub items: Vec<CropName>,
}

impl CropGroup {
    pub fn new<I, S>(name: impl Into<String>, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<CropName>,
    {
        Self {
            name: name.into(),
            items: items.into_iter().map(Into::into).collect(),
        }
    }
}

/// Ordered crop groups. Replaced whole when the source changes, never edited
/// in place.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CropCatalog {
    #[serde(default)]
    pub groups: Vec<CropGroup>,
}

impl CropCatalog {
    pub fn new(groups: Vec<CropGroup>) -> Self {
        Self { groups }
    }

    pub fn groups(&self) -> &[CropGroup] {
        &self.groups
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn item_count(&self) -> usize {
        self.groups.iter().map(|g| g.items.len()).sum()
    }

    /// All `(group, item)` pairs in display order.
    pub fn items(&self) -> impl Iterator<Item = (&CropGroup, &CropName)> {
        self.groups
            .iter()
            .flat_map(|g| g.items.iter().map(move |item| (g, item)))
    }

    pub fn contains(&self, crop: &str) -> bool {
        self.items().any(|(_, item)| item.as_str() == crop)
    }
}

// ---------------------------------------------------------------------------
// Regions
// ---------------------------------------------------------------------------

/// Label of the "no region constraint" choice.
pub const ALL_REGIONS_LABEL: &str = "All India";

/// States and union territories, in selector order.
pub const REGIONS: &[&str] = &[
    "Andhra Pradesh",
    "Arunachal Pradesh",
    "Assam",
    "Bihar",
    "Chhattisgarh",
    "Goa",
    "Gujarat",
    "Haryana",
    "Himachal Pradesh",
    "Jharkhand",
    "Karnataka",
    "Kerala",
    "Madhya Pradesh",
    "Maharashtra",
    "Manipur",
    "Meghalaya",
    "Mizoram",
    "Nagaland",
    "Odisha",
    "Punjab",
    "Rajasthan",
    "Sikkim",
    "Tamil Nadu",
    "Telangana",
    "Tripura",
    "Uttar Pradesh",
    "Uttarakhand",
    "West Bengal",
    "Andaman & Nicobar Islands",
    "Chandigarh",
    "Dadra & Nagar Haveli and Daman & Diu",
    "Delhi",
    "Jammu & Kashmir",
    "Ladakh",
    "Lakshadweep",
    "Puducherry",
];

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Region(String);

impl Region {
    /// Canonicalises the spelling of known regions; unknown names are kept
    /// verbatim so validation can report them.
    pub fn new(s: impl AsRef<str>) -> Self {
        let s = s.as_ref().trim();
        match Self::parse(s) {
            Some(known) => known,
            None => Self(s.to_string()),
        }
    }

    /// Strict parse against the enumerated list (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        REGIONS
            .iter()
            .find(|r| r.eq_ignore_ascii_case(s))
            .map(|r| Self((*r).to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_known(&self) -> bool {
        REGIONS.contains(&self.0.as_str())
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Region {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Region::new(s))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum RegionFilter {
    #[default]
    All,
    Only(Region),
}

impl RegionFilter {
    pub fn label(&self) -> &str {
        match self {
            Self::All => ALL_REGIONS_LABEL,
            Self::Only(region) => region.as_str(),
        }
    }

    /// Unknown values normalise to `All` instead of failing.
    pub fn from_str_loose(s: &str) -> Self {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case(ALL_REGIONS_LABEL)
            || trimmed.eq_ignore_ascii_case("All Regions")
            || trimmed.eq_ignore_ascii_case("all")
        {
            return Self::All;
        }
        Region::parse(trimmed).map(Self::Only).unwrap_or_default()
    }

    /// Position in the selector: 0 is the sentinel, then `REGIONS` order.
    fn position(&self) -> usize {
        match self {
            Self::All => 0,
            Self::Only(region) => REGIONS
                .iter()
                .position(|r| *r == region.as_str())
                .map(|i| i + 1)
                .unwrap_or(0),
        }
    }

    fn at(position: usize) -> Self {
        match position {
            0 => Self::All,
            n => Self::Only(Region(REGIONS[n - 1].to_string())),
        }
    }

    pub fn next(&self) -> Self {
        Self::at((self.position() + 1) % (REGIONS.len() + 1))
    }

    pub fn previous(&self) -> Self {
        let len = REGIONS.len() + 1;
        Self::at((self.position() + len - 1) % len)
    }

    pub fn region(&self) -> Option<&Region> {
        match self {
            Self::All => None,
            Self::Only(region) => Some(region),
        }
    }
}

impl fmt::Display for RegionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Membership maps (open-world: an absent crop matches everything)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Membership<T: Ord>(HashMap<CropName, BTreeSet<T>>);

pub type SeasonMembership = Membership<Season>;
pub type RegionMembership = Membership<Region>;

impl<T: Ord> Default for Membership<T> {
    fn default() -> Self {
        Self(HashMap::new())
    }
}

impl<T: Ord> Membership<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<I>(&mut self, crop: impl Into<CropName>, values: I)
    where
        I: IntoIterator<Item = T>,
    {
        self.0.insert(crop.into(), values.into_iter().collect());
    }

    pub fn get(&self, crop: &str) -> Option<&BTreeSet<T>> {
        self.0.get(crop)
    }

    /// `wanted == None` means no constraint. A crop with no entry matches
    /// any constraint.
    pub fn admits(&self, crop: &str, wanted: Option<&T>) -> bool {
        match (wanted, self.0.get(crop)) {
            (None, _) | (_, None) => true,
            (Some(value), Some(set)) => set.contains(value),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CropName, &BTreeSet<T>)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl SeasonMembership {
    pub fn admits_filter(&self, crop: &str, filter: SeasonFilter) -> bool {
        match filter {
            SeasonFilter::All => true,
            SeasonFilter::Only(season) => self.admits(crop, Some(&season)),
        }
    }
}

impl RegionMembership {
    pub fn admits_filter(&self, crop: &str, filter: &RegionFilter) -> bool {
        self.admits(crop, filter.region())
    }
}

// ---------------------------------------------------------------------------
// Profiles
// ---------------------------------------------------------------------------

pub const FALLBACK_AGRONOMY: &str =
    "Details coming soon. Toggle Live data once backend is ready.";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CropProfile {
    #[serde(default)]
    pub agronomy: String,
    #[serde(default)]
    pub sowing: Vec<SowingWindow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SowingWindow {
    #[serde(alias = "state")]
    pub region: String,
    pub season: String,
    pub window: String,
}

impl SowingWindow {
    pub fn new(
        region: impl Into<String>,
        season: impl Into<String>,
        window: impl Into<String>,
    ) -> Self {
        Self {
            region: region.into(),
            season: season.into(),
            window: window.into(),
        }
    }

    /// Row shown when a crop has no sowing data.
    pub fn fallback() -> Self {
        Self::new(ALL_REGIONS_LABEL, Season::Kharif.label(), "Jun–Jul")
    }
}

pub type ProfileTable = HashMap<CropName, CropProfile>;

// ---------------------------------------------------------------------------
// FilterCriteria: fully determined by user input
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterCriteria {
    pub query: String,
    pub season: SeasonFilter,
    pub region: RegionFilter,
}

impl FilterCriteria {
    pub fn new(query: impl Into<String>, season: SeasonFilter, region: RegionFilter) -> Self {
        Self {
            query: query.into(),
            season,
            region,
        }
    }

    /// Criteria built from raw strings; unrecognised season/region values
    /// fall back to "all".
    pub fn from_loose(query: Option<&str>, season: Option<&str>, region: Option<&str>) -> Self {
        Self {
            query: query.unwrap_or_default().to_string(),
            season: season.map(SeasonFilter::from_str_loose).unwrap_or_default(),
            region: region.map(RegionFilter::from_str_loose).unwrap_or_default(),
        }
    }

    pub fn is_unconstrained(&self) -> bool {
        self.query.trim().is_empty()
            && self.season == SeasonFilter::All
            && self.region == RegionFilter::All
    }
}
