use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

// ---------------------------------------------------------------------------
// Season (Indian cropping seasons)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Season {
    Kharif,
    Rabi,
    Zaid,
}

impl Season {
    pub const ALL: [Season; 3] = [Season::Kharif, Season::Rabi, Season::Zaid];

    pub fn label(self) -> &'static str {
        match self {
            Self::Kharif => "Kharif",
            Self::Rabi => "Rabi",
            Self::Zaid => "Zaid",
        }
    }

    /// Strict parse: `None` for anything that is not one of the three seasons.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "kharif" => Some(Self::Kharif),
            "rabi" => Some(Self::Rabi),
            "zaid" | "zayed" => Some(Self::Zaid),
            _ => None,
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Season {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Season {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Season::parse(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown season '{s}'")))
    }
}

// ---------------------------------------------------------------------------
// Season filter (UI state)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SeasonFilter {
    #[default]
    All,
    Only(Season),
}

impl SeasonFilter {
    pub fn next(self) -> Self {
        match self {
            Self::All => Self::Only(Season::Kharif),
            Self::Only(Season::Kharif) => Self::Only(Season::Rabi),
            Self::Only(Season::Rabi) => Self::Only(Season::Zaid),
            Self::Only(Season::Zaid) => Self::All,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All seasons",
            Self::Only(season) => season.label(),
        }
    }

    /// Unknown values normalise to `All` instead of failing.
    pub fn from_str_loose(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "all" | "any" | "all seasons" => Self::All,
            other => Season::parse(other).map(Self::Only).unwrap_or_default(),
        }
    }
}

impl fmt::Display for SeasonFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Task priority
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Priority {
    High = 0,
    #[default]
    Medium = 1,
    Low = 2,
}

impl Priority {
    pub fn label(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }

    pub fn from_str_loose(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" | "urgent" | "critical" => Self::High,
            "low" => Self::Low,
            _ => Self::Medium,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Order status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OrderStatus {
    #[default]
    Packed,
    InTransit,
    Delivered,
}

impl OrderStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Packed => "Packed",
            Self::InTransit => "In Transit",
            Self::Delivered => "Delivered",
        }
    }

    pub fn from_str_loose(s: &str) -> Self {
        let lower = s.to_ascii_lowercase();
        match lower.trim() {
            "in transit" | "in_transit" | "in-transit" | "shipped" | "dispatched" => {
                Self::InTransit
            }
            "delivered" | "done" => Self::Delivered,
            _ => Self::Packed,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Irrigation run status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IrrigationStatus {
    Running,
    #[default]
    Completed,
    Scheduled,
}

impl IrrigationStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Running => "Running",
            Self::Completed => "Completed",
            Self::Scheduled => "Scheduled",
        }
    }

    pub fn from_str_loose(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "running" | "active" | "on" => Self::Running,
            "scheduled" | "queued" | "pending" => Self::Scheduled,
            _ => Self::Completed,
        }
    }
}

impl fmt::Display for IrrigationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Alert kind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AlertKind {
    Weather,
    Soil,
    Market,
    #[default]
    Other,
}

impl AlertKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Weather => "Weather",
            Self::Soil => "Soil",
            Self::Market => "Market",
            Self::Other => "General",
        }
    }

    pub fn from_str_loose(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "weather" => Self::Weather,
            "soil" => Self::Soil,
            "market" => Self::Market,
            _ => Self::Other,
        }
    }
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Lenient serde impls for the board enums: the label on the way out,
/// `from_str_loose` on the way in.
macro_rules! loose_serde {
    ($($ty:ty),*) => {$(
        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.label())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                Ok(<$ty>::from_str_loose(&s))
            }
        }
    )*};
}

loose_serde!(Priority, OrderStatus, IrrigationStatus, AlertKind);

// ---------------------------------------------------------------------------
// Tabs (UI state)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    Landing,
    #[default]
    Dashboard,
    Crops,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Landing, Tab::Dashboard, Tab::Crops];

    pub fn next(self) -> Self {
        match self {
            Self::Landing => Self::Dashboard,
            Self::Dashboard => Self::Crops,
            Self::Crops => Self::Landing,
        }
    }

    /// Position in the tab strip, also the number key minus one.
    pub fn index(self) -> usize {
        match self {
            Self::Landing => 0,
            Self::Dashboard => 1,
            Self::Crops => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Landing => "Public Landing",
            Self::Dashboard => "Farmer Dashboard",
            Self::Crops => "Crops",
        }
    }

    pub fn from_str_loose(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "landing" | "home" | "public" => Self::Landing,
            "crops" | "crop" | "catalog" => Self::Crops,
            _ => Self::Dashboard,
        }
    }
}

/// Reporting window shown next to the dashboard figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateRange {
    #[default]
    Last7Days,
    Last30Days,
}

impl DateRange {
    pub fn next(self) -> Self {
        match self {
            Self::Last7Days => Self::Last30Days,
            Self::Last30Days => Self::Last7Days,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Last7Days => "Last 7 days",
            Self::Last30Days => "Last 30 days",
        }
    }
}

/// Deployment badge in the title bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Develop,
    Main,
}

impl Environment {
    pub fn next(self) -> Self {
        match self {
            Self::Develop => Self::Main,
            Self::Main => Self::Develop,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Develop => "develop",
            Self::Main => "main",
        }
    }
}
