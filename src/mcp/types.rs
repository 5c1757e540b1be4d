use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Tool parameter types
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct ListCropsParams {
    /// Case-insensitive substring of the crop name, e.g. "millet"
    #[schemars(default)]
    pub query: Option<String>,
    /// Season: "kharif", "rabi", "zaid", or "all" (default). Unknown values mean "all".
    #[schemars(default)]
    pub season: Option<String>,
    /// State or union territory, e.g. "Punjab". "All India" (default) or unknown values mean no region filter.
    #[schemars(default)]
    pub region: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetCropProfileParams {
    /// Crop name as listed in the catalog, e.g. "Rice" (case-insensitive)
    pub name: String,
    /// Optional region the profile is being viewed for
    #[schemars(default)]
    pub region: Option<String>,
}

#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct ListTasksParams {
    /// Priority: "high", "medium", or "low". Omit for all tasks.
    #[schemars(default)]
    pub priority: Option<String>,
}

#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct ListOrdersParams {
    /// Status: "packed", "in transit", or "delivered". Omit for all orders.
    #[schemars(default)]
    pub status: Option<String>,
}

#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct ListIrrigationsParams {
    /// Status: "running", "completed", or "scheduled". Omit for all runs.
    #[schemars(default)]
    pub status: Option<String>,
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
pub struct CriteriaResponse {
    pub query: String,
    pub season: String,
    pub region: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CropGroupResponse {
    pub name: String,
    pub items: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CropListResponse {
    /// Criteria after normalisation (unknown season/region become "all")
    pub criteria: CriteriaResponse,
    pub total: usize,
    pub groups: Vec<CropGroupResponse>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SowingResponse {
    pub region: String,
    pub season: String,
    pub window: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CropProfileResponse {
    pub crop: String,
    /// False when the agronomy and sowing fields are placeholders
    pub has_profile: bool,
    pub agronomy: String,
    pub sowing: Vec<SowingResponse>,
    /// Seasons the crop is grown in; `null` when it has no season entry and
    /// so matches any season
    pub seasons: Option<Vec<String>>,
    /// Regions the crop is grown in; `null` when it has no region entry and
    /// so matches any region
    pub regions: Option<Vec<String>>,
    pub agmarknet_url: String,
    pub msp_url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WeatherResponse {
    pub city: String,
    pub today: i32,
    pub hi: i32,
    pub lo: i32,
    pub rain_chance: u8,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PriorityCounts {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OrderCounts {
    pub packed: usize,
    pub in_transit: usize,
    pub delivered: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DashboardSummaryResponse {
    pub farm: String,
    pub season: String,
    pub weather: WeatherResponse,
    pub moisture_avg: f64,
    pub yield_forecast: String,
    pub active_orders: String,
    pub tasks_by_priority: PriorityCounts,
    pub orders_by_status: OrderCounts,
    pub running_irrigations: usize,
    pub alert_count: usize,
}
