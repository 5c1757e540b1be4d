use std::path::Path;
use std::sync::Arc;

use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ServerHandler,
};

use crate::filter::filter_catalog;
use crate::loader::{self, error::LoadError};
use crate::model::{
    CropName, FarmData, FilterCriteria, IrrigationStatus, OrderStatus, Priority, RegionFilter,
    ALL_REGIONS_LABEL, MSP_URL, REGIONS,
};
use crate::selection::DetailController;
use crate::source::StaticSource;

use super::types::*;

// ---------------------------------------------------------------------------
// FarmService
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct FarmService {
    data: Arc<FarmData>,
    source: StaticSource,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl FarmService {
    pub fn new(data: Arc<FarmData>) -> Self {
        Self {
            source: StaticSource::new(Arc::clone(&data)),
            data,
            tool_router: Self::tool_router(),
        }
    }

    /// Load from a data directory, or the built-in tables when `None`.
    pub fn from_dir(data_dir: Option<&Path>) -> Result<Self, LoadError> {
        loader::load(data_dir).map(Self::new)
    }

    // -- helpers (not tools) ------------------------------------------------

    fn to_json<T: serde::Serialize>(value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("Error: {e}"))
    }

    /// Catalog spelling of `name`, matched case-insensitively.
    fn resolve_crop(&self, name: &str) -> Option<CropName> {
        let name = name.trim();
        self.data
            .catalog
            .items()
            .map(|(_, item)| item)
            .chain(self.data.profiles.keys())
            .find(|item| item.as_str().eq_ignore_ascii_case(name))
            .cloned()
    }

    // -- tools --------------------------------------------------------------

    #[tool(
        description = "List the crop catalog grouped by category, optionally narrowed by a name substring, a season (kharif/rabi/zaid) and an Indian state or union territory. Groups with no matching crops are omitted; catalog order is preserved."
    )]
    pub fn list_crops(&self, Parameters(params): Parameters<ListCropsParams>) -> String {
        let criteria = FilterCriteria::from_loose(
            params.query.as_deref(),
            params.season.as_deref(),
            params.region.as_deref(),
        );
        let filtered = filter_catalog(
            &self.data.catalog,
            &criteria,
            &self.data.seasons,
            &self.data.regions,
        );

        let resp = CropListResponse {
            criteria: CriteriaResponse {
                query: criteria.query.trim().to_string(),
                season: criteria.season.label().to_string(),
                region: criteria.region.label().to_string(),
            },
            total: filtered.item_count(),
            groups: filtered
                .groups()
                .iter()
                .map(|g| CropGroupResponse {
                    name: g.name.clone(),
                    items: g.items.iter().map(|i| i.to_string()).collect(),
                })
                .collect(),
        };

        Self::to_json(&resp)
    }

    #[tool(
        description = "Get the agronomy notes, sowing windows, seasons, regions and market links for one crop. Crops without a detailed profile return placeholder text with has_profile=false."
    )]
    pub fn get_crop_profile(&self, Parameters(params): Parameters<GetCropProfileParams>) -> String {
        let Some(crop) = self.resolve_crop(&params.name) else {
            return format!("No crop found matching '{}'", params.name);
        };
        let region = params
            .region
            .as_deref()
            .map(RegionFilter::from_str_loose)
            .unwrap_or_default();

        let mut controller = DetailController::default();
        let state = controller.select(crop.clone(), &self.source, &region);

        let resp = CropProfileResponse {
            crop: crop.to_string(),
            has_profile: state.profile.is_some(),
            agronomy: state.agronomy().to_string(),
            sowing: state
                .sowing_rows()
                .iter()
                .map(|row| SowingResponse {
                    region: row.region.clone(),
                    season: row.season.clone(),
                    window: row.window.clone(),
                })
                .collect(),
            seasons: self
                .data
                .seasons
                .get(crop.as_str())
                .map(|set| set.iter().map(|s| s.label().to_string()).collect()),
            regions: self
                .data
                .regions
                .get(crop.as_str())
                .map(|set| set.iter().map(|r| r.to_string()).collect()),
            agmarknet_url: crop.agmarknet_url(),
            msp_url: MSP_URL.to_string(),
        };

        Self::to_json(&resp)
    }

    #[tool(
        description = "List the region choices: \"All India\" first, then every state and union territory."
    )]
    pub fn list_regions(&self) -> String {
        let regions: Vec<&str> = std::iter::once(ALL_REGIONS_LABEL)
            .chain(REGIONS.iter().copied())
            .collect();
        Self::to_json(&regions)
    }

    #[tool(
        description = "Get the farm dashboard summary: weather, average soil moisture, yield and order KPIs, task counts by priority, order counts by status, running irrigations and alert count."
    )]
    pub fn get_dashboard_summary(&self) -> String {
        let board = &self.data.board;
        let weather = &board.weather;

        let resp = DashboardSummaryResponse {
            farm: board.farm.name.clone(),
            season: board.farm.season_label.clone(),
            weather: WeatherResponse {
                city: weather.city.clone(),
                today: weather.today,
                hi: weather.hi,
                lo: weather.lo,
                rain_chance: weather.rain_chance,
            },
            moisture_avg: board.moisture_avg(),
            yield_forecast: board.yield_forecast.value.clone(),
            active_orders: board.active_orders.value.clone(),
            tasks_by_priority: PriorityCounts {
                high: board.tasks_with_priority(Priority::High),
                medium: board.tasks_with_priority(Priority::Medium),
                low: board.tasks_with_priority(Priority::Low),
            },
            orders_by_status: OrderCounts {
                packed: board.orders_with_status(OrderStatus::Packed),
                in_transit: board.orders_with_status(OrderStatus::InTransit),
                delivered: board.orders_with_status(OrderStatus::Delivered),
            },
            running_irrigations: board.running_irrigations(),
            alert_count: board.alerts.len(),
        };

        Self::to_json(&resp)
    }

    #[tool(description = "List today's farm tasks, optionally only those of one priority.")]
    pub fn list_tasks(&self, Parameters(params): Parameters<ListTasksParams>) -> String {
        let target = params.priority.as_deref().map(Priority::from_str_loose);
        let tasks: Vec<_> = self
            .data
            .board
            .tasks
            .iter()
            .filter(|t| target.is_none_or(|p| t.priority == p))
            .collect();
        Self::to_json(&tasks)
    }

    #[tool(description = "List recent produce orders, optionally only those with one status.")]
    pub fn list_orders(&self, Parameters(params): Parameters<ListOrdersParams>) -> String {
        let target = params.status.as_deref().map(OrderStatus::from_str_loose);
        let orders: Vec<_> = self
            .data
            .board
            .orders
            .iter()
            .filter(|o| target.is_none_or(|s| o.status == s))
            .collect();
        Self::to_json(&orders)
    }

    #[tool(description = "List the irrigation log, optionally only runs with one status.")]
    pub fn list_irrigations(&self, Parameters(params): Parameters<ListIrrigationsParams>) -> String {
        let target = params.status.as_deref().map(IrrigationStatus::from_str_loose);
        let runs: Vec<_> = self
            .data
            .board
            .irrigations
            .iter()
            .filter(|r| target.is_none_or(|s| r.status == s))
            .collect();
        Self::to_json(&runs)
    }

    #[tool(description = "List current weather, soil and market alerts.")]
    pub fn list_alerts(&self) -> String {
        Self::to_json(&self.data.board.alerts)
    }
}

#[tool_handler]
impl ServerHandler for FarmService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Farm Dashboard MCP Server: read-only access to the crop catalog, crop \
                 profiles and the farm operations board. Use list_crops to browse or filter \
                 crops, get_crop_profile for agronomy and sowing windows, and \
                 get_dashboard_summary for the day's overview."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> FarmService {
        FarmService::new(Arc::new(loader::builtin()))
    }

    #[test]
    fn test_list_crops_unfiltered() {
        let result = service().list_crops(Parameters(ListCropsParams::default()));
        let parsed: CropListResponse = serde_json::from_str(&result).expect("valid JSON");
        assert_eq!(parsed.groups.len(), 10);
        assert_eq!(parsed.criteria.region, "All India");
        assert_eq!(parsed.criteria.season, "All seasons");
    }

    #[test]
    fn test_resolve_crop_is_case_insensitive() {
        let svc = service();
        assert_eq!(svc.resolve_crop("  rice "), Some(CropName::new("Rice")));
        assert_eq!(svc.resolve_crop("quinoa"), None);
    }

    #[test]
    fn test_unknown_crop_profile() {
        let result = service().get_crop_profile(Parameters(GetCropProfileParams {
            name: "Quinoa".into(),
            region: None,
        }));
        assert!(result.starts_with("No crop found"));
    }
}
