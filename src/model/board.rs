use serde::{Deserialize, Serialize};

use super::enums::{AlertKind, IrrigationStatus, OrderStatus, Priority};

// ---------------------------------------------------------------------------
// Board: everything shown on the Dashboard tab
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Board {
    pub farm: FarmContext,
    pub weather: Weather,
    pub weekly: Vec<WeeklyPoint>,
    pub field_health: Vec<HealthMetric>,
    pub yield_forecast: Kpi,
    pub active_orders: Kpi,
    pub tasks: Vec<FarmTask>,
    pub orders: Vec<Order>,
    pub irrigations: Vec<Irrigation>,
    pub alerts: Vec<Alert>,
}

impl Board {
    /// Mean weekly soil moisture, rounded to one decimal place.
    pub fn moisture_avg(&self) -> f64 {
        if self.weekly.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.weekly.iter().map(|p| p.moisture).sum();
        ((sum / self.weekly.len() as f64) * 10.0).round() / 10.0
    }

    pub fn tasks_with_priority(&self, priority: Priority) -> usize {
        self.tasks.iter().filter(|t| t.priority == priority).count()
    }

    pub fn orders_with_status(&self, status: OrderStatus) -> usize {
        self.orders.iter().filter(|o| o.status == status).count()
    }

    pub fn running_irrigations(&self) -> usize {
        self.irrigations
            .iter()
            .filter(|i| i.status == IrrigationStatus::Running)
            .count()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FarmContext {
    pub name: String,
    pub season_label: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Weather {
    pub city: String,
    pub today: i32,
    pub hi: i32,
    pub lo: i32,
    pub rain_chance: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyPoint {
    pub day: String,
    /// Rainfall in millimetres.
    pub rain: f64,
    #[serde(rename = "yield")]
    pub yield_index: f64,
    /// Soil moisture percentage.
    pub moisture: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthMetric {
    pub label: String,
    /// 0–100.
    pub value: u16,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Kpi {
    pub value: String,
    pub note: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FarmTask {
    pub id: u32,
    pub title: String,
    pub due: String,
    #[serde(default)]
    pub priority: Priority,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub item: String,
    pub qty: u32,
    pub price: String,
    #[serde(default)]
    pub status: OrderStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Irrigation {
    pub id: String,
    pub plot: String,
    pub crop: String,
    pub started_at: String,
    pub duration: String,
    pub flow: String,
    #[serde(default)]
    pub status: IrrigationStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    #[serde(rename = "type", default)]
    pub kind: AlertKind,
    #[serde(rename = "msg")]
    pub message: String,
}
