//! Compiled-in reference tables, used when no data directory is given.

use crate::model::{
    Alert, AlertKind, Board, CropCatalog, CropGroup, CropProfile, FarmContext, FarmData,
    FarmTask, HealthMetric, Irrigation, IrrigationStatus, Kpi, Order, OrderStatus, Priority,
    ProfileTable, Region, RegionMembership, Season, SeasonMembership, SowingWindow, Weather,
    WeeklyPoint,
};

use Season::{Kharif, Rabi, Zaid};

/// The built-in snapshot.
pub fn builtin() -> FarmData {
    FarmData {
        catalog: catalog(),
        seasons: seasons(),
        regions: regions(),
        profiles: profiles(),
        board: board(),
    }
}

pub fn catalog() -> CropCatalog {
    CropCatalog::new(vec![
        CropGroup::new(
            "Cereals & Millets",
            [
                "Rice",
                "Wheat",
                "Maize (Corn)",
                "Barley",
                "Sorghum (Jowar)",
                "Pearl Millet (Bajra)",
                "Finger Millet (Ragi)",
            ],
        ),
        CropGroup::new(
            "Vegetables",
            [
                "Potato",
                "Onion",
                "Tomato",
                "Brinjal (Eggplant)",
                "Okra (Lady's Finger)",
                "Cabbage",
                "Cauliflower",
            ],
        ),
        CropGroup::new("Fibres", ["Cotton", "Jute", "Mesta (Kenaf)", "Sunn Hemp"]),
        CropGroup::new(
            "Oil Crops",
            [
                "Groundnut (Peanut)",
                "Rapeseed–Mustard",
                "Soybean",
                "Sunflower",
                "Sesame (Til)",
            ],
        ),
        CropGroup::new(
            "Pulses",
            [
                "Chickpea (Gram)",
                "Pigeonpea (Tur/Arhar)",
                "Mung Bean (Green Gram)",
                "Urad Bean (Black Gram)",
                "Lentil (Masur)",
            ],
        ),
        CropGroup::new(
            "Spices",
            ["Black Pepper", "Chilli", "Turmeric", "Coriander", "Cumin", "Fennel"],
        ),
        CropGroup::new(
            "Fruits",
            ["Mango", "Banana", "Citrus", "Apple", "Grapes", "Guava", "Pomegranate"],
        ),
        CropGroup::new(
            "Plantation",
            [
                "Tea", "Coffee", "Rubber", "Coconut", "Arecanut", "Cocoa", "Cashew", "Oil Palm",
            ],
        ),
        CropGroup::new(
            "Dryfruits & Nuts",
            ["Almond", "Walnut", "Cashew", "Pistachio", "Raisins", "Dates"],
        ),
        CropGroup::new(
            "Others (India)",
            [
                "Guar Seed",
                "Betel Leaf (Paan)",
                "Tobacco",
                "Psyllium (Isabgol)",
                "Sugarcane",
            ],
        ),
    ])
}

pub fn seasons() -> SeasonMembership {
    let mut map = SeasonMembership::new();
    map.insert("Rice", [Kharif, Rabi, Zaid]);
    map.insert("Wheat", [Rabi]);
    map.insert("Maize (Corn)", [Kharif, Rabi]);
    map.insert("Cotton", [Kharif]);
    map.insert("Groundnut (Peanut)", [Kharif]);
    map.insert("Rapeseed–Mustard", [Rabi]);
    map.insert("Soybean", [Kharif]);
    map.insert("Chickpea (Gram)", [Rabi]);
    map.insert("Pigeonpea (Tur/Arhar)", [Kharif]);
    map.insert("Onion", [Kharif, Rabi, Zaid]);
    map.insert("Potato", [Rabi]);
    map.insert("Tomato", [Kharif, Rabi]);
    map
}

pub fn regions() -> RegionMembership {
    let entries: [(&str, &[&str]); 6] = [
        (
            "Rice",
            &[
                "Punjab",
                "Haryana",
                "Uttar Pradesh",
                "Bihar",
                "West Bengal",
                "Odisha",
                "Chhattisgarh",
                "Andhra Pradesh",
                "Telangana",
                "Tamil Nadu",
                "Assam",
                "Maharashtra",
            ],
        ),
        (
            "Wheat",
            &[
                "Punjab",
                "Haryana",
                "Uttar Pradesh",
                "Rajasthan",
                "Madhya Pradesh",
                "Bihar",
            ],
        ),
        (
            "Cotton",
            &[
                "Maharashtra",
                "Gujarat",
                "Telangana",
                "Andhra Pradesh",
                "Punjab",
                "Haryana",
                "Rajasthan",
            ],
        ),
        ("Soybean", &["Madhya Pradesh", "Maharashtra", "Rajasthan"]),
        (
            "Groundnut (Peanut)",
            &[
                "Gujarat",
                "Andhra Pradesh",
                "Karnataka",
                "Tamil Nadu",
                "Telangana",
            ],
        ),
        (
            "Tomato",
            &[
                "Andhra Pradesh",
                "Karnataka",
                "Maharashtra",
                "Odisha",
                "West Bengal",
                "Bihar",
                "Uttar Pradesh",
                "Gujarat",
            ],
        ),
    ];

    let mut map = RegionMembership::new();
    for (crop, states) in entries {
        map.insert(crop, states.iter().map(Region::new));
    }
    map
}

pub fn profiles() -> ProfileTable {
    let mut table = ProfileTable::new();
    table.insert(
        "Rice".into(),
        CropProfile {
            agronomy: "Warm-season cereal; prefers puddled fields. Optimum temp 20–35°C. \
                       Common practices: nursery raising, puddling, transplanting, 2–3 split N doses."
                .to_string(),
            sowing: vec![
                SowingWindow::new("Punjab/Haryana", "Kharif", "Jun–Jul (transplant)"),
                SowingWindow::new("Tamil Nadu", "Rabi", "Oct–Nov (Samba)"),
                SowingWindow::new("Odisha/WB", "Kharif", "Jun–Jul"),
            ],
        },
    );
    table.insert(
        "Wheat".into(),
        CropProfile {
            agronomy: "Cool-season cereal; ideal temp 15–25°C. Sown on conserved moisture; \
                       timely irrigation at CRI, booting, flowering."
                .to_string(),
            sowing: vec![SowingWindow::new("Punjab/Haryana/UP", "Rabi", "Nov–Dec")],
        },
    );
    table.insert(
        "Tomato".into(),
        CropProfile {
            agronomy: "Requires well-drained soils; staking and pruning improve yields. \
                       Balanced NPK with Ca/B to prevent BER."
                .to_string(),
            sowing: vec![
                SowingWindow::new("AP/Karnataka", "Kharif", "Jun–Aug (transplant)"),
                SowingWindow::new("Maharashtra", "Rabi", "Oct–Nov"),
            ],
        },
    );
    table
}

pub fn board() -> Board {
    let weekly = [
        ("Mon", 8.0, 14.0, 32.0),
        ("Tue", 12.0, 15.0, 38.0),
        ("Wed", 5.0, 16.0, 28.0),
        ("Thu", 9.0, 18.0, 36.0),
        ("Fri", 2.0, 17.0, 25.0),
        ("Sat", 3.0, 19.0, 27.0),
        ("Sun", 6.0, 20.0, 30.0),
    ];

    Board {
        farm: FarmContext {
            name: "Green Acres".to_string(),
            season_label: "Kharif 2025".to_string(),
        },
        weather: Weather {
            city: "Pune, IN".to_string(),
            today: 29,
            hi: 31,
            lo: 24,
            rain_chance: 40,
        },
        weekly: weekly
            .iter()
            .map(|&(day, rain, yield_index, moisture)| WeeklyPoint {
                day: day.to_string(),
                rain,
                yield_index,
                moisture,
            })
            .collect(),
        field_health: vec![
            health("NDVI (vegetation index)", 78),
            health("Pest Risk (lower is better)", 28),
            health("Irrigation Completion", 62),
        ],
        yield_forecast: Kpi {
            value: "+7.8%".to_string(),
            note: "vs last season".to_string(),
        },
        active_orders: Kpi {
            value: "5".to_string(),
            note: "2 dispatching today".to_string(),
        },
        tasks: vec![
            task(1, "Irrigate Plot A (Drip: 45 mins)", "Today", Priority::High),
            task(2, "Scout pests in Soy Field", "Today", Priority::Medium),
            task(3, "Refill Urea (50kg)", "Tomorrow", Priority::Low),
        ],
        orders: vec![
            order("ORD-1042", "Tomatoes (Grade A)", 120, "₹18,600", OrderStatus::Packed),
            order("ORD-1041", "Onion (Red)", 300, "₹27,000", OrderStatus::InTransit),
            order("ORD-1039", "Okra (Lady Finger)", 80, "₹9,200", OrderStatus::Delivered),
        ],
        irrigations: vec![
            Irrigation {
                id: "IRR-208".to_string(),
                plot: "Plot A • Drip".to_string(),
                crop: "Tomato".to_string(),
                started_at: "Today 16:40 IST".to_string(),
                duration: "45 min".to_string(),
                flow: "28 L/min".to_string(),
                status: IrrigationStatus::Running,
            },
            Irrigation {
                id: "IRR-207".to_string(),
                plot: "Plot B • Sprinkler".to_string(),
                crop: "Soy".to_string(),
                started_at: "Today 06:15 IST".to_string(),
                duration: "30 min".to_string(),
                flow: "40 L/min".to_string(),
                status: IrrigationStatus::Completed,
            },
            Irrigation {
                id: "IRR-206".to_string(),
                plot: "Plot C • Flood".to_string(),
                crop: "Sugarcane".to_string(),
                started_at: "Yesterday 18:50 IST".to_string(),
                duration: "60 min".to_string(),
                flow: "—".to_string(),
                status: IrrigationStatus::Completed,
            },
        ],
        alerts: vec![
            alert(AlertKind::Weather, "Rain expected tonight. Delay pesticide spray."),
            alert(AlertKind::Soil, "Soil moisture low in Plot B (22%)."),
            alert(AlertKind::Market, "Tomato prices trending +6% week-over-week."),
        ],
    }
}

fn health(label: &str, value: u16) -> HealthMetric {
    HealthMetric {
        label: label.to_string(),
        value,
    }
}

fn task(id: u32, title: &str, due: &str, priority: Priority) -> FarmTask {
    FarmTask {
        id,
        title: title.to_string(),
        due: due.to_string(),
        priority,
    }
}

fn order(id: &str, item: &str, qty: u32, price: &str, status: OrderStatus) -> Order {
    Order {
        id: id.to_string(),
        item: item.to_string(),
        qty,
        price: price.to_string(),
        status,
    }
}

fn alert(kind: AlertKind, message: &str) -> Alert {
    Alert {
        kind,
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_shape() {
        let catalog = catalog();
        assert_eq!(catalog.groups().len(), 10);
        assert_eq!(catalog.groups()[0].name, "Cereals & Millets");
        assert!(catalog.contains("Tomato"));
    }

    #[test]
    fn test_builtin_regions_are_known() {
        for (_, set) in regions().iter() {
            assert!(set.iter().all(Region::is_known));
        }
    }

    #[test]
    fn test_builtin_moisture_avg() {
        // (32+38+28+36+25+27+30) / 7 = 30.857… → 30.9
        assert!((board().moisture_avg() - 30.9).abs() < 1e-9);
    }
}
