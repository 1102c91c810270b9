//! Dashboard data handler — fixed sample metrics for the frontend charts

use axum::Json;
use serde::Serialize;

/// One month of a metric time series
#[derive(Debug, Clone, Serialize)]
pub struct MonthlyPoint {
    pub month: &'static str,
    pub value: u32,
}

/// Summary metric strings shown in the dashboard tiles
#[derive(Debug, Serialize)]
pub struct DashboardMetrics {
    pub total_collections: &'static str,
    pub active_customers: &'static str,
    pub monthly_revenue: &'static str,
    pub efficiency_score: &'static str,
}

/// Full dashboard payload
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub collections: Vec<MonthlyPoint>,
    pub revenue: Vec<MonthlyPoint>,
    pub metrics: DashboardMetrics,
}

const COLLECTIONS: [(&str, u32); 6] = [
    ("Jan", 1200),
    ("Feb", 1350),
    ("Mar", 1100),
    ("Apr", 1400),
    ("May", 1600),
    ("Jun", 1800),
];

const REVENUE: [(&str, u32); 6] = [
    ("Jan", 45000),
    ("Feb", 52000),
    ("Mar", 48000),
    ("Apr", 55000),
    ("May", 62000),
    ("Jun", 68000),
];

fn series(points: &[(&'static str, u32)]) -> Vec<MonthlyPoint> {
    points
        .iter()
        .map(|&(month, value)| MonthlyPoint { month, value })
        .collect()
}

/// GET /api/dashboard-data — static sample data, no store behind it
pub async fn get_dashboard_data() -> Json<DashboardResponse> {
    tracing::info!("Dashboard data requested");
    Json(DashboardResponse {
        collections: series(&COLLECTIONS),
        revenue: series(&REVENUE),
        metrics: DashboardMetrics {
            total_collections: "2,847",
            active_customers: "1,234",
            monthly_revenue: "$68,000",
            efficiency_score: "94.2%",
        },
    })
}
