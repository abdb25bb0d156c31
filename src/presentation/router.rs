// Router - dashboard pages and JSON views
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    api_chart, api_devices, api_equipment, api_equipment_devices, api_trace, device_page,
    equipment_detail_page, equipment_page, health_check,
};
use axum::{routing::get, Router};
use std::sync::Arc;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/", get(equipment_page))
        .route("/devices", get(device_page))
        .route("/equipment/:id", get(equipment_detail_page))
        .route("/api/equipment", get(api_equipment))
        .route("/api/devices", get(api_devices))
        .route("/api/equipment/:id/devices", get(api_equipment_devices))
        .route("/api/chart/:kind", get(api_chart))
        .route("/api/trace", get(api_trace))
        .with_state(state)
}
