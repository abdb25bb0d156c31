// HTTP request handlers
use crate::application::chart_view::{ChartInputs, ChartState, ChartView};
use crate::application::detail_view::{ChartPanel, DetailView, SelectionQuery};
use crate::application::list_view::{DeviceRow, EquipmentRow, ListState, ListView};
use crate::application::navigation::{open_equipment, DetailHandoff};
use crate::domain::calendar::parse_calendar_date;
use crate::domain::chart::{ChartKind, Channel};
use crate::domain::device::DeviceStatus;
use crate::domain::equipment::EquipmentStatus;
use crate::error::ApiError;
use crate::infrastructure::trace::TraceEvent;
use crate::presentation::app_state::AppState;
use crate::presentation::render;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

const NOT_LISTED_MESSAGE: &str = "Open this equipment from the equipment list.";

#[derive(Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
}

#[derive(Deserialize)]
pub struct ChartQuery {
    pub sensor: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub channel: Option<String>,
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn status_for(error: &ApiError) -> StatusCode {
    match error {
        ApiError::InvalidDate(_) => StatusCode::BAD_REQUEST,
        ApiError::Timeout => StatusCode::GATEWAY_TIMEOUT,
        _ => StatusCode::BAD_GATEWAY,
    }
}

fn json_error(status: StatusCode, message: String) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

async fn load_equipment(state: &AppState, page: u32) -> ListState<EquipmentStatus> {
    let mut view = ListView::new(state.page_size);
    view.load_equipment(&state.queries, page).await;
    let list = view.into_state();
    if let ListState::Loaded { items, .. } = &list {
        state.remember_listed(items).await;
    }
    list
}

async fn load_devices(state: &AppState, page: u32) -> ListState<DeviceStatus> {
    let mut view = ListView::new(state.page_size);
    view.load_devices(&state.queries, page).await;
    view.into_state()
}

pub async fn equipment_page(
    Query(query): Query<PageQuery>,
    State(state): State<Arc<AppState>>,
) -> Html<String> {
    let list = load_equipment(&state, query.page.unwrap_or(1)).await;
    Html(render::equipment_list_page(
        &list.map(|e| EquipmentRow::from(&e)),
    ))
}

pub async fn device_page(
    Query(query): Query<PageQuery>,
    State(state): State<Arc<AppState>>,
) -> Html<String> {
    let list = load_devices(&state, query.page.unwrap_or(1)).await;
    Html(render::device_list_page(&list.map(|d| DeviceRow::from(&d))))
}

/// Resolve a listed equipment row and fetch its sensors.
async fn handoff_for(state: &AppState, id: &str) -> Result<DetailHandoff, (StatusCode, String)> {
    let Some(equipment) = state.listed_equipment(id).await else {
        tracing::info!("Equipment '{}' requested before it was listed", id);
        return Err((StatusCode::NOT_FOUND, NOT_LISTED_MESSAGE.to_string()));
    };
    open_equipment(&state.queries, equipment)
        .await
        .map_err(|e| (status_for(&e), e.user_message()))
}

pub async fn equipment_detail_page(
    Path(id): Path<String>,
    Query(query): Query<SelectionQuery>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let handoff = match handoff_for(&state, &id).await {
        Ok(handoff) => handoff,
        Err((status, message)) => {
            let retry = (status != StatusCode::NOT_FOUND)
                .then(|| format!("/equipment/{}", urlencoding::encode(&id)));
            let html = render::error_page("Equipment unavailable", &message, retry.as_deref());
            return (status, Html(html)).into_response();
        }
    };

    let mut detail = DetailView::new(handoff, today());
    if let Err(e) = detail.apply(&query) {
        let html = render::error_page("Invalid selection", &e.user_message(), None);
        return (status_for(&e), Html(html)).into_response();
    }

    let chart = match detail.panel() {
        ChartPanel::Chart(kind) => {
            let mut view = ChartView::new(kind);
            view.load(&state.queries, detail.chart_inputs()).await;
            if view.is_empty_window() {
                detail.show_window_help();
            }
            Some(view.state().clone())
        }
        ChartPanel::UnderDevelopment => None,
    };

    Html(render::detail_page(&detail, chart.as_ref())).into_response()
}

pub async fn api_equipment(
    Query(query): Query<PageQuery>,
    State(state): State<Arc<AppState>>,
) -> Json<ListState<EquipmentRow>> {
    let list = load_equipment(&state, query.page.unwrap_or(1)).await;
    Json(list.map(|e| EquipmentRow::from(&e)))
}

pub async fn api_devices(
    Query(query): Query<PageQuery>,
    State(state): State<Arc<AppState>>,
) -> Json<ListState<DeviceRow>> {
    let list = load_devices(&state, query.page.unwrap_or(1)).await;
    Json(list.map(|d| DeviceRow::from(&d)))
}

pub async fn api_equipment_devices(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Response {
    match handoff_for(&state, &id).await {
        Ok(handoff) => Json(handoff).into_response(),
        Err((status, message)) => json_error(status, message),
    }
}

fn date_or(raw: Option<&str>, fallback: NaiveDate) -> Result<NaiveDate, ApiError> {
    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        Some(raw) => parse_calendar_date(raw),
        None => Ok(fallback),
    }
}

/// Missing dates default to today; a missing end falls back to the start.
fn chart_inputs(query: ChartQuery) -> Result<ChartInputs, ApiError> {
    let start = date_or(query.start.as_deref(), today())?;
    let end = date_or(query.end.as_deref(), start)?;
    Ok(ChartInputs {
        sensor: query.sensor.filter(|s| !s.trim().is_empty()),
        start,
        end,
        channel: query
            .channel
            .as_deref()
            .and_then(Channel::parse)
            .unwrap_or_default(),
    })
}

pub async fn api_chart(
    Path(kind): Path<String>,
    Query(query): Query<ChartQuery>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let Some(kind) = ChartKind::from_slug(&kind) else {
        return json_error(StatusCode::NOT_FOUND, format!("unknown chart kind '{}'", kind));
    };
    let inputs = match chart_inputs(query) {
        Ok(inputs) => inputs,
        Err(e) => return json_error(status_for(&e), e.user_message()),
    };

    let mut view = ChartView::new(kind);
    view.load(&state.queries, inputs).await;
    let chart: ChartState = view.state().clone();
    Json(chart).into_response()
}

pub async fn api_trace(State(state): State<Arc<AppState>>) -> Json<Vec<TraceEvent>> {
    Json(state.trace_log.recent().await)
}
