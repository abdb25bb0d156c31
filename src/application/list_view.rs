// Paginated list views - equipment and device tables
use crate::application::queries::{DiagnosticsQueries, ListParams};
use crate::domain::device::DeviceStatus;
use crate::domain::equipment::EquipmentStatus;
use crate::domain::page::{page_window, Page, PageInfo};
use crate::domain::status::{StatusDisplay, StatusTier};
use crate::error::ApiError;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ListState<T> {
    Idle,
    Loading { page: u32 },
    Loaded { items: Vec<T>, info: PageInfo },
    Failed { page: u32, message: String },
}

impl<T> ListState<T> {
    pub fn map<R>(self, f: impl FnMut(T) -> R) -> ListState<R> {
        match self {
            ListState::Idle => ListState::Idle,
            ListState::Loading { page } => ListState::Loading { page },
            ListState::Loaded { items, info } => ListState::Loaded {
                items: items.into_iter().map(f).collect(),
                info,
            },
            ListState::Failed { page, message } => ListState::Failed { page, message },
        }
    }
}

/// Issued by `ListView::begin`; only the latest ticket may complete the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    pub generation: u64,
    pub page: u32,
    pub skip: u32,
    pub limit: u32,
}

#[derive(Debug, Clone)]
pub struct ListView<T> {
    page_size: u32,
    page: u32,
    generation: u64,
    state: ListState<T>,
}

impl<T> ListView<T> {
    pub fn new(page_size: u32) -> Self {
        Self {
            page_size: page_size.max(1),
            page: 1,
            generation: 0,
            state: ListState::Idle,
        }
    }

    pub fn state(&self) -> &ListState<T> {
        &self.state
    }

    pub fn into_state(self) -> ListState<T> {
        self.state
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Enter `Loading` for `page`, superseding any request still in flight.
    pub fn begin(&mut self, page: u32) -> LoadTicket {
        self.page = page.max(1);
        self.generation += 1;
        self.state = ListState::Loading { page: self.page };

        let (skip, limit) = page_window(self.page, self.page_size);
        LoadTicket {
            generation: self.generation,
            page: self.page,
            skip,
            limit,
        }
    }

    pub fn retry(&mut self) -> LoadTicket {
        self.begin(self.page)
    }

    /// Apply a response. Returns `false` when the ticket is stale and the response was dropped.
    pub fn complete(&mut self, ticket: LoadTicket, result: Result<Page<T>, ApiError>) -> bool {
        if ticket.generation != self.generation {
            tracing::debug!(
                "Discarding stale list response for page {} (generation {} < {})",
                ticket.page,
                ticket.generation,
                self.generation
            );
            return false;
        }

        self.state = match result {
            Ok(page) => {
                let info = PageInfo::new(ticket.page, self.page_size, page.items.len(), page.total);
                ListState::Loaded {
                    items: page.items,
                    info,
                }
            }
            Err(e) => ListState::Failed {
                page: ticket.page,
                message: e.user_message(),
            },
        };
        true
    }
}

impl ListView<EquipmentStatus> {
    pub async fn load_equipment(&mut self, queries: &DiagnosticsQueries, page: u32) -> bool {
        let ticket = self.begin(page);
        let params = ListParams::equipment().window(ticket.skip, ticket.limit);
        let result = queries.list_equipment_status(params).await;
        self.complete(ticket, result)
    }
}

impl ListView<DeviceStatus> {
    pub async fn load_devices(&mut self, queries: &DiagnosticsQueries, page: u32) -> bool {
        let ticket = self.begin(page);
        let params = ListParams::devices().window(ticket.skip, ticket.limit);
        let result = queries.list_device_status(params).await;
        self.complete(ticket, result)
    }
}

/// Display-ready equipment table row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EquipmentRow {
    pub id: String,
    pub project: String,
    pub location: String,
    pub equipment: String,
    pub discharge_type: String,
    pub severity: String,
    pub frequency: String,
    pub diagnosis_time: String,
    pub status_label: String,
    pub status_tier: StatusTier,
    pub report_label: String,
}

impl From<&EquipmentStatus> for EquipmentRow {
    fn from(equipment: &EquipmentStatus) -> Self {
        let condition = equipment.condition();
        Self {
            id: equipment.id().to_string(),
            project: equipment.entity_name.clone().unwrap_or_default(),
            location: equipment.entity_description.clone().unwrap_or_default(),
            equipment: equipment.name().to_string(),
            discharge_type: equipment.discharge_type_text(),
            severity: equipment.severity_text(),
            frequency: equipment.frequency_text(),
            diagnosis_time: equipment.diagnosis_time.clone().unwrap_or_default(),
            status_label: condition.label(),
            status_tier: condition.tier(),
            report_label: equipment
                .report_query
                .clone()
                .filter(|label| !label.trim().is_empty())
                .unwrap_or_else(|| "View report".to_string()),
        }
    }
}

/// Display-ready sensor table row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceRow {
    pub id: String,
    pub project: String,
    pub equipment: String,
    pub location: String,
    pub name: String,
    pub voltage: String,
    pub firmware: String,
    pub status_label: String,
    pub status_tier: StatusTier,
}

impl From<&DeviceStatus> for DeviceRow {
    fn from(device: &DeviceStatus) -> Self {
        let condition = device.condition();
        Self {
            id: device.device_id.clone(),
            project: device.entity_name.clone().unwrap_or_default(),
            equipment: device.monitored_equipment_name.clone(),
            location: device.device_description.clone(),
            name: device.device_name.clone(),
            voltage: device.device_voltage.clone(),
            firmware: device.device_firmware_version.clone(),
            status_label: condition.label(),
            status_tier: condition.tier(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::queries::tests::param;
    use crate::infrastructure::api_client::MockTransport;
    use serde_json::json;
    use std::sync::Arc;

    fn equipment(id: &str) -> EquipmentStatus {
        EquipmentStatus {
            monitored_equipment_id: Some(id.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_page_transitions_compute_window() {
        let mut view: ListView<EquipmentStatus> = ListView::new(8);
        assert_eq!(view.state(), &ListState::Idle);

        for page in 1..=5 {
            let ticket = view.begin(page);
            assert_eq!(ticket.skip, (page - 1) * 8);
            assert_eq!(ticket.limit, 8);
            assert_eq!(view.state(), &ListState::Loading { page });
        }
    }

    #[test]
    fn test_loaded_and_failed_states() {
        let mut view = ListView::new(2);
        let ticket = view.begin(1);
        assert!(view.complete(ticket, Ok(Page::new(vec![equipment("A"), equipment("B")], Some(3)))));

        match view.state() {
            ListState::Loaded { items, info } => {
                assert_eq!(items.len(), 2);
                assert_eq!(info.total_pages, Some(2));
                assert!(info.has_more);
            }
            other => panic!("expected Loaded, got {other:?}"),
        }

        let ticket = view.begin(2);
        view.complete(ticket, Err(ApiError::Timeout));
        assert_eq!(
            view.state(),
            &ListState::Failed {
                page: 2,
                message: "request timed out".to_string()
            }
        );

        // retry stays on the failed page
        let ticket = view.retry();
        assert_eq!(ticket.page, 2);
        assert_eq!(ticket.skip, 2);
    }

    #[test]
    fn test_stale_response_discarded() {
        let mut view = ListView::new(8);
        let first = view.begin(1);
        let second = view.begin(2);

        assert!(!view.complete(first, Ok(Page::new(vec![equipment("OLD")], None))));
        assert_eq!(view.state(), &ListState::Loading { page: 2 });

        assert!(view.complete(second, Ok(Page::new(vec![equipment("NEW")], None))));
        match view.state() {
            ListState::Loaded { items, info } => {
                assert_eq!(items[0].id(), "NEW");
                assert_eq!(info.page, 2);
            }
            other => panic!("expected Loaded, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_load_equipment_requests_page() {
        let mut mock = MockTransport::new();
        mock.expect_get()
            .withf(|path, query| {
                path == "/equipment_status"
                    && param(query, "skip") == Some("8")
                    && param(query, "limit") == Some("8")
            })
            .returning(|_, _| {
                Box::pin(async {
                    Ok(json!({"items": [{"monitored_equipment_id": "EQ-9", "monitored_equipment_status": "level3"}]}))
                })
            });

        let queries = DiagnosticsQueries::new(Arc::new(mock));
        let mut view = ListView::new(8);
        assert!(view.load_equipment(&queries, 2).await);

        let rows = view.into_state().map(|e| EquipmentRow::from(&e));
        match rows {
            ListState::Loaded { items, .. } => {
                assert_eq!(items[0].id, "EQ-9");
                assert_eq!(items[0].status_label, "Level 3");
                assert_eq!(items[0].status_tier, StatusTier::Critical);
            }
            other => panic!("expected Loaded, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_load_devices_failure_message() {
        let mut mock = MockTransport::new();
        mock.expect_get().returning(|_, _| {
            Box::pin(async {
                Err(ApiError::ServerError {
                    status: 503,
                    message: "Database offline".to_string(),
                })
            })
        });

        let queries = DiagnosticsQueries::new(Arc::new(mock));
        let mut view: ListView<DeviceStatus> = ListView::new(8);
        view.load_devices(&queries, 1).await;
        assert_eq!(
            view.state(),
            &ListState::Failed {
                page: 1,
                message: "Database offline".to_string()
            }
        );
    }

    #[test]
    fn test_device_row() {
        let device = DeviceStatus {
            device_id: "S-3".to_string(),
            device_name: "TEV sensor".to_string(),
            device_status: "offline".to_string(),
            device_voltage: "3.6V".to_string(),
            ..Default::default()
        };
        let row = DeviceRow::from(&device);
        assert_eq!(row.status_label, "offline");
        assert_eq!(row.status_tier, StatusTier::Neutral);
        assert_eq!(row.voltage, "3.6V");
    }
}
