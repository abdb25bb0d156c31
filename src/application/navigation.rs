// Equipment row selection - loads the sensors handed to the detail view
use crate::application::queries::{DiagnosticsQueries, ListParams};
use crate::domain::device::DeviceStatus;
use crate::domain::equipment::EquipmentStatus;
use crate::error::ApiError;
use serde::Serialize;

/// Upper bound on sensors fetched for one equipment unit.
const SENSOR_FETCH_LIMIT: u32 = 100;

/// What the detail view is opened with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailHandoff {
    pub equipment: EquipmentStatus,
    pub devices: Vec<DeviceStatus>,
}

pub async fn open_equipment(
    queries: &DiagnosticsQueries,
    equipment: EquipmentStatus,
) -> Result<DetailHandoff, ApiError> {
    let params = ListParams::devices().window(0, SENSOR_FETCH_LIMIT);
    let page = queries
        .list_device_status_for_equipment(equipment.id(), params)
        .await
        .inspect_err(|e| {
            tracing::warn!(
                "Cannot open equipment '{}': sensor list failed: {}",
                equipment.id(),
                e
            )
        })?;

    tracing::debug!(
        "Opening equipment '{}' with {} sensors",
        equipment.id(),
        page.items.len()
    );

    Ok(DetailHandoff {
        equipment,
        devices: page.items,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::queries::tests::param;
    use crate::infrastructure::api_client::MockTransport;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_open_equipment_fetches_sensors() {
        let mut mock = MockTransport::new();
        mock.expect_get()
            .withf(|path, query| {
                path == "/equipment_device_status"
                    && param(query, "equipment_id") == Some("EQ-7")
                    && param(query, "limit") == Some("100")
                    && param(query, "skip") == Some("0")
            })
            .times(1)
            .returning(|_, _| {
                Box::pin(async {
                    Ok(json!({"items": [
                        {"device_id": "S-1", "device_name": "UHF-1"},
                        {"device_id": "S-2", "device_name": "UHF-2"}
                    ]}))
                })
            });

        let queries = DiagnosticsQueries::new(Arc::new(mock));
        let equipment = EquipmentStatus {
            monitored_equipment_id: Some("EQ-7".to_string()),
            ..Default::default()
        };
        let handoff = open_equipment(&queries, equipment).await.unwrap();
        assert_eq!(handoff.equipment.id(), "EQ-7");
        assert_eq!(handoff.devices.len(), 2);
    }

    #[tokio::test]
    async fn test_open_equipment_surfaces_failure() {
        let mut mock = MockTransport::new();
        mock.expect_get().returning(|_, _| {
            Box::pin(async { Err(ApiError::NetworkUnreachable("down".to_string())) })
        });

        let queries = DiagnosticsQueries::new(Arc::new(mock));
        let err = open_equipment(&queries, EquipmentStatus::default())
            .await
            .unwrap_err();
        assert_eq!(err, ApiError::NetworkUnreachable("down".to_string()));
    }
}
