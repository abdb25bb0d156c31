// Typed query functions - one per diagnostic API resource
use crate::domain::calendar::normalize_to_midnight;
use crate::domain::chart::{ChartDataResponse, ChartDataset};
use crate::domain::device::DeviceStatus;
use crate::domain::equipment::EquipmentStatus;
use crate::domain::page::{Page, SortOrder};
use crate::error::ApiError;
use crate::infrastructure::api_client::Transport;
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Paging and sorting for the list endpoints.
#[derive(Debug, Clone, PartialEq)]
pub struct ListParams {
    pub skip: u32,
    pub limit: u32,
    pub sort_field: String,
    pub sort_order: SortOrder,
}

impl ListParams {
    /// Defaults for `/equipment_status`.
    pub fn equipment() -> Self {
        Self::sorted_by("monitored_equipment_name")
    }

    /// Defaults for `/device_status` and `/equipment_device_status`.
    pub fn devices() -> Self {
        Self::sorted_by("device_name")
    }

    fn sorted_by(field: &str) -> Self {
        Self {
            skip: 0,
            limit: 10,
            sort_field: field.to_string(),
            sort_order: SortOrder::Ascending,
        }
    }

    pub fn window(mut self, skip: u32, limit: u32) -> Self {
        self.skip = skip;
        self.limit = limit;
        self
    }

    fn to_query(&self) -> Vec<(String, String)> {
        vec![
            ("skip".to_string(), self.skip.to_string()),
            ("limit".to_string(), self.limit.to_string()),
            ("sort_field".to_string(), self.sort_field.clone()),
            ("sort_order".to_string(), self.sort_order.as_param().to_string()),
        ]
    }
}

/// Parameters for `/chart_data`. Times may carry a time of day; only the date is sent.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChartParams {
    pub start_time: String,
    pub end_time: String,
    pub device_id: Option<String>,
    pub channel: Option<String>,
    pub threshold_in_dbmv: Option<f64>,
    pub initial_phase_in_degree: Option<f64>,
}

impl ChartParams {
    pub fn new(start_time: impl Into<String>, end_time: impl Into<String>) -> Self {
        Self {
            start_time: start_time.into(),
            end_time: end_time.into(),
            ..Default::default()
        }
    }

    pub fn device(mut self, device_id: impl Into<String>) -> Self {
        self.device_id = Some(device_id.into());
        self
    }

    pub fn channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = Some(channel.into());
        self
    }

    pub fn threshold(mut self, threshold_in_dbmv: f64) -> Self {
        self.threshold_in_dbmv = Some(threshold_in_dbmv);
        self
    }

    pub fn initial_phase(mut self, degrees: f64) -> Self {
        self.initial_phase_in_degree = Some(degrees);
        self
    }

    fn to_query(&self) -> Result<Vec<(String, String)>, ApiError> {
        let mut query = vec![
            ("start_time".to_string(), normalize_to_midnight(&self.start_time)?),
            ("end_time".to_string(), normalize_to_midnight(&self.end_time)?),
        ];
        if let Some(device_id) = &self.device_id {
            query.push(("device_id".to_string(), device_id.clone()));
        }
        if let Some(channel) = &self.channel {
            query.push(("channel".to_string(), channel.clone()));
        }
        if let Some(threshold) = self.threshold_in_dbmv {
            query.push(("threshold_in_dBmV".to_string(), threshold.to_string()));
        }
        if let Some(phase) = self.initial_phase_in_degree {
            query.push(("initial_phase_in_degree".to_string(), phase.to_string()));
        }
        Ok(query)
    }
}

#[derive(Clone)]
pub struct DiagnosticsQueries {
    transport: Arc<dyn Transport>,
}

impl DiagnosticsQueries {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub async fn list_equipment_status(
        &self,
        params: ListParams,
    ) -> Result<Page<EquipmentStatus>, ApiError> {
        self.fetch("/equipment_status", params.to_query())
            .await
            .inspect_err(|e| tracing::error!("Failed to fetch equipment status: {}", e))
    }

    pub async fn list_device_status(
        &self,
        params: ListParams,
    ) -> Result<Page<DeviceStatus>, ApiError> {
        self.fetch("/device_status", params.to_query())
            .await
            .inspect_err(|e| tracing::error!("Failed to fetch device status: {}", e))
    }

    /// The equipment id is passed through as given; the server decides what an empty id means.
    pub async fn list_device_status_for_equipment(
        &self,
        equipment_id: &str,
        params: ListParams,
    ) -> Result<Page<DeviceStatus>, ApiError> {
        let mut query = vec![("equipment_id".to_string(), equipment_id.to_string())];
        query.extend(params.to_query());

        self.fetch("/equipment_device_status", query)
            .await
            .inspect_err(|e| {
                tracing::error!(
                    "Failed to fetch device status for equipment '{}': {}",
                    equipment_id,
                    e
                )
            })
    }

    /// `Ok(None)` when the server has no chart for the requested window.
    pub async fn fetch_chart_dataset(
        &self,
        params: ChartParams,
    ) -> Result<Option<ChartDataset>, ApiError> {
        let query = params.to_query()?;
        let response: ChartDataResponse = self
            .fetch("/chart_data", query)
            .await
            .inspect_err(|e| tracing::error!("Failed to fetch chart data: {}", e))?;

        let dataset = response.into_first();
        tracing::debug!(
            "Chart data for device {:?}: {}",
            params.device_id,
            if dataset.is_some() { "received" } else { "empty window" }
        );
        Ok(dataset)
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Vec<(String, String)>,
    ) -> Result<T, ApiError> {
        let value = self.transport.get(path, &query).await?;
        serde_json::from_value(value).map_err(|e| {
            ApiError::MalformedResponse(format!("unexpected {} payload: {}", path, e))
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::infrastructure::api_client::MockTransport;
    use serde_json::json;

    pub(crate) fn param<'a>(query: &'a [(String, String)], key: &str) -> Option<&'a str> {
        query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[tokio::test]
    async fn test_equipment_defaults() {
        let mut mock = MockTransport::new();
        mock.expect_get()
            .withf(|path, query| {
                path == "/equipment_status"
                    && param(query, "skip") == Some("0")
                    && param(query, "limit") == Some("10")
                    && param(query, "sort_field") == Some("monitored_equipment_name")
                    && param(query, "sort_order") == Some("ASC")
            })
            .times(1)
            .returning(|_, _| {
                Box::pin(async {
                    Ok(json!({"items": [{"monitored_equipment_id": "EQ-1"}]}))
                })
            });

        let queries = DiagnosticsQueries::new(Arc::new(mock));
        let page = queries
            .list_equipment_status(ListParams::equipment())
            .await
            .unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].id(), "EQ-1");
        assert_eq!(page.total, None);
    }

    #[tokio::test]
    async fn test_device_defaults() {
        let mut mock = MockTransport::new();
        mock.expect_get()
            .withf(|path, query| {
                path == "/device_status"
                    && param(query, "sort_field") == Some("device_name")
                    && param(query, "sort_order") == Some("ASC")
                    && param(query, "skip") == Some("16")
                    && param(query, "limit") == Some("8")
            })
            .returning(|_, _| Box::pin(async { Ok(json!({"items": [], "total": 16})) }));

        let queries = DiagnosticsQueries::new(Arc::new(mock));
        let page = queries
            .list_device_status(ListParams::devices().window(16, 8))
            .await
            .unwrap();
        assert_eq!(page.total, Some(16));
    }

    #[tokio::test]
    async fn test_equipment_id_sent_unvalidated() {
        let mut mock = MockTransport::new();
        mock.expect_get()
            .withf(|path, query| {
                path == "/equipment_device_status" && param(query, "equipment_id") == Some("")
            })
            .returning(|_, _| Box::pin(async { Ok(json!({"items": []})) }));

        let queries = DiagnosticsQueries::new(Arc::new(mock));
        let page = queries
            .list_device_status_for_equipment("", ListParams::devices())
            .await
            .unwrap();
        assert!(page.items.is_empty());
    }

    #[tokio::test]
    async fn test_chart_dates_normalized_to_midnight() {
        let mut mock = MockTransport::new();
        mock.expect_get()
            .withf(|path, query| {
                path == "/chart_data"
                    && param(query, "start_time") == Some("2020-06-13T00:00:00")
                    && param(query, "end_time") == Some("2020-06-13T00:00:00")
                    && param(query, "device_id") == Some("S-1")
                    && param(query, "channel") == Some("UHF")
                    && param(query, "threshold_in_dBmV") == Some("0")
                    && param(query, "initial_phase_in_degree") == Some("0")
            })
            .times(1)
            .returning(|_, _| {
                Box::pin(async {
                    Ok(json!({"chart_data": {"charts": [{"device_id": "S-1", "phases": [0.0]}]}}))
                })
            });

        let queries = DiagnosticsQueries::new(Arc::new(mock));
        let params = ChartParams::new("2020-06-13T15:00:00", "2020-06-13T15:00:00")
            .device("S-1")
            .channel("UHF")
            .threshold(0.0)
            .initial_phase(0.0);
        let dataset = queries.fetch_chart_dataset(params).await.unwrap().unwrap();
        assert_eq!(dataset.phases, vec![0.0]);
    }

    #[tokio::test]
    async fn test_optional_chart_params_omitted() {
        let mut mock = MockTransport::new();
        mock.expect_get()
            .withf(|_, query| {
                query.len() == 2 && param(query, "device_id").is_none()
            })
            .returning(|_, _| Box::pin(async { Ok(json!({"chart_data": {"charts": []}})) }));

        let queries = DiagnosticsQueries::new(Arc::new(mock));
        let dataset = queries
            .fetch_chart_dataset(ChartParams::new("2020-06-13", "2020-06-14"))
            .await
            .unwrap();
        assert!(dataset.is_none());
    }

    #[tokio::test]
    async fn test_invalid_date_fails_before_network() {
        let mut mock = MockTransport::new();
        mock.expect_get().times(0);

        let queries = DiagnosticsQueries::new(Arc::new(mock));
        let err = queries
            .fetch_chart_dataset(ChartParams::new("2020-06-13", "not a date"))
            .await
            .unwrap_err();
        assert_eq!(err, ApiError::InvalidDate("not a date".to_string()));
    }

    #[tokio::test]
    async fn test_adapter_errors_propagate_unchanged() {
        let mut mock = MockTransport::new();
        mock.expect_get()
            .times(1)
            .returning(|_, _| Box::pin(async { Err(ApiError::Timeout) }));

        let queries = DiagnosticsQueries::new(Arc::new(mock));
        let err = queries
            .list_equipment_status(ListParams::equipment())
            .await
            .unwrap_err();
        assert_eq!(err, ApiError::Timeout);
    }

    #[tokio::test]
    async fn test_unexpected_shape_is_malformed() {
        let mut mock = MockTransport::new();
        mock.expect_get()
            .returning(|_, _| Box::pin(async { Ok(json!({"rows": []})) }));

        let queries = DiagnosticsQueries::new(Arc::new(mock));
        let err = queries
            .list_device_status(ListParams::devices())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::MalformedResponse(_)));
    }
}
