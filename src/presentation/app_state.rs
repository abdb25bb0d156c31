// Application state for HTTP handlers
use crate::application::queries::DiagnosticsQueries;
use crate::domain::equipment::EquipmentStatus;
use crate::infrastructure::trace::TraceLog;
use std::collections::{HashMap, VecDeque};
use tokio::sync::RwLock;

/// Most equipment rows kept for detail navigation; the oldest are evicted first.
const LISTED_CAPACITY: usize = 1024;

/// Equipment rows handed out by the list views, keyed by id.
#[derive(Debug, Default)]
struct ListedRows {
    rows: HashMap<String, EquipmentStatus>,
    order: VecDeque<String>,
}

impl ListedRows {
    fn insert(&mut self, row: &EquipmentStatus, capacity: usize) {
        let id = row.id().to_string();
        if self.rows.insert(id.clone(), row.clone()).is_some() {
            self.order.retain(|listed| *listed != id);
        }
        self.order.push_back(id);

        while self.order.len() > capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.rows.remove(&oldest);
            }
        }
    }
}

pub struct AppState {
    pub queries: DiagnosticsQueries,
    pub page_size: u32,
    pub trace_log: TraceLog,
    listed: RwLock<ListedRows>,
    listed_capacity: usize,
}

impl AppState {
    pub fn new(queries: DiagnosticsQueries, page_size: u32, trace_log: TraceLog) -> Self {
        Self {
            queries,
            page_size,
            trace_log,
            listed: RwLock::new(ListedRows::default()),
            listed_capacity: LISTED_CAPACITY,
        }
    }

    /// Refreshes rows already known and evicts the oldest beyond capacity.
    pub async fn remember_listed(&self, rows: &[EquipmentStatus]) {
        let mut listed = self.listed.write().await;
        for row in rows {
            listed.insert(row, self.listed_capacity);
        }
    }

    pub async fn listed_equipment(&self, id: &str) -> Option<EquipmentStatus> {
        self.listed.read().await.rows.get(id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::api_client::MockTransport;
    use std::sync::Arc;

    fn equipment(id: &str, status: &str) -> EquipmentStatus {
        EquipmentStatus {
            monitored_equipment_id: Some(id.to_string()),
            monitored_equipment_status: Some(status.to_string()),
            ..Default::default()
        }
    }

    fn state(capacity: usize) -> AppState {
        let queries = DiagnosticsQueries::new(Arc::new(MockTransport::new()));
        AppState {
            listed_capacity: capacity,
            ..AppState::new(queries, 8, TraceLog::new(1))
        }
    }

    #[tokio::test]
    async fn test_listed_rows_are_capped() {
        let state = state(2);
        state
            .remember_listed(&[equipment("A", "normal"), equipment("B", "normal")])
            .await;
        state.remember_listed(&[equipment("C", "normal")]).await;

        assert!(state.listed_equipment("A").await.is_none());
        assert!(state.listed_equipment("B").await.is_some());
        assert!(state.listed_equipment("C").await.is_some());
    }

    #[tokio::test]
    async fn test_relisting_refreshes_row() {
        let state = state(2);
        state
            .remember_listed(&[equipment("A", "normal"), equipment("B", "normal")])
            .await;
        state.remember_listed(&[equipment("A", "level3")]).await;
        state.remember_listed(&[equipment("C", "normal")]).await;

        // A was refreshed after B, so B is the oldest
        let a = state.listed_equipment("A").await.unwrap();
        assert_eq!(a.monitored_equipment_status.as_deref(), Some("level3"));
        assert!(state.listed_equipment("B").await.is_none());
    }
}
