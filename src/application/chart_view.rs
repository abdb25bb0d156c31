// Chart views - shared request lifecycle for the four analysis charts
use crate::application::queries::{ChartParams, DiagnosticsQueries};
use crate::domain::chart::{ChartDataset, ChartKind, ChartProjection, Channel};
use crate::error::ApiError;
use chrono::NaiveDate;
use serde::Serialize;

/// Chart queries are always made without threshold or phase offset.
const THRESHOLD_DBMV: f64 = 0.0;
const INITIAL_PHASE_DEGREES: f64 = 0.0;

pub const NO_SENSOR_MESSAGE: &str = "Please select a sensor";
pub const EMPTY_WINDOW_MESSAGE: &str = "No data in the selected time window";

/// Everything a chart fetch depends on; a change restarts the lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartInputs {
    pub sensor: Option<String>,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub channel: Channel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ChartState {
    Idle,
    Loading { generation: u64 },
    Empty,
    Failed { message: String },
    Loaded { projection: ChartProjection },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartTicket {
    pub generation: u64,
    pub params: ChartParams,
}

#[derive(Debug, Clone)]
pub struct ChartView {
    kind: ChartKind,
    inputs: Option<ChartInputs>,
    generation: u64,
    state: ChartState,
}

impl ChartView {
    pub fn new(kind: ChartKind) -> Self {
        Self {
            kind,
            inputs: None,
            generation: 0,
            state: ChartState::Idle,
        }
    }

    pub fn kind(&self) -> ChartKind {
        self.kind
    }

    pub fn state(&self) -> &ChartState {
        &self.state
    }

    pub fn is_empty_window(&self) -> bool {
        self.state == ChartState::Empty
    }

    /// Start a fetch for new inputs. Returns `None` when nothing needs fetching.
    pub fn request(&mut self, inputs: ChartInputs) -> Option<ChartTicket> {
        if !self.kind.is_implemented() {
            return None;
        }
        if self.inputs.as_ref() == Some(&inputs) && self.state != ChartState::Idle {
            return None;
        }
        self.generation += 1;
        self.inputs = Some(inputs.clone());

        let Some(sensor) = inputs.sensor else {
            self.state = ChartState::Failed {
                message: NO_SENSOR_MESSAGE.to_string(),
            };
            return None;
        };

        self.state = ChartState::Loading {
            generation: self.generation,
        };
        tracing::debug!(
            "{} chart loading sensor {} from {} to {}",
            self.kind.slug(),
            sensor,
            inputs.start,
            inputs.end
        );

        let params = ChartParams::new(inputs.start.to_string(), inputs.end.to_string())
            .device(sensor)
            .channel(inputs.channel.as_param())
            .threshold(THRESHOLD_DBMV)
            .initial_phase(INITIAL_PHASE_DEGREES);

        Some(ChartTicket {
            generation: self.generation,
            params,
        })
    }

    /// Apply a response. Returns `false` when the ticket is stale and the response was dropped.
    pub fn complete(
        &mut self,
        ticket: ChartTicket,
        result: Result<Option<ChartDataset>, ApiError>,
    ) -> bool {
        if ticket.generation != self.generation {
            tracing::debug!(
                "Discarding stale {} chart response (generation {} < {})",
                self.kind.slug(),
                ticket.generation,
                self.generation
            );
            return false;
        }

        let projection = result.and_then(|dataset| match dataset {
            Some(dataset) => dataset.project(self.kind),
            None => Ok(None),
        });

        self.state = match projection {
            Ok(Some(projection)) => ChartState::Loaded { projection },
            Ok(None) => ChartState::Empty,
            Err(e) => ChartState::Failed {
                message: e.user_message(),
            },
        };
        true
    }

    pub async fn load(&mut self, queries: &DiagnosticsQueries, inputs: ChartInputs) -> bool {
        let Some(ticket) = self.request(inputs) else {
            return false;
        };
        let result = queries.fetch_chart_dataset(ticket.params.clone()).await;
        self.complete(ticket, result)
    }
}
