// Diagnostic trace of upstream requests - recording never blocks or fails the caller
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};

const CHANNEL_DEPTH: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceKind {
    Request,
    Response,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceEvent {
    pub at_epoch_ms: i64,
    pub kind: TraceKind,
    pub url: String,
    pub status: Option<u16>,
    pub elapsed_ms: Option<u64>,
    pub detail: Option<String>,
}

impl TraceEvent {
    fn new(kind: TraceKind, url: &str) -> Self {
        Self {
            at_epoch_ms: chrono::Utc::now().timestamp_millis(),
            kind,
            url: url.to_string(),
            status: None,
            elapsed_ms: None,
            detail: None,
        }
    }

    pub fn request(url: &str) -> Self {
        Self::new(TraceKind::Request, url)
    }

    pub fn response(url: &str, status: u16, elapsed_ms: u64) -> Self {
        Self {
            status: Some(status),
            elapsed_ms: Some(elapsed_ms),
            ..Self::new(TraceKind::Response, url)
        }
    }

    pub fn failure(url: &str, status: Option<u16>, elapsed_ms: u64, detail: String) -> Self {
        Self {
            status,
            elapsed_ms: Some(elapsed_ms),
            detail: Some(detail),
            ..Self::new(TraceKind::Failure, url)
        }
    }
}

/// Sending half handed to the HTTP adapter.
#[derive(Debug, Clone)]
pub struct RequestTrace {
    tx: mpsc::Sender<TraceEvent>,
}

impl RequestTrace {
    /// Drops the event when the channel is full or closed.
    pub fn record(&self, event: TraceEvent) {
        let _ = self.tx.try_send(event);
    }

    /// A trace whose receiver is already gone; every record is dropped.
    pub fn disabled() -> Self {
        let (tx, _rx) = mpsc::channel(1);
        Self { tx }
    }
}

/// Most recent trace events, newest last.
#[derive(Debug, Clone)]
pub struct TraceLog {
    events: Arc<RwLock<VecDeque<TraceEvent>>>,
    capacity: usize,
}

impl TraceLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            events: Arc::new(RwLock::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    pub async fn push(&self, event: TraceEvent) {
        if self.capacity == 0 {
            return;
        }
        let mut events = self.events.write().await;
        while events.len() >= self.capacity {
            events.pop_front();
        }
        events.push_back(event);
    }

    pub async fn recent(&self) -> Vec<TraceEvent> {
        self.events.read().await.iter().cloned().collect()
    }
}

/// Start the drain task that logs every event and keeps the last `capacity` of them.
pub fn spawn_trace(capacity: usize) -> (RequestTrace, TraceLog) {
    let (tx, mut rx) = mpsc::channel::<TraceEvent>(CHANNEL_DEPTH);
    let log = TraceLog::new(capacity);
    let sink = log.clone();

    tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match event.kind {
                TraceKind::Request => tracing::debug!("-> GET {}", event.url),
                TraceKind::Response => tracing::debug!(
                    "<- {} {} ({} ms)",
                    event.status.unwrap_or_default(),
                    event.url,
                    event.elapsed_ms.unwrap_or_default()
                ),
                TraceKind::Failure => tracing::warn!(
                    "x- {} failed after {} ms: {}",
                    event.url,
                    event.elapsed_ms.unwrap_or_default(),
                    event.detail.as_deref().unwrap_or("")
                ),
            }
            sink.push(event).await;
        }
    });

    (RequestTrace { tx }, log)
}
