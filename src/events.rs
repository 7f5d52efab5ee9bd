//! Processing progress events
//!
//! Ingestion pushes step-by-step progress out-of-band for a live-log UI.
//! Emission is fire-and-forget: a sink must never block or fail the
//! ingestion path, so send errors are swallowed and logged at debug level.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Processing step tags consumed by the live-log UI.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessStep {
    Start,
    Download,
    Parse,
    Well,
    Curves,
    Insert,
    CurvesDone,
    Done,
    Error,
}

impl ProcessStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessStep::Start => "start",
            ProcessStep::Download => "download",
            ProcessStep::Parse => "parse",
            ProcessStep::Well => "well",
            ProcessStep::Curves => "curves",
            ProcessStep::Insert => "insert",
            ProcessStep::CurvesDone => "curves_done",
            ProcessStep::Done => "done",
            ProcessStep::Error => "error",
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProcessEvent {
    pub file_id: i32,
    pub message: String,
    pub step: ProcessStep,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inserted: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub well_id: Option<i32>,
}

impl ProcessEvent {
    pub fn new(file_id: i32, step: ProcessStep, message: impl Into<String>) -> Self {
        Self {
            file_id,
            message: message.into(),
            step,
            inserted: None,
            total: None,
            well_id: None,
        }
    }
}

/// Fire-and-forget event sink.
pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: ProcessEvent);
}

/// Sink that discards all events.
pub struct NullSink;

impl ProgressSink for NullSink {
    fn emit(&self, _event: ProcessEvent) {}
}

/// Sink over a tokio broadcast channel, for live subscribers.
pub struct BroadcastSink {
    tx: broadcast::Sender<ProcessEvent>,
}

impl BroadcastSink {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ProcessEvent> {
        self.tx.subscribe()
    }
}

impl ProgressSink for BroadcastSink {
    fn emit(&self, event: ProcessEvent) {
        if let Err(e) = self.tx.send(event) {
            tracing::debug!("no live progress subscribers: {e}");
        }
    }
}
