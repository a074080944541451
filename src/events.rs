//! Event types for streaming execution status to the host
//!
//! The core never renders; it reports node and pipeline status changes
//! through an [`EventSink`] so the host can re-render whatever it likes.

use serde::{Deserialize, Serialize};

use crate::types::{NodeId, NodeStatus};

/// Trait for delivering pipeline events to the host
///
/// Abstracts over the transport (channel, callback, UI queue) so the
/// scheduler can run in any embedding.
pub trait EventSink: Send + Sync {
    /// Send an event
    ///
    /// Returns an error if the event could not be delivered (e.g., the
    /// host side hung up).
    fn send(&self, event: PipelineEvent) -> Result<(), EventError>;
}

/// Error when delivering an event fails
#[derive(Debug, Clone)]
pub struct EventError {
    pub message: String,
}

impl std::fmt::Display for EventError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Event error: {}", self.message)
    }
}

impl std::error::Error for EventError {}

impl EventError {
    pub fn channel_closed() -> Self {
        Self {
            message: "Channel closed".to_string(),
        }
    }
}

/// Status events emitted by the execution scheduler
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PipelineEvent {
    /// A node entered `running`
    #[serde(rename_all = "camelCase")]
    NodeStarted { node_id: NodeId },

    /// A node's scheduled completion fired and was applied
    #[serde(rename_all = "camelCase")]
    NodeFinished { node_id: NodeId, status: NodeStatus },

    /// A node was forced back to `idle` by the user
    #[serde(rename_all = "camelCase")]
    NodeStopped { node_id: NodeId },

    /// A pipeline run started
    #[serde(rename_all = "camelCase")]
    PipelineStarted { node_count: usize },

    /// The pipeline run's settle timer elapsed; pipeline is idle again
    PipelineSettled,

    /// The pipeline was stopped by the user
    PipelineStopped,

    /// Every node was reset to its neutral state
    PipelineReset,
}

/// A no-op event sink that discards all events
///
/// Useful for testing or when status callbacks aren't needed.
pub struct NullEventSink;

impl EventSink for NullEventSink {
    fn send(&self, _event: PipelineEvent) -> Result<(), EventError> {
        Ok(())
    }
}

/// A vector-based event sink that collects events
///
/// Useful for testing to verify events were emitted correctly.
pub struct VecEventSink {
    events: std::sync::Mutex<Vec<PipelineEvent>>,
}

impl VecEventSink {
    pub fn new() -> Self {
        Self {
            events: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Get all collected events
    pub fn events(&self) -> Vec<PipelineEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Clear all collected events
    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }
}

impl Default for VecEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for VecEventSink {
    fn send(&self, event: PipelineEvent) -> Result<(), EventError> {
        self.events.lock().unwrap().push(event);
        Ok(())
    }
}
