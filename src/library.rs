//! Built-in node palette
//!
//! Descriptors are the creation-time half of a node: the kind, label,
//! and initial output/log a new node starts with. The host's palette
//! drags one of the built-in tags onto the canvas; the drop path turns
//! the tag into a `Custom` descriptor.

use crate::types::{NodeKind, LOG_INITIALIZED, OUTPUT_NOT_RUN};

/// Drag-payload tags offered by the default palette
pub const PALETTE: [&str; 5] = [
    "Core Logic",
    "Memory",
    "Sensory Input",
    "Actuator Output",
    "Custom Layer",
];

/// Creation-time description of a node
#[derive(Debug, Clone)]
pub struct NodeDescriptor {
    /// Categorization tag for the new node
    pub kind: NodeKind,
    /// Display name for the new node
    pub label: String,
    /// Initial output text
    pub output: String,
    /// Initial log line
    pub log: String,
}

impl NodeDescriptor {
    /// Create a descriptor with default output/log
    pub fn new(kind: NodeKind, label: impl Into<String>) -> Self {
        Self {
            kind,
            label: label.into(),
            output: OUTPUT_NOT_RUN.to_string(),
            log: LOG_INITIALIZED.to_string(),
        }
    }

    /// Set the initial output text
    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.output = output.into();
        self
    }

    /// Set the initial log line
    pub fn with_log(mut self, log: impl Into<String>) -> Self {
        self.log = log.into();
        self
    }
}

/// Descriptor for a node dropped from the palette
///
/// Every drop produces a `Custom` node labeled after its payload tag,
/// awaiting configuration.
pub fn descriptor_for_tag(tag: &str) -> NodeDescriptor {
    NodeDescriptor::new(NodeKind::Custom, format!("{tag} Node"))
        .with_output("Newly added")
        .with_log("Awaiting configuration")
}
