use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Step of the inference state machine.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AssemblyPhase {
    Init,
    Mapping,
    Coverage,
    Grouping,
    PageSynthesis,
    Assembly,
    Done,
}

impl std::fmt::Display for AssemblyPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssemblyPhase::Init => write!(f, "Initializing"),
            AssemblyPhase::Mapping => write!(f, "Mapping elements"),
            AssemblyPhase::Coverage => write!(f, "Analyzing coverage"),
            AssemblyPhase::Grouping => write!(f, "Grouping pages"),
            AssemblyPhase::PageSynthesis => write!(f, "Synthesizing pages"),
            AssemblyPhase::Assembly => write!(f, "Assembling template"),
            AssemblyPhase::Done => write!(f, "Done"),
        }
    }
}

/// Events emitted by the engine while an inference run advances.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    Phase {
        phase: AssemblyPhase,
        message: String,
    },
    PageSynthesized {
        page_number: u32,
        max_page_number: u32,
        blocks: usize,
    },
    Completed {
        total_pages: usize,
        coverage_percentage: f64,
    },
}

pub trait ProgressReporter: Send + Sync {
    fn report(&self, event: ProgressEvent);
}

/// No-op reporter for library callers that do not track progress.
pub struct NoopProgress;

impl ProgressReporter for NoopProgress {
    fn report(&self, _event: ProgressEvent) {}
}

/// Serializable progress message for subscribers of a broadcast channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InferenceProgressEvent {
    pub run_id: String,
    pub phase: AssemblyPhase,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_number: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<usize>,
}

/// Forwards progress to a tokio broadcast channel.
pub struct BroadcastProgress {
    run_id: String,
    sender: Arc<broadcast::Sender<InferenceProgressEvent>>,
}

impl BroadcastProgress {
    pub fn new(run_id: &str, sender: Arc<broadcast::Sender<InferenceProgressEvent>>) -> Self {
        Self {
            run_id: run_id.to_string(),
            sender,
        }
    }

    fn event(&self, phase: AssemblyPhase, message: String) -> InferenceProgressEvent {
        InferenceProgressEvent {
            run_id: self.run_id.clone(),
            phase,
            message,
            timestamp: Utc::now(),
            page_number: None,
            total_pages: None,
        }
    }
}

impl ProgressReporter for BroadcastProgress {
    fn report(&self, event: ProgressEvent) {
        let message = match event {
            ProgressEvent::Phase { phase, message } => self.event(phase, message),
            ProgressEvent::PageSynthesized {
                page_number,
                max_page_number,
                blocks,
            } => {
                let mut message = self.event(
                    AssemblyPhase::PageSynthesis,
                    format!(
                        "Page {}/{} synthesized with {} blocks",
                        page_number, max_page_number, blocks
                    ),
                );
                message.page_number = Some(page_number);
                message
            }
            ProgressEvent::Completed {
                total_pages,
                coverage_percentage,
            } => {
                let mut message = self.event(
                    AssemblyPhase::Done,
                    format!(
                        "Template ready: {} pages, {}% catalog coverage",
                        total_pages, coverage_percentage
                    ),
                );
                message.total_pages = Some(total_pages);
                message
            }
        };

        // No subscribers is fine.
        let _ = self.sender.send(message);
    }
}
