//! The template assembler: drives one inference run through its steps.

pub mod context;
pub mod error;
pub mod progress;
pub mod runner;

pub use context::InferenceContext;
pub use error::{PipelineError, PipelineWarning};
pub use progress::{
    AssemblyPhase, BroadcastProgress, InferenceProgressEvent, NoopProgress, ProgressEvent,
    ProgressReporter,
};
pub use runner::TemplateEngine;
