//! Naming checks over program models.

mod engine;
mod runner;
mod sink;
mod types;

pub use engine::RuleEngine;
pub use runner::{ModelSummary, RunContext};
pub use sink::{DiagnosticSink, Disposition};
pub use types::{Category, DedupKey, Finding, RuleId, Severity};

use thiserror::Error;

/// Errors raised while checking a model.
#[derive(Error, Debug)]
pub enum CheckError {
    #[error("compiling pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error("writing report: {0}")]
    Report(#[from] std::io::Error),
}
