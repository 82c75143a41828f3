//! namecheck - naming convention checker for cppcheck dump files.
//!
//! namecheck reads the program model that `cppcheck --dump` writes and
//! reports every variable, constant, class and function whose name does not
//! match the pattern configured for its category.
//!
//! # Architecture
//!
//! - `config`: policy resolution from command-line flags or a JSON file
//! - `pattern`: compiled pattern cache with start-anchored matching
//! - `model`: read-only symbol view and the dump file loader
//! - `check`: rule engine, deduplicating sink and the per-run context
//! - `report`: text and JSON-lines output for the host tool
//! - `cli`: argument parsing, input collection and exit codes

pub mod check;
pub mod cli;
pub mod config;
pub mod model;
pub mod pattern;
pub mod report;

pub use check::{Finding, RuleEngine, RuleId, RunContext};
pub use config::{ConfigError, Policy};
pub use model::{DumpFile, Symbol, SymbolModelView};
pub use pattern::PatternCache;
pub use report::Reporter;
