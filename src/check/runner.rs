//! Run context that threads policy, pattern cache and sink through a run.

use crate::config::Policy;
use crate::model::{DumpFile, SymbolModelView};
use crate::pattern::PatternCache;
use crate::report::Reporter;

use super::{CheckError, DiagnosticSink, Disposition, RuleEngine};

/// Counts for one or more checked models.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModelSummary {
    pub symbols: usize,
    /// Findings produced by the rules, before exclusion and deduplication.
    pub findings: usize,
    pub forwarded: usize,
    pub excluded: usize,
    pub duplicates: usize,
}

impl ModelSummary {
    /// Merge another summary into this one.
    pub fn merge(&mut self, other: ModelSummary) {
        self.symbols += other.symbols;
        self.findings += other.findings;
        self.forwarded += other.forwarded;
        self.excluded += other.excluded;
        self.duplicates += other.duplicates;
    }
}

/// Owns all state of one checking run.
///
/// The policy is fixed at construction; the pattern cache and the dedup set
/// only grow until the context is dropped.
pub struct RunContext<R> {
    policy: Policy,
    patterns: PatternCache,
    sink: DiagnosticSink<R>,
}

impl<R: Reporter> RunContext<R> {
    pub fn new(policy: Policy, reporter: R) -> Self {
        Self {
            policy,
            patterns: PatternCache::new(),
            sink: DiagnosticSink::new(reporter),
        }
    }

    /// Check every symbol of a model and forward new findings.
    pub fn check_model(&mut self, model: &dyn SymbolModelView) -> Result<ModelSummary, CheckError> {
        let mut summary = ModelSummary::default();

        for symbol in model.symbols() {
            summary.symbols += 1;
            let findings = RuleEngine::new(&self.policy, &mut self.patterns).evaluate(&symbol)?;
            for finding in findings {
                summary.findings += 1;
                match self
                    .sink
                    .submit(finding, &self.policy.exclude, &mut self.patterns)?
                {
                    Disposition::Forwarded => summary.forwarded += 1,
                    Disposition::Excluded => summary.excluded += 1,
                    Disposition::Duplicate => summary.duplicates += 1,
                }
            }
        }

        tracing::debug!(
            model = model.name(),
            symbols = summary.symbols,
            findings = summary.findings,
            forwarded = summary.forwarded,
            "checked model"
        );
        Ok(summary)
    }

    /// Check every configuration of a dump file, in document order.
    pub fn check_dump(&mut self, dump: &DumpFile) -> Result<ModelSummary, CheckError> {
        let mut summary = ModelSummary::default();
        for cfg in &dump.configurations {
            summary.merge(self.check_model(cfg)?);
        }
        Ok(summary)
    }

    /// Whether any finding has been forwarded during this run.
    pub fn any_reported(&self) -> bool {
        self.sink.any_reported()
    }

    pub fn forwarded(&self) -> usize {
        self.sink.forwarded()
    }

    pub fn into_reporter(self) -> R {
        self.sink.into_reporter()
    }
}
