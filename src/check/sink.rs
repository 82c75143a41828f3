//! Exclusion, deduplication and forwarding of findings.

use std::collections::HashSet;

use crate::pattern::PatternCache;
use crate::report::Reporter;

use super::{CheckError, DedupKey, Finding};

/// What happened to a submitted finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Passed to the reporter.
    Forwarded,
    /// Dropped because its file matches an exclusion pattern.
    Excluded,
    /// Dropped because the same key was already forwarded.
    Duplicate,
}

/// Forwards each distinct finding to a reporter at most once per run.
pub struct DiagnosticSink<R> {
    seen: HashSet<DedupKey>,
    reporter: R,
    forwarded: usize,
}

impl<R: Reporter> DiagnosticSink<R> {
    pub fn new(reporter: R) -> Self {
        Self {
            seen: HashSet::new(),
            reporter,
            forwarded: 0,
        }
    }

    /// Filter a finding and forward it if it is new.
    ///
    /// Excluded findings never enter the dedup set, so they cannot shadow a
    /// later finding with the same key.
    pub fn submit(
        &mut self,
        finding: Finding,
        exclude: &[String],
        patterns: &mut PatternCache,
    ) -> Result<Disposition, CheckError> {
        for p in exclude {
            if patterns.matches_prefix(p, &finding.position.file)? {
                tracing::debug!(
                    position = %finding.position,
                    rule = %finding.rule,
                    exclude = %p,
                    "finding excluded"
                );
                return Ok(Disposition::Excluded);
            }
        }

        if !self.seen.insert(finding.key()) {
            tracing::debug!(
                position = %finding.position,
                rule = %finding.rule,
                "duplicate finding suppressed"
            );
            return Ok(Disposition::Duplicate);
        }

        self.reporter.report(&finding)?;
        self.forwarded += 1;
        Ok(Disposition::Forwarded)
    }

    /// Whether any finding has been forwarded.
    pub fn any_reported(&self) -> bool {
        self.forwarded > 0
    }

    pub fn forwarded(&self) -> usize {
        self.forwarded
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    pub fn into_reporter(self) -> R {
        self.reporter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::{Category, RuleId};
    use crate::model::Position;

    fn finding(file: &str, line: u32, category: Category) -> Finding {
        Finding::new(category, "Bad", "[a-z]", Position::new(file, line, 5))
    }

    #[test]
    fn test_duplicates_dropped() {
        let mut sink = DiagnosticSink::new(Vec::<Finding>::new());
        let mut cache = PatternCache::new();

        let first = sink
            .submit(finding("a.cpp", 3, Category::Variable), &[], &mut cache)
            .unwrap();
        let again = sink
            .submit(finding("a.cpp", 3, Category::Variable), &[], &mut cache)
            .unwrap();
        assert_eq!(first, Disposition::Forwarded);
        assert_eq!(again, Disposition::Duplicate);
        assert_eq!(sink.forwarded(), 1);
        assert_eq!(sink.reporter().len(), 1);
    }

    #[test]
    fn test_rule_is_part_of_key() {
        let mut sink = DiagnosticSink::new(Vec::<Finding>::new());
        let mut cache = PatternCache::new();

        sink.submit(finding("a.cpp", 3, Category::MemberVariable), &[], &mut cache)
            .unwrap();
        let other_rule = sink
            .submit(
                finding("a.cpp", 3, Category::PrivateMemberVariable),
                &[],
                &mut cache,
            )
            .unwrap();
        assert_eq!(other_rule, Disposition::Forwarded);

        // Member and global variables share the varName rule.
        let same_rule = sink
            .submit(finding("a.cpp", 3, Category::GlobalVariable), &[], &mut cache)
            .unwrap();
        assert_eq!(same_rule, Disposition::Duplicate);
    }

    #[test]
    fn test_first_occurrence_wins() {
        let mut sink = DiagnosticSink::new(Vec::<Finding>::new());
        let mut cache = PatternCache::new();
        let mut a = finding("a.cpp", 3, Category::Variable);
        a.message = "first".to_string();
        let mut b = finding("a.cpp", 3, Category::Variable);
        b.message = "second".to_string();

        sink.submit(a, &[], &mut cache).unwrap();
        sink.submit(b, &[], &mut cache).unwrap();
        let reported = sink.into_reporter();
        assert_eq!(reported.len(), 1);
        assert_eq!(reported[0].message, "first");
    }

    #[test]
    fn test_excluded_not_recorded() {
        let mut sink = DiagnosticSink::new(Vec::<Finding>::new());
        let mut cache = PatternCache::new();
        let exclude = vec!["third_party/.*".to_string()];

        let excluded = sink
            .submit(finding("third_party/lib.h", 8, Category::Class), &exclude, &mut cache)
            .unwrap();
        assert_eq!(excluded, Disposition::Excluded);
        assert!(!sink.any_reported());

        // Same key without the exclusion list is still reported.
        let later = sink
            .submit(finding("third_party/lib.h", 8, Category::Class), &[], &mut cache)
            .unwrap();
        assert_eq!(later, Disposition::Forwarded);
        assert_eq!(sink.reporter()[0].rule, RuleId::ClassName);
    }

    #[test]
    fn test_exclusion_is_start_anchored() {
        let mut sink = DiagnosticSink::new(Vec::<Finding>::new());
        let mut cache = PatternCache::new();
        let exclude = vec!["third_party/".to_string()];

        let nested = sink
            .submit(finding("src/third_party/x.h", 1, Category::Class), &exclude, &mut cache)
            .unwrap();
        assert_eq!(nested, Disposition::Forwarded);
    }
}
