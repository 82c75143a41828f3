//! Output of findings to the host tool.
//!
//! Two formats follow the cppcheck addon conventions:
//! - Text: `[file:line:column] (style) message [naming-ruleId]`, one per line
//! - JSON lines: one object per finding, as read by `cppcheck --addon`

use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::check::Finding;

/// Addon name used as the prefix of every error id.
pub const ADDON_NAME: &str = "naming";

/// Destination for forwarded findings.
pub trait Reporter {
    fn report(&mut self, finding: &Finding) -> std::io::Result<()>;
}

/// Collects findings in memory.
impl Reporter for Vec<Finding> {
    fn report(&mut self, finding: &Finding) -> std::io::Result<()> {
        self.push(finding.clone());
        Ok(())
    }
}

// =============================================================================
// Text Format
// =============================================================================

/// Writes one human-readable line per finding.
pub struct TextReporter<W> {
    out: W,
}

impl<W: Write> TextReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for TextReporter<W> {
    fn report(&mut self, finding: &Finding) -> std::io::Result<()> {
        writeln!(self.out, "{}", format_text(finding))
    }
}

/// Format a finding as a single text line.
pub fn format_text(finding: &Finding) -> String {
    format!(
        "[{}] ({}) {} [{}-{}]",
        finding.position, finding.severity, finding.message, ADDON_NAME, finding.rule
    )
}

// =============================================================================
// JSON Lines Format (cppcheck addon protocol)
// =============================================================================

/// One finding in the addon JSON protocol.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonFinding {
    pub file: String,
    pub linenr: u32,
    pub column: u32,
    pub severity: String,
    pub message: String,
    pub addon: String,
    #[serde(rename = "errorId")]
    pub error_id: String,
    pub extra: String,
}

impl From<&Finding> for JsonFinding {
    fn from(f: &Finding) -> Self {
        JsonFinding {
            file: f.position.file.clone(),
            linenr: f.position.line,
            column: f.position.column,
            severity: f.severity.to_string(),
            message: f.message.clone(),
            addon: ADDON_NAME.to_string(),
            error_id: f.rule.as_str().to_string(),
            extra: String::new(),
        }
    }
}

/// Writes one compact JSON object per line.
pub struct JsonReporter<W> {
    out: W,
}

impl<W: Write> JsonReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for JsonReporter<W> {
    fn report(&mut self, finding: &Finding) -> std::io::Result<()> {
        let json = serde_json::to_string(&JsonFinding::from(finding))?;
        writeln!(self.out, "{}", json)
    }
}

/// Either output format, chosen at runtime.
pub enum AnyReporter<W> {
    Text(TextReporter<W>),
    Json(JsonReporter<W>),
}

impl<W: Write> Reporter for AnyReporter<W> {
    fn report(&mut self, finding: &Finding) -> std::io::Result<()> {
        match self {
            AnyReporter::Text(r) => r.report(finding),
            AnyReporter::Json(r) => r.report(finding),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::Category;
    use crate::model::Position;

    fn sample() -> Finding {
        Finding::new(
            Category::Constant,
            "MAX",
            "k[A-Z].*",
            Position::new("src/limits.h", 12, 1),
        )
    }

    #[test]
    fn test_text_format() {
        let mut reporter = TextReporter::new(Vec::new());
        reporter.report(&sample()).unwrap();
        let out = String::from_utf8(reporter.into_inner()).unwrap();
        assert_eq!(
            out,
            "[src/limits.h:12:1] (style) Constant MAX violates naming convention. k[A-Z].* [naming-constname]\n"
        );
    }

    #[test]
    fn test_json_lines() {
        let mut reporter = JsonReporter::new(Vec::new());
        reporter.report(&sample()).unwrap();
        reporter.report(&sample()).unwrap();
        let out = String::from_utf8(reporter.into_inner()).unwrap();

        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        let parsed: JsonFinding = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(parsed.file, "src/limits.h");
        assert_eq!(parsed.linenr, 12);
        assert_eq!(parsed.severity, "style");
        assert_eq!(parsed.addon, "naming");
        assert_eq!(parsed.error_id, "constname");
        assert_eq!(parsed.extra, "");
        assert!(lines[0].contains("\"errorId\":\"constname\""));
    }
}
