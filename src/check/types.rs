//! Core types for naming findings.

use serde::Serialize;

use crate::model::{AccessLevel, Position};

/// Severity of a finding. Naming findings are always style issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Style,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Style => write!(f, "style"),
        }
    }
}

/// Rule identifiers reported to the host tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum RuleId {
    #[serde(rename = "varName")]
    VarName,
    #[serde(rename = "constname")]
    ConstName,
    #[serde(rename = "privateMemberVariable")]
    PrivateMemberVariable,
    #[serde(rename = "className")]
    ClassName,
    #[serde(rename = "functionName")]
    FunctionName,
}

impl RuleId {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleId::VarName => "varName",
            RuleId::ConstName => "constname",
            RuleId::PrivateMemberVariable => "privateMemberVariable",
            RuleId::ClassName => "className",
            RuleId::FunctionName => "functionName",
        }
    }
}

impl std::fmt::Display for RuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Naming category deciding which pattern applies to a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Variable,
    MemberVariable,
    GlobalVariable,
    PrivateMemberVariable,
    Constant,
    Class,
    Function,
}

impl Category {
    /// Categories a variable is checked under.
    ///
    /// A private non-const member is checked both as a member variable and as
    /// a private member; a private constant only as a private member.
    pub fn for_variable(access: AccessLevel, is_const: bool) -> &'static [Category] {
        use AccessLevel as A;
        match (access, is_const) {
            (A::Private, false) => &[Category::MemberVariable, Category::PrivateMemberVariable],
            (A::Private, true) => &[Category::PrivateMemberVariable],
            (A::Public | A::Protected, false) => &[Category::MemberVariable],
            (A::Global | A::Namespace, false) => &[Category::GlobalVariable],
            (A::None, false) => &[Category::Variable],
            (A::Public | A::Protected | A::Global | A::Namespace | A::None, true) => {
                &[Category::Constant]
            }
        }
    }

    pub fn rule(&self) -> RuleId {
        match self {
            Category::Variable | Category::MemberVariable | Category::GlobalVariable => {
                RuleId::VarName
            }
            Category::PrivateMemberVariable => RuleId::PrivateMemberVariable,
            Category::Constant => RuleId::ConstName,
            Category::Class => RuleId::ClassName,
            Category::Function => RuleId::FunctionName,
        }
    }

    /// Leading words of the finding message.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Variable | Category::MemberVariable | Category::GlobalVariable => "Variable",
            Category::PrivateMemberVariable => "Private member variable",
            Category::Constant => "Constant",
            Category::Class => "Class name",
            Category::Function => "Function",
        }
    }
}

/// A single naming violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub position: Position,
    pub severity: Severity,
    pub message: String,
    pub rule: RuleId,
}

impl Finding {
    pub fn new(category: Category, name: &str, pattern: &str, position: Position) -> Self {
        Self {
            position,
            severity: Severity::Style,
            message: format!(
                "{} {} violates naming convention. {}",
                category.label(),
                name,
                pattern
            ),
            rule: category.rule(),
        }
    }

    /// Identity used to suppress repeated reports of the same finding.
    pub fn key(&self) -> DedupKey {
        DedupKey {
            file: self.position.file.clone(),
            line: self.position.line,
            column: self.position.column,
            rule: self.rule,
        }
    }
}

/// `(file, line, column, rule)` identity of a finding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DedupKey {
    pub file: String,
    pub line: u32,
    pub column: u32,
    pub rule: RuleId,
}
