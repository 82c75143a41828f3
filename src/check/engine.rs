//! Naming rule evaluation.

use crate::config::Policy;
use crate::model::{FunctionKind, Position, Symbol, SymbolKind};
use crate::pattern::PatternCache;

use super::{Category, Finding};

/// Evaluates symbols against a policy.
pub struct RuleEngine<'a> {
    policy: &'a Policy,
    patterns: &'a mut PatternCache,
}

impl<'a> RuleEngine<'a> {
    pub fn new(policy: &'a Policy, patterns: &'a mut PatternCache) -> Self {
        Self { policy, patterns }
    }

    /// Return every finding for `symbol`, before exclusion and deduplication.
    pub fn evaluate(&mut self, symbol: &Symbol) -> Result<Vec<Finding>, regex::Error> {
        let mut findings = Vec::new();
        for (category, position) in checks(symbol) {
            if category == Category::Function && self.policy.is_whitelisted_function(&symbol.name)
            {
                continue;
            }
            let Some(pattern) = pattern_for(self.policy, category) else {
                continue;
            };
            if !self.patterns.matches_prefix(pattern, &symbol.name)? {
                findings.push(Finding::new(
                    category,
                    &symbol.name,
                    pattern,
                    position.clone(),
                ));
            }
        }
        Ok(findings)
    }
}

/// Categories to check for a symbol, with the position each one reports at.
fn checks(symbol: &Symbol) -> Vec<(Category, &Position)> {
    match &symbol.kind {
        SymbolKind::Variable {
            access,
            is_const,
            type_position,
        } => Category::for_variable(*access, *is_const)
            .iter()
            .map(|&category| match category {
                Category::Constant | Category::PrivateMemberVariable => (category, type_position),
                _ => (category, &symbol.position),
            })
            .collect(),
        SymbolKind::Class => vec![(Category::Class, &symbol.position)],
        SymbolKind::Function(FunctionKind::OperatorAssignment) => Vec::new(),
        SymbolKind::Function(FunctionKind::Other) => vec![(Category::Function, &symbol.position)],
    }
}

fn pattern_for(policy: &Policy, category: Category) -> Option<&str> {
    match category {
        Category::Variable => policy.variable.as_deref(),
        Category::MemberVariable => policy.member_variable.as_deref(),
        Category::GlobalVariable => policy.global_variable.as_deref(),
        Category::PrivateMemberVariable => policy.private_member_variable.as_deref(),
        Category::Constant => policy.constant.as_deref(),
        Category::Class => policy.class.as_deref(),
        Category::Function => policy.function.as_deref(),
    }
}
