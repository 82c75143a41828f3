//! Read-only view of a program model.
//!
//! The checker never sees the concrete dump representation: everything it
//! needs is exposed as [`Symbol`] values through [`SymbolModelView`].

mod dump;

pub use dump::{is_dump_file, Configuration, DumpError, DumpFile, DUMP_EXTENSION};

use serde::Serialize;

/// A source location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Position {
    pub file: String,
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(file: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// Access level of a variable as recorded by the analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessLevel {
    Private,
    Public,
    Protected,
    Global,
    Namespace,
    /// Locals, arguments and anything else without a naming-relevant scope.
    None,
}

impl AccessLevel {
    /// Map a dump `access` attribute to an access level.
    pub fn parse(s: &str) -> Self {
        match s {
            "Private" => AccessLevel::Private,
            "Public" => AccessLevel::Public,
            "Protected" => AccessLevel::Protected,
            "Global" => AccessLevel::Global,
            "Namespace" => AccessLevel::Namespace,
            _ => AccessLevel::None,
        }
    }
}

/// What kind of function a symbol names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionKind {
    /// `operator=` overloads.
    OperatorAssignment,
    Other,
}

/// Kind-specific data of a symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolKind {
    Variable {
        access: AccessLevel,
        is_const: bool,
        /// Start of the declared type; some rules report here instead of at the name.
        type_position: Position,
    },
    Class,
    Function(FunctionKind),
}

/// A named entity extracted from a program model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    /// Name token for variables, body start for classes, definition for functions.
    pub position: Position,
    pub kind: SymbolKind,
}

impl Symbol {
    pub fn variable(
        name: impl Into<String>,
        position: Position,
        access: AccessLevel,
        is_const: bool,
    ) -> Self {
        Self {
            name: name.into(),
            kind: SymbolKind::Variable {
                access,
                is_const,
                type_position: position.clone(),
            },
            position,
        }
    }

    pub fn class(name: impl Into<String>, position: Position) -> Self {
        Self {
            name: name.into(),
            position,
            kind: SymbolKind::Class,
        }
    }

    pub fn function(name: impl Into<String>, position: Position, kind: FunctionKind) -> Self {
        Self {
            name: name.into(),
            position,
            kind: SymbolKind::Function(kind),
        }
    }

    /// Set where the declared type of a variable starts. No-op for other kinds.
    pub fn with_type_position(mut self, position: Position) -> Self {
        if let SymbolKind::Variable { type_position, .. } = &mut self.kind {
            *type_position = position;
        }
        self
    }
}

/// Narrow read-only interface over an external program model.
pub trait SymbolModelView {
    /// Human-readable name of the model, used in logs.
    fn name(&self) -> &str;

    /// All symbols of the model: variables, then classes, then functions.
    fn symbols(&self) -> Box<dyn Iterator<Item = Symbol> + '_>;
}

/// An in-memory model, mostly useful for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct SymbolList {
    pub name: String,
    pub symbols: Vec<Symbol>,
}

impl SymbolList {
    pub fn new(name: impl Into<String>, symbols: Vec<Symbol>) -> Self {
        Self {
            name: name.into(),
            symbols,
        }
    }
}

impl SymbolModelView for SymbolList {
    fn name(&self) -> &str {
        &self.name
    }

    fn symbols(&self) -> Box<dyn Iterator<Item = Symbol> + '_> {
        Box::new(self.symbols.iter().cloned())
    }
}
