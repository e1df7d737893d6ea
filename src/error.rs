// Railroad - A compiler front-end for the train-themed Railroad toy language
// Copyright (C) 2026  Marcel Joachim Kloubert <marcel@kloubert.dev>
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Diagnostics for the Railroad front-end.
//!
//! Analysis never aborts on the first rule violation. Every violation
//! becomes a [`Diagnostic`] appended to a [`Diagnostics`] accumulator and
//! analysis continues with the next syntax node. Diagnostics are plain
//! data: they are collected, not thrown.

use std::fmt;

/// The catalog of diagnostic message templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// Relayed verbatim from the external grammar engine.
    SyntaxError,
    /// A variable name was declared a second time.
    VariableAlreadyDefined,
    /// A statement referenced a variable before its declaration.
    VariableNotDefined,
    /// A factory name was declared a second time.
    FactoryAlreadyDefined,
    /// A transport named a factory that does not exist.
    FactoryNotDefined,
    /// Operand, argument, assignment, or return types do not fit together.
    TypeMismatch,
    /// A cargo keyword did not resolve to a known type.
    TypeNotDefined,
    /// A literal token that the language does not recognize.
    UnknownValue,
}

impl DiagnosticKind {
    /// Get the message template for this kind.
    pub fn message(&self) -> &'static str {
        match self {
            DiagnosticKind::SyntaxError => "syntax error",
            DiagnosticKind::VariableAlreadyDefined => "variable already defined",
            DiagnosticKind::VariableNotDefined => "variable not defined",
            DiagnosticKind::FactoryAlreadyDefined => "factory already defined",
            DiagnosticKind::FactoryNotDefined => "factory not defined",
            DiagnosticKind::TypeMismatch => "type mismatch",
            DiagnosticKind::TypeNotDefined => "type not defined",
            DiagnosticKind::UnknownValue => "unknown value",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

/// A rule violation with its source position.
///
/// Rendered as `<line>:<column>: <message>`, with the offending character
/// appended for syntax errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Line number as reported by the grammar engine (1-indexed).
    pub line: usize,
    /// Character position within the line (0-indexed).
    pub column: usize,
    /// Which rule was violated.
    pub kind: DiagnosticKind,
    /// The offending character, if the grammar engine reported one.
    pub offending: Option<char>,
}

impl Diagnostic {
    /// Create a new diagnostic.
    pub fn new(line: usize, column: usize, kind: DiagnosticKind) -> Self {
        Self {
            line,
            column,
            kind,
            offending: None,
        }
    }

    /// Attach the offending character to this diagnostic.
    pub fn with_offending(mut self, offending: char) -> Self {
        self.offending = Some(offending);
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.line, self.column, self.kind.message())?;
        if let Some(offending) = self.offending {
            write!(f, " '{}'", offending)?;
        }
        Ok(())
    }
}

impl std::error::Error for Diagnostic {}

/// An ordered collection of diagnostics.
///
/// Accumulation order is insertion order; there is no deduplication and no
/// severity ranking.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    diagnostics: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Create a new empty collection.
    pub fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
        }
    }

    /// Add a diagnostic to the collection.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Check if there are any diagnostics.
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    /// Get the number of diagnostics.
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// Check if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Get an iterator over the diagnostics.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    /// Convert into a vector of diagnostics.
    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.into_iter()
    }
}
