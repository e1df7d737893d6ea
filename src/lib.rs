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

//! Railroad Front-End Library
//!
//! This library builds a typed program model from the concrete syntax
//! tree of a Railroad source file and enforces the language's static
//! rules along the way. Tokenizing and grammar recognition are owned by
//! an external grammar engine; code generation consumes the model this
//! crate produces.
//!
//! # Modules
//!
//! - [`error`] - Diagnostics and the accumulator they collect in
//! - [`syntax`] - The concrete syntax tree handed in by the grammar engine
//! - [`ir`] - The typed program model (program, symbols, operations)
//! - [`analyzer`] - The single-pass, scope-tracking builder
//!
//! # Example
//!
//! ```
//! use railroad::analyze;
//! use railroad::syntax::{City, Statement, Token};
//!
//! let mut city = City::new(Token::new("Aurora", 1, 5));
//! city.statements.push(Statement::Wagon {
//!     cargo: Token::new("int", 2, 6),
//!     name: Token::new("coal", 2, 10),
//! });
//!
//! let analysis = analyze(&city);
//! assert!(analysis.diagnostics.is_empty());
//! assert!(analysis.program.get_variable("coal").is_some());
//! ```

pub mod analyzer;
pub mod error;
pub mod ir;
pub mod syntax;

// Re-export commonly used types
pub use analyzer::{analyze, Analysis, Analyzer};
pub use error::{Diagnostic, DiagnosticKind, Diagnostics};
pub use ir::{Operation, Program, Type, Value};

/// The version of the Railroad front-end.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The name of the front-end.
pub const NAME: &str = "Railroad";
