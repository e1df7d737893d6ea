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

//! The instruction set of the intermediate representation.
//!
//! Operations are appended to [`OperationSequence`]s while the analyzer
//! walks the syntax tree. A statement that fails its checks is dropped
//! entirely: no partially built operation ever reaches a sequence.

use crate::ir::{FnId, SeqId, Type, Value, VarId};
use std::fmt;
use thiserror::Error;

/// Operand types do not fit the operation.
///
/// This is a non-fatal condition: the analyzer records it as a diagnostic
/// and drops the offending statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("operand types are not compatible")]
pub struct TypeMismatch;

/// A built-in operator usable in a transport statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// Boolean negation.
    Not,
    /// Arithmetic negation.
    Negate,
    Add,
    Subtract,
    Multiply,
    Divide,
    Remainder,
    And,
    Or,
    /// Equality over any scalar type.
    Equals,
    /// Inequality over any scalar type.
    Differs,
    Below,
    Above,
}

impl Operator {
    /// Resolve an operator keyword. `None` means the word is not a
    /// built-in and names a user factory instead.
    pub fn from_keyword(keyword: &str) -> Option<Operator> {
        match keyword {
            "not" => Some(Operator::Not),
            "negate" => Some(Operator::Negate),
            "add" => Some(Operator::Add),
            "subtract" => Some(Operator::Subtract),
            "multiply" => Some(Operator::Multiply),
            "divide" => Some(Operator::Divide),
            "remainder" => Some(Operator::Remainder),
            "and" => Some(Operator::And),
            "or" => Some(Operator::Or),
            "equals" => Some(Operator::Equals),
            "differs" => Some(Operator::Differs),
            "below" => Some(Operator::Below),
            "above" => Some(Operator::Above),
            _ => None,
        }
    }

    /// The operator keyword as written in source.
    pub fn keyword(&self) -> &'static str {
        match self {
            Operator::Not => "not",
            Operator::Negate => "negate",
            Operator::Add => "add",
            Operator::Subtract => "subtract",
            Operator::Multiply => "multiply",
            Operator::Divide => "divide",
            Operator::Remainder => "remainder",
            Operator::And => "and",
            Operator::Or => "or",
            Operator::Equals => "equals",
            Operator::Differs => "differs",
            Operator::Below => "below",
            Operator::Above => "above",
        }
    }

    /// Number of input operands.
    pub fn arity(&self) -> usize {
        match self {
            Operator::Not | Operator::Negate => 1,
            _ => 2,
        }
    }

    /// Check the input operand types and yield the result type.
    pub fn check(&self, operands: &[Type]) -> Result<Type, TypeMismatch> {
        match (self, operands) {
            (Operator::Not, [Type::Bool]) => Ok(Type::Bool),
            (Operator::Negate, [Type::Int]) => Ok(Type::Int),
            (
                Operator::Add
                | Operator::Subtract
                | Operator::Multiply
                | Operator::Divide
                | Operator::Remainder,
                [Type::Int, Type::Int],
            ) => Ok(Type::Int),
            (Operator::And | Operator::Or, [Type::Bool, Type::Bool]) => Ok(Type::Bool),
            (Operator::Equals | Operator::Differs, [left, right])
                if left == right && !left.is_array() =>
            {
                Ok(Type::Bool)
            }
            (Operator::Below | Operator::Above, [Type::Int, Type::Int]) => Ok(Type::Bool),
            _ => Err(TypeMismatch),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.keyword())
    }
}

/// The source of an assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignmentSource {
    /// A literal value.
    Literal(Value),
    /// Another variable's value.
    Variable(VarId),
}

/// One instruction in an operation sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Store a literal or another variable's value into a variable.
    Assignment {
        target: VarId,
        source: AssignmentSource,
    },
    /// Apply a built-in operator in place: inputs in `operands`, result
    /// into `dest`.
    Application {
        operator: Operator,
        operands: Vec<VarId>,
        dest: VarId,
    },
    /// Invoke a factory with ordered arguments. `result` receives the
    /// return value; a bare call leaves it unbound.
    Call {
        function: FnId,
        arguments: Vec<VarId>,
        result: Option<VarId>,
    },
    /// Branch on a boolean guard. Both branch sequences always exist,
    /// even when their source bodies are empty.
    Conditional {
        guard: VarId,
        on_true: SeqId,
        on_false: SeqId,
    },
    /// Pre-check loop. `recheck` re-derives the guard before loop-back.
    Loop {
        guard: VarId,
        body: SeqId,
        recheck: SeqId,
    },
    /// Yield a variable's value as the enclosing factory's result.
    Return { source: VarId },
    /// Leave the nearest enclosing loop.
    Break,
    /// Write a variable's value, tagged with a label.
    Output { label: String, source: VarId },
    /// Read external input into a variable, tagged with a label.
    Input { label: String, target: VarId },
}

/// An ordered list of operations.
///
/// Sequences are append-only during construction. One sequence exists per
/// block that can receive instructions: the program body, each factory
/// body, and the branch and loop regions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperationSequence {
    operations: Vec<Operation>,
}

impl OperationSequence {
    /// Create a new empty sequence.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, operation: Operation) {
        self.operations.push(operation);
    }

    /// Get the number of operations.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Check if the sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Get an iterator over the operations.
    pub fn iter(&self) -> impl Iterator<Item = &Operation> {
        self.operations.iter()
    }

    /// Get the operations as a slice.
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }
}
