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

//! Variable and factory declarations.

use crate::ir::{SeqId, Type, Value};

/// A declared variable: a wagon, train, or signal.
///
/// Name and type are fixed at declaration time. The value recorded here is
/// only the declared initial value; runtime values change exclusively
/// through assignment operations in the built program, never during
/// analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    name: String,
    ty: Type,
    initial: Option<Value>,
}

impl Variable {
    pub(crate) fn new(ty: Type, name: impl Into<String>, initial: Option<Value>) -> Self {
        Self {
            name: name.into(),
            ty,
            initial,
        }
    }

    /// The declared name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared type.
    pub fn ty(&self) -> Type {
        self.ty
    }

    /// The declared initial value, if any.
    pub fn initial(&self) -> Option<Value> {
        self.initial
    }
}

/// A declared factory: a named operation body with a typed signature.
///
/// The body sequence is allocated when the factory is registered and is
/// populated incrementally while the factory's nested syntax is processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    name: String,
    params: Vec<Type>,
    return_type: Type,
    body: SeqId,
}

impl Function {
    pub(crate) fn new(
        name: impl Into<String>,
        params: Vec<Type>,
        return_type: Type,
        body: SeqId,
    ) -> Self {
        Self {
            name: name.into(),
            params,
            return_type,
            body,
        }
    }

    /// The declared name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The ordered parameter types.
    pub fn params(&self) -> &[Type] {
        &self.params
    }

    /// The declared return type.
    pub fn return_type(&self) -> Type {
        self.return_type
    }

    /// The handle of the body sequence.
    pub fn body(&self) -> SeqId {
        self.body
    }
}
