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

//! Intermediate representation of a Railroad program.
//!
//! A [`Program`] owns everything the analyzer builds: the variable and
//! factory namespaces and every operation sequence. Sequences, variables,
//! and factories are addressed through small copyable handles minted by
//! the owning program; the handles keep nested structures (loop bodies,
//! branch pairs, factory bodies) independent of any syntax-tree identity.

mod operation;
mod symbol;
mod types;

pub use operation::{
    AssignmentSource, Operation, OperationSequence, Operator, TypeMismatch,
};
pub use symbol::{Function, Variable};
pub use types::{Type, Value};

use std::collections::HashMap;
use thiserror::Error;

/// Handle to a variable registered in a [`Program`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VarId(pub(crate) u32);

/// Handle to a factory registered in a [`Program`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FnId(pub(crate) u32);

/// Handle to an operation sequence owned by a [`Program`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SeqId(pub(crate) u32);

/// The variable name is already taken in this program.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("variable `{0}` is already declared")]
pub struct VariableAlreadyDeclared(pub String);

/// The factory name is already taken in this program.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("factory `{0}` is already declared")]
pub struct FunctionAlreadyDeclared(pub String);

/// The top-level container of one compilation unit: a city.
///
/// Both namespaces are flat; every variable and factory lives directly on
/// the program. Lookups go through the methods below so that a nested
/// scope model could be introduced without touching the analyzer.
#[derive(Debug, Clone)]
pub struct Program {
    name: String,
    variables: Vec<Variable>,
    variable_names: HashMap<String, VarId>,
    functions: Vec<Function>,
    function_names: HashMap<String, FnId>,
    sequences: Vec<OperationSequence>,
    body: SeqId,
}

impl Program {
    /// Create a new empty program.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variables: Vec::new(),
            variable_names: HashMap::new(),
            functions: Vec::new(),
            function_names: HashMap::new(),
            sequences: vec![OperationSequence::new()],
            body: SeqId(0),
        }
    }

    /// The program name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The handle of the top-level operation sequence.
    pub fn body(&self) -> SeqId {
        self.body
    }

    /// Register a new variable.
    ///
    /// The first declaration of a name wins: a duplicate is rejected and
    /// the registered variable stays untouched.
    pub fn declare_variable(
        &mut self,
        ty: Type,
        name: &str,
        initial: Option<Value>,
    ) -> Result<VarId, VariableAlreadyDeclared> {
        if self.variable_names.contains_key(name) {
            return Err(VariableAlreadyDeclared(name.to_string()));
        }
        let id = VarId(self.variables.len() as u32);
        self.variables.push(Variable::new(ty, name, initial));
        self.variable_names.insert(name.to_string(), id);
        Ok(id)
    }

    /// Register a new factory and allocate its body sequence.
    ///
    /// Registration happens before the body is processed, so the factory
    /// can already be looked up from inside its own body.
    pub fn declare_function(
        &mut self,
        name: &str,
        params: Vec<Type>,
        return_type: Type,
    ) -> Result<FnId, FunctionAlreadyDeclared> {
        if self.function_names.contains_key(name) {
            return Err(FunctionAlreadyDeclared(name.to_string()));
        }
        let body = self.new_sequence();
        let id = FnId(self.functions.len() as u32);
        self.functions
            .push(Function::new(name, params, return_type, body));
        self.function_names.insert(name.to_string(), id);
        Ok(id)
    }

    /// Look up a variable by name.
    pub fn variable(&self, name: &str) -> Option<VarId> {
        self.variable_names.get(name).copied()
    }

    /// Look up a factory by name.
    pub fn function(&self, name: &str) -> Option<FnId> {
        self.function_names.get(name).copied()
    }

    /// Look up a variable by name and borrow it.
    pub fn get_variable(&self, name: &str) -> Option<&Variable> {
        self.variable(name).map(|id| self.var(id))
    }

    /// Look up a factory by name and borrow it.
    pub fn get_function(&self, name: &str) -> Option<&Function> {
        self.function(name).map(|id| self.func(id))
    }

    /// Borrow a variable by handle. Handles are only minted by this
    /// program, so the lookup cannot fail.
    pub fn var(&self, id: VarId) -> &Variable {
        &self.variables[id.0 as usize]
    }

    /// Borrow a factory by handle.
    pub fn func(&self, id: FnId) -> &Function {
        &self.functions[id.0 as usize]
    }

    /// Allocate a fresh empty operation sequence.
    pub fn new_sequence(&mut self) -> SeqId {
        let id = SeqId(self.sequences.len() as u32);
        self.sequences.push(OperationSequence::new());
        id
    }

    /// Borrow a sequence by handle.
    pub fn sequence(&self, id: SeqId) -> &OperationSequence {
        &self.sequences[id.0 as usize]
    }

    pub(crate) fn sequence_mut(&mut self, id: SeqId) -> &mut OperationSequence {
        &mut self.sequences[id.0 as usize]
    }

    /// Iterate over all declared variables in declaration order.
    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        self.variables.iter()
    }

    /// Iterate over all declared factories in declaration order.
    pub fn functions(&self) -> impl Iterator<Item = &Function> {
        self.functions.iter()
    }
}
