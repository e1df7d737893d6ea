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

//! Semantic analysis and IR construction.
//!
//! The analyzer consumes the concrete syntax tree once, in source order.
//! Every construct fires an enter event and, for block-scoped constructs,
//! a matching exit event. A stack of open operation sequences tracks
//! which block receives the next operation; declaration, lookup, and type
//! checks run inline with construction, and every violation is recorded
//! as a diagnostic while analysis continues with the next syntax node.
//!
//! Stack discipline: every enter that opens a block pushes exactly one
//! sequence frame and the matching exit pops exactly one. A construct
//! that cannot be built (unknown guard, duplicate factory name) opens a
//! scratch sequence instead, so its nested statements are still analyzed
//! while their output stays unreachable.

use crate::error::{Diagnostic, DiagnosticKind, Diagnostics};
use crate::ir::{
    AssignmentSource, FnId, Operation, Operator, Program, SeqId, Type, Value, VarId,
};
use crate::syntax::{City, Literal, Statement, Token};

/// The result of analyzing one compilation unit.
///
/// There is no partial-vs-complete flag: a non-empty diagnostic list is
/// the signal that the program may be missing dropped statements.
#[derive(Debug)]
pub struct Analysis {
    /// The program that was built.
    pub program: Program,
    /// Every rule violation, in encounter order.
    pub diagnostics: Vec<Diagnostic>,
}

/// Analyze a city in one pass.
pub fn analyze(city: &City) -> Analysis {
    let mut analyzer = Analyzer::new(&city.name);
    for statement in &city.statements {
        analyzer.statement(statement);
    }
    analyzer.finish()
}

/// The scope-tracking builder.
///
/// The enter/exit methods are public so that a grammar engine driving its
/// own traversal can fire them directly; [`Analyzer::statement`] walks a
/// subtree and fires them in tree order.
pub struct Analyzer {
    program: Program,
    /// Stack of open sequences; the top receives new operations.
    open: Vec<SeqId>,
    /// Factory bound by the innermost open factory or waypoint.
    factories: Vec<Option<FnId>>,
    /// Branch pair bound by the innermost open choice.
    choices: Vec<Option<(SeqId, SeqId)>>,
    diagnostics: Diagnostics,
}

impl Analyzer {
    /// Program-root enter: create the program and open its body.
    pub fn new(name: &Token) -> Self {
        let program = Program::new(name.text.clone());
        let body = program.body();
        Self {
            program,
            open: vec![body],
            factories: Vec::new(),
            choices: Vec::new(),
            diagnostics: Diagnostics::new(),
        }
    }

    /// Program-root exit: close the body and hand out the result.
    pub fn finish(mut self) -> Analysis {
        self.open.pop();
        debug_assert!(self.open.is_empty(), "unbalanced sequence stack");
        Analysis {
            program: self.program,
            diagnostics: self.diagnostics.into_vec(),
        }
    }

    /// The program under construction.
    pub fn program(&self) -> &Program {
        &self.program
    }

    /// The diagnostics collected so far.
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// The sequence currently receiving operations.
    pub fn open_sequence(&self) -> Option<SeqId> {
        self.open.last().copied()
    }

    /// How many sequence frames are currently open.
    pub fn open_depth(&self) -> usize {
        self.open.len()
    }

    /// Relay a syntax error reported by the grammar engine.
    pub fn report_syntax_error(&mut self, line: usize, column: usize, offending: char) {
        self.diagnostics.push(
            Diagnostic::new(line, column, DiagnosticKind::SyntaxError).with_offending(offending),
        );
    }

    /// Walk one statement, firing its enter/exit events in tree order.
    pub fn statement(&mut self, statement: &Statement) {
        match statement {
            Statement::Wagon { cargo, name } => self.enter_wagon(cargo, name),
            Statement::Train { cargo, name } => self.enter_train(cargo, name),
            Statement::Signal { name } => self.enter_signal(name),
            Statement::Waypoint { name, statements } => {
                self.enter_waypoint(name);
                for nested in statements {
                    self.statement(nested);
                }
                self.exit_waypoint(name);
            }
            Statement::Factory {
                returns,
                name,
                params,
                statements,
                result,
            } => {
                self.enter_factory(returns, name, params);
                self.enter_factory_body();
                for nested in statements {
                    self.statement(nested);
                }
                self.exit_factory_body(result);
                self.exit_factory();
            }
            Statement::Circle { guard, statements } => {
                self.enter_circle(guard);
                for nested in statements {
                    self.statement(nested);
                }
                self.exit_circle();
            }
            Statement::Choice { guard, cases } => {
                self.enter_choice(guard);
                for case in cases {
                    self.enter_case(&case.tag);
                    for nested in &case.statements {
                        self.statement(nested);
                    }
                    self.exit_case();
                }
                self.exit_choice();
            }
            Statement::Stop => self.enter_stop(),
            Statement::Load { target, literal } => self.enter_load(target, literal),
            Statement::Transfer { source, target } => self.enter_transfer(source, target),
            Statement::Transport { operator, ids } => {
                self.enter_transport(operator.as_ref(), ids)
            }
            Statement::Invert { target } => self.enter_invert(target),
            Statement::Negate { target } => self.enter_negate(target),
            Statement::Write { label, source } => self.enter_write(label, source),
            Statement::Read { label, target } => self.enter_read(label, target),
        }
    }

    /// Scalar declaration (`wagon`).
    pub fn enter_wagon(&mut self, cargo: &Token, name: &Token) {
        match Type::from_keyword(&cargo.text) {
            Some(ty) => {
                if self.program.declare_variable(ty, &name.text, None).is_err() {
                    self.error(name, DiagnosticKind::VariableAlreadyDefined);
                }
            }
            None => self.error(cargo, DiagnosticKind::TypeNotDefined),
        }
    }

    /// Array declaration (`train`). Arrays are registered but otherwise
    /// inert: no operation consumes them yet.
    pub fn enter_train(&mut self, cargo: &Token, name: &Token) {
        match Type::array_from_keyword(&cargo.text) {
            Some(ty) => {
                if self.program.declare_variable(ty, &name.text, None).is_err() {
                    self.error(name, DiagnosticKind::VariableAlreadyDefined);
                }
            }
            None => self.error(cargo, DiagnosticKind::TypeNotDefined),
        }
    }

    /// Boolean flag declaration (`signal`): a boolean variable starting red.
    pub fn enter_signal(&mut self, name: &Token) {
        if self
            .program
            .declare_variable(Type::Bool, &name.text, Some(Value::Bool(false)))
            .is_err()
        {
            self.error(name, DiagnosticKind::VariableAlreadyDefined);
        }
    }

    /// Waypoint declaration: a zero-argument boolean factory plus a
    /// same-named boolean variable starting red. Either namespace
    /// collision is its own diagnostic. Opens the factory body.
    pub fn enter_waypoint(&mut self, name: &Token) {
        let function = match self
            .program
            .declare_function(&name.text, Vec::new(), Type::Bool)
        {
            Ok(id) => Some(id),
            Err(_) => {
                self.error(name, DiagnosticKind::FactoryAlreadyDefined);
                None
            }
        };
        if self
            .program
            .declare_variable(Type::Bool, &name.text, Some(Value::Bool(false)))
            .is_err()
        {
            self.error(name, DiagnosticKind::VariableAlreadyDefined);
        }
        self.factories.push(function);
        let body = self.factory_body(function);
        self.open.push(body);
    }

    /// Waypoint exit: the same-named variable is the result.
    pub fn exit_waypoint(&mut self, name: &Token) {
        self.wire_return(name);
        self.open.pop();
        self.factories.pop();
    }

    /// Factory signature: resolve the return and parameter cargo keywords
    /// and register the factory. Each unresolvable keyword is its own
    /// diagnostic; an unresolvable return type drops the registration.
    pub fn enter_factory(&mut self, returns: &Token, name: &Token, params: &[Token]) {
        let return_type = match Type::from_keyword(&returns.text) {
            Some(ty) => Some(ty),
            None => {
                self.error(returns, DiagnosticKind::TypeNotDefined);
                None
            }
        };
        let mut param_types = Vec::with_capacity(params.len());
        for param in params {
            match Type::from_keyword(&param.text) {
                Some(ty) => param_types.push(ty),
                None => self.error(param, DiagnosticKind::TypeNotDefined),
            }
        }
        let function = return_type.and_then(|return_type| {
            match self
                .program
                .declare_function(&name.text, param_types, return_type)
            {
                Ok(id) => Some(id),
                Err(_) => {
                    self.error(name, DiagnosticKind::FactoryAlreadyDefined);
                    None
                }
            }
        });
        self.factories.push(function);
    }

    /// Factory body enter: open the registered factory's body.
    pub fn enter_factory_body(&mut self) {
        let function = self.factories.last().copied().flatten();
        let body = self.factory_body(function);
        self.open.push(body);
    }

    /// Factory body exit: wire the trailing result identifier as the
    /// return and close the body. The pop happens regardless of outcome.
    pub fn exit_factory_body(&mut self, result: &Token) {
        self.wire_return(result);
        self.open.pop();
    }

    /// Factory exit: drop the signature binding.
    pub fn exit_factory(&mut self) {
        self.factories.pop();
    }

    /// Pre-check loop (`circle`).
    ///
    /// An unknown guard drops the loop without a diagnostic; the nested
    /// statements still run through analysis in a scratch sequence. When
    /// the guard has a producing factory (a waypoint), a call re-deriving
    /// it is emitted before the loop and injected into the recheck region.
    pub fn enter_circle(&mut self, guard: &Token) {
        let frame = self.program.variable(&guard.text).and_then(|variable| {
            let producer = self.program.function(&guard.text);
            if let Some(function) = producer {
                self.emit(Operation::Call {
                    function,
                    arguments: Vec::new(),
                    result: None,
                });
            }
            if self.program.var(variable).ty() != Type::Bool {
                self.error(guard, DiagnosticKind::TypeMismatch);
                return None;
            }
            let body = self.program.new_sequence();
            let recheck = self.program.new_sequence();
            if let Some(function) = producer {
                self.program.sequence_mut(recheck).push(Operation::Call {
                    function,
                    arguments: Vec::new(),
                    result: None,
                });
            }
            self.emit(Operation::Loop {
                guard: variable,
                body,
                recheck,
            });
            Some(body)
        });
        let frame = frame.unwrap_or_else(|| self.program.new_sequence());
        self.open.push(frame);
    }

    /// Circle exit: close the loop body.
    pub fn exit_circle(&mut self) {
        self.open.pop();
    }

    /// Conditional (`choice`): build the node eagerly with both branches
    /// and bind the branch pair for the nested case clauses. An unknown
    /// guard drops the node without a diagnostic.
    pub fn enter_choice(&mut self, guard: &Token) {
        let binding = self.program.variable(&guard.text).map(|variable| {
            let on_true = self.program.new_sequence();
            let on_false = self.program.new_sequence();
            self.emit(Operation::Conditional {
                guard: variable,
                on_true,
                on_false,
            });
            (on_true, on_false)
        });
        self.choices.push(binding);
    }

    /// Choice exit: drop the branch binding.
    pub fn exit_choice(&mut self) {
        self.choices.pop();
    }

    /// Case clause enter: the tag's color picks the branch that receives
    /// the clause. `green` is the true branch, `red` the false branch; an
    /// unrecognized tag is a diagnostic and the clause goes to scratch.
    pub fn enter_case(&mut self, tag: &Token) {
        let branches = self.choices.last().copied().flatten();
        let branch = match tag.text.as_str() {
            "green" => branches.map(|(on_true, _)| on_true),
            "red" => branches.map(|(_, on_false)| on_false),
            _ => {
                self.error(tag, DiagnosticKind::UnknownValue);
                None
            }
        };
        let frame = branch.unwrap_or_else(|| self.program.new_sequence());
        self.open.push(frame);
    }

    /// Case clause exit: close the branch.
    pub fn exit_case(&mut self) {
        self.open.pop();
    }

    /// Unconditional loop exit (`stop`).
    pub fn enter_stop(&mut self) {
        self.emit(Operation::Break);
    }

    /// Literal load. The literal's syntactic category must match the
    /// target's declared type; a mismatched category drops the statement
    /// without a diagnostic.
    pub fn enter_load(&mut self, target: &Token, literal: &Literal) {
        let variable = match self.resolve_variable(target) {
            Some(variable) => variable,
            None => return,
        };
        let value = match literal {
            Literal::Integer(token) => token.text.parse::<i64>().ok().map(Value::Int),
            Literal::Boolean(token) => match token.text.as_str() {
                "green" => Some(Value::Bool(true)),
                "red" => Some(Value::Bool(false)),
                _ => {
                    self.error(token, DiagnosticKind::UnknownValue);
                    None
                }
            },
            Literal::Character(token) => token.text.chars().next().map(Value::Char),
        };
        if let Some(value) = value {
            if value.ty().compatible(self.program.var(variable).ty()) {
                self.emit(Operation::Assignment {
                    target: variable,
                    source: AssignmentSource::Literal(value),
                });
            }
        }
    }

    /// Variable-to-variable transfer: `target` receives `source`'s value.
    pub fn enter_transfer(&mut self, source: &Token, target: &Token) {
        let from = self.resolve_variable(source);
        let to = self.resolve_variable(target);
        if let (Some(from), Some(to)) = (from, to) {
            if self
                .program
                .var(from)
                .ty()
                .compatible(self.program.var(to).ty())
            {
                self.emit(Operation::Assignment {
                    target: to,
                    source: AssignmentSource::Variable(from),
                });
            } else {
                self.error(source, DiagnosticKind::TypeMismatch);
            }
        }
    }

    /// Operator application or factory call (`transport`). The grammar's
    /// operator tag is the discriminant, resolved once.
    pub fn enter_transport(&mut self, operator: Option<&Token>, ids: &[Token]) {
        match operator {
            Some(operator) => self.transport_application(operator, ids),
            None => self.transport_call(ids),
        }
    }

    /// Boolean negation in place (`invert`).
    pub fn enter_invert(&mut self, target: &Token) {
        if let Some(variable) = self.resolve_variable(target) {
            if self.program.var(variable).ty() == Type::Bool {
                self.emit(Operation::Application {
                    operator: Operator::Not,
                    operands: vec![variable],
                    dest: variable,
                });
            } else {
                self.error(target, DiagnosticKind::TypeMismatch);
            }
        }
    }

    /// Arithmetic negation in place (`negate`).
    pub fn enter_negate(&mut self, target: &Token) {
        if let Some(variable) = self.resolve_variable(target) {
            let ty = self.program.var(variable).ty();
            match Operator::Negate.check(&[ty]) {
                Ok(_) => self.emit(Operation::Application {
                    operator: Operator::Negate,
                    operands: vec![variable],
                    dest: variable,
                }),
                Err(_) => self.error(target, DiagnosticKind::TypeMismatch),
            }
        }
    }

    /// Labeled output of a variable's value (`write`).
    pub fn enter_write(&mut self, label: &Token, source: &Token) {
        if let Some(variable) = self.resolve_variable(source) {
            self.emit(Operation::Output {
                label: label.text.clone(),
                source: variable,
            });
        }
    }

    /// Labeled input into a variable (`read`).
    pub fn enter_read(&mut self, label: &Token, target: &Token) {
        if let Some(variable) = self.resolve_variable(target) {
            self.emit(Operation::Input {
                label: label.text.clone(),
                target: variable,
            });
        }
    }

    /// Built-in operator path of a transport. The statement's last
    /// identifier receives the result in place; the preceding ones are
    /// the inputs.
    fn transport_application(&mut self, operator: &Token, ids: &[Token]) {
        let op = match Operator::from_keyword(&operator.text) {
            Some(op) => op,
            None => {
                self.error(operator, DiagnosticKind::UnknownValue);
                return;
            }
        };
        let mut operands = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(variable) = self.resolve_variable(id) {
                operands.push(variable);
            }
        }
        // Only build the application once every operand resolved.
        if operands.len() != ids.len() {
            return;
        }
        let dest = match operands.pop() {
            Some(dest) => dest,
            None => {
                self.error(operator, DiagnosticKind::TypeMismatch);
                return;
            }
        };
        let input_types: Vec<Type> = operands
            .iter()
            .map(|&variable| self.program.var(variable).ty())
            .collect();
        match op.check(&input_types) {
            Ok(result) if result.compatible(self.program.var(dest).ty()) => {
                self.emit(Operation::Application {
                    operator: op,
                    operands,
                    dest,
                });
            }
            _ => self.error(&ids[0], DiagnosticKind::TypeMismatch),
        }
    }

    /// Factory call path of a transport. The second-to-last identifier is
    /// the factory name, the last one receives the result, and the rest
    /// are the arguments in order.
    fn transport_call(&mut self, ids: &[Token]) {
        if ids.len() < 2 {
            // The grammar guarantees at least a factory name and a result.
            return;
        }
        let name = &ids[ids.len() - 2];
        let mut arguments = Vec::with_capacity(ids.len() - 1);
        let mut complete = true;
        for (index, id) in ids.iter().enumerate() {
            if index == ids.len() - 2 {
                continue;
            }
            match self.resolve_variable(id) {
                Some(variable) => arguments.push(variable),
                None => complete = false,
            }
        }
        let function = match self.program.function(&name.text) {
            Some(function) => function,
            None => {
                self.error(name, DiagnosticKind::FactoryNotDefined);
                return;
            }
        };
        if !complete {
            return;
        }
        let result = match arguments.pop() {
            Some(result) => result,
            None => return,
        };
        let signature_ok = {
            let func = self.program.func(function);
            arguments.len() == func.params().len()
                && arguments
                    .iter()
                    .zip(func.params())
                    .all(|(&argument, &param)| self.program.var(argument).ty().compatible(param))
                && self.program.var(result).ty().compatible(func.return_type())
        };
        if signature_ok {
            self.emit(Operation::Call {
                function,
                arguments,
                result: Some(result),
            });
        } else {
            self.error(&ids[0], DiagnosticKind::TypeMismatch);
        }
    }

    /// Append an operation to the sequence currently on top of the stack.
    fn emit(&mut self, operation: Operation) {
        let top = *self.open.last().expect("no open sequence");
        self.program.sequence_mut(top).push(operation);
    }

    /// Record a diagnostic at a token's position.
    fn error(&mut self, token: &Token, kind: DiagnosticKind) {
        self.diagnostics
            .push(Diagnostic::new(token.line, token.column, kind));
    }

    /// Look up a variable, recording a diagnostic when it is missing.
    fn resolve_variable(&mut self, token: &Token) -> Option<VarId> {
        let id = self.program.variable(&token.text);
        if id.is_none() {
            self.error(token, DiagnosticKind::VariableNotDefined);
        }
        id
    }

    /// The body to open for a factory binding: the registered factory's
    /// own body, or a scratch sequence that nothing references.
    fn factory_body(&mut self, function: Option<FnId>) -> SeqId {
        match function {
            Some(id) => self.program.func(id).body(),
            None => self.program.new_sequence(),
        }
    }

    /// Shared return wiring for factory and waypoint exits: the trailing
    /// identifier must name an existing variable whose type equals the
    /// factory's declared return type.
    fn wire_return(&mut self, result: &Token) {
        if let Some(function) = self.factories.last().copied().flatten() {
            match self.program.variable(&result.text) {
                Some(source) => {
                    let source_ty = self.program.var(source).ty();
                    if source_ty.compatible(self.program.func(function).return_type()) {
                        self.emit(Operation::Return { source });
                    } else {
                        self.error(result, DiagnosticKind::TypeMismatch);
                    }
                }
                None => self.error(result, DiagnosticKind::VariableNotDefined),
            }
        }
    }
}
