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

//! Negative tests for the Railroad analyzer.
//!
//! These tests verify that rule violations produce the expected
//! diagnostics, that analysis continues past every violation, and that
//! dropped statements leave no trace in the built program.

use pretty_assertions::assert_eq;
use railroad::ir::{Operation, Type};
use railroad::syntax::{ChoiceCase, City, Literal, Statement, Token};
use railroad::{analyze, Analysis, DiagnosticKind};
use test_case::test_case;

fn tok(text: &str) -> Token {
    Token::new(text, 1, 0)
}

fn analyze_city(statements: Vec<Statement>) -> Analysis {
    analyze(&City {
        name: tok("Aurora"),
        statements,
    })
}

fn kinds(analysis: &Analysis) -> Vec<DiagnosticKind> {
    analysis.diagnostics.iter().map(|d| d.kind).collect()
}

// ============================================================================
// Name Resolution Errors
// ============================================================================

/// Declaring the same wagon twice yields exactly one diagnostic at the
/// second declaration, and the first declaration is retained.
#[test]
fn test_duplicate_wagon() {
    let analysis = analyze_city(vec![
        Statement::Wagon {
            cargo: Token::new("boolean", 2, 6),
            name: Token::new("a", 2, 14),
        },
        Statement::Wagon {
            cargo: Token::new("int", 3, 6),
            name: Token::new("a", 3, 10),
        },
    ]);

    let rendered: Vec<String> = analysis.diagnostics.iter().map(|d| d.to_string()).collect();
    assert_eq!(rendered, vec!["3:10: variable already defined".to_string()]);

    let variable = analysis.program.get_variable("a").expect("first wins");
    assert_eq!(variable.ty(), Type::Bool);
}

#[test_case(Statement::Load {
    target: tok("ghost"),
    literal: Literal::Integer(tok("1")),
}; "load")]
#[test_case(Statement::Invert { target: tok("ghost") }; "invert")]
#[test_case(Statement::Negate { target: tok("ghost") }; "negate")]
#[test_case(Statement::Write { label: tok("label"), source: tok("ghost") }; "write")]
#[test_case(Statement::Read { label: tok("label"), target: tok("ghost") }; "read")]
fn test_undeclared_reference(statement: Statement) {
    let analysis = analyze_city(vec![statement]);

    assert_eq!(kinds(&analysis), vec![DiagnosticKind::VariableNotDefined]);
    assert!(analysis
        .program
        .sequence(analysis.program.body())
        .is_empty());
}

/// Each missing side of a transfer is its own diagnostic.
#[test]
fn test_transfer_both_sides_missing() {
    let analysis = analyze_city(vec![Statement::Transfer {
        source: Token::new("ghost", 4, 9),
        target: Token::new("phantom", 4, 15),
    }]);

    assert_eq!(
        kinds(&analysis),
        vec![
            DiagnosticKind::VariableNotDefined,
            DiagnosticKind::VariableNotDefined,
        ]
    );
    assert_eq!(analysis.diagnostics[0].column, 9);
    assert_eq!(analysis.diagnostics[1].column, 15);
}

/// Missing operands of an operator transport each get a diagnostic and
/// the application is dropped.
#[test]
fn test_transport_missing_operands() {
    let analysis = analyze_city(vec![
        Statement::Wagon {
            cargo: tok("int"),
            name: tok("a"),
        },
        Statement::Transport {
            operator: Some(tok("add")),
            ids: vec![tok("a"), tok("ghost"), tok("phantom")],
        },
    ]);

    assert_eq!(
        kinds(&analysis),
        vec![
            DiagnosticKind::VariableNotDefined,
            DiagnosticKind::VariableNotDefined,
        ]
    );
    assert!(analysis
        .program
        .sequence(analysis.program.body())
        .is_empty());
}

#[test]
fn test_transport_unknown_factory() {
    let analysis = analyze_city(vec![
        Statement::Wagon {
            cargo: tok("int"),
            name: tok("x"),
        },
        Statement::Transport {
            operator: None,
            ids: vec![tok("x"), tok("phantom"), tok("x")],
        },
    ]);

    assert_eq!(kinds(&analysis), vec![DiagnosticKind::FactoryNotDefined]);
}

#[test]
fn test_duplicate_factory_keeps_first_signature() {
    let analysis = analyze_city(vec![
        Statement::Wagon {
            cargo: tok("int"),
            name: tok("out"),
        },
        Statement::Factory {
            returns: tok("int"),
            name: tok("smelt"),
            params: vec![tok("int")],
            statements: vec![],
            result: tok("out"),
        },
        Statement::Factory {
            returns: tok("int"),
            name: tok("smelt"),
            params: vec![tok("char"), tok("char")],
            statements: vec![],
            result: tok("out"),
        },
    ]);

    assert_eq!(kinds(&analysis), vec![DiagnosticKind::FactoryAlreadyDefined]);
    let function = analysis.program.get_function("smelt").unwrap();
    assert_eq!(function.params(), &[Type::Int]);
}

/// A waypoint colliding on both namespaces reports each collision.
#[test]
fn test_waypoint_collides_twice() {
    let analysis = analyze_city(vec![
        Statement::Waypoint {
            name: tok("watch"),
            statements: vec![],
        },
        Statement::Waypoint {
            name: tok("watch"),
            statements: vec![],
        },
    ]);

    assert_eq!(
        kinds(&analysis),
        vec![
            DiagnosticKind::FactoryAlreadyDefined,
            DiagnosticKind::VariableAlreadyDefined,
        ]
    );
}

// ============================================================================
// Type Errors
// ============================================================================

#[test_case("steam"; "unknown keyword")]
#[test_case(""; "empty keyword")]
fn test_wagon_with_unknown_cargo(keyword: &str) {
    let analysis = analyze_city(vec![Statement::Wagon {
        cargo: tok(keyword),
        name: tok("a"),
    }]);

    assert_eq!(kinds(&analysis), vec![DiagnosticKind::TypeNotDefined]);
    assert!(analysis.program.get_variable("a").is_none());
}

/// An unresolvable return keyword drops the factory registration; the
/// body result lookup then has nothing to wire against.
#[test]
fn test_factory_with_unknown_return_type() {
    let analysis = analyze_city(vec![Statement::Factory {
        returns: tok("steam"),
        name: tok("smelt"),
        params: vec![],
        statements: vec![],
        result: tok("out"),
    }]);

    assert_eq!(kinds(&analysis), vec![DiagnosticKind::TypeNotDefined]);
    assert!(analysis.program.get_function("smelt").is_none());
}

/// An unresolvable parameter keyword drops only that parameter.
#[test]
fn test_factory_with_unknown_param_type() {
    let analysis = analyze_city(vec![
        Statement::Wagon {
            cargo: tok("int"),
            name: tok("out"),
        },
        Statement::Factory {
            returns: tok("int"),
            name: tok("smelt"),
            params: vec![tok("steam"), tok("int")],
            statements: vec![],
            result: tok("out"),
        },
    ]);

    assert_eq!(kinds(&analysis), vec![DiagnosticKind::TypeNotDefined]);
    let function = analysis.program.get_function("smelt").unwrap();
    assert_eq!(function.params(), &[Type::Int]);
}

/// A factory whose trailing result has the wrong type reports one
/// mismatch and appends no return.
#[test]
fn test_factory_return_type_mismatch() {
    let analysis = analyze_city(vec![
        Statement::Wagon {
            cargo: tok("char"),
            name: tok("mark"),
        },
        Statement::Factory {
            returns: tok("int"),
            name: tok("smelt"),
            params: vec![],
            statements: vec![],
            result: tok("mark"),
        },
    ]);

    assert_eq!(kinds(&analysis), vec![DiagnosticKind::TypeMismatch]);
    let function = analysis.program.get_function("smelt").unwrap();
    assert!(analysis.program.sequence(function.body()).is_empty());
}

/// A factory whose trailing result is undeclared reports the missing
/// variable and its body stays empty.
#[test]
fn test_factory_result_undeclared() {
    let analysis = analyze_city(vec![Statement::Factory {
        returns: tok("int"),
        name: tok("f"),
        params: vec![],
        statements: vec![],
        result: tok("a"),
    }]);

    assert_eq!(kinds(&analysis), vec![DiagnosticKind::VariableNotDefined]);
    let function = analysis.program.get_function("f").unwrap();
    assert!(analysis.program.sequence(function.body()).is_empty());
}

#[test]
fn test_transfer_type_mismatch() {
    let analysis = analyze_city(vec![
        Statement::Wagon {
            cargo: tok("int"),
            name: tok("a"),
        },
        Statement::Wagon {
            cargo: tok("char"),
            name: tok("b"),
        },
        Statement::Transfer {
            source: tok("a"),
            target: tok("b"),
        },
    ]);

    assert_eq!(kinds(&analysis), vec![DiagnosticKind::TypeMismatch]);
    assert!(analysis
        .program
        .sequence(analysis.program.body())
        .is_empty());
}

/// Boolean inputs under an arithmetic operator are a mismatch.
#[test]
fn test_transport_operand_type_mismatch() {
    let analysis = analyze_city(vec![
        Statement::Signal { name: tok("p") },
        Statement::Signal { name: tok("q") },
        Statement::Wagon {
            cargo: tok("int"),
            name: tok("r"),
        },
        Statement::Transport {
            operator: Some(tok("add")),
            ids: vec![tok("p"), tok("q"), tok("r")],
        },
    ]);

    assert_eq!(kinds(&analysis), vec![DiagnosticKind::TypeMismatch]);
}

/// The destination must carry the operator's result type.
#[test]
fn test_transport_destination_type_mismatch() {
    let analysis = analyze_city(vec![
        Statement::Wagon {
            cargo: tok("int"),
            name: tok("a"),
        },
        Statement::Wagon {
            cargo: tok("int"),
            name: tok("b"),
        },
        Statement::Signal { name: tok("flag") },
        Statement::Transport {
            operator: Some(tok("add")),
            ids: vec![tok("a"), tok("b"), tok("flag")],
        },
    ]);

    assert_eq!(kinds(&analysis), vec![DiagnosticKind::TypeMismatch]);
}

/// Too few arguments for the factory's signature.
#[test]
fn test_transport_call_arity_mismatch() {
    let analysis = analyze_city(vec![
        Statement::Wagon {
            cargo: tok("int"),
            name: tok("y"),
        },
        Statement::Factory {
            returns: tok("int"),
            name: tok("twice"),
            params: vec![tok("int")],
            statements: vec![],
            result: tok("y"),
        },
        Statement::Transport {
            operator: None,
            ids: vec![tok("twice"), tok("y")],
        },
    ]);

    assert_eq!(kinds(&analysis), vec![DiagnosticKind::TypeMismatch]);
}

#[test]
fn test_invert_non_boolean() {
    let analysis = analyze_city(vec![
        Statement::Wagon {
            cargo: tok("int"),
            name: tok("coal"),
        },
        Statement::Invert {
            target: tok("coal"),
        },
    ]);

    assert_eq!(kinds(&analysis), vec![DiagnosticKind::TypeMismatch]);
}

#[test]
fn test_negate_non_integer() {
    let analysis = analyze_city(vec![
        Statement::Signal { name: tok("go") },
        Statement::Negate { target: tok("go") },
    ]);

    assert_eq!(kinds(&analysis), vec![DiagnosticKind::TypeMismatch]);
}

/// A circle over a non-boolean guard reports a mismatch and builds no
/// loop.
#[test]
fn test_circle_non_boolean_guard() {
    let analysis = analyze_city(vec![
        Statement::Wagon {
            cargo: tok("int"),
            name: tok("coal"),
        },
        Statement::Circle {
            guard: tok("coal"),
            statements: vec![],
        },
    ]);

    assert_eq!(kinds(&analysis), vec![DiagnosticKind::TypeMismatch]);
    assert!(analysis
        .program
        .sequence(analysis.program.body())
        .is_empty());
}

// ============================================================================
// Literal Errors
// ============================================================================

#[test]
fn test_unknown_boolean_literal() {
    let analysis = analyze_city(vec![
        Statement::Signal { name: tok("go") },
        Statement::Load {
            target: tok("go"),
            literal: Literal::Boolean(tok("amber")),
        },
    ]);

    assert_eq!(kinds(&analysis), vec![DiagnosticKind::UnknownValue]);
    assert!(analysis
        .program
        .sequence(analysis.program.body())
        .is_empty());
}

#[test]
fn test_unknown_case_tag() {
    let analysis = analyze_city(vec![
        Statement::Signal { name: tok("go") },
        Statement::Choice {
            guard: tok("go"),
            cases: vec![ChoiceCase {
                tag: tok("amber"),
                statements: vec![],
            }],
        },
    ]);

    assert_eq!(kinds(&analysis), vec![DiagnosticKind::UnknownValue]);
    // The conditional itself was still built, with empty branches.
    let program = &analysis.program;
    let body = program.sequence(program.body()).operations();
    assert_eq!(body.len(), 1);
    match &body[0] {
        Operation::Conditional {
            on_true, on_false, ..
        } => {
            assert!(program.sequence(*on_true).is_empty());
            assert!(program.sequence(*on_false).is_empty());
        }
        other => panic!("expected a conditional, got {:?}", other),
    }
}

// ============================================================================
// Silent Skips (pinned behavior)
// ============================================================================

/// A circle whose guard was never declared is dropped without a
/// diagnostic; its nested statements are still analyzed.
#[test]
fn test_circle_unknown_guard_is_silent() {
    let analysis = analyze_city(vec![Statement::Circle {
        guard: tok("ghost"),
        statements: vec![Statement::Load {
            target: tok("phantom"),
            literal: Literal::Integer(tok("1")),
        }],
    }]);

    // Only the nested statement's own violation surfaces.
    assert_eq!(kinds(&analysis), vec![DiagnosticKind::VariableNotDefined]);
    assert!(analysis
        .program
        .sequence(analysis.program.body())
        .is_empty());
}

/// A choice whose guard was never declared is dropped without a
/// diagnostic.
#[test]
fn test_choice_unknown_guard_is_silent() {
    let analysis = analyze_city(vec![Statement::Choice {
        guard: tok("ghost"),
        cases: vec![ChoiceCase {
            tag: tok("green"),
            statements: vec![],
        }],
    }]);

    assert!(analysis.diagnostics.is_empty());
    assert!(analysis
        .program
        .sequence(analysis.program.body())
        .is_empty());
}

/// A load whose literal category does not match the target's type is
/// dropped without a diagnostic.
#[test_case(Literal::Boolean(tok("green")); "boolean into int")]
#[test_case(Literal::Character(tok("q")); "char into int")]
fn test_load_category_mismatch_is_silent(literal: Literal) {
    let analysis = analyze_city(vec![
        Statement::Wagon {
            cargo: tok("int"),
            name: tok("coal"),
        },
        Statement::Load {
            target: tok("coal"),
            literal,
        },
    ]);

    assert!(analysis.diagnostics.is_empty());
    assert!(analysis
        .program
        .sequence(analysis.program.body())
        .is_empty());
}

// ============================================================================
// Accumulation
// ============================================================================

/// Diagnostics accumulate in source order and analysis reaches the end.
#[test]
fn test_diagnostics_accumulate_in_order() {
    let analysis = analyze_city(vec![
        Statement::Wagon {
            cargo: Token::new("steam", 2, 6),
            name: Token::new("a", 2, 12),
        },
        Statement::Load {
            target: Token::new("b", 3, 9),
            literal: Literal::Integer(Token::new("1", 3, 4)),
        },
        Statement::Signal {
            name: Token::new("go", 4, 7),
        },
        Statement::Signal {
            name: Token::new("go", 5, 7),
        },
    ]);

    let rendered: Vec<String> = analysis.diagnostics.iter().map(|d| d.to_string()).collect();
    assert_eq!(
        rendered,
        vec![
            "2:6: type not defined".to_string(),
            "3:9: variable not defined".to_string(),
            "5:7: variable already defined".to_string(),
        ]
    );
    // The first `go` declaration survived.
    assert!(analysis.program.get_variable("go").is_some());
}
