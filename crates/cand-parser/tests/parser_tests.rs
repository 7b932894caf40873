//! Parser integration tests.
//!
//! Sources are lexed with `cand-lexer`, parsed, and the CST debug tree
//! checked with insta inline snapshots. Error cases assert on the
//! returned error kinds.

use cand_lexer::Lexer;
use cand_parser::{parse_expr_tokens, parse_tokens, Parse, ParseErrorKind};
use insta::assert_snapshot;

fn parse_program(source: &str) -> Parse {
    let tokens = Lexer::tokenize(source).unwrap();
    parse_tokens(&tokens).unwrap()
}

fn program_tree(source: &str) -> String {
    parse_program(source).debug_tree()
}

fn expr_tree(source: &str) -> String {
    let tokens = Lexer::tokenize(source).unwrap();
    parse_expr_tokens(&tokens).unwrap().debug_tree()
}

fn program_error(source: &str) -> ParseErrorKind {
    let tokens = Lexer::tokenize(source).unwrap();
    parse_tokens(&tokens).unwrap_err().kind
}

// ── Expressions ────────────────────────────────────────────────────────

#[test]
fn arithmetic_precedence() {
    assert_snapshot!(expr_tree("1 + 2 * 3"), @r#"
    Plus "+"
      IntLiteral "1"
      Star "*"
        IntLiteral "2"
        IntLiteral "3"
    "#);
}

#[test]
fn assignment_chain_is_right_associative() {
    assert_snapshot!(expr_tree("a = b = c"), @r#"
    Assign "="
      Ident "a"
      Assign "="
        Ident "b"
        Ident "c"
    "#);
}

#[test]
fn addition_chain_is_left_associative() {
    assert_snapshot!(expr_tree("a + b + c"), @r#"
    Plus "+"
      Plus "+"
        Ident "a"
        Ident "b"
      Ident "c"
    "#);
}

#[test]
fn call_with_mixed_arguments() {
    assert_snapshot!(expr_tree("f(1, 2 + 3, g(4))"), @r#"
    FunctionCall
      Ident "f"
      Arguments
        IntLiteral "1"
        Plus "+"
          IntLiteral "2"
          IntLiteral "3"
        FunctionCall
          Ident "g"
          Arguments
            IntLiteral "4"
    "#);
}

#[test]
fn index_and_list_trailers() {
    assert_snapshot!(expr_tree("a[i]"), @r#"
    IndexOperator
      Ident "a"
      Arguments
        Ident "i"
    "#);
    assert_snapshot!(expr_tree("list{1, 2}"), @r#"
    ListingOperator
      KwList "list"
      Arguments
        IntLiteral "1"
        IntLiteral "2"
    "#);
}

#[test]
fn empty_call_has_empty_arguments() {
    assert_snapshot!(expr_tree("f()"), @r#"
    FunctionCall
      Ident "f"
      Arguments
    "#);
}

#[test]
fn prefix_operators_bind_tighter_than_logic() {
    assert_snapshot!(expr_tree("!a && ~b"), @r#"
    AmpAmp "&&"
      Bang "!"
        Ident "a"
      Tilde "~"
        Ident "b"
    "#);
}

#[test]
fn postfix_increment() {
    assert_snapshot!(expr_tree("x++"), @r#"
    PlusPlus "++"
      Ident "x"
    "#);
}

#[test]
fn access_chain_is_left_associative() {
    assert_snapshot!(expr_tree("a.b.c"), @r#"
    Dot "."
      Dot "."
        Ident "a"
        Ident "b"
      Ident "c"
    "#);
}

#[test]
fn parentheses_override_precedence() {
    assert_snapshot!(expr_tree("(a + b) * c"), @r#"
    Star "*"
      Plus "+"
        Ident "a"
        Ident "b"
      Ident "c"
    "#);
}

#[test]
fn negative_literal_fuses() {
    assert_snapshot!(expr_tree("a + -5"), @r#"
    Plus "+"
      Ident "a"
      IntLiteral "-5"
    "#);
}

#[test]
fn spaceship_sits_between_equality_and_comparison() {
    assert_snapshot!(expr_tree("a <=> b == c"), @r#"
    EqEq "=="
      Spaceship "<=>"
        Ident "a"
        Ident "b"
      Ident "c"
    "#);
}

#[test]
fn mismatched_call_scope_is_an_error() {
    let tokens = Lexer::tokenize("f(1").unwrap();
    let err = parse_expr_tokens(&tokens).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::MismatchedScope);
}

// ── Variable declarations ──────────────────────────────────────────────

#[test]
fn variable_declaration_with_definition() {
    assert_snapshot!(program_tree("def int @x : 1 + 2 * 3;"), @r#"
    Program
      VariableDeclaration
        Modifiers
        KwInt "int"
        Ident "x"
        VariableDefinition
          Plus "+"
            IntLiteral "1"
            Star "*"
              IntLiteral "2"
              IntLiteral "3"
    "#);
}

#[test]
fn variable_declaration_without_definition() {
    assert_snapshot!(program_tree("def int @x;"), @r#"
    Program
      VariableDeclaration
        Modifiers
        KwInt "int"
        Ident "x"
    "#);
}

#[test]
fn variable_declaration_with_modifiers() {
    assert_snapshot!(program_tree("private static def int @x;"), @r#"
    Program
      VariableDeclaration
        Modifiers
          KwPrivate "private"
          KwStatic "static"
        KwInt "int"
        Ident "x"
    "#);
}

#[test]
fn variable_declaration_with_implicit_any_type() {
    assert_snapshot!(program_tree("def @x : 5;"), @r#"
    Program
      VariableDeclaration
        Modifiers
        KwAny
        Ident "x"
        VariableDefinition
          IntLiteral "5"
    "#);
}

// ── Method declarations ────────────────────────────────────────────────

#[test]
fn method_signature_void_void() {
    assert_snapshot!(program_tree("fn @f : {};"), @r#"
    Program
      MethodDeclaration
        Modifiers
        Ident "f"
        MethodSignature
          MethodParameterList
            MethodParameter
              MethodVoid
          MethodReturnType
            MethodVoid
        MethodDefinition
    "#);
}

#[test]
fn method_signature_void_any() {
    assert_snapshot!(program_tree("fn @f > : {};"), @r#"
    Program
      MethodDeclaration
        Modifiers
        Ident "f"
        MethodSignature
          MethodParameterList
            MethodParameter
              MethodVoid
          MethodReturnType
            KwAny
        MethodDefinition
    "#);
}

#[test]
fn method_signature_with_parameters_and_return_type() {
    assert_snapshot!(
        program_tree("fn @sum (int @a, int @b) > real : { return a + b; };"),
        @r#"
    Program
      MethodDeclaration
        Modifiers
        Ident "sum"
        MethodSignature
          MethodParameterList
            MethodParameter
              Modifiers
              KwInt "int"
              Ident "a"
            MethodParameter
              Modifiers
              KwInt "int"
              Ident "b"
          MethodReturnType
            KwReal "real"
        MethodDefinition
          KwReturn "return"
            Plus "+"
              Ident "a"
              Ident "b"
    "#);
}

#[test]
fn method_declaration_without_body() {
    assert_snapshot!(program_tree("fn @f;"), @r#"
    Program
      MethodDeclaration
        Modifiers
        Ident "f"
        MethodSignature
    "#);
}

#[test]
fn bare_parameter_has_implicit_any_type() {
    assert_snapshot!(program_tree("fn @f (x) : {};"), @r#"
    Program
      MethodDeclaration
        Modifiers
        Ident "f"
        MethodSignature
          MethodParameterList
            MethodParameter
              Modifiers
              KwAny
              Ident "x"
          MethodReturnType
            MethodVoid
        MethodDefinition
    "#);
}

// ── Class, lib, import, using ──────────────────────────────────────────

#[test]
fn class_with_member_declarations() {
    assert_snapshot!(program_tree("class @Point : { def int @x; def int @y; };"), @r#"
    Program
      ClassDeclaration
        Modifiers
        Ident "Point"
        ClassDefinition
          VariableDeclaration
            Modifiers
            KwInt "int"
            Ident "x"
          VariableDeclaration
            Modifiers
            KwInt "int"
            Ident "y"
    "#);
}

#[test]
fn anonymous_library() {
    assert_snapshot!(program_tree("lib : { def int @x; };"), @r#"
    Program
      LibraryDeclaration
        Modifiers
        LibraryDefinition
          VariableDeclaration
            Modifiers
            KwInt "int"
            Ident "x"
    "#);
}

#[test]
fn named_library_without_body() {
    assert_snapshot!(program_tree("lib @math;"), @r#"
    Program
      LibraryDeclaration
        Modifiers
        Ident "math"
    "#);
}

#[test]
fn import_declaration() {
    assert_snapshot!(program_tree("import math;"), @r#"
    Program
      ImportDeclaration
        Ident "math"
    "#);
}

#[test]
fn using_type_alias() {
    assert_snapshot!(program_tree("using @T : int;"), @r#"
    Program
      TypeAlias
        Ident "T"
        KwInt "int"
    "#);
}

#[test]
fn using_library_type_alias() {
    assert_snapshot!(program_tree("using @T : lib vec;"), @r#"
    Program
      LibraryTypeAlias
        Ident "T"
        Ident "vec"
    "#);
}

#[test]
fn using_inclusions() {
    assert_snapshot!(program_tree("using lib math; using namespace geo; using thing;"), @r#"
    Program
      LibraryNamespaceInclusion
        Ident "math"
      NamespaceInclusion
        Ident "geo"
      NamespaceObjectInclusion
        Ident "thing"
    "#);
}

// ── Main and control flow ──────────────────────────────────────────────

#[test]
fn main_with_return() {
    assert_snapshot!(program_tree("main : { return 0; };"), @r#"
    Program
      MainDeclaration
        MethodSignature
          MethodParameterList
            MethodParameter
              MethodVoid
          MethodReturnType
            MethodVoid
        MainDefinition
          KwReturn "return"
            IntLiteral "0"
    "#);
}

#[test]
fn named_main_is_not_implemented() {
    let err = program_error("main @entry : { return 0; };");
    assert!(matches!(err, ParseErrorKind::NotImplemented(_)));
}

#[test]
fn if_elif_else_chain_is_one_statement() {
    let source = "main : { if (x) { return 1; } elif (y) { return 2; } else { return 0; }; };";
    assert_snapshot!(program_tree(source), @r#"
    Program
      MainDeclaration
        MethodSignature
          MethodParameterList
            MethodParameter
              MethodVoid
          MethodReturnType
            MethodVoid
        MainDefinition
          IfStatement
            KwIf
              Ident "x"
              MethodDefinition
                KwReturn "return"
                  IntLiteral "1"
            KwElif
              Ident "y"
              MethodDefinition
                KwReturn "return"
                  IntLiteral "2"
            KwElse
              MethodDefinition
                KwReturn "return"
                  IntLiteral "0"
    "#);
}

#[test]
fn while_statement() {
    assert_snapshot!(program_tree("main : { while (x < 10) { x = x + 1; }; };"), @r#"
    Program
      MainDeclaration
        MethodSignature
          MethodParameterList
            MethodParameter
              MethodVoid
          MethodReturnType
            MethodVoid
        MainDefinition
          KwWhile
            Lt "<"
              Ident "x"
              IntLiteral "10"
            MethodDefinition
              Assign "="
                Ident "x"
                Plus "+"
                  Ident "x"
                  IntLiteral "1"
    "#);
}

#[test]
fn for_statement() {
    let source = "main : { for (def int @i : 0; i < 3; i++) { f(i); }; };";
    assert_snapshot!(program_tree(source), @r#"
    Program
      MainDeclaration
        MethodSignature
          MethodParameterList
            MethodParameter
              MethodVoid
          MethodReturnType
            MethodVoid
        MainDefinition
          KwFor
            VariableDeclaration
              Modifiers
              KwInt "int"
              Ident "i"
              VariableDefinition
                IntLiteral "0"
            Lt "<"
              Ident "i"
              IntLiteral "3"
            PlusPlus "++"
              Ident "i"
            MethodDefinition
              FunctionCall
                Ident "f"
                Arguments
                  Ident "i"
    "#);
}

#[test]
fn for_with_wrong_clause_count_is_an_error() {
    let err = program_error("main : { for (def int @i : 0; i < 3) { f(i); }; };");
    assert!(matches!(err, ParseErrorKind::InvalidForLoopSyntax(_)));
}

// ── Errors and invariants ──────────────────────────────────────────────

#[test]
fn expression_at_top_level_is_an_error() {
    assert_eq!(
        program_error("x + 1;"),
        ParseErrorKind::ExpectedPragmaticDeclaration
    );
}

#[test]
fn missing_statement_semicolon_is_an_error() {
    let err = program_error("def int @x : 5");
    assert!(matches!(err, ParseErrorKind::ExpectedToken { .. }));
}

#[test]
fn unary_minus_before_identifier_is_an_error() {
    let err = program_error("def int @x : 1 + -y;");
    assert!(matches!(err, ParseErrorKind::UserSyntaxError(_)));
}

#[test]
fn modified_import_is_an_error() {
    let err = program_error("private import math;");
    assert!(matches!(err, ParseErrorKind::UserSyntaxError(_)));
}

#[test]
fn stray_semicolons_are_skipped() {
    assert_snapshot!(program_tree(";; def int @x; ;"), @r#"
    Program
      VariableDeclaration
        Modifiers
        KwInt "int"
        Ident "x"
    "#);
}

#[test]
fn cst_parent_links_hold_for_a_whole_parse() {
    let parse = parse_program("class @C : { def int @x; fn @f : { return x; }; };");
    let cst = parse.cst();
    fn check(cst: &cand_parser::Cst, id: cand_parser::NodeId) {
        for &child in cst.children(id) {
            assert_eq!(cst.parent(child), Some(id));
            check(cst, child);
        }
    }
    assert!(cst.parent(parse.root()).is_none());
    check(cst, parse.root());
}

#[test]
fn deeply_nested_expression_parses() {
    let source = format!("def int @x : {}1{};", "(".repeat(64), ")".repeat(64));
    let parse = parse_program(&source);
    assert!(parse.debug_tree().contains("IntLiteral \"1\""));
}
