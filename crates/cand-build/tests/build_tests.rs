//! Orchestrator integration tests over real temp directories.

use std::fs;
use std::path::{Path, PathBuf};

use cand_build::error::{BuildErrorKind, InclusionErrorKind};
use cand_build::{build, FlatSource};
use cand_common::token::TokenKind;

fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn file_names(flat: &FlatSource) -> Vec<String> {
    flat.files
        .iter()
        .map(|f| f.path.file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}

fn ident_texts(flat: &FlatSource) -> Vec<(String, u32)> {
    flat.tokens
        .iter()
        .filter(|t| t.kind == TokenKind::Ident)
        .map(|t| (t.text.clone(), t.span.file))
        .collect()
}

#[test]
fn single_file_build() {
    let dir = tempfile::tempdir().unwrap();
    let root = write_file(dir.path(), "root.cand", "def int @x : 1;");

    let flat = build(&root).unwrap();
    assert_eq!(file_names(&flat), ["root.cand"]);
    assert!(flat.files[0].dependencies.is_empty());
    // Every token belongs to file 1.
    assert!(flat.tokens.iter().all(|t| t.span.file == 1));
    assert_eq!(flat.file(1).unwrap().text, "def int @x : 1;");
    assert!(flat.file(0).is_none());
}

#[test]
fn include_chain_flattens_deepest_first() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "b.cand", "def int @b;");
    write_file(dir.path(), "a.cand", "#include 'b.cand'\ndef int @a;");
    let root = write_file(dir.path(), "root.cand", "#include 'a.cand'\ndef int @r;");

    let flat = build(&root).unwrap();
    assert_eq!(file_names(&flat), ["b.cand", "a.cand", "root.cand"]);
    assert_eq!(
        ident_texts(&flat),
        [
            ("b".to_string(), 1),
            ("a".to_string(), 2),
            ("r".to_string(), 3)
        ]
    );
    // Include directives never reach the flat stream.
    assert!(flat.tokens.iter().all(|t| t.kind != TokenKind::DirInclude));
    assert!(flat
        .tokens
        .iter()
        .all(|t| t.kind != TokenKind::StrLiteral));

    // Per-file dependency records, in first-seen order.
    assert!(flat.files[0].dependencies.is_empty());
    assert_eq!(flat.files[1].dependencies.len(), 1);
    assert!(flat.files[1].dependencies[0].ends_with("b.cand"));
    assert!(flat.files[2].dependencies[0].ends_with("a.cand"));
}

#[test]
fn diamond_includes_appear_once_most_depended_first() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "c.cand", "def int @c;");
    write_file(dir.path(), "a.cand", "#include 'c.cand'\ndef int @a;");
    write_file(dir.path(), "b.cand", "#include 'c.cand'\ndef int @b;");
    let root = write_file(
        dir.path(),
        "root.cand",
        "#include 'a.cand'\n#include 'b.cand'\ndef int @r;",
    );

    let flat = build(&root).unwrap();
    assert_eq!(file_names(&flat), ["c.cand", "b.cand", "a.cand", "root.cand"]);
    let idents: Vec<String> = ident_texts(&flat).into_iter().map(|(t, _)| t).collect();
    assert_eq!(idents, ["c", "b", "a", "r"]);
}

#[test]
fn circular_dependency_is_detected() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "b.cand", "#include 'a.cand'\ndef int @b;");
    let root = write_file(dir.path(), "a.cand", "#include 'b.cand'\ndef int @a;");

    let err = build(&root).unwrap_err();
    match &err.kind {
        BuildErrorKind::Inclusion(kind @ InclusionErrorKind::Circular { .. }) => {
            let msg = kind.to_string();
            assert!(msg.contains("Circular dependency"));
            assert!(msg.contains("a.cand"));
            assert!(msg.contains("b.cand"));
        }
        other => panic!("expected a circular dependency error, got {other:?}"),
    }
}

#[test]
fn self_inclusion_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let root = write_file(dir.path(), "a.cand", "#include 'a.cand'\ndef int @a;");

    let err = build(&root).unwrap_err();
    assert_eq!(
        err.kind,
        BuildErrorKind::Inclusion(InclusionErrorKind::SelfInclusion)
    );
}

#[test]
fn missing_include_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let root = write_file(dir.path(), "root.cand", "#include 'ghost.cand'");

    let err = build(&root).unwrap_err();
    assert_eq!(
        err.kind,
        BuildErrorKind::Inclusion(InclusionErrorKind::DoesNotExist)
    );
    assert!(err.path.ends_with("ghost.cand"));
}

#[test]
fn wrong_extension_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "x.txt", "def int @x;");
    let root = write_file(dir.path(), "root.cand", "#include 'x.txt'");

    let err = build(&root).unwrap_err();
    assert_eq!(
        err.kind,
        BuildErrorKind::Inclusion(InclusionErrorKind::WrongExtension)
    );
}

#[test]
fn root_with_wrong_extension_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let root = write_file(dir.path(), "root.txt", "def int @x;");

    let err = build(&root).unwrap_err();
    assert_eq!(
        err.kind,
        BuildErrorKind::Inclusion(InclusionErrorKind::WrongExtension)
    );
}

#[test]
fn missing_root_is_rejected() {
    let err = build("no/such/file.cand").unwrap_err();
    assert_eq!(
        err.kind,
        BuildErrorKind::Inclusion(InclusionErrorKind::DoesNotExist)
    );
}

#[test]
fn forbidden_byte_is_reported_with_position() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("root.cand");
    fs::write(&path, b"def int @x;\n\x07").unwrap();

    let err = build(&path).unwrap_err();
    assert_eq!(
        err.kind,
        BuildErrorKind::ForbiddenSourceChar {
            byte: 0x07,
            line: 2,
            col: 1
        }
    );
}

#[test]
fn include_without_string_literal_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let root = write_file(dir.path(), "root.cand", "#include 42");

    let err = build(&root).unwrap_err();
    assert_eq!(
        err.kind,
        BuildErrorKind::Inclusion(InclusionErrorKind::DirectiveArgument)
    );
}

#[test]
fn duplicate_includes_are_ignored() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "a.cand", "def int @a;");
    let root = write_file(
        dir.path(),
        "root.cand",
        "#include 'a.cand'\n#include 'a.cand'\ndef int @r;",
    );

    let flat = build(&root).unwrap();
    assert_eq!(file_names(&flat), ["a.cand", "root.cand"]);
    assert_eq!(flat.files[1].dependencies.len(), 1);
}

#[test]
fn lex_error_in_an_included_file_propagates() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "a.cand", "#bogus");
    let root = write_file(dir.path(), "root.cand", "#include 'a.cand'");

    let err = build(&root).unwrap_err();
    assert!(matches!(err.kind, BuildErrorKind::Lex(_)));
    assert!(err.path.ends_with("a.cand"));
}

#[test]
fn other_directives_pass_through_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let root = write_file(dir.path(), "root.cand", "#ifdef X\ndef int @x;\n#endif");

    let flat = build(&root).unwrap();
    let kinds: Vec<TokenKind> = flat.tokens.iter().map(|t| t.kind).collect();
    assert_eq!(kinds[0], TokenKind::DirIfdef);
    assert_eq!(*kinds.last().unwrap(), TokenKind::DirEndif);
}
