//! The build orchestrator.
//!
//! Takes a root `.cand` file, resolves its transitive `#include` graph,
//! and produces one flattened token stream whose order respects
//! dependencies: most-depended-on files first, the root last. Every
//! token is stamped with the 1-based index of its file in that order
//! (0 is reserved for "no file").
//!
//! Each file is validated (exists, regular, right extension, accepted
//! alphabet), lexed once, and scanned for `#include` directives. A file
//! included again later in the build is moved later in the order, after
//! a recursive check that the re-inclusion does not close a dependency
//! cycle. `#include` directives and their path literals are dropped
//! from the flattened stream; all other directives pass through.
//!
//! A `Builder` owns all state for one build; independent builds share
//! nothing.

pub mod error;

use std::fs;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashSet;

use cand_common::chars;
use cand_common::token::{Token, TokenKind};
use cand_lexer::Lexer;

use error::{BuildError, BuildErrorKind, InclusionErrorKind};

/// One file of a finished build.
#[derive(Debug)]
pub struct FileRecord {
    /// Canonical path of the file.
    pub path: PathBuf,
    /// The file's full text, kept for diagnostics.
    pub text: String,
    /// Directly included files, in first-seen order.
    pub dependencies: Vec<PathBuf>,
}

/// The flattened build: per-file records in include order (root last)
/// and the concatenated token stream.
#[derive(Debug)]
pub struct FlatSource {
    pub files: Vec<FileRecord>,
    pub tokens: Vec<Token>,
}

impl FlatSource {
    /// Look up a file by its 1-based token index; 0 is "no file".
    pub fn file(&self, index: u32) -> Option<&FileRecord> {
        if index == 0 {
            None
        } else {
            self.files.get(index as usize - 1)
        }
    }
}

#[derive(Debug)]
struct ScanUnit {
    path: PathBuf,
    text: String,
    tokens: Vec<Token>,
    tokenized: bool,
    dependencies: Vec<PathBuf>,
}

impl ScanUnit {
    fn pending(path: PathBuf) -> Self {
        Self {
            path,
            text: String::new(),
            tokens: Vec::new(),
            tokenized: false,
            dependencies: Vec::new(),
        }
    }
}

/// Orchestrates one build from a root file to a [`FlatSource`].
#[derive(Debug)]
pub struct Builder {
    root: PathBuf,
    root_unit: ScanUnit,
    units: Vec<ScanUnit>,
}

impl Builder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            root_unit: ScanUnit::pending(root.clone()),
            root,
            units: Vec::new(),
        }
    }

    /// Run the build: validate, lex and scan every file reachable from
    /// the root, then flatten.
    pub fn build(mut self) -> Result<FlatSource, BuildError> {
        self.root = validate_source_file(&self.root)?;

        // The root first: its includes seed the global order.
        let mut root_unit = load_source_file(&self.root)?;
        let raws = include_paths(&root_unit.tokens, &self.root)?;
        root_unit.dependencies = self.scan_includes(&self.root.clone(), raws)?;
        self.root_unit = root_unit;

        // Keep scanning until every discovered file has been lexed and
        // scanned. Scanning may append new files or reorder old ones.
        while let Some(path) = self.next_pending() {
            let loaded = load_source_file(&path)?;
            let raws = include_paths(&loaded.tokens, &path)?;
            {
                let unit = self.unit_mut(&path);
                unit.text = loaded.text;
                unit.tokens = loaded.tokens;
                unit.tokenized = true;
            }
            let dependencies = self.scan_includes(&path, raws)?;
            self.unit_mut(&path).dependencies = dependencies;
        }

        Ok(self.flatten())
    }

    fn next_pending(&self) -> Option<PathBuf> {
        self.units
            .iter()
            .find(|u| !u.tokenized)
            .map(|u| u.path.clone())
    }

    fn unit_mut(&mut self, path: &Path) -> &mut ScanUnit {
        self.units
            .iter_mut()
            .find(|u| u.path == path)
            .expect("scanned file is always in the include list")
    }

    /// Resolve one file's include directives against the global include
    /// order. Returns the file's direct dependencies in first-seen
    /// order.
    fn scan_includes(
        &mut self,
        includer: &Path,
        raw_paths: Vec<String>,
    ) -> Result<Vec<PathBuf>, BuildError> {
        let dir = includer.parent().map(Path::to_path_buf).unwrap_or_default();
        let mut dependencies = Vec::new();
        let mut seen: FxHashSet<PathBuf> = FxHashSet::default();

        for raw in raw_paths {
            let mut candidate = PathBuf::from(&raw);
            if candidate.is_relative() {
                candidate = dir.join(candidate);
            }
            let resolved = validate_source_file(&candidate)?;
            self.register_dependency(includer, resolved, &mut seen, &mut dependencies)?;
        }
        Ok(dependencies)
    }

    /// Apply one resolved inclusion to the global order: reject self
    /// and cyclic inclusions, drop duplicates, move re-included files
    /// later, append new ones as pending. `seen` holds the includer's
    /// own inclusions so far.
    fn register_dependency(
        &mut self,
        includer: &Path,
        resolved: PathBuf,
        seen: &mut FxHashSet<PathBuf>,
        dependencies: &mut Vec<PathBuf>,
    ) -> Result<(), BuildError> {
        if resolved == includer {
            return Err(BuildError::new(
                BuildErrorKind::Inclusion(InclusionErrorKind::SelfInclusion),
                includer,
            ));
        }
        if !seen.insert(resolved.clone()) {
            // Duplicate inclusion within one file: first wins.
            return Ok(());
        }

        if resolved == self.root {
            // Anything reachable from the root is already in the
            // root's recorded dependency closure, so this closes a
            // cycle; the distinct root error is the fallback.
            let kind = if self.depends_transitively(&resolved, includer) {
                InclusionErrorKind::Circular {
                    dependant: includer.to_path_buf(),
                    dependency: resolved,
                }
            } else {
                InclusionErrorKind::RootReinclusion
            };
            return Err(BuildError::new(BuildErrorKind::Inclusion(kind), includer));
        }

        if let Some(pos) = self.units.iter().position(|u| u.path == resolved) {
            if self.depends_transitively(&resolved, includer) {
                return Err(BuildError::new(
                    BuildErrorKind::Inclusion(InclusionErrorKind::Circular {
                        dependant: includer.to_path_buf(),
                        dependency: resolved,
                    }),
                    includer,
                ));
            }
            // Re-included: move later in the order so it still
            // precedes this includer after flattening.
            let unit = self.units.remove(pos);
            self.units.push(unit);
        } else {
            self.units.push(ScanUnit::pending(resolved.clone()));
        }
        dependencies.push(resolved);
        Ok(())
    }

    /// Whether `from` transitively depends on `target`, following the
    /// dependencies recorded so far. The recorded graph is acyclic,
    /// since anything that would close a cycle is rejected before being
    /// recorded.
    fn depends_transitively(&self, from: &Path, target: &Path) -> bool {
        let dependencies = if from == self.root {
            &self.root_unit.dependencies
        } else {
            match self.units.iter().find(|u| u.path == from) {
                Some(unit) => &unit.dependencies,
                None => return false,
            }
        };
        dependencies
            .iter()
            .any(|d| d == target || self.depends_transitively(d, target))
    }

    /// Emit files in reverse include order with the root last, stamping
    /// file indices and dropping `#include` directives.
    fn flatten(self) -> FlatSource {
        let mut ordered: Vec<ScanUnit> = self.units.into_iter().rev().collect();
        ordered.push(self.root_unit);

        let mut files = Vec::with_capacity(ordered.len());
        let mut tokens = Vec::new();
        for (i, unit) in ordered.into_iter().enumerate() {
            let file_index = (i + 1) as u32;
            let mut iter = unit.tokens.into_iter().peekable();
            while let Some(mut token) = iter.next() {
                if token.kind == TokenKind::DirInclude {
                    if iter.peek().is_some_and(|t| t.kind == TokenKind::StrLiteral) {
                        iter.next();
                    }
                    continue;
                }
                token.set_file(file_index);
                tokens.push(token);
            }
            files.push(FileRecord {
                path: unit.path,
                text: unit.text,
                dependencies: unit.dependencies,
            });
        }
        FlatSource { files, tokens }
    }
}

/// Build a root file in one call.
pub fn build(root: impl Into<PathBuf>) -> Result<FlatSource, BuildError> {
    Builder::new(root).build()
}

// ── File loading ───────────────────────────────────────────────────────

/// Validate a source path: it exists, is a regular file, and carries
/// the `.cand` extension. Returns the canonical path.
fn validate_source_file(path: &Path) -> Result<PathBuf, BuildError> {
    if !path.exists() {
        return Err(BuildError::new(
            BuildErrorKind::Inclusion(InclusionErrorKind::DoesNotExist),
            path,
        ));
    }
    if !path.is_file() {
        return Err(BuildError::new(
            BuildErrorKind::Inclusion(InclusionErrorKind::NotRegularFile),
            path,
        ));
    }
    if path.extension().and_then(|e| e.to_str()) != Some("cand") {
        return Err(BuildError::new(
            BuildErrorKind::Inclusion(InclusionErrorKind::WrongExtension),
            path,
        ));
    }
    fs::canonicalize(path).map_err(|e| {
        BuildError::new(
            BuildErrorKind::Inclusion(InclusionErrorKind::CannotOpen(e.to_string())),
            path,
        )
    })
}

/// Read, byte-check and lex a validated file.
fn load_source_file(path: &Path) -> Result<ScanUnit, BuildError> {
    let bytes =
        fs::read(path).map_err(|e| BuildError::new(BuildErrorKind::FailedToReadFile(e.to_string()), path))?;
    check_source_bytes(&bytes, path)?;
    let text = String::from_utf8(bytes).expect("validated source bytes are ASCII");
    let tokens =
        Lexer::tokenize(&text).map_err(|e| BuildError::new(BuildErrorKind::Lex(e), path))?;
    Ok(ScanUnit {
        path: path.to_path_buf(),
        text,
        tokens,
        tokenized: true,
        dependencies: Vec::new(),
    })
}

/// Reject any byte outside the accepted source alphabet, reporting its
/// position.
fn check_source_bytes(bytes: &[u8], path: &Path) -> Result<(), BuildError> {
    let mut line = 1u32;
    let mut col = 1u32;
    for &b in bytes {
        if !chars::is_valid_source_byte(b) {
            return Err(BuildError::new(
                BuildErrorKind::ForbiddenSourceChar { byte: b, line, col },
                path,
            ));
        }
        if b == b'\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }
    Ok(())
}

/// Extract the quoted paths of every `#include` directive.
fn include_paths(tokens: &[Token], path: &Path) -> Result<Vec<String>, BuildError> {
    let mut out = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        if tokens[i].kind != TokenKind::DirInclude {
            i += 1;
            continue;
        }
        match tokens.get(i + 1) {
            Some(t) if t.kind == TokenKind::StrLiteral => {
                out.push(t.text[1..t.text.len() - 1].to_string());
                i += 2;
            }
            _ => {
                return Err(BuildError::new(
                    BuildErrorKind::Inclusion(InclusionErrorKind::DirectiveArgument),
                    path,
                ));
            }
        }
    }
    Ok(out)
}
