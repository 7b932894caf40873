//! Build error types.
//!
//! Everything that can go wrong between "here is a root file path" and
//! "here is the flattened token stream": file validation, forbidden
//! bytes, lexing, and include resolution.

use std::fmt;
use std::path::PathBuf;

use cand_common::error::LexError;

/// A build error, attached to the file it occurred in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildError {
    pub kind: BuildErrorKind,
    pub path: PathBuf,
}

impl BuildError {
    pub fn new(kind: BuildErrorKind, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            path: path.into(),
        }
    }
}

/// The specific kind of build error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildErrorKind {
    /// The file passed validation but could not be read.
    FailedToReadFile(String),
    /// The driver was invoked with an unusable argument.
    InvalidCliArg(String),
    /// A file could not be included.
    Inclusion(InclusionErrorKind),
    /// A byte outside the accepted source alphabet.
    ForbiddenSourceChar { byte: u8, line: u32, col: u32 },
    /// The file failed to lex.
    Lex(LexError),
}

/// Why an inclusion failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InclusionErrorKind {
    DoesNotExist,
    NotRegularFile,
    WrongExtension,
    CannotOpen(String),
    /// A file tried to include itself.
    SelfInclusion,
    /// A file tried to include the build's root file without forming a
    /// recorded cycle.
    RootReinclusion,
    /// The included file transitively depends on its includer.
    Circular {
        dependant: PathBuf,
        dependency: PathBuf,
    },
    /// `#include` was not followed by a string literal path.
    DirectiveArgument,
}

impl fmt::Display for InclusionErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DoesNotExist => write!(f, "file does not exist"),
            Self::NotRegularFile => write!(f, "not a regular file"),
            Self::WrongExtension => write!(f, "not a `.cand` file"),
            Self::CannotOpen(err) => write!(f, "could not open file: {err}"),
            Self::SelfInclusion => write!(f, "a file cannot include itself"),
            Self::RootReinclusion => write!(f, "the root build file cannot be included"),
            Self::Circular {
                dependant,
                dependency,
            } => write!(
                f,
                "Circular dependency detected between '{}' and '{}'",
                dependant.display(),
                dependency.display()
            ),
            Self::DirectiveArgument => {
                write!(f, "#include must be followed by a string literal path")
            }
        }
    }
}

impl fmt::Display for BuildErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FailedToReadFile(err) => write!(f, "failed to read file: {err}"),
            Self::InvalidCliArg(arg) => write!(f, "invalid argument: {arg}"),
            Self::Inclusion(kind) => write!(f, "{kind}"),
            Self::ForbiddenSourceChar { byte, line, col } => write!(
                f,
                "{line}:{col}: forbidden source byte {byte:#04x}"
            ),
            Self::Lex(err) => write!(f, "{err}"),
        }
    }
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.kind)
    }
}

impl std::error::Error for BuildError {}
