//! Error types for scaffolding operations

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Which kind of action an error or result refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Add,
    Append,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionKind::Add => write!(f, "add"),
            ActionKind::Append => write!(f, "append"),
        }
    }
}

/// Errors that can occur while resolving, planning or executing a scaffold
#[derive(Debug, Error)]
pub enum Error {
    /// Template root is missing or a glob pattern is invalid
    #[error("cannot resolve templates in {}: {reason}", root.display())]
    Resolution { root: PathBuf, reason: String },

    /// A required answer is absent or has the wrong shape
    #[error("missing or malformed answer `{key}`")]
    Planning { key: String },

    /// A template references a variable that is not in the answers
    #[error("unresolved variable `{key}` in template")]
    Template { key: String },

    /// A template uses a helper that does not exist
    #[error("unknown template helper `{helper}`")]
    UnknownHelper { helper: String },

    /// A template file referenced by an action could not be read
    #[error("template file {} could not be read", path.display())]
    TemplateNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A rendered path leaves the destination root
    #[error("path `{path}` escapes the destination root")]
    PathEscape { path: String },

    /// An append would insert nothing
    #[error("append to `{path}` rendered empty content")]
    EmptyAppend { path: String },

    /// Filesystem failure while writing a destination file
    #[error("failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The append target does not contain its anchor
    #[error("anchor `{anchor}` not found in {}", path.display())]
    AnchorNotFound { path: PathBuf, anchor: String },

    /// A generator with the same name is already registered
    #[error("generator `{name}` is already registered")]
    DuplicateGenerator { name: String },

    /// No generator is registered under this name
    #[error("generator `{name}` not found")]
    NotFound { name: String },

    /// A new project would overwrite an existing directory
    #[error("directory {} already exists", path.display())]
    DestinationExists { path: PathBuf },

    /// A generator could not turn its answers into actions
    #[error("generator `{generator}` could not be planned: {source}")]
    PlanFailed {
        generator: String,
        #[source]
        source: Box<Error>,
    },

    /// An action of a generator failed
    #[error("generator `{generator}` failed at action #{index} ({kind} {path}): {source}")]
    ActionFailed {
        generator: String,
        index: usize,
        kind: ActionKind,
        path: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// The innermost error, looking through `PlanFailed` and `ActionFailed` wrappers
    pub fn root_cause(&self) -> &Error {
        match self {
            Error::PlanFailed { source, .. } | Error::ActionFailed { source, .. } => {
                source.root_cause()
            }
            other => other,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
