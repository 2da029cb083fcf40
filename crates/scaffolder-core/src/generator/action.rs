//! File actions produced by a generator plan

use crate::error::ActionKind;
use regex::Regex;
use std::path::PathBuf;

/// Content source of an Add action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    /// Template string rendered directly
    Inline(String),
    /// Template file, relative to the executor's template root
    File(PathBuf),
}

/// Insertion point of an Append action
#[derive(Debug, Clone)]
pub enum Anchor {
    Literal(String),
    Pattern(Regex),
}

impl Anchor {
    /// Compile a regular-expression anchor
    pub fn pattern(pattern: &str) -> Result<Self, regex::Error> {
        Regex::new(pattern).map(Anchor::Pattern)
    }

    /// Byte offset of the first match in `haystack`
    pub fn find(&self, haystack: &str) -> Option<usize> {
        match self {
            Anchor::Literal(text) => haystack.find(text.as_str()),
            Anchor::Pattern(regex) => regex.find(haystack).map(|m| m.start()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Anchor::Literal(text) => text,
            Anchor::Pattern(regex) => regex.as_str(),
        }
    }
}

impl From<&str> for Anchor {
    fn from(text: &str) -> Self {
        Anchor::Literal(text.to_string())
    }
}

/// Create a file from a template
#[derive(Debug, Clone)]
pub struct AddAction {
    pub path: String,
    pub content: Content,
    pub skip_if_exists: bool,
}

/// Insert rendered content before an anchor line of an existing file
#[derive(Debug, Clone)]
pub struct AppendAction {
    pub path: String,
    pub template: String,
    pub unique: bool,
    pub anchor: Anchor,
}

/// One filesystem mutation in a plan
#[derive(Debug, Clone)]
pub enum Action {
    Add(AddAction),
    Append(AppendAction),
}

impl Action {
    /// Add action whose content comes from a template file
    pub fn add_file(path: impl Into<String>, template_file: impl Into<PathBuf>) -> Self {
        Action::Add(AddAction {
            path: path.into(),
            content: Content::File(template_file.into()),
            skip_if_exists: true,
        })
    }

    /// Add action with an inline content template
    pub fn add_inline(path: impl Into<String>, template: impl Into<String>) -> Self {
        Action::Add(AddAction {
            path: path.into(),
            content: Content::Inline(template.into()),
            skip_if_exists: true,
        })
    }

    /// Unique append before `anchor`
    pub fn append(
        path: impl Into<String>,
        template: impl Into<String>,
        anchor: impl Into<Anchor>,
    ) -> Self {
        Action::Append(AppendAction {
            path: path.into(),
            template: template.into(),
            unique: true,
            anchor: anchor.into(),
        })
    }

    /// Let an Add overwrite an existing file. No effect on Append.
    pub fn overwrite(mut self) -> Self {
        if let Action::Add(add) = &mut self {
            add.skip_if_exists = false;
        }
        self
    }

    /// Allow an Append to insert its content again. No effect on Add.
    pub fn repeatable(mut self) -> Self {
        if let Action::Append(append) = &mut self {
            append.unique = false;
        }
        self
    }

    pub fn kind(&self) -> ActionKind {
        match self {
            Action::Add(_) => ActionKind::Add,
            Action::Append(_) => ActionKind::Append,
        }
    }

    /// Unrendered destination path template
    pub fn path(&self) -> &str {
        match self {
            Action::Add(add) => &add.path,
            Action::Append(append) => &append.path,
        }
    }
}
