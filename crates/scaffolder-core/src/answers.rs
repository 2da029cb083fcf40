//! Answers collected for one generator invocation

use crate::error::{Error, Result};
use std::collections::BTreeMap;
use std::fmt;

/// A directory picked by a path-select prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedPath {
    /// Path as typed, relative to the project root (e.g. `src/app/blog`)
    pub original: String,
    /// Path rewritten to the `#` import alias (e.g. `#app/blog`)
    pub absolute: String,
}

impl SelectedPath {
    /// Derive both forms from the path the user selected
    pub fn from_original(original: impl Into<String>) -> Self {
        let original = original.into();
        let absolute = original.replacen("src/", "#", 1);
        Self { original, absolute }
    }

    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "original" => Some(&self.original),
            "absolute" => Some(&self.absolute),
            _ => None,
        }
    }
}

/// One typed answer value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerValue {
    Text(String),
    Bool(bool),
    List(Vec<String>),
    Path(SelectedPath),
}

impl fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerValue::Text(text) => f.write_str(text),
            AnswerValue::Bool(flag) => write!(f, "{}", flag),
            AnswerValue::List(items) => f.write_str(&items.join(", ")),
            AnswerValue::Path(path) => f.write_str(&path.original),
        }
    }
}

impl From<&str> for AnswerValue {
    fn from(value: &str) -> Self {
        AnswerValue::Text(value.to_string())
    }
}

impl From<String> for AnswerValue {
    fn from(value: String) -> Self {
        AnswerValue::Text(value)
    }
}

impl From<bool> for AnswerValue {
    fn from(value: bool) -> Self {
        AnswerValue::Bool(value)
    }
}

impl From<Vec<String>> for AnswerValue {
    fn from(value: Vec<String>) -> Self {
        AnswerValue::List(value)
    }
}

impl From<SelectedPath> for AnswerValue {
    fn from(value: SelectedPath) -> Self {
        AnswerValue::Path(value)
    }
}

/// Mapping from prompt name to answer, built in prompt order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Answers {
    values: BTreeMap<String, AnswerValue>,
}

impl Answers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, handy for tests and non-interactive callers
    pub fn with(mut self, key: impl Into<String>, value: impl Into<AnswerValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<AnswerValue>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&AnswerValue> {
        self.values.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Text answer, or a planning error naming the key
    pub fn text(&self, key: &str) -> Result<&str> {
        match self.values.get(key) {
            Some(AnswerValue::Text(text)) => Ok(text),
            _ => Err(planning(key)),
        }
    }

    /// Confirm answer, or a planning error naming the key
    pub fn flag(&self, key: &str) -> Result<bool> {
        match self.values.get(key) {
            Some(AnswerValue::Bool(flag)) => Ok(*flag),
            _ => Err(planning(key)),
        }
    }

    /// Multi-choice answer, or a planning error naming the key
    pub fn list(&self, key: &str) -> Result<&[String]> {
        match self.values.get(key) {
            Some(AnswerValue::List(items)) => Ok(items),
            _ => Err(planning(key)),
        }
    }

    /// Resolve a dotted lookup such as `name` or `dir.original` to its string form.
    ///
    /// Returns `None` when the key or field does not exist.
    pub fn lookup(&self, path: &str) -> Option<String> {
        let (key, field) = match path.split_once('.') {
            Some((key, field)) => (key, Some(field)),
            None => (path, None),
        };

        let value = self.values.get(key)?;
        match (value, field) {
            (value, None) => Some(value.to_string()),
            (AnswerValue::Path(selected), Some(field)) => selected.field(field).map(String::from),
            (_, Some(_)) => None,
        }
    }
}

fn planning(key: &str) -> Error {
    Error::Planning {
        key: key.to_string(),
    }
}
