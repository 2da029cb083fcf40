//! Destination renaming for cloned template files
//!
//! Template trees store dot-directories and dotfiles under plain aliases
//! (`storybook/`, `gitignore`) so packaging tools do not drop them. The
//! rename table maps those aliases back when the tree is cloned.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default directory aliases
const DIRECTORY_ALIASES: &[(&str, &str)] = &[("storybook", ".storybook"), ("husky", ".husky")];

/// Default file aliases
const FILE_ALIASES: &[(&str, &str)] = &[
    ("nvmrc", ".nvmrc"),
    ("gitignore", ".gitignore"),
    ("eslintrc.json", ".eslintrc.json"),
];

/// Alias-to-name mapping for directories and file basenames
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameTable {
    #[serde(default)]
    pub directories: BTreeMap<String, String>,
    #[serde(default)]
    pub files: BTreeMap<String, String>,
}

impl Default for RenameTable {
    fn default() -> Self {
        Self {
            directories: to_map(DIRECTORY_ALIASES),
            files: to_map(FILE_ALIASES),
        }
    }
}

fn to_map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(alias, name)| (alias.to_string(), name.to_string()))
        .collect()
}

impl RenameTable {
    /// A table with no rules; every path maps to itself
    pub fn empty() -> Self {
        Self {
            directories: BTreeMap::new(),
            files: BTreeMap::new(),
        }
    }

    /// Entries whose target is not a single plain path segment
    pub fn invalid_targets(&self) -> Vec<&str> {
        self.directories
            .values()
            .chain(self.files.values())
            .filter(|target| {
                target.is_empty()
                    || target.contains('/')
                    || target.contains('\\')
                    || *target == "."
                    || *target == ".."
            })
            .map(String::as_str)
            .collect()
    }
}

/// Applies a [`RenameTable`] to `/`-separated relative paths
#[derive(Debug, Clone, Default)]
pub struct PathTransformer {
    table: RenameTable,
}

impl PathTransformer {
    pub fn new(table: RenameTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &RenameTable {
        &self.table
    }

    /// Rename directory components first, then the basename. Total and pure.
    pub fn transform(&self, relative: &str) -> String {
        let mut segments: Vec<&str> = relative.split('/').collect();
        let basename = segments.pop().unwrap_or_default();

        let mut renamed: Vec<&str> = segments
            .into_iter()
            .map(|dir| self.table.directories.get(dir).map_or(dir, String::as_str))
            .collect();
        renamed.push(self.table.files.get(basename).map_or(basename, String::as_str));

        renamed.join("/")
    }
}
