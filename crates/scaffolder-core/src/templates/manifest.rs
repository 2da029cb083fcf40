//! Template manifest types and parsing

use super::transform::RenameTable;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Manifest file name at the root of a template tree. Never copied.
pub const MANIFEST_FILE: &str = "template.yaml";

fn default_patterns() -> Vec<String> {
    vec!["**".to_string()]
}

/// Rename overrides as written in the manifest.
///
/// A section that is left out keeps the built-in aliases for that section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RenameOverrides {
    #[serde(default)]
    pub directories: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub files: Option<BTreeMap<String, String>>,
}

/// Template manifest (`<template_root>/template.yaml`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloneManifest {
    /// Display name of the template
    #[serde(default)]
    pub name: Option<String>,

    /// Description of what the template provides
    #[serde(default)]
    pub description: Option<String>,

    /// Glob patterns selecting the files to clone
    #[serde(default = "default_patterns")]
    pub patterns: Vec<String>,

    /// Alias renames applied to cloned paths
    #[serde(default)]
    pub rename: RenameOverrides,
}

impl Default for CloneManifest {
    fn default() -> Self {
        Self {
            name: None,
            description: None,
            patterns: default_patterns(),
            rename: RenameOverrides::default(),
        }
    }
}

impl CloneManifest {
    /// Parse a manifest from YAML text
    pub fn parse(root: &Path, content: &str) -> Result<Self> {
        let manifest: CloneManifest =
            serde_yaml::from_str(content).map_err(|e| Error::Resolution {
                root: root.to_path_buf(),
                reason: format!("failed to parse {}: {}", MANIFEST_FILE, e),
            })?;

        let table = manifest.rename_table();
        let invalid = table.invalid_targets();
        if !invalid.is_empty() {
            return Err(Error::Resolution {
                root: root.to_path_buf(),
                reason: format!("rename targets must be plain names: {}", invalid.join(", ")),
            });
        }

        Ok(manifest)
    }

    /// Load the manifest from a template root; a missing file yields defaults
    pub async fn load(root: &Path) -> Result<Self> {
        let path = root.join(MANIFEST_FILE);
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Self::parse(root, &content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(Error::Resolution {
                root: root.to_path_buf(),
                reason: format!("failed to read {}: {}", path.display(), e),
            }),
        }
    }

    /// Built-in rename table with this manifest's sections applied
    pub fn rename_table(&self) -> RenameTable {
        let mut table = RenameTable::default();
        if let Some(directories) = &self.rename.directories {
            table.directories = directories.clone();
        }
        if let Some(files) = &self.rename.files {
            table.files = files.clone();
        }
        table
    }
}
