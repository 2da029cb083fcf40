//! Template resolution, renaming and cloning
//!
//! This module provides:
//! - Glob resolution against a template root (TemplateResolver)
//! - Alias-to-dotfile renaming (PathTransformer, RenameTable)
//! - The per-template manifest (CloneManifest)
//! - Bulk cloning of a template tree with bounded concurrency

pub mod copier;
pub mod manifest;
pub mod resolver;
pub mod transform;

pub use copier::{clone_template, DEFAULT_CLONE_CONCURRENCY};
pub use manifest::{CloneManifest, RenameOverrides, MANIFEST_FILE};
pub use resolver::{resolve, TemplateResolver};
pub use transform::{PathTransformer, RenameTable};
