//! Scaffolder Core - Shared library for generator-driven scaffolding
//!
//! This library provides the engine behind the `mindset` CLI: named generators
//! that turn prompt answers into file actions, plus bulk cloning of a project
//! template tree.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Core Operations** - Template resolution and rendering, path renaming,
//!   file actions and template cloning
//! - **Layer 2: Workflow Orchestration** - `GeneratorRegistry` and `NewProject` for custom UIs
//! - **Layer 3: CLI/TUI Interface** - Optional cliclack-based prompts (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based TUI prompts module
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use scaffolder_core::{Action, ActionExecutor, ActionPlanner, Answers, Generator, GeneratorRegistry};
//!
//! let mut registry = GeneratorRegistry::new();
//! registry.register(Generator::new(
//!     "component",
//!     "Create a new component",
//!     ActionPlanner::Fixed(vec![Action::add_file("{{ name }}.tsx", "component.hbs")]),
//! ))?;
//!
//! let executor = ActionExecutor::new("src/components").with_template_root("templates/mindset");
//! let answers = Answers::new().with("name", "Card");
//! let results = registry.invoke("component", &answers, &executor).await?;
//! ```

pub mod answers;
pub mod config;
pub mod error;
pub mod generator;
pub mod project;
pub mod render;
pub mod templates;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use answers::{AnswerValue, Answers, SelectedPath};
pub use config::Settings;
pub use error::{ActionKind, Error, Result};
pub use generator::{
    Action, ActionExecutor, ActionGroup, ActionPlanner, ActionResult, Anchor, Choice, Generator,
    GeneratorRegistry, Outcome, Prompt, Trigger,
};
pub use project::{validate_project_name, NewProject, PackageManager, ProjectReport};
pub use templates::{clone_template, CloneManifest, PathTransformer, RenameTable, TemplateResolver};

#[cfg(feature = "tui")]
pub use tui::{run_create, run_generate};
