//! CLI prompts using cliclack (Charm-style inline prompts)
//!
//! This module is optional and only available when the `tui` feature is enabled.

#[cfg(feature = "tui")]
mod create;
#[cfg(feature = "tui")]
mod generate;
#[cfg(feature = "tui")]
mod prompts;

#[cfg(feature = "tui")]
pub use create::{run_create, CreateArgs};
#[cfg(feature = "tui")]
pub use generate::{outcome_label, run_generate};
#[cfg(feature = "tui")]
pub use prompts::collect_answers;
