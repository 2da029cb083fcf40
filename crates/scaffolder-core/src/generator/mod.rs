//! Prompt-driven generators: prompts, planning and file actions

mod action;
mod executor;
mod planner;
mod prompt;
mod registry;

pub use action::{Action, AddAction, Anchor, AppendAction, Content};
pub use executor::{ActionExecutor, ActionResult, Outcome, PreparedAction};
pub use planner::{ActionGroup, ActionPlanner, Trigger};
pub use prompt::{
    Choice, ConfirmPrompt, MultiSelectPrompt, PathSelectPrompt, Prompt, SelectPrompt, TextPrompt,
    Validator,
};
pub use registry::{Generator, GeneratorRegistry};
