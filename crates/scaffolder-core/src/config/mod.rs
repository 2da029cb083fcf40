//! Runtime settings for the CLI surfaces

pub mod settings;

pub use settings::{Settings, CLONE_CONCURRENCY_ENV, TEMPLATE_DIR_ENV};
