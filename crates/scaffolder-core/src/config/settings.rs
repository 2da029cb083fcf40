//! Settings resolved from CLI flags, environment and defaults

use crate::generator::ActionExecutor;
use crate::templates::DEFAULT_CLONE_CONCURRENCY;
use std::path::{Path, PathBuf};

/// Environment variable overriding the template root
pub const TEMPLATE_DIR_ENV: &str = "MINDSET_TEMPLATE_DIR";

/// Environment variable overriding the clone concurrency
pub const CLONE_CONCURRENCY_ENV: &str = "MINDSET_CLONE_CONCURRENCY";

/// Where templates come from, where output goes, and how wide clones fan out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub template_root: PathBuf,
    pub destination_root: PathBuf,
    pub clone_concurrency: usize,
}

impl Settings {
    /// Resolve settings from the process environment.
    ///
    /// An explicit flag wins over the environment, which wins over the default.
    pub fn resolve(
        template_dir_flag: Option<PathBuf>,
        destination_root: PathBuf,
        default_template_root: &Path,
    ) -> Self {
        Self::from_sources(
            template_dir_flag,
            destination_root,
            default_template_root,
            |key| std::env::var(key).ok(),
        )
    }

    /// Same as [`Settings::resolve`] with an injectable environment lookup
    pub fn from_sources(
        template_dir_flag: Option<PathBuf>,
        destination_root: PathBuf,
        default_template_root: &Path,
        env: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let template_root = template_dir_flag
            .or_else(|| {
                env(TEMPLATE_DIR_ENV)
                    .filter(|v| !v.trim().is_empty())
                    .map(PathBuf::from)
            })
            .unwrap_or_else(|| default_template_root.to_path_buf());

        // Unparsable or zero values are ignored
        let clone_concurrency = env(CLONE_CONCURRENCY_ENV)
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_CLONE_CONCURRENCY);

        tracing::debug!(
            template_root = %template_root.display(),
            destination_root = %destination_root.display(),
            clone_concurrency,
            "resolved settings"
        );

        Self {
            template_root,
            destination_root,
            clone_concurrency,
        }
    }

    /// Executor writing into the destination root, reading templates from
    /// `subdir` of the template root
    pub fn executor(&self, subdir: &str) -> ActionExecutor {
        ActionExecutor::new(&self.destination_root).with_template_root(self.template_root.join(subdir))
    }
}
