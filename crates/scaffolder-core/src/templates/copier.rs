//! Structural template clone with path renaming

use super::manifest::MANIFEST_FILE;
use super::resolver::TemplateResolver;
use super::transform::PathTransformer;
use crate::error::{Error, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Default number of files copied at once
pub const DEFAULT_CLONE_CONCURRENCY: usize = 8;

/// Copy the files matched by `patterns` from `template_root` into
/// `destination_root`, renaming each path with `transformer`.
///
/// File bytes are copied unchanged. Copies run concurrently up to
/// `concurrency`; the returned destination-relative paths keep resolver order.
pub async fn clone_template<S: AsRef<str>>(
    patterns: &[S],
    template_root: &Path,
    destination_root: &Path,
    transformer: &PathTransformer,
    concurrency: usize,
) -> Result<Vec<String>> {
    let sources = TemplateResolver::new(template_root).resolve(patterns)?;

    let mut destinations = HashSet::new();
    let mut plan = Vec::with_capacity(sources.len());
    for source in sources {
        if source == MANIFEST_FILE {
            continue;
        }
        let destination = transformer.transform(&source);
        if !destinations.insert(destination.clone()) {
            return Err(Error::Resolution {
                root: template_root.to_path_buf(),
                reason: format!("more than one template file maps to '{}'", destination),
            });
        }
        plan.push((source, destination));
    }

    fs::create_dir_all(destination_root)
        .await
        .map_err(|e| write_error(destination_root, e))?;

    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut tasks = JoinSet::new();
    for (source, destination) in &plan {
        let from = template_root.join(source);
        let to = destination_root.join(destination);
        let semaphore = Arc::clone(&semaphore);
        tasks.spawn(async move {
            let _permit = semaphore.acquire_owned().await;
            copy_file(&from, &to).await
        });
    }

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(result) => result?,
            Err(e) => return Err(write_error(destination_root, std::io::Error::other(e))),
        }
    }

    tracing::info!(
        template = %template_root.display(),
        destination = %destination_root.display(),
        files = plan.len(),
        "cloned template"
    );

    Ok(plan.into_iter().map(|(_, destination)| destination).collect())
}

async fn copy_file(from: &Path, to: &Path) -> Result<()> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| write_error(parent, e))?;
    }
    fs::copy(from, to).await.map_err(|e| write_error(to, e))?;
    tracing::debug!(from = %from.display(), to = %to.display(), "copied template file");
    Ok(())
}

fn write_error(path: &Path, source: std::io::Error) -> Error {
    Error::Write {
        path: PathBuf::from(path),
        source,
    }
}
