//! Glob resolution against a template root

use crate::error::{Error, Result};
use globset::{GlobBuilder, GlobMatcher};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A compiled glob pattern
struct CompiledPattern {
    matcher: GlobMatcher,
    /// Whether the pattern names a dot-prefixed segment itself (e.g. `.env*`)
    matches_dotfiles: bool,
}

impl CompiledPattern {
    fn new(root: &Path, pattern: &str) -> Result<Self> {
        let glob = GlobBuilder::new(pattern)
            .literal_separator(true)
            .build()
            .map_err(|e| Error::Resolution {
                root: root.to_path_buf(),
                reason: format!("invalid pattern '{}': {}", pattern, e),
            })?;

        Ok(Self {
            matcher: glob.compile_matcher(),
            matches_dotfiles: pattern.split('/').any(|segment| segment.starts_with('.')),
        })
    }

    fn is_match(&self, relative: &str) -> bool {
        if !self.matches_dotfiles && is_hidden(relative) {
            return false;
        }
        self.matcher.is_match(relative)
    }
}

fn is_hidden(relative: &str) -> bool {
    relative.split('/').any(|segment| segment.starts_with('.'))
}

/// Resolves glob patterns to template files
#[derive(Debug, Clone)]
pub struct TemplateResolver {
    root: PathBuf,
}

impl TemplateResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve patterns to `/`-separated file paths relative to the root.
    ///
    /// Patterns are applied in order; matches of one pattern are sorted
    /// lexicographically and a path already produced by an earlier pattern
    /// is not repeated. No match is an empty result, not an error.
    pub fn resolve<S: AsRef<str>>(&self, patterns: &[S]) -> Result<Vec<String>> {
        if !self.root.is_dir() {
            return Err(Error::Resolution {
                root: self.root.clone(),
                reason: "template root does not exist".to_string(),
            });
        }

        let compiled = patterns
            .iter()
            .map(|p| CompiledPattern::new(&self.root, p.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        let files = self.list_files()?;

        let mut seen = HashSet::new();
        let mut resolved = Vec::new();
        for pattern in &compiled {
            let mut matches: Vec<&String> = files.iter().filter(|f| pattern.is_match(f)).collect();
            matches.sort();
            for file in matches {
                if seen.insert(file.as_str()) {
                    resolved.push(file.clone());
                }
            }
        }

        tracing::debug!(
            root = %self.root.display(),
            patterns = patterns.len(),
            matched = resolved.len(),
            "resolved template patterns"
        );

        Ok(resolved)
    }

    fn list_files(&self) -> Result<Vec<String>> {
        let mut files = Vec::new();
        for entry in WalkDir::new(&self.root).sort_by_file_name() {
            let entry = entry.map_err(|e| Error::Resolution {
                root: self.root.clone(),
                reason: e.to_string(),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }

            let relative = entry
                .path()
                .strip_prefix(&self.root)
                .unwrap_or(entry.path())
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            files.push(relative);
        }
        Ok(files)
    }
}

/// Convenience wrapper around [`TemplateResolver::resolve`]
pub fn resolve<S: AsRef<str>>(patterns: &[S], root: &Path) -> Result<Vec<String>> {
    TemplateResolver::new(root).resolve(patterns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn tree(files: &[&str]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for file in files {
            let path = dir.path().join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, file).unwrap();
        }
        dir
    }

    #[test]
    fn test_double_star_lists_every_file_sorted() {
        let dir = tree(&["b.txt", "a/z.ts", "a/b/c.ts", "gitignore"]);
        let files = resolve(&["**"], dir.path()).unwrap();
        assert_eq!(files, vec!["a/b/c.ts", "a/z.ts", "b.txt", "gitignore"]);
    }

    #[test]
    fn test_star_does_not_cross_directories() {
        let dir = tree(&["top.ts", "nested/inner.ts"]);
        assert_eq!(resolve(&["*.ts"], dir.path()).unwrap(), vec!["top.ts"]);
        assert_eq!(
            resolve(&["**/*.ts"], dir.path()).unwrap(),
            vec!["nested/inner.ts", "top.ts"]
        );
    }

    #[test]
    fn test_alternation_and_pattern_order_with_dedup() {
        let dir = tree(&["src/page.tsx", "src/page.stories.tsx", "src/util.ts", "README.md"]);
        let files = resolve(&["README.md", "src/*.{ts,tsx}", "**"], dir.path()).unwrap();
        assert_eq!(
            files,
            vec![
                "README.md",
                "src/page.stories.tsx",
                "src/page.tsx",
                "src/util.ts",
            ]
        );
    }

    #[test]
    fn test_dotfiles_need_an_explicit_pattern() {
        let dir = tree(&["visible.ts", ".env", ".git/config"]);
        assert_eq!(resolve(&["**"], dir.path()).unwrap(), vec!["visible.ts"]);
        assert_eq!(resolve(&[".env*"], dir.path()).unwrap(), vec![".env"]);
    }

    #[test]
    fn test_no_match_is_empty() {
        let dir = tree(&["a.ts"]);
        assert!(resolve(&["*.rs"], dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_missing_root_is_resolution_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let err = resolve(&["**"], &missing).unwrap_err();
        assert!(matches!(err, Error::Resolution { .. }));
    }

    #[test]
    fn test_invalid_pattern_is_resolution_error() {
        let dir = tree(&["a.ts"]);
        let err = resolve(&["src/{a,b"], dir.path()).unwrap_err();
        assert!(matches!(err, Error::Resolution { .. }));
    }
}
