//! New Next.js project creation from the app template

use crate::error::{Error, Result};
use crate::templates::{clone_template, CloneManifest, PathTransformer};
use serde_json::{json, Value};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tokio::fs;

const NEXT_VERSION: &str = "14.1.4";
const STORYBOOK_VERSION: &str = "^8.0.5";

/// npm refuses package names longer than this
const MAX_NAME_LENGTH: usize = 214;

/// Package manager used for the generated scripts and next steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PackageManager {
    Npm,
    #[default]
    Pnpm,
    Yarn,
}

impl PackageManager {
    pub const ALL: [PackageManager; 3] = [PackageManager::Npm, PackageManager::Pnpm, PackageManager::Yarn];

    pub fn as_str(&self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Pnpm => "pnpm",
            PackageManager::Yarn => "yarn",
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PackageManager {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "npm" => Ok(PackageManager::Npm),
            "pnpm" => Ok(PackageManager::Pnpm),
            "yarn" => Ok(PackageManager::Yarn),
            other => Err(format!("unknown package manager '{}' (expected npm, pnpm or yarn)", other)),
        }
    }
}

fn url_safe(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '~' | '!' | '*' | '\'' | '(' | ')')
}

/// Check a project name against npm's rules for new packages.
///
/// Returns the trimmed name, or every rule it breaks joined into one message.
pub fn validate_project_name(raw: &str) -> std::result::Result<String, String> {
    let name = raw.trim();
    let mut problems = Vec::new();

    if name.is_empty() {
        return Err("name length must be greater than zero".to_string());
    }
    if name.len() > MAX_NAME_LENGTH {
        problems.push(format!("name can no longer contain more than {} characters", MAX_NAME_LENGTH));
    }
    if name.starts_with('.') {
        problems.push("name cannot start with a period".to_string());
    }
    if name.starts_with('_') {
        problems.push("name cannot start with an underscore".to_string());
    }
    if name.to_lowercase() != name {
        problems.push("name can no longer contain capital letters".to_string());
    }

    let bare = match name.strip_prefix('@') {
        Some(scoped) => match scoped.split_once('/') {
            Some((scope, package)) if !scope.is_empty() && !package.is_empty() => {
                if !scope.chars().all(url_safe) {
                    problems.push("scope can only contain URL-friendly characters".to_string());
                }
                package
            }
            _ => {
                problems.push("scoped name must look like @scope/name".to_string());
                ""
            }
        },
        None => name,
    };
    if !bare.chars().all(url_safe) {
        problems.push("name can only contain URL-friendly characters".to_string());
    }

    if problems.is_empty() {
        Ok(name.to_string())
    } else {
        Err(problems.join(", "))
    }
}

/// What `NewProject::create` produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectReport {
    pub root: PathBuf,
    /// Cloned template files, relative to `root`
    pub files: Vec<String>,
    pub dependencies: Vec<String>,
    pub dev_dependencies: Vec<String>,
}

/// A Next.js app with Storybook, ready to be written to disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProject {
    pub name: String,
    pub package_manager: PackageManager,
}

impl NewProject {
    pub fn new(name: impl Into<String>, package_manager: PackageManager) -> Self {
        Self {
            name: name.into(),
            package_manager,
        }
    }

    /// The generated `package.json` document
    pub fn package_json(&self) -> Value {
        let pm = self.package_manager.as_str();
        json!({
            "name": self.name,
            "version": "0.1.0",
            "private": true,
            "prettier": "@comradesharf/prettier-config",
            "scripts": {
                "dev": "next dev | npx pino-prettier",
                "build": "next build",
                "start": "next start",
                "lint": "next lint",
                "storybook": "storybook dev -p 6006",
                "build-storybook": "storybook build",
                "type-check": "tsc --noEmit --pretty",
                "test-storybook:ci": format!(
                    "npx concurrently -k -s first -n \"SB,TEST\" -c \"magenta,blue\" \"{pm} run build-storybook --test --quiet && npx http-server storybook-static --port 6006 --silent\" \"npx wait-on tcp:127.0.0.1:6006 && {pm} test-storybook --maxWorkers=3\""
                ),
                "prepare": "husky install",
            },
            "lint-staged": {
                "*.{js,jsx,ts,tsx}": "eslint --cache --fix",
                "*.{js,jsx,css,md,tsx,ts,mdx,json}": "prettier --write",
            },
            "dependencies": {
                "react": "^18",
                "react-dom": "^18",
                "next": NEXT_VERSION,
            },
            "devDependencies": {
                "@comradesharf/prettier-config": "^0.0.1",
                "@storybook/addon-essentials": STORYBOOK_VERSION,
                "@storybook/addon-interactions": STORYBOOK_VERSION,
                "@storybook/addon-links": STORYBOOK_VERSION,
                "@storybook/blocks": STORYBOOK_VERSION,
                "@storybook/nextjs": STORYBOOK_VERSION,
                "@storybook/react": STORYBOOK_VERSION,
                "@storybook/test": STORYBOOK_VERSION,
                "@types/node": "^20",
                "@types/react": "^18",
                "@types/react-dom": "^18",
                "eslint": "^8",
                "eslint-config-next": NEXT_VERSION,
                "eslint-plugin-storybook": "^0.8.0",
                "eslint-plugin-unused-imports": "^3.1.0",
                "husky": "^9.0.11",
                "lint-staged": "^15.2.2",
                "postcss": "^8",
                "prettier": "^3.2.5",
                "storybook": STORYBOOK_VERSION,
                "tailwindcss": "^3.4.1",
                "typescript": "^5",
                "vitest": "^1.4.0",
            },
        })
    }

    /// Clone the app template into `<parent>/<name>` and write `package.json`.
    ///
    /// Fails without touching the filesystem when the project directory exists.
    pub async fn create(
        &self,
        template_root: &Path,
        parent: &Path,
        concurrency: usize,
    ) -> Result<ProjectReport> {
        let root = parent.join(&self.name);
        if fs::try_exists(&root).await.unwrap_or(true) {
            return Err(Error::DestinationExists { path: root });
        }

        let manifest = CloneManifest::load(template_root).await?;
        let transformer = PathTransformer::new(manifest.rename_table());
        let files = clone_template(
            &manifest.patterns,
            template_root,
            &root,
            &transformer,
            concurrency,
        )
        .await?;

        let package = self.package_json();
        // serde_json::Value always serializes
        let mut text = serde_json::to_string_pretty(&package).unwrap_or_default();
        text.push('\n');
        let package_path = root.join("package.json");
        fs::write(&package_path, text).await.map_err(|source| Error::Write {
            path: package_path,
            source,
        })?;

        let public = root.join("public");
        fs::create_dir_all(&public).await.map_err(|source| Error::Write {
            path: public,
            source,
        })?;

        tracing::info!(project = %self.name, root = %root.display(), files = files.len(), "created project");

        Ok(ProjectReport {
            root,
            files,
            dependencies: dependency_names(&package, "dependencies"),
            dev_dependencies: dependency_names(&package, "devDependencies"),
        })
    }

    /// Commands to show once the project exists, as `(command, explanation)`
    pub fn next_steps(&self, project_root: &Path) -> Vec<(String, &'static str)> {
        let pm = self.package_manager;
        vec![
            (format!("{} run dev", pm), "Starts the development server."),
            (format!("{} run build", pm), "Builds the app for production."),
            (format!("{} run storybook", pm), "Open storybook."),
            (format!("{} start", pm), "Runs the built app in production mode."),
            (
                format!("cd {} && {} run dev", project_root.display(), pm),
                "We suggest that you begin by typing this.",
            ),
        ]
    }
}

fn dependency_names(package: &Value, section: &str) -> Vec<String> {
    package
        .get(section)
        .and_then(Value::as_object)
        .map(|deps| deps.keys().cloned().collect())
        .unwrap_or_default()
}
