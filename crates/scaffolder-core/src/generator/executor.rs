//! Executing actions against a destination root

use super::action::{Action, Anchor, Content};
use crate::answers::Answers;
use crate::error::{ActionKind, Error, Result};
use crate::render::render;
use std::fmt;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

/// What an action did to its destination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Created,
    Overwritten,
    /// Add found an existing file and left it alone
    Skipped,
    Appended,
    /// Unique append found its content already present
    NoopDuplicate,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Outcome::Created => "created",
            Outcome::Overwritten => "overwritten",
            Outcome::Skipped => "skipped",
            Outcome::Appended => "appended",
            Outcome::NoopDuplicate => "unchanged",
        };
        f.write_str(label)
    }
}

/// Per-action report for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResult {
    /// Rendered path relative to the destination root
    pub path: String,
    pub kind: ActionKind,
    pub outcome: Outcome,
}

#[derive(Debug, Clone)]
enum Operation {
    Add { skip_if_exists: bool },
    Append { unique: bool, anchor: Anchor },
}

/// An action with its path and content rendered and its target validated
#[derive(Debug, Clone)]
pub struct PreparedAction {
    relative: String,
    target: PathBuf,
    content: String,
    operation: Operation,
}

impl PreparedAction {
    pub fn relative_path(&self) -> &str {
        &self.relative
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn kind(&self) -> ActionKind {
        match self.operation {
            Operation::Add { .. } => ActionKind::Add,
            Operation::Append { .. } => ActionKind::Append,
        }
    }
}

/// Applies actions to files under one destination root
#[derive(Debug, Clone)]
pub struct ActionExecutor {
    destination_root: PathBuf,
    template_root: Option<PathBuf>,
}

impl ActionExecutor {
    pub fn new(destination_root: impl Into<PathBuf>) -> Self {
        Self {
            destination_root: destination_root.into(),
            template_root: None,
        }
    }

    /// Directory that `Content::File` references are read from
    pub fn with_template_root(mut self, template_root: impl Into<PathBuf>) -> Self {
        self.template_root = Some(template_root.into());
        self
    }

    pub fn destination_root(&self) -> &Path {
        &self.destination_root
    }

    /// Render and validate an action without touching the destination
    pub async fn prepare(&self, action: &Action, answers: &Answers) -> Result<PreparedAction> {
        let (path_template, content, operation) = match action {
            Action::Add(add) => {
                let template = match &add.content {
                    Content::Inline(template) => template.clone(),
                    Content::File(file) => self.read_template_file(file).await?,
                };
                let operation = Operation::Add {
                    skip_if_exists: add.skip_if_exists,
                };
                (&add.path, template, operation)
            }
            Action::Append(append) => {
                let operation = Operation::Append {
                    unique: append.unique,
                    anchor: append.anchor.clone(),
                };
                (&append.path, append.template.clone(), operation)
            }
        };

        let rendered_path = render(path_template, answers)?;
        let content = render(&content, answers)?;
        let (relative, target) = resolve_inside(&self.destination_root, &rendered_path)?;
        ensure_inside_on_disk(&self.destination_root, &target, &rendered_path).await?;
        if content.is_empty() && matches!(operation, Operation::Append { .. }) {
            return Err(Error::EmptyAppend { path: relative });
        }
        tracing::debug!(path = %relative, kind = %action.kind(), "prepared action");

        Ok(PreparedAction {
            relative,
            target,
            content,
            operation,
        })
    }

    /// Perform a prepared action on the filesystem
    pub async fn apply(&self, prepared: &PreparedAction) -> Result<ActionResult> {
        let outcome = match &prepared.operation {
            Operation::Add { skip_if_exists } => self.apply_add(prepared, *skip_if_exists).await?,
            Operation::Append { unique, anchor } => {
                self.apply_append(prepared, *unique, anchor).await?
            }
        };

        tracing::debug!(
            path = %prepared.relative,
            kind = %prepared.kind(),
            outcome = %outcome,
            "applied action"
        );

        Ok(ActionResult {
            path: prepared.relative.clone(),
            kind: prepared.kind(),
            outcome,
        })
    }

    /// Prepare and apply one action
    pub async fn execute(&self, action: &Action, answers: &Answers) -> Result<ActionResult> {
        let prepared = self.prepare(action, answers).await?;
        self.apply(&prepared).await
    }

    async fn read_template_file(&self, file: &Path) -> Result<String> {
        let Some(root) = &self.template_root else {
            return Err(Error::TemplateNotFound {
                path: file.to_path_buf(),
                source: std::io::Error::new(ErrorKind::NotFound, "no template root configured"),
            });
        };
        let path = root.join(file);
        fs::read_to_string(&path)
            .await
            .map_err(|source| Error::TemplateNotFound { path, source })
    }

    async fn apply_add(&self, prepared: &PreparedAction, skip_if_exists: bool) -> Result<Outcome> {
        let target = &prepared.target;
        let exists = fs::try_exists(target)
            .await
            .map_err(|e| write_error(target, e))?;

        if exists && skip_if_exists {
            return Ok(Outcome::Skipped);
        }

        create_parent(target).await?;
        fs::write(target, prepared.content.as_bytes())
            .await
            .map_err(|e| write_error(target, e))?;

        Ok(if exists {
            Outcome::Overwritten
        } else {
            Outcome::Created
        })
    }

    async fn apply_append(
        &self,
        prepared: &PreparedAction,
        unique: bool,
        anchor: &Anchor,
    ) -> Result<Outcome> {
        let target = &prepared.target;
        let existing = match fs::read_to_string(target).await {
            Ok(existing) => existing,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                create_parent(target).await?;
                fs::write(target, b"")
                    .await
                    .map_err(|e| write_error(target, e))?;
                String::new()
            }
            Err(e) => return Err(write_error(target, e)),
        };

        if unique && existing.contains(prepared.content.as_str()) {
            return Ok(Outcome::NoopDuplicate);
        }

        let at = anchor.find(&existing).ok_or_else(|| Error::AnchorNotFound {
            path: PathBuf::from(&prepared.relative),
            anchor: anchor.as_str().to_string(),
        })?;
        let updated = insert_before_line(&existing, at, &prepared.content);

        fs::write(target, updated.as_bytes())
            .await
            .map_err(|e| write_error(target, e))?;

        Ok(Outcome::Appended)
    }
}

/// Insert `content` as its own line(s) at the start of the line containing `at`
fn insert_before_line(existing: &str, at: usize, content: &str) -> String {
    let line_start = existing[..at].rfind('\n').map_or(0, |i| i + 1);
    let separator = if existing.contains("\r\n") { "\r\n" } else { "\n" };

    let mut updated = String::with_capacity(existing.len() + content.len() + separator.len());
    updated.push_str(&existing[..line_start]);
    updated.push_str(content);
    if !content.ends_with('\n') {
        updated.push_str(separator);
    }
    updated.push_str(&existing[line_start..]);
    updated
}

/// Lexically resolve `rendered` under `root`, rejecting anything that leaves it
fn resolve_inside(root: &Path, rendered: &str) -> Result<(String, PathBuf)> {
    let escape = || Error::PathEscape {
        path: rendered.to_string(),
    };

    let mut parts = Vec::new();
    for component in Path::new(rendered).components() {
        match component {
            Component::Normal(part) => parts.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                parts.pop().ok_or_else(escape)?;
            }
            Component::RootDir | Component::Prefix(_) => return Err(escape()),
        }
    }
    if parts.is_empty() {
        return Err(escape());
    }

    let relative = parts
        .iter()
        .map(|p| p.to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    let target = parts.iter().fold(root.to_path_buf(), |acc, p| acc.join(p));
    Ok((relative, target))
}

/// Reject targets that symlinks inside the destination redirect outside it.
///
/// The deepest existing ancestor of `target` (or `target` itself) must
/// canonicalize to a location under the canonical root. A root that does not
/// exist yet cannot contain links, so the lexical check is enough there.
async fn ensure_inside_on_disk(root: &Path, target: &Path, rendered: &str) -> Result<()> {
    let Ok(real_root) = fs::canonicalize(root).await else {
        return Ok(());
    };

    for ancestor in target.ancestors() {
        if !ancestor.starts_with(root) {
            break;
        }
        if fs::symlink_metadata(ancestor).await.is_err() {
            continue;
        }
        // A dangling link fails to canonicalize and is treated as escaping
        let inside = fs::canonicalize(ancestor)
            .await
            .is_ok_and(|real| real.starts_with(&real_root));
        if inside {
            return Ok(());
        }
        return Err(Error::PathEscape {
            path: rendered.to_string(),
        });
    }
    Ok(())
}

async fn create_parent(target: &Path) -> Result<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| write_error(parent, e))?;
    }
    Ok(())
}

fn write_error(path: &Path, source: std::io::Error) -> Error {
    Error::Write {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as stdfs;

    const MODELS: &str = "import { getModelForClass } from '@typegoose/typegoose';\n\
                          // Append import here\n\
                          \n\
                          // Append model here\n";

    fn answers() -> Answers {
        Answers::new().with("name", "User").with("extension", "ts")
    }

    #[tokio::test]
    async fn test_add_creates_then_skips() {
        let dest = tempfile::tempdir().unwrap();
        let executor = ActionExecutor::new(dest.path());
        let action = Action::add_inline("src/{{ name }}.ts", "export class {{ name }} {}\n");

        let first = executor.execute(&action, &answers()).await.unwrap();
        assert_eq!(first.outcome, Outcome::Created);
        assert_eq!(first.path, "src/User.ts");
        assert_eq!(
            stdfs::read_to_string(dest.path().join("src/User.ts")).unwrap(),
            "export class User {}\n"
        );

        stdfs::write(dest.path().join("src/User.ts"), "edited").unwrap();
        let second = executor.execute(&action, &answers()).await.unwrap();
        assert_eq!(second.outcome, Outcome::Skipped);
        assert_eq!(stdfs::read_to_string(dest.path().join("src/User.ts")).unwrap(), "edited");
    }

    #[tokio::test]
    async fn test_add_without_skip_overwrites() {
        let dest = tempfile::tempdir().unwrap();
        stdfs::write(dest.path().join("User.ts"), "old").unwrap();
        let executor = ActionExecutor::new(dest.path());

        let action = Action::add_inline("{{ name }}.ts", "new").overwrite();
        let result = executor.execute(&action, &answers()).await.unwrap();

        assert_eq!(result.outcome, Outcome::Overwritten);
        assert_eq!(stdfs::read_to_string(dest.path().join("User.ts")).unwrap(), "new");
    }

    #[tokio::test]
    async fn test_add_reads_template_file() {
        let templates = tempfile::tempdir().unwrap();
        stdfs::write(templates.path().join("model.hbs"), "export class {{ pascalCase name }} {}\n")
            .unwrap();
        let dest = tempfile::tempdir().unwrap();
        let executor = ActionExecutor::new(dest.path()).with_template_root(templates.path());

        let action = Action::add_file("{{ name }}.{{ extension }}", "model.hbs");
        executor.execute(&action, &answers()).await.unwrap();
        assert_eq!(
            stdfs::read_to_string(dest.path().join("User.ts")).unwrap(),
            "export class User {}\n"
        );

        let missing = Action::add_file("x.ts", "nope.hbs");
        let err = executor.execute(&missing, &answers()).await.unwrap_err();
        assert!(matches!(err, Error::TemplateNotFound { .. }));
    }

    #[tokio::test]
    async fn test_append_inserts_before_anchor_lines_in_order() {
        let dest = tempfile::tempdir().unwrap();
        stdfs::write(dest.path().join("models.ts"), MODELS).unwrap();
        let executor = ActionExecutor::new(dest.path());

        let model = Action::append(
            "models.ts",
            "export const {{name}}Model = getModelForClass({{name}});",
            "// Append model here",
        );
        let import = Action::append(
            "models.ts",
            "import { {{name}} } from '#app/_models/{{name}}.{{ extension }}';",
            "// Append import here",
        );

        for action in [&model, &import] {
            let result = executor.execute(action, &answers()).await.unwrap();
            assert_eq!(result.outcome, Outcome::Appended);
        }

        let updated = stdfs::read_to_string(dest.path().join("models.ts")).unwrap();
        assert_eq!(
            updated,
            "import { getModelForClass } from '@typegoose/typegoose';\n\
             import { User } from '#app/_models/User.ts';\n\
             // Append import here\n\
             \n\
             export const UserModel = getModelForClass(User);\n\
             // Append model here\n"
        );
    }

    #[tokio::test]
    async fn test_unique_append_is_idempotent() {
        let dest = tempfile::tempdir().unwrap();
        stdfs::write(dest.path().join("models.ts"), MODELS).unwrap();
        let executor = ActionExecutor::new(dest.path());
        let action = Action::append(
            "models.ts",
            "export const {{name}}Model = getModelForClass({{name}});",
            "// Append model here",
        );

        executor.execute(&action, &answers()).await.unwrap();
        let second = executor.execute(&action, &answers()).await.unwrap();
        assert_eq!(second.outcome, Outcome::NoopDuplicate);

        let updated = stdfs::read_to_string(dest.path().join("models.ts")).unwrap();
        assert_eq!(updated.matches("export const UserModel").count(), 1);
    }

    #[tokio::test]
    async fn test_repeatable_append_inserts_again() {
        let dest = tempfile::tempdir().unwrap();
        stdfs::write(dest.path().join("log.md"), "<!-- next -->\n").unwrap();
        let executor = ActionExecutor::new(dest.path());
        let action = Action::append("log.md", "- {{ name }}", "<!-- next -->").repeatable();

        executor.execute(&action, &answers()).await.unwrap();
        executor.execute(&action, &answers()).await.unwrap();

        assert_eq!(
            stdfs::read_to_string(dest.path().join("log.md")).unwrap(),
            "- User\n- User\n<!-- next -->\n"
        );
    }

    #[tokio::test]
    async fn test_missing_anchor_fails_without_writing() {
        let dest = tempfile::tempdir().unwrap();
        stdfs::write(dest.path().join("models.ts"), "export {};\n").unwrap();
        let executor = ActionExecutor::new(dest.path());
        let action = Action::append("models.ts", "line", "// Append model here");

        let err = executor.execute(&action, &answers()).await.unwrap_err();
        assert!(matches!(err, Error::AnchorNotFound { ref anchor, .. } if anchor == "// Append model here"));
        assert_eq!(
            stdfs::read_to_string(dest.path().join("models.ts")).unwrap(),
            "export {};\n"
        );
    }

    #[tokio::test]
    async fn test_append_to_absent_file_creates_it_then_needs_anchor() {
        let dest = tempfile::tempdir().unwrap();
        let executor = ActionExecutor::new(dest.path());
        let action = Action::append("nested/models.ts", "line", "// Append model here");

        let err = executor.execute(&action, &answers()).await.unwrap_err();
        assert!(matches!(err, Error::AnchorNotFound { .. }));
        assert_eq!(stdfs::read_to_string(dest.path().join("nested/models.ts")).unwrap(), "");
    }

    #[tokio::test]
    async fn test_regex_anchor_and_crlf() {
        let dest = tempfile::tempdir().unwrap();
        stdfs::write(dest.path().join("index.ts"), "a;\r\n//   exports  \r\n").unwrap();
        let executor = ActionExecutor::new(dest.path());
        let action = Action::append(
            "index.ts",
            "export * from './{{ name }}';",
            Anchor::pattern(r"//\s*exports").unwrap(),
        );

        executor.execute(&action, &answers()).await.unwrap();
        assert_eq!(
            stdfs::read_to_string(dest.path().join("index.ts")).unwrap(),
            "a;\r\nexport * from './User';\r\n//   exports  \r\n"
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlinked_directory_cannot_redirect_writes() {
        let outside = tempfile::tempdir().unwrap();
        let project = tempfile::tempdir().unwrap();
        stdfs::create_dir_all(project.path().join("src")).unwrap();
        std::os::unix::fs::symlink(outside.path(), project.path().join("src/shared")).unwrap();
        let executor = ActionExecutor::new(project.path());

        let add = Action::add_inline("src/shared/{{ name }}.ts", "export {};");
        let err = executor.execute(&add, &answers()).await.unwrap_err();
        assert!(matches!(err, Error::PathEscape { ref path } if path == "src/shared/User.ts"));

        stdfs::write(outside.path().join("models.ts"), MODELS).unwrap();
        let append = Action::append("src/shared/models.ts", "x;", "// Append model here");
        let err = executor.execute(&append, &answers()).await.unwrap_err();
        assert!(matches!(err, Error::PathEscape { .. }));

        assert_eq!(stdfs::read_dir(outside.path()).unwrap().count(), 1);
        assert_eq!(stdfs::read_to_string(outside.path().join("models.ts")).unwrap(), MODELS);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlink_inside_root_is_allowed() {
        let project = tempfile::tempdir().unwrap();
        stdfs::create_dir_all(project.path().join("src/real")).unwrap();
        std::os::unix::fs::symlink(project.path().join("src/real"), project.path().join("src/alias")).unwrap();

        let result = ActionExecutor::new(project.path())
            .execute(&Action::add_inline("src/alias/{{ name }}.ts", "x"), &answers())
            .await
            .unwrap();
        assert_eq!(result.outcome, Outcome::Created);
        assert!(project.path().join("src/real/User.ts").exists());
    }

    #[tokio::test]
    async fn test_empty_append_content_is_rejected() {
        let dest = tempfile::tempdir().unwrap();
        let executor = ActionExecutor::new(dest.path());

        let action = Action::append("models.ts", "{{ blank }}", "// Append model here");
        let answers = Answers::new().with("blank", "");
        let err = executor.execute(&action, &answers).await.unwrap_err();

        assert!(matches!(err, Error::EmptyAppend { ref path } if path == "models.ts"));
        assert!(!dest.path().join("models.ts").exists());
    }

    #[tokio::test]
    async fn test_path_escape_is_rejected() {
        let parent = tempfile::tempdir().unwrap();
        let root = parent.path().join("project");
        stdfs::create_dir_all(&root).unwrap();
        let executor = ActionExecutor::new(&root);
        let traversal = Answers::new().with("name", "../../etc/passwd");

        let action = Action::add_inline("src/{{ name }}", "x");
        let err = executor.execute(&action, &traversal).await.unwrap_err();
        assert!(matches!(err, Error::PathEscape { .. }));

        let sibling = Action::add_inline("../outside.ts", "x");
        let err = executor.execute(&sibling, &answers()).await.unwrap_err();
        assert!(matches!(err, Error::PathEscape { .. }));
        assert!(!parent.path().join("outside.ts").exists());

        let absolute = Action::add_inline("/tmp/{{ name }}.ts", "x");
        assert!(matches!(
            executor.execute(&absolute, &answers()).await.unwrap_err(),
            Error::PathEscape { .. }
        ));

        assert_eq!(stdfs::read_dir(&root).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_inner_traversal_stays_inside() {
        let dest = tempfile::tempdir().unwrap();
        let executor = ActionExecutor::new(dest.path());
        let action = Action::add_inline("src/./app/../lib/{{ name }}.ts", "x");

        let result = executor.execute(&action, &answers()).await.unwrap();
        assert_eq!(result.path, "src/lib/User.ts");
        assert!(dest.path().join("src/lib/User.ts").exists());
    }

    #[tokio::test]
    async fn test_missing_variable_is_template_error() {
        let dest = tempfile::tempdir().unwrap();
        let executor = ActionExecutor::new(dest.path());
        let action = Action::add_inline("{{ name }}.ts", "{{ title }}");

        let err = executor.execute(&action, &answers()).await.unwrap_err();
        assert!(matches!(err, Error::Template { ref key } if key == "title"));
        assert!(!dest.path().join("User.ts").exists());
    }
}
