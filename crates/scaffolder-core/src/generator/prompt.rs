//! Declarative prompt descriptors
//!
//! Prompts are data: the front end decides how to render them and calls
//! the `answer*` methods to validate and normalize what the user entered.

use crate::answers::{AnswerValue, SelectedPath};
use regex::Regex;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use walkdir::WalkDir;

/// A pure check returning a human-readable rejection reason
pub struct Validator<T: ?Sized>(Arc<dyn Fn(&T) -> Result<(), String> + Send + Sync>);

impl<T: ?Sized> Validator<T> {
    pub fn new(check: impl Fn(&T) -> Result<(), String> + Send + Sync + 'static) -> Self {
        Self(Arc::new(check))
    }

    pub fn check(&self, value: &T) -> Result<(), String> {
        (self.0)(value)
    }
}

impl<T: ?Sized> Clone for Validator<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T: ?Sized> fmt::Debug for Validator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Validator(..)")
    }
}

/// One option of a single- or multi-choice prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub label: String,
    pub value: String,
    /// Pre-selected in multi-choice prompts
    pub checked: bool,
}

impl Choice {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            checked: false,
        }
    }

    pub fn checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }
}

/// Free-text question
#[derive(Debug, Clone)]
pub struct TextPrompt {
    pub name: String,
    pub message: String,
    pub default: Option<String>,
    pub validator: Option<Validator<str>>,
}

impl TextPrompt {
    pub fn default_value(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn validate(mut self, check: impl Fn(&str) -> Result<(), String> + Send + Sync + 'static) -> Self {
        self.validator = Some(Validator::new(check));
        self
    }

    /// Apply the default to empty input, then validate
    pub fn answer(&self, raw: &str) -> Result<AnswerValue, String> {
        let value = match (&self.default, raw.is_empty()) {
            (Some(default), true) => default.as_str(),
            _ => raw,
        };
        if let Some(validator) = &self.validator {
            validator.check(value)?;
        }
        Ok(AnswerValue::Text(value.to_string()))
    }
}

/// Single-choice question
#[derive(Debug, Clone)]
pub struct SelectPrompt {
    pub name: String,
    pub message: String,
    pub choices: Vec<Choice>,
    pub default: Option<String>,
}

impl SelectPrompt {
    pub fn default_value(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn answer(&self, value: &str) -> Result<AnswerValue, String> {
        if self.choices.iter().any(|c| c.value == value) {
            Ok(AnswerValue::Text(value.to_string()))
        } else {
            Err(format!("'{}' is not one of the available choices", value))
        }
    }
}

/// Multi-choice question
#[derive(Debug, Clone)]
pub struct MultiSelectPrompt {
    pub name: String,
    pub message: String,
    pub choices: Vec<Choice>,
    pub validator: Option<Validator<[String]>>,
}

impl MultiSelectPrompt {
    pub fn validate(
        mut self,
        check: impl Fn(&[String]) -> Result<(), String> + Send + Sync + 'static,
    ) -> Self {
        self.validator = Some(Validator::new(check));
        self
    }

    /// Values pre-selected by the prompt definition
    pub fn initial_values(&self) -> Vec<String> {
        self.choices
            .iter()
            .filter(|c| c.checked)
            .map(|c| c.value.clone())
            .collect()
    }

    /// Validate a selection and normalize it to declared choice order
    pub fn answer(&self, selected: &[String]) -> Result<AnswerValue, String> {
        if let Some(unknown) = selected
            .iter()
            .find(|v| !self.choices.iter().any(|c| &c.value == *v))
        {
            return Err(format!("'{}' is not one of the available choices", unknown));
        }

        let ordered: Vec<String> = self
            .choices
            .iter()
            .filter(|c| selected.contains(&c.value))
            .map(|c| c.value.clone())
            .collect();

        if let Some(validator) = &self.validator {
            validator.check(&ordered)?;
        }
        Ok(AnswerValue::List(ordered))
    }
}

/// Yes/no question
#[derive(Debug, Clone)]
pub struct ConfirmPrompt {
    pub name: String,
    pub message: String,
    pub default: bool,
}

impl ConfirmPrompt {
    pub fn default_value(mut self, default: bool) -> Self {
        self.default = default;
        self
    }

    pub fn answer(&self, value: Option<bool>) -> AnswerValue {
        AnswerValue::Bool(value.unwrap_or(self.default))
    }
}

/// Directory question with suggestions from the project tree
#[derive(Debug, Clone)]
pub struct PathSelectPrompt {
    pub name: String,
    pub message: String,
    /// Directory (relative to the project root) that suggestions come from
    pub root: String,
    /// Suggestions matching this are hidden along with everything below them
    pub exclude_path: Option<Regex>,
    /// Suggestions containing any of these are hidden, their children are not
    pub exclude_substrings: Vec<String>,
    pub validator: Option<Validator<str>>,
}

impl PathSelectPrompt {
    pub fn exclude_path(mut self, pattern: Regex) -> Self {
        self.exclude_path = Some(pattern);
        self
    }

    pub fn exclude_containing(mut self, needle: impl Into<String>) -> Self {
        self.exclude_substrings.push(needle.into());
        self
    }

    pub fn validate(mut self, check: impl Fn(&str) -> Result<(), String> + Send + Sync + 'static) -> Self {
        self.validator = Some(Validator::new(check));
        self
    }

    /// Validate, then derive the original and aliased forms of the path
    pub fn answer(&self, raw: &str) -> Result<AnswerValue, String> {
        if let Some(validator) = &self.validator {
            validator.check(raw)?;
        }
        let trimmed = raw.trim().trim_end_matches('/');
        Ok(AnswerValue::Path(SelectedPath::from_original(trimmed)))
    }

    /// Candidate directories below `root`, relative to `project_root`, sorted
    pub fn suggestions(&self, project_root: &Path) -> Vec<String> {
        let start = project_root.join(&self.root);
        let relative = |path: &Path| {
            path.strip_prefix(project_root)
                .unwrap_or(path)
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/")
        };

        let mut found: Vec<String> = WalkDir::new(&start)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                let rel = relative(entry.path());
                !self
                    .exclude_path
                    .as_ref()
                    .is_some_and(|pattern| pattern.is_match(&rel))
            })
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_dir())
            .map(|entry| relative(entry.path()))
            .filter(|rel| !self.exclude_substrings.iter().any(|s| rel.contains(s.as_str())))
            .collect();

        found.sort();
        found
    }
}

/// A typed question descriptor
#[derive(Debug, Clone)]
pub enum Prompt {
    Text(TextPrompt),
    Select(SelectPrompt),
    MultiSelect(MultiSelectPrompt),
    Confirm(ConfirmPrompt),
    PathSelect(PathSelectPrompt),
}

impl Prompt {
    pub fn text(name: impl Into<String>, message: impl Into<String>) -> TextPrompt {
        TextPrompt {
            name: name.into(),
            message: message.into(),
            default: None,
            validator: None,
        }
    }

    pub fn select(
        name: impl Into<String>,
        message: impl Into<String>,
        choices: Vec<Choice>,
    ) -> SelectPrompt {
        SelectPrompt {
            name: name.into(),
            message: message.into(),
            choices,
            default: None,
        }
    }

    pub fn multi_select(
        name: impl Into<String>,
        message: impl Into<String>,
        choices: Vec<Choice>,
    ) -> MultiSelectPrompt {
        MultiSelectPrompt {
            name: name.into(),
            message: message.into(),
            choices,
            validator: None,
        }
    }

    pub fn confirm(name: impl Into<String>, message: impl Into<String>) -> ConfirmPrompt {
        ConfirmPrompt {
            name: name.into(),
            message: message.into(),
            default: false,
        }
    }

    pub fn path_select(
        name: impl Into<String>,
        message: impl Into<String>,
        root: impl Into<String>,
    ) -> PathSelectPrompt {
        PathSelectPrompt {
            name: name.into(),
            message: message.into(),
            root: root.into(),
            exclude_path: None,
            exclude_substrings: Vec::new(),
            validator: None,
        }
    }

    /// Answer key
    pub fn name(&self) -> &str {
        match self {
            Prompt::Text(p) => &p.name,
            Prompt::Select(p) => &p.name,
            Prompt::MultiSelect(p) => &p.name,
            Prompt::Confirm(p) => &p.name,
            Prompt::PathSelect(p) => &p.name,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Prompt::Text(p) => &p.message,
            Prompt::Select(p) => &p.message,
            Prompt::MultiSelect(p) => &p.message,
            Prompt::Confirm(p) => &p.message,
            Prompt::PathSelect(p) => &p.message,
        }
    }

    /// Answer from a single line of text, as given on a command line or in
    /// a script. Multi-choice values are comma-separated; confirm accepts
    /// `y`/`yes`/`true` and `n`/`no`/`false`, empty meaning the default.
    pub fn answer_from_text(&self, raw: &str) -> Result<AnswerValue, String> {
        match self {
            Prompt::Text(p) => p.answer(raw),
            Prompt::Select(p) => p.answer(raw.trim()),
            Prompt::MultiSelect(p) => {
                let selected: Vec<String> = raw
                    .split(',')
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .map(String::from)
                    .collect();
                p.answer(&selected)
            }
            Prompt::Confirm(p) => match raw.trim().to_lowercase().as_str() {
                "" => Ok(p.answer(None)),
                "y" | "yes" | "true" => Ok(p.answer(Some(true))),
                "n" | "no" | "false" => Ok(p.answer(Some(false))),
                other => Err(format!("'{}' is not a yes/no answer", other)),
            },
            Prompt::PathSelect(p) => p.answer(raw),
        }
    }
}

impl From<TextPrompt> for Prompt {
    fn from(prompt: TextPrompt) -> Self {
        Prompt::Text(prompt)
    }
}

impl From<SelectPrompt> for Prompt {
    fn from(prompt: SelectPrompt) -> Self {
        Prompt::Select(prompt)
    }
}

impl From<MultiSelectPrompt> for Prompt {
    fn from(prompt: MultiSelectPrompt) -> Self {
        Prompt::MultiSelect(prompt)
    }
}

impl From<ConfirmPrompt> for Prompt {
    fn from(prompt: ConfirmPrompt) -> Self {
        Prompt::Confirm(prompt)
    }
}

impl From<PathSelectPrompt> for Prompt {
    fn from(prompt: PathSelectPrompt) -> Self {
        Prompt::PathSelect(prompt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_answer_from_text_per_kind() {
        let types: Prompt = Prompt::multi_select(
            "types",
            "Which files?",
            vec![Choice::new("Page", "page"), Choice::new("Error", "error")],
        )
        .into();
        assert_eq!(
            types.answer_from_text("error, page").unwrap(),
            AnswerValue::List(vec!["page".to_string(), "error".to_string()])
        );
        assert!(types.answer_from_text("page,route").is_err());

        let schema: Prompt = Prompt::confirm("schema", "Schema?").default_value(true).into();
        assert_eq!(schema.answer_from_text("").unwrap(), AnswerValue::Bool(true));
        assert_eq!(schema.answer_from_text("No").unwrap(), AnswerValue::Bool(false));
        assert!(schema.answer_from_text("maybe").is_err());

        let dir: Prompt = Prompt::path_select("dir", "Where?", "src/app").into();
        assert_eq!(
            dir.answer_from_text("src/app/blog/").unwrap(),
            AnswerValue::Path(SelectedPath::from_original("src/app/blog"))
        );
    }

    fn required(value: &str) -> Result<(), String> {
        if value.trim().is_empty() {
            Err("A name is required".to_string())
        } else {
            Ok(())
        }
    }

    #[test]
    fn test_text_prompt_default_and_validation() {
        let prompt = Prompt::text("name", "Name?").validate(required);
        assert_eq!(prompt.answer("Card"), Ok(AnswerValue::Text("Card".to_string())));
        assert_eq!(prompt.answer("  "), Err("A name is required".to_string()));

        let with_default = Prompt::text("ext", "Ext?").default_value("ts");
        assert_eq!(with_default.answer(""), Ok(AnswerValue::Text("ts".to_string())));
    }

    #[test]
    fn test_select_rejects_unknown_choice() {
        let prompt = Prompt::select(
            "extension",
            "Extension?",
            vec![Choice::new("ts", "ts"), Choice::new("tsx", "tsx")],
        );
        assert!(prompt.answer("tsx").is_ok());
        assert!(prompt.answer("js").is_err());
    }

    #[test]
    fn test_multi_select_orders_by_declaration_and_validates() {
        let prompt = Prompt::multi_select(
            "types",
            "Types?",
            vec![
                Choice::new("Page", "page").checked(true),
                Choice::new("Layout", "layout").checked(true),
                Choice::new("Error", "error"),
            ],
        )
        .validate(|selected| {
            if selected.is_empty() {
                Err("At least one type must be selected".to_string())
            } else {
                Ok(())
            }
        });

        assert_eq!(prompt.initial_values(), vec!["page", "layout"]);
        assert_eq!(
            prompt.answer(&["error".to_string(), "page".to_string()]),
            Ok(AnswerValue::List(vec!["page".to_string(), "error".to_string()]))
        );
        assert!(prompt.answer(&[]).is_err());
        assert!(prompt.answer(&["nope".to_string()]).is_err());
    }

    #[test]
    fn test_confirm_uses_default() {
        let prompt = Prompt::confirm("schema", "Schema?").default_value(true);
        assert_eq!(prompt.answer(None), AnswerValue::Bool(true));
        assert_eq!(prompt.answer(Some(false)), AnswerValue::Bool(false));
    }

    #[test]
    fn test_path_select_filter_and_suggestions() {
        let project = tempfile::tempdir().unwrap();
        for dir in [
            "src/app/blog/_components",
            "src/app/shop",
            "src/app/_lib/deep",
            "src/app/api/users",
        ] {
            fs::create_dir_all(project.path().join(dir)).unwrap();
        }

        let prompt = Prompt::path_select("dir", "Where?", "src/app")
            .exclude_path(Regex::new(r"^src/app/(_lib|api)/?.*$").unwrap())
            .exclude_containing("_components")
            .validate(|v| {
                if v.starts_with("src/app") {
                    Ok(())
                } else {
                    Err("The directory must be inside the src/app folder".to_string())
                }
            });

        assert_eq!(
            prompt.suggestions(project.path()),
            vec!["src/app", "src/app/blog", "src/app/shop"]
        );

        assert_eq!(
            prompt.answer("src/app/blog/"),
            Ok(AnswerValue::Path(SelectedPath::from_original("src/app/blog")))
        );
        assert!(prompt.answer("lib/x").is_err());
    }

    #[test]
    fn test_prompt_name_and_message() {
        let prompt: Prompt = Prompt::confirm("schema", "Does this action require a schema?").into();
        assert_eq!(prompt.name(), "schema");
        assert_eq!(prompt.message(), "Does this action require a schema?");
    }
}
