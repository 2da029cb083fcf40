//! Placeholder rendering shared by path and content templates
//!
//! The template language is intentionally small:
//! - `{{ name }}` inserts an answer
//! - `{{ dir.original }}` selects a field of a path answer
//! - `{{ pascalCase name }}` applies a case helper
//! - `\{{ ... }}` emits the braces literally
//!
//! Anything that does not parse as a placeholder (for example a JSX style
//! object `{{ color: 'red' }}`) is copied through unchanged.

use crate::answers::Answers;
use crate::error::{Error, Result};
use regex::{Captures, Regex};
use std::sync::OnceLock;

/// Case conversion applied by a template helper
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseHelper {
    /// PascalCase (e.g., UserProfile)
    Pascal,
    /// camelCase (e.g., userProfile)
    Camel,
    /// snake_case (e.g., user_profile)
    Snake,
    /// kebab-case (e.g., user-profile)
    Kebab,
    /// CONSTANT_CASE (e.g., USER_PROFILE)
    Constant,
    /// Title Case (e.g., User Profile)
    Title,
    Lower,
    Upper,
}

impl CaseHelper {
    /// Look up a helper by the name used inside templates
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "pascalCase" | "properCase" => Some(CaseHelper::Pascal),
            "camelCase" => Some(CaseHelper::Camel),
            "snakeCase" => Some(CaseHelper::Snake),
            "kebabCase" | "dashCase" => Some(CaseHelper::Kebab),
            "constantCase" => Some(CaseHelper::Constant),
            "titleCase" => Some(CaseHelper::Title),
            "lowerCase" => Some(CaseHelper::Lower),
            "upperCase" => Some(CaseHelper::Upper),
            _ => None,
        }
    }

    pub fn apply(&self, input: &str) -> String {
        use heck::{
            ToKebabCase, ToLowerCamelCase, ToPascalCase, ToShoutySnakeCase, ToSnakeCase,
            ToTitleCase,
        };

        match self {
            CaseHelper::Pascal => input.to_pascal_case(),
            CaseHelper::Camel => input.to_lower_camel_case(),
            CaseHelper::Snake => input.to_snake_case(),
            CaseHelper::Kebab => input.to_kebab_case(),
            CaseHelper::Constant => input.to_shouty_snake_case(),
            CaseHelper::Title => input.to_title_case(),
            CaseHelper::Lower => input.to_lowercase(),
            CaseHelper::Upper => input.to_uppercase(),
        }
    }
}

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"(\\)?\{\{\s*(?:([A-Za-z][A-Za-z0-9]*)\s+)?([A-Za-z_][A-Za-z0-9_]*(?:\.[A-Za-z_][A-Za-z0-9_]*)*)\s*\}\}",
        )
        .expect("placeholder pattern is valid")
    })
}

/// Render a template against the answers.
///
/// Fails on the first placeholder that names an unknown answer or helper.
pub fn render(template: &str, answers: &Answers) -> Result<String> {
    let pattern = placeholder_pattern();
    let mut rendered = String::with_capacity(template.len());
    let mut last = 0;

    for caps in pattern.captures_iter(template) {
        let whole = caps.get(0).map_or(0..0, |m| m.range());
        rendered.push_str(&template[last..whole.start]);
        rendered.push_str(&expand(&caps, answers)?);
        last = whole.end;
    }
    rendered.push_str(&template[last..]);

    Ok(rendered)
}

fn expand(caps: &Captures<'_>, answers: &Answers) -> Result<String> {
    let whole = &caps[0];
    if caps.get(1).is_some() {
        // Escaped: drop the backslash, keep the braces verbatim
        return Ok(whole[1..].to_string());
    }

    let key = &caps[3];
    let value = answers.lookup(key).ok_or_else(|| Error::Template {
        key: key.to_string(),
    })?;

    match caps.get(2) {
        None => Ok(value),
        Some(helper) => {
            let helper_name = helper.as_str();
            let case = CaseHelper::from_name(helper_name).ok_or_else(|| Error::UnknownHelper {
                helper: helper_name.to_string(),
            })?;
            Ok(case.apply(&value))
        }
    }
}
