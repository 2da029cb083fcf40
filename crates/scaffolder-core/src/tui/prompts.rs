//! Asking a generator's prompts through cliclack

use crate::answers::Answers;
use crate::generator::{
    ConfirmPrompt, Generator, MultiSelectPrompt, PathSelectPrompt, Prompt, SelectPrompt,
    TextPrompt,
};
use anyhow::Result;
use std::path::Path;

/// Ask the prompts of `generator` in order and collect the answers.
///
/// Prompts already answered in `preset` are not asked. Path suggestions are
/// read from `project_root`.
pub fn collect_answers(
    generator: &Generator,
    project_root: &Path,
    preset: Answers,
) -> Result<Answers> {
    let mut answers = preset;
    for prompt in generator.prompts() {
        if answers.get(prompt.name()).is_some() {
            continue;
        }
        let value = match prompt {
            Prompt::Text(p) => ask_text(p)?,
            Prompt::Select(p) => ask_select(p)?,
            Prompt::MultiSelect(p) => ask_multi_select(p)?,
            Prompt::Confirm(p) => ask_confirm(p)?,
            Prompt::PathSelect(p) => ask_path(p, project_root)?,
        };
        answers.insert(prompt.name(), value);
    }
    Ok(answers)
}

fn ask_text(prompt: &TextPrompt) -> Result<crate::AnswerValue> {
    let checker = prompt.clone();
    let mut input = cliclack::input(&prompt.message)
        .validate(move |raw: &String| checker.answer(raw).map(|_| ()));
    if let Some(default) = &prompt.default {
        input = input.placeholder(default).default_input(default);
    }
    let raw: String = input.interact()?;
    prompt.answer(&raw).map_err(anyhow::Error::msg)
}

fn ask_select(prompt: &SelectPrompt) -> Result<crate::AnswerValue> {
    let mut select = cliclack::select(&prompt.message);
    for choice in &prompt.choices {
        select = select.item(choice.value.clone(), &choice.label, "");
    }
    if let Some(default) = &prompt.default {
        select = select.initial_value(default.clone());
    }
    let value: String = select.interact()?;
    prompt.answer(&value).map_err(anyhow::Error::msg)
}

fn ask_multi_select(prompt: &MultiSelectPrompt) -> Result<crate::AnswerValue> {
    loop {
        let mut multi = cliclack::multiselect(&prompt.message);
        for choice in &prompt.choices {
            multi = multi.item(choice.value.clone(), &choice.label, "");
        }
        let selected: Vec<String> = multi
            .initial_values(prompt.initial_values())
            .required(false)
            .interact()?;

        match prompt.answer(&selected) {
            Ok(value) => return Ok(value),
            Err(reason) => cliclack::log::error(reason)?,
        }
    }
}

fn ask_confirm(prompt: &ConfirmPrompt) -> Result<crate::AnswerValue> {
    let confirmed: bool = cliclack::confirm(&prompt.message)
        .initial_value(prompt.default)
        .interact()?;
    Ok(prompt.answer(Some(confirmed)))
}

fn ask_path(prompt: &PathSelectPrompt, project_root: &Path) -> Result<crate::AnswerValue> {
    let suggestions = prompt.suggestions(project_root);

    if !suggestions.is_empty() {
        // `None` stands for "type a path"
        let mut select = cliclack::select(&prompt.message);
        for suggestion in &suggestions {
            select = select.item(Some(suggestion.clone()), suggestion, "");
        }
        select = select.item(None, "Other...", "type a path");

        if let Some(picked) = select.interact()? {
            match prompt.answer(&picked) {
                Ok(value) => return Ok(value),
                Err(reason) => cliclack::log::error(reason)?,
            }
        }
    }

    let checker = prompt.clone();
    let raw: String = cliclack::input(&prompt.message)
        .placeholder(&prompt.root)
        .validate(move |raw: &String| checker.answer(raw).map(|_| ()))
        .interact()?;
    prompt.answer(&raw).map_err(anyhow::Error::msg)
}
