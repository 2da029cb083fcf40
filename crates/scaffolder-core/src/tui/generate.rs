//! Interactive generator runs

use super::prompts::collect_answers;
use crate::config::Settings;
use crate::generator::{ActionResult, GeneratorRegistry, Outcome};
use anyhow::{Context, Result};
use colored::{ColoredString, Colorize};

/// Colored, fixed-width label for an action outcome
pub fn outcome_label(outcome: Outcome) -> ColoredString {
    let label = format!("{:<11}", outcome.to_string());
    let label = label.as_str();
    match outcome {
        Outcome::Created => label.green(),
        Outcome::Overwritten => label.yellow(),
        Outcome::Appended => label.cyan(),
        Outcome::Skipped | Outcome::NoopDuplicate => label.dimmed(),
    }
}

/// Pick a generator (unless `name` is given), ask its prompts and run it.
///
/// `given` holds `key=value` answers from the command line; their prompts are
/// skipped. Action templates are read from `template_subdir` of the template
/// root.
pub async fn run_generate(
    registry: &GeneratorRegistry,
    name: Option<&str>,
    given: &[(String, String)],
    settings: &Settings,
    template_subdir: &str,
) -> Result<()> {
    cliclack::intro("mindset generate")?;

    let name = match name {
        Some(name) => name.to_string(),
        None => select_generator(registry)?,
    };
    let generator = registry.get(&name)?;

    let preset = generator
        .answers_from_text(given)
        .map_err(anyhow::Error::msg)?;
    let answers = collect_answers(generator, &settings.destination_root, preset)?;
    let executor = settings.executor(template_subdir);

    let spinner = cliclack::spinner();
    spinner.start(format!("Running {}...", name));

    let results = match registry.invoke(&name, &answers, &executor).await {
        Ok(results) => results,
        Err(e) => {
            spinner.stop(format!("{} failed", name));
            return Err(e).with_context(|| format!("Generator '{}' did not complete", name));
        }
    };

    spinner.stop(format!("{} finished ({} actions)", name, results.len()));
    report(&results)?;

    cliclack::outro("Done!")?;
    Ok(())
}

fn select_generator(registry: &GeneratorRegistry) -> Result<String> {
    let generators = registry.list();
    if generators.is_empty() {
        anyhow::bail!("No generators registered.");
    }

    let mut select = cliclack::select("Select a generator");
    for (name, description) in generators {
        select = select.item(name.to_string(), name, description);
    }
    Ok(select.interact()?)
}

fn report(results: &[ActionResult]) -> Result<()> {
    for result in results {
        cliclack::log::step(format!("{} {}", outcome_label(result.outcome), result.path))?;
    }
    Ok(())
}
