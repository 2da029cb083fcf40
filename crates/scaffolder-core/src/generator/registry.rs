//! Named generator definitions and their invocation

use super::action::Action;
use super::executor::{ActionExecutor, ActionResult};
use super::planner::ActionPlanner;
use super::prompt::Prompt;
use crate::answers::Answers;
use crate::error::{ActionKind, Error, Result};

/// A named scaffolding recipe: prompts plus a planner
#[derive(Debug, Clone)]
pub struct Generator {
    name: String,
    description: String,
    prompts: Vec<Prompt>,
    planner: ActionPlanner,
}

impl Generator {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        planner: ActionPlanner,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            prompts: Vec::new(),
            planner,
        }
    }

    /// Append a prompt; prompts are asked in the order they are added
    pub fn prompt(mut self, prompt: impl Into<Prompt>) -> Self {
        self.prompts.push(prompt.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn prompts(&self) -> &[Prompt] {
        &self.prompts
    }

    pub fn plan(&self, answers: &Answers) -> Result<Vec<Action>> {
        self.planner.plan(answers)
    }

    /// Build answers from `key=value` text pairs, each checked by its prompt.
    ///
    /// Keys that name no prompt are rejected. Prompts without a pair are left
    /// unanswered.
    pub fn answers_from_text(&self, given: &[(String, String)]) -> Result<Answers, String> {
        let mut answers = Answers::new();
        for (key, raw) in given {
            let prompt = self
                .prompts
                .iter()
                .find(|p| p.name() == key)
                .ok_or_else(|| format!("generator '{}' has no prompt named '{}'", self.name, key))?;
            let value = prompt
                .answer_from_text(raw)
                .map_err(|reason| format!("{}: {}", key, reason))?;
            answers.insert(key.as_str(), value);
        }
        Ok(answers)
    }
}

/// Registry of generators, built once at startup and read-only afterwards
#[derive(Debug, Default)]
pub struct GeneratorRegistry {
    generators: Vec<Generator>,
}

impl GeneratorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, generator: Generator) -> Result<()> {
        if self.generators.iter().any(|g| g.name == generator.name) {
            return Err(Error::DuplicateGenerator {
                name: generator.name,
            });
        }
        self.generators.push(generator);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<&Generator> {
        self.generators
            .iter()
            .find(|g| g.name == name)
            .ok_or_else(|| Error::NotFound {
                name: name.to_string(),
            })
    }

    /// `(name, description)` pairs in registration order
    pub fn list(&self) -> Vec<(&str, &str)> {
        self.generators
            .iter()
            .map(|g| (g.name.as_str(), g.description.as_str()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.generators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }

    /// Plan a generator and execute its actions in order.
    ///
    /// Every action is rendered and its path checked before the first write,
    /// so template and path errors leave the destination untouched. Writes then
    /// happen strictly one after another; the first failure aborts the rest.
    pub async fn invoke(
        &self,
        name: &str,
        answers: &Answers,
        executor: &ActionExecutor,
    ) -> Result<Vec<ActionResult>> {
        let generator = self.get(name)?;
        let actions = generator.plan(answers).map_err(|e| Error::PlanFailed {
            generator: name.to_string(),
            source: Box::new(e),
        })?;

        tracing::info!(generator = name, actions = actions.len(), "invoking generator");

        let mut prepared = Vec::with_capacity(actions.len());
        for (index, action) in actions.iter().enumerate() {
            let ready = executor
                .prepare(action, answers)
                .await
                .map_err(|e| action_failed(name, index, action.kind(), action.path(), e))?;
            prepared.push(ready);
        }

        let mut results = Vec::with_capacity(prepared.len());
        for (index, ready) in prepared.iter().enumerate() {
            let result = executor
                .apply(ready)
                .await
                .map_err(|e| action_failed(name, index, ready.kind(), ready.relative_path(), e))?;
            results.push(result);
        }

        Ok(results)
    }
}

fn action_failed(generator: &str, index: usize, kind: ActionKind, path: &str, source: Error) -> Error {
    Error::ActionFailed {
        generator: generator.to_string(),
        index,
        kind,
        path: path.to_string(),
        source: Box::new(source),
    }
}
