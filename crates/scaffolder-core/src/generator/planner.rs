//! Turning answers into an ordered action list

use super::action::Action;
use crate::answers::Answers;
use crate::error::Result;
use std::fmt;
use std::sync::Arc;

/// Condition that decides whether an action group is planned
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    Always,
    /// A multi-choice answer contains `value`
    Includes { key: String, value: String },
    /// A confirm answer is true
    Confirmed(String),
}

impl Trigger {
    pub fn includes(key: impl Into<String>, value: impl Into<String>) -> Self {
        Trigger::Includes {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn confirmed(key: impl Into<String>) -> Self {
        Trigger::Confirmed(key.into())
    }

    /// Fails with a planning error when the answer is absent or mistyped
    pub fn holds(&self, answers: &Answers) -> Result<bool> {
        match self {
            Trigger::Always => Ok(true),
            Trigger::Includes { key, value } => Ok(answers.list(key)?.contains(value)),
            Trigger::Confirmed(key) => answers.flag(key),
        }
    }
}

/// A primary action followed by its companions (tests, stories, mocks)
#[derive(Debug, Clone)]
pub struct ActionGroup {
    trigger: Trigger,
    actions: Vec<Action>,
}

impl ActionGroup {
    pub fn new(trigger: Trigger, primary: Action) -> Self {
        Self {
            trigger,
            actions: vec![primary],
        }
    }

    /// Group that is always planned
    pub fn always(primary: Action) -> Self {
        Self::new(Trigger::Always, primary)
    }

    pub fn companion(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    pub fn trigger(&self) -> &Trigger {
        &self.trigger
    }

    /// Primary first, then companions in the order they were added
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }
}

type PlanFn = dyn Fn(&Answers) -> Result<Vec<Action>> + Send + Sync;

/// Produces a generator's actions from its answers
#[derive(Clone)]
pub enum ActionPlanner {
    /// Same actions regardless of answers
    Fixed(Vec<Action>),
    /// Groups planned in declared order when their trigger holds
    Grouped(Vec<ActionGroup>),
    /// Arbitrary pure function of the answers
    Computed(Arc<PlanFn>),
}

impl ActionPlanner {
    pub fn computed(
        plan: impl Fn(&Answers) -> Result<Vec<Action>> + Send + Sync + 'static,
    ) -> Self {
        ActionPlanner::Computed(Arc::new(plan))
    }

    /// Plan the ordered action list. Does no I/O.
    pub fn plan(&self, answers: &Answers) -> Result<Vec<Action>> {
        match self {
            ActionPlanner::Fixed(actions) => Ok(actions.clone()),
            ActionPlanner::Grouped(groups) => {
                let mut planned = Vec::new();
                for group in groups {
                    if group.trigger.holds(answers)? {
                        planned.extend(group.actions.iter().cloned());
                    }
                }
                Ok(planned)
            }
            ActionPlanner::Computed(plan) => plan(answers),
        }
    }
}

impl fmt::Debug for ActionPlanner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionPlanner::Fixed(actions) => f.debug_tuple("Fixed").field(actions).finish(),
            ActionPlanner::Grouped(groups) => f.debug_tuple("Grouped").field(groups).finish(),
            ActionPlanner::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}
