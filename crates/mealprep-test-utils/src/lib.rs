//! Shared test utilities for mealprep integration tests.
//!
//! Provides canned model completions and a [`ScriptedGenerator`] that
//! replays them in order while recording every prompt it receives.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use mealprep_core::llm::{GenerateError, TextGenerator};
use mealprep_core::models::{Meal, Weekday};

/// A well-formed meal-plan completion covering all 15 (day, meal) cells.
///
/// Suggestions read `"<meal> <n>"` with `n` counting 1..=15 in plan order.
pub fn full_week_completion() -> String {
    full_week_lines().join("\n")
}

/// The 15 lines of [`full_week_completion`].
pub fn full_week_lines() -> Vec<String> {
    let mut lines = Vec::with_capacity(15);
    let mut n = 1;
    for day in Weekday::ALL {
        for meal in Meal::ALL {
            lines.push(format!("{day} | {meal} | {} {n}", meal.to_string().to_lowercase()));
            n += 1;
        }
    }
    lines
}

/// A categorization completion for `(group, item)` pairs.
pub fn categorization_completion(pairs: &[(&str, &str)]) -> String {
    pairs
        .iter()
        .map(|(group, item)| format!("{group}: {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}

// ---------------------------------------------------------------------------
// ScriptedGenerator
// ---------------------------------------------------------------------------

#[derive(Debug)]
enum Step {
    Reply(Result<String, GenerateError>),
    Hang,
}

/// A text generator that replays a script of replies.
///
/// Each call to `generate` consumes the next step. Running past the end of
/// the script yields [`GenerateError::NoCompletion`].
#[derive(Debug, Default)]
pub struct ScriptedGenerator {
    steps: Mutex<VecDeque<Step>>,
    prompts: Mutex<Vec<String>>,
    delay: Option<Duration>,
}

impl ScriptedGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful completion.
    pub fn then_reply(self, completion: impl Into<String>) -> Self {
        self.push(Step::Reply(Ok(completion.into())))
    }

    /// Queue a failure.
    pub fn then_fail(self, error: GenerateError) -> Self {
        self.push(Step::Reply(Err(error)))
    }

    /// Queue a call that never returns; only cancellation ends it.
    pub fn then_hang(self) -> Self {
        self.push(Step::Hang)
    }

    /// Sleep before every reply.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    fn push(self, step: Step) -> Self {
        self.steps.lock().unwrap().push_back(step);
        self
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let step = self.steps.lock().unwrap().pop_front();

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match step {
            Some(Step::Reply(reply)) => reply,
            Some(Step::Hang) => std::future::pending().await,
            None => Err(GenerateError::NoCompletion(
                prompt.chars().take(100).collect(),
            )),
        }
    }

    fn provider_name(&self) -> &'static str {
        "scripted"
    }

    fn model_name(&self) -> &str {
        "scripted-model"
    }
}
