//! The generation pipeline: prompt -> generator -> parser.
//!
//! Each of the four tasks is one [`Request`]. [`Pipeline::execute`] renders
//! the prompt, suspends on the generator (racing a cancellation token), and
//! parses the completion into an [`Outcome`]. Nothing is retried.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::llm::{GenerateError, TextGenerator};
use crate::models::{FoodList, MacrosReport, MealPlanEntry, PantryEntry, Recipe};
use crate::parse::{self, LineError, Parsed};
use crate::prompt;

/// The four generation tasks, one per session slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    Pantry,
    MealPlan,
    Recipe,
    Macros,
}

impl TaskKind {
    pub const ALL: [TaskKind; 4] = [Self::Pantry, Self::MealPlan, Self::Recipe, Self::Macros];

    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pantry => "pantry",
            Self::MealPlan => "meal plan",
            Self::Recipe => "recipe",
            Self::Macros => "macros",
        };
        f.write_str(s)
    }
}

/// Errors from building or executing a request.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("no food items: add items to the food list")]
    EmptyFoodList,

    #[error("no meal selected")]
    NoMealSelected,

    #[error("no recipe to analyse")]
    NoRecipe,

    #[error("{kind} generation failed: {source}")]
    Generation {
        kind: TaskKind,
        #[source]
        source: GenerateError,
    },

    #[error("{0} generation cancelled")]
    Cancelled(TaskKind),
}

/// One generation task with its typed input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Pantry(FoodList),
    MealPlan(FoodList),
    Recipe { meal: String },
    Macros { recipe: Recipe },
}

impl Request {
    /// Categorize foods. Refuses an empty list.
    pub fn pantry(foods: FoodList) -> Result<Self, PipelineError> {
        if foods.is_empty() {
            return Err(PipelineError::EmptyFoodList);
        }
        Ok(Self::Pantry(foods))
    }

    /// Plan a week of meals. Refuses an empty list.
    pub fn meal_plan(foods: FoodList) -> Result<Self, PipelineError> {
        if foods.is_empty() {
            return Err(PipelineError::EmptyFoodList);
        }
        Ok(Self::MealPlan(foods))
    }

    /// Write a recipe for a `"<Day> - <Meal> - <Suggestion>"` selection.
    pub fn recipe(meal: impl Into<String>) -> Result<Self, PipelineError> {
        let meal = meal.into();
        if meal.trim().is_empty() {
            return Err(PipelineError::NoMealSelected);
        }
        Ok(Self::Recipe { meal })
    }

    /// Break a recipe down into macros.
    pub fn macros(recipe: Recipe) -> Result<Self, PipelineError> {
        if recipe.text.trim().is_empty() {
            return Err(PipelineError::NoRecipe);
        }
        Ok(Self::Macros { recipe })
    }

    pub fn kind(&self) -> TaskKind {
        match self {
            Self::Pantry(_) => TaskKind::Pantry,
            Self::MealPlan(_) => TaskKind::MealPlan,
            Self::Recipe { .. } => TaskKind::Recipe,
            Self::Macros { .. } => TaskKind::Macros,
        }
    }

    /// Render the prompt for this request.
    pub fn prompt(&self) -> String {
        match self {
            Self::Pantry(foods) => prompt::categorize_prompt(foods),
            Self::MealPlan(foods) => prompt::meal_plan_prompt(foods),
            Self::Recipe { meal } => prompt::recipe_prompt(meal),
            Self::Macros { recipe } => prompt::macros_prompt(&recipe.text),
        }
    }

    /// Parse a completion into the outcome for this request.
    pub fn into_outcome(self, completion: &str) -> Outcome {
        match self {
            Self::Pantry(_) => Outcome::Pantry(parse::parse_pantry(completion)),
            Self::MealPlan(_) => Outcome::MealPlan(parse::parse_meal_plan(completion)),
            Self::Recipe { meal } => Outcome::Recipe(Recipe {
                meal,
                text: parse::parse_free_text(completion),
            }),
            Self::Macros { recipe } => Outcome::Macros(MacrosReport {
                meal: recipe.meal,
                text: parse::parse_free_text(completion),
            }),
        }
    }
}

/// The parsed result of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Pantry(Parsed<PantryEntry>),
    MealPlan(Parsed<MealPlanEntry>),
    Recipe(Recipe),
    Macros(MacrosReport),
}

impl Outcome {
    pub fn kind(&self) -> TaskKind {
        match self {
            Self::Pantry(_) => TaskKind::Pantry,
            Self::MealPlan(_) => TaskKind::MealPlan,
            Self::Recipe(_) => TaskKind::Recipe,
            Self::Macros(_) => TaskKind::Macros,
        }
    }

    /// Lines dropped while parsing (always empty for free-text outcomes).
    pub fn line_errors(&self) -> &[LineError] {
        match self {
            Self::Pantry(p) => &p.errors,
            Self::MealPlan(p) => &p.errors,
            Self::Recipe(_) | Self::Macros(_) => &[],
        }
    }
}

/// Runs requests against a text generator.
#[derive(Debug, Clone)]
pub struct Pipeline {
    generator: Arc<dyn TextGenerator>,
}

impl Pipeline {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    pub fn generator(&self) -> &dyn TextGenerator {
        self.generator.as_ref()
    }

    /// Execute one request.
    ///
    /// Suspends until the generator returns or `cancel` fires. A cancelled
    /// request yields [`PipelineError::Cancelled`] and produces no outcome.
    pub async fn execute(
        &self,
        request: Request,
        cancel: &CancellationToken,
    ) -> Result<Outcome, PipelineError> {
        let kind = request.kind();
        let prompt = request.prompt();
        let started = Instant::now();

        info!(
            %kind,
            provider = self.generator.provider_name(),
            model = self.generator.model_name(),
            "generation started"
        );

        let completion = tokio::select! {
            result = self.generator.generate(&prompt) => {
                result.map_err(|source| PipelineError::Generation { kind, source })?
            }
            _ = cancel.cancelled() => {
                info!(%kind, "generation cancelled");
                return Err(PipelineError::Cancelled(kind));
            }
        };

        let elapsed_ms = started.elapsed().as_millis() as u64;
        let outcome = request.into_outcome(&completion);

        for error in outcome.line_errors() {
            warn!(%kind, line = error.line(), error = %error, "dropping malformed completion line");
        }
        info!(
            %kind,
            elapsed_ms,
            chars = completion.len(),
            dropped = outcome.line_errors().len(),
            "generation finished"
        );

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::FakeGenerator;

    fn pipeline(generator: FakeGenerator) -> Pipeline {
        Pipeline::new(Arc::new(generator))
    }

    #[test]
    fn empty_food_list_is_refused() {
        let err = Request::pantry(FoodList::new(["", " "])).unwrap_err();
        assert!(matches!(err, PipelineError::EmptyFoodList));
        let err = Request::meal_plan(FoodList::default()).unwrap_err();
        assert!(matches!(err, PipelineError::EmptyFoodList));
    }

    #[test]
    fn blank_selection_is_refused() {
        assert!(matches!(
            Request::recipe("  ").unwrap_err(),
            PipelineError::NoMealSelected
        ));
        let recipe = Recipe {
            meal: "Monday - Lunch - Soup".to_string(),
            text: String::new(),
        };
        assert!(matches!(
            Request::macros(recipe).unwrap_err(),
            PipelineError::NoRecipe
        ));
    }

    #[test]
    fn request_kind_matches_outcome_kind() {
        let foods = FoodList::new(["Rice"]);
        let requests = [
            Request::pantry(foods.clone()).unwrap(),
            Request::meal_plan(foods).unwrap(),
            Request::recipe("Monday - Lunch - Rice").unwrap(),
        ];
        for request in requests {
            let kind = request.kind();
            assert_eq!(request.into_outcome("").kind(), kind);
        }
    }

    #[tokio::test]
    async fn pantry_request_parses_completion() {
        let p = pipeline(FakeGenerator::with_response(
            "categorize",
            "Grains: Rice\nnot a pantry line\nDairy: Milk",
        ));
        let request = Request::pantry(FoodList::new(["Rice", "Milk"])).unwrap();

        let outcome = p.execute(request, &CancellationToken::new()).await.unwrap();

        let Outcome::Pantry(parsed) = outcome else {
            panic!("expected pantry outcome");
        };
        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(parsed.errors.len(), 1);
    }

    #[tokio::test]
    async fn recipe_outcome_keeps_selection_and_text() {
        let p = pipeline(FakeGenerator::with_response(
            "recipe",
            "  Ingredients:\n- rice\n",
        ));
        let request = Request::recipe("Monday - Lunch - Rice").unwrap();

        let outcome = p.execute(request, &CancellationToken::new()).await.unwrap();

        assert_eq!(
            outcome,
            Outcome::Recipe(Recipe {
                meal: "Monday - Lunch - Rice".to_string(),
                text: "Ingredients:\n- rice".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn generator_failure_is_reported_with_kind() {
        let p = pipeline(FakeGenerator::new());
        let request = Request::meal_plan(FoodList::new(["Rice"])).unwrap();

        let err = p
            .execute(request, &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            PipelineError::Generation {
                kind: TaskKind::MealPlan,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn cancelled_token_stops_request() {
        let p = pipeline(FakeGenerator::new().with_default_response("Grains: Rice"));
        let cancel = CancellationToken::new();
        cancel.cancel();
        let request = Request::pantry(FoodList::new(["Rice"])).unwrap();

        // `select!` picks randomly among ready branches, so an already
        // cancelled token may still lose to an instant completion.
        match p.execute(request, &cancel).await {
            Err(PipelineError::Cancelled(TaskKind::Pantry)) | Ok(Outcome::Pantry(_)) => {}
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
