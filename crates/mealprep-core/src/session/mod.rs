//! Per-session state: the food list, four result slots, and the status of
//! the action that last touched each slot.
//!
//! A [`Session`] is an explicit context object owned by whoever drives the
//! interaction. Actions are strictly serialised: [`Session::begin`] refuses
//! to start a second action while one is pending, and refuses to start an
//! action whose input slot is still empty. The generation itself runs
//! outside the session (see [`crate::pipeline::Pipeline`]); its result is
//! handed back through [`Session::complete`].

mod slot;

pub use slot::{ActionRecord, ActionStatus, Generated, Slot};

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::{FoodList, MacrosReport, MealPlanEntry, PantryEntry, PantryGroup, Recipe};
use crate::parse::Parsed;
use crate::pipeline::{Outcome, Pipeline, PipelineError, Request, TaskKind};
use crate::pivot::{self, MealGrid};

/// Errors from driving a session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("a {0} generation is already in progress")]
    Busy(TaskKind),

    #[error("cannot generate {kind} before a {needs} exists")]
    MissingPrerequisite { kind: TaskKind, needs: TaskKind },

    #[error("invalid {kind} action transition: {from} -> {to}")]
    InvalidTransition {
        kind: TaskKind,
        from: ActionStatus,
        to: ActionStatus,
    },

    #[error("{kind} outcome delivered for a {expected} action")]
    MismatchedOutcome { kind: TaskKind, expected: TaskKind },

    #[error(transparent)]
    Action(#[from] PipelineError),
}

/// The slot a task needs populated before it may run.
pub fn prerequisite(kind: TaskKind) -> Option<TaskKind> {
    match kind {
        TaskKind::Pantry => None,
        TaskKind::MealPlan => Some(TaskKind::Pantry),
        TaskKind::Recipe => Some(TaskKind::MealPlan),
        TaskKind::Macros => Some(TaskKind::Recipe),
    }
}

#[derive(Debug)]
pub struct Session {
    id: Uuid,
    foods: Vec<String>,
    pantry: Slot<Parsed<PantryEntry>>,
    meal_plan: Slot<Parsed<MealPlanEntry>>,
    recipe: Slot<Recipe>,
    macros: Slot<MacrosReport>,
    actions: [ActionRecord; 4],
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            foods: Vec::new(),
            pantry: Slot::Empty,
            meal_plan: Slot::Empty,
            recipe: Slot::Empty,
            macros: Slot::Empty,
            actions: Default::default(),
        }
    }

    /// Start a session with an initial food list.
    pub fn with_foods<I, S>(foods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut session = Self::new();
        session.foods = foods.into_iter().map(Into::into).collect();
        session
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    // -----------------------------------------------------------------------
    // Food list
    // -----------------------------------------------------------------------

    /// The food list exactly as entered, blanks and duplicates included.
    pub fn foods(&self) -> &[String] {
        &self.foods
    }

    pub fn add_food(&mut self, item: impl Into<String>) {
        self.foods.push(item.into());
    }

    /// Remove the entry at `index`, returning it if it existed.
    pub fn remove_food(&mut self, index: usize) -> Option<String> {
        if index < self.foods.len() {
            Some(self.foods.remove(index))
        } else {
            None
        }
    }

    /// The cleaned food list used for prompts.
    pub fn food_list(&self) -> FoodList {
        FoodList::new(&self.foods)
    }

    // -----------------------------------------------------------------------
    // Requests built from session state
    // -----------------------------------------------------------------------

    pub fn pantry_request(&self) -> Result<Request, PipelineError> {
        Request::pantry(self.food_list())
    }

    pub fn meal_plan_request(&self) -> Result<Request, PipelineError> {
        Request::meal_plan(self.food_list())
    }

    /// A recipe request for one of [`Self::meal_labels`].
    pub fn recipe_request(&self, meal_label: &str) -> Result<Request, PipelineError> {
        Request::recipe(meal_label)
    }

    /// A macros request for the current recipe.
    pub fn macros_request(&self) -> Result<Request, PipelineError> {
        let recipe = self.recipe.get().ok_or(PipelineError::NoRecipe)?;
        Request::macros(recipe.clone())
    }

    // -----------------------------------------------------------------------
    // Actions
    // -----------------------------------------------------------------------

    pub fn action(&self, kind: TaskKind) -> &ActionRecord {
        &self.actions[kind.index()]
    }

    /// The action currently in progress, if any.
    pub fn pending(&self) -> Option<TaskKind> {
        TaskKind::ALL
            .into_iter()
            .find(|kind| self.action(*kind).status == ActionStatus::Pending)
    }

    pub fn is_populated(&self, kind: TaskKind) -> bool {
        match kind {
            TaskKind::Pantry => !self.pantry.is_empty(),
            TaskKind::MealPlan => !self.meal_plan.is_empty(),
            TaskKind::Recipe => !self.recipe.is_empty(),
            TaskKind::Macros => !self.macros.is_empty(),
        }
    }

    /// When the slot for `kind` was last populated.
    pub fn generated_at(&self, kind: TaskKind) -> Option<DateTime<Utc>> {
        match kind {
            TaskKind::Pantry => self.pantry.generated_at(),
            TaskKind::MealPlan => self.meal_plan.generated_at(),
            TaskKind::Recipe => self.recipe.generated_at(),
            TaskKind::Macros => self.macros.generated_at(),
        }
    }

    /// Mark an action as pending.
    ///
    /// Fails with [`SessionError::Busy`] while any action is pending, and
    /// with [`SessionError::MissingPrerequisite`] if the slot this action
    /// reads from is still empty.
    pub fn begin(&mut self, kind: TaskKind) -> Result<(), SessionError> {
        if let Some(pending) = self.pending() {
            return Err(SessionError::Busy(pending));
        }
        if let Some(needs) = prerequisite(kind) {
            if !self.is_populated(needs) {
                return Err(SessionError::MissingPrerequisite { kind, needs });
            }
        }

        self.transition(kind, ActionStatus::Pending)?;
        self.actions[kind.index()].error = None;
        info!(session_id = %self.id, %kind, "action started");
        Ok(())
    }

    /// Record the result of a pending action.
    ///
    /// A successful outcome overwrites the slot, even when every line of the
    /// completion was dropped. A cancelled action returns to idle. Any other
    /// failure, including an outcome of the wrong kind, marks the action
    /// failed and leaves the slot untouched before being returned.
    pub fn complete(
        &mut self,
        kind: TaskKind,
        result: Result<Outcome, PipelineError>,
    ) -> Result<(), SessionError> {
        let outcome = match result {
            Ok(outcome) => outcome,
            Err(PipelineError::Cancelled(_)) => {
                self.transition(kind, ActionStatus::Idle)?;
                info!(session_id = %self.id, %kind, "action cancelled");
                return Ok(());
            }
            Err(err) => {
                self.transition(kind, ActionStatus::Failed)?;
                warn!(session_id = %self.id, %kind, error = %err, "action failed");
                self.actions[kind.index()].error = Some(err.to_string());
                return Err(SessionError::Action(err));
            }
        };

        if outcome.kind() != kind {
            let err = SessionError::MismatchedOutcome {
                kind: outcome.kind(),
                expected: kind,
            };
            self.transition(kind, ActionStatus::Failed)?;
            warn!(session_id = %self.id, %kind, error = %err, "action failed");
            self.actions[kind.index()].error = Some(err.to_string());
            return Err(err);
        }

        self.transition(kind, ActionStatus::Done)?;
        match outcome {
            Outcome::Pantry(parsed) => self.pantry.populate(parsed),
            Outcome::MealPlan(parsed) => self.meal_plan.populate(parsed),
            Outcome::Recipe(recipe) => self.recipe.populate(recipe),
            Outcome::Macros(report) => self.macros.populate(report),
        }
        info!(session_id = %self.id, %kind, "action done");
        Ok(())
    }

    /// Abandon a pending action without touching its slot.
    pub fn cancel(&mut self, kind: TaskKind) -> Result<(), SessionError> {
        self.complete(kind, Err(PipelineError::Cancelled(kind)))
    }

    /// Begin, execute and complete one request.
    pub async fn run(&mut self, pipeline: &Pipeline, request: Request) -> Result<(), SessionError> {
        self.run_until_cancelled(pipeline, request, &CancellationToken::new())
            .await
    }

    /// Like [`Self::run`], abandoning the request if `cancel` fires.
    pub async fn run_until_cancelled(
        &mut self,
        pipeline: &Pipeline,
        request: Request,
        cancel: &CancellationToken,
    ) -> Result<(), SessionError> {
        let kind = request.kind();
        self.begin(kind)?;
        let result = pipeline.execute(request, cancel).await;
        self.complete(kind, result)
    }

    fn transition(&mut self, kind: TaskKind, to: ActionStatus) -> Result<(), SessionError> {
        let record = &mut self.actions[kind.index()];
        if !ActionStatus::is_valid_transition(record.status, to) {
            return Err(SessionError::InvalidTransition {
                kind,
                from: record.status,
                to,
            });
        }
        record.status = to;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Read views
    // -----------------------------------------------------------------------

    pub fn pantry(&self) -> &Slot<Parsed<PantryEntry>> {
        &self.pantry
    }

    pub fn meal_plan(&self) -> &Slot<Parsed<MealPlanEntry>> {
        &self.meal_plan
    }

    pub fn recipe(&self) -> &Slot<Recipe> {
        &self.recipe
    }

    pub fn macros(&self) -> &Slot<MacrosReport> {
        &self.macros
    }

    /// Pantry grouped for display; empty until a pantry has been generated.
    pub fn pantry_groups(&self) -> Vec<PantryGroup> {
        self.pantry
            .get()
            .map(|parsed| pivot::group_pantry(&parsed.rows))
            .unwrap_or_default()
    }

    /// The meal plan pivoted into a meal x weekday grid, if one exists.
    pub fn meal_grid(&self) -> Option<MealGrid> {
        self.meal_plan
            .get()
            .map(|parsed| pivot::pivot_meal_plan(&parsed.rows))
    }

    /// Selectable meal labels for recipe generation.
    pub fn meal_labels(&self) -> Vec<String> {
        self.meal_plan
            .get()
            .map(|parsed| pivot::meal_labels(&parsed.rows))
            .unwrap_or_default()
    }
}
