//! TUI application state and actions.

use std::time::Duration;

use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use mealprep_core::pipeline::{Outcome, Pipeline, PipelineError, Request, TaskKind};
use mealprep_core::session::{Session, SessionError};

/// Warning shown when there is nothing to generate from.
pub const EMPTY_FOODS_WARNING: &str = "Add items to the food list.";

/// Which view the TUI is currently showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Dashboard,
    Help,
}

/// Which list `j`/`k` move through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Foods,
    Meals,
}

/// A generation running on a spawned task.
struct PendingAction {
    kind: TaskKind,
    cancel: CancellationToken,
    result: oneshot::Receiver<Result<Outcome, PipelineError>>,
}

/// Application state for the TUI.
pub struct App {
    pub session: Session,
    pipeline: Pipeline,
    pub current_view: View,
    pub focus: Focus,
    pub selected_food: usize,
    pub selected_meal: usize,
    /// Text typed so far while adding a food item.
    pub input: Option<String>,
    pub tick_rate: Duration,
    pub should_quit: bool,
    pub status_message: Option<String>,
    pending: Option<PendingAction>,
}

impl App {
    pub fn new(session: Session, pipeline: Pipeline) -> Self {
        Self {
            session,
            pipeline,
            current_view: View::Dashboard,
            focus: Focus::Foods,
            selected_food: 0,
            selected_meal: 0,
            input: None,
            tick_rate: Duration::from_millis(250),
            should_quit: false,
            status_message: None,
            pending: None,
        }
    }

    /// The generation in flight, if any.
    pub fn pending_kind(&self) -> Option<TaskKind> {
        self.pending.as_ref().map(|p| p.kind)
    }

    // -- Generation --

    /// Start generating `kind` in the background.
    pub fn start(&mut self, kind: TaskKind) {
        let request = match self.request_for(kind) {
            Ok(request) => request,
            Err(PipelineError::EmptyFoodList) => {
                self.status_message = Some(EMPTY_FOODS_WARNING.to_string());
                return;
            }
            Err(e) => {
                self.status_message = Some(format!("Cannot generate {kind}: {e}"));
                return;
            }
        };

        if let Err(e) = self.session.begin(kind) {
            self.status_message = Some(match e {
                SessionError::MissingPrerequisite { needs, .. } => {
                    format!("Generate a {needs} first.")
                }
                other => other.to_string(),
            });
            return;
        }

        let cancel = CancellationToken::new();
        let (tx, rx) = oneshot::channel();
        let pipeline = self.pipeline.clone();
        let token = cancel.clone();
        tokio::spawn(async move {
            let result = pipeline.execute(request, &token).await;
            let _ = tx.send(result);
        });

        self.pending = Some(PendingAction {
            kind,
            cancel,
            result: rx,
        });
    }

    fn request_for(&self, kind: TaskKind) -> Result<Request, PipelineError> {
        match kind {
            TaskKind::Pantry => self.session.pantry_request(),
            TaskKind::MealPlan => self.session.meal_plan_request(),
            TaskKind::Recipe => {
                let label = self.selected_meal_label().unwrap_or_default();
                self.session.recipe_request(&label)
            }
            TaskKind::Macros => self.session.macros_request(),
        }
    }

    /// Collect the result of the pending generation if it has finished.
    pub fn poll_pending(&mut self) {
        let Some(pending) = self.pending.as_mut() else {
            return;
        };
        let kind = pending.kind;
        let result = match pending.result.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Closed) => {
                warn!(%kind, "generation task ended without a result");
                Err(PipelineError::Cancelled(kind))
            }
        };
        self.pending = None;

        let cancelled = matches!(result, Err(PipelineError::Cancelled(_)));
        let dropped = result
            .as_ref()
            .map(|outcome| outcome.line_errors().len())
            .unwrap_or(0);

        match self.session.complete(kind, result) {
            Ok(()) if cancelled => {
                self.status_message = Some(format!("Cancelled {kind} generation."));
            }
            Ok(()) if dropped > 0 => {
                self.status_message = Some(format!(
                    "Generated {kind}; dropped {dropped} malformed line(s)."
                ));
            }
            Ok(()) => {
                self.status_message = Some(format!("Generated {kind}."));
            }
            Err(e) => {
                self.status_message = Some(format!("{kind} failed: {e}"));
            }
        }
        self.clamp_selections();
    }

    /// Ask the pending generation to stop. Returns `false` if none is running.
    pub fn cancel_pending(&mut self) -> bool {
        match &self.pending {
            Some(pending) => {
                pending.cancel.cancel();
                true
            }
            None => false,
        }
    }

    // -- Food list editing --

    pub fn start_input(&mut self) {
        self.input = Some(String::new());
    }

    pub fn push_input(&mut self, c: char) {
        if let Some(input) = self.input.as_mut() {
            input.push(c);
        }
    }

    pub fn pop_input(&mut self) {
        if let Some(input) = self.input.as_mut() {
            input.pop();
        }
    }

    pub fn cancel_input(&mut self) {
        self.input = None;
    }

    /// Add the typed item to the food list. Blank input is discarded.
    pub fn submit_input(&mut self) {
        let Some(input) = self.input.take() else {
            return;
        };
        let item = input.trim();
        if item.is_empty() {
            return;
        }
        self.session.add_food(item);
        self.selected_food = self.session.foods().len() - 1;
        self.focus = Focus::Foods;
    }

    pub fn delete_selected_food(&mut self) {
        if self.session.remove_food(self.selected_food).is_some() {
            self.clamp_selections();
        }
    }

    // -- Navigation --

    pub fn selected_meal_label(&self) -> Option<String> {
        self.session.meal_labels().get(self.selected_meal).cloned()
    }

    pub fn navigate_back(&mut self) {
        match self.current_view {
            View::Help => self.current_view = View::Dashboard,
            View::Dashboard => {
                if self.cancel_pending() {
                    self.status_message = Some("Cancelling...".to_string());
                }
            }
        }
    }

    pub fn quit(&mut self) {
        self.cancel_pending();
        self.should_quit = true;
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Foods => Focus::Meals,
            Focus::Meals => Focus::Foods,
        };
    }

    pub fn show_help(&mut self) {
        self.current_view = View::Help;
    }

    pub fn move_up(&mut self) {
        match self.focus {
            Focus::Foods => {
                if self.selected_food > 0 {
                    self.selected_food -= 1;
                }
            }
            Focus::Meals => {
                if self.selected_meal > 0 {
                    self.selected_meal -= 1;
                }
            }
        }
    }

    pub fn move_down(&mut self) {
        match self.focus {
            Focus::Foods => {
                let len = self.session.foods().len();
                if len > 0 && self.selected_food < len - 1 {
                    self.selected_food += 1;
                }
            }
            Focus::Meals => {
                let len = self.session.meal_labels().len();
                if len > 0 && self.selected_meal < len - 1 {
                    self.selected_meal += 1;
                }
            }
        }
    }

    fn clamp_selections(&mut self) {
        let foods = self.session.foods().len();
        if self.selected_food >= foods {
            self.selected_food = foods.saturating_sub(1);
        }
        let meals = self.session.meal_labels().len();
        if self.selected_meal >= meals {
            self.selected_meal = meals.saturating_sub(1);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
