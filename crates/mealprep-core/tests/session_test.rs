//! Integration tests for session state: slot lifecycle, action
//! serialisation, data dependencies, and read-only views.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use mealprep_core::llm::{FakeGenerator, GenerateError};
use mealprep_core::models::Weekday;
use mealprep_core::pipeline::{Pipeline, PipelineError, TaskKind};
use mealprep_core::session::{ActionStatus, Session, SessionError};
use mealprep_test_utils::{ScriptedGenerator, categorization_completion, full_week_completion};

fn scripted(generator: ScriptedGenerator) -> (Arc<ScriptedGenerator>, Pipeline) {
    let generator = Arc::new(generator);
    let pipeline = Pipeline::new(generator.clone());
    (generator, pipeline)
}

#[tokio::test]
async fn full_session_with_sample_generator() {
    let pipeline = Pipeline::new(Arc::new(FakeGenerator::with_sample_responses()));
    let mut session = Session::with_foods(["Rice", "Chicken", "Banana", "Milk"]);

    let request = session.pantry_request().unwrap();
    session.run(&pipeline, request).await.unwrap();
    let groups = session.pantry_groups();
    assert!(!groups.is_empty());
    assert!(groups.windows(2).all(|w| w[0].count >= w[1].count));

    let request = session.meal_plan_request().unwrap();
    session.run(&pipeline, request).await.unwrap();
    let grid = session.meal_grid().unwrap();
    assert!(grid.is_complete());

    let labels = session.meal_labels();
    assert_eq!(labels.len(), 15);
    let request = session.recipe_request(&labels[1]).unwrap();
    session.run(&pipeline, request).await.unwrap();
    assert_eq!(session.recipe().get().unwrap().meal, labels[1]);

    let request = session.macros_request().unwrap();
    session.run(&pipeline, request).await.unwrap();
    assert_eq!(session.macros().get().unwrap().meal, labels[1]);

    for kind in TaskKind::ALL {
        assert_eq!(session.action(kind).status, ActionStatus::Done);
    }
}

#[tokio::test]
async fn regenerating_overwrites_the_slot() {
    let (_, pipeline) = scripted(
        ScriptedGenerator::new()
            .then_reply(categorization_completion(&[("Grains", "Rice")]))
            .then_reply(categorization_completion(&[
                ("Dairy", "Milk"),
                ("Dairy", "Cheese"),
            ])),
    );
    let mut session = Session::with_foods(["Rice", "Milk", "Cheese"]);

    let request = session.pantry_request().unwrap();
    session.run(&pipeline, request).await.unwrap();
    assert_eq!(session.pantry_groups()[0].food_group, "Grains");

    let request = session.pantry_request().unwrap();
    session.run(&pipeline, request).await.unwrap();
    let groups = session.pantry_groups();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].food_group, "Dairy");
    assert_eq!(groups[0].count, 2);
}

#[tokio::test]
async fn views_are_idempotent() {
    let (generator, pipeline) = scripted(
        ScriptedGenerator::new()
            .then_reply(categorization_completion(&[("Grains", "Rice")]))
            .then_reply(full_week_completion()),
    );
    let mut session = Session::with_foods(["Rice"]);
    let request = session.pantry_request().unwrap();
    session.run(&pipeline, request).await.unwrap();
    let request = session.meal_plan_request().unwrap();
    session.run(&pipeline, request).await.unwrap();

    let first = (session.pantry_groups(), session.meal_grid(), session.meal_labels());
    let second = (session.pantry_groups(), session.meal_grid(), session.meal_labels());
    assert_eq!(first, second);
    assert_eq!(generator.call_count(), 2);
}

#[tokio::test]
async fn failed_generation_keeps_previous_value() {
    let (_, pipeline) = scripted(
        ScriptedGenerator::new()
            .then_reply(categorization_completion(&[("Grains", "Rice")]))
            .then_fail(GenerateError::Api {
                status: 500,
                message: "model crashed".to_string(),
            }),
    );
    let mut session = Session::with_foods(["Rice"]);
    let request = session.pantry_request().unwrap();
    session.run(&pipeline, request).await.unwrap();
    let before = session.pantry().clone();

    let request = session.pantry_request().unwrap();
    let err = session.run(&pipeline, request).await.unwrap_err();

    assert!(matches!(
        err,
        SessionError::Action(PipelineError::Generation { .. })
    ));
    assert_eq!(session.pantry(), &before);
    let record = session.action(TaskKind::Pantry);
    assert_eq!(record.status, ActionStatus::Failed);
    assert!(record.error.as_deref().unwrap().contains("model crashed"));
}

#[tokio::test]
async fn failed_first_generation_leaves_slot_empty() {
    let (_, pipeline) = scripted(
        ScriptedGenerator::new().then_fail(GenerateError::Unavailable("refused".to_string())),
    );
    let mut session = Session::with_foods(["Rice"]);

    let request = session.pantry_request().unwrap();
    assert!(session.run(&pipeline, request).await.is_err());

    assert!(session.pantry().is_empty());
    assert!(session.pantry_groups().is_empty());
}

#[tokio::test]
async fn cancelled_run_returns_to_idle() {
    let (generator, pipeline) = scripted(ScriptedGenerator::new().then_hang());
    let mut session = Session::with_foods(["Rice"]);
    let cancel = CancellationToken::new();

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        trigger.cancel();
    });

    let request = session.pantry_request().unwrap();
    session
        .run_until_cancelled(&pipeline, request, &cancel)
        .await
        .unwrap();

    assert_eq!(generator.call_count(), 1);
    assert_eq!(session.action(TaskKind::Pantry).status, ActionStatus::Idle);
    assert!(session.pantry().is_empty());
    assert!(session.pending().is_none());
}

#[tokio::test]
async fn meal_plan_before_pantry_is_refused_without_calling_generator() {
    let (generator, pipeline) =
        scripted(ScriptedGenerator::new().then_reply(full_week_completion()));
    let mut session = Session::with_foods(["Rice"]);

    let request = session.meal_plan_request().unwrap();
    let err = session.run(&pipeline, request).await.unwrap_err();

    assert!(matches!(
        err,
        SessionError::MissingPrerequisite {
            kind: TaskKind::MealPlan,
            needs: TaskKind::Pantry
        }
    ));
    assert_eq!(generator.call_count(), 0);
}

#[tokio::test]
async fn empty_food_list_never_calls_generator() {
    let (generator, _) = scripted(ScriptedGenerator::new());
    let session = Session::with_foods(["", "   "]);

    assert!(matches!(
        session.pantry_request(),
        Err(PipelineError::EmptyFoodList)
    ));
    assert_eq!(generator.call_count(), 0);
}

#[tokio::test]
async fn meal_grid_reflects_partial_plan() {
    let (_, pipeline) = scripted(
        ScriptedGenerator::new()
            .then_reply(categorization_completion(&[("Grains", "Rice")]))
            .then_reply("Monday | Breakfast | Porridge\nMonday | Dinner\nTuesday | Lunch | Rice"),
    );
    let mut session = Session::with_foods(["Rice"]);
    let request = session.pantry_request().unwrap();
    session.run(&pipeline, request).await.unwrap();
    let request = session.meal_plan_request().unwrap();
    session.run(&pipeline, request).await.unwrap();

    let grid = session.meal_grid().unwrap();
    assert_eq!(grid.cell("Breakfast", Weekday::Monday), Some("Porridge"));
    assert_eq!(grid.cell("Lunch", Weekday::Tuesday), Some("Rice"));
    assert_eq!(grid.cell("Dinner", Weekday::Monday), None);
    assert!(!grid.is_complete());
    assert_eq!(session.meal_plan().get().unwrap().errors.len(), 1);
}
