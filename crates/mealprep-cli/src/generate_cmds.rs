//! One-shot generation commands: `pantry`, `plan`, `recipe`, `macros`.
//!
//! Each command runs a single request through the pipeline and prints the
//! result as plain text. Ctrl-C cancels the request in flight.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use tokio_util::sync::CancellationToken;

use mealprep_core::models::{FoodList, Recipe};
use mealprep_core::pipeline::{Outcome, Pipeline, Request};
use mealprep_core::pivot::{group_pantry, meal_labels, pivot_meal_plan};

use crate::render;

/// A token cancelled when the user presses Ctrl-C.
fn cancel_on_ctrl_c() -> CancellationToken {
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            trigger.cancel();
        }
    });
    cancel
}

async fn execute(pipeline: &Pipeline, request: Request) -> Result<Outcome> {
    let kind = request.kind();
    let cancel = cancel_on_ctrl_c();
    let outcome = pipeline
        .execute(request, &cancel)
        .await
        .with_context(|| format!("{kind} generation did not complete"))?;

    let dropped = outcome.line_errors().len();
    if dropped > 0 {
        eprintln!("warning: dropped {dropped} malformed line(s) from the {kind} completion");
    }
    Ok(outcome)
}

/// `mealprep pantry ITEMS...`
pub async fn run_pantry(pipeline: &Pipeline, items: &[String]) -> Result<()> {
    let request = Request::pantry(FoodList::new(items))?;
    let Outcome::Pantry(parsed) = execute(pipeline, request).await? else {
        bail!("unexpected outcome for pantry request");
    };

    print!("{}", render::pantry_table(&group_pantry(&parsed.rows)));
    Ok(())
}

/// `mealprep plan ITEMS...`
pub async fn run_plan(pipeline: &Pipeline, items: &[String]) -> Result<()> {
    let request = Request::meal_plan(FoodList::new(items))?;
    let Outcome::MealPlan(parsed) = execute(pipeline, request).await? else {
        bail!("unexpected outcome for meal plan request");
    };

    print!("{}", render::meal_grid_table(&pivot_meal_plan(&parsed.rows)));
    let labels = meal_labels(&parsed.rows);
    if !labels.is_empty() {
        println!();
        println!("Meals (pass one to `mealprep recipe`):");
        print!("{}", render::label_list(&labels));
    }
    Ok(())
}

/// `mealprep recipe "<Day> - <Meal> - <Suggestion>"`
pub async fn run_recipe(pipeline: &Pipeline, meal: &str) -> Result<()> {
    let request = Request::recipe(meal)?;
    let Outcome::Recipe(recipe) = execute(pipeline, request).await? else {
        bail!("unexpected outcome for recipe request");
    };

    println!("Recipe for {}", recipe.meal);
    println!();
    println!("{}", recipe.text);
    Ok(())
}

/// `mealprep macros [--file PATH]`, reading the recipe from stdin when no
/// file is given.
pub async fn run_macros(pipeline: &Pipeline, file: Option<&Path>) -> Result<()> {
    let text = match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read recipe from {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read recipe from stdin")?;
            buf
        }
    };

    let recipe = Recipe {
        meal: file
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "stdin".to_string()),
        text,
    };
    let request = Request::macros(recipe)?;
    let Outcome::Macros(report) = execute(pipeline, request).await? else {
        bail!("unexpected outcome for macros request");
    };

    println!("{}", report.text);
    Ok(())
}
