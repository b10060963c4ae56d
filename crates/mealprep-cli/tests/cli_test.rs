//! Integration tests for the `mealprep` binary.
//!
//! Every test points `XDG_CONFIG_HOME` at a temporary directory and uses the
//! offline `fake` provider, so no model server is needed.

use std::io::Write;
use std::process::{Command, Output, Stdio};

fn mealprep(config_home: &tempfile::TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_mealprep"));
    cmd.env("XDG_CONFIG_HOME", config_home.path())
        .env_remove("MEALPREP_PROVIDER")
        .env_remove("MEALPREP_MODEL")
        .env_remove("MEALPREP_BASE_URL")
        .env_remove("MEALPREP_TIMEOUT_SECS")
        .env("RUST_LOG", "warn");
    cmd
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn pantry_without_items_is_an_error() {
    let home = tempfile::TempDir::new().unwrap();
    let output = mealprep(&home)
        .args(["--provider", "fake", "pantry", " "])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let err = stderr(&output);
    assert!(err.contains("add items to the food list"), "unexpected stderr: {err}");
}

#[test]
fn pantry_prints_grouped_table() {
    let home = tempfile::TempDir::new().unwrap();
    let output = mealprep(&home)
        .args(["--provider", "fake", "pantry", "Rice", "Chicken", "Milk"])
        .output()
        .unwrap();

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.starts_with("FOOD GROUP"), "unexpected stdout: {out}");
    assert!(out.contains("Grains"));
    assert!(out.contains("Protein/Meat"));
}

#[test]
fn plan_prints_grid_and_labels() {
    let home = tempfile::TempDir::new().unwrap();
    let output = mealprep(&home)
        .args(["--provider", "fake", "plan", "Rice", "Chicken"])
        .output()
        .unwrap();

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("MONDAY") && out.contains("FRIDAY"));
    assert!(out.contains("  1. Monday - Breakfast - Oatmeal with sliced banana"));
    assert!(out.contains(" 15. Friday - Dinner - Spinach and chicken risotto"));
}

#[test]
fn recipe_echoes_selected_meal() {
    let home = tempfile::TempDir::new().unwrap();
    let output = mealprep(&home)
        .args([
            "--provider",
            "fake",
            "recipe",
            "Monday - Lunch - Chicken and rice bowl",
        ])
        .output()
        .unwrap();

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.starts_with("Recipe for Monday - Lunch - Chicken and rice bowl"));
    assert!(out.contains("Ingredients:"));
}

#[test]
fn macros_reads_recipe_from_stdin() {
    let home = tempfile::TempDir::new().unwrap();
    let mut child = mealprep(&home)
        .args(["--provider", "fake", "macros"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"Ingredients:\n- 1 cup rice\n")
        .unwrap();
    let output = child.wait_with_output().unwrap();

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).starts_with("Macros per Serving:"));
}

#[test]
fn macros_with_empty_file_is_an_error() {
    let home = tempfile::TempDir::new().unwrap();
    let recipe = home.path().join("recipe.txt");
    std::fs::write(&recipe, "\n").unwrap();

    let output = mealprep(&home)
        .args(["--provider", "fake", "macros", "--file"])
        .arg(&recipe)
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(stderr(&output).contains("no recipe"));
}

#[test]
fn provider_can_come_from_env() {
    let home = tempfile::TempDir::new().unwrap();
    let output = mealprep(&home)
        .env("MEALPREP_PROVIDER", "fake")
        .args(["pantry", "Rice"])
        .output()
        .unwrap();

    assert!(output.status.success(), "stderr: {}", stderr(&output));
}

#[test]
fn init_writes_config_and_refuses_to_overwrite() {
    let home = tempfile::TempDir::new().unwrap();

    let output = mealprep(&home)
        .args(["--provider", "fake", "--model", "llama3", "init"])
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let written = std::fs::read_to_string(home.path().join("mealprep/config.toml")).unwrap();
    assert!(written.contains("provider = \"fake\""), "config: {written}");
    assert!(written.contains("model = \"llama3\""), "config: {written}");

    // The file now selects the fake provider for later commands.
    let output = mealprep(&home).args(["pantry", "Rice"]).output().unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let output = mealprep(&home).arg("init").output().unwrap();
    assert!(!output.status.success());
    assert!(stderr(&output).contains("already exists"));

    let output = mealprep(&home).args(["init", "--force"]).output().unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));
}
