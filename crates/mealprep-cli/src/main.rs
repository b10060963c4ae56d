mod config;
mod generate_cmds;
mod render;
#[cfg(test)]
mod test_util;
mod tui;

use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use mealprep_core::llm::{GeneratorConfig, ProviderKind, create_generator};
use mealprep_core::pipeline::Pipeline;
use mealprep_core::session::Session;

use config::{MealPrepConfig, Overrides};

#[derive(Parser)]
#[command(
    name = "mealprep",
    version,
    about = "Turn a food list into a pantry, a weekly meal plan, recipes and macros"
)]
struct Cli {
    /// Generation provider: ollama or fake (overrides MEALPREP_PROVIDER)
    #[arg(long, global = true)]
    provider: Option<ProviderKind>,

    /// Model name (overrides MEALPREP_MODEL)
    #[arg(long, global = true)]
    model: Option<String>,

    /// Generation service URL (overrides MEALPREP_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Per-request timeout in seconds (overrides MEALPREP_TIMEOUT_SECS)
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            provider: self.provider,
            model: self.model.clone(),
            base_url: self.base_url.clone(),
            timeout_secs: self.timeout_secs,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Write a mealprep config file from the global flags
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Start an interactive session (the default)
    Session {
        /// Initial food items
        items: Vec<String>,
    },
    /// Categorize food items into food groups
    Pantry {
        /// Food items to categorize
        items: Vec<String>,
    },
    /// Create a Monday to Friday meal plan from food items
    Plan {
        /// Food items to plan with
        items: Vec<String>,
    },
    /// Create a recipe for one meal of a plan
    Recipe {
        /// Meal label, e.g. "Monday - Lunch - Chicken and rice bowl"
        meal: String,
    },
    /// Break a recipe down into macro-nutrients
    Macros {
        /// Read the recipe from a file instead of stdin
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

/// Execute the `mealprep init` command: write config file.
fn cmd_init(overrides: &Overrides, force: bool) -> anyhow::Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let cfg = config::ConfigFile {
        generator: config::GeneratorSection {
            provider: overrides.provider.unwrap_or(ProviderKind::Ollama),
            model: overrides
                .model
                .clone()
                .unwrap_or_else(|| GeneratorConfig::DEFAULT_MODEL.to_string()),
            base_url: overrides
                .base_url
                .clone()
                .unwrap_or_else(|| GeneratorConfig::DEFAULT_BASE_URL.to_string()),
            timeout_secs: overrides.timeout_secs,
        },
    };

    config::save_config(&cfg)?;

    println!("Config written to {}", path.display());
    println!("  generator.provider = {}", cfg.generator.provider);
    println!("  generator.model = {}", cfg.generator.model);
    println!("  generator.base_url = {}", cfg.generator.base_url);
    if let Some(secs) = cfg.generator.timeout_secs {
        println!("  generator.timeout_secs = {secs}");
    }

    Ok(())
}

/// Log to stderr for one-shot commands; the interactive session owns the
/// terminal, so it logs to a file instead.
fn init_tracing(interactive: bool) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if interactive {
        let path = config::log_path();
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create log directory {}", dir.display()))?;
        }
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("failed to open log file {}", path.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
    Ok(())
}

fn build_pipeline(overrides: &Overrides) -> anyhow::Result<Pipeline> {
    let resolved = MealPrepConfig::resolve(overrides)?;
    let generator =
        create_generator(&resolved.generator).context("failed to create text generator")?;
    Ok(Pipeline::new(generator))
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let overrides = cli.overrides();
    let command = cli.command.unwrap_or(Commands::Session { items: Vec::new() });

    init_tracing(matches!(command, Commands::Session { .. }))?;

    match command {
        Commands::Init { force } => {
            cmd_init(&overrides, force)?;
        }
        Commands::Session { items } => {
            let pipeline = build_pipeline(&overrides)?;
            tui::run_session(Session::with_foods(items), pipeline)?;
        }
        Commands::Pantry { items } => {
            let pipeline = build_pipeline(&overrides)?;
            generate_cmds::run_pantry(&pipeline, &items).await?;
        }
        Commands::Plan { items } => {
            let pipeline = build_pipeline(&overrides)?;
            generate_cmds::run_plan(&pipeline, &items).await?;
        }
        Commands::Recipe { meal } => {
            let pipeline = build_pipeline(&overrides)?;
            generate_cmds::run_recipe(&pipeline, &meal).await?;
        }
        Commands::Macros { file } => {
            let pipeline = build_pipeline(&overrides)?;
            generate_cmds::run_macros(&pipeline, file.as_deref()).await?;
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_means_session() {
        let cli = Cli::try_parse_from(["mealprep"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn global_flags_apply_to_subcommands() {
        let cli = Cli::try_parse_from([
            "mealprep",
            "pantry",
            "Rice",
            "Milk",
            "--provider",
            "fake",
            "--timeout-secs",
            "30",
        ])
        .unwrap();

        let overrides = cli.overrides();
        assert_eq!(overrides.provider, Some(ProviderKind::Fake));
        assert_eq!(overrides.timeout_secs, Some(30));
        match cli.command {
            Some(Commands::Pantry { items }) => assert_eq!(items, ["Rice", "Milk"]),
            _ => panic!("expected pantry command"),
        }
    }

    #[test]
    fn unknown_provider_is_rejected() {
        assert!(Cli::try_parse_from(["mealprep", "--provider", "openai"]).is_err());
    }
}
