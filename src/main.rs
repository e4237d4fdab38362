use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};

use journey_engine::journey::{Journey, Step};
use journey_engine::{codegen, editor, parser, selector};

#[derive(Parser)]
#[command(name = "journey-engine")]
#[command(version = "0.1.0")]
#[command(about = "Playwright journey import, editing and export engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a Playwright script into a journey JSON file
    Import {
        /// Path to the script file
        path: PathBuf,

        /// Journey display name
        #[arg(short, long)]
        name: String,

        /// Where to write the journey JSON (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Export a journey JSON file back to a runnable script
    Export {
        /// Path to the journey JSON file
        path: PathBuf,

        /// Where to write the script (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Replace one step's selector in a journey JSON file
    Edit {
        /// Path to the journey JSON file
        path: PathBuf,

        /// Step index (0-based)
        #[arg(short, long)]
        step: usize,

        /// New selector text in canonical form
        #[arg(short = 'S', long)]
        selector: String,
    },

    /// Print the canonical form of a selector
    Fmt {
        /// Selector text (raw CSS/XPath or a locator chain)
        selector: String,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Import { path, name, output } => import(&path, &name, output.as_deref()),
        Commands::Export { path, output } => export(&path, output.as_deref()),
        Commands::Edit {
            path,
            step,
            selector,
        } => edit(&path, step, &selector),
        Commands::Fmt { selector } => fmt(&selector),
    }
}

fn import(path: &Path, name: &str, output: Option<&Path>) -> Result<()> {
    let code = fs::read_to_string(path)
        .with_context(|| format!("Failed to read script: {}", path.display()))?;

    let journey = parser::import_journey(name, &code)?;
    print_steps(&journey);

    let json = serde_json::to_string_pretty(&journey)?;
    match output {
        Some(out) => {
            fs::write(out, json)
                .with_context(|| format!("Failed to write journey: {}", out.display()))?;
            println!(
                "{} imported {} steps into {}",
                "✓".green(),
                journey.steps.len(),
                out.display()
            );
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn export(path: &Path, output: Option<&Path>) -> Result<()> {
    let journey = read_journey(path)?;
    let code = codegen::generate_playwright_code(&journey);

    match output {
        Some(out) => {
            fs::write(out, &code)
                .with_context(|| format!("Failed to write script: {}", out.display()))?;
            println!("{} exported '{}' to {}", "✓".green(), journey.name, out.display());
        }
        None => print!("{code}"),
    }
    Ok(())
}

fn edit(path: &Path, step: usize, selector_text: &str) -> Result<()> {
    let mut journey = read_journey(path)?;

    match editor::edit_selector(&mut journey, step, selector_text) {
        Ok(locator) => {
            fs::write(path, serde_json::to_string_pretty(&journey)?)
                .with_context(|| format!("Failed to write journey: {}", path.display()))?;
            println!(
                "{} step {} selector is now {}",
                "✓".green(),
                step,
                selector::render(&locator).cyan()
            );
            Ok(())
        }
        Err(err) => {
            eprintln!("{} {}", "✗".red(), err);
            Err(err.into())
        }
    }
}

fn fmt(selector_text: &str) -> Result<()> {
    let locator = selector::parse(selector_text)?;
    println!("{}", selector::render(&locator));
    Ok(())
}

fn read_journey(path: &Path) -> Result<Journey> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read journey: {}", path.display()))?;
    serde_json::from_str(&json)
        .with_context(|| format!("Invalid journey JSON: {}", path.display()))
}

fn print_steps(journey: &Journey) {
    for action in &journey.steps {
        let label = match &action.step {
            Step::Unsupported(_) => action.step.name().yellow(),
            _ => action.step.name().cyan(),
        };
        let selector = action
            .step
            .selector()
            .map(selector::render)
            .unwrap_or_default();
        eprintln!("  {:>3}  {:<16} {}", action.source_order, label, selector);
    }
}
