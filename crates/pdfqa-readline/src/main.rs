use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use rustyline::Editor;
use rustyline::error::ReadlineError;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use pdfqa_core::config::{BACKEND_URL_ENV, ClientConfig};
use pdfqa_core::{FormInputs, HandlerOutcome, QaController};
use pdfqa_infrastructure::ConfigStorage;
use pdfqa_interaction::HttpQaBackend;

mod command;
mod helper;
mod render;

use command::ReplCommand;
use helper::CliHelper;

#[derive(Parser)]
#[command(name = "pdfqa")]
#[command(about = "PDFQA - upload a PDF to a Q&A backend and ask questions about it", long_about = None)]
struct Cli {
    /// Backend base URL (overrides PDFQA_BACKEND_URL and the config file)
    #[arg(long)]
    backend_url: Option<String>,

    /// Path to config.toml (default: ~/.config/pdfqa/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log requests to stderr
    #[arg(short, long)]
    verbose: bool,

    /// PDF to select at startup
    file: Option<PathBuf>,
}

#[derive(Clone, Copy)]
enum Trigger {
    Upload,
    Ask,
    Health,
}

type Controller = QaController<HttpQaBackend>;

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(cli: &Cli) -> Result<ClientConfig> {
    let storage = match &cli.config {
        Some(path) => Some(ConfigStorage::with_path(path.clone())),
        None => match ConfigStorage::new() {
            Ok(storage) => Some(storage),
            Err(err) => {
                tracing::warn!(error = %err, "No config directory, using defaults");
                None
            }
        },
    };

    let config = match storage {
        Some(storage) => storage
            .load()
            .with_context(|| format!("Failed to load {}", storage.path().display()))?,
        None => ClientConfig::default(),
    };

    Ok(config.with_overrides(cli.backend_url.clone(), env::var(BACKEND_URL_ENV).ok()))
}

/// Runs a handler in the background so the prompt stays responsive.
///
/// Overlapping handlers are not ordered; whichever response lands last
/// determines what is displayed.
fn spawn_handler(controller: &Arc<Controller>, form: FormInputs, trigger: Trigger) {
    let controller = Arc::clone(controller);
    tokio::spawn(async move {
        let outcome = match trigger {
            Trigger::Upload => controller.upload(&form).await,
            Trigger::Ask => controller.ask(&form).await,
            Trigger::Health => controller.health(&form).await,
        };
        if let HandlerOutcome::Alert(message) = outcome {
            render::print_alert(&message);
        }
    });
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // ===== Backend Initialization =====
    let config = load_config(&cli)?;
    let backend = Arc::new(HttpQaBackend::from_config(&config)?);
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let controller = Arc::new(QaController::new(backend).with_events(events_tx));

    let mut form = FormInputs::new(config.backend_url.clone());
    form.selected_file = cli.file.clone();

    let renderer = tokio::spawn(render::render_events(events_rx));

    // ===== REPL Setup =====
    let mut rl = Editor::new()?;
    rl.set_helper(Some(CliHelper));

    println!("{}", "=== PDF Q&A ===".bright_magenta().bold());
    println!(
        "{}",
        format!("Backend: {}. Type '/help' for commands, 'quit' to exit.", form.backend_url)
            .bright_black()
    );
    println!();

    // ===== Main REPL Loop =====
    loop {
        match rl.readline(">> ") {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(&line);

                match ReplCommand::parse(&line) {
                    ReplCommand::Quit => {
                        println!("{}", "Goodbye!".bright_green());
                        break;
                    }
                    ReplCommand::SetUrl(url) => {
                        form.backend_url = url;
                        println!("{}", format!("Backend set to {}", form.backend_url).green());
                    }
                    ReplCommand::SelectFile(path) => {
                        println!("{}", format!("Selected {}", path.display()).green());
                        form.selected_file = Some(path);
                    }
                    ReplCommand::Upload(path) => {
                        if let Some(path) = path {
                            form.selected_file = Some(path);
                        }
                        spawn_handler(&controller, form.clone(), Trigger::Upload);
                    }
                    ReplCommand::Ask(question) => {
                        form.question = question;
                        spawn_handler(&controller, form.clone(), Trigger::Ask);
                    }
                    ReplCommand::Health => {
                        spawn_handler(&controller, form.clone(), Trigger::Health);
                    }
                    ReplCommand::Status => {
                        render::print_snapshot(&form, &controller.snapshot().await);
                    }
                    ReplCommand::Help => render::print_help(),
                    ReplCommand::MissingArgument(usage) => {
                        println!("{}", format!("Usage: {usage}").yellow());
                    }
                    ReplCommand::Unknown(name) => {
                        println!("{}", format!("Unknown command: {name}").bright_black());
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    // In-flight requests are abandoned, not cancelled server-side.
    renderer.abort();

    Ok(())
}
