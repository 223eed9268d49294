//! mbtree - Browse maildirs as a directory tree and message threads
//!
//! This is the main entry point for the mbtree terminal front-end.

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use log::{error, info};
use mblaze::{Executor, Mblaze, Settings};
use std::path::PathBuf;

mod app;
mod views;

use app::MbtreeApp;

#[derive(Parser, Debug)]
#[command(name = "mbtree", version, about = "Browse maildirs through mblaze")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Settings file to use instead of the one in the config directory
    #[arg(long, short, global = true, env = "MBTREE_CONFIG", value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Number of worker threads (defaults to settings, then one per CPU)
    #[arg(long, global = true, value_name = "N")]
    workers: Option<usize>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the directory tree with unseen/total counts
    Dirs {
        /// Maildir roots to scan (defaults to the configured roots)
        roots: Vec<String>,
    },
    /// List the message threads of a maildir
    List {
        /// Maildir path
        dir: String,
    },
    /// Show a message
    Show {
        /// Message file path
        path: String,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    // Bootstrap config directory
    if let Err(e) = config::init() {
        error!("Failed to initialize config directory: {}", e);
    }

    let cli = Cli::parse();

    let settings = Settings::load(cli.config.as_deref()).context("Failed to load settings")?;
    let workers = cli.workers.or(settings.workers);
    let executor = Executor::start(workers).context("Failed to start executor")?;
    let mut app = MbtreeApp::new(Mblaze::with_commands(settings.tools.clone()), executor);

    let result = run(&mut app, cli.command, cli.json, &settings);
    app.shutdown();
    result
}

fn run(app: &mut MbtreeApp, command: Command, json: bool, settings: &Settings) -> Result<()> {
    match command {
        Command::Dirs { roots } => {
            let roots = if roots.is_empty() {
                settings.roots.clone()
            } else {
                roots
            };
            if roots.is_empty() {
                let settings_path = Settings::default_settings_path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "settings.json".to_string());
                bail!(
                    "No maildir roots given. Pass them as arguments, set MBTREE_ROOTS, \
                     or set `roots` in {}",
                    settings_path
                );
            }

            let directories = app.load_directories(roots)?;
            info!("Loaded {} top-level directories", directories.len());
            app.load_counts(&directories);
            app.pump();

            let state = app.state().lock().unwrap();
            if json {
                let value = serde_json::json!({
                    "directories": directories,
                    "counts": state.counts,
                });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                print!("{}", views::render_directories(&directories, &state.counts));
            }
            // Counting failures are shown inline; they do not fail the listing
            for e in &state.errors {
                error!("{}", e);
            }
        }
        Command::List { dir } => {
            app.select_directory(&dir);
            app.pump();

            let state = app.state().lock().unwrap();
            if let Some(e) = state.errors.first() {
                bail!("Failed to list messages: {}", e);
            }
            let messages = state.messages.as_deref().unwrap_or_default();
            if json {
                println!("{}", serde_json::to_string_pretty(messages)?);
            } else {
                print!("{}", views::render_threads(messages));
            }
        }
        Command::Show { path } => {
            app.select_message(&path);
            app.pump();

            let state = app.state().lock().unwrap();
            if let Some(e) = state.errors.first() {
                bail!("Failed to show message: {}", e);
            }
            let body = state.body.as_deref().unwrap_or_default();
            if json {
                let value = serde_json::json!({ "path": path, "body": body });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                print!("{}", views::render_body(body));
            }
        }
    }
    Ok(())
}
