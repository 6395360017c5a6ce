//! Scribe CLI - interactive AI assistant with local tools
//!
//! Wires the core components together once and drives them from a
//! readline loop, a one-shot prompt, or one of the listing subcommands.

mod app;
mod commands;
mod interrupt;
mod progress;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use console::style;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::warn;

use scribe_core::{ConfigManager, Error, ProviderKind, SessionStore};

use app::App;
use commands::Flow;

#[derive(Parser)]
#[command(name = "scribe")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Interactive AI assistant with file, search and shell tools", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Workspace directory
    #[arg(short, long, default_value = ".")]
    workspace: PathBuf,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// LLM provider (zhipu, deepseek) - defaults to config setting
    #[arg(short, long)]
    provider: Option<String>,

    /// Execute a single prompt and exit (non-interactive mode)
    #[arg(long)]
    one_shot: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive chat mode
    Chat,

    /// Show available tools
    Tools,

    /// Show or change configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigCommands>,
    },

    /// List saved sessions
    Sessions,
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the effective configuration
    Show,

    /// Print the config file path
    Path,

    /// Set a value, e.g. `deepseek.api_key sk-...`
    Set { key: String, value: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // warn by default so logs do not interleave with the prompt
    tracing_subscriber::fmt()
        .with_env_filter(if cli.verbose {
            "info,scribe_core=debug"
        } else {
            "warn"
        })
        .with_writer(std::io::stderr)
        .init();

    let workspace = resolve_workspace(&cli.workspace);

    let config = ConfigManager::new()?;
    if config.init()? {
        println!(
            "{} {}",
            style("Created default configuration at").dim(),
            style(config.config_path().display()).cyan()
        );
    }

    if let Some(prompt) = cli.one_shot {
        return run_one_shot(workspace, config, cli.provider.as_deref(), &prompt).await;
    }

    match cli.command {
        Some(Commands::Chat) | None => run_chat(workspace, config, cli.provider.as_deref()).await?,
        Some(Commands::Tools) => show_tools(&workspace, &config),
        Some(Commands::Config { action }) => handle_config_command(&workspace, config, action)?,
        Some(Commands::Sessions) => {
            let store = SessionStore::new(config.sessions_dir(), &workspace)?;
            commands::print_sessions(&store, None);
        }
    }

    Ok(())
}

/// Canonical workspace path without the Windows UNC prefix
fn resolve_workspace(path: &Path) -> PathBuf {
    dunce::canonicalize(path).unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()
                .map(|cwd| cwd.join(path))
                .unwrap_or_else(|_| path.to_path_buf())
        }
    })
}

/// Build the app, or explain how to configure a provider
fn connect(workspace: PathBuf, config: ConfigManager, provider: Option<&str>) -> anyhow::Result<Option<App>> {
    match App::new(workspace, config, provider) {
        Ok(app) => Ok(Some(app)),
        Err(e) => match e.downcast_ref::<Error>() {
            Some(Error::Config(message)) => {
                show_setup_instructions(message);
                Ok(None)
            }
            _ => Err(e),
        },
    }
}

/// Run a single prompt non-interactively (for scripting/testing)
async fn run_one_shot(
    workspace: PathBuf,
    config: ConfigManager,
    provider: Option<&str>,
    prompt: &str,
) -> anyhow::Result<()> {
    let Some(mut app) = connect(workspace, config, provider)? else {
        return Ok(());
    };
    app.store.create("one-shot");

    let result = app.run_turn(prompt).await;
    app.shutdown();

    let answer = result?;
    println!("{}", answer);
    Ok(())
}

async fn run_chat(workspace: PathBuf, config: ConfigManager, provider: Option<&str>) -> anyhow::Result<()> {
    let Some(mut app) = connect(workspace, config, provider)? else {
        return Ok(());
    };

    let ui = app.config.config().ui.clone();
    let history_path = app.config.history_path();
    let editor_config = rustyline::Config::builder()
        .max_history_size(ui.max_history)?
        .auto_add_history(true)
        .build();
    let mut editor = DefaultEditor::with_config(editor_config)?;
    if history_path.exists() {
        if let Err(e) = editor.load_history(&history_path) {
            warn!("Failed to load history: {}", e);
        }
    }

    // Checkpoint: the session exists on disk from the start
    app.store.current_mut();
    app.store.save_current()?;

    if ui.show_welcome {
        print_welcome(&mut app);
    }

    loop {
        let line = match editor.readline(&format!("{} ", style(">").cyan().bold())) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => {
                warn!("Readline error: {}", e);
                break;
            }
        };

        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        if input.starts_with('/') {
            if commands::handle(&mut app, input).await == Flow::Exit {
                break;
            }
            continue;
        }

        match app.run_turn(input).await {
            Ok(answer) => {
                println!();
                println!("{}", answer);
                println!();
            }
            Err(Error::Cancelled) => println!("{}", style("Cancelled").yellow()),
            Err(e) => println!("{}", style(format!("Error: {}", e)).red()),
        }
    }

    if let Err(e) = editor.save_history(&history_path) {
        warn!("Failed to save history: {}", e);
    }
    app.shutdown();
    println!("{}", style("Goodbye!").dim());
    Ok(())
}

fn print_welcome(app: &mut App) {
    let kind = app.client.active_kind();
    let model = app.client.active_model();
    let session = app.store.current();

    println!("{}", style("Scribe").bold().cyan());
    println!(
        "  {} {} ({})",
        style("Provider:").dim(),
        kind.display_name(),
        model
    );
    println!(
        "  {} {} {}",
        style("Session:").dim(),
        session.short_id(),
        session.name
    );
    println!("  {} {}", style("Workspace:").dim(), app.workspace.display());
    println!(
        "  {}",
        style("Type /help for commands, Ctrl-C cancels a running turn, Ctrl-D exits").dim()
    );
    println!();
}

fn show_tools(workspace: &Path, config: &ConfigManager) {
    let registry = app::standalone_registry(workspace, config);
    let mut definitions = registry.definitions();
    definitions.sort_by(|a, b| a.name.cmp(&b.name));

    println!("{}", style("Available Tools:").bold());
    println!();
    for def in definitions {
        let summary = def.description.lines().next().unwrap_or_default();
        println!("  {:<24} {}", style(&def.name).cyan(), summary);
    }
}

pub(crate) fn show_config(workspace: &Path, config: &ConfigManager) {
    let settings = config.config();
    let active = config.active_provider();

    println!("{}", style("Configuration:").bold());
    println!();
    println!("  Workspace:   {}", style(workspace.display()).green());
    println!("  Config file: {}", style(config.config_path().display()).dim());
    println!("  Provider:    {}", style(&active).green());
    println!("  Max tokens:  {}", settings.ai.max_tokens);
    println!("  Temperature: {}", settings.ai.temperature);
    println!(
        "  Retries:     {} (backoff {}ms)",
        settings.session.max_retries, settings.session.retry_backoff_ms
    );
    println!("  Tool timeout: {}s", settings.session.tool_timeout_secs);
    println!();

    for kind in ProviderKind::ALL {
        let name = kind.as_str();
        let Some(entry) = config.provider(name) else {
            continue;
        };
        let key_status = if config.has_api_key_for(name) {
            style("configured").green()
        } else {
            style("missing").red()
        };
        println!("  {}", style(kind.display_name()).bold());
        println!("    Model:    {}", entry.model_name().unwrap_or(kind.default_model()));
        println!("    Base URL: {}", entry.endpoint().unwrap_or(kind.default_base_url()));
        println!("    API key:  {}", key_status);
    }
}

fn handle_config_command(
    workspace: &Path,
    mut config: ConfigManager,
    action: Option<ConfigCommands>,
) -> anyhow::Result<()> {
    match action {
        None | Some(ConfigCommands::Show) => show_config(workspace, &config),
        Some(ConfigCommands::Path) => println!("{}", config.config_path().display()),
        Some(ConfigCommands::Set { key, value }) => {
            config.set_value(&key, &value)?;
            config.save()?;
            println!("{}", style(format!("Set {}", key)).green());
        }
    }
    Ok(())
}

/// Show setup instructions when no API key is configured
fn show_setup_instructions(message: &str) {
    println!("{}", style("Setup Required").bold().yellow());
    println!("{}", message);
    println!();

    println!("{}", style("Option 1: Environment Variable (Quick)").bold());
    for kind in ProviderKind::ALL {
        println!("  export {}=\"your-api-key-here\"", style(kind.api_key_env()).cyan());
    }
    println!();

    println!("{}", style("Option 2: Config File (Persistent)").bold());
    println!("  scribe config set zhipu.api_key <KEY>");
    println!("  scribe config set ai.provider deepseek");
    println!();
    println!("For more help: {}", style("scribe --help").cyan());
}
