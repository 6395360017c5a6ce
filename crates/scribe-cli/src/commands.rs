//! Slash commands for the interactive loop

use console::style;
use tokio_util::sync::CancellationToken;

use scribe_core::session::{DEFAULT_SESSION_NAME, SHORT_ID_LEN};
use scribe_core::{ProviderKind, SessionStore, ToolParams};

use crate::app::App;

/// What the loop should do after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

pub fn print_help() {
    println!("{}", style("Commands:").bold());
    let commands = [
        ("/help", "Show this help"),
        ("/clear", "Clear the current conversation"),
        ("/status", "Show provider, session and workspace"),
        ("/sessions", "List saved sessions"),
        ("/new [name]", "Start a new session"),
        ("/switch <provider>", "Switch provider (zhipu, deepseek)"),
        ("/switchsession <id>", "Switch to a saved session (id or prefix)"),
        ("/deletesession <id>", "Delete a saved session"),
        ("/config show|path|set <key> <value>", "Show or change configuration"),
        ("/init", "Analyze the workspace and show suggestions"),
        ("/exit, /quit", "Save and exit"),
    ];
    for (name, desc) in commands {
        println!("  {:<38} {}", style(name).cyan(), desc);
    }
}

pub async fn handle(app: &mut App, line: &str) -> Flow {
    let mut parts = line.split_whitespace();
    let command = parts.next().unwrap_or_default();
    let args: Vec<&str> = parts.collect();

    match command {
        "/help" => print_help(),
        "/exit" | "/quit" => return Flow::Exit,
        "/clear" => {
            app.store.current_mut().clear_messages();
            report(app.store.save_current().map(|_| "Conversation cleared".to_string()));
        }
        "/status" => print_status(app),
        "/sessions" => {
            let current = app.store.current().id.clone();
            print_sessions(&app.store, Some(&current));
        }
        "/new" => {
            let name = if args.is_empty() {
                DEFAULT_SESSION_NAME.to_string()
            } else {
                args.join(" ")
            };
            new_session(app, &name);
        }
        "/switch" => match args.first() {
            Some(name) => switch_provider(app, name),
            None => println!("{}", style("Usage: /switch <provider>").yellow()),
        },
        "/switchsession" => match args.first() {
            Some(id) => switch_session(app, id),
            None => println!("{}", style("Usage: /switchsession <id>").yellow()),
        },
        "/deletesession" => match args.first() {
            Some(id) => report(
                app.store
                    .delete(id)
                    .map(|id| format!("Deleted session {}", short(&id))),
            ),
            None => println!("{}", style("Usage: /deletesession <id>").yellow()),
        },
        "/config" => config_command(app, &args),
        "/init" => init_workspace(app).await,
        other => {
            println!(
                "{} {} (try /help)",
                style("Unknown command:").yellow(),
                other
            );
        }
    }
    Flow::Continue
}

fn print_status(app: &mut App) {
    let kind = app.client.active_kind();
    let model = app.client.active_model();
    let tools = app.runner.registry().len();
    let session = app.store.current();

    println!("{}", style("Status:").bold());
    println!("  Provider:  {} ({})", style(kind.display_name()).green(), model);
    println!(
        "  Session:   {} {}",
        style(session.short_id()).cyan(),
        session.name
    );
    println!("  Messages:  {}", session.messages.len());
    println!("  Tools:     {}", tools);
    println!("  Workspace: {}", app.workspace.display());
}

/// List stored sessions, marking `current` if given
pub fn print_sessions(store: &SessionStore, current: Option<&str>) {
    match store.list() {
        Ok(sessions) if sessions.is_empty() => {
            println!("  {}", style("No saved sessions").dim());
        }
        Ok(sessions) => {
            println!("{}", style("Sessions:").bold());
            for session in sessions {
                let marker = if current == Some(session.id.as_str()) { "*" } else { " " };
                println!(
                    "{} {}  {:<20} {:>4} messages  {}",
                    style(marker).green(),
                    style(session.short_id()).cyan(),
                    session.name,
                    session.messages.len(),
                    style(session.updated_at.format("%Y-%m-%d %H:%M")).dim()
                );
            }
        }
        Err(e) => println!("{}", style(format!("Error: {}", e)).red()),
    }
}

fn new_session(app: &mut App, name: &str) {
    if let Err(e) = app.store.save_current() {
        println!("{}", style(format!("Error saving session: {}", e)).red());
        return;
    }
    let session = app.store.create(name);
    let message = format!("Started session {} ({})", session.short_id(), session.name);
    report(app.store.save_current().map(|_| message));
}

fn switch_session(app: &mut App, id: &str) {
    if let Err(e) = app.store.save_current() {
        println!("{}", style(format!("Error saving session: {}", e)).red());
        return;
    }
    report(app.store.switch(id).map(|session| {
        format!(
            "Switched to session {} ({}, {} messages)",
            session.short_id(),
            session.name,
            session.messages.len()
        )
    }));
}

fn switch_provider(app: &mut App, name: &str) {
    let result = app.client.switch_provider(name).map(|_| {
        format!(
            "Switched to {} ({})",
            app.client.active_kind().display_name(),
            app.client.active_model()
        )
    });
    if result.is_err() {
        let known: Vec<&str> = ProviderKind::ALL.iter().map(|k| k.as_str()).collect();
        println!("  {}", style(format!("Known providers: {}", known.join(", "))).dim());
    }
    report(result);
}

fn config_command(app: &mut App, args: &[&str]) {
    match args {
        [] | ["show"] => crate::show_config(&app.workspace, &app.config),
        ["path"] => println!("{}", app.config.config_path().display()),
        ["set", key, value @ ..] if !value.is_empty() => {
            let value = value.join(" ");
            let result = app
                .config
                .set_value(key, &value)
                .and_then(|_| app.config.save())
                .map(|_| format!("Set {} (takes effect on next start)", key));
            report(result);
        }
        _ => println!(
            "{}",
            style("Usage: /config show | /config path | /config set <key> <value>").yellow()
        ),
    }
}

async fn init_workspace(app: &mut App) {
    let Some(tool) = app.runner.registry().get("get_smart_context") else {
        println!("{}", style("Environment tools are disabled").yellow());
        return;
    };
    match tool.execute(ToolParams::default(), CancellationToken::new()).await {
        Ok(text) => println!("{}", text),
        Err(e) => println!("{}", style(format!("Error: {}", e)).red()),
    }
}

fn report(result: scribe_core::Result<String>) {
    match result {
        Ok(message) => println!("{}", style(message).green()),
        Err(e) => println!("{}", style(format!("Error: {}", e)).red()),
    }
}

fn short(id: &str) -> &str {
    id.get(..SHORT_ID_LEN).unwrap_or(id)
}
