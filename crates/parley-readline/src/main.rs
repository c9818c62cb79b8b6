use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use rustyline::Editor;
use tracing_subscriber::EnvFilter;

use parley_core::gate::{AttachOutcome, SubmitOutcome};
use parley_core::WidgetConfig;
use parley_interaction::ChatWidget;

mod commands;
mod helper;
mod terminal_sink;

use commands::{Command, load_attachment};
use helper::CliHelper;
use terminal_sink::TerminalSink;

#[derive(Parser)]
#[command(name = "parley")]
#[command(about = "Parley - chat with a remote assistant service from the terminal", long_about = None)]
struct Cli {
    /// Configuration file (defaults to ~/.config/parley/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Overrides the backend base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Overrides the image-analysis endpoint
    #[arg(long)]
    vision_url: Option<String>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("parley=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn print_help() {
    println!("{}", "Commands:".bright_yellow());
    println!("  {}", "<text>            send a message".bright_black());
    println!("  {}", "/image <path>     attach an image to the next message".bright_black());
    println!("  {}", "/remove           discard the attached image".bright_black());
    println!("  {}", "/clear            forget the conversation context".bright_black());
    println!("  {}", "/history          show the retained turns".bright_black());
    println!("  {}", "/open /close /toggle   chat window".bright_black());
    println!("  {}", "quit | exit       leave".bright_black());
}

/// Runs one command against the widget. Returns `false` when the REPL
/// should stop.
async fn dispatch(widget: &Arc<ChatWidget>, command: Command) -> bool {
    match command {
        Command::Quit => return false,
        Command::Send(text) => {
            // Submissions run in the background so the prompt stays usable
            // while a reply is pending.
            let widget = Arc::clone(widget);
            tokio::spawn(async move {
                match widget.submit(&text).await {
                    SubmitOutcome::Busy => println!(
                        "{}",
                        "Aguardando a resposta anterior...".bright_black()
                    ),
                    SubmitOutcome::Failed(err) => {
                        tracing::debug!("Turn failed: {}", err);
                    }
                    SubmitOutcome::Replied | SubmitOutcome::Empty => {}
                }
            });
        }
        Command::Attach(path) => match load_attachment(&path).await {
            Ok(attachment) => {
                if widget.attach(attachment).await == AttachOutcome::Replaced {
                    println!("{}", "Imagem anterior substituída.".bright_black());
                }
            }
            Err(err) => eprintln!("{}", format!("Error: {:#}", err).red()),
        },
        Command::Remove => {
            if !widget.detach_pending().await {
                println!("{}", "Nenhuma imagem anexada.".bright_black());
            }
        }
        Command::Clear => widget.clear_memory().await,
        Command::History => {
            for turn in widget.history().await {
                println!(
                    "{} {}",
                    format!("[{}]", turn.role).bright_magenta(),
                    turn.content
                );
            }
        }
        Command::Open => widget.open().await,
        Command::Close => widget.close().await,
        Command::Toggle => {
            widget.toggle().await;
        }
        Command::Help => print_help(),
        Command::Unknown(line) => {
            println!("{}", format!("Unknown command: {}", line).bright_black());
        }
    }
    true
}

/// Terminal host for the chat widget.
///
/// Loads configuration, constructs the widget with an HTTP transport and a
/// terminal sink, then feeds REPL lines to it until the user quits.
#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut config = WidgetConfig::load(cli.config.as_deref())?;
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }
    if let Some(vision_url) = cli.vision_url {
        config.vision_url = Some(vision_url);
    }

    let sink = Arc::new(TerminalSink::new());
    let widget = Arc::new(ChatWidget::with_http(&config, sink)?);
    tracing::info!("Chat endpoint: {}", config.chat_url());

    let mut rl = Editor::new()?;
    rl.set_helper(Some(CliHelper::new()));

    println!("{}", "=== Parley ===".bright_magenta().bold());
    println!(
        "{}",
        "Type a message, '/help' for commands, or 'quit' to exit.".bright_black()
    );
    println!();
    widget.open().await;

    loop {
        match rl.readline(">> ") {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = rl.add_history_entry(line.as_str());
                }
                if !dispatch(&widget, Command::parse(&line)).await {
                    println!("{}", "Goodbye!".bright_green());
                    break;
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    widget.close().await;
    Ok(())
}
