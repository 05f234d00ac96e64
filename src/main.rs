//! folio-chat — terminal front end for the portfolio chat widget.
//!
//! Startup sequence:
//!   1. Load .env (if present)
//!   2. Load config
//!   3. Resolve effective log level (CLI `-v` flags > env > config)
//!   4. Init logger once
//!   5. Build knowledge base, backend, dispatcher
//!   6. Run the requested mode: console (default), `ask`, or `health`

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use folio_chat::backend;
use folio_chat::chat::{ChatSession, Dispatcher};
use folio_chat::config::{self, Config};
use folio_chat::console::{ConsoleView, run_console};
use folio_chat::error::AppError;
use folio_chat::knowledge::KnowledgeBase;
use folio_chat::logger;
use folio_chat::render;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    // Load .env if present — ignore errors (file is optional).
    let _ = dotenvy::dotenv();

    let args = parse_cli_args();

    let config = config::load(args.config_path.as_deref())?;

    let effective_log_level = args.log_level.unwrap_or(config.log_level.as_str());
    logger::init(effective_log_level, args.log_level.is_some())?;

    info!(
        endpoint = %config.backend.endpoint,
        provider = %config.backend.provider,
        timeout_ms = config.backend.timeout.as_millis() as u64,
        knowledge = ?config.knowledge_path,
        "config loaded"
    );

    let dispatcher = Arc::new(build_dispatcher(&config)?);

    match args.mode {
        Mode::Console => {
            let shutdown = CancellationToken::new();
            let ctrlc_token = shutdown.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    info!("ctrl-c received — shutting down");
                    ctrlc_token.cancel();
                }
            });

            let view = Arc::new(ConsoleView::new(config.assistant_name.clone()));
            let session = ChatSession::new(dispatcher, view.clone());
            run_console(session, view, shutdown).await
        }
        Mode::Ask(message) => {
            match dispatcher.respond(&message).await {
                Some(reply) => println!("{}", render::render_answer(&reply.text).to_terminal()),
                None => eprintln!("nothing to ask — message is empty"),
            }
            Ok(())
        }
        Mode::Health => {
            let health = dispatcher.backend().health().await?;
            println!(
                "✓ backend {}: status={} rag_initialized={}",
                config.backend.health_url, health.status, health.rag_initialized
            );
            Ok(())
        }
    }
}

fn build_dispatcher(config: &Config) -> Result<Dispatcher, AppError> {
    let knowledge = match &config.knowledge_path {
        Some(path) => KnowledgeBase::from_toml_file(path)?,
        None => KnowledgeBase::builtin(),
    };
    info!(
        topics = knowledge.topics().count(),
        rules = knowledge.rules().len(),
        "knowledge base ready"
    );

    let backend = backend::build(&config.backend)?;
    Ok(Dispatcher::new(Arc::new(knowledge), backend, config.backend.timeout))
}

// ── CLI ───────────────────────────────────────────────────────────────────────

enum Mode {
    Console,
    Ask(String),
    Health,
}

struct CliArgs {
    log_level: Option<&'static str>,
    config_path: Option<String>,
    mode: Mode,
}

fn parse_cli_args() -> CliArgs {
    let mut verbosity = 0u8;
    let mut config_path = None;
    let mut positional: Vec<String> = Vec::new();

    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        if arg == "--" {
            positional.extend(iter.by_ref());
            break;
        }

        match arg.as_str() {
            "-h" | "--help" => {
                println!("Usage: folio-chat [OPTIONS] [COMMAND]");
                println!();
                println!("Commands:");
                println!("  (none)                     Interactive console chat");
                println!("  ask <MESSAGE>...           Answer one message and exit");
                println!("  health                     Probe the backend health endpoint");
                println!();
                println!("Options:");
                println!("  -h, --help                 Print help");
                println!("  -f, --config <PATH>        Path to configuration file (default: config/default.toml)");
                println!("  -v, -vv, -vvv, -vvvv       Increase logging verbosity");
                std::process::exit(0);
            }
            "-f" | "--config" => {
                if let Some(path) = iter.next() {
                    config_path = Some(path);
                } else {
                    eprintln!("error: -f/--config requires a path argument");
                    std::process::exit(1);
                }
            }
            "--verbose" => verbosity = verbosity.saturating_add(1),
            a if a.starts_with('-') && a.len() > 1 && a.chars().skip(1).all(|c| c == 'v') => {
                verbosity = verbosity.saturating_add((a.len() - 1) as u8);
            }
            _ => positional.push(arg),
        }
    }

    //   -v      → warn
    //   -vv     → info
    //   -vvv    → debug
    //   -vvvv+  → trace
    let log_level = match verbosity {
        0 => None,
        1 => Some("warn"),
        2 => Some("info"),
        3 => Some("debug"),
        _ => Some("trace"),
    };

    let mode = match positional.first().map(String::as_str) {
        None => Mode::Console,
        Some("health") => Mode::Health,
        Some("ask") => Mode::Ask(positional[1..].join(" ")),
        Some(other) => {
            eprintln!("error: unknown command '{other}' (try --help)");
            std::process::exit(1);
        }
    };

    CliArgs { log_level, config_path, mode }
}
