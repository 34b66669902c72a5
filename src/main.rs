use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use chat_connect_four::bot::Bot;
use chat_connect_four::config::AppConfig;
use chat_connect_four::store::GameStore;
use chat_connect_four::transport::{parse_update, ConsoleTransport};

/// Run the Connect Four chat bot against a line-based console transport.
///
/// Each input line is `<chat> <name>[@username] <text>`, where text is a
/// command such as `/start` or `/show`, or `press <column> [#<message>]`.
#[derive(Parser)]
#[command(name = "connect_four_bot", about = "Connect Four chat bot")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, default_value = "connect_four.toml")]
    config: PathBuf,

    /// Write outgoing messages as JSON lines
    #[arg(long)]
    json: bool,

    /// Print the default configuration as TOML and exit
    #[arg(long)]
    print_default_config: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.print_default_config {
        print!("{}", AppConfig::default_toml().context("serializing default config")?);
        return Ok(());
    }

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;
    if cli.json {
        config.console.json = true;
    }

    // Logs go to stderr; stdout carries the chat transcript
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter)),
        )
        .with_writer(io::stderr)
        .init();

    let transport = ConsoleTransport::new(io::stdout(), config.console.json);
    let store = Arc::new(GameStore::new());
    let bot = Bot::new(transport, store, config.rules, config.bot.clone());
    info!(
        config = %cli.config.display(),
        config_found = cli.config.exists(),
        detect_draws = config.rules.detect_draws,
        "bot ready"
    );

    for line in io::stdin().lock().lines() {
        let line = line.context("reading update from stdin")?;
        let update = match parse_update(&line) {
            Ok(Some(update)) => update,
            Ok(None) => continue,
            Err(err) => {
                warn!(error = %err, "skipping input line");
                continue;
            }
        };
        if let Err(err) = bot.handle(&update) {
            error!(chat = %update.chat(), error = %err, "update failed");
        }
    }

    info!(conversations = bot.store().len(), "input closed, shutting down");
    Ok(())
}
