use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};

use plugbot::plugins::DEFAULT_PLUGIN_DIR;
use plugbot::{Config, Dispatcher, LoadReport, PluginLoader, PluginStatus, Update, logging};

/// plugbot - chat bot host with pluggable command routing
#[derive(Parser)]
#[command(name = "plugbot", version, about)]
struct Cli {
    /// Directory to load plugins from
    #[arg(long, env = "PLUGBOT_PLUGINS_DIR", default_value = DEFAULT_PLUGIN_DIR)]
    plugins_dir: PathBuf,

    /// Increase verbosity (-v, -vv, -vvv); overrides LEVEL
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Load plugins and serve updates from the console (default)
    Run,
    /// Load plugins and print the load report
    Check {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the bound configuration with secrets redacted
    Config,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Configuration errors are fatal before anything else starts
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            logging::init_fallback();
            tracing::error!("fatal: {e}");
            return ExitCode::FAILURE;
        }
    };

    logging::init(&config.logging, cli.verbose);

    match run(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, config: Config) -> anyhow::Result<()> {
    match cli.command.unwrap_or(Command::Run) {
        Command::Config => {
            println!("{config:#?}");
            Ok(())
        }
        Command::Check { json } => {
            let report = load(&cli.plugins_dir)?;
            if json {
                print_json_report(report)?;
            } else {
                print_report(&report);
            }
            Ok(())
        }
        Command::Run => {
            tracing::info!(
                plugins_dir = %cli.plugins_dir.display(),
                database = %config.database.uri,
                "starting plugbot"
            );

            let report = load(&cli.plugins_dir)?;
            let dispatcher = Dispatcher::with_routers(report.routers);

            tracing::info!(
                routers = dispatcher.routers().len(),
                commands = dispatcher.commands().len(),
                "plugbot ready, reading updates from stdin"
            );

            serve_console(&dispatcher).await
        }
    }
}

/// Load plugins and log each outcome
fn load(dir: &std::path::Path) -> anyhow::Result<LoadReport> {
    let report = PluginLoader::new(dir).load()?;

    for descriptor in &report.descriptors {
        match descriptor.status {
            PluginStatus::Loaded => {
                tracing::info!(plugin = %descriptor.name, "loaded plugin");
            }
            PluginStatus::Failed => {
                tracing::error!(
                    plugin = %descriptor.name,
                    error = descriptor.error.as_deref().unwrap_or("unknown error"),
                    "failed to load plugin"
                );
            }
            PluginStatus::Skipped => {
                tracing::debug!(
                    plugin = %descriptor.name,
                    reason = descriptor.error.as_deref().unwrap_or(""),
                    "skipped plugin"
                );
            }
        }
    }

    tracing::info!(
        loaded = report.loaded().count(),
        failed = report.failed().count(),
        "plugin load complete"
    );

    Ok(report)
}

fn print_report(report: &LoadReport) {
    if report.is_empty() {
        println!("No plugins found");
        return;
    }

    for descriptor in &report.descriptors {
        let detail = descriptor
            .error
            .as_deref()
            .map(|e| format!(" ({e})"))
            .unwrap_or_default();
        println!(
            "{:<8} {}{detail}",
            descriptor.status.as_str(),
            descriptor.qualified_name
        );
    }
}

fn print_json_report(report: LoadReport) -> anyhow::Result<()> {
    let LoadReport {
        descriptors,
        routers,
    } = report;
    let dispatcher = Dispatcher::with_routers(routers);

    let body = serde_json::json!({
        "plugins": descriptors,
        "commands": dispatcher.commands(),
    });
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}

/// Serve updates read line by line from stdin until EOF or Ctrl-C
async fn serve_console(dispatcher: &Dispatcher) -> anyhow::Result<()> {
    let sender = std::env::var("USER").unwrap_or_else(|_| "console".to_string());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("interrupted, shutting down");
                break;
            }
        };

        let Some(text) = line else {
            break;
        };

        if text.trim().is_empty() {
            continue;
        }

        let update = Update {
            chat_id: 0,
            sender: sender.clone(),
            text,
        };

        match dispatcher.handle(&update).await {
            Ok(Some(reply)) => println!("{reply}"),
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "handler failed"),
        }
    }

    Ok(())
}
