//! FreightWatch CLI — run, preview, and check-config commands.
//!
//! Commands:
//! - `run` — execute one monitoring pass and deliver the report
//! - `preview` — same pass, but always print to stdout
//! - `check-config` — parse and validate a config file
//!
//! Secrets come from the environment: `FREIGHTWATCH_WEBHOOK` overrides the
//! configured webhook URL, `FINMIND_TOKEN` authenticates the flow provider.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use freightwatch_runner::config::MonitorConfig;
use freightwatch_runner::data::{FinMindFlowProvider, StdoutProgress, YahooBarProvider};
use freightwatch_runner::notify::{DiscordWebhook, Notifier, StdoutNotifier};
use freightwatch_runner::report::format_report;
use freightwatch_runner::runner::run_monitor;

#[derive(Parser)]
#[command(
    name = "freightwatch",
    about = "FreightWatch CLI - dry bulk shipping market monitor"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute one monitoring pass and deliver the report.
    Run {
        /// Path to a TOML config file.
        #[arg(long)]
        config: PathBuf,

        /// Print the report instead of posting to the webhook.
        #[arg(long, default_value_t = false)]
        dry_run: bool,

        /// Also export evaluation rows as CSV to this path.
        #[arg(long)]
        export_csv: Option<PathBuf>,
    },
    /// Execute one monitoring pass and print the report to stdout.
    Preview {
        /// Path to a TOML config file.
        #[arg(long)]
        config: PathBuf,
    },
    /// Parse and validate a config file, then print a summary.
    CheckConfig {
        /// Path to a TOML config file.
        #[arg(long)]
        config: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            dry_run,
            export_csv,
        } => run_cmd(&config, dry_run, export_csv),
        Commands::Preview { config } => run_cmd(&config, true, None),
        Commands::CheckConfig { config } => check_config_cmd(&config),
    }
}

fn run_cmd(config_path: &PathBuf, dry_run: bool, export_csv: Option<PathBuf>) -> Result<()> {
    let config = MonitorConfig::from_path(config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;

    let token = std::env::var("FINMIND_TOKEN").ok();
    if token.is_none() {
        eprintln!("warning: FINMIND_TOKEN not set; institutional flow may be unavailable");
    }

    let bars = YahooBarProvider::new();
    let flows = FinMindFlowProvider::new(token);
    let progress = StdoutProgress;

    let report = run_monitor(&config, &bars, &flows, Some(&progress))?;

    if let Some(path) = &export_csv {
        freightwatch_runner::export::write_csv(&report, path)
            .with_context(|| format!("writing {}", path.display()))?;
        println!("Exported evaluation rows to {}", path.display());
    }

    let text = format_report(&report);
    let webhook_url = std::env::var("FREIGHTWATCH_WEBHOOK")
        .ok()
        .or_else(|| config.notify.webhook_url.clone());

    match webhook_url {
        Some(url) if !dry_run => {
            DiscordWebhook::new(url).send(&text)?;
            println!("Report delivered.");
        }
        _ => {
            if !dry_run {
                eprintln!("warning: no webhook configured; printing report instead");
            }
            StdoutNotifier.send(&text)?;
        }
    }

    Ok(())
}

fn check_config_cmd(config_path: &PathBuf) -> Result<()> {
    let config = MonitorConfig::from_path(config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;

    println!("Config OK: {}", config_path.display());
    println!(
        "  index: {} ({}MA, volume {}MA, {} days of history)",
        config.monitor.index_symbol,
        config.monitor.primary_window,
        config.monitor.volume_window,
        config.monitor.history_days
    );
    println!("  securities ({}):", config.monitor.securities.len());
    for spec in &config.monitor.securities {
        println!("    {} ({})", spec.name, spec.symbol);
    }
    println!(
        "  flow lookback: {} days | webhook: {}",
        config.flow.lookback_days,
        if config.notify.webhook_url.is_some() {
            "configured"
        } else {
            "stdout"
        }
    );

    Ok(())
}
