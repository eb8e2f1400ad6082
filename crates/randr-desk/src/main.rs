//! randr-desk entry point.
//!
//! Wires the configuration, the xrandr backend and the console status channel
//! into a [`LayoutSession`], then either runs one command and exits or starts
//! the interactive shell.
//!
//! # Usage
//!
//! ```text
//! randr-desk [OPTIONS] [COMMAND]
//!
//! Commands:
//!   list     Print connected monitors (--json for machine output)
//!   mirror   Mirror SOURCE onto TARGET
//!   extend   Place TARGET beside SOURCE
//!   unlink   Break every mirror, monitors left to right
//!   shell    Interactive shell (default)
//!
//! Options:
//!   --config <PATH>      Config file [default: platform config dir]
//!   --tool <PROGRAM>     xrandr executable [env: RANDR_DESK_TOOL]
//!   --dry-run            Print layout-changing commands instead of running them
//!   --log-level <LEVEL>  Log filter when RUST_LOG is unset
//! ```
//!
//! # Environment variable overrides
//!
//! | Variable          | Description                               |
//! |-------------------|-------------------------------------------|
//! | `RUST_LOG`        | Log filter, wins over every other setting |
//! | `RANDR_DESK_TOOL` | xrandr executable                         |

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use randr_core::ExtendSide;
use tokio::io::BufReader;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use randr_desk::application::dispatch::DisplayBackend;
use randr_desk::application::session::LayoutSession;
use randr_desk::infrastructure::backend::dry_run::DryRunBackend;
use randr_desk::infrastructure::backend::xrandr::XrandrBackend;
use randr_desk::infrastructure::shell::run_shell;
use randr_desk::infrastructure::status::ConsoleStatus;
use randr_desk::infrastructure::storage::config::{load_config, load_config_from, AppConfig};
use randr_desk::infrastructure::ui_bridge::{monitor_dtos, monitors_json, render_monitor_table};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Arrange, mirror and extend monitors with xrandr.
#[derive(Debug, Parser)]
#[command(
    name = "randr-desk",
    about = "Arrange, mirror and extend monitors with xrandr",
    version
)]
struct Cli {
    /// Configuration file to read instead of the platform default.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// xrandr executable to run.  Overrides `backend.tool` in the config file.
    #[arg(long, global = true, env = "RANDR_DESK_TOOL")]
    tool: Option<String>,

    /// Print layout-changing commands instead of running them.  Queries still
    /// run so the layout shown is real.
    #[arg(long, global = true)]
    dry_run: bool,

    /// Log filter used when `RUST_LOG` is unset (e.g. `debug`).
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
enum Command {
    /// Print connected monitors.
    List {
        /// Emit JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Mirror SOURCE onto TARGET.
    Mirror {
        source: String,
        target: String,
        #[arg(long)]
        mode: Option<String>,
        #[arg(long)]
        rate: Option<String>,
    },
    /// Place TARGET to one side of SOURCE.
    Extend {
        source: String,
        target: String,
        #[arg(long, default_value_t = ExtendSide::Right)]
        side: ExtendSide,
        #[arg(long)]
        mode: Option<String>,
        #[arg(long)]
        rate: Option<String>,
    },
    /// Break every mirror, placing monitors left to right.
    Unlink,
    /// Interactive shell.
    Shell,
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Config is read before logging starts so its log level can apply; a
    // broken file is reported once the subscriber exists.
    let loaded = match &cli.config {
        Some(path) => load_config_from(path),
        None => load_config(),
    };
    let fallback_level = cli.log_level.clone().unwrap_or_else(|| match &loaded {
        Ok(config) => config.general.log_level.clone(),
        Err(_) => "info".to_string(),
    });

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&fallback_level)),
        )
        .init();

    let config = loaded.unwrap_or_else(|e| {
        warn!("using default configuration: {e}");
        AppConfig::default()
    });

    let program = cli.tool.clone().unwrap_or_else(|| config.backend.tool.clone());
    info!("randr-desk starting (tool: {program}, dry run: {})", cli.dry_run);

    let xrandr: Arc<dyn DisplayBackend> = Arc::new(XrandrBackend::new(program.clone()));
    let backend: Arc<dyn DisplayBackend> = if cli.dry_run {
        Arc::new(DryRunBackend::new(xrandr, program))
    } else {
        xrandr
    };

    let mut session = LayoutSession::new(
        backend,
        Arc::new(ConsoleStatus),
        config.snap_engine(),
        config.session_settings(),
    );
    session.refresh();

    match cli.command.unwrap_or(Command::Shell) {
        Command::List { json } => {
            if json {
                let text = monitors_json(&session).context("failed to serialise monitors")?;
                println!("{text}");
            } else {
                print!("{}", render_monitor_table(&monitor_dtos(&session)));
            }
        }
        Command::Mirror {
            source,
            target,
            mode,
            rate,
        } => {
            choose(&mut session, &source, &target, mode, rate)?;
            session
                .mirror()
                .with_context(|| format!("could not mirror {source} to {target}"))?;
        }
        Command::Extend {
            source,
            target,
            side,
            mode,
            rate,
        } => {
            choose(&mut session, &source, &target, mode, rate)?;
            session
                .extend(side)
                .with_context(|| format!("could not extend {target} {side} of {source}"))?;
        }
        Command::Unlink => {
            session.unlink().context("could not unlink displays")?;
        }
        Command::Shell => {
            let mut stdout = std::io::stdout();
            run_shell(&mut session, BufReader::new(tokio::io::stdin()), &mut stdout)
                .await
                .context("shell I/O failed")?;
        }
    }

    Ok(())
}

/// Selects the pair and applies any explicit mode / rate for a one-shot command.
fn choose(
    session: &mut LayoutSession,
    source: &str,
    target: &str,
    mode: Option<String>,
    rate: Option<String>,
) -> anyhow::Result<()> {
    if let Some(mode) = mode {
        session.set_mode(&mode)?;
    }
    if let Some(rate) = rate {
        session.set_rate(&rate)?;
    }
    session.select(source, target)?;
    Ok(())
}
