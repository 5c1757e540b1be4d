mod app;
mod event;
mod theme;

use std::io::stdout;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};
use tracing_appender::non_blocking::WorkerGuard;

use farm_dashboard::loader;
use farm_dashboard::model::{FilterCriteria, Tab};
use farm_dashboard::source::{remote::DEFAULT_TIMEOUT, DataSource, RemoteSource};

/// Farm Dashboard: today's farm operations and a filterable Indian crop catalog.
#[derive(Parser, Debug)]
#[command(name = "farm-dashboard", version, about)]
struct Cli {
    /// Farm data directory (catalog.yaml, membership.yaml, profiles.md, dashboard.json).
    /// Built-in data is used when omitted.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Do not watch the data directory for edits
    #[arg(long)]
    no_watch: bool,

    /// Initial season filter: all, kharif, rabi or zaid
    #[arg(long, default_value = "all")]
    season: String,

    /// Initial region filter, e.g. "Punjab"
    #[arg(long, default_value = "All India")]
    region: String,

    /// Base URL of the live crop data backend
    #[arg(long)]
    live_url: Option<String>,

    /// Tab to open on: landing, dashboard or crops
    #[arg(long, default_value = "dashboard")]
    tab: String,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    // Errors here still reach a normal terminal
    let data = match loader::load(cli.data_dir.as_deref()) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let log_dir = std::env::var("FARM_DASHBOARD_LOG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| std::env::temp_dir().join("farm-dashboard"));
    let _log_guard = init_logging(&log_dir)?;

    let remote = cli.live_url.map(|url| {
        tracing::info!(%url, "live backend configured");
        Arc::new(RemoteSource::new(url, DEFAULT_TIMEOUT)) as Arc<dyn DataSource>
    });
    let options = app::AppOptions {
        data_dir: cli.data_dir,
        no_watch: cli.no_watch,
        criteria: FilterCriteria::from_loose(None, Some(&cli.season), Some(&cli.region)),
        tab: Tab::from_str_loose(&cli.tab),
        remote,
    };

    install_panic_hook();
    let mut terminal = enter_terminal()?;
    let result = app::App::new(data, options).run(&mut terminal).await;
    leave_terminal()?;

    result
}

/// The TUI owns stdout, so logs go to a daily file under `dir`.
fn init_logging(dir: &Path) -> color_eyre::Result<WorkerGuard> {
    std::fs::create_dir_all(dir)?;
    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(dir, "dashboard.log"));
    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_ansi(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("farm_dashboard=info".parse()?),
        )
        .init();
    Ok(guard)
}

fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = leave_terminal();
        previous(info);
    }));
}

fn enter_terminal() -> color_eyre::Result<ratatui::DefaultTerminal> {
    execute!(stdout(), EnterAlternateScreen, EnableMouseCapture)?;
    Ok(ratatui::init())
}

/// Mouse capture is released before ratatui restores the screen.
fn leave_terminal() -> color_eyre::Result<()> {
    execute!(stdout(), LeaveAlternateScreen, DisableMouseCapture)?;
    ratatui::restore();
    Ok(())
}
