//! Design warmup TUI application.
//!
//! Serves short creative exercises from a prompt catalog, one at a time,
//! without repeats until every matching prompt has been shown.
//!
//! # Headless Mode
//!
//! Run with `--headless` for a line-oriented interface suitable for scripting:
//!
//! ```bash
//! printf 'tag typography\nnext\nstatus\n' | cargo run -p warmup -- --headless
//! ```

mod app;
mod command;
mod events;
mod headless;
mod ui;

use std::fs::OpenOptions;
use std::io::{self, stdout};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use crossterm::{
    event, execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use warmup_core::{Catalog, DeckEngine, EngineConfig, FileStore};

use app::App;
use events::{handle_event, EventResult};
use ui::render::render;

/// Catalog used when no `--catalog` is given
const BUNDLED_CATALOG: &str = include_str!("../data/prompts.json");

const LOG_FILE: &str = "warmup.log";

#[derive(Parser)]
#[command(name = "warmup")]
#[command(about = "Shuffled design warmup prompts in your terminal")]
struct Cli {
    /// Run in headless mode (line commands on stdin, no TUI)
    #[arg(long)]
    headless: bool,

    /// Prompt catalog (JSON). Defaults to the bundled catalog
    #[arg(long, env = "WARMUP_CATALOG")]
    catalog: Option<PathBuf>,

    /// Directory for saved filters, deck and history
    #[arg(long, env = "WARMUP_STATE_DIR")]
    state_dir: Option<PathBuf>,

    /// Fixed shuffle seed, for reproducible sessions
    #[arg(long, env = "WARMUP_SEED")]
    seed: Option<u64>,
}

impl Cli {
    fn into_config(self) -> EngineConfig {
        let state_dir = self
            .state_dir
            .or_else(|| dirs::data_dir().map(|dir| dir.join("design-warmup")))
            .unwrap_or_else(|| PathBuf::from(".design-warmup"));

        let mut config = EngineConfig::new(state_dir);
        if let Some(path) = self.catalog {
            config = config.with_catalog_path(path);
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        config
    }
}

/// Initialize tracing. Headless mode logs to stderr; the TUI logs to a file
/// in the state directory so the terminal stays clean.
fn init_tracing(headless: bool, state_dir: &std::path::Path) -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "warmup=info,warmup_core=info".into()),
    );

    if headless {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    } else {
        std::fs::create_dir_all(state_dir)
            .with_context(|| format!("Failed to create {}", state_dir.display()))?;
        let path = state_dir.join(LOG_FILE);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open log file {}", path.display()))?;
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
            .init();
    }
    Ok(())
}

async fn load_catalog(config: &EngineConfig) -> anyhow::Result<Catalog> {
    match &config.catalog_path {
        Some(path) => Catalog::load_json(path)
            .await
            .with_context(|| format!("Failed to load catalog {}", path.display())),
        None => Catalog::from_json_str(BUNDLED_CATALOG).context("Bundled catalog is malformed"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let headless = cli.headless;
    let config = cli.into_config();
    init_tracing(headless, &config.state_dir)?;

    let catalog = load_catalog(&config).await?;
    let store = config
        .open_store()
        .with_context(|| format!("Failed to open state in {}", config.state_dir.display()))?;
    tracing::info!(state_dir = %config.state_dir.display(), "opened state store");

    let engine = DeckEngine::with_rng(catalog, store, config.rng());
    let app = App::new(engine);

    if headless {
        let stdin = io::stdin();
        return headless::run_headless(app, stdin.lock(), io::stdout()).map_err(Into::into);
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        tracing::error!(error = %e, "terminal loop failed");
    }
    result.map_err(Into::into)
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    mut app: App<FileStore>,
) -> io::Result<()> {
    app.ensure_prompt();
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| render(f, &app))?;

        // Poll with a timeout so the timer keeps ticking
        if event::poll(Duration::from_millis(100))? {
            let ev = event::read()?;
            if handle_event(&mut app, ev) == EventResult::Quit {
                return Ok(());
            }
        }

        let now = Instant::now();
        app.tick(now - last_tick);
        last_tick = now;

        if app.should_quit {
            return Ok(());
        }
    }
}
