// services/ops-dash/src/main.rs
//
// Terminal dashboard for the traffic monitoring operations team
//
// Run with: cargo run --bin ops-dash -- --seed 42

use std::fs::File;
use std::io::stdout;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::prelude::*;

mod app;
mod config;
mod pages;
mod ui;

use app::App;
use crate::config::DashConfig;

#[derive(Parser, Debug)]
#[command(name = "ops-dash")]
#[command(about = "Terminal dashboard for traffic monitoring operations")]
#[command(version = "0.1.0")]
struct Args {
    /// Configuration file (YAML)
    #[arg(long, short, default_value = "config/ops-dash.yaml")]
    config: String,

    /// Seed for the sample generators; omit for a different session each run
    #[arg(long)]
    seed: Option<u64>,

    /// UI tick interval in milliseconds
    #[arg(long, default_value = "100")]
    tick_ms: u64,

    /// Directory exported CSV files are written to (overrides the config)
    #[arg(long)]
    export_dir: Option<String>,

    /// Append tracing output to this file (the terminal is owned by the UI)
    #[arg(long)]
    log_file: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(path) = &args.log_file {
        init_tracing(path)?;
    }
    let cfg = config::load_config(&args.config, args.export_dir.as_deref())?;
    tracing::info!(config = %args.config, export_dir = %cfg.export.dir, "ops-dash starting");

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    // Run app
    let result = run_app(&mut terminal, args, cfg);

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

fn init_tracing(path: &str) -> Result<()> {
    let file = File::create(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ops_dash=info,trafkit=info".into()),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, args: Args, cfg: DashConfig) -> Result<()> {
    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut app = App::new(cfg, rng);
    app.mount_active(Instant::now());

    let tick_rate = Duration::from_millis(args.tick_ms);
    let mut last_tick = Instant::now();

    loop {
        // Draw UI
        terminal.draw(|frame| app.draw(frame))?;

        // Handle input
        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && app.handle_key(key.code, Instant::now()) {
                    return Ok(());
                }
            }
        }

        // Drive the active page's timers
        if last_tick.elapsed() >= tick_rate {
            app.tick(Instant::now());
            last_tick = Instant::now();
        }
    }
}
