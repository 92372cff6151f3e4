// Entry point for terminal Minesweeper
// Loads preferences, applies the command line, runs the start-up checks and launches the UI

use clap::Parser;
use std::error::Error;
use std::fs::File;
use std::io;
use std::process;
use std::sync::Mutex;
use tracing::{info, warn};

mod tms_check;   // Start-up checks and the window animations
mod tms_cli;     // Command-line options
mod tms_color;   // Palette and depth detection
mod tms_config;  // Difficulty presets and saved preferences
mod tms_error;   // Error types
mod tms_field;   // Minefield and cell rules
mod tms_session; // Game phases, timer and cursor
mod tms_ui;      // Terminal UI rendering and event handling

use tms_check::{Checker, INTERRUPT_MESSAGE, RawTerminal, run_closing, run_startup_checks};
use tms_cli::Cli;
use tms_config::{Config, config_path};
use tms_error::CheckError;
use tms_session::GameSession;

const DEBUG_LOG: &str = "tmines-debug.log";

fn init_logging() -> Result<(), Box<dyn Error>> {
    let file = File::create(DEBUG_LOG)?;
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(tracing::Level::TRACE)
        .init();
    Ok(())
}

fn load_config() -> Config {
    let loaded = config_path().and_then(|path| Config::load_or_create(&path));
    match loaded {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!(error = %e, "using default preferences");
            eprintln!("Warning: {e}; using default preferences");
            Config::default()
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let mut opts = cli.run_options();
    opts.no_options = std::env::args_os().len() <= 1;
    if opts.debug {
        init_logging()?;
    }

    let mut cfg = load_config();
    cli.apply(&mut cfg);
    if cli.save {
        cfg.save(&config_path()?)?;
        info!("preferences saved");
    }

    let (w, h, n) = cfg.difficulty.params();
    let session = GameSession::from_settings(w, h, n, opts.seed)?;
    info!(width = w, height = h, mines = n, seed = ?opts.seed, "board configured");

    {
        let raw = RawTerminal::start();
        let mut checker = Checker::new(io::stdout(), &opts).watch_interrupts(raw.active());
        run_startup_checks(&mut checker, &cfg, &opts)?;
    }

    tms_ui::run(&mut cfg, &opts, session)?;

    if opts.show_animation {
        let raw = RawTerminal::start();
        let mut checker = Checker::new(io::stdout(), &opts).watch_interrupts(raw.active());
        run_closing(&mut checker, &cfg)?;
    }
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        if matches!(err.downcast_ref::<CheckError>(), Some(CheckError::Interrupted)) {
            println!("\n{INTERRUPT_MESSAGE}");
            process::exit(2);
        }
        eprintln!("Error: {err}");
        process::exit(1);
    }
}
