// Command-line options, layered over the saved preferences

use clap::{ArgAction, ArgGroup, Parser};

use crate::tms_config::{Config, Difficulty};

#[derive(Parser, Debug)]
#[command(name = "tmines", version, about = "Minesweeper in your terminal")]
#[command(disable_help_flag = true)]
#[command(group(ArgGroup::new("difficulty").args(["easy", "intermediate", "hard", "custom"])))]
pub struct Cli {
    /// Easy difficulty: 9x9 board with 10 mines
    #[arg(short, long)]
    pub easy: bool,

    /// Intermediate difficulty: 16x16 board with 40 mines (the default)
    #[arg(short, long)]
    pub intermediate: bool,

    /// Hard difficulty: 30x16 board with 99 mines
    #[arg(short = 'h', long)]
    pub hard: bool,

    /// Custom difficulty
    #[arg(short, long, num_args = 3, value_names = ["WIDTH", "HEIGHT", "MINES"])]
    pub custom: Option<Vec<usize>>,

    /// Enable dark mode
    #[arg(short, long)]
    pub dark_mode: bool,

    /// Cap the framerate; 0 disables the cap
    #[arg(short, long)]
    pub framerate: Option<u32>,

    /// Run the startup checks quickly and quietly
    #[arg(long)]
    pub silent_checks: bool,

    /// Skip the start-up and closing animations
    #[arg(long)]
    pub no_animation: bool,

    /// Same as --silent-checks --no-animation
    #[arg(short, long)]
    pub quick: bool,

    /// Continue even when a startup check fails (not recommended)
    #[arg(long)]
    pub ignore_failures: bool,

    /// Use plain characters instead of emoji
    #[arg(long)]
    pub no_emoji: bool,

    /// Write a debug log to tmines-debug.log
    #[arg(long)]
    pub debug: bool,

    /// Seed for the mine layout, for reproducible boards
    #[arg(long)]
    pub seed: Option<u64>,

    /// Store the effective settings as the new defaults
    #[arg(long)]
    pub save: bool,

    /// Print help
    #[arg(long, action = ArgAction::Help)]
    pub help: Option<bool>,
}

/// Start-up behaviour that is not a saved preference
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    pub silent_checks: bool,
    pub show_animation: bool,
    pub ignore_failures: bool,
    pub debug: bool,
    pub seed: Option<u64>,
    pub no_options: bool, // Started without any arguments
}

impl Cli {
    /// Difficulty selected on the command line, if any
    pub fn difficulty(&self) -> Option<Difficulty> {
        if self.easy {
            Some(Difficulty::Easy)
        } else if self.intermediate {
            Some(Difficulty::Intermediate)
        } else if self.hard {
            Some(Difficulty::Hard)
        } else {
            match self.custom.as_deref() {
                Some(&[w, h, n]) => Some(Difficulty::Custom(w, h, n)),
                _ => None,
            }
        }
    }

    /// Override preferences with whatever was given on the command line
    pub fn apply(&self, cfg: &mut Config) {
        if let Some(d) = self.difficulty() {
            cfg.set_difficulty(d);
        }
        if self.dark_mode {
            cfg.dark_mode = true;
        }
        if self.no_emoji {
            cfg.ascii_icons = true;
        }
        if let Some(fps) = self.framerate {
            cfg.framerate = fps;
        }
    }

    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            silent_checks: self.silent_checks || self.quick,
            show_animation: !(self.no_animation || self.quick),
            ignore_failures: self.ignore_failures,
            debug: self.debug,
            seed: self.seed,
            no_options: false,
        }
    }
}
