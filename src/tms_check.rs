// Start-up checks, the typewriter text and the window roll-in/roll-out around the game
// Runs on the normal screen, before and after the alternate screen

use crossterm::cursor::{Hide, MoveTo, MoveToPreviousLine, Show};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType, disable_raw_mode, enable_raw_mode};
use crossterm::{execute, queue};
use std::io::{self, Write};
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

use crate::tms_cli::RunOptions;
use crate::tms_color::{Depth, base_indices, ui_indices};
use crate::tms_config::Config;
use crate::tms_error::CheckError;
use crate::tms_ui::required_size;

pub const INTERRUPT_MESSAGE: &str = "Alright. Alright. We aren't sweeping any mines today (T＿T)";

const FRAME_TITLE: &str = "TERMINAL MINESWEEPER";

/// Raw mode with a hidden cursor while the checks and animations run, so
/// Ctrl-C arrives as a key event instead of killing the process mid-line
pub struct RawTerminal {
    raw: bool,
}

impl RawTerminal {
    pub fn start() -> Self {
        let raw = enable_raw_mode().is_ok();
        let _ = execute!(io::stdout(), Hide);
        RawTerminal { raw }
    }

    /// True if Ctrl-C can be watched for
    pub fn active(&self) -> bool {
        self.raw
    }
}

impl Drop for RawTerminal {
    fn drop(&mut self) {
        if self.raw {
            let _ = disable_raw_mode();
        }
        let _ = execute!(io::stdout(), ResetColor, Show);
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Paint {
    fg: Option<Color>,
    bg: Option<Color>,
}

pub struct Checker<W: Write> {
    out: W,
    silent: bool,
    ignore_failures: bool,
    watch: bool,     // Poll for Ctrl-C between characters
    delay: Duration, // Pause between characters
}

impl<W: Write> Checker<W> {
    pub fn new(out: W, opts: &RunOptions) -> Self {
        Checker {
            out,
            silent: opts.silent_checks,
            ignore_failures: opts.ignore_failures,
            watch: false,
            delay: Duration::from_millis(15),
        }
    }

    pub fn watch_interrupts(mut self, on: bool) -> Self {
        self.watch = on;
        self
    }

    #[cfg(test)]
    fn instant(mut self) -> Self {
        self.delay = Duration::ZERO;
        self
    }

    fn interrupted(&self) -> Result<bool, CheckError> {
        if !self.watch {
            return Ok(false);
        }
        while event::poll(Duration::ZERO)? {
            if let Event::Key(KeyEvent { code: KeyCode::Char('c'), modifiers, .. }) = event::read()? {
                if modifiers.contains(KeyModifiers::CONTROL) {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }

    fn pause(&mut self, d: Duration) -> Result<(), CheckError> {
        if !self.delay.is_zero() && !d.is_zero() {
            thread::sleep(d);
        }
        if self.interrupted()? {
            debug!("interrupted");
            return Err(CheckError::Interrupted);
        }
        Ok(())
    }

    fn type_text(&mut self, text: &str, paint: Paint, newline: bool, delay: Duration) -> Result<(), CheckError> {
        if let Some(c) = paint.fg {
            queue!(self.out, SetForegroundColor(c))?;
        }
        if let Some(c) = paint.bg {
            queue!(self.out, SetBackgroundColor(c))?;
        }
        for ch in text.chars() {
            if ch == '\n' {
                queue!(self.out, Print("\r\n"))?;
            } else {
                queue!(self.out, Print(ch))?;
            }
            self.out.flush()?;
            self.pause(delay)?;
        }
        if paint.fg.is_some() || paint.bg.is_some() {
            queue!(self.out, ResetColor)?;
        }
        if newline {
            queue!(self.out, Print("\r\n"))?;
        }
        self.out.flush()?;
        Ok(())
    }

    /// Write `text` one character at a time
    pub fn print_slow(&mut self, text: &str, color: Option<Color>, newline: bool) -> Result<(), CheckError> {
        let paint = Paint { fg: color, bg: None };
        self.type_text(text, paint, newline, self.delay)
    }

    /// Report one condition; a failure stops start-up unless failures are ignored
    pub fn check(&mut self, ok: bool, name: &'static str, hint: &str) -> Result<(), CheckError> {
        if self.silent {
            if ok || self.ignore_failures {
                return Ok(());
            }
            queue!(self.out, SetForegroundColor(Color::Grey), Print(format!("Error: {hint}\r\n")), ResetColor)?;
            self.out.flush()?;
            return Err(CheckError::Failed(name));
        }
        self.print_slow(&format!("Checking {name}..."), None, false)?;
        if ok {
            return self.print_slow("PASSED", Some(Color::Green), true);
        }
        if self.ignore_failures {
            warn!(check = name, "startup check failed, ignored");
            return self.print_slow("FAILURE IGNORED", Some(Color::Red), true);
        }
        self.print_slow("FAILED", Some(Color::Red), true)?;
        self.print_slow(hint, None, true)?;
        let delay = self.delay / 3;
        self.type_text(
            "Alternatively, you may pass in the --ignore-failures switch.",
            Paint { fg: Some(Color::Grey), bg: None },
            true,
            delay,
        )?;
        Err(CheckError::Failed(name))
    }

    /// Every colour the board uses, printed on the board background
    fn color_swatch(&mut self, dark: bool) -> Result<(), CheckError> {
        let (_, bg, _) = base_indices(dark);
        self.print_slow("Testing terminal color support...", None, false)?;
        for c in ui_indices(dark) {
            let paint = Paint { fg: Some(Color::AnsiValue(c)), bg: Some(Color::AnsiValue(bg)) };
            self.type_text(&c.to_string(), paint, false, self.delay)?;
            queue!(self.out, Print(" "))?;
        }
        queue!(self.out, Print("\r\n\r\n"))?;
        Ok(())
    }

    /// Roll in an empty window the size of the terminal, one row at a time
    fn roll_in(&mut self, frame: &[String], dark: bool) -> Result<(), CheckError> {
        let (fg, bg, _) = base_indices(dark);
        let paint = Paint { fg: Some(Color::AnsiValue(fg)), bg: Some(Color::AnsiValue(bg)) };
        for (i, row) in frame.iter().enumerate() {
            queue!(self.out, Print("\r\n"))?;
            // speeds up so the roll-in stays short
            let delay = (Duration::from_millis(10) / (i as u32 + 1)).max(Duration::from_micros(500));
            self.type_text(row, paint, false, delay)?;
        }
        self.out.flush()?;
        Ok(())
    }

    /// Erase the rolled-in window from the bottom row up, right to left
    fn roll_out(&mut self, frame: &[String], dark: bool) -> Result<(), CheckError> {
        let (fg, bg, _) = base_indices(dark);
        let height = frame.len();
        for (y, row) in frame.iter().rev().enumerate() {
            let width = row.chars().count();
            let delay = (Duration::from_millis(10) / (height - y) as u32).max(Duration::from_micros(500));
            for x in 0..width {
                let kept: String = row.chars().take(width - x - 1).collect();
                queue!(
                    self.out,
                    Print("\r"),
                    SetForegroundColor(Color::AnsiValue(fg)),
                    SetBackgroundColor(Color::AnsiValue(bg)),
                    Print(kept),
                    ResetColor,
                    Print(" ".repeat(x + 1))
                )?;
                self.out.flush()?;
                self.pause(delay)?;
            }
            queue!(self.out, MoveToPreviousLine(1))?;
        }
        self.clear_screen()
    }

    fn clear_screen(&mut self) -> Result<(), CheckError> {
        queue!(self.out, ResetColor, Clear(ClearType::All), MoveTo(0, 0))?;
        self.out.flush()?;
        Ok(())
    }
}

/// Rows of the empty window drawn by the start-up and closing animations
fn window_frame(width: u16, height: u16) -> Vec<String> {
    let w = width as usize;
    let inner = w.saturating_sub(4);
    let pad = |line: &str| {
        let len = line.chars().count().min(inner);
        let left = (inner - len) / 2;
        let text: String = line.chars().take(len).collect();
        format!(" │{}{}{}│ ", " ".repeat(left), text, " ".repeat(inner - len - left))
    };
    let mut frame = Vec::with_capacity(height as usize);
    frame.push(format!(" ╭{}╮ ", "─".repeat(inner)));
    frame.push(pad(FRAME_TITLE));
    frame.push(format!(" ├{}┤ ", "─".repeat(inner)));
    for _ in 0..(height as usize).saturating_sub(4) {
        frame.push(pad(""));
    }
    frame.push(format!(" ╰{}╯ ", "─".repeat(inner)));
    frame
}

/// Hint for a terminal smaller than needed
fn size_hint(have: (u16, u16), need: (u16, u16)) -> String {
    let mut parts = Vec::new();
    if have.0 < need.0 {
        parts.push(format!("{} ({} more) columns", need.0, need.0 - have.0));
    }
    if have.1 < need.1 {
        parts.push(format!("{} ({} more) rows", need.1, need.1 - have.1));
    }
    format!(
        "Please make sure your terminal window has at least {}, or choose a smaller board.",
        parts.join(" and ")
    )
}

/// Welcome text, the checks, the chosen board and the window roll-in
pub fn run_startup_checks<W: Write>(checker: &mut Checker<W>, cfg: &Config, opts: &RunOptions) -> Result<(), CheckError> {
    let (w, h, n) = cfg.difficulty.params();
    if !checker.silent {
        checker.print_slow("Welcome to terminal minesweeper.", None, true)?;
        if opts.no_options {
            checker.print_slow("\nNo option was specified. Using default settings.", None, true)?;
            checker.print_slow("To see a list of possible options, run this program with --help.", None, true)?;
        }
        checker.print_slow("\nCommencing system check.", None, true)?;
    }

    let need = required_size(w, h);
    let have = crossterm::terminal::size().unwrap_or((0, 0));
    checker.check(have.0 >= need.0 && have.1 >= need.1, "window size", &size_hint(have, need))?;

    let depth = Depth::detect();
    checker.check(
        depth != Depth::Basic,
        "color support",
        "This game needs a terminal with 256 colors or true color.",
    )?;

    if opts.show_animation {
        checker.color_swatch(cfg.dark_mode)?;
        checker.print_slow("All system checks completed, ready to sweep some mines.", None, true)?;
        checker.print_slow(
            &format!(
                "You have selected {} difficulty, which has a {}x{} grid with {} mines.\n",
                cfg.difficulty.name(),
                w,
                h,
                n
            ),
            None,
            true,
        )?;
        checker.print_slow("Printing a window in the hope that it will come into life.", None, true)?;
        checker.print_slow("Please lend me your power, terminal magic!", None, false)?;
        checker.roll_in(&window_frame(have.0, have.1), cfg.dark_mode)?;
    }
    Ok(())
}

/// Roll the window back out after a normal exit and say goodbye.
/// Ctrl-C skips straight to a clear screen.
pub fn run_closing<W: Write>(checker: &mut Checker<W>, cfg: &Config) -> Result<(), CheckError> {
    let (width, height) = crossterm::terminal::size().unwrap_or((0, 0));
    let shown = checker
        .roll_out(&window_frame(width, height), cfg.dark_mode)
        .and_then(|()| checker.print_slow("Thanks, terminal magic. I knew you wouldn't fail me.", None, true));
    match shown {
        Err(CheckError::Interrupted) => return checker.clear_screen(),
        other => other?,
    }
    let delay = checker.delay / 2;
    let hint = Paint { fg: Some(Color::AnsiValue(244)), bg: None };
    match checker.type_text("(You may skip this animation with the -q flag next time)", hint, true, delay) {
        Err(CheckError::Interrupted) => checker.clear_screen(),
        other => other,
    }
}
