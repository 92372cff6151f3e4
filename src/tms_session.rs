// Game session: phase bookkeeping, timing and the keyboard cursor around a Minefield
// This is the only surface the terminal UI talks to

use std::time::{Duration, Instant};
use tracing::info;

use crate::tms_error::GameError;
use crate::tms_field::{CellView, Minefield, Pos};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Ready,   // No reveal yet, mines not placed
    Playing,
    Won,
    Lost,
}

impl Phase {
    pub fn is_over(self) -> bool {
        matches!(self, Phase::Won | Phase::Lost)
    }
}

/// Cursor movement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Result of one session operation: the cells to redraw, with their new look
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Update {
    pub changed: Vec<(Pos, CellView)>,
    pub phase: Phase,
    pub cursor: Pos,
}

impl Update {
    pub fn is_empty(&self) -> bool {
        self.changed.is_empty()
    }
}

/// Full read-only picture of the session, for a complete redraw
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub width: usize,
    pub height: usize,
    pub cells: Vec<CellView>, // Row-major
    pub cursor: Pos,
    pub phase: Phase,
    pub elapsed: Duration,
    pub mines_left: isize,
}

impl Snapshot {
    pub fn cell(&self, pos: Pos) -> Option<CellView> {
        (pos.row < self.height && pos.col < self.width)
            .then(|| self.cells[pos.row * self.width + pos.col])
    }
}

pub struct GameSession {
    field: Minefield,
    phase: Phase,
    start_time: Option<Instant>,
    elapsed: Duration,
    cursor: Pos,
}

impl GameSession {
    pub fn new(width: usize, height: usize, mines: usize) -> Result<Self, GameError> {
        Minefield::new(width, height, mines).map(Self::from_field)
    }

    pub fn with_seed(width: usize, height: usize, mines: usize, seed: u64) -> Result<Self, GameError> {
        Minefield::with_seed(width, height, mines, seed).map(Self::from_field)
    }

    /// New session for a board size; a seed gives a reproducible layout
    pub fn from_settings(width: usize, height: usize, mines: usize, seed: Option<u64>) -> Result<Self, GameError> {
        match seed {
            Some(seed) => Self::with_seed(width, height, mines, seed),
            None => Self::new(width, height, mines),
        }
    }

    pub fn from_field(field: Minefield) -> Self {
        GameSession {
            field,
            phase: Phase::Ready,
            start_time: None,
            elapsed: Duration::ZERO,
            cursor: Pos::new(0, 0),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn cursor(&self) -> Pos {
        self.cursor
    }

    pub fn field(&self) -> &Minefield {
        &self.field
    }

    /// Mine counter display value; negative when the player over-flags
    pub fn mines_left(&self) -> isize {
        self.field.mine_count() as isize - self.field.flagged_count() as isize
    }

    /// Time since the first reveal, frozen once the game ends
    pub fn elapsed(&self) -> Duration {
        match (self.phase, self.start_time) {
            (Phase::Playing, Some(t0)) => t0.elapsed(),
            _ => self.elapsed,
        }
    }

    /// Move the cursor one cell, clamped to the board. Allowed in every phase.
    pub fn cursor_move(&mut self, dir: Direction) -> Update {
        let Pos { row, col } = self.cursor;
        self.cursor = match dir {
            Direction::Up => Pos::new(row.saturating_sub(1), col),
            Direction::Down => Pos::new((row + 1).min(self.field.height() - 1), col),
            Direction::Left => Pos::new(row, col.saturating_sub(1)),
            Direction::Right => Pos::new(row, (col + 1).min(self.field.width() - 1)),
        };
        self.update(Vec::new())
    }

    /// Put the cursor on a cell, e.g. under the mouse
    pub fn set_cursor(&mut self, pos: Pos) -> Result<Update, GameError> {
        if self.field.view(pos).is_none() {
            return Err(self.out_of_bounds(pos));
        }
        self.cursor = pos;
        Ok(self.update(Vec::new()))
    }

    pub fn reveal(&mut self, pos: Pos) -> Result<Update, GameError> {
        self.ensure_active()?;
        let changed = self.field.reveal(pos)?;
        Ok(self.settle(changed))
    }

    pub fn toggle_flag(&mut self, pos: Pos) -> Result<Update, GameError> {
        self.ensure_active()?;
        let changed = self.field.toggle_flag(pos)?;
        Ok(self.update(changed.into_iter().collect()))
    }

    pub fn chord_reveal(&mut self, pos: Pos) -> Result<Update, GameError> {
        self.ensure_active()?;
        let changed = self.field.chord_reveal(pos)?;
        Ok(self.settle(changed))
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            width: self.field.width(),
            height: self.field.height(),
            cells: self.field.views(),
            cursor: self.cursor,
            phase: self.phase,
            elapsed: self.elapsed(),
            mines_left: self.mines_left(),
        }
    }

    fn ensure_active(&self) -> Result<(), GameError> {
        if self.phase.is_over() {
            return Err(GameError::Finished(self.phase));
        }
        Ok(())
    }

    fn out_of_bounds(&self, pos: Pos) -> GameError {
        GameError::OutOfBounds {
            row: pos.row,
            col: pos.col,
            width: self.field.width(),
            height: self.field.height(),
        }
    }

    /// Advance the phase after a reveal or chord
    fn settle(&mut self, mut changed: Vec<Pos>) -> Update {
        if self.phase == Phase::Ready && self.field.mines_placed() {
            self.phase = Phase::Playing;
            self.start_time = Some(Instant::now());
            info!("game started");
        }
        if self.phase == Phase::Playing {
            if self.field.exploded().is_some() {
                self.finish(Phase::Lost);
                changed.extend(self.field.reveal_all_mines());
            } else if self.field.is_won() {
                self.finish(Phase::Won);
                changed.extend(self.field.flag_all_mines());
            }
        }
        self.update(changed)
    }

    fn finish(&mut self, phase: Phase) {
        if let Some(t0) = self.start_time {
            self.elapsed = t0.elapsed();
        }
        self.phase = phase;
        info!(?phase, secs = self.elapsed.as_secs_f64(), "game finished");
    }

    fn update(&self, changed: Vec<Pos>) -> Update {
        Update {
            changed: changed
                .into_iter()
                .filter_map(|pos| self.field.view(pos).map(|view| (pos, view)))
                .collect(),
            phase: self.phase,
            cursor: self.cursor,
        }
    }
}
