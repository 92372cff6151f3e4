// Minefield state and the reveal/flag propagation rules
// Mines are placed lazily on the first reveal so the opening move is always safe

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::index;
use std::collections::VecDeque;
use tracing::{debug, trace};

use crate::tms_error::GameError;

/// Zero-based board coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

impl Pos {
    pub fn new(row: usize, col: usize) -> Self {
        Pos { row, col }
    }

    /// True if `other` is this cell or one of its eight neighbours
    pub fn touches(&self, other: Pos) -> bool {
        self.row.abs_diff(other.row) <= 1 && self.col.abs_diff(other.col) <= 1
    }
}

/// What the player has done to a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellState {
    Hidden,
    Flagged,
    Revealed,
}

/// A single cell on the minesweeper board
#[derive(Debug, Clone, Copy)]
pub struct Cell {
    pub mine: bool,        // Contains a mine
    pub adj: u8,           // Adjacent mine count (0-8), valid once mines are placed
    pub state: CellState,
}

impl Cell {
    const BLANK: Cell = Cell {
        mine: false,
        adj: 0,
        state: CellState::Hidden,
    };
}

/// Renderable form of a cell.
///
/// `Mine` and `WrongFlag` only show up after a mine has exploded, so a flag
/// never tells the player anything while the game is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellView {
    Hidden,
    Flagged,
    Revealed(u8),
    Mine { exploded: bool, flagged: bool },
    WrongFlag,
}

impl CellView {
    pub fn is_revealed(&self) -> bool {
        matches!(self, CellView::Revealed(_) | CellView::Mine { .. })
    }
}

pub struct Minefield {
    width: usize,
    height: usize,
    mine_count: usize,
    cells: Vec<Cell>,
    mines_placed: bool,
    revealed: usize,          // Revealed non-mine cells
    flagged: usize,
    exploded: Option<usize>,  // Index of the mine that ended the game
    rng: StdRng,
}

impl Minefield {
    /// Create an empty field; mines are placed on the first reveal
    pub fn new(width: usize, height: usize, mines: usize) -> Result<Self, GameError> {
        validate(width, height, mines)?;
        Ok(Self::build(width, height, mines, StdRng::from_entropy()))
    }

    /// Same as [`Minefield::new`] with a reproducible mine layout
    pub fn with_seed(width: usize, height: usize, mines: usize, seed: u64) -> Result<Self, GameError> {
        validate(width, height, mines)?;
        Ok(Self::build(width, height, mines, StdRng::seed_from_u64(seed)))
    }

    fn build(width: usize, height: usize, mines: usize, rng: StdRng) -> Self {
        Minefield {
            width,
            height,
            mine_count: mines,
            cells: vec![Cell::BLANK; width * height],
            mines_placed: false,
            revealed: 0,
            flagged: 0,
            exploded: None,
            rng,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn mine_count(&self) -> usize {
        self.mine_count
    }

    pub fn mines_placed(&self) -> bool {
        self.mines_placed
    }

    pub fn revealed_count(&self) -> usize {
        self.revealed
    }

    pub fn flagged_count(&self) -> usize {
        self.flagged
    }

    /// The mine that was revealed, if any
    pub fn exploded(&self) -> Option<Pos> {
        self.exploded.map(|i| self.pos_of(i))
    }

    pub fn cell(&self, pos: Pos) -> Option<&Cell> {
        self.index(pos).map(|i| &self.cells[i])
    }

    /// Every non-mine cell is revealed; flags do not matter
    pub fn is_won(&self) -> bool {
        self.revealed == self.width * self.height - self.mine_count
    }

    fn index(&self, pos: Pos) -> Option<usize> {
        (pos.row < self.height && pos.col < self.width).then(|| pos.row * self.width + pos.col)
    }

    fn checked_index(&self, pos: Pos) -> Result<usize, GameError> {
        self.index(pos).ok_or(GameError::OutOfBounds {
            row: pos.row,
            col: pos.col,
            width: self.width,
            height: self.height,
        })
    }

    fn pos_of(&self, idx: usize) -> Pos {
        Pos::new(idx / self.width, idx % self.width)
    }

    /// Randomly place mines away from `exclude` and its neighbours, then
    /// compute adjacency counts. Does nothing once mines are placed.
    ///
    /// When the board is too crowded to keep the whole 3x3 block clear, only
    /// `exclude` itself is kept free of mines.
    pub fn place_mines(&mut self, exclude: Pos) -> Result<(), GameError> {
        let origin = self.checked_index(exclude)?;
        if self.mines_placed {
            return Ok(());
        }
        let total = self.width * self.height;
        let mut candidates: Vec<usize> = (0..total)
            .filter(|&i| !exclude.touches(self.pos_of(i)))
            .collect();
        if candidates.len() < self.mine_count {
            debug!(
                free = candidates.len(),
                mines = self.mine_count,
                "safe zone does not fit, keeping only the first cell clear"
            );
            candidates = (0..total).filter(|&i| i != origin).collect();
        }
        for pick in index::sample(&mut self.rng, candidates.len(), self.mine_count).into_iter() {
            self.cells[candidates[pick]].mine = true;
        }
        for i in 0..total {
            let adj = neighbours(self.width, self.height, i)
                .filter(|&n| self.cells[n].mine)
                .count();
            self.cells[i].adj = adj as u8;
        }
        self.mines_placed = true;
        debug!(row = exclude.row, col = exclude.col, mines = self.mine_count, "mines placed");
        Ok(())
    }

    /// Reveal a hidden cell, flooding through zero-count regions.
    ///
    /// Returns every cell whose state changed. Flagged or already revealed
    /// cells are left alone and yield an empty list.
    pub fn reveal(&mut self, pos: Pos) -> Result<Vec<Pos>, GameError> {
        let idx = self.checked_index(pos)?;
        if self.cells[idx].state != CellState::Hidden {
            return Ok(Vec::new());
        }
        if !self.mines_placed {
            self.place_mines(pos)?;
        }
        let mut changed = Vec::new();
        self.open(idx, &mut changed);
        Ok(changed)
    }

    fn open(&mut self, start: usize, changed: &mut Vec<Pos>) {
        let cell = &mut self.cells[start];
        cell.state = CellState::Revealed;
        let (mine, adj) = (cell.mine, cell.adj);
        changed.push(self.pos_of(start));
        if mine {
            self.exploded = Some(start);
            return;
        }
        self.revealed += 1;
        if adj > 0 {
            return;
        }

        // Worklist flood fill; a cell is marked revealed when queued so it is visited once
        let first = changed.len();
        let mut queue = VecDeque::from([start]);
        while let Some(idx) = queue.pop_front() {
            for n in neighbours(self.width, self.height, idx) {
                let cell = &mut self.cells[n];
                if cell.state != CellState::Hidden || cell.mine {
                    continue;
                }
                cell.state = CellState::Revealed;
                let expand = cell.adj == 0;
                self.revealed += 1;
                changed.push(Pos::new(n / self.width, n % self.width));
                if expand {
                    queue.push_back(n);
                }
            }
        }
        trace!(from = start, cells = changed.len() - first + 1, "flood reveal");
    }

    /// Toggle between hidden and flagged. Revealed cells yield `None`.
    pub fn toggle_flag(&mut self, pos: Pos) -> Result<Option<Pos>, GameError> {
        let idx = self.checked_index(pos)?;
        let cell = &mut self.cells[idx];
        match cell.state {
            CellState::Hidden => {
                cell.state = CellState::Flagged;
                self.flagged += 1;
            }
            CellState::Flagged => {
                cell.state = CellState::Hidden;
                self.flagged -= 1;
            }
            CellState::Revealed => return Ok(None),
        }
        Ok(Some(pos))
    }

    /// Reveal the unflagged neighbours of a numbered cell whose flag count
    /// matches its number. Anything else is a no-op.
    ///
    /// Stops at the first mine a wrong flag let through.
    pub fn chord_reveal(&mut self, pos: Pos) -> Result<Vec<Pos>, GameError> {
        let idx = self.checked_index(pos)?;
        let cell = self.cells[idx];
        if cell.state != CellState::Revealed || cell.mine || cell.adj == 0 {
            return Ok(Vec::new());
        }
        let flags = neighbours(self.width, self.height, idx)
            .filter(|&n| self.cells[n].state == CellState::Flagged)
            .count();
        if flags != cell.adj as usize {
            return Ok(Vec::new());
        }
        let targets: Vec<usize> = neighbours(self.width, self.height, idx)
            .filter(|&n| self.cells[n].state == CellState::Hidden)
            .collect();
        let mut changed = Vec::new();
        for n in targets {
            // an earlier flood may already have opened it
            if self.cells[n].state != CellState::Hidden {
                continue;
            }
            self.open(n, &mut changed);
            if self.exploded.is_some() {
                break;
            }
        }
        Ok(changed)
    }

    /// Reveal every hidden mine for the end-of-game board.
    ///
    /// Flagged cells keep their flag but are reported as well, since their
    /// view now shows whether the flag was right.
    pub fn reveal_all_mines(&mut self) -> Vec<Pos> {
        let mut changed = Vec::new();
        for i in 0..self.cells.len() {
            let cell = &mut self.cells[i];
            match cell.state {
                CellState::Hidden if cell.mine => cell.state = CellState::Revealed,
                CellState::Flagged => {}
                _ => continue,
            }
            changed.push(self.pos_of(i));
        }
        changed
    }

    /// Flag every mine still hidden, used once the game is won
    pub fn flag_all_mines(&mut self) -> Vec<Pos> {
        let mut changed = Vec::new();
        for i in 0..self.cells.len() {
            let cell = &mut self.cells[i];
            if cell.mine && cell.state == CellState::Hidden {
                cell.state = CellState::Flagged;
                self.flagged += 1;
                changed.push(self.pos_of(i));
            }
        }
        changed
    }

    pub fn view(&self, pos: Pos) -> Option<CellView> {
        self.index(pos).map(|i| self.view_at(i))
    }

    /// Views of all cells in row-major order
    pub fn views(&self) -> Vec<CellView> {
        (0..self.cells.len()).map(|i| self.view_at(i)).collect()
    }

    fn view_at(&self, idx: usize) -> CellView {
        let cell = self.cells[idx];
        let over = self.exploded.is_some();
        match cell.state {
            CellState::Hidden => CellView::Hidden,
            CellState::Flagged if over && cell.mine => CellView::Mine {
                exploded: false,
                flagged: true,
            },
            CellState::Flagged if over => CellView::WrongFlag,
            CellState::Flagged => CellView::Flagged,
            CellState::Revealed if cell.mine => CellView::Mine {
                exploded: self.exploded == Some(idx),
                flagged: false,
            },
            CellState::Revealed => CellView::Revealed(cell.adj),
        }
    }

    /// Build a field with a fixed layout, `*` marking mines
    #[cfg(test)]
    pub(crate) fn from_layout(rows: &[&str]) -> Minefield {
        let height = rows.len();
        let width = rows[0].len();
        let mut field = Self::build(width, height, 0, StdRng::seed_from_u64(0));
        for (r, line) in rows.iter().enumerate() {
            for (c, ch) in line.chars().enumerate() {
                if ch == '*' {
                    field.cells[r * width + c].mine = true;
                    field.mine_count += 1;
                }
            }
        }
        for i in 0..width * height {
            let adj = neighbours(width, height, i)
                .filter(|&n| field.cells[n].mine)
                .count();
            field.cells[i].adj = adj as u8;
        }
        field.mines_placed = true;
        field
    }
}

/// Largest board accepted; far beyond anything a terminal can show
const MAX_CELLS: usize = 1 << 20;

fn validate(width: usize, height: usize, mines: usize) -> Result<(), GameError> {
    let cells = width.checked_mul(height).filter(|&c| c <= MAX_CELLS);
    let reason = if width == 0 || height == 0 {
        "board dimensions must be positive"
    } else if cells.is_none() {
        "board is too large"
    } else if mines == 0 {
        "at least one mine is required"
    } else if cells.is_some_and(|c| mines >= c) {
        "mines must leave at least one safe cell"
    } else {
        return Ok(());
    };
    Err(GameError::InvalidConfiguration {
        width,
        height,
        mines,
        reason,
    })
}

/// Indices of the up to eight cells around `idx`; off-board neighbours are skipped
fn neighbours(width: usize, height: usize, idx: usize) -> impl Iterator<Item = usize> {
    let (row, col) = (idx / width, idx % width);
    (row.saturating_sub(1)..=(row + 1).min(height - 1))
        .flat_map(move |r| (col.saturating_sub(1)..=(col + 1).min(width - 1)).map(move |c| r * width + c))
        .filter(move |&i| i != idx)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_at(field: &Minefield, row: usize, col: usize) -> CellState {
        field.cell(Pos::new(row, col)).unwrap().state
    }

    fn count_state(field: &Minefield, state: CellState) -> usize {
        field.cells.iter().filter(|c| c.state == state).count()
    }

    #[test]
    fn test_rejects_overflowing_dimensions() {
        for (w, h) in [(usize::MAX, 2), (100_000, 100_000), (MAX_CELLS + 1, 1)] {
            match Minefield::new(w, h, 1) {
                Err(GameError::InvalidConfiguration { reason, .. }) => assert_eq!(reason, "board is too large"),
                other => panic!("{w}x{h} accepted: {:?}", other.map(|f| f.width())),
            }
        }
        assert!(Minefield::with_seed(MAX_CELLS, 1, 1, 7).is_ok());
    }

    #[test]
    fn test_rejects_invalid_configuration() {
        for (w, h, n) in [(1, 1, 1), (0, 9, 1), (9, 0, 1), (3, 3, 9), (3, 3, 12), (9, 9, 0)] {
            let err = Minefield::new(w, h, n).err().unwrap();
            assert!(matches!(err, GameError::InvalidConfiguration { .. }), "{w}x{h}/{n}");
        }
        assert!(Minefield::new(2, 1, 1).is_ok());
    }

    #[test]
    fn test_first_reveal_clears_neighbourhood() {
        for seed in 0..200 {
            let mut field = Minefield::with_seed(9, 9, 10, seed).unwrap();
            field.reveal(Pos::new(4, 4)).unwrap();
            for row in 3..=5 {
                for col in 3..=5 {
                    assert!(!field.cell(Pos::new(row, col)).unwrap().mine, "seed {seed}");
                }
            }
            assert_eq!(field.cells.iter().filter(|c| c.mine).count(), 10);
            assert!(field.exploded().is_none());
        }
    }

    #[test]
    fn test_first_reveal_safe_at_edges_and_dense_boards() {
        let starts = [(0, 0), (0, 15), (15, 0), (15, 15), (7, 0), (0, 8)];
        for (seed, &(r, c)) in starts.iter().enumerate() {
            let mut field = Minefield::with_seed(16, 16, 40, seed as u64).unwrap();
            let origin = Pos::new(r, c);
            field.reveal(origin).unwrap();
            for (i, cell) in field.cells.iter().enumerate() {
                if origin.touches(field.pos_of(i)) {
                    assert!(!cell.mine);
                }
            }
        }
    }

    #[test]
    fn test_crowded_board_falls_back_to_single_safe_cell() {
        for seed in 0..20 {
            let mut field = Minefield::with_seed(2, 2, 3, seed).unwrap();
            let changed = field.reveal(Pos::new(0, 0)).unwrap();
            assert_eq!(changed, vec![Pos::new(0, 0)]);
            assert_eq!(field.cell(Pos::new(0, 0)).unwrap().adj, 3);
            assert!(field.is_won());
        }
    }

    #[test]
    fn test_place_mines_is_idempotent() {
        let mut field = Minefield::with_seed(9, 9, 10, 7).unwrap();
        field.place_mines(Pos::new(0, 0)).unwrap();
        let layout: Vec<bool> = field.cells.iter().map(|c| c.mine).collect();
        field.place_mines(Pos::new(8, 8)).unwrap();
        let again: Vec<bool> = field.cells.iter().map(|c| c.mine).collect();
        assert_eq!(layout, again);
        assert!(field.mines_placed());
    }

    #[test]
    fn test_adjacency_counts() {
        let field = Minefield::from_layout(&[
            "*.*",
            "...",
            "..*",
        ]);
        let adj: Vec<u8> = field.cells.iter().map(|c| c.adj).collect();
        assert_eq!(adj, vec![0, 2, 0, 1, 3, 2, 0, 1, 0]);
    }

    #[test]
    fn test_flood_fill_stops_at_numbered_boundary() {
        let mut field = Minefield::from_layout(&[
            "..*..",
            "..*..",
            "..*..",
        ]);
        let changed = field.reveal(Pos::new(0, 0)).unwrap();
        assert_eq!(changed.len(), 6);
        for row in 0..3 {
            assert_eq!(state_at(&field, row, 0), CellState::Revealed);
            assert_eq!(state_at(&field, row, 1), CellState::Revealed);
            assert_eq!(state_at(&field, row, 3), CellState::Hidden);
            assert_eq!(state_at(&field, row, 4), CellState::Hidden);
        }
        assert_eq!(field.revealed_count(), 6);
    }

    #[test]
    fn test_flood_fill_region_property() {
        for seed in 0..50 {
            let mut field = Minefield::with_seed(16, 16, 40, seed).unwrap();
            let start = Pos::new(8, 8);
            let changed = field.reveal(start).unwrap();
            assert_eq!(changed.len(), field.revealed_count());
            for &pos in &changed {
                let idx = field.index(pos).unwrap();
                assert!(!field.cells[idx].mine);
                // every opened cell other than the start borders an opened zero
                if pos != start {
                    assert!(neighbours(16, 16, idx).any(|n| {
                        field.cells[n].state == CellState::Revealed && field.cells[n].adj == 0
                    }));
                }
                // opened zeros have all neighbours opened
                if field.cells[idx].adj == 0 {
                    assert!(neighbours(16, 16, idx).all(|n| field.cells[n].state == CellState::Revealed));
                }
            }
        }
    }

    #[test]
    fn test_flood_fill_skips_flags() {
        let mut field = Minefield::from_layout(&[
            ".....",
            ".....",
            "....*",
        ]);
        field.toggle_flag(Pos::new(0, 2)).unwrap();
        let changed = field.reveal(Pos::new(0, 0)).unwrap();
        assert!(!changed.contains(&Pos::new(0, 2)));
        assert_eq!(state_at(&field, 0, 2), CellState::Flagged);
        assert_eq!(state_at(&field, 0, 4), CellState::Revealed);
        assert!(!field.is_won());
    }

    #[test]
    fn test_reveal_flagged_or_revealed_is_noop() {
        let mut field = Minefield::from_layout(&[
            "*..",
            "...",
        ]);
        field.toggle_flag(Pos::new(0, 0)).unwrap();
        assert!(field.reveal(Pos::new(0, 0)).unwrap().is_empty());
        assert_eq!(field.reveal(Pos::new(1, 1)).unwrap(), vec![Pos::new(1, 1)]);
        assert!(field.reveal(Pos::new(1, 1)).unwrap().is_empty());
        assert_eq!(field.revealed_count(), 1);
    }

    #[test]
    fn test_reveal_mine_explodes() {
        let mut field = Minefield::from_layout(&[
            "*..",
            "..*",
        ]);
        field.toggle_flag(Pos::new(0, 2)).unwrap();
        let changed = field.reveal(Pos::new(0, 0)).unwrap();
        assert_eq!(changed, vec![Pos::new(0, 0)]);
        assert_eq!(field.exploded(), Some(Pos::new(0, 0)));
        assert_eq!(field.revealed_count(), 0);

        let shown = field.reveal_all_mines();
        assert!(shown.contains(&Pos::new(1, 2)));
        assert!(shown.contains(&Pos::new(0, 2)));
        assert_eq!(
            field.view(Pos::new(0, 0)),
            Some(CellView::Mine { exploded: true, flagged: false })
        );
        assert_eq!(
            field.view(Pos::new(1, 2)),
            Some(CellView::Mine { exploded: false, flagged: false })
        );
        assert_eq!(field.view(Pos::new(0, 2)), Some(CellView::WrongFlag));
    }

    #[test]
    fn test_flag_hides_contents_while_playing() {
        let mut field = Minefield::from_layout(&[
            "*.",
            "..",
        ]);
        field.toggle_flag(Pos::new(0, 0)).unwrap();
        field.toggle_flag(Pos::new(1, 1)).unwrap();
        assert_eq!(field.view(Pos::new(0, 0)), Some(CellView::Flagged));
        assert_eq!(field.view(Pos::new(1, 1)), Some(CellView::Flagged));
    }

    #[test]
    fn test_toggle_flag_twice_restores_hidden() {
        let mut field = Minefield::with_seed(9, 9, 10, 3).unwrap();
        let pos = Pos::new(2, 5);
        let before = field.flagged_count();
        assert_eq!(field.toggle_flag(pos).unwrap(), Some(pos));
        assert_eq!(field.flagged_count(), before + 1);
        assert_eq!(field.toggle_flag(pos).unwrap(), Some(pos));
        assert_eq!(field.flagged_count(), before);
        assert_eq!(state_at(&field, 2, 5), CellState::Hidden);
    }

    #[test]
    fn test_toggle_flag_on_revealed_is_noop() {
        let mut field = Minefield::from_layout(&["*..", "..."]);
        field.reveal(Pos::new(1, 2)).unwrap();
        assert_eq!(field.toggle_flag(Pos::new(1, 2)).unwrap(), None);
        assert_eq!(field.flagged_count(), 0);
    }

    #[test]
    fn test_chord_requires_matching_flags() {
        let mut field = Minefield::from_layout(&[
            "*..",
            "...",
            "..*",
        ]);
        let centre = Pos::new(1, 1);
        field.reveal(centre).unwrap();
        assert!(field.chord_reveal(centre).unwrap().is_empty());
        field.toggle_flag(Pos::new(0, 0)).unwrap();
        assert!(field.chord_reveal(centre).unwrap().is_empty());
        field.toggle_flag(Pos::new(2, 2)).unwrap();
        let changed = field.chord_reveal(centre).unwrap();
        assert_eq!(changed.len(), 6);
        assert!(field.is_won());
        assert!(field.exploded().is_none());
    }

    #[test]
    fn test_chord_on_hidden_or_zero_cell_is_noop() {
        let mut field = Minefield::from_layout(&[
            "*...",
            "....",
        ]);
        assert!(field.chord_reveal(Pos::new(1, 1)).unwrap().is_empty());
        field.reveal(Pos::new(1, 3)).unwrap();
        assert!(field.chord_reveal(Pos::new(1, 3)).unwrap().is_empty());
    }

    #[test]
    fn test_chord_with_wrong_flag_explodes() {
        let mut field = Minefield::from_layout(&[
            "*..",
            "...",
        ]);
        field.reveal(Pos::new(1, 1)).unwrap();
        field.toggle_flag(Pos::new(0, 1)).unwrap();
        let changed = field.chord_reveal(Pos::new(1, 1)).unwrap();
        assert!(changed.contains(&Pos::new(0, 0)));
        assert_eq!(field.exploded(), Some(Pos::new(0, 0)));
    }

    #[test]
    fn test_out_of_bounds_is_rejected_without_change() {
        let mut field = Minefield::with_seed(9, 9, 10, 1).unwrap();
        let pos = Pos::new(9, 0);
        assert!(matches!(field.reveal(pos), Err(GameError::OutOfBounds { .. })));
        assert!(matches!(field.toggle_flag(pos), Err(GameError::OutOfBounds { .. })));
        assert!(matches!(field.chord_reveal(pos), Err(GameError::OutOfBounds { .. })));
        assert!(!field.mines_placed());
        assert_eq!(count_state(&field, CellState::Hidden), 81);
    }

    #[test]
    fn test_won_regardless_of_flags() {
        let mut field = Minefield::from_layout(&[
            "*.",
            "..",
        ]);
        field.toggle_flag(Pos::new(0, 1)).unwrap();
        field.reveal(Pos::new(1, 0)).unwrap();
        field.reveal(Pos::new(1, 1)).unwrap();
        assert!(!field.is_won());
        field.toggle_flag(Pos::new(0, 1)).unwrap();
        field.reveal(Pos::new(0, 1)).unwrap();
        assert!(field.is_won());
        assert_eq!(field.flag_all_mines(), vec![Pos::new(0, 0)]);
        assert_eq!(field.flagged_count(), 1);
    }

    #[test]
    fn test_cells_partition_during_play() {
        let mut field = Minefield::with_seed(12, 10, 25, 11).unwrap();
        let total = 12 * 10;
        let mut step = 0usize;
        while field.exploded().is_none() && !field.is_won() && step < 400 {
            let pos = Pos::new((step * 7) % 10, (step * 5) % 12);
            if step % 3 == 0 {
                field.toggle_flag(pos).unwrap();
            } else {
                field.reveal(pos).unwrap();
            }
            let revealed = count_state(&field, CellState::Revealed);
            let hidden = count_state(&field, CellState::Hidden);
            let flagged = count_state(&field, CellState::Flagged);
            assert_eq!(revealed + hidden + flagged, total);
            assert_eq!(flagged, field.flagged_count());
            let safe_revealed = field
                .cells
                .iter()
                .filter(|c| c.state == CellState::Revealed && !c.mine)
                .count();
            assert_eq!(safe_revealed, field.revealed_count());
            step += 1;
        }
    }
}
