// Terminal front end: raw mode, mouse capture, the ratatui layout and the event loop
// Only talks to the game through GameSession and its Update/Snapshot values

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
    MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Span, Spans, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::{Frame, Terminal};
use std::error::Error;
use std::io;
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use unicode_width::UnicodeWidthStr;

use crate::tms_cli::RunOptions;
use crate::tms_color::{Depth, Theme};
use crate::tms_config::Config;
use crate::tms_error::GameError;
use crate::tms_field::{CellView, Pos};
use crate::tms_session::{self, GameSession, Phase, Snapshot, Update};

const PANEL_WIDTH: u16 = 34;
const PANEL_HEIGHT: u16 = 24;
const TITLE_HEIGHT: u16 = 3;
const FLASH_TIME: Duration = Duration::from_millis(350);
const PULSE_TIME: Duration = Duration::from_millis(200);

const FULLWIDTH_DIGITS: [&str; 9] = ["　", "１", "２", "３", "４", "５", "６", "７", "８"];

fn cols(n: usize) -> u16 {
    n.min(u16::MAX as usize) as u16
}

/// Board widget size: two columns per cell, a padding column and the border
fn board_size(w: usize, h: usize) -> (u16, u16) {
    (cols(w).saturating_mul(2).saturating_add(3), cols(h).saturating_add(2))
}

/// Smallest terminal (columns, rows) that fits a w x h board with the side panel
pub fn required_size(w: usize, h: usize) -> (u16, u16) {
    let (bw, bh) = board_size(w, h);
    (bw.saturating_add(PANEL_WIDTH + 2), bh.max(PANEL_HEIGHT).saturating_add(TITLE_HEIGHT))
}

/// What a key press asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Intent {
    Move(tms_session::Direction),
    Reveal,
    Flag,
    Chord,
    Restart,
    ToggleIcons,
    Quit,
}

fn key_intent(key: &KeyEvent) -> Option<Intent> {
    use tms_session::Direction::*;
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C')).then_some(Intent::Quit);
    }
    let intent = match key.code {
        KeyCode::Up => Intent::Move(Up),
        KeyCode::Down => Intent::Move(Down),
        KeyCode::Left => Intent::Move(Left),
        KeyCode::Right => Intent::Move(Right),
        KeyCode::Enter => Intent::Restart,
        KeyCode::Esc => Intent::Quit,
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'w' => Intent::Move(Up),
            's' => Intent::Move(Down),
            'a' => Intent::Move(Left),
            'd' => Intent::Move(Right),
            'q' => Intent::Reveal,
            'e' => Intent::Flag,
            ' ' => Intent::Chord,
            't' => Intent::ToggleIcons,
            _ => return None,
        },
        _ => return None,
    };
    Some(intent)
}

/// Board cell under a terminal position; `rect` is the bordered board widget
fn cell_at(rect: Rect, column: u16, row: u16, w: usize, h: usize) -> Option<Pos> {
    let (x0, y0) = (rect.x + 1, rect.y + 1);
    if column < x0 || row < y0 {
        return None;
    }
    let pos = Pos::new((row - y0) as usize, ((column - x0) / 2) as usize);
    (pos.row < h && pos.col < w).then_some(pos)
}

/// "MM:SS.cc"
fn format_time(d: Duration) -> String {
    let cs = d.as_millis() / 10;
    format!("{:02}:{:02}.{:02}", cs / 6000, (cs / 100) % 60, cs % 100)
}

struct Glyphs {
    ascii: bool,
    hidden: &'static str,
    flag: &'static str,
    mine: &'static str,
    exploded: &'static str,
    flagged_mine: &'static str,
    wrong_flag: &'static str,
}

impl Glyphs {
    fn new(ascii: bool) -> Self {
        if ascii {
            Glyphs { ascii, hidden: " .", flag: " F", mine: " O", exploded: " *", flagged_mine: " X", wrong_flag: " x" }
        } else {
            Glyphs { ascii, hidden: " ■", flag: "🚩", mine: "💣", exploded: "💥", flagged_mine: "🏁", wrong_flag: "❌" }
        }
    }

    /// Status face for the side panel
    fn face(&self, phase: Phase, tense: bool) -> &'static str {
        match (phase, tense, self.ascii) {
            (Phase::Lost, _, false) => "😵",
            (Phase::Lost, _, true) => "X(",
            (Phase::Won, _, false) => "😎",
            (Phase::Won, _, true) => "B)",
            (_, true, false) => "😲",
            (_, true, true) => ":o",
            (_, false, false) => "🙂",
            (_, false, true) => ":)",
        }
    }
}

/// Two-column text for one cell
fn cell_text(view: CellView, glyphs: &Glyphs) -> String {
    match view {
        CellView::Hidden => glyphs.hidden.to_string(),
        CellView::Flagged => glyphs.flag.to_string(),
        CellView::Revealed(0) => "  ".to_string(),
        CellView::Revealed(n) if glyphs.ascii => format!(" {n}"),
        CellView::Revealed(n) => FULLWIDTH_DIGITS[(n as usize).min(8)].to_string(),
        CellView::Mine { exploded: true, .. } => glyphs.exploded.to_string(),
        CellView::Mine { flagged: true, .. } => glyphs.flagged_mine.to_string(),
        CellView::Mine { .. } => glyphs.mine.to_string(),
        CellView::WrongFlag => glyphs.wrong_flag.to_string(),
    }
}

/// What the screen currently shows, kept in step with the session by Update deltas
#[derive(Debug, Clone, PartialEq)]
struct BoardView {
    width: usize,
    height: usize,
    cells: Vec<CellView>,
}

impl BoardView {
    fn from_snapshot(snap: &Snapshot) -> Self {
        BoardView { width: snap.width, height: snap.height, cells: snap.cells.clone() }
    }

    fn apply(&mut self, update: &Update) {
        for &(pos, view) in &update.changed {
            if pos.row < self.height && pos.col < self.width {
                self.cells[pos.row * self.width + pos.col] = view;
            }
        }
    }

    fn get(&self, pos: Pos) -> CellView {
        self.cells[pos.row * self.width + pos.col]
    }
}

enum Flow {
    Continue,
    Restart,
    Quit,
}

struct UiState {
    board: BoardView,
    glyphs: Glyphs,
    flash: Option<(Pos, Instant)>,  // Chord that did nothing
    pulse: Option<(Pos, Instant)>,  // Keyboard chord highlight
    held: Option<Pos>,              // Middle button down
    board_rect: Option<Rect>,
    close_rect: Option<Rect>,
    close_hovered: bool,
}

impl UiState {
    fn new(session: &GameSession, ascii: bool) -> Self {
        UiState {
            board: BoardView::from_snapshot(&session.snapshot()),
            glyphs: Glyphs::new(ascii),
            flash: None,
            pulse: None,
            held: None,
            board_rect: None,
            close_rect: None,
            close_hovered: false,
        }
    }

    /// Rebuild from a full snapshot, after a new game or a resize
    fn resync(&mut self, session: &GameSession) {
        self.board = BoardView::from_snapshot(&session.snapshot());
        self.flash = None;
        self.pulse = None;
        self.held = None;
    }

    fn absorb(&mut self, result: Result<Update, GameError>) -> Option<Update> {
        match result {
            Ok(update) => {
                self.board.apply(&update);
                Some(update)
            }
            Err(e) if e.is_invalid_operation() => {
                debug!(error = %e, "operation rejected");
                None
            }
            Err(e) => {
                warn!(error = %e, "unexpected game error");
                None
            }
        }
    }

    fn chord(&mut self, session: &mut GameSession, pos: Pos) {
        let before = self.board.get(pos);
        if let Some(update) = self.absorb(session.chord_reveal(pos)) {
            if update.is_empty() && matches!(before, CellView::Revealed(n) if n > 0) {
                self.flash = Some((pos, Instant::now()));
            }
        }
    }

    /// 3x3 area shown as pressed while a chord is held or just happened
    fn pressed(&self, pos: Pos, now: Instant) -> bool {
        let pulse = self.pulse.filter(|(_, t)| now.duration_since(*t) < PULSE_TIME).map(|(p, _)| p);
        self.held.or(pulse).is_some_and(|c| c.touches(pos))
    }

    fn flashing(&self, pos: Pos, now: Instant) -> bool {
        self.flash.is_some_and(|(p, t)| p == pos && now.duration_since(t) < FLASH_TIME)
    }
}

fn apply_intent(session: &mut GameSession, ui: &mut UiState, cfg: &mut Config, intent: Intent) -> Flow {
    let cursor = session.cursor();
    match intent {
        Intent::Move(dir) => {
            session.cursor_move(dir);
        }
        Intent::Reveal => {
            ui.absorb(session.reveal(cursor));
        }
        Intent::Flag => {
            ui.absorb(session.toggle_flag(cursor));
        }
        Intent::Chord => {
            ui.pulse = Some((cursor, Instant::now()));
            ui.chord(session, cursor);
        }
        Intent::ToggleIcons => {
            cfg.ascii_icons = !cfg.ascii_icons;
            ui.glyphs = Glyphs::new(cfg.ascii_icons);
        }
        Intent::Restart => return Flow::Restart,
        Intent::Quit => return Flow::Quit,
    }
    Flow::Continue
}

fn handle_mouse(session: &mut GameSession, ui: &mut UiState, me: MouseEvent) -> Flow {
    if let Some(close) = ui.close_rect {
        let over = me.column >= close.x && me.column < close.x + close.width && me.row == close.y;
        ui.close_hovered = over;
        if over && me.kind == MouseEventKind::Up(MouseButton::Left) {
            return Flow::Quit;
        }
    }
    let (w, h) = (session.field().width(), session.field().height());
    let cell = ui.board_rect.and_then(|r| cell_at(r, me.column, me.row, w, h));
    match me.kind {
        MouseEventKind::Moved | MouseEventKind::Drag(_) => {
            if let Some(pos) = cell {
                ui.absorb(session.set_cursor(pos));
                if ui.held.is_some() {
                    ui.held = Some(pos);
                }
            }
        }
        MouseEventKind::Down(MouseButton::Middle) => ui.held = cell,
        MouseEventKind::Up(button) => {
            if button == MouseButton::Middle {
                ui.held = None;
            }
            if let Some(pos) = cell {
                ui.absorb(session.set_cursor(pos));
                match button {
                    MouseButton::Left => {
                        ui.absorb(session.reveal(pos));
                    }
                    MouseButton::Right => {
                        ui.absorb(session.toggle_flag(pos));
                    }
                    MouseButton::Middle => ui.chord(session, pos),
                }
            }
        }
        _ => {}
    }
    Flow::Continue
}

fn center_rect(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

fn draw<B: Backend>(f: &mut Frame<B>, session: &GameSession, ui: &mut UiState, theme: &Theme, cfg: &Config) {
    let size = f.size();
    let base = Style::default().fg(theme.fg).bg(theme.bg);
    let (w, h) = (ui.board.width, ui.board.height);
    let (min_w, min_h) = required_size(w, h);

    f.render_widget(Block::default().style(base), size);
    if size.width < min_w || size.height < min_h {
        ui.board_rect = None;
        ui.close_rect = None;
        let warn_lines = vec![
            Spans::from(Span::raw("Terminal size too small.")),
            Spans::from(Span::raw(format!("Minimum required: {} x {}", min_w, min_h))),
        ];
        let p = Paragraph::new(Text::from(warn_lines))
            .block(Block::default().borders(Borders::ALL).title("Resize Terminal"))
            .alignment(Alignment::Center)
            .style(base);
        let area = center_rect(40, 4, size);
        f.render_widget(Clear, area);
        f.render_widget(p, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(TITLE_HEIGHT), Constraint::Min(0)].as_ref())
        .split(size);
    draw_title(f, chunks[0], ui, theme, cfg);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(PANEL_WIDTH)].as_ref())
        .split(chunks[1]);

    let (bw, bh) = board_size(w, h);
    let board_area = center_rect(bw, bh, body[0]);
    ui.board_rect = Some(board_area);

    let now = Instant::now();
    let cursor = session.cursor();
    let mut lines = Vec::with_capacity(h);
    for row in 0..h {
        let mut spans = Vec::with_capacity(w + 1);
        for col in 0..w {
            let pos = Pos::new(row, col);
            let view = ui.board.get(pos);
            let mut style = base;
            match view {
                CellView::Revealed(n) => style = style.fg(theme.numbers[(n as usize).min(8)]).add_modifier(Modifier::BOLD),
                CellView::Flagged | CellView::WrongFlag => style = style.fg(theme.flag),
                CellView::Mine { exploded: true, .. } => style = style.bg(theme.flash_bg),
                _ => {}
            }
            if view == CellView::Hidden && ui.pressed(pos, now) {
                style = style.fg(theme.highlight_fg).bg(theme.highlight_bg);
            }
            if ui.flashing(pos, now) {
                style = style.fg(theme.flash_fg).bg(theme.flash_bg).add_modifier(Modifier::BOLD);
            } else if pos == cursor {
                style = style.add_modifier(Modifier::REVERSED);
            }
            spans.push(Span::styled(cell_text(view, &ui.glyphs), style));
        }
        spans.push(Span::styled(" ", base));
        lines.push(Spans::from(spans));
    }
    let board = Paragraph::new(Text::from(lines))
        .block(Block::default().borders(Borders::ALL).title(cfg.difficulty.name()).title_alignment(Alignment::Center))
        .alignment(Alignment::Left)
        .style(base);
    f.render_widget(board, board_area);

    let panel_area = Rect::new(body[1].x, body[1].y, body[1].width, body[1].height.min(PANEL_HEIGHT));
    draw_panel(f, panel_area, session, ui, theme, now);
}

fn draw_title<B: Backend>(f: &mut Frame<B>, area: Rect, ui: &mut UiState, theme: &Theme, cfg: &Config) {
    let base = Style::default().fg(theme.fg).bg(theme.bg);
    let close_style = if ui.close_hovered {
        Style::default().fg(theme.flash_fg).bg(theme.flash_bg).add_modifier(Modifier::BOLD)
    } else {
        base.fg(theme.flag).add_modifier(Modifier::BOLD)
    };
    let (w, h, n) = cfg.difficulty.params();
    let title = "Terminal Minesweeper";
    let info = format!("{} {}x{}, {} mines ", cfg.difficulty.name(), w, h, n);
    let used = 5 + UnicodeWidthStr::width(title) + UnicodeWidthStr::width(info.as_str());
    let gap = (area.width.saturating_sub(2) as usize).saturating_sub(used);
    let spans = vec![
        Span::styled(" ", base),
        Span::styled(" X ", close_style),
        Span::styled(" ", base),
        Span::styled(title, base.add_modifier(Modifier::BOLD)),
        Span::styled(" ".repeat(gap), base),
        Span::styled(info, base),
    ];
    ui.close_rect = Some(Rect::new(area.x + 2, area.y + 1, 3, 1));
    let p = Paragraph::new(Spans::from(spans)).block(Block::default().borders(Borders::ALL)).style(base);
    f.render_widget(p, area);
}

fn draw_panel<B: Backend>(f: &mut Frame<B>, area: Rect, session: &GameSession, ui: &UiState, theme: &Theme, now: Instant) {
    let base = Style::default().fg(theme.fg).bg(theme.bg);
    let key = base.fg(theme.key).add_modifier(Modifier::BOLD);
    let heading = base.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
    let g = &ui.glyphs;
    let phase = session.phase();

    let tense = ui.held.is_some() || ui.pulse.is_some_and(|(_, t)| now.duration_since(t) < PULSE_TIME);
    let message = match phase {
        Phase::Ready => "Reveal any cell",
        Phase::Playing => "",
        Phase::Won => "You win!",
        Phase::Lost => "Boom! Enter restarts",
    };
    let counter = if g.ascii { "F x" } else { "🚩 ×" };

    let legend = |label: &str, keys: &str| {
        Spans::from(vec![Span::styled(format!(" {label:<16}"), base), Span::styled(keys.to_string(), key)])
    };
    let symbol = |glyph: &str, label: &str| Spans::from(Span::styled(format!(" {glyph} {label}"), base));

    let lines = vec![
        Spans::from(vec![
            Span::styled(format!(" {}  ", g.face(phase, tense)), base),
            Span::styled(message, base.fg(theme.indicator).add_modifier(Modifier::BOLD)),
        ]),
        Spans::from(Span::styled(format!(" Time   {}", format_time(session.elapsed())), base)),
        Spans::from(Span::styled(format!(" Mines  {} {}", counter, session.mines_left()), base)),
        Spans::from(""),
        Spans::from(Span::styled("Navigation", heading)),
        Spans::from(vec![Span::styled("    [W]        [↑]      ", key), Span::styled("Move", base)]),
        Spans::from(vec![Span::styled(" [A][S][D]  [←][↓][→]  ", key), Span::styled("cursor", base)]),
        Spans::from(""),
        Spans::from(Span::styled("Operation", heading)),
        legend("Reveal cell", "[LMB]/[Q]"),
        legend("Reveal area", "[MMB]/[Space]"),
        legend("Flag cell", "[RMB]/[E]"),
        legend("Restart", "[Enter]"),
        legend("Toggle emojis", "[T]"),
        legend("Quit", "[Esc]"),
        Spans::from(""),
        Spans::from(Span::styled("Symbols", heading)),
        symbol(g.exploded, "Exploded mine"),
        symbol(g.flagged_mine, "Flagged mine"),
        symbol(g.mine, "Unflagged mine"),
        symbol(g.flag, "Flag"),
        symbol(g.wrong_flag, "Wrong flag"),
    ];
    let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL)).style(base);
    f.render_widget(p, area);
}

pub fn run(cfg: &mut Config, opts: &RunOptions, session: GameSession) -> Result<(), Box<dyn Error>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnableMouseCapture, terminal::EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.hide_cursor()?;

    let res = event_loop(&mut terminal, cfg, opts, session);

    // Restore the terminal even when the loop failed
    let _ = disable_raw_mode();
    let _ = execute!(terminal.backend_mut(), DisableMouseCapture, terminal::LeaveAlternateScreen);
    let _ = terminal.show_cursor();
    res
}

fn event_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    cfg: &mut Config,
    opts: &RunOptions,
    mut session: GameSession,
) -> Result<(), Box<dyn Error>> {
    let theme = Theme::new(cfg.dark_mode, Depth::detect());
    let (w, h, n) = cfg.difficulty.params();
    let mut ui = UiState::new(&session, cfg.ascii_icons);
    let mut games: u64 = 0;

    let tick_rate = Duration::from_millis(200);
    let frame_gap = if cfg.framerate > 0 { Duration::from_secs(1) / cfg.framerate } else { Duration::ZERO };
    let mut last_draw: Option<Instant> = None;

    loop {
        if last_draw.map_or(true, |t| t.elapsed() >= frame_gap) {
            terminal.draw(|f| draw(f, &session, &mut ui, &theme, cfg))?;
            last_draw = Some(Instant::now());
        }
        let since = last_draw.map_or(Duration::ZERO, |t| t.elapsed());
        let timeout = if since < frame_gap { (frame_gap - since).min(tick_rate) } else { tick_rate };

        if !event::poll(timeout)? {
            continue;
        }
        let flow = match event::read()? {
            Event::Key(key) => match key_intent(&key) {
                Some(intent) => apply_intent(&mut session, &mut ui, cfg, intent),
                None => Flow::Continue,
            },
            Event::Mouse(me) => handle_mouse(&mut session, &mut ui, me),
            Event::Resize(_, _) => {
                ui.resync(&session);
                last_draw = None;
                Flow::Continue
            }
            _ => Flow::Continue,
        };
        match flow {
            Flow::Continue => {}
            Flow::Restart => {
                games += 1;
                session = GameSession::from_settings(w, h, n, opts.seed.map(|s| s.wrapping_add(games)))?;
                ui.resync(&session);
                debug!(games, "new game");
            }
            Flow::Quit => break,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tms_field::Minefield;
    use crate::tms_session::Direction as Dir;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_key_intents() {
        assert_eq!(key_intent(&press(KeyCode::Char('w'))), Some(Intent::Move(Dir::Up)));
        assert_eq!(key_intent(&press(KeyCode::Char('D'))), Some(Intent::Move(Dir::Right)));
        assert_eq!(key_intent(&press(KeyCode::Left)), Some(Intent::Move(Dir::Left)));
        assert_eq!(key_intent(&press(KeyCode::Char('q'))), Some(Intent::Reveal));
        assert_eq!(key_intent(&press(KeyCode::Char('e'))), Some(Intent::Flag));
        assert_eq!(key_intent(&press(KeyCode::Char(' '))), Some(Intent::Chord));
        assert_eq!(key_intent(&press(KeyCode::Enter)), Some(Intent::Restart));
        assert_eq!(key_intent(&press(KeyCode::Char('t'))), Some(Intent::ToggleIcons));
        assert_eq!(key_intent(&press(KeyCode::Esc)), Some(Intent::Quit));
        assert_eq!(key_intent(&press(KeyCode::Char('x'))), None);
    }

    #[test]
    fn test_ctrl_c_quits_and_releases_are_ignored() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(key_intent(&ctrl_c), Some(Intent::Quit));
        let ctrl_q = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL);
        assert_eq!(key_intent(&ctrl_q), None);
        let release = KeyEvent::new_with_kind(KeyCode::Char('q'), KeyModifiers::NONE, KeyEventKind::Release);
        assert_eq!(key_intent(&release), None);
    }

    #[test]
    fn test_cell_at_maps_two_columns_per_cell() {
        let rect = Rect::new(10, 5, 21, 11); // 9x9 board
        assert_eq!(cell_at(rect, 11, 6, 9, 9), Some(Pos::new(0, 0)));
        assert_eq!(cell_at(rect, 12, 6, 9, 9), Some(Pos::new(0, 0)));
        assert_eq!(cell_at(rect, 13, 8, 9, 9), Some(Pos::new(2, 1)));
        assert_eq!(cell_at(rect, 28, 14, 9, 9), Some(Pos::new(8, 8)));
        assert_eq!(cell_at(rect, 10, 6, 9, 9), None); // left border
        assert_eq!(cell_at(rect, 29, 6, 9, 9), None); // padding column
        assert_eq!(cell_at(rect, 11, 15, 9, 9), None);
    }

    #[test]
    fn test_required_size_fits_panel() {
        assert_eq!(required_size(9, 9), (21 + 36, 27));
        assert_eq!(required_size(30, 16), (63 + 36, 27));
        assert_eq!(required_size(10, 40), (23 + 36, 45));
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(Duration::ZERO), "00:00.00");
        assert_eq!(format_time(Duration::from_millis(83_456)), "01:23.45");
    }

    #[test]
    fn test_cell_text_is_two_columns() {
        for ascii in [true, false] {
            let g = Glyphs::new(ascii);
            let views = [
                CellView::Hidden,
                CellView::Flagged,
                CellView::Revealed(0),
                CellView::Revealed(3),
                CellView::Mine { exploded: true, flagged: false },
                CellView::Mine { exploded: false, flagged: true },
                CellView::Mine { exploded: false, flagged: false },
                CellView::WrongFlag,
            ];
            for v in views {
                assert_eq!(UnicodeWidthStr::width(cell_text(v, &g).as_str()), 2, "{v:?} ascii={ascii}");
            }
        }
        assert_eq!(cell_text(CellView::Revealed(3), &Glyphs::new(true)), " 3");
        assert_eq!(cell_text(CellView::Revealed(3), &Glyphs::new(false)), "３");
    }

    #[test]
    fn test_board_view_follows_updates() {
        let mut session = GameSession::from_field(Minefield::from_layout(&["*...", "....", "...*"]));
        let mut view = BoardView::from_snapshot(&session.snapshot());
        let update = session.reveal(Pos::new(2, 0)).unwrap();
        assert_eq!(update.changed.len(), 6);
        view.apply(&update);
        assert_eq!(view, BoardView::from_snapshot(&session.snapshot()));

        let update = session.reveal(Pos::new(0, 0)).unwrap();
        view.apply(&update);
        assert_eq!(view.get(Pos::new(0, 0)), CellView::Mine { exploded: true, flagged: false });
        assert_eq!(view, BoardView::from_snapshot(&session.snapshot()));
    }

    #[test]
    fn test_failed_chord_flashes() {
        let mut session = GameSession::from_field(Minefield::from_layout(&["*.*", "...", "*.*"]));
        let mut ui = UiState::new(&session, true);
        ui.absorb(session.reveal(Pos::new(1, 1)));
        assert_eq!(ui.board.get(Pos::new(1, 1)), CellView::Revealed(4));
        ui.chord(&mut session, Pos::new(1, 1));
        assert!(ui.flashing(Pos::new(1, 1), Instant::now()));
    }
}
