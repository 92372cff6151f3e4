use ratatui::style::Color;
use term_color_support::ColorSupport;

/// How many colours the terminal can show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Depth {
    TrueColor,
    Indexed,
    Basic,
}

impl Depth {
    /// Detect the capability of stdout once at start-up
    pub fn detect() -> Depth {
        let support = ColorSupport::stdout();
        if support.has_16m {
            Depth::TrueColor
        } else if support.has_256 {
            Depth::Indexed
        } else {
            Depth::Basic
        }
    }
}

// Windows Terminal "Campbell" values for the 16 ANSI colours, so the low
// palette indices look the same everywhere when RGB is available.
const CAMPBELL: [(u8, u8, u8); 16] = [
    (12, 12, 12),
    (197, 15, 31),
    (19, 161, 14),
    (193, 156, 0),
    (0, 55, 218),
    (136, 23, 152),
    (58, 150, 221),
    (204, 204, 204),
    (118, 118, 118),
    (231, 72, 86),
    (22, 198, 12),
    (249, 241, 165),
    (59, 120, 255),
    (180, 0, 158),
    (97, 214, 214),
    (242, 242, 242),
];

const ANSI: [Color; 16] = [
    Color::Black,
    Color::Red,
    Color::Green,
    Color::Yellow,
    Color::Blue,
    Color::Magenta,
    Color::Cyan,
    Color::Gray,
    Color::DarkGray,
    Color::LightRed,
    Color::LightGreen,
    Color::LightYellow,
    Color::LightBlue,
    Color::LightMagenta,
    Color::LightCyan,
    Color::White,
];

/// RGB value of an xterm 256-colour palette entry
pub fn xterm_rgb(index: u8) -> (u8, u8, u8) {
    match index {
        0..=15 => CAMPBELL[index as usize],
        16..=231 => {
            let i = index - 16;
            let level = |v: u8| if v == 0 { 0 } else { 55 + v * 40 };
            (level(i / 36), level((i / 6) % 6), level(i % 6))
        }
        _ => {
            let v = 8 + (index - 232) * 10;
            (v, v, v)
        }
    }
}

/// Nearest of the 16 basic colours, for terminals without a 256 palette
fn basic(index: u8) -> Color {
    if index < 16 {
        return ANSI[index as usize];
    }
    let (r, g, b) = xterm_rgb(index);
    if r == g && g == b {
        return match r {
            0..=59 => Color::Black,
            60..=139 => Color::DarkGray,
            140..=209 => Color::Gray,
            _ => Color::White,
        };
    }
    let bright = r.max(g).max(b) > 170;
    let bit = |v: u8| v > 95;
    match (bit(r), bit(g), bit(b)) {
        (false, false, false) => Color::DarkGray,
        (true, true, true) => if bright { Color::White } else { Color::Gray },
        (true, false, false) => if bright { Color::LightRed } else { Color::Red },
        (false, true, false) => if bright { Color::LightGreen } else { Color::Green },
        (false, false, true) => if bright { Color::LightBlue } else { Color::Blue },
        (true, true, false) => if bright { Color::LightYellow } else { Color::Yellow },
        (true, false, true) => if bright { Color::LightMagenta } else { Color::Magenta },
        (false, true, true) => if bright { Color::LightCyan } else { Color::Cyan },
    }
}

/// Turn a palette index into a colour the terminal can show
pub fn palette(index: u8, depth: Depth) -> Color {
    match depth {
        Depth::TrueColor => {
            let (r, g, b) = xterm_rgb(index);
            Color::Rgb(r, g, b)
        }
        Depth::Indexed => Color::Indexed(index),
        Depth::Basic => basic(index),
    }
}

/// Colours for one play session
#[derive(Debug, Clone)]
pub struct Theme {
    pub fg: Color,
    pub bg: Color,
    pub highlight_fg: Color,
    pub highlight_bg: Color,
    pub numbers: [Color; 9], // Indexed by adjacency count
    pub flag: Color,
    pub flash_fg: Color,
    pub flash_bg: Color,
    pub indicator: Color,
    pub key: Color,
}

/// Palette indices of the board text, background and highlight
pub fn base_indices(dark: bool) -> (u8, u8, u8) {
    if dark { (255, 237, 242) } else { (232, 231, 250) }
}

/// Every palette index the game draws with on top of the background
pub fn ui_indices(dark: bool) -> Vec<u8> {
    let (fg, bg, hl_bg) = base_indices(dark);
    let mut used = vec![fg, hl_bg, 12, 2, 9, 4, 1, 6, 0, 8, 15, 3, if dark { 11 } else { 4 }];
    used.retain(|&c| c != bg);
    used.sort_unstable();
    used.dedup();
    used
}

impl Theme {
    pub fn new(dark: bool, depth: Depth) -> Theme {
        let (fg, bg, hl_bg) = base_indices(dark);
        let c = |i: u8| palette(i, depth);
        let mut numbers = [0u8, 12, 2, 9, 4, 1, 6, 0, 8].map(c);
        numbers[0] = c(fg);
        if dark {
            // black 7s vanish on the dark board
            numbers[7] = c(fg);
        }
        Theme {
            fg: c(fg),
            bg: c(bg),
            highlight_fg: c(fg),
            highlight_bg: c(hl_bg),
            numbers,
            flag: c(9),
            flash_fg: c(15),
            flash_bg: c(1),
            indicator: c(3),
            key: c(if dark { 11 } else { 4 }),
        }
    }
}
