//! Frame Composition
//!
//! Two board rows share one rendered row. Each rendered cell carries one of
//! four block symbols and one palette slot:
//!
//! ```text
//! top  bottom   symbol
//!  X     X      Full
//!  X     .      Top
//!  .     X      Bottom
//!  .     .      Empty
//! ```
//!
//! A sidebar to the left of the board lists every known player in rank
//! order, four text lines each.

use crate::game::board::{Board, Cell};
use crate::game::state::{Player, STATUS_LINES};
use crate::core::grid::GridPos;

/// Sidebar width in rendered columns, border column included. Wide enough
/// for the longest status line, `"  dead, NN.Ns remaining"`.
pub const SIDEBAR_WIDTH: usize = 24;

/// Block symbol alphabet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Symbol {
    /// Both halves filled.
    Full,
    /// Upper half only.
    Top,
    /// Lower half only.
    Bottom,
    /// Nothing.
    Empty,
}

impl Symbol {
    /// Pick the symbol for a pair of half-cells.
    #[inline]
    pub fn from_halves(top: bool, bottom: bool) -> Self {
        match (top, bottom) {
            (true, true) => Symbol::Full,
            (true, false) => Symbol::Top,
            (false, true) => Symbol::Bottom,
            (false, false) => Symbol::Empty,
        }
    }

    /// Braille glyph used by text backends.
    pub fn glyph(self) -> char {
        match self {
            Symbol::Full => '⣿',
            Symbol::Top => '⠛',
            Symbol::Bottom => '⣤',
            Symbol::Empty => ' ',
        }
    }
}

/// Palette index. Slot 0 is neutral, 1..=8 belong to player numbers and
/// the last slot is reserved for walls.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ColorSlot(pub u8);

impl ColorSlot {
    /// Background and offline text.
    pub const NEUTRAL: ColorSlot = ColorSlot(0);
    /// Board border and sidebar frame.
    pub const WALL: ColorSlot = ColorSlot(9);
    /// Slots a backend must provide.
    pub const PALETTE_SIZE: usize = 10;

    /// Slot for a board cell.
    pub fn of_cell(cell: Cell) -> Self {
        match cell {
            Cell::Blank => Self::NEUTRAL,
            Cell::Wall => Self::WALL,
            Cell::Owned(n) => ColorSlot(n.get()),
        }
    }
}

/// What to draw in a rendered cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Glyph {
    /// Block symbol.
    Block(Symbol),
    /// Sidebar text character.
    Text(char),
}

impl Glyph {
    /// Character for text backends.
    pub fn to_char(self) -> char {
        match self {
            Glyph::Block(s) => s.glyph(),
            Glyph::Text(c) => c,
        }
    }
}

/// One rendered cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameCell {
    /// Glyph.
    pub glyph: Glyph,
    /// Palette slot.
    pub color: ColorSlot,
}

impl FrameCell {
    const BLANK: FrameCell = FrameCell {
        glyph: Glyph::Block(Symbol::Empty),
        color: ColorSlot::NEUTRAL,
    };
}

/// A complete rendered frame, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    width: usize,
    height: usize,
    cells: Vec<FrameCell>,
}

impl Frame {
    fn blank(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![FrameCell::BLANK; width * height],
        }
    }

    /// Width in rendered columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in rendered rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Cell at column `x`, row `y`.
    pub fn get(&self, x: usize, y: usize) -> Option<FrameCell> {
        (x < self.width && y < self.height).then(|| self.cells[y * self.width + x])
    }

    /// One row.
    pub fn row(&self, y: usize) -> &[FrameCell] {
        &self.cells[y * self.width..(y + 1) * self.width]
    }

    /// One row as plain characters.
    pub fn row_text(&self, y: usize) -> String {
        self.row(y).iter().map(|c| c.glyph.to_char()).collect()
    }

    fn put(&mut self, x: usize, y: usize, cell: FrameCell) {
        self.cells[y * self.width + x] = cell;
    }
}

/// Pack a vertical pair of board cells into one rendered cell.
///
/// The colour comes from the lower cell when it is occupied, otherwise
/// from the upper one.
pub fn compress_pair(top: Cell, bottom: Cell) -> FrameCell {
    let symbol = Symbol::from_halves(!top.is_blank(), !bottom.is_blank());
    let color = if bottom.is_blank() {
        ColorSlot::of_cell(top)
    } else {
        ColorSlot::of_cell(bottom)
    };
    FrameCell {
        glyph: Glyph::Block(symbol),
        color,
    }
}

/// Build the frame for `board` with `standings` (best first) in the sidebar.
///
/// The frame is `SIDEBAR_WIDTH + board.width()` columns by
/// `ceil(board.height() / 2)` rows, sidebar on the left. An odd last board
/// row pairs with blank.
pub fn compose(board: &Board, standings: &[&Player]) -> Frame {
    let rows = board.height().div_ceil(2);
    let mut frame = Frame::blank(SIDEBAR_WIDTH + board.width(), rows);

    draw_sidebar(&mut frame, standings);

    for y in 0..rows {
        for x in 0..board.width() {
            let top = board.get(GridPos::new(x, 2 * y));
            let bottom = board.try_get(GridPos::new(x, 2 * y + 1)).unwrap_or_default();
            frame.put(SIDEBAR_WIDTH + x, y, compress_pair(top, bottom));
        }
    }
    frame
}

fn draw_sidebar(frame: &mut Frame, standings: &[&Player]) {
    let rows = frame.height();
    let block = |symbol| FrameCell {
        glyph: Glyph::Block(symbol),
        color: ColorSlot::WALL,
    };

    for y in 0..rows {
        frame.put(0, y, block(Symbol::Full));
    }
    for x in 1..SIDEBAR_WIDTH {
        frame.put(x, 0, block(Symbol::Top));
        frame.put(x, rows - 1, block(Symbol::Bottom));
    }

    // Text area: between the top and bottom frame rows
    let text_rows = rows.saturating_sub(2);
    let text_cols = SIDEBAR_WIDTH - 1;
    for (slot, player) in standings.iter().enumerate() {
        let color = player.number.map_or(ColorSlot::NEUTRAL, |n| ColorSlot(n.get()));
        for (line_no, line) in player.status_lines.iter().enumerate() {
            let offset = slot * STATUS_LINES + line_no;
            if offset >= text_rows {
                return;
            }
            for (i, c) in line.chars().take(text_cols).enumerate() {
                frame.put(
                    1 + i,
                    1 + offset,
                    FrameCell {
                        glyph: Glyph::Text(c),
                        color,
                    },
                );
            }
        }
    }
}
