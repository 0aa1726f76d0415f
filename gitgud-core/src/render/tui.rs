use crate::layout::{Lane, LaneIdx, Row};
use serde::{Deserialize, Serialize};

/// Glyph set used to draw the graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Charset {
    /// Box drawing characters
    #[default]
    Unicode,
    /// Plain 7-bit output for terminals without box drawing
    Ascii,
}

struct Glyphs {
    vertical: char,
    horizontal: char,
    commit: char,
    head: char,
    tee_left: char,
    tee_right: char,
    cross: char,
}

const UNICODE: Glyphs = Glyphs {
    vertical: '│',
    horizontal: '─',
    commit: '●',
    head: '◉',
    tee_left: '┤',
    tee_right: '├',
    cross: '┼',
};

const ASCII: Glyphs = Glyphs {
    vertical: '|',
    horizontal: '-',
    commit: '*',
    head: '@',
    tee_left: '+',
    tee_right: '+',
    cross: '+',
};

impl Charset {
    fn glyphs(self) -> &'static Glyphs {
        match self {
            Charset::Unicode => &UNICODE,
            Charset::Ascii => &ASCII,
        }
    }
}

/// Terminal color codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Default,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
}

impl Color {
    pub fn to_ansi(&self) -> &str {
        match self {
            Color::Default => "\x1b[0m",
            Color::Red => "\x1b[31m",
            Color::Green => "\x1b[32m",
            Color::Yellow => "\x1b[33m",
            Color::Blue => "\x1b[34m",
            Color::Magenta => "\x1b[35m",
            Color::Cyan => "\x1b[36m",
        }
    }
}

const LANE_COLORS: [Color; 6] = [
    Color::Blue,
    Color::Green,
    Color::Red,
    Color::Yellow,
    Color::Magenta,
    Color::Cyan,
];

/// A cell in the rendered grid
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub ch: char,
    pub color: Color,
}

impl Cell {
    pub fn new(ch: char, color: Color) -> Self {
        Self { ch, color }
    }

    pub fn empty() -> Self {
        Self {
            ch: ' ',
            color: Color::Default,
        }
    }
}

/// Text renderer for commit graph rows
pub struct TuiRenderer {
    charset: Charset,
    color: bool,
}

impl TuiRenderer {
    pub fn new(charset: Charset, color: bool) -> Self {
        Self { charset, color }
    }

    fn lane_color(lane: LaneIdx) -> Color {
        LANE_COLORS[lane % LANE_COLORS.len()]
    }

    /// Render a single row to a grid of cells, two per lane
    pub fn render_row(&self, row: &Row) -> Vec<Cell> {
        let g = self.charset.glyphs();
        let mut cells = vec![Cell::empty(); row.lanes.len() * 2];

        for (lane_idx, lane) in row.lanes.iter().enumerate() {
            let color = Self::lane_color(lane_idx);
            let pos = lane_idx * 2;
            if lane.is_event() {
                let ch = if row.is_head { g.head } else { g.commit };
                cells[pos] = Cell::new(ch, color);
            } else if matches!(lane, Lane::Pass) {
                cells[pos] = Cell::new(g.vertical, color);
            }
        }

        let primary = &row.lanes[row.primary_lane];
        if let Lane::BranchStart(from) = primary {
            self.connect(&mut cells, row.primary_lane, *from);
        }
        for &target in primary.get_merge_targets() {
            self.connect(&mut cells, row.primary_lane, target);
        }

        cells
    }

    /// Draw a horizontal connector from the commit lane to `other`
    fn connect(&self, cells: &mut [Cell], primary: LaneIdx, other: LaneIdx) {
        if primary == other {
            return;
        }
        let g = self.charset.glyphs();
        let color = Self::lane_color(primary);
        let (lo, hi) = (primary.min(other), primary.max(other));

        for pos in lo * 2 + 1..hi * 2 {
            let ch = if cells[pos].ch == g.vertical {
                g.cross
            } else {
                g.horizontal
            };
            cells[pos] = Cell::new(ch, color);
        }

        let tee = if other > primary { g.tee_left } else { g.tee_right };
        cells[other * 2] = Cell::new(tee, Self::lane_color(other));
    }

    /// One-line description printed to the right of the graph
    pub fn label(row: &Row) -> String {
        let mut label = format!("{} [branch {}]", row.commit_id, row.branch);
        if row.parents.len() > 1 {
            let parents: Vec<String> = row.parents.iter().map(|p| p.to_string()).collect();
            label.push_str(&format!(" merge {}", parents.join(" + ")));
        }
        if row.is_head {
            label.push_str(" (HEAD)");
        }
        label
    }

    /// Render multiple rows to a string buffer
    pub fn render_rows(&self, rows: &[Row]) -> String {
        let mut buffer = String::new();

        for row in rows {
            for cell in self.render_row(row) {
                if self.color {
                    buffer.push_str(cell.color.to_ansi());
                }
                buffer.push(cell.ch);
            }
            if self.color {
                buffer.push_str(Color::Default.to_ansi());
            }

            buffer.push(' ');
            buffer.push_str(&Self::label(row));
            buffer.push('\n');
        }

        buffer
    }
}
