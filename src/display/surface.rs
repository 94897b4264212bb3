/// Character-cell drawing surface.
///
/// Shapes are given in logical field units (800×600) and rasterised onto a
/// grid sized to the terminal: a cell is painted when its centre falls inside
/// the shape.  Shapes smaller than a cell still paint the cell under their
/// centre so nothing vanishes on small terminals.

use crossterm::style::Color;

use crate::entities::{Rgb, FIELD_HEIGHT, FIELD_WIDTH};

pub const BLANK: char = ' ';

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub color: Color,
}

impl Cell {
    const EMPTY: Cell = Cell {
        ch: BLANK,
        color: Color::Reset,
    };

    pub fn is_blank(&self) -> bool {
        self.ch == BLANK
    }
}

pub fn rgb(c: Rgb) -> Color {
    Color::Rgb {
        r: c.0,
        g: c.1,
        b: c.2,
    }
}

#[derive(Clone, Debug)]
pub struct Surface {
    cols: u16,
    rows: u16,
    cells: Vec<Cell>,
}

impl Surface {
    pub fn new(cols: u16, rows: u16) -> Self {
        let cols = cols.max(1);
        let rows = rows.max(1);
        Self {
            cols,
            rows,
            cells: vec![Cell::EMPTY; cols as usize * rows as usize],
        }
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        *self = Surface::new(cols, rows);
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::EMPTY);
    }

    pub fn cell(&self, col: u16, row: u16) -> Option<&Cell> {
        if col < self.cols && row < self.rows {
            self.cells.get(row as usize * self.cols as usize + col as usize)
        } else {
            None
        }
    }

    pub fn row(&self, row: u16) -> &[Cell] {
        let start = row as usize * self.cols as usize;
        &self.cells[start..start + self.cols as usize]
    }

    /// Text content of one row, mostly useful for tests.
    pub fn row_text(&self, row: u16) -> String {
        self.row(row).iter().map(|c| c.ch).collect()
    }

    pub fn set(&mut self, col: u16, row: u16, ch: char, color: Color) {
        if col < self.cols && row < self.rows {
            let idx = row as usize * self.cols as usize + col as usize;
            self.cells[idx] = Cell { ch, color };
        }
    }

    fn cell_w(&self) -> f32 {
        FIELD_WIDTH / self.cols as f32
    }

    fn cell_h(&self) -> f32 {
        FIELD_HEIGHT / self.rows as f32
    }

    /// Grid cell containing a logical point, if it is on the field.
    pub fn to_cell(&self, x: f32, y: f32) -> Option<(u16, u16)> {
        if !(0.0..FIELD_WIDTH).contains(&x) || !(0.0..FIELD_HEIGHT).contains(&y) {
            return None;
        }
        let col = ((x / self.cell_w()) as u16).min(self.cols - 1);
        let row = ((y / self.cell_h()) as u16).min(self.rows - 1);
        Some((col, row))
    }

    pub fn plot(&mut self, x: f32, y: f32, ch: char, color: Color) {
        if let Some((col, row)) = self.to_cell(x, y) {
            self.set(col, row, ch, color);
        }
    }

    /// Paint every cell whose centre satisfies `inside` within the logical
    /// bounding box.  Returns the number of cells painted.
    fn fill_where(
        &mut self,
        (x0, y0, x1, y1): (f32, f32, f32, f32),
        ch: char,
        color: Color,
        inside: impl Fn(f32, f32) -> bool,
    ) -> usize {
        let (cw, chh) = (self.cell_w(), self.cell_h());
        let col0 = (x0 / cw).floor().max(0.0) as i32;
        let col1 = ((x1 / cw).ceil() as i32).min(self.cols as i32);
        let row0 = (y0 / chh).floor().max(0.0) as i32;
        let row1 = ((y1 / chh).ceil() as i32).min(self.rows as i32);

        let mut painted = 0;
        for row in row0..row1 {
            for col in col0..col1 {
                let cx = (col as f32 + 0.5) * cw;
                let cy = (row as f32 + 0.5) * chh;
                if inside(cx, cy) {
                    self.set(col as u16, row as u16, ch, color);
                    painted += 1;
                }
            }
        }
        if painted == 0 {
            self.plot((x0 + x1) / 2.0, (y0 + y1) / 2.0, ch, color);
        }
        painted
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, ch: char, color: Color) {
        self.fill_where((x, y, x + w, y + h), ch, color, |px, py| {
            px >= x && px < x + w && py >= y && py < y + h
        });
    }

    /// Even-odd fill of a closed polygon.
    pub fn fill_polygon(&mut self, points: &[(f32, f32)], ch: char, color: Color) {
        if points.len() < 3 {
            return;
        }
        let bounds = points.iter().fold(
            (f32::MAX, f32::MAX, f32::MIN, f32::MIN),
            |(x0, y0, x1, y1), &(x, y)| (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
        );
        self.fill_where(bounds, ch, color, |px, py| point_in_polygon(points, px, py));
    }

    pub fn fill_circle(&mut self, cx: f32, cy: f32, r: f32, ch: char, color: Color) {
        self.fill_where((cx - r, cy - r, cx + r, cy + r), ch, color, |px, py| {
            (px - cx).powi(2) + (py - cy).powi(2) <= r * r
        });
    }

    /// One-cell halo around a logical rectangle, painted only on blank cells.
    pub fn glow(&mut self, x: f32, y: f32, w: f32, h: f32, ch: char, color: Color) {
        let (cw, chh) = (self.cell_w(), self.cell_h());
        let col0 = (x / cw).floor() as i32 - 1;
        let col1 = ((x + w) / cw).ceil() as i32;
        let row0 = (y / chh).floor() as i32 - 1;
        let row1 = ((y + h) / chh).ceil() as i32;

        for row in row0..=row1 {
            for col in col0..=col1 {
                let edge = row == row0 || row == row1 || col == col0 || col == col1;
                if !edge || col < 0 || row < 0 {
                    continue;
                }
                let (col, row) = (col as u16, row as u16);
                if self.cell(col, row).is_some_and(Cell::is_blank) {
                    self.set(col, row, ch, color);
                }
            }
        }
    }

    /// Cell-addressed text, clipped at the right edge.
    pub fn text(&mut self, col: u16, row: u16, text: &str, color: Color) {
        for (i, ch) in text.chars().enumerate() {
            let c = col as usize + i;
            if c >= self.cols as usize {
                break;
            }
            self.set(c as u16, row, ch, color);
        }
    }

    /// Text horizontally centred on `row`.
    pub fn text_centered(&mut self, row: u16, text: &str, color: Color) {
        let len = text.chars().count() as u16;
        let col = (self.cols / 2).saturating_sub(len / 2);
        self.text(col, row, text, color);
    }
}

fn point_in_polygon(points: &[(f32, f32)], px: f32, py: f32) -> bool {
    let mut inside = false;
    let mut j = points.len() - 1;
    for i in 0..points.len() {
        let (xi, yi) = points[i];
        let (xj, yj) = points[j];
        if (yi > py) != (yj > py) && px < (xj - xi) * (py - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}
