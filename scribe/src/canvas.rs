//! # Canvas Module - Attribute cell grid
//!
//! A [`TypingSession`](crate::TypingSession) does not talk to a terminal. It draws into a
//! [`Canvas`], a fixed grid of character cells with one text attribute each plus a cursor, and
//! the front end paints the grid however it likes. Writes outside the grid are clipped.

/// Text attribute of a cell
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attr {
    #[default]
    Normal,
    Reverse,
    Bold,
    Underline,
    Blink,
}

/// A single character cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub attr: Attr,
}

impl Cell {
    pub const BLANK: Self = Self {
        ch: ' ',
        attr: Attr::Normal,
    };
}

impl Default for Cell {
    fn default() -> Self {
        Self::BLANK
    }
}

/// Fixed-size grid of cells with a cursor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
    cursor: (u16, u16),
}

impl Canvas {
    /// Create a blank canvas
    pub fn new(height: u16, width: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::BLANK; width as usize * height as usize],
            cursor: (0, 0),
        }
    }

    pub const fn width(&self) -> u16 {
        self.width
    }

    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Cursor position as `(row, column)`
    pub const fn cursor(&self) -> (u16, u16) {
        self.cursor
    }

    pub fn move_cursor(&mut self, row: u16, col: u16) {
        self.cursor = (row.min(self.height), col.min(self.width));
    }

    /// Blank every cell and home the cursor
    pub fn erase(&mut self) {
        self.cells.fill(Cell::BLANK);
        self.cursor = (0, 0);
    }

    /// Get a cell, if it is inside the grid
    pub fn cell(&self, row: u16, col: u16) -> Option<&Cell> {
        self.index(row, col).map(|index| &self.cells[index])
    }

    /// All cells of a row, or an empty slice outside the grid
    pub fn row(&self, row: u16) -> &[Cell] {
        if row >= self.height {
            return &[];
        }
        let start = row as usize * self.width as usize;
        &self.cells[start..start + self.width as usize]
    }

    /// Iterate over all rows, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.width.max(1) as usize)
    }

    /// Characters of a row with trailing blanks removed
    pub fn row_text(&self, row: u16) -> String {
        let text = self.row(row).iter().map(|cell| cell.ch).collect::<String>();
        text.trim_end().to_string()
    }

    /// Write a single cell without touching the cursor
    pub fn put_cell(&mut self, row: u16, col: u16, ch: char, attr: Attr) {
        if let Some(index) = self.index(row, col) {
            self.cells[index] = Cell { ch, attr };
        }
    }

    /// Write `text` starting at `(row, col)` without touching the cursor
    ///
    /// Returns the column right after the written text.
    pub fn put_str(&mut self, row: u16, col: u16, text: &str, attr: Attr) -> u16 {
        let mut col = col;
        for ch in text.chars() {
            self.put_cell(row, col, ch, attr);
            col = col.saturating_add(1);
        }
        col
    }

    /// Write a character at the cursor and advance it by one column
    pub fn write_char(&mut self, ch: char, attr: Attr) {
        let (row, col) = self.cursor;
        self.put_cell(row, col, ch, attr);
        self.cursor = (row, col.saturating_add(1).min(self.width));
    }

    /// Blank a row from `col` to its end
    pub fn clear_to_end(&mut self, row: u16, col: u16) {
        for col in col..self.width {
            self.put_cell(row, col, ' ', Attr::Normal);
        }
    }

    fn index(&self, row: u16, col: u16) -> Option<usize> {
        (row < self.height && col < self.width)
            .then(|| row as usize * self.width as usize + col as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_str_clips_at_edge() {
        let mut canvas = Canvas::new(2, 4);
        let end = canvas.put_str(0, 2, "abc", Attr::Bold);
        assert_eq!(end, 5);
        assert_eq!(canvas.row_text(0), "  ab");
        assert_eq!(canvas.cell(0, 3).unwrap().attr, Attr::Bold);
        assert!(canvas.cell(0, 4).is_none());

        // Rows outside the grid are ignored
        canvas.put_str(5, 0, "zz", Attr::Normal);
        assert!(canvas.row(5).is_empty());
    }

    #[test]
    fn test_cursor_writes() {
        let mut canvas = Canvas::new(3, 5);
        canvas.move_cursor(1, 0);
        canvas.write_char('h', Attr::Normal);
        canvas.write_char('x', Attr::Reverse);
        assert_eq!(canvas.cursor(), (1, 2));
        assert_eq!(canvas.row_text(1), "hx");
        assert_eq!(canvas.cell(1, 1).unwrap().attr, Attr::Reverse);

        canvas.clear_to_end(1, 1);
        assert_eq!(canvas.row_text(1), "h");
        assert_eq!(canvas.cell(1, 1).unwrap().attr, Attr::Normal);
    }

    #[test]
    fn test_erase() {
        let mut canvas = Canvas::new(2, 3);
        canvas.put_str(1, 0, "abc", Attr::Underline);
        canvas.move_cursor(1, 2);
        canvas.erase();
        assert!(canvas.rows().all(|row| row.iter().all(|cell| *cell == Cell::BLANK)));
        assert_eq!(canvas.cursor(), (0, 0));
        assert_eq!(canvas.rows().count(), 2);
    }
}
