//! # Geometry Module - Viewport row layout
//!
//! The viewport is split around a single input row in the middle:
//!
//! ```text
//! row 0 ..= input-3   history rows (already typed lines scroll up here)
//! row input-2         separator
//! row input-1         active line
//! row input           input row
//! row input+1         separator
//! row input+2 ..      upcoming lines
//! ```
//!
//! The layout is computed once per session; a resize needs a new session.

use thiserror::Error;

/// Smallest notebook that still has an active row, an input row and both separators
pub const MIN_HEIGHT: u16 = 4;
/// Smallest usable width
pub const MIN_WIDTH: u16 = 2;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GeometryError {
    #[error("Viewport of {width}x{height} is too small")]
    TooSmall { height: u16, width: u16 },
}

/// Row layout of the typing viewport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewportGeometry {
    height: u16,
    width: u16,
    input_row: u16,
    sample_rows: Vec<u16>,
    separator_rows: [u16; 2],
    history_rows: usize,
}

impl ViewportGeometry {
    /// Lay out a viewport of `height` rows and `width` columns
    pub fn new(height: u16, width: u16) -> Result<Self, GeometryError> {
        if height < MIN_HEIGHT || width < MIN_WIDTH {
            return Err(GeometryError::TooSmall { height, width });
        }

        let input_row = height / 2;
        let mut sample_rows = Vec::with_capacity(height as usize);
        let mut history_rows = 0;

        for row in 0..height {
            if row + 3 <= input_row {
                history_rows += 1;
                sample_rows.push(row);
            } else if row + 1 == input_row || row >= input_row + 2 {
                sample_rows.push(row);
            }
        }

        Ok(Self {
            height,
            width,
            input_row,
            sample_rows,
            separator_rows: [input_row - 2, input_row + 1],
            history_rows,
        })
    }

    pub const fn height(&self) -> u16 {
        self.height
    }

    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Row the player types on
    pub const fn input_row(&self) -> u16 {
        self.input_row
    }

    /// Row of the line currently being typed
    pub const fn active_row(&self) -> u16 {
        self.input_row - 1
    }

    /// All rows showing sample lines, top to bottom
    pub fn sample_rows(&self) -> &[u16] {
        &self.sample_rows
    }

    pub const fn separator_rows(&self) -> [u16; 2] {
        self.separator_rows
    }

    /// Number of already typed lines kept visible above the separator
    ///
    /// This is also the index of the active line within the sample buffer.
    pub const fn history_rows(&self) -> usize {
        self.history_rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimum_terminal_layout() {
        // 8 rows of terminal minus one status bar row
        let geometry = ViewportGeometry::new(7, 40).unwrap();
        assert_eq!(geometry.input_row(), 3);
        assert_eq!(geometry.active_row(), 2);
        assert_eq!(geometry.separator_rows(), [1, 4]);
        assert_eq!(geometry.sample_rows(), &[0, 2, 5, 6]);
        assert_eq!(geometry.history_rows(), 1);
    }

    #[test]
    fn test_regular_layout() {
        let geometry = ViewportGeometry::new(24, 80).unwrap();
        assert_eq!(geometry.input_row(), 12);
        assert_eq!(geometry.separator_rows(), [10, 13]);
        assert_eq!(geometry.history_rows(), 10);
        // 10 history rows, the active row, and rows 14..24 below
        assert_eq!(geometry.sample_rows().len(), 10 + 1 + 10);
        assert!(!geometry.sample_rows().contains(&12));
        assert!(geometry.sample_rows().contains(&11));
    }

    #[test]
    fn test_smallest_layout_has_no_history() {
        let geometry = ViewportGeometry::new(4, 2).unwrap();
        assert_eq!(geometry.history_rows(), 0);
        assert_eq!(geometry.sample_rows(), &[1]);
        assert_eq!(geometry.separator_rows(), [0, 3]);
    }

    #[test]
    fn test_too_small() {
        assert_eq!(
            ViewportGeometry::new(3, 80),
            Err(GeometryError::TooSmall {
                height: 3,
                width: 80
            })
        );
        assert!(ViewportGeometry::new(10, 1).is_err());
    }
}
