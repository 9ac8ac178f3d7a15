use thiserror::Error;

use crate::shapes::Color;

// ============================================================================
// Configuration
// ============================================================================

pub const FIELD_WIDTH: usize = 14;
pub const FIELD_HEIGHT: usize = 22;

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    #[error("cell ({x}, {y}) is out of field bounds")]
    OutOfBounds { x: i16, y: i16 },
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Occupancy {
    #[default]
    Empty,
    /// Transient paint of the falling block, erased every tick.
    Moving,
    /// Part of the landed stack.
    Fixed,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Cell {
    pub occupancy: Occupancy,
    pub color: Color,
}

/// Rectangular grid of cells, row 0 at the top.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Field {
    width: usize,
    height: usize,
    rows: Vec<Vec<Cell>>,
}

// ============================================================================
// Field Logic
// ============================================================================

impl Field {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            rows: vec![vec![Cell::default(); width]; height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn index(&self, x: i16, y: i16) -> Result<(usize, usize), FieldError> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return Err(FieldError::OutOfBounds { x, y });
        }
        Ok((x as usize, y as usize))
    }

    pub fn set(&mut self, x: i16, y: i16, occupancy: Occupancy, color: Color) -> Result<(), FieldError> {
        let (col, row) = self.index(x, y)?;
        self.rows[row][col] = Cell { occupancy, color };
        Ok(())
    }

    pub fn get(&self, x: i16, y: i16) -> Result<Cell, FieldError> {
        let (col, row) = self.index(x, y)?;
        Ok(self.rows[row][col])
    }

    /// Resets cells to empty. A partial clear keeps fixed cells, which is how
    /// the falling block's previous paint is erased without touching the stack.
    pub fn clear(&mut self, full: bool) {
        for cell in self.rows.iter_mut().flatten() {
            if full || cell.occupancy != Occupancy::Fixed {
                *cell = Cell::default();
            }
        }
    }

    /// Collapses every full row below the spawn row and returns how many were
    /// removed. Row 0 is never collapsed.
    ///
    /// Rows are scanned once from top to bottom; a collapse shifts everything
    /// above the full row down by one and leaves row 0 empty.
    pub fn remove_filled_lines(&mut self) -> u32 {
        let mut removed = 0;

        for y in 1..self.height {
            if !self.is_row_full(y) {
                continue;
            }
            for k in (1..=y).rev() {
                self.rows[k] = self.rows[k - 1].clone();
            }
            self.rows[0] = vec![Cell::default(); self.width];
            removed += 1;
        }

        removed
    }

    /// A row is full when none of its cells is empty.
    pub fn is_row_full(&self, y: usize) -> bool {
        self.rows
            .get(y)
            .is_some_and(|row| row.iter().all(|cell| cell.occupancy != Occupancy::Empty))
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.rows.iter().map(Vec::as_slice)
    }

    pub fn count(&self, occupancy: Occupancy) -> usize {
        self.rows
            .iter()
            .flatten()
            .filter(|cell| cell.occupancy == occupancy)
            .count()
    }
}

impl Default for Field {
    fn default() -> Self {
        Self::new(FIELD_WIDTH, FIELD_HEIGHT)
    }
}

// ============================================================================
// Test Helpers
// ============================================================================

pub mod test_helpers {
    use super::*;

    pub fn fill_row(field: &mut Field, y: usize) {
        fill_row_with_gaps(field, y, &[]);
    }

    pub fn fill_row_with_gaps(field: &mut Field, y: usize, gaps: &[usize]) {
        for x in 0..field.width() {
            if !gaps.contains(&x) {
                field.rows[y][x] = Cell {
                    occupancy: Occupancy::Fixed,
                    color: Color::Magenta,
                };
            }
        }
    }
}
