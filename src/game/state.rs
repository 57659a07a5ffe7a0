use serde::{Deserialize, Serialize};

use super::action::Direction;

/// Cell values stored in the [`Grid`]
pub mod cell {
    pub const EMPTY: i32 = 0;
    pub const HEAD: i32 = 1;
    pub const BODY: i32 = 2;
    pub const FOOD: i32 = 3;
}

/// A position on the game grid
///
/// Coordinates are signed so a head that has just left the grid can still
/// be represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Move position by delta
    pub fn moved_by(&self, d_row: i32, d_col: i32) -> Self {
        Self {
            row: self.row + d_row,
            col: self.col + d_col,
        }
    }

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (d_row, d_col) = direction.delta();
        self.moved_by(d_row, d_col)
    }

    /// Euclidean distance to another position
    pub fn distance_to(&self, other: Position) -> f64 {
        (self.squared_distance_to(other) as f64).sqrt()
    }

    /// Squared Euclidean distance, exact in integers
    pub fn squared_distance_to(&self, other: Position) -> i64 {
        let d_row = i64::from(self.row) - i64::from(other.row);
        let d_col = i64::from(self.col) - i64::from(other.col);
        d_row * d_row + d_col * d_col
    }
}

/// Row-major snapshot of the world
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    height: usize,
    width: usize,
    cells: Vec<i32>,
}

impl Grid {
    /// A grid of `height` rows and `width` columns, all empty
    pub fn new(height: usize, width: usize) -> Self {
        Self {
            height,
            width,
            cells: vec![cell::EMPTY; height * width],
        }
    }

    /// Build a grid from rows of cell values
    ///
    /// Returns `None` when the rows are ragged.
    pub fn from_rows(rows: &[Vec<i32>]) -> Option<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|row| row.len() != width) {
            return None;
        }
        Some(Self {
            height,
            width,
            cells: rows.concat(),
        })
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn row_in_bounds(&self, row: i32) -> bool {
        row >= 0 && (row as usize) < self.height
    }

    pub fn col_in_bounds(&self, col: i32) -> bool {
        col >= 0 && (col as usize) < self.width
    }

    /// Check if a position is within the grid bounds
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        self.row_in_bounds(pos.row) && self.col_in_bounds(pos.col)
    }

    /// Cell value at `pos`, or `None` off the grid
    pub fn get(&self, pos: Position) -> Option<i32> {
        self.index_of(pos).map(|idx| self.cells[idx])
    }

    /// Write a cell; positions off the grid are ignored
    pub fn set(&mut self, pos: Position, value: i32) {
        if let Some(idx) = self.index_of(pos) {
            self.cells[idx] = value;
        }
    }

    /// Cells in row-major order
    pub fn cells(&self) -> &[i32] {
        &self.cells
    }

    fn index_of(&self, pos: Position) -> Option<usize> {
        self.is_in_bounds(pos)
            .then(|| pos.row as usize * self.width + pos.col as usize)
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    pub body: Vec<Position>,
    /// Current direction of movement
    pub direction: Direction,
}

impl Snake {
    /// Create a new snake with given starting position and direction
    pub fn new(head: Position, direction: Direction, length: usize) -> Self {
        let mut body = vec![head];

        // Add initial body segments behind the head
        let (d_row, d_col) = direction.delta();

        for i in 1..length {
            let prev = body[i - 1];
            body.push(prev.moved_by(-d_row, -d_col));
        }

        Self { body, direction }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get the tail position (last segment)
    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    /// Get body segments (excluding head)
    pub fn body_segments(&self) -> &[Position] {
        &self.body[1..]
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }
}
