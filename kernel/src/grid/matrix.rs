//! Rectangular value matrices and the flat textual input format.
//!
//! The textual format is a list of integers separated by any mix of
//! whitespace, newlines, tabs and commas. A flat list of `k` values is laid
//! out row-major into a square of side `sqrt(k)`.

use super::GridError;

/// A validated, rectangular, row-major matrix of 1-based cell values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridMatrix {
    rows: usize,
    cols: usize,
    values: Vec<u32>,
}

impl GridMatrix {
    /// Build from explicit rows.
    ///
    /// # Errors
    ///
    /// [`GridError::Empty`] for no rows or an empty first row,
    /// [`GridError::Ragged`] if rows differ in length,
    /// [`GridError::ZeroValue`] if any cell is 0.
    pub fn from_rows(rows: &[Vec<u32>]) -> Result<Self, GridError> {
        let cols = rows.first().map_or(0, Vec::len);
        if cols == 0 {
            return Err(GridError::Empty);
        }
        let mut values = Vec::with_capacity(rows.len() * cols);
        for (row, cells) in rows.iter().enumerate() {
            if cells.len() != cols {
                return Err(GridError::Ragged {
                    row,
                    expected: cols,
                    found: cells.len(),
                });
            }
            values.extend_from_slice(cells);
        }
        Self::from_parts(rows.len(), cols, values)
    }

    /// Lay a flat value list out as a square grid.
    ///
    /// # Errors
    ///
    /// [`GridError::Empty`] for no values, [`GridError::NotSquare`] if the
    /// count is not a perfect square, [`GridError::ZeroValue`] if any cell is 0.
    pub fn from_flat_square(values: Vec<u32>) -> Result<Self, GridError> {
        if values.is_empty() {
            return Err(GridError::Empty);
        }
        let side = integer_sqrt(values.len());
        if side * side != values.len() {
            return Err(GridError::NotSquare {
                count: values.len(),
            });
        }
        Self::from_parts(side, side, values)
    }

    /// Parse the textual format into a square grid.
    ///
    /// # Errors
    ///
    /// Any [`GridError`] from [`parse_values`] or [`GridMatrix::from_flat_square`].
    pub fn parse_square(text: &str) -> Result<Self, GridError> {
        Self::from_flat_square(parse_values(text)?)
    }

    fn from_parts(rows: usize, cols: usize, values: Vec<u32>) -> Result<Self, GridError> {
        if let Some(pos) = values.iter().position(|&v| v == 0) {
            return Err(GridError::ZeroValue {
                row: pos / cols,
                col: pos % cols,
            });
        }
        Ok(Self { rows, cols, values })
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Value at `(row, col)`, or `None` if out of range.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<u32> {
        if row < self.rows && col < self.cols {
            Some(self.values[row * self.cols + col])
        } else {
            None
        }
    }

    /// Row-major values.
    #[must_use]
    pub fn values(&self) -> &[u32] {
        &self.values
    }
}

/// Split the textual format into integers.
///
/// # Errors
///
/// [`GridError::BadToken`] for the first token that is not a `u32`.
pub fn parse_values(text: &str) -> Result<Vec<u32>, GridError> {
    text.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|token| !token.is_empty())
        .enumerate()
        .map(|(index, token)| {
            token.parse::<u32>().map_err(|_| GridError::BadToken {
                index,
                token: token.to_string(),
            })
        })
        .collect()
}

fn integer_sqrt(n: usize) -> usize {
    let mut side = 0usize;
    while (side + 1) * (side + 1) <= n {
        side += 1;
    }
    side
}
