//! Plain-text matrix printing.
//!
//! A [`Matrix`] stores its cells already formatted, so integer, character and
//! string grids all go through the same type:
//!
//! ```
//! use console_pane::Matrix;
//!
//! let ints = Matrix::from(vec![vec![1, 2], vec![3, 4]]);
//! assert_eq!(ints.render(), "1 2 \n3 4 \n");
//!
//! let chars = Matrix::from([['x', 'o'], ['o', 'x']]);
//! assert_eq!(chars.rows(), 2);
//! ```
//!
//! Every cell is followed by a single space and every row ends with `\n`.
//! Ragged rows print all of their own cells.

use std::fmt::{self, Display};

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Matrix {
    cells: Vec<Vec<String>>,
}

impl Matrix {
    pub fn new(cells: Vec<Vec<String>>) -> Self {
        Self { cells }
    }

    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&str> {
        self.cells.get(row)?.get(col).map(String::as_str)
    }

    pub fn cells(&self) -> &[Vec<String>] {
        &self.cells
    }

    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.cells {
            for cell in row {
                write!(f, "{cell} ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl<T: Display> From<Vec<Vec<T>>> for Matrix {
    fn from(rows: Vec<Vec<T>>) -> Self {
        rows.iter().map(|row| row.iter()).collect()
    }
}

impl<T: Display, const C: usize, const R: usize> From<[[T; C]; R]> for Matrix {
    fn from(rows: [[T; C]; R]) -> Self {
        rows.iter().map(|row| row.iter()).collect()
    }
}

impl<T: Display> From<&[&[T]]> for Matrix {
    fn from(rows: &[&[T]]) -> Self {
        rows.iter().map(|row| row.iter()).collect()
    }
}

impl<R, T> FromIterator<R> for Matrix
where
    R: IntoIterator<Item = T>,
    T: Display,
{
    fn from_iter<I: IntoIterator<Item = R>>(rows: I) -> Self {
        Self {
            cells: rows
                .into_iter()
                .map(|row| row.into_iter().map(|cell| cell.to_string()).collect())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_strings() {
        let matrix = Matrix::from(vec![vec!["a", "bc"], vec!["d", "e"]]);
        assert_eq!(matrix.render(), "a bc \nd e \n");
    }

    #[test]
    fn test_ragged_rows() {
        let matrix = Matrix::from(vec![vec![1], vec![2, 3, 4]]);
        assert_eq!(matrix.render(), "1 \n2 3 4 \n");
        assert_eq!(matrix.get(1, 2), Some("4"));
        assert_eq!(matrix.get(0, 1), None);
    }

    #[test]
    fn test_empty() {
        let matrix = Matrix::default();
        assert!(matrix.is_empty());
        assert_eq!(matrix.render(), "");
    }

    #[test]
    fn test_slice_rows() {
        let rows: &[&[char]] = &[&['x', 'o'], &['o', 'x']];
        assert_eq!(Matrix::from(rows).render(), "x o \no x \n");
    }
}
