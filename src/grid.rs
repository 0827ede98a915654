//! Row-major 2D grids shared by every pipeline stage.
//!
//! The same container carries the source raster, the residuals produced by
//! the prediction transform, and the per-cell codes handed to the packer.

use std::fmt;
use std::ops::{Index, IndexMut};

use crate::entropy_coder::tables::Code;
use crate::{LpicError, Result};

/// Grayscale samples, one `i32` per pixel.
pub type Raster = Grid<i32>;

/// Signed prediction residuals, same shape as the raster they came from.
pub type ResidualGrid = Grid<i32>;

/// Variable-length codes, one per cell.
pub type CodeGrid = Grid<Code>;

/// Grid shape as `(rows, cols)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dimensions {
    pub rows: usize,
    pub cols: usize,
}

impl Dimensions {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// An N x N shape.
    pub fn square(size: usize) -> Self {
        Self::new(size, size)
    }

    /// `rows * cols`, or [`LpicError::ImageDimensions`] if that overflows.
    pub fn cell_count(&self) -> Result<usize> {
        self.rows
            .checked_mul(self.cols)
            .ok_or(LpicError::ImageDimensions)
    }
}

impl From<(usize, usize)> for Dimensions {
    fn from((rows, cols): (usize, usize)) -> Self {
        Self::new(rows, cols)
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x {}", self.rows, self.cols)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid<T> {
    dims: Dimensions,
    cells: Vec<T>,
}

impl<T> Grid<T> {
    /// Wrap a row-major cell vector.
    ///
    /// Fails with [`LpicError::ImageDimensions`] if either dimension is zero
    /// or the vector length does not match `rows * cols`.
    pub fn from_vec(dims: impl Into<Dimensions>, cells: Vec<T>) -> Result<Self> {
        let dims = dims.into();
        if dims.rows == 0 || dims.cols == 0 || cells.len() != dims.cell_count()? {
            return Err(LpicError::ImageDimensions);
        }
        Ok(Self { dims, cells })
    }

    /// Build a grid from nested rows; every row must have the same length.
    pub fn from_rows<R: AsRef<[T]>>(rows: &[R]) -> Result<Self>
    where
        T: Clone,
    {
        let cols = rows.first().map_or(0, |r| r.as_ref().len());
        if rows.iter().any(|r| r.as_ref().len() != cols) {
            return Err(LpicError::ImageDimensions);
        }
        let cells = rows.iter().flat_map(|r| r.as_ref().iter().cloned()).collect();
        Self::from_vec((rows.len(), cols), cells)
    }

    /// Fill every cell with `value`.
    pub fn filled(dims: impl Into<Dimensions>, value: T) -> Result<Self>
    where
        T: Clone,
    {
        let dims = dims.into();
        Self::from_vec(dims, vec![value; dims.cell_count()?])
    }

    pub fn dims(&self) -> Dimensions {
        self.dims
    }

    pub fn rows(&self) -> usize {
        self.dims.rows
    }

    pub fn cols(&self) -> usize {
        self.dims.cols
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always false for a constructed grid; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        if row < self.dims.rows && col < self.dims.cols {
            self.cells.get(row * self.dims.cols + col)
        } else {
            None
        }
    }

    /// Cells in row-major order.
    pub fn cells(&self) -> &[T] {
        &self.cells
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.cells.iter()
    }

    /// Iterate rows as slices.
    pub fn row_slices(&self) -> std::slice::Chunks<'_, T> {
        self.cells.chunks(self.dims.cols)
    }

    pub fn into_vec(self) -> Vec<T> {
        self.cells
    }

    /// Apply `f` to every cell, keeping the shape.
    pub fn try_map<U, F>(&self, mut f: F) -> Result<Grid<U>>
    where
        F: FnMut(usize, usize, &T) -> Result<U>,
    {
        let cols = self.dims.cols;
        let cells = self
            .cells
            .iter()
            .enumerate()
            .map(|(i, v)| f(i / cols, i % cols, v))
            .collect::<Result<Vec<U>>>()?;
        Ok(Grid {
            dims: self.dims,
            cells,
        })
    }
}

impl<T> Index<(usize, usize)> for Grid<T> {
    type Output = T;

    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &T {
        debug_assert!(col < self.dims.cols);
        &self.cells[row * self.dims.cols + col]
    }
}

impl<T> IndexMut<(usize, usize)> for Grid<T> {
    #[inline]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        debug_assert!(col < self.dims.cols);
        &mut self.cells[row * self.dims.cols + col]
    }
}

impl<'a, T> IntoIterator for &'a Grid<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}
