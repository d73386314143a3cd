use crate::foundation::error::{FloodError, FloodResult};

/// Row-major 2-D array with an explicit `(rows, cols)` shape.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid<T> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

/// Terrain heights, one value per raster cell.
pub type ElevationGrid = Grid<f64>;
/// Shaded-relief intensities, nominally in `[0, 255]`.
pub type HillshadeGrid = Grid<f64>;
/// `true` where the terrain is at or below a flood elevation.
pub type FloodMask = Grid<bool>;

impl<T> Grid<T> {
    /// Wrap row-major `data`; fails when `data.len() != rows * cols`.
    pub fn from_vec(data: Vec<T>, rows: usize, cols: usize) -> FloodResult<Self> {
        let expected = rows
            .checked_mul(cols)
            .ok_or_else(|| FloodError::validation("grid shape overflows usize"))?;
        if data.len() != expected {
            return Err(FloodError::validation(format!(
                "grid data length {} does not match shape {rows}x{cols}",
                data.len()
            )));
        }
        Ok(Self { rows, cols, data })
    }

    /// Build a grid from nested rows; all rows must have equal length.
    pub fn from_rows(rows: Vec<Vec<T>>) -> FloodResult<Self> {
        let n_rows = rows.len();
        let n_cols = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|r| r.len() != n_cols) {
            return Err(FloodError::validation("grid rows must have equal length"));
        }
        let data = rows.into_iter().flatten().collect();
        Self::from_vec(data, n_rows, n_cols)
    }

    /// Build a grid by evaluating `f(row, col)` for every cell in row-major order.
    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(rows * cols);
        for r in 0..rows {
            for c in 0..cols {
                data.push(f(r, c));
            }
        }
        Self { rows, cols, data }
    }

    /// `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Row-major backing slice.
    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        if row < self.rows && col < self.cols {
            self.data.get(row * self.cols + col)
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, row: usize, col: usize) -> Option<&mut T> {
        if row < self.rows && col < self.cols {
            self.data.get_mut(row * self.cols + col)
        } else {
            None
        }
    }

    /// Elementwise map into a grid of the same shape.
    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Grid<U> {
        Grid {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(f).collect(),
        }
    }

    /// Fail unless `other` has exactly this grid's shape.
    pub fn ensure_same_shape<U>(&self, other: &Grid<U>, what: &str) -> FloodResult<()> {
        if self.shape() != other.shape() {
            return Err(FloodError::validation(format!(
                "{what}: shape {:?} does not match {:?}",
                other.shape(),
                self.shape()
            )));
        }
        Ok(())
    }
}

impl<T: Clone> Grid<T> {
    /// Grid of `rows * cols` copies of `value`.
    pub fn filled(rows: usize, cols: usize, value: T) -> Self {
        Self {
            rows,
            cols,
            data: vec![value; rows * cols],
        }
    }

    /// Nearest-neighbour resample to `rows x cols`; each output cell takes the source cell
    /// under its center.
    pub fn resample_nearest(&self, rows: usize, cols: usize) -> Self {
        if (rows, cols) == self.shape() {
            return self.clone();
        }
        let pick = |i: usize, out: usize, src: usize| {
            let v = ((i as f64 + 0.5) * src as f64 / out as f64).floor() as usize;
            v.min(src.saturating_sub(1))
        };
        let src_cols: Vec<usize> = (0..cols).map(|c| pick(c, cols, self.cols)).collect();
        let mut data = Vec::with_capacity(rows * cols);
        for r in 0..rows {
            let base = pick(r, rows, self.rows) * self.cols;
            data.extend(src_cols.iter().map(|&c| self.data[base + c].clone()));
        }
        Self { rows, cols, data }
    }
}

impl Grid<f64> {
    /// Minimum and maximum over finite values, or `None` when there are none.
    pub fn finite_min_max(&self) -> Option<(f64, f64)> {
        self.data
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

impl Grid<bool> {
    /// Number of `true` cells.
    pub fn count_true(&self) -> usize {
        self.data.iter().filter(|&&b| b).count()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/grid.rs"]
mod tests;
