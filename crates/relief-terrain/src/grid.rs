//! Control point grids and their builders

use relief_core::{ReliefError, Result, Vec3};

use crate::noise::HeightSource;

/// A rectangular grid of Bézier control points, rows outer and columns inner.
///
/// Row 0 is the outer edge used when stitching the next tile.
#[derive(Clone, Debug, PartialEq)]
pub struct ControlGrid {
    rows: usize,
    cols: usize,
    points: Vec<Vec3>,
}

impl ControlGrid {
    /// Build a grid from nested rows. Fails if the rows differ in length.
    pub fn from_rows(rows: Vec<Vec<Vec3>>) -> Result<Self> {
        let cols = rows.first().map(Vec::len).unwrap_or(0);
        if let Some((index, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != cols) {
            return Err(ReliefError::PreconditionViolation(format!(
                "control grid row {} has {} points, expected {}",
                index,
                row.len(),
                cols
            )));
        }

        let row_count = rows.len();
        Ok(Self {
            rows: row_count,
            cols,
            points: rows.into_iter().flatten().collect(),
        })
    }

    /// Build a grid by evaluating `f(row, col)` for every cell.
    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> Vec3) -> Self {
        let mut points = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for col in 0..cols {
                points.push(f(row, col));
            }
        }
        Self { rows, cols, points }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> Result<Vec3> {
        if row >= self.rows || col >= self.cols {
            return Err(self.out_of_range(row, col));
        }
        Ok(self.points[row * self.cols + col])
    }

    /// Copy of one row, left to right.
    pub fn row(&self, row: usize) -> Result<Vec<Vec3>> {
        if row >= self.rows {
            return Err(self.out_of_range(row, 0));
        }
        let start = row * self.cols;
        Ok(self.points[start..start + self.cols].to_vec())
    }

    /// Copy of one column, top to bottom.
    pub fn column(&self, col: usize) -> Result<Vec<Vec3>> {
        if col >= self.cols {
            return Err(self.out_of_range(0, col));
        }
        Ok((0..self.rows)
            .map(|row| self.points[row * self.cols + col])
            .collect())
    }

    /// Fail unless the grid is exactly `rows` x `cols`.
    pub fn expect_shape(&self, rows: usize, cols: usize) -> Result<()> {
        if self.rows != rows || self.cols != cols {
            return Err(ReliefError::PreconditionViolation(format!(
                "control grid is {}x{}, expected {}x{}",
                self.rows, self.cols, rows, cols
            )));
        }
        Ok(())
    }

    fn out_of_range(&self, row: usize, col: usize) -> ReliefError {
        ReliefError::IndexOutOfRange {
            what: "control point",
            row,
            col,
            rows: self.rows,
            cols: self.cols,
        }
    }
}

/// Control grid dimensions for a tile of `rows` x `cols` vertices.
pub fn control_shape(rows: usize, cols: usize) -> (usize, usize) {
    (rows / 3 + 1, cols / 3 + 1)
}

/// Builds control point grids for a fixed tile resolution.
pub struct ControlPointBuilder<'a, H: HeightSource + ?Sized> {
    rows: usize,
    cols: usize,
    source: &'a H,
}

impl<'a, H: HeightSource + ?Sized> ControlPointBuilder<'a, H> {
    pub fn new(rows: usize, cols: usize, source: &'a H) -> Self {
        Self { rows, cols, source }
    }

    /// Generate a standalone grid from the height source.
    ///
    /// The start coordinates only matter for continued tiles; a fresh tile
    /// always samples noise from the origin.
    pub fn build(&self, _start_row: i32, _start_col: i32) -> ControlGrid {
        let (cp_rows, cp_cols) = control_shape(self.rows, self.cols);
        ControlGrid::from_fn(cp_rows, cp_cols, |row, col| {
            Vec3::new(
                row as f32,
                self.source.height(row as i32, col as i32),
                col as f32,
            )
        })
    }

    /// Generate a grid whose last two rows continue a neighbouring tile.
    ///
    /// `top` and `second_top` are the neighbour's outermost row and the row
    /// just inside it. The new grid ends with a row extrapolated along their
    /// slope followed by a row that repeats the neighbour's edge heights.
    pub fn build_continuation(
        &self,
        start_row: i32,
        _start_col: i32,
        top: &[Vec3],
        second_top: &[Vec3],
    ) -> Result<ControlGrid> {
        let (cp_rows, cp_cols) = control_shape(self.rows, self.cols);
        if cp_rows < 2 {
            return Err(ReliefError::PreconditionViolation(format!(
                "continuation needs at least 2 control rows, resolution {} gives {}",
                self.rows, cp_rows
            )));
        }
        for (name, edge) in [("top", top), ("second top", second_top)] {
            if edge.len() != cp_cols {
                return Err(ReliefError::PreconditionViolation(format!(
                    "{} edge has {} points, expected {}",
                    name,
                    edge.len(),
                    cp_cols
                )));
            }
        }

        let interior = cp_rows - 2;
        let mut rows = Vec::with_capacity(cp_rows);
        for row in 0..interior {
            rows.push(
                (0..cp_cols)
                    .map(|col| {
                        Vec3::new(
                            row as f32,
                            self.source.height(row as i32 + start_row, col as i32),
                            col as f32,
                        )
                    })
                    .collect::<Vec<_>>(),
            );
        }

        let second_row = top
            .iter()
            .zip(second_top)
            .enumerate()
            .map(|(col, (edge, inner))| {
                let slope = *edge - *inner;
                Vec3::new(interior as f32, edge.y + slope.y, col as f32)
            })
            .collect();
        rows.push(second_row);

        let top_row = top
            .iter()
            .enumerate()
            .map(|(col, edge)| Vec3::new((cp_rows - 1) as f32, edge.y, col as f32))
            .collect();
        rows.push(top_row);

        ControlGrid::from_rows(rows)
    }
}
