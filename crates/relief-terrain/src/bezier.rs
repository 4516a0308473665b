//! Bicubic Bézier surface evaluation over a control grid

use relief_core::{Result, Vec3};

use crate::grid::{control_shape, ControlGrid};
use crate::heightmap::HeightField;

/// Bernstein weight `C(n, k) * mu^k * (1 - mu)^(n - k)`.
///
/// The binomial coefficient is accumulated by interleaving multiplications
/// and divisions so large `n` never overflows the way a factorial would.
pub fn bezier_blend(k: usize, mu: f64, n: usize) -> f64 {
    let mut blend = 1.0_f64;
    let mut nn = n;
    let mut kn = k;
    let mut nkn = n.saturating_sub(k);

    while nn >= 1 {
        blend *= nn as f64;
        nn -= 1;
        if kn > 1 {
            blend /= kn as f64;
            kn -= 1;
        }
        if nkn > 1 {
            blend /= nkn as f64;
            nkn -= 1;
        }
    }

    if k > 0 {
        blend *= mu.powi(k as i32);
    }
    if n > k {
        blend *= (1.0 - mu).powi((n - k) as i32);
    }
    blend
}

/// Evaluates tiles of `rows` x `cols` vertices from a control grid.
#[derive(Clone, Copy, Debug)]
pub struct BezierEvaluator {
    rows: usize,
    cols: usize,
    extent: f32,
}

impl BezierEvaluator {
    /// `extent` is the world-space size of one tile along x and z.
    pub fn new(rows: usize, cols: usize, extent: f32) -> Self {
        Self { rows, cols, extent }
    }

    /// Evaluate the full vertex grid for one tile.
    ///
    /// Heights come from the Bézier sum. The planar x/z coordinates are
    /// replaced by a fixed placement so tiles line up at `offset * extent`.
    pub fn evaluate(&self, grid: &ControlGrid, row_offset: f32, col_offset: f32) -> Result<HeightField> {
        let (cp_rows, cp_cols) = control_shape(self.rows, self.cols);
        grid.expect_shape(cp_rows, cp_cols)?;

        let col_weights: Vec<Vec<f32>> = (0..self.cols)
            .map(|j| {
                let muj = j as f64 / self.cols as f64;
                (0..cp_cols)
                    .map(|kj| bezier_blend(kj, muj, cp_cols - 1) as f32)
                    .collect()
            })
            .collect();

        let points = self.evaluate_rows(grid, &col_weights, row_offset, col_offset)?;
        HeightField::from_raw(points, self.rows, self.cols)
    }

    #[cfg(not(feature = "parallel"))]
    fn evaluate_rows(
        &self,
        grid: &ControlGrid,
        col_weights: &[Vec<f32>],
        row_offset: f32,
        col_offset: f32,
    ) -> Result<Vec<Vec3>> {
        let mut points = Vec::with_capacity(self.rows * self.cols);
        for i in 0..self.rows {
            points.extend(self.evaluate_row(grid, col_weights, i, row_offset, col_offset)?);
        }
        Ok(points)
    }

    #[cfg(feature = "parallel")]
    fn evaluate_rows(
        &self,
        grid: &ControlGrid,
        col_weights: &[Vec<f32>],
        row_offset: f32,
        col_offset: f32,
    ) -> Result<Vec<Vec3>> {
        use rayon::prelude::*;

        let rows = (0..self.rows)
            .into_par_iter()
            .map(|i| self.evaluate_row(grid, col_weights, i, row_offset, col_offset))
            .collect::<Result<Vec<_>>>()?;
        Ok(rows.into_iter().flatten().collect())
    }

    fn evaluate_row(
        &self,
        grid: &ControlGrid,
        col_weights: &[Vec<f32>],
        i: usize,
        row_offset: f32,
        col_offset: f32,
    ) -> Result<Vec<Vec3>> {
        let cp_rows = grid.rows();
        let mui = i as f64 / self.rows as f64;
        let row_weights: Vec<f32> = (0..cp_rows)
            .map(|ki| bezier_blend(ki, mui, cp_rows - 1) as f32)
            .collect();

        let half = self.extent / 2.0;
        let x = self.extent * i as f32 / self.rows as f32 - half - self.extent * row_offset;

        let mut row = Vec::with_capacity(self.cols);
        for (j, weights) in col_weights.iter().enumerate() {
            let mut position = Vec3::ZERO;
            for (ki, bi) in row_weights.iter().enumerate() {
                for (kj, bj) in weights.iter().enumerate() {
                    position += grid.get(ki, kj)? * (bi * bj);
                }
            }

            position.x = x;
            position.z = self.extent * j as f32 / self.cols as f32 - half - self.extent * col_offset;
            row.push(position);
        }
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relief_core::ReliefError;

    #[test]
    fn blend_is_partition_of_unity() {
        for n in [1, 3, 4, 10, 32] {
            for step in 0..=20 {
                let mu = step as f64 / 20.0;
                let sum: f64 = (0..=n).map(|k| bezier_blend(k, mu, n)).sum();
                assert!((sum - 1.0).abs() < 1e-5, "n={n} mu={mu} sum={sum}");
            }
        }
    }

    #[test]
    fn blend_matches_binomial_weights() {
        // n = 3, mu = 0.5: weights 1/8, 3/8, 3/8, 1/8
        let expected = [0.125, 0.375, 0.375, 0.125];
        for (k, want) in expected.iter().enumerate() {
            assert!((bezier_blend(k, 0.5, 3) - want).abs() < 1e-12);
        }
    }

    #[test]
    fn blend_endpoints_select_corner_points() {
        assert_eq!(bezier_blend(0, 0.0, 32), 1.0);
        assert_eq!(bezier_blend(5, 0.0, 32), 0.0);
        assert_eq!(bezier_blend(32, 1.0, 32), 1.0);
    }

    #[test]
    fn corner_reproduces_first_control_point() {
        let grid = ControlGrid::from_fn(4, 4, |r, c| Vec3::new(0.0, (r * 4 + c) as f32 + 1.5, 0.0));
        let field = BezierEvaluator::new(9, 9, 40.0).evaluate(&grid, 0.0, 0.0).unwrap();
        let corner = field.get(0, 0).unwrap();
        assert!((corner.y - grid.get(0, 0).unwrap().y).abs() < 1e-5);
    }

    #[test]
    fn flat_grid_evaluates_to_flat_surface() {
        let grid = ControlGrid::from_fn(4, 4, |r, c| Vec3::new(r as f32, 0.0, c as f32));
        let field = BezierEvaluator::new(9, 9, 40.0).evaluate(&grid, 0.0, 0.0).unwrap();
        assert_eq!(field.points().len(), 81);
        assert!(field.points().iter().all(|p| p.y == 0.0));
    }

    #[test]
    fn planar_coordinates_follow_offsets() {
        let grid = ControlGrid::from_fn(4, 4, |_, _| Vec3::ZERO);
        let evaluator = BezierEvaluator::new(9, 9, 40.0);

        let field = evaluator.evaluate(&grid, 0.0, 0.0).unwrap();
        assert_eq!(field.get(0, 0).unwrap().x, -20.0);
        assert_eq!(field.get(0, 0).unwrap().z, -20.0);
        let last = field.get(8, 8).unwrap();
        assert!((last.x - (40.0 * 8.0 / 9.0 - 20.0)).abs() < 1e-5);

        let shifted = evaluator.evaluate(&grid, 1.0, 0.5).unwrap();
        assert_eq!(shifted.get(0, 0).unwrap().x, -60.0);
        assert_eq!(shifted.get(0, 0).unwrap().z, -40.0);
    }

    #[test]
    fn wrong_grid_shape_is_rejected() {
        let grid = ControlGrid::from_fn(3, 4, |_, _| Vec3::ZERO);
        let err = BezierEvaluator::new(9, 9, 40.0)
            .evaluate(&grid, 0.0, 0.0)
            .unwrap_err();
        assert!(matches!(err, ReliefError::PreconditionViolation(_)));
    }
}
