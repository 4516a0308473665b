//! Evaluated vertex grids and grayscale heightmap export

use std::path::Path;

use relief_core::{ReliefError, Result, Vec3};

/// A row-major grid of evaluated terrain vertices with checked access.
#[derive(Clone, Debug, PartialEq)]
pub struct HeightField {
    rows: usize,
    cols: usize,
    points: Vec<Vec3>,
}

impl HeightField {
    /// Wrap raw row-major vertices. Fails if the length does not match.
    pub fn from_raw(points: Vec<Vec3>, rows: usize, cols: usize) -> Result<Self> {
        if points.len() != rows * cols {
            return Err(ReliefError::PreconditionViolation(format!(
                "height field of {}x{} needs {} vertices, got {}",
                rows,
                cols,
                rows * cols,
                points.len()
            )));
        }
        Ok(Self { rows, cols, points })
    }

    /// Stack tiles vertically, first tile on top (lowest row indices).
    pub fn stack(tiles: &[HeightField]) -> Result<Self> {
        let cols = tiles.first().map(|t| t.cols).unwrap_or(0);
        if let Some(tile) = tiles.iter().find(|t| t.cols != cols) {
            return Err(ReliefError::PreconditionViolation(format!(
                "cannot stack a {}-column tile onto {}-column tiles",
                tile.cols, cols
            )));
        }

        let rows = tiles.iter().map(|t| t.rows).sum();
        let mut points = Vec::with_capacity(rows * cols);
        for tile in tiles {
            points.extend_from_slice(&tile.points);
        }
        Ok(Self { rows, cols, points })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn get(&self, row: usize, col: usize) -> Result<Vec3> {
        if row >= self.rows || col >= self.cols {
            return Err(ReliefError::IndexOutOfRange {
                what: "vertex",
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(self.points[row * self.cols + col])
    }

    /// Minimum and maximum vertex height
    pub fn height_range(&self) -> (f32, f32) {
        self.points
            .iter()
            .fold((f32::MAX, f32::MIN), |(lo, hi), p| (lo.min(p.y), hi.max(p.y)))
    }

    /// Heights normalized to [0..1] over the field's own range.
    /// A flat field maps to all zeros.
    pub fn normalized_heights(&self) -> Vec<f32> {
        let (lo, hi) = self.height_range();
        let span = hi - lo;
        self.points
            .iter()
            .map(|p| if span > 0.0 { (p.y - lo) / span } else { 0.0 })
            .collect()
    }

    /// Write the heights as a 16-bit grayscale PNG, one pixel per vertex.
    /// Rows map to image rows, columns to image columns.
    pub fn save_png(&self, path: &Path) -> Result<()> {
        let pixels: Vec<u16> = self
            .normalized_heights()
            .into_iter()
            .map(|h| (h * 65535.0).round() as u16)
            .collect();

        let img = image::ImageBuffer::<image::Luma<u16>, Vec<u16>>::from_raw(
            self.cols as u32,
            self.rows as u32,
            pixels,
        )
        .ok_or_else(|| {
            ReliefError::ImageError(format!(
                "pixel buffer does not fit {}x{} image",
                self.cols, self.rows
            ))
        })?;

        img.save(path).map_err(|e| {
            ReliefError::ImageError(format!(
                "Failed to save heightmap '{}': {}",
                path.display(),
                e
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(rows: usize, cols: usize, base: f32) -> HeightField {
        let points = (0..rows * cols)
            .map(|i| Vec3::new(0.0, base + i as f32, 0.0))
            .collect();
        HeightField::from_raw(points, rows, cols).unwrap()
    }

    #[test]
    fn from_raw_checks_length() {
        assert!(HeightField::from_raw(vec![Vec3::ZERO; 5], 2, 3).is_err());
    }

    #[test]
    fn stack_places_first_tile_on_top() {
        let top = field(2, 3, 100.0);
        let bottom = field(2, 3, 0.0);
        let stacked = HeightField::stack(&[top, bottom]).unwrap();

        assert_eq!(stacked.rows(), 4);
        assert_eq!(stacked.get(0, 0).unwrap().y, 100.0);
        assert_eq!(stacked.get(2, 0).unwrap().y, 0.0);
        assert_eq!(stacked.get(3, 2).unwrap().y, 5.0);
        assert!(stacked.get(4, 0).is_err());
    }

    #[test]
    fn stack_rejects_mismatched_columns() {
        assert!(HeightField::stack(&[field(2, 3, 0.0), field(2, 4, 0.0)]).is_err());
    }

    #[test]
    fn normalized_heights_span_unit_range() {
        let heights = field(2, 2, -3.0).normalized_heights();
        assert_eq!(heights.first().copied(), Some(0.0));
        assert_eq!(heights.last().copied(), Some(1.0));

        let flat = HeightField::from_raw(vec![Vec3::ZERO; 4], 2, 2).unwrap();
        assert!(flat.normalized_heights().iter().all(|h| *h == 0.0));
    }
}
