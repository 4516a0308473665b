//! Per-vertex normals from the ring of eight surrounding vertices

use relief_core::{ReliefError, Result, Vec3};
use serde::{Deserialize, Serialize};

use crate::heightmap::HeightField;

/// How the eight-neighbour ring is sampled when averaging face normals.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalPolicy {
    /// Samples the right-hand neighbour twice and never the left one.
    /// Matches the shading of earlier releases; two of the eight face
    /// estimates point away from the surface.
    #[default]
    LegacyDuplicatedSample,
    /// Samples each ring position exactly once.
    EightDistinctSamples,
}

/// Ring offsets (row, col), clockwise starting at the right-hand neighbour.
fn ring(policy: NormalPolicy) -> [(isize, isize); 8] {
    let fifth = match policy {
        NormalPolicy::LegacyDuplicatedSample => (0, 1),
        NormalPolicy::EightDistinctSamples => (0, -1),
    };
    [
        (0, 1),
        (-1, 1),
        (-1, 0),
        (-1, -1),
        fifth,
        (1, -1),
        (1, 0),
        (1, 1),
    ]
}

/// Estimate the unit normal at an interior vertex.
///
/// Fails with `IndexOutOfRange` unless `row` is in `[1, rows - 2]` and `col`
/// in `[1, cols - 2]`.
pub fn normal_at(field: &HeightField, row: usize, col: usize, policy: NormalPolicy) -> Result<Vec3> {
    let interior = row >= 1 && col >= 1 && row + 1 < field.rows() && col + 1 < field.cols();
    if !interior {
        return Err(ReliefError::IndexOutOfRange {
            what: "normal",
            row,
            col,
            rows: field.rows(),
            cols: field.cols(),
        });
    }

    let vertex = field.get(row, col)?;
    let mut edges = [Vec3::ZERO; 8];
    for (edge, (dr, dc)) in edges.iter_mut().zip(ring(policy)) {
        let neighbour = field.get(row.wrapping_add_signed(dr), col.wrapping_add_signed(dc))?;
        *edge = vertex - neighbour;
    }

    let mut sum = Vec3::ZERO;
    for k in 0..8 {
        let prev = edges[(k + 7) % 8];
        sum += edges[k].cross(&prev).normalized();
    }
    Ok((sum / Vec3::splat(8.0)).normalized())
}

/// Normals for every vertex of a field.
///
/// Interior vertices use [`normal_at`]; a boundary vertex takes the normal of
/// the nearest interior vertex.
#[derive(Clone, Debug)]
pub struct NormalMap {
    cols: usize,
    normals: Vec<Vec3>,
}

impl NormalMap {
    pub fn build(field: &HeightField, policy: NormalPolicy) -> Result<Self> {
        let (rows, cols) = (field.rows(), field.cols());
        if rows < 3 || cols < 3 {
            return Err(ReliefError::PreconditionViolation(format!(
                "normals need at least a 3x3 field, got {}x{}",
                rows, cols
            )));
        }

        let mut interior = Vec::with_capacity((rows - 2) * (cols - 2));
        for row in 1..rows - 1 {
            for col in 1..cols - 1 {
                interior.push(normal_at(field, row, col, policy)?);
            }
        }

        let inner_cols = cols - 2;
        let mut normals = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            let r = row.clamp(1, rows - 2) - 1;
            for col in 0..cols {
                let c = col.clamp(1, cols - 2) - 1;
                normals.push(interior[r * inner_cols + c]);
            }
        }

        Ok(Self { cols, normals })
    }

    pub fn get(&self, row: usize, col: usize) -> Result<Vec3> {
        let rows = self.normals.len() / self.cols;
        if row >= rows || col >= self.cols {
            return Err(ReliefError::IndexOutOfRange {
                what: "normal map",
                row,
                col,
                rows,
                cols: self.cols,
            });
        }
        Ok(self.normals[row * self.cols + col])
    }
}
