//! Triangle-strip assembly of interleaved position/normal buffers

use bytemuck::{Pod, Zeroable};
use relief_core::{ReliefError, Result, Vec3};

use crate::heightmap::HeightField;
use crate::normal::{NormalMap, NormalPolicy};

/// GPU-ready layout of one strip vertex.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct StripVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

/// Flat sequence alternating position and normal, in triangle-strip order.
#[derive(Clone, Debug, PartialEq)]
pub struct SurfaceBuffer {
    rows: usize,
    cols: usize,
    vertices: Vec<StripVertex>,
}

/// Number of `Vec3` entries (positions plus normals) in the strip for a
/// field of `rows` x `cols` vertices.
pub fn strip_len(rows: usize, cols: usize) -> usize {
    2 * rows.saturating_sub(1) * (2 * cols + 2)
}

impl SurfaceBuffer {
    /// Rows of the source field
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Columns of the source field
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of interleaved entries, positions and normals counted separately
    pub fn len(&self) -> usize {
        self.vertices.len() * 2
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Strip vertices, each a (position, normal) pair
    pub fn vertices(&self) -> &[StripVertex] {
        &self.vertices
    }

    pub fn positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.vertices.iter().map(|v| Vec3::from_array(v.position))
    }

    pub fn normals(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.vertices.iter().map(|v| Vec3::from_array(v.normal))
    }

    /// Raw bytes for upload into a vertex buffer
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}

/// Linearize a field into strip order.
///
/// Each row pair is scanned right to left, emitting the current row's
/// vertex followed by the next row's, then a stitching pair (next row's
/// first column, next row's last column) that carries the strip to the
/// following row pair.
pub fn assemble_strip(field: &HeightField, policy: NormalPolicy) -> Result<SurfaceBuffer> {
    let (rows, cols) = (field.rows(), field.cols());
    let normals = NormalMap::build(field, policy)?;

    let expected = strip_len(rows, cols);
    let mut vertices = Vec::with_capacity(expected / 2);
    let mut push = |row: usize, col: usize| -> Result<()> {
        vertices.push(StripVertex {
            position: field.get(row, col)?.to_array(),
            normal: normals.get(row, col)?.to_array(),
        });
        Ok(())
    };

    for row in 0..rows - 1 {
        for col in (0..cols).rev() {
            push(row, col)?;
            push(row + 1, col)?;
        }
        push(row + 1, 0)?;
        push(row + 1, cols - 1)?;
    }

    if vertices.len() * 2 != expected {
        return Err(ReliefError::PreconditionViolation(format!(
            "strip holds {} entries, expected {}",
            vertices.len() * 2,
            expected
        )));
    }

    Ok(SurfaceBuffer {
        rows,
        cols,
        vertices,
    })
}

/// Receives the finished strip. Implemented by the rendering collaborator.
pub trait StripRenderer {
    fn draw_strip(&mut self, buffer: &SurfaceBuffer) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(rows: usize, cols: usize) -> HeightField {
        let mut points = Vec::new();
        for r in 0..rows {
            for c in 0..cols {
                points.push(Vec3::new(r as f32, 0.0, c as f32));
            }
        }
        HeightField::from_raw(points, rows, cols).unwrap()
    }

    #[test]
    fn buffer_has_exact_strip_length() {
        let buffer = assemble_strip(&numbered(18, 9), NormalPolicy::default()).unwrap();
        assert_eq!(buffer.len(), 2 * 17 * 20);
        assert_eq!(buffer.len(), strip_len(18, 9));
        assert_eq!(buffer.positions().count() + buffer.normals().count(), buffer.len());
        assert_eq!(
            buffer.as_bytes().len(),
            buffer.vertices().len() * std::mem::size_of::<StripVertex>()
        );
    }

    #[test]
    fn strip_scans_columns_right_to_left() {
        let buffer = assemble_strip(&numbered(3, 4), NormalPolicy::default()).unwrap();
        let cells: Vec<(f32, f32)> = buffer.positions().map(|p| (p.x, p.z)).collect();

        let first_row_pair = [
            (0.0, 3.0),
            (1.0, 3.0),
            (0.0, 2.0),
            (1.0, 2.0),
            (0.0, 1.0),
            (1.0, 1.0),
            (0.0, 0.0),
            (1.0, 0.0),
            // stitching pair
            (1.0, 0.0),
            (1.0, 3.0),
        ];
        assert_eq!(&cells[..10], &first_row_pair);
        assert_eq!(cells[10], (1.0, 3.0));
        assert_eq!(cells[11], (2.0, 3.0));
        assert_eq!(cells.len(), 20);
    }

    #[test]
    fn flat_field_has_up_normals_everywhere() {
        let buffer = assemble_strip(&numbered(4, 5), NormalPolicy::default()).unwrap();
        for n in buffer.normals() {
            assert!((n - Vec3::UP).length() < 1e-6);
        }
    }

    #[test]
    fn single_row_field_is_rejected() {
        assert!(assemble_strip(&numbered(1, 4), NormalPolicy::default()).is_err());
    }
}
