//! Relief Terrain - Bézier patch terrain generation
//!
//! Builds coarse control point grids from a deterministic height source,
//! interpolates them into dense vertex tiles with bicubic Bézier blending,
//! estimates per-vertex normals, and stitches two tiles into one
//! triangle-strip buffer. Does not talk to the GPU: the finished buffer is
//! handed to a [`StripRenderer`] supplied by the caller.

pub mod bezier;
pub mod grid;
pub mod heightmap;
pub mod noise;
pub mod normal;
pub mod patch;
pub mod surface;
pub mod terrain;

pub use bezier::{bezier_blend, BezierEvaluator};
pub use grid::{ControlGrid, ControlPointBuilder};
pub use heightmap::HeightField;
pub use noise::{FlatHeight, HeightSource, SinHashNoise};
pub use normal::{normal_at, NormalMap, NormalPolicy};
pub use patch::{Edge, Patch, PatchRegistry};
pub use surface::{assemble_strip, StripRenderer, StripVertex, SurfaceBuffer};
pub use terrain::{Terrain, TerrainConfig};

#[cfg(test)]
mod tests {
    use super::*;
    use relief_core::Vec3;

    fn config(rows: usize, cols: usize) -> TerrainConfig {
        TerrainConfig {
            rows,
            cols,
            ..Default::default()
        }
    }

    #[test]
    fn flat_terrain_is_flat_with_up_normals() {
        let mut terrain = Terrain::with_source(config(9, 9), FlatHeight(0.0)).unwrap();
        let surface = terrain.init_surface().unwrap();

        assert_eq!(surface.len(), 2 * (2 * 9 - 1) * (2 * 9 + 2));
        for p in surface.positions() {
            assert_eq!(p.y, 0.0);
        }
        for n in surface.normals() {
            assert!((n - Vec3::UP).length() < 1e-6, "normal {n:?}");
        }
    }

    #[test]
    fn flat_terrain_with_distinct_samples_is_also_up() {
        let cfg = TerrainConfig {
            normal_policy: NormalPolicy::EightDistinctSamples,
            ..config(9, 9)
        };
        let mut terrain = Terrain::with_source(cfg, FlatHeight(0.0)).unwrap();
        for n in terrain.init_surface().unwrap().normals() {
            assert!((n - Vec3::UP).length() < 1e-6);
        }
    }

    #[test]
    fn surface_registers_two_continuous_patches() {
        let mut terrain = Terrain::new(config(12, 9)).unwrap();
        terrain.init_surface().unwrap();

        let patches = terrain.patches();
        assert_eq!(patches.len(), 2);

        let first = patches.get(0).unwrap();
        let second = patches.get(1).unwrap();
        let seam = second.edge(Edge::Bottom);
        for (old, new) in first.edge(Edge::Top).iter().zip(seam) {
            assert_eq!(old.y.to_bits(), new.y.to_bits());
        }
    }

    #[test]
    fn reference_resolution_surface_is_well_formed() {
        let mut terrain = Terrain::new(TerrainConfig::default()).unwrap();
        let surface = terrain.init_surface().unwrap();

        assert_eq!(surface.len(), 2 * (2 * 96 - 1) * (2 * 96 + 2));
        assert_eq!(surface.rows(), 192);
        for n in surface.normals() {
            assert!((n.length() - 1.0).abs() < 1e-4);
        }
        for p in surface.positions() {
            assert!(p.x >= -60.0 && p.x < 20.0);
            assert!(p.z >= -20.0 && p.z < 20.0);
        }
    }

    #[test]
    fn generation_is_deterministic() {
        let a = Terrain::new(config(9, 9)).unwrap().init_patch(0.0, 0.0).unwrap();
        let b = Terrain::new(config(9, 9)).unwrap().init_patch(0.0, 0.0).unwrap();
        assert_eq!(a.as_bytes(), b.as_bytes());
    }
}
