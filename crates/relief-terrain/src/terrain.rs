//! Terrain configuration and orchestration

use std::fs;
use std::path::Path;

use relief_core::{ReliefError, Result, Vec3};
use serde::{Deserialize, Serialize};

use crate::bezier::BezierEvaluator;
use crate::grid::{control_shape, ControlGrid, ControlPointBuilder};
use crate::heightmap::HeightField;
use crate::noise::{HeightSource, SinHashNoise};
use crate::normal::NormalPolicy;
use crate::patch::{Edge, Patch, PatchRegistry};
use crate::surface::{assemble_strip, StripRenderer, SurfaceBuffer};

/// Configuration for terrain generation, usually parsed from a `terrain.toml`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Vertex rows per tile
    pub rows: usize,
    /// Vertex columns per tile
    pub cols: usize,
    /// World-space size of one tile along x and z
    pub extent: f32,
    /// Noise row offset used for the interior of continued tiles
    pub continuation_start_row: i32,
    /// Neighbour sampling used when averaging normals
    pub normal_policy: NormalPolicy,
    /// Whether the renderer should fill triangles (false = wireframe)
    pub filled_in: bool,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            rows: 96,
            cols: 96,
            extent: 40.0,
            continuation_start_row: -32,
            normal_policy: NormalPolicy::default(),
            filled_in: true,
        }
    }
}

impl TerrainConfig {
    /// Smallest resolution with two control rows and an interior to shade
    pub const MIN_RESOLUTION: usize = 6;

    /// Load a config from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate a config from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: TerrainConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        for (field, value) in [("rows", self.rows), ("cols", self.cols)] {
            if value < Self::MIN_RESOLUTION {
                return Err(ReliefError::ValueOutOfRange {
                    field: field.to_string(),
                    min: Self::MIN_RESOLUTION as f64,
                    max: u32::MAX as f64,
                    value: value as f64,
                });
            }
        }
        if !self.extent.is_finite() || self.extent <= 0.0 {
            return Err(ReliefError::ValueOutOfRange {
                field: "extent".to_string(),
                min: f32::MIN_POSITIVE as f64,
                max: f32::MAX as f64,
                value: self.extent as f64,
            });
        }
        Ok(())
    }
}

/// Bézier patch terrain: tiles, the patches that produced them, and the
/// assembled strip buffer.
pub struct Terrain<H: HeightSource = SinHashNoise> {
    config: TerrainConfig,
    source: H,
    patches: PatchRegistry,
    surface: Option<SurfaceBuffer>,
}

impl Terrain<SinHashNoise> {
    /// Terrain driven by the reference sine-hash noise
    pub fn new(config: TerrainConfig) -> Result<Self> {
        Self::with_source(config, SinHashNoise)
    }
}

impl<H: HeightSource> Terrain<H> {
    pub fn with_source(config: TerrainConfig, source: H) -> Result<Self> {
        config.validate()?;
        let patches = PatchRegistry::new(control_shape(config.rows, config.cols));
        Ok(Self {
            config,
            source,
            patches,
            surface: None,
        })
    }

    pub fn patches(&self) -> &PatchRegistry {
        &self.patches
    }

    pub fn is_filled_in(&self) -> bool {
        self.config.filled_in
    }

    /// Build the control grid for the next tile.
    ///
    /// The first tile is fresh. Every later tile continues from the top edge
    /// of patch 0 so it joins that tile with matching height and slope.
    pub fn build_grid(&self) -> Result<ControlGrid> {
        let builder = ControlPointBuilder::new(self.config.rows, self.config.cols, &self.source);
        match self.patches.first() {
            None => Ok(builder.build(0, 0)),
            Some(first) => builder.build_continuation(
                self.config.continuation_start_row,
                0,
                first.edge(Edge::Top),
                first.second_edge(Edge::Top),
            ),
        }
    }

    /// Record a control grid as a patch for later tiles to stitch against.
    pub fn register_patch(&mut self, grid: ControlGrid, id: u32) -> Result<&Patch> {
        self.patches.register(grid, id)
    }

    /// Evaluate a tile's vertices from a control grid. Pure.
    pub fn evaluate(&self, grid: &ControlGrid, row_offset: f32, col_offset: f32) -> Result<HeightField> {
        BezierEvaluator::new(self.config.rows, self.config.cols, self.config.extent)
            .evaluate(grid, row_offset, col_offset)
    }

    /// Build, register and evaluate the next tile in one call.
    ///
    /// Patch ids are assigned in registration order.
    pub fn generate_tile(&mut self, row_offset: f32, col_offset: f32) -> Result<HeightField> {
        let grid = self.build_grid()?;
        let id = self.patches.len() as u32;
        tracing::debug!(id, row_offset, col_offset, "generating tile");

        let grid = self.register_patch(grid, id)?.control_points().clone();
        self.evaluate(&grid, row_offset, col_offset)
    }

    /// Generate one tile and linearize it on its own.
    pub fn init_patch(&mut self, row_offset: f32, col_offset: f32) -> Result<SurfaceBuffer> {
        let tile = self.generate_tile(row_offset, col_offset)?;
        assemble_strip(&tile, self.config.normal_policy)
    }

    /// Generate two vertically adjacent tiles stacked into one field.
    ///
    /// The tile at row offset 1 is placed before the tile at offset 0, so
    /// the stacked field runs in increasing x.
    pub fn generate_surface_field(&mut self) -> Result<HeightField> {
        let near = self.generate_tile(0.0, 0.0)?;
        let far = self.generate_tile(1.0, 0.0)?;
        let field = HeightField::stack(&[far, near])?;

        self.log_patch_columns();
        Ok(field)
    }

    /// Generate the two-tile field and assemble it into one continuous
    /// strip buffer, kept for [`Terrain::draw`].
    pub fn init_surface(&mut self) -> Result<&SurfaceBuffer> {
        let field = self.generate_surface_field()?;
        let buffer = assemble_strip(&field, self.config.normal_policy)?;
        tracing::info!(
            rows = field.rows(),
            cols = field.cols(),
            entries = buffer.len(),
            "assembled terrain surface"
        );
        Ok(&*self.surface.insert(buffer))
    }

    /// Hand the assembled surface to the renderer.
    pub fn draw(&self, renderer: &mut impl StripRenderer) -> Result<()> {
        let surface = self.surface.as_ref().ok_or_else(|| {
            ReliefError::PreconditionViolation(
                "draw called before the surface was initialized".to_string(),
            )
        })?;
        renderer.draw_strip(surface)
    }

    /// First control point column of each patch, newest patch first.
    pub fn control_point_columns(&self) -> impl Iterator<Item = (u32, &[Vec3])> + '_ {
        self.patches
            .iter()
            .rev()
            .map(|patch| (patch.id(), patch.edge(Edge::Left)))
    }

    fn log_patch_columns(&self) {
        if !tracing::enabled!(tracing::Level::DEBUG) {
            return;
        }
        for (id, column) in self.control_point_columns() {
            for &Vec3 { x, y, z } in column {
                tracing::debug!(patch = id, x, y, z, "control point");
            }
        }
    }
}
