//! Export the stacked terrain heights as a grayscale PNG

use std::path::Path;

use anyhow::{Context, Result};
use relief_terrain::Terrain;

use super::TerrainArgs;

pub fn run(terrain_args: &TerrainArgs, output: &str) -> Result<()> {
    let config = terrain_args.resolve()?;
    let mut terrain = Terrain::new(config).context("Failed to create terrain")?;
    let field = terrain
        .generate_surface_field()
        .context("Failed to generate terrain surface")?;

    field
        .save_png(Path::new(output))
        .context(format!("Failed to save heightmap to {}", output))?;

    let (lo, hi) = field.height_range();
    println!(
        "Wrote {}x{} heightmap to {} (heights {:.3} .. {:.3})",
        field.cols(),
        field.rows(),
        output,
        lo,
        hi
    );

    Ok(())
}
