//! Generate the terrain strip and write it as JSON

use std::fs::File;
use std::io::BufWriter;

use anyhow::{Context, Result};
use relief_terrain::{StripRenderer, SurfaceBuffer, Terrain};
use serde::Serialize;

use super::TerrainArgs;

pub struct GenerateArgs {
    pub terrain: TerrainArgs,
    pub output: String,
    pub single_tile: bool,
}

/// On-disk layout of an exported strip
#[derive(Serialize)]
struct StripExport {
    rows: usize,
    cols: usize,
    entries: usize,
    filled_in: bool,
    positions: Vec<[f32; 3]>,
    normals: Vec<[f32; 3]>,
}

/// Renderer that writes the strip to a JSON file instead of a GPU buffer
struct JsonStripWriter {
    path: String,
    filled_in: bool,
}

impl StripRenderer for JsonStripWriter {
    fn draw_strip(&mut self, buffer: &SurfaceBuffer) -> relief_core::Result<()> {
        let export = StripExport {
            rows: buffer.rows(),
            cols: buffer.cols(),
            entries: buffer.len(),
            filled_in: self.filled_in,
            positions: buffer.positions().map(|p| p.to_array()).collect(),
            normals: buffer.normals().map(|n| n.to_array()).collect(),
        };

        let file = File::create(&self.path)?;
        serde_json::to_writer(BufWriter::new(file), &export)
            .map_err(|e| relief_core::ReliefError::IoError(e.into()))
    }
}

pub fn run(args: GenerateArgs) -> Result<()> {
    let config = args.terrain.resolve()?;
    let mut terrain = Terrain::new(config).context("Failed to create terrain")?;
    let mut writer = JsonStripWriter {
        path: args.output.clone(),
        filled_in: terrain.is_filled_in(),
    };

    let entries = if args.single_tile {
        let buffer = terrain
            .init_patch(0.0, 0.0)
            .context("Failed to generate terrain tile")?;
        writer.draw_strip(&buffer)?;
        buffer.len()
    } else {
        let entries = terrain
            .init_surface()
            .context("Failed to generate terrain surface")?
            .len();
        terrain.draw(&mut writer)?;
        entries
    };

    println!(
        "Wrote {} strip entries from {} patch(es) to {}",
        entries,
        terrain.patches().len(),
        args.output
    );

    Ok(())
}
