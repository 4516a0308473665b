//! Patch introspection command

use anyhow::{Context, Result};
use relief_core::Vec3;
use relief_terrain::{Edge, Terrain};

pub fn run(terrain_args: &super::TerrainArgs) -> Result<()> {
    let config = terrain_args.resolve()?;
    let mut terrain = Terrain::new(config).context("Failed to create terrain")?;
    terrain
        .init_surface()
        .context("Failed to generate terrain surface")?;

    for patch in terrain.patches().iter() {
        let grid = patch.control_points();
        println!("Patch {} ({}x{} control points)", patch.id(), grid.rows(), grid.cols());

        for edge in Edge::ALL {
            println!("  {:?}:", edge);
            println!("    edge   {}", format_heights(patch.edge(edge)));
            println!("    second {}", format_heights(patch.second_edge(edge)));
        }
        println!();
    }

    Ok(())
}

fn format_heights(points: &[Vec3]) -> String {
    points
        .iter()
        .map(|p| format!("{:.3}", p.y))
        .collect::<Vec<_>>()
        .join(" ")
}
