//! Relief CLI - Command-line interface for the Relief terrain generator

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{generate, height, heightmap, inspect, TerrainArgs};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "relief")]
#[command(about = "Bézier patch terrain generator", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the terrain strip buffer and write it as JSON
    Generate {
        #[command(flatten)]
        terrain: TerrainArgs,

        /// Output file path
        #[arg(short, long, default_value = "terrain.json")]
        output: String,

        /// Generate a single tile instead of the two-tile surface
        #[arg(long)]
        single_tile: bool,
    },

    /// Print every patch's control grid edges
    Inspect {
        #[command(flatten)]
        terrain: TerrainArgs,
    },

    /// Print the noise height for a control point
    Height {
        /// Control point row
        #[arg(allow_hyphen_values = true)]
        row: i32,

        /// Control point column
        #[arg(allow_hyphen_values = true)]
        col: i32,
    },

    /// Write the stacked terrain heights as a 16-bit grayscale PNG
    Heightmap {
        #[command(flatten)]
        terrain: TerrainArgs,

        /// Output image path
        #[arg(short, long, default_value = "heightmap.png")]
        output: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            terrain,
            output,
            single_tile,
        } => generate::run(generate::GenerateArgs {
            terrain,
            output,
            single_tile,
        }),
        Commands::Inspect { terrain } => inspect::run(&terrain),
        Commands::Height { row, col } => height::run(row, col),
        Commands::Heightmap { terrain, output } => heightmap::run(&terrain, &output),
    }
}
