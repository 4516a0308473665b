//! Sample the reference noise

use anyhow::Result;
use relief_terrain::{HeightSource, SinHashNoise};

pub fn run(row: i32, col: i32) -> Result<()> {
    println!("{}", SinHashNoise.height(row, col));
    Ok(())
}
