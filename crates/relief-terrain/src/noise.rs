//! Deterministic height sources for control points

/// Largest `f32` below the noise amplitude. A tiny negative product can
/// round its fractional part up to 1.0.
const HEIGHT_CEILING: f32 = 3.999_999_8;

/// A height generator keyed by integer grid coordinates.
///
/// Implementations must be pure: the same `(row, col)` always yields the
/// same height.
pub trait HeightSource {
    fn height(&self, row: i32, col: i32) -> f32;
}

/// The reference sine-hash noise. Returns heights in `[-4.0, 4.0)`.
///
/// The hash runs entirely in single precision; heights depend on the `f32`
/// rounding of every step.
#[derive(Clone, Copy, Debug, Default)]
pub struct SinHashNoise;

impl HeightSource for SinHashNoise {
    fn height(&self, row: i32, col: i32) -> f32 {
        let scaled = (row as f32 * 127.1 + col as f32 * 311.7).sin() * 43_758.547_f32;
        let fract = scaled - scaled.floor();
        ((-4.0 + 8.0 * fract as f64) as f32).min(HEIGHT_CEILING)
    }
}

/// Constant height everywhere. Produces a perfectly flat terrain.
#[derive(Clone, Copy, Debug, Default)]
pub struct FlatHeight(pub f32);

impl HeightSource for FlatHeight {
    fn height(&self, _row: i32, _col: i32) -> f32 {
        self.0
    }
}

impl<F> HeightSource for F
where
    F: Fn(i32, i32) -> f32,
{
    fn height(&self, row: i32, col: i32) -> f32 {
        self(row, col)
    }
}
