//! Patch registry: control grids plus cached boundary data for stitching

use relief_core::{ReliefError, Result, Vec3};

use crate::grid::ControlGrid;

/// One side of a patch
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Top, Edge::Right, Edge::Bottom, Edge::Left];

    fn index(self) -> usize {
        match self {
            Edge::Top => 0,
            Edge::Right => 1,
            Edge::Bottom => 2,
            Edge::Left => 3,
        }
    }
}

/// A generated tile's control points and boundary rows/columns.
///
/// Immutable once registered.
#[derive(Clone, Debug)]
pub struct Patch {
    id: u32,
    control_points: ControlGrid,
    edges: [Vec<Vec3>; 4],
    second_edges: [Vec<Vec3>; 4],
}

impl Patch {
    fn from_grid(grid: ControlGrid, id: u32) -> Result<Self> {
        let last_row = grid.rows() - 1;
        let last_col = grid.cols() - 1;

        let edges = [
            grid.row(0)?,
            grid.column(last_col)?,
            grid.row(last_row)?,
            grid.column(0)?,
        ];
        let second_edges = [
            grid.row(1)?,
            grid.column(last_col - 1)?,
            grid.row(last_row - 1)?,
            grid.column(1)?,
        ];

        Ok(Self {
            id,
            control_points: grid,
            edges,
            second_edges,
        })
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn control_points(&self) -> &ControlGrid {
        &self.control_points
    }

    /// Boundary points on the given side
    pub fn edge(&self, edge: Edge) -> &[Vec3] {
        &self.edges[edge.index()]
    }

    /// The row or column just inside the given side
    pub fn second_edge(&self, edge: Edge) -> &[Vec3] {
        &self.second_edges[edge.index()]
    }
}

/// Append-only list of patches for a fixed control grid shape.
#[derive(Debug)]
pub struct PatchRegistry {
    shape: (usize, usize),
    patches: Vec<Patch>,
}

impl PatchRegistry {
    /// `shape` is the control grid shape (rows, cols) every patch must have.
    pub fn new(shape: (usize, usize)) -> Self {
        Self {
            shape,
            patches: Vec::new(),
        }
    }

    /// Validate `grid`, extract its edges and append it as a new patch.
    pub fn register(&mut self, grid: ControlGrid, id: u32) -> Result<&Patch> {
        let (rows, cols) = self.shape;
        grid.expect_shape(rows, cols)?;
        if rows < 2 || cols < 2 {
            return Err(ReliefError::PreconditionViolation(format!(
                "patch needs at least 2x2 control points, got {}x{}",
                rows, cols
            )));
        }

        let patch = Patch::from_grid(grid, id)?;
        tracing::debug!(id, patches = self.patches.len() + 1, "registered patch");
        self.patches.push(patch);
        Ok(&self.patches[self.patches.len() - 1])
    }

    pub fn get(&self, index: usize) -> Option<&Patch> {
        self.patches.get(index)
    }

    pub fn first(&self) -> Option<&Patch> {
        self.patches.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Patch> {
        self.patches.iter()
    }

    pub fn len(&self) -> usize {
        self.patches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered_grid(rows: usize, cols: usize) -> ControlGrid {
        ControlGrid::from_fn(rows, cols, |r, c| {
            Vec3::new(r as f32, (r * 10 + c) as f32, c as f32)
        })
    }

    fn heights(points: &[Vec3]) -> Vec<f32> {
        points.iter().map(|p| p.y).collect()
    }

    #[test]
    fn edges_are_extracted_from_boundaries() {
        let mut registry = PatchRegistry::new((4, 4));
        let patch = registry.register(numbered_grid(4, 4), 0).unwrap();

        assert_eq!(heights(patch.edge(Edge::Top)), vec![0.0, 1.0, 2.0, 3.0]);
        assert_eq!(heights(patch.second_edge(Edge::Top)), vec![10.0, 11.0, 12.0, 13.0]);
        assert_eq!(heights(patch.edge(Edge::Bottom)), vec![30.0, 31.0, 32.0, 33.0]);
        assert_eq!(heights(patch.second_edge(Edge::Bottom)), vec![20.0, 21.0, 22.0, 23.0]);
        assert_eq!(heights(patch.edge(Edge::Left)), vec![0.0, 10.0, 20.0, 30.0]);
        assert_eq!(heights(patch.second_edge(Edge::Left)), vec![1.0, 11.0, 21.0, 31.0]);
        assert_eq!(heights(patch.edge(Edge::Right)), vec![3.0, 13.0, 23.0, 33.0]);
        assert_eq!(heights(patch.second_edge(Edge::Right)), vec![2.0, 12.0, 22.0, 32.0]);
    }

    #[test]
    fn wrong_shape_is_rejected() {
        let mut registry = PatchRegistry::new((4, 4));
        let err = registry.register(numbered_grid(3, 4), 0).unwrap_err();
        assert!(matches!(err, ReliefError::PreconditionViolation(_)));
        assert!(registry.is_empty());
    }

    #[test]
    fn degenerate_shape_is_rejected() {
        let mut registry = PatchRegistry::new((1, 4));
        assert!(registry.register(numbered_grid(1, 4), 0).is_err());
    }

    #[test]
    fn registry_is_append_only() {
        let mut registry = PatchRegistry::new((4, 4));
        registry.register(numbered_grid(4, 4), 0).unwrap();
        let before = registry.get(0).unwrap().control_points().clone();

        let other = ControlGrid::from_fn(4, 4, |_, _| Vec3::splat(7.0));
        registry.register(other, 1).unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get(0).unwrap().control_points(), &before);
        assert_eq!(registry.get(1).unwrap().id(), 1);
        assert_eq!(registry.iter().map(Patch::id).collect::<Vec<_>>(), vec![0, 1]);
    }
}
