//! # Voxel Model
//!
//! The data model for the figure and the builder that lays it out.
//!
//! A "voxel" here is a positioned, coloured cuboid, not an occupancy cell: grid
//! coordinates may be fractional (facial detail sits between cells) and each voxel may
//! carry its own non-uniform scale. There is no chunking, adjacency or spatial index;
//! the model is a flat list of roughly a hundred cuboids built once at start-up.
//!
//! ## Coordinates
//!
//! * x: left/right, y: up, z: front/back (the face looks toward −z)
//! * world = grid × [`CUBE_SIZE`] on every axis, so scale-1 neighbours touch exactly

use cgmath::Vector3;

pub mod palette;
pub mod voxel_boy;

pub use palette::PaletteColor;
pub use voxel_boy::build_voxel_boy;

/// Edge length of one unit cuboid in world units.
///
/// Shared by the builder (grid to world) and the renderer's base cube geometry.
pub const CUBE_SIZE: f32 = 0.48;

/// Per-voxel scale relative to the base cube.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum VoxelScale {
    Uniform(f32),
    NonUniform([f32; 3]),
}

impl VoxelScale {
    /// Expands the scale into one factor per axis.
    pub fn to_vec3(self) -> [f32; 3] {
        match self {
            VoxelScale::Uniform(s) => [s, s, s],
            VoxelScale::NonUniform(s) => s,
        }
    }
}

impl Default for VoxelScale {
    fn default() -> Self {
        VoxelScale::Uniform(1.0)
    }
}

impl From<f32> for VoxelScale {
    fn from(value: f32) -> Self {
        VoxelScale::Uniform(value)
    }
}

impl From<[f32; 3]> for VoxelScale {
    fn from(value: [f32; 3]) -> Self {
        VoxelScale::NonUniform(value)
    }
}

/// One cuboid of the figure.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Voxel {
    /// Position in the authoring grid
    pub grid: Vector3<f32>,
    /// World-space position, `grid * CUBE_SIZE`
    pub position: Vector3<f32>,
    pub color: PaletteColor,
    pub scale: VoxelScale,
}

impl Voxel {
    /// Creates a voxel from grid coordinates, deriving its world position.
    pub fn at_grid(grid: Vector3<f32>, color: PaletteColor, scale: VoxelScale) -> Self {
        Self {
            grid,
            position: grid_to_world(grid),
            color,
            scale,
        }
    }
}

/// Converts a grid coordinate to world space.
pub fn grid_to_world(grid: Vector3<f32>) -> Vector3<f32> {
    grid * CUBE_SIZE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_defaults_to_uniform_one() {
        assert_eq!(VoxelScale::default().to_vec3(), [1.0, 1.0, 1.0]);
    }

    #[test]
    fn non_uniform_scale_expands_unchanged() {
        let scale: VoxelScale = [0.7, 0.9, 0.7].into();
        assert_eq!(scale.to_vec3(), [0.7, 0.9, 0.7]);
    }

    #[test]
    fn adjacent_cells_touch_exactly() {
        let a = grid_to_world(Vector3::new(0.0, 4.0, 0.0));
        let b = grid_to_world(Vector3::new(1.0, 4.0, 0.0));

        let gap = (b.x - CUBE_SIZE / 2.0) - (a.x + CUBE_SIZE / 2.0);
        assert!(gap.abs() < 1e-6);
    }
}
