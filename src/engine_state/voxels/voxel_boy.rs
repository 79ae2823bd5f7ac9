//! The hand-authored figure.
//!
//! Regions are emitted head first, then downward to the shoes. The emission order is
//! the instance order in the renderer and carries no other meaning.

use cgmath::Vector3;

use super::{PaletteColor, Voxel, VoxelScale};

/// Unit cells span x and z from −1 to 1 in the head and torso blocks.
const SPAN: [f32; 3] = [-1.0, 0.0, 1.0];

const EAR_SCALE: [f32; 3] = [0.7, 0.9, 0.7];
const EYE_SCALE: [f32; 3] = [0.3, 0.36, 0.3];
const EYE_SHINE_SCALE: [f32; 3] = [0.15, 0.16, 0.15];
const BLUSH_SCALE: [f32; 3] = [0.38, 0.24, 0.2];
const COLLAR_SCALE: [f32; 3] = [0.6, 0.24, 0.3];
const SHOULDER_SCALE: [f32; 3] = [1.0, 0.9, 0.9];
const BELT_SCALE: [f32; 3] = [1.0, 0.4, 1.0];
const LEG_FRONT_SCALE: [f32; 3] = [0.7, 1.1, 0.7];
const SHOE_SCALE: [f32; 3] = [1.0, 0.5, 1.0];
const TOE_CAP_SCALE: [f32; 3] = [0.6, 0.5, 1.2];

struct ModelBuilder {
    voxels: Vec<Voxel>,
}

impl ModelBuilder {
    fn new() -> Self {
        Self {
            voxels: Vec::with_capacity(128),
        }
    }

    fn add(&mut self, x: f32, y: f32, z: f32, color: PaletteColor) {
        self.add_scaled(x, y, z, color, VoxelScale::default());
    }

    fn add_scaled(
        &mut self,
        x: f32,
        y: f32,
        z: f32,
        color: PaletteColor,
        scale: impl Into<VoxelScale>,
    ) {
        self.voxels
            .push(Voxel::at_grid(Vector3::new(x, y, z), color, scale.into()));
    }

    fn head(&mut self) {
        for y in [8.0, 9.0, 10.0] {
            for x in SPAN {
                for z in SPAN {
                    let is_cheek = y == 9.0 && x.abs() == 1.0 && z == -1.0;
                    let color = if is_cheek {
                        PaletteColor::SkinShadow
                    } else {
                        PaletteColor::Skin
                    };
                    self.add(x, y, z, color);
                }
            }
        }
    }

    fn hair(&mut self) {
        for x in SPAN {
            for z in SPAN {
                self.add(x, 11.0, z, PaletteColor::Hair);
            }
        }

        // Fringe: a front row at the hairline plus one overhang on each side
        for x in SPAN {
            self.add(x, 10.0, -2.0, PaletteColor::HairShadow);
        }
        self.add(-2.0, 10.0, -1.0, PaletteColor::HairShadow);
        self.add(2.0, 10.0, -1.0, PaletteColor::HairShadow);
    }

    fn face(&mut self) {
        self.add_scaled(-2.0, 9.0, 0.0, PaletteColor::SkinShadow, EAR_SCALE);
        self.add_scaled(2.0, 9.0, 0.0, PaletteColor::SkinShadow, EAR_SCALE);

        self.add_scaled(-0.6, 9.2, -1.2, PaletteColor::Eye, EYE_SCALE);
        self.add_scaled(0.6, 9.2, -1.2, PaletteColor::Eye, EYE_SCALE);
        self.add_scaled(-0.2, 9.6, -1.3, PaletteColor::EyeShine, EYE_SHINE_SCALE);
        self.add_scaled(0.9, 9.6, -1.3, PaletteColor::EyeShine, EYE_SHINE_SCALE);

        self.add_scaled(-1.6, 8.6, -1.3, PaletteColor::Blush, BLUSH_SCALE);
        self.add_scaled(1.6, 8.6, -1.3, PaletteColor::Blush, BLUSH_SCALE);
    }

    fn neck(&mut self) {
        self.add(0.0, 7.0, 0.0, PaletteColor::SkinShadow);
        self.add(0.0, 7.0, -1.0, PaletteColor::SkinShadow);
    }

    fn torso(&mut self) {
        for y in [4.0, 5.0, 6.0] {
            for x in SPAN {
                for z in SPAN {
                    let is_shade = z == 1.0 || x == -1.0;
                    let color = if is_shade {
                        PaletteColor::ShirtShade
                    } else {
                        PaletteColor::Shirt
                    };
                    self.add(x, y, z, color);
                }
            }
        }

        self.add_scaled(0.0, 7.0, -1.2, PaletteColor::Accent, COLLAR_SCALE);
        self.add_scaled(0.0, 6.6, -1.2, PaletteColor::Accent, COLLAR_SCALE);
    }

    fn arms(&mut self) {
        for y in [5.0, 4.0, 3.0] {
            self.add(-2.0, y, 0.0, PaletteColor::Skin);
            self.add(-2.0, y, -1.0, PaletteColor::SkinShadow);
            self.add(2.0, y, 0.0, PaletteColor::Skin);
            self.add(2.0, y, -1.0, PaletteColor::SkinShadow);
        }

        self.add_scaled(-2.0, 6.0, -0.5, PaletteColor::ShirtShade, SHOULDER_SCALE);
        self.add_scaled(2.0, 6.0, -0.5, PaletteColor::ShirtShade, SHOULDER_SCALE);
    }

    fn legs(&mut self) {
        for x in SPAN {
            self.add_scaled(x, 3.0, -1.0, PaletteColor::Accent, BELT_SCALE);
        }

        for y in [2.0, 1.0] {
            for x in SPAN {
                self.add(x, y, -1.0, PaletteColor::Pants);
                self.add(x, y, 0.0, PaletteColor::PantsShade);
            }
        }

        self.add_scaled(-0.5, 1.5, -1.2, PaletteColor::PantsShade, LEG_FRONT_SCALE);
        self.add_scaled(0.5, 1.5, -1.2, PaletteColor::PantsShade, LEG_FRONT_SCALE);
    }

    fn shoes(&mut self) {
        for x in SPAN {
            self.add_scaled(x, 0.0, -1.2, PaletteColor::Shoe, SHOE_SCALE);
            self.add_scaled(x, 0.0, 0.0, PaletteColor::ShoeAccent, SHOE_SCALE);
        }
        self.add_scaled(-1.2, 0.0, -1.4, PaletteColor::ShoeAccent, TOE_CAP_SCALE);
        self.add_scaled(1.2, 0.0, -1.4, PaletteColor::ShoeAccent, TOE_CAP_SCALE);
    }

    fn finish(self) -> Vec<Voxel> {
        self.voxels
    }
}

/// Builds the full figure.
///
/// Pure and deterministic: every call returns the same voxels in the same order.
pub fn build_voxel_boy() -> Vec<Voxel> {
    let mut builder = ModelBuilder::new();

    builder.head();
    builder.hair();
    builder.face();
    builder.neck();
    builder.torso();
    builder.arms();
    builder.legs();
    builder.shoes();

    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::super::CUBE_SIZE;
    use super::*;

    fn in_head_block(voxel: &Voxel) -> bool {
        let g = voxel.grid;
        [8.0, 9.0, 10.0].contains(&g.y) && SPAN.contains(&g.x) && SPAN.contains(&g.z)
    }

    /// Every voxel in emission order: grid position, palette entry, per-axis scale.
    const EXPECTED_VOXELS: [([f32; 3], PaletteColor, [f32; 3]); 119] = [
        // Head core
        ([-1.0, 8.0, -1.0], PaletteColor::Skin, [1.0, 1.0, 1.0]),
        ([-1.0, 8.0, 0.0], PaletteColor::Skin, [1.0, 1.0, 1.0]),
        ([-1.0, 8.0, 1.0], PaletteColor::Skin, [1.0, 1.0, 1.0]),
        ([0.0, 8.0, -1.0], PaletteColor::Skin, [1.0, 1.0, 1.0]),
        ([0.0, 8.0, 0.0], PaletteColor::Skin, [1.0, 1.0, 1.0]),
        ([0.0, 8.0, 1.0], PaletteColor::Skin, [1.0, 1.0, 1.0]),
        ([1.0, 8.0, -1.0], PaletteColor::Skin, [1.0, 1.0, 1.0]),
        ([1.0, 8.0, 0.0], PaletteColor::Skin, [1.0, 1.0, 1.0]),
        ([1.0, 8.0, 1.0], PaletteColor::Skin, [1.0, 1.0, 1.0]),
        ([-1.0, 9.0, -1.0], PaletteColor::SkinShadow, [1.0, 1.0, 1.0]),
        ([-1.0, 9.0, 0.0], PaletteColor::Skin, [1.0, 1.0, 1.0]),
        ([-1.0, 9.0, 1.0], PaletteColor::Skin, [1.0, 1.0, 1.0]),
        ([0.0, 9.0, -1.0], PaletteColor::Skin, [1.0, 1.0, 1.0]),
        ([0.0, 9.0, 0.0], PaletteColor::Skin, [1.0, 1.0, 1.0]),
        ([0.0, 9.0, 1.0], PaletteColor::Skin, [1.0, 1.0, 1.0]),
        ([1.0, 9.0, -1.0], PaletteColor::SkinShadow, [1.0, 1.0, 1.0]),
        ([1.0, 9.0, 0.0], PaletteColor::Skin, [1.0, 1.0, 1.0]),
        ([1.0, 9.0, 1.0], PaletteColor::Skin, [1.0, 1.0, 1.0]),
        ([-1.0, 10.0, -1.0], PaletteColor::Skin, [1.0, 1.0, 1.0]),
        ([-1.0, 10.0, 0.0], PaletteColor::Skin, [1.0, 1.0, 1.0]),
        ([-1.0, 10.0, 1.0], PaletteColor::Skin, [1.0, 1.0, 1.0]),
        ([0.0, 10.0, -1.0], PaletteColor::Skin, [1.0, 1.0, 1.0]),
        ([0.0, 10.0, 0.0], PaletteColor::Skin, [1.0, 1.0, 1.0]),
        ([0.0, 10.0, 1.0], PaletteColor::Skin, [1.0, 1.0, 1.0]),
        ([1.0, 10.0, -1.0], PaletteColor::Skin, [1.0, 1.0, 1.0]),
        ([1.0, 10.0, 0.0], PaletteColor::Skin, [1.0, 1.0, 1.0]),
        ([1.0, 10.0, 1.0], PaletteColor::Skin, [1.0, 1.0, 1.0]),

        // Hair cap
        ([-1.0, 11.0, -1.0], PaletteColor::Hair, [1.0, 1.0, 1.0]),
        ([-1.0, 11.0, 0.0], PaletteColor::Hair, [1.0, 1.0, 1.0]),
        ([-1.0, 11.0, 1.0], PaletteColor::Hair, [1.0, 1.0, 1.0]),
        ([0.0, 11.0, -1.0], PaletteColor::Hair, [1.0, 1.0, 1.0]),
        ([0.0, 11.0, 0.0], PaletteColor::Hair, [1.0, 1.0, 1.0]),
        ([0.0, 11.0, 1.0], PaletteColor::Hair, [1.0, 1.0, 1.0]),
        ([1.0, 11.0, -1.0], PaletteColor::Hair, [1.0, 1.0, 1.0]),
        ([1.0, 11.0, 0.0], PaletteColor::Hair, [1.0, 1.0, 1.0]),
        ([1.0, 11.0, 1.0], PaletteColor::Hair, [1.0, 1.0, 1.0]),

        // Fringe
        ([-1.0, 10.0, -2.0], PaletteColor::HairShadow, [1.0, 1.0, 1.0]),
        ([0.0, 10.0, -2.0], PaletteColor::HairShadow, [1.0, 1.0, 1.0]),
        ([1.0, 10.0, -2.0], PaletteColor::HairShadow, [1.0, 1.0, 1.0]),
        ([-2.0, 10.0, -1.0], PaletteColor::HairShadow, [1.0, 1.0, 1.0]),
        ([2.0, 10.0, -1.0], PaletteColor::HairShadow, [1.0, 1.0, 1.0]),

        // Ears
        ([-2.0, 9.0, 0.0], PaletteColor::SkinShadow, [0.7, 0.9, 0.7]),
        ([2.0, 9.0, 0.0], PaletteColor::SkinShadow, [0.7, 0.9, 0.7]),

        // Eyes and eye shine
        ([-0.6, 9.2, -1.2], PaletteColor::Eye, [0.3, 0.36, 0.3]),
        ([0.6, 9.2, -1.2], PaletteColor::Eye, [0.3, 0.36, 0.3]),
        ([-0.2, 9.6, -1.3], PaletteColor::EyeShine, [0.15, 0.16, 0.15]),
        ([0.9, 9.6, -1.3], PaletteColor::EyeShine, [0.15, 0.16, 0.15]),

        // Blush
        ([-1.6, 8.6, -1.3], PaletteColor::Blush, [0.38, 0.24, 0.2]),
        ([1.6, 8.6, -1.3], PaletteColor::Blush, [0.38, 0.24, 0.2]),

        // Neck
        ([0.0, 7.0, 0.0], PaletteColor::SkinShadow, [1.0, 1.0, 1.0]),
        ([0.0, 7.0, -1.0], PaletteColor::SkinShadow, [1.0, 1.0, 1.0]),

        // Torso
        ([-1.0, 4.0, -1.0], PaletteColor::ShirtShade, [1.0, 1.0, 1.0]),
        ([-1.0, 4.0, 0.0], PaletteColor::ShirtShade, [1.0, 1.0, 1.0]),
        ([-1.0, 4.0, 1.0], PaletteColor::ShirtShade, [1.0, 1.0, 1.0]),
        ([0.0, 4.0, -1.0], PaletteColor::Shirt, [1.0, 1.0, 1.0]),
        ([0.0, 4.0, 0.0], PaletteColor::Shirt, [1.0, 1.0, 1.0]),
        ([0.0, 4.0, 1.0], PaletteColor::ShirtShade, [1.0, 1.0, 1.0]),
        ([1.0, 4.0, -1.0], PaletteColor::Shirt, [1.0, 1.0, 1.0]),
        ([1.0, 4.0, 0.0], PaletteColor::Shirt, [1.0, 1.0, 1.0]),
        ([1.0, 4.0, 1.0], PaletteColor::ShirtShade, [1.0, 1.0, 1.0]),
        ([-1.0, 5.0, -1.0], PaletteColor::ShirtShade, [1.0, 1.0, 1.0]),
        ([-1.0, 5.0, 0.0], PaletteColor::ShirtShade, [1.0, 1.0, 1.0]),
        ([-1.0, 5.0, 1.0], PaletteColor::ShirtShade, [1.0, 1.0, 1.0]),
        ([0.0, 5.0, -1.0], PaletteColor::Shirt, [1.0, 1.0, 1.0]),
        ([0.0, 5.0, 0.0], PaletteColor::Shirt, [1.0, 1.0, 1.0]),
        ([0.0, 5.0, 1.0], PaletteColor::ShirtShade, [1.0, 1.0, 1.0]),
        ([1.0, 5.0, -1.0], PaletteColor::Shirt, [1.0, 1.0, 1.0]),
        ([1.0, 5.0, 0.0], PaletteColor::Shirt, [1.0, 1.0, 1.0]),
        ([1.0, 5.0, 1.0], PaletteColor::ShirtShade, [1.0, 1.0, 1.0]),
        ([-1.0, 6.0, -1.0], PaletteColor::ShirtShade, [1.0, 1.0, 1.0]),
        ([-1.0, 6.0, 0.0], PaletteColor::ShirtShade, [1.0, 1.0, 1.0]),
        ([-1.0, 6.0, 1.0], PaletteColor::ShirtShade, [1.0, 1.0, 1.0]),
        ([0.0, 6.0, -1.0], PaletteColor::Shirt, [1.0, 1.0, 1.0]),
        ([0.0, 6.0, 0.0], PaletteColor::Shirt, [1.0, 1.0, 1.0]),
        ([0.0, 6.0, 1.0], PaletteColor::ShirtShade, [1.0, 1.0, 1.0]),
        ([1.0, 6.0, -1.0], PaletteColor::Shirt, [1.0, 1.0, 1.0]),
        ([1.0, 6.0, 0.0], PaletteColor::Shirt, [1.0, 1.0, 1.0]),
        ([1.0, 6.0, 1.0], PaletteColor::ShirtShade, [1.0, 1.0, 1.0]),

        // Collar
        ([0.0, 7.0, -1.2], PaletteColor::Accent, [0.6, 0.24, 0.3]),
        ([0.0, 6.6, -1.2], PaletteColor::Accent, [0.6, 0.24, 0.3]),

        // Arms
        ([-2.0, 5.0, 0.0], PaletteColor::Skin, [1.0, 1.0, 1.0]),
        ([-2.0, 5.0, -1.0], PaletteColor::SkinShadow, [1.0, 1.0, 1.0]),
        ([2.0, 5.0, 0.0], PaletteColor::Skin, [1.0, 1.0, 1.0]),
        ([2.0, 5.0, -1.0], PaletteColor::SkinShadow, [1.0, 1.0, 1.0]),
        ([-2.0, 4.0, 0.0], PaletteColor::Skin, [1.0, 1.0, 1.0]),
        ([-2.0, 4.0, -1.0], PaletteColor::SkinShadow, [1.0, 1.0, 1.0]),
        ([2.0, 4.0, 0.0], PaletteColor::Skin, [1.0, 1.0, 1.0]),
        ([2.0, 4.0, -1.0], PaletteColor::SkinShadow, [1.0, 1.0, 1.0]),
        ([-2.0, 3.0, 0.0], PaletteColor::Skin, [1.0, 1.0, 1.0]),
        ([-2.0, 3.0, -1.0], PaletteColor::SkinShadow, [1.0, 1.0, 1.0]),
        ([2.0, 3.0, 0.0], PaletteColor::Skin, [1.0, 1.0, 1.0]),
        ([2.0, 3.0, -1.0], PaletteColor::SkinShadow, [1.0, 1.0, 1.0]),

        // Shoulders
        ([-2.0, 6.0, -0.5], PaletteColor::ShirtShade, [1.0, 0.9, 0.9]),
        ([2.0, 6.0, -0.5], PaletteColor::ShirtShade, [1.0, 0.9, 0.9]),

        // Belt
        ([-1.0, 3.0, -1.0], PaletteColor::Accent, [1.0, 0.4, 1.0]),
        ([0.0, 3.0, -1.0], PaletteColor::Accent, [1.0, 0.4, 1.0]),
        ([1.0, 3.0, -1.0], PaletteColor::Accent, [1.0, 0.4, 1.0]),

        // Pants
        ([-1.0, 2.0, -1.0], PaletteColor::Pants, [1.0, 1.0, 1.0]),
        ([-1.0, 2.0, 0.0], PaletteColor::PantsShade, [1.0, 1.0, 1.0]),
        ([0.0, 2.0, -1.0], PaletteColor::Pants, [1.0, 1.0, 1.0]),
        ([0.0, 2.0, 0.0], PaletteColor::PantsShade, [1.0, 1.0, 1.0]),
        ([1.0, 2.0, -1.0], PaletteColor::Pants, [1.0, 1.0, 1.0]),
        ([1.0, 2.0, 0.0], PaletteColor::PantsShade, [1.0, 1.0, 1.0]),
        ([-1.0, 1.0, -1.0], PaletteColor::Pants, [1.0, 1.0, 1.0]),
        ([-1.0, 1.0, 0.0], PaletteColor::PantsShade, [1.0, 1.0, 1.0]),
        ([0.0, 1.0, -1.0], PaletteColor::Pants, [1.0, 1.0, 1.0]),
        ([0.0, 1.0, 0.0], PaletteColor::PantsShade, [1.0, 1.0, 1.0]),
        ([1.0, 1.0, -1.0], PaletteColor::Pants, [1.0, 1.0, 1.0]),
        ([1.0, 1.0, 0.0], PaletteColor::PantsShade, [1.0, 1.0, 1.0]),

        // Leg front detail
        ([-0.5, 1.5, -1.2], PaletteColor::PantsShade, [0.7, 1.1, 0.7]),
        ([0.5, 1.5, -1.2], PaletteColor::PantsShade, [0.7, 1.1, 0.7]),

        // Shoes and toe caps
        ([-1.0, 0.0, -1.2], PaletteColor::Shoe, [1.0, 0.5, 1.0]),
        ([-1.0, 0.0, 0.0], PaletteColor::ShoeAccent, [1.0, 0.5, 1.0]),
        ([0.0, 0.0, -1.2], PaletteColor::Shoe, [1.0, 0.5, 1.0]),
        ([0.0, 0.0, 0.0], PaletteColor::ShoeAccent, [1.0, 0.5, 1.0]),
        ([1.0, 0.0, -1.2], PaletteColor::Shoe, [1.0, 0.5, 1.0]),
        ([1.0, 0.0, 0.0], PaletteColor::ShoeAccent, [1.0, 0.5, 1.0]),
        ([-1.2, 0.0, -1.4], PaletteColor::ShoeAccent, [0.6, 0.5, 1.2]),
        ([1.2, 0.0, -1.4], PaletteColor::ShoeAccent, [0.6, 0.5, 1.2]),
    ];

    #[test]
    fn model_matches_the_authored_table() {
        let voxels = build_voxel_boy();
        assert_eq!(voxels.len(), EXPECTED_VOXELS.len());

        for (index, (voxel, (grid, color, scale))) in
            voxels.iter().zip(EXPECTED_VOXELS).enumerate()
        {
            assert_eq!(
                [voxel.grid.x, voxel.grid.y, voxel.grid.z],
                grid,
                "grid of voxel {index}"
            );
            assert_eq!(voxel.color, color, "colour of voxel {index} at {grid:?}");
            assert_eq!(voxel.scale.to_vec3(), scale, "scale of voxel {index} at {grid:?}");
        }
    }

    #[test]
    fn model_is_deterministic() {
        assert_eq!(build_voxel_boy(), build_voxel_boy());
    }

    #[test]
    fn model_has_expected_voxel_count() {
        assert_eq!(build_voxel_boy().len(), 119);
    }

    #[test]
    fn positions_are_grid_times_cube_size() {
        for voxel in build_voxel_boy() {
            assert_eq!(voxel.position.x, voxel.grid.x * CUBE_SIZE);
            assert_eq!(voxel.position.y, voxel.grid.y * CUBE_SIZE);
            assert_eq!(voxel.position.z, voxel.grid.z * CUBE_SIZE);
        }
    }

    #[test]
    fn every_voxel_is_finite_and_painted_from_the_palette() {
        let voxels = build_voxel_boy();
        assert!(!voxels.is_empty());

        for voxel in voxels {
            assert!(PaletteColor::ALL.contains(&voxel.color));
            assert!(voxel.position.x.is_finite());
            assert!(voxel.position.y.is_finite());
            assert!(voxel.position.z.is_finite());
            assert!(voxel.scale.to_vec3().iter().all(|s| s.is_finite() && *s > 0.0));
        }
    }

    #[test]
    fn head_block_has_27_cells_with_shadowed_cheeks() {
        let head: Vec<_> = build_voxel_boy()
            .into_iter()
            .filter(in_head_block)
            .collect();

        assert_eq!(head.len(), 27);
        for voxel in &head {
            let g = voxel.grid;
            let is_cheek = g.y == 9.0 && g.x.abs() == 1.0 && g.z == -1.0;
            let expected = if is_cheek {
                PaletteColor::SkinShadow
            } else {
                PaletteColor::Skin
            };
            assert_eq!(voxel.color, expected, "head cell at {:?}", g);
        }

        let shadowed = head
            .iter()
            .filter(|v| v.color == PaletteColor::SkinShadow)
            .count();
        assert_eq!(shadowed, 2);
    }

    #[test]
    fn torso_shade_falls_on_back_and_left_side() {
        let torso: Vec<_> = build_voxel_boy()
            .into_iter()
            .filter(|v| {
                [4.0, 5.0, 6.0].contains(&v.grid.y)
                    && v.grid.x.abs() <= 1.0
                    && SPAN.contains(&v.grid.z)
            })
            .filter(|v| v.scale == VoxelScale::default())
            .collect();

        assert_eq!(torso.len(), 27);
        for voxel in torso {
            let shaded = voxel.grid.z == 1.0 || voxel.grid.x == -1.0;
            assert_eq!(voxel.color == PaletteColor::ShirtShade, shaded);
        }
    }

    #[test]
    fn shoes_are_squashed_vertically() {
        let shoes: Vec<_> = build_voxel_boy()
            .into_iter()
            .filter(|v| v.grid.y == 0.0)
            .collect();

        assert_eq!(shoes.len(), 8);
        assert!(shoes.iter().all(|v| v.scale.to_vec3()[1] == 0.5));
    }

    #[test]
    fn facial_details_sit_in_front_of_the_face() {
        let face_front = -1.0;
        for voxel in build_voxel_boy() {
            if matches!(
                voxel.color,
                PaletteColor::Eye | PaletteColor::EyeShine | PaletteColor::Blush
            ) {
                assert!(voxel.grid.z < face_front);
            }
        }
    }
}
