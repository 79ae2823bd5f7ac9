//! # Palette Module
//!
//! The fourteen named colours the figure is painted with, keyed by body part or
//! material rather than by hue.

use crate::color::Rgb;

/// A named palette entry.
///
/// Every voxel of the figure is painted with exactly one of these. The shadow and
/// shade variants are darker copies of their base colour, placed by per-region rules
/// in the builder.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PaletteColor {
    Skin,
    SkinShadow,
    Hair,
    HairShadow,
    Shirt,
    ShirtShade,
    Pants,
    PantsShade,
    Shoe,
    ShoeAccent,
    Eye,
    EyeShine,
    Blush,
    Accent,
}

impl PaletteColor {
    /// Every palette entry, in declaration order.
    pub const ALL: [PaletteColor; 14] = [
        PaletteColor::Skin,
        PaletteColor::SkinShadow,
        PaletteColor::Hair,
        PaletteColor::HairShadow,
        PaletteColor::Shirt,
        PaletteColor::ShirtShade,
        PaletteColor::Pants,
        PaletteColor::PantsShade,
        PaletteColor::Shoe,
        PaletteColor::ShoeAccent,
        PaletteColor::Eye,
        PaletteColor::EyeShine,
        PaletteColor::Blush,
        PaletteColor::Accent,
    ];

    /// The authored sRGB value of this entry.
    pub const fn rgb(self) -> Rgb {
        Rgb::from_hex(match self {
            PaletteColor::Skin => 0xf3c9a8,
            PaletteColor::SkinShadow => 0xe8b491,
            PaletteColor::Hair => 0x352016,
            PaletteColor::HairShadow => 0x24130c,
            PaletteColor::Shirt => 0x4263ff,
            PaletteColor::ShirtShade => 0x2f46bf,
            PaletteColor::Pants => 0x1f233a,
            PaletteColor::PantsShade => 0x151727,
            PaletteColor::Shoe => 0x10111e,
            PaletteColor::ShoeAccent => 0x3c415a,
            PaletteColor::Eye => 0x151217,
            PaletteColor::EyeShine => 0xf7f7f9,
            PaletteColor::Blush => 0xf69797,
            PaletteColor::Accent => 0xffc857,
        })
    }

    pub const fn name(self) -> &'static str {
        match self {
            PaletteColor::Skin => "skin",
            PaletteColor::SkinShadow => "skin-shadow",
            PaletteColor::Hair => "hair",
            PaletteColor::HairShadow => "hair-shadow",
            PaletteColor::Shirt => "shirt",
            PaletteColor::ShirtShade => "shirt-shade",
            PaletteColor::Pants => "pants",
            PaletteColor::PantsShade => "pants-shade",
            PaletteColor::Shoe => "shoe",
            PaletteColor::ShoeAccent => "shoe-accent",
            PaletteColor::Eye => "eye",
            PaletteColor::EyeShine => "eye-shine",
            PaletteColor::Blush => "blush",
            PaletteColor::Accent => "accent",
        }
    }
}
