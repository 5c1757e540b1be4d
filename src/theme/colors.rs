//! Farm palettes as ratatui Color::Rgb constants.

use ratatui::style::Color;

/// Daylight palette: saffron and field green on warm paper.
pub struct HarvestColors;

#[allow(dead_code)]
impl HarvestColors {
    // Primary palette
    pub const SAFFRON: Color = Color::Rgb(255, 153, 51); // #FF9933
    pub const FIELD_GREEN: Color = Color::Rgb(19, 136, 8); // #138808
    pub const SOIL: Color = Color::Rgb(92, 64, 51); // #5C4033
    pub const SKY: Color = Color::Rgb(56, 132, 196); // #3884C4
    pub const WHEAT: Color = Color::Rgb(222, 184, 135); // #DEB887
    pub const CHILLI: Color = Color::Rgb(196, 30, 58); // #C41E3A

    // Surfaces
    pub const BG: Color = Color::Rgb(250, 247, 240); // #FAF7F0
    pub const SURFACE: Color = Color::Rgb(255, 255, 255);
    pub const BORDER: Color = Color::Rgb(214, 204, 184); // #D6CCB8

    // Text
    pub const TEXT_PRIMARY: Color = Color::Rgb(41, 37, 36); // #292524
    pub const TEXT_SECONDARY: Color = Color::Rgb(120, 113, 108); // #78716C
    pub const TEXT_ON_SOIL: Color = Color::Rgb(255, 255, 255);
}

/// Low-light palette for evening field checks.
pub struct MonsoonColors;

impl MonsoonColors {
    pub const CLOUD: Color = Color::Rgb(30, 41, 59); // #1E293B
    pub const RAIN: Color = Color::Rgb(96, 165, 250); // #60A5FA
    pub const LEAF: Color = Color::Rgb(74, 222, 128); // #4ADE80
    pub const MANGO: Color = Color::Rgb(251, 191, 36); // #FBBF24
    pub const CLAY: Color = Color::Rgb(248, 113, 113); // #F87171
    pub const SLATE: Color = Color::Rgb(71, 85, 105); // #475569
    pub const MIST: Color = Color::Rgb(148, 163, 184); // #94A3B8
    pub const NIGHT: Color = Color::Rgb(15, 23, 42); // #0F172A
    pub const TEXT: Color = Color::Rgb(226, 232, 240); // #E2E8F0
}
