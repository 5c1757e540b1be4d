pub mod colors;

use ratatui::style::Color;

use colors::{HarvestColors, MonsoonColors};

/// Semantic colour slots used by the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    pub name: &'static str,
    pub bar_bg: Color,
    pub text_on_bar: Color,
    pub surface: Color,
    pub border: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub accent: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub rain: Color,
    pub yield_line: Color,
    pub gauge: Color,
}

impl Theme {
    pub fn harvest() -> Self {
        Self {
            name: "Harvest",
            bar_bg: HarvestColors::SOIL,
            text_on_bar: HarvestColors::TEXT_ON_SOIL,
            surface: HarvestColors::SURFACE,
            border: HarvestColors::BORDER,
            text_primary: HarvestColors::TEXT_PRIMARY,
            text_secondary: HarvestColors::TEXT_SECONDARY,
            accent: HarvestColors::SAFFRON,
            success: HarvestColors::FIELD_GREEN,
            warning: HarvestColors::SAFFRON,
            error: HarvestColors::CHILLI,
            rain: HarvestColors::SKY,
            yield_line: HarvestColors::FIELD_GREEN,
            gauge: HarvestColors::FIELD_GREEN,
        }
    }

    pub fn monsoon() -> Self {
        Self {
            name: "Monsoon",
            bar_bg: MonsoonColors::NIGHT,
            text_on_bar: MonsoonColors::TEXT,
            surface: MonsoonColors::CLOUD,
            border: MonsoonColors::SLATE,
            text_primary: MonsoonColors::TEXT,
            text_secondary: MonsoonColors::MIST,
            accent: MonsoonColors::RAIN,
            success: MonsoonColors::LEAF,
            warning: MonsoonColors::MANGO,
            error: MonsoonColors::CLAY,
            rain: MonsoonColors::RAIN,
            yield_line: MonsoonColors::LEAF,
            gauge: MonsoonColors::LEAF,
        }
    }

    /// Terminal default colours only.
    pub fn plain() -> Self {
        Self {
            name: "Plain",
            bar_bg: Color::Reset,
            text_on_bar: Color::Reset,
            surface: Color::Reset,
            border: Color::DarkGray,
            text_primary: Color::Reset,
            text_secondary: Color::Gray,
            accent: Color::Cyan,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            rain: Color::Blue,
            yield_line: Color::Green,
            gauge: Color::Green,
        }
    }

    pub fn next(&self) -> Self {
        match self.name {
            "Harvest" => Self::monsoon(),
            "Monsoon" => Self::plain(),
            _ => Self::harvest(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::harvest()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_cycle_returns_to_start() {
        let start = Theme::harvest();
        let cycled = start.next().next().next();
        assert_eq!(cycled, start);
        assert_eq!(start.next().name, "Monsoon");
    }
}
