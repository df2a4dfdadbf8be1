//! Watch face configuration
//!
//! Layout constants exist in two sets, one for square and one for round
//! screens. The set is picked once the window insets are known.

use embedded_graphics::{
    geometry::Size,
    mono_font::{iso_8859_1::FONT_7X13, MonoFont},
    pixelcolor::{Rgb565, RgbColor},
};
use profont::{PROFONT_18_POINT, PROFONT_24_POINT};

/// Color type of the display
pub type ColorMode = Rgb565;

const LCD_W: u32 = 240;
const LCD_H: u32 = 240;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScreenShape {
    Square,
    Round,
}

impl ScreenShape {
    pub fn from_insets(is_round: bool) -> Self {
        if is_round {
            ScreenShape::Round
        } else {
            ScreenShape::Square
        }
    }
}

/// Display properties reported by the platform
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Properties {
    /// The display has fewer bits per color in ambient mode
    pub low_bit_ambient: bool,
}

/// Fixed layout and color settings
#[derive(Clone, Copy)]
pub struct FaceConfig {
    /// Screen size in pixels
    pub size: Size,
    /// Baseline of the time row
    pub y_offset: i32,
    /// Distance from the time baseline to the center of the weather row
    pub weather_row_offset: i32,
    /// Horizontal gap between the icon and the temperatures
    pub temp_spacing: i32,
    /// Vertical gap above wrapped text blocks
    pub block_spacing: i32,
    pub time_font: &'static MonoFont<'static>,
    pub weather_font: &'static MonoFont<'static>,
    pub text_color: ColorMode,
    /// Text color in interactive mode
    pub accent_color: ColorMode,
    pub background_color: ColorMode,
    /// Dial marks of the background art
    pub dial_color: ColorMode,
}

impl FaceConfig {
    pub const SQUARE: FaceConfig = FaceConfig {
        size: Size::new(LCD_W, LCD_H),
        y_offset: 88,
        weather_row_offset: 30,
        temp_spacing: 5,
        block_spacing: 10,
        time_font: &PROFONT_18_POINT,
        weather_font: &FONT_7X13,
        text_color: Rgb565::WHITE,
        accent_color: Rgb565::new(30, 60, 28),
        background_color: Rgb565::new(1, 20, 20),
        dial_color: Rgb565::new(6, 34, 26),
    };

    pub const ROUND: FaceConfig = FaceConfig {
        size: Size::new(LCD_W, LCD_H),
        y_offset: 88,
        weather_row_offset: 34,
        temp_spacing: 5,
        block_spacing: 10,
        time_font: &PROFONT_24_POINT,
        weather_font: &FONT_7X13,
        text_color: Rgb565::WHITE,
        accent_color: Rgb565::new(30, 60, 28),
        background_color: Rgb565::new(1, 20, 20),
        dial_color: Rgb565::new(6, 34, 26),
    };

    pub const fn for_shape(shape: ScreenShape) -> &'static FaceConfig {
        match shape {
            ScreenShape::Square => &Self::SQUARE,
            ScreenShape::Round => &Self::ROUND,
        }
    }
}

impl Default for FaceConfig {
    fn default() -> Self {
        Self::SQUARE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_from_insets() {
        assert_eq!(ScreenShape::from_insets(true), ScreenShape::Round);
        assert_eq!(ScreenShape::from_insets(false), ScreenShape::Square);
    }

    #[test]
    fn round_screens_use_larger_time_text() {
        let round = FaceConfig::for_shape(ScreenShape::Round);
        let square = FaceConfig::for_shape(ScreenShape::Square);
        assert!(round.time_font.character_size.height > square.time_font.character_size.height);
    }
}
