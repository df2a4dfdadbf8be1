//! Paint state for one display mode
//!
//! A [`FaceStyle`] is rebuilt whenever the mode, the low-bit property or the
//! screen shape changes, and handed to every draw call.

use embedded_graphics::{
    mono_font::MonoTextStyle,
    pixelcolor::{Rgb565, RgbColor},
};
use embedded_text::{
    alignment::HorizontalAlignment,
    style::{HeightMode, TextBoxStyle, TextBoxStyleBuilder},
};

use super::DisplayMode;
use crate::system::config::{ColorMode, FaceConfig};

#[derive(Clone)]
pub struct FaceStyle {
    pub time: MonoTextStyle<'static, ColorMode>,
    pub weather: MonoTextStyle<'static, ColorMode>,
    /// Wrapped description and fallback text
    pub block: TextBoxStyle,
    pub background: ColorMode,
    pub dial: ColorMode,
    /// Whether intermediate colors may be used. Off in low-bit ambient mode,
    /// where every pixel is either fully on or off.
    pub antialias: bool,
}

impl FaceStyle {
    pub fn new(config: &FaceConfig, mode: DisplayMode, low_bit_ambient: bool) -> Self {
        let antialias = !(low_bit_ambient && mode == DisplayMode::Ambient);
        let text_color = match (mode, antialias) {
            (DisplayMode::Interactive, _) => config.accent_color,
            (DisplayMode::Ambient, true) => config.text_color,
            (DisplayMode::Ambient, false) => Rgb565::WHITE,
        };
        let (background, dial) = match mode {
            DisplayMode::Interactive => (config.background_color, config.dial_color),
            DisplayMode::Ambient => (Rgb565::BLACK, Rgb565::BLACK),
        };

        Self {
            time: MonoTextStyle::new(config.time_font, text_color),
            weather: MonoTextStyle::new(config.weather_font, text_color),
            block: TextBoxStyleBuilder::new()
                .height_mode(HeightMode::FitToText)
                .alignment(HorizontalAlignment::Center)
                .build(),
            background,
            dial,
            antialias,
        }
    }
}
