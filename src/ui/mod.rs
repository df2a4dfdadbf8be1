//! UI definitions module

use chrono::NaiveDateTime;
use embedded_graphics::{draw_target::DrawTarget, primitives::Rectangle};

use crate::{
    system::config::{ColorMode, FaceConfig},
    weather::store::WeatherSnapshot,
};

pub mod assets;
pub mod frame;
pub mod style;
pub mod sundial_watchface;

use frame::Frame;
use style::FaceStyle;

/// Display mode of the watch face
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayMode {
    /// Full detail, redrawn every second
    #[default]
    Interactive,
    /// Low power, redrawn on the system time tick only
    Ambient,
}

/// Everything a watch face needs to lay out one frame
pub struct RenderState<'a> {
    /// Local wall-clock time
    pub time: NaiveDateTime,
    pub mode: DisplayMode,
    pub bounds: Rectangle,
    pub config: &'a FaceConfig,
    pub style: &'a FaceStyle,
}

pub trait WatchFace {
    /// Lay out a frame for `state`
    fn compose(&self, state: &RenderState<'_>, weather: &WeatherSnapshot) -> Frame;

    /// Lay out a frame and paint it onto `target`
    fn draw<D>(&self, target: &mut D, state: &RenderState<'_>, weather: &WeatherSnapshot) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = ColorMode>,
    {
        self.compose(state, weather).draw(target, state.style)
    }
}
