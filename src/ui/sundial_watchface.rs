//! Sundial watchface
//!
//! Up to three rows: the time, then low temperature / icon / high temperature,
//! then a wrapped description of the weather. Without weather data the last two
//! rows are replaced by a short notice.

use chrono::{NaiveDateTime, Timelike};
use embedded_graphics::{
    geometry::{Point, Size},
    mono_font::MonoTextStyle,
    primitives::Rectangle,
    text::{renderer::TextRenderer, Baseline},
};

use super::{
    frame::{line, Element, Font, Frame, Line, ICON_EDGE},
    DisplayMode, RenderState, WatchFace,
};
use crate::{
    system::config::ColorMode,
    warn,
    weather::{
        condition::{resolve, Condition},
        store::WeatherSnapshot,
    },
};

/// Shown until the phone has sent a forecast
pub const NO_DATA: &str = "Waiting for weather data from your phone";

/// Placeholder for a missing temperature
const MISSING: &str = "--";

/// Zero-padded 24 hour `HH:MM`
pub fn format_time(time: &NaiveDateTime) -> Line {
    line(format_args!("{:02}:{:02}", time.hour(), time.minute()))
}

fn measure(style: &MonoTextStyle<'_, ColorMode>, text: &str) -> Size {
    style
        .measure_string(text, Point::zero(), Baseline::Alphabetic)
        .bounding_box
        .size
}

/// Condition to draw, `None` falls back to the notice
fn condition(weather: &WeatherSnapshot) -> Option<Condition> {
    match weather.condition_code() {
        Ok(code) => code.map(resolve),
        Err(err) => {
            warn!("Showing no weather data: {}", err);
            None
        }
    }
}

/// Positions shared by all rows
struct TimeRow {
    center_x: i32,
    /// Left edge of the time text
    left: i32,
    baseline: i32,
    size: Size,
}

pub struct SundialFace;

impl SundialFace {
    fn ambient_rows(state: &RenderState<'_>, time: &TimeRow, weather: &WeatherSnapshot, frame: &mut Frame) {
        let Some(high) = weather.high.as_deref() else {
            return;
        };
        let low = weather.low.as_deref().unwrap_or(MISSING);

        // Aligned with the time text rather than centered on its own
        frame.push(Element::Text {
            text: line(format_args!("Low: {low}\u{b0} High: {high}\u{b0}")),
            position: Point::new(
                time.left - state.config.temp_spacing,
                time.baseline + time.size.height as i32 / 2 + state.config.temp_spacing,
            ),
            baseline: Baseline::Alphabetic,
            font: Font::Weather,
        });
    }

    fn interactive_rows(state: &RenderState<'_>, time: &TimeRow, weather: &WeatherSnapshot, frame: &mut Frame) {
        let config = state.config;

        let Some(condition) = condition(weather) else {
            let width = state.bounds.size.width;
            frame.push(Element::Block {
                text: NO_DATA,
                bounds: Rectangle::new(
                    Point::new(
                        state.bounds.top_left.x + width as i32 / 8,
                        time.baseline + config.block_spacing,
                    ),
                    Size::new(width * 6 / 8, 0),
                ),
            });
            return;
        };

        let low = line(format_args!("{}\u{b0}", weather.low.as_deref().unwrap_or(MISSING)));
        let high = line(format_args!("{}\u{b0}", weather.high.as_deref().unwrap_or(MISSING)));
        let low_width = measure(&state.style.weather, &low).width as i32;

        let row_center = time.baseline + config.weather_row_offset;
        let icon_left = time.center_x - ICON_EDGE / 2;

        frame.push(Element::Text {
            text: low,
            position: Point::new(icon_left - config.temp_spacing - low_width, row_center),
            baseline: Baseline::Middle,
            font: Font::Weather,
        });
        frame.push(Element::Icon {
            icon: condition.icon(),
            top_left: Point::new(icon_left, row_center - ICON_EDGE / 2),
        });
        frame.push(Element::Text {
            text: high,
            position: Point::new(icon_left + ICON_EDGE + config.temp_spacing, row_center),
            baseline: Baseline::Middle,
            font: Font::Weather,
        });
        frame.push(Element::Block {
            text: condition.text(),
            bounds: Rectangle::new(
                Point::new(time.left, row_center + ICON_EDGE / 2 + config.block_spacing),
                Size::new(time.size.width, 0),
            ),
        });
    }
}

impl WatchFace for SundialFace {
    fn compose(&self, state: &RenderState<'_>, weather: &WeatherSnapshot) -> Frame {
        let mut frame = Frame::new(state.bounds);

        let text = format_time(&state.time);
        let size = measure(&state.style.time, &text);
        let center_x = state.bounds.top_left.x + state.bounds.size.width as i32 / 2;
        let time = TimeRow {
            center_x,
            left: center_x - size.width as i32 / 2,
            baseline: state.bounds.top_left.y + state.config.y_offset,
            size,
        };

        frame.push(match state.mode {
            DisplayMode::Ambient => Element::Fill(state.style.background),
            DisplayMode::Interactive => Element::Background,
        });
        frame.push(Element::Text {
            text,
            position: Point::new(time.left, time.baseline),
            baseline: Baseline::Alphabetic,
            font: Font::Time,
        });

        match state.mode {
            DisplayMode::Ambient => Self::ambient_rows(state, &time, weather, &mut frame),
            DisplayMode::Interactive => Self::interactive_rows(state, &time, weather, &mut frame),
        }

        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        system::config::{FaceConfig, ScreenShape},
        ui::style::FaceStyle,
        weather::store::Value,
    };
    use chrono::NaiveDate;
    use embedded_graphics::pixelcolor::{Rgb565, RgbColor};

    fn at(hour: u32, minute: u32, second: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 17)
            .unwrap()
            .and_hms_opt(hour, minute, second)
            .unwrap()
    }

    fn snapshot(id: &str, high: &str, low: &str) -> WeatherSnapshot {
        WeatherSnapshot {
            weather_id: Some(Value::try_from(id).unwrap()),
            high: Some(Value::try_from(high).unwrap()),
            low: Some(Value::try_from(low).unwrap()),
        }
    }

    fn compose(mode: DisplayMode, shape: ScreenShape, weather: &WeatherSnapshot) -> Frame {
        let config = FaceConfig::for_shape(shape);
        let style = FaceStyle::new(config, mode, false);
        let state = RenderState {
            time: at(9, 41, 27),
            mode,
            bounds: Rectangle::new(Point::zero(), config.size),
            config,
            style: &style,
        };
        SundialFace.compose(&state, weather)
    }

    fn texts(frame: &Frame) -> std::vec::Vec<&str> {
        frame.texts().collect()
    }

    fn text_position(frame: &Frame, wanted: &str) -> Point {
        frame
            .elements()
            .iter()
            .find_map(|element| match element {
                Element::Text { text, position, .. } if text.as_str() == wanted => Some(*position),
                _ => None,
            })
            .unwrap()
    }

    #[test]
    fn time_is_zero_padded_without_seconds() {
        assert_eq!(format_time(&at(7, 5, 59)).as_str(), "07:05");
        assert_eq!(format_time(&at(23, 59, 0)).as_str(), "23:59");
        assert_eq!(format_time(&at(0, 0, 30)).as_str(), "00:00");
    }

    #[test]
    fn shows_notice_without_weather() {
        let frame = compose(DisplayMode::Interactive, ScreenShape::Square, &WeatherSnapshot::default());
        assert_eq!(frame.elements()[0], Element::Background);
        assert_eq!(texts(&frame), ["09:41", NO_DATA]);
        assert_eq!(frame.icon(), None);

        let Some(Element::Block { bounds, .. }) = frame.elements().last() else {
            panic!("notice block missing");
        };
        assert_eq!(bounds.top_left.x, 240 / 8);
        assert_eq!(bounds.size.width, 240 * 6 / 8);
    }

    #[test]
    fn clear_sky_row() {
        let frame = compose(DisplayMode::Interactive, ScreenShape::Square, &snapshot("800", "30", "20"));
        assert_eq!(texts(&frame), ["09:41", "20\u{b0}", "30\u{b0}", "Clear"]);
        assert_eq!(frame.icon(), Some(crate::weather::condition::IconId::Clear));

        let low = text_position(&frame, "20\u{b0}");
        let high = text_position(&frame, "30\u{b0}");
        let Some(Element::Icon { top_left, .. }) = frame.elements().iter().find(|e| matches!(e, Element::Icon { .. })) else {
            panic!("icon missing");
        };
        assert!(low.x < top_left.x);
        assert!(high.x >= top_left.x + ICON_EDGE);
        assert_eq!(low.y, high.y);
        assert_eq!(top_left.y + ICON_EDGE / 2, low.y);
        // Icon is horizontally centered
        assert_eq!(top_left.x + ICON_EDGE / 2, 120);
    }

    #[test]
    fn description_matches_time_width() {
        let config = FaceConfig::for_shape(ScreenShape::Round);
        let style = FaceStyle::new(config, DisplayMode::Interactive, false);
        let time_width = measure(&style.time, "09:41").width;

        let frame = compose(DisplayMode::Interactive, ScreenShape::Round, &snapshot("502", "8", "2"));
        let Some(Element::Block { text, bounds }) = frame.elements().last() else {
            panic!("description missing");
        };
        assert_eq!(*text, "Rain");
        assert_eq!(bounds.size.width, time_width);
        assert_eq!(bounds.top_left.x, text_position(&frame, "09:41").x);
    }

    #[test]
    fn time_is_centered() {
        for shape in [ScreenShape::Square, ScreenShape::Round] {
            let config = FaceConfig::for_shape(shape);
            let style = FaceStyle::new(config, DisplayMode::Interactive, false);
            let width = measure(&style.time, "09:41").width as i32;

            let frame = compose(DisplayMode::Interactive, shape, &WeatherSnapshot::default());
            let position = text_position(&frame, "09:41");
            assert_eq!(position.x, 120 - width / 2);
            assert_eq!(position.y, config.y_offset);
        }
    }

    #[test]
    fn invalid_code_falls_back_to_notice() {
        let frame = compose(DisplayMode::Interactive, ScreenShape::Square, &snapshot("n/a", "30", "20"));
        assert_eq!(texts(&frame), ["09:41", NO_DATA]);
        assert_eq!(frame.icon(), None);
    }

    #[test]
    fn ambient_summary_line() {
        let frame = compose(DisplayMode::Ambient, ScreenShape::Square, &snapshot("800", "30", "20"));
        assert_eq!(frame.elements()[0], Element::Fill(Rgb565::BLACK));
        assert_eq!(texts(&frame), ["09:41", "Low: 20\u{b0} High: 30\u{b0}"]);
        assert_eq!(frame.icon(), None);

        let time = text_position(&frame, "09:41");
        let summary = text_position(&frame, "Low: 20\u{b0} High: 30\u{b0}");
        assert_eq!(summary.x, time.x - FaceConfig::SQUARE.temp_spacing);
        assert!(summary.y > time.y);
    }

    #[test]
    fn ambient_summary_sits_half_a_line_below_time() {
        for shape in [ScreenShape::Square, ScreenShape::Round] {
            let config = FaceConfig::for_shape(shape);
            let style = FaceStyle::new(config, DisplayMode::Ambient, false);
            let time_height = measure(&style.time, "09:41").height as i32;

            let frame = compose(DisplayMode::Ambient, shape, &snapshot("800", "30", "20"));
            let summary = text_position(&frame, "Low: 20\u{b0} High: 30\u{b0}");
            assert_eq!(summary.y, config.y_offset + time_height / 2 + config.temp_spacing);
        }
    }

    #[test]
    fn ambient_without_weather_shows_time_only() {
        let frame = compose(DisplayMode::Ambient, ScreenShape::Round, &WeatherSnapshot::default());
        assert_eq!(texts(&frame), ["09:41"]);
    }

    #[test]
    fn ambient_shows_summary_despite_invalid_code() {
        let frame = compose(DisplayMode::Ambient, ScreenShape::Square, &snapshot("oops", "4", "-2"));
        assert_eq!(texts(&frame), ["09:41", "Low: -2\u{b0} High: 4\u{b0}"]);
    }
}
