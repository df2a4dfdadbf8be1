//! Background art and weather icons
//!
//! Everything is drawn from primitives. Icons are rendered into a transparent
//! canvas first so they can be blitted anywhere on the face.

use core::{convert::Infallible, f32::consts::PI};

use embedded_canvas::CCanvas;
use embedded_graphics::{
    draw_target::DrawTarget,
    geometry::{Point, Size},
    pixelcolor::{Rgb565, RgbColor},
    primitives::{Circle, Line, Primitive, PrimitiveStyle, Rectangle, Triangle},
    Drawable,
};

use super::style::FaceStyle;
use crate::{system::config::ColorMode, weather::condition::IconId};

/// Width and height of a weather icon in pixels
pub const ICON_SIZE: usize = 32;

/// Icon bitmap with transparent background
pub type IconCanvas = CCanvas<ColorMode, ICON_SIZE, ICON_SIZE>;

const SUN: Rgb565 = Rgb565::new(31, 52, 4);
const CLOUD: Rgb565 = Rgb565::new(28, 58, 29);
const DARK_CLOUD: Rgb565 = Rgb565::new(16, 34, 18);
const DROP: Rgb565 = Rgb565::new(8, 40, 31);
const BOLT: Rgb565 = Rgb565::YELLOW;

/// Hour marks on the dial
const DIAL_TICKS: u32 = 12;

/// Draw the background: a sundial plate with hour marks
pub fn draw_background<D>(target: &mut D, area: Rectangle, style: &FaceStyle) -> Result<(), D::Error>
where
    D: DrawTarget<Color = ColorMode>,
{
    area.into_styled(PrimitiveStyle::with_fill(style.background))
        .draw(target)?;

    let center = area.center();
    let diameter = area.size.width.min(area.size.height) * 7 / 8;
    let dial = PrimitiveStyle::with_stroke(style.dial, 2);
    Circle::with_center(center, diameter)
        .into_styled(dial)
        .draw(target)?;

    let outer = diameter as f32 / 2.0;
    let inner = outer * 0.88;
    for hour in 0..DIAL_TICKS {
        let angle = hour as f32 * 2.0 * PI / DIAL_TICKS as f32;
        let (sin, cos) = (libm::sinf(angle), libm::cosf(angle));
        let at = |radius: f32| {
            Point::new(
                center.x + libm::roundf(sin * radius) as i32,
                center.y - libm::roundf(cos * radius) as i32,
            )
        };
        Line::new(at(inner), at(outer)).into_styled(dial).draw(target)?;
    }

    // Gnomon
    Triangle::new(
        center,
        Point::new(center.x, center.y - (inner as i32) / 2),
        Point::new(center.x + (inner as i32) / 3, center.y),
    )
    .into_styled(PrimitiveStyle::with_fill(style.dial))
    .draw(target)
}

/// Render a weather icon into its own canvas
pub fn icon_canvas(icon: IconId) -> IconCanvas {
    let mut canvas = IconCanvas::new();
    draw_icon(&mut canvas, icon).unwrap_or_else(|never: Infallible| match never {});
    canvas
}

/// Draw a weather icon into a `ICON_SIZE` square at the origin
pub fn draw_icon<D>(target: &mut D, icon: IconId) -> Result<(), D::Error>
where
    D: DrawTarget<Color = ColorMode>,
{
    let full = Point::new(16, 16);
    match icon {
        IconId::Clear => sun(target, full, 14),
        IconId::LightClouds => {
            sun(target, Point::new(11, 11), 10)?;
            cloud(target, Point::new(3, 4), CLOUD)
        }
        IconId::Cloudy => {
            cloud(target, Point::new(-1, -3), DARK_CLOUD)?;
            cloud(target, Point::new(2, 4), CLOUD)
        }
        IconId::LightRain => {
            cloud(target, Point::new(0, -4), CLOUD)?;
            drops(target, &[11, 21], 6)
        }
        IconId::Rain => {
            cloud(target, Point::new(0, -4), DARK_CLOUD)?;
            drops(target, &[8, 14, 20, 26], 8)
        }
        IconId::Snow => {
            cloud(target, Point::new(0, -4), CLOUD)?;
            for (x, y) in [(8, 24), (16, 28), (24, 24), (12, 30), (20, 30)] {
                Circle::with_center(Point::new(x, y), 3)
                    .into_styled(PrimitiveStyle::with_fill(Rgb565::WHITE))
                    .draw(target)?;
            }
            Ok(())
        }
        IconId::Storm => {
            cloud(target, Point::new(0, -4), DARK_CLOUD)?;
            let bolt = PrimitiveStyle::with_fill(BOLT);
            Triangle::new(Point::new(17, 16), Point::new(10, 25), Point::new(16, 25))
                .into_styled(bolt)
                .draw(target)?;
            Triangle::new(Point::new(15, 24), Point::new(21, 24), Point::new(13, 31))
                .into_styled(bolt)
                .draw(target)
        }
        IconId::Fog => {
            let mist = PrimitiveStyle::with_stroke(CLOUD, 2);
            for (i, y) in [8, 14, 20, 26].into_iter().enumerate() {
                let inset = if i % 2 == 0 { 3 } else { 7 };
                Line::new(Point::new(inset, y), Point::new(31 - inset, y))
                    .into_styled(mist)
                    .draw(target)?;
            }
            Ok(())
        }
    }
}

fn sun<D>(target: &mut D, center: Point, diameter: u32) -> Result<(), D::Error>
where
    D: DrawTarget<Color = ColorMode>,
{
    Circle::with_center(center, diameter)
        .into_styled(PrimitiveStyle::with_fill(SUN))
        .draw(target)?;

    let rays = PrimitiveStyle::with_stroke(SUN, 2);
    let (inner, outer) = (diameter as f32 / 2.0 + 2.0, diameter as f32 / 2.0 + 5.0);
    for ray in 0..8 {
        let angle = ray as f32 * PI / 4.0;
        let (sin, cos) = (libm::sinf(angle), libm::cosf(angle));
        let at = |radius: f32| {
            center + Point::new(libm::roundf(cos * radius) as i32, libm::roundf(sin * radius) as i32)
        };
        Line::new(at(inner), at(outer)).into_styled(rays).draw(target)?;
    }
    Ok(())
}

/// Cloud of three puffs on a flat base, `offset` shifts it within the icon
fn cloud<D>(target: &mut D, offset: Point, color: ColorMode) -> Result<(), D::Error>
where
    D: DrawTarget<Color = ColorMode>,
{
    let fill = PrimitiveStyle::with_fill(color);
    Circle::new(Point::new(3, 13) + offset, 12).into_styled(fill).draw(target)?;
    Circle::new(Point::new(9, 7) + offset, 15).into_styled(fill).draw(target)?;
    Circle::new(Point::new(17, 11) + offset, 12).into_styled(fill).draw(target)?;
    Rectangle::new(Point::new(9, 17) + offset, Size::new(14, 8))
        .into_styled(fill)
        .draw(target)
}

/// Slanted rain streaks below a cloud
fn drops<D>(target: &mut D, columns: &[i32], length: i32) -> Result<(), D::Error>
where
    D: DrawTarget<Color = ColorMode>,
{
    let streak = PrimitiveStyle::with_stroke(DROP, 2);
    for &x in columns {
        Line::new(Point::new(x, 22), Point::new(x - 3, 22 + length))
            .into_styled(streak)
            .draw(target)?;
    }
    Ok(())
}
