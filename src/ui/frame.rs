//! Composed frame
//!
//! Layout produces a [`Frame`], a short list of positioned elements, which is
//! painted in a second step.

use core::fmt::{self, Write};

use embedded_graphics::{
    draw_target::DrawTarget,
    geometry::Point,
    primitives::{Primitive, PrimitiveStyle, Rectangle},
    text::{Baseline, Text},
    Drawable,
};
use embedded_text::TextBox;
use heapless::{String, Vec};

use super::{
    assets::{self, ICON_SIZE},
    style::FaceStyle,
};
use crate::{
    system::config::ColorMode,
    weather::{condition::IconId, store::VALUE_LEN},
};

/// Capacity of a text line; fits two stored values plus labels
pub const LINE_LEN: usize = 2 * VALUE_LEN + 32;

pub type Line = String<LINE_LEN>;

/// Icon edge length as a coordinate
pub(crate) const ICON_EDGE: i32 = ICON_SIZE as i32;

/// Upper bound of elements in one frame
const MAX_ELEMENTS: usize = 8;

/// Format into a line, truncating on overflow
pub fn line(args: fmt::Arguments<'_>) -> Line {
    let mut line = Line::new();
    let _ = line.write_fmt(args);
    line
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Font {
    Time,
    Weather,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Element {
    /// Fill the frame with a solid color
    Fill(ColorMode),
    /// Background art over the whole frame
    Background,
    /// Single line of text
    Text {
        text: Line,
        position: Point,
        baseline: Baseline,
        font: Font,
    },
    /// Weather icon with its top left corner at `top_left`
    Icon { icon: IconId, top_left: Point },
    /// Centered, word-wrapped text
    Block { text: &'static str, bounds: Rectangle },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pub bounds: Rectangle,
    elements: Vec<Element, MAX_ELEMENTS>,
}

impl Frame {
    pub fn new(bounds: Rectangle) -> Self {
        Self {
            bounds,
            elements: Vec::new(),
        }
    }

    pub fn push(&mut self, element: Element) {
        // Layouts never exceed MAX_ELEMENTS
        let _ = self.elements.push(element);
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Every piece of text in drawing order
    pub fn texts(&self) -> impl Iterator<Item = &str> + '_ {
        self.elements.iter().filter_map(|element| match element {
            Element::Text { text, .. } => Some(text.as_str()),
            Element::Block { text, .. } => Some(*text),
            _ => None,
        })
    }

    /// The weather icon, if one is shown
    pub fn icon(&self) -> Option<IconId> {
        self.elements.iter().find_map(|element| match element {
            Element::Icon { icon, .. } => Some(*icon),
            _ => None,
        })
    }

    /// Paint the frame onto `target`
    pub fn draw<D>(&self, target: &mut D, style: &FaceStyle) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = ColorMode>,
    {
        for element in &self.elements {
            match element {
                Element::Fill(color) => {
                    self.bounds
                        .into_styled(PrimitiveStyle::with_fill(*color))
                        .draw(target)?;
                }
                Element::Background => assets::draw_background(target, self.bounds, style)?,
                Element::Text {
                    text,
                    position,
                    baseline,
                    font,
                } => {
                    let character_style = match font {
                        Font::Time => style.time,
                        Font::Weather => style.weather,
                    };
                    Text::with_baseline(text.as_str(), *position, character_style, *baseline).draw(target)?;
                }
                Element::Icon { icon, top_left } => {
                    assets::icon_canvas(*icon).place_at(*top_left).draw(target)?;
                }
                Element::Block { text, bounds } => {
                    TextBox::with_textbox_style(*text, *bounds, style.weather, style.block).draw(target)?;
                }
            }
        }
        Ok(())
    }
}
