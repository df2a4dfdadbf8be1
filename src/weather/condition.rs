//! Weather condition lookup
//!
//! Condition codes follow the OpenWeatherMap classification. Icon and text are
//! both properties of a [`Condition`], and a code is mapped to a condition by a
//! single ordered table so the two can never disagree.

use core::ops::RangeInclusive;

/// Icon shown in the weather row
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IconId {
    Storm,
    LightRain,
    Rain,
    Snow,
    Fog,
    Clear,
    LightClouds,
    Cloudy,
}

/// Presentation class of a weather condition code
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Condition {
    Storm,
    LightRain,
    Rain,
    Snow,
    Fog,
    Clear,
    LightClouds,
    Cloudy,
}

impl Condition {
    pub const fn icon(self) -> IconId {
        match self {
            Condition::Storm => IconId::Storm,
            Condition::LightRain => IconId::LightRain,
            Condition::Rain => IconId::Rain,
            Condition::Snow => IconId::Snow,
            Condition::Fog => IconId::Fog,
            Condition::Clear => IconId::Clear,
            Condition::LightClouds => IconId::LightClouds,
            Condition::Cloudy => IconId::Cloudy,
        }
    }

    /// Sentence drawn below the temperature row
    pub const fn text(self) -> &'static str {
        match self {
            Condition::Storm => "Storm",
            Condition::LightRain => "Light rain",
            Condition::Rain => "Rain",
            Condition::Snow => "Snow",
            Condition::Fog => "Fog",
            Condition::Clear => "Clear",
            Condition::LightClouds => "Light clouds",
            Condition::Cloudy => "Cloudy",
        }
    }
}

/// Which codes a table entry covers
enum Matcher {
    Range(RangeInclusive<i32>),
    OneOf(&'static [i32]),
}

impl Matcher {
    fn matches(&self, code: i32) -> bool {
        match self {
            Matcher::Range(range) => range.contains(&code),
            Matcher::OneOf(codes) => codes.contains(&code),
        }
    }
}

/// Evaluated top to bottom, first match wins.
///
/// 761 is covered by both the fog range and the storm entry and therefore
/// resolves to fog.
static CONDITIONS: [(Matcher, Condition); 11] = [
    (Matcher::Range(200..=232), Condition::Storm),
    (Matcher::Range(300..=321), Condition::LightRain),
    (Matcher::Range(500..=504), Condition::Rain),
    (Matcher::OneOf(&[511]), Condition::Snow),
    (Matcher::Range(520..=531), Condition::Rain),
    (Matcher::Range(600..=622), Condition::Snow),
    (Matcher::Range(701..=761), Condition::Fog),
    (Matcher::OneOf(&[761, 781]), Condition::Storm),
    (Matcher::OneOf(&[800]), Condition::Clear),
    (Matcher::OneOf(&[801]), Condition::LightClouds),
    (Matcher::Range(802..=804), Condition::Cloudy),
];

/// Fallback for codes no entry covers
const DEFAULT_CONDITION: Condition = Condition::Clear;

/// Map a condition code to its presentation class
pub fn resolve(code: i32) -> Condition {
    CONDITIONS
        .iter()
        .find(|(matcher, _)| matcher.matches(code))
        .map_or(DEFAULT_CONDITION, |(_, condition)| *condition)
}

pub fn resolve_icon(code: i32) -> IconId {
    resolve(code).icon()
}

pub fn resolve_text(code: i32) -> &'static str {
    resolve(code).text()
}
