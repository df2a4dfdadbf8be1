//! Sundial: a digital weather watch face.
//!
//! The face shows the wall-clock time and, once the companion phone app has sent
//! one, the latest weather snapshot (low/high temperature, a condition icon and a
//! short description). In ambient mode only the time and a one-line temperature
//! summary are drawn.
//!
//! The crate is `no_std`; tests run on the host with `std`.

#![cfg_attr(not(test), no_std)]

pub mod engine;
pub mod system;
pub mod ui;
pub mod weather;

cfg_if::cfg_if! {
    if #[cfg(feature = "log")] {
        pub(crate) use log::{debug, info, trace, warn};
    } else if #[cfg(feature = "defmt")] {
        pub(crate) use defmt::{debug, info, trace, warn};
    } else {
        macro_rules! trace {
            ($($arg:tt)*) => {{}};
        }
        macro_rules! debug {
            ($($arg:tt)*) => {{}};
        }
        macro_rules! info {
            ($($arg:tt)*) => {{}};
        }
        macro_rules! warn {
            ($($arg:tt)*) => {{}};
        }
        pub(crate) use {debug, info, trace, warn};
    }
}

pub use engine::Engine;
pub use system::config::{FaceConfig, Properties, ScreenShape};
pub use ui::{frame::Frame, sundial_watchface::SundialFace};
pub use weather::{
    condition::{resolve_icon, resolve_text, Condition, IconId},
    message::{MessageHandler, WeatherInbox},
    store::{PrefKey, Preferences, WeatherSnapshot},
};
