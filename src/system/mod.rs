//! Platform-facing services: configuration, time keeping and redraw timing

pub mod config;
pub mod scheduler;
pub mod time;
pub mod timer;
