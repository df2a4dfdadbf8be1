//! Weather data relayed from the companion phone app

pub mod condition;
pub mod message;
pub mod store;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WeatherError {
    #[error("stored weather condition code is not a number")]
    InvalidConditionCode,
}
