//! Time keeping module

use chrono::{FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeDelta, Utc};
use embassy_time::Instant;

/// Source of wall-clock time
pub trait Clock {
    /// Current UTC time
    fn now(&self) -> NaiveDateTime;

    /// Offset of the device time zone
    fn utc_offset(&self) -> FixedOffset {
        Utc.fix()
    }

    /// Current UTC time as milliseconds since the epoch, clamped at zero
    fn epoch_millis(&self) -> u64 {
        u64::try_from(self.now().and_utc().timestamp_millis()).unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimeError {
    #[error("current time payload is too short")]
    ShortPayload,
    #[error("current time payload holds no valid date")]
    InvalidDate,
    #[error("time zone offset out of range")]
    InvalidOffset,
}

/// Convert a time zone offset in seconds east of UTC
pub fn offset_from_secs(secs: i32) -> Result<FixedOffset, TimeError> {
    FixedOffset::east_opt(secs).ok_or(TimeError::InvalidOffset)
}

pub struct TimeReference {
    /// Clock time
    time: NaiveDateTime,
    /// Related system time
    instant: Instant,
}

impl Default for TimeReference {
    fn default() -> Self {
        Self {
            time: NaiveDateTime::UNIX_EPOCH,
            instant: Instant::from_ticks(0),
        }
    }
}

impl TimeReference {
    /// Create new time reference from NaiveDateTime
    pub fn from_datetime(time: NaiveDateTime) -> Self {
        Self {
            time,
            instant: Instant::now(),
        }
    }

    /// Create new time reference from Bluetooth Current Time Service data
    pub fn from_cts_bytes(bytes: &[u8]) -> Result<Self, TimeError> {
        let time = cts_datetime(bytes)?;
        Ok(Self::from_datetime(time))
    }
}

/// Decode the exact time part of a Current Time Service characteristic
fn cts_datetime(bytes: &[u8]) -> Result<NaiveDateTime, TimeError> {
    let &[y0, y1, month, day, hour, min, sec, _day_of_week, fractions_256, ..] = bytes else {
        return Err(TimeError::ShortPayload);
    };
    let year = u16::from_le_bytes([y0, y1]) as i32;
    // Convert fractions_256 to milliseconds
    let milli = fractions_256 as u32 * 1000 / 256;

    NaiveDate::from_ymd_opt(year, month as u32, day as u32)
        .and_then(|date| date.and_hms_milli_opt(hour as u32, min as u32, sec as u32, milli))
        .ok_or(TimeError::InvalidDate)
}

/// Wall clock kept against the monotonic system timer
pub struct TimeManager {
    reference: TimeReference,
    offset: FixedOffset,
}

impl TimeManager {
    /// Initialize time measurement on boot
    pub fn init() -> Self {
        Self {
            reference: TimeReference::default(),
            offset: Utc.fix(),
        }
    }

    /// Get current time
    pub fn get_time(&self) -> NaiveDateTime {
        let elapsed = Instant::now().duration_since(self.reference.instant);
        let elapsed = TimeDelta::microseconds(elapsed.as_micros() as i64);
        self.reference
            .time
            .checked_add_signed(elapsed)
            .unwrap_or(self.reference.time)
    }

    /// Update time reference
    pub fn set_time(&mut self, reference: TimeReference) {
        self.reference = reference;
    }

    /// Update the time zone
    pub fn set_utc_offset(&mut self, offset: FixedOffset) {
        self.offset = offset;
    }
}

impl Clock for TimeManager {
    fn now(&self) -> NaiveDateTime {
        self.get_time()
    }

    fn utc_offset(&self) -> FixedOffset {
        self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_current_time_service_bytes() {
        // 2024-03-03 14:05:09.500, Sunday
        let bytes = [0xe8, 0x07, 3, 3, 14, 5, 9, 7, 128, 0];
        let time = cts_datetime(&bytes).unwrap();
        assert_eq!(
            time,
            NaiveDate::from_ymd_opt(2024, 3, 3)
                .unwrap()
                .and_hms_milli_opt(14, 5, 9, 500)
                .unwrap()
        );
    }

    #[test]
    fn rejects_bad_current_time_payloads() {
        assert_eq!(cts_datetime(&[0xe8, 0x07, 3]), Err(TimeError::ShortPayload));
        assert_eq!(
            cts_datetime(&[0xe8, 0x07, 13, 3, 14, 5, 9, 7, 0, 0]),
            Err(TimeError::InvalidDate)
        );
        assert_eq!(
            cts_datetime(&[0xe8, 0x07, 3, 3, 25, 5, 9, 7, 0, 0]),
            Err(TimeError::InvalidDate)
        );
    }

    #[test]
    fn manager_advances_from_reference() {
        let start = NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(23, 59, 0)
            .unwrap();
        let mut manager = TimeManager::init();
        manager.set_time(TimeReference::from_datetime(start));
        assert!(manager.now() >= start);
        assert!(manager.epoch_millis() >= start.and_utc().timestamp_millis() as u64);
    }

    #[test]
    fn offsets() {
        assert_eq!(offset_from_secs(3_600).unwrap().local_minus_utc(), 3_600);
        assert_eq!(offset_from_secs(86_400), Err(TimeError::InvalidOffset));

        let mut manager = TimeManager::init();
        assert_eq!(manager.utc_offset().local_minus_utc(), 0);
        manager.set_utc_offset(offset_from_secs(-18_000).unwrap());
        assert_eq!(manager.utc_offset().local_minus_utc(), -18_000);
    }
}
