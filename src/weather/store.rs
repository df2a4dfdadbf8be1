//! Weather preferences store
//!
//! Flat key-value store holding the last weather snapshot received from the
//! phone. Writes go through an [`Editor`] and land in one critical section, so a
//! reader never observes a half-applied message.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::{raw::CriticalSectionRawMutex, Mutex};
use heapless::{String, Vec};

use crate::debug;

/// Capacity of a single stored value in bytes
pub const VALUE_LEN: usize = 48;

/// Capacity of the raw payload mirror: three full values and two separators
pub const MESSAGE_LEN: usize = 3 * VALUE_LEN + 2;

/// Persisted key name of the raw payload mirror
pub const RAW_MESSAGE_KEY: &str = "sundailMessage";

/// Stored value
pub type Value = String<VALUE_LEN>;

/// Payload as delivered and mirrored
pub type RawMessage = String<MESSAGE_LEN>;

/// Keys of the weather fields
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PrefKey {
    /// Weather condition code, as received
    WeatherId = 0,
    /// Daily high temperature
    High = 1,
    /// Daily low temperature
    Low = 2,
}

impl PrefKey {
    pub const COUNT: usize = 3;

    /// Persisted key name
    pub const fn as_str(self) -> &'static str {
        match self {
            PrefKey::WeatherId => "weatherid",
            PrefKey::High => "high",
            PrefKey::Low => "low",
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StoreError {
    #[error("value for key `{key}` is too long")]
    ValueTooLong { key: &'static str },
}

struct Entries {
    values: [Option<Value>; PrefKey::COUNT],
    raw_message: Option<RawMessage>,
}

/// Copy of `raw` cut at a char boundary to fit [`MESSAGE_LEN`]
pub fn truncated_message(raw: &str) -> RawMessage {
    let mut end = raw.len().min(MESSAGE_LEN);
    while !raw.is_char_boundary(end) {
        end -= 1;
    }
    let mut message = RawMessage::new();
    // Fits by construction
    let _ = message.push_str(&raw[..end]);
    message
}

/// Weather fields as fetched from the store in one read
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WeatherSnapshot {
    pub weather_id: Option<Value>,
    pub high: Option<Value>,
    pub low: Option<Value>,
}

impl WeatherSnapshot {
    /// Whether any message has been stored yet
    pub fn is_synced(&self) -> bool {
        self.weather_id.is_some()
    }

    /// Numeric condition code, `None` if nothing was stored yet
    pub fn condition_code(&self) -> Result<Option<i32>, super::WeatherError> {
        self.weather_id
            .as_deref()
            .map(|id| {
                id.trim()
                    .parse::<i32>()
                    .map_err(|_| super::WeatherError::InvalidConditionCode)
            })
            .transpose()
    }
}

/// Shared preferences store
pub struct Preferences {
    entries: Mutex<CriticalSectionRawMutex, RefCell<Entries>>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self::new()
    }
}

impl Preferences {
    /// Create an empty store
    pub const fn new() -> Self {
        Self {
            entries: Mutex::new(RefCell::new(Entries {
                values: [None, None, None],
                raw_message: None,
            })),
        }
    }

    /// Read a single weather field
    pub fn get(&self, key: PrefKey) -> Option<Value> {
        self.entries
            .lock(|entries| entries.borrow().values[key.index()].clone())
    }

    /// Payload of the last stored message
    pub fn raw_message(&self) -> Option<RawMessage> {
        self.entries
            .lock(|entries| entries.borrow().raw_message.clone())
    }

    /// Read all weather fields at once
    pub fn weather(&self) -> WeatherSnapshot {
        self.entries.lock(|entries| {
            let entries = entries.borrow();
            let values = &entries.values;
            WeatherSnapshot {
                weather_id: values[PrefKey::WeatherId.index()].clone(),
                high: values[PrefKey::High.index()].clone(),
                low: values[PrefKey::Low.index()].clone(),
            }
        })
    }

    /// Start a batch of writes
    pub fn edit(&self) -> Editor<'_> {
        Editor {
            store: self,
            staged: Vec::new(),
            raw_message: None,
        }
    }
}

/// Staged writes, applied by [`Editor::commit`]
pub struct Editor<'a> {
    store: &'a Preferences,
    staged: Vec<(PrefKey, Value), { PrefKey::COUNT }>,
    raw_message: Option<RawMessage>,
}

impl Editor<'_> {
    /// Stage a value. Staging a key twice keeps the last value.
    pub fn put(mut self, key: PrefKey, value: &str) -> Result<Self, StoreError> {
        let value = Value::try_from(value).map_err(|_| StoreError::ValueTooLong { key: key.as_str() })?;
        match self.staged.iter_mut().find(|(staged, _)| *staged == key) {
            Some(slot) => slot.1 = value,
            // The staging buffer holds one slot per key, so this cannot overflow
            None => {
                let _ = self.staged.push((key, value));
            }
        }
        Ok(self)
    }

    /// Stage the payload mirror, truncated to [`MESSAGE_LEN`]
    pub fn put_raw_message(mut self, raw: &str) -> Self {
        self.raw_message = Some(truncated_message(raw));
        self
    }

    /// Apply every staged value in one critical section
    pub fn commit(self) {
        let count = self.staged.len() + usize::from(self.raw_message.is_some());
        self.store.entries.lock(|entries| {
            let mut entries = entries.borrow_mut();
            for (key, value) in self.staged {
                entries.values[key.index()] = Some(value);
            }
            if let Some(raw) = self.raw_message {
                entries.raw_message = Some(raw);
            }
        });
        debug!("Committed {} preference values", count);
    }
}
