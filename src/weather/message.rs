//! Inbound weather messages
//!
//! The phone relays each forecast as `"{conditionCode};{highTemp};{lowTemp}"`.
//! Fields are stored verbatim; the condition code is only parsed when drawn.

use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, channel::Channel};
use super::store::{PrefKey, Preferences, StoreError};
pub use super::store::RawMessage;
use crate::{debug, warn};

/// Field separator of the payload
const SEPARATOR: char = ';';

/// Number of payloads that can wait for delivery
pub const INBOX_DEPTH: usize = 4;

/// Local mailbox the messaging layer posts payloads into
pub type WeatherInbox = Channel<CriticalSectionRawMutex, RawMessage, INBOX_DEPTH>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MessageError {
    #[error("message has no `{0}` field")]
    MissingField(&'static str),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Fields of a weather payload, borrowed from the raw message
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WeatherMessage<'a> {
    pub weather_id: &'a str,
    pub high: &'a str,
    pub low: &'a str,
}

impl<'a> WeatherMessage<'a> {
    /// Split a payload into its fields. Anything after the third field is ignored.
    pub fn parse(raw: &'a str) -> Result<Self, MessageError> {
        let mut fields = raw.split(SEPARATOR);
        let mut next = |name: &'static str| fields.next().ok_or(MessageError::MissingField(name));

        Ok(Self {
            weather_id: next(PrefKey::WeatherId.as_str())?,
            high: next(PrefKey::High.as_str())?,
            low: next(PrefKey::Low.as_str())?,
        })
    }
}

/// Writes received weather payloads to the preferences store
pub struct MessageHandler<'a> {
    store: &'a Preferences,
}

impl<'a> MessageHandler<'a> {
    pub fn new(store: &'a Preferences) -> Self {
        Self { store }
    }

    /// Store a payload, all fields in one commit or nothing at all.
    ///
    /// Only the three fields are length checked; the payload mirror is
    /// truncated to fit.
    pub fn try_handle(&self, raw: &str) -> Result<(), MessageError> {
        let message = WeatherMessage::parse(raw)?;

        self.store
            .edit()
            .put(PrefKey::WeatherId, message.weather_id)?
            .put(PrefKey::High, message.high)?
            .put(PrefKey::Low, message.low)?
            .put_raw_message(raw)
            .commit();

        Ok(())
    }

    /// Store a payload, dropping it if it is malformed
    pub fn handle_message(&self, raw: &str) {
        debug!("Watch face received message: {}", raw);
        if let Err(err) = self.try_handle(raw) {
            warn!("Ignoring weather message: {}", err);
        }
    }

    /// Wait for the next payload in `inbox` and store it
    pub async fn next_message(&self, inbox: &WeatherInbox) {
        let raw = inbox.receive().await;
        self.handle_message(&raw);
    }

    /// Store payloads from `inbox` as they arrive
    pub async fn run(&self, inbox: &WeatherInbox) -> ! {
        loop {
            self.next_message(inbox).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weather::store::{MESSAGE_LEN, VALUE_LEN};

    fn raw(payload: &str) -> RawMessage {
        RawMessage::try_from(payload).unwrap()
    }

    #[test]
    fn stores_fields_verbatim() {
        let prefs = Preferences::new();
        MessageHandler::new(&prefs).handle_message("801;25;14");

        let snapshot = prefs.weather();
        assert_eq!(snapshot.weather_id.as_deref(), Some("801"));
        assert_eq!(snapshot.high.as_deref(), Some("25"));
        assert_eq!(snapshot.low.as_deref(), Some("14"));
        assert_eq!(prefs.raw_message().as_deref(), Some("801;25;14"));
    }

    #[test]
    fn payload_without_separators_is_ignored() {
        let prefs = Preferences::new();
        let handler = MessageHandler::new(&prefs);

        assert_eq!(
            handler.try_handle("badinput"),
            Err(MessageError::MissingField("high"))
        );
        handler.handle_message("badinput");

        assert_eq!(prefs.weather(), Default::default());
        assert_eq!(prefs.raw_message(), None);
    }

    #[test]
    fn malformed_payload_keeps_previous_snapshot() {
        let prefs = Preferences::new();
        let handler = MessageHandler::new(&prefs);
        handler.handle_message("500;12;3");
        handler.handle_message("800;30");

        let snapshot = prefs.weather();
        assert_eq!(snapshot.weather_id.as_deref(), Some("500"));
        assert_eq!(snapshot.high.as_deref(), Some("12"));
        assert_eq!(snapshot.low.as_deref(), Some("3"));
        assert_eq!(prefs.raw_message().as_deref(), Some("500;12;3"));
    }

    #[test]
    fn oversized_field_is_not_partially_applied() {
        let prefs = Preferences::new();
        let handler = MessageHandler::new(&prefs);
        handler.handle_message("800;30;20");

        let long_low = "1".repeat(VALUE_LEN + 1);
        let payload = std::format!("801;31;{long_low}");
        assert!(matches!(
            handler.try_handle(&payload),
            Err(MessageError::Store(StoreError::ValueTooLong { .. }))
        ));
        assert_eq!(prefs.weather().weather_id.as_deref(), Some("800"));
    }

    #[test]
    fn long_payload_with_short_fields_is_stored() {
        let prefs = Preferences::new();
        let handler = MessageHandler::new(&prefs);
        let payload = "800;1234567890123456789012345;1234567890123456789012345";
        assert!(payload.len() > VALUE_LEN);

        assert_eq!(handler.try_handle(payload), Ok(()));
        let snapshot = prefs.weather();
        assert_eq!(snapshot.weather_id.as_deref(), Some("800"));
        assert_eq!(snapshot.high.as_deref(), Some("1234567890123456789012345"));
        assert_eq!(snapshot.low.as_deref(), Some("1234567890123456789012345"));
        assert_eq!(prefs.raw_message().as_deref(), Some(payload));
    }

    #[test]
    fn long_trailing_fields_only_shorten_the_mirror() {
        let prefs = Preferences::new();
        let payload = std::format!("801;25;14;{}", "x".repeat(2 * MESSAGE_LEN));

        assert_eq!(MessageHandler::new(&prefs).try_handle(&payload), Ok(()));
        assert_eq!(prefs.weather().condition_code(), Ok(Some(801)));
        let mirror = prefs.raw_message().unwrap();
        assert_eq!(mirror.len(), MESSAGE_LEN);
        assert!(payload.starts_with(mirror.as_str()));
    }

    #[test]
    fn inbox_carries_payloads_longer_than_a_value() {
        let prefs = Preferences::new();
        let inbox = WeatherInbox::new();
        let payload = "804;123456789012345678901234;-123456789012345678901234";
        assert!(payload.len() > VALUE_LEN);

        inbox.try_send(raw(payload)).unwrap();
        embassy_futures::block_on(MessageHandler::new(&prefs).next_message(&inbox));
        assert_eq!(prefs.weather().condition_code(), Ok(Some(804)));
    }

    #[test]
    fn extra_fields_are_ignored() {
        assert_eq!(
            WeatherMessage::parse("600;-1;-7;extra"),
            Ok(WeatherMessage {
                weather_id: "600",
                high: "-1",
                low: "-7",
            })
        );
    }

    #[test]
    fn empty_fields_are_kept() {
        let message = WeatherMessage::parse("800;;").unwrap();
        assert_eq!(message.high, "");
        assert_eq!(message.low, "");
    }

    #[test]
    fn later_message_overwrites_earlier() {
        let prefs = Preferences::new();
        let handler = MessageHandler::new(&prefs);
        handler.handle_message("800;30;20");
        handler.handle_message("201;18;11");

        let snapshot = prefs.weather();
        assert_eq!(snapshot.condition_code(), Ok(Some(201)));
        assert_eq!(snapshot.high.as_deref(), Some("18"));
        assert_eq!(snapshot.low.as_deref(), Some("11"));
    }

    #[test]
    fn delivers_from_inbox() {
        let prefs = Preferences::new();
        let inbox = WeatherInbox::new();
        let handler = MessageHandler::new(&prefs);

        inbox.try_send(raw("300;9;4")).unwrap();
        embassy_futures::block_on(handler.next_message(&inbox));

        assert_eq!(prefs.weather().condition_code(), Ok(Some(300)));
        assert!(inbox.try_receive().is_err());
    }
}
