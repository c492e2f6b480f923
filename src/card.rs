//! Card entity for trackify.
//!
//! A card is one tracked task: a description, an urgency level, and an
//! accumulated elapsed-time counter. Cards are serialized with the remote
//! store's wire field names (`isRunning`), and unknown store-internal fields
//! in remote documents are ignored on deserialization.

use std::fmt;
use std::str::FromStr;

use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Urgency level of a card, mutable until the card is stopped
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Urgency {
    /// Background work, no deadline pressure
    Low,
    /// Regular work
    #[default]
    Normal,
    /// Needs attention first
    High,
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Urgency::Low => write!(f, "Low"),
            Urgency::Normal => write!(f, "Normal"),
            Urgency::High => write!(f, "High"),
        }
    }
}

impl FromStr for Urgency {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Urgency::Low),
            "normal" => Ok(Urgency::Normal),
            "high" => Ok(Urgency::High),
            _ => Err(Error::InvalidArgument(format!(
                "Invalid urgency '{}'. Expected: low, normal, high",
                s
            ))),
        }
    }
}

impl Urgency {
    /// The next level in the Low -> Normal -> High -> Low cycle
    pub fn cycled(self) -> Self {
        match self {
            Urgency::Low => Urgency::Normal,
            Urgency::Normal => Urgency::High,
            Urgency::High => Urgency::Low,
        }
    }
}

/// Lifecycle state of a card, derived from its flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardState {
    /// Timer disarmed, card still editable
    Idle,
    /// Timer armed; at most one card per session is in this state
    Running,
    /// Terminal; read-only except for deletion
    Stopped,
}

/// One tracked task, the unit of the client-side cache and of the wire format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    /// Client-assigned id (creation time in milliseconds), the correlation
    /// key between cache and remote store
    pub id: u64,
    pub description: String,
    /// Display date string, set at creation
    pub created: String,
    /// Accumulated elapsed seconds, written on pause/stop/unload
    #[serde(default)]
    pub time: u64,
    #[serde(rename = "isRunning", default)]
    pub is_running: bool,
    #[serde(default)]
    pub stopped: bool,
    /// Older remote documents predate the field; default to Normal
    #[serde(default)]
    pub urgency: Urgency,
}

impl Card {
    /// Build a fresh idle card. The id is the current time in milliseconds,
    /// matching what the remote store expects as its lookup key.
    pub fn new(description: impl Into<String>) -> Self {
        let now = Local::now();
        Self {
            id: now.timestamp_millis() as u64,
            description: description.into(),
            created: now.format("%Y-%m-%d").to_string(),
            time: 0,
            is_running: false,
            stopped: false,
            urgency: Urgency::default(),
        }
    }

    pub fn state(&self) -> CardState {
        if self.stopped {
            CardState::Stopped
        } else if self.is_running {
            CardState::Running
        } else {
            CardState::Idle
        }
    }
}

/// Format accumulated seconds for display: `MM:SS`, or `HH:MM:SS` once the
/// elapsed time reaches an hour.
pub fn format_elapsed(total_seconds: u64) -> String {
    let seconds = total_seconds % 60;
    let minutes = (total_seconds / 60) % 60;
    let hours = total_seconds / 3600;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urgency_parses_case_insensitively() {
        assert_eq!("low".parse::<Urgency>().expect("parse"), Urgency::Low);
        assert_eq!("High".parse::<Urgency>().expect("parse"), Urgency::High);
        assert_eq!("NORMAL".parse::<Urgency>().expect("parse"), Urgency::Normal);

        let err = "urgent".parse::<Urgency>().expect_err("invalid");
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn urgency_round_trips_display() {
        for urgency in [Urgency::Low, Urgency::Normal, Urgency::High] {
            let parsed: Urgency = urgency.to_string().parse().expect("round trip");
            assert_eq!(parsed, urgency);
        }
    }

    #[test]
    fn urgency_cycle_wraps() {
        assert_eq!(Urgency::Low.cycled(), Urgency::Normal);
        assert_eq!(Urgency::Normal.cycled(), Urgency::High);
        assert_eq!(Urgency::High.cycled(), Urgency::Low);
    }

    #[test]
    fn new_card_is_idle() {
        let card = Card::new("Write report");
        assert_eq!(card.description, "Write report");
        assert_eq!(card.time, 0);
        assert_eq!(card.state(), CardState::Idle);
        assert_eq!(card.urgency, Urgency::Normal);
        assert!(card.id > 0);
    }

    #[test]
    fn state_derivation_prefers_stopped() {
        let mut card = Card::new("task");
        card.is_running = true;
        assert_eq!(card.state(), CardState::Running);

        card.stopped = true;
        assert_eq!(card.state(), CardState::Stopped);
    }

    #[test]
    fn wire_format_uses_remote_field_names() {
        let mut card = Card::new("task");
        card.is_running = true;
        let json = serde_json::to_value(&card).expect("serialize");
        assert_eq!(json["isRunning"], serde_json::json!(true));
        assert_eq!(json["urgency"], serde_json::json!("Normal"));
    }

    #[test]
    fn deserialization_ignores_store_internal_fields() {
        let raw = r#"{
            "_id": "66f1c0ffee",
            "__v": 0,
            "id": 1717171717171,
            "description": "imported",
            "created": "2024-06-01",
            "time": 42,
            "isRunning": false,
            "stopped": false
        }"#;
        let card: Card = serde_json::from_str(raw).expect("deserialize");
        assert_eq!(card.id, 1_717_171_717_171);
        assert_eq!(card.time, 42);
        assert_eq!(card.urgency, Urgency::Normal);
    }

    #[test]
    fn elapsed_formats_minutes_and_hours() {
        assert_eq!(format_elapsed(0), "00:00");
        assert_eq!(format_elapsed(65), "01:05");
        assert_eq!(format_elapsed(599), "09:59");
        assert_eq!(format_elapsed(3600), "01:00:00");
        assert_eq!(format_elapsed(3665), "01:01:05");
    }
}
