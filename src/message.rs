//! Activity wire messages
//!
//! Every event is serialized once into a [`Frame`]. Frames wrap axum's
//! `Utf8Bytes`, which is reference counted, so queuing the same frame to many
//! viewers clones a pointer rather than the payload.

use axum::extract::ws::Utf8Bytes;
use serde::Serialize;

use crate::error::Result;

/// Message sent to viewers, one JSON object per text frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum ActivityMessage<'a> {
    /// Catch-up message for a viewer that joins while state exists
    #[serde(rename = "a2ui.state")]
    State {
        jsonl: &'a str,
        #[serde(rename = "updatedAt")]
        updated_at: i64,
    },

    /// Live publish
    #[serde(rename = "a2ui.push")]
    Push {
        jsonl: &'a str,
        #[serde(rename = "updatedAt")]
        updated_at: i64,
    },

    /// Live reset, or catch-up after a reset
    #[serde(rename = "a2ui.reset")]
    Reset {
        #[serde(rename = "updatedAt")]
        updated_at: i64,
    },
}

impl ActivityMessage<'_> {
    /// Wire name of this message kind
    pub fn kind(&self) -> &'static str {
        match self {
            ActivityMessage::State { .. } => "a2ui.state",
            ActivityMessage::Push { .. } => "a2ui.push",
            ActivityMessage::Reset { .. } => "a2ui.reset",
        }
    }

    /// Timestamp carried by the message
    pub fn updated_at(&self) -> i64 {
        match self {
            ActivityMessage::State { updated_at, .. }
            | ActivityMessage::Push { updated_at, .. }
            | ActivityMessage::Reset { updated_at } => *updated_at,
        }
    }

    /// Serialize into a shareable text frame
    pub fn encode(&self) -> Result<Frame> {
        let text = serde_json::to_string(self)?;
        Ok(Frame(Utf8Bytes::from(text)))
    }
}

/// An encoded, cheaply clonable text frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame(Utf8Bytes);

impl Frame {
    /// Frame contents as JSON text
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Unwrap into the WebSocket text payload
    pub fn into_text(self) -> Utf8Bytes {
        self.0
    }
}

impl std::fmt::Display for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_shape() {
        let frame = ActivityMessage::State {
            jsonl: "{\"a\":1}",
            updated_at: 1_700_000_000_000,
        }
        .encode()
        .unwrap();

        assert_eq!(
            frame.as_str(),
            r#"{"type":"a2ui.state","jsonl":"{\"a\":1}","updatedAt":1700000000000}"#
        );
    }

    #[test]
    fn test_push_shape() {
        let frame = ActivityMessage::Push {
            jsonl: "line1\nline2",
            updated_at: 42,
        }
        .encode()
        .unwrap();

        assert_eq!(
            frame.as_str(),
            r#"{"type":"a2ui.push","jsonl":"line1\nline2","updatedAt":42}"#
        );
    }

    #[test]
    fn test_reset_shape() {
        let frame = ActivityMessage::Reset { updated_at: 7 }.encode().unwrap();

        assert_eq!(frame.as_str(), r#"{"type":"a2ui.reset","updatedAt":7}"#);
    }

    #[test]
    fn test_kind_and_timestamp() {
        let msg = ActivityMessage::Push {
            jsonl: "",
            updated_at: 9,
        };
        assert_eq!(msg.kind(), "a2ui.push");
        assert_eq!(msg.updated_at(), 9);
        assert_eq!(ActivityMessage::Reset { updated_at: 3 }.kind(), "a2ui.reset");
    }

    #[test]
    fn test_frame_clone_shares_text() {
        let frame = ActivityMessage::Reset { updated_at: 1 }.encode().unwrap();
        let copy = frame.clone();
        assert_eq!(frame, copy);
        assert_eq!(copy.to_string(), frame.as_str());
    }
}
