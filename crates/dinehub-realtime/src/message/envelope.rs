//! Frame format carried over the WebSocket.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use dinehub_core::AppResult;

/// One text frame: an event name and its payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Event name, e.g. `join` or `new_notification`.
    pub event: String,
    /// Event payload.
    #[serde(default)]
    pub data: Value,
}

impl Envelope {
    /// Create an envelope.
    pub fn new(event: impl Into<String>, data: Value) -> Self {
        Self {
            event: event.into(),
            data,
        }
    }

    /// Encode as a JSON text frame.
    pub fn to_text(&self) -> AppResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode a JSON text frame.
    pub fn from_text(text: &str) -> AppResult<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_frame_layout() {
        let text = Envelope::new("join", json!(7)).to_text().unwrap();
        assert_eq!(text, r#"{"event":"join","data":7}"#);
    }

    #[test]
    fn test_missing_data_is_null() {
        let envelope = Envelope::from_text(r#"{"event":"ping"}"#).unwrap();
        assert_eq!(envelope.data, Value::Null);
        assert!(Envelope::from_text("not json").is_err());
    }
}
