//! Versioned envelope for state kept in durable local storage.
//!
//! Every stored namespace holds `{"state": <payload>, "version": <n>}`. Reading
//! never fails: anything that is not a well-formed envelope reads as `None` and the
//! caller falls back to its defaults.

use log::warn;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub state: T,
    pub version: u32,
}

/// Serialize `state` under `version`.
pub fn write_envelope<T: Serialize>(state: &T, version: u32) -> Result<String, serde_json::Error> {
    serde_json::to_string(&Envelope { state, version })
}

/// Split a stored envelope into its version and raw payload.
pub fn read_envelope(raw: &str) -> Option<Envelope<serde_json::Value>> {
    match serde_json::from_str::<Envelope<serde_json::Value>>(raw) {
        Ok(envelope) => Some(envelope),
        Err(err) => {
            warn!("ignoring unreadable stored state: {}", err);
            None
        }
    }
}
