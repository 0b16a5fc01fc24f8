//! ICS-04 acknowledgements as used by ICS-20 transfers
//!
//! On the wire an acknowledgement is a JSON object with exactly one of
//! `result` (base64 bytes) or `error` (string) set.

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{to_json_binary, Binary, StdResult};
use serde::Deserialize;

/// Result byte written by ICS-20 on a successful receive.
pub const SUCCESS_RESULT: &[u8] = &[1];

/// A decoded acknowledgement.
#[cw_serde]
pub enum Acknowledgement {
    Result(Binary),
    Error(String),
}

impl Acknowledgement {
    /// The acknowledgement ICS-20 writes for a successful receive.
    pub fn success() -> Self {
        Acknowledgement::Result(Binary::from(SUCCESS_RESULT))
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Acknowledgement::Error(msg.into())
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Acknowledgement::Result(_))
    }

    pub fn to_binary(&self) -> StdResult<Binary> {
        to_json_binary(self)
    }
}

/// The raw JSON shape of an acknowledgement, before deciding which variant
/// (if any) it holds. Unknown fields are rejected.
#[derive(Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct AcknowledgementEnvelope {
    #[serde(default)]
    pub result: Option<Binary>,
    #[serde(default)]
    pub error: Option<String>,
}

impl AcknowledgementEnvelope {
    /// Returns the acknowledgement if exactly one field is set.
    pub fn into_acknowledgement(self) -> Option<Acknowledgement> {
        match (self.result, self.error) {
            (Some(result), None) => Some(Acknowledgement::Result(result)),
            (None, Some(error)) => Some(Acknowledgement::Error(error)),
            _ => None,
        }
    }
}
