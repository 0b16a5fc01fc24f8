//! Interpretation of acknowledgements for outbound transfers.

use common::{Acknowledgement, AcknowledgementEnvelope};
use cosmwasm_std::from_json;

use crate::error::ContractError;

/// Outcome of an outbound packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AckResponseStatus {
    Success,
    Failure,
    Timeout,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcknowledgementResponse {
    pub status: AckResponseStatus,
    /// Counterparty error message, set for `Failure`
    pub error: Option<String>,
}

impl AcknowledgementResponse {
    pub fn timeout() -> Self {
        Self {
            status: AckResponseStatus::Timeout,
            error: None,
        }
    }

    /// Whether the debited amount has to be credited back.
    pub fn needs_refund(&self) -> bool {
        self.status != AckResponseStatus::Success
    }
}

/// Decode raw acknowledgement bytes. Anything that is not exactly one of
/// `{"result": <non-empty>}` or `{"error": <msg>}` is rejected.
pub fn unpack_acknowledgement_response(
    acknowledgement: &[u8],
) -> Result<AcknowledgementResponse, ContractError> {
    let envelope: AcknowledgementEnvelope = from_json(acknowledgement)
        .map_err(|source| ContractError::UnmarshalAcknowledgement { source })?;

    match envelope.into_acknowledgement() {
        Some(Acknowledgement::Result(result)) => {
            if result.is_empty() {
                return Err(ContractError::InvalidAcknowledgement {
                    reason: "acknowledgement result cannot be empty".to_string(),
                });
            }
            Ok(AcknowledgementResponse {
                status: AckResponseStatus::Success,
                error: None,
            })
        }
        Some(Acknowledgement::Error(error)) => Ok(AcknowledgementResponse {
            status: AckResponseStatus::Failure,
            error: Some(error),
        }),
        None => Err(ContractError::InvalidAcknowledgement {
            reason: "unsupported acknowledgement response field".to_string(),
        }),
    }
}
