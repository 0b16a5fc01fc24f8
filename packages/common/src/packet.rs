//! ICS-20 fungible token packet payload

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// JSON payload of an ICS-20 transfer packet.
///
/// The amount stays a string here: it is parsed into an arbitrary-precision
/// integer by whoever consumes the packet, so a malformed amount can be
/// reported with its own error.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, JsonSchema)]
pub struct FungibleTokenPacketData {
    /// Denom as seen by the sending chain (may carry a trace prefix)
    pub denom: String,
    /// Amount as a decimal string
    pub amount: String,
    /// Sender address on the sending chain
    pub sender: String,
    /// Receiver address on the receiving chain
    pub receiver: String,
    /// Optional memo
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub memo: String,
}

impl FungibleTokenPacketData {
    pub fn new(
        denom: impl Into<String>,
        amount: impl Into<String>,
        sender: impl Into<String>,
        receiver: impl Into<String>,
    ) -> Self {
        Self {
            denom: denom.into(),
            amount: amount.into(),
            sender: sender.into(),
            receiver: receiver.into(),
            memo: String::new(),
        }
    }
}
