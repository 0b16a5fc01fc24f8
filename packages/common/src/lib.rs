//! Common - Shared ICS-20 Types and Utilities
//!
//! This package provides the fungible-token transfer (ICS-20) types used by
//! the IBC rate limit contract: arbitrary-precision amounts, denom traces,
//! packet data and acknowledgements.

pub mod ack;
pub mod amount;
pub mod denom;
pub mod packet;

pub use ack::{Acknowledgement, AcknowledgementEnvelope};
pub use amount::BigAmount;
pub use denom::{denom_prefix, is_valid_channel_id, receiver_chain_is_source, DenomTrace};
pub use packet::FungibleTokenPacketData;
