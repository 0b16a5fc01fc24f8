//! IBC Rate Limit - TVL-scaled limits on outbound ICS-20 transfers
//!
//! Every rate-limited denom has one or more limiters. Each limiter holds a
//! capacity that recovers (or decays) toward a baseline of
//! `max(baseline_minimum, tvl * baseline_tvl_ppm / 1e6)` over its period.
//!
//! # Outbound Flow
//! 1. `send_packet` debits the amount from every limiter of the denom, or
//!    fails if any limiter lacks capacity
//! 2. The packet is marked pending under `(channel_id, sequence)`
//! 3. A success acknowledgement clears the marker
//! 4. An error acknowledgement or a timeout credits the amount back, once
//!
//! # Inbound Flow
//! Received amounts are credited to the local denom's capacity before the
//! transfer application sees the packet.
//!
//! # Per Block
//! The `EndBlock` sudo message moves every capacity toward its baseline for
//! the time since the previous block.

pub mod ack;
pub mod baseline;
pub mod capacity;
pub mod contract;
pub mod decay;
pub mod error;
mod execute;
pub mod middleware;
pub mod msg;
pub mod packet;
pub mod pending;
mod query;
pub mod state;
pub mod tvl;

pub use crate::error::{ContractError, ErrorKind};
pub use crate::middleware::{undo_send_packet, IbcModule, Ics4Wrapper, RateLimitMiddleware};
pub use crate::tvl::{BankSupplyTvl, TvlProvider};
