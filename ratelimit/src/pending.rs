//! Markers for send packets whose amount has been debited but whose outcome
//! (acknowledgement or timeout) is not yet known.

use cosmwasm_std::{Order, StdResult, Storage};
use cw_storage_plus::Bound;

use crate::state::PENDING_SEND_PACKETS;

pub fn set_pending_send_packet(
    storage: &mut dyn Storage,
    channel_id: &str,
    sequence: u64,
) -> StdResult<()> {
    PENDING_SEND_PACKETS.save(storage, (channel_id, sequence), &true)
}

pub fn has_pending_send_packet(storage: &dyn Storage, channel_id: &str, sequence: u64) -> bool {
    PENDING_SEND_PACKETS.has(storage, (channel_id, sequence))
}

/// Removing an absent marker is a no-op.
pub fn remove_pending_send_packet(storage: &mut dyn Storage, channel_id: &str, sequence: u64) {
    PENDING_SEND_PACKETS.remove(storage, (channel_id, sequence));
}

/// Pending packets ordered by channel, then sequence.
pub fn all_pending_send_packets(
    storage: &dyn Storage,
    start_after: Option<(&str, u64)>,
    limit: Option<usize>,
) -> StdResult<Vec<(String, u64)>> {
    let start = start_after.map(Bound::exclusive);
    let keys = PENDING_SEND_PACKETS.keys(storage, start, None, Order::Ascending);
    match limit {
        Some(limit) => keys.take(limit).collect(),
        None => keys.collect(),
    }
}
