//! ICS-20 denomination traces
//!
//! A voucher denom received over IBC is prefixed with one `{port}/{channel}`
//! pair per hop, e.g. `transfer/channel-2/transfer/channel-7/uatom`. On chain
//! the full trace is stored under `ibc/{SHA256(full path)}` (upper-case hex),
//! so every computation here must be byte-for-byte identical to ibc-go.

use cosmwasm_schema::cw_serde;
use sha2::{Digest, Sha256};

/// Prefix of hashed voucher denoms
pub const IBC_DENOM_PREFIX: &str = "ibc";

const CHANNEL_PREFIX: &str = "channel-";

/// Parsed denomination trace.
#[cw_serde]
pub struct DenomTrace {
    /// Sequence of `{port}/{channel}` hops, joined by `/` (empty for native assets)
    pub path: String,
    /// Denomination on the chain the asset originates from
    pub base_denom: String,
}

impl DenomTrace {
    /// Parse a (possibly prefixed) denom into path and base denom.
    ///
    /// Hops are consumed pairwise from the left for as long as the second
    /// element of the pair is a well-formed channel identifier and at least
    /// one segment remains for the base denom. Anything after that belongs to
    /// the base denom, which may itself contain slashes (`gamm/pool/1`).
    pub fn parse(raw_denom: &str) -> Self {
        let segments: Vec<&str> = raw_denom.split('/').collect();
        if segments.len() == 1 {
            return Self {
                path: String::new(),
                base_denom: raw_denom.to_string(),
            };
        }

        let length = segments.len();
        let mut path: Vec<&str> = Vec::new();
        let mut base_start = length;
        let mut i = 0;
        while i < length {
            if i < length - 1 && length > 2 && is_valid_channel_id(segments[i + 1]) {
                path.push(segments[i]);
                path.push(segments[i + 1]);
                i += 2;
            } else {
                base_start = i;
                break;
            }
        }

        Self {
            path: path.join("/"),
            base_denom: segments[base_start.min(length)..].join("/"),
        }
    }

    /// True when the asset has never left its origin chain.
    pub fn is_native(&self) -> bool {
        self.path.is_empty()
    }

    /// `{path}/{base_denom}`, or just the base denom for native assets.
    pub fn full_path(&self) -> String {
        if self.path.is_empty() {
            self.base_denom.clone()
        } else {
            format!("{}/{}", self.path, self.base_denom)
        }
    }

    /// SHA-256 of the full path.
    pub fn hash(&self) -> [u8; 32] {
        let digest = Sha256::digest(self.full_path().as_bytes());
        let mut output = [0u8; 32];
        output.copy_from_slice(&digest);
        output
    }

    /// The on-chain denom: the base denom for native assets, otherwise
    /// `ibc/{HASH}` with the hash in upper-case hex.
    pub fn ibc_denom(&self) -> String {
        if self.is_native() {
            return self.base_denom.clone();
        }
        format!("{}/{}", IBC_DENOM_PREFIX, hex::encode_upper(self.hash()))
    }
}

/// `{port}/{channel}/`, the prefix one hop adds to a denom.
pub fn denom_prefix(port_id: &str, channel_id: &str) -> String {
    format!("{}/{}/", port_id, channel_id)
}

/// Whether the receiving chain is the source of `denom`, i.e. the token is
/// travelling back along the hop identified by the sender's port and channel.
pub fn receiver_chain_is_source(source_port: &str, source_channel: &str, denom: &str) -> bool {
    denom.starts_with(&denom_prefix(source_port, source_channel))
}

/// `channel-{n}` where `n` is a u64.
pub fn is_valid_channel_id(id: &str) -> bool {
    match id.strip_prefix(CHANNEL_PREFIX) {
        Some(sequence) => {
            !sequence.is_empty()
                && sequence.len() <= 20
                && sequence.bytes().all(|b| b.is_ascii_digit())
                && sequence.parse::<u64>().is_ok()
        }
        None => false,
    }
}
