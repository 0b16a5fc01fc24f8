//! Rate limiting as IBC transfer middleware
//!
//! `RateLimitMiddleware` sits between the channel keeper (`Ics4Wrapper`) and
//! the transfer application (`IbcModule`). Channel handshakes pass straight
//! through. For packets it drives the per-packet state machine:
//!
//! ```text
//! NotSent --send_packet--> Debited --ack(success)-------> Resolved
//!                                  --ack(error)/timeout--> Resolved (credited back)
//! ```
//!
//! A debited packet is resolved at most once: a pending marker keyed by
//! `(channel_id, sequence)` guards the credit, so duplicate or out-of-order
//! acknowledgements and timeouts never credit twice.
//!
//! Errors returned from these methods are expected to abort the enclosing
//! transaction; the host discards every write made during the call.

use common::{Acknowledgement, BigAmount};
use cosmwasm_std::{
    Addr, Binary, Env, IbcBasicResponse, IbcChannelCloseMsg, IbcChannelConnectMsg,
    IbcChannelOpenMsg, IbcChannelOpenResponse, IbcPacket, IbcTimeout, StdResult, Storage,
};
use tracing::{debug, info, warn};

use crate::ack::{unpack_acknowledgement_response, AcknowledgementResponse};
use crate::capacity::{process_deposit, process_withdrawal};
use crate::error::ContractError;
use crate::packet::{parse_packet_info, parse_send_packet_data, IbcTransferPacketInfo, PacketDirection};
use crate::pending::{has_pending_send_packet, remove_pending_send_packet, set_pending_send_packet};

// ============================================================================
// Collaborators
// ============================================================================

/// The channel keeper side: commits outbound packets and acknowledgements.
pub trait Ics4Wrapper {
    /// Commit an outbound packet and return the sequence it was assigned.
    fn send_packet(
        &mut self,
        storage: &mut dyn Storage,
        source_port: &str,
        source_channel: &str,
        timeout: IbcTimeout,
        data: Binary,
    ) -> StdResult<u64>;

    fn write_acknowledgement(
        &mut self,
        storage: &mut dyn Storage,
        packet: &IbcPacket,
        acknowledgement: &Acknowledgement,
    ) -> StdResult<()>;

    fn get_app_version(&self, storage: &dyn Storage, port_id: &str, channel_id: &str) -> Option<String>;
}

/// The wrapped transfer application.
pub trait IbcModule {
    fn on_chan_open(
        &mut self,
        storage: &mut dyn Storage,
        env: &Env,
        msg: IbcChannelOpenMsg,
    ) -> StdResult<IbcChannelOpenResponse>;

    fn on_chan_connect(
        &mut self,
        storage: &mut dyn Storage,
        env: &Env,
        msg: IbcChannelConnectMsg,
    ) -> StdResult<IbcBasicResponse>;

    fn on_chan_close(
        &mut self,
        storage: &mut dyn Storage,
        env: &Env,
        msg: IbcChannelCloseMsg,
    ) -> StdResult<IbcBasicResponse>;

    fn on_recv_packet(
        &mut self,
        storage: &mut dyn Storage,
        env: &Env,
        packet: &IbcPacket,
        relayer: &Addr,
    ) -> Acknowledgement;

    fn on_acknowledgement_packet(
        &mut self,
        storage: &mut dyn Storage,
        env: &Env,
        packet: &IbcPacket,
        acknowledgement: &[u8],
        relayer: &Addr,
    ) -> StdResult<()>;

    fn on_timeout_packet(
        &mut self,
        storage: &mut dyn Storage,
        env: &Env,
        packet: &IbcPacket,
        relayer: &Addr,
    ) -> StdResult<()>;
}

// ============================================================================
// Middleware
// ============================================================================

pub struct RateLimitMiddleware<A, C> {
    app: A,
    ics4_wrapper: C,
}

impl<A: IbcModule, C: Ics4Wrapper> RateLimitMiddleware<A, C> {
    pub fn new(app: A, ics4_wrapper: C) -> Self {
        Self { app, ics4_wrapper }
    }

    pub fn app(&self) -> &A {
        &self.app
    }

    pub fn ics4_wrapper(&self) -> &C {
        &self.ics4_wrapper
    }

    // ------------------------------------------------------------------------
    // Passthrough
    // ------------------------------------------------------------------------

    pub fn on_chan_open(
        &mut self,
        storage: &mut dyn Storage,
        env: &Env,
        msg: IbcChannelOpenMsg,
    ) -> StdResult<IbcChannelOpenResponse> {
        self.app.on_chan_open(storage, env, msg)
    }

    pub fn on_chan_connect(
        &mut self,
        storage: &mut dyn Storage,
        env: &Env,
        msg: IbcChannelConnectMsg,
    ) -> StdResult<IbcBasicResponse> {
        self.app.on_chan_connect(storage, env, msg)
    }

    pub fn on_chan_close(
        &mut self,
        storage: &mut dyn Storage,
        env: &Env,
        msg: IbcChannelCloseMsg,
    ) -> StdResult<IbcBasicResponse> {
        self.app.on_chan_close(storage, env, msg)
    }

    pub fn write_acknowledgement(
        &mut self,
        storage: &mut dyn Storage,
        packet: &IbcPacket,
        acknowledgement: &Acknowledgement,
    ) -> StdResult<()> {
        self.ics4_wrapper
            .write_acknowledgement(storage, packet, acknowledgement)
    }

    pub fn get_app_version(
        &self,
        storage: &dyn Storage,
        port_id: &str,
        channel_id: &str,
    ) -> Option<String> {
        self.ics4_wrapper.get_app_version(storage, port_id, channel_id)
    }

    // ------------------------------------------------------------------------
    // Packet lifecycle
    // ------------------------------------------------------------------------

    /// Send through the channel keeper, then debit every limiter of the
    /// denom and mark the packet pending.
    pub fn send_packet(
        &mut self,
        storage: &mut dyn Storage,
        source_port: &str,
        source_channel: &str,
        timeout: IbcTimeout,
        data: Binary,
    ) -> Result<u64, ContractError> {
        let sequence =
            self.ics4_wrapper
                .send_packet(storage, source_port, source_channel, timeout, data.clone())?;

        let info = parse_send_packet_data(source_channel, sequence, data.as_slice())?;
        process_withdrawal(storage, &info.denom, &info.amount)?;
        set_pending_send_packet(storage, &info.channel_id, sequence)?;

        info!(
            denom = %info.denom,
            channel_id = %info.channel_id,
            sequence,
            amount = %info.amount,
            "send packet debited"
        );
        Ok(sequence)
    }

    /// Credit the received amount, then hand the packet to the app.
    ///
    /// A packet that cannot be parsed is answered with an error
    /// acknowledgement and never reaches the app.
    ///
    /// The credit is not reversed here when the app answers with an error
    /// acknowledgement. The host must discard every write made during the
    /// call in that case, the same as for a returned error.
    pub fn on_recv_packet(
        &mut self,
        storage: &mut dyn Storage,
        env: &Env,
        packet: &IbcPacket,
        relayer: &Addr,
    ) -> Acknowledgement {
        if let Err(err) = receive_rate_limited_packet(storage, packet) {
            warn!(
                channel_id = %packet.dest.channel_id,
                sequence = packet.sequence,
                error = %err,
                "rejecting received packet"
            );
            return Acknowledgement::error(err.to_string());
        }
        self.app.on_recv_packet(storage, env, packet, relayer)
    }

    pub fn on_acknowledgement_packet(
        &mut self,
        storage: &mut dyn Storage,
        env: &Env,
        packet: &IbcPacket,
        acknowledgement: &[u8],
        relayer: &Addr,
    ) -> Result<(), ContractError> {
        let info = parse_packet_info(packet, PacketDirection::Send)?;
        let response = unpack_acknowledgement_response(acknowledgement)?;
        resolve_send_packet(storage, packet.sequence, &info, &response)?;

        self.app
            .on_acknowledgement_packet(storage, env, packet, acknowledgement, relayer)?;
        Ok(())
    }

    pub fn on_timeout_packet(
        &mut self,
        storage: &mut dyn Storage,
        env: &Env,
        packet: &IbcPacket,
        relayer: &Addr,
    ) -> Result<(), ContractError> {
        let info = parse_packet_info(packet, PacketDirection::Send)?;
        resolve_send_packet(
            storage,
            packet.sequence,
            &info,
            &AcknowledgementResponse::timeout(),
        )?;

        self.app.on_timeout_packet(storage, env, packet, relayer)?;
        Ok(())
    }
}

fn receive_rate_limited_packet(
    storage: &mut dyn Storage,
    packet: &IbcPacket,
) -> Result<(), ContractError> {
    let info = parse_packet_info(packet, PacketDirection::Recv)?;
    process_deposit(storage, &info.denom, &info.amount)?;
    debug!(
        denom = %info.denom,
        channel_id = %info.channel_id,
        sequence = packet.sequence,
        amount = %info.amount,
        "receive packet credited"
    );
    Ok(())
}

fn resolve_send_packet(
    storage: &mut dyn Storage,
    sequence: u64,
    info: &IbcTransferPacketInfo,
    response: &AcknowledgementResponse,
) -> StdResult<()> {
    if response.needs_refund() {
        let undone = undo_send_packet(storage, &info.channel_id, sequence, &info.denom, &info.amount)?;
        info!(
            denom = %info.denom,
            channel_id = %info.channel_id,
            sequence,
            status = ?response.status,
            error = response.error.as_deref().unwrap_or(""),
            undone,
            "send packet failed"
        );
    } else {
        remove_pending_send_packet(storage, &info.channel_id, sequence);
        debug!(
            denom = %info.denom,
            channel_id = %info.channel_id,
            sequence,
            "send packet acknowledged"
        );
    }
    Ok(())
}

/// Credit back a debited send packet and clear its marker.
///
/// Does nothing unless the packet is pending; returns whether it was.
pub fn undo_send_packet(
    storage: &mut dyn Storage,
    channel_id: &str,
    sequence: u64,
    denom: &str,
    amount: &BigAmount,
) -> StdResult<bool> {
    if !has_pending_send_packet(storage, channel_id, sequence) {
        return Ok(false);
    }
    process_deposit(storage, denom, amount)?;
    remove_pending_send_packet(storage, channel_id, sequence);
    Ok(true)
}
