//! Extraction of channel, local denom and amount from ICS-20 packets.

use common::{denom_prefix, receiver_chain_is_source, BigAmount, DenomTrace, FungibleTokenPacketData};
use cosmwasm_std::{from_json, IbcPacket};

use crate::error::ContractError;

/// Which side of the packet this chain is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketDirection {
    /// Outbound: this chain is the packet source
    Send,
    /// Inbound: this chain is the packet destination
    Recv,
}

/// What a transfer packet means to the local chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IbcTransferPacketInfo {
    /// The local channel end
    pub channel_id: String,
    /// Denom as held on this chain (`ibc/...` for vouchers)
    pub denom: String,
    pub amount: BigAmount,
}

pub fn parse_packet_info(
    packet: &IbcPacket,
    direction: PacketDirection,
) -> Result<IbcTransferPacketInfo, ContractError> {
    let channel_id = match direction {
        PacketDirection::Send => &packet.src.channel_id,
        PacketDirection::Recv => &packet.dest.channel_id,
    };
    let data = decode_packet_data(channel_id, packet.sequence, packet.data.as_slice())?;
    let denom = match direction {
        PacketDirection::Send => local_denom_from_send(&data),
        PacketDirection::Recv => local_denom_from_recv(packet, &data),
    };
    let amount = parse_amount(channel_id, packet.sequence, &data)?;

    Ok(IbcTransferPacketInfo {
        channel_id: channel_id.clone(),
        denom,
        amount,
    })
}

/// Parse outbound packet data before the full packet exists (the channel
/// keeper only hands back the sequence).
pub fn parse_send_packet_data(
    source_channel: &str,
    sequence: u64,
    data: &[u8],
) -> Result<IbcTransferPacketInfo, ContractError> {
    let data = decode_packet_data(source_channel, sequence, data)?;
    Ok(IbcTransferPacketInfo {
        channel_id: source_channel.to_string(),
        denom: local_denom_from_send(&data),
        amount: parse_amount(source_channel, sequence, &data)?,
    })
}

fn decode_packet_data(
    channel_id: &str,
    sequence: u64,
    data: &[u8],
) -> Result<FungibleTokenPacketData, ContractError> {
    from_json(data).map_err(|source| ContractError::InvalidPacketData {
        channel_id: channel_id.to_string(),
        sequence,
        source,
    })
}

fn parse_amount(
    channel_id: &str,
    sequence: u64,
    data: &FungibleTokenPacketData,
) -> Result<BigAmount, ContractError> {
    BigAmount::parse_prefixed(&data.amount).map_err(|_| ContractError::InvalidPacketAmount {
        channel_id: channel_id.to_string(),
        sequence,
        amount: data.amount.clone(),
    })
}

/// The sender holds the denom exactly as named in the packet, hashed if it
/// carries a trace.
fn local_denom_from_send(data: &FungibleTokenPacketData) -> String {
    DenomTrace::parse(&data.denom).ibc_denom()
}

fn local_denom_from_recv(packet: &IbcPacket, data: &FungibleTokenPacketData) -> String {
    let source_port = &packet.src.port_id;
    let source_channel = &packet.src.channel_id;

    if receiver_chain_is_source(source_port, source_channel, &data.denom) {
        // Token returning home: drop the hop the counterparty added
        let unprefixed = &data.denom[denom_prefix(source_port, source_channel).len()..];
        return DenomTrace::parse(unprefixed).ibc_denom();
    }

    // Token arriving as a voucher: add our hop
    let prefixed = format!(
        "{}{}",
        denom_prefix(&packet.dest.port_id, &packet.dest.channel_id),
        data.denom
    );
    DenomTrace::parse(&prefixed).ibc_denom()
}
