// ABOUTME: Partial SSEM grammar (SignalStatusMessage, ETSI TS 103 301) down to each SignalStatusPackage
// ABOUTME: Message, status and package level regional extensions go through the regional resolver

use super::dsrc::{
    basic_vehicle_role, intersection_access_point, intersection_reference_id,
    prioritization_response_status, requestor_type, vehicle_id,
};
use super::{extension_additions, integer};
use crate::codec::{DecodeError, PerReader};
use crate::context::DispatchContext;
use crate::datatypes::RegExtKind;
use crate::regional::decode_regional_list;
use crate::tree::FieldNode;

/// `SignalStatusMessage` body following the ItsPduHeader
pub fn dissect(
    data: &[u8],
    ctx: &mut DispatchContext<'_>,
    tree: &mut FieldNode,
) -> Result<usize, DecodeError> {
    let mut r = PerReader::new(data);
    let node = tree.push(FieldNode::new("SignalStatusMessage"));
    let extended = r.read_extension_bit()?;
    let presence = r.read_presence(3)?;

    if presence.is_present(0) {
        integer(&mut r, node, "timeStamp", 0, 527_040)?;
    }
    integer(&mut r, node, "second", 0, 65535)?;
    if presence.is_present(1) {
        integer(&mut r, node, "sequenceNumber", 0, 127)?;
    }

    let status = node.push(FieldNode::new("status"));
    for _ in 0..r.read_size(1, 32)? {
        signal_status(&mut r, ctx, status)?;
    }

    if presence.is_present(2) {
        decode_regional_list(RegExtKind::SignalStatusMessage, &mut r, ctx, node)?;
    }
    extension_additions(&mut r, node, extended)?;
    Ok(r.consumed_octets())
}

fn signal_status(
    r: &mut PerReader<'_>,
    ctx: &mut DispatchContext<'_>,
    tree: &mut FieldNode,
) -> Result<(), DecodeError> {
    let node = tree.push(FieldNode::new("SignalStatus"));
    let extended = r.read_extension_bit()?;
    let presence = r.read_presence(1)?;

    integer(r, node, "sequenceNumber", 0, 127)?;
    intersection_reference_id(r, node, "id")?;

    let packages = node.push(FieldNode::new("sigStatus"));
    for _ in 0..r.read_size(1, 32)? {
        signal_status_package(r, ctx, packages)?;
    }

    if presence.is_present(0) {
        decode_regional_list(RegExtKind::SignalStatus, r, ctx, node)?;
    }
    extension_additions(r, node, extended)
}

fn signal_status_package(
    r: &mut PerReader<'_>,
    ctx: &mut DispatchContext<'_>,
    tree: &mut FieldNode,
) -> Result<(), DecodeError> {
    let node = tree.push(FieldNode::new("SignalStatusPackage"));
    let extended = r.read_extension_bit()?;
    let presence = r.read_presence(6)?;

    if presence.is_present(0) {
        signal_requester_info(r, ctx, node)?;
    }
    intersection_access_point(r, node, "inboundOn")?;
    if presence.is_present(1) {
        intersection_access_point(r, node, "outboundOn")?;
    }
    if presence.is_present(2) {
        integer(r, node, "minute", 0, 527_040)?;
    }
    if presence.is_present(3) {
        integer(r, node, "second", 0, 65535)?;
    }
    if presence.is_present(4) {
        integer(r, node, "duration", 0, 65535)?;
    }
    prioritization_response_status(r, node, "status")?;
    if presence.is_present(5) {
        decode_regional_list(RegExtKind::SignalStatusPackage, r, ctx, node)?;
    }
    extension_additions(r, node, extended)
}

fn signal_requester_info(
    r: &mut PerReader<'_>,
    ctx: &mut DispatchContext<'_>,
    tree: &mut FieldNode,
) -> Result<(), DecodeError> {
    let node = tree.push(FieldNode::new("requester"));
    let extended = r.read_extension_bit()?;
    let presence = r.read_presence(2)?;

    vehicle_id(r, node, "id")?;
    integer(r, node, "request", 0, 255)?;
    integer(r, node, "sequenceNumber", 0, 127)?;
    if presence.is_present(0) {
        basic_vehicle_role(r, node, "role")?;
    }
    if presence.is_present(1) {
        requestor_type(r, ctx, node, "typeData")?;
    }
    extension_additions(r, node, extended)
}

/// Encoders for SSEM fixtures
#[cfg(test)]
pub(crate) mod fixtures {
    use crate::codec::PerWriter;

    /// SSEM body with one status holding one package whose only regional
    /// extension is `(region, payload)`
    pub fn single_package(region: u8, payload: &[u8]) -> Vec<u8> {
        let mut w = PerWriter::new();
        // SignalStatusMessage: no timeStamp, no sequenceNumber, no regional
        w.write_bool(false).write_bits(0b000, 3);
        w.write_bits(30_000, 16);
        w.write_constrained(1, 1, 32);
        // SignalStatus
        w.write_bool(false).write_bool(false);
        w.write_bits(4, 7);
        w.write_bool(false).write_bits(0x1234, 16);
        w.write_constrained(1, 1, 32);
        // SignalStatusPackage: regional only
        w.write_bool(false).write_bits(0b00_0001, 6);
        w.write_enumerated(0, 3, true).write_bits(2, 8); // inboundOn lane 2
        w.write_enumerated(4, 8, true); // granted
        w.write_constrained(1, 1, 4);
        w.write_bits(u64::from(region), 8).write_open_type(payload);
        w.into_bytes().to_vec()
    }
}
