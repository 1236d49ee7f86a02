//! Network layer: a 3-byte `(len, dest, src)` header over the data-link layer, with hop-by-hop
//! forwarding driven by a per-node next-hop table.
//!
//! A receive may perform zero or more transmits before it returns: any packet whose destination
//! differs from this node is immediately re-sent toward the next hop and the receive loop
//! continues, with no recursion.

use crate::{
    addr::NetAddr,
    dll::{dll_rx, dll_tx},
    topology::Topology,
    transceiver::Transceiver,
    Error, RecvError, MAX_PACKET_LEN, PACKET_HEADER_LEN,
};

/// Builds and sends a network packet addressed to `dest`, claiming `src` as its origin.
///
/// The data-link address to send to is resolved as `resolve_dl_addr(next_hop(dest))`; if either
/// lookup fails, this returns `Error::InvalidValue` without touching the radio (policy (a) from
/// the design notes: an unreachable destination is a graceful transmit failure, not a panic).
pub fn net_tx<T: Transceiver, P: Topology>(
    trx: &mut T,
    topo: &P,
    dest: NetAddr,
    src: NetAddr,
    payload: &[u8],
) -> Result<(), Error> {
    if payload.len() + PACKET_HEADER_LEN > MAX_PACKET_LEN {
        return Err(Error::Eof);
    }

    let hop = topo.next_hop(dest).ok_or(Error::InvalidValue)?;
    let dl_addr = topo.resolve_dl_addr(hop).ok_or(Error::InvalidValue)?;

    let mut buf = [0u8; MAX_PACKET_LEN];
    buf[0] = (payload.len() + PACKET_HEADER_LEN) as u8;
    buf[1] = dest.0;
    buf[2] = src.0;
    buf[PACKET_HEADER_LEN..PACKET_HEADER_LEN + payload.len()].copy_from_slice(payload);

    debug!("net_tx: {:?} -> {:?} via {:?}", src, dest, hop);
    dll_tx(trx, dl_addr, &buf[..payload.len() + PACKET_HEADER_LEN])
}

/// Blocks until a packet addressed to this node arrives, forwarding anything else along the way.
///
/// Each loop iteration waits up to `timeout_ms` for the next frame; a timeout on a given
/// iteration is surfaced to the caller as `RecvError::Timeout` immediately (this stack does not
/// track a cumulative deadline across forwarded packets). A malformed frame, or a forwarding
/// failure for a packet not addressed to us, is logged and does not interrupt the loop.
pub fn net_rx<T: Transceiver, P: Topology>(
    trx: &mut T,
    topo: &P,
    timeout_ms: u16,
    buf: &mut [u8],
) -> Result<usize, RecvError> {
    loop {
        let mut frame = [0u8; MAX_PACKET_LEN];
        let n = dll_rx(trx, timeout_ms, &mut frame)?;
        if n < PACKET_HEADER_LEN {
            warn!("net_rx: short frame ({} bytes), dropping", n);
            continue;
        }

        let total_len = frame[0] as usize;
        let dest = NetAddr(frame[1]);
        let src = NetAddr(frame[2]);
        if total_len > n || total_len < PACKET_HEADER_LEN {
            warn!("net_rx: invalid length byte {}, dropping", total_len);
            continue;
        }
        let payload = &frame[PACKET_HEADER_LEN..total_len];

        if dest == topo.my_network_addr() {
            let copy_len = core::cmp::min(buf.len(), payload.len());
            buf[..copy_len].copy_from_slice(&payload[..copy_len]);
            debug!("net_rx: delivering {} bytes from {:?}", copy_len, src);
            return Ok(copy_len);
        }

        debug!("net_rx: forwarding packet {:?} -> {:?}", src, dest);
        if let Err(e) = net_tx(trx, topo, dest, src, payload) {
            warn!("net_rx: forwarding failed: {}", e);
        }
    }
}
