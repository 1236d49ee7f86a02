//! Transport-layer receiver: reassembles one message at a time out of SOM/DATA/EOM segments,
//! acknowledging every segment it accepts (including duplicates) and resynchronizing its expected
//! sequence number whenever a SOM arrives.

use crate::{
    addr::Port,
    bytes::{ByteReader, ByteWriter},
    config::Config,
    net::net_rx,
    net::net_tx,
    ACK_DELAY_MS, MAX_DATA_PAYLOAD_LEN, MAX_SEGMENT_LEN,
};

use super::segment::Segment;
use super::seq_num::SeqNum;

/// A single decoded, already-acknowledged reassembly event.
enum RxEvent {
    Som { src_port: Port, message_len: u16 },
    Data {
        offset: u16,
        payload: [u8; MAX_DATA_PAYLOAD_LEN],
        payload_len: u8,
    },
    Eom,
    /// A stray ACK from a prior conversation. Still goes through the full per-segment procedure
    /// (ack-delay, ack, sequence check); only ignored once it reaches the message level.
    Ack,
}

/// Where a message reassembly currently stands. Scoped to a single [`TransportReceiver::recv`]
/// call; the receiver's only state that outlives a message is `expected_seq`.
enum Phase {
    Idle,
    Receiving { source_port: Port, message_len: u16 },
}

/// Reassembles transport-layer messages addressed to one local port.
///
/// Holds the platform resources (`C::Transceiver`, `C::Clock`, `C::Topology`) and the one bit of
/// state that must survive across messages: the expected sequence number for the next segment.
pub struct TransportReceiver<C: Config> {
    trx: C::Transceiver,
    clock: C::Clock,
    topo: C::Topology,
    expected_seq: SeqNum,
}

impl<C: Config> TransportReceiver<C> {
    /// Creates a receiver bound to the given transceiver, clock, and routing/address tables.
    pub fn new(trx: C::Transceiver, clock: C::Clock, topo: C::Topology) -> Self {
        TransportReceiver {
            trx,
            clock,
            topo,
            expected_seq: SeqNum::ZERO,
        }
    }

    /// Receives one complete message into `buf`, blocking up to `timeout_ms` between segments.
    ///
    /// Zeroes `buf` before writing. Returns the message length and the sending port on success.
    /// Gaps left by DATA segments the sender never sent (out-of-order or dropped offsets with no
    /// retry, which should not happen under this protocol's own sender) are left as whatever
    /// `buf` was zeroed to.
    pub fn recv(&mut self, buf: &mut [u8], timeout_ms: u16) -> Result<(u16, Port), crate::RecvError> {
        for b in buf.iter_mut() {
            *b = 0;
        }

        let mut phase = Phase::Idle;

        loop {
            match self.receive_event(timeout_ms)? {
                RxEvent::Som {
                    src_port,
                    message_len,
                } => {
                    debug!("transport_rx: SOM from {:?}, len {}", src_port, message_len);
                    phase = Phase::Receiving {
                        source_port: src_port,
                        message_len,
                    };
                }
                RxEvent::Data {
                    offset,
                    payload,
                    payload_len,
                } => {
                    if let Phase::Receiving { .. } = phase {
                        let start = usize::from(offset);
                        if start < buf.len() {
                            let end = core::cmp::min(start + usize::from(payload_len), buf.len());
                            let copy_len = end - start;
                            buf[start..end].copy_from_slice(&payload[..copy_len]);
                        }
                    }
                    // A DATA segment received before any SOM has already been ACKed by
                    // `attempt_rx`; there is nowhere to put its payload, so it is dropped.
                }
                RxEvent::Eom => {
                    if let Phase::Receiving {
                        source_port,
                        message_len,
                    } = phase
                    {
                        debug!("transport_rx: EOM, message complete ({} bytes)", message_len);
                        return Ok((message_len, source_port));
                    }
                    // EOM with no preceding SOM: nothing to complete, keep waiting in Idle.
                }
                RxEvent::Ack => {
                    // Stray ack from a prior conversation: already acked by attempt_rx, nothing
                    // to do at the message level.
                }
            }
        }
    }

    /// Repeatedly attempts to receive and classify one segment, retrying on duplicates and
    /// transient errors. Only `Timeout` and unrecoverable errors are surfaced.
    fn receive_event(&mut self, timeout_ms: u16) -> Result<RxEvent, crate::RecvError> {
        loop {
            match self.attempt_rx(timeout_ms) {
                Ok(Some(event)) => return Ok(event),
                Ok(None) => continue,
                Err(crate::RecvError::Timeout) => return Err(crate::RecvError::Timeout),
                Err(crate::RecvError::Link(e)) => {
                    warn!("transport_rx: transient error, retrying: {}", e);
                    continue;
                }
            }
        }
    }

    /// Receives, acknowledges, and classifies one segment.
    ///
    /// Every received segment runs the same procedure: a SOM resynchronizes `expected_seq`, then
    /// (regardless of kind, including a stray ACK) the segment is acked after `ACK_DELAY_MS` and
    /// checked against `expected_seq`. Returns `Ok(None)` for a duplicate (already acknowledged
    /// again), which the caller should treat as "try again" rather than surface; a stray ACK is
    /// returned as `RxEvent::Ack` and ignored one layer up, at the message level.
    fn attempt_rx(&mut self, timeout_ms: u16) -> Result<Option<RxEvent>, crate::RecvError> {
        use crate::topology::Topology;

        let mut seg_buf = [0u8; MAX_SEGMENT_LEN];
        let n = net_rx(&mut self.trx, &self.topo, timeout_ms, &mut seg_buf)?;
        let seg = Segment::from_bytes(&mut ByteReader::new(&seg_buf[..n]))?;

        if let Segment::Som { seq, .. } = seg {
            self.expected_seq = seq;
        }

        self.clock.delay_ms(ACK_DELAY_MS);
        self.send_ack(seg.seq().complement(), seg.src_port());

        if seg.seq() != self.expected_seq {
            trace!("attempt_rx: duplicate segment, already acked");
            return Ok(None);
        }
        self.expected_seq += SeqNum::ONE;

        Ok(Some(match seg {
            Segment::Som {
                src_port,
                message_len,
                ..
            } => RxEvent::Som {
                src_port,
                message_len,
            },
            Segment::Data {
                offset, payload, ..
            } => {
                let mut arr = [0u8; MAX_DATA_PAYLOAD_LEN];
                arr[..payload.len()].copy_from_slice(payload);
                RxEvent::Data {
                    offset,
                    payload: arr,
                    payload_len: payload.len() as u8,
                }
            }
            Segment::Eom { .. } => RxEvent::Eom,
            Segment::Ack { .. } => RxEvent::Ack,
        }))
    }

    /// Acknowledges a segment, addressing the reply back at the sender's port.
    ///
    /// Failures here are swallowed: if the peer never sees the ACK, it will retransmit and this
    /// receiver will simply ACK again.
    fn send_ack(&mut self, seq: SeqNum, dest_port: Port) {
        use crate::topology::Topology;

        let ack = Segment::ack(seq, dest_port, self.topo.my_port());
        let dest_net = match self.topo.resolve_net_addr(dest_port) {
            Some(addr) => addr,
            None => {
                warn!("attempt_rx: cannot resolve net addr for port {:?}", dest_port);
                return;
            }
        };

        let mut ack_buf = [0u8; 5];
        let mut writer = ByteWriter::new(&mut ack_buf);
        if ack.to_bytes(&mut writer).is_err() {
            return;
        }

        let my_net = self.topo.my_network_addr();
        if let Err(e) = net_tx(&mut self.trx, &self.topo, dest_net, my_net, &ack_buf) {
            warn!("attempt_rx: failed to send ack: {}", e);
        }
    }
}
