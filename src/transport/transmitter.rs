//! Transport-layer transmitter: sends one message as SOM, DATA*, EOM, using stop-and-wait
//! acknowledgement with a 1-bit sequence number and a bounded number of retries per segment.

use crate::{
    addr::Port,
    bytes::{ByteReader, ByteWriter},
    config::Config,
    net::{net_rx, net_tx},
    Error, RecvError, TxError, ACK_TIMEOUT_MS, ATTEMPT_LIMIT, MAX_DATA_PAYLOAD_LEN,
    MAX_SEGMENT_LEN, RETRY_DELAY_MS, SEGMENT_SPACING_MS,
};

use super::segment::Segment;
use super::seq_num::SeqNum;

/// Classification of a single segment-send attempt.
enum TxAttempt {
    /// The peer acknowledged with the complementary sequence number.
    Success,
    /// Timed out, got an old ack, got a non-ack reply, or a malformed reply: try again.
    Retry,
    /// The transceiver reported a hardware error; not retryable.
    Fatal(Error),
}

/// Sends transport-layer messages to ports elsewhere in the network.
pub struct TransportTransmitter<C: Config> {
    trx: C::Transceiver,
    clock: C::Clock,
    topo: C::Topology,
}

impl<C: Config> TransportTransmitter<C> {
    /// Creates a transmitter bound to the given transceiver, clock, and routing/address tables.
    pub fn new(trx: C::Transceiver, clock: C::Clock, topo: C::Topology) -> Self {
        TransportTransmitter { trx, clock, topo }
    }

    /// Sends `message` to `dest_port`, blocking until every segment is acknowledged or the
    /// attempt limit is reached on some segment.
    pub fn send(&mut self, message: &[u8], dest_port: Port) -> Result<(), TxError> {
        use crate::topology::Topology;

        let my_port = self.topo.my_port();
        let my_net = self.topo.my_network_addr();
        let dest_net = self
            .topo
            .resolve_net_addr(dest_port)
            .ok_or(Error::InvalidValue)?;

        let mut seq = SeqNum::ZERO;

        let som = Segment::Som {
            seq,
            dest_port,
            src_port: my_port,
            message_len: message.len() as u16,
        };
        debug!("transport_tx: sending SOM, len {}", message.len());
        self.send_with_retry(&som, dest_net, my_net)?;
        seq += SeqNum::ONE;
        self.clock.delay_ms(SEGMENT_SPACING_MS);

        let mut sent = 0usize;
        while sent < message.len() {
            let chunk_len = core::cmp::min(MAX_DATA_PAYLOAD_LEN, message.len() - sent);
            let chunk = &message[sent..sent + chunk_len];
            let data = Segment::Data {
                seq,
                dest_port,
                src_port: my_port,
                offset: sent as u16,
                payload: chunk,
            };
            trace!("transport_tx: sending DATA at offset {}", sent);
            self.send_with_retry(&data, dest_net, my_net)?;
            sent += chunk_len;
            seq += SeqNum::ONE;
            self.clock.delay_ms(SEGMENT_SPACING_MS);
        }

        let eom = Segment::Eom {
            seq,
            dest_port,
            src_port: my_port,
        };
        debug!("transport_tx: sending EOM");
        self.send_with_retry(&eom, dest_net, my_net)?;

        Ok(())
    }

    /// Sends one segment, retrying up to `ATTEMPT_LIMIT` times.
    fn send_with_retry(
        &mut self,
        seg: &Segment<'_>,
        dest_net: crate::addr::NetAddr,
        my_net: crate::addr::NetAddr,
    ) -> Result<(), TxError> {
        for _ in 0..ATTEMPT_LIMIT {
            match self.attempt_tx(seg, dest_net, my_net) {
                TxAttempt::Success => return Ok(()),
                TxAttempt::Retry => {
                    self.clock.delay_ms(RETRY_DELAY_MS);
                }
                TxAttempt::Fatal(e) => return Err(TxError::from(e)),
            }
        }
        Err(TxError::ReachedAttemptLimit)
    }

    /// Sends `seg` once and waits up to `ACK_TIMEOUT_MS` for its acknowledgement.
    fn attempt_tx(
        &mut self,
        seg: &Segment<'_>,
        dest_net: crate::addr::NetAddr,
        my_net: crate::addr::NetAddr,
    ) -> TxAttempt {
        let mut buf = [0u8; MAX_SEGMENT_LEN];
        let len = {
            let mut w = ByteWriter::new(&mut buf);
            seg.to_bytes(&mut w).expect("segment always fits MAX_SEGMENT_LEN");
            MAX_SEGMENT_LEN - w.into_rest().len()
        };

        // A failed transmit is not fatal: only the ack (or its absence) decides the outcome.
        if let Err(e) = net_tx(&mut self.trx, &self.topo, dest_net, my_net, &buf[..len]) {
            warn!("attempt_tx: net_tx failed (not fatal): {}", e);
        }

        let mut reply = [0u8; MAX_SEGMENT_LEN];
        match net_rx(&mut self.trx, &self.topo, ACK_TIMEOUT_MS, &mut reply) {
            Ok(n) => match Segment::from_bytes(&mut ByteReader::new(&reply[..n])) {
                Ok(Segment::Ack { seq: ack_seq, .. }) if ack_seq == seg.seq().complement() => {
                    TxAttempt::Success
                }
                Ok(Segment::Ack { .. }) => {
                    trace!("attempt_tx: old ack, retrying");
                    TxAttempt::Retry
                }
                Ok(_) => {
                    trace!("attempt_tx: reply was not an ack, retrying");
                    TxAttempt::Retry
                }
                Err(_) => {
                    trace!("attempt_tx: malformed reply, retrying");
                    TxAttempt::Retry
                }
            },
            Err(RecvError::Timeout) => TxAttempt::Retry,
            Err(RecvError::Link(e)) => TxAttempt::Fatal(e),
        }
    }
}
