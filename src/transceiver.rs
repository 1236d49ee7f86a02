//! The packet radio interface the data-link layer is built on.

use crate::{addr::DlAddr, Error, TRX_PAYLOAD_LENGTH};

/// Outcome of a blocking transceiver receive.
#[derive(Debug, PartialEq, Eq)]
pub enum TrxRecv {
    /// A full payload was received.
    Payload([u8; TRX_PAYLOAD_LENGTH]),
    /// No payload arrived within the requested timeout.
    Timeout,
}

/// Hardware interface to the packet radio.
///
/// Implementations are expected to provide addressed, fixed-length (`TRX_PAYLOAD_LENGTH`-byte)
/// send, and a timed, blocking receive. This is the only interface in the stack that actually
/// touches the radio; everything above it (data-link, network, transport) is built in terms of
/// this trait, which makes it the natural seam for a test double.
pub trait Transceiver {
    /// Sends one full-length payload to `addr`.
    ///
    /// A `Hardware` error here is recoverable by the caller: callers above the network layer
    /// never treat a single failed transmit as fatal by itself.
    fn transmit(&mut self, addr: DlAddr, payload: &[u8; TRX_PAYLOAD_LENGTH]) -> Result<(), Error>;

    /// Waits up to `timeout_ms` for a payload to arrive.
    ///
    /// `timeout_ms == INDEFINITE` (`u16::MAX`) disables the timeout and blocks until a payload
    /// arrives or a hardware error occurs.
    fn receive(&mut self, timeout_ms: u16) -> Result<TrxRecv, Error>;
}
