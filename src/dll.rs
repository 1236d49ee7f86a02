//! Data-link layer: frames one network packet per transceiver payload.
//!
//! A frame is `[frame_len][network packet...]`, zero-padded to fill the full
//! [`TRX_PAYLOAD_LENGTH`]-byte transceiver payload. `frame_len` is defined here as the payload
//! length plus one (the total number of meaningful bytes in the frame, header included); nothing
//! in this layer or the network layer above it relies on that value to trim the received bytes,
//! since the network header carries its own length byte. `frame[0]` is therefore informational
//! only.

use crate::{
    addr::DlAddr,
    transceiver::{Transceiver, TrxRecv},
    Error, RecvError, FRAME_HEADER_LEN, TRX_PAYLOAD_LENGTH,
};

/// Builds a frame around `payload` and transmits it to `dl_addr`.
///
/// `payload.len()` must not exceed `TRX_PAYLOAD_LENGTH - FRAME_HEADER_LEN`; a longer payload is a
/// caller bug and returns `Error::Eof`.
pub fn dll_tx<T: Transceiver>(
    trx: &mut T,
    dl_addr: DlAddr,
    payload: &[u8],
) -> Result<(), Error> {
    if payload.len() > TRX_PAYLOAD_LENGTH - FRAME_HEADER_LEN {
        return Err(Error::Eof);
    }

    let mut frame = [0u8; TRX_PAYLOAD_LENGTH];
    frame[0] = (payload.len() + 1) as u8;
    frame[FRAME_HEADER_LEN..FRAME_HEADER_LEN + payload.len()].copy_from_slice(payload);

    trace!("dll_tx: {:?} <- {:?}", dl_addr, crate::utils::HexSlice(payload));
    trx.transmit(dl_addr, &frame)
}

/// Waits up to `timeout_ms` for one frame and copies its body into `buf`.
///
/// Copies exactly `min(buf.len(), TRX_PAYLOAD_LENGTH - FRAME_HEADER_LEN)` bytes of the frame body
/// into `buf`, starting at offset 0; `frame[0]` is never consulted to decide how many bytes to
/// copy. Returns the number of bytes copied.
pub fn dll_rx<T: Transceiver>(
    trx: &mut T,
    timeout_ms: u16,
    buf: &mut [u8],
) -> Result<usize, RecvError> {
    let frame = match trx.receive(timeout_ms)? {
        TrxRecv::Payload(frame) => frame,
        TrxRecv::Timeout => return Err(RecvError::Timeout),
    };

    let body = &frame[FRAME_HEADER_LEN..];
    let n = core::cmp::min(buf.len(), body.len());
    buf[..n].copy_from_slice(&body[..n]);
    trace!("dll_rx: {:?}", crate::utils::HexSlice(&buf[..n]));
    Ok(n)
}
