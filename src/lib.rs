//! A reliable transport stack for small embedded nodes talking over a short-range packet radio.
//!
//! The stack is layered, bottom to top:
//!
//! * A [`Transceiver`] (platform-supplied, out of scope for this crate): addressed, fixed-length
//!   payload send/receive with a blocking, timed receive.
//! * The data-link layer ([`dll`]): wraps/unwraps a length-prefixed frame inside one transceiver
//!   payload.
//! * The network layer ([`net`]): adds a `(dest, src)` header and forwards packets not addressed
//!   to this node using a static next-hop table.
//! * The transport layer ([`transport`]): segments a message, reassembles it at the peer,
//!   acknowledges every segment, retransmits on loss, and suppresses duplicates with a 1-bit
//!   sequence number.
//!
//! Only [`transport::TransportTransmitter`] and [`transport::TransportReceiver`] are meant to be
//! driven directly by an application; they internally drive the network and data-link layers.
//!
//! [`Transceiver`]: transceiver::Transceiver

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod log;

pub mod addr;
pub mod bytes;
pub mod config;
pub mod dll;
mod error;
pub mod net;
pub mod time;
pub mod topology;
pub mod transceiver;
pub mod transport;
pub mod utils;

#[cfg(test)]
pub mod testing;

pub use self::error::{Error, RecvError, TxError};

/// Size, in bytes, of a single transceiver payload.
pub const TRX_PAYLOAD_LENGTH: usize = 32;

/// Size, in bytes, of the data-link frame header (the `frame_len` byte).
pub const FRAME_HEADER_LEN: usize = 1;

/// Size, in bytes, of the network packet header (`total_len`, `dest`, `src`).
pub const PACKET_HEADER_LEN: usize = 3;

/// Largest packet (header + payload) that fits in one frame.
pub const MAX_PACKET_LEN: usize = TRX_PAYLOAD_LENGTH - FRAME_HEADER_LEN;

/// Largest segment (header + payload) that fits in one packet.
pub const MAX_SEGMENT_LEN: usize = MAX_PACKET_LEN - PACKET_HEADER_LEN;

/// Size, in bytes, of a DATA segment header (everything but the payload).
pub const DATA_HEADER_LEN: usize = 7;

/// Largest DATA payload that fits in a single segment.
pub const MAX_DATA_PAYLOAD_LEN: usize = MAX_SEGMENT_LEN - DATA_HEADER_LEN;

/// How long a transmitter waits for an ACK before retrying.
pub const ACK_TIMEOUT_MS: u16 = 1500;

/// How long a receiver waits before sending an ACK, giving the peer time to become a receiver.
pub const ACK_DELAY_MS: u16 = 250;

/// Pause a transmitter takes between successfully acknowledged segments.
pub const SEGMENT_SPACING_MS: u16 = 250;

/// Pause a transmitter takes before retrying an unacknowledged segment.
pub const RETRY_DELAY_MS: u16 = 250;

/// Number of attempts a transmitter makes for one segment before giving up.
pub const ATTEMPT_LIMIT: u8 = 10;

/// Sentinel timeout value requesting an unbounded (blocking) receive.
pub const INDEFINITE: u16 = u16::MAX;
