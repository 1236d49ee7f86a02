//! Address newtypes used at the network and transport layers.

use core::fmt;

/// A one-byte network-layer address.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NetAddr(pub u8);

impl NetAddr {
    /// Creates a `NetAddr` from a raw byte.
    pub fn new(byte: u8) -> Self {
        NetAddr(byte)
    }
}

impl fmt::Debug for NetAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NetAddr({:#04x})", self.0)
    }
}

/// A data-link (transceiver) address.
///
/// The transceiver interface this stack is built on addresses peers with a 32-bit value; this
/// newtype keeps it distinct from network- and port-level addresses.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DlAddr(pub u32);

impl fmt::Debug for DlAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DlAddr({:#010x})", self.0)
    }
}

/// A one-byte transport-layer port.
///
/// Ports are globally unique across the network: a port identifies an endpoint independent of
/// which node it currently lives on.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Port(pub u8);

impl fmt::Debug for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Port({:#04x})", self.0)
    }
}
