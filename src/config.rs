//! Stack configuration trait.

use crate::{time::Clock, topology::Topology, transceiver::Transceiver};

/// Trait for stack configurations.
///
/// This trait bundles the platform-specific types used throughout the layers of the stack: a
/// time source, the radio transceiver, and the static address/routing tables for this node.
///
/// Every application defines a type implementing this trait and supplies it to the transport
/// endpoints.
pub trait Config {
    /// A millisecond-resolution clock, also used to realize the protocol's blocking delays.
    type Clock: Clock;

    /// The packet radio transceiver.
    type Transceiver: Transceiver;

    /// The static address-resolution and forwarding tables for this node.
    type Topology: Topology;
}
