//! Static address-resolution and forwarding tables.
//!
//! These four lookups are bundled into one trait because, per the node's lifecycle, they form a
//! single static table compiled in for the life of the process: splitting them into unrelated
//! free functions would only obscure that they must stay mutually consistent.

use crate::addr::{DlAddr, NetAddr, Port};

/// Per-node address-resolution and routing tables.
///
/// Implementations are pure, total functions over a small, compile-time-known address set.
/// Behavior for an address outside that set is implementation-defined (see [`Topology::next_hop`]
/// and [`Topology::resolve_dl_addr`]) but must never panic.
pub trait Topology {
    /// This node's own network address.
    fn my_network_addr(&self) -> NetAddr;

    /// This node's own data-link address.
    fn my_dl_addr(&self) -> DlAddr;

    /// This node's own port.
    fn my_port(&self) -> Port;

    /// Resolves a network address to the data-link address used to reach it directly.
    ///
    /// Returns `None` if `net_addr` is not a direct neighbor known to this node.
    fn resolve_dl_addr(&self, net_addr: NetAddr) -> Option<DlAddr>;

    /// Resolves a port to the network address of the node currently hosting it.
    ///
    /// Returns `None` if `port` is not known to this node's table.
    fn resolve_net_addr(&self, port: Port) -> Option<NetAddr>;

    /// Looks up the next-hop network address on the path toward `dest`.
    ///
    /// Returns `None` if `dest` is not reachable from this node's table; callers must treat this
    /// as a graceful forwarding/transmit failure, never as a fault.
    fn next_hop(&self, dest: NetAddr) -> Option<NetAddr>;
}

/// A fixed, in-memory [`Topology`] built from static tables.
///
/// This is the concrete implementation real nodes are expected to use: each node compiles in one
/// `StaticTopology` describing its own identity and its view of the network.
pub struct StaticTopology<'a> {
    my_network_addr: NetAddr,
    my_dl_addr: DlAddr,
    my_port: Port,
    /// `(net_addr, dl_addr)` pairs for every direct neighbor.
    neighbors: &'a [(NetAddr, DlAddr)],
    /// `(port, net_addr)` pairs for every port known to this node.
    ports: &'a [(Port, NetAddr)],
    /// `(dest, next_hop)` pairs describing the forwarding table.
    routes: &'a [(NetAddr, NetAddr)],
}

impl<'a> StaticTopology<'a> {
    /// Creates a topology from the given identity and static tables.
    pub fn new(
        my_network_addr: NetAddr,
        my_dl_addr: DlAddr,
        my_port: Port,
        neighbors: &'a [(NetAddr, DlAddr)],
        ports: &'a [(Port, NetAddr)],
        routes: &'a [(NetAddr, NetAddr)],
    ) -> Self {
        Self {
            my_network_addr,
            my_dl_addr,
            my_port,
            neighbors,
            ports,
            routes,
        }
    }
}

impl<'a> Topology for StaticTopology<'a> {
    fn my_network_addr(&self) -> NetAddr {
        self.my_network_addr
    }

    fn my_dl_addr(&self) -> DlAddr {
        self.my_dl_addr
    }

    fn my_port(&self) -> Port {
        self.my_port
    }

    fn resolve_dl_addr(&self, net_addr: NetAddr) -> Option<DlAddr> {
        self.neighbors
            .iter()
            .find(|(n, _)| n.0 == net_addr.0)
            .map(|(_, dl)| *dl)
    }

    fn resolve_net_addr(&self, port: Port) -> Option<NetAddr> {
        self.ports
            .iter()
            .find(|(p, _)| p.0 == port.0)
            .map(|(_, n)| *n)
    }

    fn next_hop(&self, dest: NetAddr) -> Option<NetAddr> {
        self.routes
            .iter()
            .find(|(d, _)| d.0 == dest.0)
            .map(|(_, hop)| *hop)
    }
}
