//! Transport layer: segmentation, reassembly, and stop-and-wait reliability on top of the network
//! layer's packet delivery.

mod receiver;
mod segment;
mod seq_num;
mod transmitter;

pub use receiver::TransportReceiver;
pub use segment::Segment;
pub use seq_num::SeqNum;
pub use transmitter::TransportTransmitter;
