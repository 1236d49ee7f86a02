//! Transport-layer segment wire format.
//!
//! ```notrust
//! offset  field
//! 0       segment length (header + payload, header included)
//! 1       sequence number (0 or 1)
//! 2       destination port
//! 3       source port
//! 4       segment identifier: SOM=0x07, DATA=0x0D, EOM=0x09, ACK=0x0A
//! 5..6    length/offset, big-endian (SOM: total message length; DATA: payload offset)
//! 7..     payload (DATA only)
//! ```
//!
//! EOM and ACK omit bytes 5-6 entirely: their header is 5 bytes, not 7 with the field zeroed.

use crate::{
    addr::Port,
    bytes::{ByteReader, ByteWriter, FromBytes, ToBytes},
    Error, DATA_HEADER_LEN,
};

use super::seq_num::SeqNum;

const SOM_HEADER_LEN: usize = 7;
const EOM_ACK_HEADER_LEN: usize = 5;

mod id {
    pub const SOM: u8 = 0x07;
    pub const DATA: u8 = 0x0D;
    pub const EOM: u8 = 0x09;
    pub const ACK: u8 = 0x0A;
}

/// A decoded transport segment, borrowing its payload (if any) from the input buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Start of message: announces the total message length and resynchronizes the receiver's
    /// expected sequence number.
    Som {
        seq: SeqNum,
        dest_port: Port,
        src_port: Port,
        message_len: u16,
    },
    /// A chunk of message payload starting at `offset` bytes into the message.
    Data {
        seq: SeqNum,
        dest_port: Port,
        src_port: Port,
        offset: u16,
        payload: &'a [u8],
    },
    /// End of message.
    Eom {
        seq: SeqNum,
        dest_port: Port,
        src_port: Port,
    },
    /// Acknowledgement of a single segment.
    Ack {
        seq: SeqNum,
        dest_port: Port,
        src_port: Port,
    },
}

impl<'a> Segment<'a> {
    /// The sequence number carried by this segment.
    pub fn seq(&self) -> SeqNum {
        match *self {
            Segment::Som { seq, .. }
            | Segment::Data { seq, .. }
            | Segment::Eom { seq, .. }
            | Segment::Ack { seq, .. } => seq,
        }
    }

    /// The port this segment is addressed to.
    pub fn dest_port(&self) -> Port {
        match *self {
            Segment::Som { dest_port, .. }
            | Segment::Data { dest_port, .. }
            | Segment::Eom { dest_port, .. }
            | Segment::Ack { dest_port, .. } => dest_port,
        }
    }

    /// The port this segment claims to originate from.
    pub fn src_port(&self) -> Port {
        match *self {
            Segment::Som { src_port, .. }
            | Segment::Data { src_port, .. }
            | Segment::Eom { src_port, .. }
            | Segment::Ack { src_port, .. } => src_port,
        }
    }

    /// Builds an ACK addressed to `dest_port` (the original sender), claiming `src_port` as ours.
    pub fn ack(seq: SeqNum, dest_port: Port, src_port: Port) -> Self {
        Segment::Ack {
            seq,
            dest_port,
            src_port,
        }
    }
}

impl<'a> ToBytes for Segment<'a> {
    fn to_bytes(&self, writer: &mut ByteWriter<'_>) -> Result<(), Error> {
        match *self {
            Segment::Som {
                seq,
                dest_port,
                src_port,
                message_len,
            } => {
                writer.write_u8(SOM_HEADER_LEN as u8)?;
                writer.write_u8(seq.to_wire())?;
                writer.write_u8(dest_port.0)?;
                writer.write_u8(src_port.0)?;
                writer.write_u8(id::SOM)?;
                writer.write_u16_be(message_len)
            }
            Segment::Data {
                seq,
                dest_port,
                src_port,
                offset,
                payload,
            } => {
                let total_len = DATA_HEADER_LEN + payload.len();
                writer.write_u8(total_len as u8)?;
                writer.write_u8(seq.to_wire())?;
                writer.write_u8(dest_port.0)?;
                writer.write_u8(src_port.0)?;
                writer.write_u8(id::DATA)?;
                writer.write_u16_be(offset)?;
                writer.write_slice(payload)
            }
            Segment::Eom {
                seq,
                dest_port,
                src_port,
            } => {
                writer.write_u8(EOM_ACK_HEADER_LEN as u8)?;
                writer.write_u8(seq.to_wire())?;
                writer.write_u8(dest_port.0)?;
                writer.write_u8(src_port.0)?;
                writer.write_u8(id::EOM)
            }
            Segment::Ack {
                seq,
                dest_port,
                src_port,
            } => {
                writer.write_u8(EOM_ACK_HEADER_LEN as u8)?;
                writer.write_u8(seq.to_wire())?;
                writer.write_u8(dest_port.0)?;
                writer.write_u8(src_port.0)?;
                writer.write_u8(id::ACK)
            }
        }
    }
}

impl<'a> FromBytes<'a> for Segment<'a> {
    fn from_bytes(bytes: &mut ByteReader<'a>) -> Result<Self, Error> {
        let total_len = usize::from(bytes.read_u8()?);
        let seq = SeqNum::from_wire(bytes.read_u8()?);
        let dest_port = Port(bytes.read_u8()?);
        let src_port = Port(bytes.read_u8()?);
        let kind = bytes.read_u8()?;

        match kind {
            id::SOM => {
                if total_len != SOM_HEADER_LEN {
                    return Err(Error::InvalidValue);
                }
                let message_len = bytes.read_u16_be()?;
                Ok(Segment::Som {
                    seq,
                    dest_port,
                    src_port,
                    message_len,
                })
            }
            id::DATA => {
                if total_len < DATA_HEADER_LEN {
                    return Err(Error::InvalidValue);
                }
                let offset = bytes.read_u16_be()?;
                let payload = bytes.read_slice(total_len - DATA_HEADER_LEN)?;
                Ok(Segment::Data {
                    seq,
                    dest_port,
                    src_port,
                    offset,
                    payload,
                })
            }
            id::EOM => {
                if total_len != EOM_ACK_HEADER_LEN {
                    return Err(Error::InvalidValue);
                }
                Ok(Segment::Eom {
                    seq,
                    dest_port,
                    src_port,
                })
            }
            id::ACK => {
                if total_len != EOM_ACK_HEADER_LEN {
                    return Err(Error::InvalidValue);
                }
                Ok(Segment::Ack {
                    seq,
                    dest_port,
                    src_port,
                })
            }
            _ => Err(Error::InvalidValue),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip<'a>(seg: Segment<'a>, buf: &'a mut [u8]) -> Segment<'a> {
        let len = {
            let mut w = ByteWriter::new(buf);
            seg.to_bytes(&mut w).unwrap();
            buf.len() - w.into_rest().len()
        };
        Segment::from_bytes(&mut ByteReader::new(&buf[..len])).unwrap()
    }

    #[test]
    fn som_round_trip() {
        let mut buf = [0u8; 16];
        let seg = Segment::Som {
            seq: SeqNum::ZERO,
            dest_port: Port(0x0A),
            src_port: Port(0x3C),
            message_len: 15,
        };
        assert_eq!(round_trip(seg, &mut buf), seg);
    }

    #[test]
    fn data_round_trip_with_payload() {
        let mut buf = [0u8; 32];
        let payload = b"hello world, cube!!!!"; // 21 bytes, MAX_DATA_PAYLOAD_LEN
        let seg = Segment::Data {
            seq: SeqNum::ONE,
            dest_port: Port(0x0A),
            src_port: Port(0x3C),
            offset: 21,
            payload,
        };
        match round_trip(seg, &mut buf) {
            Segment::Data {
                offset, payload: p, ..
            } => {
                assert_eq!(offset, 21);
                assert_eq!(p, payload);
            }
            other => panic!("unexpected segment: {:?}", other),
        }
    }

    #[test]
    fn eom_and_ack_header_is_five_bytes() {
        let mut buf = [0u8; 8];
        let mut w = ByteWriter::new(&mut buf);
        Segment::Eom {
            seq: SeqNum::ZERO,
            dest_port: Port(1),
            src_port: Port(2),
        }
        .to_bytes(&mut w)
        .unwrap();
        let written = 8 - w.into_rest().len();
        assert_eq!(written, 5);
        assert_eq!(buf[0], 5);
        assert_eq!(buf[4], 0x09);
    }

    #[test]
    fn ack_addresses_original_sender() {
        let ack = Segment::ack(SeqNum::ONE, Port(0x3C), Port(0x0A));
        assert_eq!(ack.dest_port(), Port(0x3C));
        assert_eq!(ack.src_port(), Port(0x0A));
        assert_eq!(ack.seq(), SeqNum::ONE);
    }

    #[test]
    fn rejects_unknown_segment_id() {
        let buf = [5u8, 0, 1, 2, 0xFF];
        assert_eq!(
            Segment::from_bytes(&mut ByteReader::new(&buf)),
            Err(Error::InvalidValue)
        );
    }

    #[test]
    fn big_endian_length_parses_high_byte_first() {
        // length/offset = 0x0105 = 261, not affected by the historical shift/add precedence bug.
        let buf = [7u8, 0, 1, 2, id::SOM, 0x01, 0x05];
        match Segment::from_bytes(&mut ByteReader::new(&buf)).unwrap() {
            Segment::Som { message_len, .. } => assert_eq!(message_len, 261),
            other => panic!("unexpected segment: {:?}", other),
        }
    }
}
