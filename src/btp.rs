// ABOUTME: Basic Transport Protocol (ETSI EN 302 636-5-1) headers carried in front of ITS PDUs
// ABOUTME: BTP-A and BTP-B are both 4 octets; the destination port selects the ITS service

use crate::codec::DecodeError;
use crate::datatypes::WellKnownPort;
use bytes::{Buf, BufMut, BytesMut};
use std::io::Cursor;

/// BTP header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BtpHeader {
    /// Interactive transport
    A {
        destination_port: u16,
        source_port: u16,
    },
    /// Non-interactive transport, the form ITS application messages use
    B {
        destination_port: u16,
        destination_port_info: u16,
    },
}

impl BtpHeader {
    pub const SIZE: usize = 4;

    pub fn decode_a(buf: &mut Cursor<&[u8]>) -> Result<Self, DecodeError> {
        check(buf)?;
        Ok(BtpHeader::A {
            destination_port: buf.get_u16(),
            source_port: buf.get_u16(),
        })
    }

    pub fn decode_b(buf: &mut Cursor<&[u8]>) -> Result<Self, DecodeError> {
        check(buf)?;
        Ok(BtpHeader::B {
            destination_port: buf.get_u16(),
            destination_port_info: buf.get_u16(),
        })
    }

    pub fn encode(&self, buf: &mut BytesMut) {
        match *self {
            BtpHeader::A {
                destination_port,
                source_port,
            } => {
                buf.put_u16(destination_port);
                buf.put_u16(source_port);
            }
            BtpHeader::B {
                destination_port,
                destination_port_info,
            } => {
                buf.put_u16(destination_port);
                buf.put_u16(destination_port_info);
            }
        }
    }

    pub fn destination_port(&self) -> u16 {
        match *self {
            BtpHeader::A {
                destination_port, ..
            }
            | BtpHeader::B {
                destination_port, ..
            } => destination_port,
        }
    }

    /// Well-known ITS service behind the destination port, if any
    pub fn service(&self) -> Option<WellKnownPort> {
        WellKnownPort::try_from(self.destination_port()).ok()
    }
}

fn check(buf: &Cursor<&[u8]>) -> Result<(), DecodeError> {
    if buf.remaining() < BtpHeader::SIZE {
        return Err(DecodeError::Incomplete {
            needed: BtpHeader::SIZE * 8,
            available: buf.remaining() * 8,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn btp_b_denm() {
        let data: &[u8] = &[0x07, 0xD2, 0x00, 0x00, 0x02];
        let mut cursor = Cursor::new(data);
        let header = BtpHeader::decode_b(&mut cursor).unwrap();

        assert_eq!(
            header,
            BtpHeader::B {
                destination_port: 2002,
                destination_port_info: 0
            }
        );
        assert_eq!(header.service(), Some(WellKnownPort::Den));
        assert_eq!(cursor.position(), 4);
    }

    #[test]
    fn btp_a_encode_decode() {
        let header = BtpHeader::A {
            destination_port: 2008,
            source_port: 40000,
        };
        let mut buf = BytesMut::new();
        header.encode(&mut buf);

        let mut cursor = Cursor::new(buf.as_ref());
        assert_eq!(BtpHeader::decode_a(&mut cursor).unwrap(), header);
        assert_eq!(header.service(), Some(WellKnownPort::TlcSsem));
    }

    #[test]
    fn short_header() {
        let data: &[u8] = &[0x07];
        let mut cursor = Cursor::new(data);
        assert_eq!(
            BtpHeader::decode_b(&mut cursor),
            Err(DecodeError::Incomplete {
                needed: 32,
                available: 8
            })
        );
    }

    #[test]
    fn unknown_port_has_no_service() {
        let header = BtpHeader::B {
            destination_port: 9999,
            destination_port_info: 0,
        };
        assert_eq!(header.service(), None);
    }
}
