// ITS application PDU codec - UPER primitives and the common PDU header
//
// The message grammars themselves are generated elsewhere; this module only
// provides the unaligned PER primitives they are written against, plus the
// fixed ItsPduHeader that every ITS application message starts with.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::io::Cursor;
use thiserror::Error;

/// Common header of every ITS application PDU (ETSI TS 102 894-2)
///
/// ```text
/// ItsPduHeader ::= SEQUENCE {
///     protocolVersion INTEGER (0..255),
///     messageID       INTEGER (0..255),
///     stationID       INTEGER (0..4294967295)
/// }
/// ```
///
/// All three fields are constrained to whole octets so the UPER encoding is
/// always 6 bytes, big-endian, with no padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItsPduHeader {
    pub protocol_version: u8,
    pub message_id: u8,
    pub station_id: u32,
}

impl ItsPduHeader {
    pub const SIZE: usize = 6;

    /// Decode the header from the start of a PDU
    pub fn decode(buf: &mut Cursor<&[u8]>) -> Result<Self, DecodeError> {
        if buf.remaining() < Self::SIZE {
            return Err(DecodeError::Incomplete {
                needed: Self::SIZE * 8,
                available: buf.remaining() * 8,
            });
        }

        Ok(ItsPduHeader {
            protocol_version: buf.get_u8(),
            message_id: buf.get_u8(),
            station_id: buf.get_u32(),
        })
    }

    /// Encode header to buffer
    pub fn encode(&self, buf: &mut BytesMut) {
        buf.put_u8(self.protocol_version);
        buf.put_u8(self.message_id);
        buf.put_u32(self.station_id);
    }
}

/// Decoding faults raised by the PER primitives and the grammars built on them
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("Incomplete encoding: need {needed} bits, {available} available")]
    Incomplete { needed: usize, available: usize },

    #[error("Value {value} of '{field}' is out of range")]
    ValueOutOfRange { field: &'static str, value: i64 },

    #[error("Fragmented length determinant in '{field}' is not supported")]
    Fragmented { field: &'static str },

    #[error("Decoding of '{field}' is not supported")]
    Unsupported { field: &'static str },

    #[error("Invalid choice index {index} for '{field}'")]
    InvalidChoice { field: &'static str, index: u64 },
}

/// Number of bits PER uses for a constrained whole number with `range` values
pub fn range_bits(range: u64) -> u32 {
    if range <= 1 {
        0
    } else {
        64 - (range - 1).leading_zeros()
    }
}

/// Presence bitmap of the OPTIONAL/DEFAULT components of a SEQUENCE
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Presence {
    bits: u64,
    count: u32,
}

impl Presence {
    /// Whether the `index`th optional component (in declaration order) is present
    pub fn is_present(&self, index: u32) -> bool {
        index < self.count && (self.bits >> (self.count - 1 - index)) & 1 == 1
    }
}

/// Unaligned PER reader over one encoded value
///
/// Positions are tracked in bits. Every read checks the remaining length
/// first, so a truncated encoding surfaces as `DecodeError::Incomplete`
/// instead of a panic.
#[derive(Debug, Clone)]
pub struct PerReader<'a> {
    data: &'a [u8],
    bit: usize,
}

impl<'a> PerReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, bit: 0 }
    }

    pub fn bit_position(&self) -> usize {
        self.bit
    }

    pub fn remaining_bits(&self) -> usize {
        self.data.len() * 8 - self.bit
    }

    /// Octets touched so far, counting a partially read octet as consumed
    pub fn consumed_octets(&self) -> usize {
        self.bit.div_ceil(8)
    }

    pub fn read_bits(&mut self, count: u32) -> Result<u64, DecodeError> {
        debug_assert!(count <= 64);
        let count_bits = count as usize;
        if count_bits > self.remaining_bits() {
            return Err(DecodeError::Incomplete {
                needed: count_bits,
                available: self.remaining_bits(),
            });
        }

        let mut value = 0u64;
        for _ in 0..count {
            let byte = self.data[self.bit / 8];
            let bit = (byte >> (7 - self.bit % 8)) & 1;
            value = (value << 1) | u64::from(bit);
            self.bit += 1;
        }
        Ok(value)
    }

    pub fn read_bool(&mut self) -> Result<bool, DecodeError> {
        Ok(self.read_bits(1)? == 1)
    }

    /// Extension marker bit of an extensible SEQUENCE, CHOICE or ENUMERATED
    pub fn read_extension_bit(&mut self) -> Result<bool, DecodeError> {
        self.read_bool()
    }

    pub fn read_presence(&mut self, count: u32) -> Result<Presence, DecodeError> {
        Ok(Presence {
            bits: self.read_bits(count)?,
            count,
        })
    }

    /// Constrained whole number in `lower..=upper`
    pub fn read_constrained(&mut self, lower: i64, upper: i64) -> Result<i64, DecodeError> {
        let range = (upper - lower) as u64 + 1;
        let offset = self.read_bits(range_bits(range))?;
        Ok(lower + offset as i64)
    }

    /// Constrained whole number whose constraint carries an extension marker
    pub fn read_constrained_ext(
        &mut self,
        field: &'static str,
        lower: i64,
        upper: i64,
    ) -> Result<i64, DecodeError> {
        if self.read_extension_bit()? {
            let len = self.read_length(field)?;
            if len == 0 || len > 8 {
                return Err(DecodeError::ValueOutOfRange {
                    field,
                    value: len as i64,
                });
            }
            let raw = self.read_bits(len as u32 * 8)?;
            // two's complement of `len` octets
            let shift = 64 - len as u32 * 8;
            return Ok(((raw << shift) as i64) >> shift);
        }
        self.read_constrained(lower, upper)
    }

    /// Index of an ENUMERATED value with `root_count` root enumerations.
    ///
    /// Extension additions come back as `root_count + n`.
    pub fn read_enumerated(&mut self, root_count: u32, extensible: bool) -> Result<u64, DecodeError> {
        if extensible && self.read_extension_bit()? {
            let addition = self.read_normally_small()?;
            return u64::from(root_count)
                .checked_add(addition)
                .ok_or(DecodeError::ValueOutOfRange {
                    field: "enumerated extension",
                    value: i64::try_from(addition).unwrap_or(i64::MAX),
                });
        }
        self.read_bits(range_bits(u64::from(root_count)))
    }

    /// CHOICE index. Extension alternatives come back as `root_count + n`.
    pub fn read_choice(&mut self, root_count: u32, extensible: bool) -> Result<u64, DecodeError> {
        self.read_enumerated(root_count, extensible)
    }

    pub fn read_normally_small(&mut self) -> Result<u64, DecodeError> {
        if !self.read_bool()? {
            return self.read_bits(6);
        }
        let len = self.read_length("normally small number")?;
        if len > 8 {
            return Err(DecodeError::ValueOutOfRange {
                field: "normally small number",
                value: len as i64,
            });
        }
        self.read_bits(len as u32 * 8)
    }

    /// Unconstrained length determinant
    pub fn read_length(&mut self, field: &'static str) -> Result<usize, DecodeError> {
        if !self.read_bool()? {
            return Ok(self.read_bits(7)? as usize);
        }
        if !self.read_bool()? {
            return Ok(self.read_bits(14)? as usize);
        }
        Err(DecodeError::Fragmented { field })
    }

    /// Element count of a SEQUENCE OF with a non-extensible SIZE constraint
    pub fn read_size(&mut self, lower: usize, upper: usize) -> Result<usize, DecodeError> {
        Ok(self.read_constrained(lower as i64, upper as i64)? as usize)
    }

    pub fn read_octets(&mut self, count: usize) -> Result<Bytes, DecodeError> {
        if count * 8 > self.remaining_bits() {
            return Err(DecodeError::Incomplete {
                needed: count * 8,
                available: self.remaining_bits(),
            });
        }

        if self.bit % 8 == 0 {
            let start = self.bit / 8;
            self.bit += count * 8;
            return Ok(Bytes::copy_from_slice(&self.data[start..start + count]));
        }

        let mut out = BytesMut::with_capacity(count);
        for _ in 0..count {
            out.put_u8(self.read_bits(8)? as u8);
        }
        Ok(out.freeze())
    }

    /// Open type: length-prefixed octets whose grammar is resolved by the caller
    pub fn read_open_type(&mut self, field: &'static str) -> Result<Bytes, DecodeError> {
        let len = self.read_length(field)?;
        self.read_octets(len)
    }

    /// Extension additions of an extensible SEQUENCE whose extension bit was set.
    ///
    /// Each present addition is returned as its raw open type encoding.
    pub fn read_extension_additions(&mut self) -> Result<Vec<Bytes>, DecodeError> {
        // bitmap length is encoded as count - 1
        let last = self.read_normally_small()?;
        if last >= 64 {
            return Err(DecodeError::ValueOutOfRange {
                field: "extension additions",
                value: i64::try_from(last).unwrap_or(i64::MAX),
            });
        }
        let count = last + 1;
        let presence = self.read_presence(count as u32)?;
        let mut additions = Vec::new();
        for index in 0..count as u32 {
            if presence.is_present(index) {
                additions.push(self.read_open_type("extension addition")?);
            }
        }
        Ok(additions)
    }

    /// Everything from the current position to the end, realigned to octets.
    ///
    /// A trailing partial octet is left-aligned and zero padded.
    pub fn rest(&mut self) -> Bytes {
        let whole = self.remaining_bits() / 8;
        let mut out = BytesMut::with_capacity(whole + 1);
        for _ in 0..whole {
            out.put_u8(self.read_bits(8).unwrap_or_default() as u8);
        }
        let tail = self.remaining_bits() as u32;
        if tail > 0 {
            let bits = self.read_bits(tail).unwrap_or_default();
            out.put_u8((bits << (8 - tail)) as u8);
        }
        out.freeze()
    }
}

/// Unaligned PER writer, the inverse of [`PerReader`].
///
/// Used to build encoded values for tests, benchmarks and traffic generators.
#[derive(Debug, Default, Clone)]
pub struct PerWriter {
    buf: Vec<u8>,
    bit: usize,
}

impl PerWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bit_len(&self) -> usize {
        self.bit
    }

    pub fn write_bits(&mut self, value: u64, count: u32) -> &mut Self {
        for i in (0..count).rev() {
            if self.bit % 8 == 0 {
                self.buf.push(0);
            }
            if (value >> i) & 1 == 1 {
                let last = self.buf.len() - 1;
                self.buf[last] |= 1 << (7 - self.bit % 8);
            }
            self.bit += 1;
        }
        self
    }

    pub fn write_bool(&mut self, value: bool) -> &mut Self {
        self.write_bits(u64::from(value), 1)
    }

    pub fn write_constrained(&mut self, value: i64, lower: i64, upper: i64) -> &mut Self {
        let range = (upper - lower) as u64 + 1;
        self.write_bits((value - lower) as u64, range_bits(range))
    }

    /// Root enumeration or root CHOICE alternative; writes the extension bit when `extensible`
    pub fn write_enumerated(&mut self, index: u64, root_count: u32, extensible: bool) -> &mut Self {
        if extensible {
            self.write_bool(false);
        }
        self.write_bits(index, range_bits(u64::from(root_count)))
    }

    pub fn write_length(&mut self, len: usize) -> &mut Self {
        if len < 128 {
            self.write_bits(len as u64, 8)
        } else {
            self.write_bits(0b10, 2).write_bits(len as u64, 14)
        }
    }

    pub fn write_octets(&mut self, octets: &[u8]) -> &mut Self {
        for &byte in octets {
            self.write_bits(u64::from(byte), 8);
        }
        self
    }

    pub fn write_open_type(&mut self, octets: &[u8]) -> &mut Self {
        self.write_length(octets.len()).write_octets(octets)
    }

    /// Finish the encoding, padding the last octet with zero bits
    pub fn into_bytes(self) -> Bytes {
        Bytes::from(self.buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn its_pdu_header_decode() {
        let data: &[u8] = &[0x02, 0x01, 0x00, 0x00, 0x30, 0x39, 0xAA];
        let mut cursor = Cursor::new(data);
        let header = ItsPduHeader::decode(&mut cursor).unwrap();

        assert_eq!(header.protocol_version, 2);
        assert_eq!(header.message_id, 1);
        assert_eq!(header.station_id, 12345);
        assert_eq!(cursor.position(), 6);
    }

    #[test]
    fn its_pdu_header_encode_decode() {
        let header = ItsPduHeader {
            protocol_version: 1,
            message_id: 10,
            station_id: 0xDEAD_BEEF,
        };

        let mut buf = BytesMut::new();
        header.encode(&mut buf);
        assert_eq!(buf.len(), ItsPduHeader::SIZE);

        let mut cursor = Cursor::new(buf.as_ref());
        assert_eq!(ItsPduHeader::decode(&mut cursor).unwrap(), header);
    }

    #[test]
    fn its_pdu_header_incomplete() {
        let data: &[u8] = &[0x02, 0x01, 0x00];
        let mut cursor = Cursor::new(data);
        let result = ItsPduHeader::decode(&mut cursor);
        assert_eq!(
            result,
            Err(DecodeError::Incomplete {
                needed: 48,
                available: 24
            })
        );
    }

    #[test]
    fn range_bits_matches_per_rules() {
        assert_eq!(range_bits(1), 0);
        assert_eq!(range_bits(2), 1);
        assert_eq!(range_bits(8), 3);
        assert_eq!(range_bits(9), 4);
        assert_eq!(range_bits(256), 8);
        assert_eq!(range_bits(900_002), 20);
        assert_eq!(range_bits(1 << 32), 32);
    }

    #[test]
    fn reader_crosses_octet_boundaries() {
        // 3 bits 0b101, then 8 bits 0xFF, then 5 bits 0b00011
        let data: &[u8] = &[0b1011_1111, 0b1110_0011];
        let mut r = PerReader::new(data);
        assert_eq!(r.read_bits(3).unwrap(), 0b101);
        assert_eq!(r.read_bits(8).unwrap(), 0xFF);
        assert_eq!(r.read_bits(5).unwrap(), 0b00011);
        assert_eq!(r.remaining_bits(), 0);
        assert!(matches!(r.read_bool(), Err(DecodeError::Incomplete { .. })));
    }

    #[test]
    fn constrained_signed_range() {
        let mut w = PerWriter::new();
        w.write_constrained(-100_000, -100_000, 800_001)
            .write_constrained(1234, -100_000, 800_001)
            .write_constrained(-122, -122, 121);
        let bytes = w.into_bytes();

        let mut r = PerReader::new(&bytes);
        assert_eq!(r.read_constrained(-100_000, 800_001).unwrap(), -100_000);
        assert_eq!(r.read_constrained(-100_000, 800_001).unwrap(), 1234);
        assert_eq!(r.read_constrained(-122, 121).unwrap(), -122);
        assert_eq!(r.bit_position(), 48);
    }

    #[test]
    fn extensible_enumerated_root_and_addition() {
        let mut w = PerWriter::new();
        w.write_enumerated(4, 5, true);
        // extension addition #2 as a normally small number
        w.write_bool(true).write_bool(false).write_bits(2, 6);
        let bytes = w.into_bytes();

        let mut r = PerReader::new(&bytes);
        assert_eq!(r.read_enumerated(5, true).unwrap(), 4);
        assert_eq!(r.read_enumerated(5, true).unwrap(), 7);
    }

    #[test]
    fn extensible_integer_outside_root() {
        let mut w = PerWriter::new();
        w.write_bool(true).write_length(3).write_bits(70_000, 24);
        let bytes = w.into_bytes();

        let mut r = PerReader::new(&bytes);
        assert_eq!(r.read_constrained_ext("pathDeltaTime", 1, 65535).unwrap(), 70_000);
    }

    #[test]
    fn open_type_unaligned() {
        let mut w = PerWriter::new();
        w.write_bits(0b1, 1).write_open_type(&[0xCA, 0xFE]);
        let bytes = w.into_bytes();

        let mut r = PerReader::new(&bytes);
        assert!(r.read_bool().unwrap());
        let payload = r.read_open_type("regExtValue").unwrap();
        assert_eq!(payload.as_ref(), &[0xCA, 0xFE]);
        assert_eq!(r.consumed_octets(), 4);
    }

    #[test]
    fn long_length_determinant() {
        let payload = vec![0x5A; 300];
        let mut w = PerWriter::new();
        w.write_open_type(&payload);
        let bytes = w.into_bytes();

        let mut r = PerReader::new(&bytes);
        assert_eq!(r.read_open_type("data").unwrap().len(), 300);
    }

    #[test]
    fn fragmented_length_rejected() {
        let data: &[u8] = &[0xC1, 0x00];
        let mut r = PerReader::new(data);
        assert_eq!(
            r.read_length("regExtValue"),
            Err(DecodeError::Fragmented {
                field: "regExtValue"
            })
        );
    }

    #[test]
    fn extension_additions_are_skipped_as_open_types() {
        let mut w = PerWriter::new();
        // two additions, only the second present
        w.write_bool(false).write_bits(1, 6).write_bits(0b01, 2);
        w.write_open_type(&[0x11, 0x22]);
        w.write_bits(0b111, 3);
        let bytes = w.into_bytes();

        let mut r = PerReader::new(&bytes);
        let additions = r.read_extension_additions().unwrap();
        assert_eq!(additions.len(), 1);
        assert_eq!(additions[0].as_ref(), &[0x11, 0x22]);
        assert_eq!(r.read_bits(3).unwrap(), 0b111);
    }

    /// Long form normally small number of 8 octets, all bits set
    fn oversized_normally_small(w: &mut PerWriter) {
        w.write_bool(true).write_length(8).write_bits(u64::MAX, 64);
    }

    #[test]
    fn oversized_enumerated_extension_is_out_of_range() {
        let mut w = PerWriter::new();
        w.write_bool(true);
        oversized_normally_small(&mut w);
        let bytes = w.into_bytes();

        let mut r = PerReader::new(&bytes);
        assert_eq!(
            r.read_enumerated(5, true),
            Err(DecodeError::ValueOutOfRange {
                field: "enumerated extension",
                value: i64::MAX
            })
        );
    }

    #[test]
    fn oversized_extension_addition_count_is_out_of_range() {
        let mut w = PerWriter::new();
        oversized_normally_small(&mut w);
        let bytes = w.into_bytes();

        let mut r = PerReader::new(&bytes);
        assert_eq!(
            r.read_extension_additions(),
            Err(DecodeError::ValueOutOfRange {
                field: "extension additions",
                value: i64::MAX
            })
        );

        // count - 1 of 64 means 65 additions, one past the largest bitmap
        let mut w = PerWriter::new();
        w.write_bool(true).write_length(1).write_bits(64, 8);
        let bytes = w.into_bytes();
        assert!(matches!(
            PerReader::new(&bytes).read_extension_additions(),
            Err(DecodeError::ValueOutOfRange { value: 64, .. })
        ));
    }

    #[test]
    fn rest_realigns_trailing_bits() {
        let data: &[u8] = &[0b1010_1010, 0b1100_0000];
        let mut r = PerReader::new(data);
        r.read_bits(4).unwrap();
        let rest = r.rest();
        assert_eq!(rest.as_ref(), &[0b1010_1100, 0b0000_0000]);
        assert_eq!(r.remaining_bits(), 0);
    }

    #[test]
    fn presence_bitmap_order() {
        let data: &[u8] = &[0b1010_0000];
        let mut r = PerReader::new(data);
        let presence = r.read_presence(3).unwrap();
        assert!(presence.is_present(0));
        assert!(!presence.is_present(1));
        assert!(presence.is_present(2));
        assert!(!presence.is_present(3));
    }
}
