use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};
use crate::opcode::Opcode;
use crate::rcode::ResponseCode;

/// Size of the fixed DNS header in bytes.
pub const HEADER_SIZE: usize = 12;

bitflags! {
    /// Single-bit header flags. Opcode and rcode live in the same word
    /// on the wire but are kept as typed fields on [`Header`].
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct HeaderFlags: u16 {
        /// QR: set on responses, clear on queries.
        const RESPONSE = 0x8000;
        /// AA: the answering server is authoritative for the zone.
        const AUTHORITATIVE = 0x0400;
        /// TC: the response was truncated to fit the transport.
        const TRUNCATED = 0x0200;
        /// RD: the client asks the server to recurse.
        const RECURSION_DESIRED = 0x0100;
        /// RA: the server offers recursion.
        const RECURSION_AVAILABLE = 0x0080;
        /// Z: reserved, must be zero.
        const RESERVED = 0x0040;
        /// AD: authenticated data (DNSSEC).
        const AUTHENTIC_DATA = 0x0020;
        /// CD: checking disabled (DNSSEC).
        const CHECKING_DISABLED = 0x0010;
    }
}

impl Serialize for HeaderFlags {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u16(self.bits())
    }
}

impl<'de> Deserialize<'de> for HeaderFlags {
    fn deserialize<D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        let bits = u16::deserialize(deserializer)?;
        Ok(HeaderFlags::from_bits_truncate(bits))
    }
}

const OPCODE_SHIFT: u16 = 11;
const OPCODE_MASK: u16 = 0x0F;
const RCODE_MASK: u16 = 0x0F;

/// The fixed 12-byte header that starts every DNS message.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub id: u16,
    pub flags: HeaderFlags,
    pub opcode: Opcode,
    pub rcode: ResponseCode,
    pub question_count: u16,
    pub answer_count: u16,
    pub authority_count: u16,
    pub additional_count: u16,
}

impl Header {
    /// A header for an iterative query. Recursion desired stays clear;
    /// we walk referrals ourselves and only want what the server is
    /// authoritative for or can delegate.
    pub fn query(id: u16) -> Self {
        Header {
            id,
            flags: HeaderFlags::empty(),
            opcode: Opcode::Query,
            rcode: ResponseCode::NoError,
            question_count: 1,
            answer_count: 0,
            authority_count: 0,
            additional_count: 0,
        }
    }

    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < HEADER_SIZE {
            return Err(Error::buffer_too_short(HEADER_SIZE, data.len()));
        }
        let id = u16::from_be_bytes([data[0], data[1]]);
        let word = u16::from_be_bytes([data[2], data[3]]);

        let opcode = Opcode::from_u8(((word >> OPCODE_SHIFT) & OPCODE_MASK) as u8)?;
        let rcode = ResponseCode::from_u8((word & RCODE_MASK) as u8)?;
        let flags = HeaderFlags::from_bits_truncate(word);

        Ok(Header {
            id,
            flags,
            opcode,
            rcode,
            question_count: u16::from_be_bytes([data[4], data[5]]),
            answer_count: u16::from_be_bytes([data[6], data[7]]),
            authority_count: u16::from_be_bytes([data[8], data[9]]),
            additional_count: u16::from_be_bytes([data[10], data[11]]),
        })
    }

    pub fn write_to(&self, buf: &mut Vec<u8>) {
        let word = self.flags.bits()
            | ((self.opcode.to_u8() as u16) << OPCODE_SHIFT)
            | self.rcode.to_u8() as u16;
        buf.extend_from_slice(&self.id.to_be_bytes());
        buf.extend_from_slice(&word.to_be_bytes());
        buf.extend_from_slice(&self.question_count.to_be_bytes());
        buf.extend_from_slice(&self.answer_count.to_be_bytes());
        buf.extend_from_slice(&self.authority_count.to_be_bytes());
        buf.extend_from_slice(&self.additional_count.to_be_bytes());
    }

    #[inline]
    pub fn is_response(&self) -> bool {
        self.flags.contains(HeaderFlags::RESPONSE)
    }

    #[inline]
    pub fn is_authoritative(&self) -> bool {
        self.flags.contains(HeaderFlags::AUTHORITATIVE)
    }

    #[inline]
    pub fn is_truncated(&self) -> bool {
        self.flags.contains(HeaderFlags::TRUNCATED)
    }

    #[inline]
    pub fn recursion_desired(&self) -> bool {
        self.flags.contains(HeaderFlags::RECURSION_DESIRED)
    }

    #[inline]
    pub fn recursion_available(&self) -> bool {
        self.flags.contains(HeaderFlags::RECURSION_AVAILABLE)
    }
}
