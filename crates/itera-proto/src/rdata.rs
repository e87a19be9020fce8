use std::net::Ipv4Addr;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::name::{Name, NameParser};
use crate::rtype::{RecordType, Type};

/// An IPv4 host address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct A {
    pub address: Ipv4Addr,
}

impl A {
    pub fn new(address: Ipv4Addr) -> Self {
        A { address }
    }

    fn parse(data: &[u8], offset: usize, rdlength: usize) -> Result<Self> {
        if rdlength != 4 {
            return Err(Error::RDataLengthMismatch {
                rtype: "A",
                expected: 4,
                actual: rdlength,
            });
        }
        let octets = data
            .get(offset..offset + 4)
            .ok_or_else(|| Error::unexpected_eof(offset + 4))?;
        Ok(A {
            address: Ipv4Addr::new(octets[0], octets[1], octets[2], octets[3]),
        })
    }
}

/// An authoritative name server for a zone.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NS {
    pub name: Name,
}

/// A canonical name alias.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CNAME {
    pub name: Name,
}

/// Rdata of a type we do not interpret, kept verbatim so records
/// survive a decode and re-encode.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Unknown {
    pub type_code: u16,
    pub data: Bytes,
}

/// Parsed rdata for the record types the resolver acts on, with a
/// passthrough variant for everything else.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RData {
    A(A),
    NS(NS),
    CNAME(CNAME),
    Unknown(Unknown),
}

impl RData {
    /// Parses `rdlength` bytes of rdata at `offset`. Name-bearing types
    /// get the whole message so compression pointers resolve.
    pub fn parse(rtype: Type, data: &[u8], offset: usize, rdlength: usize) -> Result<Self> {
        match rtype {
            Type::Known(RecordType::A) => Ok(RData::A(A::parse(data, offset, rdlength)?)),
            Type::Known(RecordType::NS) => {
                let (name, _) = NameParser::new(data).parse_name(offset)?;
                Ok(RData::NS(NS { name }))
            }
            Type::Known(RecordType::CNAME) => {
                let (name, _) = NameParser::new(data).parse_name(offset)?;
                Ok(RData::CNAME(CNAME { name }))
            }
            _ => {
                let raw = data
                    .get(offset..offset + rdlength)
                    .ok_or_else(|| Error::unexpected_eof(offset + rdlength))?;
                Ok(RData::Unknown(Unknown {
                    type_code: rtype.to_u16(),
                    data: Bytes::copy_from_slice(raw),
                }))
            }
        }
    }

    /// Writes the uncompressed rdata bytes, without the length prefix.
    pub fn write_to(&self, buf: &mut Vec<u8>) {
        match self {
            RData::A(a) => buf.extend_from_slice(&a.address.octets()),
            RData::NS(ns) => buf.extend_from_slice(ns.name.as_wire_bytes()),
            RData::CNAME(cname) => buf.extend_from_slice(cname.name.as_wire_bytes()),
            RData::Unknown(unknown) => buf.extend_from_slice(&unknown.data),
        }
    }

    pub fn wire_len(&self) -> usize {
        match self {
            RData::A(_) => 4,
            RData::NS(ns) => ns.name.wire_len(),
            RData::CNAME(cname) => cname.name.wire_len(),
            RData::Unknown(unknown) => unknown.data.len(),
        }
    }

    #[inline]
    pub fn as_a(&self) -> Option<Ipv4Addr> {
        match self {
            RData::A(a) => Some(a.address),
            _ => None,
        }
    }

    #[inline]
    pub fn as_ns(&self) -> Option<&Name> {
        match self {
            RData::NS(ns) => Some(&ns.name),
            _ => None,
        }
    }

    #[inline]
    pub fn as_cname(&self) -> Option<&Name> {
        match self {
            RData::CNAME(cname) => Some(&cname.name),
            _ => None,
        }
    }
}

impl std::fmt::Display for RData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RData::A(a) => write!(f, "{}", a.address),
            RData::NS(ns) => write!(f, "{}", ns.name),
            RData::CNAME(cname) => write!(f, "{}", cname.name),
            // RFC 3597 generic encoding for types we do not interpret.
            RData::Unknown(unknown) => {
                write!(f, "\\# {}", unknown.data.len())?;
                for b in unknown.data.iter() {
                    write!(f, " {b:02x}")?;
                }
                Ok(())
            }
        }
    }
}
