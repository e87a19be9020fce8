use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};

use crate::class::{Class, RecordClass};
use crate::error::{Error, Result};
use crate::name::{Name, NameParser};
use crate::rdata::RData;
use crate::rtype::{RecordType, Type};

/// A resource record from the answer, authority, or additional section.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceRecord {
    pub name: Name,
    pub rtype: Type,
    pub rclass: Class,
    pub ttl: u32,
    pub rdata: RData,
}

impl ResourceRecord {
    pub fn new(name: Name, rtype: Type, rclass: Class, ttl: u32, rdata: RData) -> Self {
        ResourceRecord {
            name,
            rtype,
            rclass,
            ttl,
            rdata,
        }
    }

    pub fn a(name: Name, ttl: u32, address: Ipv4Addr) -> Self {
        ResourceRecord::new(
            name,
            RecordType::A.into(),
            RecordClass::IN.into(),
            ttl,
            RData::A(crate::rdata::A::new(address)),
        )
    }

    pub fn ns(name: Name, ttl: u32, target: Name) -> Self {
        ResourceRecord::new(
            name,
            RecordType::NS.into(),
            RecordClass::IN.into(),
            ttl,
            RData::NS(crate::rdata::NS { name: target }),
        )
    }

    pub fn cname(name: Name, ttl: u32, target: Name) -> Self {
        ResourceRecord::new(
            name,
            RecordType::CNAME.into(),
            RecordClass::IN.into(),
            ttl,
            RData::CNAME(crate::rdata::CNAME { name: target }),
        )
    }

    /// Parses one record at `offset`, returning it and the next offset.
    pub fn parse(data: &[u8], offset: usize) -> Result<(Self, usize)> {
        let (name, consumed) = NameParser::new(data).parse_name(offset)?;
        let fixed_start = offset + consumed;
        if fixed_start + 10 > data.len() {
            return Err(Error::buffer_too_short(fixed_start + 10, data.len()));
        }

        let rtype = Type::from_u16(u16::from_be_bytes([data[fixed_start], data[fixed_start + 1]]));
        let rclass = Class::from_u16(u16::from_be_bytes([
            data[fixed_start + 2],
            data[fixed_start + 3],
        ]));
        let ttl = u32::from_be_bytes([
            data[fixed_start + 4],
            data[fixed_start + 5],
            data[fixed_start + 6],
            data[fixed_start + 7],
        ]);
        let rdlength =
            u16::from_be_bytes([data[fixed_start + 8], data[fixed_start + 9]]) as usize;

        let rdata_start = fixed_start + 10;
        if rdata_start + rdlength > data.len() {
            return Err(Error::buffer_too_short(rdata_start + rdlength, data.len()));
        }
        let rdata = RData::parse(rtype, data, rdata_start, rdlength)?;

        Ok((
            ResourceRecord {
                name,
                rtype,
                rclass,
                ttl,
                rdata,
            },
            rdata_start + rdlength,
        ))
    }

    /// Writes the record uncompressed, recomputing the rdata length.
    pub fn write_to(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(self.name.as_wire_bytes());
        buf.extend_from_slice(&self.rtype.to_u16().to_be_bytes());
        buf.extend_from_slice(&self.rclass.to_u16().to_be_bytes());
        buf.extend_from_slice(&self.ttl.to_be_bytes());
        buf.extend_from_slice(&(self.rdata.wire_len() as u16).to_be_bytes());
        self.rdata.write_to(buf);
    }
}

impl std::fmt::Display for ResourceRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}",
            self.name, self.ttl, self.rclass, self.rtype, self.rdata
        )
    }
}

/// Cursor over a run of `count` records starting at `offset`.
#[derive(Debug)]
pub struct RecordParser<'a> {
    data: &'a [u8],
    offset: usize,
    remaining: u16,
}

impl<'a> RecordParser<'a> {
    pub fn new(data: &'a [u8], offset: usize, count: u16) -> Self {
        RecordParser {
            data,
            offset,
            remaining: count,
        }
    }

    pub fn next(&mut self) -> Result<Option<ResourceRecord>> {
        if self.remaining == 0 {
            return Ok(None);
        }
        let (record, next) = ResourceRecord::parse(self.data, self.offset)?;
        self.offset = next;
        self.remaining -= 1;
        Ok(Some(record))
    }

    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }
}
