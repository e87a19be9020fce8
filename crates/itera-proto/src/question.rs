use serde::{Deserialize, Serialize};

use crate::class::{Class, RecordClass};
use crate::error::{Error, Result};
use crate::name::{Name, NameParser};
use crate::rtype::{RecordType, Type};

/// An entry in the question section.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Question {
    pub name: Name,
    pub qtype: Type,
    pub qclass: Class,
}

impl Question {
    pub fn new(name: Name, qtype: Type, qclass: Class) -> Self {
        Question {
            name,
            qtype,
            qclass,
        }
    }

    /// An A query for `name` in the Internet class.
    pub fn a(name: Name) -> Self {
        Question::new(name, RecordType::A.into(), RecordClass::IN.into())
    }

    /// An NS query for `name` in the Internet class.
    pub fn ns(name: Name) -> Self {
        Question::new(name, RecordType::NS.into(), RecordClass::IN.into())
    }

    /// Parses a question at `offset`, returning it and the next offset.
    pub fn parse(data: &[u8], offset: usize) -> Result<(Self, usize)> {
        let (name, consumed) = NameParser::new(data).parse_name(offset)?;
        let fixed = offset + consumed;
        if fixed + 4 > data.len() {
            return Err(Error::buffer_too_short(fixed + 4, data.len()));
        }
        let qtype = Type::from_u16(u16::from_be_bytes([data[fixed], data[fixed + 1]]));
        let qclass = Class::from_u16(u16::from_be_bytes([data[fixed + 2], data[fixed + 3]]));
        Ok((
            Question {
                name,
                qtype,
                qclass,
            },
            fixed + 4,
        ))
    }

    pub fn write_to(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(self.name.as_wire_bytes());
        buf.extend_from_slice(&self.qtype.to_u16().to_be_bytes());
        buf.extend_from_slice(&self.qclass.to_u16().to_be_bytes());
    }

    /// True when `other` asks the same thing. Name comparison is
    /// case-insensitive.
    pub fn matches(&self, other: &Question) -> bool {
        self.name == other.name && self.qtype == other.qtype && self.qclass == other.qclass
    }
}

impl std::fmt::Display for Question {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}\t\t{}\t{}", self.name, self.qclass, self.qtype)
    }
}

/// Cursor over the question section of a message.
#[derive(Debug)]
pub struct QuestionParser<'a> {
    data: &'a [u8],
    offset: usize,
    remaining: u16,
}

impl<'a> QuestionParser<'a> {
    pub fn new(data: &'a [u8], offset: usize, count: u16) -> Self {
        QuestionParser {
            data,
            offset,
            remaining: count,
        }
    }

    pub fn next(&mut self) -> Result<Option<Question>> {
        if self.remaining == 0 {
            return Ok(None);
        }
        let (question, next) = Question::parse(self.data, self.offset)?;
        self.offset = next;
        self.remaining -= 1;
        Ok(Some(question))
    }

    /// Offset just past the last question parsed so far.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }
}
