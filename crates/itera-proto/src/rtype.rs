use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};

/// Record types this crate understands.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    IntoPrimitive,
    TryFromPrimitive,
    Serialize,
    Deserialize,
)]
#[repr(u16)]
pub enum RecordType {
    #[default]
    A = 1,
    NS = 2,
    CNAME = 5,
    SOA = 6,
    PTR = 12,
    MX = 15,
    TXT = 16,
    AAAA = 28,
    ANY = 255,
}

impl RecordType {
    #[inline]
    pub fn to_u16(self) -> u16 {
        self.into()
    }

    pub fn name(&self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::NS => "NS",
            RecordType::CNAME => "CNAME",
            RecordType::SOA => "SOA",
            RecordType::PTR => "PTR",
            RecordType::MX => "MX",
            RecordType::TXT => "TXT",
            RecordType::AAAA => "AAAA",
            RecordType::ANY => "ANY",
        }
    }
}

impl std::fmt::Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A wire record type. Unrecognized codes are carried through untouched so
/// messages containing them still parse and re-encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    Known(RecordType),
    Unknown(u16),
}

impl Type {
    pub fn from_u16(value: u16) -> Self {
        match RecordType::try_from(value) {
            Ok(rtype) => Type::Known(rtype),
            Err(_) => Type::Unknown(value),
        }
    }

    pub fn to_u16(self) -> u16 {
        match self {
            Type::Known(rtype) => rtype.to_u16(),
            Type::Unknown(value) => value,
        }
    }

    #[inline]
    pub fn is(&self, rtype: RecordType) -> bool {
        matches!(self, Type::Known(t) if *t == rtype)
    }
}

impl From<RecordType> for Type {
    fn from(rtype: RecordType) -> Self {
        Type::Known(rtype)
    }
}

impl std::fmt::Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Known(rtype) => rtype.fmt(f),
            Type::Unknown(value) => write!(f, "TYPE{value}"),
        }
    }
}
