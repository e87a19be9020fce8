use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};

/// DNS classes. Everything outside IN exists mostly for completeness.
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
pub enum RecordClass {
    #[default]
    IN = 1,
    CH = 3,
    HS = 4,
    NONE = 254,
    ANY = 255,
}

impl RecordClass {
    #[inline]
    pub fn to_u16(self) -> u16 {
        self.into()
    }

    pub fn name(&self) -> &'static str {
        match self {
            RecordClass::IN => "IN",
            RecordClass::CH => "CH",
            RecordClass::HS => "HS",
            RecordClass::NONE => "NONE",
            RecordClass::ANY => "ANY",
        }
    }
}

impl std::fmt::Display for RecordClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A wire class code, preserving values we do not recognize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Class {
    Known(RecordClass),
    Unknown(u16),
}

impl Class {
    pub fn from_u16(value: u16) -> Self {
        match RecordClass::try_from(value) {
            Ok(class) => Class::Known(class),
            Err(_) => Class::Unknown(value),
        }
    }

    pub fn to_u16(self) -> u16 {
        match self {
            Class::Known(class) => class.to_u16(),
            Class::Unknown(value) => value,
        }
    }

    #[inline]
    pub fn is_internet(&self) -> bool {
        matches!(self, Class::Known(RecordClass::IN))
    }
}

impl From<RecordClass> for Class {
    fn from(class: RecordClass) -> Self {
        Class::Known(class)
    }
}

impl std::fmt::Display for Class {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Class::Known(class) => class.fmt(f),
            Class::Unknown(value) => write!(f, "CLASS{value}"),
        }
    }
}
