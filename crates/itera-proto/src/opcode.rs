use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// DNS operation codes, bits 11-14 of the header flags word.
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
#[repr(u8)]
pub enum Opcode {
    #[default]
    Query = 0,
    IQuery = 1,
    Status = 2,
    Notify = 4,
    Update = 5,
}

impl Opcode {
    pub fn from_u8(value: u8) -> Result<Self, Error> {
        Self::try_from(value).map_err(|_| Error::InvalidOpcode { value })
    }

    #[inline]
    pub fn to_u8(self) -> u8 {
        self.into()
    }

    pub fn name(&self) -> &'static str {
        match self {
            Opcode::Query => "QUERY",
            Opcode::IQuery => "IQUERY",
            Opcode::Status => "STATUS",
            Opcode::Notify => "NOTIFY",
            Opcode::Update => "UPDATE",
        }
    }
}

impl std::fmt::Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
