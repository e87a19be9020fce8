use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// DNS response codes, bits 0-3 of the header flags word.
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
pub enum ResponseCode {
    #[default]
    NoError = 0,
    FormErr = 1,
    ServFail = 2,
    NxDomain = 3,
    NotImp = 4,
    Refused = 5,
    YxDomain = 6,
    YxRrSet = 7,
    NxRrSet = 8,
    NotAuth = 9,
    NotZone = 10,
}

impl ResponseCode {
    pub fn from_u8(value: u8) -> Result<Self, Error> {
        Self::try_from(value).map_err(|_| Error::InvalidResponseCode { value })
    }

    #[inline]
    pub fn to_u8(self) -> u8 {
        self.into()
    }

    #[inline]
    pub fn is_no_error(&self) -> bool {
        matches!(self, ResponseCode::NoError)
    }

    #[inline]
    pub fn is_nx_domain(&self) -> bool {
        matches!(self, ResponseCode::NxDomain)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ResponseCode::NoError => "NOERROR",
            ResponseCode::FormErr => "FORMERR",
            ResponseCode::ServFail => "SERVFAIL",
            ResponseCode::NxDomain => "NXDOMAIN",
            ResponseCode::NotImp => "NOTIMP",
            ResponseCode::Refused => "REFUSED",
            ResponseCode::YxDomain => "YXDOMAIN",
            ResponseCode::YxRrSet => "YXRRSET",
            ResponseCode::NxRrSet => "NXRRSET",
            ResponseCode::NotAuth => "NOTAUTH",
            ResponseCode::NotZone => "NOTZONE",
        }
    }
}

impl std::fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_u8() {
        assert_eq!(ResponseCode::from_u8(3).unwrap(), ResponseCode::NxDomain);
        assert_eq!(ResponseCode::Refused.to_u8(), 5);
    }

    #[test]
    fn rejects_unassigned_values() {
        assert_eq!(
            ResponseCode::from_u8(11),
            Err(Error::InvalidResponseCode { value: 11 })
        );
    }

    #[test]
    fn predicates() {
        assert!(ResponseCode::NoError.is_no_error());
        assert!(ResponseCode::NxDomain.is_nx_domain());
        assert!(!ResponseCode::ServFail.is_no_error());
    }
}
