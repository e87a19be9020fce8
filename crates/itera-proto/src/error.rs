use thiserror::Error;

/// Errors produced while encoding or decoding DNS wire data.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("buffer too short: need {expected} bytes, have {actual}")]
    BufferTooShort { expected: usize, actual: usize },

    #[error("unexpected end of message at offset {offset}")]
    UnexpectedEof { offset: usize },

    #[error("label length {length} exceeds maximum of 63 at offset {offset}")]
    LabelTooLong { length: usize, offset: usize },

    #[error("name length {length} exceeds maximum of 255 bytes")]
    NameTooLong { length: usize },

    #[error("invalid character {ch:?} in domain name label")]
    InvalidLabelCharacter { ch: char },

    #[error("empty label in domain name")]
    EmptyLabel,

    #[error("compression pointer at offset {offset} targets {target}, which is not strictly earlier")]
    InvalidCompressionPointer { offset: usize, target: usize },

    #[error("followed {jumps} compression pointers without terminating")]
    TooManyCompressionJumps { jumps: usize },

    #[error("reserved label type {value:#04x} at offset {offset}")]
    InvalidLabelType { value: u8, offset: usize },

    #[error("invalid opcode {value}")]
    InvalidOpcode { value: u8 },

    #[error("invalid response code {value}")]
    InvalidResponseCode { value: u8 },

    #[error("{rtype} rdata length mismatch: expected {expected} bytes, got {actual}")]
    RDataLengthMismatch {
        rtype: &'static str,
        expected: usize,
        actual: usize,
    },
}

impl Error {
    #[inline]
    pub fn buffer_too_short(expected: usize, actual: usize) -> Self {
        Error::BufferTooShort { expected, actual }
    }

    #[inline]
    pub fn unexpected_eof(offset: usize) -> Self {
        Error::UnexpectedEof { offset }
    }

    #[inline]
    pub fn label_too_long(length: usize, offset: usize) -> Self {
        Error::LabelTooLong { length, offset }
    }

    #[inline]
    pub fn name_too_long(length: usize) -> Self {
        Error::NameTooLong { length }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
