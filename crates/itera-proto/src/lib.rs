//! DNS wire format support for the itera resolver: RFC 1035 message
//! encoding and decoding with name compression on the read path.
//!
//! Queries are always written uncompressed. Decoding follows
//! compression pointers but only backwards, so malformed messages with
//! pointer cycles are rejected rather than looped on.

#![warn(missing_debug_implementations)]

mod class;
mod error;
mod header;
mod message;
mod name;
mod opcode;
mod question;
mod rcode;
mod rdata;
mod record;
mod rtype;

pub use class::{Class, RecordClass};
pub use error::{Error, Result};
pub use header::{Header, HeaderFlags, HEADER_SIZE};
pub use message::Message;
pub use name::{Label, LabelIter, Name, NameParser};
pub use opcode::Opcode;
pub use question::{Question, QuestionParser};
pub use rcode::ResponseCode;
pub use rdata::{RData, Unknown, A, CNAME, NS};
pub use record::{RecordParser, ResourceRecord};
pub use rtype::{RecordType, Type};

/// Maximum length of a single label in bytes.
pub const MAX_LABEL_LENGTH: usize = 63;

/// Maximum encoded length of a name in bytes, root label included.
pub const MAX_NAME_LENGTH: usize = 255;

/// Largest payload a plain UDP response may carry.
pub const MAX_UDP_MESSAGE_SIZE: usize = 512;

/// Well-known DNS port.
pub const DNS_PORT: u16 = 53;
