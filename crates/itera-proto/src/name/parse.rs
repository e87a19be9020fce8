use smallvec::SmallVec;

use crate::error::Error;
use crate::name::Name;
use crate::{MAX_LABEL_LENGTH, MAX_NAME_LENGTH};

/// Upper bound on pointer jumps while decompressing a single name. The
/// backward-pointer rule already rules out loops; this caps pathological
/// but technically legal pointer chains.
const MAX_COMPRESSION_JUMPS: usize = 128;

const POINTER_MASK: u8 = 0xC0;

/// Decodes possibly-compressed names from a DNS message.
///
/// Holds the full message so compression pointers can be followed
/// anywhere before the current position.
#[derive(Debug)]
pub struct NameParser<'a> {
    data: &'a [u8],
}

impl<'a> NameParser<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        NameParser { data }
    }

    /// Parses the name starting at `offset`.
    ///
    /// Returns the decompressed name and the number of bytes the name
    /// occupies at `offset` itself, which is where the caller resumes.
    /// Pointers may only target earlier offsets; forward or self
    /// references are rejected.
    pub fn parse_name(&self, offset: usize) -> Result<(Name, usize), Error> {
        let mut wire: SmallVec<[u8; 64]> = SmallVec::new();
        let mut pos = offset;
        let mut consumed = 0;
        let mut followed_pointer = false;
        let mut jumps = 0;

        loop {
            let len_byte = *self
                .data
                .get(pos)
                .ok_or_else(|| Error::unexpected_eof(pos))?;

            match len_byte & POINTER_MASK {
                0 => {
                    let len = len_byte as usize;
                    if len == 0 {
                        wire.push(0);
                        if !followed_pointer {
                            consumed = pos - offset + 1;
                        }
                        break;
                    }
                    if len > MAX_LABEL_LENGTH {
                        return Err(Error::label_too_long(len, pos));
                    }
                    let start = pos + 1;
                    let end = start + len;
                    let label = self
                        .data
                        .get(start..end)
                        .ok_or_else(|| Error::unexpected_eof(end))?;
                    wire.push(len_byte);
                    wire.extend_from_slice(label);
                    if wire.len() + 1 > MAX_NAME_LENGTH {
                        return Err(Error::name_too_long(wire.len() + 1));
                    }
                    pos = end;
                }
                POINTER_MASK => {
                    let hi = (len_byte & !POINTER_MASK) as usize;
                    let lo = *self
                        .data
                        .get(pos + 1)
                        .ok_or_else(|| Error::unexpected_eof(pos + 1))?
                        as usize;
                    let target = (hi << 8) | lo;
                    if target >= pos {
                        return Err(Error::InvalidCompressionPointer {
                            offset: pos,
                            target,
                        });
                    }
                    jumps += 1;
                    if jumps > MAX_COMPRESSION_JUMPS {
                        return Err(Error::TooManyCompressionJumps { jumps });
                    }
                    if !followed_pointer {
                        consumed = pos - offset + 2;
                        followed_pointer = true;
                    }
                    pos = target;
                }
                // 0x40 and 0x80 label types are reserved.
                value => {
                    return Err(Error::InvalidLabelType { value, offset: pos });
                }
            }
        }

        Ok((Name::from_wire(wire), consumed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_uncompressed_name() {
        let data = b"\x03www\x07example\x03com\x00";
        let (name, consumed) = NameParser::new(data).parse_name(0).unwrap();
        assert_eq!(name.to_string(), "www.example.com.");
        assert_eq!(consumed, 17);
    }

    #[test]
    fn parses_root_name() {
        let data = b"\x00";
        let (name, consumed) = NameParser::new(data).parse_name(0).unwrap();
        assert!(name.is_root());
        assert_eq!(consumed, 1);
    }

    #[test]
    fn follows_backward_pointer() {
        // "example.com." at 0, then "www" + pointer to 0 at offset 13.
        let mut data = Vec::new();
        data.extend_from_slice(b"\x07example\x03com\x00");
        data.extend_from_slice(b"\x03www\xC0\x00");
        let (name, consumed) = NameParser::new(&data).parse_name(13).unwrap();
        assert_eq!(name.to_string(), "www.example.com.");
        assert_eq!(consumed, 6);
    }

    #[test]
    fn consumed_counts_up_to_first_pointer_only() {
        let mut data = Vec::new();
        data.extend_from_slice(b"\x03com\x00");
        // "a" + pointer, then "b" + pointer to the previous name.
        data.extend_from_slice(b"\x01a\xC0\x00");
        data.extend_from_slice(b"\x01b\xC0\x05");
        let (name, consumed) = NameParser::new(&data).parse_name(9).unwrap();
        assert_eq!(name.to_string(), "b.a.com.");
        assert_eq!(consumed, 4);
    }

    #[test]
    fn rejects_forward_pointer() {
        let data = b"\x03www\xC0\x10";
        let err = NameParser::new(data).parse_name(0).unwrap_err();
        assert_eq!(
            err,
            Error::InvalidCompressionPointer {
                offset: 4,
                target: 16
            }
        );
    }

    #[test]
    fn rejects_self_pointer() {
        let data = b"\xC0\x00\xC0\x02";
        let err = NameParser::new(data).parse_name(2).unwrap_err();
        assert!(matches!(err, Error::InvalidCompressionPointer { .. }));
    }

    #[test]
    fn rejects_truncated_label() {
        let data = b"\x05exa";
        let err = NameParser::new(data).parse_name(0).unwrap_err();
        // The error names the position the read would have ended at.
        assert_eq!(err, Error::unexpected_eof(6));
    }

    #[test]
    fn rejects_missing_terminator() {
        let data = b"\x03www";
        let err = NameParser::new(data).parse_name(0).unwrap_err();
        assert!(matches!(err, Error::UnexpectedEof { .. }));
    }

    #[test]
    fn rejects_reserved_label_type() {
        let data = b"\x40abc";
        let err = NameParser::new(data).parse_name(0).unwrap_err();
        assert!(matches!(err, Error::InvalidLabelType { value: 0x40, .. }));
    }

    #[test]
    fn rejects_pointer_chain_over_the_jump_cap() {
        // A root label followed by a long chain of pointers, each
        // targeting the one before it. Every jump is strictly backward
        // and adds no label bytes, so only the jump counter can stop it.
        let mut data = vec![0u8];
        let mut last = 0usize;
        for _ in 0..200 {
            let here = data.len();
            data.push(0xC0 | (last >> 8) as u8);
            data.push(last as u8);
            last = here;
        }
        let err = NameParser::new(&data).parse_name(last).unwrap_err();
        assert!(matches!(err, Error::TooManyCompressionJumps { jumps } if jumps > 128));
    }

    #[test]
    fn rejects_name_over_255_bytes() {
        // Chain of backward pointers each adding a 63-byte label.
        let mut data = Vec::new();
        let label = [b'a'; 63];
        let mut starts = Vec::new();
        for i in 0..5 {
            starts.push(data.len());
            data.push(63);
            data.extend_from_slice(&label);
            if i == 0 {
                data.push(0);
            } else {
                let target = starts[i - 1];
                data.push(0xC0 | (target >> 8) as u8);
                data.push(target as u8);
            }
        }
        let err = NameParser::new(&data).parse_name(starts[4]).unwrap_err();
        assert!(matches!(err, Error::NameTooLong { .. }));
    }
}
