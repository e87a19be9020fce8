use std::borrow::Cow;

use crate::error::Error;
use crate::MAX_LABEL_LENGTH;

/// A single label of a domain name, borrowed from name storage where possible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label<'a> {
    bytes: Cow<'a, [u8]>,
}

impl<'a> Label<'a> {
    /// Wraps raw label bytes. Fails if the label is longer than 63 bytes.
    pub fn new(bytes: &'a [u8]) -> Result<Self, Error> {
        if bytes.len() > MAX_LABEL_LENGTH {
            return Err(Error::label_too_long(bytes.len(), 0));
        }
        Ok(Label {
            bytes: Cow::Borrowed(bytes),
        })
    }

    /// The root label, an empty sequence of bytes.
    pub fn root() -> Self {
        Label {
            bytes: Cow::Borrowed(&[]),
        }
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Case-insensitive comparison per RFC 1035 section 2.3.3.
    pub fn eq_ignore_case(&self, other: &Label<'_>) -> bool {
        self.bytes.eq_ignore_ascii_case(&other.bytes)
    }

    pub fn into_owned(self) -> Label<'static> {
        Label {
            bytes: Cow::Owned(self.bytes.into_owned()),
        }
    }
}

impl std::fmt::Display for Label<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for &b in self.bytes.iter() {
            if b.is_ascii_graphic() && b != b'.' && b != b'\\' {
                write!(f, "{}", b as char)?;
            } else {
                write!(f, "\\{b:03}")?;
            }
        }
        Ok(())
    }
}

/// Iterates over the labels stored in a name's wire representation,
/// including the trailing root label.
#[derive(Debug)]
pub struct LabelIter<'a> {
    wire: &'a [u8],
    pos: usize,
    done: bool,
}

impl<'a> LabelIter<'a> {
    pub(crate) fn new(wire: &'a [u8]) -> Self {
        LabelIter {
            wire,
            pos: 0,
            done: false,
        }
    }
}

impl<'a> Iterator for LabelIter<'a> {
    type Item = Label<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let len = *self.wire.get(self.pos)? as usize;
        if len == 0 {
            self.done = true;
            return Some(Label::root());
        }
        let start = self.pos + 1;
        let end = start + len;
        let bytes = self.wire.get(start..end)?;
        self.pos = end;
        Some(Label {
            bytes: Cow::Borrowed(bytes),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_oversized_labels() {
        let big = [b'a'; 64];
        assert!(Label::new(&big).is_err());
        assert!(Label::new(&big[..63]).is_ok());
    }

    #[test]
    fn compares_case_insensitively() {
        let a = Label::new(b"WWW").unwrap();
        let b = Label::new(b"www").unwrap();
        assert!(a.eq_ignore_case(&b));
    }

    #[test]
    fn iterates_wire_labels_with_root() {
        let wire = b"\x03www\x07example\x03com\x00";
        let labels: Vec<_> = LabelIter::new(wire).collect();
        assert_eq!(labels.len(), 4);
        assert_eq!(labels[0].as_bytes(), b"www");
        assert_eq!(labels[2].as_bytes(), b"com");
        assert!(labels[3].is_root());
    }

    #[test]
    fn display_escapes_non_printable() {
        let label = Label::new(b"a\x00b").unwrap();
        assert_eq!(label.to_string(), "a\\000b");
    }
}
