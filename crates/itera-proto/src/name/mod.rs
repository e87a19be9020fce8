mod label;
mod parse;

pub use label::{Label, LabelIter};
pub use parse::NameParser;

use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use smallvec::SmallVec;

use crate::error::Error;
use crate::{MAX_LABEL_LENGTH, MAX_NAME_LENGTH};

/// A fully-qualified domain name stored in uncompressed wire form:
/// length-prefixed labels terminated by the zero-length root label.
///
/// Most names fit in the inline buffer and never touch the heap.
#[derive(Debug, Clone)]
pub struct Name {
    wire: SmallVec<[u8; 64]>,
}

impl Name {
    /// The root name ".".
    pub fn root() -> Self {
        let mut wire = SmallVec::new();
        wire.push(0);
        Name { wire }
    }

    pub(crate) fn from_wire(wire: SmallVec<[u8; 64]>) -> Self {
        debug_assert_eq!(wire.last(), Some(&0));
        Name { wire }
    }

    /// The uncompressed wire encoding, including the trailing root label.
    #[inline]
    pub fn as_wire_bytes(&self) -> &[u8] {
        &self.wire
    }

    /// Encoded length in bytes.
    #[inline]
    pub fn wire_len(&self) -> usize {
        self.wire.len()
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.wire.len() == 1
    }

    /// Iterates the labels of this name, ending with the root label.
    pub fn labels(&self) -> LabelIter<'_> {
        LabelIter::new(&self.wire)
    }

    /// Number of labels excluding the root label.
    pub fn label_count(&self) -> usize {
        self.labels().filter(|l| !l.is_root()).count()
    }

    /// The name with its leftmost label removed, or `None` for the root.
    pub fn parent(&self) -> Option<Name> {
        if self.is_root() {
            return None;
        }
        let skip = self.wire[0] as usize + 1;
        let mut wire = SmallVec::new();
        wire.extend_from_slice(&self.wire[skip..]);
        Some(Name { wire })
    }

    /// True if `self` is equal to `ancestor` or falls under it.
    pub fn is_subdomain_of(&self, ancestor: &Name) -> bool {
        if ancestor.wire.len() > self.wire.len() {
            return false;
        }
        let tail = &self.wire[self.wire.len() - ancestor.wire.len()..];
        tail.eq_ignore_ascii_case(&ancestor.wire)
    }

    /// A copy with every label lowercased, for use as a lookup key.
    pub fn lowercased(&self) -> Name {
        let mut wire = self.wire.clone();
        wire.make_ascii_lowercase();
        Name { wire }
    }
}

impl PartialEq for Name {
    fn eq(&self, other: &Self) -> bool {
        self.wire.eq_ignore_ascii_case(&other.wire)
    }
}

impl Eq for Name {}

impl Hash for Name {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for &b in self.wire.iter() {
            state.write_u8(b.to_ascii_lowercase());
        }
    }
}

impl FromStr for Name {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "." || s.is_empty() {
            return Ok(Name::root());
        }
        let s = s.strip_suffix('.').unwrap_or(s);
        let mut wire: SmallVec<[u8; 64]> = SmallVec::new();
        for label in s.split('.') {
            if label.is_empty() {
                return Err(Error::EmptyLabel);
            }
            if label.len() > MAX_LABEL_LENGTH {
                return Err(Error::label_too_long(label.len(), 0));
            }
            for ch in label.chars() {
                if !ch.is_ascii_alphanumeric() && ch != '-' && ch != '_' && ch != '*' {
                    return Err(Error::InvalidLabelCharacter { ch });
                }
            }
            wire.push(label.len() as u8);
            wire.extend_from_slice(label.as_bytes());
        }
        wire.push(0);
        if wire.len() > MAX_NAME_LENGTH {
            return Err(Error::name_too_long(wire.len()));
        }
        Ok(Name { wire })
    }
}

impl std::fmt::Display for Name {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_root() {
            return f.write_str(".");
        }
        for label in self.labels() {
            if label.is_root() {
                break;
            }
            write!(f, "{label}.")?;
        }
        Ok(())
    }
}

impl Serialize for Name {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Name {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
