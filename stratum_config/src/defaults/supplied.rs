//! What the merged sources actually supplied.

use serde_yaml::Value;

/// A view of the merged source document at the member being defaulted.
///
/// Collections use it to tell an explicitly supplied empty value apart from
/// one no source mentioned. `Unknown` means no document is available, and
/// every judgement falls back to the value alone.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Supplied<'a> {
    /// No source document is available.
    #[default]
    Unknown,
    /// No source supplied the member.
    Absent,
    /// The tree the sources supplied for the member.
    Present(&'a Value),
}

impl<'a> Supplied<'a> {
    /// View over a whole merged document.
    #[must_use]
    pub const fn tree(document: &'a Value) -> Self {
        Self::Present(document)
    }

    /// The record member `name`.
    #[must_use]
    pub fn member(self, name: &str) -> Self {
        match self {
            Self::Present(Value::Mapping(map)) => map.get(name).map_or(Self::Absent, Self::Present),
            Self::Present(_) | Self::Absent => Self::Absent,
            Self::Unknown => Self::Unknown,
        }
    }

    /// The sequence element at `index`.
    #[must_use]
    pub fn element(self, index: usize) -> Self {
        match self {
            Self::Present(Value::Sequence(elements)) => {
                elements.get(index).map_or(Self::Absent, Self::Present)
            }
            Self::Present(_) | Self::Absent => Self::Absent,
            Self::Unknown => Self::Unknown,
        }
    }

    /// The map entry under `key`, given in its serialized form.
    #[must_use]
    pub fn entry(self, key: &Value) -> Self {
        match self {
            Self::Present(Value::Mapping(map)) => map.get(key).map_or(Self::Absent, Self::Present),
            Self::Present(_) | Self::Absent => Self::Absent,
            Self::Unknown => Self::Unknown,
        }
    }

    /// Whether a source supplied a non-null value, when that is known.
    #[must_use]
    pub fn is_present(self) -> Option<bool> {
        match self {
            Self::Unknown => None,
            Self::Absent => Some(false),
            Self::Present(value) => Some(!value.is_null()),
        }
    }
}
