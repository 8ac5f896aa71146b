use serde::{Deserialize, Serialize};

/// Preference names, as persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrefKey {
    Disabled,
    MaxWidth,
    MaxHeight,
}

impl PrefKey {
    pub const ALL: [PrefKey; 3] = [PrefKey::Disabled, PrefKey::MaxWidth, PrefKey::MaxHeight];

    pub fn as_str(self) -> &'static str {
        match self {
            PrefKey::Disabled => "extensions.shrunked.disabled",
            PrefKey::MaxWidth => "extensions.shrunked.maxWidth",
            PrefKey::MaxHeight => "extensions.shrunked.maxHeight",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        PrefKey::ALL.into_iter().find(|k| k.as_str() == s)
    }
}

/// A stored preference value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrefValue {
    Bool(bool),
    Int(i64),
}

impl PrefValue {
    pub fn as_bool(self) -> Option<bool> {
        match self {
            PrefValue::Bool(b) => Some(b),
            PrefValue::Int(_) => None,
        }
    }

    /// Positive integers that fit a dimension; anything else reads as unset.
    pub fn as_u32(self) -> Option<u32> {
        match self {
            PrefValue::Int(i) if i > 0 => u32::try_from(i).ok(),
            _ => None,
        }
    }
}

impl std::fmt::Display for PrefValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrefValue::Bool(b) => write!(f, "{b}"),
            PrefValue::Int(i) => write!(f, "{i}"),
        }
    }
}
