//! Event keys naming independent notification channels.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of an event channel.
///
/// Keys are compared by value and are fully independent of each other: there
/// is no hierarchy and no pattern matching between them.
///
/// - `Name` is a plain string name (`"user.created"`).
/// - `Symbol` is a unique, symbol-like key. Each call to [`EventKey::symbol`]
///   yields a key that equals only itself (and its clones), whatever the
///   description.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKey {
    Name(Cow<'static, str>),
    Symbol {
        id: Uuid,
        description: Cow<'static, str>,
    },
}

impl EventKey {
    /// Create a named key.
    pub fn name(name: impl Into<Cow<'static, str>>) -> Self {
        Self::Name(name.into())
    }

    /// Create a fresh symbol key.
    ///
    /// Uses UUIDv7 for the identity; the description is only for display.
    pub fn symbol(description: impl Into<Cow<'static, str>>) -> Self {
        Self::Symbol {
            id: Uuid::now_v7(),
            description: description.into(),
        }
    }

    pub fn as_name(&self) -> Option<&str> {
        match self {
            Self::Name(name) => Some(name),
            Self::Symbol { .. } => None,
        }
    }

    pub fn is_symbol(&self) -> bool {
        matches!(self, Self::Symbol { .. })
    }
}

impl core::fmt::Display for EventKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Name(name) => f.write_str(name),
            Self::Symbol { description, .. } => write!(f, "Symbol({description})"),
        }
    }
}

impl From<&'static str> for EventKey {
    fn from(value: &'static str) -> Self {
        Self::Name(Cow::Borrowed(value))
    }
}

impl From<String> for EventKey {
    fn from(value: String) -> Self {
        Self::Name(Cow::Owned(value))
    }
}

impl From<&EventKey> for EventKey {
    fn from(value: &EventKey) -> Self {
        value.clone()
    }
}
