//! Success-shaped reporting of platform capability gaps

use serde::{Deserialize, Serialize};

/// Outcome of an operation that some platforms cannot answer at all
///
/// `Unsupported` is not a failure: it tells the caller that this OS offers no
/// way to answer, which is different from an answer that went wrong and from
/// an empty answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Capability<T> {
    Supported(T),
    Unsupported(String),
}

impl<T> Capability<T> {
    /// Creates an unsupported outcome with a human-readable explanation
    pub fn unsupported(reason: impl Into<String>) -> Self {
        Capability::Unsupported(reason.into())
    }

    pub fn is_supported(&self) -> bool {
        matches!(self, Capability::Supported(_))
    }

    /// The supported value, if any
    pub fn supported(self) -> Option<T> {
        match self {
            Capability::Supported(value) => Some(value),
            Capability::Unsupported(_) => None,
        }
    }

    /// The explanation, if the capability is absent
    pub fn unsupported_reason(&self) -> Option<&str> {
        match self {
            Capability::Supported(_) => None,
            Capability::Unsupported(reason) => Some(reason),
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Capability<U> {
        match self {
            Capability::Supported(value) => Capability::Supported(f(value)),
            Capability::Unsupported(reason) => Capability::Unsupported(reason),
        }
    }
}
