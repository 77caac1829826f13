use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Opaque, globally unique name of a resource or binary.
///
/// Identifiers are URI-shaped strings, but the store never interprets them
/// beyond [`normalize`]. They compare and hash by their exact text, so two
/// spellings of the same resource only collide after normalization.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identifier(String);

impl Identifier {
    /// Create an identifier, rejecting empty strings and strings containing
    /// whitespace or control characters.
    pub fn new(value: impl Into<String>) -> Result<Self, TypeError> {
        let value = value.into();
        if value.is_empty() {
            return Err(TypeError::InvalidIdentifier {
                value,
                reason: "empty identifier".into(),
            });
        }
        if let Some(c) = value
            .chars()
            .find(|c| c.is_whitespace() || c.is_control())
        {
            return Err(TypeError::InvalidIdentifier {
                reason: format!("contains forbidden character {c:?}"),
                value,
            });
        }
        Ok(Self(value))
    }

    /// Create an identifier from a compile-time constant.
    ///
    /// # Panics
    ///
    /// Panics if `value` is not a valid identifier.
    pub fn from_static(value: &'static str) -> Self {
        match Self::new(value) {
            Ok(id) => id,
            Err(e) => panic!("invalid static identifier: {e}"),
        }
    }

    /// The identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the identifier and return its text.
    pub fn into_string(self) -> String {
        self.0
    }

    /// This identifier with exactly one trailing `/` appended if it has none.
    ///
    /// Containers are addressed with a trailing slash in containment
    /// statements, while their storage key is the normalized form without one.
    pub fn with_trailing_slash(&self) -> Self {
        if self.0.ends_with('/') {
            self.clone()
        } else {
            Self(format!("{}/", self.0))
        }
    }

    /// Append a decimal number to the identifier text.
    ///
    /// Digits never introduce forbidden characters, so the result is always
    /// valid. Used by identifier generation.
    pub fn with_suffix(&self, n: u64) -> Self {
        Self(format!("{}{n}", self.0))
    }

    /// The normalized form of this identifier. See [`normalize`].
    pub fn normalized(&self) -> Self {
        normalize(self)
    }
}

/// Canonicalize an identifier so that equivalent spellings map to the same
/// storage key.
///
/// 1. The scheme (text before the first `:`) is lower-cased.
/// 2. A fragment (`#...`) is removed, unless nothing would remain.
/// 3. Trailing `/` characters are removed, unless that would leave an empty
///    string or a bare scheme such as `http:`.
///
/// The function is pure and idempotent.
pub fn normalize(id: &Identifier) -> Identifier {
    let raw = id.as_str();

    let base = match raw.find('#') {
        Some(0) | None => raw,
        Some(i) => &raw[..i],
    };

    let mut value = match base.find(':') {
        Some(i) if is_scheme(&base[..i]) => {
            let mut s = base[..i].to_ascii_lowercase();
            s.push_str(&base[i..]);
            s
        }
        _ => base.to_string(),
    };

    let stripped = value.trim_end_matches('/');
    if !stripped.is_empty() && !stripped.ends_with(':') {
        value.truncate(stripped.len());
    }

    Identifier(value)
}

fn is_scheme(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

impl fmt::Debug for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identifier({})", self.0)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Identifier {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Identifier {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for Identifier {
    type Error = TypeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Identifier> for String {
    fn from(id: Identifier) -> Self {
        id.0
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
