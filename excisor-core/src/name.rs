//! Validated declaration names.
//!
//! Names follow script identifier syntax: a letter, `_` or `$`, followed by
//! letters, digits, `_` or `$`. A [`NameSet`] is ordered, so iterating it gives
//! the deterministic removal order.

use std::borrow::Borrow;
use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ExcisorError, ExcisorResult};

/// Ordered, deduplicated set of declaration names.
pub type NameSet = BTreeSet<DeclarationName>;

/// A function or constant name known to be a valid identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DeclarationName(String);

impl DeclarationName {
    /// Validate and wrap an identifier.
    pub fn new(name: impl Into<String>) -> ExcisorResult<Self> {
        let name = name.into();
        if is_identifier(&name) {
            Ok(Self(name))
        } else {
            Err(ExcisorError::invalid_name(name))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeclarationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DeclarationName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for DeclarationName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for DeclarationName {
    type Error = ExcisorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DeclarationName> for String {
    fn from(name: DeclarationName) -> Self {
        name.0
    }
}

/// Whether `c` may appear inside an identifier.
#[inline]
pub fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

/// Whether `s` is a complete identifier.
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' || first == '$' => {
            chars.all(is_ident_char)
        }
        _ => false,
    }
}

/// Parse a list of raw names into a [`NameSet`], failing on the first invalid one.
pub fn parse_names<I, S>(raw: I) -> ExcisorResult<NameSet>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    raw.into_iter().map(DeclarationName::new).collect()
}
