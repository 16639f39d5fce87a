//! # Book Size Keys
//!
//! Administrators type book sizes with a human description in parentheses,
//! e.g. `"رقعی (14×20)"`. Every storage key and every lookup uses the
//! normalized form, `"رقعی"`.
//!
//! ## Normalization
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  "  رقعی (14×20)  "                                                     │
//! │        │                                                                │
//! │        ▼  trim whitespace                                               │
//! │  "رقعی (14×20)"                                                         │
//! │        │                                                                │
//! │        ▼  strip trailing balanced "( … )" or "（ … ）"                  │
//! │  "رقعی "                                                                │
//! │        │                                                                │
//! │        ▼  repeat until nothing changes                                  │
//! │  "رقعی"   ← BookSizeKey                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A name that is nothing but a parenthetical keeps it: stripping would leave
//! an empty key that collides with every other such name.
//!
//! ## Invariant
//! `normalize(normalize(x)) == normalize(x)` for every input.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use ts_rs::TS;

/// Normalized, storage-canonical identifier for a book trim size.
///
/// The only constructor is [`BookSizeKey::normalize`]; deserialization goes
/// through it as well.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, TS)]
#[ts(export)]
pub struct BookSizeKey(String);

impl BookSizeKey {
    /// Normalizes a raw administrator-entered book size name.
    ///
    /// ## Example
    /// ```rust
    /// use folio_core::BookSizeKey;
    ///
    /// let key = BookSizeKey::normalize("  رقعی (14×20) ");
    /// assert_eq!(key.as_str(), "رقعی");
    /// assert_eq!(BookSizeKey::normalize(key.as_str()), key);
    /// ```
    pub fn normalize(name: &str) -> Self {
        let mut current = name.trim();
        while let Some(stripped) = strip_trailing_parenthetical(current) {
            current = stripped;
        }
        BookSizeKey(current.to_string())
    }

    /// Returns the normalized name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the name normalized to nothing.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consumes the key, returning the normalized name.
    pub fn into_string(self) -> String {
        self.0
    }
}

/// Convenience free function mirroring [`BookSizeKey::normalize`].
pub fn normalize(name: &str) -> BookSizeKey {
    BookSizeKey::normalize(name)
}

/// Removes one trailing balanced parenthetical plus the whitespace before it.
///
/// Returns `None` when there is nothing to strip, or when stripping would
/// leave an empty name.
fn strip_trailing_parenthetical(name: &str) -> Option<&str> {
    let close = name.chars().next_back()?;
    if close != ')' && close != '）' {
        return None;
    }

    let mut depth = 0usize;
    for (idx, ch) in name.char_indices().rev() {
        match ch {
            ')' | '）' => depth += 1,
            '(' | '（' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    let rest = name[..idx].trim_end();
                    return if rest.is_empty() { None } else { Some(rest) };
                }
            }
            _ => {}
        }
    }

    // Unbalanced: a stray closing bracket is part of the name.
    None
}

impl fmt::Display for BookSizeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for BookSizeKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for BookSizeKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(BookSizeKey::normalize(&raw))
    }
}
