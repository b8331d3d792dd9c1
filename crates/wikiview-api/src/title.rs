//! Page title newtype

use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of a wiki page as returned by the API. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageTitle(String);

impl PageTitle {
    /// Returns `None` for empty or whitespace-only input.
    pub fn new(title: impl Into<String>) -> Option<Self> {
        let title = title.into();
        if title.trim().is_empty() {
            None
        } else {
            Some(Self(title))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for PageTitle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PageTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for PageTitle {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for PageTitle {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
