//! Key matching policy.
//!
//! Decides whether an object key is selected for deletion, given the
//! configured pattern and match mode.

use tracing::trace;

/// How the configured pattern is compared against object keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// The key equals the pattern.
    Full,
    /// The key contains the pattern.
    Any,
    /// The key starts with the pattern.
    Prefix,
    /// The key ends with the pattern.
    Suffix,
}

impl MatchMode {
    /// Pick the mode from the four input flags.
    ///
    /// The first enabled flag wins in the order full, any, prefix, suffix.
    /// Returns `None` when no flag is enabled, in which case no key matches.
    pub fn from_flags(full: bool, any: bool, prefix: bool, suffix: bool) -> Option<Self> {
        if full {
            Some(MatchMode::Full)
        } else if any {
            Some(MatchMode::Any)
        } else if prefix {
            Some(MatchMode::Prefix)
        } else if suffix {
            Some(MatchMode::Suffix)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeyMatcher {
    mode: Option<MatchMode>,
    pattern: String,
}

impl KeyMatcher {
    pub fn new(mode: Option<MatchMode>, pattern: impl Into<String>) -> Self {
        Self {
            mode,
            pattern: pattern.into(),
        }
    }

    pub fn mode(&self) -> Option<MatchMode> {
        self.mode
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Prefix that can be pushed down to ListObjectsV2.
    ///
    /// Only prefix matching can be evaluated by S3 itself.
    pub fn server_side_prefix(&self) -> Option<&str> {
        match self.mode {
            Some(MatchMode::Prefix) => Some(&self.pattern),
            _ => None,
        }
    }

    pub fn matches(&self, key: Option<&str>) -> bool {
        let Some(key) = key else {
            return false;
        };

        let pattern = self.pattern.as_str();
        let matched = match self.mode {
            Some(MatchMode::Full) => key == pattern,
            Some(MatchMode::Any) => key.contains(pattern),
            Some(MatchMode::Prefix) => key.starts_with(pattern),
            Some(MatchMode::Suffix) => key.ends_with(pattern),
            None => false,
        };

        if !matched {
            trace!(
                key = key,
                pattern = pattern,
                mode = ?self.mode,
                "object key does not match."
            );
        }

        matched
    }
}
