//! Semantic version value types and range predicates.
//!
//! Versions order by major, then minor, then patch. Ranges are inclusive on
//! both bounds; an absent upper bound means "anything at or above min".
//! Richer constraint syntaxes (caret, exclusions) are deliberately not
//! supported; [`VersionRange`] is the extension point if they ever arrive.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize, de};

/// A `(major, minor, patch)` version triple with total ordering.
///
/// The derived ordering compares fields in declaration order, which is
/// exactly the required major/minor/patch precedence.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SemanticVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl SemanticVersion {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Error returned when a version string is not of the form `X.Y.Z`.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid semantic version '{input}'")]
pub struct ParseVersionError {
    pub input: String,
}

impl FromStr for SemanticVersion {
    type Err = ParseVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseVersionError {
            input: s.to_string(),
        };

        let mut parts = s.split('.');
        let major = parts.next().ok_or_else(err)?;
        let minor = parts.next().ok_or_else(err)?;
        let patch = parts.next().ok_or_else(err)?;
        if parts.next().is_some() {
            return Err(err());
        }

        // Reject empty components and stray signs ("1..0", "1.-2.0").
        let parse = |part: &str| -> Result<u32, ParseVersionError> {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(err());
            }
            part.parse::<u32>().map_err(|_| err())
        };

        Ok(Self {
            major: parse(major)?,
            minor: parse(minor)?,
            patch: parse(patch)?,
        })
    }
}

// Versions serialize as their "X.Y.Z" string form so they read naturally in
// manifests and survive bincode unchanged.
impl Serialize for SemanticVersion {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SemanticVersion {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// An inclusive version constraint: `min <= v` and, when present, `v <= max`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VersionRange {
    pub min: SemanticVersion,
    pub max: Option<SemanticVersion>,
}

impl VersionRange {
    pub const fn at_least(min: SemanticVersion) -> Self {
        Self { min, max: None }
    }

    pub const fn between(min: SemanticVersion, max: SemanticVersion) -> Self {
        Self {
            min,
            max: Some(max),
        }
    }

    /// Range-satisfaction predicate. Both bounds inclusive.
    pub fn satisfies(&self, version: SemanticVersion) -> bool {
        version >= self.min && self.max.is_none_or(|max| version <= max)
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) => write!(f, ">={}, <={}", self.min, max),
            None => write!(f, ">={}", self.min),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(major: u32, minor: u32, patch: u32) -> SemanticVersion {
        SemanticVersion::new(major, minor, patch)
    }

    #[test]
    fn ordering_compares_major_then_minor_then_patch() {
        assert!(v(2, 0, 0) > v(1, 9, 9));
        assert!(v(1, 2, 0) > v(1, 1, 9));
        assert!(v(1, 1, 2) > v(1, 1, 1));
        assert_eq!(v(1, 2, 3), v(1, 2, 3));
    }

    #[test]
    fn parse_and_display_round_trip() {
        let version: SemanticVersion = "1.4.2".parse().unwrap();
        assert_eq!(version, v(1, 4, 2));
        assert_eq!(version.to_string(), "1.4.2");
    }

    #[test]
    fn parse_rejects_malformed_input() {
        for input in ["", "1", "1.2", "1.2.3.4", "1..3", "a.b.c", "1.-2.3", "1.2.3-rc1"] {
            assert!(input.parse::<SemanticVersion>().is_err(), "accepted {input:?}");
        }
    }

    #[test]
    fn serde_uses_string_form() {
        let json = serde_json::to_string(&v(0, 9, 1)).unwrap();
        assert_eq!(json, "\"0.9.1\"");
        let back: SemanticVersion = serde_json::from_str(&json).unwrap();
        assert_eq!(back, v(0, 9, 1));
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let range = VersionRange::between(v(1, 0, 0), v(2, 0, 0));
        assert!(range.satisfies(v(1, 0, 0)));
        assert!(range.satisfies(v(2, 0, 0)));
        assert!(range.satisfies(v(1, 5, 0)));
        assert!(!range.satisfies(v(0, 9, 9)));
        assert!(!range.satisfies(v(2, 0, 1)));
    }

    #[test]
    fn open_range_has_no_upper_bound() {
        let range = VersionRange::at_least(v(1, 0, 0));
        assert!(range.satisfies(v(99, 0, 0)));
        assert!(!range.satisfies(v(0, 9, 9)));
    }
}
