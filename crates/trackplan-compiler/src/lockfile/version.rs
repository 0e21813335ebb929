//! Two-part lock-file versions and version negotiation.
//!
//! Lock entries carry a `"major.minor"` version string. Early releases of
//! the tool stored versions as bare integers; those are read as `{N, 0}`
//! and always re-serialized in the two-part form.

use std::fmt;

use serde::de::{Deserializer, Error as DeError};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// A two-part `major.minor` lock version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
}

impl Version {
    /// The version assigned when no prior entry exists.
    pub const INITIAL: Version = Version { major: 1, minor: 0 };

    /// Parses a version string.
    ///
    /// Missing or unparseable components fall back to major `1`, minor `0`.
    pub fn parse(text: &str) -> Self {
        let mut parts = text.splitn(2, '.');
        let major = parts
            .next()
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or(1);
        let minor = parts
            .next()
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or(0);
        Version { major, minor }
    }

    /// The next version after a detected content change.
    ///
    /// Every change is a minor bump; there is no major-bump path.
    pub fn bump(self) -> Self {
        Version {
            major: self.major,
            minor: self.minor + 1,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Accepts both the current string form and the legacy bare integer.
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Legacy(u64),
            Text(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Legacy(n) => Ok(Version {
                major: u32::try_from(n).map_err(DeError::custom)?,
                minor: 0,
            }),
            Repr::Text(text) => Ok(Version::parse(&text)),
        }
    }
}

/// Decides the next version for a lock record.
///
/// With no prior record the version is `1.0`. An unchanged hash keeps the
/// prior version (normalized to the two-part form); a changed hash bumps
/// the minor component by exactly one and preserves the major component.
pub fn negotiate(existing: Option<(&str, Version)>, new_hash: &str) -> Version {
    match existing {
        None => Version::INITIAL,
        Some((old_hash, version)) if old_hash == new_hash => version,
        Some((_, version)) => version.bump(),
    }
}
