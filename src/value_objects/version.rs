//! Document format version

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;
use thiserror::Error;

const INDEV_BIT: u32 = 1 << 31;

/// Errors raised when parsing a [`Version`] from text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionParseError {
    #[error("Invalid version '{input}': {source}")]
    InvalidNumber { input: String, source: ParseIntError },

    #[error("Invalid version '{0}': expected major.minor[.patch]")]
    WrongShape(String),
}

/// Version of the application that wrote a family document
///
/// Packs into a single 32-bit value: `major << 16 | minor << 8 | patch`, with
/// the "in development" flag stored in bit 31. A development build orders just
/// before the release carrying the same numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u32", from = "u32")]
pub struct Version {
    major: u8,
    minor: u8,
    patch: u8,
    indev: bool,
}

impl Version {
    /// Version 1.3
    pub const V1_3: Version = Version::new(1, 3, 0, false);

    /// Version written by this crate
    pub const CURRENT: Version = Version::V1_3;

    pub const fn new(major: u8, minor: u8, patch: u8, indev: bool) -> Self {
        Self {
            major,
            minor,
            patch,
            indev,
        }
    }

    pub fn major(&self) -> u8 {
        self.major
    }

    pub fn minor(&self) -> u8 {
        self.minor
    }

    pub fn patch(&self) -> u8 {
        self.patch
    }

    /// Whether this is a development build
    pub fn is_indev(&self) -> bool {
        self.indev
    }

    /// Packed value without the development flag
    pub fn value(&self) -> u32 {
        (self.major as u32) << 16 | (self.minor as u32) << 8 | self.patch as u32
    }

    /// Packed value including the development flag
    pub fn full_value(&self) -> u32 {
        if self.indev {
            self.value() | INDEV_BIT
        } else {
            self.value()
        }
    }

    /// Unpack a value produced by [`Version::full_value`]
    pub fn from_full_value(value: u32) -> Self {
        Self {
            major: (value >> 16) as u8,
            minor: (value >> 8) as u8,
            patch: value as u8,
            indev: value & INDEV_BIT != 0,
        }
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        // release (true) sorts after indev (false)
        self.value()
            .cmp(&other.value())
            .then_with(|| (!self.indev).cmp(&!other.indev))
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<Version> for u32 {
    fn from(version: Version) -> Self {
        version.full_value()
    }
}

impl From<u32> for Version {
    fn from(value: u32) -> Self {
        Version::from_full_value(value)
    }
}

/// Formats as `major.minor[.patch][d]`; the patch is omitted when zero
impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dev = if self.indev { "d" } else { "" };
        if self.patch != 0 {
            write!(f, "{}.{}.{}{}", self.major, self.minor, self.patch, dev)
        } else {
            write!(f, "{}.{}{}", self.major, self.minor, dev)
        }
    }
}

impl FromStr for Version {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (numbers, indev) = match s.strip_suffix('d') {
            Some(rest) => (rest, true),
            None => (s, false),
        };

        let parts = numbers
            .split('.')
            .map(|part| part.parse::<u8>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|source| VersionParseError::InvalidNumber {
                input: s.to_string(),
                source,
            })?;

        match parts.as_slice() {
            [major, minor] => Ok(Version::new(*major, *minor, 0, indev)),
            [major, minor, patch] => Ok(Version::new(*major, *minor, *patch, indev)),
            _ => Err(VersionParseError::WrongShape(s.to_string())),
        }
    }
}
