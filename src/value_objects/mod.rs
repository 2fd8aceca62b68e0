//! Family value objects
//!
//! Value objects are immutable types that represent concepts in the family domain.
//! They are compared by value rather than identity and encapsulate domain validation.

mod version;

pub use version::{Version, VersionParseError};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a member inside one family
///
/// Identifiers are handed out by the family's own counter. A member that has
/// not been admitted yet carries [`MemberId::UNASSIGNED`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(i64);

impl MemberId {
    /// Sentinel carried by members that do not belong to a family yet
    pub const UNASSIGNED: MemberId = MemberId(-1);

    /// Wrap a raw identifier
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Raw integer value
    pub const fn value(self) -> i64 {
        self.0
    }

    /// Whether a family has assigned this identifier
    pub const fn is_assigned(self) -> bool {
        self.0 >= 0
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for MemberId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

/// Unordered pair of partners
///
/// The smaller identifier is always stored first, so `(a, b)` and `(b, a)`
/// produce the same pair. A pair never holds the same member twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "[MemberId; 2]", into = "[MemberId; 2]")]
pub struct PartnerPair {
    low: MemberId,
    high: MemberId,
}

impl PartnerPair {
    /// Build the pair for two distinct members
    pub fn new(a: MemberId, b: MemberId) -> Option<Self> {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Some(Self { low: a, high: b }),
            std::cmp::Ordering::Greater => Some(Self { low: b, high: a }),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Smaller identifier of the pair
    pub fn low(&self) -> MemberId {
        self.low
    }

    /// Larger identifier of the pair
    pub fn high(&self) -> MemberId {
        self.high
    }

    /// Whether `id` is one of the two partners
    pub fn contains(&self, id: MemberId) -> bool {
        self.low == id || self.high == id
    }

    /// The partner opposite to `id`, if `id` is part of the pair
    pub fn other(&self, id: MemberId) -> Option<MemberId> {
        if id == self.low {
            Some(self.high)
        } else if id == self.high {
            Some(self.low)
        } else {
            None
        }
    }
}

impl TryFrom<[MemberId; 2]> for PartnerPair {
    type Error = &'static str;

    fn try_from([a, b]: [MemberId; 2]) -> Result<Self, Self::Error> {
        Self::new(a, b).ok_or("partners must be different")
    }
}

impl From<PartnerPair> for [MemberId; 2] {
    fn from(pair: PartnerPair) -> Self {
        [pair.low, pair.high]
    }
}

impl fmt::Display for PartnerPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <-> {}", self.low, self.high)
    }
}

/// Gender of a member; always a concrete value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    /// Not known or not recorded
    #[default]
    Unknown,
    /// A man
    Man,
    /// A woman
    Woman,
}

impl Gender {
    /// Numeric code used by document formats
    pub fn code(&self) -> u8 {
        match self {
            Gender::Unknown => 0,
            Gender::Man => 1,
            Gender::Woman => 2,
        }
    }

    /// Resolve a numeric code; unrecognised codes resolve to `Unknown`
    pub fn from_code(code: u8) -> Self {
        match code {
            1 => Gender::Man,
            2 => Gender::Woman,
            _ => Gender::Unknown,
        }
    }

    /// Get the string representation of the gender
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Unknown => "unknown",
            Gender::Man => "man",
            Gender::Woman => "woman",
        }
    }

    pub fn is_man(&self) -> bool {
        matches!(self, Gender::Man)
    }

    pub fn is_woman(&self) -> bool {
        matches!(self, Gender::Woman)
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Gender {
    type Err = std::convert::Infallible;

    /// Unrecognised values fall back to `Unknown` so a gender is never absent
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "man" | "male" | "m" => Gender::Man,
            "woman" | "female" | "f" | "w" => Gender::Woman,
            _ => Gender::Unknown,
        })
    }
}

/// A span of whole years, used for ages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Period {
    years: u32,
}

impl Period {
    /// Create a period of the given number of years
    pub fn of_years(years: u32) -> Self {
        Self { years }
    }

    /// Number of whole years
    pub fn years(&self) -> u32 {
        self.years
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.years {
            1 => write!(f, "1 year"),
            n => write!(f, "{n} years"),
        }
    }
}

/// Encoded profile picture of a member
///
/// The bytes are owned, so every copy of a member owns its own buffer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Image {
    /// Media type of the encoded bytes (e.g. "image/png")
    pub media_type: String,
    /// Encoded image data
    pub bytes: Vec<u8>,
}

impl Image {
    /// Create a new image
    pub fn new(media_type: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            media_type: media_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Size of the encoded data in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
