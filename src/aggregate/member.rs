//! Family member entity
//!
//! A member is identified solely by its [`MemberId`]; every other attribute is
//! a value that can be replaced over time through the owning family.

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::value_objects::{Gender, Image, MemberId, Period};

/// Descriptive data of a member
///
/// Every field except the gender is optional. The gender defaults to
/// [`Gender::Unknown`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberDetails {
    /// Profile picture
    pub image: Option<Image>,
    /// Family name
    pub name: Option<String>,
    /// Given name
    pub first_name: Option<String>,
    /// Gender, never absent
    #[serde(default)]
    pub gender: Gender,
    /// Date of birth
    pub birth_date: Option<NaiveDate>,
    /// Place of birth
    pub birth_location: Option<String>,
    /// Date of death
    pub death_date: Option<NaiveDate>,
    /// Place of death
    pub death_location: Option<String>,
}

/// An individual of the family graph
///
/// Equality, hashing and ordering only look at the identifier: two values with
/// the same ID are the same member, whatever their other attributes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FamilyMember {
    id: MemberId,
    #[serde(flatten)]
    details: MemberDetails,
}

impl FamilyMember {
    /// Create a member that does not belong to any family yet
    pub fn new(details: MemberDetails) -> Self {
        Self {
            id: MemberId::UNASSIGNED,
            details,
        }
    }

    /// Copy of this member carrying the given ID
    pub(crate) fn with_id(&self, id: MemberId) -> Self {
        Self {
            id,
            details: self.details.clone(),
        }
    }

    /// Copy of this member, same ID, with all data replaced by `details`
    ///
    /// This is how an edited member is prepared before being handed back to
    /// [`Family::update_member`](crate::Family::update_member).
    pub fn revised(&self, details: MemberDetails) -> Self {
        Self { id: self.id, details }
    }

    pub fn id(&self) -> MemberId {
        self.id
    }

    /// All descriptive data of the member
    pub fn details(&self) -> &MemberDetails {
        &self.details
    }

    pub fn into_details(self) -> MemberDetails {
        self.details
    }

    pub fn image(&self) -> Option<&Image> {
        self.details.image.as_ref()
    }

    pub fn name(&self) -> Option<&str> {
        self.details.name.as_deref()
    }

    pub fn first_name(&self) -> Option<&str> {
        self.details.first_name.as_deref()
    }

    pub fn gender(&self) -> Gender {
        self.details.gender
    }

    pub fn is_man(&self) -> bool {
        self.details.gender.is_man()
    }

    pub fn is_woman(&self) -> bool {
        self.details.gender.is_woman()
    }

    pub fn birth_date(&self) -> Option<NaiveDate> {
        self.details.birth_date
    }

    pub fn birth_location(&self) -> Option<&str> {
        self.details.birth_location.as_deref()
    }

    pub fn death_date(&self) -> Option<NaiveDate> {
        self.details.death_date
    }

    pub fn death_location(&self) -> Option<&str> {
        self.details.death_location.as_deref()
    }

    /// Whether both values carry exactly the same data, identifier included
    pub fn same_data(&self, other: &FamilyMember) -> bool {
        self.id == other.id && self.details == other.details
    }

    /// Age of the member in whole years
    ///
    /// Returns `None` when no birth date is known. A dead member's age is
    /// frozen at the death date; otherwise it is computed as of `reference`.
    /// The result is never negative.
    pub fn age(&self, reference: NaiveDate) -> Option<Period> {
        let birth = self.details.birth_date?;
        let current = self.details.death_date.unwrap_or(reference);

        let mut years = current.year() - birth.year();
        if (current.month(), current.day()) < (birth.month(), birth.day()) {
            years -= 1;
        }

        Some(Period::of_years(years.max(0) as u32))
    }

    /// Age as of the local calendar date
    pub fn current_age(&self) -> Option<Period> {
        self.age(Local::now().date_naive())
    }

    /// Compare birth dates; `None` if either one is unknown
    ///
    /// `Greater` means this member was born after `other`, i.e. is younger.
    pub fn compare_birthdays(&self, other: &FamilyMember) -> Option<Ordering> {
        let mine = self.details.birth_date?;
        let theirs = other.details.birth_date?;
        Some(mine.cmp(&theirs))
    }
}

impl PartialEq for FamilyMember {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for FamilyMember {}

impl Hash for FamilyMember {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for FamilyMember {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FamilyMember {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

/// `"{first name} {name}"`, with `?` standing for each missing part
impl fmt::Display for FamilyMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.first_name(), self.name()) {
            (None, None) => write!(f, "?"),
            (first_name, name) => write!(f, "{} {}", first_name.unwrap_or("?"), name.unwrap_or("?")),
        }
    }
}
