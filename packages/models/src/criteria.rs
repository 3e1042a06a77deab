//! Filter criteria shared by the filter engine and its callers.

use std::collections::BTreeMap;
use std::str::FromStr;

use crate::{DistanceBucket, VenueId};

/// Wildcard-or-value selection for a single filter axis.
///
/// Parses `"all"` (case-insensitive) as [`Selection::All`]; anything else
/// is parsed as the inner value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection<T> {
    /// No constraint on this axis.
    All,
    /// Only records matching this value pass.
    Only(T),
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Self::All
    }
}

impl<T> Selection<T> {
    /// Returns `true` if this selection does not constrain anything.
    #[must_use]
    pub const fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// Returns the selected value, if any.
    #[must_use]
    pub const fn as_only(&self) -> Option<&T> {
        match self {
            Self::All => None,
            Self::Only(value) => Some(value),
        }
    }

    /// Returns `true` for [`Selection::All`], otherwise applies `predicate`
    /// to the selected value.
    pub fn matches_with(&self, predicate: impl FnOnce(&T) -> bool) -> bool {
        match self {
            Self::All => true,
            Self::Only(value) => predicate(value),
        }
    }
}

impl<T: PartialEq> Selection<T> {
    /// Returns `true` if `value` satisfies this selection.
    pub fn matches(&self, value: &T) -> bool {
        self.matches_with(|selected| selected == value)
    }
}

impl<T: FromStr> FromStr for Selection<T> {
    type Err = T::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            trimmed.parse().map(Self::Only)
        }
    }
}

impl<T: std::fmt::Display> std::fmt::Display for Selection<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(value) => value.fmt(f),
        }
    }
}

/// The operator's current filter selections.
///
/// [`FilterCriteria::default`] is the least restrictive value on every
/// axis, so a default filter pass returns the full store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    /// User age bucket.
    pub age: Selection<String>,
    /// User district. Compared exactly when set; `"all"` is not a wildcard
    /// on this axis.
    pub district: Option<String>,
    /// Event category, compared case-insensitively.
    pub event_category: Selection<String>,
    /// Event distance bucket.
    pub distance: Selection<DistanceBucket>,
    /// Destination venue.
    pub venue_id: Selection<VenueId>,
    /// Destination venue district.
    pub venue_district: Selection<String>,
    /// Minimum share per category in a user's event type distribution.
    pub min_category_share: BTreeMap<String, f64>,
}

impl FilterCriteria {
    /// Returns `true` if no axis constrains anything.
    #[must_use]
    pub fn is_unrestricted(&self) -> bool {
        self.age.is_all()
            && self.district.is_none()
            && self.event_category.is_all()
            && self.distance.is_all()
            && self.venue_id.is_all()
            && self.venue_district.is_all()
            && self.min_category_share.values().all(|min| *min <= 0.0)
    }
}
