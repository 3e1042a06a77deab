#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! User, venue, event, and line bundle types for the event map.
//!
//! These are the validated, typed records produced by ingestion and read
//! by the filter and aggregation engines. Raw input shapes (`GeoJSON`
//! feature properties, event arrays) never leave the ingest crate; every
//! other crate works exclusively with the types defined here.

pub mod catalog;
pub mod criteria;
pub mod store;

use std::collections::BTreeMap;
use std::convert::Infallible;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

pub use criteria::{FilterCriteria, Selection};
pub use store::{Assembly, DataStore};

/// Upper bound (inclusive, km) of the [`DistanceBucket::Low`] bucket.
pub const LOW_DISTANCE_MAX_KM: f64 = 5.0;

/// Upper bound (inclusive, km) of the [`DistanceBucket::Medium`] bucket.
pub const MEDIUM_DISTANCE_MAX_KM: f64 = 10.0;

/// Primary key of a [`User`].
///
/// Raw identifiers may be strings or numbers; numeric identifiers are
/// stringified during ingestion so that `42` and `"42"` resolve to the
/// same user.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Creates a user identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl FromStr for UserId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

/// Primary key of a [`Venue`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VenueId(String);

impl VenueId {
    /// Creates a venue identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VenueId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VenueId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl FromStr for VenueId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

/// A `(longitude, latitude)` pair in WGS84 degrees.
///
/// Matches the `GeoJSON` position order. Use [`Coordinates::is_valid`]
/// before handing a point to anything that needs a real location.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinates {
    /// Longitude in degrees, `-180..=180`.
    pub longitude: f64,
    /// Latitude in degrees, `-90..=90`.
    pub latitude: f64,
}

impl Coordinates {
    /// Creates a coordinate pair from `GeoJSON` order (`lon`, `lat`).
    #[must_use]
    pub const fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// Returns `true` if both components are finite and within the valid
    /// geographic range.
    #[must_use]
    pub fn is_valid(self) -> bool {
        self.longitude.is_finite()
            && self.latitude.is_finite()
            && (-180.0..=180.0).contains(&self.longitude)
            && (-90.0..=90.0).contains(&self.latitude)
    }

    /// Returns the stable string key used to group events by destination.
    ///
    /// Two venues at identical coordinates produce the same key. Negative
    /// zero is folded into zero.
    #[must_use]
    pub fn destination_key(self) -> DestinationKey {
        let latitude = self.latitude + 0.0;
        let longitude = self.longitude + 0.0;
        DestinationKey(format!("{latitude},{longitude}"))
    }
}

/// Destination coordinate serialized as `"lat,lng"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DestinationKey(String);

impl DestinationKey {
    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DestinationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Categorical grouping of a travel distance.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DistanceBucket {
    /// Up to and including 5 km.
    Low,
    /// Over 5 km, up to and including 10 km.
    Medium,
    /// Over 10 km.
    High,
}

impl DistanceBucket {
    /// Buckets a distance in kilometers.
    ///
    /// Values that compare false against both thresholds (`NaN`) fall
    /// into [`Self::High`].
    #[must_use]
    pub fn from_km(km: f64) -> Self {
        if km <= LOW_DISTANCE_MAX_KM {
            Self::Low
        } else if km <= MEDIUM_DISTANCE_MAX_KM {
            Self::Medium
        } else {
            Self::High
        }
    }

    /// Human-readable label shown in the distance filter.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Düşük (0-5 km)",
            Self::Medium => "Orta (5-10 km)",
            Self::High => "Yüksek (10+ km)",
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Low, Self::Medium, Self::High]
    }
}

/// A user location with demographic and activity attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user identifier.
    pub user_id: UserId,
    /// Home location.
    pub coordinates: Coordinates,
    /// Age bucket label (e.g. `"25-34"`).
    pub age: String,
    /// Neighbourhood district.
    pub district: Option<String>,
    /// Average number of events per month, used as heatmap intensity.
    pub monthly_avg_event_count: f64,
    /// Share of the user's events per category, each in `0.0..=1.0`.
    pub event_type_distribution: BTreeMap<String, f64>,
}

impl User {
    /// Returns this user's share for `category`, or `0.0` if the category
    /// is absent from the distribution.
    #[must_use]
    pub fn share_of(&self, category: &str) -> f64 {
        self.event_type_distribution
            .get(category)
            .copied()
            .unwrap_or(0.0)
    }
}

/// A venue that hosts events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Venue {
    /// Unique venue identifier.
    pub venue_id: VenueId,
    /// Venue location.
    pub coordinates: Coordinates,
    /// Display name.
    pub name: String,
    /// Street address.
    pub address: Option<String>,
    /// Neighbourhood district.
    pub district: Option<String>,
    /// Average number of events per month.
    pub monthly_avg_event_count: Option<f64>,
}

/// A connection between a user and a venue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// The attending user.
    pub user_id: UserId,
    /// The hosting venue.
    pub venue_id: VenueId,
    /// Event category label (e.g. `"Konser"`).
    pub event_type: String,
    /// Number of visits, used as line weight.
    pub visit_count: f64,
    /// Travel distance in kilometers.
    pub distance_km: Option<f64>,
}

impl Event {
    /// Returns the distance bucket, or `None` if the distance is unknown.
    #[must_use]
    pub fn distance_bucket(&self) -> Option<DistanceBucket> {
        self.distance_km.map(DistanceBucket::from_km)
    }

    /// Case-insensitive comparison of this event's category.
    #[must_use]
    pub fn is_category(&self, category: &str) -> bool {
        self.event_type.to_lowercase() == category.to_lowercase()
    }
}

/// One origin of a [`LineBundle`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    /// The user the line starts from.
    pub user_id: UserId,
    /// The user's location.
    pub origin: Coordinates,
    /// Visit count of the contributing event.
    pub visit_count: f64,
    /// Category of the contributing event.
    pub event_type: String,
}

/// All lines terminating at one destination coordinate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineBundle {
    /// First venue seen at this destination.
    pub venue_id: VenueId,
    /// Destination location shared by every segment.
    pub destination: Coordinates,
    /// Contributing events in input order.
    pub segments: Vec<Segment>,
    /// Sum of segment visit counts.
    pub total_visits: f64,
    /// Number of segments.
    pub line_count: usize,
    /// Category with the highest summed visit count.
    pub dominant_event_type: String,
}
