//! Filter option lists derived from the store.
//!
//! Each function returns the distinct values offered for one filter axis,
//! sorted. The "all" option is implicit and never included.

use std::collections::BTreeSet;

use event_map_models::{DataStore, DistanceBucket, Selection, Venue, VenueId};

/// A selectable venue: id and display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VenueOption {
    /// Value submitted as the venue selection.
    pub venue_id: VenueId,
    /// Text shown to the operator.
    pub name: String,
}

/// Distinct user age buckets.
#[must_use]
pub fn age_options(store: &DataStore) -> Vec<String> {
    sorted_unique(store.users().map(|user| user.age.clone()))
}

/// Distinct user districts.
#[must_use]
pub fn user_district_options(store: &DataStore) -> Vec<String> {
    sorted_unique(store.users().filter_map(|user| user.district.clone()))
}

/// Distinct venue districts.
#[must_use]
pub fn venue_district_options(store: &DataStore) -> Vec<String> {
    sorted_unique(store.venues().filter_map(|venue| venue.district.clone()))
}

/// Distinct event categories, lowercased.
#[must_use]
pub fn category_options(store: &DataStore) -> Vec<String> {
    sorted_unique(
        store
            .events()
            .iter()
            .map(|event| event.event_type.to_lowercase()),
    )
}

/// Distance buckets present among events with a positive distance.
#[must_use]
pub fn distance_options(store: &DataStore) -> Vec<DistanceBucket> {
    store
        .events()
        .iter()
        .filter_map(|event| event.distance_km)
        .filter(|km| *km > 0.0)
        .map(DistanceBucket::from_km)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Venues located in the selected venue district, ordered by id.
#[must_use]
pub fn venue_options(store: &DataStore, venue_district: &Selection<String>) -> Vec<VenueOption> {
    store
        .venues()
        .filter(|venue| venue_district_matches(venue, venue_district))
        .map(|venue| VenueOption {
            venue_id: venue.venue_id.clone(),
            name: venue.name.clone(),
        })
        .collect()
}

/// Returns `true` if `venue` lies in the selected district.
///
/// Venue markers outside the selection are dimmed rather than hidden.
#[must_use]
pub fn venue_district_matches(venue: &Venue, venue_district: &Selection<String>) -> bool {
    venue_district.matches_with(|district| venue.district.as_ref() == Some(district))
}

fn sorted_unique(values: impl Iterator<Item = String>) -> Vec<String> {
    values
        .filter(|value| !value.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
