#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Filter engine for the event map.
//!
//! Selects the users and events matching a [`FilterCriteria`] from a
//! [`DataStore`] snapshot. Both passes are pure functions of the store and
//! the criteria; the default criteria select everything.
//!
//! User-side "has an event in this category/at this venue" checks read the
//! store's full event list, never an already-filtered slice, so combining
//! user and event constraints cannot empty each other out.

pub mod facets;

use std::collections::BTreeSet;

use event_map_models::{DataStore, Event, FilterCriteria, User, UserId};

/// Returns the users matching the user-side criteria, ordered by id.
///
/// A user passes if:
/// - the age bucket matches
/// - the district equals the selected district (when one is set)
/// - every positive minimum category share is met
/// - with a category selected, the user has an event of that category
/// - with a venue selected, the user has an event at that venue
#[must_use]
pub fn filtered_users<'a>(store: &'a DataStore, criteria: &FilterCriteria) -> Vec<&'a User> {
    if criteria.is_unrestricted() {
        log::debug!("No user filters set, selecting all {} users", store.user_count());
        return store.users().collect();
    }

    let with_category = users_with_event(store, criteria.event_category.as_only(), |event, c| {
        event.is_category(c)
    });
    let with_venue = users_with_event(store, criteria.venue_id.as_only(), |event, v| {
        event.venue_id == *v
    });

    let users: Vec<&User> = store
        .users()
        .filter(|user| criteria.age.matches(&user.age))
        .filter(|user| {
            criteria
                .district
                .as_ref()
                .is_none_or(|district| user.district.as_ref() == Some(district))
        })
        .filter(|user| meets_category_shares(user, criteria))
        .filter(|user| {
            with_category
                .as_ref()
                .is_none_or(|ids| ids.contains(&user.user_id))
        })
        .filter(|user| {
            with_venue
                .as_ref()
                .is_none_or(|ids| ids.contains(&user.user_id))
        })
        .collect();

    log::debug!(
        "{} of {} users match the current filters",
        users.len(),
        store.user_count()
    );

    users
}

/// Returns the events matching all criteria, in store order.
///
/// An event passes if its user is among [`filtered_users`], its venue
/// exists, and the category, distance bucket, venue, and venue district
/// selections all match. Events without a distance only match when no
/// distance bucket is selected.
#[must_use]
pub fn filtered_events<'a>(store: &'a DataStore, criteria: &FilterCriteria) -> Vec<&'a Event> {
    if criteria.is_unrestricted() {
        log::debug!(
            "No event filters set, selecting all {} events",
            store.events().len()
        );
        return store
            .events()
            .iter()
            .filter(|event| {
                store.user(&event.user_id).is_some() && store.venue(&event.venue_id).is_some()
            })
            .collect();
    }

    let user_ids: BTreeSet<&UserId> = filtered_users(store, criteria)
        .into_iter()
        .map(|user| &user.user_id)
        .collect();

    let events: Vec<&Event> = store
        .events()
        .iter()
        .filter(|event| user_ids.contains(&event.user_id))
        .filter(|event| {
            let Some(venue) = store.venue(&event.venue_id) else {
                return false;
            };

            criteria
                .event_category
                .matches_with(|category| event.is_category(category))
                && criteria
                    .distance
                    .matches_with(|bucket| event.distance_bucket() == Some(*bucket))
                && criteria.venue_id.matches(&event.venue_id)
                && criteria
                    .venue_district
                    .matches_with(|district| venue.district.as_ref() == Some(district))
        })
        .collect();

    log::debug!(
        "{} of {} events match the current filters",
        events.len(),
        store.events().len()
    );

    events
}

fn meets_category_shares(user: &User, criteria: &FilterCriteria) -> bool {
    criteria
        .min_category_share
        .iter()
        .filter(|(_, min)| **min > 0.0)
        .all(|(category, min)| user.share_of(category) >= *min)
}

/// Ids of users with at least one event satisfying `predicate`, or `None`
/// when nothing is selected.
fn users_with_event<'a, T>(
    store: &'a DataStore,
    selected: Option<&T>,
    predicate: impl Fn(&Event, &T) -> bool,
) -> Option<BTreeSet<&'a UserId>> {
    selected.map(|value| {
        store
            .events()
            .iter()
            .filter(|event| predicate(event, value))
            .map(|event| &event.user_id)
            .collect()
    })
}
