//! Immutable snapshot of the ingested users, venues, and events.
//!
//! A [`DataStore`] is built once per ingestion pass and never mutated
//! afterwards. Re-ingestion builds a new store; results computed from an
//! older store are the caller's to discard.

use std::collections::BTreeMap;

use crate::{Coordinates, Event, User, UserId, Venue, VenueId};

/// Users and venues by id, plus every event whose endpoints both resolve.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataStore {
    users: BTreeMap<UserId, User>,
    venues: BTreeMap<VenueId, Venue>,
    events: Vec<Event>,
}

/// Result of [`DataStore::assemble`].
#[derive(Debug, Clone, PartialEq)]
pub struct Assembly {
    /// The assembled store.
    pub store: DataStore,
    /// Events dropped because their user or venue does not exist.
    pub dangling_events: u64,
    /// Accepted events whose missing distance was derived.
    pub derived_distances: u64,
}

impl DataStore {
    /// Builds a store from validated records, applying the referential
    /// integrity gate.
    ///
    /// Later records replace earlier ones with the same id. An event is kept
    /// only if both its user and its venue exist; dangling events are
    /// dropped and counted. Accepted events without a distance get
    /// `derive_distance(user, venue)` when it returns a value.
    #[must_use]
    pub fn assemble(
        users: Vec<User>,
        venues: Vec<Venue>,
        events: Vec<Event>,
        derive_distance: impl Fn(Coordinates, Coordinates) -> Option<f64>,
    ) -> Assembly {
        let mut user_map = BTreeMap::new();
        for user in users {
            if let Some(previous) = user_map.insert(user.user_id.clone(), user) {
                log::debug!("Duplicate user {} replaced", previous.user_id);
            }
        }

        let mut venue_map = BTreeMap::new();
        for venue in venues {
            if let Some(previous) = venue_map.insert(venue.venue_id.clone(), venue) {
                log::debug!("Duplicate venue {} replaced", previous.venue_id);
            }
        }

        let mut dangling_events = 0u64;
        let mut derived_distances = 0u64;
        let mut accepted = Vec::with_capacity(events.len());

        for mut event in events {
            let (Some(user), Some(venue)) = (
                user_map.get(&event.user_id),
                venue_map.get(&event.venue_id),
            ) else {
                log::debug!(
                    "Dropping event {} -> {}: unknown user or venue",
                    event.user_id,
                    event.venue_id
                );
                dangling_events += 1;
                continue;
            };

            if event.distance_km.is_none() {
                event.distance_km = derive_distance(user.coordinates, venue.coordinates);
                if event.distance_km.is_some() {
                    derived_distances += 1;
                }
            }

            accepted.push(event);
        }

        Assembly {
            store: Self {
                users: user_map,
                venues: venue_map,
                events: accepted,
            },
            dangling_events,
            derived_distances,
        }
    }

    /// Looks up a user by id.
    #[must_use]
    pub fn user(&self, user_id: &UserId) -> Option<&User> {
        self.users.get(user_id)
    }

    /// Looks up a venue by id.
    #[must_use]
    pub fn venue(&self, venue_id: &VenueId) -> Option<&Venue> {
        self.venues.get(venue_id)
    }

    /// Returns all users, ordered by id.
    pub fn users(&self) -> impl Iterator<Item = &User> {
        self.users.values()
    }

    /// Returns all venues, ordered by id.
    pub fn venues(&self) -> impl Iterator<Item = &Venue> {
        self.venues.values()
    }

    /// Returns every accepted event in input order.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Number of users in the store.
    #[must_use]
    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    /// Number of venues in the store.
    #[must_use]
    pub fn venue_count(&self) -> usize {
        self.venues.len()
    }
}
