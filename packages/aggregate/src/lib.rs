#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Aggregation of filtered events into per-destination line bundles.
//!
//! Events are grouped by the coordinate string of their venue, so venues
//! sharing a location share a bundle. Each bundle keeps its segments in
//! input order along with the visit total and dominant event category.

pub mod export;
pub mod heatmap;

use std::collections::BTreeMap;

use event_map_models::{DataStore, DestinationKey, Event, LineBundle, Segment};

struct Accumulator {
    bundle: LineBundle,
    category_totals: Vec<(String, f64)>,
}

/// Groups `events` into line bundles keyed by destination coordinate.
///
/// Events whose user or venue cannot be found in `store` are skipped. The
/// result depends only on `store` and the order of `events`.
#[must_use]
pub fn aggregate(store: &DataStore, events: &[&Event]) -> BTreeMap<DestinationKey, LineBundle> {
    let mut accumulators: BTreeMap<DestinationKey, Accumulator> = BTreeMap::new();

    for event in events {
        let (Some(user), Some(venue)) = (store.user(&event.user_id), store.venue(&event.venue_id))
        else {
            log::debug!(
                "Skipping event {} -> {}: unknown user or venue",
                event.user_id,
                event.venue_id
            );
            continue;
        };

        let acc = accumulators
            .entry(venue.coordinates.destination_key())
            .or_insert_with(|| Accumulator {
                bundle: LineBundle {
                    venue_id: event.venue_id.clone(),
                    destination: venue.coordinates,
                    segments: Vec::new(),
                    total_visits: 0.0,
                    line_count: 0,
                    dominant_event_type: event.event_type.clone(),
                },
                category_totals: Vec::new(),
            });

        acc.bundle.segments.push(Segment {
            user_id: user.user_id.clone(),
            origin: user.coordinates,
            visit_count: event.visit_count,
            event_type: event.event_type.clone(),
        });
        acc.bundle.total_visits += event.visit_count;
        acc.bundle.line_count += 1;

        match acc
            .category_totals
            .iter_mut()
            .find(|(category, _)| *category == event.event_type)
        {
            Some((_, total)) => *total += event.visit_count,
            None => acc
                .category_totals
                .push((event.event_type.clone(), event.visit_count)),
        }
    }

    accumulators
        .into_iter()
        .map(|(key, mut acc)| {
            if let Some(dominant) = dominant_category(&acc.category_totals) {
                acc.bundle.dominant_event_type = dominant.to_string();
            }
            (key, acc.bundle)
        })
        .collect()
}

/// Category with the highest total; the first seen wins ties.
fn dominant_category(totals: &[(String, f64)]) -> Option<&str> {
    let mut best: Option<(&str, f64)> = None;
    for (category, total) in totals {
        if best.is_none_or(|(_, max)| *total > max) {
            best = Some((category, *total));
        }
    }
    best.map(|(category, _)| category)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use event_map_models::{Coordinates, User, UserId, Venue, VenueId};

    use super::*;

    fn user(id: &str, lon: f64, lat: f64) -> User {
        User {
            user_id: UserId::new(id),
            coordinates: Coordinates::new(lon, lat),
            age: "25-34".to_string(),
            district: None,
            monthly_avg_event_count: 1.0,
            event_type_distribution: BTreeMap::new(),
        }
    }

    fn venue(id: &str, lon: f64, lat: f64) -> Venue {
        Venue {
            venue_id: VenueId::new(id),
            coordinates: Coordinates::new(lon, lat),
            name: id.to_uppercase(),
            address: None,
            district: None,
            monthly_avg_event_count: None,
        }
    }

    fn event(user_id: &str, venue_id: &str, event_type: &str, visit_count: f64) -> Event {
        Event {
            user_id: UserId::new(user_id),
            venue_id: VenueId::new(venue_id),
            event_type: event_type.to_string(),
            visit_count,
            distance_km: Some(1.0),
        }
    }

    fn store(events: Vec<Event>) -> DataStore {
        DataStore::assemble(
            vec![
                user("u1", 29.0, 41.0),
                user("u2", 29.1, 41.1),
                user("u3", 28.9, 40.9),
            ],
            vec![
                venue("v1", 29.03, 40.988),
                venue("v2", 28.99, 41.06),
                venue("v3", 29.03, 40.988),
            ],
            events,
            |_, _| None,
        )
        .store
    }

    fn all_events(store: &DataStore) -> Vec<&Event> {
        store.events().iter().collect()
    }

    #[test]
    fn single_event_bundle() {
        let store = store(vec![event("u1", "v1", "Konser", 2.0)]);
        let bundles = aggregate(&store, &all_events(&store));

        assert_eq!(bundles.len(), 1);
        let bundle = &bundles[&Coordinates::new(29.03, 40.988).destination_key()];
        assert!((bundle.total_visits - 2.0).abs() < f64::EPSILON);
        assert_eq!(bundle.line_count, 1);
        assert_eq!(bundle.dominant_event_type, "Konser");
    }

    #[test]
    fn dominant_type_by_summed_visits() {
        let store = store(vec![
            event("u1", "v1", "Konser", 5.0),
            event("u2", "v1", "Tiyatro", 3.0),
        ]);
        let bundles = aggregate(&store, &all_events(&store));
        let bundle = bundles.values().next().unwrap();

        assert!((bundle.total_visits - 8.0).abs() < f64::EPSILON);
        assert_eq!(bundle.dominant_event_type, "Konser");
    }

    #[test]
    fn first_seen_wins_ties() {
        let store = store(vec![
            event("u1", "v2", "Tiyatro", 2.0),
            event("u2", "v2", "Konser", 1.0),
            event("u3", "v2", "Konser", 1.0),
        ]);
        let bundles = aggregate(&store, &all_events(&store));
        assert_eq!(
            bundles.values().next().unwrap().dominant_event_type,
            "Tiyatro"
        );
    }

    #[test]
    fn zero_visits_still_name_a_category() {
        let store = store(vec![
            event("u1", "v2", "Sergi", 0.0),
            event("u2", "v2", "Konser", 0.0),
        ]);
        let bundles = aggregate(&store, &all_events(&store));
        assert_eq!(
            bundles.values().next().unwrap().dominant_event_type,
            "Sergi"
        );
    }

    #[test]
    fn venues_sharing_coordinates_share_a_bundle() {
        let store = store(vec![
            event("u1", "v1", "Konser", 1.0),
            event("u2", "v3", "Konser", 1.0),
        ]);
        let bundles = aggregate(&store, &all_events(&store));

        assert_eq!(bundles.len(), 1);
        let bundle = bundles.values().next().unwrap();
        assert_eq!(bundle.venue_id, VenueId::new("v1"));
        assert_eq!(bundle.line_count, 2);
    }

    #[test]
    fn signed_zero_coordinates_share_a_bundle() {
        let store = DataStore::assemble(
            vec![user("u1", 29.0, 41.0), user("u2", 29.1, 41.1)],
            vec![venue("v1", 29.0, 0.0), venue("v2", 29.0, -0.0)],
            vec![
                event("u1", "v1", "Konser", 1.0),
                event("u2", "v2", "Konser", 1.0),
            ],
            |_, _| None,
        )
        .store;
        let bundles = aggregate(&store, &all_events(&store));

        assert_eq!(bundles.len(), 1);
        assert_eq!(bundles.values().next().unwrap().line_count, 2);
    }

    #[test]
    fn totals_equal_segment_sums() {
        let store = store(vec![
            event("u1", "v1", "Konser", 4.0),
            event("u2", "v1", "Sergi", 2.5),
            event("u3", "v2", "Tiyatro", 1.0),
            event("u1", "v2", "Tiyatro", 3.0),
        ]);
        for bundle in aggregate(&store, &all_events(&store)).values() {
            let sum: f64 = bundle.segments.iter().map(|s| s.visit_count).sum();
            assert!((bundle.total_visits - sum).abs() < 1e-9);
            assert_eq!(bundle.line_count, bundle.segments.len());
        }
    }

    #[test]
    fn aggregation_is_idempotent() {
        let store = store(vec![
            event("u1", "v1", "Konser", 4.0),
            event("u2", "v2", "Sergi", 2.0),
            event("u3", "v1", "Tiyatro", 4.0),
        ]);
        let events = all_events(&store);
        assert_eq!(aggregate(&store, &events), aggregate(&store, &events));
    }

    #[test]
    fn skips_unresolvable_events() {
        let store = store(vec![event("u1", "v1", "Konser", 1.0)]);
        let stray = event("u9", "v1", "Konser", 7.0);
        let mut events = all_events(&store);
        events.push(&stray);

        let bundles = aggregate(&store, &events);
        assert!((bundles.values().next().unwrap().total_visits - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_input_yields_no_bundles() {
        let store = store(vec![]);
        assert!(aggregate(&store, &[]).is_empty());
    }
}
