#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Event map data ingestion.
//!
//! Reads the three raw inputs (user features, venue features, event list),
//! validates them element by element, substitutes the built-in fallback
//! dataset for any input that cannot be fetched or has the wrong shape, and
//! assembles a fresh [`DataStore`] behind the referential-integrity gate.

pub mod config;
pub mod distance;
pub mod fallback;
pub mod fetch;
pub mod validate;

use std::time::Duration;

use event_map_ingest_models::{IngestConfig, IngestReport, InputKind, InputOrigin, InputReport};
use event_map_models::DataStore;
use serde_json::Value;
use thiserror::Error;
use validate::{ShapeError, Validated};

/// Errors that can occur during ingestion.
///
/// Only [`IngestError::Fallback`] and errors raised while loading the
/// configuration or building the HTTP client are fatal; every other variant
/// is caught per input and answered with fallback data.
#[derive(Debug, Error)]
pub enum IngestError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("Request to {url} failed with status {status}")]
    Status {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },

    /// File I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration could not be parsed.
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    /// The document does not have the expected container shape.
    #[error("Shape error: {0}")]
    Shape(#[from] ShapeError),

    /// The embedded fallback dataset is unusable.
    #[error("Fallback {kind} data is invalid: {message}")]
    Fallback {
        /// Which fallback dataset failed.
        kind: InputKind,
        /// Description of what went wrong.
        message: String,
    },
}

/// Per-input fetch outcomes handed to [`ingest_raw`].
#[derive(Debug)]
pub struct RawInputs {
    /// User `FeatureCollection` document or the reason it is unavailable.
    pub users: Result<Value, IngestError>,
    /// Venue `FeatureCollection` document or the reason it is unavailable.
    pub venues: Result<Value, IngestError>,
    /// Event list document or the reason it is unavailable.
    pub events: Result<Value, IngestError>,
}

/// Result of a complete ingestion pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Ingestion {
    /// Fresh store holding the accepted records.
    pub store: DataStore,
    /// What happened to each input.
    pub report: IngestReport,
}

/// Builds the HTTP client used for URL inputs.
///
/// # Errors
///
/// Returns [`IngestError::Http`] if the client cannot be constructed.
pub fn build_client(config: &IngestConfig) -> Result<reqwest::Client, IngestError> {
    let mut builder = reqwest::Client::builder();
    if let Some(secs) = config.request_timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    Ok(builder.build()?)
}

/// Fetches all three inputs concurrently and ingests them.
///
/// A failed fetch only affects its own input, which falls back to the
/// built-in dataset.
///
/// # Errors
///
/// Returns [`IngestError`] only if a fallback dataset is needed and is
/// itself invalid.
pub async fn ingest(
    client: &reqwest::Client,
    config: &IngestConfig,
) -> Result<Ingestion, IngestError> {
    let (users, venues, events) = futures::join!(
        fetch::fetch_json(client, config.location(InputKind::Users)),
        fetch::fetch_json(client, config.location(InputKind::Venues)),
        fetch::fetch_json(client, config.location(InputKind::Events)),
    );

    ingest_raw(RawInputs {
        users,
        venues,
        events,
    })
}

/// Validates already-fetched inputs and assembles the store.
///
/// # Errors
///
/// Returns [`IngestError`] only if a fallback dataset is needed and is
/// itself invalid.
pub fn ingest_raw(raw: RawInputs) -> Result<Ingestion, IngestError> {
    let (users, users_report) = resolve(
        InputKind::Users,
        raw.users,
        validate::users_from_collection,
        fallback::users,
    )?;
    let (venues, venues_report) = resolve(
        InputKind::Venues,
        raw.venues,
        validate::venues_from_collection,
        fallback::venues,
    )?;
    let (events, events_report) = resolve(
        InputKind::Events,
        raw.events,
        validate::events_from_list,
        fallback::events,
    )?;

    let assembly = DataStore::assemble(users, venues, events, distance::haversine_km);

    log::info!(
        "Ingested {} users, {} venues, {} events ({} dangling dropped)",
        assembly.store.user_count(),
        assembly.store.venue_count(),
        assembly.store.events().len(),
        assembly.dangling_events,
    );

    Ok(Ingestion {
        store: assembly.store,
        report: IngestReport {
            users: users_report,
            venues: venues_report,
            events: events_report,
            dangling_events: assembly.dangling_events,
            derived_distances: assembly.derived_distances,
        },
    })
}

fn resolve<T>(
    kind: InputKind,
    raw: Result<Value, IngestError>,
    validate: fn(&Value) -> Result<Validated<T>, ShapeError>,
    fallback: fn() -> Result<Validated<T>, IngestError>,
) -> Result<(Vec<T>, InputReport), IngestError> {
    let (validated, origin) = match raw.and_then(|doc| validate(&doc).map_err(IngestError::from)) {
        Ok(validated) => (validated, InputOrigin::Fetched),
        Err(e) => {
            log::warn!("Could not load {kind} ({e}), using fallback data");
            (
                fallback()?,
                InputOrigin::Fallback {
                    reason: e.to_string(),
                },
            )
        }
    };

    let report = InputReport {
        kind,
        origin,
        accepted: validated.records.len() as u64,
        rejected: validated.rejected,
    };

    Ok((validated.records, report))
}

#[cfg(test)]
mod tests {
    use event_map_ingest_models::DataLocation;
    use event_map_models::{DistanceBucket, UserId, VenueId};
    use serde_json::json;

    use super::*;

    fn users_doc() -> Value {
        json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": [29.0263, 40.9903] },
                "properties": {
                    "user_properties": {
                        "userId": "u1",
                        "age": "25-34",
                        "u_neighbourhood_district": "Kadıköy"
                    },
                    "activity_properties": { "u_monthly_avg_event_count": 3 }
                }
            }]
        })
    }

    fn venues_doc() -> Value {
        json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": [29.03, 40.988] },
                "properties": {
                    "venue_properties": {
                        "venueId": "v1",
                        "name": "Hall",
                        "v_neighbourhood_district": "Kadıköy"
                    }
                }
            }]
        })
    }

    fn events_doc() -> Value {
        json!([
            { "userId": "u1", "venueId": "v1", "eventType": "Konser", "visitCount": 2, "distance": 3 },
            { "userId": "u1", "venueId": "v2", "eventType": "Konser", "visitCount": 1, "distance": 1 }
        ])
    }

    #[test]
    fn ingests_valid_inputs() {
        let ingestion = ingest_raw(RawInputs {
            users: Ok(users_doc()),
            venues: Ok(venues_doc()),
            events: Ok(events_doc()),
        })
        .unwrap();

        let store = &ingestion.store;
        assert_eq!(store.user_count(), 1);
        assert_eq!(store.venue_count(), 1);
        assert_eq!(store.events().len(), 1);
        assert_eq!(
            store.events()[0].distance_bucket(),
            Some(DistanceBucket::Low)
        );
        assert!(ingestion.report.fallback_inputs().is_empty());
        assert_eq!(ingestion.report.events.accepted, 2);
        assert_eq!(ingestion.report.dangling_events, 1);
    }

    #[test]
    fn dangling_events_never_survive() {
        let ingestion = ingest_raw(RawInputs {
            users: Ok(users_doc()),
            venues: Ok(venues_doc()),
            events: Ok(events_doc()),
        })
        .unwrap();

        assert!(
            ingestion
                .store
                .events()
                .iter()
                .all(|e| e.venue_id != VenueId::new("v2"))
        );
    }

    #[test]
    fn transport_failure_falls_back_for_that_input_only() {
        let ingestion = ingest_raw(RawInputs {
            users: Ok(users_doc()),
            venues: Err(IngestError::Status {
                url: "https://example.org/places.geojson".to_string(),
                status: 503,
            }),
            events: Ok(events_doc()),
        })
        .unwrap();

        assert_eq!(ingestion.report.fallback_inputs(), vec![InputKind::Venues]);
        assert_eq!(ingestion.store.user_count(), 1);
        assert_eq!(
            ingestion.store.venue_count(),
            fallback::venues().unwrap().records.len()
        );
        assert!(
            ingestion
                .store
                .user(&UserId::new("u1"))
                .is_some_and(|u| u.age == "25-34")
        );
    }

    #[test]
    fn shape_failure_falls_back() {
        let ingestion = ingest_raw(RawInputs {
            users: Ok(json!({ "type": "Feature" })),
            venues: Ok(venues_doc()),
            events: Ok(json!({ "events": [] })),
        })
        .unwrap();

        assert_eq!(
            ingestion.report.fallback_inputs(),
            vec![InputKind::Users, InputKind::Events]
        );
        assert!(matches!(
            ingestion.report.users.origin,
            InputOrigin::Fallback { .. }
        ));
    }

    #[test]
    fn derives_missing_distance() {
        let ingestion = ingest_raw(RawInputs {
            users: Ok(users_doc()),
            venues: Ok(venues_doc()),
            events: Ok(json!([
                { "userId": "u1", "venueId": "v1", "eventType": "Sergi", "visitCount": 1 }
            ])),
        })
        .unwrap();

        assert_eq!(ingestion.report.derived_distances, 1);
        let distance = ingestion.store.events()[0].distance_km.unwrap();
        assert!(distance > 0.0 && distance < 1.0, "{distance}");
    }

    #[test]
    fn all_inputs_failing_yields_fallback_store() {
        let ingestion = ingest_raw(RawInputs {
            users: Err(IngestError::Shape(ShapeError::NotAnObject)),
            venues: Err(IngestError::Shape(ShapeError::NotAnObject)),
            events: Err(IngestError::Shape(ShapeError::NotAnArray)),
        })
        .unwrap();

        assert_eq!(ingestion.report.fallback_inputs().len(), 3);
        assert_eq!(ingestion.report.dangling_events, 0);
        assert_eq!(
            ingestion.store.events().len(),
            fallback::events().unwrap().records.len()
        );
    }

    #[tokio::test]
    async fn ingest_reads_files_and_isolates_failures() {
        let dir = tempfile::tempdir().unwrap();
        let users_path = dir.path().join("users.geojson");
        let events_path = dir.path().join("events.json");
        tokio::fs::write(&users_path, users_doc().to_string())
            .await
            .unwrap();
        tokio::fs::write(&events_path, events_doc().to_string())
            .await
            .unwrap();

        let config = IngestConfig {
            users: DataLocation::File { path: users_path },
            venues: DataLocation::File {
                path: dir.path().join("places.geojson"),
            },
            events: DataLocation::File { path: events_path },
            request_timeout_secs: Some(5),
        };

        let client = build_client(&config).unwrap();
        let ingestion = ingest(&client, &config).await.unwrap();

        assert_eq!(ingestion.report.fallback_inputs(), vec![InputKind::Venues]);
        assert_eq!(ingestion.report.users.origin, InputOrigin::Fetched);
        assert_eq!(ingestion.store.user_count(), 1);
    }
}
