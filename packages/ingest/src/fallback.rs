//! Built-in sample datasets substituted for unavailable inputs.
//!
//! The documents are baked into the binary at compile time via
//! [`include_str!`] and pass through the same validators as configured
//! input, so they are guaranteed to have the shapes the engines expect.

use event_map_ingest_models::InputKind;
use event_map_models::{Event, User, Venue};
use serde_json::Value;

use crate::IngestError;
use crate::validate::{self, Validated};

const USERS: &str = include_str!("../fallback/users.geojson");
const VENUES: &str = include_str!("../fallback/venues.geojson");
const EVENTS: &str = include_str!("../fallback/events.json");

/// Returns the raw fallback document for `kind`.
///
/// # Errors
///
/// Returns [`IngestError::Fallback`] if the embedded document is not
/// valid JSON.
pub fn document(kind: InputKind) -> Result<Value, IngestError> {
    let raw = match kind {
        InputKind::Users => USERS,
        InputKind::Venues => VENUES,
        InputKind::Events => EVENTS,
    };

    serde_json::from_str(raw).map_err(|e| IngestError::Fallback {
        kind,
        message: e.to_string(),
    })
}

/// Returns the validated fallback users.
///
/// # Errors
///
/// Returns [`IngestError::Fallback`] if the embedded document is malformed.
pub fn users() -> Result<Validated<User>, IngestError> {
    validate::users_from_collection(&document(InputKind::Users)?).map_err(|e| {
        IngestError::Fallback {
            kind: InputKind::Users,
            message: e.to_string(),
        }
    })
}

/// Returns the validated fallback venues.
///
/// # Errors
///
/// Returns [`IngestError::Fallback`] if the embedded document is malformed.
pub fn venues() -> Result<Validated<Venue>, IngestError> {
    validate::venues_from_collection(&document(InputKind::Venues)?).map_err(|e| {
        IngestError::Fallback {
            kind: InputKind::Venues,
            message: e.to_string(),
        }
    })
}

/// Returns the validated fallback events.
///
/// # Errors
///
/// Returns [`IngestError::Fallback`] if the embedded document is malformed.
pub fn events() -> Result<Validated<Event>, IngestError> {
    validate::events_from_list(&document(InputKind::Events)?).map_err(|e| {
        IngestError::Fallback {
            kind: InputKind::Events,
            message: e.to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    #[test]
    fn every_fallback_record_is_valid() {
        let users = users().unwrap();
        let venues = venues().unwrap();
        let events = events().unwrap();

        assert_eq!(users.rejected, 0);
        assert_eq!(venues.rejected, 0);
        assert_eq!(events.rejected, 0);
        assert!(!users.records.is_empty());
        assert!(!venues.records.is_empty());
        assert!(!events.records.is_empty());
    }

    #[test]
    fn fallback_events_resolve() {
        let user_ids: BTreeSet<_> = users()
            .unwrap()
            .records
            .into_iter()
            .map(|u| u.user_id)
            .collect();
        let venue_ids: BTreeSet<_> = venues()
            .unwrap()
            .records
            .into_iter()
            .map(|v| v.venue_id)
            .collect();

        for event in events().unwrap().records {
            assert!(user_ids.contains(&event.user_id), "{}", event.user_id);
            assert!(venue_ids.contains(&event.venue_id), "{}", event.venue_id);
        }
    }
}
