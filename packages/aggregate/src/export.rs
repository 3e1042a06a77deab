//! `GeoJSON` export of line bundles.
//!
//! Each segment becomes a `LineString` feature running from the user to
//! the bundle destination, carrying the segment's own properties and the
//! bundle-wide totals.

use std::collections::BTreeMap;

use event_map_models::catalog::event_type_color;
use event_map_models::{DestinationKey, LineBundle};
use geo::LineString;
use geojson::{Feature, FeatureCollection, Geometry, JsonObject};
use serde_json::Value;

/// Converts bundles into a `FeatureCollection` of `LineString` features.
///
/// Features are ordered by destination key, then segment order.
#[must_use]
pub fn bundles_to_geojson(bundles: &BTreeMap<DestinationKey, LineBundle>) -> FeatureCollection {
    let features = bundles
        .values()
        .flat_map(|bundle| {
            bundle.segments.iter().map(move |segment| {
                let line = LineString::from(vec![
                    (segment.origin.longitude, segment.origin.latitude),
                    (bundle.destination.longitude, bundle.destination.latitude),
                ]);

                let mut properties = JsonObject::new();
                properties.insert(
                    "userId".to_string(),
                    Value::from(segment.user_id.as_str()),
                );
                properties.insert(
                    "venueId".to_string(),
                    Value::from(bundle.venue_id.as_str()),
                );
                properties.insert(
                    "eventType".to_string(),
                    Value::from(segment.event_type.as_str()),
                );
                properties.insert("visitCount".to_string(), Value::from(segment.visit_count));
                properties.insert("totalVisits".to_string(), Value::from(bundle.total_visits));
                properties.insert("lineCount".to_string(), Value::from(bundle.line_count));
                properties.insert(
                    "dominantEventType".to_string(),
                    Value::from(bundle.dominant_event_type.as_str()),
                );
                properties.insert(
                    "color".to_string(),
                    Value::from(event_type_color(&segment.event_type)),
                );

                Feature {
                    bbox: None,
                    geometry: Some(Geometry::new(geojson::Value::from(&line))),
                    id: None,
                    properties: Some(properties),
                    foreign_members: None,
                }
            })
        })
        .collect();

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}
