//! Great-circle distance between user and venue coordinates.

use event_map_models::Coordinates;
use geo::{Distance, Haversine, Point};

/// Haversine distance in kilometers, or `None` if either point is out of
/// range.
#[must_use]
pub fn haversine_km(from: Coordinates, to: Coordinates) -> Option<f64> {
    if !from.is_valid() || !to.is_valid() {
        return None;
    }

    let meters = Haversine.distance(
        Point::new(from.longitude, from.latitude),
        Point::new(to.longitude, to.latitude),
    );
    Some(meters / 1000.0)
}
