//! User activity heatmap points.

use event_map_models::User;
use serde::{Deserialize, Serialize};

/// A weighted heatmap point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatPoint {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Monthly average event count of the user.
    pub intensity: f64,
}

/// Builds one heatmap point per user with valid coordinates.
///
/// Users with out-of-range or non-finite coordinates are skipped.
pub fn heat_points<'a>(users: impl IntoIterator<Item = &'a User>) -> Vec<HeatPoint> {
    let points: Vec<HeatPoint> = users
        .into_iter()
        .filter_map(|user| {
            if !user.coordinates.is_valid() {
                log::warn!(
                    "Skipping heatmap point for user {}: invalid coordinates",
                    user.user_id
                );
                return None;
            }

            Some(HeatPoint {
                latitude: user.coordinates.latitude,
                longitude: user.coordinates.longitude,
                intensity: user.monthly_avg_event_count,
            })
        })
        .collect();

    log::debug!("Generated {} heatmap points", points.len());

    points
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use event_map_models::{Coordinates, UserId};

    use super::*;

    fn user(id: &str, lon: f64, lat: f64, monthly: f64) -> User {
        User {
            user_id: UserId::new(id),
            coordinates: Coordinates::new(lon, lat),
            age: "25-34".to_string(),
            district: None,
            monthly_avg_event_count: monthly,
            event_type_distribution: BTreeMap::new(),
        }
    }

    #[test]
    fn uses_monthly_average_as_intensity() {
        let users = [user("u1", 29.0, 41.0, 3.0)];
        let points = heat_points(&users);

        assert_eq!(
            points,
            vec![HeatPoint {
                latitude: 41.0,
                longitude: 29.0,
                intensity: 3.0,
            }]
        );
    }

    #[test]
    fn skips_invalid_coordinates() {
        let users = [
            user("u1", 29.0, 41.0, 1.0),
            user("u2", 29.0, 95.0, 1.0),
            user("u3", f64::NAN, 41.0, 1.0),
        ];
        assert_eq!(heat_points(&users).len(), 1);
    }
}
