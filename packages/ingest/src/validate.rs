//! Validates raw JSON documents into typed users, venues, and events.
//!
//! Every element predicate returns a [`Rejection`] naming the field that
//! failed, so a dropped element can always be explained. Collection-level
//! checks return a [`ShapeError`], which the caller treats like a transport
//! failure and answers with fallback data.

use std::collections::BTreeMap;

use event_map_ingest_models::InputKind;
use event_map_models::{Coordinates, Event, User, UserId, Venue, VenueId};
use serde_json::Value;

/// Why a single element was dropped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    /// The element is not a JSON object.
    #[error("element is not an object")]
    NotAnObject,

    /// The element's `type` is not `"Feature"`.
    #[error("type is not \"Feature\"")]
    NotAFeature,

    /// `geometry.coordinates` is missing or not exactly two numbers.
    #[error("geometry.coordinates must be exactly two numbers")]
    InvalidCoordinates,

    /// A required field is absent or `null`.
    #[error("missing field `{0}`")]
    MissingField(&'static str),

    /// A required string field is empty.
    #[error("field `{0}` is empty")]
    EmptyField(&'static str),

    /// A field holds a value of the wrong JSON type.
    #[error("field `{0}` has the wrong type")]
    WrongType(&'static str),
}

/// Why a whole input document was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShapeError {
    /// The document is not a JSON object.
    #[error("document is not a JSON object")]
    NotAnObject,

    /// The document's `type` is not `"FeatureCollection"`.
    #[error("document type is {found:?}, expected \"FeatureCollection\"")]
    NotAFeatureCollection {
        /// The `type` value found, if it was a string.
        found: Option<String>,
    },

    /// The `FeatureCollection` has no `features` array.
    #[error("FeatureCollection has no features array")]
    MissingFeatures,

    /// The event document is not a JSON array.
    #[error("event data is not an array")]
    NotAnArray,
}

/// Records that passed validation, plus how many elements were dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct Validated<T> {
    /// Valid records in input order.
    pub records: Vec<T>,
    /// Number of dropped elements.
    pub rejected: u64,
}

/// Returns the element list of a `FeatureCollection` document.
///
/// # Errors
///
/// Returns [`ShapeError`] if `doc` is not an object with
/// `type == "FeatureCollection"` and a `features` array.
pub fn feature_collection(doc: &Value) -> Result<&[Value], ShapeError> {
    let obj = doc.as_object().ok_or(ShapeError::NotAnObject)?;

    match obj.get("type").and_then(Value::as_str) {
        Some("FeatureCollection") => {}
        found => {
            return Err(ShapeError::NotAFeatureCollection {
                found: found.map(str::to_string),
            });
        }
    }

    obj.get("features")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .ok_or(ShapeError::MissingFeatures)
}

/// Validates every feature of a user `FeatureCollection`.
///
/// # Errors
///
/// Returns [`ShapeError`] if `doc` is not a `FeatureCollection`.
pub fn users_from_collection(doc: &Value) -> Result<Validated<User>, ShapeError> {
    Ok(validate_all(
        feature_collection(doc)?,
        InputKind::Users,
        user_feature,
    ))
}

/// Validates every feature of a venue `FeatureCollection`.
///
/// # Errors
///
/// Returns [`ShapeError`] if `doc` is not a `FeatureCollection`.
pub fn venues_from_collection(doc: &Value) -> Result<Validated<Venue>, ShapeError> {
    Ok(validate_all(
        feature_collection(doc)?,
        InputKind::Venues,
        venue_feature,
    ))
}

/// Validates every record of an event list.
///
/// # Errors
///
/// Returns [`ShapeError::NotAnArray`] if `doc` is not a JSON array.
pub fn events_from_list(doc: &Value) -> Result<Validated<Event>, ShapeError> {
    let elements = doc.as_array().ok_or(ShapeError::NotAnArray)?;
    Ok(validate_all(elements, InputKind::Events, event_record))
}

fn validate_all<T>(
    elements: &[Value],
    kind: InputKind,
    validate: impl Fn(&Value) -> Result<T, Rejection>,
) -> Validated<T> {
    let mut records = Vec::with_capacity(elements.len());
    let mut rejected = 0u64;

    for (index, element) in elements.iter().enumerate() {
        match validate(element) {
            Ok(record) => records.push(record),
            Err(reason) => {
                log::warn!("Skipping invalid {kind} element #{index}: {reason}");
                rejected += 1;
            }
        }
    }

    Validated { records, rejected }
}

/// Validates a single user feature.
///
/// Requires a `Feature` with two numeric coordinates, a non-empty
/// `user_properties.userId` and `user_properties.age`, and a numeric
/// `activity_properties.u_monthly_avg_event_count`. The district and the
/// event type distribution are optional.
///
/// # Errors
///
/// Returns the first [`Rejection`] encountered.
pub fn user_feature(feature: &Value) -> Result<User, Rejection> {
    require_feature(feature)?;
    let coordinates = coordinates(feature)?;

    let user_id = identifier(
        lookup(feature, &["properties", "user_properties", "userId"]),
        "properties.user_properties.userId",
    )?;
    let age = non_empty_str(
        lookup(feature, &["properties", "user_properties", "age"]),
        "properties.user_properties.age",
    )?;
    let monthly_avg_event_count = number(
        lookup(
            feature,
            &[
                "properties",
                "activity_properties",
                "u_monthly_avg_event_count",
            ],
        ),
        "properties.activity_properties.u_monthly_avg_event_count",
    )?;

    let district = optional_str(lookup(
        feature,
        &["properties", "user_properties", "u_neighbourhood_district"],
    ));

    let event_type_distribution: BTreeMap<String, f64> =
        lookup(feature, &["properties", "u_event_type_distribution"])
            .and_then(Value::as_object)
            .map(|shares| {
                shares
                    .iter()
                    .filter_map(|(category, share)| share.as_f64().map(|s| (category.clone(), s)))
                    .collect()
            })
            .unwrap_or_default();

    Ok(User {
        user_id: UserId::new(user_id),
        coordinates,
        age,
        district,
        monthly_avg_event_count,
        event_type_distribution,
    })
}

/// Validates a single venue feature.
///
/// Requires a `Feature` with two numeric coordinates and a non-empty
/// `venue_properties.venueId` and `venue_properties.name`.
///
/// # Errors
///
/// Returns the first [`Rejection`] encountered.
pub fn venue_feature(feature: &Value) -> Result<Venue, Rejection> {
    require_feature(feature)?;
    let coordinates = coordinates(feature)?;

    let venue_id = identifier(
        lookup(feature, &["properties", "venue_properties", "venueId"]),
        "properties.venue_properties.venueId",
    )?;
    let name = non_empty_str(
        lookup(feature, &["properties", "venue_properties", "name"]),
        "properties.venue_properties.name",
    )?;

    Ok(Venue {
        venue_id: VenueId::new(venue_id),
        coordinates,
        name,
        address: optional_str(lookup(
            feature,
            &["properties", "venue_properties", "address"],
        )),
        district: optional_str(lookup(
            feature,
            &["properties", "venue_properties", "v_neighbourhood_district"],
        )),
        monthly_avg_event_count: lookup(
            feature,
            &["properties", "venue_properties", "v_monthly_avg_event_count"],
        )
        .and_then(Value::as_f64),
    })
}

/// Validates a single event record.
///
/// Requires `userId`, `venueId`, a non-empty `eventType`, and a numeric
/// `visitCount`. A non-numeric `distance` is treated as absent.
///
/// # Errors
///
/// Returns the first [`Rejection`] encountered.
pub fn event_record(record: &Value) -> Result<Event, Rejection> {
    if !record.is_object() {
        return Err(Rejection::NotAnObject);
    }

    let user_id = identifier(record.get("userId"), "userId")?;
    let venue_id = identifier(record.get("venueId"), "venueId")?;
    let event_type = non_empty_str(record.get("eventType"), "eventType")?;
    let visit_count = number(record.get("visitCount"), "visitCount")?;

    Ok(Event {
        user_id: UserId::new(user_id),
        venue_id: VenueId::new(venue_id),
        event_type,
        visit_count,
        distance_km: record.get("distance").and_then(Value::as_f64),
    })
}

fn require_feature(feature: &Value) -> Result<(), Rejection> {
    let obj = feature.as_object().ok_or(Rejection::NotAnObject)?;
    match obj.get("type").and_then(Value::as_str) {
        Some("Feature") => Ok(()),
        _ => Err(Rejection::NotAFeature),
    }
}

fn coordinates(feature: &Value) -> Result<Coordinates, Rejection> {
    let coords = lookup(feature, &["geometry", "coordinates"])
        .and_then(Value::as_array)
        .ok_or(Rejection::InvalidCoordinates)?;

    match coords.as_slice() {
        [lon, lat] => match (lon.as_f64(), lat.as_f64()) {
            (Some(lon), Some(lat)) => Ok(Coordinates::new(lon, lat)),
            _ => Err(Rejection::InvalidCoordinates),
        },
        _ => Err(Rejection::InvalidCoordinates),
    }
}

fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter()
        .try_fold(value, |current, key| current.get(key))
        .filter(|found| !found.is_null())
}

/// Accepts non-empty strings and numbers; numbers are stringified.
fn identifier(value: Option<&Value>, field: &'static str) -> Result<String, Rejection> {
    match value {
        None | Some(Value::Null) => Err(Rejection::MissingField(field)),
        Some(Value::String(s)) if s.trim().is_empty() => Err(Rejection::EmptyField(field)),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(_) => Err(Rejection::WrongType(field)),
    }
}

fn non_empty_str(value: Option<&Value>, field: &'static str) -> Result<String, Rejection> {
    match value {
        None | Some(Value::Null) => Err(Rejection::MissingField(field)),
        Some(Value::String(s)) if s.trim().is_empty() => Err(Rejection::EmptyField(field)),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(Rejection::WrongType(field)),
    }
}

fn number(value: Option<&Value>, field: &'static str) -> Result<f64, Rejection> {
    match value {
        None | Some(Value::Null) => Err(Rejection::MissingField(field)),
        Some(v) => v.as_f64().ok_or(Rejection::WrongType(field)),
    }
}

fn optional_str(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
