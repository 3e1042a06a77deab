#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Ingestion configuration and report types.
//!
//! Defines the TOML schema describing where the three raw inputs (users,
//! venues, events) are read from, and the per-input report produced after
//! validation and fallback substitution.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Where a raw input is read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DataLocation {
    /// HTTP(S) endpoint returning the raw JSON document.
    Url {
        /// Full URL of the document.
        url: String,
    },
    /// Local file containing the raw JSON document.
    File {
        /// Path to the file, relative to the working directory.
        path: PathBuf,
    },
}

impl std::fmt::Display for DataLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Url { url } => write!(f, "{url}"),
            Self::File { path } => write!(f, "{}", path.display()),
        }
    }
}

/// Ingestion configuration, deserialized from TOML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestConfig {
    /// User `FeatureCollection` location.
    pub users: DataLocation,
    /// Venue `FeatureCollection` location.
    pub venues: DataLocation,
    /// Event list location.
    pub events: DataLocation,
    /// Per-request timeout for URL inputs. No timeout when unset.
    pub request_timeout_secs: Option<u64>,
}

impl IngestConfig {
    /// Returns the location configured for `kind`.
    #[must_use]
    pub const fn location(&self, kind: InputKind) -> &DataLocation {
        match kind {
            InputKind::Users => &self.users,
            InputKind::Venues => &self.venues,
            InputKind::Events => &self.events,
        }
    }
}

/// One of the three independent raw inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    /// User `FeatureCollection`.
    Users,
    /// Venue `FeatureCollection`.
    Venues,
    /// Event list.
    Events,
}

impl InputKind {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Users, Self::Venues, Self::Events]
    }
}

impl std::fmt::Display for InputKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Users => write!(f, "users"),
            Self::Venues => write!(f, "venues"),
            Self::Events => write!(f, "events"),
        }
    }
}

/// Where the records of an input ended up coming from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "origin", rename_all = "snake_case")]
pub enum InputOrigin {
    /// The configured location was read and had a valid shape.
    Fetched,
    /// The built-in fallback dataset replaced the input.
    Fallback {
        /// Why the configured input was rejected.
        reason: String,
    },
}

impl InputOrigin {
    /// Returns `true` if the fallback dataset was used.
    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }
}

/// Validation outcome for a single input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputReport {
    /// Which input this report describes.
    pub kind: InputKind,
    /// Configured data or fallback.
    #[serde(flatten)]
    pub origin: InputOrigin,
    /// Elements that passed validation.
    pub accepted: u64,
    /// Elements dropped by validation.
    pub rejected: u64,
}

/// Summary of a complete ingestion pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestReport {
    /// User input outcome.
    pub users: InputReport,
    /// Venue input outcome.
    pub venues: InputReport,
    /// Event input outcome.
    pub events: InputReport,
    /// Valid events dropped because their user or venue does not exist.
    pub dangling_events: u64,
    /// Accepted events whose distance was derived from coordinates.
    pub derived_distances: u64,
}

impl IngestReport {
    /// Returns the outcome recorded for `kind`.
    #[must_use]
    pub const fn input(&self, kind: InputKind) -> &InputReport {
        match kind {
            InputKind::Users => &self.users,
            InputKind::Venues => &self.venues,
            InputKind::Events => &self.events,
        }
    }

    /// Returns the inputs that were replaced by fallback data.
    #[must_use]
    pub fn fallback_inputs(&self) -> Vec<InputKind> {
        InputKind::all()
            .iter()
            .copied()
            .filter(|kind| self.input(*kind).origin.is_fallback())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mixed_locations() {
        let config: IngestConfig = toml::from_str(
            r#"
            request_timeout_secs = 10

            [users]
            type = "file"
            path = "assets/data/users.geojson"

            [venues]
            type = "url"
            url = "https://example.org/places.geojson"

            [events]
            type = "file"
            path = "assets/data/events.json"
            "#,
        )
        .unwrap();

        assert_eq!(
            config.location(InputKind::Venues),
            &DataLocation::Url {
                url: "https://example.org/places.geojson".to_string()
            }
        );
        assert_eq!(config.request_timeout_secs, Some(10));
        assert_eq!(
            config.users.to_string(),
            PathBuf::from("assets/data/users.geojson").display().to_string()
        );
    }

    #[test]
    fn lists_fallback_inputs() {
        let report = |kind, origin| InputReport {
            kind,
            origin,
            accepted: 1,
            rejected: 0,
        };
        let ingest = IngestReport {
            users: report(InputKind::Users, InputOrigin::Fetched),
            venues: report(
                InputKind::Venues,
                InputOrigin::Fallback {
                    reason: "HTTP 404".to_string(),
                },
            ),
            events: report(InputKind::Events, InputOrigin::Fetched),
            dangling_events: 0,
            derived_distances: 0,
        };
        assert_eq!(ingest.fallback_inputs(), vec![InputKind::Venues]);
        for kind in InputKind::all() {
            assert_eq!(ingest.input(*kind).kind, *kind);
        }
    }
}
