//! Known event categories and their display colors.
//!
//! The keys are the identifiers used in user event type distributions
//! and minimum-share filters; the labels are the human-readable names.

/// Event category keys and display labels, in filter slider order.
pub const EVENT_TYPES: &[(&str, &str)] = &[
    ("atolye", "Atölye"),
    ("festival", "Festival"),
    ("gezi", "Gezi"),
    ("konser", "Konser"),
    ("sahne_gosterisi", "Sahne Gösterisi"),
    ("sergi", "Sergi"),
    ("sinema", "Sinema"),
    ("sinema_soylesi", "Sinema Söyleşi"),
    ("soylesi", "Söyleşi"),
    ("tiyatro", "Tiyatro"),
    ("cocuk", "Çocuk"),
];

/// Color used for event types without a dedicated color.
pub const DEFAULT_EVENT_TYPE_COLOR: &str = "#AAAAAA";

/// Returns the display label for a category key.
#[must_use]
pub fn event_type_label(key: &str) -> Option<&'static str> {
    EVENT_TYPES
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, label)| *label)
}

/// Returns the line/arrow color for an event type label.
#[must_use]
pub fn event_type_color(event_type: &str) -> &'static str {
    match event_type {
        "Konser" => "#FF4136",
        "Tiyatro" => "#2ECC40",
        "Festival" => "#FF851B",
        "Sergi" => "#7FDBFF",
        "Atölye" => "#B10DC9",
        _ => DEFAULT_EVENT_TYPE_COLOR,
    }
}
