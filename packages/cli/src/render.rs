//! Output formatting for the CLI views.

use event_map_filter::facets;
use event_map_ingest_models::{IngestReport, InputKind, InputOrigin, InputReport};
use event_map_models::{DataStore, DistanceBucket, Selection, catalog::EVENT_TYPES};
use serde_json::{Value, json};

/// Prints `value` as pretty JSON on stdout.
pub fn json(value: &impl serde::Serialize) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Prints the ingestion report and filtered record counts.
pub fn summary(
    report: &IngestReport,
    store: &DataStore,
    users: usize,
    events: usize,
    bundles: usize,
) {
    println!("{:<10} {:<10} {:>9} {:>9}", "INPUT", "SOURCE", "ACCEPTED", "REJECTED");
    println!("{}", "-".repeat(41));
    for kind in InputKind::all() {
        print_input(report.input(*kind));
    }
    for kind in InputKind::all() {
        let input = report.input(*kind);
        if let InputOrigin::Fallback { reason } = &input.origin {
            println!("  {}: {reason}", input.kind);
        }
    }
    println!();

    println!("Dangling events dropped: {}", report.dangling_events);
    println!("Distances derived:       {}", report.derived_distances);
    println!();

    println!("Users:   {users} of {}", store.user_count());
    println!("Venues:  {}", store.venue_count());
    println!("Events:  {events} of {}", store.events().len());
    println!("Bundles: {bundles}");
}

fn print_input(input: &InputReport) {
    let source = if input.origin.is_fallback() {
        "fallback"
    } else {
        "fetched"
    };
    println!(
        "{:<10} {:<10} {:>9} {:>9}",
        input.kind.to_string(),
        source,
        input.accepted,
        input.rejected
    );
}

/// Builds the filter option lists for the current venue district.
pub fn facet_options(store: &DataStore, venue_district: &Selection<String>) -> Value {
    let distances: Vec<Value> = facets::distance_options(store)
        .into_iter()
        .map(|bucket: DistanceBucket| json!({ "value": bucket.to_string(), "label": bucket.label() }))
        .collect();
    let venues: Vec<Value> = facets::venue_options(store, venue_district)
        .into_iter()
        .map(|venue| json!({ "value": venue.venue_id, "label": venue.name }))
        .collect();
    let event_types: Vec<Value> = EVENT_TYPES
        .iter()
        .map(|(key, label)| json!({ "value": key, "label": label }))
        .collect();

    json!({
        "ages": facets::age_options(store),
        "userDistricts": facets::user_district_options(store),
        "venueDistricts": facets::venue_district_options(store),
        "categories": facets::category_options(store),
        "distances": distances,
        "venues": venues,
        "eventTypes": event_types,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn facets_list_the_event_type_catalog() {
        let value = facet_options(&DataStore::default(), &Selection::All);
        let event_types = value["eventTypes"].as_array().unwrap();

        assert_eq!(event_types.len(), EVENT_TYPES.len());
        assert_eq!(
            event_types[0],
            json!({ "value": "atolye", "label": "Atölye" })
        );
        assert_eq!(value["venues"], json!([]));
    }
}
