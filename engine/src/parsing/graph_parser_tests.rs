use super::graph_parser::{parse_event_time, parse_graph_str};

const SAMPLE: &str = r#"{
    "nodes": [
        {"id": "v-1", "type": "Entity.Vessel.FishingVessel", "name": "Roach", "company": "SouthSeafood Express Corp"},
        {"id": "v-2", "type": "Entity.Vessel.CargoVessel", "name": "Dace", "company": ""},
        {"id": "v-3", "type": "Entity.Vessel.FishingVessel"},
        {"id": "d-1", "type": "Entity.Document.CargoReport", "qty_tons": 12.5},
        {"id": "d-2", "type": "Entity.Document.CargoReport", "qty_tons": "7.25"},
        {"id": "d-3", "type": "Entity.Document.CargoReport"},
        {"id": "loc-1", "type": "Entity.Location.Point"}
    ],
    "links": [
        {"type": "Event.TransportEvent.TransponderPing", "source": "loc-1", "target": "v-1", "time": "2035-02-01T08:00:00"},
        {"type": "Event.TransportEvent.TransponderPing", "source": "loc-1", "target": "v-1", "time": "not a date"},
        {"type": "Event.Transaction", "source": "d-1", "target": "loc-1", "date": "2035-02-01"},
        {"type": "Event.Transaction", "source": "d-2", "target": "loc-1", "date": "2035-02-02"},
        {"type": "Event.Transaction", "source": "d-3", "target": "loc-1", "date": "2035-02-03"},
        {"type": "Event.Transaction", "source": "d-9", "target": "loc-1", "date": "2035-02-04"},
        {"type": "Event.Transaction", "source": "d-1", "target": "loc-1", "date": "02/05/2035"},
        {"type": "Event.Harbor", "source": "loc-1", "target": "v-1", "time": "2035-02-01T08:00:00"}
    ]
}"#;

#[test]
fn test_vessels_extracted_with_optional_company() {
    let payload = parse_graph_str(SAMPLE).unwrap();

    assert_eq!(payload.vessels.len(), 3);
    assert_eq!(payload.vessels[0].name, "Roach");
    assert_eq!(
        payload.vessels[0].company.as_deref(),
        Some("SouthSeafood Express Corp")
    );
    // Empty company strings normalize to None.
    assert_eq!(payload.vessels[1].company, None);
    // Missing name falls back to the node id.
    assert_eq!(payload.vessels[2].name, "v-3");
}

#[test]
fn test_pings_keep_only_parsable_timestamps() {
    let payload = parse_graph_str(SAMPLE).unwrap();

    assert_eq!(payload.pings.len(), 1);
    assert_eq!(payload.pings[0].location_id, "loc-1");
    assert_eq!(payload.pings[0].vessel_id, "v-1");
    assert_eq!(payload.stats.malformed_ping_dates, 1);
}

#[test]
fn test_transactions_join_cargo_quantities() {
    let payload = parse_graph_str(SAMPLE).unwrap();

    // Four parsable transaction dates; the %m/%d/%Y one is dropped.
    assert_eq!(payload.transactions.len(), 4);
    assert_eq!(payload.stats.malformed_transaction_dates, 1);

    assert_eq!(payload.transactions[0].quantity_tons, 12.5);
    // String-typed quantity parses.
    assert_eq!(payload.transactions[1].quantity_tons, 7.25);
    // Document without a quantity and unknown document both default to 0.
    assert_eq!(payload.transactions[2].quantity_tons, 0.0);
    assert_eq!(payload.transactions[3].quantity_tons, 0.0);
    assert_eq!(payload.stats.missing_quantities, 2);
}

#[test]
fn test_numeric_node_refs_accepted() {
    let json = r#"{
        "nodes": [{"id": 7, "type": "Entity.Vessel", "name": "Chub", "company": "Alpha"}],
        "links": [{"type": "Event.TransportEvent.TransponderPing", "source": 3, "target": 7, "time": "2035-01-01T00:00:00"}]
    }"#;

    let payload = parse_graph_str(json).unwrap();
    assert_eq!(payload.vessels[0].id, "7");
    assert_eq!(payload.pings[0].location_id, "3");
    assert_eq!(payload.pings[0].vessel_id, "7");
}

#[test]
fn test_malformed_payload_is_fatal() {
    assert!(parse_graph_str("{\"nodes\": []}").is_err());
    assert!(parse_graph_str("[]").is_err());
}

#[test]
fn test_event_time_formats() {
    assert!(parse_event_time("2035-02-01T08:00:00").is_some());
    assert!(parse_event_time("2035-02-01T08:00:00.250").is_some());
    assert!(parse_event_time("2035-02-01T08:00:00Z").is_some());
    assert!(parse_event_time("2035-02-01T08:00:00+02:00").is_some());
    assert!(parse_event_time("2035-02-01").is_some());
    assert!(parse_event_time("yesterday").is_none());

    let midnight = parse_event_time("2035-02-01").unwrap();
    let explicit = parse_event_time("2035-02-01T00:00:00").unwrap();
    assert_eq!(midnight, explicit);
}
