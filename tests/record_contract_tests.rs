//! Static contracts between the typed SELECT layout and the JSON shape,
//! and the agreement between the two record representations.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use monarchdb::fetch::{FlexibleRecord, Observation, Scalar, OBSERVATION_COLUMNS};

#[test]
fn typed_json_keys_follow_select_order() {
    // Positional decode means the SELECT column list and the struct
    // field list must agree index for index; the serialized key order
    // is the observable half of that contract.
    let json = serde_json::to_string(&Observation::default()).unwrap();

    let mut cursor = 0;
    for column in OBSERVATION_COLUMNS {
        let needle = format!("\"{column}\":");
        let pos = json[cursor..]
            .find(&needle)
            .unwrap_or_else(|| panic!("column {column} missing or out of order"));
        cursor += pos + needle.len();
    }
}

#[test]
fn typed_json_has_exactly_the_select_columns() {
    let value = serde_json::to_value(Observation::default()).unwrap();
    let object = value.as_object().unwrap();

    assert_eq!(object.len(), OBSERVATION_COLUMNS.len());
    for column in OBSERVATION_COLUMNS {
        assert!(object.contains_key(column), "missing key {column}");
    }
}

/// A populated record in both representations, field for field.
fn sample_pair() -> (Observation, FlexibleRecord) {
    let typed = Observation {
        gbif_id: Some("5006512292".to_string()),
        dataset_key: Some("50c9509d-22c7-4a22-a47d-8c48425ef4a7".to_string()),
        event_date: Some("2025-06-21T09:30:00".to_string()),
        event_date_parsed: Some(
            NaiveDate::from_ymd_opt(2025, 6, 21)
                .unwrap()
                .and_hms_opt(9, 30, 0)
                .unwrap(),
        ),
        year: Some(2025),
        month: Some(6),
        day: Some(21),
        day_of_week: Some(6),
        week_of_year: Some(25),
        date_only: NaiveDate::from_ymd_opt(2025, 6, 21),
        scientific_name: Some("Danaus plexippus (Linnaeus, 1758)".to_string()),
        vernacular_name: Some("Monarch".to_string()),
        taxon_key: Some(5133088),
        kingdom: Some("Animalia".to_string()),
        decimal_latitude: Some(41.5568),
        decimal_longitude: Some(-72.6525),
        country_code: Some("US".to_string()),
        state_province: Some("Connecticut".to_string()),
        individual_count: Some(1),
        basis_of_record: Some("HUMAN_OBSERVATION".to_string()),
        time_only: NaiveTime::from_hms_opt(9, 30, 0),
        ..Observation::default()
    };

    let mut flexible = FlexibleRecord::with_capacity(OBSERVATION_COLUMNS.len());
    for column in OBSERVATION_COLUMNS {
        let value = match column {
            "gbifID" => Scalar::Text("5006512292".to_string()),
            "datasetKey" => Scalar::Text("50c9509d-22c7-4a22-a47d-8c48425ef4a7".to_string()),
            "eventDate" => Scalar::Text("2025-06-21T09:30:00".to_string()),
            "eventDateParsed" => Scalar::Text("2025-06-21T09:30:00".to_string()),
            "year" => Scalar::Int(2025),
            "month" => Scalar::Int(6),
            "day" => Scalar::Int(21),
            "day_of_week" => Scalar::Int(6),
            "week_of_year" => Scalar::Int(25),
            "date_only" => Scalar::Text("2025-06-21".to_string()),
            "scientificName" => Scalar::Text("Danaus plexippus (Linnaeus, 1758)".to_string()),
            "vernacularName" => Scalar::Text("Monarch".to_string()),
            "taxonKey" => Scalar::Int(5133088),
            "kingdom" => Scalar::Text("Animalia".to_string()),
            "decimalLatitude" => Scalar::Float(41.5568),
            "decimalLongitude" => Scalar::Float(-72.6525),
            "countryCode" => Scalar::Text("US".to_string()),
            "stateProvince" => Scalar::Text("Connecticut".to_string()),
            "individualCount" => Scalar::Int(1),
            "basisOfRecord" => Scalar::Text("HUMAN_OBSERVATION".to_string()),
            "time_only" => Scalar::Text("09:30:00".to_string()),
            _ => Scalar::Null,
        };
        flexible.push(column, value);
    }

    (typed, flexible)
}

#[test]
fn typed_and_flexible_modes_agree_at_the_json_boundary() {
    let (typed, flexible) = sample_pair();

    let typed_json = serde_json::to_value(&typed).unwrap();
    let flexible_json = serde_json::to_value(&flexible).unwrap();

    assert_eq!(typed_json, flexible_json);
}

#[test]
fn serialization_is_deterministic() {
    let (typed, flexible) = sample_pair();

    assert_eq!(
        serde_json::to_string(&typed).unwrap(),
        serde_json::to_string(&typed).unwrap()
    );
    assert_eq!(
        serde_json::to_string(&flexible).unwrap(),
        serde_json::to_string(&flexible).unwrap()
    );
}

#[test]
fn empty_collection_serializes_as_empty_array() {
    // An empty partition is an empty array on the wire, never an
    // error and never null.
    let records: Vec<Observation> = Vec::new();
    assert_eq!(serde_json::to_string(&records).unwrap(), "[]");
}
