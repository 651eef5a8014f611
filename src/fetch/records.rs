//! Observation record representations.
//!
//! The same logical row can be materialized two ways: the typed
//! [`Observation`] with the fixed 35-column layout the ingest pipeline
//! writes, or the schema-flexible [`FlexibleRecord`] that discovers its
//! columns from result metadata. Both serialize to the same JSON object
//! when the column sets match; `record_contract_tests` pins that down.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use sqlx::postgres::PgRow;
use sqlx::{Column, Row, TypeInfo, ValueRef};

/// Columns selected by the typed fetch, in SELECT order.
///
/// Index `i` here binds positionally to field `i` of [`Observation`];
/// the two lists must stay in lockstep.
pub const OBSERVATION_COLUMNS: [&str; 35] = [
    "gbifID",
    "datasetKey",
    "publishingOrgKey",
    "eventDate",
    "eventDateParsed",
    "year",
    "month",
    "day",
    "day_of_week",
    "week_of_year",
    "date_only",
    "scientificName",
    "vernacularName",
    "taxonKey",
    "kingdom",
    "phylum",
    "class",
    "order",
    "family",
    "genus",
    "species",
    "decimalLatitude",
    "decimalLongitude",
    "coordinateUncertaintyInMeters",
    "countryCode",
    "stateProvince",
    "individualCount",
    "basisOfRecord",
    "recordedBy",
    "occurrenceID",
    "collectionCode",
    "catalogNumber",
    "county",
    "cityOrTown",
    "time_only",
];

/// Column every partition read is ordered by.
pub const DATE_ONLY_COLUMN: &str = "date_only";

/// One occurrence row in the fixed 35-column layout.
///
/// Every field is nullable: source exports are incomplete per record,
/// and a null column must stay null in the JSON output rather than
/// collapsing to a zero value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Observation {
    #[serde(rename = "gbifID")]
    pub gbif_id: Option<String>,
    #[serde(rename = "datasetKey")]
    pub dataset_key: Option<String>,
    #[serde(rename = "publishingOrgKey")]
    pub publishing_org_key: Option<String>,
    #[serde(rename = "eventDate")]
    pub event_date: Option<String>,
    #[serde(rename = "eventDateParsed")]
    pub event_date_parsed: Option<NaiveDateTime>,
    pub year: Option<i32>,
    pub month: Option<i32>,
    pub day: Option<i32>,
    pub day_of_week: Option<i32>,
    pub week_of_year: Option<i64>,
    pub date_only: Option<NaiveDate>,
    #[serde(rename = "scientificName")]
    pub scientific_name: Option<String>,
    #[serde(rename = "vernacularName")]
    pub vernacular_name: Option<String>,
    #[serde(rename = "taxonKey")]
    pub taxon_key: Option<i64>,
    pub kingdom: Option<String>,
    pub phylum: Option<String>,
    pub class: Option<String>,
    pub order: Option<String>,
    pub family: Option<String>,
    pub genus: Option<String>,
    pub species: Option<String>,
    #[serde(rename = "decimalLatitude")]
    pub decimal_latitude: Option<f64>,
    #[serde(rename = "decimalLongitude")]
    pub decimal_longitude: Option<f64>,
    #[serde(rename = "coordinateUncertaintyInMeters")]
    pub coordinate_uncertainty_in_meters: Option<f64>,
    #[serde(rename = "countryCode")]
    pub country_code: Option<String>,
    #[serde(rename = "stateProvince")]
    pub state_province: Option<String>,
    #[serde(rename = "individualCount")]
    pub individual_count: Option<i64>,
    #[serde(rename = "basisOfRecord")]
    pub basis_of_record: Option<String>,
    #[serde(rename = "recordedBy")]
    pub recorded_by: Option<String>,
    #[serde(rename = "occurrenceID")]
    pub occurrence_id: Option<String>,
    #[serde(rename = "collectionCode")]
    pub collection_code: Option<String>,
    #[serde(rename = "catalogNumber")]
    pub catalog_number: Option<String>,
    pub county: Option<String>,
    #[serde(rename = "cityOrTown")]
    pub city_or_town: Option<String>,
    pub time_only: Option<NaiveTime>,
}

impl Observation {
    /// Decode one row of the typed SELECT. Binding is positional:
    /// index `i` is `OBSERVATION_COLUMNS[i]`.
    pub fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Observation {
            gbif_id: row.try_get(0)?,
            dataset_key: row.try_get(1)?,
            publishing_org_key: row.try_get(2)?,
            event_date: row.try_get(3)?,
            event_date_parsed: row.try_get(4)?,
            year: row.try_get(5)?,
            month: row.try_get(6)?,
            day: row.try_get(7)?,
            day_of_week: row.try_get(8)?,
            week_of_year: row.try_get(9)?,
            date_only: row.try_get(10)?,
            scientific_name: row.try_get(11)?,
            vernacular_name: row.try_get(12)?,
            taxon_key: row.try_get(13)?,
            kingdom: row.try_get(14)?,
            phylum: row.try_get(15)?,
            class: row.try_get(16)?,
            order: row.try_get(17)?,
            family: row.try_get(18)?,
            genus: row.try_get(19)?,
            species: row.try_get(20)?,
            decimal_latitude: row.try_get(21)?,
            decimal_longitude: row.try_get(22)?,
            coordinate_uncertainty_in_meters: row.try_get(23)?,
            country_code: row.try_get(24)?,
            state_province: row.try_get(25)?,
            individual_count: row.try_get(26)?,
            basis_of_record: row.try_get(27)?,
            recorded_by: row.try_get(28)?,
            occurrence_id: row.try_get(29)?,
            collection_code: row.try_get(30)?,
            catalog_number: row.try_get(31)?,
            county: row.try_get(32)?,
            city_or_town: row.try_get(33)?,
            time_only: row.try_get(34)?,
        })
    }
}

/// Dynamically typed scalar for schema-flexible reads.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

/// One row keyed by column name, preserving the column order the store
/// returned rather than any container's incidental ordering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlexibleRecord {
    fields: Vec<(String, Scalar)>,
}

impl FlexibleRecord {
    pub fn with_capacity(columns: usize) -> Self {
        FlexibleRecord {
            fields: Vec::with_capacity(columns),
        }
    }

    pub fn push(&mut self, name: impl Into<String>, value: Scalar) {
        self.fields.push((name.into(), value));
    }

    pub fn get(&self, name: &str) -> Option<&Scalar> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(String, Scalar)> {
        self.fields.iter()
    }

    /// Decode one row of a `SELECT *`, discovering columns from the row
    /// metadata and dispatching on the store's type name.
    pub fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        let mut record = FlexibleRecord::with_capacity(row.len());
        for (idx, column) in row.columns().iter().enumerate() {
            let value = decode_scalar(row, idx, column.type_info().name())?;
            record.push(column.name(), value);
        }
        Ok(record)
    }
}

impl Serialize for FlexibleRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Decode a single column into a [`Scalar`].
///
/// Date and time values are rendered to the same textual forms chrono's
/// serde impls emit, so the flexible and typed shapes agree at the JSON
/// boundary. `bytea` is decoded as text.
fn decode_scalar(row: &PgRow, idx: usize, type_name: &str) -> Result<Scalar, sqlx::Error> {
    if row.try_get_raw(idx)?.is_null() {
        return Ok(Scalar::Null);
    }

    let scalar = match type_name {
        "BOOL" => Scalar::Bool(row.try_get(idx)?),
        "INT2" => Scalar::Int(i64::from(row.try_get::<i16, _>(idx)?)),
        "INT4" => Scalar::Int(i64::from(row.try_get::<i32, _>(idx)?)),
        "INT8" => Scalar::Int(row.try_get(idx)?),
        "FLOAT4" => Scalar::Float(f64::from(row.try_get::<f32, _>(idx)?)),
        "FLOAT8" => Scalar::Float(row.try_get(idx)?),
        "TEXT" | "VARCHAR" | "CHAR" | "BPCHAR" | "NAME" => Scalar::Text(row.try_get(idx)?),
        "BYTEA" => {
            let bytes: Vec<u8> = row.try_get(idx)?;
            Scalar::Text(String::from_utf8_lossy(&bytes).into_owned())
        }
        "DATE" => Scalar::Text(row.try_get::<NaiveDate, _>(idx)?.to_string()),
        "TIME" => Scalar::Text(
            row.try_get::<NaiveTime, _>(idx)?
                .format("%H:%M:%S%.f")
                .to_string(),
        ),
        "TIMESTAMP" => Scalar::Text(
            row.try_get::<NaiveDateTime, _>(idx)?
                .format("%Y-%m-%dT%H:%M:%S%.f")
                .to_string(),
        ),
        "TIMESTAMPTZ" => Scalar::Text(
            row.try_get::<chrono::DateTime<chrono::Utc>, _>(idx)?
                .to_rfc3339(),
        ),
        // Anything else must at least read as text; a type that cannot
        // fails the whole request as a scan error.
        _ => Scalar::Text(row.try_get(idx)?),
    };

    Ok(scalar)
}
