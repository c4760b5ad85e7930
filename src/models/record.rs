use crate::error::{CollectorError, Result};
use crate::models::station::canonical_name;
use crate::utils::constants::{
    COL_DAY, COL_HOUR, COL_MONTH, COL_STATION_CODE, COL_STATION_NAME, COL_YEAR,
    MEASUREMENT_COLUMNS, MIN_ROW_WIDTH,
};
use chrono::{NaiveDate, NaiveDateTime};
use csv::StringRecord;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;

/// One decoded row of a synop archive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub station_code: String,
    pub station_name: String,
    pub datetime: NaiveDateTime,
    /// Measurement cells keyed by source column position
    pub measurements: BTreeMap<usize, Value>,
}

impl RawRecord {
    pub fn from_row(row: &StringRecord) -> Result<Self> {
        if row.len() < MIN_ROW_WIDTH {
            return Err(CollectorError::InvalidFormat(format!(
                "Row has {} columns, expected at least {MIN_ROW_WIDTH}",
                row.len()
            )));
        }

        let year = parse_component::<i32>(row, COL_YEAR)?;
        let month = parse_component::<u32>(row, COL_MONTH)?;
        let day = parse_component::<u32>(row, COL_DAY)?;
        let hour = parse_component::<u32>(row, COL_HOUR)?;

        let datetime = NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|date| date.and_hms_opt(hour, 0, 0))
            .ok_or_else(|| {
                CollectorError::InvalidFormat(format!(
                    "Invalid observation time: {year}-{month}-{day} {hour}h"
                ))
            })?;

        let measurements = MEASUREMENT_COLUMNS
            .iter()
            .map(|&col| (col, parse_cell(row.get(col).unwrap_or_default())))
            .collect();

        Ok(Self {
            station_code: cell(row, COL_STATION_CODE).to_string(),
            station_name: cell(row, COL_STATION_NAME).to_string(),
            datetime,
            measurements,
        })
    }
}

/// A row whose station name has been normalized and matched to a location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalRecord {
    pub station_code: String,
    pub station_name: String,
    pub datetime: NaiveDateTime,
    #[serde(flatten)]
    pub measurements: BTreeMap<String, Value>,
}

impl HistoricalRecord {
    /// Build a record with the station name resolved through the variant table
    pub fn normalized(raw: RawRecord) -> Self {
        let station_name = canonical_name(&raw.station_name).to_string();
        Self {
            station_code: raw.station_code,
            station_name,
            datetime: raw.datetime,
            measurements: raw
                .measurements
                .into_iter()
                .map(|(col, value)| (col.to_string(), value))
                .collect(),
        }
    }

    pub fn to_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert(
            "station_code".to_string(),
            Value::String(self.station_code.clone()),
        );
        map.insert(
            "station_name".to_string(),
            Value::String(self.station_name.clone()),
        );
        map.insert(
            "datetime".to_string(),
            Value::String(self.datetime.format("%Y-%m-%dT%H:%M:%S").to_string()),
        );
        for (key, value) in &self.measurements {
            map.insert(key.clone(), value.clone());
        }
        map
    }
}

fn cell(row: &StringRecord, index: usize) -> &str {
    row.get(index).map(str::trim).unwrap_or_default()
}

fn parse_component<T: std::str::FromStr>(row: &StringRecord, index: usize) -> Result<T> {
    let raw = cell(row, index);
    raw.parse::<T>().map_err(|_| {
        CollectorError::InvalidFormat(format!(
            "Invalid date component in column {index}: '{raw}'"
        ))
    })
}

/// Decode a measurement cell: numbers stay numeric, blanks become null
pub fn parse_cell(raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    if let Ok(int) = trimmed.parse::<i64>() {
        return Value::Number(int.into());
    }
    trimmed
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(trimmed.to_string()))
}
