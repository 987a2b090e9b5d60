//! CSV ingest.
//!
//! This module is responsible for turning the weekly sales CSV into an ordered
//! sequence of [`RawRecord`]s, one per data row, in source order.
//!
//! Design goals:
//! - **Strict schema**: every required column must be present (clear error naming them)
//! - **Missing is not invalid**: empty cells and `NaN` become `None` and are left for
//!   the cleaner's completeness check; text that is present but unparsable fails here
//! - **Separation of concerns**: no date parsing, sorting or rounding here

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use log::{debug, info};

use crate::domain::{COLUMNS, RawRecord};
use crate::error::{LoadFailure, PipelineError};

const STORE: usize = 0;
const DATE: usize = 1;
const WEEKLY_SALES: usize = 2;
const HOLIDAY_FLAG: usize = 3;
const TEMPERATURE: usize = 4;
const FUEL_PRICE: usize = 5;
const CPI: usize = 6;
const UNEMPLOYMENT: usize = 7;

/// Column positions of the required fields, resolved from the header row.
struct Schema {
    positions: [usize; COLUMNS.len()],
}

/// Load the CSV at `path` into raw records.
///
/// The file handle is dropped as soon as the read finishes.
pub fn load_raw_records(path: &Path) -> Result<Vec<RawRecord>, PipelineError> {
    let file = File::open(path).map_err(|e| {
        PipelineError::data_load(path, LoadFailure::Io(format!("cannot open file: {e}")))
    })?;
    let records = read_raw_records(file, path)?;
    info!("Loaded {} rows from {}", records.len(), path.display());
    Ok(records)
}

/// Read raw records from any reader. `source` is only used in error messages.
pub fn read_raw_records<R: Read>(reader: R, source: &Path) -> Result<Vec<RawRecord>, PipelineError> {
    let fail = |failure| PipelineError::data_load(source, failure);

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| fail(LoadFailure::Csv(format!("cannot read header row: {e}"))))?
        .clone();

    let schema = resolve_schema(&headers).map_err(|missing| fail(LoadFailure::MissingColumns(missing)))?;
    debug!("Resolved column positions {:?}", schema.positions);

    let mut out = Vec::new();
    for (row, result) in reader.records().enumerate() {
        let record = result.map_err(|e| fail(LoadFailure::Csv(e.to_string())))?;
        out.push(parse_row(row, &record, &schema).map_err(fail)?);
    }

    Ok(out)
}

fn resolve_schema(headers: &StringRecord) -> Result<Schema, Vec<String>> {
    let header_map = build_header_map(headers);

    let mut positions = [0usize; COLUMNS.len()];
    let mut missing = Vec::new();
    for (slot, name) in COLUMNS.iter().enumerate() {
        match header_map.get(&name.to_ascii_lowercase()) {
            Some(&idx) => positions[slot] = idx,
            None => missing.push(name.to_string()),
        }
    }

    if missing.is_empty() {
        Ok(Schema { positions })
    } else {
        Err(missing)
    }
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports often prefix the first header with a UTF-8 BOM; without
    // stripping it `Store` would be reported as missing.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn parse_row(row: usize, record: &StringRecord, schema: &Schema) -> Result<RawRecord, LoadFailure> {
    let cell = |slot: usize| -> Option<&str> {
        record
            .get(schema.positions[slot])
            .map(str::trim)
            .filter(|s| !s.is_empty())
    };
    let invalid = |slot: usize, value: &str| LoadFailure::InvalidValue {
        row,
        column: COLUMNS[slot].to_string(),
        value: value.to_string(),
    };
    let number = |slot: usize| -> Result<Option<f64>, LoadFailure> {
        match cell(slot) {
            None => Ok(None),
            Some(s) => {
                let v = s.parse::<f64>().map_err(|_| invalid(slot, s))?;
                // NaN (and infinities) count as missing, like empty cells.
                Ok(v.is_finite().then_some(v))
            }
        }
    };

    let store = match cell(STORE) {
        None => None,
        Some(s) => match s.parse::<u32>() {
            Ok(id) if id > 0 => Some(id),
            _ => return Err(invalid(STORE, s)),
        },
    };

    let weekly_sales = match number(WEEKLY_SALES)? {
        Some(v) if v < 0.0 => return Err(invalid(WEEKLY_SALES, cell(WEEKLY_SALES).unwrap_or_default())),
        v => v,
    };

    let holiday_flag = match cell(HOLIDAY_FLAG) {
        None => None,
        Some(s) => Some(parse_flag(s).ok_or_else(|| invalid(HOLIDAY_FLAG, s))?),
    };

    Ok(RawRecord {
        row,
        store,
        date: cell(DATE).map(str::to_string),
        weekly_sales,
        holiday_flag,
        temperature: number(TEMPERATURE)?,
        fuel_price: number(FUEL_PRICE)?,
        cpi: number(CPI)?,
        unemployment: number(UNEMPLOYMENT)?,
    })
}

fn parse_flag(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "1" | "true" => Some(true),
        "0" | "false" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Store,Date,Weekly_Sales,Holiday_Flag,Temperature,Fuel_Price,CPI,Unemployment\n";

    fn read(text: &str) -> Result<Vec<RawRecord>, PipelineError> {
        read_raw_records(text.as_bytes(), Path::new("sales.csv"))
    }

    #[test]
    fn reads_rows_in_source_order() {
        let text = format!(
            "{HEADER}1,02/12/2010,1641957.44,1,38.51,2.548,211.2421698,8.106\n\
             1,02/05/2010,1643690.90,0,42.31,2.572,211.0963582,8.106\n"
        );
        let rows = read(&text).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].row, 0);
        assert_eq!(rows[0].date.as_deref(), Some("02/12/2010"));
        assert_eq!(rows[0].holiday_flag, Some(true));
        assert_eq!(rows[1].row, 1);
        assert_eq!(rows[1].weekly_sales, Some(1643690.90));
        assert_eq!(rows[1].cpi, Some(211.0963582));
    }

    #[test]
    fn header_match_ignores_case_bom_and_column_order() {
        let text = "\u{feff}cpi,STORE,date,weekly_sales,holiday_flag,temperature,fuel_price,unemployment,extra\n\
                    211.1,3,02/05/2010,461622.22,0,45.71,2.572,7.368,x\n";
        let rows = read(text).unwrap();
        assert_eq!(rows[0].store, Some(3));
        assert_eq!(rows[0].cpi, Some(211.1));
        assert_eq!(rows[0].unemployment, Some(7.368));
    }

    #[test]
    fn missing_cpi_column_is_a_load_error_naming_it() {
        let text = "Store,Date,Weekly_Sales,Holiday_Flag,Temperature,Fuel_Price,Unemployment\n\
                    1,02/05/2010,1643690.90,0,42.31,2.572,8.106\n";
        let err = read(text).unwrap_err();
        match &err {
            PipelineError::DataLoad {
                failure: LoadFailure::MissingColumns(cols),
                ..
            } => assert_eq!(cols, &vec!["CPI".to_string()]),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains("CPI"));
    }

    #[test]
    fn absent_file_is_a_load_error() {
        let err = load_raw_records(Path::new("definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, PipelineError::DataLoad { failure: LoadFailure::Io(_), .. }));
        assert!(err.to_string().contains("definitely/not/here.csv"));
    }

    #[test]
    fn empty_cells_and_nan_are_missing_not_errors() {
        let text = format!("{HEADER}1,02/05/2010,,0,NaN,2.572,211.09,\n2,02/05/2010,100.0,1\n");
        let rows = read(&text).unwrap();
        assert_eq!(rows[0].weekly_sales, None);
        assert_eq!(rows[0].temperature, None);
        assert_eq!(rows[0].unemployment, None);
        assert_eq!(rows[0].fuel_price, Some(2.572));
        // Short row: trailing fields are missing.
        assert_eq!(rows[1].holiday_flag, Some(true));
        assert_eq!(rows[1].cpi, None);
    }

    #[test]
    fn unparsable_values_name_row_and_column() {
        let text = format!(
            "{HEADER}1,02/05/2010,1.0,0,42.31,2.572,211.09,8.1\n\
             1,02/12/2010,2.0,0,38.51,abc,211.24,8.1\n"
        );
        let err = read(&text).unwrap_err();
        assert_eq!(
            err,
            PipelineError::data_load(
                "sales.csv",
                LoadFailure::InvalidValue {
                    row: 1,
                    column: "Fuel_Price".to_string(),
                    value: "abc".to_string(),
                },
            )
        );
    }

    #[test]
    fn store_and_flag_are_validated() {
        let zero_store = format!("{HEADER}0,02/05/2010,1.0,0,42.31,2.572,211.09,8.1\n");
        assert!(matches!(
            read(&zero_store).unwrap_err(),
            PipelineError::DataLoad { failure: LoadFailure::InvalidValue { ref column, .. }, .. } if column == "Store"
        ));

        let bad_flag = format!("{HEADER}1,02/05/2010,1.0,yes,42.31,2.572,211.09,8.1\n");
        assert!(matches!(
            read(&bad_flag).unwrap_err(),
            PipelineError::DataLoad { failure: LoadFailure::InvalidValue { ref column, .. }, .. } if column == "Holiday_Flag"
        ));
    }

    #[test]
    fn negative_sales_are_rejected() {
        let negative = format!("{HEADER}1,02/05/2010,-1643690.90,0,42.31,2.572,211.09,8.1\n");
        let err = read(&negative).unwrap_err();
        assert_eq!(
            err,
            PipelineError::data_load(
                "sales.csv",
                LoadFailure::InvalidValue {
                    row: 0,
                    column: "Weekly_Sales".to_string(),
                    value: "-1643690.90".to_string(),
                }
            )
        );
        assert_eq!(err.exit_code(), 2);

        let zero = format!("{HEADER}1,02/05/2010,0.00,0,42.31,2.572,211.09,8.1\n");
        assert_eq!(read(&zero).unwrap()[0].weekly_sales, Some(0.0));
    }
}
