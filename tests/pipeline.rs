//! End-to-end tests: CSV file on disk -> cleaned table -> aggregates.

use std::io::Write;

use chrono::NaiveDate;
use sales_insights::analysis::{Analysis, HolidayCalendar};
use sales_insights::app::pipeline::run_analysis;
use sales_insights::clean::clean_records;
use sales_insights::data::{generate_sample, write_sample};
use sales_insights::domain::{AnalysisConfig, SampleConfig};
use sales_insights::error::{LoadFailure, PipelineError};
use sales_insights::io::export::write_clean_csv;
use sales_insights::io::ingest::load_raw_records;
use tempfile::NamedTempFile;

const HEADER: &str = "Store,Date,Weekly_Sales,Holiday_Flag,Temperature,Fuel_Price,CPI,Unemployment";

const ROWS: [&str; 6] = [
    "2,02/12/2010,2137809.50,1,38.49,2.548,210.8979935,8.324",
    "1,02/19/2010,1611968.17,0,39.93,2.514,211.2891429,8.106",
    "1,02/05/2010,1643690.90,0,42.31,2.572,211.0963582,8.106",
    "2,02/05/2010,2136989.46,0,40.19,2.572,210.7526053,8.324",
    "1,02/12/2010,1641957.44,1,38.51,2.548,211.2421698,8.106",
    "2,02/19/2010,2124451.54,0,39.69,2.514,210.9451605,8.324",
];

fn write_csv(header: &str, rows: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{header}").unwrap();
    for row in rows {
        writeln!(file, "{row}").unwrap();
    }
    file.flush().unwrap();
    file
}

#[test]
fn cleaned_table_is_sorted_and_complete() {
    let file = write_csv(HEADER, &ROWS);
    let run = run_analysis(&AnalysisConfig::new(file.path())).unwrap();

    let keys: Vec<(u32, NaiveDate)> = run.table.records().iter().map(|r| (r.store, r.date)).collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);
    assert_eq!(run.table.len(), 6);
    assert_eq!(run.table.stores(), vec![1, 2]);

    let first = &run.table.records()[0];
    assert_eq!(first.date_label, "02-05-2010");
    assert_eq!(first.temperature, 42);
    assert_eq!(first.fuel_price, 2.57);
    assert_eq!(first.cpi, 211.096);

    assert_eq!(run.analysis.summary.rows, 6);
    assert_eq!(run.analysis.summary.holiday_rows, 2);
    assert_eq!(run.analysis.holiday_ranking.len(), 1);
    assert_eq!(run.analysis.holiday_ranking[0].total_sales, 3779766.94);
    assert_eq!(run.analysis.fuel_series.len(), 3);
}

#[test]
fn row_order_does_not_change_results() {
    let forward = write_csv(HEADER, &ROWS);
    let mut reversed_rows = ROWS;
    reversed_rows.reverse();
    let reversed = write_csv(HEADER, &reversed_rows);

    let a = run_analysis(&AnalysisConfig::new(forward.path())).unwrap();
    let b = run_analysis(&AnalysisConfig::new(reversed.path())).unwrap();

    assert_eq!(a.table, b.table);
    assert_eq!(
        serde_json::to_value(&a.analysis).unwrap(),
        serde_json::to_value(&b.analysis).unwrap()
    );
}

#[test]
fn missing_column_is_a_load_error_naming_it() {
    let file = write_csv(
        "Store,Date,Weekly_Sales,Holiday_Flag,Temperature,Fuel_Price,Unemployment",
        &["1,02/05/2010,1643690.90,0,42.31,2.572,8.106"],
    );
    let err = load_raw_records(file.path()).unwrap_err();
    match &err {
        PipelineError::DataLoad {
            failure: LoadFailure::MissingColumns(cols),
            ..
        } => assert_eq!(cols, &vec!["CPI".to_string()]),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn missing_file_is_a_load_error() {
    let err = run_analysis(&AnalysisConfig::new("/definitely/not/here.csv")).unwrap_err();
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn impossible_date_names_the_row() {
    let file = write_csv(HEADER, &[ROWS[0], "1,13/40/2010,1643690.90,0,42.31,2.572,211.0963582,8.106"]);
    let raw = load_raw_records(file.path()).unwrap();
    let err = clean_records(raw, "%m/%d/%Y").unwrap_err();
    assert_eq!(
        err,
        PipelineError::DateParse {
            row: 1,
            value: "13/40/2010".to_string(),
            format: "%m/%d/%Y".to_string(),
        }
    );
    assert_eq!(err.exit_code(), 3);
}

#[test]
fn gaps_are_reported_by_row() {
    let file = write_csv(
        HEADER,
        &[
            ROWS[0],
            "1,02/19/2010,1611968.17,0,39.93,2.514,,8.106",
            "1,02/05/2010,1643690.90,0,NaN,2.572,211.0963582,8.106",
        ],
    );
    let raw = load_raw_records(file.path()).unwrap();
    let err = clean_records(raw, "%m/%d/%Y").unwrap_err();
    assert_eq!(err.rows(), vec![1, 2]);
    assert_eq!(err.exit_code(), 3);
    assert!(err.to_string().contains("row 1 [CPI]"));
    assert!(err.to_string().contains("row 2 [Temperature]"));
}

#[test]
fn constant_cpi_gives_undefined_correlation() {
    let file = write_csv(
        HEADER,
        &[
            "1,02/05/2010,100.00,0,40,2.5,200.0,8.0",
            "1,02/12/2010,200.00,1,40,2.5,200.0,8.0",
            "1,02/19/2010,300.00,0,40,2.5,200.0,8.0",
        ],
    );
    let run = run_analysis(&AnalysisConfig::new(file.path())).unwrap();
    let corr = run.analysis.cpi_correlation;
    assert_eq!(corr.all_weeks.observations, 3);
    assert!(!corr.all_weeks.is_defined());
    assert_eq!(corr.all_weeks.to_string(), "undefined");
    assert_eq!(corr.holiday_weeks.observations, 1);
    assert!(!corr.holiday_weeks.is_defined());
}

#[test]
fn exported_clean_csv_reloads_to_the_same_table() {
    let file = write_csv(HEADER, &ROWS);
    let run = run_analysis(&AnalysisConfig::new(file.path())).unwrap();

    let out = NamedTempFile::new().unwrap();
    write_clean_csv(out.path(), run.table.records()).unwrap();

    let reloaded = clean_records(load_raw_records(out.path()).unwrap(), "%m-%d-%Y").unwrap();
    assert_eq!(reloaded, run.table);
}

fn sample_config(output: &std::path::Path, seed: u64) -> SampleConfig {
    SampleConfig {
        output: output.to_path_buf(),
        stores: 5,
        weeks: 60,
        seed,
        start_date: NaiveDate::from_ymd_opt(2010, 2, 5).unwrap(),
        date_format: "%m/%d/%Y".to_string(),
    }
}

#[test]
fn generated_sample_runs_through_the_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sample.csv");

    let written = write_sample(&sample_config(&path, 42)).unwrap();
    assert_eq!(written, 300);

    let run = run_analysis(&AnalysisConfig::new(&path)).unwrap();
    assert_eq!(run.table.len(), 300);
    assert_eq!(run.analysis.stores.len(), 5);
    assert_eq!(run.analysis.fuel_series.len(), 60);
    assert!(run.analysis.cpi_correlation.all_weeks.is_defined());
    // 60 weeks from Feb 2010 cover Super Bowl, Labor Day, Thanksgiving and Christmas.
    assert_eq!(run.analysis.holiday_summaries.len(), 4);
    assert!(run.analysis.unemployment_extremes.is_some());
}

#[test]
fn sample_file_is_reproducible() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.csv");
    let b = dir.path().join("b.csv");

    write_sample(&sample_config(&a, 7)).unwrap();
    write_sample(&sample_config(&b, 7)).unwrap();
    assert_eq!(std::fs::read(&a).unwrap(), std::fs::read(&b).unwrap());

    let rows = generate_sample(&sample_config(&a, 8)).unwrap();
    let table = clean_records(rows, "%m/%d/%Y").unwrap();
    let analysis = Analysis::compute(table.records(), &HolidayCalendar::default());
    assert_eq!(analysis.summary.stores, 5);
}
