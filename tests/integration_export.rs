//! Integration tests converting a complete HealthManager export
//!
//! The fixture mirrors a real export: a free-text preamble, the weight table
//! with a row lacking body-composition values and a row with a broken date,
//! and the blood-pressure table with an aggregate row and an empty separator
//! row before a trailing reading.

use chrono::FixedOffset;
use health_influx::writer::PointWriter;
use health_influx::{Category, EmissionOrder, ExportProcessor, ProcessorConfig, RawLine};
use std::path::Path;
use tempfile::TempDir;

const FIXTURE: &str = "tests/fixtures/healthmanager_export.csv";

fn cet() -> FixedOffset {
    FixedOffset::east_opt(3600).unwrap()
}

fn convert(config: ProcessorConfig) -> String {
    let content = std::fs::read_to_string(FIXTURE).unwrap();
    let processor = ExportProcessor::new(config).with_zone(cet());
    let mut writer = PointWriter::new(Vec::new());
    processor
        .process_lines(&RawLine::split_content(&content), &mut writer)
        .unwrap();
    String::from_utf8(writer.finish().unwrap()).unwrap()
}

#[test]
fn test_fixture_produces_expected_points() {
    let output = convert(ProcessorConfig::default());

    let expected = "\
andreas,entity_id=weight,friendly_name=Gewicht weight=80,5,BMI=24,1,fat=18,2,water=55,0,muscles=40,1,bones=3,2 1672556400
andreas,entity_id=weight,friendly_name=Gewicht weight=80,0,BMI=24,0,fat=18,1,water=55,1,muscles=40,2,bones=3,2 1672728600
andreas,entity_id=weight,friendly_name=Gewicht weight=79,7,BMI=23,9,fat=17,9,water=55,3,muscles=40,3,bones=3,2 1672902300
andreas,entity_id=blood_pressure,friendly_name=Blutdruck sys=128,dia=84,pulse=66,MAD=99 1672556700
andreas,entity_id=blood_pressure,friendly_name=Blutdruck sys=124,dia=80,pulse=70,MAD=95 1672600200
andreas,entity_id=blood_pressure,friendly_name=Blutdruck sys=131,dia=86,pulse=70,MAD=101 1672643700
";
    assert_eq!(output, expected);
}

#[test]
fn test_reverse_emission_order_keeps_record_order() {
    let output = convert(
        ProcessorConfig::default().with_emission_order(EmissionOrder::BloodPressureFirst),
    );
    let entities: Vec<&str> = output
        .lines()
        .map(|line| line.split(',').nth(1).unwrap())
        .collect();
    assert_eq!(
        entities,
        vec![
            "entity_id=blood_pressure",
            "entity_id=blood_pressure",
            "entity_id=blood_pressure",
            "entity_id=weight",
            "entity_id=weight",
            "entity_id=weight",
        ]
    );

    let timestamps: Vec<i64> = output
        .lines()
        .take(3)
        .map(|line| line.rsplit(' ').next().unwrap().parse().unwrap())
        .collect();
    assert!(timestamps.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_process_file_reports_skipped_rows() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("influxdb-import.csv");

    let processor = ExportProcessor::new(ProcessorConfig::default()).with_zone(cet());
    let stats = processor
        .process_file(Path::new(FIXTURE), &output)
        .unwrap();

    let weight = stats.category(Category::Weight).unwrap();
    assert!(weight.section_found);
    assert_eq!(weight.lines_extracted, 5);
    assert_eq!(weight.records_parsed, 4);
    assert_eq!(weight.points_written, 3);
    assert_eq!(weight.skipped.len(), 1);
    assert_eq!(weight.skipped[0].date, "32.13.2023");
    assert_eq!(weight.skipped[0].time, "25:99");
    assert_eq!(weight.skipped[0].line, 11);

    let blood_pressure = stats.category(Category::BloodPressure).unwrap();
    assert_eq!(blood_pressure.records_parsed, 3);
    assert_eq!(blood_pressure.points_written, 3);
    assert!(blood_pressure.skipped.is_empty());

    assert_eq!(stats.total_points(), 6);
    let written = std::fs::read_to_string(&output).unwrap();
    assert_eq!(written.lines().count(), 6);
    assert!(!written.contains("MAD = "));
    assert!(!written.contains("sys=125"));
}

#[test]
fn test_append_mode_accumulates_runs() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("influxdb-import.csv");

    let config = ProcessorConfig::default().with_categories(vec![Category::Weight]);
    ExportProcessor::new(config.clone())
        .with_zone(cet())
        .process_file(Path::new(FIXTURE), &output)
        .unwrap();
    ExportProcessor::new(config.with_append())
        .with_zone(cet())
        .process_file(Path::new(FIXTURE), &output)
        .unwrap();

    let written = std::fs::read_to_string(&output).unwrap();
    assert_eq!(written.lines().count(), 6);
}
