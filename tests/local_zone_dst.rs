//! Wall-clock conversion in a local zone with daylight-saving changes
//!
//! The process zone is pinned to Central European rules through `TZ`, so
//! this file holds a single test: the variable is set before the first
//! `Local` lookup and no other test in this binary races on it.

#![cfg(unix)]

use health_influx::timestamp::normalize;
use health_influx::writer::PointWriter;
use health_influx::{ExportProcessor, ProcessorConfig, RawLine};

const CENTRAL_EUROPE: &str = "CET-1CEST,M3.5.0,M10.5.0/3";

#[test]
fn test_local_zone_around_dst_changes() {
    // SAFETY: only test in this binary, set before any other thread reads the environment
    unsafe { std::env::set_var("TZ", CENTRAL_EUROPE) };

    // Winter and summer time
    assert_eq!(normalize("01.01.2023", "08:00").unwrap(), 1672556400);
    assert_eq!(normalize("01.07.2023", "08:00").unwrap(), 1688191200);

    // Fall-back: 02:30 happens twice, the earlier (summer time) instant wins
    assert_eq!(normalize("29.10.2023", "02:30").unwrap(), 1698539400);
    assert_eq!(normalize("29.10.2023", "01:59").unwrap(), 1698537540);
    assert_eq!(normalize("29.10.2023", "03:00").unwrap(), 1698544800);

    // Spring-forward: 02:30 does not exist and is read with the winter offset
    assert_eq!(normalize("26.03.2023", "02:30").unwrap(), 1679794200);
    assert_eq!(normalize("26.03.2023", "02:00").unwrap(), 1679792400);
    assert_eq!(normalize("26.03.2023", "03:00").unwrap(), 1679792400);

    // A reading taken in the skipped hour is kept by the processor
    let export = "Blutdruck
Datum;Uhrzeit;Sys;Dia;Puls;MAD
26.03.2023;02:30;128;84;66;99
29.10.2023;02:30;124;80;70;95
";
    let processor = ExportProcessor::new(ProcessorConfig::default());
    let mut writer = PointWriter::new(Vec::new());
    let stats = processor
        .process_lines(&RawLine::split_content(export), &mut writer)
        .unwrap();
    assert_eq!(stats[1].1.records_skipped(), 0);

    let output = String::from_utf8(writer.finish().unwrap()).unwrap();
    assert_eq!(
        output,
        "andreas,entity_id=blood_pressure,friendly_name=Blutdruck sys=128,dia=84,pulse=66,MAD=99 1679794200
andreas,entity_id=blood_pressure,friendly_name=Blutdruck sys=124,dia=80,pulse=70,MAD=95 1698539400
"
    );
}
