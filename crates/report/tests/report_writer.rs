use std::path::{Path, PathBuf};

use chrono::{Duration, TimeZone, Utc};
use common::config::ReportConfig;
use normalizer::{transform, RawRepository, RepoTable};
use report::{read_csv, ReportOutcome, ReportWriter};
use uuid::Uuid;

fn scratch_dir() -> PathBuf {
    std::env::temp_dir().join(format!("repo-dashboard-test-{}", Uuid::new_v4()))
}

fn writer_for(dir: &Path) -> ReportWriter {
    ReportWriter::new(ReportConfig {
        output_dir: dir.to_path_buf(),
        ..ReportConfig::default()
    })
}

fn sample_table() -> RepoTable {
    let now = Utc.with_ymd_and_hms(2025, 6, 1, 9, 30, 0).unwrap();
    let seeds = [("web", Some("TypeScript"), 3, 12), ("cli", Some("Rust"), 30, 140)];
    let records: Vec<RawRepository> = seeds
        .into_iter()
        .map(|(name, lang, stars, days)| RawRepository {
            name: Some(name.to_string()),
            language: lang.map(str::to_string),
            stargazers_count: stars,
            size_kb: 4096,
            created_at: Some("2022-09-10T11:12:13Z".to_string()),
            pushed_at: Some((now - Duration::days(days)).to_rfc3339()),
            ..RawRepository::default()
        })
        .collect();
    transform(&records, now).table
}

#[test]
fn empty_table_writes_nothing() {
    let dir = scratch_dir();
    let outcome = writer_for(&dir)
        .write(&RepoTable::default())
        .expect("empty table is not an error");
    assert_eq!(outcome, ReportOutcome::NothingToReport);
    assert!(!dir.exists());
}

#[test]
fn writes_csv_and_dashboard_that_read_back() {
    let dir = scratch_dir();
    let table = sample_table();
    let outcome = writer_for(&dir).write(&table).expect("report written");

    let ReportOutcome::Written {
        csv_path,
        dashboard_path,
        rows,
    } = outcome
    else {
        panic!("expected files to be written");
    };
    assert_eq!(rows, 2);
    assert_eq!(csv_path, dir.join("repositories.csv"));
    assert_eq!(dashboard_path, dir.join("github_dashboard.svg"));

    let parsed = read_csv(&csv_path).expect("csv parses");
    assert_eq!(parsed.as_slice(), table.rows());

    let svg = std::fs::read_to_string(&dashboard_path).expect("svg readable");
    assert!(svg.contains("GitHub Analytics"));
    assert!(svg.contains("TypeScript (1)"));

    std::fs::remove_dir_all(&dir).ok();
}
