use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::errors::MalformedRecord;
use crate::models::{NormalizedRepository, RepoTable, ACTIVE_THRESHOLD_DAYS};
use crate::payloads::RawRepository;

const NAIVE_DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// A raw record the transformer refused, with its position in the input.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRecord {
    pub index: usize,
    pub name: Option<String>,
    pub reason: MalformedRecord,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransformOutcome {
    pub table: RepoTable,
    pub skipped: Vec<SkippedRecord>,
}

impl TransformOutcome {
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}

/// Normalizes `records` against a single reference instant.
///
/// Rows keep input order. Records without a name or with a missing or
/// unparseable timestamp are skipped and listed in the outcome.
pub fn transform(records: &[RawRepository], now: DateTime<Utc>) -> TransformOutcome {
    transform_indexed(records.iter().enumerate(), Vec::new(), now)
}

/// Same as [`transform`], with `now` read from the clock once.
pub fn transform_now(records: &[RawRepository]) -> TransformOutcome {
    transform(records, Utc::now())
}

/// Decodes raw API values; values that are not repository objects become
/// skipped records carrying their original index.
pub fn decode_records(values: Vec<Value>) -> (Vec<(usize, RawRepository)>, Vec<SkippedRecord>) {
    let mut decoded = Vec::with_capacity(values.len());
    let mut skipped = Vec::new();
    for (index, value) in values.into_iter().enumerate() {
        let name = value
            .get("name")
            .and_then(Value::as_str)
            .map(str::to_string);
        match RawRepository::from_value(value) {
            Ok(raw) => decoded.push((index, raw)),
            Err(err) => skipped.push(SkippedRecord {
                index,
                name,
                reason: MalformedRecord::Undecodable {
                    message: err.to_string(),
                },
            }),
        }
    }
    (decoded, skipped)
}

/// Decode then transform; skip indices refer to positions in `values`.
pub fn transform_values(values: Vec<Value>, now: DateTime<Utc>) -> TransformOutcome {
    let (decoded, skipped) = decode_records(values);
    transform_indexed(
        decoded.iter().map(|(index, raw)| (*index, raw)),
        skipped,
        now,
    )
}

fn transform_indexed<'a>(
    records: impl Iterator<Item = (usize, &'a RawRepository)>,
    mut skipped: Vec<SkippedRecord>,
    now: DateTime<Utc>,
) -> TransformOutcome {
    let mut rows = Vec::new();
    for (index, raw) in records {
        match normalize_repo(raw, now) {
            Ok(row) => rows.push(row),
            Err(reason) => {
                warn!(index, name = ?raw.name, %reason, "skipping malformed repository record");
                skipped.push(SkippedRecord {
                    index,
                    name: raw.name.clone(),
                    reason,
                });
            }
        }
    }
    skipped.sort_by_key(|record| record.index);

    if rows.is_empty() && skipped.is_empty() {
        warn!("no repositories to transform");
    } else {
        let active = rows.iter().filter(|row| row.is_active).count();
        info!(
            rows = rows.len(),
            active,
            skipped = skipped.len(),
            "transformed repositories"
        );
    }

    TransformOutcome {
        table: RepoTable::from_rows(rows),
        skipped,
    }
}

pub fn normalize_repo(
    raw: &RawRepository,
    now: DateTime<Utc>,
) -> Result<NormalizedRepository, MalformedRecord> {
    let name = raw
        .name
        .as_deref()
        .filter(|name| !name.trim().is_empty())
        .ok_or(MalformedRecord::MissingField { field: "name" })?;
    let created_at = required_timestamp("created_at", raw.created_at.as_deref())?;
    let pushed_at = required_timestamp("pushed_at", raw.pushed_at.as_deref())?;
    let days_since_last_push = days_between(pushed_at, now);

    debug!(name, days_since_last_push, "normalized repository");
    Ok(NormalizedRepository {
        name: name.to_string(),
        is_private: raw.is_private,
        language: non_blank(raw.language.as_deref()),
        stargazer_count: raw.stargazers_count,
        fork_count: raw.forks_count,
        open_issue_count: raw.open_issues_count,
        size_kb: raw.size_kb,
        size_mb: raw.size_kb as f64 / 1024.0,
        is_archived: raw.archived,
        created_at,
        pushed_at,
        year_created: created_at.year(),
        days_since_last_push,
        is_active: days_since_last_push < ACTIVE_THRESHOLD_DAYS,
        html_url: non_blank(raw.html_url.as_deref()),
    })
}

/// Blank optional text is treated as absent.
fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn required_timestamp(
    field: &'static str,
    value: Option<&str>,
) -> Result<DateTime<Utc>, MalformedRecord> {
    let value = value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(MalformedRecord::MissingField { field })?;
    parse_timestamp(value).ok_or_else(|| MalformedRecord::InvalidTimestamp {
        field,
        value: value.to_string(),
    })
}

/// Parses an RFC 3339 instant (any offset, converted to UTC). Naive date-times
/// and bare dates are taken to be UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Whole days from `pushed_at` to `now`, floored; pushes after `now` count as 0.
fn days_between(pushed_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - pushed_at).num_days().max(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 15, 12, 0, 0).unwrap()
    }

    fn raw(name: &str, created: &str, pushed: DateTime<Utc>) -> RawRepository {
        RawRepository {
            name: Some(name.into()),
            created_at: Some(created.into()),
            pushed_at: Some(pushed.to_rfc3339()),
            ..RawRepository::default()
        }
    }

    #[test]
    fn scenario_derives_activity_and_years() {
        let mut a = raw("A", "2023-01-01", now() - Duration::days(5));
        a.stargazers_count = 10;
        a.language = Some("Rust".into());
        let mut b = raw("B", "2023-06-01", now() - Duration::days(200));
        b.stargazers_count = 50;
        b.language = Some("Go".into());
        let c = raw("C", "2024-01-01", now() - Duration::days(1));

        let outcome = transform(&[a, b, c], now());
        assert_eq!(outcome.skipped_count(), 0);
        let table = &outcome.table;
        assert_eq!(table.len(), 3);
        let active: Vec<bool> = table.iter().map(|r| r.is_active).collect();
        assert_eq!(active, vec![true, false, true]);
        let years: Vec<i32> = table.iter().map(|r| r.year_created).collect();
        assert_eq!(years, vec![2023, 2023, 2024]);
        assert_eq!(table.rows()[2].language, None);
        let names: Vec<&str> = table.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[test]
    fn empty_input_yields_empty_table() {
        let outcome = transform(&[], now());
        assert!(outcome.table.is_empty());
        assert_eq!(outcome.skipped_count(), 0);
    }

    #[test]
    fn unparseable_pushed_at_is_skipped_and_reported() {
        let good = raw("good", "2022-02-02T00:00:00Z", now() - Duration::days(3));
        let mut bad = raw("bad", "2022-02-02T00:00:00Z", now());
        bad.pushed_at = Some("last tuesday".into());

        let outcome = transform(&[good, bad], now());
        assert_eq!(outcome.table.len(), 1);
        assert_eq!(outcome.skipped_count(), 1);
        let skipped = &outcome.skipped[0];
        assert_eq!(skipped.index, 1);
        assert_eq!(skipped.name.as_deref(), Some("bad"));
        assert!(matches!(
            skipped.reason,
            MalformedRecord::InvalidTimestamp { field: "pushed_at", .. }
        ));
    }

    #[test]
    fn missing_timestamps_and_names_are_malformed() {
        let mut no_created = raw("x", "2020-01-01", now());
        no_created.created_at = None;
        let mut blank_name = raw("  ", "2020-01-01", now());
        blank_name.name = Some("  ".into());

        assert_eq!(
            normalize_repo(&no_created, now()),
            Err(MalformedRecord::MissingField {
                field: "created_at"
            })
        );
        assert_eq!(
            normalize_repo(&blank_name, now()),
            Err(MalformedRecord::MissingField { field: "name" })
        );
    }

    #[test]
    fn activity_boundary_is_exclusive_at_ninety_days() {
        let at_89 = raw("a", "2020-01-01", now() - Duration::days(89));
        let at_90 = raw("b", "2020-01-01", now() - Duration::days(90));
        let outcome = transform(&[at_89, at_90], now());
        let rows = outcome.table.rows();
        assert_eq!(rows[0].days_since_last_push, 89);
        assert!(rows[0].is_active);
        assert_eq!(rows[1].days_since_last_push, 90);
        assert!(!rows[1].is_active);
    }

    #[test]
    fn partial_days_floor_and_future_pushes_clamp() {
        let nearly_two = raw(
            "a",
            "2020-01-01",
            now() - Duration::days(1) - Duration::hours(23),
        );
        let future = raw("b", "2020-01-01", now() + Duration::hours(6));
        let outcome = transform(&[nearly_two, future], now());
        let days: Vec<i64> = outcome
            .table
            .iter()
            .map(|r| r.days_since_last_push)
            .collect();
        assert_eq!(days, vec![1, 0]);
    }

    #[test]
    fn days_are_monotonic_in_pushed_at() {
        let records: Vec<RawRepository> = (0..40)
            .map(|i| {
                let pushed = now() - Duration::hours(i * 17);
                raw(&format!("r{i}"), "2020-01-01", pushed)
            })
            .collect();
        let outcome = transform(&records, now());
        for pair in outcome.table.rows().windows(2) {
            assert!(pair[0].pushed_at >= pair[1].pushed_at);
            assert!(pair[0].days_since_last_push <= pair[1].days_since_last_push);
        }
        for row in outcome.table.iter() {
            assert!(row.days_since_last_push >= 0);
            assert_eq!(row.is_active, row.days_since_last_push < ACTIVE_THRESHOLD_DAYS);
        }
    }

    #[test]
    fn blank_language_and_url_are_absent() {
        let mut record = raw("blank", "2020-01-01", now());
        record.language = Some("".into());
        record.html_url = Some("  ".into());
        let row = normalize_repo(&record, now()).expect("valid");
        assert_eq!(row.language, None);
        assert_eq!(row.html_url, None);

        record.language = Some("Rust".into());
        record.html_url = Some("https://github.com/octo/blank".into());
        let row = normalize_repo(&record, now()).expect("valid");
        assert_eq!(row.language.as_deref(), Some("Rust"));
        assert_eq!(row.html_url.as_deref(), Some("https://github.com/octo/blank"));
    }

    #[test]
    fn transform_now_reads_the_clock_once_for_every_row() {
        let pushed = Utc::now() - Duration::days(30);
        let first = raw("first", "2020-01-01", pushed);
        let second = raw("second", "2020-01-01", pushed);
        let outcome = transform_now(&[first, second]);
        let rows = outcome.table.rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].days_since_last_push, rows[1].days_since_last_push);
        assert!(rows[0].days_since_last_push >= 30);
        assert!(rows[0].is_active);
    }

    #[test]
    fn size_is_converted_to_megabytes() {
        let mut record = raw("big", "2020-01-01", now());
        record.size_kb = 1536;
        let row = normalize_repo(&record, now()).expect("valid");
        assert_eq!(row.size_kb, 1536);
        assert_eq!(row.size_mb, 1.5);
    }

    #[test]
    fn timestamps_with_offsets_convert_to_utc() {
        let parsed = parse_timestamp("2023-12-31T23:30:00-02:00").expect("parses");
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 1, 1, 1, 30, 0).unwrap());
        assert_eq!(
            parse_timestamp("2023-06-01"),
            Some(Utc.with_ymd_and_hms(2023, 6, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(
            parse_timestamp("2023-06-01 08:15:00"),
            Some(Utc.with_ymd_and_hms(2023, 6, 1, 8, 15, 0).unwrap())
        );
        assert_eq!(parse_timestamp("2023-13-01"), None);
    }

    #[test]
    fn year_is_taken_in_utc() {
        let record = raw("tz", "2023-12-31T22:00:00-05:00", now());
        let row = normalize_repo(&record, now()).expect("valid");
        assert_eq!(row.year_created, 2024);
    }

    #[test]
    fn values_that_fail_to_decode_keep_their_index() {
        let pushed = (now() - Duration::days(2)).to_rfc3339();
        let values = vec![
            json!({"name": "ok", "created_at": "2021-01-01T00:00:00Z", "pushed_at": pushed}),
            json!(42),
            json!({"name": "no-push", "created_at": "2021-01-01T00:00:00Z"}),
            json!({"name": "also-ok", "created_at": "2022-01-01T00:00:00Z", "pushed_at": pushed}),
        ];
        let outcome = transform_values(values, now());
        assert_eq!(outcome.table.len(), 2);
        let indices: Vec<usize> = outcome.skipped.iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![1, 2]);
        assert!(matches!(
            outcome.skipped[0].reason,
            MalformedRecord::Undecodable { .. }
        ));
        assert_eq!(outcome.skipped[1].name.as_deref(), Some("no-push"));
    }
}
