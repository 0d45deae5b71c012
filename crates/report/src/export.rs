//! Flat CSV export of the normalized table.
//!
//! Column names and order mirror [`NormalizedRepository`]; downstream
//! consumers rely on them, so they only ever change together with the model.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use normalizer::{NormalizedRepository, RepoTable};
use tracing::debug;

use crate::errors::{ExportError, Result};

pub const DELIMITER: char = ',';
const QUOTE: char = '"';

pub const COLUMNS: [&str; 15] = [
    "name",
    "private",
    "language",
    "stars",
    "forks",
    "open_issues",
    "size_kb",
    "size_mb",
    "archived",
    "created_at",
    "pushed_at",
    "year_created",
    "days_since_last_push",
    "is_active",
    "html_url",
];

pub fn header_line() -> String {
    COLUMNS.join(&DELIMITER.to_string())
}

pub fn to_csv_string(table: &RepoTable) -> String {
    let mut out = header_line();
    out.push('\n');
    for repo in table {
        let fields = encode_row(repo);
        let escaped: Vec<String> = fields.iter().map(|f| escape_field(f)).collect();
        out.push_str(&escaped.join(&DELIMITER.to_string()));
        out.push('\n');
    }
    out
}

pub fn write_csv(table: &RepoTable, path: &Path) -> Result<()> {
    let content = to_csv_string(table);
    fs::write(path, content)?;
    debug!(path = %path.display(), rows = table.len(), "wrote csv export");
    Ok(())
}

pub fn read_csv(path: &Path) -> Result<Vec<NormalizedRepository>> {
    let content = fs::read_to_string(path)?;
    parse_csv(&content)
}

pub fn parse_csv(content: &str) -> Result<Vec<NormalizedRepository>> {
    let mut records = split_records(content)?.into_iter();
    let header = records.next().unwrap_or_default();
    if header != COLUMNS {
        return Err(ExportError::Header {
            expected: header_line(),
            found: header.join(&DELIMITER.to_string()),
        });
    }
    records
        .enumerate()
        .map(|(i, fields)| decode_row(i + 1, &fields))
        .collect()
}

fn encode_row(repo: &NormalizedRepository) -> [String; 15] {
    [
        repo.name.clone(),
        repo.is_private.to_string(),
        repo.language.clone().unwrap_or_default(),
        repo.stargazer_count.to_string(),
        repo.fork_count.to_string(),
        repo.open_issue_count.to_string(),
        repo.size_kb.to_string(),
        repo.size_mb.to_string(),
        repo.is_archived.to_string(),
        format_timestamp(repo.created_at),
        format_timestamp(repo.pushed_at),
        repo.year_created.to_string(),
        repo.days_since_last_push.to_string(),
        repo.is_active.to_string(),
        repo.html_url.clone().unwrap_or_default(),
    ]
}

fn decode_row(row: usize, fields: &[String]) -> Result<NormalizedRepository> {
    if fields.len() != COLUMNS.len() {
        return Err(ExportError::FieldCount {
            row,
            expected: COLUMNS.len(),
            found: fields.len(),
        });
    }
    let cell = |column: usize| fields[column].as_str();
    Ok(NormalizedRepository {
        name: cell(0).to_string(),
        is_private: parse_field(row, COLUMNS[1], cell(1))?,
        language: optional(cell(2)),
        stargazer_count: parse_field(row, COLUMNS[3], cell(3))?,
        fork_count: parse_field(row, COLUMNS[4], cell(4))?,
        open_issue_count: parse_field(row, COLUMNS[5], cell(5))?,
        size_kb: parse_field(row, COLUMNS[6], cell(6))?,
        size_mb: parse_field(row, COLUMNS[7], cell(7))?,
        is_archived: parse_field(row, COLUMNS[8], cell(8))?,
        created_at: parse_instant(row, COLUMNS[9], cell(9))?,
        pushed_at: parse_instant(row, COLUMNS[10], cell(10))?,
        year_created: parse_field(row, COLUMNS[11], cell(11))?,
        days_since_last_push: parse_field(row, COLUMNS[12], cell(12))?,
        is_active: parse_field(row, COLUMNS[13], cell(13))?,
        html_url: optional(cell(14)),
    })
}

fn format_timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

fn optional(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn parse_field<T: FromStr>(row: usize, column: &'static str, value: &str) -> Result<T> {
    value.parse().map_err(|_| ExportError::InvalidField {
        row,
        column,
        value: value.to_string(),
    })
}

fn parse_instant(row: usize, column: &'static str, value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|_| ExportError::InvalidField {
            row,
            column,
            value: value.to_string(),
        })
}

fn escape_field(value: &str) -> String {
    let needs_quotes = value
        .chars()
        .any(|c| c == DELIMITER || c == QUOTE || c == '\n' || c == '\r');
    if needs_quotes {
        let doubled = value.replace(QUOTE, "\"\"");
        format!("{QUOTE}{doubled}{QUOTE}")
    } else {
        value.to_string()
    }
}

/// Splits CSV text into records, honouring quoted fields that contain
/// delimiters, doubled quotes and line breaks. Blank lines are ignored.
fn split_records(content: &str) -> Result<Vec<Vec<String>>> {
    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = content.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            match ch {
                QUOTE if chars.peek() == Some(&QUOTE) => {
                    chars.next();
                    field.push(QUOTE);
                }
                QUOTE => in_quotes = false,
                other => field.push(other),
            }
            continue;
        }
        match ch {
            QUOTE => in_quotes = true,
            DELIMITER => record.push(std::mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' | '\r' => {
                record.push(std::mem::take(&mut field));
                if !(record.len() == 1 && record[0].is_empty()) {
                    records.push(std::mem::take(&mut record));
                } else {
                    record.clear();
                }
            }
            other => field.push(other),
        }
    }
    if in_quotes {
        return Err(ExportError::UnterminatedQuote {
            record: records.len() + 1,
        });
    }
    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push(record);
    }
    Ok(records)
}
