#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("unexpected header: expected {expected:?}, found {found:?}")]
    Header { expected: String, found: String },
    #[error("row {row}: expected {expected} fields, found {found}")]
    FieldCount {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("row {row}: invalid value {value:?} for column `{column}`")]
    InvalidField {
        row: usize,
        column: &'static str,
        value: String,
    },
    #[error("unterminated quoted field starting in record {record}")]
    UnterminatedQuote { record: usize },
}

pub type Result<T> = std::result::Result<T, ExportError>;
