#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MalformedRecord {
    #[error("missing required field `{field}`")]
    MissingField { field: &'static str },
    #[error("field `{field}` is not a valid timestamp: {value:?}")]
    InvalidTimestamp { field: &'static str, value: String },
    #[error("record could not be decoded: {message}")]
    Undecodable { message: String },
}
