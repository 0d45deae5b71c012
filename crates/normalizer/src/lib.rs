pub mod errors;
pub mod models;
pub mod payloads;
pub mod transform;

pub use errors::MalformedRecord;
pub use models::{NormalizedRepository, RepoTable, ACTIVE_THRESHOLD_DAYS};
pub use payloads::RawRepository;
pub use transform::{
    decode_records, normalize_repo, parse_timestamp, transform, transform_now, transform_values,
    SkippedRecord, TransformOutcome,
};
