//! Per-option validation.
//!
//! Every validator returns `Result<T, String>` with a human-readable reason;
//! callers attach the option name when turning it into an [`crate::Error`].

mod args;
mod blob;
mod pairing;
mod range;
mod scalar;

pub use args::{READ_GROUP_PREFIX, validate_process_args, validate_read_group};
pub use blob::{
    BlobRole, TOKEN_SEPARATOR, split_token, validate_blob_name, validate_container_name,
    validate_output_blob_name,
};
pub use pairing::{InputFormat, classify, detect_format, differ_in_at_most_one};
pub use range::{RangeQuery, SortOrder, parse_range};
pub use scalar::{parse_bool, parse_non_empty, parse_positive_int, truncate_chars};
