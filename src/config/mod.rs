//! Settings file loading and raw option handling.

mod file;
mod paths;
mod types;

pub use file::{load_invocation_options, load_options_file, parse_options};
pub use paths::{config_dir, config_file_path};
pub use types::{RawOptions, RawValue, normalize_key};
