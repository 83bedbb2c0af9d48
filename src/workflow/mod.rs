//! Workflow actions and their exit codes.

mod display;
mod executor;
mod exit_code;

pub use display::{error_line, status_line};
pub use executor::WorkflowExecutor;
pub use exit_code::{LocalResult, UNKNOWN_FAILURE, resolve, response_exit_code, status_exit_code};
