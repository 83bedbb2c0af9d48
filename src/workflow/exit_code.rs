//! Mapping of outcomes to process exit codes.

use crate::constants::status;

/// Exit code when nothing more specific is known.
pub const UNKNOWN_FAILURE: i32 = 1000;

/// Outcome decided locally, without consulting the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalResult {
    /// Completed.
    Success,
    /// Failed.
    Failure,
    /// Failed in a way that may go away on a later attempt.
    TemporaryFailure,
}

impl LocalResult {
    /// Exit code for this result.
    pub fn exit_code(self) -> i32 {
        match self {
            Self::Success => 0,
            Self::Failure => 1,
            Self::TemporaryFailure => 100,
        }
    }
}

/// Exit code for a recognized HTTP response code.
pub fn response_exit_code(code: u16) -> Option<i32> {
    match code {
        200 => Some(0),
        400 => Some(100),
        401 | 405 => Some(UNKNOWN_FAILURE),
        _ => None,
    }
}

/// Exit code for a recognized workflow status.
pub fn status_exit_code(code: i64) -> Option<i32> {
    match code {
        status::QUEUED => Some(10),
        status::IN_PROGRESS => Some(20),
        status::SUCCEEDED => Some(0),
        status::FAILED | status::CANCEL_REQUESTED | status::CANCELLED => Some(UNKNOWN_FAILURE),
        _ => None,
    }
}

/// Resolve the exit code from what is known about an operation.
///
/// A local result decides alone. Otherwise a recognized response code wins
/// when no workflow status is known or when it is not 200; after that a
/// recognized workflow status decides. Anything else is
/// [`UNKNOWN_FAILURE`].
pub fn resolve(
    result: Option<LocalResult>,
    response_code: Option<u16>,
    job_status: Option<i64>,
) -> i32 {
    if let Some(result) = result {
        return result.exit_code();
    }

    if let Some(code) = response_code
        && let Some(exit) = response_exit_code(code)
        && (job_status.is_none() || code != 200)
    {
        return exit;
    }

    job_status
        .and_then(status_exit_code)
        .unwrap_or(UNKNOWN_FAILURE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_result_decides_alone() {
        assert_eq!(resolve(Some(LocalResult::Failure), Some(200), Some(20_000)), 1);
        assert_eq!(resolve(Some(LocalResult::Success), Some(500), Some(50_000)), 0);
        assert_eq!(resolve(Some(LocalResult::TemporaryFailure), None, None), 100);
    }

    #[test]
    fn test_response_code_only() {
        assert_eq!(resolve(None, Some(200), None), 0);
        assert_eq!(resolve(None, Some(400), None), 100);
        assert_eq!(resolve(None, Some(401), None), 1000);
        assert_eq!(resolve(None, Some(405), None), 1000);
        assert_eq!(resolve(None, Some(500), None), 1000);
        assert_eq!(resolve(None, Some(404), None), 1000);
    }

    #[test]
    fn test_failed_response_overrides_status() {
        assert_eq!(resolve(None, Some(400), Some(20_000)), 100);
        assert_eq!(resolve(None, Some(401), Some(20_000)), 1000);
    }

    #[test]
    fn test_success_response_defers_to_status() {
        assert_eq!(resolve(None, Some(200), Some(20_000)), 0);
        assert_eq!(resolve(None, Some(200), Some(1000)), 10);
        assert_eq!(resolve(None, Some(200), Some(10_000)), 20);
        assert_eq!(resolve(None, Some(200), Some(60_000)), 1000);
        assert_eq!(resolve(None, Some(200), Some(0)), 1000);
    }

    #[test]
    fn test_unrecognized_response_defers_to_status() {
        assert_eq!(resolve(None, Some(404), Some(20_000)), 0);
        assert_eq!(resolve(None, None, Some(58_000)), 1000);
        assert_eq!(resolve(None, None, None), 1000);
    }
}
