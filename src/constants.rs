//! Application-wide constants.
//!
//! All magic numbers and strings are defined here to ensure consistency
//! and make changes easy to track.

/// Application name used for config directories and user-facing messages.
pub const APP_NAME: &str = "wfctl";

/// Client version reported in the banner.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// User agent sent with every service request.
pub const USER_AGENT: &str = "Genomics Workflow Command-line Client";

/// Path appended to the API base URL.
pub const WORKFLOWS_PATH: &str = "api/workflows/";

/// Header carrying the service access key.
pub const ACCESS_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

/// Process used when none is given.
pub const DEFAULT_PROCESS_NAME: &str = "snapgatk";

/// Storage type used when none is given.
pub const DEFAULT_STORAGE_TYPE: &str = "AZURE_BLOCK_BLOB";

/// Default lifetime of generated access tokens, in hours.
pub const DEFAULT_SAS_DURATION_HOURS: u32 = 48;

/// Field length limits.
pub mod limits {
    /// Maximum blob name length.
    pub const BLOB_NAME: usize = 1024;

    /// Maximum workflow description length.
    pub const DESCRIPTION: usize = 500;

    /// Maximum workflow class length.
    pub const WORKFLOW_CLASS: usize = 100;

    /// Maximum read group line length.
    pub const READ_GROUP: usize = 1000;
}

/// HTTP behaviour.
pub mod http {
    use std::time::Duration;

    /// Timeout for workflow submission.
    pub const SUBMIT_TIMEOUT: Duration = Duration::from_secs(300);

    /// Timeout for every other call.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

    /// Connection establishment timeout.
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
}

/// Retry policy defaults.
///
/// With these values the client retries five times within the first minute
/// and then roughly once a minute for about 44 minutes.
pub mod retry {
    use std::time::Duration;

    /// Maximum number of retries after the first attempt.
    pub const MAX_RETRIES: u32 = 45;

    /// Delay before the first retry.
    pub const START_DELAY: Duration = Duration::from_secs(2);

    /// Multiplier applied to the delay after each retry.
    pub const BACKOFF_BASE: u32 = 2;

    /// Number of times the delay is multiplied before it is held constant.
    pub const MAX_DOUBLINGS: u32 = 5;

    /// Attempts made by the storage token issuer.
    pub const STORAGE_MAX_RETRIES: u32 = 3;

    /// Delay between storage token attempts.
    pub const STORAGE_DELAY: Duration = Duration::from_secs(1);
}

/// Interval between status checks while polling.
pub const POLL_INTERVAL: std::time::Duration = std::time::Duration::from_secs(60);

/// Remote workflow status codes.
pub mod status {
    /// Workflow is queued.
    pub const QUEUED: i64 = 1000;

    /// Workflow is running.
    pub const IN_PROGRESS: i64 = 10_000;

    /// Workflow finished successfully.
    pub const SUCCEEDED: i64 = 20_000;

    /// Workflow failed.
    pub const FAILED: i64 = 50_000;

    /// Cancellation was requested.
    pub const CANCEL_REQUESTED: i64 = 58_000;

    /// Workflow was cancelled.
    pub const CANCELLED: i64 = 60_000;
}

/// Process exit codes for failures outside the workflow status mapping.
pub mod exit {
    /// Unexpected local failure.
    pub const GENERAL: i32 = 1;

    /// Invalid command-line or config input.
    pub const USAGE: i32 = 2;

    /// Storage token could not be created.
    pub const STORAGE: i32 = 200;

    /// Interrupted by Ctrl+C (128 + SIGINT).
    pub const INTERRUPTED: i32 = 130;
}
