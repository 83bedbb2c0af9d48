//! Typed request definitions.

use crate::constants::status;
use crate::validate::{RangeQuery, split_token};
use serde::Serialize;
use std::path::PathBuf;

/// Workflow action selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Submit a new workflow.
    Submit,
    /// List existing workflows.
    List,
    /// Cancel a workflow.
    Cancel,
    /// Show the status of a workflow.
    Status,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Submit => write!(f, "submit"),
            Self::List => write!(f, "list"),
            Self::Cancel => write!(f, "cancel"),
            Self::Status => write!(f, "status"),
        }
    }
}

/// Where and how to reach the workflow service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceSettings {
    /// Base URL of the service API.
    pub api_url_base: String,
    /// Service access key.
    pub access_key: String,
}

/// A blob reference, optionally carrying its own access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobRef {
    /// Blob (or container) name without the token.
    pub name: String,
    /// Access token that followed the `?` separator.
    pub token: Option<String>,
}

impl BlobRef {
    /// Split a validated `name[?token]` value.
    pub fn parse(value: &str) -> Self {
        let (name, token) = split_token(value);
        Self {
            name: name.to_string(),
            token: token.map(str::to_string),
        }
    }

    /// Whether the reference brings its own token.
    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }
}

impl std::fmt::Display for BlobRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.token {
            Some(token) => write!(f, "{}?{token}", self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Where the service reads input files from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputDescriptor {
    /// Storage type identifier.
    pub storage_type: String,
    /// Storage account name.
    pub account: String,
    /// Account key used to issue read tokens; absent when blobs carry tokens.
    pub account_key: Option<String>,
    /// Container holding the blobs.
    pub container: String,
    /// Primary input files.
    pub primary: Vec<BlobRef>,
    /// Secondary input files (second read of each pair).
    pub secondary: Vec<BlobRef>,
}

impl InputDescriptor {
    /// Input blobs in submission order: each primary followed by its mate.
    pub fn blobs(&self) -> impl Iterator<Item = &BlobRef> {
        let longest = self.primary.len().max(self.secondary.len());
        (0..longest).flat_map(move |i| self.primary.get(i).into_iter().chain(self.secondary.get(i)))
    }
}

/// Where the service writes its results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputDescriptor {
    /// Storage type identifier.
    pub storage_type: String,
    /// Storage account name.
    pub account: String,
    /// Account key used to issue a container token; absent when the container carries one.
    pub account_key: Option<String>,
    /// Output container, optionally with its own token.
    pub container: BlobRef,
    /// Whether existing outputs may be overwritten.
    pub overwrite: bool,
    /// Base name for all output files.
    pub filename_base: Option<String>,
    /// Whether log files are uploaded along with results.
    pub include_logfiles: bool,
}

/// Reference confidence mode requested from the variant caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RefConfidence {
    /// Plain VCF output.
    None,
    /// Genomic VCF output.
    Gvcf,
}

impl std::str::FromStr for RefConfidence {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "gvcf" => Ok(Self::Gvcf),
            other => Err(format!("invalid choice '{other}' (choose from 'none', 'gvcf')")),
        }
    }
}

/// Optional switches passed through to the process; unset values are omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OptionalArgs {
    /// Base quality score recalibration.
    #[serde(rename = "BQSR", skip_serializing_if = "Option::is_none")]
    pub bqsr: Option<bool>,
    /// Read group line override.
    #[serde(rename = "ReadGroupLine", skip_serializing_if = "Option::is_none")]
    pub read_group_line: Option<String>,
    /// Reference confidence mode.
    #[serde(rename = "GatkEmitRefConfidence", skip_serializing_if = "Option::is_none")]
    pub emit_ref_confidence: Option<RefConfidence>,
    /// Compress variant output with bgzip.
    #[serde(rename = "BgzipOutput", skip_serializing_if = "Option::is_none")]
    pub bgzip_output: Option<bool>,
}

/// A fully validated workflow submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionRequest {
    /// Genomics process to run.
    pub process_name: String,
    /// `key=value;...` process arguments.
    pub process_args: String,
    /// Free-form description.
    pub description: String,
    /// Service-side workflow class.
    pub workflow_class: String,
    /// Ask the service not to enforce region affinity.
    pub ignore_azure_region: Option<bool>,
    /// Pass-through switches.
    pub optional_args: OptionalArgs,
    /// Input location.
    pub input: InputDescriptor,
    /// Output location.
    pub output: OutputDescriptor,
    /// Lifetime of generated access tokens, in hours.
    pub sas_duration_hours: u32,
}

/// Filter on how a workflow finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Finished successfully.
    Pass,
    /// Failed.
    Fail,
}

impl Outcome {
    /// Remote status code this outcome selects.
    pub fn status_code(self) -> i64 {
        match self {
            Self::Pass => status::SUCCEEDED,
            Self::Fail => status::FAILED,
        }
    }
}

impl std::str::FromStr for Outcome {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pass" => Ok(Self::Pass),
            "fail" => Ok(Self::Fail),
            other => Err(format!("invalid choice '{other}' (choose from 'fail', 'pass')")),
        }
    }
}

/// Machine-readable list format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values.
    Csv,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            other => Err(format!("invalid choice '{other}' (choose from 'csv')")),
        }
    }
}

/// Parameters of a list request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    /// Paging; `None` lists everything oldest first.
    pub range: Option<RangeQuery>,
    /// Only workflows that finished this way.
    pub outcome: Option<Outcome>,
    /// Only workflows whose description contains this text.
    pub with_description: Option<String>,
    /// Only workflows whose process name contains this text.
    pub with_process: Option<String>,
    /// Export format; plain text when unset.
    pub export: Option<ExportFormat>,
    /// Write the report here instead of stdout.
    pub output_file: Option<PathBuf>,
}

/// What the invocation should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Submit a workflow and optionally wait for it to finish.
    Submit {
        /// Validated submission.
        request: Box<SubmissionRequest>,
        /// Poll until the workflow finishes.
        poll: bool,
    },
    /// List workflows.
    List(ListQuery),
    /// Cancel a workflow and optionally wait for the cancellation.
    Cancel {
        /// Workflow to cancel.
        workflow_id: String,
        /// Poll until the workflow is cancelled.
        poll: bool,
    },
    /// Show one workflow's status.
    Status {
        /// Workflow to query.
        workflow_id: String,
    },
}

/// A complete, validated invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Service connection settings.
    pub settings: ServiceSettings,
    /// Action and its parameters.
    pub command: Command,
}
