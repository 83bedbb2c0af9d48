//! Turning merged options into a validated invocation.

mod fields;
mod payload;
mod submit;
mod types;

pub use payload::{InputArgs, OutputArgs, SubmitBody, input_args, output_args, submit_body};
pub use submit::{BuiltRequest, RequestWarning, SubmitFields, build_request};
pub use types::{
    Action, BlobRef, Command, ExportFormat, InputDescriptor, Invocation, ListQuery, OptionalArgs,
    Outcome, OutputDescriptor, RefConfidence, ServiceSettings, SubmissionRequest,
};

use crate::config::RawOptions;
use crate::error::Result;
use crate::validate::{parse_non_empty, parse_range};
use fields::Fields;
use std::path::PathBuf;
use tracing::debug;

const COMMON_KEYS: &[&str] = &["api_url_base", "access_key", "config_file"];

const SUBMIT_KEYS: &[&str] = &[
    "process_name",
    "process_args",
    "description",
    "workflow_class",
    "input_storage_account_type",
    "input_storage_account_name",
    "input_storage_account_key",
    "input_storage_account_container",
    "input_blob_name_1",
    "input_blob_name_2",
    "output_storage_account_type",
    "output_storage_account_name",
    "output_storage_account_key",
    "output_storage_account_container",
    "output_overwrite",
    "output_filename_base",
    "output_include_logfiles",
    "sas_duration",
    "poll",
    "bqsr_enabled",
    "read_group",
    "emit_ref_confidence",
    "bgzip_output",
    "suppress_fastq_validation",
    "ignore_azure_region",
];

const LIST_KEYS: &[&str] = &[
    "in_range",
    "outcome",
    "with_description",
    "with_process",
    "export_to",
    "output_file",
];

const CANCEL_KEYS: &[&str] = &["workflow_id", "poll"];

const STATUS_KEYS: &[&str] = &["workflow_id"];

/// Option names an action understands, besides the common ones.
pub fn action_keys(action: Action) -> &'static [&'static str] {
    match action {
        Action::Submit => SUBMIT_KEYS,
        Action::List => LIST_KEYS,
        Action::Cancel => CANCEL_KEYS,
        Action::Status => STATUS_KEYS,
    }
}

/// A validated invocation and the warnings raised while building it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prepared {
    /// What to run.
    pub invocation: Invocation,
    /// Non-fatal findings.
    pub warnings: Vec<RequestWarning>,
}

fn service_settings(fields: &Fields<'_>) -> Result<ServiceSettings> {
    Ok(ServiceSettings {
        api_url_base: fields.required("api_url_base", parse_non_empty)?,
        access_key: fields.required("access_key", parse_non_empty)?,
    })
}

fn list_query(fields: &Fields<'_>) -> Result<ListQuery> {
    Ok(ListQuery {
        range: fields.parsed("in_range", parse_range)?,
        outcome: fields.parsed("outcome", |s| s.parse::<Outcome>())?,
        with_description: fields.trimmed("with_description")?,
        with_process: fields.trimmed("with_process")?,
        export: fields.parsed("export_to", |s| s.parse::<ExportFormat>())?,
        output_file: fields.trimmed("output_file")?.map(PathBuf::from),
    })
}

/// Validate merged options for `action`.
///
/// Options that belong to other actions are ignored.
pub fn build_invocation(action: Action, raw: &RawOptions) -> Result<Prepared> {
    let known = action_keys(action);
    for key in raw.keys() {
        if !COMMON_KEYS.contains(&key) && !known.contains(&key) {
            debug!("Ignoring option '{key}' for {action}");
        }
    }

    let fields = Fields::new(raw);
    let settings = service_settings(&fields)?;
    let mut warnings = Vec::new();

    let command = match action {
        Action::Submit => {
            let submit = SubmitFields::from_options(raw)?;
            let poll = submit.poll;
            let built = build_request(submit)?;
            warnings = built.warnings;
            Command::Submit {
                request: Box::new(built.request),
                poll,
            }
        }
        Action::List => Command::List(list_query(&fields)?),
        Action::Cancel => Command::Cancel {
            workflow_id: fields.required("workflow_id", parse_non_empty)?,
            poll: fields.flag("poll")?.unwrap_or(false),
        },
        Action::Status => Command::Status {
            workflow_id: fields.required("workflow_id", parse_non_empty)?,
        },
    };

    Ok(Prepared {
        invocation: Invocation { settings, command },
        warnings,
    })
}
