//! Service request body for workflow submission.

use crate::error::{Error, Result};
use crate::request::types::{
    BlobRef, InputDescriptor, OptionalArgs, OutputDescriptor, SubmissionRequest,
};
use crate::storage::{ContainerAccess, TokenIssuer};
use serde::Serialize;

/// Input location as sent to the service.
///
/// Blob lists are comma-terminated (`a.fq,b.fq,`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct InputArgs {
    /// Storage account.
    pub account: String,
    /// Container.
    pub container: String,
    /// Blob names without tokens.
    pub blobnames: String,
    /// Blob names with their read tokens.
    pub blobnames_with_sas: String,
}

/// Output location as sent to the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct OutputArgs {
    /// Storage account.
    pub account: String,
    /// `"true"` or `"false"`.
    pub overwrite: String,
    /// Container name without token.
    pub container: String,
    /// Container token.
    pub container_sas: String,
    /// Base name for output files; empty when unset.
    pub output_filename_base: String,
    /// Upload log files with the results.
    pub output_include_logfiles: bool,
}

/// JSON body of a create-workflow call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SubmitBody {
    /// Process name.
    pub process: String,
    /// Process arguments.
    pub process_args: String,
    /// Description.
    pub description: String,
    /// Input storage type.
    pub input_storage_type: String,
    /// Output storage type.
    pub output_storage_type: String,
    /// Input location.
    pub input_args: InputArgs,
    /// Output location.
    pub output_args: OutputArgs,
    /// Pass-through switches.
    pub optional_args: OptionalArgs,
    /// Workflow class.
    pub workflow_class: String,
    /// Region affinity override.
    pub ignore_azure_region: Option<bool>,
}

fn blob_with_token(
    input: &InputDescriptor,
    blob: &BlobRef,
    hours: u32,
    issuer: &dyn TokenIssuer,
) -> Result<String> {
    if blob.has_token() {
        return Ok(blob.to_string());
    }
    let Some(key) = input.account_key.as_deref() else {
        return Err(Error::Internal {
            message: format!("no token or account key for input blob '{}'", blob.name),
        });
    };
    let token = issuer.blob_read_token(&input.account, key, &input.container, &blob.name, hours)?;
    Ok(format!("{}?{token}", blob.name))
}

/// Resolve input blob tokens, issuing read tokens where none were given.
pub fn input_args(
    input: &InputDescriptor,
    hours: u32,
    issuer: &dyn TokenIssuer,
) -> Result<InputArgs> {
    let mut blobnames = String::new();
    let mut blobnames_with_sas = String::new();
    for blob in input.blobs() {
        blobnames.push_str(&blob.name);
        blobnames.push(',');
        blobnames_with_sas.push_str(&blob_with_token(input, blob, hours, issuer)?);
        blobnames_with_sas.push(',');
    }

    Ok(InputArgs {
        account: input.account.clone(),
        container: input.container.clone(),
        blobnames,
        blobnames_with_sas,
    })
}

/// Resolve the output container token, issuing one where none was given.
pub fn output_args(
    output: &OutputDescriptor,
    hours: u32,
    issuer: &dyn TokenIssuer,
) -> Result<OutputArgs> {
    let container_sas = match (&output.container.token, output.account_key.as_deref()) {
        (Some(token), _) => token.clone(),
        (None, Some(key)) => issuer.container_token(
            &output.account,
            key,
            &output.container.name,
            hours,
            ContainerAccess {
                write: true,
                list: false,
            },
        )?,
        (None, None) => {
            return Err(Error::Internal {
                message: format!(
                    "no token or account key for output container '{}'",
                    output.container.name
                ),
            });
        }
    };

    Ok(OutputArgs {
        account: output.account.clone(),
        overwrite: output.overwrite.to_string(),
        container: output.container.name.clone(),
        container_sas,
        output_filename_base: output.filename_base.clone().unwrap_or_default(),
        output_include_logfiles: output.include_logfiles,
    })
}

/// Build the create-workflow body, issuing tokens as needed.
pub fn submit_body(request: &SubmissionRequest, issuer: &dyn TokenIssuer) -> Result<SubmitBody> {
    let hours = request.sas_duration_hours;
    Ok(SubmitBody {
        process: request.process_name.clone(),
        process_args: request.process_args.clone(),
        description: request.description.clone(),
        input_storage_type: request.input.storage_type.clone(),
        output_storage_type: request.output.storage_type.clone(),
        input_args: input_args(&request.input, hours, issuer)?,
        output_args: output_args(&request.output, hours, issuer)?,
        optional_args: request.optional_args.clone(),
        workflow_class: request.workflow_class.clone(),
        ignore_azure_region: request.ignore_azure_region,
    })
}
