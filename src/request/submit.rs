//! Submission request building.
//!
//! Building happens in two steps. [`SubmitFields::from_options`] validates
//! each option on its own; [`build_request`] then applies the rules that
//! relate options to each other and produces a [`SubmissionRequest`].

use crate::config::RawOptions;
use crate::constants::{DEFAULT_PROCESS_NAME, DEFAULT_SAS_DURATION_HOURS, DEFAULT_STORAGE_TYPE, limits};
use crate::error::{Error, Result};
use crate::request::fields::Fields;
use crate::request::types::{
    BlobRef, InputDescriptor, OptionalArgs, OutputDescriptor, RefConfidence, SubmissionRequest,
};
use crate::validate::{
    BlobRole, InputFormat, detect_format, differ_in_at_most_one, parse_non_empty,
    parse_positive_int, truncate_chars, validate_blob_name, validate_container_name,
    validate_output_blob_name, validate_process_args, validate_read_group,
};

/// Submit options after per-option validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitFields {
    /// Process to run.
    pub process_name: String,
    /// Validated process arguments.
    pub process_args: String,
    /// Description, possibly over-long.
    pub description: String,
    /// Workflow class, possibly over-long.
    pub workflow_class: String,
    /// Input storage type.
    pub input_storage_type: String,
    /// Input storage account.
    pub input_account: String,
    /// Input storage account key.
    pub input_key: Option<String>,
    /// Input container.
    pub input_container: String,
    /// Primary input blobs, possibly with tokens.
    pub input_blob_name_1: Vec<String>,
    /// Secondary input blobs, possibly with tokens.
    pub input_blob_name_2: Vec<String>,
    /// Output storage type.
    pub output_storage_type: String,
    /// Output storage account.
    pub output_account: String,
    /// Output storage account key.
    pub output_key: Option<String>,
    /// Output container, possibly with a token.
    pub output_container: String,
    /// Overwrite existing outputs.
    pub output_overwrite: bool,
    /// Base name of the output files.
    pub output_filename_base: Option<String>,
    /// Upload log files with the results.
    pub output_include_logfiles: bool,
    /// Generated token lifetime in hours.
    pub sas_duration: u32,
    /// Poll after submitting.
    pub poll: bool,
    /// Base quality score recalibration switch.
    pub bqsr_enabled: Option<bool>,
    /// Read group line.
    pub read_group: Option<String>,
    /// Reference confidence mode.
    pub emit_ref_confidence: Option<RefConfidence>,
    /// bgzip output switch.
    pub bgzip_output: Option<bool>,
    /// Skip the read-pair name check.
    pub suppress_fastq_validation: bool,
    /// Ask the service to ignore region affinity.
    pub ignore_azure_region: Option<bool>,
}

impl SubmitFields {
    /// Validate every submit option on its own.
    pub fn from_options(raw: &RawOptions) -> Result<Self> {
        let fields = Fields::new(raw);
        let storage_type = |key: &str| -> Result<String> {
            Ok(fields
                .parsed(key, parse_non_empty)?
                .unwrap_or_else(|| DEFAULT_STORAGE_TYPE.to_string()))
        };

        Ok(Self {
            process_name: fields
                .parsed("process_name", parse_non_empty)?
                .unwrap_or_else(|| DEFAULT_PROCESS_NAME.to_string()),
            process_args: fields.required("process_args", validate_process_args)?,
            description: fields.trimmed("description")?.unwrap_or_default(),
            workflow_class: fields.trimmed("workflow_class")?.unwrap_or_default(),
            input_storage_type: storage_type("input_storage_account_type")?,
            input_account: fields.required("input_storage_account_name", parse_non_empty)?,
            input_key: fields.trimmed("input_storage_account_key")?,
            input_container: fields.required("input_storage_account_container", |s| {
                validate_container_name(s, false)
            })?,
            input_blob_name_1: fields.required_list("input_blob_name_1", |s| {
                validate_blob_name(s, BlobRole::Input)
            })?,
            input_blob_name_2: fields.list("input_blob_name_2", |s| {
                validate_blob_name(s, BlobRole::Input)
            })?,
            output_storage_type: storage_type("output_storage_account_type")?,
            output_account: fields.required("output_storage_account_name", parse_non_empty)?,
            output_key: fields.trimmed("output_storage_account_key")?,
            output_container: fields.required("output_storage_account_container", |s| {
                validate_container_name(s, true)
            })?,
            output_overwrite: fields.flag("output_overwrite")?.unwrap_or(false),
            output_filename_base: fields
                .optional("output_filename_base", validate_output_blob_name)?,
            output_include_logfiles: fields.flag("output_include_logfiles")?.unwrap_or(true),
            sas_duration: fields
                .parsed("sas_duration", parse_positive_int)?
                .unwrap_or(DEFAULT_SAS_DURATION_HOURS),
            poll: fields.flag("poll")?.unwrap_or(false),
            bqsr_enabled: fields.flag("bqsr_enabled")?,
            read_group: fields.optional("read_group", validate_read_group)?,
            emit_ref_confidence: fields.parsed("emit_ref_confidence", |s| s.parse::<RefConfidence>())?,
            bgzip_output: fields.flag("bgzip_output")?,
            suppress_fastq_validation: fields
                .flag("suppress_fastq_validation")?
                .unwrap_or(false),
            ignore_azure_region: fields.flag("ignore_azure_region")?,
        })
    }
}

/// A non-fatal problem found while building a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestWarning {
    /// Genomic VCF output was requested with bgzip explicitly disabled.
    UncompressedGvcf,
    /// A read pair whose file names differ in more than one character.
    PairNameMismatch {
        /// Primary file name.
        first: String,
        /// Secondary file name.
        second: String,
    },
    /// A text option was cut to its maximum length.
    Truncated {
        /// Option name.
        option: &'static str,
        /// Maximum length in characters.
        max: usize,
    },
}

impl std::fmt::Display for RequestWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UncompressedGvcf => write!(
                f,
                "\"g.vcf\" output will not be compressed by bgzip because --bgzip-output was set to false"
            ),
            Self::PairNameMismatch { first, second } => write!(
                f,
                "file names [{first}] and [{second}] differ in more than one character; \
                 reads in them may not be paired, which will cause an error during alignment. \
                 Pass --suppress-fastq-validation true if they are"
            ),
            Self::Truncated { option, max } => {
                write!(f, "--{option} was truncated to {max} characters")
            }
        }
    }
}

/// A submission request together with the warnings raised while building it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltRequest {
    /// The validated request.
    pub request: SubmissionRequest,
    /// Non-fatal findings, in the order they were found.
    pub warnings: Vec<RequestWarning>,
}

fn check_output_credentials(output_key: Option<&str>, container: &BlobRef) -> Result<()> {
    match (output_key.is_some(), container.has_token()) {
        (true, true) => Err(Error::validation(
            "cannot specify an output storage account key AND a SAS token. \
             You must only use a key, or only use a SAS token",
        )),
        (false, false) => Err(Error::validation(
            "you must include either an output storage account key or output storage account container SAS token",
        )),
        _ => Ok(()),
    }
}

fn check_input_credentials(input_key: Option<&str>, blobs: &[&BlobRef]) -> Result<()> {
    for blob in blobs {
        match (blob.has_token(), input_key.is_some()) {
            (true, true) => {
                return Err(Error::validation(
                    "cannot specify an input storage account key AND blob SAS tokens. \
                     You must only use a key, or only use SAS tokens",
                ));
            }
            (false, false) => {
                return Err(Error::validation(
                    "you must include either an input storage account key or blob SAS token(s)",
                ));
            }
            _ => {}
        }
    }
    Ok(())
}

fn check_pairs(
    primary: &[BlobRef],
    secondary: &[BlobRef],
    suppress_name_check: bool,
    warnings: &mut Vec<RequestWarning>,
) -> Result<()> {
    if primary.len() != secondary.len() {
        return Err(Error::validation(
            "each FASTQ file provided in --input-blob-name-1 should be paired with a FASTQ file \
             in --input-blob-name-2 at the same position",
        ));
    }

    for (first, second) in primary.iter().zip(secondary) {
        if first.name == second.name {
            return Err(Error::validation(format!(
                "the same file is used at the same position in both --input-blob-name-1 and \
                 --input-blob-name-2: [{}]",
                first.name
            )));
        }
        if !suppress_name_check && !differ_in_at_most_one(&first.name, &second.name) {
            warnings.push(RequestWarning::PairNameMismatch {
                first: first.name.clone(),
                second: second.name.clone(),
            });
        }
    }
    Ok(())
}

fn limit(
    value: &str,
    option: &'static str,
    max: usize,
    warnings: &mut Vec<RequestWarning>,
) -> String {
    let (kept, truncated) = truncate_chars(value, max);
    if truncated {
        warnings.push(RequestWarning::Truncated { option, max });
    }
    kept
}

/// Apply cross-option rules and assemble the submission.
///
/// Rules run in a fixed order so that the first reported problem is
/// stable: output credentials, input credentials, presence of inputs,
/// output compression, then input format and pairing.
pub fn build_request(fields: SubmitFields) -> Result<BuiltRequest> {
    let mut warnings = Vec::new();

    let container = BlobRef::parse(&fields.output_container);
    check_output_credentials(fields.output_key.as_deref(), &container)?;

    let primary: Vec<BlobRef> = fields.input_blob_name_1.iter().map(|b| BlobRef::parse(b)).collect();
    let secondary: Vec<BlobRef> = fields.input_blob_name_2.iter().map(|b| BlobRef::parse(b)).collect();
    let all: Vec<&BlobRef> = primary.iter().chain(&secondary).collect();

    check_input_credentials(fields.input_key.as_deref(), &all)?;
    if all.is_empty() {
        return Err(Error::validation("no inputs provided"));
    }

    if fields.emit_ref_confidence == Some(RefConfidence::Gvcf) && fields.bgzip_output == Some(false) {
        warnings.push(RequestWarning::UncompressedGvcf);
    }

    let format = detect_format(all.iter().map(|b| b.name.as_str())).map_err(Error::validation)?;
    if format == InputFormat::PairedReads {
        check_pairs(&primary, &secondary, fields.suppress_fastq_validation, &mut warnings)?;
    }

    let description = limit(&fields.description, "description", limits::DESCRIPTION, &mut warnings);
    let workflow_class = limit(
        &fields.workflow_class,
        "workflow-class",
        limits::WORKFLOW_CLASS,
        &mut warnings,
    );

    let request = SubmissionRequest {
        process_name: fields.process_name,
        process_args: fields.process_args,
        description,
        workflow_class,
        ignore_azure_region: fields.ignore_azure_region,
        optional_args: OptionalArgs {
            bqsr: fields.bqsr_enabled,
            read_group_line: fields.read_group,
            emit_ref_confidence: fields.emit_ref_confidence,
            bgzip_output: fields.bgzip_output,
        },
        input: InputDescriptor {
            storage_type: fields.input_storage_type,
            account: fields.input_account,
            account_key: fields.input_key,
            container: fields.input_container,
            primary,
            secondary,
        },
        output: OutputDescriptor {
            storage_type: fields.output_storage_type,
            account: fields.output_account,
            account_key: fields.output_key,
            container,
            overwrite: fields.output_overwrite,
            filename_base: fields.output_filename_base,
            include_logfiles: fields.output_include_logfiles,
        },
        sas_duration_hours: fields.sas_duration,
    };

    Ok(BuiltRequest { request, warnings })
}
