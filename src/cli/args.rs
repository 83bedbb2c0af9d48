//! CLI argument definitions.
//!
//! Every option is taken as raw text and validated later, together with
//! values from the settings file.

use crate::config::RawOptions;
use crate::request::Action;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Submit, list, cancel and check genomics workflows.
#[derive(Debug, Parser)]
#[command(name = "wfctl")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Action to run.
    #[command(subcommand)]
    pub command: Command,

    /// Options shared by every action.
    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Options accepted by every action.
#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Base URL of the workflow service.
    #[arg(short = 'u', long, global = true, env = "WFCTL_API_URL_BASE")]
    pub api_url_base: Option<String>,

    /// Access key for the workflow service.
    #[arg(
        short = 'k',
        long,
        global = true,
        env = "WFCTL_ACCESS_KEY",
        hide_env_values = true
    )]
    pub access_key: Option<String>,

    /// Settings file (default: platform config directory).
    #[arg(short = 'f', long, global = true)]
    pub config_file: Option<PathBuf>,

    /// Only log warnings and errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase verbosity (-v: debug, -vv: trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Available actions.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Submit a workflow.
    Submit(Box<SubmitArgs>),
    /// List workflows.
    List(ListArgs),
    /// Cancel a workflow.
    Cancel(CancelArgs),
    /// Show the status of a workflow.
    Status(StatusArgs),
}

/// Options of `submit`.
#[derive(Debug, Default, Args)]
pub struct SubmitArgs {
    /// Process arguments (`key=value;...`).
    #[arg(long, visible_alias = "pa")]
    pub process_args: Option<String>,

    /// Process to run (default: snapgatk).
    #[arg(short = 'p', long)]
    pub process_name: Option<String>,

    /// Workflow description (at most 500 characters).
    #[arg(short = 'd', long)]
    pub description: Option<String>,

    /// Service-side workflow class.
    #[arg(long, visible_alias = "wc")]
    pub workflow_class: Option<String>,

    /// Input storage type (default: AZURE_BLOCK_BLOB).
    #[arg(long, visible_alias = "it")]
    pub input_storage_account_type: Option<String>,

    /// Input storage account.
    #[arg(long, visible_alias = "ia")]
    pub input_storage_account_name: Option<String>,

    /// Input storage account key; omit when blob names carry tokens.
    #[arg(long, visible_alias = "ik")]
    pub input_storage_account_key: Option<String>,

    /// Input container.
    #[arg(long, visible_alias = "ic")]
    pub input_storage_account_container: Option<String>,

    /// Input files, or the first file of each read pair.
    #[arg(long, visible_alias = "b1", num_args = 1..)]
    pub input_blob_name_1: Option<Vec<String>>,

    /// Second file of each read pair.
    #[arg(long, visible_alias = "b2", num_args = 1..)]
    pub input_blob_name_2: Option<Vec<String>>,

    /// Output storage type (default: AZURE_BLOCK_BLOB).
    #[arg(long, visible_alias = "ot")]
    pub output_storage_account_type: Option<String>,

    /// Output storage account.
    #[arg(long, visible_alias = "oa")]
    pub output_storage_account_name: Option<String>,

    /// Output storage account key; omit when the container carries a token.
    #[arg(long, visible_alias = "ok")]
    pub output_storage_account_key: Option<String>,

    /// Output container, optionally followed by `?<token>`.
    #[arg(long, visible_alias = "oc")]
    pub output_storage_account_container: Option<String>,

    /// Overwrite existing outputs (default: false).
    #[arg(long, visible_alias = "ow", num_args = 0..=1, default_missing_value = "true")]
    pub output_overwrite: Option<String>,

    /// Base name of the output files.
    #[arg(long, visible_alias = "of")]
    pub output_filename_base: Option<String>,

    /// Upload log files with the results (default: true).
    #[arg(long, visible_alias = "ol", num_args = 0..=1, default_missing_value = "true")]
    pub output_include_logfiles: Option<String>,

    /// Lifetime of generated access tokens in hours (default: 48).
    #[arg(long, visible_alias = "sas")]
    pub sas_duration: Option<String>,

    /// Keep checking the status until the workflow finishes (default: false).
    #[arg(long, visible_alias = "pl", num_args = 0..=1, default_missing_value = "true")]
    pub poll: Option<String>,

    /// Base quality score recalibration.
    #[arg(long, visible_alias = "bqsr", num_args = 0..=1, default_missing_value = "true")]
    pub bqsr_enabled: Option<String>,

    /// Read group line (`@RG\t...`).
    #[arg(long, visible_alias = "rg")]
    pub read_group: Option<String>,

    /// Reference confidence mode (`none` or `gvcf`).
    #[arg(long, visible_alias = "erc")]
    pub emit_ref_confidence: Option<String>,

    /// Compress variant output with bgzip.
    #[arg(long, visible_alias = "bz", num_args = 0..=1, default_missing_value = "true")]
    pub bgzip_output: Option<String>,

    /// Accept read pairs whose names differ in more than one character.
    #[arg(long, visible_alias = "sf", num_args = 0..=1, default_missing_value = "true")]
    pub suppress_fastq_validation: Option<String>,

    /// Let the service run the workflow outside the storage region.
    #[arg(long, visible_alias = "ar", num_args = 0..=1, default_missing_value = "true")]
    pub ignore_azure_region: Option<String>,
}

/// Options of `list`.
#[derive(Debug, Default, Args)]
pub struct ListArgs {
    /// Workflows to show by creation order (`n`, `-n`, `start:stop`).
    #[arg(short = 'r', long, allow_hyphen_values = true)]
    pub in_range: Option<String>,

    /// Only workflows that finished this way (`pass` or `fail`).
    #[arg(short = 'o', long)]
    pub outcome: Option<String>,

    /// Only workflows whose description contains this text.
    #[arg(short = 'd', long)]
    pub with_description: Option<String>,

    /// Only workflows whose process name contains this text.
    #[arg(short = 'p', long)]
    pub with_process: Option<String>,

    /// Export format (`csv`).
    #[arg(short = 'e', long)]
    pub export_to: Option<String>,

    /// Write the report to this file.
    #[arg(long, visible_alias = "of")]
    pub output_file: Option<String>,
}

/// Options of `cancel`.
#[derive(Debug, Default, Args)]
pub struct CancelArgs {
    /// Workflow to cancel.
    #[arg(short = 'w', long)]
    pub workflow_id: Option<String>,

    /// Keep checking the status until the workflow is cancelled (default: false).
    #[arg(long, visible_alias = "pl", num_args = 0..=1, default_missing_value = "true")]
    pub poll: Option<String>,
}

/// Options of `status`.
#[derive(Debug, Default, Args)]
pub struct StatusArgs {
    /// Workflow to query.
    #[arg(short = 'w', long)]
    pub workflow_id: Option<String>,
}

impl SubmitArgs {
    fn fill(self, raw: &mut RawOptions) {
        raw.set_text("process_args", self.process_args);
        raw.set_text("process_name", self.process_name);
        raw.set_text("description", self.description);
        raw.set_text("workflow_class", self.workflow_class);
        raw.set_text("input_storage_account_type", self.input_storage_account_type);
        raw.set_text("input_storage_account_name", self.input_storage_account_name);
        raw.set_text("input_storage_account_key", self.input_storage_account_key);
        raw.set_text(
            "input_storage_account_container",
            self.input_storage_account_container,
        );
        raw.set_list("input_blob_name_1", self.input_blob_name_1);
        raw.set_list("input_blob_name_2", self.input_blob_name_2);
        raw.set_text("output_storage_account_type", self.output_storage_account_type);
        raw.set_text("output_storage_account_name", self.output_storage_account_name);
        raw.set_text("output_storage_account_key", self.output_storage_account_key);
        raw.set_text(
            "output_storage_account_container",
            self.output_storage_account_container,
        );
        raw.set_text("output_overwrite", self.output_overwrite);
        raw.set_text("output_filename_base", self.output_filename_base);
        raw.set_text("output_include_logfiles", self.output_include_logfiles);
        raw.set_text("sas_duration", self.sas_duration);
        raw.set_text("poll", self.poll);
        raw.set_text("bqsr_enabled", self.bqsr_enabled);
        raw.set_text("read_group", self.read_group);
        raw.set_text("emit_ref_confidence", self.emit_ref_confidence);
        raw.set_text("bgzip_output", self.bgzip_output);
        raw.set_text("suppress_fastq_validation", self.suppress_fastq_validation);
        raw.set_text("ignore_azure_region", self.ignore_azure_region);
    }
}

impl Command {
    /// The action this subcommand runs.
    pub fn action(&self) -> Action {
        match self {
            Self::Submit(_) => Action::Submit,
            Self::List(_) => Action::List,
            Self::Cancel(_) => Action::Cancel,
            Self::Status(_) => Action::Status,
        }
    }

    fn fill(self, raw: &mut RawOptions) {
        match self {
            Self::Submit(args) => args.fill(raw),
            Self::List(args) => {
                raw.set_text("in_range", args.in_range);
                raw.set_text("outcome", args.outcome);
                raw.set_text("with_description", args.with_description);
                raw.set_text("with_process", args.with_process);
                raw.set_text("export_to", args.export_to);
                raw.set_text("output_file", args.output_file);
            }
            Self::Cancel(args) => {
                raw.set_text("workflow_id", args.workflow_id);
                raw.set_text("poll", args.poll);
            }
            Self::Status(args) => raw.set_text("workflow_id", args.workflow_id),
        }
    }
}

/// Command-line values of one invocation.
#[derive(Debug)]
pub struct CommandLine {
    /// Action to run.
    pub action: Action,
    /// Options given on the command line.
    pub options: RawOptions,
    /// Settings file requested with `--config-file`.
    pub config_file: Option<PathBuf>,
    /// Verbosity count.
    pub verbose: u8,
    /// Quiet flag.
    pub quiet: bool,
}

impl Cli {
    /// Flatten the parsed arguments into raw options.
    pub fn into_command_line(self) -> CommandLine {
        let action = self.command.action();
        let mut options = RawOptions::new();
        options.set_text("api_url_base", self.global.api_url_base);
        options.set_text("access_key", self.global.access_key);
        self.command.fill(&mut options);

        CommandLine {
            action,
            options,
            config_file: self.global.config_file,
            verbose: self.global.verbose,
            quiet: self.global.quiet,
        }
    }
}
