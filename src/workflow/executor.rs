//! Runs a validated command against the workflow service.
//!
//! Each action prints status lines as it goes and records an exit code
//! through [`resolve`]. Service failures are reported on the output and
//! folded into the exit code; only storage and local I/O failures
//! escape as errors.

use crate::constants::{POLL_INTERVAL, exit, status};
use crate::error::{Error, Result};
use crate::output::{ReportRow, report_writer, write_report};
use crate::request::{Command, ListQuery, SubmissionRequest, submit_body};
use crate::service::{ListPayload, WorkflowApi, WorkflowRecord};
use crate::storage::TokenIssuer;
use crate::validate::SortOrder;
use crate::workflow::display::{error_line, status_line};
use crate::workflow::exit_code::{LocalResult, resolve};
use chrono::{Local, Utc};
use std::fmt::Display;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::time::Duration;
use tracing::{debug, error, info};

/// Message shown when the service accepts a submission without one.
const SUBMITTED_MESSAGE: &str = "Successfully submitted";

/// Executes one command and tracks its exit code.
pub struct WorkflowExecutor<'a> {
    api: &'a dyn WorkflowApi,
    issuer: &'a dyn TokenIssuer,
    out: &'a mut dyn Write,
    poll_interval: Duration,
    exit_code: Option<i32>,
}

impl<'a> WorkflowExecutor<'a> {
    /// Create an executor that prints to `out`.
    pub fn new(api: &'a dyn WorkflowApi, issuer: &'a dyn TokenIssuer, out: &'a mut dyn Write) -> Self {
        Self {
            api,
            issuer,
            out,
            poll_interval: POLL_INTERVAL,
            exit_code: None,
        }
    }

    /// Replace the delay between status checks while polling.
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Run `command` and return the process exit code.
    ///
    /// # Errors
    ///
    /// Returns an error when storage tokens cannot be issued or when
    /// status output cannot be written.
    pub fn execute(mut self, command: &Command) -> Result<i32> {
        match command {
            Command::Submit { request, poll } => self.submit(request, *poll)?,
            Command::List(query) => self.list(query)?,
            Command::Cancel { workflow_id, poll } => self.cancel(workflow_id, *poll)?,
            Command::Status { workflow_id } => self.status(workflow_id)?,
        }
        Ok(self.exit_code.unwrap_or(exit::GENERAL))
    }

    fn set_exit_code(&mut self, response_code: Option<u16>, job_status: Option<i64>) {
        self.exit_code = Some(resolve(None, response_code, job_status));
    }

    fn set_local(&mut self, result: LocalResult) {
        self.exit_code = Some(resolve(Some(result), None, None));
    }

    fn show_status(
        &mut self,
        record: &WorkflowRecord,
        response_code: Option<u16>,
        long: bool,
    ) -> Result<()> {
        let line = status_line(record, response_code, long, &Local::now());
        writeln!(self.out, "{line}")?;
        Ok(())
    }

    fn show_error(&mut self, error: &dyn Display, response_code: u16, job_status: Option<i64>) -> Result<()> {
        writeln!(self.out, "{}", error_line(error, response_code, job_status))?;
        Ok(())
    }

    fn submit(&mut self, request: &SubmissionRequest, poll: bool) -> Result<()> {
        let body = submit_body(request, self.issuer)?;
        info!(
            "Submitting {} workflow with {} input file(s)",
            request.process_name,
            request.input.blobs().count()
        );

        let reply = match self.api.create(&body) {
            Ok(reply) => reply,
            Err(Error::Transport(e)) => {
                error!(
                    "Could not connect to the workflow service; check api_url_base and your \
                     network settings"
                );
                self.show_error(&e, 0, None)?;
                self.set_local(LocalResult::TemporaryFailure);
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        self.set_exit_code(Some(reply.code), None);
        let mut record = reply.payload;
        if record.message.is_empty() {
            record.message = SUBMITTED_MESSAGE.to_string();
        }
        self.show_status(&record, Some(reply.code), true)?;

        if poll && record.id > 0 {
            self.poll(&record.id.to_string(), status::SUCCEEDED)?;
        }
        Ok(())
    }

    /// Check the workflow until it reaches `success_status` or fails.
    fn poll(&mut self, workflow_id: &str, success_status: i64) -> Result<()> {
        info!(
            "Waiting for workflow {workflow_id}, checking every {}s",
            self.poll_interval.as_secs()
        );
        let mut response_code = 0;
        let mut job_status = None;

        loop {
            let reply = match self.api.status(workflow_id) {
                Ok(reply) => reply,
                Err(e) => {
                    debug!("Polling workflow {workflow_id} stopped: {e}");
                    return self.show_error(&e, response_code, job_status);
                }
            };

            let current = reply.payload.status;
            response_code = reply.code;
            job_status = Some(current);
            self.show_status(&reply.payload, None, false)?;
            self.set_exit_code(Some(reply.code), Some(current));

            if current == success_status || current == status::FAILED || current == status::CANCELLED {
                return Ok(());
            }
            std::thread::sleep(self.poll_interval);
        }
    }

    fn status(&mut self, workflow_id: &str) -> Result<()> {
        match self.api.status(workflow_id) {
            Ok(reply) => {
                self.show_status(&reply.payload, None, true)?;
                self.set_exit_code(None, Some(reply.payload.status));
            }
            Err(e) => {
                self.show_error(&e, 0, None)?;
                self.set_local(LocalResult::Failure);
            }
        }
        Ok(())
    }

    fn cancel(&mut self, workflow_id: &str, poll: bool) -> Result<()> {
        let mut response_code = 0;
        let cancel_code = match self.request_cancel(workflow_id, &mut response_code) {
            Ok(code) => code,
            Err(e) => {
                self.show_error(&e, response_code, None)?;
                self.set_local(LocalResult::Failure);
                return Ok(());
            }
        };

        if !poll || (400..500).contains(&cancel_code) {
            return Ok(());
        }
        self.poll(workflow_id, status::CANCELLED)
    }

    /// Request cancellation and show the resulting status.
    fn request_cancel(&mut self, workflow_id: &str, response_code: &mut u16) -> Result<u16> {
        let cancelled = self.api.cancel(workflow_id)?;
        *response_code = cancelled.code;
        self.set_exit_code(Some(cancelled.code), None);

        let current = self.api.status(workflow_id)?;
        *response_code = current.code;
        self.show_status(&current.payload, None, true)?;
        self.set_exit_code(Some(current.code), Some(current.payload.status));
        Ok(cancelled.code)
    }

    fn list(&mut self, query: &ListQuery) -> Result<()> {
        let mut response_code = 0;
        if let Err(e) = self.write_list(query, &mut response_code) {
            self.show_error(&e, response_code, None)?;
            self.set_local(LocalResult::Failure);
        }
        Ok(())
    }

    fn write_list(&mut self, query: &ListQuery, response_code: &mut u16) -> Result<()> {
        let reply = self.api.list(query)?;
        *response_code = reply.code;
        let mut records = match reply.payload {
            ListPayload::Records(records) => records,
            ListPayload::Rejected(message) => return Err(Error::ServiceRejected { message }),
        };

        // Newest-first pages arrive reversed; show them oldest first.
        if query.range.is_some_and(|range| range.order == SortOrder::Descending) {
            records.reverse();
        }

        let now = Utc::now();
        let rows: Vec<ReportRow> = records
            .iter()
            .map(|record| ReportRow::from_record(record, now))
            .collect();

        match &query.output_file {
            Some(path) => {
                let file = File::create(path)?;
                let mut writer = report_writer(query.export, BufWriter::new(file));
                write_report(writer.as_mut(), &rows)?;
                info!("Wrote {} workflow(s) to {}", rows.len(), path.display());
            }
            None => {
                let mut writer = report_writer(query.export, &mut *self.out);
                write_report(writer.as_mut(), &rows)?;
            }
        }

        self.set_exit_code(Some(reply.code), None);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use crate::request::{
        BlobRef, ExportFormat, InputDescriptor, OptionalArgs, OutputDescriptor, SubmitBody,
    };
    use crate::service::Reply;
    use crate::storage::ContainerAccess;
    use crate::validate::parse_range;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    type RecordResult = Result<Reply<WorkflowRecord>>;

    #[derive(Default)]
    struct FakeApi {
        create: RefCell<Option<RecordResult>>,
        cancel: RefCell<Option<RecordResult>>,
        statuses: RefCell<VecDeque<RecordResult>>,
        list: RefCell<Option<Result<Reply<ListPayload>>>>,
        calls: RefCell<Vec<String>>,
    }

    impl FakeApi {
        fn with_statuses(statuses: Vec<RecordResult>) -> Self {
            Self {
                statuses: RefCell::new(statuses.into()),
                ..Self::default()
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }
    }

    impl WorkflowApi for FakeApi {
        fn create(&self, _body: &SubmitBody) -> RecordResult {
            self.calls.borrow_mut().push("create".to_string());
            self.create.borrow_mut().take().unwrap()
        }

        fn cancel(&self, workflow_id: &str) -> RecordResult {
            self.calls.borrow_mut().push(format!("cancel {workflow_id}"));
            self.cancel.borrow_mut().take().unwrap()
        }

        fn status(&self, workflow_id: &str) -> RecordResult {
            self.calls.borrow_mut().push(format!("status {workflow_id}"));
            self.statuses.borrow_mut().pop_front().unwrap()
        }

        fn list(&self, _query: &ListQuery) -> Result<Reply<ListPayload>> {
            self.calls.borrow_mut().push("list".to_string());
            self.list.borrow_mut().take().unwrap()
        }
    }

    struct FailingIssuer;

    impl TokenIssuer for FailingIssuer {
        fn blob_read_token(&self, _: &str, _: &str, _: &str, _: &str, _: u32) -> Result<String> {
            Err(Error::Storage {
                reason: "account unreachable".to_string(),
            })
        }

        fn container_token(
            &self,
            _: &str,
            _: &str,
            _: &str,
            _: u32,
            _: ContainerAccess,
        ) -> Result<String> {
            Err(Error::Storage {
                reason: "account unreachable".to_string(),
            })
        }
    }

    fn record(id: i64, status: i64) -> WorkflowRecord {
        WorkflowRecord {
            id,
            status,
            process: "snapgatk".to_string(),
            description: "trio".to_string(),
            ..WorkflowRecord::default()
        }
    }

    fn reply(code: u16, id: i64, status: i64) -> RecordResult {
        Ok(Reply {
            code,
            payload: record(id, status),
        })
    }

    fn timeout() -> Error {
        Error::Transport(TransportError::Timeout {
            url: "https://genomics.example.net/api/workflows/".to_string(),
        })
    }

    fn request(account_key: Option<&str>) -> SubmissionRequest {
        let token = if account_key.is_some() { "" } else { "?sv=1&sig=x" };
        SubmissionRequest {
            process_name: "snapgatk".to_string(),
            process_args: "R=hg38m1x".to_string(),
            description: "trio".to_string(),
            workflow_class: String::new(),
            ignore_azure_region: None,
            optional_args: OptionalArgs::default(),
            input: InputDescriptor {
                storage_type: "AZURE_BLOCK_BLOB".to_string(),
                account: "inacct".to_string(),
                account_key: account_key.map(str::to_string),
                container: "input".to_string(),
                primary: vec![BlobRef::parse(&format!("a_1.fq.gz{token}"))],
                secondary: vec![BlobRef::parse(&format!("a_2.fq.gz{token}"))],
            },
            output: OutputDescriptor {
                storage_type: "AZURE_BLOCK_BLOB".to_string(),
                account: "outacct".to_string(),
                account_key: account_key.map(str::to_string),
                container: BlobRef::parse(&format!("output{token}")),
                overwrite: false,
                filename_base: None,
                include_logfiles: true,
            },
            sas_duration_hours: 48,
        }
    }

    fn submit(poll: bool) -> Command {
        Command::Submit {
            request: Box::new(request(None)),
            poll,
        }
    }

    fn run(api: &FakeApi, command: &Command) -> (Result<i32>, String) {
        let mut out = Vec::new();
        let result = WorkflowExecutor::new(api, &FailingIssuer, &mut out)
            .with_poll_interval(Duration::ZERO)
            .execute(command);
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_submit_without_poll() {
        let api = FakeApi::default();
        *api.create.borrow_mut() = Some(reply(200, 42, status::QUEUED));

        let (code, out) = run(&api, &submit(false));
        assert_eq!(code.unwrap(), 0);
        assert_eq!(api.calls(), vec!["create"]);
        assert!(out.contains("Workflow ID: 42]: Message: Successfully submitted"));
        assert!(out.contains("\tProcess: snapgatk\n\tDescription: trio"));
    }

    #[test]
    fn test_submit_polls_until_success() {
        let api = FakeApi::with_statuses(vec![
            reply(200, 42, status::QUEUED),
            reply(200, 42, status::IN_PROGRESS),
            reply(200, 42, status::SUCCEEDED),
        ]);
        *api.create.borrow_mut() = Some(reply(200, 42, status::QUEUED));

        let (code, out) = run(&api, &submit(true));
        assert_eq!(code.unwrap(), 0);
        assert_eq!(
            api.calls(),
            vec!["create", "status 42", "status 42", "status 42"]
        );
        assert!(out.contains("Message: Completed successfully"));
    }

    #[test]
    fn test_poll_stops_on_failure() {
        let api = FakeApi::with_statuses(vec![
            reply(200, 42, status::IN_PROGRESS),
            reply(200, 42, status::FAILED),
        ]);
        *api.create.borrow_mut() = Some(reply(200, 42, status::QUEUED));

        let (code, out) = run(&api, &submit(true));
        assert_eq!(code.unwrap(), 1000);
        assert!(out.contains("Message: Failed"));
    }

    #[test]
    fn test_poll_reports_error_with_last_status() {
        let api = FakeApi::with_statuses(vec![reply(200, 42, status::IN_PROGRESS), Err(timeout())]);
        *api.create.borrow_mut() = Some(reply(200, 42, status::QUEUED));

        let (code, out) = run(&api, &submit(true));
        assert_eq!(code.unwrap(), 20);
        assert!(out.contains("Response Code 200, Status In progress"));
    }

    #[test]
    fn test_rejected_submission_is_not_polled() {
        let api = FakeApi::default();
        *api.create.borrow_mut() = Some(Ok(Reply {
            code: 400,
            payload: WorkflowRecord::with_message("Invalid process arguments"),
        }));

        let (code, out) = run(&api, &submit(true));
        assert_eq!(code.unwrap(), 100);
        assert_eq!(api.calls(), vec!["create"]);
        assert!(out.contains("Message: Invalid process arguments  Status Code: 0  Response Code: 400"));
    }

    #[test]
    fn test_unreachable_service_is_temporary_failure() {
        let api = FakeApi::default();
        *api.create.borrow_mut() = Some(Err(timeout()));

        let (code, out) = run(&api, &submit(true));
        assert_eq!(code.unwrap(), 100);
        assert!(out.starts_with("Exception: request to "));
    }

    #[test]
    fn test_storage_failure_propagates_before_submission() {
        let api = FakeApi::default();
        let command = Command::Submit {
            request: Box::new(request(Some("a2V5"))),
            poll: false,
        };

        let (result, _) = run(&api, &command);
        let err = result.unwrap_err();
        assert!(matches!(err, Error::Storage { .. }));
        assert_eq!(err.exit_code(), 200);
        assert!(api.calls().is_empty());
    }

    #[test]
    fn test_status() {
        let api = FakeApi::with_statuses(vec![reply(200, 7, status::IN_PROGRESS)]);
        let command = Command::Status {
            workflow_id: "7".to_string(),
        };
        let (code, out) = run(&api, &command);
        assert_eq!(code.unwrap(), 20);
        assert!(out.contains("Workflow ID: 7]: Message: In progress\n\tProcess: snapgatk"));

        let api = FakeApi::with_statuses(vec![Err(timeout())]);
        let (code, out) = run(&api, &command);
        assert_eq!(code.unwrap(), 1);
        assert!(out.contains("Response Code 0, Status NA"));
    }

    #[test]
    fn test_cancel_not_found_skips_polling() {
        let api = FakeApi::with_statuses(vec![reply(200, 7, status::IN_PROGRESS)]);
        *api.cancel.borrow_mut() = Some(reply(404, 0, 0));

        let command = Command::Cancel {
            workflow_id: "7".to_string(),
            poll: true,
        };
        let (code, _) = run(&api, &command);
        assert_eq!(code.unwrap(), 20);
        assert_eq!(api.calls(), vec!["cancel 7", "status 7"]);
    }

    #[test]
    fn test_cancel_polls_until_cancelled() {
        let api = FakeApi::with_statuses(vec![
            reply(200, 7, status::CANCEL_REQUESTED),
            reply(200, 7, status::CANCEL_REQUESTED),
            reply(200, 7, status::CANCELLED),
        ]);
        *api.cancel.borrow_mut() = Some(reply(200, 7, status::CANCEL_REQUESTED));

        let command = Command::Cancel {
            workflow_id: "7".to_string(),
            poll: true,
        };
        let (code, out) = run(&api, &command);
        assert_eq!(code.unwrap(), 1000);
        assert_eq!(api.calls().len(), 4);
        assert!(out.contains("Message: Cancelled"));
    }

    #[test]
    fn test_cancel_error_is_failure() {
        let api = FakeApi::default();
        *api.cancel.borrow_mut() = Some(Err(timeout()));

        let command = Command::Cancel {
            workflow_id: "7".to_string(),
            poll: false,
        };
        let (code, out) = run(&api, &command);
        assert_eq!(code.unwrap(), 1);
        assert!(out.contains("Response Code 0, Status NA"));
    }

    #[test]
    fn test_list_descending_range_is_shown_oldest_first() {
        let api = FakeApi::default();
        *api.list.borrow_mut() = Some(Ok(Reply {
            code: 200,
            payload: ListPayload::Records(vec![
                record(9, status::QUEUED),
                record(8, status::SUCCEEDED),
            ]),
        }));

        let query = ListQuery {
            range: Some(parse_range("-2:").unwrap()),
            ..ListQuery::default()
        };
        let (code, out) = run(&api, &Command::List(query));
        assert_eq!(code.unwrap(), 0);
        assert!(out.contains("Total Count  : 2"));
        let first = out.find("Workflow ID     : 8").unwrap();
        let second = out.find("Workflow ID     : 9").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_list_rejected_payload() {
        let api = FakeApi::default();
        *api.list.borrow_mut() = Some(Ok(Reply {
            code: 200,
            payload: ListPayload::Rejected("Invalid filter".to_string()),
        }));

        let (code, out) = run(&api, &Command::List(ListQuery::default()));
        assert_eq!(code.unwrap(), 1);
        assert!(out.contains("Exception: service returned an error: Invalid filter, Response Code 200"));
    }

    #[test]
    fn test_list_exports_csv_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("workflows.csv");
        let api = FakeApi::default();
        *api.list.borrow_mut() = Some(Ok(Reply {
            code: 200,
            payload: ListPayload::Records(vec![record(3, status::FAILED)]),
        }));

        let query = ListQuery {
            export: Some(ExportFormat::Csv),
            output_file: Some(path.clone()),
            ..ListQuery::default()
        };
        let (code, out) = run(&api, &Command::List(query));
        assert_eq!(code.unwrap(), 0);
        assert!(out.is_empty());

        let csv = std::fs::read_to_string(&path).unwrap();
        assert!(csv.starts_with("Workflow ID,Status,Message,"));
        assert!(csv.contains("\n3,Failed,,snapgatk,trio,"));
    }
}
