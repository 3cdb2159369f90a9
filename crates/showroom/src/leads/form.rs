use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::debug;

use super::domain::{LeadAcknowledgement, LeadFormInput, LeadId, LeadIntent, LeadRecord};
use super::submission::{submit_within, LeadSubmitter, SubmissionError};
use super::validation::LeadFieldErrors;
use crate::catalog::CarDetail;

pub const SUCCESS_NOTICE: &str =
    "We received your request. Our consultant will contact you shortly.";
pub const FAILURE_NOTICE: &str = "Something went wrong. Please try again.";
pub const DEFAULT_NOTICE_TTL: Duration = Duration::from_secs(4);

/// Where the form is in its single-shot request/response cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SubmissionStatus {
    Idle,
    Submitting,
    Succeeded { lead_id: LeadId },
    Failed { reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    Success,
    Failure,
}

/// Transient message shown after a submission settles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum LeadFormError {
    #[error("a lead submission is already in flight")]
    AlreadySubmitting,
    #[error("lead form has invalid fields ({0})")]
    Invalid(LeadFieldErrors),
}

/// Transient state of one lead form instance.
#[derive(Debug, Clone)]
pub struct LeadForm {
    intent: LeadIntent,
    input: LeadFormInput,
    errors: LeadFieldErrors,
    status: SubmissionStatus,
    notice: Option<Notice>,
    notice_ttl: Duration,
}

impl LeadForm {
    /// Start a form preselecting the first trim and colors of `detail`.
    pub fn new(detail: &CarDetail) -> Self {
        let first_code = |codes: Option<&String>| codes.cloned().unwrap_or_default();
        let input = LeadFormInput {
            selected_trim_code: first_code(detail.trims.first().map(|trim| &trim.code)),
            exterior_color_code: first_code(
                detail.colors.exterior.first().map(|color| &color.code),
            ),
            interior_color_code: first_code(
                detail.colors.interior.first().map(|color| &color.code),
            ),
            ..LeadFormInput::default()
        };
        Self::with_input(input)
    }

    pub fn with_input(input: LeadFormInput) -> Self {
        Self {
            intent: LeadIntent::default(),
            input,
            errors: LeadFieldErrors::default(),
            status: SubmissionStatus::Idle,
            notice: None,
            notice_ttl: DEFAULT_NOTICE_TTL,
        }
    }

    pub fn with_notice_ttl(mut self, ttl: Duration) -> Self {
        self.notice_ttl = ttl;
        self
    }

    pub fn intent(&self) -> LeadIntent {
        self.intent
    }

    pub fn set_intent(&mut self, intent: LeadIntent) {
        self.intent = intent;
    }

    pub fn input(&self) -> &LeadFormInput {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut LeadFormInput {
        &mut self.input
    }

    pub fn errors(&self) -> &LeadFieldErrors {
        &self.errors
    }

    pub fn status(&self) -> &SubmissionStatus {
        &self.status
    }

    /// The submit control is disabled while a request is outstanding.
    pub fn can_submit(&self) -> bool {
        self.status != SubmissionStatus::Submitting
    }

    /// Follow the page's current selection; `None` keeps the form's own choice.
    pub fn sync_selection(
        &mut self,
        trim_code: Option<&str>,
        exterior_code: Option<&str>,
        interior_code: Option<&str>,
    ) {
        if let Some(code) = trim_code {
            self.input.selected_trim_code = code.to_string();
        }
        if let Some(code) = exterior_code {
            self.input.exterior_color_code = code.to_string();
        }
        if let Some(code) = interior_code {
            self.input.interior_color_code = code.to_string();
        }
    }

    /// Validate and move to `Submitting`, returning the record to send.
    pub fn begin_submission(&mut self) -> Result<LeadRecord, LeadFormError> {
        if !self.can_submit() {
            return Err(LeadFormError::AlreadySubmitting);
        }

        match self.input.to_record(self.intent) {
            Ok(record) => {
                self.errors = LeadFieldErrors::default();
                self.status = SubmissionStatus::Submitting;
                Ok(record)
            }
            Err(errors) => {
                self.errors = errors.clone();
                Err(LeadFormError::Invalid(errors))
            }
        }
    }

    /// Record the collaborator's answer. Entered data is kept either way.
    pub fn settle(
        &mut self,
        result: Result<LeadAcknowledgement, SubmissionError>,
        now: DateTime<Utc>,
    ) {
        let (status, kind, message) = match result {
            Ok(ack) => (
                SubmissionStatus::Succeeded {
                    lead_id: ack.lead_id,
                },
                NoticeKind::Success,
                SUCCESS_NOTICE,
            ),
            Err(err) => (
                SubmissionStatus::Failed {
                    reason: err.to_string(),
                },
                NoticeKind::Failure,
                FAILURE_NOTICE,
            ),
        };

        let ttl = chrono::Duration::from_std(self.notice_ttl).unwrap_or(chrono::Duration::zero());
        self.status = status;
        self.notice = Some(Notice {
            kind,
            message: message.to_string(),
            expires_at: now + ttl,
        });
    }

    pub fn active_notice(&self, now: DateTime<Utc>) -> Option<&Notice> {
        self.notice.as_ref().filter(|notice| now < notice.expires_at)
    }

    pub fn dismiss_expired(&mut self, now: DateTime<Utc>) {
        if self.active_notice(now).is_none() {
            self.notice = None;
        }
    }

    /// Submit while owning the form. If this future is dropped before the
    /// collaborator answers, the form returns to `Idle`.
    pub async fn submit<S>(
        &mut self,
        submitter: &S,
        deadline: Duration,
    ) -> Result<SubmissionStatus, LeadFormError>
    where
        S: LeadSubmitter + ?Sized,
    {
        let record = self.begin_submission()?;
        let mut pending = PendingSubmission {
            form: self,
            settled: false,
        };

        let result = submit_within(submitter, record, deadline).await;
        pending.form.settle(result, Utc::now());
        pending.settled = true;
        drop(pending);

        Ok(self.status.clone())
    }
}

struct PendingSubmission<'a> {
    form: &'a mut LeadForm,
    settled: bool,
}

impl Drop for PendingSubmission<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.form.status = SubmissionStatus::Idle;
        }
    }
}

pub type SharedLeadForm = Arc<Mutex<LeadForm>>;

/// Submit in the background on behalf of a shared form.
///
/// The task only holds a weak reference: if every owner of the form is gone
/// by the time the collaborator answers, the answer is dropped.
pub fn spawn_submission(
    form: &SharedLeadForm,
    submitter: Arc<dyn LeadSubmitter>,
    deadline: Duration,
) -> Result<JoinHandle<()>, LeadFormError> {
    let record = form
        .lock()
        .expect("lead form mutex poisoned")
        .begin_submission()?;
    let owner = Arc::downgrade(form);

    Ok(tokio::spawn(async move {
        let result = submit_within(submitter.as_ref(), record, deadline).await;
        match owner.upgrade() {
            Some(form) => form
                .lock()
                .expect("lead form mutex poisoned")
                .settle(result, Utc::now()),
            None => debug!("lead form discarded before submission settled"),
        }
    }))
}
