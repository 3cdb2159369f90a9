use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::domain::{LeadAcknowledgement, LeadFormInput, LeadIntent};
use super::submission::{submit_within, LeadSubmitter, SubmissionError};
use super::validation::LeadFieldErrors;

pub const DEFAULT_SUBMISSION_TIMEOUT: Duration = Duration::from_secs(10);

/// Inbound lead as posted by the page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadRequest {
    #[serde(default)]
    pub intent: LeadIntent,
    #[serde(flatten)]
    pub fields: LeadFormInput,
}

/// Service composing validation and the submission collaborator.
pub struct LeadService<S> {
    submitter: Arc<S>,
    deadline: Duration,
}

impl<S> LeadService<S>
where
    S: LeadSubmitter + 'static,
{
    pub fn new(submitter: Arc<S>) -> Self {
        Self::with_deadline(submitter, DEFAULT_SUBMISSION_TIMEOUT)
    }

    pub fn with_deadline(submitter: Arc<S>, deadline: Duration) -> Self {
        Self {
            submitter,
            deadline,
        }
    }

    /// Validate and hand the lead over once; invalid input never reaches the collaborator.
    pub async fn submit(
        &self,
        request: LeadRequest,
    ) -> Result<LeadAcknowledgement, LeadServiceError> {
        let record = request
            .fields
            .to_record(request.intent)
            .map_err(LeadServiceError::Validation)?;

        let ack = submit_within(self.submitter.as_ref(), record, self.deadline).await?;
        Ok(ack)
    }
}

/// Error raised by the lead service.
#[derive(Debug, thiserror::Error)]
pub enum LeadServiceError {
    #[error("lead form has invalid fields ({0})")]
    Validation(LeadFieldErrors),
    #[error(transparent)]
    Submission(#[from] SubmissionError),
}
