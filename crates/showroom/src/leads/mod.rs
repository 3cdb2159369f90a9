//! Lead capture: field validation, the transient form, and hand-off to the
//! submission collaborator.

pub mod domain;
pub mod form;
pub mod router;
pub mod service;
pub mod submission;
pub mod validation;

#[cfg(test)]
mod tests;

pub use domain::{LeadAcknowledgement, LeadFormInput, LeadId, LeadIntent, LeadRecord};
pub use form::{
    spawn_submission, LeadForm, LeadFormError, Notice, NoticeKind, SharedLeadForm,
    SubmissionStatus, DEFAULT_NOTICE_TTL, FAILURE_NOTICE, SUCCESS_NOTICE,
};
pub use router::lead_router;
pub use service::{LeadRequest, LeadService, LeadServiceError, DEFAULT_SUBMISSION_TIMEOUT};
pub use submission::{submit_within, LeadSubmitter, SimulatedLeadSubmitter, SubmissionError};
pub use validation::{validate_lead, FieldError, LeadField, LeadFieldErrors};
