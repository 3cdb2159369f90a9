use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use chrono::Utc;
use tracing::{info, warn};

use super::domain::{LeadAcknowledgement, LeadId, LeadRecord};

/// Outbound hook accepting assembled leads (CRM endpoint, queue, ...).
#[async_trait::async_trait]
pub trait LeadSubmitter: Send + Sync {
    async fn submit(&self, record: LeadRecord) -> Result<LeadAcknowledgement, SubmissionError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    #[error("lead rejected: {0}")]
    Rejected(String),
    #[error("lead transport unavailable: {0}")]
    Transport(String),
    #[error("lead submission timed out after {0:?}")]
    Timeout(Duration),
}

/// Submit once, failing with [`SubmissionError::Timeout`] after `deadline`. Never retries.
pub async fn submit_within<S>(
    submitter: &S,
    record: LeadRecord,
    deadline: Duration,
) -> Result<LeadAcknowledgement, SubmissionError>
where
    S: LeadSubmitter + ?Sized,
{
    let intent = record.intent.label();
    match tokio::time::timeout(deadline, submitter.submit(record)).await {
        Ok(Ok(ack)) => {
            info!(lead_id = %ack.lead_id.0, intent, "lead submitted");
            Ok(ack)
        }
        Ok(Err(err)) => {
            warn!(error = %err, intent, "lead submission failed");
            Err(err)
        }
        Err(_) => {
            warn!(?deadline, intent, "lead submission timed out");
            Err(SubmissionError::Timeout(deadline))
        }
    }
}

/// Stand-in for the CRM endpoint: waits, records the payload and acknowledges.
#[derive(Debug, Default)]
pub struct SimulatedLeadSubmitter {
    latency: Duration,
    sequence: AtomicU64,
    received: Mutex<Vec<LeadRecord>>,
}

impl SimulatedLeadSubmitter {
    pub fn new(latency: Duration) -> Self {
        Self {
            latency,
            ..Self::default()
        }
    }

    pub fn received(&self) -> Vec<LeadRecord> {
        self.received
            .lock()
            .expect("lead log mutex poisoned")
            .clone()
    }
}

#[async_trait::async_trait]
impl LeadSubmitter for SimulatedLeadSubmitter {
    async fn submit(&self, record: LeadRecord) -> Result<LeadAcknowledgement, SubmissionError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let id = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        info!(
            intent = record.intent.label(),
            trim = %record.selected_trim_code,
            city = %record.city,
            "simulated CRM accepted lead"
        );
        self.received
            .lock()
            .expect("lead log mutex poisoned")
            .push(record);

        Ok(LeadAcknowledgement {
            lead_id: LeadId(format!("lead-{id:06}")),
            received_at: Utc::now(),
        })
    }
}
