use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::response::Response;
use chrono::{TimeZone, Utc};
use serde_json::Value;

use crate::leads::domain::{LeadAcknowledgement, LeadFormInput, LeadId, LeadRecord};
use crate::leads::submission::{LeadSubmitter, SubmissionError};

pub(super) fn valid_input() -> LeadFormInput {
    LeadFormInput {
        full_name: "  Nguyen Van A ".to_string(),
        phone: "0909000000".to_string(),
        email: "x@y.com".to_string(),
        city: "Hanoi".to_string(),
        preferred_dealer: "VinFast Landmark 81".to_string(),
        preferred_date: "2025-10-05".to_string(),
        preferred_time: String::new(),
        notes: String::new(),
        selected_trim_code: "vf8-plus".to_string(),
        exterior_color_code: "crimson-red".to_string(),
        interior_color_code: String::new(),
    }
}

pub(super) fn acknowledgement(id: &str) -> LeadAcknowledgement {
    LeadAcknowledgement {
        lead_id: LeadId(id.to_string()),
        received_at: Utc
            .with_ymd_and_hms(2025, 9, 24, 10, 0, 0)
            .single()
            .expect("valid timestamp"),
    }
}

#[derive(Default)]
pub(super) struct RecordingSubmitter {
    records: Mutex<Vec<LeadRecord>>,
}

impl RecordingSubmitter {
    pub(super) fn records(&self) -> Vec<LeadRecord> {
        self.records.lock().expect("record mutex poisoned").clone()
    }
}

#[async_trait::async_trait]
impl LeadSubmitter for RecordingSubmitter {
    async fn submit(&self, record: LeadRecord) -> Result<LeadAcknowledgement, SubmissionError> {
        self.records
            .lock()
            .expect("record mutex poisoned")
            .push(record);
        Ok(acknowledgement("lead-test-1"))
    }
}

pub(super) struct FailingSubmitter(pub(super) SubmissionError);

#[async_trait::async_trait]
impl LeadSubmitter for FailingSubmitter {
    async fn submit(&self, _record: LeadRecord) -> Result<LeadAcknowledgement, SubmissionError> {
        Err(self.0.clone())
    }
}

/// Answers after `latency`, counting how many requests reached it.
pub(super) struct SlowSubmitter {
    pub(super) latency: Duration,
    pub(super) calls: Arc<AtomicUsize>,
}

impl SlowSubmitter {
    pub(super) fn new(latency: Duration) -> Self {
        Self {
            latency,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl LeadSubmitter for SlowSubmitter {
    async fn submit(&self, _record: LeadRecord) -> Result<LeadAcknowledgement, SubmissionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.latency).await;
        Ok(acknowledgement("lead-slow-1"))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 4096)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
