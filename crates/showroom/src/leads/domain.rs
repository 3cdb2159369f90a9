use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier assigned by the lead-submission collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LeadId(pub String);

/// What the prospect is asking for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LeadIntent {
    #[default]
    TestDrive,
    PreOrder,
}

impl LeadIntent {
    pub const fn label(self) -> &'static str {
        match self {
            LeadIntent::TestDrive => "test-drive",
            LeadIntent::PreOrder => "pre-order",
        }
    }

    /// Caption of the submit control for this intent.
    pub fn call_to_action(self, model_name: &str) -> String {
        match self {
            LeadIntent::TestDrive => "Book a test drive".to_string(),
            LeadIntent::PreOrder => format!("Reserve your {model_name}"),
        }
    }
}

impl std::str::FromStr for LeadIntent {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "test-drive" | "test_drive" | "testdrive" => Ok(LeadIntent::TestDrive),
            "pre-order" | "pre_order" | "preorder" => Ok(LeadIntent::PreOrder),
            other => Err(format!(
                "unknown intent '{other}' (expected test-drive or pre-order)"
            )),
        }
    }
}

/// Raw, untrimmed form fields as typed by the prospect.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LeadFormInput {
    pub full_name: String,
    pub phone: String,
    pub email: String,
    pub city: String,
    pub preferred_dealer: String,
    pub preferred_date: String,
    pub preferred_time: String,
    pub notes: String,
    pub selected_trim_code: String,
    pub exterior_color_code: String,
    pub interior_color_code: String,
}

/// Validated lead handed to the submission collaborator and then discarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadRecord {
    pub intent: LeadIntent,
    pub full_name: String,
    pub phone: String,
    pub email: String,
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_dealer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_time: Option<String>,
    pub selected_trim_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exterior_color_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interior_color_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadAcknowledgement {
    pub lead_id: LeadId,
    pub received_at: DateTime<Utc>,
}

pub(crate) fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
