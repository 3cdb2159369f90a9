use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use super::domain::{non_empty, LeadFormInput, LeadIntent, LeadRecord};

// Deliberately coarse; matches what the page has always accepted.
static EMAIL_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LeadField {
    FullName,
    Phone,
    Email,
    City,
}

impl LeadField {
    pub const ALL: [LeadField; 4] = [
        LeadField::FullName,
        LeadField::Phone,
        LeadField::Email,
        LeadField::City,
    ];

    pub const fn key(self) -> &'static str {
        match self {
            LeadField::FullName => "fullName",
            LeadField::Phone => "phone",
            LeadField::Email => "email",
            LeadField::City => "city",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldError {
    Required,
    InvalidEmail,
}

impl FieldError {
    pub const fn message(self) -> &'static str {
        match self {
            FieldError::Required => "Required",
            FieldError::InvalidEmail => "Invalid email",
        }
    }
}

/// Per-field outcome of validating a lead form; empty means submittable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadFieldErrors {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<FieldError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<FieldError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<FieldError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<FieldError>,
}

impl LeadFieldErrors {
    pub fn is_empty(&self) -> bool {
        LeadField::ALL.iter().all(|field| self.get(*field).is_none())
    }

    pub fn get(&self, field: LeadField) -> Option<FieldError> {
        match field {
            LeadField::FullName => self.full_name,
            LeadField::Phone => self.phone,
            LeadField::Email => self.email,
            LeadField::City => self.city,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (LeadField, FieldError)> + '_ {
        LeadField::ALL
            .into_iter()
            .filter_map(|field| self.get(field).map(|error| (field, error)))
    }
}

impl fmt::Display for LeadFieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, error) in self.iter() {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", field.key(), error.message())?;
            first = false;
        }
        Ok(())
    }
}

fn required(value: &str) -> Option<FieldError> {
    value.trim().is_empty().then_some(FieldError::Required)
}

/// Email is checked untrimmed against the pattern once it is known to be non-blank.
fn email(value: &str) -> Option<FieldError> {
    if value.trim().is_empty() {
        return Some(FieldError::Required);
    }
    (!EMAIL_SHAPE.is_match(value)).then_some(FieldError::InvalidEmail)
}

pub fn validate_lead(input: &LeadFormInput) -> LeadFieldErrors {
    LeadFieldErrors {
        full_name: required(&input.full_name),
        phone: required(&input.phone),
        email: email(&input.email),
        city: required(&input.city),
    }
}

impl LeadFormInput {
    pub fn validate(&self) -> LeadFieldErrors {
        validate_lead(self)
    }

    /// Assemble the submission payload from trimmed contact fields.
    pub fn to_record(&self, intent: LeadIntent) -> Result<LeadRecord, LeadFieldErrors> {
        let errors = self.validate();
        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(LeadRecord {
            intent,
            full_name: self.full_name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            email: self.email.trim().to_string(),
            city: self.city.trim().to_string(),
            preferred_dealer: non_empty(&self.preferred_dealer),
            preferred_date: non_empty(&self.preferred_date),
            preferred_time: non_empty(&self.preferred_time),
            selected_trim_code: self.selected_trim_code.clone(),
            exterior_color_code: non_empty(&self.exterior_color_code),
            interior_color_code: non_empty(&self.interior_color_code),
            notes: non_empty(&self.notes),
        })
    }
}
