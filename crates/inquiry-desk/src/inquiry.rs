//! Core inquiry types for inquiry-desk.
//!
//! This module defines the inquiry record, its closed status set, and the
//! validation applied to contact-form submissions before they are stored.

use std::collections::HashSet;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{DateTime, SubsecRound, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Pattern an email address must match to be accepted.
const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

/// Where an inquiry is in its lifecycle.
///
/// Updates only accept the three lifecycle values. Documents written by other
/// tools may carry any string; those load as [`InquiryStatus::Other`] and are
/// written back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum InquiryStatus {
    /// Freshly submitted, not yet handled.
    #[default]
    New,
    /// Being worked with the client.
    Active,
    /// Finished.
    Completed,
    /// A stored value outside the lifecycle set.
    Other(String),
}

impl InquiryStatus {
    /// All statuses accepted on update, in lifecycle order.
    pub const ALL: [InquiryStatus; 3] = [Self::New, Self::Active, Self::Completed];

    /// The wire name of this status.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::New => "new",
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Other(other) => other,
        }
    }
}

impl std::fmt::Display for InquiryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for InquiryStatus {
    fn from(value: String) -> Self {
        value
            .parse()
            .unwrap_or_else(|UnknownStatus(other)| Self::Other(other))
    }
}

impl From<InquiryStatus> for String {
    fn from(status: InquiryStatus) -> Self {
        match status {
            InquiryStatus::Other(other) => other,
            known => known.as_str().to_string(),
        }
    }
}

/// A status string outside the accepted set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown status '{0}' (expected one of: new, active, completed)")]
pub struct UnknownStatus(pub String);

impl FromStr for InquiryStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// A stored contact-form inquiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inquiry {
    /// Creation time in Unix milliseconds, as a decimal string.
    pub id: String,
    /// Contact name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Certification the contact asked about.
    pub certification: String,
    /// Free-text message.
    pub message: String,
    /// When the inquiry was submitted.
    #[serde(with = "iso_millis")]
    pub timestamp: DateTime<Utc>,
    /// Current lifecycle status.
    #[serde(default)]
    pub status: InquiryStatus,
    /// When the status was last changed.
    #[serde(
        default,
        with = "iso_millis::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Inquiry {
    /// Build a new inquiry with status `new`.
    #[must_use]
    pub fn new(id: String, submission: NewInquiry, timestamp: DateTime<Utc>) -> Self {
        Self {
            id,
            name: submission.name,
            email: submission.email,
            certification: submission.certification,
            message: submission.message,
            timestamp: timestamp.trunc_subsecs(3),
            status: InquiryStatus::New,
            updated_at: None,
        }
    }

    /// Overwrite the status and stamp `updated_at`.
    pub fn set_status(&mut self, status: InquiryStatus, now: DateTime<Utc>) {
        self.status = status;
        self.updated_at = Some(now.trunc_subsecs(3));
    }
}

/// RFC 3339 timestamps with millisecond precision, e.g. `2024-01-15T10:00:00.123Z`.
mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        ts: &DateTime<Utc>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<DateTime<Utc>, D::Error> {
        DateTime::<Utc>::deserialize(deserializer)
    }

    pub mod option {
        use chrono::{DateTime, SecondsFormat, Utc};
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            ts: &Option<DateTime<Utc>>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match ts {
                Some(ts) => {
                    serializer.serialize_some(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
                }
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<DateTime<Utc>>, D::Error> {
            Option::<DateTime<Utc>>::deserialize(deserializer)
        }
    }
}

/// Why a contact submission was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContactError {
    /// One or more required fields were absent or blank.
    #[error("All fields are required")]
    MissingFields,
    /// The email address failed the format check.
    #[error("Invalid email address")]
    InvalidEmail,
}

/// Raw contact-form payload; every field may be absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactSubmission {
    /// Contact name.
    pub name: Option<String>,
    /// Contact email.
    pub email: Option<String>,
    /// Certification of interest.
    pub certification: Option<String>,
    /// Free-text message.
    pub message: Option<String>,
}

/// A validated contact submission, ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInquiry {
    /// Contact name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Certification of interest.
    pub certification: String,
    /// Free-text message.
    pub message: String,
}

impl ContactSubmission {
    /// Check presence of every field and the email format.
    ///
    /// # Errors
    ///
    /// Returns [`ContactError::MissingFields`] if any field is absent or blank,
    /// or [`ContactError::InvalidEmail`] if the email does not look like one.
    pub fn validate(self) -> Result<NewInquiry, ContactError> {
        let (Some(name), Some(email), Some(certification), Some(message)) = (
            present(self.name),
            present(self.email),
            present(self.certification),
            present(self.message),
        ) else {
            return Err(ContactError::MissingFields);
        };

        if !is_valid_email(&email) {
            return Err(ContactError::InvalidEmail);
        }

        Ok(NewInquiry {
            name,
            email,
            certification,
            message,
        })
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Check an email address against the accepted pattern.
///
/// # Panics
///
/// Panics if the built-in pattern fails to compile.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL
        .get_or_init(|| Regex::new(EMAIL_PATTERN).expect("Invalid email pattern"))
        .is_match(email)
}

/// Pick an id for an inquiry created at `now`.
///
/// The id is the creation time in Unix milliseconds. If that value is already
/// taken, the next free larger integer is used, so ids stay unique and roughly
/// time-ordered even when several submissions land in the same millisecond.
#[must_use]
pub fn next_id(existing: &[Inquiry], now: DateTime<Utc>) -> String {
    let taken: HashSet<&str> = existing.iter().map(|i| i.id.as_str()).collect();
    let mut candidate = now.timestamp_millis();
    while taken.contains(candidate.to_string().as_str()) {
        candidate += 1;
    }
    candidate.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn submission() -> ContactSubmission {
        ContactSubmission {
            name: Some("Ada Lovelace".to_string()),
            email: Some("ada@example.com".to_string()),
            certification: Some("ISO 9001".to_string()),
            message: Some("Please get in touch.".to_string()),
        }
    }

    fn inquiry_with_id(id: &str) -> Inquiry {
        Inquiry::new(
            id.to_string(),
            submission().validate().unwrap(),
            Utc::now(),
        )
    }

    #[test]
    fn test_status_display_and_parse() {
        for status in InquiryStatus::ALL {
            assert_eq!(status.to_string().parse::<InquiryStatus>(), Ok(status));
        }
        assert_eq!(InquiryStatus::default(), InquiryStatus::New);
    }

    #[test]
    fn test_status_parse_rejects_unknown() {
        let err = "archived".parse::<InquiryStatus>().unwrap_err();
        assert_eq!(err, UnknownStatus("archived".to_string()));
        assert!(err.to_string().contains("archived"));
        assert!("Active".parse::<InquiryStatus>().is_err());
    }

    #[test]
    fn test_valid_submission() {
        let new = submission().validate().unwrap();
        assert_eq!(new.name, "Ada Lovelace");
        assert_eq!(new.email, "ada@example.com");
    }

    #[test]
    fn test_missing_message_rejected() {
        let mut s = submission();
        s.message = None;
        assert_eq!(s.validate(), Err(ContactError::MissingFields));
    }

    #[test]
    fn test_blank_field_rejected() {
        let mut s = submission();
        s.name = Some("   ".to_string());
        assert_eq!(s.validate(), Err(ContactError::MissingFields));
    }

    #[test]
    fn test_invalid_email_rejected() {
        let mut s = submission();
        s.email = Some("not-an-email".to_string());
        assert_eq!(s.validate(), Err(ContactError::InvalidEmail));
    }

    #[test]
    fn test_email_pattern() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("first.last+tag@sub.example.org"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.d"));
        assert!(!is_valid_email("@c.d"));
        assert!(!is_valid_email("a@@c.d"));
    }

    #[test]
    fn test_inquiry_serializes_camel_case() {
        let mut inquiry = inquiry_with_id("1700000000000");
        let json = serde_json::to_value(&inquiry).unwrap();
        assert_eq!(json["status"], "new");
        assert!(json.get("updatedAt").is_none());

        inquiry.set_status(InquiryStatus::Completed, Utc::now());
        let json = serde_json::to_value(&inquiry).unwrap();
        assert_eq!(json["status"], "completed");
        assert!(json["updatedAt"].is_string());
        assert_eq!(json["certification"], "ISO 9001");
    }

    #[test]
    fn test_inquiry_deserializes_without_status() {
        let json = r#"{
            "id": "1",
            "name": "n",
            "email": "e@x.io",
            "certification": "c",
            "message": "m",
            "timestamp": "2024-01-15T10:00:00.000Z"
        }"#;
        let inquiry: Inquiry = serde_json::from_str(json).unwrap();
        assert_eq!(inquiry.status, InquiryStatus::New);
        assert!(inquiry.updated_at.is_none());
    }

    #[test]
    fn test_next_id_uses_millis() {
        let now = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        assert_eq!(next_id(&[], now), "1700000000123");
    }

    #[test]
    fn test_next_id_skips_taken_ids() {
        let now = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        let existing = vec![
            inquiry_with_id("1700000000123"),
            inquiry_with_id("1700000000124"),
        ];
        assert_eq!(next_id(&existing, now), "1700000000125");
    }

    #[test]
    fn test_foreign_status_is_kept() {
        let json = r#"{
            "id": "1",
            "name": "n",
            "email": "e@x.io",
            "certification": "c",
            "message": "m",
            "timestamp": "2024-01-15T10:00:00.000Z",
            "status": "pending"
        }"#;
        let inquiry: Inquiry = serde_json::from_str(json).unwrap();
        assert_eq!(inquiry.status, InquiryStatus::Other("pending".to_string()));

        let value = serde_json::to_value(&inquiry).unwrap();
        assert_eq!(value["status"], "pending");

        // Still refused as an update target
        assert!("pending".parse::<InquiryStatus>().is_err());
    }

    #[test]
    fn test_known_status_strings_map_to_variants() {
        assert_eq!(
            InquiryStatus::from("active".to_string()),
            InquiryStatus::Active
        );
        assert_eq!(String::from(InquiryStatus::Completed), "completed");
    }

    #[test]
    fn test_timestamps_use_millisecond_precision() {
        let submitted = Utc.timestamp_nanos(1_705_312_800_123_456_789);
        let mut inquiry =
            Inquiry::new("1".to_string(), submission().validate().unwrap(), submitted);
        inquiry.set_status(InquiryStatus::Active, submitted);

        let json = serde_json::to_value(&inquiry).unwrap();
        assert_eq!(json["timestamp"], "2024-01-15T10:00:00.123Z");
        assert_eq!(json["updatedAt"], "2024-01-15T10:00:00.123Z");

        let back: Inquiry = serde_json::from_value(json).unwrap();
        assert_eq!(back, inquiry);
    }
}
