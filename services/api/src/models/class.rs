//! Scheduled class models

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Payment status of a scheduled class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    #[serde(rename = "PAID")]
    Paid,
    #[serde(rename = "UNPAID")]
    Unpaid,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Paid => "PAID",
            PaymentStatus::Unpaid => "UNPAID",
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PAID" => Ok(PaymentStatus::Paid),
            "UNPAID" => Ok(PaymentStatus::Unpaid),
            other => Err(format!("Unknown payment status: {}", other)),
        }
    }
}

/// Student summary embedded in class responses
#[derive(Debug, Clone, Serialize)]
pub struct StudentBrief {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// Scheduled class with its student
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledClass {
    pub id: Uuid,
    pub student_id: Uuid,
    pub title: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub payment_status: PaymentStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub student: StudentBrief,
}

/// Trimmed class row embedded in the student detail view
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassSummary {
    pub id: Uuid,
    pub title: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub payment_status: PaymentStatus,
    pub notes: Option<String>,
}

/// Request for scheduling a class
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateClassRequest {
    pub student_id: Uuid,
    pub title: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub notes: Option<String>,
    pub payment_status: Option<PaymentStatus>,
}

/// Partial class update
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateClassRequest {
    pub student_id: Option<Uuid>,
    pub title: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub payment_status: Option<PaymentStatus>,
}

/// Narrow payment-status update
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStatusRequest {
    pub payment_status: PaymentStatus,
}

/// Query parameters for the class listing
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassQuery {
    /// Filter by student (teachers only; ignored for student callers)
    pub student_id: Option<Uuid>,
    /// Inclusive lower bound on start time
    #[serde(default, deserialize_with = "flexible_datetime")]
    pub start_date: Option<DateTime<Utc>>,
    /// Inclusive upper bound on start time
    #[serde(default, deserialize_with = "flexible_datetime")]
    pub end_date: Option<DateTime<Utc>>,
}

/// Accepts either a full RFC 3339 timestamp or a bare `YYYY-MM-DD` date,
/// which reads as midnight UTC.
fn flexible_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    let Some(raw) = raw else {
        return Ok(None);
    };

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(Some(timestamp.with_timezone(&Utc)));
    }

    let date = NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(serde::de::Error::custom)?;
    Ok(Some(DateTime::from_naive_utc_and_offset(
        date.and_time(NaiveTime::MIN),
        Utc,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_status_round_trips() {
        assert_eq!("PAID".parse::<PaymentStatus>().unwrap(), PaymentStatus::Paid);
        assert_eq!(PaymentStatus::Unpaid.as_str(), "UNPAID");
        assert!("PENDING".parse::<PaymentStatus>().is_err());
    }

    #[test]
    fn payment_request_rejects_unknown_values() {
        let valid: Result<PaymentStatusRequest, _> =
            serde_json::from_str(r#"{"paymentStatus":"PAID"}"#);
        assert!(valid.is_ok());

        let invalid: Result<PaymentStatusRequest, _> =
            serde_json::from_str(r#"{"paymentStatus":"LATER"}"#);
        assert!(invalid.is_err());
    }

    #[test]
    fn class_query_accepts_date_only_bounds() {
        let query: ClassQuery =
            serde_json::from_str(r#"{"startDate": "2024-01-01", "endDate": "2024-01-31"}"#)
                .unwrap();

        assert_eq!(
            query.start_date.unwrap().to_rfc3339(),
            "2024-01-01T00:00:00+00:00"
        );
        assert_eq!(
            query.end_date.unwrap().to_rfc3339(),
            "2024-01-31T00:00:00+00:00"
        );
    }

    #[test]
    fn class_query_accepts_full_timestamps() {
        let query: ClassQuery =
            serde_json::from_str(r#"{"startDate": "2024-01-01T09:30:00Z"}"#).unwrap();

        assert_eq!(
            query.start_date.unwrap().to_rfc3339(),
            "2024-01-01T09:30:00+00:00"
        );
        assert!(query.end_date.is_none());

        let empty: ClassQuery = serde_json::from_str("{}").unwrap();
        assert!(empty.start_date.is_none());
    }

    #[test]
    fn class_query_rejects_malformed_dates() {
        let result: Result<ClassQuery, _> =
            serde_json::from_str(r#"{"startDate": "January 1st"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn create_request_parses_camel_case_times() {
        let body = r#"{
            "studentId": "00000000-0000-0000-0000-000000000001",
            "title": "Lesson",
            "startTime": "2024-01-01T09:00:00Z",
            "endTime": "2024-01-01T10:00:00Z"
        }"#;
        let request: CreateClassRequest = serde_json::from_str(body).unwrap();
        assert!(request.end_time > request.start_time);
        assert!(request.payment_status.is_none());
    }
}
