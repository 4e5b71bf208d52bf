//! Lead capture, report delivery and call booking models.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};

/// The contact details captured on the results gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadContact {
    /// The visitor's name.
    pub name: String,
    /// The visitor's email address.
    pub email: String,
}

impl LeadContact {
    /// Requires a non-blank name and an email containing `@`.
    ///
    /// # Examples
    ///
    /// ```
    /// use wellbeing_audit::models::LeadContact;
    ///
    /// let contact = LeadContact {
    ///     name: "Ada".to_string(),
    ///     email: "ada@example.com".to_string(),
    /// };
    /// assert!(contact.validate().is_ok());
    /// ```
    pub fn validate(&self) -> EngineResult<()> {
        if self.name.trim().is_empty() {
            return Err(EngineError::invalid_input("name", "must not be empty"));
        }
        if !self.email.contains('@') {
            return Err(EngineError::invalid_input(
                "email",
                "must be an email address",
            ));
        }
        Ok(())
    }
}

/// Progress of the emailed report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// Delivery scheduled.
    Sending,
    /// Delivered.
    Sent,
}

/// A bookable call slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BookingSlot {
    /// Day of the call.
    pub date: NaiveDate,
    /// Start time of the call.
    pub time: NaiveTime,
}

impl fmt::Display for BookingSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.date, self.time.format("%H:%M"))
    }
}

/// Request handed to the report mailer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRequest {
    /// Session the report belongs to.
    pub session_id: Uuid,
    /// Recipient.
    pub contact: LeadContact,
    /// Company the report is about.
    pub company_name: String,
    /// Headline figure, already formatted.
    pub headline: String,
}

/// Proof that a report was handed off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryReceipt {
    /// Identifier assigned by the mailer.
    pub receipt_id: Uuid,
    /// Recipient address.
    pub email: String,
    /// When the mailer accepted the report.
    pub delivered_at: DateTime<Utc>,
}

/// Request handed to the call scheduler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequest {
    /// Session the booking belongs to.
    pub session_id: Uuid,
    /// Who the call is with.
    pub contact: LeadContact,
    /// The chosen slot.
    pub slot: BookingSlot,
}

/// A confirmed strategy call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingConfirmation {
    /// Identifier assigned by the scheduler.
    pub confirmation_id: Uuid,
    /// The booked slot.
    pub slot: BookingSlot,
    /// Who the call is with.
    pub contact: LeadContact,
    /// When the booking was made.
    pub booked_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact(name: &str, email: &str) -> LeadContact {
        LeadContact {
            name: name.to_string(),
            email: email.to_string(),
        }
    }

    #[test]
    fn test_valid_contact() {
        assert!(contact("Ada", "ada@example.com").validate().is_ok());
    }

    #[test]
    fn test_blank_name_rejected() {
        let err = contact("   ", "ada@example.com").validate().unwrap_err();
        assert!(err.to_string().contains("name"));
    }

    #[test]
    fn test_email_without_at_rejected() {
        let err = contact("Ada", "ada.example.com").validate().unwrap_err();
        assert!(err.to_string().contains("email"));
    }

    #[test]
    fn test_report_status_defaults_to_idle() {
        assert_eq!(ReportStatus::default(), ReportStatus::Idle);
        assert_eq!(serde_json::to_string(&ReportStatus::Sending).unwrap(), "\"sending\"");
    }

    #[test]
    fn test_booking_slot_display() {
        let slot = BookingSlot {
            date: NaiveDate::from_ymd_opt(2026, 10, 25).unwrap(),
            time: NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
        };
        assert_eq!(slot.to_string(), "2026-10-25 09:30");
    }

    #[test]
    fn test_booking_slot_ordering_is_chronological() {
        let early = BookingSlot {
            date: NaiveDate::from_ymd_opt(2026, 10, 25).unwrap(),
            time: NaiveTime::from_hms_opt(16, 45, 0).unwrap(),
        };
        let late = BookingSlot {
            date: NaiveDate::from_ymd_opt(2026, 10, 26).unwrap(),
            time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        };
        assert!(early < late);
    }
}
