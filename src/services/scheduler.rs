//! Strategy call booking.

use std::sync::Mutex;

use chrono::{Days, NaiveDate, Utc};
use tracing::info;
use uuid::Uuid;

use crate::config::BookingConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{BookingConfirmation, BookingRequest, BookingSlot};

/// Books strategy calls.
pub trait CallScheduler: Send + Sync {
    /// Books the requested slot.
    fn book(&self, request: &BookingRequest) -> EngineResult<BookingConfirmation>;
}

/// Lists the slots offered on `today`.
///
/// The offer covers the `days_offered` days after `today`, each with the
/// morning and then the afternoon times, in chronological order.
///
/// # Examples
///
/// ```
/// use wellbeing_audit::config::BookingConfig;
/// use wellbeing_audit::services::offered_slots;
/// use chrono::NaiveDate;
///
/// let today = NaiveDate::from_ymd_opt(2026, 10, 23).unwrap();
/// let slots = offered_slots(&BookingConfig::default(), today);
/// assert_eq!(slots.len(), 32);
/// assert_eq!(slots[0].to_string(), "2026-10-24 09:00");
/// ```
pub fn offered_slots(booking: &BookingConfig, today: NaiveDate) -> Vec<BookingSlot> {
    let mut times: Vec<_> = booking
        .morning_slots
        .iter()
        .chain(booking.afternoon_slots.iter())
        .copied()
        .collect();
    times.sort();
    times.dedup();

    (1..=u64::from(booking.days_offered))
        .filter_map(|offset| today.checked_add_days(Days::new(offset)))
        .flat_map(|date| times.iter().map(move |&time| BookingSlot { date, time }))
        .collect()
}

/// Scheduler that accepts offered slots and keeps bookings in memory.
///
/// A slot can only be booked once.
#[derive(Debug, Default)]
pub struct SimulatedScheduler {
    booked: Mutex<Vec<BookingConfirmation>>,
}

impl SimulatedScheduler {
    /// Creates a scheduler with no bookings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every confirmed booking.
    pub fn bookings(&self) -> Vec<BookingConfirmation> {
        self.booked
            .lock()
            .map(|booked| booked.clone())
            .unwrap_or_default()
    }
}

impl CallScheduler for SimulatedScheduler {
    fn book(&self, request: &BookingRequest) -> EngineResult<BookingConfirmation> {
        let mut booked = self.booked.lock().map_err(|_| EngineError::DeliveryFailed {
            message: "scheduler state poisoned".to_string(),
        })?;

        if booked.iter().any(|b| b.slot == request.slot) {
            return Err(EngineError::SlotUnavailable {
                slot: request.slot.to_string(),
            });
        }

        let confirmation = BookingConfirmation {
            confirmation_id: Uuid::new_v4(),
            slot: request.slot,
            contact: request.contact.clone(),
            booked_at: Utc::now(),
        };
        booked.push(confirmation.clone());

        info!(
            session_id = %request.session_id,
            slot = %request.slot,
            "Strategy call booked"
        );

        Ok(confirmation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LeadContact;
    use chrono::NaiveTime;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 23).unwrap()
    }

    fn request(slot: BookingSlot) -> BookingRequest {
        BookingRequest {
            session_id: Uuid::new_v4(),
            contact: LeadContact {
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
            },
            slot,
        }
    }

    #[test]
    fn test_offered_slots_start_tomorrow() {
        let slots = offered_slots(&BookingConfig::default(), today());

        assert!(slots.iter().all(|s| s.date > today()));
        assert_eq!(slots.first().unwrap().date, NaiveDate::from_ymd_opt(2026, 10, 24).unwrap());
        assert_eq!(slots.last().unwrap().date, NaiveDate::from_ymd_opt(2026, 10, 27).unwrap());
        assert_eq!(
            slots.last().unwrap().time,
            NaiveTime::from_hms_opt(16, 45, 0).unwrap()
        );
    }

    #[test]
    fn test_offered_slots_are_chronological() {
        let slots = offered_slots(&BookingConfig::default(), today());
        let mut sorted = slots.clone();
        sorted.sort();
        assert_eq!(slots, sorted);
    }

    #[test]
    fn test_offered_slots_dedup_times() {
        let at = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap();
        let booking = BookingConfig {
            days_offered: 1,
            morning_slots: vec![at(10, 0), at(9, 0)],
            afternoon_slots: vec![at(10, 0)],
        };
        let slots = offered_slots(&booking, today());
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].time, at(9, 0));
    }

    #[test]
    fn test_no_days_offered_means_no_slots() {
        let booking = BookingConfig {
            days_offered: 0,
            ..BookingConfig::default()
        };
        assert!(offered_slots(&booking, today()).is_empty());
    }

    #[test]
    fn test_booking_confirms_slot() {
        let scheduler = SimulatedScheduler::new();
        let slot = offered_slots(&BookingConfig::default(), today())[0];

        let confirmation = scheduler.book(&request(slot)).unwrap();

        assert_eq!(confirmation.slot, slot);
        assert_eq!(confirmation.contact.name, "Ada");
        assert_eq!(scheduler.bookings().len(), 1);
    }

    #[test]
    fn test_double_booking_rejected() {
        let scheduler = SimulatedScheduler::new();
        let slot = offered_slots(&BookingConfig::default(), today())[3];
        scheduler.book(&request(slot)).unwrap();

        match scheduler.book(&request(slot)) {
            Err(EngineError::SlotUnavailable { slot: s }) => assert_eq!(s, slot.to_string()),
            other => panic!("Expected SlotUnavailable, got {:?}", other),
        }
    }
}
