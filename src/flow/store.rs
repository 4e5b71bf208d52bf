//! Live funnel sessions and their pending timers.
//!
//! The store owns every [`FunnelSession`] together with the timers that
//! drive its loader steps, its report delivery and its expiry. Timers only
//! hold a weak reference to the store and are tagged with the session's
//! generation, which a restart bumps, so a timer that fires after a restart
//! changes nothing.
//!
//! A session that goes untouched for `timings.session_idle_ms` is discarded.
//! Every visitor access re-arms that timer; the loader timers do not.
//!
//! The mailer and the scheduler are called without the store lock held. The
//! directory lookup runs under it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use chrono::{NaiveDate, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::ConfigLoader;
use crate::error::{EngineError, EngineResult};
use crate::models::{BookingSlot, LeadContact, ReportRequest, ReportStatus};
use crate::services::{
    CallScheduler, CompanyDirectory, ConfiguredDirectory, ReportMailer, SimulatedMailer,
    SimulatedScheduler, offered_slots,
};

use super::{FunnelContext, FunnelEvent, FunnelSession, FunnelStep, ScheduledTask, SessionView};

type Sessions = HashMap<Uuid, SessionEntry>;

/// The outside services a funnel talks to.
#[derive(Clone)]
pub struct Collaborators {
    /// Resolves domains to company profiles.
    pub directory: Arc<dyn CompanyDirectory>,
    /// Sends reports to captured leads.
    pub mailer: Arc<dyn ReportMailer>,
    /// Books strategy calls.
    pub scheduler: Arc<dyn CallScheduler>,
}

impl Collaborators {
    /// The in-process implementations backed by the configuration.
    pub fn simulated(config: &ConfigLoader) -> Self {
        Self {
            directory: Arc::new(ConfiguredDirectory::new(config.companies().clone())),
            mailer: Arc::new(SimulatedMailer::new()),
            scheduler: Arc::new(SimulatedScheduler::new()),
        }
    }
}

struct SessionEntry {
    session: FunnelSession,
    generation: u64,
    touches: u64,
    step_timer: Option<ScheduledTask>,
    delivery: Option<ScheduledTask>,
    expiry: Option<ScheduledTask>,
}

impl SessionEntry {
    fn new(session: FunnelSession) -> Self {
        Self {
            session,
            generation: 0,
            touches: 0,
            step_timer: None,
            delivery: None,
            expiry: None,
        }
    }
}

/// All live sessions.
pub struct SessionStore {
    config: Arc<ConfigLoader>,
    collaborators: Collaborators,
    sessions: Mutex<Sessions>,
}

impl SessionStore {
    /// Creates an empty store.
    pub fn new(config: Arc<ConfigLoader>, collaborators: Collaborators) -> Arc<Self> {
        Arc::new(Self {
            config,
            collaborators,
            sessions: Mutex::new(HashMap::new()),
        })
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.lock().map(|sessions| sessions.len()).unwrap_or_default()
    }

    /// Whether there are no live sessions.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Starts a new session on the search step.
    pub fn create(self: &Arc<Self>) -> EngineResult<SessionView> {
        let session = FunnelSession::new(Uuid::new_v4());
        let id = session.id();
        let view = session.view();

        let mut entry = SessionEntry::new(session);
        self.touch(&mut entry);
        self.lock()?.insert(id, entry);

        info!(session_id = %id, "Session created");
        Ok(view)
    }

    /// Returns a snapshot of a session.
    pub fn get(self: &Arc<Self>, id: Uuid) -> EngineResult<SessionView> {
        let mut sessions = self.lock()?;
        let entry = self.entry(&mut sessions, id)?;
        Ok(entry.session.view())
    }

    /// Discards a session and cancels its pending timers.
    pub fn remove(&self, id: Uuid) -> EngineResult<()> {
        let entry = self
            .lock()?
            .remove(&id)
            .ok_or(EngineError::SessionNotFound { id })?;
        drop(entry);

        info!(session_id = %id, "Session removed");
        Ok(())
    }

    /// Applies a visitor event.
    ///
    /// Timer-driven events are rejected; only the store raises them.
    pub fn dispatch(self: &Arc<Self>, id: Uuid, event: FunnelEvent) -> EngineResult<SessionView> {
        if event.is_timer_driven() {
            return Err(EngineError::invalid_input(
                "type",
                format!("'{}' is raised by the server", event.name()),
            ));
        }
        if let FunnelEvent::CallBooked(slot) = event {
            return self.book_call(id, slot);
        }

        let mut sessions = self.lock()?;
        let entry = self.entry(&mut sessions, id)?;

        self.apply_event(entry, event)?;
        Ok(entry.session.view())
    }

    /// Starts delivering the report and returns the resulting status.
    ///
    /// A request made while a report is sending or sent is ignored.
    pub fn request_report(
        self: &Arc<Self>,
        id: Uuid,
        contact: LeadContact,
    ) -> EngineResult<ReportStatus> {
        let mut sessions = self.lock()?;
        let entry = self.entry(&mut sessions, id)?;

        if let Some(request) = entry.session.request_report(contact)? {
            let store = Arc::downgrade(self);
            let generation = entry.generation;
            let delay = self.config.flow().timings.report_delivery();

            entry.delivery = Some(ScheduledTask::schedule(delay, move || {
                if let Some(store) = Weak::upgrade(&store) {
                    store.deliver_report(generation, request);
                }
            }));
            debug!(
                session_id = %id,
                delay_ms = delay.as_millis() as u64,
                "Report delivery scheduled"
            );
        }

        Ok(entry.session.report_status())
    }

    /// The strategy call slots currently offered to a session.
    pub fn offered_slots(self: &Arc<Self>, id: Uuid) -> EngineResult<Vec<BookingSlot>> {
        let mut sessions = self.lock()?;
        self.entry(&mut sessions, id)?;
        Ok(offered_slots(&self.config.flow().booking, today()))
    }

    fn lock(&self) -> EngineResult<MutexGuard<'_, Sessions>> {
        self.sessions.lock().map_err(|_| EngineError::CalculationError {
            message: "session store poisoned".to_string(),
        })
    }

    fn context(&self) -> FunnelContext<'_> {
        FunnelContext {
            config: &self.config,
            directory: self.collaborators.directory.as_ref(),
            scheduler: self.collaborators.scheduler.as_ref(),
            today: today(),
        }
    }

    /// Looks up a session on behalf of the visitor, which counts as activity.
    fn entry<'a>(
        self: &Arc<Self>,
        sessions: &'a mut Sessions,
        id: Uuid,
    ) -> EngineResult<&'a mut SessionEntry> {
        let entry = sessions
            .get_mut(&id)
            .ok_or(EngineError::SessionNotFound { id })?;
        self.touch(entry);
        Ok(entry)
    }

    fn touch(self: &Arc<Self>, entry: &mut SessionEntry) {
        entry.touches += 1;

        let id = entry.session.id();
        let touches = entry.touches;
        let store = Arc::downgrade(self);
        let idle = self.config.flow().timings.session_idle();

        entry.expiry = Some(ScheduledTask::schedule(idle, move || {
            if let Some(store) = Weak::upgrade(&store) {
                store.expire(id, touches);
            }
        }));
    }

    fn expire(&self, id: Uuid, touches: u64) {
        let Ok(mut sessions) = self.lock() else {
            warn!(session_id = %id, "Session store unavailable for expiry");
            return;
        };
        let idle = sessions.get(&id).is_some_and(|entry| entry.touches == touches);
        let expired = if idle { sessions.remove(&id) } else { None };
        drop(sessions);

        if expired.is_some() {
            info!(session_id = %id, "Session expired after inactivity");
        }
    }

    /// Books outside the lock, then records the booking if the session has
    /// not moved on in the meantime.
    fn book_call(self: &Arc<Self>, id: Uuid, slot: BookingSlot) -> EngineResult<SessionView> {
        let (request, generation) = {
            let mut sessions = self.lock()?;
            let entry = self.entry(&mut sessions, id)?;
            let request = entry.session.booking_request(slot, &self.context())?;
            (request, entry.generation)
        };

        let confirmation = self.collaborators.scheduler.book(&request)?;

        let mut sessions = self.lock()?;
        let entry = sessions
            .get_mut(&id)
            .ok_or(EngineError::SessionNotFound { id })?;
        let recorded = if entry.generation == generation {
            entry.session.confirm_booking(confirmation)
        } else {
            Err(EngineError::InvalidTransition {
                step: entry.session.step().to_string(),
                event: "call_booked".to_string(),
            })
        };
        if let Err(e) = recorded {
            warn!(session_id = %id, slot = %slot, error = %e, "Booked call no longer wanted");
            return Err(e);
        }
        Ok(entry.session.view())
    }

    fn apply_event(
        self: &Arc<Self>,
        entry: &mut SessionEntry,
        event: FunnelEvent,
    ) -> EngineResult<FunnelStep> {
        let restart = event == FunnelEvent::Restart;
        let before = entry.session.step();

        let step = entry.session.apply(event, &self.context())?;

        if restart {
            entry.generation += 1;
            entry.delivery = None;
        }
        if restart || step != before {
            entry.step_timer = self.schedule_step_timer(entry.session.id(), entry.generation, step);
        }
        Ok(step)
    }

    fn schedule_step_timer(
        self: &Arc<Self>,
        id: Uuid,
        generation: u64,
        step: FunnelStep,
    ) -> Option<ScheduledTask> {
        let (delay, event) = step.timer_transition(&self.config.flow().timings)?;
        let store = Arc::downgrade(self);

        debug!(
            session_id = %id,
            step = %step,
            delay_ms = delay.as_millis() as u64,
            "Step timer scheduled"
        );
        Some(ScheduledTask::schedule(delay, move || {
            if let Some(store) = Weak::upgrade(&store) {
                store.fire_step_timer(id, generation, event);
            }
        }))
    }

    fn fire_step_timer(self: &Arc<Self>, id: Uuid, generation: u64, event: FunnelEvent) {
        let Ok(mut sessions) = self.lock() else {
            warn!(session_id = %id, "Session store unavailable for timer");
            return;
        };
        let Some(entry) = sessions.get_mut(&id) else {
            return;
        };
        if entry.generation != generation {
            debug!(session_id = %id, event = event.name(), "Ignoring stale timer");
            return;
        }

        if let Err(e) = self.apply_event(entry, event) {
            warn!(session_id = %id, error = %e, "Timer transition failed");
        }
    }

    fn deliver_report(&self, generation: u64, request: ReportRequest) {
        let id = request.session_id;
        let outcome = self.collaborators.mailer.deliver(&request);

        match &outcome {
            Ok(receipt) => info!(session_id = %id, receipt_id = %receipt.receipt_id, "Report sent"),
            Err(e) => warn!(session_id = %id, error = %e, "Report delivery failed"),
        }

        let Ok(mut sessions) = self.lock() else {
            return;
        };
        if let Some(entry) = sessions.get_mut(&id) {
            if entry.generation == generation {
                entry.session.finish_report(outcome.is_ok());
            }
        }
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AuditConfig, CompaniesConfig, FlowConfig, FlowTimings, ModelConfig};
    use crate::models::{BookingConfirmation, BookingRequest, CalibrationInputs, SickLeavePattern};
    use rust_decimal::Decimal;
    use std::sync::OnceLock;
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    struct Harness {
        store: Arc<SessionStore>,
        mailer: Arc<SimulatedMailer>,
    }

    fn harness() -> Harness {
        harness_with(ConfigLoader::default(), Arc::new(SimulatedScheduler::new()))
    }

    fn harness_with(config: ConfigLoader, scheduler: Arc<dyn CallScheduler>) -> Harness {
        let config = Arc::new(config);
        let mailer = Arc::new(SimulatedMailer::new());
        let collaborators = Collaborators {
            mailer: mailer.clone(),
            scheduler,
            ..Collaborators::simulated(&config)
        };
        Harness {
            store: SessionStore::new(config, collaborators),
            mailer,
        }
    }

    fn idle_after(session_idle_ms: u64) -> ConfigLoader {
        let flow = FlowConfig {
            timings: FlowTimings {
                session_idle_ms,
                ..FlowTimings::default()
            },
            ..FlowConfig::default()
        };
        ConfigLoader::from_config(AuditConfig::new(
            ModelConfig::default(),
            flow,
            CompaniesConfig::default(),
        ))
    }

    /// Scheduler that asks the store for its size from another thread while
    /// booking, and records whether it got an answer.
    #[derive(Default)]
    struct ObservingScheduler {
        store: OnceLock<Weak<SessionStore>>,
        store_answered: Mutex<Vec<bool>>,
        inner: SimulatedScheduler,
    }

    impl CallScheduler for ObservingScheduler {
        fn book(&self, request: &BookingRequest) -> EngineResult<BookingConfirmation> {
            let store = self.store.get().and_then(Weak::upgrade);
            let (tx, rx) = mpsc::channel();
            thread::spawn(move || {
                let _ = tx.send(store.map(|store| store.len()));
            });
            let answered = rx.recv_timeout(Duration::from_secs(1)).is_ok();
            self.store_answered.lock().unwrap().push(answered);
            self.inner.book(request)
        }
    }

    async fn wait_ms(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
        tokio::task::yield_now().await;
    }

    fn step_of(store: &Arc<SessionStore>, id: Uuid) -> FunnelStep {
        store.get(id).unwrap().step
    }

    fn submit_domain(store: &Arc<SessionStore>, id: Uuid) {
        store
            .dispatch(
                id,
                FunnelEvent::DomainSubmitted {
                    domain: "example.com".to_string(),
                },
            )
            .unwrap();
    }

    async fn walk_to_results(store: &Arc<SessionStore>, id: Uuid) {
        submit_domain(store, id);
        wait_ms(3600).await;
        store
            .dispatch(
                id,
                FunnelEvent::CompanyConfirmed {
                    avg_salary: Decimal::new(110000, 0),
                },
            )
            .unwrap();
        store
            .dispatch(
                id,
                FunnelEvent::PainPointSubmitted {
                    text: "Nobody takes their holidays".to_string(),
                },
            )
            .unwrap();
        store
            .dispatch(
                id,
                FunnelEvent::CalibrationSubmitted(CalibrationInputs {
                    vacation_utilization_pct: 60,
                    sick_leave_pattern: SickLeavePattern::PostDeadline,
                    trust_gap_pct: 50,
                }),
            )
            .unwrap();
        wait_ms(7100).await;
        assert_eq!(step_of(store, id), FunnelStep::Results);
    }

    fn contact() -> LeadContact {
        LeadContact {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_lookup_timer_advances_to_confirmation() {
        let h = harness();
        let id = h.store.create().unwrap().id;

        submit_domain(&h.store, id);
        assert_eq!(step_of(&h.store, id), FunnelStep::CompanyLookup);

        wait_ms(3400).await;
        assert_eq!(step_of(&h.store, id), FunnelStep::CompanyLookup);

        wait_ms(200).await;
        assert_eq!(step_of(&h.store, id), FunnelStep::Confirmation);
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_during_lookup_cancels_timer() {
        let h = harness();
        let id = h.store.create().unwrap().id;

        submit_domain(&h.store, id);
        wait_ms(1000).await;
        h.store.dispatch(id, FunnelEvent::Restart).unwrap();
        wait_ms(5000).await;

        assert_eq!(step_of(&h.store, id), FunnelStep::Search);
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_then_resubmit_waits_full_delay() {
        let h = harness();
        let id = h.store.create().unwrap().id;

        submit_domain(&h.store, id);
        wait_ms(3000).await;
        h.store.dispatch(id, FunnelEvent::Restart).unwrap();
        submit_domain(&h.store, id);

        wait_ms(1000).await;
        assert_eq!(step_of(&h.store, id), FunnelStep::CompanyLookup);

        wait_ms(2600).await;
        assert_eq!(step_of(&h.store, id), FunnelStep::Confirmation);
    }

    #[tokio::test(start_paused = true)]
    async fn test_estimate_timer_reveals_results() {
        let h = harness();
        let id = h.store.create().unwrap().id;

        walk_to_results(&h.store, id).await;

        let view = h.store.get(id).unwrap();
        assert_eq!(view.report.unwrap().estimate.days_lost_per_employee, 14);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_driven_events_rejected_from_clients() {
        let h = harness();
        let id = h.store.create().unwrap().id;
        submit_domain(&h.store, id);

        let result = h.store.dispatch(id, FunnelEvent::LookupCompleted);

        assert!(matches!(result, Err(EngineError::InvalidInput { .. })));
        assert_eq!(step_of(&h.store, id), FunnelStep::CompanyLookup);
    }

    #[tokio::test(start_paused = true)]
    async fn test_report_delivered_after_delay() {
        let h = harness();
        let id = h.store.create().unwrap().id;
        walk_to_results(&h.store, id).await;

        let status = h.store.request_report(id, contact()).unwrap();
        assert_eq!(status, ReportStatus::Sending);

        let repeat = h.store.request_report(id, contact()).unwrap();
        assert_eq!(repeat, ReportStatus::Sending);

        wait_ms(1900).await;
        assert!(h.mailer.delivered().is_empty());

        wait_ms(200).await;
        assert_eq!(h.mailer.delivered().len(), 1);
        assert_eq!(h.store.get(id).unwrap().report_status, ReportStatus::Sent);
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_cancels_report_delivery() {
        let h = harness();
        let id = h.store.create().unwrap().id;
        walk_to_results(&h.store, id).await;

        h.store.request_report(id, contact()).unwrap();
        h.store.dispatch(id, FunnelEvent::Restart).unwrap();
        wait_ms(3000).await;

        assert!(h.mailer.delivered().is_empty());
        assert_eq!(h.store.get(id).unwrap().report_status, ReportStatus::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_remove_session_cancels_timers() {
        let h = harness();
        let id = h.store.create().unwrap().id;
        submit_domain(&h.store, id);

        h.store.remove(id).unwrap();
        wait_ms(5000).await;

        assert!(h.store.is_empty());
        assert!(matches!(
            h.store.get(id),
            Err(EngineError::SessionNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_unknown_session() {
        let h = harness();
        let id = Uuid::new_v4();

        assert!(matches!(h.store.get(id), Err(EngineError::SessionNotFound { .. })));
        assert!(matches!(
            h.store.dispatch(id, FunnelEvent::Restart),
            Err(EngineError::SessionNotFound { .. })
        ));
        assert!(h.store.offered_slots(id).is_err());
        assert!(h.store.remove(id).is_err());
    }

    #[tokio::test]
    async fn test_offered_slots_start_tomorrow() {
        let h = harness();
        let id = h.store.create().unwrap().id;

        let slots = h.store.offered_slots(id).unwrap();

        assert_eq!(slots.len(), 32);
        assert!(slots[0].date > today());
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_sessions_are_discarded() {
        let h = harness();
        for _ in 0..1000 {
            h.store.create().unwrap();
        }
        assert_eq!(h.store.len(), 1000);

        wait_ms(30 * 60 * 1000 - 1000).await;
        assert_eq!(h.store.len(), 1000);

        wait_ms(2000).await;
        assert!(h.store.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_activity_keeps_session_alive() {
        let h = harness_with(idle_after(60_000), Arc::new(SimulatedScheduler::new()));
        let id = h.store.create().unwrap().id;

        wait_ms(40_000).await;
        h.store.get(id).unwrap();
        wait_ms(40_000).await;
        assert_eq!(h.store.len(), 1);

        wait_ms(25_000).await;
        assert!(h.store.is_empty());
        assert!(matches!(
            h.store.get(id),
            Err(EngineError::SessionNotFound { .. })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_transitions_do_not_count_as_activity() {
        let h = harness_with(idle_after(5000), Arc::new(SimulatedScheduler::new()));
        let id = h.store.create().unwrap().id;
        submit_domain(&h.store, id);

        wait_ms(4000).await;
        assert_eq!(h.store.len(), 1);

        wait_ms(1100).await;
        assert!(h.store.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_expiry_drops_pending_step_timer() {
        let h = harness_with(idle_after(1000), Arc::new(SimulatedScheduler::new()));
        let id = h.store.create().unwrap().id;
        submit_domain(&h.store, id);

        wait_ms(1100).await;
        assert!(h.store.is_empty());

        wait_ms(5000).await;
        assert!(h.store.is_empty());
        assert!(matches!(
            h.store.dispatch(id, FunnelEvent::Restart),
            Err(EngineError::SessionNotFound { .. })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_answers_while_call_is_booked() {
        let scheduler = Arc::new(ObservingScheduler::default());
        let h = harness_with(ConfigLoader::default(), scheduler.clone());
        scheduler.store.set(Arc::downgrade(&h.store)).unwrap();

        let id = h.store.create().unwrap().id;
        walk_to_results(&h.store, id).await;
        h.store.dispatch(id, FunnelEvent::LeadCaptured(contact())).unwrap();
        let slot = h.store.offered_slots(id).unwrap()[0];

        let view = h.store.dispatch(id, FunnelEvent::CallBooked(slot)).unwrap();

        assert_eq!(view.booking.unwrap().slot, slot);
        assert_eq!(*scheduler.store_answered.lock().unwrap(), vec![true]);
        assert_eq!(scheduler.inner.bookings().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_during_booking_is_rejected() {
        let h = harness();
        let id = h.store.create().unwrap().id;
        walk_to_results(&h.store, id).await;
        h.store.dispatch(id, FunnelEvent::LeadCaptured(contact())).unwrap();
        let slot = h.store.offered_slots(id).unwrap()[0];
        h.store.dispatch(id, FunnelEvent::Restart).unwrap();

        let result = h.store.dispatch(id, FunnelEvent::CallBooked(slot));

        assert!(matches!(result, Err(EngineError::InvalidTransition { .. })));
        assert!(h.store.get(id).unwrap().booking.is_none());
    }
}
