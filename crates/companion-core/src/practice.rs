//! Timed practice sessions (meditation / mindfulness).
//!
//! A single-slot register: at most one countdown runs client-wide and
//! starting another cancels it. Every session carries a generation id; the
//! app's 1 s ticker passes it back on each tick so a ticker left over from
//! a cancelled session can never drive the current one.

use std::cell::RefCell;

use companion_types::{
    CompanionError, Result,
    event::Notification,
    practice::{PracticeKind, PracticePhase, format_clock},
};
use crate::epoch::Epoch;
use crate::event_bus::EventBus;
use crate::ports::BackendPort;

pub const MEDITATION_INSTRUCTIONS: &str = "Focus on your breath and let your mind relax";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimedPracticeSession {
    pub kind: PracticeKind,
    pub total_seconds: u32,
    pub remaining_seconds: u32,
    /// Only meditation sessions are tracked by the backend
    pub backend_session_id: Option<String>,
    pub phase: PracticePhase,
    pub generation: u64,
    /// Text shown under the clock
    pub instructions: String,
}

impl TimedPracticeSession {
    pub fn clock(&self) -> String {
        format_clock(self.remaining_seconds)
    }

    /// Elapsed fraction in `0.0..=1.0`
    pub fn progress(&self) -> f32 {
        if self.total_seconds == 0 {
            return 1.0;
        }
        1.0 - self.remaining_seconds as f32 / self.total_seconds as f32
    }
}

/// What a finished countdown leaves behind for the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedPractice {
    pub kind: PracticeKind,
    pub backend_session_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// No session, or the tick belongs to a replaced one
    Ignored,
    Running { remaining: u32 },
    Completed(CompletedPractice),
}

pub struct PracticeRegister {
    active: Option<TimedPracticeSession>,
    next_generation: u64,
    /// Guards the `POST /meditation/start` round trip
    epoch: Epoch,
    starting: bool,
    events: EventBus,
}

impl PracticeRegister {
    pub fn new(events: EventBus) -> Self {
        Self {
            active: None,
            next_generation: 1,
            epoch: Epoch::new(),
            starting: false,
            events,
        }
    }

    pub fn active(&self) -> Option<&TimedPracticeSession> {
        self.active.as_ref()
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    pub fn is_starting(&self) -> bool {
        self.starting
    }

    /// Install a new running session in the slot, cancelling whatever was
    /// there. Returns the generation the ticker must present.
    pub fn begin(
        &mut self,
        kind: PracticeKind,
        minutes: u32,
        backend_session_id: Option<String>,
        instructions: impl Into<String>,
    ) -> Result<u64> {
        if minutes == 0 {
            return Err(CompanionError::Validation(
                "Duration must be at least 1 minute".to_string(),
            ));
        }
        if let Some(previous) = self.active.take() {
            log::info!(
                "Cancelling {} (generation {}) for a new session",
                previous.kind.title(),
                previous.generation
            );
        }

        let generation = self.next_generation;
        self.next_generation += 1;
        let total_seconds = minutes.saturating_mul(60);
        self.active = Some(TimedPracticeSession {
            kind,
            total_seconds,
            remaining_seconds: total_seconds,
            backend_session_id,
            phase: PracticePhase::Running,
            generation,
            instructions: instructions.into(),
        });
        log::info!("{} started: {} min", kind.title(), minutes);
        Ok(generation)
    }

    /// Advance the countdown by one second.
    ///
    /// The slot is emptied on completion, so a session completes once and
    /// any later tick for it is `Ignored`.
    pub fn tick(&mut self, generation: u64) -> TickOutcome {
        let Some(session) = self.active.as_mut() else {
            return TickOutcome::Ignored;
        };
        if session.generation != generation {
            log::debug!("Ignoring tick for stale practice generation {}", generation);
            return TickOutcome::Ignored;
        }

        session.remaining_seconds = session.remaining_seconds.saturating_sub(1);
        if session.remaining_seconds > 0 {
            return TickOutcome::Running {
                remaining: session.remaining_seconds,
            };
        }

        session.phase = PracticePhase::Completed;
        let kind = session.kind;
        let backend_session_id = session.backend_session_id.clone();
        self.active = None;
        self.events.notify(Notification::success(kind.completed_message()));
        TickOutcome::Completed(CompletedPractice {
            kind,
            backend_session_id,
        })
    }

    /// Cancel the running session (or a pending meditation start).
    /// Never reports completion to the backend.
    pub fn stop(&mut self) -> bool {
        self.epoch.advance();
        self.starting = false;
        match self.active.take() {
            Some(mut session) => {
                session.phase = PracticePhase::Stopped;
                self.events.notify(Notification::info(session.kind.stopped_message()));
                true
            }
            None => false,
        }
    }

    // ─── Starting ────────────────────────────────────────────

    /// Start a mindfulness countdown. No backend involvement.
    pub fn start_mindfulness(&mut self, minutes: u32, prompt: &str) -> Option<u64> {
        self.epoch.advance();
        self.starting = false;
        match self.begin(PracticeKind::Mindfulness, minutes, None, prompt) {
            Ok(generation) => Some(generation),
            Err(e) => {
                self.events.notify(Notification::error(e.to_string()));
                None
            }
        }
    }

    /// Register a meditation session with the backend, then start the
    /// countdown. Returns the generation on success.
    pub async fn start_meditation(
        this: &RefCell<Self>,
        backend: &dyn BackendPort,
        minutes: u32,
    ) -> Option<u64> {
        let token = {
            let mut register = this.borrow_mut();
            if minutes == 0 {
                register
                    .events
                    .notify(Notification::error("Duration must be at least 1 minute"));
                return None;
            }
            register.starting = true;
            register.epoch.advance()
        };

        let result = backend.start_meditation(minutes).await;

        let mut register = this.borrow_mut();
        if !register.epoch.is_current(token) {
            log::debug!("Dropping meditation start: superseded");
            return None;
        }
        register.starting = false;
        match result.and_then(|id| {
            register.begin(PracticeKind::Meditation, minutes, Some(id), MEDITATION_INSTRUCTIONS)
        }) {
            Ok(generation) => Some(generation),
            Err(e) => {
                log::error!("Error starting meditation: {}", e);
                register
                    .events
                    .notify(Notification::error("Failed to start meditation session"));
                None
            }
        }
    }

    /// Report a finished meditation. Failures only log.
    pub async fn complete_on_backend(backend: &dyn BackendPort, completed: &CompletedPractice) {
        if !completed.kind.is_backend_tracked() {
            return;
        }
        let Some(session_id) = completed.backend_session_id.as_deref() else {
            return;
        };
        if let Err(e) = backend.complete_meditation(session_id).await {
            log::error!("Error completing meditation {}: {}", session_id, e);
        }
    }

    /// One ticker period: advance and, on completion, report to the
    /// backend. Returns `false` once the ticker should be dropped.
    pub async fn on_tick(this: &RefCell<Self>, backend: &dyn BackendPort, generation: u64) -> bool {
        let outcome = this.borrow_mut().tick(generation);
        match outcome {
            TickOutcome::Running { .. } => true,
            TickOutcome::Ignored => false,
            TickOutcome::Completed(completed) => {
                Self::complete_on_backend(backend, &completed).await;
                false
            }
        }
    }
}
