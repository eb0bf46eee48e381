//! Camera session: `Idle ⇄ Active` plus the periodic emotion sampler.
//!
//! The app owns the actual interval timer and calls [`CameraController::sample_tick`]
//! on every period. The controller guarantees:
//! - nothing is sampled while `Idle`;
//! - at most one inference request is in flight (the `analyzing` guard);
//! - a response that lands after `stop` is discarded (epoch check).

use std::cell::RefCell;

use companion_types::{
    Result,
    config::CameraConfig,
    emotion::EmotionResult,
    event::Notification,
};
use crate::epoch::{Epoch, EpochToken};
use crate::event_bus::EventBus;
use crate::ports::{BackendPort, CameraPort};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraState {
    Idle,
    Active,
}

/// Permission to run one inference request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleTicket {
    token: EpochToken,
}

pub struct CameraController {
    state: CameraState,
    /// `open()` has been called and has not resolved yet
    opening: bool,
    /// An inference request is outstanding
    analyzing: bool,
    epoch: Epoch,
    results: Vec<EmotionResult>,
    realtime: bool,
    config: CameraConfig,
    events: EventBus,
}

impl CameraController {
    pub fn new(config: CameraConfig, events: EventBus) -> Self {
        Self {
            state: CameraState::Idle,
            opening: false,
            analyzing: false,
            epoch: Epoch::new(),
            results: Vec::new(),
            realtime: false,
            config,
            events,
        }
    }

    pub fn state(&self) -> CameraState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == CameraState::Active
    }

    pub fn is_opening(&self) -> bool {
        self.opening
    }

    pub fn is_analyzing(&self) -> bool {
        self.analyzing
    }

    pub fn results(&self) -> &[EmotionResult] {
        &self.results
    }

    /// Whether the "real-time detection active" badge should show
    pub fn realtime_indicator(&self) -> bool {
        self.realtime
    }

    pub fn sample_interval_ms(&self) -> u32 {
        self.config.sample_interval_ms
    }

    // ─── Lifecycle ───────────────────────────────────────────

    /// Request camera access. Returns `true` once `Active`, at which point
    /// the caller must start the sampling interval.
    pub async fn start(this: &RefCell<Self>, camera: &dyn CameraPort) -> bool {
        let (token, width, height) = {
            let mut cam = this.borrow_mut();
            if cam.state == CameraState::Active || cam.opening {
                return false;
            }
            cam.opening = true;
            (cam.epoch.token(), cam.config.width, cam.config.height)
        };

        let result = camera.open(width, height).await;

        let mut cam = this.borrow_mut();
        if !cam.epoch.is_current(token) {
            // Stopped while the permission prompt was up. `opening` may
            // belong to a newer request now, and only this grant is ours.
            if let Ok(stream) = result {
                log::debug!("Releasing camera grant from a cancelled start");
                camera.release_stream(stream);
            }
            return false;
        }
        cam.opening = false;
        match result.and_then(|stream| camera.bind(stream)) {
            Ok(()) => {
                cam.state = CameraState::Active;
                log::info!("Real-time emotion detection started");
                cam.events.notify(Notification::success("Camera started successfully"));
                true
            }
            Err(e) => {
                log::error!("Error accessing camera: {}", e);
                cam.events.notify(Notification::error("Failed to access camera"));
                false
            }
        }
    }

    /// Release every track and return to `Idle`. Returns `true` if there
    /// was anything to stop; the caller then drops the sampling interval.
    pub fn stop(&mut self, camera: &dyn CameraPort) -> bool {
        if self.state == CameraState::Idle && !self.opening {
            return false;
        }
        camera.release();
        self.state = CameraState::Idle;
        self.opening = false;
        self.analyzing = false;
        self.realtime = false;
        self.epoch.advance();
        log::info!("Real-time emotion detection stopped");
        self.events.notify(Notification::info("Camera stopped"));
        true
    }

    // ─── Sampling ────────────────────────────────────────────

    /// Take the in-flight guard. `None` while idle or while another
    /// analysis is outstanding; the tick is then skipped, not queued.
    pub fn begin_sample(&mut self) -> Option<SampleTicket> {
        if self.state != CameraState::Active || self.analyzing {
            return None;
        }
        self.analyzing = true;
        Some(SampleTicket {
            token: self.epoch.token(),
        })
    }

    /// Give the guard back without a result (no frame was ready).
    pub fn abandon_sample(&mut self, ticket: SampleTicket) {
        if self.epoch.is_current(ticket.token) {
            self.analyzing = false;
        }
    }

    /// Apply a periodic sample's result. Returns `true` if it was applied.
    pub fn finish_sample(&mut self, ticket: SampleTicket, result: Result<Vec<EmotionResult>>) -> bool {
        if !self.epoch.is_current(ticket.token) {
            log::debug!("Dropping emotion result from a stopped camera session");
            return false;
        }
        self.analyzing = false;
        match result {
            Ok(emotions) if !emotions.is_empty() => {
                self.results = emotions;
                self.realtime = true;
                true
            }
            Ok(_) => false,
            Err(e) => {
                log::warn!("Error in real-time emotion analysis: {}", e);
                false
            }
        }
    }

    /// Grab the current frame, or give the guard back if there is none.
    fn grab_frame(this: &RefCell<Self>, camera: &dyn CameraPort, ticket: SampleTicket) -> Option<String> {
        let quality = this.borrow().config.jpeg_quality;
        match camera.capture_frame(quality) {
            Ok(Some(frame)) => Some(frame),
            Ok(None) => {
                this.borrow_mut().abandon_sample(ticket);
                None
            }
            Err(e) => {
                log::warn!("Frame capture failed: {}", e);
                this.borrow_mut().abandon_sample(ticket);
                None
            }
        }
    }

    /// One period of the real-time sampler.
    pub async fn sample_tick(this: &RefCell<Self>, camera: &dyn CameraPort, backend: &dyn BackendPort) {
        let Some(ticket) = this.borrow_mut().begin_sample() else {
            return;
        };
        let Some(frame) = Self::grab_frame(this, camera, ticket) else {
            return;
        };
        let result = backend.analyze_image(&frame).await;
        this.borrow_mut().finish_sample(ticket, result);
    }

    /// Manual one-shot analysis from the "Capture" button.
    pub async fn capture(this: &RefCell<Self>, camera: &dyn CameraPort, backend: &dyn BackendPort) {
        let ticket = {
            let mut cam = this.borrow_mut();
            if cam.state != CameraState::Active {
                cam.events.notify(Notification::warning("Please start the camera first"));
                return;
            }
            match cam.begin_sample() {
                Some(ticket) => ticket,
                None => {
                    cam.events.notify(Notification::info("Analysis already in progress"));
                    return;
                }
            }
        };

        let Some(frame) = Self::grab_frame(this, camera, ticket) else {
            this.borrow()
                .events
                .notify(Notification::error("Failed to capture emotion"));
            return;
        };

        let result = backend.analyze_image(&frame).await;

        let mut cam = this.borrow_mut();
        if !cam.epoch.is_current(ticket.token) {
            log::debug!("Dropping manual capture result: camera stopped");
            return;
        }
        cam.analyzing = false;
        match result {
            Ok(emotions) => {
                cam.results = emotions;
                cam.events.notify(Notification::success("Emotion detected successfully"));
            }
            Err(e) => {
                log::error!("Error capturing emotion: {}", e);
                cam.events
                    .notify(Notification::error(e.user_message("Failed to analyze emotion")));
            }
        }
    }
}
