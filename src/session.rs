//! The click session state machine.
//!
//! `Idle -> Selecting -> Idle` captures a target from one real left click.
//! `Idle -> Clicking -> Idle` runs a batch of press/hold/release clicks,
//! ended by reaching zero, the Stop control, or the right mouse button.
//!
//! Selection and cancellation are sampled every [`POLL_PERIOD`] rather than
//! hooked, so a right click can take up to one poll period to stop a run.

use crate::{
    config::{ClickSettings, POLL_PERIOD, POSITION_PERIOD, RELEASE_DELAY},
    display::PositionDisplay,
    input::{Button, Direction, InputBackend, Point},
    timer::{Activity, Timers},
};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, trace, warn};

const MIN_INTERVAL: Duration = Duration::from_millis(1);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Selecting,
    Clicking,
}

pub struct ClickSession {
    settings: ClickSettings,
    remaining: u32,
    phase: Phase,
    press_in_flight: bool,
    release_delay: Duration,
    timers: Timers,
    position: PositionDisplay,
}

impl ClickSession {
    /// Creates an idle session and starts the cursor-coordinate poll.
    pub fn new(settings: ClickSettings, now: Instant) -> Self {
        let mut timers = Timers::new(settings.interval, POLL_PERIOD, POSITION_PERIOD);
        timers.position.start(now);
        let mut position = PositionDisplay::default();
        position.observe(settings.target);
        Self {
            remaining: settings.count,
            settings,
            phase: Phase::Idle,
            press_in_flight: false,
            release_delay: RELEASE_DELAY,
            timers,
            position,
        }
    }

    pub fn with_release_delay(mut self, delay: Duration) -> Self {
        self.release_delay = delay;
        self
    }

    pub fn settings(&self) -> &ClickSettings { &self.settings }
    pub fn remaining(&self) -> u32 { self.remaining }
    pub fn phase(&self) -> Phase { self.phase }
    pub fn clicking(&self) -> bool { self.phase == Phase::Clicking }
    pub fn selecting_target(&self) -> bool { self.phase == Phase::Selecting }
    pub fn press_in_flight(&self) -> bool { self.press_in_flight }
    pub fn position(&self) -> &PositionDisplay { &self.position }

    /// Count and interval are frozen while a run (or its last release) is
    /// pending.
    pub fn inputs_locked(&self) -> bool {
        self.clicking() || self.press_in_flight
    }

    pub fn target_locked(&self) -> bool {
        self.inputs_locked() || self.selecting_target()
    }

    /// Whether the Start/Stop control does anything right now.
    pub fn can_toggle(&self) -> bool {
        self.clicking() || self.is_settled()
    }

    /// Nothing left to do but poll the cursor.
    pub fn is_settled(&self) -> bool {
        self.phase == Phase::Idle && !self.press_in_flight
    }

    // -------------- Display strings --------------

    pub fn remaining_text(&self) -> String {
        format!("Remaining clicks: {}", self.remaining)
    }

    pub fn target_text(&self) -> String {
        self.settings.target.to_string()
    }

    pub fn cursor_text(&self) -> &str {
        self.position.text()
    }

    pub fn start_label(&self) -> &'static str {
        if self.clicking() { "Stop" } else { "Start" }
    }

    pub fn selection_label(&self) -> &'static str {
        if self.selecting_target() { "Click anywhere" } else { "Select position" }
    }

    // -------------- Edits from the controls --------------

    pub fn set_count(&mut self, count: u32) -> bool {
        if self.inputs_locked() {
            return false;
        }
        self.settings.count = count;
        self.remaining = count;
        true
    }

    pub fn set_interval(&mut self, interval: Duration) -> bool {
        if self.inputs_locked() {
            return false;
        }
        self.settings.interval = interval;
        true
    }

    pub fn set_target(&mut self, target: Point) -> bool {
        if self.target_locked() {
            return false;
        }
        self.settings.target = target;
        true
    }

    // -------------- Transitions --------------

    pub fn begin_selection(&mut self, now: Instant) -> bool {
        if self.phase != Phase::Idle || self.press_in_flight {
            return false;
        }
        self.phase = Phase::Selecting;
        if !self.timers.selection.is_active() {
            self.timers.selection.start(now);
        }
        info!("waiting for a left click to set the target");
        true
    }

    /// Starts a run of `count` clicks. Ignored while clicking, selecting or
    /// while the previous run's last release is still pending.
    pub fn start_session(&mut self, count: u32, interval: Duration, now: Instant) -> bool {
        if self.phase != Phase::Idle || self.press_in_flight {
            return false;
        }
        self.settings.count = count;
        self.settings.interval = interval;
        self.remaining = count;
        self.phase = Phase::Clicking;

        self.timers.click.set_period(interval.max(MIN_INTERVAL));
        self.timers.click.start(now);
        self.timers.cancellation.start(now);
        info!(count, ?interval, at = %self.settings.target, "click session started");
        true
    }

    /// Stops the run. Safe to call any number of times; a release already
    /// scheduled still fires so the button is never left down.
    pub fn finalize_session(&mut self) {
        self.timers.click.stop();
        self.timers.cancellation.stop();
        if self.phase == Phase::Clicking {
            self.phase = Phase::Idle;
            info!(remaining = self.remaining, "click session finished");
        }
    }

    pub fn toggle_session(&mut self, now: Instant) {
        if self.clicking() {
            self.finalize_session();
        } else {
            self.start_session(self.settings.count, self.settings.interval, now);
        }
    }

    // -------------- Driver --------------

    /// Runs every activity due at or before `now`, one at a time, in
    /// deadline order. Returns how many ran.
    pub fn advance(&mut self, now: Instant, input: &mut dyn InputBackend) -> usize {
        let mut ran = 0;
        while let Some((activity, at)) = self.timers.next_due(now) {
            self.dispatch(activity, at, now, input);
            ran += 1;
        }
        ran
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    fn dispatch(&mut self, activity: Activity, at: Instant, now: Instant, input: &mut dyn InputBackend) {
        match activity {
            Activity::CancellationPoll => {
                self.timers.cancellation.rearm(at, now);
                self.poll_cancellation(input);
            }
            Activity::ReleaseTick => {
                self.timers.release = None;
                self.on_release_tick(input);
            }
            Activity::ClickTick => {
                self.timers.click.rearm(at, now);
                self.on_click_tick(at, input);
            }
            Activity::SelectionPoll => {
                self.timers.selection.rearm(at, now);
                self.poll_selection(input);
            }
            Activity::PositionPoll => {
                self.timers.position.rearm(at, now);
                self.poll_position(input);
            }
        }
    }

    fn on_click_tick(&mut self, at: Instant, input: &mut dyn InputBackend) {
        if self.remaining == 0 {
            self.finalize_session();
            return;
        }
        if self.press_in_flight {
            trace!("press still held, skipping tick");
            return;
        }

        let target = self.settings.target;
        let pressed = input
            .warp_pointer(target)
            .and_then(|()| input.emit_button(Button::Left, Direction::Press, target));
        if let Err(err) = pressed {
            error!(%err, "press failed, aborting session");
            self.finalize_session();
            return;
        }
        self.press_in_flight = true;
        self.timers.release = Some(at + self.release_delay);
        debug!(at = %target, remaining = self.remaining, "press");
    }

    fn on_release_tick(&mut self, input: &mut dyn InputBackend) {
        let target = self.settings.target;
        self.press_in_flight = false;
        if let Err(err) = input.emit_button(Button::Left, Direction::Release, target) {
            error!(%err, "release failed, aborting session");
            self.finalize_session();
            return;
        }
        self.remaining = self.remaining.saturating_sub(1);
        debug!(at = %target, remaining = self.remaining, "release");
        if self.remaining == 0 {
            self.finalize_session();
        }
    }

    fn poll_cancellation(&mut self, input: &mut dyn InputBackend) {
        match input.is_button_held(Button::Right) {
            Ok(false) => {}
            Ok(true) => {
                info!("right button held, cancelling");
                self.finalize_session();
            }
            Err(err) => {
                error!(%err, "cannot read button state, aborting session");
                self.finalize_session();
            }
        }
    }

    fn poll_selection(&mut self, input: &mut dyn InputBackend) {
        if self.phase != Phase::Selecting {
            self.timers.selection.stop();
            return;
        }
        match input.is_button_held(Button::Left) {
            Ok(false) => {}
            Ok(true) => match input.pointer_position() {
                Ok(target) => {
                    self.settings.target = target;
                    info!(at = %target, "target selected");
                    self.end_selection();
                }
                Err(err) => {
                    warn!(%err, "cannot read pointer, selection cancelled");
                    self.end_selection();
                }
            },
            Err(err) => {
                warn!(%err, "cannot read button state, selection cancelled");
                self.end_selection();
            }
        }
    }

    fn end_selection(&mut self) {
        self.phase = Phase::Idle;
        self.timers.selection.stop();
    }

    fn poll_position(&mut self, input: &mut dyn InputBackend) {
        match input.pointer_position() {
            Ok(p) => {
                self.position.observe(p);
            }
            Err(err) => debug!(%err, "pointer query failed"),
        }
    }
}
