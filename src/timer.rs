//! Deadline-based timers for the single-threaded session driver.
//!
//! Nothing here sleeps or spawns. The driver asks for the earliest due
//! [`Activity`], runs it, and asks again, so callbacks never overlap.

use std::time::{Duration, Instant};

/// Work the session can be asked to do. Declaration order breaks ties
/// between activities due at the same instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Activity {
    CancellationPoll,
    ReleaseTick,
    ClickTick,
    SelectionPoll,
    PositionPoll,
}

/// A periodic timer. `None` deadline means stopped.
#[derive(Clone, Copy, Debug)]
pub struct Timer {
    period: Duration,
    deadline: Option<Instant>,
}

impl Timer {
    pub fn periodic(period: Duration) -> Self {
        Self { period, deadline: None }
    }

    pub fn set_period(&mut self, period: Duration) {
        self.period = period;
    }

    pub fn start(&mut self, now: Instant) {
        self.deadline = Some(now + self.period);
    }

    /// Stopping a stopped timer is a no-op.
    pub fn stop(&mut self) {
        self.deadline = None;
    }

    pub fn is_active(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Schedules the next firing after one that was due at `fired_at`.
    /// Firings missed by more than a period collapse into one.
    pub fn rearm(&mut self, fired_at: Instant, now: Instant) {
        if self.deadline.is_none() {
            return;
        }
        let next = fired_at + self.period;
        self.deadline = Some(if next <= now { now + self.period } else { next });
    }
}

/// Every timer the click session owns.
#[derive(Debug)]
pub struct Timers {
    pub click: Timer,
    pub cancellation: Timer,
    pub selection: Timer,
    pub position: Timer,
    /// One-shot deadline for the pending button release.
    pub release: Option<Instant>,
}

impl Timers {
    pub fn new(click_interval: Duration, poll: Duration, position: Duration) -> Self {
        Self {
            click: Timer::periodic(click_interval),
            cancellation: Timer::periodic(poll),
            selection: Timer::periodic(poll),
            position: Timer::periodic(position),
            release: None,
        }
    }

    fn deadlines(&self) -> [(Activity, Option<Instant>); 5] {
        [
            (Activity::CancellationPoll, self.cancellation.deadline()),
            (Activity::ReleaseTick, self.release),
            (Activity::ClickTick, self.click.deadline()),
            (Activity::SelectionPoll, self.selection.deadline()),
            (Activity::PositionPoll, self.position.deadline()),
        ]
    }

    /// The earliest activity due at or before `now`, with its deadline.
    pub fn next_due(&self, now: Instant) -> Option<(Activity, Instant)> {
        self.deadlines()
            .into_iter()
            .filter_map(|(activity, at)| at.filter(|at| *at <= now).map(|at| (activity, at)))
            .min_by_key(|&(activity, at)| (at, activity))
    }

    /// The earliest pending deadline of any timer, due or not.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.deadlines().into_iter().filter_map(|(_, at)| at).min()
    }
}
