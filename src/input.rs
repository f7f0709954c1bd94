//! Platform input boundary: pointer query/warp, button state and synthetic
//! button events.
//!
//! Button state is a snapshot kept up to date by a global `rdev` hook, so
//! querying it never blocks. Edge detection is left to the caller.

use enigo::{Enigo, MouseControllable};
use once_cell::sync::{Lazy, OnceCell};
use parking_lot::Mutex;
use std::{
    fmt,
    sync::atomic::{AtomicBool, Ordering},
    thread,
};
use thiserror::Error;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x: {}, y: {}", self.x, self.y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Button {
    Left,
    Right,
}

impl Button {
    fn to_enigo(self) -> enigo::MouseButton {
        match self {
            Button::Left => enigo::MouseButton::Left,
            Button::Right => enigo::MouseButton::Right,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Press,
    Release,
}

#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("global input listener unavailable: {0}")]
    ListenerUnavailable(String),
    #[error("display enumeration failed: {0}")]
    Displays(String),
}

pub type PlatformResult<T> = Result<T, PlatformError>;

/// Everything the click session consumes from the operating system.
pub trait InputBackend {
    /// Current absolute pointer position.
    fn pointer_position(&self) -> PlatformResult<Point>;

    fn warp_pointer(&mut self, to: Point) -> PlatformResult<()>;

    /// Whether `button` is physically held right now.
    fn is_button_held(&self, button: Button) -> PlatformResult<bool>;

    /// Inject a synthetic press or release of `button` at `at`.
    fn emit_button(&mut self, button: Button, direction: Direction, at: Point) -> PlatformResult<()>;
}

// -------------- Button state hook --------------

#[derive(Default)]
struct ButtonTracker {
    left: AtomicBool,
    right: AtomicBool,
    failure: Mutex<Option<String>>,
}

impl ButtonTracker {
    fn record(&self, event: &rdev::Event) {
        match event.event_type {
            rdev::EventType::ButtonPress(button) => self.set(button, true),
            rdev::EventType::ButtonRelease(button) => self.set(button, false),
            _ => {}
        }
    }

    fn set(&self, button: rdev::Button, held: bool) {
        match button {
            rdev::Button::Left => self.left.store(held, Ordering::Relaxed),
            rdev::Button::Right => self.right.store(held, Ordering::Relaxed),
            _ => {}
        }
    }

    fn fail(&self, reason: String) {
        tracing::error!(%reason, "input listener stopped");
        *self.failure.lock() = Some(reason);
    }

    fn is_held(&self, button: Button) -> PlatformResult<bool> {
        if let Some(reason) = self.failure.lock().as_ref() {
            return Err(PlatformError::ListenerUnavailable(reason.clone()));
        }
        Ok(match button {
            Button::Left => self.left.load(Ordering::Relaxed),
            Button::Right => self.right.load(Ordering::Relaxed),
        })
    }
}

static TRACKER: Lazy<ButtonTracker> = Lazy::new(ButtonTracker::default);
static LISTENER: OnceCell<()> = OnceCell::new();

/// Starts the process-wide hook thread on first use. `rdev::listen` can only
/// be installed once per process.
fn button_tracker() -> &'static ButtonTracker {
    LISTENER.get_or_init(|| {
        let spawned = thread::Builder::new()
            .name("input-hook".into())
            .spawn(|| {
                if let Err(err) = rdev::listen(|event| TRACKER.record(&event)) {
                    TRACKER.fail(format!("{err:?}"));
                }
            });
        match spawned {
            Ok(_) => tracing::debug!("input listener thread started"),
            Err(err) => TRACKER.fail(err.to_string()),
        }
    });
    &TRACKER
}

// -------------- Desktop backend --------------

/// The real backend: enigo for the pointer and synthetic events, the rdev
/// hook for button state.
pub struct DesktopInput {
    enigo: Enigo,
    buttons: &'static ButtonTracker,
}

impl DesktopInput {
    pub fn new() -> Self {
        Self { enigo: Enigo::new(), buttons: button_tracker() }
    }

    pub fn main_display_size(&self) -> (i32, i32) {
        self.enigo.main_display_size()
    }
}

impl Default for DesktopInput {
    fn default() -> Self {
        Self::new()
    }
}

impl InputBackend for DesktopInput {
    fn pointer_position(&self) -> PlatformResult<Point> {
        let (x, y) = self.enigo.mouse_location();
        Ok(Point::new(x, y))
    }

    fn warp_pointer(&mut self, to: Point) -> PlatformResult<()> {
        self.enigo.mouse_move_to(to.x, to.y);
        Ok(())
    }

    fn is_button_held(&self, button: Button) -> PlatformResult<bool> {
        self.buttons.is_held(button)
    }

    fn emit_button(&mut self, button: Button, direction: Direction, at: Point) -> PlatformResult<()> {
        self.enigo.mouse_move_to(at.x, at.y);
        match direction {
            Direction::Press => self.enigo.mouse_down(button.to_enigo()),
            Direction::Release => self.enigo.mouse_up(button.to_enigo()),
        }
        Ok(())
    }
}

// -------------- Test double --------------

#[cfg(test)]
pub mod fake {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Signal {
        pub button: Button,
        pub direction: Direction,
        pub at: Point,
    }

    /// Records every warp and button event; button state and pointer
    /// position are set directly by the test.
    #[derive(Default)]
    pub struct FakeInput {
        pub position: Point,
        pub left_held: bool,
        pub right_held: bool,
        pub broken: bool,
        pub warps: Vec<Point>,
        pub signals: Vec<Signal>,
    }

    impl FakeInput {
        pub fn at(x: i32, y: i32) -> Self {
            Self { position: Point::new(x, y), ..Self::default() }
        }

        pub fn presses(&self) -> usize {
            self.count(Direction::Press)
        }

        pub fn releases(&self) -> usize {
            self.count(Direction::Release)
        }

        fn count(&self, direction: Direction) -> usize {
            self.signals.iter().filter(|s| s.direction == direction).count()
        }

        fn check(&self) -> PlatformResult<()> {
            if self.broken {
                Err(PlatformError::ListenerUnavailable("fake failure".into()))
            } else {
                Ok(())
            }
        }
    }

    impl InputBackend for FakeInput {
        fn pointer_position(&self) -> PlatformResult<Point> {
            self.check()?;
            Ok(self.position)
        }

        fn warp_pointer(&mut self, to: Point) -> PlatformResult<()> {
            self.check()?;
            self.warps.push(to);
            self.position = to;
            Ok(())
        }

        fn is_button_held(&self, button: Button) -> PlatformResult<bool> {
            self.check()?;
            Ok(match button {
                Button::Left => self.left_held,
                Button::Right => self.right_held,
            })
        }

        fn emit_button(&mut self, button: Button, direction: Direction, at: Point) -> PlatformResult<()> {
            self.check()?;
            self.signals.push(Signal { button, direction, at });
            Ok(())
        }
    }
}
