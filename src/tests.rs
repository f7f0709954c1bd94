use crate::{
    config::ClickSettings,
    input::{fake::{FakeInput, Signal}, Button, Direction, Point},
    session::{ClickSession, Phase},
};
use std::time::{Duration, Instant};

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

/// A session on a virtual clock, advanced one millisecond at a time.
struct Rig {
    t0: Instant,
    elapsed: u64,
    session: ClickSession,
    input: FakeInput,
    remaining_seen: Vec<u32>,
}

impl Rig {
    fn new(target: Point) -> Self {
        let t0 = Instant::now();
        let settings = ClickSettings { target, ..ClickSettings::default() };
        let session = ClickSession::new(settings, t0);
        Self { t0, elapsed: 0, remaining_seen: vec![session.remaining()], session, input: FakeInput::default() }
    }

    fn now(&self) -> Instant {
        self.t0 + ms(self.elapsed)
    }

    fn start(&mut self, count: u32, interval: Duration) {
        let now = self.now();
        assert!(self.session.start_session(count, interval, now));
        self.remaining_seen = vec![self.session.remaining()];
    }

    fn run_until(&mut self, until: u64) {
        while self.elapsed < until {
            self.elapsed += 1;
            let now = self.now();
            self.session.advance(now, &mut self.input);
            if self.remaining_seen.last() != Some(&self.session.remaining()) {
                self.remaining_seen.push(self.session.remaining());
            }
        }
    }
}

#[test]
fn test_three_clicks_at_ten_millis() {
    let mut rig = Rig::new(Point::new(100, 200));
    rig.start(3, ms(10));

    rig.run_until(59);
    assert_eq!(rig.input.presses(), 1);
    assert_eq!(rig.input.releases(), 0);
    rig.run_until(60);
    assert_eq!(rig.input.releases(), 1);

    rig.run_until(1_000);
    let at = Point::new(100, 200);
    let press = Signal { button: Button::Left, direction: Direction::Press, at };
    let release = Signal { button: Button::Left, direction: Direction::Release, at };
    assert_eq!(rig.input.signals, vec![press, release, press, release, press, release]);
    assert_eq!(rig.remaining_seen, vec![3, 2, 1, 0]);
    assert!(!rig.session.clicking());
    assert!(!rig.session.press_in_flight());
    assert_eq!(rig.session.start_label(), "Start");
}

#[test]
fn test_every_count_completes_exactly() {
    for count in [1, 2, 7, 25] {
        let mut rig = Rig::new(Point::new(-40, 12));
        rig.start(count, ms(20));
        rig.run_until(count as u64 * 80 + 200);

        assert_eq!(rig.input.presses(), count as usize, "count {count}");
        assert_eq!(rig.input.releases(), count as usize, "count {count}");
        assert!(rig.input.signals.iter().all(|s| s.at == Point::new(-40, 12)));
        assert!(rig.input.warps.iter().all(|p| *p == Point::new(-40, 12)));
        assert_eq!(rig.session.remaining(), 0);
        assert!(!rig.session.clicking());
        assert!(!rig.session.inputs_locked());
    }
}

#[test]
fn test_slow_release_skips_ticks_instead_of_overlapping() {
    let mut rig = Rig::new(Point::new(1, 1));
    rig.session = ClickSession::new(ClickSettings::default(), rig.t0).with_release_delay(ms(35));
    rig.start(1_000, ms(10));

    let mut max_outstanding = 0;
    while rig.elapsed < 500 {
        rig.run_until(rig.elapsed + 1);
        max_outstanding = max_outstanding.max(rig.input.presses() - rig.input.releases());
    }

    let elapsed_intervals = 500 / 10;
    assert!(rig.input.presses() < elapsed_intervals);
    assert!(rig.input.presses() > 0);
    assert_eq!(max_outstanding, 1);
}

#[test]
fn test_right_button_cancels_early() {
    let mut rig = Rig::new(Point::new(100, 200));
    rig.start(100, ms(100));

    rig.run_until(360);
    assert_eq!(rig.input.presses(), 3);
    rig.input.right_held = true;
    rig.run_until(2_000);

    assert!(!rig.session.clicking());
    assert_eq!(rig.session.phase(), Phase::Idle);
    assert_eq!(rig.input.presses(), 3);
    assert_eq!(rig.input.releases(), 3);
    assert_eq!(rig.session.remaining(), 97);
}

#[test]
fn test_cancellation_mid_press_still_releases() {
    let mut rig = Rig::new(Point::new(5, 5));
    rig.start(100, ms(130));

    // third press at 390 holds until 440; the poll at 400 sees the right button
    rig.run_until(395);
    assert_eq!(rig.input.presses(), 3);
    assert!(rig.session.press_in_flight());
    rig.input.right_held = true;
    rig.run_until(420);
    assert!(!rig.session.clicking());
    assert!(rig.session.inputs_locked());

    rig.run_until(1_000);
    assert_eq!(rig.input.presses(), 3);
    assert_eq!(rig.input.releases(), 3);
    assert!(!rig.session.press_in_flight());
    assert!(!rig.session.inputs_locked());
}

#[test]
fn test_restart_waits_for_the_pending_release() {
    let mut rig = Rig::new(Point::new(5, 5));
    rig.start(100, ms(130));

    // third press at 390 holds until 440
    rig.run_until(395);
    let now = rig.now();
    rig.session.toggle_session(now);
    assert!(!rig.session.clicking());
    assert!(!rig.session.can_toggle());

    rig.session.toggle_session(now);
    assert!(!rig.session.clicking());
    assert!(!rig.session.start_session(4, ms(20), now));

    rig.run_until(440);
    assert!(rig.session.can_toggle());
    assert_eq!(rig.session.remaining(), 97);

    rig.start(4, ms(20));
    rig.run_until(1_500);
    assert_eq!(rig.input.presses(), 3 + 4);
    assert_eq!(rig.input.releases(), 3 + 4);
    assert_eq!(rig.remaining_seen, vec![4, 3, 2, 1, 0]);
}

#[test]
fn test_stop_control_behaves_like_cancellation() {
    let mut rig = Rig::new(Point::new(5, 5));
    rig.start(10, ms(100));
    rig.run_until(230);
    let now = rig.now();
    rig.session.toggle_session(now);
    rig.session.finalize_session();
    rig.run_until(2_000);

    assert!(!rig.session.clicking());
    assert_eq!(rig.input.presses(), 2);
    assert_eq!(rig.session.remaining(), 8);
}

#[test]
fn test_selection_captures_first_held_sample() {
    let mut rig = Rig::new(Point::new(900, 450));
    let now = rig.now();
    assert!(rig.session.begin_selection(now));

    rig.input.position = Point::new(321, 654);
    rig.run_until(120);
    assert!(rig.session.selecting_target());

    rig.input.left_held = true;
    rig.run_until(170);
    assert_eq!(rig.session.settings().target, Point::new(321, 654));
    assert!(!rig.session.selecting_target());

    // button still down and pointer moved: no re-capture
    rig.input.position = Point::new(1, 2);
    rig.run_until(400);
    assert_eq!(rig.session.settings().target, Point::new(321, 654));
    assert_eq!(rig.session.target_text(), "x: 321, y: 654");
}

#[test]
fn test_selected_target_is_used_by_the_next_run() {
    let mut rig = Rig::new(Point::new(900, 450));
    let now = rig.now();
    rig.session.begin_selection(now);
    rig.input.position = Point::new(12, 34);
    rig.input.left_held = true;
    rig.run_until(60);
    rig.input.left_held = false;

    rig.start(1, ms(10));
    rig.run_until(200);
    assert_eq!(rig.input.signals.len(), 2);
    assert!(rig.input.signals.iter().all(|s| s.at == Point::new(12, 34)));
}

#[test]
fn test_cursor_label_renders_only_on_change() {
    let mut rig = Rig::new(Point::new(900, 450));
    let initial = rig.session.position().renders();

    rig.input.position = Point::new(10, 10);
    rig.run_until(100);
    assert_eq!(rig.session.position().renders(), initial + 1);
    assert_eq!(rig.session.cursor_text(), "Cursor: x: 10, y: 10");

    rig.run_until(500);
    assert_eq!(rig.session.position().renders(), initial + 1);

    rig.input.position = Point::new(11, 10);
    rig.run_until(600);
    assert_eq!(rig.session.position().renders(), initial + 2);
}

#[test]
fn test_cursor_label_keeps_updating_during_a_run() {
    let mut rig = Rig::new(Point::new(7, 8));
    rig.start(3, ms(10));
    rig.run_until(300);
    // the press warps the pointer to the target
    assert_eq!(rig.session.cursor_text(), "Cursor: x: 7, y: 8");
}
