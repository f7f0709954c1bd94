use crate::{
    config::{ClickSettings, POLL_PERIOD},
    input::{DesktopInput, InputBackend},
    screen,
    session::ClickSession,
};
use std::{thread, time::Instant};

/// Runs one session against the real desktop without opening a window.
pub fn run(settings: ClickSettings) {
    let mut input = DesktopInput::new();
    let settings = settings.clamped_to(screen::virtual_desktop_or(input.main_display_size()));
    let now = Instant::now();
    let mut session = ClickSession::new(settings, now);
    session.start_session(settings.count, settings.interval, now);
    tracing::info!("hold the right mouse button to stop");
    run_until_settled(&mut session, &mut input);
}

/// Drives `session` in real time until no run or release is pending.
pub fn run_until_settled(session: &mut ClickSession, input: &mut dyn InputBackend) {
    loop {
        session.advance(Instant::now(), input);
        if session.is_settled() {
            break;
        }
        let wait = session
            .next_deadline()
            .map_or(POLL_PERIOD, |at| at.saturating_duration_since(Instant::now()));
        thread::sleep(wait.min(POLL_PERIOD));
    }
}
