use crate::{input::Point, screen::Bounds};
use clap::Parser;
use std::{ops::RangeInclusive, time::Duration};

pub const COUNT_RANGE: RangeInclusive<u32> = 1..=1_000_000;
pub const INTERVAL_SECS: RangeInclusive<f64> = 0.01..=10.0;

/// How long a synthetic press is held before its release.
pub const RELEASE_DELAY: Duration = Duration::from_millis(50);
/// Sampling period of the cancellation and selection polls.
pub const POLL_PERIOD: Duration = Duration::from_millis(50);
/// Sampling period of the cursor-coordinate label.
pub const POSITION_PERIOD: Duration = Duration::from_millis(100);

#[derive(Parser, Debug)]
#[command(name = "point_clicker", version, about = "Click one screen position repeatedly; right-click to stop")]
pub struct Args {
    /// Number of clicks per session
    #[arg(short = 'n', long, default_value_t = 50, value_parser = clap::value_parser!(u32).range(1..=1_000_000))]
    pub count: u32,

    /// Seconds between clicks
    #[arg(short, long, default_value_t = 0.1, value_parser = parse_interval_secs)]
    pub interval: f64,

    /// Target X in absolute screen pixels
    #[arg(short, long, default_value_t = 900, allow_negative_numbers = true)]
    pub x: i32,

    /// Target Y in absolute screen pixels
    #[arg(short, long, default_value_t = 450, allow_negative_numbers = true)]
    pub y: i32,

    /// Run one session without a window and exit when it ends
    #[arg(long)]
    pub headless: bool,
}

fn parse_interval_secs(s: &str) -> Result<f64, String> {
    let secs: f64 = s.parse().map_err(|_| format!("`{s}` is not a number"))?;
    if INTERVAL_SECS.contains(&secs) {
        Ok(secs)
    } else {
        Err(format!(
            "interval must be between {} and {} seconds",
            INTERVAL_SECS.start(),
            INTERVAL_SECS.end()
        ))
    }
}

/// Values the input controls edit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClickSettings {
    pub count: u32,
    pub interval: Duration,
    pub target: Point,
}

impl Default for ClickSettings {
    fn default() -> Self {
        Self {
            count: 50,
            interval: Duration::from_millis(100),
            target: Point::new(900, 450),
        }
    }
}

impl ClickSettings {
    /// Keeps the target on the desktop, logging when it had to move.
    pub fn clamped_to(self, desktop: Bounds) -> Self {
        let target = desktop.clamp(self.target);
        if target != self.target {
            tracing::warn!(from = %self.target, to = %target, "target outside the desktop, clamped");
        }
        Self { target, ..self }
    }
}

impl From<&Args> for ClickSettings {
    fn from(args: &Args) -> Self {
        Self {
            count: args.count,
            interval: Duration::from_secs_f64(args.interval),
            target: Point::new(args.x, args.y),
        }
    }
}
