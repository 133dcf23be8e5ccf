use chrono::{DateTime, Local};
use std::time::{Duration, Instant};

pub const CLOCK_CADENCE: Duration = Duration::from_secs(1);

/// Header clock. Purely presentational: polled by the UI loop on its own
/// cadence, never touched by data refreshes.
pub struct ClockTicker {
    last_tick: Option<Instant>,
    display: String,
}

impl ClockTicker {
    pub fn new() -> Self {
        Self {
            last_tick: None,
            display: Self::format(Local::now()),
        }
    }

    pub fn format(now: DateTime<Local>) -> String {
        now.format("%a %d %b %Y  %H:%M:%S").to_string()
    }

    pub fn is_due(&self, now: Instant) -> bool {
        match self.last_tick {
            None => true,
            Some(last) => now.duration_since(last) >= CLOCK_CADENCE,
        }
    }

    /// Recompute the display if a full cadence has elapsed. Returns whether
    /// the display changed.
    pub fn tick(&mut self, now: Instant, wall: DateTime<Local>) -> bool {
        if !self.is_due(now) {
            return false;
        }
        self.last_tick = Some(now);
        self.display = Self::format(wall);
        true
    }

    pub fn poll(&mut self) -> bool {
        self.tick(Instant::now(), Local::now())
    }

    pub fn display(&self) -> &str {
        &self.display
    }
}

impl Default for ClockTicker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn wall(h: u32, m: u32, s: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 3, 14, h, m, s).unwrap()
    }

    #[test]
    fn first_tick_always_fires() {
        let mut clock = ClockTicker::new();
        assert!(clock.tick(Instant::now(), wall(9, 26, 53)));
        assert_eq!(clock.display(), "Sat 14 Mar 2026  09:26:53");
    }

    #[test]
    fn ticks_at_one_second_cadence() {
        let mut clock = ClockTicker::new();
        let start = Instant::now();
        assert!(clock.tick(start, wall(10, 0, 0)));
        assert!(!clock.tick(start + Duration::from_millis(400), wall(10, 0, 0)));
        assert_eq!(clock.display(), "Sat 14 Mar 2026  10:00:00");
        assert!(clock.tick(start + Duration::from_millis(1000), wall(10, 0, 1)));
        assert_eq!(clock.display(), "Sat 14 Mar 2026  10:00:01");
    }
}
