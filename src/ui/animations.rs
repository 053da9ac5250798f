use std::time::{Duration, Instant};

const FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Braille spinner whose frame follows wall-clock time, so it keeps moving
/// at the same pace however often the screen is redrawn.
#[derive(Debug, Clone)]
pub struct Spinner {
    started_at: Instant,
    interval: Duration,
}

impl Spinner {
    pub fn new() -> Self {
        Self {
            started_at: Instant::now(),
            interval: Duration::from_millis(100),
        }
    }

    /// Frame to show at `now`.
    pub fn frame_at(&self, now: Instant) -> &'static str {
        if crate::theme::no_animations() {
            return FRAMES[0];
        }
        let elapsed = now.saturating_duration_since(self.started_at);
        let step = elapsed.as_millis() / self.interval.as_millis().max(1);
        FRAMES[(step % FRAMES.len() as u128) as usize]
    }

    pub fn current(&self) -> &'static str {
        self.frame_at(Instant::now())
    }
}

impl Default for Spinner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spinner_advances_with_time() {
        if crate::theme::no_animations() {
            return;
        }
        let spinner = Spinner::new();
        let start = spinner.started_at;
        assert_eq!(spinner.frame_at(start), FRAMES[0]);
        assert_eq!(spinner.frame_at(start + Duration::from_millis(250)), FRAMES[2]);
        assert_eq!(spinner.frame_at(start + Duration::from_millis(1000)), FRAMES[0]);
    }
}
