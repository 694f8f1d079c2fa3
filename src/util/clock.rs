/// Accumulated animation time for the frame loop.
///
/// The host measures each frame's delta; the clock only sums them so that
/// `elapsed` drives time-based animation such as the particle wobble.
#[derive(Debug, Clone, Copy, Default)]
pub struct Clock {
    elapsed: f32,
}

impl Clock {
    /// Start a clock at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by a measured frame delta. Negative deltas are ignored.
    pub fn advance(&mut self, dt: f32) {
        self.elapsed += dt.max(0.0);
    }

    /// Seconds of animation time so far.
    #[must_use]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_accumulates() {
        let mut clock = Clock::new();
        clock.advance(0.25);
        clock.advance(0.5);
        assert_eq!(clock.elapsed(), 0.75);
    }

    #[test]
    fn negative_delta_is_ignored() {
        let mut clock = Clock::new();
        clock.advance(1.0);
        clock.advance(-1.0);
        assert_eq!(clock.elapsed(), 1.0);
    }
}
