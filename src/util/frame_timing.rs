use web_time::{Duration, Instant};

/// Frame-rate gate with a smoothed FPS readout.
#[derive(Debug)]
pub struct FrameTiming {
    /// 0 = unlimited
    target_fps: u32,
    min_frame_duration: Duration,
    last_frame: Instant,
    smoothed_fps: f32,
    /// Weight of the newest sample in the moving average.
    smoothing: f32,
}

impl FrameTiming {
    /// Create a timer with the given FPS target (0 = unlimited).
    #[must_use]
    pub fn new(target_fps: u32) -> Self {
        Self {
            target_fps,
            min_frame_duration: min_frame_duration(target_fps),
            last_frame: Instant::now(),
            smoothed_fps: 60.0,
            smoothing: 0.05,
        }
    }

    /// Change the FPS target without resetting the average.
    pub fn set_target_fps(&mut self, target_fps: u32) {
        self.target_fps = target_fps;
        self.min_frame_duration = min_frame_duration(target_fps);
    }

    /// Whether enough time has passed since the last frame to draw again.
    #[must_use]
    pub fn should_render(&self) -> bool {
        self.target_fps == 0
            || self.last_frame.elapsed() >= self.min_frame_duration
    }

    /// Call after presenting a frame.
    pub fn end_frame(&mut self) {
        let now = Instant::now();
        let frame_time = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.record(frame_time);
    }

    fn record(&mut self, frame_time: f32) {
        if frame_time > 0.0 {
            self.smoothed_fps = self.smoothed_fps * (1.0 - self.smoothing)
                + frame_time.recip() * self.smoothing;
        }
    }

    /// Smoothed frames per second.
    #[must_use]
    pub fn fps(&self) -> f32 {
        self.smoothed_fps
    }
}

fn min_frame_duration(target_fps: u32) -> Duration {
    if target_fps > 0 {
        Duration::from_secs_f64(1.0 / f64::from(target_fps))
    } else {
        Duration::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlimited_always_renders() {
        assert!(FrameTiming::new(0).should_render());
    }

    #[test]
    fn capped_rate_waits_for_frame_budget() {
        let timing = FrameTiming::new(1);
        assert!(!timing.should_render());
        assert_eq!(timing.min_frame_duration, Duration::from_secs(1));
    }

    #[test]
    fn fps_converges_toward_samples() {
        let mut timing = FrameTiming::new(0);
        for _ in 0..500 {
            timing.record(1.0 / 30.0);
        }
        assert!((timing.fps() - 30.0).abs() < 0.5);
        timing.record(0.0);
        assert!((timing.fps() - 30.0).abs() < 0.5);
    }
}
