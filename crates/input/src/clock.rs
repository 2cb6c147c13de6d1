use std::time::{Duration, Instant};

/// Per-frame delta time plus a periodic frames-per-second report.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Option<Instant>,
    max_delta: Option<f32>,
    report_every: u32,
    frames: u32,
    accumulated: Duration,
    fps: Option<f32>,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(100)
    }
}

impl FrameClock {
    /// Reports FPS once every `report_every` frames.
    pub fn new(report_every: u32) -> Self {
        Self {
            last: None,
            max_delta: None,
            report_every: report_every.max(1),
            frames: 0,
            accumulated: Duration::ZERO,
            fps: None,
        }
    }

    /// Caps the returned delta, e.g. after the window was dragged or the process stalled.
    pub fn with_max_delta(mut self, seconds: f32) -> Self {
        self.max_delta = Some(seconds);
        self
    }

    pub fn tick(&mut self) -> f32 {
        self.tick_at(Instant::now())
    }

    /// Seconds since the previous tick; the first tick returns 0.
    pub fn tick_at(&mut self, now: Instant) -> f32 {
        let delta = match self.last {
            Some(last) => {
                let delta = now.saturating_duration_since(last);
                self.record(delta);
                delta
            }
            // the first tick opens the first frame, so it is not counted
            None => Duration::ZERO,
        };
        self.last = Some(now);

        let seconds = delta.as_secs_f32();
        match self.max_delta {
            Some(max) => seconds.min(max),
            None => seconds,
        }
    }

    /// Most recent FPS report, if one full window has elapsed.
    pub fn fps(&self) -> Option<f32> {
        self.fps
    }

    fn record(&mut self, delta: Duration) {
        self.frames += 1;
        self.accumulated += delta;
        if self.frames < self.report_every {
            return;
        }
        let secs = self.accumulated.as_secs_f32();
        if secs > 0.0 {
            let fps = self.frames as f32 / secs;
            self.fps = Some(fps);
            tracing::info!("FPS: {fps:.1}");
        }
        self.frames = 0;
        self.accumulated = Duration::ZERO;
    }
}
