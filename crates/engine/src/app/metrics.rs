use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LoopMetricsSnapshot {
    pub fps: f32,
    pub tps: f32,
    pub frame_time_ms: f32,
    pub dropped_ticks: u32,
}

impl LoopMetricsSnapshot {
    pub fn window_title(&self, base: &str) -> String {
        format!("{base} | {:.0} fps | {:.0} tps", self.fps, self.tps)
    }
}

#[derive(Debug, Default)]
struct IntervalCounters {
    frames: u32,
    ticks: u32,
    dropped_ticks: u32,
    busy: Duration,
}

impl IntervalCounters {
    fn snapshot(&self, window: Duration) -> LoopMetricsSnapshot {
        let seconds = window.as_secs_f32().max(f32::EPSILON);
        let frame_time_ms = match self.frames {
            0 => 0.0,
            frames => self.busy.as_secs_f32() * 1000.0 / frames as f32,
        };
        LoopMetricsSnapshot {
            fps: self.frames as f32 / seconds,
            tps: self.ticks as f32 / seconds,
            frame_time_ms,
            dropped_ticks: self.dropped_ticks,
        }
    }
}

/// Frame and tick counters folded into a snapshot once per interval.
#[derive(Debug)]
pub(crate) struct MetricsAccumulator {
    window_start: Instant,
    interval: Duration,
    counters: IntervalCounters,
}

impl MetricsAccumulator {
    pub(crate) fn new(interval: Duration, now: Instant) -> Self {
        Self {
            window_start: now,
            interval,
            counters: IntervalCounters::default(),
        }
    }

    pub(crate) fn record_frame(&mut self, frame_dt: Duration) {
        let counters = &mut self.counters;
        counters.frames = counters.frames.saturating_add(1);
        counters.busy = counters.busy.saturating_add(frame_dt);
    }

    pub(crate) fn record_ticks(&mut self, ticks: u32) {
        self.counters.ticks = self.counters.ticks.saturating_add(ticks);
    }

    /// Converts a dropped backlog into whole skipped ticks.
    pub(crate) fn record_dropped(&mut self, dropped_backlog: Duration, step: Duration) {
        if step.is_zero() {
            return;
        }
        let skipped = (dropped_backlog.as_secs_f64() / step.as_secs_f64()).floor() as u32;
        self.counters.dropped_ticks = self.counters.dropped_ticks.saturating_add(skipped);
    }

    pub(crate) fn maybe_snapshot(&mut self, now: Instant) -> Option<LoopMetricsSnapshot> {
        let window = now.saturating_duration_since(self.window_start);
        if window < self.interval {
            return None;
        }
        let counters = std::mem::take(&mut self.counters);
        self.window_start = now;
        Some(counters.snapshot(window))
    }
}
