use std::time::Duration;

/// Ticks to run for one rendered frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepPlan {
    pub ticks_to_run: u32,
    pub dropped_backlog: Duration,
}

/// Fixed-timestep lag accumulator.
#[derive(Debug, Clone)]
pub struct FrameClock {
    step: Duration,
    max_catch_up_steps: u32,
    lag: Duration,
}

impl FrameClock {
    pub fn new(target_tps: u32, max_catch_up_steps: u32) -> Self {
        Self {
            step: Duration::from_secs_f64(1.0 / f64::from(target_tps.max(1))),
            max_catch_up_steps: max_catch_up_steps.max(1),
            lag: Duration::ZERO,
        }
    }

    pub fn step(&self) -> Duration {
        self.step
    }

    pub fn lag(&self) -> Duration {
        self.lag
    }

    /// Adds `frame_dt` to the lag, drops backlog beyond the catch-up cap and
    /// drains whole steps.
    pub fn advance(&mut self, frame_dt: Duration) -> StepPlan {
        let cap = self.step.saturating_mul(self.max_catch_up_steps);
        let mut lag = self.lag.saturating_add(frame_dt);
        let dropped_backlog = lag.saturating_sub(cap);
        lag = lag.min(cap);

        let mut ticks_to_run = 0u32;
        while lag >= self.step {
            lag -= self.step;
            ticks_to_run += 1;
        }
        self.lag = lag;

        StepPlan {
            ticks_to_run,
            dropped_backlog,
        }
    }
}
