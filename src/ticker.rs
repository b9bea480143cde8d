// ==============================================================================
// ticker.rs — FIXED TIMESTEP SCHEDULER
// ==============================================================================
// Decouples the variable wall-clock frame rate from the fixed simulation
// timestep with a time accumulator (the classic "fix your timestep" loop).
//
// Usage:
//
//   let mut ticker = Ticker::new(1.0 / 60.0, 5);
//   loop {
//       ticker.tick(frame_delta_time);
//       while ticker.poll_fixed_tick() {
//           simulation.step(ticker.fixed_delta_time());
//       }
//       render(ticker.interpolation());
//   }
//
// Ticks are capped per frame: after a long stall the simulation catches up
// by at most `max_ticks_per_frame` steps and intentionally falls behind real
// time instead of spiraling (each catch-up tick making the next frame even
// longer). Excess accumulated time survives in the accumulator; the
// interpolation value is the fractional part so it stays inside [0, 1) even
// while capped.
// ==============================================================================

pub struct Ticker {
    dt: f32,                  // s, fixed simulation timestep
    max_ticks_per_frame: u32,

    accumulator: f32,         // s, unconsumed frame time
    pending_ticks: u32,       // ticks left to drain this frame
    total_ticks: u64,
    simulated_time: f32,      // s, total_ticks * dt
    frame_count: u64,
    frame_time: f32,          // s, the last frame's delta
    interpolation: f32,       // in [0, 1)
}

impl Ticker {
    pub fn new(dt: f32, max_ticks_per_frame: u32) -> Self {
        assert!(dt > 0.0, "fixed timestep must be positive");
        assert!(max_ticks_per_frame > 0, "need at least one tick per frame");
        Self {
            dt,
            max_ticks_per_frame,
            accumulator: 0.0,
            pending_ticks: 0,
            total_ticks: 0,
            simulated_time: 0.0,
            frame_count: 0,
            frame_time: 0.0,
            interpolation: 0.0,
        }
    }

    /// Called once per frame with the wall-clock time the frame took.
    /// Converts accumulated time into zero or more fixed ticks for
    /// `poll_fixed_tick` to drain.
    pub fn tick(&mut self, frame_delta_time: f32) {
        self.frame_count += 1;
        self.frame_time = frame_delta_time;

        self.accumulator += frame_delta_time;
        let ticks = ((self.accumulator / self.dt) as u32).min(self.max_ticks_per_frame);
        self.pending_ticks = ticks;
        self.total_ticks += u64::from(ticks);
        self.simulated_time += ticks as f32 * self.dt;
        self.accumulator -= ticks as f32 * self.dt;
        self.interpolation = (self.accumulator / self.dt).fract();
    }

    /// True while fixed-step logic should run for the current frame. Call in
    /// a loop and step the simulation until it returns false.
    pub fn poll_fixed_tick(&mut self) -> bool {
        if self.pending_ticks > 0 {
            self.pending_ticks -= 1;
            true
        } else {
            false
        }
    }

    /// Render interpolation fraction for the pose between two fixed ticks.
    pub fn interpolation(&self) -> f32 {
        self.interpolation
    }

    pub fn fixed_delta_time(&self) -> f32 {
        self.dt
    }

    /// Total time advanced by fixed ticks so far.
    pub fn simulated_time(&self) -> f32 {
        self.simulated_time
    }

    pub fn fixed_tick_count(&self) -> u64 {
        self.total_ticks
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn frame_time(&self) -> f32 {
        self.frame_time
    }

    pub fn fps(&self) -> f32 {
        if self.frame_time > 0.0 { 1.0 / self.frame_time } else { 0.0 }
    }
}
