use std::time::Instant;

// A stall (window drag, debugger pause) should not fling every animation
// forward by seconds on the next frame.
const MAX_DT: f32 = 0.25;

#[derive(Clone, Copy, Debug)]
pub struct FrameTiming {
    /// Seconds since the clock was created.
    pub elapsed: f32,
    /// Seconds since the previous tick, clamped.
    pub dt: f32,
}

pub struct Clock {
    start: Instant,
    last: Instant,
}

impl Clock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self { start: now, last: now }
    }

    pub fn tick(&mut self) -> FrameTiming {
        let now = Instant::now();
        let dt = (now - self.last).as_secs_f32().min(MAX_DT);
        self.last = now;
        FrameTiming {
            elapsed: (now - self.start).as_secs_f32(),
            dt,
        }
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}
