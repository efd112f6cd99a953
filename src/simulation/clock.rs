//! Caller-owned clock: simulation time and elapsed real time

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Clock {
    time: f64, // simulation time the display is synchronized to
    real_time: f64, // wall-clock seconds since last reset
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn set_time(&mut self, time: f64) {
        self.time = time;
    }

    pub fn real_time(&self) -> f64 {
        self.real_time
    }

    pub fn set_real_time(&mut self, real_time: f64) {
        self.real_time = real_time;
    }

    /// Move simulation time forward by `dt`; real time is left to the caller
    pub fn tick(&mut self, dt: f64) {
        self.time += dt;
    }
}
