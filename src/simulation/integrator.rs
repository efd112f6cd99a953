//! Fixed-step time integration for the contact scenario
//!
//! Velocity-Verlet over the rigid bodies (linear and angular state) driven by
//! the simulation's registered force laws. No contact resolution is done;
//! walls are never moved.

use log::trace;

use crate::error::{Result, ScenarioError};
use super::engine::ContactSim;
use super::states::Wrench;

pub const DEFAULT_TIME_STEP: f64 = 0.025;

/// Advance the simulation by one step of `dt` using velocity-Verlet.
/// Uses two force evaluations per step and updates poses, velocities,
/// and the simulation time in-place
pub fn verlet_integrator(sim: &mut ContactSim, dt: f64) {
    let n = sim.bodies().len();
    let half_dt = 0.5 * dt;

    if n == 0 { // nothing moves, only the clock does
        sim.set_time(sim.time() + dt);
        return;
    }

    // a_n at the current state
    let mut w_old = vec![Wrench::zero(); n];
    sim.accumulate_forces(&mut w_old);

    // Kick: v_n+1/2 = v_n + (dt/2) * F_n / m, same for omega with torque
    for (b, w) in sim.bodies_mut().iter_mut().zip(w_old.iter()) {
        if b.is_fixed() {
            continue;
        }
        b.v += half_dt * w.force / b.m;
        b.omega += half_dt * w.torque / b.moment;
    }

    // Drift: full step on position and angle
    for b in sim.bodies_mut().iter_mut() {
        b.x += dt * b.v;
        b.angle += dt * b.omega;
    }

    sim.set_time(sim.time() + dt);

    // forces at the new state
    let mut w_new = vec![Wrench::zero(); n];
    sim.accumulate_forces(&mut w_new);

    // Second kick: v_n+1 = v_n+1/2 + (dt/2) * F_n+1 / m
    for (b, w) in sim.bodies_mut().iter_mut().zip(w_new.iter()) {
        if b.is_fixed() {
            continue;
        }
        b.v += half_dt * w.force / b.m;
        b.omega += half_dt * w.torque / b.moment;
    }
}

/// Stepping state driven by the caller's clock
#[derive(Debug, Clone)]
pub struct Advance {
    time_step: f64,
    steps: u64,
}

impl Default for Advance {
    fn default() -> Self {
        Self {
            time_step: DEFAULT_TIME_STEP,
            steps: 0,
        }
    }
}

impl Advance {
    pub fn new(time_step: f64) -> Result<Self> {
        let mut advance = Self::default();
        advance.set_time_step(time_step)?;
        Ok(advance)
    }

    pub fn time_step(&self) -> f64 {
        self.time_step
    }

    pub fn set_time_step(&mut self, time_step: f64) -> Result<()> {
        if !(time_step.is_finite() && time_step > 0.0) {
            return Err(ScenarioError::invalid("time step", time_step));
        }
        self.time_step = time_step;
        Ok(())
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Forget any stepping history
    pub fn reset(&mut self) {
        self.steps = 0;
    }

    /// Advance `sim` by whole time steps until it reaches `time`
    pub fn advance_to(&mut self, sim: &mut ContactSim, time: f64) {
        while sim.time() + 0.5 * self.time_step <= time {
            self.step(sim);
        }
    }

    pub fn step(&mut self, sim: &mut ContactSim) {
        verlet_integrator(sim, self.time_step);
        self.steps += 1;
        trace!("step {} to t = {:.4}", self.steps, sim.time());
    }
}
