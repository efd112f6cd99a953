//! Force contributors for the contact scenario
//!
//! Defines the `ForceLaw` trait, the registration list `ForceSet`, and the
//! two persistent laws every scenario carries: uniform gravity and viscous
//! damping. Thruster sets live in `thrusters`.
//!
//! Laws are shared (`Rc<RefCell<_>>`) because the application keeps a handle
//! to adjust them live while the simulation holds the registration.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::{require_finite, Result, ScenarioError};
use crate::simulation::states::{RigidBody, Wrench};

/// A force law registered with the simulation
pub type SharedLaw = Rc<RefCell<dyn ForceLaw>>;

/// Trait for force sources operating on the simulation's bodies.
/// Implementations add their contribution into `out[i]` for each body
pub trait ForceLaw {
    fn name(&self) -> &str;

    fn calculate_forces(&self, bodies: &[RigidBody], out: &mut [Wrench]);

    /// Potential energy stored by this law, if any
    fn potential_energy(&self, _bodies: &[RigidBody]) -> f64 {
        0.0
    }
}

fn same_law(a: &SharedLaw, b: &SharedLaw) -> bool {
    // compare addresses only, vtables may be duplicated
    Rc::as_ptr(a) as *const u8 == Rc::as_ptr(b) as *const u8
}

/// Registered force laws, summed in registration order
#[derive(Default)]
pub struct ForceSet {
    terms: Vec<SharedLaw>,
}

impl ForceSet {
    pub fn new() -> Self {
        Self { terms: Vec::new() }
    }

    /// Register a law. Registering the same law twice would double its force.
    pub fn add(&mut self, law: SharedLaw) -> Result<()> {
        if self.contains(&law) {
            return Err(ScenarioError::InconsistentState(format!(
                "force law {} registered twice",
                law.borrow().name()
            )));
        }
        self.terms.push(law);
        Ok(())
    }

    pub fn contains(&self, law: &SharedLaw) -> bool {
        self.terms.iter().any(|t| same_law(t, law))
    }

    pub fn clear(&mut self) {
        self.terms.clear();
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn names(&self) -> Vec<String> {
        self.terms.iter().map(|t| t.borrow().name().to_owned()).collect()
    }

    /// Compute total force and torque for every body
    /// - `out[i]` will be set to the sum of contributions from all laws
    pub fn accumulate_forces(&self, bodies: &[RigidBody], out: &mut [Wrench]) {
        for w in out.iter_mut() {
            *w = Wrench::zero();
        }
        for term in &self.terms {
            term.borrow().calculate_forces(bodies, out);
        }
    }

    pub fn potential_energy(&self, bodies: &[RigidBody]) -> f64 {
        self.terms.iter().map(|t| t.borrow().potential_energy(bodies)).sum()
    }
}

/// Uniform downward gravity on every movable body
#[derive(Debug, Clone)]
pub struct GravityLaw {
    gravity: f64, // downward acceleration
    zero_energy_level: f64, // height of zero potential energy
}

impl GravityLaw {
    pub fn new(gravity: f64) -> Result<Self> {
        Ok(Self {
            gravity: require_finite("gravity", gravity)?,
            zero_energy_level: 0.0,
        })
    }

    pub fn gravity(&self) -> f64 {
        self.gravity
    }

    pub fn set_gravity(&mut self, gravity: f64) -> Result<()> {
        self.gravity = require_finite("gravity", gravity)?;
        Ok(())
    }

    pub fn zero_energy_level(&self) -> f64 {
        self.zero_energy_level
    }

    pub fn set_zero_energy_level(&mut self, level: f64) {
        self.zero_energy_level = level;
    }
}

impl ForceLaw for GravityLaw {
    fn name(&self) -> &str {
        "gravity"
    }

    fn calculate_forces(&self, bodies: &[RigidBody], out: &mut [Wrench]) {
        for (b, w) in bodies.iter().zip(out.iter_mut()) {
            if b.is_fixed() {
                continue;
            }
            w.force.y -= self.gravity * b.m;
        }
    }

    fn potential_energy(&self, bodies: &[RigidBody]) -> f64 {
        bodies
            .iter()
            .filter(|b| !b.is_fixed())
            .map(|b| b.m * self.gravity * (b.x.y - self.zero_energy_level))
            .sum()
    }
}

/// Velocity-proportional drag on translation and rotation
#[derive(Debug, Clone)]
pub struct DampingLaw {
    damping: f64, // linear coefficient
    rotate_ratio: f64, // rotational coefficient relative to `damping`
}

impl DampingLaw {
    pub fn new(damping: f64, rotate_ratio: f64) -> Result<Self> {
        Ok(Self {
            damping: require_finite("damping", damping)?,
            rotate_ratio: require_finite("damping rotate ratio", rotate_ratio)?,
        })
    }

    pub fn damping(&self) -> f64 {
        self.damping
    }

    pub fn set_damping(&mut self, damping: f64) -> Result<()> {
        self.damping = require_finite("damping", damping)?;
        Ok(())
    }

    pub fn rotate_ratio(&self) -> f64 {
        self.rotate_ratio
    }
}

impl ForceLaw for DampingLaw {
    fn name(&self) -> &str {
        "damping"
    }

    fn calculate_forces(&self, bodies: &[RigidBody], out: &mut [Wrench]) {
        if self.damping == 0.0 {
            return;
        }
        for (b, w) in bodies.iter().zip(out.iter_mut()) {
            if b.is_fixed() {
                continue;
            }
            w.force -= self.damping * b.v;
            w.torque -= self.damping * self.rotate_ratio * b.omega;
        }
    }
}
