//! The contact simulation's live lists
//!
//! `ContactSim` owns the movable bodies, the static walls and the registered
//! force laws, plus the simulation time and the saved initial state used by
//! `restart`. Contact resolution is not performed here.

use log::debug;

use crate::error::{Result, ScenarioError};
use crate::simulation::forces::{ForceSet, SharedLaw};
use crate::simulation::states::{RigidBody, Wrench};

pub const DEFAULT_ELASTICITY: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyInfo {
    pub kinetic: f64,
    pub potential: f64,
}

impl EnergyInfo {
    pub fn total(&self) -> f64 {
        self.kinetic + self.potential
    }
}

#[derive(Debug, Clone)]
struct SavedState {
    bodies: Vec<RigidBody>,
    time: f64,
}

pub struct ContactSim {
    bodies: Vec<RigidBody>, // movable bodies
    walls: Vec<RigidBody>, // fixed, infinite mass
    forces: ForceSet,
    elasticity: f64,
    time: f64,
    next_id: u32,
    initial_state: Option<SavedState>,
}

impl Default for ContactSim {
    fn default() -> Self {
        Self::new()
    }
}

impl ContactSim {
    pub fn new() -> Self {
        Self {
            bodies: Vec::new(),
            walls: Vec::new(),
            forces: ForceSet::new(),
            elasticity: DEFAULT_ELASTICITY,
            time: 0.0,
            next_id: 1,
            initial_state: None,
        }
    }

    /// Drop every body, wall and force law and return to the empty baseline.
    /// Body ids restart at 1 and the elasticity returns to its default.
    pub fn clean_slate(&mut self) {
        debug!(
            "clean slate: dropping {} bodies, {} walls, {} force laws",
            self.bodies.len(),
            self.walls.len(),
            self.forces.len()
        );
        self.bodies.clear();
        self.walls.clear();
        self.forces.clear();
        self.elasticity = DEFAULT_ELASTICITY;
        self.time = 0.0;
        self.next_id = 1;
        self.initial_state = None;
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty() && self.walls.is_empty() && self.forces.is_empty()
    }

    fn take_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Register a movable body; returns its id
    pub fn add_body(&mut self, mut body: RigidBody) -> u32 {
        let id = self.take_id();
        body.id = id;
        body.name = format!("{}{}", body.name, id);
        self.bodies.push(body);
        id
    }

    pub fn add_wall(&mut self, mut wall: RigidBody) -> u32 {
        let id = self.take_id();
        wall.id = id;
        self.walls.push(wall);
        id
    }

    pub fn add_force_law(&mut self, law: SharedLaw) -> Result<()> {
        self.forces.add(law)
    }

    pub fn force_laws(&self) -> &ForceSet {
        &self.forces
    }

    pub fn bodies(&self) -> &[RigidBody] {
        &self.bodies
    }

    pub fn bodies_mut(&mut self) -> &mut [RigidBody] {
        &mut self.bodies
    }

    pub fn walls(&self) -> &[RigidBody] {
        &self.walls
    }

    pub fn body(&self, id: u32) -> Option<&RigidBody> {
        self.bodies.iter().find(|b| b.id == id)
    }

    pub fn elasticity(&self) -> f64 {
        self.elasticity
    }

    /// Apply `elasticity` to every body and wall
    pub fn set_elasticity(&mut self, elasticity: f64) -> Result<()> {
        if !(0.0..=1.0).contains(&elasticity) {
            return Err(ScenarioError::invalid("elasticity", elasticity));
        }
        self.elasticity = elasticity;
        for b in self.bodies.iter_mut().chain(self.walls.iter_mut()) {
            b.elasticity = elasticity;
        }
        Ok(())
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn set_time(&mut self, time: f64) {
        self.time = time;
    }

    /// Sum of force law contributions for every movable body
    pub fn accumulate_forces(&self, out: &mut [Wrench]) {
        self.forces.accumulate_forces(&self.bodies, out);
    }

    pub fn energy(&self) -> EnergyInfo {
        EnergyInfo {
            kinetic: self.bodies.iter().map(|b| b.kinetic_energy()).sum(),
            potential: self.forces.potential_energy(&self.bodies),
        }
    }

    /// Remember the current bodies and time as the restart point
    pub fn save_initial_state(&mut self) {
        self.initial_state = Some(SavedState {
            bodies: self.bodies.clone(),
            time: self.time,
        });
    }

    pub fn has_initial_state(&self) -> bool {
        self.initial_state.is_some()
    }

    /// Restore the bodies and time saved by `save_initial_state`
    pub fn restart(&mut self) -> Result<()> {
        let saved = self.initial_state.as_ref().ok_or_else(|| {
            ScenarioError::InconsistentState("restart without a saved initial state".into())
        })?;
        if saved.bodies.len() != self.bodies.len() {
            return Err(ScenarioError::InconsistentState(format!(
                "saved state has {} bodies, simulation has {}",
                saved.bodies.len(),
                self.bodies.len()
            )));
        }
        self.bodies = saved.bodies.clone();
        self.time = saved.time;
        // elasticity may have been changed live since the snapshot
        for b in self.bodies.iter_mut() {
            b.elasticity = self.elasticity;
        }
        Ok(())
    }
}
