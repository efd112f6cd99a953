//! Build the contact scenario from the initial condition table
//!
//! `ScenarioBuilder::rebuild` runs the clean slate -> rebuild sequence:
//! - CLEARING: empty the simulation, drop thruster bindings, reset the advance
//! - WALLS_AND_LAWS: register damping then gravity, build the walls and set
//!   gravity's zero energy level from them
//! - POPULATING: materialize table rows 1..=num_bods, attaching thrusters to
//!   the rows that carry a role
//! - FINALIZING: apply elasticity, zero the simulation time and the clock,
//!   save the initial state
//!
//! The resulting `Scenario` is an owned value the application keeps and the
//! builder rewrites in place on every rebuild.

use std::cell::RefCell;
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};
use std::rc::Rc;

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::error::{require_finite, Result, ScenarioError};
use crate::simulation::clock::Clock;
use crate::simulation::engine::ContactSim;
use crate::simulation::forces::{DampingLaw, GravityLaw, SharedLaw};
use crate::simulation::integrator::Advance;
use crate::simulation::shapes::{make_body, ShapeRequest};
use crate::simulation::states::NVec2;
use crate::simulation::thrusters::{attach, SharedThrusters, ThrusterControl, ThrusterRole};
use crate::simulation::walls::{make_walls, SimRect};

/// Largest supported body count; requests above it are clamped
pub const MAX_BODIES: usize = 6;

/// One slot of the scenario: shape, pose, velocity and optional thruster role
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InitialCondition {
    pub shape: ShapeRequest,
    pub fill_style: &'static str, // display hint
    pub x: [f64; 2],
    pub angle: f64,
    pub v: [f64; 2],
    pub omega: f64,
    pub thruster: Option<ThrusterRole>,
}

const SQUARE: ShapeRequest = ShapeRequest::RandomPolygon { sides: 4, radius: 1.0 };
const BLOCK: ShapeRequest = ShapeRequest::Block { width: 1.0, height: 3.0 };

/// Initial conditions for slots 1..=6, in slot order
pub static INITIAL_CONDITIONS: [InitialCondition; MAX_BODIES] = [
    InitialCondition {
        shape: SQUARE,
        fill_style: "cyan",
        x: [-3.4, 0.0],
        angle: 0.0,
        v: [0.3858, -0.3608],
        omega: -0.3956,
        thruster: Some(ThrusterRole::Left),
    },
    InitialCondition {
        shape: BLOCK,
        fill_style: "orange",
        x: [-1.8, 0.0],
        angle: 0.0,
        v: [0.26993, -0.01696],
        omega: -0.30647,
        thruster: Some(ThrusterRole::Right),
    },
    InitialCondition {
        shape: SQUARE,
        fill_style: "#9f3", // light green
        x: [2.0, -0.113],
        angle: 0.0,
        v: [-0.29445, -0.11189],
        omega: -0.23464,
        thruster: None,
    },
    InitialCondition {
        shape: BLOCK,
        fill_style: "#f6c", // hot pink
        x: [1.36, 2.5],
        angle: -FRAC_PI_4,
        v: [-0.45535, -0.37665],
        omega: 0.36526,
        thruster: None,
    },
    InitialCondition {
        shape: BLOCK,
        fill_style: "#39f",
        x: [-2.0, 2.5],
        angle: FRAC_PI_2 + 0.1,
        v: [0.0, 0.0],
        omega: 0.0,
        thruster: None,
    },
    InitialCondition {
        shape: SQUARE,
        fill_style: "#c99",
        x: [0.0, 0.0],
        angle: 0.0,
        v: [0.0, 0.0],
        omega: 0.0,
        thruster: None,
    },
];

/// Table row for a 1-based slot
pub fn initial_condition(slot: usize) -> Option<&'static InitialCondition> {
    slot.checked_sub(1).and_then(|i| INITIAL_CONDITIONS.get(i))
}

/// Values a rebuild is driven by
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RebuildConfig {
    pub num_bods: usize,
    pub thrust: f64,
    pub elasticity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildPhase {
    Idle,
    Clearing,
    WallsAndLaws,
    Populating(usize), // slot being materialized
    Finalizing,
}

/// The live scenario: simulation lists, stepping state, clock and thruster bindings
pub struct Scenario {
    pub sim: ContactSim,
    pub advance: Advance,
    pub clock: Clock,
    pub controls: ThrusterControl,
    thrusters: Vec<SharedThrusters>,
}

impl Scenario {
    pub fn new(advance: Advance) -> Self {
        Self {
            sim: ContactSim::new(),
            advance,
            clock: Clock::new(),
            controls: ThrusterControl::new(),
            thrusters: Vec::new(),
        }
    }

    /// Thruster sets created by the last rebuild, in slot order
    pub fn thruster_sets(&self) -> &[SharedThrusters] {
        &self.thrusters
    }

    /// Update every thruster set's magnitude in place; returns how many were updated
    pub fn set_thrust(&mut self, magnitude: f64) -> Result<usize> {
        let magnitude = require_finite("thrust", magnitude)?;
        for set in &self.thrusters {
            set.borrow_mut().set_magnitude(magnitude)?;
        }
        Ok(self.thrusters.len())
    }

    /// One integrator step, with the clock following along
    pub fn step(&mut self) {
        self.advance.step(&mut self.sim);
        self.clock.tick(self.advance.time_step());
    }

    /// Return to the state saved at the end of the last rebuild
    pub fn restart(&mut self) -> Result<()> {
        self.sim.restart()?;
        self.advance.reset();
        self.controls.release_all();
        self.clock.set_time(0.0);
        self.clock.set_real_time(0.0);
        Ok(())
    }
}

pub struct ScenarioBuilder {
    sim_rect: SimRect,
    damping_law: Rc<RefCell<DampingLaw>>,
    gravity_law: Rc<RefCell<GravityLaw>>,
    table: &'static [InitialCondition],
    seed: Option<u64>,
    rng: StdRng,
    phase: BuildPhase,
}

impl ScenarioBuilder {
    /// With `seed`, every rebuild restarts the polygon rng from it, making
    /// rebuilds reproducible down to the vertices.
    pub fn new(sim_rect: SimRect, gravity_law: GravityLaw, damping_law: DampingLaw, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        Self {
            sim_rect,
            damping_law: Rc::new(RefCell::new(damping_law)),
            gravity_law: Rc::new(RefCell::new(gravity_law)),
            table: &INITIAL_CONDITIONS,
            seed,
            rng,
            phase: BuildPhase::Idle,
        }
    }

    /// Build from another table instead of `INITIAL_CONDITIONS`
    pub fn with_table(mut self, table: &'static [InitialCondition]) -> Self {
        self.table = table;
        self
    }

    pub fn phase(&self) -> BuildPhase {
        self.phase
    }

    pub fn is_idle(&self) -> bool {
        self.phase == BuildPhase::Idle
    }

    pub fn sim_rect(&self) -> &SimRect {
        &self.sim_rect
    }

    pub fn gravity_law(&self) -> &Rc<RefCell<GravityLaw>> {
        &self.gravity_law
    }

    pub fn damping_law(&self) -> &Rc<RefCell<DampingLaw>> {
        &self.damping_law
    }

    /// Number of bodies a request materializes; counts past the table are clamped
    pub fn body_count(&self, requested: usize) -> usize {
        requested.min(self.table.len())
    }

    /// Rebuild `scenario` from scratch.
    ///
    /// An invalid field rectangle, thrust or elasticity is rejected before
    /// anything is touched.
    /// Any failure after clearing leaves the builder in the failing phase and
    /// the scenario half-built; the session cannot continue from there.
    pub fn rebuild(&mut self, scenario: &mut Scenario, cfg: &RebuildConfig) -> Result<()> {
        if !self.is_idle() {
            return Err(ScenarioError::InconsistentState(format!(
                "rebuild requested while builder is in {:?}",
                self.phase
            )));
        }
        self.sim_rect.validate()?;
        require_finite("thrust", cfg.thrust)?;
        if !(0.0..=1.0).contains(&cfg.elasticity) {
            return Err(ScenarioError::invalid("elasticity", cfg.elasticity));
        }
        // captured up front, clean slate resets the simulation's elasticity
        let elasticity = cfg.elasticity;

        self.phase = BuildPhase::Clearing;
        scenario.sim.clean_slate();
        scenario.controls.clear();
        scenario.thrusters.clear();
        scenario.advance.reset();
        if !scenario.sim.is_empty() {
            return Err(ScenarioError::InconsistentState(
                "simulation not empty after clean slate".into(),
            ));
        }

        self.phase = BuildPhase::WallsAndLaws;
        let damping: SharedLaw = self.damping_law.clone();
        scenario.sim.add_force_law(damping)?;
        let gravity: SharedLaw = self.gravity_law.clone();
        scenario.sim.add_force_law(gravity)?;
        let zero_energy_level = make_walls(&mut scenario.sim, &self.sim_rect)?;
        self.gravity_law.borrow_mut().set_zero_energy_level(zero_energy_level);

        let count = self.body_count(cfg.num_bods);
        if count < cfg.num_bods {
            warn!("{} bodies requested, clamping to {}", cfg.num_bods, count);
        }
        if let Some(seed) = self.seed {
            self.rng = StdRng::seed_from_u64(seed);
        }
        let table = self.table;
        for (i, row) in table.iter().take(count).enumerate() {
            let slot = i + 1;
            self.phase = BuildPhase::Populating(slot);
            self.populate(scenario, row, cfg.thrust)?;
            debug!("slot {}: {:?} at ({}, {})", slot, row.shape, row.x[0], row.x[1]);
        }

        self.phase = BuildPhase::Finalizing;
        scenario.sim.set_elasticity(elasticity)?;
        scenario.sim.set_time(0.0);
        scenario.sim.save_initial_state();
        scenario.clock.set_time(0.0);
        scenario.clock.set_real_time(0.0);

        self.phase = BuildPhase::Idle;
        info!(
            "scenario rebuilt: {} bodies, {} walls, force laws {:?}",
            scenario.sim.bodies().len(),
            scenario.sim.walls().len(),
            scenario.sim.force_laws().names()
        );
        Ok(())
    }

    fn populate(&mut self, scenario: &mut Scenario, row: &InitialCondition, thrust: f64) -> Result<()> {
        let mut body = make_body(row.shape, &mut self.rng)?;
        body.fill_style = row.fill_style;
        body.set_position(NVec2::new(row.x[0], row.x[1]), row.angle);
        body.set_velocity(NVec2::new(row.v[0], row.v[1]), row.omega);
        let id = scenario.sim.add_body(body);

        let Some(role) = row.thruster else {
            return Ok(());
        };
        let body = scenario.sim.body(id).ok_or_else(|| {
            ScenarioError::InconsistentState(format!("body {} missing after registration", id))
        })?;
        let set: SharedThrusters = Rc::new(RefCell::new(attach(body, thrust, role)?));
        scenario.controls.set_thrusters(set.clone(), role);
        let law: SharedLaw = set.clone();
        scenario.sim.add_force_law(law)?;
        scenario.thrusters.push(set);
        debug!("thrusters {} on body {} at magnitude {}", role, id, thrust);
        Ok(())
    }
}
