//! The contact demo application: live scenario plus its tunable parameters
//!
//! `ContactApp` binds the parameters `num_bods`, `thrust`, `gravity`,
//! `damping`, `elasticity` and `time_step` to the scenario. Changing the body
//! count rebuilds; every other parameter is applied to the live scenario.
//! Every successful set broadcasts a change, even when the value is unchanged.

use std::time::Instant;

use log::{info, warn};

use crate::configuration::config::{Locale, ScenarioConfig};
use crate::error::{require_finite, Result, ScenarioError};
use crate::simulation::forces::{DampingLaw, GravityLaw};
use crate::simulation::integrator::Advance;
use crate::simulation::params::{Notification, ParameterNumber, ParameterRegistry};
use crate::simulation::scenario::{RebuildConfig, Scenario, ScenarioBuilder};

pub const NUM_BODIES: &str = "num_bods";
pub const THRUST: &str = "thrust";
pub const GRAVITY: &str = "gravity";
pub const DAMPING: &str = "damping";
pub const ELASTICITY: &str = "elasticity";
pub const TIME_STEP: &str = "time_step";

struct Labels {
    num_bodies: &'static str,
    thrust: &'static str,
    gravity: &'static str,
    damping: &'static str,
    elasticity: &'static str,
    time_step: &'static str,
}

const EN: Labels = Labels {
    num_bodies: "number of objects",
    thrust: "thrust",
    gravity: "gravity",
    damping: "damping",
    elasticity: "elasticity",
    time_step: "time step",
};

const DE: Labels = Labels {
    num_bodies: "Anzahl von Objekten",
    thrust: "Schubkraft",
    gravity: "Gravitation",
    damping: "Dämpfung",
    elasticity: "Elastizität",
    time_step: "Zeitschritt",
};

pub struct ContactApp {
    num_bods: usize,
    thrust: f64,
    elasticity: f64,
    builder: ScenarioBuilder,
    scenario: Scenario,
    params: ParameterRegistry<ContactApp>,
}

impl ContactApp {
    /// Create the application and build its first scenario
    pub fn new(cfg: &ScenarioConfig) -> Result<Self> {
        let gravity = GravityLaw::new(cfg.gravity)?;
        let damping = DampingLaw::new(cfg.damping, cfg.rotate_damping)?;
        let builder = ScenarioBuilder::new(cfg.sim_rect, gravity, damping, cfg.seed);
        Self::with_builder(cfg, builder)
    }

    /// Create the application around a prepared builder
    pub fn with_builder(cfg: &ScenarioConfig, builder: ScenarioBuilder) -> Result<Self> {
        let mut app = Self {
            num_bods: cfg.num_bods,
            thrust: require_finite("thrust", cfg.thrust)?,
            elasticity: cfg.elasticity,
            builder,
            scenario: Scenario::new(Advance::new(cfg.time_step)?),
            params: ParameterRegistry::new(),
        };
        app.register_parameters(cfg.locale);
        app.rebuild()?;
        Ok(app)
    }

    fn register_parameters(&mut self, locale: Locale) {
        let labels = match locale {
            Locale::En => &EN,
            Locale::De => &DE,
        };
        self.params.add_parameter(
            ParameterNumber::<ContactApp>::new(
                NUM_BODIES,
                labels.num_bodies,
                |app: &ContactApp| app.num_bods() as f64,
                |app: &mut ContactApp, value: f64| {
                    if !value.is_finite() || value < 0.0 {
                        return Err(ScenarioError::invalid("number of bodies", value));
                    }
                    app.set_num_bods(value.round() as usize)
                },
            )
            .with_decimal_places(0),
        );
        self.params.add_parameter(ParameterNumber::<ContactApp>::new(
            THRUST,
            labels.thrust,
            |app: &ContactApp| app.thrust(),
            |app: &mut ContactApp, value: f64| app.set_thrust(value),
        ));
        self.params.add_parameter(ParameterNumber::<ContactApp>::new(
            GRAVITY,
            labels.gravity,
            |app: &ContactApp| app.gravity(),
            |app: &mut ContactApp, value: f64| app.set_gravity(value),
        ));
        self.params.add_parameter(ParameterNumber::<ContactApp>::new(
            DAMPING,
            labels.damping,
            |app: &ContactApp| app.damping(),
            |app: &mut ContactApp, value: f64| app.set_damping(value),
        ));
        self.params.add_parameter(ParameterNumber::<ContactApp>::new(
            ELASTICITY,
            labels.elasticity,
            |app: &ContactApp| app.elasticity(),
            |app: &mut ContactApp, value: f64| app.set_elasticity(value),
        ));
        self.params.add_parameter(ParameterNumber::<ContactApp>::new(
            TIME_STEP,
            labels.time_step,
            |app: &ContactApp| app.time_step(),
            |app: &mut ContactApp, value: f64| app.set_time_step(value),
        ));
    }

    fn ensure_live(&self) -> Result<()> {
        if self.builder.is_idle() {
            Ok(())
        } else {
            Err(ScenarioError::InconsistentState(format!(
                "scenario rebuild failed in {:?}; the session must be restarted",
                self.builder.phase()
            )))
        }
    }

    pub fn rebuild_config(&self) -> RebuildConfig {
        RebuildConfig {
            num_bods: self.num_bods,
            thrust: self.thrust,
            elasticity: self.elasticity,
        }
    }

    /// Rebuild the scenario from the current parameter values
    pub fn rebuild(&mut self) -> Result<()> {
        self.ensure_live()?;
        let cfg = self.rebuild_config();
        self.builder.rebuild(&mut self.scenario, &cfg)?;
        let num_bodies = self.scenario.sim.bodies().len();
        self.params.notify(&Notification::Rebuilt { num_bodies });
        Ok(())
    }

    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    pub fn scenario_mut(&mut self) -> &mut Scenario {
        &mut self.scenario
    }

    pub fn builder(&self) -> &ScenarioBuilder {
        &self.builder
    }

    pub fn parameters(&self) -> &ParameterRegistry<ContactApp> {
        &self.params
    }

    pub fn subscribe<F>(&mut self, observer: F)
    where
        F: FnMut(&Notification) + 'static,
    {
        self.params.subscribe(observer);
    }

    pub fn get_parameter(&self, name: &str) -> Result<f64> {
        let p = self
            .params
            .parameter(name)
            .ok_or_else(|| ScenarioError::UnknownParameter(name.to_owned()))?;
        Ok(p.get(self))
    }

    pub fn set_parameter(&mut self, name: &str, value: f64) -> Result<()> {
        let p = self
            .params
            .parameter(name)
            .ok_or_else(|| ScenarioError::UnknownParameter(name.to_owned()))?;
        p.set(self, value)
    }

    /// Requested body count; values above the table size are kept as set
    pub fn num_bods(&self) -> usize {
        self.num_bods
    }

    pub fn set_num_bods(&mut self, num_bods: usize) -> Result<()> {
        self.ensure_live()?;
        self.num_bods = num_bods;
        self.rebuild()?;
        self.params.broadcast(NUM_BODIES, num_bods as f64);
        Ok(())
    }

    pub fn thrust(&self) -> f64 {
        self.thrust
    }

    /// Change the thrusters' magnitude without rebuilding
    pub fn set_thrust(&mut self, thrust: f64) -> Result<()> {
        self.ensure_live()?;
        let thrust = require_finite("thrust", thrust)?;
        self.thrust = thrust;
        let updated = self.scenario.set_thrust(thrust)?;
        if updated == 0 {
            warn!("thrust set to {} but the scenario has no thrusters", thrust);
        }
        self.params.broadcast(THRUST, thrust);
        Ok(())
    }

    pub fn gravity(&self) -> f64 {
        self.builder.gravity_law().borrow().gravity()
    }

    pub fn set_gravity(&mut self, gravity: f64) -> Result<()> {
        self.ensure_live()?;
        self.builder.gravity_law().borrow_mut().set_gravity(gravity)?;
        self.params.broadcast(GRAVITY, gravity);
        Ok(())
    }

    pub fn damping(&self) -> f64 {
        self.builder.damping_law().borrow().damping()
    }

    pub fn set_damping(&mut self, damping: f64) -> Result<()> {
        self.ensure_live()?;
        self.builder.damping_law().borrow_mut().set_damping(damping)?;
        self.params.broadcast(DAMPING, damping);
        Ok(())
    }

    pub fn elasticity(&self) -> f64 {
        self.elasticity
    }

    /// Applied to the live bodies now and to every later rebuild
    pub fn set_elasticity(&mut self, elasticity: f64) -> Result<()> {
        self.ensure_live()?;
        self.scenario.sim.set_elasticity(elasticity)?;
        self.elasticity = elasticity;
        self.params.broadcast(ELASTICITY, elasticity);
        Ok(())
    }

    pub fn time_step(&self) -> f64 {
        self.scenario.advance.time_step()
    }

    pub fn set_time_step(&mut self, time_step: f64) -> Result<()> {
        self.ensure_live()?;
        self.scenario.advance.set_time_step(time_step)?;
        self.params.broadcast(TIME_STEP, time_step);
        Ok(())
    }

    /// Step the scenario `steps` times
    pub fn run(&mut self, steps: usize) -> Result<()> {
        self.ensure_live()?;
        let t0 = Instant::now();
        for _ in 0..steps {
            self.scenario.step();
        }
        let clock = &mut self.scenario.clock;
        clock.set_real_time(clock.real_time() + t0.elapsed().as_secs_f64());
        let energy = self.scenario.sim.energy();
        info!(
            "t = {:.3}: kinetic {:.5}, potential {:.5}, total {:.5}",
            self.scenario.sim.time(),
            energy.kinetic,
            energy.potential,
            energy.total()
        );
        Ok(())
    }
}
