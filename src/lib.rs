pub mod error;
pub mod simulation;
pub mod configuration;
pub mod benchmark;

pub use error::{Result, ScenarioError};

pub use simulation::states::{RigidBody, Wrench, NVec2};
pub use simulation::forces::{ForceLaw, ForceSet, GravityLaw, DampingLaw};
pub use simulation::thrusters::{ThrusterSet, ThrusterRole, ThrusterControl};
pub use simulation::engine::ContactSim;
pub use simulation::scenario::{Scenario, ScenarioBuilder, RebuildConfig, INITIAL_CONDITIONS, MAX_BODIES};
pub use simulation::params::{Notification, ParameterNumber, ParameterRegistry};
pub use simulation::app::ContactApp;
pub use simulation::script::ScriptParser;

pub use configuration::config::{ScenarioConfig, Locale};

pub use benchmark::benchmark::{bench_rebuild, bench_step};
