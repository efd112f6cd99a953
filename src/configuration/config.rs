//! Configuration types for loading the contact scenario from YAML.
//!
//! Every field is optional; missing fields take the defaults of the demo.
//!
//! # YAML format
//!
//! ```yaml
//! sim_rect:
//!   left: -4.5
//!   bottom: -3.6
//!   right: 3.1
//!   top: 4.0
//! num_bods: 6               # 0..=6, larger values behave as 6
//! thrust: 1.5               # magnitude of every thruster
//! gravity: 3.0              # downward acceleration
//! damping: 0.0              # linear damping coefficient
//! rotate_damping: 0.1       # rotational damping relative to `damping`
//! elasticity: 0.8           # 0..=1, applied to every body
//! time_step: 0.025          # integrator step
//! seed: 42                  # optional, makes random polygons reproducible
//! locale: en                # parameter labels, "en" or "de"
//! ```

use serde::Deserialize;

use crate::simulation::integrator::DEFAULT_TIME_STEP;
use crate::simulation::walls::SimRect;

/// Language of parameter labels
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    #[serde(rename = "en")]
    En,

    #[serde(rename = "de")]
    De,
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ScenarioConfig {
    pub sim_rect: SimRect, // playing field, walls are built just outside it
    pub num_bods: usize, // number of table slots to materialize
    pub thrust: f64, // thruster magnitude
    pub gravity: f64,
    pub damping: f64,
    pub rotate_damping: f64, // ratio of rotational to linear damping
    pub elasticity: f64,
    pub time_step: f64,
    pub seed: Option<u64>, // reproducible random polygons when set
    pub locale: Locale,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            sim_rect: SimRect::default(),
            num_bods: 6,
            thrust: 1.5,
            gravity: 3.0,
            damping: 0.0,
            rotate_damping: 0.1,
            elasticity: 0.8,
            time_step: DEFAULT_TIME_STEP,
            seed: None,
            locale: Locale::En,
        }
    }
}

impl ScenarioConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }
}
