//! Directional thrusters attached to a single body
//!
//! `attach` builds the standard six-thruster bundle around a body's outline.
//! Thrusters only push while active; `ThrusterControl` is the input layer that
//! binds a thruster set to a role and fires individual thrusters.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::error::{require_finite, Result, ScenarioError};
use crate::simulation::forces::ForceLaw;
use crate::simulation::states::{NVec2, RigidBody, Wrench};

pub const THRUSTERS_PER_SET: usize = 6;

pub type SharedThrusters = Rc<RefCell<ThrusterSet>>;

/// Which control binding a thruster set answers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThrusterRole {
    Left,
    Right,
}

impl ThrusterRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThrusterRole::Left => "left",
            ThrusterRole::Right => "right",
        }
    }
}

impl fmt::Display for ThrusterRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Thruster {
    pub location: NVec2, // body coordinates, relative to center of mass
    pub direction: NVec2, // unit vector, body coordinates
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ThrusterSet {
    body_id: u32,
    role: ThrusterRole,
    magnitude: f64,
    thrusters: Vec<Thruster>,
    name: String,
}

impl ThrusterSet {
    pub fn body_id(&self) -> u32 {
        self.body_id
    }

    pub fn role(&self) -> ThrusterRole {
        self.role
    }

    pub fn magnitude(&self) -> f64 {
        self.magnitude
    }

    /// Change the force of every thruster in place; safe between steps
    pub fn set_magnitude(&mut self, magnitude: f64) -> Result<()> {
        self.magnitude = require_finite("thrust magnitude", magnitude)?;
        Ok(())
    }

    pub fn thrusters(&self) -> &[Thruster] {
        &self.thrusters
    }

    pub fn set_active(&mut self, index: usize, active: bool) -> Result<()> {
        let t = self
            .thrusters
            .get_mut(index)
            .ok_or(ScenarioError::invalid("thruster index", index as f64))?;
        t.active = active;
        Ok(())
    }

    pub fn is_active(&self, index: usize) -> bool {
        self.thrusters.get(index).map_or(false, |t| t.active)
    }

    pub fn release_all(&mut self) {
        for t in self.thrusters.iter_mut() {
            t.active = false;
        }
    }
}

impl ForceLaw for ThrusterSet {
    fn name(&self) -> &str {
        &self.name
    }

    fn calculate_forces(&self, bodies: &[RigidBody], out: &mut [Wrench]) {
        let Some(i) = bodies.iter().position(|b| b.id == self.body_id) else {
            return;
        };
        let Some(w) = out.get_mut(i) else {
            return;
        };
        let body = &bodies[i];
        for t in self.thrusters.iter().filter(|t| t.active) {
            let f = self.magnitude * body.rotate_body_to_world(t.direction);
            let r = body.rotate_body_to_world(t.location);
            w.force += f;
            w.torque += r.x * f.y - r.y * f.x;
        }
    }
}

/// Build the six-thruster bundle for `body`, scaled by `magnitude`.
///
/// Layout in body coordinates: 0 bottom pushing up, 1 top pushing down,
/// 2/3 left/right sides above the center pushing inward, 4/5 the same below.
pub fn attach(body: &RigidBody, magnitude: f64, role: ThrusterRole) -> Result<ThrusterSet> {
    let magnitude = require_finite("thrust magnitude", magnitude)?;
    let (left, bottom, right, top) = body.body_extent();
    let (upper, lower) = (0.5 * top, 0.5 * bottom);
    let thruster = |x: f64, y: f64, dx: f64, dy: f64| Thruster {
        location: NVec2::new(x, y),
        direction: NVec2::new(dx, dy),
        active: false,
    };
    let thrusters = vec![
        thruster(0.0, bottom, 0.0, 1.0),
        thruster(0.0, top, 0.0, -1.0),
        thruster(left, upper, 1.0, 0.0),
        thruster(right, upper, -1.0, 0.0),
        thruster(left, lower, 1.0, 0.0),
        thruster(right, lower, -1.0, 0.0),
    ];
    Ok(ThrusterSet {
        body_id: body.id,
        role,
        magnitude,
        thrusters,
        name: format!("thrusters_{}", role),
    })
}

/// Input layer binding thruster sets to roles
#[derive(Default)]
pub struct ThrusterControl {
    left: Option<SharedThrusters>,
    right: Option<SharedThrusters>,
}

impl ThrusterControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_thrusters(&mut self, set: SharedThrusters, role: ThrusterRole) {
        match role {
            ThrusterRole::Left => self.left = Some(set),
            ThrusterRole::Right => self.right = Some(set),
        }
    }

    pub fn thrusters(&self, role: ThrusterRole) -> Option<&SharedThrusters> {
        match role {
            ThrusterRole::Left => self.left.as_ref(),
            ThrusterRole::Right => self.right.as_ref(),
        }
    }

    /// Bound sets, left before right
    pub fn bound(&self) -> impl Iterator<Item = &SharedThrusters> {
        self.left.iter().chain(self.right.iter())
    }

    pub fn clear(&mut self) {
        self.left = None;
        self.right = None;
    }

    /// Fire or release one thruster. Returns false when no set is bound to `role`.
    pub fn fire(&self, role: ThrusterRole, index: usize, active: bool) -> Result<bool> {
        match self.thrusters(role) {
            Some(set) => {
                set.borrow_mut().set_active(index, active)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn release_all(&self) {
        for set in self.bound() {
            set.borrow_mut().release_all();
        }
    }
}
