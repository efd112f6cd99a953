//! Core state types for the contact scenario.
//!
//! Defines the rigid body and the force/torque pair accumulated for it:
//! - `RigidBody` with body-local polygon geometry, pose and velocity
//! - `Wrench` (force + torque) written by force laws each step
//!
//! Positions are those of the center of mass, vertices are stored relative to it.

use nalgebra::Vector2;
pub type NVec2 = Vector2<f64>;

/// Force and torque about the center of mass
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Wrench {
    pub force: NVec2,
    pub torque: f64,
}

impl Wrench {
    pub fn zero() -> Self {
        Self {
            force: NVec2::zeros(),
            torque: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RigidBody {
    pub id: u32, // sequential, reset to 1 by clean slate
    pub name: String,
    pub vertices: Vec<NVec2>, // body coordinates, counter-clockwise
    pub x: NVec2, // position of center of mass
    pub angle: f64, // orientation
    pub v: NVec2, // linear velocity
    pub omega: f64, // angular velocity
    pub m: f64, // mass, infinite for walls
    pub moment: f64, // moment of inertia about the center of mass
    pub elasticity: f64,
    pub fill_style: &'static str, // display hint only
}

impl RigidBody {
    /// Place the body: center of mass at `x`, rotated by `angle`
    pub fn set_position(&mut self, x: NVec2, angle: f64) {
        self.x = x;
        self.angle = angle;
    }

    pub fn set_velocity(&mut self, v: NVec2, omega: f64) {
        self.v = v;
        self.omega = omega;
    }

    pub fn is_fixed(&self) -> bool {
        !self.m.is_finite()
    }

    /// Rotate a body-local vector into world orientation
    pub fn rotate_body_to_world(&self, p: NVec2) -> NVec2 {
        let (s, c) = self.angle.sin_cos();
        NVec2::new(c * p.x - s * p.y, s * p.x + c * p.y)
    }

    pub fn body_to_world(&self, p: NVec2) -> NVec2 {
        self.x + self.rotate_body_to_world(p)
    }

    /// Vertices in world coordinates
    pub fn world_vertices(&self) -> Vec<NVec2> {
        self.vertices.iter().map(|p| self.body_to_world(*p)).collect()
    }

    /// Linear plus rotational kinetic energy; zero for fixed bodies
    pub fn kinetic_energy(&self) -> f64 {
        if self.is_fixed() {
            return 0.0;
        }
        0.5 * self.m * self.v.norm_squared() + 0.5 * self.moment * self.omega * self.omega
    }

    // (left, bottom, right, top) of the body-local geometry
    pub fn body_extent(&self) -> (f64, f64, f64, f64) {
        self.vertices.iter().fold(
            (f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
            |(l, b, r, t), p| (l.min(p.x), b.min(p.y), r.max(p.x), t.max(p.y)),
        )
    }
}
