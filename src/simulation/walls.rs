//! Static walls bounding the playing field

use serde::Deserialize;

use crate::error::{require_finite, Result, ScenarioError};
use crate::simulation::engine::ContactSim;
use crate::simulation::shapes::{block, body_from_outline};
use crate::simulation::states::NVec2;

pub const WALL_THICKNESS: f64 = 1.0;

/// Axis-aligned rectangle in simulation coordinates
#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct SimRect {
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
    pub top: f64,
}

impl SimRect {
    pub const fn new(left: f64, bottom: f64, right: f64, top: f64) -> Self {
        Self { left, bottom, right, top }
    }

    /// Finite edges enclosing a non-empty area
    pub fn validate(&self) -> Result<()> {
        for (what, v) in [
            ("sim_rect.left", self.left),
            ("sim_rect.bottom", self.bottom),
            ("sim_rect.right", self.right),
            ("sim_rect.top", self.top),
        ] {
            require_finite(what, v)?;
        }
        if self.width() <= 0.0 {
            return Err(ScenarioError::invalid("sim_rect width", self.width()));
        }
        if self.height() <= 0.0 {
            return Err(ScenarioError::invalid("sim_rect height", self.height()));
        }
        Ok(())
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }

    pub fn center(&self) -> NVec2 {
        NVec2::new(0.5 * (self.left + self.right), 0.5 * (self.bottom + self.top))
    }

    pub fn contains(&self, p: NVec2) -> bool {
        p.x >= self.left && p.x <= self.right && p.y >= self.bottom && p.y <= self.top
    }
}

impl Default for SimRect {
    fn default() -> Self {
        SimRect::new(-4.5, -3.6, 3.1, 4.0)
    }
}

/// Add four fixed walls just outside `rect` to the simulation.
///
/// Returns the zero energy level for gravity: the top surface of the floor.
pub fn make_walls(sim: &mut ContactSim, rect: &SimRect) -> Result<f64> {
    rect.validate()?;
    let t = WALL_THICKNESS;
    let c = rect.center();
    let walls = [
        ("wall_bottom", rect.width() + 2.0 * t, t, NVec2::new(c.x, rect.bottom - t / 2.0)),
        ("wall_right", t, rect.height(), NVec2::new(rect.right + t / 2.0, c.y)),
        ("wall_top", rect.width() + 2.0 * t, t, NVec2::new(c.x, rect.top + t / 2.0)),
        ("wall_left", t, rect.height(), NVec2::new(rect.left - t / 2.0, c.y)),
    ];
    for (name, width, height, center) in walls {
        let mut wall = body_from_outline(name, block(width, height), f64::INFINITY);
        wall.set_position(center, 0.0);
        wall.fill_style = "gray";
        sim.add_wall(wall);
    }
    Ok(rect.bottom)
}
