//! Body factory: closed polygonal geometry from a shape request
//!
//! Two requests are supported:
//! - a random convex polygon with a number of sides on a circle of given radius
//! - a rectangular block of given width and height
//!
//! Bodies are returned unattached with unit mass, at the origin and at rest.
//! Random polygon vertices are the only source of run-to-run variation in a
//! scenario; pass a seeded rng to make them reproducible.

use std::f64::consts::TAU;

use rand::Rng;

use crate::error::{Result, ScenarioError};
use crate::simulation::states::{NVec2, RigidBody};

/// Angular jitter of each polygon vertex, as a fraction of the even spacing
const VERTEX_JITTER: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeRequest {
    RandomPolygon { sides: u32, radius: f64 },
    Block { width: f64, height: f64 },
}

impl ShapeRequest {
    fn validate(&self) -> Result<()> {
        match *self {
            ShapeRequest::RandomPolygon { sides, radius } => {
                if sides < 3 {
                    return Err(ScenarioError::invalid("polygon sides", sides as f64));
                }
                positive("polygon radius", radius)
            }
            ShapeRequest::Block { width, height } => {
                positive("block width", width)?;
                positive("block height", height)
            }
        }
    }
}

fn positive(what: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ScenarioError::invalid(what, value))
    }
}

/// Build a new, unregistered body from `request`
pub fn make_body<R: Rng + ?Sized>(request: ShapeRequest, rng: &mut R) -> Result<RigidBody> {
    request.validate()?;
    let (name, outline) = match request {
        ShapeRequest::RandomPolygon { sides, radius } => {
            ("polygon", random_polygon(sides, radius, rng))
        }
        ShapeRequest::Block { width, height } => ("block", block(width, height)),
    };
    Ok(body_from_outline(name, outline, 1.0))
}

/// Vertices on a circle of `radius`, evenly spaced then jittered in angle.
/// Jitter stays below half the spacing so the ordering, and therefore
/// convexity, is preserved.
pub fn random_polygon<R: Rng + ?Sized>(sides: u32, radius: f64, rng: &mut R) -> Vec<NVec2> {
    let spacing = TAU / sides as f64;
    let start = rng.gen_range(0.0..spacing);
    (0..sides)
        .map(|i| {
            let jitter = rng.gen_range(-VERTEX_JITTER..VERTEX_JITTER) * spacing;
            let theta = start + i as f64 * spacing + jitter;
            NVec2::new(radius * theta.cos(), radius * theta.sin())
        })
        .collect()
}

/// Rectangle centered at the origin, counter-clockwise from bottom-left
pub fn block(width: f64, height: f64) -> Vec<NVec2> {
    let (w, h) = (width / 2.0, height / 2.0);
    vec![
        NVec2::new(-w, -h),
        NVec2::new(w, -h),
        NVec2::new(w, h),
        NVec2::new(-w, h),
    ]
}

/// Turn a counter-clockwise outline into a body: vertices are re-centered on
/// the centroid and the moment of inertia follows from a uniform density.
pub fn body_from_outline(name: &str, outline: Vec<NVec2>, mass: f64) -> RigidBody {
    let n = outline.len();
    let mut area2 = 0.0; // twice the signed area
    let mut centroid = NVec2::zeros();
    let mut second_moment = 0.0; // about the origin, unit density

    for i in 0..n {
        let p = outline[i];
        let q = outline[(i + 1) % n];
        let cross = p.x * q.y - q.x * p.y;
        area2 += cross;
        centroid += (p + q) * cross;
        second_moment += cross * (p.dot(&p) + p.dot(&q) + q.dot(&q));
    }

    let area = 0.5 * area2;
    centroid /= 3.0 * area2;
    second_moment /= 12.0;

    // scale unit density to `mass`, then shift to the centroid (parallel axis)
    let moment = mass * (second_moment / area - centroid.norm_squared());
    let vertices = outline.into_iter().map(|p| p - centroid).collect();

    RigidBody {
        id: 0,
        name: name.to_owned(),
        vertices,
        x: NVec2::zeros(),
        angle: 0.0,
        v: NVec2::zeros(),
        omega: 0.0,
        m: mass,
        moment,
        elasticity: 1.0,
        fill_style: "",
    }
}
