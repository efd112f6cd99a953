use std::cell::RefCell;
use std::rc::Rc;

use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;

use ctsim::simulation::clock::Clock;
use ctsim::simulation::engine::ContactSim;
use ctsim::simulation::forces::{DampingLaw, ForceLaw, ForceSet, GravityLaw, SharedLaw};
use ctsim::simulation::integrator::{verlet_integrator, Advance};
use ctsim::simulation::shapes::{body_from_outline, block, make_body, ShapeRequest};
use ctsim::simulation::states::{NVec2, RigidBody, Wrench};
use ctsim::simulation::thrusters::{attach, ThrusterControl, ThrusterRole};
use ctsim::simulation::walls::{make_walls, SimRect};
use ctsim::ScenarioError;

/// A 1x3 block at `x`, at rest
pub fn block_body(x: NVec2) -> RigidBody {
    let mut b = body_from_outline("block", block(1.0, 3.0), 1.0);
    b.set_position(x, 0.0);
    b
}

/// Gravity-only simulation with one body at the origin
pub fn falling_sim(g: f64) -> ContactSim {
    let mut sim = ContactSim::new();
    sim.add_body(block_body(NVec2::zeros()));
    let law: SharedLaw = Rc::new(RefCell::new(GravityLaw::new(g).unwrap()));
    sim.add_force_law(law).unwrap();
    sim
}

fn forces_on(law: SharedLaw, bodies: &[RigidBody]) -> Vec<Wrench> {
    let mut set = ForceSet::new();
    set.add(law).unwrap();
    let mut out = vec![Wrench::zero(); bodies.len()];
    set.accumulate_forces(bodies, &mut out);
    out
}

// ==================================================================================
// Shape tests
// ==================================================================================

#[test]
fn block_is_centered_with_rectangle_moment() {
    let b = block_body(NVec2::zeros());
    let (l, bottom, r, top) = b.body_extent();

    assert_relative_eq!(l, -0.5);
    assert_relative_eq!(r, 0.5);
    assert_relative_eq!(bottom, -1.5);
    assert_relative_eq!(top, 1.5);
    assert_relative_eq!(b.m, 1.0);
    // (w^2 + h^2) / 12 for unit mass
    assert_relative_eq!(b.moment, 10.0 / 12.0, epsilon = 1e-12);
}

#[test]
fn world_vertices_follow_the_pose() {
    let mut b = block_body(NVec2::zeros());
    b.set_position(NVec2::new(1.0, 2.0), std::f64::consts::FRAC_PI_2);
    let world = b.world_vertices();

    assert_eq!(world.len(), b.vertices.len());
    for (w, local) in world.iter().zip(&b.vertices) {
        // a quarter turn maps (x, y) to (-y, x)
        assert_relative_eq!(w.x, 1.0 - local.y, epsilon = 1e-12);
        assert_relative_eq!(w.y, 2.0 + local.x, epsilon = 1e-12);
    }
}

#[test]
fn outline_is_recentered_on_its_centroid() {
    let outline: Vec<NVec2> = block(2.0, 2.0).into_iter().map(|p| p + NVec2::new(5.0, -3.0)).collect();
    let b = body_from_outline("square", outline, 1.0);

    let sum: NVec2 = b.vertices.iter().sum();
    assert!(sum.norm() < 1e-12, "vertices not centered: {:?}", sum);
    assert_relative_eq!(b.moment, 8.0 / 12.0, epsilon = 1e-12);
}

#[test]
fn random_polygon_is_convex_and_counter_clockwise() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..50 {
        let b = make_body(ShapeRequest::RandomPolygon { sides: 4, radius: 1.0 }, &mut rng).unwrap();
        let v = &b.vertices;
        assert_eq!(v.len(), 4);
        for i in 0..v.len() {
            let e1 = v[(i + 1) % 4] - v[i];
            let e2 = v[(i + 2) % 4] - v[(i + 1) % 4];
            assert!(e1.x * e2.y - e1.y * e2.x > 0.0, "not convex at vertex {}", i);
        }
        assert!(b.moment > 0.0);
    }
}

#[test]
fn seeded_random_polygons_repeat() {
    let request = ShapeRequest::RandomPolygon { sides: 5, radius: 2.0 };
    let a = make_body(request, &mut StdRng::seed_from_u64(3)).unwrap();
    let b = make_body(request, &mut StdRng::seed_from_u64(3)).unwrap();

    assert_eq!(a.vertices, b.vertices);
}

#[test]
fn malformed_shape_requests_are_rejected() {
    let mut rng = StdRng::seed_from_u64(0);
    let bad = [
        ShapeRequest::RandomPolygon { sides: 2, radius: 1.0 },
        ShapeRequest::RandomPolygon { sides: 4, radius: 0.0 },
        ShapeRequest::Block { width: -1.0, height: 3.0 },
        ShapeRequest::Block { width: 1.0, height: f64::NAN },
    ];
    for request in bad {
        let err = make_body(request, &mut rng).unwrap_err();
        assert!(matches!(err, ScenarioError::InvalidArgument { .. }), "{:?} gave {:?}", request, err);
    }
}

// ==================================================================================
// Force law tests
// ==================================================================================

#[test]
fn gravity_pulls_down_by_mass() {
    let bodies = vec![block_body(NVec2::new(1.0, 2.0))];
    let out = forces_on(Rc::new(RefCell::new(GravityLaw::new(3.0).unwrap())), &bodies);

    assert_relative_eq!(out[0].force.x, 0.0);
    assert_relative_eq!(out[0].force.y, -3.0);
    assert_relative_eq!(out[0].torque, 0.0);
}

#[test]
fn gravity_potential_is_relative_to_zero_energy_level() {
    let bodies = vec![block_body(NVec2::new(0.0, 2.0))];
    let mut law = GravityLaw::new(3.0).unwrap();
    law.set_zero_energy_level(-1.0);
    let law: SharedLaw = Rc::new(RefCell::new(law));

    assert_relative_eq!(law.borrow().potential_energy(&bodies), 9.0);
}

#[test]
fn damping_opposes_velocity_and_spin() {
    let mut b = block_body(NVec2::zeros());
    b.set_velocity(NVec2::new(2.0, -1.0), 4.0);
    let out = forces_on(Rc::new(RefCell::new(DampingLaw::new(0.5, 0.1).unwrap())), &[b]);

    assert_relative_eq!(out[0].force.x, -1.0);
    assert_relative_eq!(out[0].force.y, 0.5);
    assert_relative_eq!(out[0].torque, -0.2, epsilon = 1e-12);
}

#[test]
fn non_finite_law_parameters_are_rejected() {
    assert!(GravityLaw::new(f64::NAN).is_err());
    let mut damping = DampingLaw::new(0.1, 0.1).unwrap();
    assert!(damping.set_damping(f64::INFINITY).is_err());
    assert_relative_eq!(damping.damping(), 0.1);
}

#[test]
fn registering_a_law_twice_is_inconsistent() {
    let law: SharedLaw = Rc::new(RefCell::new(GravityLaw::new(1.0).unwrap()));
    let mut set = ForceSet::new();
    set.add(law.clone()).unwrap();

    let err = set.add(law).unwrap_err();
    assert!(err.is_fatal());
    assert_eq!(set.len(), 1);
}

// ==================================================================================
// Thruster tests
// ==================================================================================

#[test]
fn idle_thrusters_push_nothing() {
    let mut sim = ContactSim::new();
    let id = sim.add_body(block_body(NVec2::zeros()));
    let set = attach(sim.body(id).unwrap(), 2.0, ThrusterRole::Left).unwrap();
    let out = forces_on(Rc::new(RefCell::new(set)), sim.bodies());

    assert_eq!(out[0], Wrench::zero());
}

#[test]
fn bottom_thruster_lifts_without_torque() {
    let mut sim = ContactSim::new();
    let id = sim.add_body(block_body(NVec2::zeros()));
    let mut set = attach(sim.body(id).unwrap(), 2.0, ThrusterRole::Right).unwrap();
    set.set_active(0, true).unwrap();
    let out = forces_on(Rc::new(RefCell::new(set)), sim.bodies());

    assert_relative_eq!(out[0].force.x, 0.0);
    assert_relative_eq!(out[0].force.y, 2.0);
    assert_relative_eq!(out[0].torque, 0.0);
}

#[test]
fn side_thruster_follows_body_rotation_and_spins() {
    let mut b = block_body(NVec2::zeros());
    b.set_position(NVec2::zeros(), std::f64::consts::FRAC_PI_2);
    let mut sim = ContactSim::new();
    let id = sim.add_body(b);
    let mut set = attach(sim.body(id).unwrap(), 1.0, ThrusterRole::Left).unwrap();
    set.set_active(2, true).unwrap(); // left side pushing +x in body coordinates
    let out = forces_on(Rc::new(RefCell::new(set)), sim.bodies());

    // body +x is world +y after a quarter turn
    assert_relative_eq!(out[0].force.x, 0.0, epsilon = 1e-12);
    assert_relative_eq!(out[0].force.y, 1.0, epsilon = 1e-12);
    assert!(out[0].torque < 0.0, "expected clockwise torque, got {}", out[0].torque);
}

#[test]
fn thrusters_skip_bodies_past_a_short_buffer() {
    let mut sim = ContactSim::new();
    sim.add_body(block_body(NVec2::new(-2.0, 0.0)));
    let id = sim.add_body(block_body(NVec2::new(2.0, 0.0)));
    let mut set = attach(sim.body(id).unwrap(), 1.0, ThrusterRole::Right).unwrap();
    set.set_active(0, true).unwrap();
    let mut forces = ForceSet::new();
    forces.add(Rc::new(RefCell::new(set))).unwrap();

    let mut out = vec![Wrench::zero(); 1];
    forces.accumulate_forces(sim.bodies(), &mut out);
    assert_eq!(out[0], Wrench::zero());
}

#[test]
fn thruster_magnitude_updates_in_place() {
    let b = block_body(NVec2::zeros());
    let mut set = attach(&b, 1.5, ThrusterRole::Left).unwrap();
    set.set_magnitude(4.0).unwrap();

    assert_relative_eq!(set.magnitude(), 4.0);
    assert!(set.set_magnitude(f64::NAN).is_err());
    assert_relative_eq!(set.magnitude(), 4.0);
    assert!(set.set_active(6, true).is_err());
}

#[test]
fn control_fires_bound_roles_only() {
    let b = block_body(NVec2::zeros());
    let set = Rc::new(RefCell::new(attach(&b, 1.0, ThrusterRole::Left).unwrap()));
    let mut control = ThrusterControl::new();
    control.set_thrusters(set.clone(), ThrusterRole::Left);

    assert!(control.fire(ThrusterRole::Left, 3, true).unwrap());
    assert!(set.borrow().is_active(3));
    assert!(!control.fire(ThrusterRole::Right, 3, true).unwrap());

    control.release_all();
    assert!(!set.borrow().is_active(3));
}

// ==================================================================================
// Simulation and integrator tests
// ==================================================================================

#[test]
fn walls_surround_the_field() {
    let mut sim = ContactSim::new();
    let rect = SimRect::default();
    let zel = make_walls(&mut sim, &rect).unwrap();

    assert_eq!(sim.walls().len(), 4);
    assert!(sim.bodies().is_empty());
    assert_relative_eq!(zel, rect.bottom);
    for w in sim.walls() {
        assert!(w.is_fixed());
        assert!(!rect.contains(w.x), "{} centered inside the field", w.name);
    }
}

#[test]
fn clean_slate_restarts_ids() {
    let mut sim = falling_sim(1.0);
    sim.set_elasticity(0.5).unwrap();
    sim.clean_slate();

    assert!(sim.is_empty());
    assert_relative_eq!(sim.elasticity(), 1.0);
    assert_eq!(sim.add_body(block_body(NVec2::zeros())), 1);
}

#[test]
fn verlet_is_exact_for_constant_force() {
    let mut sim = falling_sim(2.0);
    let dt = 0.1;
    for _ in 0..10 {
        verlet_integrator(&mut sim, dt);
    }
    let b = &sim.bodies()[0];

    assert_relative_eq!(sim.time(), 1.0, epsilon = 1e-12);
    assert_relative_eq!(b.v.y, -2.0, epsilon = 1e-12);
    assert_relative_eq!(b.x.y, -1.0, epsilon = 1e-12);
}

#[test]
fn free_fall_conserves_energy() {
    let mut sim = falling_sim(3.0);
    sim.bodies_mut()[0].set_velocity(NVec2::new(0.3, 1.0), 0.5);
    let e0 = sim.energy().total();
    let mut advance = Advance::new(0.01).unwrap();
    advance.advance_to(&mut sim, 2.0);

    assert_eq!(advance.steps(), 200);
    assert_relative_eq!(sim.energy().total(), e0, epsilon = 1e-9);
}

#[test]
fn restart_requires_a_snapshot() {
    let mut sim = falling_sim(1.0);
    assert!(sim.restart().unwrap_err().is_fatal());

    sim.save_initial_state();
    let saved = sim.bodies().to_vec();
    verlet_integrator(&mut sim, 0.5);
    sim.restart().unwrap();

    assert_eq!(sim.bodies(), saved.as_slice());
    assert_relative_eq!(sim.time(), 0.0);
}

#[test]
fn time_step_must_be_positive() {
    assert!(Advance::new(0.0).is_err());
    assert!(Advance::new(f64::NAN).is_err());
}

#[test]
fn clock_tick_leaves_real_time_alone() {
    let mut clock = Clock::new();
    clock.set_real_time(0.5);
    clock.tick(0.025);
    clock.tick(0.025);

    assert_relative_eq!(clock.time(), 0.05);
    assert_relative_eq!(clock.real_time(), 0.5);
}
