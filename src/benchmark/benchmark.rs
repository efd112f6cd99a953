use std::time::Instant;

use crate::configuration::config::ScenarioConfig;
use crate::simulation::app::ContactApp;

/// Time a full rebuild for every supported body count
pub fn bench_rebuild() {
    let reps = 1000;

    for n in 0..=6 {
        let cfg = ScenarioConfig {
            num_bods: n,
            seed: Some(42), // same geometry on every rebuild
            ..ScenarioConfig::default()
        };
        let mut app = match ContactApp::new(&cfg) {
            Ok(app) => app,
            Err(e) => {
                println!("n = {n}: cannot build scenario: {e}");
                continue;
            }
        };

        // Warm up
        if let Err(e) = app.rebuild() {
            println!("n = {n}: rebuild failed: {e}");
            continue;
        }

        let t0 = Instant::now();
        for _ in 0..reps {
            if let Err(e) = app.rebuild() {
                println!("n = {n}: rebuild failed: {e}");
                break;
            }
        }
        let dt = t0.elapsed().as_secs_f64() / reps as f64;

        println!("N = {n}, rebuild = {:10.3} us", dt * 1e6);
    }
}

/// Time integrator steps on the full scenario with every thruster firing
pub fn bench_step() {
    let steps = [1_000, 10_000, 100_000];

    for n in steps {
        let cfg = ScenarioConfig {
            seed: Some(42),
            ..ScenarioConfig::default()
        };
        let mut app = match ContactApp::new(&cfg) {
            Ok(app) => app,
            Err(e) => {
                println!("cannot build scenario: {e}");
                return;
            }
        };
        for set in app.scenario().thruster_sets() {
            let mut set = set.borrow_mut();
            for i in 0..set.thrusters().len() {
                if let Err(e) = set.set_active(i, true) {
                    println!("cannot fire thruster {i}: {e}");
                }
            }
        }

        let e0 = app.scenario().sim.energy().total();
        let t0 = Instant::now();
        for _ in 0..n {
            app.scenario_mut().step();
        }
        let dt = t0.elapsed().as_secs_f64();
        let e1 = app.scenario().sim.energy().total();

        println!("steps = {n:7}, time = {:8.6} s, energy {:.4} -> {:.4}", dt, e0, e1);
    }
}
