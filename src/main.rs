use ctsim::{ContactApp, ScenarioConfig, ScriptParser};
use ctsim::{bench_rebuild, bench_step};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Parser, Debug)]
struct Args {
    /// Scenario file under `scenarios/`
    #[arg(short, default_value = "contact.yaml")]
    file_name: String,

    /// Console command, e.g. `-c "thrust=2"`; may be repeated
    #[arg(short = 'c', long = "command")]
    commands: Vec<String>,

    /// Integrator steps to run after the commands
    #[arg(short = 'n', default_value_t = 400)]
    steps: usize,

    /// Run the benchmarks instead of the scenario
    #[arg(long)]
    bench: bool,
}

// load here to keep main clean
fn load_scenario_from_yaml(file_name: &str) -> Result<ScenarioConfig> {
    let config_path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(file_name);
    let file = File::open(&config_path)
        .with_context(|| format!("cannot open {}", config_path.display()))?;
    let reader = BufReader::new(file);
    let scenario_cfg: ScenarioConfig = serde_yaml::from_reader(reader)?;
    Ok(scenario_cfg)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.bench {
        bench_rebuild();
        bench_step();
        return Ok(());
    }

    let scenario_cfg = load_scenario_from_yaml(&args.file_name)?;
    let mut app = ContactApp::new(&scenario_cfg)?;
    let mut parser = ScriptParser::watch(&mut app);

    for command in &args.commands {
        if let Some(value) = parser.execute(&mut app, command)? {
            println!("{} => {}", command.trim(), value);
        }
    }
    let script = parser.script(&app);
    if !script.is_empty() {
        info!("changed parameters: {}", script);
    }

    app.run(args.steps)?;

    let sim = &app.scenario().sim;
    for b in sim.bodies() {
        println!(
            "{:10} x = ({:8.4}, {:8.4}) angle = {:8.4} v = ({:8.4}, {:8.4}) omega = {:8.4}",
            b.name, b.x.x, b.x.y, b.angle, b.v.x, b.v.y, b.omega
        );
        let outline: Vec<String> = b
            .world_vertices()
            .iter()
            .map(|p| format!("({:.3}, {:.3})", p.x, p.y))
            .collect();
        println!("{:10} vertices {}", "", outline.join(" "));
    }
    let energy = sim.energy();
    println!(
        "t = {:.3}, kinetic = {:.5}, potential = {:.5}, total = {:.5}",
        sim.time(),
        energy.kinetic,
        energy.potential,
        energy.total()
    );

    Ok(())
}
