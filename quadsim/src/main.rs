use quadsim::{Scenario, ScenarioConfig};
use quadsim::{bench_gravity, bench_steps};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

/// Headless 2D Barnes–Hut n-body simulation
#[derive(Parser, Debug)]
struct Args {
    /// Scenario file; looked up in `scenarios/` when not found as given
    #[arg(short, long, default_value = "orbit.yaml")]
    file_name: String,

    /// Number of steps to run instead of `t_end / h0`
    #[arg(long)]
    steps: Option<usize>,

    /// Time direct vs Barnes–Hut gravity instead of running a scenario
    #[arg(long)]
    bench: bool,
}

fn scenario_path(file_name: &str) -> PathBuf {
    let given = PathBuf::from(file_name);
    if given.exists() {
        return given;
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(file_name)
}

// load here to keep main clean
fn load_scenario_from_yaml(file_name: &str) -> Result<ScenarioConfig> {
    let config_path = scenario_path(file_name);
    let file = File::open(&config_path)
        .with_context(|| format!("failed to open scenario {}", config_path.display()))?;
    let reader = BufReader::new(file);
    let scenario_cfg: ScenarioConfig = serde_yaml::from_reader(reader)
        .with_context(|| format!("failed to parse scenario {}", config_path.display()))?;

    Ok(scenario_cfg)
}

fn log_diagnostics(label: &str, scenario: &Scenario) {
    let sys = &scenario.system;
    let momentum = sys.momentum();
    info!(
        "{label}: t = {:.3}, bodies = {}, mass = {:.3}, momentum = ({:.4}, {:.4}), kinetic energy = {:.4}",
        sys.t,
        sys.bodies.len(),
        sys.total_mass(),
        momentum.x,
        momentum.y,
        sys.kinetic_energy()
    );
    if let Some(com) = sys.center_of_mass() {
        info!("{label}: center of mass = ({:.3}, {:.3})", com.x, com.y);
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    if args.bench {
        bench_gravity()?;
        bench_steps()?;
        return Ok(());
    }

    let scenario_cfg = load_scenario_from_yaml(&args.file_name)?;
    let mut scenario = Scenario::build_scenario(scenario_cfg).context("invalid scenario")?;

    let steps = args.steps.unwrap_or_else(|| scenario.parameters.step_count());
    info!(
        "running {} for {steps} steps of {} ({})",
        args.file_name,
        scenario.parameters.h0,
        if scenario.engine.barnes_hut { "barnes-hut" } else { "direct" }
    );

    log_diagnostics("start", &scenario);
    scenario.run(steps);
    log_diagnostics("end", &scenario);

    for (i, b) in scenario.system.bodies.iter().enumerate() {
        let x = b.position();
        info!("body {i}: x = ({:.3}, {:.3}), radius = {}", x.x, x.y, b.radius());
    }

    Ok(())
}
