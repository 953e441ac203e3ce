//! Build fully-initialized simulation scenarios from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces the runtime bundle
//! `Scenario` containing:
//! - engine settings (`Engine`)
//! - numerical parameters (`Parameters`)
//! - system state (`System` with bodies at t = 0)
//! - active force set (`AccelSet`)
//!
//! Everything is validated here; a `Scenario` that was built can always be stepped.

use log::debug;
use thiserror::Error;

use crate::configuration::config::{BodyConfig, ScenarioConfig};
use crate::simulation::engine::{Engine, DEFAULT_MAX_DEPTH, DEFAULT_THETA, MAX_DEPTH_LIMIT};
use crate::simulation::forces::{AccelSet, BarnesHutGravity, DirectGravity};
use crate::simulation::integrator::semi_implicit_euler;
use crate::simulation::params::{Parameters, World, DEFAULT_G};
use crate::simulation::states::{Body, BodyError, NVec2, System};

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("body {index}: {source}")]
    InvalidBody {
        index: usize,
        #[source]
        source: BodyError,
    },

    #[error("body {index}: `{field}` needs 2 components, got {len}")]
    BadVector {
        index: usize,
        field: &'static str,
        len: usize,
    },

    #[error("world size must be positive and finite, got {width} x {height}")]
    InvalidWorld { width: f64, height: f64 },

    #[error("opening-angle threshold must be non-negative and finite, got {0}")]
    InvalidTheta(f64),

    #[error("max_depth must be at most {limit}, got {got}")]
    InvalidMaxDepth { got: u32, limit: u32 },

    #[error("step size must be non-negative and finite, got {0}")]
    InvalidStep(f64),

    #[error("gravitational constant must be finite, got {0}")]
    InvalidG(f64),
}

/// A fully-initialized simulation: engine settings, parameters, current
/// system state and the set of active force laws (accelerations)
pub struct Scenario {
    pub engine: Engine,
    pub parameters: Parameters,
    pub system: System,
    pub forces: AccelSet,
}

impl Scenario {
    pub fn build_scenario(cfg: ScenarioConfig) -> Result<Self, ScenarioError> {
        // Bodies: map `BodyConfig` -> runtime `Body`
        let bodies = cfg
            .bodies
            .iter()
            .enumerate()
            .map(|(index, bc)| body_from_config(index, bc))
            .collect::<Result<Vec<Body>, ScenarioError>>()?;

        let world = match &cfg.world {
            Some(w) => World::new(w.width, w.height),
            None => World::default(),
        };
        if !(world.width.is_finite() && world.width > 0.0 && world.height.is_finite() && world.height > 0.0) {
            return Err(ScenarioError::InvalidWorld {
                width: world.width,
                height: world.height,
            });
        }

        // Parameters (runtime) from ParametersConfig
        let p_cfg = cfg.parameters;
        if !(p_cfg.h0.is_finite() && p_cfg.h0 >= 0.0) {
            return Err(ScenarioError::InvalidStep(p_cfg.h0));
        }
        let g = p_cfg.g.unwrap_or(DEFAULT_G);
        if !g.is_finite() {
            return Err(ScenarioError::InvalidG(g));
        }
        let parameters = Parameters {
            t_end: p_cfg.t_end,
            h0: p_cfg.h0,
            g,
            world,
        };

        // Engine (runtime) from EngineConfig
        let e_cfg = cfg.engine;
        let theta = e_cfg.theta.unwrap_or(DEFAULT_THETA);
        if !(theta.is_finite() && theta >= 0.0) {
            return Err(ScenarioError::InvalidTheta(theta));
        }
        let max_depth = e_cfg.max_depth.unwrap_or(DEFAULT_MAX_DEPTH);
        if max_depth > MAX_DEPTH_LIMIT {
            return Err(ScenarioError::InvalidMaxDepth {
                got: max_depth,
                limit: MAX_DEPTH_LIMIT,
            });
        }
        let engine = Engine {
            barnes_hut: e_cfg.barnes_hut,
            theta,
            max_depth,
        };

        let forces = forces_for(&engine, &parameters);

        debug!(
            "scenario: {} bodies, world {} x {}, barnes_hut = {}, theta = {}",
            bodies.len(),
            world.width,
            world.height,
            engine.barnes_hut,
            engine.theta
        );

        Ok(Self {
            engine,
            parameters,
            system: System::new(bodies),
            forces,
        })
    }

    /// Advance by one fixed step of `h0`
    pub fn step(&mut self) {
        let dt = self.parameters.h0;
        self.step_by(dt);
    }

    /// Advance by an arbitrary elapsed time, e.g. a frame delta
    pub fn step_by(&mut self, dt: f64) {
        semi_implicit_euler(&mut self.system, &self.forces, &self.parameters.world, dt);
    }

    /// Run `steps` fixed steps
    pub fn run(&mut self, steps: usize) {
        for _ in 0..steps {
            self.step();
        }
    }
}

/// Register the gravity term the engine asks for
pub fn forces_for(engine: &Engine, parameters: &Parameters) -> AccelSet {
    if engine.barnes_hut {
        AccelSet::new().with(BarnesHutGravity {
            g: parameters.g,
            theta: engine.theta,
            world: parameters.world,
            max_depth: engine.max_depth,
        })
    } else {
        AccelSet::new().with(DirectGravity { g: parameters.g })
    }
}

fn body_from_config(index: usize, bc: &BodyConfig) -> Result<Body, ScenarioError> {
    let x = vec2(index, "x", &bc.x)?;
    let v = if bc.v.is_empty() {
        NVec2::zeros()
    } else {
        vec2(index, "v", &bc.v)?
    };

    Body::new(bc.m, bc.radius, bc.fixed, x, v).map_err(|source| ScenarioError::InvalidBody { index, source })
}

fn vec2(index: usize, field: &'static str, values: &[f64]) -> Result<NVec2, ScenarioError> {
    match values {
        [x, y] => Ok(NVec2::new(*x, *y)),
        _ => Err(ScenarioError::BadVector {
            index,
            field,
            len: values.len(),
        }),
    }
}
