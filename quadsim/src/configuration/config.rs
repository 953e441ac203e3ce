//! Configuration types for loading simulation scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! simulation scenario. A scenario consists of:
//!
//! - [`EngineConfig`]     – force evaluation options (Barnes–Hut or direct, threshold, depth cap)
//! - [`ParametersConfig`] – step size, end time and gravitational constant
//! - [`WorldConfig`]      – size of the world rectangle (optional)
//! - [`BodyConfig`]       – initial state for each body
//! - [`ScenarioConfig`]   – top-level wrapper used to load a scenario from YAML
//!
//! # YAML format
//! An example scenario matching these types:
//!
//! ```yaml
//! engine:
//!   barnes_hut: true        # false -> direct N^2 summation
//!   theta: 0.5              # optional, opening-angle threshold
//!   max_depth: 32           # optional, quadtree depth cap
//!
//! parameters:
//!   t_end: 10.0             # total simulation time
//!   h0: 0.01                # fixed step size
//!   G: 10.0                 # optional, gravitational constant
//!
//! world:                    # optional, defaults to 600 x 600
//!   width: 600.0
//!   height: 600.0
//!
//! bodies:
//!   - x: [ 300.0, 300.0 ]
//!     v: [   0.0,   0.0 ]
//!     m: 1000.0
//!     radius: 10.0
//!     fixed: true           # optional, defaults to false
//!   - x: [ 400.0, 300.0 ]
//!     v: [   0.0,  10.0 ]
//!     m: 1.0
//!     radius: 2.0
//! ```
//!
//! The engine then maps this configuration into its validated runtime
//! representation, see [`crate::simulation::scenario::Scenario`].

use serde::Deserialize;

/// Force evaluation configuration
#[derive(Deserialize, Debug, Clone)]
pub struct EngineConfig {
    #[serde(default = "default_barnes_hut")]
    pub barnes_hut: bool, // `true` - approximate with the quadtree, `false` - direct N^2 summation
    pub theta: Option<f64>, // node width / distance below which a node's COM is used instead of descending
    pub max_depth: Option<u32>, // deepest quadtree level before coincident bodies are merged
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            barnes_hut: default_barnes_hut(),
            theta: None,
            max_depth: None,
        }
    }
}

fn default_barnes_hut() -> bool {
    true
}

/// Global numerical and physical parameters for a scenario
#[derive(Deserialize, Debug, Clone)]
pub struct ParametersConfig {
    pub t_end: f64, // time end
    pub h0: f64,    // time step size
    #[serde(rename = "G")]
    pub g: Option<f64>, // gravitational constant
}

/// Size of the world rectangle, top-left corner at the origin
#[derive(Deserialize, Debug, Clone)]
pub struct WorldConfig {
    pub width: f64,
    pub height: f64,
}

/// Configuration for a single body's initial state
#[derive(Deserialize, Debug, Clone)]
pub struct BodyConfig {
    pub x: Vec<f64>, // Initial position, two components
    #[serde(default)]
    pub v: Vec<f64>, // Initial velocity, two components; empty means at rest
    pub m: f64,      // Mass of the body
    #[serde(default)]
    pub radius: f64, // Collision distance floor
    #[serde(default)]
    pub fixed: bool, // Pinned in place for the whole run
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub engine: EngineConfig, // Force evaluation options
    pub parameters: ParametersConfig, // Global numerical and physical parameters
    pub world: Option<WorldConfig>, // World rectangle
    pub bodies: Vec<BodyConfig>, // List of bodies that define the initial state of the system
}
