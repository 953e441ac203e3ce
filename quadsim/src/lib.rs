pub mod simulation;
pub mod configuration;
pub mod benchmark;

pub use simulation::states::{Body, BodyError, System, NVec2};
pub use simulation::params::{Parameters, World};
pub use simulation::engine::Engine;
pub use simulation::barnes_hut::{QuadTree, QuadNode, NodeKind, NodeId, Rect, BodyHandle};
pub use simulation::forces::{pairwise_acceleration, Acceleration, AccelSet, DirectGravity, BarnesHutGravity};
pub use simulation::integrator::semi_implicit_euler;
pub use simulation::scenario::{Scenario, ScenarioError};

pub use configuration::config::{EngineConfig, ParametersConfig, WorldConfig, BodyConfig, ScenarioConfig};

pub use benchmark::benchmark::{bench_gravity, bench_steps};
