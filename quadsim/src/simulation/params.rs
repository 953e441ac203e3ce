//! Numerical and physical parameters for the simulation
//!
//! `Parameters` holds runtime settings:
//! - integration step size and end time,
//! - gravitational constant `g`,
//! - the fixed world rectangle the quadtree root covers

use super::states::NVec2;

/// Gravitational constant used when a scenario does not set one
pub const DEFAULT_G: f64 = 10.0;

/// Width and height of the default world, in abstract length units
pub const DEFAULT_WORLD_SIZE: f64 = 600.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct World {
    pub width: f64,
    pub height: f64,
}

impl World {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> NVec2 {
        NVec2::new(self.width * 0.5, self.height * 0.5)
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(DEFAULT_WORLD_SIZE, DEFAULT_WORLD_SIZE)
    }
}

#[derive(Debug, Clone)]
pub struct Parameters {
    pub t_end: f64, // time end
    pub h0: f64, // step size
    pub g: f64, // gravitational constant
    pub world: World, // boundary walls, top-left corner at the origin
}

impl Parameters {
    /// Number of fixed steps of `h0` needed to reach `t_end`
    pub fn step_count(&self) -> usize {
        if self.h0 <= 0.0 || self.t_end <= 0.0 {
            return 0;
        }
        (self.t_end / self.h0).ceil() as usize
    }
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            t_end: 10.0,
            h0: 0.01,
            g: DEFAULT_G,
            world: World::default(),
        }
    }
}
