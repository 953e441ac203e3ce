//! Force / acceleration contributors for the n-body engine
//!
//! Defines the pairwise force law shared by every solver, the acceleration
//! trait, direct Newtonian gravity and its Barnes–Hut variant

use crate::simulation::barnes_hut::QuadTree;
use crate::simulation::params::World;
use crate::simulation::states::{Body, NVec2};

/// Acceleration of `target` induced by a mass `source_mass` at `source_pos`.
///
/// When the two bodies touch or overlap (`d <= r_target + r_source`) the
/// distance is clamped to the sum of radii and the direction flips, so
/// contact pushes the bodies apart instead of producing a singular pull.
/// If the clamped distance is still zero (two radius-0 bodies on the same
/// point) the direction is undefined and no acceleration is produced.
pub fn pairwise_acceleration(
    target: &Body,
    source_pos: NVec2,
    source_mass: f64,
    source_radius: f64,
    g: f64,
) -> NVec2 {
    let delta = source_pos - target.x;
    let angle = delta.y.atan2(delta.x);
    let contact = target.radius + source_radius;

    let mut dist = delta.norm();
    let mut sign = 1.0;
    if dist <= contact {
        dist = contact;
        sign = -1.0;
    }
    if dist == 0.0 {
        return NVec2::zeros();
    }

    let magnitude = sign * g * source_mass / (dist * dist);
    NVec2::new(magnitude * angle.cos(), magnitude * angle.sin())
}

/// Collection of acceleration terms (gravity, drag, etc.)
/// Each term implements [`Acceleration`] and their contributions are summed
/// into a single acceleration vector per body
pub struct AccelSet {
    terms: Vec<Box<dyn Acceleration + Send + Sync>>,
}

impl AccelSet {
    /// Create an empty acceleration set
    pub fn new() -> Self {
        Self {
            terms: Vec::new()
        }
    }

    /// Add an acceleration term
    pub fn with<T>(mut self, term: T) -> Self
    where
        T: Acceleration + Send + Sync + 'static,
    {
        self.terms.push(Box::new(term));
        self
    }

    /// Compute total accelerations on `targets` from the bodies in `sources`
    /// - `sources[i]` and `targets[i]` are the same body, possibly at different times
    /// - `out[i]` will be set to the sum of contributions from all terms
    pub fn accumulate_accels(&self, sources: &[Body], targets: &[Body], out: &mut [NVec2]) {
        // Zero buffer
        for a in out.iter_mut() {
            *a = NVec2::zeros();
        }
        for term in &self.terms {
            term.acceleration(sources, targets, out);
        }
    }
}

impl Default for AccelSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Trait for acceleration sources.
///
/// `sources` is the snapshot the field is computed from and `targets` the bodies
/// it is evaluated on, index for index. Body `i` never acts on itself.
/// Implementations add their contribution into `out[i]`.
pub trait Acceleration {
    fn acceleration(&self, sources: &[Body], targets: &[Body], out: &mut [NVec2]);
}

/// Direct all-pairs gravity, `O(N²)`
pub struct DirectGravity {
    pub g: f64, // gravitational constant
}

impl Acceleration for DirectGravity {
    fn acceleration(&self, sources: &[Body], targets: &[Body], out: &mut [NVec2]) {
        debug_assert_eq!(sources.len(), targets.len());

        for (i, (target, a)) in targets.iter().zip(out.iter_mut()).enumerate() {
            for (j, source) in sources.iter().enumerate() {
                if i == j {
                    continue;
                }
                *a += pairwise_acceleration(target, source.x, source.m, source.radius, self.g);
            }
        }
    }
}

/// Gravity evaluated through a Barnes–Hut quadtree built over `sources`
pub struct BarnesHutGravity {
    pub g: f64,
    pub theta: f64,
    pub world: World,
    pub max_depth: u32,
}

impl Acceleration for BarnesHutGravity {
    fn acceleration(&self, sources: &[Body], targets: &[Body], out: &mut [NVec2]) {
        debug_assert_eq!(sources.len(), targets.len());

        let tree = QuadTree::build(sources, &self.world, self.max_depth);
        for (i, (target, a)) in targets.iter().zip(out.iter_mut()).enumerate() {
            *a += tree.acceleration_on(i, target, self.g, self.theta);
        }
    }
}
