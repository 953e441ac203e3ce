//! Core state types for the 2D N-body simulation.
//!
//! - `Body`   a point mass with position, velocity and the last computed acceleration
//! - `System` the body collection plus the current simulation time `t`
//!
//! Bodies are only created through [`Body::new`], which rejects invalid mass
//! and radius values. After that the integrator is the only thing that mutates them.

use nalgebra::Vector2;
use thiserror::Error;

pub type NVec2 = Vector2<f64>;

/// Rejected input when constructing a [`Body`]
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BodyError {
    #[error("mass must be positive and finite, got {0}")]
    InvalidMass(f64),

    #[error("radius must be non-negative and finite, got {0}")]
    InvalidRadius(f64),

    #[error("{field} must be finite, got ({x}, {y})")]
    NonFiniteVector { field: &'static str, x: f64, y: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub(crate) x: NVec2, // position
    pub(crate) v: NVec2, // velocity
    pub(crate) a: NVec2, // acceleration from the last step
    pub(crate) m: f64, // mass
    pub(crate) radius: f64, // collision distance floor, not geometry
    pub(crate) fixed: bool, // never moves when true
}

impl Body {
    /// Build a body, failing fast on non-positive mass or negative radius.
    ///
    /// Non-finite positions and velocities are rejected too.
    pub fn new(m: f64, radius: f64, fixed: bool, x: NVec2, v: NVec2) -> Result<Self, BodyError> {
        if !(m.is_finite() && m > 0.0) {
            return Err(BodyError::InvalidMass(m));
        }
        if !(radius.is_finite() && radius >= 0.0) {
            return Err(BodyError::InvalidRadius(radius));
        }
        check_finite("position", &x)?;
        check_finite("velocity", &v)?;

        Ok(Self {
            x,
            v,
            a: NVec2::zeros(),
            m,
            radius,
            fixed,
        })
    }

    pub fn position(&self) -> NVec2 {
        self.x
    }

    pub fn velocity(&self) -> NVec2 {
        self.v
    }

    /// Acceleration applied during the most recent step (zero before the first one)
    pub fn acceleration(&self) -> NVec2 {
        self.a
    }

    pub fn mass(&self) -> f64 {
        self.m
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn is_fixed(&self) -> bool {
        self.fixed
    }

    pub fn momentum(&self) -> NVec2 {
        self.v * self.m
    }

    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.m * self.v.norm_squared()
    }
}

fn check_finite(field: &'static str, v: &NVec2) -> Result<(), BodyError> {
    if v.x.is_finite() && v.y.is_finite() {
        Ok(())
    } else {
        Err(BodyError::NonFiniteVector { field, x: v.x, y: v.y })
    }
}

#[derive(Debug, Clone, Default)]
pub struct System {
    pub bodies: Vec<Body>, // fixed for the whole session
    pub t: f64, // time
}

impl System {
    pub fn new(bodies: Vec<Body>) -> Self {
        Self { bodies, t: 0.0 }
    }

    pub fn total_mass(&self) -> f64 {
        self.bodies.iter().map(|b| b.m).sum()
    }

    /// Mass-weighted mean position, `None` for an empty system
    pub fn center_of_mass(&self) -> Option<NVec2> {
        let mass = self.total_mass();
        if mass <= 0.0 {
            return None;
        }
        let weighted = self
            .bodies
            .iter()
            .fold(NVec2::zeros(), |acc, b| acc + b.x * b.m);
        Some(weighted / mass)
    }

    pub fn momentum(&self) -> NVec2 {
        self.bodies
            .iter()
            .fold(NVec2::zeros(), |acc, b| acc + b.momentum())
    }

    pub fn kinetic_energy(&self) -> f64 {
        self.bodies.iter().map(Body::kinetic_energy).sum()
    }
}
