//! Fixed-step time integrator for the N-body system
//!
//! Semi-implicit Euler driven by an `AccelSet` against a snapshot of the
//! bodies taken at the start of the step, followed by the wall boundary policy

use log::{trace, warn};

use super::forces::AccelSet;
use super::params::World;
use super::states::{Body, NVec2, System};

/// Advance the system by `dt` seconds, updating bodies in place.
///
/// Every step:
/// 1. snapshot all bodies; the force field of this step comes from the snapshot
///    (for Barnes–Hut, the tree is rebuilt from it),
/// 2. drift each free body: x_n+1 = x_n + dt v_n, and flip the velocity
///    component of any axis it left the world on,
/// 3. evaluate accelerations at the new positions x_n+1,
/// 4. kick: v_n+1 = v_n + dt a(x_n+1),
/// 5. clamp positions that left the world back inside, one radius from the wall.
///
/// Fixed bodies never move, but they are part of the snapshot and keep pulling
/// on everything else. A negative or non-finite `dt` skips the step.
pub fn semi_implicit_euler(sys: &mut System, forces: &AccelSet, world: &World, dt: f64) {
    if !(dt.is_finite() && dt >= 0.0) {
        warn!("skipping step with invalid dt = {dt}");
        return;
    }

    let n = sys.bodies.len();
    if n == 0 { // no bodies, only time advances
        sys.t += dt;
        return;
    }

    let snapshot = sys.bodies.clone();

    // Drift
    for b in sys.bodies.iter_mut().filter(|b| !b.fixed) {
        b.x += dt * b.v;
        reflect_velocity(b, world);
    }

    let mut accels = vec![NVec2::zeros(); n];
    forces.accumulate_accels(&snapshot, &sys.bodies, &mut accels);

    // Kick
    for (i, (b, a)) in sys.bodies.iter_mut().zip(accels).enumerate() {
        if b.fixed {
            continue;
        }
        b.a = a;
        b.v += dt * a;
        clamp_to_world(b, world);
        trace!("body {i}: x = ({:.4}, {:.4}), v = ({:.4}, {:.4})", b.x.x, b.x.y, b.v.x, b.v.y);
    }

    sys.t += dt;
}

/// Elastic wall bounce: negate the velocity on each axis the body is outside of
fn reflect_velocity(b: &mut Body, world: &World) {
    if b.x.x < 0.0 || b.x.x > world.width {
        b.v.x = -b.v.x;
    }
    if b.x.y < 0.0 || b.x.y > world.height {
        b.v.y = -b.v.y;
    }
}

/// Put a body that left the world back inside, offset by its radius from the wall
fn clamp_to_world(b: &mut Body, world: &World) {
    if b.x.x < 0.0 {
        b.x.x = b.radius;
    } else if b.x.x > world.width {
        b.x.x = world.width - b.radius;
    }

    if b.x.y < 0.0 {
        b.x.y = b.radius;
    } else if b.x.y > world.height {
        b.x.y = world.height - b.radius;
    }
}
