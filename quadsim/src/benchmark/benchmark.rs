use std::time::Instant;

use log::info;

use crate::simulation::engine::{DEFAULT_MAX_DEPTH, DEFAULT_THETA};
use crate::simulation::forces::{AccelSet, Acceleration, BarnesHutGravity, DirectGravity};
use crate::simulation::integrator::semi_implicit_euler;
use crate::simulation::params::{World, DEFAULT_G};
use crate::simulation::states::{Body, BodyError, NVec2, System};

/// Time one acceleration evaluation, direct vs Barnes–Hut, for growing N
pub fn bench_gravity() -> Result<(), BodyError> {
    // Different system sizes to test
    let ns = [200, 400, 800, 1600, 3200, 6400];
    let world = World::default();

    for n in ns {
        let sys = make_system(n, &world)?;
        let mut out = vec![NVec2::zeros(); n];

        let direct = DirectGravity { g: DEFAULT_G };
        let bh = barnes_hut(&world);

        // Warm up
        direct.acceleration(&sys.bodies, &sys.bodies, &mut out);
        bh.acceleration(&sys.bodies, &sys.bodies, &mut out);

        let t0 = Instant::now();
        direct.acceleration(&sys.bodies, &sys.bodies, &mut out);
        let dt_direct = t0.elapsed().as_secs_f64();

        let t1 = Instant::now();
        bh.acceleration(&sys.bodies, &sys.bodies, &mut out);
        let dt_bh = t1.elapsed().as_secs_f64();

        info!("N = {n:5}, direct = {dt_direct:8.6} s, BH = {dt_bh:8.6} s");
    }

    Ok(())
}

/// Time full integrator steps, direct vs Barnes–Hut, for growing N
pub fn bench_steps() -> Result<(), BodyError> {
    let ns = [200, 400, 800, 1600, 3200, 6400];
    let steps = 2; // integrator steps per model
    let dt = 0.001;
    let world = World::default();

    for n in ns {
        let template = make_system(n, &world)?;

        let mut sys_direct = template.clone();
        let forces_direct = AccelSet::new().with(DirectGravity { g: DEFAULT_G });

        let t0 = Instant::now();
        for _ in 0..steps {
            semi_implicit_euler(&mut sys_direct, &forces_direct, &world, dt);
        }
        let direct_per_step = t0.elapsed().as_secs_f64() / steps as f64;

        let mut sys_bh = template.clone();
        let forces_bh = AccelSet::new().with(barnes_hut(&world));

        let t1 = Instant::now();
        for _ in 0..steps {
            semi_implicit_euler(&mut sys_bh, &forces_bh, &world, dt);
        }
        let bh_per_step = t1.elapsed().as_secs_f64() / steps as f64;

        info!("N = {n:5}, direct step = {direct_per_step:8.6} s,   BH step = {bh_per_step:8.6} s");
    }

    Ok(())
}

fn barnes_hut(world: &World) -> BarnesHutGravity {
    BarnesHutGravity {
        g: DEFAULT_G,
        theta: DEFAULT_THETA,
        world: *world,
        max_depth: DEFAULT_MAX_DEPTH,
    }
}

/// Helper to build a deterministic System of size `n` spread over the world
fn make_system(n: usize, world: &World) -> Result<System, BodyError> {
    let center = world.center();
    let spread = 0.4 * world.width.min(world.height);

    let bodies = (0..n)
        .map(|i| {
            let i_f = i as f64;
            // deterministic positions, no rand needed
            let x = center + NVec2::new((i_f * 0.37).sin() * spread, (i_f * 0.13).cos() * spread);
            Body::new(1.0, 0.5, false, x, NVec2::zeros())
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(System::new(bodies))
}
