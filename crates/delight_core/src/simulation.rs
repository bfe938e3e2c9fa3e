use std::ops::RangeInclusive;

use bevy::prelude::*;
use bevy::time::Fixed;
use rand::{rngs::StdRng, Rng, SeedableRng};

pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_FIXED_DELTA: f64 = 1.0 / 60.0;

#[derive(Resource, Clone, Debug)]
pub struct SimulationParams {
    pub seed: u64,
    pub fixed_delta: f64,
}

impl SimulationParams {
    pub fn from_env() -> Self {
        let seed = std::env::var("SIMULATION_SEED")
            .ok()
            .and_then(|val| val.parse().ok())
            .unwrap_or(DEFAULT_SEED);
        let fixed_delta = std::env::var("SIMULATION_FIXED_DT")
            .ok()
            .and_then(|val| val.parse().ok())
            .filter(|dt: &f64| *dt > 0.0)
            .unwrap_or(DEFAULT_FIXED_DELTA);
        Self { seed, fixed_delta }
    }

    pub fn from_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Default::default()
        }
    }
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            fixed_delta: DEFAULT_FIXED_DELTA,
        }
    }
}

/// Seeded RNG shared by everything that scatters items.
#[derive(Resource, Debug)]
pub struct SimulationRng {
    seed: u64,
    rng: StdRng,
}

impl SimulationRng {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn gen_f32(&mut self, range: RangeInclusive<f32>) -> f32 {
        self.rng.gen_range(range)
    }

    pub fn gen_point(&mut self, min: Vec2, max: Vec2) -> Vec2 {
        Vec2::new(self.gen_f32(min.x..=max.x), self.gen_f32(min.y..=max.y))
    }
}

impl FromWorld for SimulationRng {
    fn from_world(world: &mut World) -> Self {
        let seed = world
            .get_resource::<SimulationParams>()
            .cloned()
            .unwrap_or_default()
            .seed;
        Self::new(seed)
    }
}

pub(crate) fn configure_fixed_time(
    fixed_time: Option<ResMut<Time<Fixed>>>,
    params: Res<SimulationParams>,
) {
    if let Some(mut fixed_time) = fixed_time {
        fixed_time.set_timestep_seconds(params.fixed_delta);
    }
}
