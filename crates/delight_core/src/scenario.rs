//! Headless run of the gameplay rules against [`MemoryHost`].

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::config::GameplayConfig;
use crate::enemy::DamageOutcome;
use crate::error::Result;
use crate::host::{MemoryHost, Prefab};
use crate::pickup::{GameItem, PickupEffect, PickupOutcome, PickupTarget, Tag};
use crate::simulation::{SimulationParams, SimulationRng};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScenarioReport {
    pub seed: u64,
    pub items: ItemSummary,
    pub enemy: EnemySummary,
    pub player: PlayerSummary,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ItemSummary {
    pub requested: usize,
    pub spawned: usize,
    pub placements_accepted: usize,
    pub placements_rejected: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EnemySummary {
    pub hits_landed: usize,
    pub dead: bool,
    pub death_notifications: usize,
    pub final_health: f32,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PlayerSummary {
    pub health: f32,
    pub max_health: f32,
    pub speed: f32,
}

pub fn run_scenario(
    config: &GameplayConfig,
    params: &SimulationParams,
    damage_hits: &[f32],
    placements: usize,
) -> Result<ScenarioReport> {
    let mut host = MemoryHost::new();
    let mut rng = SimulationRng::new(params.seed);
    let spawner = config.spawner(Prefab::new("Item"));
    let anchor = host.create_empty("Spawner");

    let requested = config.spawner.initial_count;
    let spawned = spawner.spawn_items(&mut host, anchor, requested)?.len();

    // Sample over an area twice the bounds so some requests land outside.
    let bounds = spawner.bounds;
    let reach = bounds.max() - bounds.min();
    let (lo, hi) = (bounds.center() - reach, bounds.center() + reach);
    let mut placements_accepted = 0;
    for _ in 0..placements {
        if spawner.spawn_item(&mut host, rng.gen_point(lo, hi))?.is_some() {
            placements_accepted += 1;
        }
    }

    let mut enemy = config.enemy();
    let deaths = Arc::new(AtomicUsize::new(0));
    let counter = deaths.clone();
    enemy.on_death(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    let mut hits_landed = 0;
    for amount in damage_hits {
        match enemy.apply_damage(*amount) {
            DamageOutcome::AlreadyDead => break,
            _ => hits_landed += 1,
        }
    }

    let mut health = config.player_health();
    let mut movement = config.player_movement();
    let player = Tag::player();
    for effect in [
        PickupEffect::Health(config.health_boost()),
        PickupEffect::Speed(config.speed_boost()),
    ] {
        let mut item = GameItem::new(effect);
        let outcome = item.on_trigger_enter(
            Some(&player),
            PickupTarget {
                health: Some(&mut health),
                movement: Some(&mut movement),
            },
        );
        debug_assert_eq!(PickupOutcome::Consumed, outcome);
    }

    let report = ScenarioReport {
        seed: params.seed,
        items: ItemSummary {
            requested,
            spawned,
            placements_accepted,
            placements_rejected: placements - placements_accepted,
        },
        enemy: EnemySummary {
            hits_landed,
            dead: enemy.is_dead(),
            death_notifications: deaths.load(Ordering::SeqCst),
            final_health: enemy.health(),
        },
        player: PlayerSummary {
            health: health.current_health,
            max_health: health.max_health,
            speed: movement.current_speed,
        },
    };
    info!(
        target: "delight_core.scenario",
        seed = report.seed,
        spawned = report.items.spawned,
        accepted = report.items.placements_accepted,
        rejected = report.items.placements_rejected,
        enemy_dead = report.enemy.dead,
        "scenario finished"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_kill_standard_enemy_and_boost_player() {
        let config = GameplayConfig::default();
        let report =
            run_scenario(&config, &SimulationParams::from_seed(3), &[1.0, 1.0, 1.0, 5.0], 0)
                .unwrap();
        assert_eq!(3, report.enemy.hits_landed);
        assert!(report.enemy.dead);
        assert_eq!(1, report.enemy.death_notifications);
        assert_eq!(70.0, report.player.health);
        assert_eq!(8.0, report.player.speed);
    }

    #[test]
    fn placements_split_into_accepted_and_rejected() {
        let mut config = GameplayConfig::default();
        config.spawner.initial_count = 12;
        let report = run_scenario(&config, &SimulationParams::from_seed(11), &[], 200).unwrap();
        assert_eq!(12, report.items.spawned);
        assert_eq!(
            200,
            report.items.placements_accepted + report.items.placements_rejected
        );
        assert!(report.items.placements_accepted > 0);
        assert!(report.items.placements_rejected > 0);
    }

    #[test]
    fn limit_applies_to_initial_batch() {
        let mut config = GameplayConfig::default();
        config.spawner.initial_count = 1001;
        config.spawner.limit_enabled = true;
        config.spawner.max_items = 1000;
        let report = run_scenario(&config, &SimulationParams::default(), &[], 0).unwrap();
        assert_eq!(1001, report.items.requested);
        assert_eq!(1000, report.items.spawned);
    }
}
