//! Enemy health and the death notification.
//!
//! One component type covers both enemy flavours. [`DifficultyMode`] picks the
//! damage policy: `Easy` enemies die on the first hit and cannot be healed
//! above 1, `Standard` enemies accumulate damage until health reaches zero.

use std::fmt;

use bevy::prelude::*;
use tracing::debug;

pub const DEFAULT_ENEMY_HEALTH: f32 = 3.0;
pub const DEFAULT_ENEMY_SPEED: f32 = 3.0;
const EASY_MODE_HEALTH: f32 = 1.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyMode {
    /// Any damage kills; `set_health` pins health to 1.
    Easy,
    /// Damage is subtracted and death happens at or below zero.
    #[default]
    Standard,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LifeState {
    Alive,
    Dead,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DamageOutcome {
    Survived { remaining: f32 },
    Died,
    AlreadyDead,
}

type DeathListener = Box<dyn FnMut() + Send + Sync>;

/// Multicast death notification. Listeners run synchronously in the order
/// they subscribed.
#[derive(Default)]
struct DeathSignal {
    listeners: Vec<DeathListener>,
}

impl DeathSignal {
    fn subscribe(&mut self, listener: impl FnMut() + Send + Sync + 'static) {
        self.listeners.push(Box::new(listener));
    }

    fn len(&self) -> usize {
        self.listeners.len()
    }

    fn fire(&mut self) {
        for listener in self.listeners.iter_mut() {
            listener();
        }
    }
}

impl fmt::Debug for DeathSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeathSignal")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[derive(Component, Debug)]
pub struct EnemyHealth {
    health: f32,
    speed: f32,
    mode: DifficultyMode,
    life: LifeState,
    on_death: DeathSignal,
}

impl EnemyHealth {
    pub fn new(mode: DifficultyMode) -> Self {
        Self::with_stats(mode, DEFAULT_ENEMY_HEALTH, DEFAULT_ENEMY_SPEED)
    }

    pub fn with_stats(mode: DifficultyMode, health: f32, speed: f32) -> Self {
        Self {
            health,
            speed,
            mode,
            life: LifeState::Alive,
            on_death: DeathSignal::default(),
        }
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn mode(&self) -> DifficultyMode {
        self.mode
    }

    pub fn is_dead(&self) -> bool {
        self.life == LifeState::Dead
    }

    pub fn on_death(&mut self, listener: impl FnMut() + Send + Sync + 'static) {
        self.on_death.subscribe(listener);
    }

    pub fn set_health(&mut self, value: f32) {
        match self.mode {
            DifficultyMode::Easy => {
                debug!(target: "delight_core.enemy", requested = value, "set_health: easy mode pins health");
                self.health = EASY_MODE_HEALTH;
            }
            DifficultyMode::Standard => {
                debug!(target: "delight_core.enemy", value, "set_health: assigned verbatim");
                self.health = value;
            }
        }
    }

    pub fn apply_damage(&mut self, amount: f32) -> DamageOutcome {
        if self.is_dead() {
            return DamageOutcome::AlreadyDead;
        }

        match self.mode {
            DifficultyMode::Easy => {
                debug!(target: "delight_core.enemy", amount, "apply_damage: easy mode kills outright");
                self.die();
                DamageOutcome::Died
            }
            DifficultyMode::Standard => {
                self.health -= amount;
                debug!(
                    target: "delight_core.enemy",
                    amount,
                    health = self.health,
                    "apply_damage: accumulated"
                );
                if self.health <= 0.0 {
                    self.die();
                    DamageOutcome::Died
                } else {
                    DamageOutcome::Survived {
                        remaining: self.health,
                    }
                }
            }
        }
    }

    fn die(&mut self) {
        self.life = LifeState::Dead;
        debug!(
            target: "delight_core.enemy",
            listeners = self.on_death.len(),
            "enemy died"
        );
        self.on_death.fire();
    }
}

impl Default for EnemyHealth {
    fn default() -> Self {
        Self::new(DifficultyMode::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    fn death_counter(enemy: &mut EnemyHealth) -> Arc<AtomicUsize> {
        let counter = Arc::new(AtomicUsize::new(0));
        let handle = counter.clone();
        enemy.on_death(move || {
            handle.fetch_add(1, Ordering::SeqCst);
        });
        counter
    }

    #[test]
    fn easy_mode_pins_health_to_one() {
        let mut enemy = EnemyHealth::new(DifficultyMode::Easy);
        for value in [-50.0, 0.0, 0.5, 3.0, 1_000.0] {
            enemy.set_health(value);
            assert_eq!(1.0, enemy.health());
        }
    }

    #[test]
    fn easy_mode_dies_on_any_damage() {
        let mut enemy = EnemyHealth::new(DifficultyMode::Easy);
        let deaths = death_counter(&mut enemy);
        assert_eq!(DamageOutcome::Died, enemy.apply_damage(0.0));
        assert_eq!(DEFAULT_ENEMY_HEALTH, enemy.health());
        assert_eq!(1, deaths.load(Ordering::SeqCst));
    }

    #[test]
    fn standard_mode_assigns_health_verbatim() {
        let mut enemy = EnemyHealth::new(DifficultyMode::Standard);
        enemy.set_health(-2.5);
        assert_eq!(-2.5, enemy.health());
        enemy.set_health(42.0);
        assert_eq!(42.0, enemy.health());
    }

    #[test]
    fn lethal_damage_fires_death_once() {
        for (health, damage) in [(3.0, 3.0), (3.0, 10.0), (0.5, 0.5), (10.0, 25.0)] {
            let mut enemy = EnemyHealth::with_stats(DifficultyMode::Standard, health, 1.0);
            let deaths = death_counter(&mut enemy);
            assert_eq!(DamageOutcome::Died, enemy.apply_damage(damage));
            assert!(enemy.is_dead());
            assert_eq!(DamageOutcome::AlreadyDead, enemy.apply_damage(damage));
            assert_eq!(1, deaths.load(Ordering::SeqCst));
        }
    }

    #[test]
    fn non_lethal_damage_subtracts_exactly() {
        let mut enemy = EnemyHealth::with_stats(DifficultyMode::Standard, 10.0, 1.0);
        let deaths = death_counter(&mut enemy);
        assert_eq!(
            DamageOutcome::Survived { remaining: 7.5 },
            enemy.apply_damage(2.5)
        );
        assert_eq!(7.5, enemy.health());
        assert!(!enemy.is_dead());
        assert_eq!(0, deaths.load(Ordering::SeqCst));
    }

    #[test]
    fn negative_damage_heals_in_standard_mode() {
        let mut enemy = EnemyHealth::new(DifficultyMode::Standard);
        enemy.apply_damage(-2.0);
        assert_eq!(5.0, enemy.health());
    }

    #[test]
    fn listeners_run_in_subscription_order() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let mut enemy = EnemyHealth::new(DifficultyMode::Easy);
        for id in 0..3 {
            let order = order.clone();
            enemy.on_death(move || order.lock().unwrap().push(id));
        }
        enemy.apply_damage(1.0);
        assert_eq!(vec![0, 1, 2], *order.lock().unwrap());
    }
}
