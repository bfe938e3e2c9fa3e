//! Single-use pickups and the stat boosts they carry.
//!
//! Boosts are deliberately unclamped: a health boost can push
//! `current_health` past `max_health`.

use std::fmt;
use std::sync::Arc;

use bevy::prelude::*;
use tracing::debug;

pub const PLAYER_TAG: &str = "Player";
pub const DEFAULT_HEALTH_BOOST: f32 = 20.0;
pub const DEFAULT_SPEED_BOOST: f32 = 3.0;

/// Tag compared against when a trigger fires.
#[derive(Component, Clone, Debug, PartialEq, Eq)]
pub struct Tag(pub String);

impl Tag {
    pub fn player() -> Self {
        Self(PLAYER_TAG.to_owned())
    }

    pub fn is_player(&self) -> bool {
        self.0 == PLAYER_TAG
    }
}

#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct PlayerHealth {
    pub max_health: f32,
    pub current_health: f32,
}

impl Default for PlayerHealth {
    fn default() -> Self {
        Self {
            max_health: 100.0,
            current_health: 50.0,
        }
    }
}

#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct PlayerMovement {
    pub base_speed: f32,
    pub current_speed: f32,
}

impl Default for PlayerMovement {
    fn default() -> Self {
        Self {
            base_speed: 5.0,
            current_speed: 5.0,
        }
    }
}

/// Effect with no dependency on the collider's stats.
pub trait PowerUp: Send + Sync {
    fn apply_effect(&self);
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HealthBoost {
    pub boost_amount: f32,
}

impl HealthBoost {
    pub fn on_pickup(&self, target: &mut PlayerHealth) {
        target.current_health += self.boost_amount;
        debug!(
            target: "delight_core.pickup",
            boost = self.boost_amount,
            current = target.current_health,
            max = target.max_health,
            "health boosted"
        );
    }
}

impl Default for HealthBoost {
    fn default() -> Self {
        Self {
            boost_amount: DEFAULT_HEALTH_BOOST,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpeedBoost {
    pub boost_amount: f32,
}

impl SpeedBoost {
    pub fn on_pickup(&self, target: &mut PlayerMovement) {
        target.current_speed += self.boost_amount;
        debug!(
            target: "delight_core.pickup",
            boost = self.boost_amount,
            current = target.current_speed,
            "speed boosted"
        );
    }
}

impl Default for SpeedBoost {
    fn default() -> Self {
        Self {
            boost_amount: DEFAULT_SPEED_BOOST,
        }
    }
}

/// Stats of whatever touched the pickup. Either side may be missing.
#[derive(Default)]
pub struct PickupTarget<'a> {
    pub health: Option<&'a mut PlayerHealth>,
    pub movement: Option<&'a mut PlayerMovement>,
}

#[derive(Clone)]
pub enum PickupEffect {
    Health(HealthBoost),
    Speed(SpeedBoost),
    PowerUp(Arc<dyn PowerUp>),
}

impl PickupEffect {
    pub fn apply(&self, target: PickupTarget<'_>) {
        match self {
            PickupEffect::Health(boost) => {
                if let Some(health) = target.health {
                    boost.on_pickup(health);
                }
            }
            PickupEffect::Speed(boost) => {
                if let Some(movement) = target.movement {
                    boost.on_pickup(movement);
                }
            }
            PickupEffect::PowerUp(power_up) => power_up.apply_effect(),
        }
    }
}

impl fmt::Debug for PickupEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PickupEffect::Health(boost) => f.debug_tuple("Health").field(boost).finish(),
            PickupEffect::Speed(boost) => f.debug_tuple("Speed").field(boost).finish(),
            PickupEffect::PowerUp(_) => f.write_str("PowerUp(..)"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PickupOutcome {
    /// The effect ran; the item should now be destroyed.
    Consumed,
    Ignored,
}

#[derive(Component, Clone, Debug)]
pub struct GameItem {
    effect: PickupEffect,
    consumed: bool,
}

impl GameItem {
    pub fn new(effect: PickupEffect) -> Self {
        Self {
            effect,
            consumed: false,
        }
    }

    pub fn effect(&self) -> &PickupEffect {
        &self.effect
    }

    pub fn is_consumed(&self) -> bool {
        self.consumed
    }

    pub fn on_trigger_enter(&mut self, other: Option<&Tag>, target: PickupTarget<'_>) -> PickupOutcome {
        if self.consumed || !other.is_some_and(Tag::is_player) {
            return PickupOutcome::Ignored;
        }
        self.effect.apply(target);
        self.consumed = true;
        PickupOutcome::Consumed
    }
}
