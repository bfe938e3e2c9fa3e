use bevy::prelude::*;
use tracing::{debug, info};

use crate::error::{GameplayError, Result};
use crate::host::{EngineHost, Placement, Prefab};

pub const DEFAULT_MAX_ITEMS: usize = 100;

/// Axis-aligned spawn area given by its minimum corner and size.
///
/// Containment is half-open: the minimum edges belong to the area, the
/// maximum edges do not.
#[derive(Clone, Copy, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct SpawnBounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl SpawnBounds {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn min(&self) -> Vec2 {
        Vec2::new(self.x.min(self.x + self.width), self.y.min(self.y + self.height))
    }

    pub fn max(&self) -> Vec2 {
        Vec2::new(self.x.max(self.x + self.width), self.y.max(self.y + self.height))
    }

    pub fn center(&self) -> Vec2 {
        (self.min() + self.max()) * 0.5
    }

    pub fn contains(&self, point: Vec2) -> bool {
        let (min, max) = (self.min(), self.max());
        point.x >= min.x && point.x < max.x && point.y >= min.y && point.y < max.y
    }
}

impl Default for SpawnBounds {
    fn default() -> Self {
        Self::new(0.0, 0.0, 1000.0, 1000.0)
    }
}

#[derive(Component, Clone, Debug)]
pub struct ItemSpawner {
    pub item_prefab: Option<Prefab>,
    pub bounds: SpawnBounds,
    pub limit_enabled: bool,
    pub max_items: usize,
}

impl ItemSpawner {
    pub fn new(item_prefab: Prefab) -> Self {
        Self {
            item_prefab: Some(item_prefab),
            ..Default::default()
        }
    }

    pub fn effective_count(&self, count: usize) -> usize {
        if self.limit_enabled {
            count.min(self.max_items)
        } else {
            count
        }
    }

    /// Creates up to `count` items parented under `parent`. Bounds are not
    /// consulted on this path.
    pub fn spawn_items<H: EngineHost>(
        &self,
        host: &mut H,
        parent: H::Handle,
        count: usize,
    ) -> Result<Vec<H::Handle>> {
        let prefab = self.prefab()?;
        let to_spawn = self.effective_count(count);
        if to_spawn < count {
            debug!(
                target: "delight_core.spawner",
                requested = count,
                max = self.max_items,
                "spawn request capped"
            );
        }
        let spawned = (0..to_spawn)
            .map(|_| host.instantiate(prefab, Placement::Child(parent)))
            .collect();
        Ok(spawned)
    }

    /// Places a single item at `position`. Positions outside the bounds are
    /// rejected with `Ok(None)`.
    pub fn spawn_item<H: EngineHost>(
        &self,
        host: &mut H,
        position: Vec2,
    ) -> Result<Option<H::Handle>> {
        let prefab = self.prefab()?;
        if !self.bounds.contains(position) {
            info!(
                target: "delight_core.spawner",
                x = position.x,
                y = position.y,
                "out of bounds"
            );
            return Ok(None);
        }
        Ok(Some(host.instantiate(prefab, Placement::World(position))))
    }

    fn prefab(&self) -> Result<&Prefab> {
        self.item_prefab.as_ref().ok_or(GameplayError::MissingPrefab)
    }
}

impl Default for ItemSpawner {
    fn default() -> Self {
        Self {
            item_prefab: None,
            bounds: SpawnBounds::default(),
            limit_enabled: false,
            max_items: DEFAULT_MAX_ITEMS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{MemoryHost, Placement};

    fn spawner() -> ItemSpawner {
        ItemSpawner::new(Prefab::new("Cube"))
    }

    #[test]
    fn unlimited_spawn_creates_every_item() {
        let mut host = MemoryHost::new();
        let parent = host.create_empty("Spawner");
        let spawned = spawner().spawn_items(&mut host, parent, 999).unwrap();
        assert_eq!(999, spawned.len());
        assert_eq!(999, host.child_count(parent));
    }

    #[test]
    fn limit_caps_spawn_count() {
        let mut host = MemoryHost::new();
        let parent = host.create_empty("Spawner");
        let spawner = ItemSpawner {
            limit_enabled: true,
            max_items: 1000,
            ..spawner()
        };
        spawner.spawn_items(&mut host, parent, 1001).unwrap();
        assert_eq!(1000, host.child_count(parent));
        assert_eq!(7, spawner.effective_count(7));
    }

    #[test]
    fn disabled_limit_ignores_max_items() {
        let spawner = ItemSpawner {
            max_items: 2,
            ..spawner()
        };
        assert_eq!(5, spawner.effective_count(5));
    }

    #[test]
    fn missing_prefab_is_a_configuration_error() {
        let mut host = MemoryHost::new();
        let parent = host.create_empty("Spawner");
        let spawner = ItemSpawner::default();
        assert!(matches!(
            spawner.spawn_items(&mut host, parent, 3),
            Err(GameplayError::MissingPrefab)
        ));
        assert!(matches!(
            spawner.spawn_item(&mut host, Vec2::new(5.0, 5.0)),
            Err(GameplayError::MissingPrefab)
        ));
        assert_eq!(1, host.instances().len());
    }

    #[test]
    fn placement_inside_bounds_creates_item_at_position() {
        let mut host = MemoryHost::new();
        let spawner = ItemSpawner {
            bounds: SpawnBounds::new(0.0, 0.0, 10.0, 10.0),
            ..spawner()
        };
        let id = spawner
            .spawn_item(&mut host, Vec2::new(5.0, 5.0))
            .unwrap()
            .expect("inside bounds");
        let instance = host.get(id).unwrap();
        assert_eq!("Cube(Clone)", instance.name);
        assert_eq!(Placement::World(Vec2::new(5.0, 5.0)), instance.placement);
    }

    #[test]
    fn placement_outside_bounds_is_rejected_quietly() {
        let mut host = MemoryHost::new();
        let spawner = ItemSpawner {
            bounds: SpawnBounds::new(0.0, 0.0, 10.0, 10.0),
            ..spawner()
        };
        let result = spawner.spawn_item(&mut host, Vec2::new(9999.0, 9999.0));
        assert!(matches!(result, Ok(None)));
        assert!(host.find("Cube(Clone)").is_none());
    }

    #[test]
    fn containment_includes_min_edge_and_excludes_max_edge() {
        let bounds = SpawnBounds::new(0.0, 0.0, 10.0, 10.0);
        assert!(bounds.contains(Vec2::new(0.0, 0.0)));
        assert!(bounds.contains(Vec2::new(0.0, 9.99)));
        assert!(bounds.contains(Vec2::new(9.99, 9.99)));
        assert!(!bounds.contains(Vec2::new(10.0, 5.0)));
        assert!(!bounds.contains(Vec2::new(5.0, 10.0)));
        assert!(!bounds.contains(Vec2::new(-0.01, 5.0)));
    }

    #[test]
    fn negative_size_covers_the_same_area() {
        let flipped = SpawnBounds::new(10.0, 10.0, -10.0, -10.0);
        assert_eq!(Vec2::ZERO, flipped.min());
        assert_eq!(Vec2::splat(10.0), flipped.max());
        assert!(flipped.contains(Vec2::new(5.0, 5.0)));
        assert_eq!(Vec2::splat(5.0), flipped.center());
    }
}
