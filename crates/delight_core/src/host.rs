//! The seam between gameplay rules and whatever engine hosts them.

use std::fmt;

use bevy::prelude::*;

use crate::pickup::PickupEffect;

/// Where a new instance goes: under a parent at its default local transform,
/// or at a world position with identity rotation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Placement<H> {
    Child(H),
    World(Vec2),
}

/// Template for items a spawner creates.
#[derive(Clone, Debug)]
pub struct Prefab {
    pub name: String,
    pub size: Vec2,
    pub color: Color,
    pub pickup: Option<PickupEffect>,
}

impl Prefab {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size: Vec2::splat(16.0),
            color: Color::srgb(0.9, 0.9, 0.9),
            pickup: None,
        }
    }

    pub fn with_pickup(mut self, effect: PickupEffect) -> Self {
        self.pickup = Some(effect);
        self
    }

    pub fn with_look(mut self, size: Vec2, color: Color) -> Self {
        self.size = size;
        self.color = color;
        self
    }

    /// Name given to every instance of this prefab.
    pub fn instance_name(&self) -> String {
        format!("{}(Clone)", self.name)
    }
}

pub trait EngineHost {
    type Handle: Copy + fmt::Debug;

    fn instantiate(&mut self, prefab: &Prefab, placement: Placement<Self::Handle>) -> Self::Handle;

    fn destroy(&mut self, handle: Self::Handle);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(pub u64);

#[derive(Clone, Debug)]
pub struct Instance {
    pub id: InstanceId,
    pub name: String,
    pub placement: Placement<InstanceId>,
    pub pickup: Option<PickupEffect>,
}

/// Headless host that keeps instances in a flat list.
#[derive(Debug, Default)]
pub struct MemoryHost {
    next_id: u64,
    instances: Vec<Instance>,
    destroyed: usize,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a bare object, e.g. the spawner a batch of items hangs under.
    pub fn create_empty(&mut self, name: impl Into<String>) -> InstanceId {
        let id = self.allocate();
        self.instances.push(Instance {
            id,
            name: name.into(),
            placement: Placement::World(Vec2::ZERO),
            pickup: None,
        });
        id
    }

    pub fn instances(&self) -> &[Instance] {
        &self.instances
    }

    pub fn get(&self, id: InstanceId) -> Option<&Instance> {
        self.instances.iter().find(|instance| instance.id == id)
    }

    pub fn find(&self, name: &str) -> Option<&Instance> {
        self.instances.iter().find(|instance| instance.name == name)
    }

    pub fn child_count(&self, parent: InstanceId) -> usize {
        self.instances
            .iter()
            .filter(|instance| instance.placement == Placement::Child(parent))
            .count()
    }

    pub fn destroyed_count(&self) -> usize {
        self.destroyed
    }

    fn allocate(&mut self) -> InstanceId {
        let id = InstanceId(self.next_id);
        self.next_id += 1;
        id
    }
}

impl EngineHost for MemoryHost {
    type Handle = InstanceId;

    fn instantiate(&mut self, prefab: &Prefab, placement: Placement<InstanceId>) -> InstanceId {
        let id = self.allocate();
        self.instances.push(Instance {
            id,
            name: prefab.instance_name(),
            placement,
            pickup: prefab.pickup.clone(),
        });
        id
    }

    /// Removes the instance and everything parented under it.
    fn destroy(&mut self, handle: InstanceId) {
        let mut doomed = vec![handle];
        while let Some(current) = doomed.pop() {
            let before = self.instances.len();
            self.instances.retain(|instance| instance.id != current);
            self.destroyed += before - self.instances.len();
            doomed.extend(
                self.instances
                    .iter()
                    .filter(|instance| instance.placement == Placement::Child(current))
                    .map(|instance| instance.id),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instances_are_named_after_prefab() {
        let mut host = MemoryHost::new();
        let id = host.instantiate(&Prefab::new("Cube"), Placement::World(Vec2::new(5.0, 5.0)));
        let instance = host.find("Cube(Clone)").expect("instance");
        assert_eq!(id, instance.id);
        assert_eq!(Placement::World(Vec2::new(5.0, 5.0)), instance.placement);
    }

    #[test]
    fn destroy_takes_children_along() {
        let mut host = MemoryHost::new();
        let parent = host.create_empty("Spawner");
        let prefab = Prefab::new("Coin");
        for _ in 0..3 {
            host.instantiate(&prefab, Placement::Child(parent));
        }
        let loose = host.instantiate(&prefab, Placement::World(Vec2::ONE));

        host.destroy(parent);
        assert_eq!(4, host.destroyed_count());
        assert_eq!(1, host.instances().len());
        assert!(host.get(loose).is_some());
    }
}
