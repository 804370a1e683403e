//! Minimal entity-component store
//!
//! The simulation needs a narrow surface: create entities, attach one
//! component per type, look components up by type, iterate entities carrying
//! a type, and defer destruction to a caller-controlled sweep. Columns are
//! keyed by the component's compile-time `TypeId`; iteration is always in
//! ascending entity ID so ticks stay deterministic.

use std::any::{Any, TypeId};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Handle to an entity in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Entity(u32);

impl Entity {
    /// Raw ID, mostly for logging.
    pub fn id(self) -> u32 {
        self.0
    }
}

type Column<T> = BTreeMap<Entity, T>;

/// Type-erased operations every column supports, so a sweep can clear an
/// entity out of all columns without knowing their component types.
trait ColumnOps {
    fn remove_entity(&mut self, entity: Entity);
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: 'static> ColumnOps for Column<T> {
    fn remove_entity(&mut self, entity: Entity) {
        self.remove(&entity);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Entity-component store.
#[derive(Default)]
pub struct World {
    next_id: u32,
    alive: BTreeSet<Entity>,
    doomed: BTreeSet<Entity>,
    columns: HashMap<TypeId, Box<dyn ColumnOps>>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new empty entity.
    pub fn spawn(&mut self) -> Entity {
        let entity = Entity(self.next_id);
        self.next_id += 1;
        self.alive.insert(entity);
        entity
    }

    /// Attach a component, replacing any existing one of the same type.
    pub fn attach<T: 'static>(&mut self, entity: Entity, component: T) {
        let column = self
            .columns
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(Column::<T>::new()));
        if let Some(column) = column.as_any_mut().downcast_mut::<Column<T>>() {
            column.insert(entity, component);
        }
    }

    /// Detach and return a component.
    pub fn detach<T: 'static>(&mut self, entity: Entity) -> Option<T> {
        self.column_mut::<T>()?.remove(&entity)
    }

    pub fn get<T: 'static>(&self, entity: Entity) -> Option<&T> {
        self.column::<T>()?.get(&entity)
    }

    pub fn get_mut<T: 'static>(&mut self, entity: Entity) -> Option<&mut T> {
        self.column_mut::<T>()?.get_mut(&entity)
    }

    /// All live entities carrying `T`, in ascending ID order.
    pub fn entities_with<T: 'static>(&self) -> Vec<Entity> {
        match self.column::<T>() {
            Some(column) => column
                .keys()
                .copied()
                .filter(|&e| self.is_alive(e))
                .collect(),
            None => Vec::new(),
        }
    }

    /// The entity exists (it may still be queued for removal).
    pub fn contains(&self, entity: Entity) -> bool {
        self.alive.contains(&entity)
    }

    /// The entity exists and is not queued for removal.
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.alive.contains(&entity) && !self.doomed.contains(&entity)
    }

    /// Queue an entity for destruction at the next sweep.
    pub fn mark_for_removal(&mut self, entity: Entity) {
        if self.alive.contains(&entity) {
            self.doomed.insert(entity);
        }
    }

    /// Destroy every queued entity and its components. The sweep cadence
    /// belongs to the caller, not to any one system. Returns the number of
    /// entities destroyed.
    pub fn sweep(&mut self) -> usize {
        let doomed = std::mem::take(&mut self.doomed);
        for &entity in &doomed {
            self.alive.remove(&entity);
            for column in self.columns.values_mut() {
                column.remove_entity(entity);
            }
        }
        doomed.len()
    }

    fn column<T: 'static>(&self) -> Option<&Column<T>> {
        self.columns
            .get(&TypeId::of::<T>())?
            .as_any()
            .downcast_ref()
    }

    fn column_mut<T: 'static>(&mut self) -> Option<&mut Column<T>> {
        self.columns
            .get_mut(&TypeId::of::<T>())?
            .as_any_mut()
            .downcast_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Health(u32);

    #[derive(Debug, PartialEq)]
    struct Name(&'static str);

    #[test]
    fn attach_and_get() {
        let mut world = World::new();
        let e = world.spawn();
        world.attach(e, Health(10));

        assert_eq!(world.get::<Health>(e), Some(&Health(10)));
        assert_eq!(world.get::<Name>(e), None);

        if let Some(h) = world.get_mut::<Health>(e) {
            h.0 = 3;
        }
        assert_eq!(world.get::<Health>(e), Some(&Health(3)));
    }

    #[test]
    fn attach_replaces() {
        let mut world = World::new();
        let e = world.spawn();
        world.attach(e, Health(1));
        world.attach(e, Health(2));
        assert_eq!(world.get::<Health>(e), Some(&Health(2)));
    }

    #[test]
    fn detach_returns_component() {
        let mut world = World::new();
        let e = world.spawn();
        world.attach(e, Health(7));

        assert_eq!(world.detach::<Health>(e), Some(Health(7)));
        assert_eq!(world.get::<Health>(e), None);
        assert!(world.contains(e));
    }

    #[test]
    fn query_is_id_ordered() {
        let mut world = World::new();
        let a = world.spawn();
        let b = world.spawn();
        let c = world.spawn();
        // Attach out of order; iteration must still come back sorted.
        world.attach(c, Health(3));
        world.attach(a, Health(1));
        world.attach(b, Health(2));

        assert_eq!(world.entities_with::<Health>(), vec![a, b, c]);
    }

    #[test]
    fn sweep_destroys_all_components() {
        let mut world = World::new();
        let e = world.spawn();
        world.attach(e, Health(5));
        world.attach(e, Name("weed"));

        world.mark_for_removal(e);
        // Marked but not yet swept: still present, no longer "alive".
        assert!(world.contains(e));
        assert!(!world.is_alive(e));
        assert!(world.entities_with::<Health>().is_empty());

        assert_eq!(world.sweep(), 1);
        assert!(!world.contains(e));
        assert_eq!(world.get::<Health>(e), None);
        assert_eq!(world.get::<Name>(e), None);
    }

    #[test]
    fn sweep_is_idempotent() {
        let mut world = World::new();
        let e = world.spawn();
        world.mark_for_removal(e);
        world.mark_for_removal(e);
        assert_eq!(world.sweep(), 1);
        assert_eq!(world.sweep(), 0);
    }
}
