//! World management
//!
//! The World is the central container for all ECS data: the entity
//! registry, the four component arrays, and the screen bounds the physics
//! step collides against. [`SharedWorld`] pairs it with the one lock that
//! every thread must hold while touching any of it.

use crate::ecs::components::{CircleCollider, Display, Position, RigidBody};
use crate::ecs::{
    Component, ComponentArray, ComponentKind, ComponentSlice, EntityId, EntityRegistry,
};
use crate::error::{EcsError, EcsResult};
use parking_lot::{Mutex, MutexGuard};
use std::sync::Arc;

/// Components that have an array in [`ComponentStore`]
pub trait Stored: Component {
    /// This kind's array
    fn array(store: &ComponentStore) -> &ComponentArray<Self>;

    /// This kind's array, mutably
    fn array_mut(store: &mut ComponentStore) -> &mut ComponentArray<Self>;
}

macro_rules! impl_stored {
    ($ty:ty, $field:ident) => {
        impl Stored for $ty {
            fn array(store: &ComponentStore) -> &ComponentArray<Self> {
                &store.$field
            }

            fn array_mut(store: &mut ComponentStore) -> &mut ComponentArray<Self> {
                &mut store.$field
            }
        }
    };
}

impl_stored!(Position, positions);
impl_stored!(Display, displays);
impl_stored!(RigidBody, rigid_bodies);
impl_stored!(CircleCollider, circle_colliders);

/// One fixed-capacity array per component kind
///
/// All arrays share one capacity but track their own live counts. The
/// store has no internal synchronization.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ComponentStore {
    positions: ComponentArray<Position>,
    displays: ComponentArray<Display>,
    rigid_bodies: ComponentArray<RigidBody>,
    circle_colliders: ComponentArray<CircleCollider>,
}

impl ComponentStore {
    /// Create an uninitialized store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store and initialize it with `capacity` slots per kind
    pub fn with_capacity(capacity: usize) -> Self {
        let mut store = Self::new();
        store.init(capacity);
        store
    }

    /// Allocate `capacity` free slots for every kind
    ///
    /// A second call while initialized is a no-op and returns `false`.
    pub fn init(&mut self, capacity: usize) -> bool {
        if self.is_initialized() {
            log::debug!("Component store already initialized, ignoring init({})", capacity);
            return false;
        }
        self.positions.init(capacity);
        self.displays.init(capacity);
        self.rigid_bodies.init(capacity);
        self.circle_colliders.init(capacity);
        log::info!("Component store initialized with {} slots per kind", capacity);
        true
    }

    /// Whether `init` has run
    pub fn is_initialized(&self) -> bool {
        self.positions.is_initialized()
    }

    /// Slots per kind
    pub fn capacity(&self) -> usize {
        self.positions.capacity()
    }

    /// Claim a free slot of kind `T` for `entity`
    pub fn create_component<T: Stored>(&mut self, entity: EntityId) -> EcsResult<&mut T> {
        let array = T::array_mut(self);
        match array.create(entity) {
            Err(err @ EcsError::CapacityExceeded { .. }) => {
                log::warn!("{}", err);
                Err(err)
            }
            other => other,
        }
    }

    /// Claim a slot for `entity` and fill it with `value`
    pub fn attach<T: Stored>(&mut self, entity: EntityId, mut value: T) -> EcsResult<&mut T> {
        let slot = self.create_component::<T>(entity)?;
        value.set_owner(entity);
        *slot = value;
        Ok(slot)
    }

    /// First component of kind `T` owned by `entity`
    pub fn get_component<T: Stored>(&self, entity: EntityId) -> EcsResult<&T> {
        T::array(self).get(entity)
    }

    /// First component of kind `T` owned by `entity`, mutably
    pub fn get_component_mut<T: Stored>(&mut self, entity: EntityId) -> EcsResult<&mut T> {
        T::array_mut(self).get_mut(entity)
    }

    /// Live count and backing slots of kind `T`
    pub fn component_array<T: Stored>(&self) -> EcsResult<ComponentSlice<'_, T>> {
        T::array(self).view()
    }

    /// Direct access to the array of kind `T`
    pub fn array<T: Stored>(&self) -> &ComponentArray<T> {
        T::array(self)
    }

    /// Direct mutable access to the array of kind `T`
    pub fn array_mut<T: Stored>(&mut self) -> &mut ComponentArray<T> {
        T::array_mut(self)
    }

    /// Free slots left in the array of `kind`
    pub fn remaining_of(&self, kind: ComponentKind) -> usize {
        match kind {
            ComponentKind::Position => self.positions.remaining(),
            ComponentKind::Display => self.displays.remaining(),
            ComponentKind::RigidBody => self.rigid_bodies.remaining(),
            ComponentKind::CircleCollider => self.circle_colliders.remaining(),
        }
    }

    /// Free slots left in the fullest array
    pub fn remaining(&self) -> usize {
        ComponentKind::ALL
            .iter()
            .map(|&kind| self.remaining_of(kind))
            .min()
            .unwrap_or(0)
    }

    /// Error for the first kind with no free slot, if any
    pub fn full_kind(&self) -> Option<EcsError> {
        ComponentKind::ALL
            .into_iter()
            .find(|&kind| self.remaining_of(kind) == 0)
            .map(|kind| EcsError::CapacityExceeded {
                kind,
                capacity: self.capacity(),
            })
    }

    /// Every owner tag in every array, free slots included
    pub fn owners(&self) -> impl Iterator<Item = EntityId> + '_ {
        fn tags<T: Component>(array: &ComponentArray<T>) -> impl Iterator<Item = EntityId> + '_ {
            (0..array.capacity()).filter_map(move |i| array.slot(i).map(|c| c.owner()))
        }
        tags(&self.positions)
            .chain(tags(&self.displays))
            .chain(tags(&self.rigid_bodies))
            .chain(tags(&self.circle_colliders))
    }
}

/// Drawable area the physics step keeps bodies inside
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenSize {
    /// Width in screen units
    pub width: f32,
    /// Height in screen units
    pub height: f32,
}

impl ScreenSize {
    /// Create a screen size
    pub fn new(width: f32, height: f32) -> Self {
        ScreenSize { width, height }
    }
}

impl Default for ScreenSize {
    fn default() -> Self {
        ScreenSize::new(512.0, 512.0)
    }
}

/// The main ECS world container
#[derive(Debug, Clone, Default)]
pub struct World {
    registry: EntityRegistry,
    components: ComponentStore,
    screen: ScreenSize,
}

impl World {
    /// Create a world whose storage is not yet initialized
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a world with `capacity` slots per component kind
    pub fn with_capacity(capacity: usize) -> Self {
        World {
            components: ComponentStore::with_capacity(capacity),
            ..Self::default()
        }
    }

    /// Initialize component storage; no-op if already initialized
    pub fn init(&mut self, capacity: usize) -> bool {
        self.components.init(capacity)
    }

    /// Allocate a new entity identifier
    ///
    /// Has no storage side effect; attach components separately.
    pub fn new_entity(&mut self) -> EntityId {
        self.registry.new_entity()
    }

    /// Number of entities created so far
    pub fn entity_count(&self) -> usize {
        self.registry.issued() as usize
    }

    /// The entity registry
    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    /// Component storage
    pub fn components(&self) -> &ComponentStore {
        &self.components
    }

    /// Component storage, mutably
    pub fn components_mut(&mut self) -> &mut ComponentStore {
        &mut self.components
    }

    /// Current collision bounds
    pub fn screen(&self) -> ScreenSize {
        self.screen
    }

    /// Update the collision bounds (e.g. after a window resize)
    pub fn set_screen(&mut self, screen: ScreenSize) {
        self.screen = screen;
    }
}

/// A world behind the storage-wide lock, shared between threads
///
/// Hold the guard for a whole system traversal, not just its final write,
/// or a half-updated world can be observed. The lock is not reentrant.
#[derive(Debug, Clone, Default)]
pub struct SharedWorld {
    inner: Arc<Mutex<World>>,
}

impl SharedWorld {
    /// Put `world` behind a lock
    pub fn new(world: World) -> Self {
        SharedWorld {
            inner: Arc::new(Mutex::new(world)),
        }
    }

    /// Block until the lock is acquired
    pub fn lock(&self) -> MutexGuard<'_, World> {
        self.inner.lock()
    }

    /// Copy of the component storage taken under the lock
    pub fn snapshot(&self) -> ComponentStore {
        self.lock().components().clone()
    }
}
