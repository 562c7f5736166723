//! Explicit environment handed to every reducer invocation.
//!
//! A store owns one [`Dependencies`] value for its whole lifetime. Tests
//! override individual entries at construction instead of mutating any
//! global state.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use crate::scheduler::{Scheduler, TokioScheduler};

/// A client type that can live in [`Dependencies`].
///
/// `default_value` is used whenever a reducer asks for a client that was
/// never inserted.
pub trait DependencyKey: Clone + Send + Sync + 'static {
    fn default_value() -> Self;
}

/// Source of UUIDs for reducers.
#[derive(Clone)]
pub struct UuidGenerator {
    generate: Arc<dyn Fn() -> Uuid + Send + Sync>,
}

impl UuidGenerator {
    /// Random v4 UUIDs.
    pub fn random() -> Self {
        Self::new(Uuid::new_v4)
    }

    /// `00000000-0000-0000-0000-000000000000`, then `...0001`, and so on.
    pub fn incrementing() -> Self {
        let next = AtomicU64::new(0);
        Self::new(move || Uuid::from_u128(u128::from(next.fetch_add(1, Ordering::SeqCst))))
    }

    /// Always the same UUID.
    pub fn constant(uuid: Uuid) -> Self {
        Self::new(move || uuid)
    }

    pub fn new(generate: impl Fn() -> Uuid + Send + Sync + 'static) -> Self {
        Self {
            generate: Arc::new(generate),
        }
    }

    pub fn generate(&self) -> Uuid {
        (self.generate)()
    }
}

impl fmt::Debug for UuidGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UuidGenerator").finish_non_exhaustive()
    }
}

/// Capabilities available to reducers and the effects they build.
#[derive(Clone)]
pub struct Dependencies {
    /// Scheduler used for every time-based effect.
    pub scheduler: Arc<dyn Scheduler>,
    pub uuid: UuidGenerator,
    clients: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl Dependencies {
    /// Tokio timers and random UUIDs.
    pub fn live() -> Self {
        Self::with_scheduler(Arc::new(TokioScheduler::new()))
    }

    /// Dependencies for deterministic tests: the given scheduler and
    /// incrementing UUIDs.
    pub fn test(scheduler: Arc<dyn Scheduler>) -> Self {
        let mut deps = Self::with_scheduler(scheduler);
        deps.uuid = UuidGenerator::incrementing();
        deps
    }

    fn with_scheduler(scheduler: Arc<dyn Scheduler>) -> Self {
        Self {
            scheduler,
            uuid: UuidGenerator::random(),
            clients: HashMap::new(),
        }
    }

    /// The current time on the configured scheduler.
    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    /// Install or replace the client of type `T`.
    pub fn insert<T: DependencyKey>(&mut self, client: T) {
        self.clients.insert(TypeId::of::<T>(), Arc::new(client));
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with<T: DependencyKey>(mut self, client: T) -> Self {
        self.insert(client);
        self
    }

    /// The installed client of type `T`, or its default value.
    pub fn get<T: DependencyKey>(&self) -> T {
        self.clients
            .get(&TypeId::of::<T>())
            .and_then(|client| client.downcast_ref::<T>())
            .cloned()
            .unwrap_or_else(T::default_value)
    }

    /// Mutate the client of type `T` in place, starting from its current value.
    pub fn update<T: DependencyKey>(&mut self, update: impl FnOnce(&mut T)) {
        let mut client = self.get::<T>();
        update(&mut client);
        self.insert(client);
    }
}

impl fmt::Debug for Dependencies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dependencies")
            .field("scheduler", &self.scheduler)
            .field("clients", &self.clients.len())
            .finish()
    }
}
