use std::{
    collections::{btree_map::Entry, BTreeMap},
    fmt::Debug,
};

use crate::{
    builder::{ContextBuilder, ContextOptions},
    errors::ResolveError,
    factories::Target,
    initiator::{self, Batch, BatchInitiator, Wiring},
    registration::{Registration, RegistrationHandle, Strategy},
    types::{Arguments, Instance},
};

/// Lifecycle of a [Context]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextState {
    /// Nothing registered
    Unregistered,
    /// Registrations were added, but not initialized
    Registering,
    /// All singletons registered until the last `initialize` are built
    Initialized,
}

/// Container holding all registrations and the singletons built from them
///
/// # Example
/// ```rust
/// use wireup_di::{create_context, Bean, Factory, Target};
///
/// let mut ctx = create_context();
/// ctx.register("a", Target::function(|_| Ok(Bean::new().with_dependencies("b"))))
///     .factory(Factory::Function);
/// ctx.register("b", Target::function(|_| Ok(Bean::new().with_dependencies("a"))))
///     .factory(Factory::Function);
/// ctx.initialize().unwrap();
///
/// let a = ctx.get("a").unwrap();
/// let b = ctx.get("b").unwrap();
/// assert_eq!(a.downcast_ref::<Bean>().unwrap().get("b"), Some(&b));
/// assert_eq!(b.downcast_ref::<Bean>().unwrap().get("a"), Some(&a));
/// ```
pub struct Context {
    options: ContextOptions,
    state: ContextState,
    registrations: BTreeMap<String, Registration>,
    /// Keys registered twice while overrides are disabled
    duplicates: Vec<String>,
    /// Dependencies injected into cached singletons
    wirings: Vec<Wiring>,
}
impl Default for Context {
    fn default() -> Self {
        Self::with_options(ContextOptions::default())
    }
}
impl Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_struct("Context");
        map.field("state", &self.state);
        for registration in self.registrations.values() {
            let val = match (registration.strategy(), registration.cached().is_some()) {
                (Strategy::Prototype, _) => "prototype",
                (Strategy::Singleton, true) => "singleton (built)",
                (Strategy::Singleton, false) => "singleton",
            };
            map.field(registration.key(), &val);
        }
        map.finish()
    }
}

impl Context {
    pub fn builder() -> ContextBuilder {
        ContextBuilder::new()
    }

    pub(crate) fn with_options(options: ContextOptions) -> Self {
        Context {
            options,
            state: ContextState::Unregistered,
            registrations: BTreeMap::new(),
            duplicates: Vec::new(),
            wirings: Vec::new(),
        }
    }

    pub fn state(&self) -> ContextState {
        self.state
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    pub fn is_registered(&self, key: &str) -> bool {
        self.registrations.contains_key(key)
    }

    pub fn registration(&self, key: &str) -> Option<&Registration> {
        self.registrations.get(key)
    }

    /// Registers `target` under `key`, invoked without arguments
    pub fn register(&mut self, key: impl Into<String>, target: Target) -> RegistrationHandle<'_> {
        self.register_with(key, target, Arguments::None)
    }

    /// Registers `target` under `key`, invoked with `arguments`
    ///
    /// Returns a handle to adjust strategy and factory of the registration.
    pub fn register_with(
        &mut self,
        key: impl Into<String>,
        target: Target,
        arguments: impl Into<Arguments>,
    ) -> RegistrationHandle<'_> {
        let key = key.into();
        tracing::debug!("Registering '{key}' as {}", target.name());

        if self.state == ContextState::Unregistered {
            self.state = ContextState::Registering;
        }

        let registration = Registration::new(key.clone(), target, arguments.into());
        let slot = match self.registrations.entry(key) {
            Entry::Occupied(mut entry) => {
                if self.options.allow_override {
                    tracing::debug!("Overriding registration of '{}'", entry.key());
                } else {
                    tracing::error!("Key '{}' has been registered twice", entry.key());
                    self.duplicates.push(entry.key().clone());
                }
                entry.insert(registration);
                entry.into_mut()
            }
            Entry::Vacant(entry) => entry.insert(registration),
        };

        RegistrationHandle::new(slot)
    }

    /// Builds every singleton which is not built yet, as one batch
    ///
    /// Singletons of the batch may depend on each other in cycles. Prototypes
    /// are only built on request.
    pub fn initialize(&mut self) -> Result<(), ResolveError> {
        self.check_duplicates()?;

        let batch = {
            let mut initiator = BatchInitiator::new(&self.registrations);
            let pending = self.registrations.values().filter(|registration| {
                registration.strategy() == Strategy::Singleton && registration.cached().is_none()
            });
            for registration in pending {
                initiator.add(registration)?;
            }
            initiator.initiate()?
        };

        tracing::debug!("Initialized {} instances", batch.members.len());
        self.store(batch);
        self.state = ContextState::Initialized;

        Ok(())
    }

    /// Returns the instance registered as `key`
    ///
    /// Singletons are built once and cached, including singletons registered after
    /// `initialize`. Prototypes are built on every call.
    pub fn get(&mut self, key: &str) -> Result<Instance, ResolveError> {
        self.check_duplicates()?;

        let Some(registration) = self.registrations.get(key) else {
            tracing::error!("Tried to get an unregistered key: '{key}'");
            return Err(ResolveError::UnregisteredKey(key.to_string()));
        };

        if let Some(cached) = registration.cached() {
            return Ok(cached.clone());
        }

        let (instance, batch) = {
            let mut initiator = BatchInitiator::new(&self.registrations);
            let instance = initiator.add(registration)?;
            (instance, initiator.initiate()?)
        };

        self.store(batch);
        Ok(instance)
    }

    /// Forgets all registrations and cached singletons
    ///
    /// Every dependency the container injected into its singletons is ejected
    /// again, so cyclic graphs are released.
    ///
    /// **This mutates instances returned earlier.** A singleton handle kept from
    /// a previous `get` stays valid, but the properties the container wired into
    /// it are emptied. The same happens when the context is dropped.
    pub fn clear(&mut self) {
        tracing::debug!(
            "Clearing {} registrations and {} injected dependencies",
            self.registrations.len(),
            self.wirings.len()
        );

        initiator::release(self.wirings.drain(..));

        self.registrations.clear();
        self.duplicates.clear();
        self.state = ContextState::Unregistered;
    }

    fn check_duplicates(&self) -> Result<(), ResolveError> {
        match self.duplicates.first() {
            Some(key) => Err(ResolveError::DuplicateRegistration(key.clone())),
            None => Ok(()),
        }
    }

    /// Caches the singletons of a completed batch
    fn store(&mut self, batch: Batch) {
        let Batch { members, wirings } = batch;

        for member in members {
            if member.strategy != Strategy::Singleton {
                continue;
            }
            if let Some(registration) = self.registrations.get_mut(&member.key) {
                registration.cached = Some(member.instance);
            }
        }

        self.wirings.extend(
            wirings
                .into_iter()
                .filter(|wiring| wiring.strategy == Strategy::Singleton),
        );
    }
}

impl Drop for Context {
    fn drop(&mut self) {
        if !self.wirings.is_empty() {
            tracing::trace!("Releasing {} injected dependencies", self.wirings.len());
            initiator::release(self.wirings.drain(..));
        }
    }
}

/// Creates an empty [Context] with default options
pub fn create_context() -> Context {
    Context::default()
}
