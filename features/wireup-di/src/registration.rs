use std::fmt::Debug;

use crate::{
    factories::Target,
    types::{Arguments, Instance},
};

/// How often a registration is instantiated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Strategy {
    /// One shared instance, cached by the container
    #[default]
    Singleton,
    /// A fresh instance for every request
    Prototype,
}

/// How the target of a registration is invoked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Factory {
    /// The target is a type, the instance is the newly constructed value
    #[default]
    Constructor,
    /// The target is a plain function, the instance is whatever it returns
    Function,
}

/// Recipe for one key of the container
pub struct Registration {
    key: String,
    target: Target,
    arguments: Arguments,
    strategy: Strategy,
    factory: Factory,
    /// Only ever set for singletons
    pub(crate) cached: Option<Instance>,
}
impl Registration {
    pub(crate) fn new(key: String, target: Target, arguments: Arguments) -> Self {
        Registration {
            key,
            target,
            arguments,
            strategy: Strategy::default(),
            factory: Factory::default(),
            cached: None,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn arguments(&self) -> &Arguments {
        &self.arguments
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn factory(&self) -> Factory {
        self.factory
    }

    /// The cached singleton, if it was already built
    pub fn cached(&self) -> Option<&Instance> {
        self.cached.as_ref()
    }

    pub(crate) fn set_strategy(&mut self, strategy: Strategy) {
        self.strategy = strategy;
        if strategy == Strategy::Prototype {
            self.cached = None;
        }
    }

    pub(crate) fn set_factory(&mut self, factory: Factory) {
        self.factory = factory;
    }
}
impl Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("key", &self.key)
            .field("target", &self.target)
            .field("arguments", &self.arguments)
            .field("strategy", &self.strategy)
            .field("factory", &self.factory)
            .field("materialized", &self.cached.is_some())
            .finish()
    }
}

/// Returned by `Context::register`, allows adjusting the registration in place
///
/// # Example
/// ```rust
/// use wireup_di::{create_context, Bean, Factory, Strategy, Target};
///
/// let mut ctx = create_context();
/// ctx.register("bean", Target::function(|_| Ok(Bean::new())))
///     .strategy(Strategy::Prototype)
///     .factory(Factory::Function);
/// ```
pub struct RegistrationHandle<'a> {
    registration: &'a mut Registration,
}
impl<'a> RegistrationHandle<'a> {
    pub(crate) fn new(registration: &'a mut Registration) -> Self {
        RegistrationHandle { registration }
    }

    pub fn strategy(self, strategy: Strategy) -> Self {
        self.registration.set_strategy(strategy);
        self
    }

    pub fn factory(self, factory: Factory) -> Self {
        self.registration.set_factory(factory);
        self
    }

    pub fn key(&self) -> &str {
        self.registration.key()
    }
}
