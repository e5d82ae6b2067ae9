use thiserror::Error;

use crate::types::DynError;

/// Errors while resolving instances
///
/// Any of these aborts the whole `initialize` or `get` call; nothing built
/// by the failing batch is cached.
#[derive(Error, Debug)]
pub enum ResolveError {
    /// A dependency names a key which is not registered
    #[error("Dependency [{key}.{alias}]->[{target}] can not be satisfied")]
    UnsatisfiedDependency {
        key: String,
        alias: String,
        target: String,
    },
    /// The property a dependency is wired into already holds a value
    #[error("Dependency [{key}.{alias}]->[{target}] is overriding existing property")]
    PropertyCollision {
        key: String,
        alias: String,
        target: String,
    },
    /// The requested key is not registered
    #[error("No registration for key '{0}'")]
    UnregisteredKey(String),
    /// The component refused the injected dependency
    #[error("Dependency [{key}.{alias}]->[{target}] could not be injected - error: {error}")]
    InjectFailed {
        key: String,
        alias: String,
        target: String,
        error: DynError,
    },
    /// A recipe failed to build
    #[error("Factory for '{key}' failed - error: {error:?}")]
    FactoryFailed { key: String, error: DynError },
    /// A plain function was registered with constructor invocation
    #[error("'{0}' is a plain function and can not be constructed, use function invocation")]
    NotConstructible(String),
    /// The ready hook of a component failed
    #[error("Lifecycle hook of '{key}' failed - error: {error}")]
    LifecycleFailed { key: String, error: DynError },
    /// A prototype requires a fresh instance of itself
    #[error("Prototype '{key}' requires itself through {chain:?}")]
    PrototypeCycle { key: String, chain: Vec<String> },
    /// A key was registered twice while overrides are disabled
    #[error("A key has been registered twice: '{0}'")]
    DuplicateRegistration(String),
}

/// Returned by components which have no property of the given name
#[derive(Error, Debug, Clone)]
#[error("Unknown property '{0}'")]
pub struct UnknownProperty(pub String);

/// Errors when reading invocation params
#[derive(Error, Debug, Clone)]
pub enum ParamError {
    #[error("Missing argument #{0}")]
    Missing(usize),
    #[error("Argument #{index} is '{actual}', expected '{expected}'")]
    WrongType {
        index: usize,
        expected: &'static str,
        actual: &'static str,
    },
}
