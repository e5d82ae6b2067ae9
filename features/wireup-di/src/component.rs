use std::{any::Any, collections::BTreeMap};

use crate::{
    errors::UnknownProperty,
    types::{DynError, Instance},
};

/// Gives access to the concrete type behind a `dyn Component`
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}
impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Anything the container can build and hand out
///
/// Every method has a default, so a type which neither needs wiring nor a
/// lifecycle hook only needs an empty impl.
///
/// # Example
/// ```rust
/// use wireup_di::{Component, DynError, Instance, UnknownProperty};
///
/// #[derive(Default)]
/// struct CreditCard {
///     address: Option<Instance>,
/// }
///
/// impl Component for CreditCard {
///     fn dependencies(&self) -> Option<&str> {
///         Some("address")
///     }
///
///     fn is_set(&self, property: &str) -> bool {
///         property == "address" && self.address.is_some()
///     }
///
///     fn inject(&mut self, property: &str, dependency: Instance) -> Result<(), DynError> {
///         match property {
///             "address" => self.address = Some(dependency),
///             other => return Err(UnknownProperty(other.to_string()).into()),
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Component: AsAny {
    /// Comma separated list of `alias = key` pairs, `alias` alone means `alias = alias`
    ///
    /// Read once, right after the instance was created.
    fn dependencies(&self) -> Option<&str> {
        None
    }

    /// Whether `property` already holds a value
    ///
    /// Wiring into a set property is rejected.
    fn is_set(&self, property: &str) -> bool {
        let _ = property;
        false
    }

    /// Stores a resolved dependency in `property`
    fn inject(&mut self, property: &str, dependency: Instance) -> Result<(), DynError> {
        let _ = dependency;
        Err(UnknownProperty(property.to_string()).into())
    }

    /// Gives back a dependency the container injected earlier
    ///
    /// Used when the container is cleared, to release cyclic graphs.
    fn eject(&mut self, property: &str) -> Option<Instance> {
        let _ = property;
        None
    }

    /// Called once all dependencies are injected, before anyone gets the instance
    ///
    /// Must not borrow the instance itself through its dependencies.
    fn ready(&mut self) -> Result<(), DynError> {
        Ok(())
    }
}

impl Component for String {}

/// Generic component holding named properties
///
/// Useful for recipes which just need a bag of wired instances.
#[derive(Debug, Clone, Default)]
pub struct Bean {
    dependencies: Option<String>,
    properties: BTreeMap<String, Instance>,
}
impl Bean {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dependencies(mut self, dependencies: impl Into<String>) -> Self {
        self.dependencies = Some(dependencies.into());
        self
    }

    /// Sets a property to a new instance of `value`
    pub fn with<T: Component>(self, name: impl Into<String>, value: T) -> Self {
        self.with_instance(name, Instance::new(value))
    }

    pub fn with_instance(mut self, name: impl Into<String>, instance: Instance) -> Self {
        self.properties.insert(name.into(), instance);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Instance> {
        self.properties.get(name)
    }

    pub fn properties(&self) -> impl Iterator<Item = (&str, &Instance)> {
        self.properties
            .iter()
            .map(|(name, instance)| (name.as_str(), instance))
    }
}
impl Component for Bean {
    fn dependencies(&self) -> Option<&str> {
        self.dependencies.as_deref()
    }

    fn is_set(&self, property: &str) -> bool {
        self.properties.contains_key(property)
    }

    fn inject(&mut self, property: &str, dependency: Instance) -> Result<(), DynError> {
        self.properties.insert(property.to_string(), dependency);
        Ok(())
    }

    fn eject(&mut self, property: &str) -> Option<Instance> {
        self.properties.remove(property)
    }
}
