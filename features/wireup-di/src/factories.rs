use std::{any::type_name, fmt::Debug, rc::Rc};

use crate::{
    component::{Bean, Component},
    errors::ResolveError,
    registration::{Factory, Registration},
    types::{DynError, Instance, Options, Params, TypeInfo},
};

/// A type which can be built from invocation params
pub trait Construct: Component + Sized {
    /// Builds a new instance
    ///
    /// Returns an error if the params do not fit or construction failed
    fn construct(params: &Params) -> Result<Self, DynError>;
}

impl Construct for String {
    fn construct(params: &Params) -> Result<Self, DynError> {
        match params.arg(0) {
            None => Ok(String::new()),
            Some(_) => Ok(params.require::<String>(0)?.clone()),
        }
    }
}

impl Construct for Bean {
    /// Accepts an optional options argument, whose `dependencies` entry becomes the dependency spec
    fn construct(params: &Params) -> Result<Self, DynError> {
        let dependencies = params
            .get::<Options>(0)
            .and_then(|options| options.get::<String>("dependencies"));

        Ok(match dependencies {
            Some(dependencies) => Bean::new().with_dependencies(dependencies.clone()),
            None => Bean::new(),
        })
    }
}

type ConstructFn = fn(&Params) -> Result<Instance, DynError>;
type CallFn = Rc<dyn Fn(&Params) -> Result<Instance, DynError>>;

/// Recipe of a registration
#[derive(Clone)]
pub enum Target {
    /// A constructible type
    Type { info: TypeInfo, construct: ConstructFn },
    /// A plain function, its return value is the instance
    Function { name: &'static str, call: CallFn },
}
impl Target {
    pub fn of<T: Construct>() -> Self {
        Target::Type {
            info: TypeInfo::of::<T>(),
            construct: construct_erased::<T>,
        }
    }

    pub fn function<F, R>(function: F) -> Self
    where
        F: Fn(&Params) -> Result<R, DynError> + 'static,
        R: Component,
    {
        Target::Function {
            name: type_name::<F>(),
            call: Rc::new(move |params: &Params| function(params).map(Instance::new)),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Target::Type { info, .. } => info.type_name,
            Target::Function { name, .. } => name,
        }
    }
}
impl Debug for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Target::Type { info, .. } => f.debug_tuple("Type").field(&info.type_name).finish(),
            Target::Function { name, .. } => f.debug_tuple("Function").field(name).finish(),
        }
    }
}

fn construct_erased<T: Construct>(params: &Params) -> Result<Instance, DynError> {
    T::construct(params).map(Instance::new)
}

/// Creates the raw instance of a registration
///
/// Does not look at dependencies, the instance is returned unwired.
pub(crate) fn instantiate(registration: &Registration) -> Result<Instance, ResolveError> {
    let key = registration.key();
    let params = registration.arguments().to_params();

    let result = match (registration.factory(), registration.target()) {
        // A constructor is also a plain function
        (_, Target::Type { construct, .. }) => construct(&params),
        (Factory::Function, Target::Function { call, .. }) => call(&params),
        (Factory::Constructor, Target::Function { .. }) => {
            tracing::error!("Tried to construct plain function '{key}'");
            return Err(ResolveError::NotConstructible(key.to_string()));
        }
    };

    match result {
        Ok(instance) => {
            tracing::trace!(
                "Instantiated '{key}' as {} with {} params",
                instance.info.type_name,
                params.len()
            );
            Ok(instance)
        }
        Err(error) => {
            tracing::error!("Factory for '{key}' failed: {error}");
            Err(ResolveError::FactoryFailed {
                key: key.to_string(),
                error,
            })
        }
    }
}
