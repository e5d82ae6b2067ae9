use std::{
    any::{Any, TypeId},
    cell::{BorrowError, BorrowMutError, Ref, RefCell, RefMut},
    collections::BTreeMap,
    fmt::Debug,
    rc::Rc,
};

use crate::{component::Component, errors::ParamError};

/// Errors raised by recipes and components
pub type DynError = Box<dyn std::error::Error + Send + Sync>;

/// Handle to an object built by the container
///
/// Cloning the handle shares the object. Two handles compare equal when they
/// point at the same allocation, never by value.
#[derive(Clone)]
pub struct Instance {
    pub info: TypeInfo,
    inner: Rc<RefCell<dyn Component>>,
}

impl Instance {
    pub fn new<T: Component>(component: T) -> Self {
        let inner: Rc<RefCell<dyn Component>> = Rc::new(RefCell::new(component));
        Instance {
            info: TypeInfo::of::<T>(),
            inner,
        }
    }

    /// Whether both handles refer to the same object
    pub fn ptr_eq(&self, other: &Instance) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn is<T: Component>(&self) -> bool {
        self.info.type_id == TypeId::of::<T>()
    }

    /// Borrows the object as `T`
    ///
    /// Returns `None` if the object is of another type.
    ///
    /// ### Panics
    /// If the object is currently borrowed mutably
    pub fn downcast_ref<T: Component>(&self) -> Option<Ref<'_, T>> {
        Ref::filter_map(self.inner.borrow(), |component| {
            component.as_any().downcast_ref::<T>()
        })
        .ok()
    }

    /// Mutably borrows the object as `T`
    ///
    /// ### Panics
    /// If the object is currently borrowed
    pub fn downcast_mut<T: Component>(&self) -> Option<RefMut<'_, T>> {
        RefMut::filter_map(self.inner.borrow_mut(), |component| {
            component.as_any_mut().downcast_mut::<T>()
        })
        .ok()
    }

    /// Borrows the object as `T`, failing instead of panicking on a borrow conflict
    ///
    /// Walking a cyclic graph from a ready hook reaches the hook's own instance,
    /// which is mutably borrowed at that time.
    pub fn try_downcast_ref<T: Component>(&self) -> Result<Option<Ref<'_, T>>, BorrowError> {
        let component = self.inner.try_borrow()?;
        Ok(Ref::filter_map(component, |component| component.as_any().downcast_ref::<T>()).ok())
    }

    /// Mutably borrows the object as `T`, failing instead of panicking on a borrow conflict
    pub fn try_downcast_mut<T: Component>(&self) -> Result<Option<RefMut<'_, T>>, BorrowMutError> {
        let component = self.inner.try_borrow_mut()?;
        Ok(
            RefMut::filter_map(component, |component| component.as_any_mut().downcast_mut::<T>())
                .ok(),
        )
    }

    pub(crate) fn borrow(&self) -> Ref<'_, dyn Component> {
        self.inner.borrow()
    }

    pub(crate) fn borrow_mut(&self) -> RefMut<'_, dyn Component> {
        self.inner.borrow_mut()
    }

    pub(crate) fn try_borrow_mut(&self) -> Result<RefMut<'_, dyn Component>, BorrowMutError> {
        self.inner.try_borrow_mut()
    }
}
impl PartialEq for Instance {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}
impl Eq for Instance {}
impl Debug for Instance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Instance")
            .field("type", &self.info.type_name)
            .field("at", &Rc::as_ptr(&self.inner).cast::<()>())
            .finish()
    }
}

/// Type Name and Type Id
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct TypeInfo {
    pub type_name: &'static str,
    pub type_id: TypeId,
}
impl std::fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.type_name)
    }
}
impl TypeInfo {
    pub fn of<T: 'static + ?Sized>() -> TypeInfo {
        TypeInfo {
            type_name: std::any::type_name::<T>(),
            type_id: TypeId::of::<T>(),
        }
    }
}

/// A single argument value
///
/// Arguments are stored once at registration and handed to every invocation
/// of the recipe, so cloning an `Arg` shares the value instead of copying it.
#[derive(Clone)]
pub struct Arg {
    info: TypeInfo,
    value: Rc<dyn Any>,
}
impl Arg {
    pub fn new<T: 'static>(value: T) -> Self {
        Arg {
            info: TypeInfo::of::<T>(),
            value: Rc::new(value),
        }
    }

    pub fn get<T: 'static>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    pub fn type_name(&self) -> &'static str {
        self.info.type_name
    }

    /// Whether both arguments share the same value
    pub fn ptr_eq(&self, other: &Arg) -> bool {
        Rc::ptr_eq(&self.value, &other.value)
    }
}
impl Debug for Arg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Arg").field(&self.info.type_name).finish()
    }
}
impl From<&str> for Arg {
    fn from(value: &str) -> Self {
        Arg::new(value.to_string())
    }
}
impl From<String> for Arg {
    fn from(value: String) -> Self {
        Arg::new(value)
    }
}
impl From<bool> for Arg {
    fn from(value: bool) -> Self {
        Arg::new(value)
    }
}
impl From<i64> for Arg {
    fn from(value: i64) -> Self {
        Arg::new(value)
    }
}
impl From<f64> for Arg {
    fn from(value: f64) -> Self {
        Arg::new(value)
    }
}
impl From<Options> for Arg {
    fn from(value: Options) -> Self {
        Arg::new(value)
    }
}

/// Named options, handed to a recipe as one argument
#[derive(Clone, Debug, Default)]
pub struct Options(BTreeMap<String, Arg>);
impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Arg>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Arg>) -> Option<Arg> {
        self.0.insert(name.into(), value.into())
    }

    pub fn arg(&self, name: &str) -> Option<&Arg> {
        self.0.get(name)
    }

    pub fn get<T: 'static>(&self, name: &str) -> Option<&T> {
        self.0.get(name).and_then(Arg::get::<T>)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arg)> {
        self.0.iter().map(|(name, arg)| (name.as_str(), arg))
    }
}

/// Arguments of a registration
///
/// The shape is fixed when registering and decides how the recipe is invoked,
/// see [Arguments::to_params].
#[derive(Clone, Debug, Default)]
pub enum Arguments {
    /// Invoke without arguments
    #[default]
    None,
    /// Invoke with this value as the only argument
    Scalar(Arg),
    /// Invoke with every element as a separate positional argument
    Positional(Vec<Arg>),
    /// Invoke with the options as a single argument
    Named(Options),
}
impl Arguments {
    pub fn scalar(value: impl Into<Arg>) -> Self {
        Arguments::Scalar(value.into())
    }

    pub fn positional(args: impl IntoIterator<Item = Arg>) -> Self {
        Arguments::Positional(args.into_iter().collect())
    }

    pub fn named(options: Options) -> Self {
        Arguments::Named(options)
    }

    /// Spreads the arguments into the positional list a recipe is invoked with
    pub fn to_params(&self) -> Params {
        match self {
            Arguments::None => Params(Vec::new()),
            Arguments::Scalar(arg) => Params(vec![arg.clone()]),
            Arguments::Positional(args) => Params(args.clone()),
            Arguments::Named(options) => Params(vec![Arg::new(options.clone())]),
        }
    }
}
impl From<()> for Arguments {
    fn from(_: ()) -> Self {
        Arguments::None
    }
}
impl From<Arg> for Arguments {
    fn from(value: Arg) -> Self {
        Arguments::Scalar(value)
    }
}
impl From<&str> for Arguments {
    fn from(value: &str) -> Self {
        Arguments::scalar(value)
    }
}
impl From<String> for Arguments {
    fn from(value: String) -> Self {
        Arguments::scalar(value)
    }
}
impl From<Vec<Arg>> for Arguments {
    fn from(value: Vec<Arg>) -> Self {
        Arguments::Positional(value)
    }
}
impl From<Options> for Arguments {
    fn from(value: Options) -> Self {
        Arguments::Named(value)
    }
}

/// Positional arguments of a single invocation
#[derive(Clone, Debug, Default)]
pub struct Params(Vec<Arg>);
impl Params {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn arg(&self, index: usize) -> Option<&Arg> {
        self.0.get(index)
    }

    /// Returns argument `index` if present and of type `T`
    pub fn get<T: 'static>(&self, index: usize) -> Option<&T> {
        self.0.get(index).and_then(Arg::get::<T>)
    }

    /// Like [Params::get], but explains what is wrong
    pub fn require<T: 'static>(&self, index: usize) -> Result<&T, ParamError> {
        let arg = self.0.get(index).ok_or(ParamError::Missing(index))?;
        arg.get::<T>().ok_or_else(|| ParamError::WrongType {
            index,
            expected: std::any::type_name::<T>(),
            actual: arg.type_name(),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arg> {
        self.0.iter()
    }
}
