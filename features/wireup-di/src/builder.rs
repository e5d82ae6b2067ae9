use crate::container::Context;

/// Options of a [Context]
#[derive(Debug, Clone)]
pub struct ContextOptions {
    /// Whether registering a known key replaces the registration
    pub allow_override: bool,
}
impl Default for ContextOptions {
    fn default() -> Self {
        ContextOptions {
            allow_override: true,
        }
    }
}

/// Configures a [Context] before creating it
#[derive(Debug, Clone, Default)]
pub struct ContextBuilder {
    options: ContextOptions,
}
impl ContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether registering an already registered key replaces it (default)
    ///
    /// If disabled, the next `initialize` or `get` fails with
    /// `ResolveError::DuplicateRegistration` until the context is cleared.
    pub fn allow_override(mut self, allow_override: bool) -> Self {
        self.options.allow_override = allow_override;
        self
    }

    pub fn build(self) -> Context {
        Context::with_options(self.options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{errors::ResolveError, factories::Target};

    #[test]
    fn overrides_by_default() {
        let mut ctx = ContextBuilder::new().build();
        ctx.register_with("key", Target::of::<String>(), "first");
        ctx.register_with("key", Target::of::<String>(), "second");

        let instance = ctx.get("key").unwrap();
        assert_eq!(*instance.downcast_ref::<String>().unwrap(), "second");
    }

    #[test]
    fn duplicates_fail_without_override() {
        let mut ctx = ContextBuilder::new().allow_override(false).build();
        ctx.register_with("key", Target::of::<String>(), "first");
        ctx.register_with("key", Target::of::<String>(), "second");

        let err = ctx.initialize().unwrap_err();
        assert!(matches!(&err, ResolveError::DuplicateRegistration(key) if key == "key"));
        assert!(matches!(
            ctx.get("key"),
            Err(ResolveError::DuplicateRegistration(_))
        ));

        // Clearing forgets about the duplicate
        ctx.clear();
        ctx.register_with("key", Target::of::<String>(), "third");
        ctx.initialize().unwrap();
    }
}
