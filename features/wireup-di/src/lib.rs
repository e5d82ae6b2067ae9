//! Wireup is a keyed inversion of control container.
//!
//! Recipes are registered under string keys and built on demand. Instances
//! declare what they need through a dependency spec and get those dependencies
//! injected into named properties, cycles included.
//!
//! Wireup consists of the following parts:
//!
//! 1. [Context] - registry of recipes and cache of built singletons
//! 2. [Target] and [Arguments] - what a recipe invokes and how
//! 3. [Component] - the contract instances fulfill to get wired and to be told when they are ready
//! 4. Errors - [ResolveError] for everything that can go wrong while building
//!
//! # Example
//!
//! ```rust
//! use wireup_di::{create_context, Bean, Factory, Options, Strategy, Target};
//!
//! let mut ctx = create_context();
//! ctx.register_with("greeting", Target::of::<String>(), "hello");
//! ctx.register_with(
//!     "holder",
//!     Target::of::<Bean>(),
//!     Options::new().with("dependencies", "text = greeting"),
//! );
//! ctx.register("scratch", Target::function(|_| Ok(Bean::new())))
//!     .factory(Factory::Function)
//!     .strategy(Strategy::Prototype);
//! ctx.initialize().unwrap();
//!
//! let holder = ctx.get("holder").unwrap();
//! let greeting = ctx.get("greeting").unwrap();
//! assert_eq!(holder.downcast_ref::<Bean>().unwrap().get("text"), Some(&greeting));
//! assert_ne!(ctx.get("scratch").unwrap(), ctx.get("scratch").unwrap());
//! ```

pub mod builder;
pub mod component;
pub mod container;
pub mod dependencies;
pub mod errors;
pub mod factories;
mod initiator;
mod lifecycle;
pub mod registration;
pub mod types;

pub use builder::{ContextBuilder, ContextOptions};
pub use component::{Bean, Component};
pub use container::{create_context, Context, ContextState};
pub use errors::{ParamError, ResolveError, UnknownProperty};
pub use factories::{Construct, Target};
pub use registration::{Factory, Registration, RegistrationHandle, Strategy};
pub use types::{Arg, Arguments, DynError, Instance, Options, Params, TypeInfo};

/// Version of this crate, `<major>.<minor>.<patch>`
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Whether `version` has the form `<major>.<minor>.<patch>` with numeric parts
pub fn is_semver(version: &str) -> bool {
    let parts: Vec<&str> = version.split('.').collect();
    parts.len() == 3
        && parts
            .iter()
            .all(|part| !part.is_empty() && part.bytes().all(|byte| byte.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_semver() {
        assert!(is_semver(VERSION));
    }

    #[test]
    fn rejects_malformed_versions() {
        for version in ["", "1", "1.2", "1.2.3.4", "1.2.x", "1..3", "v1.2.3", "1.2.3-beta"] {
            assert!(!is_semver(version), "{version} accepted");
        }
        assert!(is_semver("10.0.42"));
    }
}
