use crate::{errors::ResolveError, types::Instance};

/// Runs the ready hook of a fully wired instance
pub(crate) fn complete(key: &str, instance: &Instance) -> Result<(), ResolveError> {
    tracing::trace!("Invoking ready hook of '{key}'");

    instance.borrow_mut().ready().map_err(|error| {
        tracing::error!("Ready hook of '{key}' failed: {error}");
        ResolveError::LifecycleFailed {
            key: key.to_string(),
            error,
        }
    })
}
