use std::collections::{BTreeMap, HashMap};

use crate::{
    dependencies::{self, Dependency},
    errors::ResolveError,
    factories, lifecycle,
    registration::{Registration, Strategy},
    types::Instance,
};

/// An instance created during a batch
pub(crate) struct Member {
    pub key: String,
    pub instance: Instance,
    pub strategy: Strategy,
    /// Prototype keys this member was created for, itself included
    lineage: Vec<String>,
}

/// A dependency the initiator injected
pub(crate) struct Wiring {
    pub holder: Instance,
    /// Strategy of the holder
    pub strategy: Strategy,
    pub alias: String,
    pub dependency: Instance,
}

/// Instances of a completed batch, ready to be cached and handed out
pub(crate) struct Batch {
    pub members: Vec<Member>,
    pub wirings: Vec<Wiring>,
}

/// Initiates one batch of instances
///
/// Every instance added is created right away, but wiring only starts in
/// [BatchInitiator::initiate], once all of them exist. That way instances of the
/// same batch can reference each other in any direction.
///
/// Dependencies which are registered but not built yet join the batch while it
/// is wired instead of being built recursively.
pub(crate) struct BatchInitiator<'a> {
    registrations: &'a BTreeMap<String, Registration>,
    members: Vec<Member>,
    /// Singleton key -> position in `members`
    singletons: HashMap<String, usize>,
    wirings: Vec<Wiring>,
}
impl<'a> BatchInitiator<'a> {
    pub(crate) fn new(registrations: &'a BTreeMap<String, Registration>) -> Self {
        BatchInitiator {
            registrations,
            members: Vec::new(),
            singletons: HashMap::new(),
            wirings: Vec::new(),
        }
    }

    /// Creates the raw instance of `registration` as part of the batch
    pub(crate) fn add(&mut self, registration: &Registration) -> Result<Instance, ResolveError> {
        if let Some(&index) = self.singletons.get(registration.key()) {
            return Ok(self.members[index].instance.clone());
        }
        self.admit(registration, Vec::new())
    }

    /// Wires all members, then runs their ready hooks
    pub(crate) fn initiate(mut self) -> Result<Batch, ResolveError> {
        let initial = self.members.len();
        tracing::debug!("Initiating batch of {initial} instances");

        if let Err(error) = self.wire_all() {
            tracing::debug!(
                "Batch failed, releasing {} injected dependencies",
                self.wirings.len()
            );
            release(self.wirings.drain(..));
            return Err(error);
        }

        tracing::debug!(
            "Batch complete [{} instances, {} joined while wiring, {} dependencies injected]",
            self.members.len(),
            self.members.len() - initial,
            self.wirings.len()
        );

        Ok(Batch {
            members: self.members,
            wirings: self.wirings,
        })
    }

    fn wire_all(&mut self) -> Result<(), ResolveError> {
        // Members may be appended while wiring
        let mut next = 0;
        while next < self.members.len() {
            self.wire(next)?;
            next += 1;
        }

        for member in &self.members {
            lifecycle::complete(&member.key, &member.instance)?;
        }

        Ok(())
    }

    fn admit(
        &mut self,
        registration: &Registration,
        mut lineage: Vec<String>,
    ) -> Result<Instance, ResolveError> {
        let instance = factories::instantiate(registration)?;
        let key = registration.key().to_string();
        let strategy = registration.strategy();

        match strategy {
            Strategy::Singleton => {
                self.singletons.insert(key.clone(), self.members.len());
            }
            Strategy::Prototype => lineage.push(key.clone()),
        }

        self.members.push(Member {
            key,
            instance: instance.clone(),
            strategy,
            lineage,
        });

        Ok(instance)
    }

    /// Injects all dependencies of member `index`
    fn wire(&mut self, index: usize) -> Result<(), ResolveError> {
        let member = &self.members[index];
        let key = member.key.clone();
        let holder = member.instance.clone();
        let strategy = member.strategy;
        let lineage = member.lineage.clone();

        let spec = holder.borrow().dependencies().map(str::to_owned);

        for Dependency { alias, target } in dependencies::parse(spec.as_deref()) {
            let dependency = self.resolve(&key, &alias, &target, &lineage)?;

            // Repeating a dependency is not a collision
            if self.wirings.iter().any(|wiring| {
                wiring.holder.ptr_eq(&holder)
                    && wiring.alias == alias
                    && wiring.dependency.ptr_eq(&dependency)
            }) {
                continue;
            }

            if holder.borrow().is_set(&alias) {
                tracing::error!("Dependency [{key}.{alias}]->[{target}] would override a set property");
                return Err(ResolveError::PropertyCollision { key, alias, target });
            }

            let injected = holder.borrow_mut().inject(&alias, dependency.clone());
            if let Err(error) = injected {
                tracing::error!("Dependency [{key}.{alias}]->[{target}] was rejected: {error}");
                return Err(ResolveError::InjectFailed {
                    key,
                    alias,
                    target,
                    error,
                });
            }

            tracing::trace!("Injected [{key}.{alias}]->[{target}]");
            self.wirings.push(Wiring {
                holder: holder.clone(),
                strategy,
                alias,
                dependency,
            });
        }

        Ok(())
    }

    /// Finds the instance for `target`: in the batch, in the cache, or by adding it to the batch
    fn resolve(
        &mut self,
        key: &str,
        alias: &str,
        target: &str,
        lineage: &[String],
    ) -> Result<Instance, ResolveError> {
        if let Some(&index) = self.singletons.get(target) {
            return Ok(self.members[index].instance.clone());
        }

        let registrations = self.registrations;
        let Some(registration) = registrations.get(target) else {
            tracing::error!("Dependency [{key}.{alias}]->[{target}] is not registered");
            return Err(ResolveError::UnsatisfiedDependency {
                key: key.to_string(),
                alias: alias.to_string(),
                target: target.to_string(),
            });
        };

        if let Some(cached) = registration.cached() {
            return Ok(cached.clone());
        }

        match registration.strategy() {
            Strategy::Singleton => self.admit(registration, Vec::new()),
            Strategy::Prototype => {
                if lineage.iter().any(|ancestor| ancestor == target) {
                    let mut chain = lineage.to_vec();
                    chain.push(target.to_string());
                    tracing::error!("Prototype '{target}' requires itself through {chain:?}");
                    return Err(ResolveError::PrototypeCycle {
                        key: target.to_string(),
                        chain,
                    });
                }
                self.admit(registration, lineage.to_vec())
            }
        }
    }
}

/// Ejects injected dependencies from their holders again
///
/// Breaks the reference cycles wiring created, so the instances can be dropped.
pub(crate) fn release(wirings: impl IntoIterator<Item = Wiring>) {
    for wiring in wirings {
        match wiring.holder.try_borrow_mut() {
            Ok(mut component) => {
                component.eject(&wiring.alias);
            }
            Err(_) => tracing::warn!(
                "Could not eject '{}' from a borrowed {}",
                wiring.alias,
                wiring.holder.info.type_name
            ),
        }
    }
}
