//! Components used to exercise the container

#![allow(dead_code)]

use std::{cell::Cell, rc::Rc};

use wireup_di::{
    Bean, Component, Construct, DynError, Instance, Options, Params, UnknownProperty,
};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Returns the property `name` of a [Bean] instance
pub fn property(instance: &Instance, name: &str) -> Instance {
    instance
        .downcast_ref::<Bean>()
        .and_then(|bean| bean.get(name).cloned())
        .unwrap_or_else(|| panic!("property '{name}' is not wired"))
}

#[derive(Debug, Default)]
pub struct Address;
impl Component for Address {}
impl Construct for Address {
    fn construct(_: &Params) -> Result<Self, DynError> {
        Ok(Address)
    }
}

#[derive(Debug, Default)]
pub struct CreditCard {
    pub address: Option<Instance>,
}
impl Component for CreditCard {
    fn dependencies(&self) -> Option<&str> {
        Some("address")
    }

    fn is_set(&self, property: &str) -> bool {
        property == "address" && self.address.is_some()
    }

    fn inject(&mut self, property: &str, dependency: Instance) -> Result<(), DynError> {
        match property {
            "address" => self.address = Some(dependency),
            other => return Err(UnknownProperty(other.to_string()).into()),
        }
        Ok(())
    }

    fn eject(&mut self, property: &str) -> Option<Instance> {
        match property {
            "address" => self.address.take(),
            _ => None,
        }
    }
}
impl Construct for CreditCard {
    fn construct(_: &Params) -> Result<Self, DynError> {
        Ok(CreditCard::default())
    }
}

#[derive(Debug, Clone, Default)]
pub struct Profile {
    name: String,
    job: String,
    pub address: Option<Instance>,
    pub personal_credit_card: Option<Instance>,
    pub out: Option<String>,
}
impl Profile {
    pub fn new(name: &str, job: &str) -> Self {
        Profile {
            name: name.to_string(),
            job: job.to_string(),
            ..Default::default()
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        match field {
            "name" => Some(&self.name),
            "job" => Some(&self.job),
            _ => None,
        }
    }

    pub fn check_dependencies(&self) -> bool {
        self.address.is_some() && self.personal_credit_card.is_some()
    }
}
impl Component for Profile {
    fn dependencies(&self) -> Option<&str> {
        Some("address, personalCreditCard = creditCard")
    }

    fn is_set(&self, property: &str) -> bool {
        match property {
            "address" => self.address.is_some(),
            "personalCreditCard" => self.personal_credit_card.is_some(),
            _ => false,
        }
    }

    fn inject(&mut self, property: &str, dependency: Instance) -> Result<(), DynError> {
        match property {
            "address" => self.address = Some(dependency),
            "personalCreditCard" => self.personal_credit_card = Some(dependency),
            other => return Err(UnknownProperty(other.to_string()).into()),
        }
        Ok(())
    }

    fn ready(&mut self) -> Result<(), DynError> {
        self.out = Some("ready".to_string());
        Ok(())
    }
}
impl Construct for Profile {
    fn construct(params: &Params) -> Result<Self, DynError> {
        let Some(options) = params.get::<Options>(0) else {
            return Ok(Profile::default());
        };
        let field = |name: &str| options.get::<String>(name).cloned().unwrap_or_default();

        Ok(Profile {
            name: field("name"),
            job: field("job"),
            ..Default::default()
        })
    }
}

pub type Comparator = Rc<dyn Fn(&Profile) -> String>;

/// Sorted collection of profiles
pub struct Profiles {
    items: Vec<Profile>,
    pub comparator: Option<Comparator>,
}
impl Profiles {
    pub fn pop(&mut self) -> Option<Profile> {
        self.items.pop()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}
impl Component for Profiles {}
impl Construct for Profiles {
    /// Takes the initial profiles, then options with an optional `comparator`
    fn construct(params: &Params) -> Result<Self, DynError> {
        let mut items = params.require::<Vec<Profile>>(0)?.clone();
        let comparator = params
            .get::<Options>(1)
            .and_then(|options| options.get::<Comparator>("comparator"))
            .cloned();

        if let Some(comparator) = &comparator {
            items.sort_by_key(|profile| comparator(profile));
        }

        Ok(Profiles { items, comparator })
    }
}

/// Counts how often its ready hook ran
pub struct Tracked {
    pub dependencies: Option<String>,
    pub other: Option<Instance>,
    pub calls: Rc<Cell<usize>>,
}
impl Component for Tracked {
    fn dependencies(&self) -> Option<&str> {
        self.dependencies.as_deref()
    }

    fn is_set(&self, _: &str) -> bool {
        self.other.is_some()
    }

    fn inject(&mut self, _: &str, dependency: Instance) -> Result<(), DynError> {
        self.other = Some(dependency);
        Ok(())
    }

    fn ready(&mut self) -> Result<(), DynError> {
        self.calls.set(self.calls.get() + 1);
        Ok(())
    }
}

/// Property bag counting how often it was dropped
pub struct Counted {
    bean: Bean,
    drops: Rc<Cell<usize>>,
}
impl Counted {
    pub fn new(dependencies: &str, drops: &Rc<Cell<usize>>) -> Self {
        Counted {
            bean: Bean::new().with_dependencies(dependencies),
            drops: drops.clone(),
        }
    }
}
impl Drop for Counted {
    fn drop(&mut self) {
        self.drops.set(self.drops.get() + 1);
    }
}
impl Component for Counted {
    fn dependencies(&self) -> Option<&str> {
        self.bean.dependencies()
    }

    fn is_set(&self, property: &str) -> bool {
        self.bean.is_set(property)
    }

    fn inject(&mut self, property: &str, dependency: Instance) -> Result<(), DynError> {
        self.bean.inject(property, dependency)
    }

    fn eject(&mut self, property: &str) -> Option<Instance> {
        self.bean.eject(property)
    }
}

/// Refuses to become ready
pub struct Unready;
impl Component for Unready {
    fn ready(&mut self) -> Result<(), DynError> {
        Err("not ready".into())
    }
}
