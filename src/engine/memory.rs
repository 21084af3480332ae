//! In-process engine.
//!
//! Accepts every well-formed declaration, hands out deterministic ids and
//! records the result as a [`Plan`]. Used for previews and as the
//! fault-injectable collaborator in tests.

use super::{Engine, EngineError, Registered, MAIN_ROUTE_TABLE_ID};
use crate::models::ResourceSpec;
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One accepted declaration.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PlannedResource {
    pub name: String,
    pub id: String,
    pub kind: String,
    pub spec: ResourceSpec,
}

/// Everything an engine run accepted, in registration order.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Plan {
    pub resources: Vec<PlannedResource>,
    pub outputs: BTreeMap<String, String>,
}

impl Plan {
    pub fn find(&self, name: &str) -> Option<&PlannedResource> {
        self.resources.iter().find(|r| r.name == name)
    }

    /// Resources whose short kind matches, e.g. `"Subnet"`.
    pub fn of_kind<'a>(&'a self, short_kind: &'a str) -> impl Iterator<Item = &'a PlannedResource> {
        self.resources
            .iter()
            .filter(move |r| r.spec.short_kind() == short_kind)
    }

    pub fn count(&self, short_kind: &str) -> usize {
        self.of_kind(short_kind).count()
    }
}

#[derive(Debug, Default)]
pub struct MemoryEngine {
    plan: Plan,
    counter: u32,
    fail_on: Option<(String, String)>,
    attempts: Vec<String>,
}

impl MemoryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the registration of `name` fail with `detail`.
    pub fn fail_on(mut self, name: &str, detail: &str) -> Self {
        self.fail_on = Some((name.to_string(), detail.to_string()));
        self
    }

    /// Names of every `register` call, including a failed one.
    pub fn attempts(&self) -> &[String] {
        &self.attempts
    }

    pub fn plan(&self) -> &Plan {
        &self.plan
    }

    pub fn into_plan(self) -> Plan {
        self.plan
    }

    fn next_id(&mut self, prefix: &str) -> String {
        self.counter += 1;
        format!("{prefix}-{:08x}", self.counter)
    }
}

impl Engine for MemoryEngine {
    fn register(&mut self, name: &str, spec: &ResourceSpec) -> Result<Registered, EngineError> {
        self.attempts.push(name.to_string());
        log::trace!("register {} {}", spec.kind(), name.on_blue());

        if let Some((fail_name, detail)) = &self.fail_on {
            if fail_name == name {
                log::warn!("{failed} injected for {name}", failed = "failure".on_red());
                return Err(EngineError::registration(name, detail.clone()));
            }
        }
        if self.plan.find(name).is_some() {
            return Err(EngineError::registration(
                name,
                format!("duplicate resource name for {}", spec.kind()),
            ));
        }

        let registered = match spec {
            ResourceSpec::KeyPair(args) if args.public_key.trim().is_empty() => {
                return Err(EngineError::registration(name, "public key is empty"));
            }
            // Tags have no id of their own; AWS reports "<resource>,<key>".
            ResourceSpec::Tag(args) => {
                Registered::new(format!("{},{}", args.resource_id, args.key))
            }
            ResourceSpec::Vpc(_) => {
                let id = self.next_id(spec.id_prefix());
                let main_table = self.next_id("rtb");
                Registered::new(id).with_output(MAIN_ROUTE_TABLE_ID, main_table)
            }
            _ => Registered::new(self.next_id(spec.id_prefix())),
        };

        log::debug!("registered {name} => {}", registered.id);
        self.plan.resources.push(PlannedResource {
            name: name.to_string(),
            id: registered.id.clone(),
            kind: spec.kind().to_string(),
            spec: spec.clone(),
        });
        Ok(registered)
    }

    fn export(&mut self, name: &str, value: &str) -> Result<(), EngineError> {
        if self.plan.outputs.contains_key(name) {
            return Err(EngineError::export(name, "output already exported"));
        }
        log::debug!("export {name} = {value}");
        self.plan.outputs.insert(name.to_string(), value.to_string());
        Ok(())
    }
}
