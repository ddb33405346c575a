// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scenario harness driving a managed resource against the fake remote
//!
//! The harness plays the orchestration engine's role from the engine's point
//! of view: it parses nothing and speaks no wire protocol, but it does
//! everything else the real caller would — it distinguishes "removed after
//! having been set" from "never set" using the desired state stored by the
//! last apply, runs the post-apply consistency check, and folds refreshed
//! observations back into stored state.
//!
//! Every remote object the harness creates is tracked and deleted when the
//! harness is dropped, whether the test passed or failed.  Tests never
//! register cleanup anywhere else.

use crate::remote::FakeRemote;
use crate::remote::RemoteObjectId;
use anyhow::anyhow;
use anyhow::bail;
use anyhow::Context;
use anyhow::Result;
use netdoc_reconciler::consistency::check_resource_consistency;
use netdoc_reconciler::planner::Planner;
use netdoc_reconciler::report::ResourcePlan;
use netdoc_reconciler::switches::ReconcilerSwitches;
use netdoc_types::schema::ResourceSchema;
use netdoc_types::value::AttrValue;
use netdoc_types::value::DesiredValue;
use slog::info;
use slog::o;
use slog::Logger;
use std::collections::BTreeMap;

/// Builds a configuration map from attribute/value pairs.
pub fn config(
    pairs: &[(&str, DesiredValue)],
) -> BTreeMap<String, DesiredValue> {
    pairs
        .iter()
        .map(|(name, desired)| (String::from(*name), desired.clone()))
        .collect()
}

/// State the harness stores for the resource under management
#[derive(Debug, Clone)]
pub struct ManagedResource {
    pub id: RemoteObjectId,

    /// desired state recorded by the last apply
    pub desired: BTreeMap<String, DesiredValue>,

    /// computed values recorded by the last apply or refresh
    pub computed: BTreeMap<String, AttrValue>,
}

pub struct ScenarioHarness {
    log: Logger,
    remote: FakeRemote,
    schema: ResourceSchema,
    switches: ReconcilerSwitches,
    resource: Option<ManagedResource>,
    created: Vec<RemoteObjectId>,
}

impl ScenarioHarness {
    pub fn new(
        log: &Logger,
        schema: ResourceSchema,
        switches: ReconcilerSwitches,
    ) -> ScenarioHarness {
        let log = log.new(o!(
            "component" => "scenario-harness",
            "resource_type" => schema.resource_type().to_string(),
        ));
        ScenarioHarness {
            log,
            remote: FakeRemote::new(),
            schema,
            switches,
            resource: None,
            created: Vec::new(),
        }
    }

    pub fn remote(&self) -> &FakeRemote {
        &self.remote
    }

    pub fn remote_mut(&mut self) -> &mut FakeRemote {
        &mut self.remote
    }

    pub fn resource(&self) -> Option<&ManagedResource> {
        self.resource.as_ref()
    }

    /// Returns the computed value last recorded for `attribute`.
    pub fn computed(&self, attribute: &str) -> Option<&AttrValue> {
        self.resource.as_ref().and_then(|r| r.computed.get(attribute))
    }

    /// Returns the desired value last stored for `attribute`.
    pub fn desired(&self, attribute: &str) -> &DesiredValue {
        self.resource
            .as_ref()
            .and_then(|r| r.desired.get(attribute))
            .unwrap_or(&DesiredValue::Absent)
    }

    fn planner(&self) -> Planner<'_> {
        Planner::new(&self.log, &self.schema, self.switches)
    }

    /// Computes the plan for `config` without applying it.
    pub fn plan(
        &self,
        config: &BTreeMap<String, DesiredValue>,
    ) -> Result<ResourcePlan> {
        let planner = self.planner();
        match &self.resource {
            None => planner.plan_create(config).context("planning create"),
            Some(resource) => {
                let observed = &self.remote.get(resource.id)?.attributes;
                planner
                    .plan_update(&resource.desired, observed, config)
                    .context("planning update")
            }
        }
    }

    /// Plans and applies `config`, then reads the result back, checks it
    /// against the plan's promises, and stores the reconciled state.
    pub fn apply(
        &mut self,
        config: &BTreeMap<String, DesiredValue>,
    ) -> Result<ResourcePlan> {
        let plan = self.plan(config)?;
        let id = match &self.resource {
            None => {
                let id = self.remote.create(&self.schema, plan.writes())?;
                self.created.push(id);
                info!(self.log, "created remote object"; "id" => id);
                id
            }
            Some(resource) => {
                self.remote.update(resource.id, plan.writes())?;
                info!(
                    self.log, "updated remote object";
                    "id" => resource.id,
                    "writes" => plan.writes().len(),
                );
                resource.id
            }
        };

        let observed = self.remote.get(id)?.attributes.clone();
        check_resource_consistency(plan.writes(), &observed)?;

        self.resource = Some(self.reconciled(id, config, &observed)?);
        Ok(plan)
    }

    /// Re-reads the remote object and folds the observation into stored
    /// state, without changing the configuration.
    pub fn refresh(&mut self) -> Result<()> {
        let resource = self
            .resource
            .as_ref()
            .ok_or_else(|| anyhow!("no resource under management"))?;
        let id = resource.id;
        let desired = resource.desired.clone();
        let observed = self.remote.get(id)?.attributes.clone();
        self.resource = Some(self.reconciled(id, &desired, &observed)?);
        Ok(())
    }

    /// Adopts an existing remote object into managed state, as an import
    /// does: every attribute starts unconfigured, with the observed values
    /// as computed state.
    pub fn import(&mut self, id: RemoteObjectId) -> Result<()> {
        let object = self.remote.get(id)?;
        if object.resource_type != self.schema.resource_type() {
            bail!(
                "cannot import a {} as a {}",
                object.resource_type,
                self.schema.resource_type(),
            );
        }
        let observed = object.attributes.clone();
        self.resource =
            Some(self.reconciled(id, &BTreeMap::new(), &observed)?);
        info!(self.log, "imported remote object"; "id" => id);
        Ok(())
    }

    /// Deletes the managed resource.
    pub fn destroy(&mut self) -> Result<()> {
        let resource = self
            .resource
            .take()
            .ok_or_else(|| anyhow!("no resource under management"))?;
        self.remote.delete(resource.id)?;
        self.created.retain(|id| *id != resource.id);
        info!(self.log, "destroyed remote object"; "id" => resource.id);
        Ok(())
    }

    /// Mutates an attribute of the managed resource behind the engine's
    /// back.
    pub fn inject_drift(
        &mut self,
        attribute: &str,
        value: AttrValue,
    ) -> Result<()> {
        let resource = self
            .resource
            .as_ref()
            .ok_or_else(|| anyhow!("no resource under management"))?;
        self.remote.set_out_of_band(resource.id, attribute, value)
    }

    fn reconciled(
        &self,
        id: RemoteObjectId,
        config: &BTreeMap<String, DesiredValue>,
        observed: &BTreeMap<String, AttrValue>,
    ) -> Result<ManagedResource> {
        let planner = self.planner();
        let mut desired = BTreeMap::new();
        let mut computed = BTreeMap::new();
        for declaration in self.schema.attributes() {
            let configured = config
                .get(&declaration.name)
                .unwrap_or(&DesiredValue::Absent);
            let value = observed.get(&declaration.name).ok_or_else(|| {
                anyhow!("remote object {} lacks {}", id, declaration.name)
            })?;
            let outcome = planner.reconcile_on_refresh(
                declaration,
                configured,
                value,
            )?;
            if !outcome.desired.is_absent() {
                desired.insert(declaration.name.clone(), outcome.desired);
            }
            computed.insert(declaration.name.clone(), outcome.computed);
        }
        Ok(ManagedResource { id, desired, computed })
    }
}

impl Drop for ScenarioHarness {
    fn drop(&mut self) {
        // Deterministic release of everything this harness created,
        // success or failure.
        for id in std::mem::take(&mut self.created) {
            if self.remote.exists(id) {
                if let Err(error) = self.remote.delete(id) {
                    info!(
                        self.log, "cleanup failed";
                        "id" => id,
                        "error" => %error,
                    );
                }
            }
        }
    }
}
