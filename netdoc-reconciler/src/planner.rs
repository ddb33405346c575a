// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Plan computation for default-reconciling attributes
//!
//! The three operations here are pure decision functions: given an attribute
//! declaration and a transition between desired-value states, they compute
//! what the remote system should be asked to do and whether the transition
//! is user-visible.  Any observed value handed in is treated as
//! authoritative; fetching it (and all failure modes of doing so) is the
//! caller's concern.

use crate::report::ResourcePlan;
use crate::switches::ReconcilerSwitches;
use netdoc_types::schema::AttributeDeclaration;
use netdoc_types::schema::ResourceSchema;
use netdoc_types::value::AttrValue;
use netdoc_types::value::DesiredValue;
use netdoc_types::value::ValueKind;
use slog::debug;
use slog::o;
use slog::Logger;
use std::collections::BTreeMap;

#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error(
        "attribute {attribute}: expected a {expected} value, got a {actual}"
    )]
    KindMismatch {
        attribute: String,
        expected: ValueKind,
        actual: ValueKind,
    },
    #[error("resource type {resource_type} has no attribute {attribute}")]
    UnknownAttribute { resource_type: String, attribute: String },
    #[error("no observed value supplied for attribute {attribute}")]
    MissingObservation { attribute: String },
}

/// What the remote system should be asked to do for one attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannedAction {
    /// Write this value.
    Set(AttrValue),

    /// Leave the attribute alone.
    NoOp,
}

/// Plan for one attribute, including whether to surface it as a change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributePlan {
    pub action: PlannedAction,

    /// whether the transition is shown to the user as a diff
    pub diff_visible: bool,
}

/// Outcome of reconciling one attribute against a refreshed observation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshOutcome {
    /// desired state to store back; stays `Absent` when the attribute was
    /// never configured
    pub desired: DesiredValue,

    /// computed value recorded for the attribute
    pub computed: AttrValue,

    /// the observed value, when it moved away from what was last applied
    pub drift: Option<AttrValue>,

    /// whether the next plan should propose a change
    pub plan_diff: bool,
}

/// Computes plans and refresh outcomes for one resource schema
///
/// The planner is stateless apart from its configuration: every operation
/// takes the desired and observed values explicitly, so instances for
/// different resources can be evaluated in parallel with no coordination.
pub struct Planner<'a> {
    log: Logger,
    schema: &'a ResourceSchema,
    switches: ReconcilerSwitches,
}

impl<'a> Planner<'a> {
    pub fn new(
        log: &Logger,
        schema: &'a ResourceSchema,
        switches: ReconcilerSwitches,
    ) -> Planner<'a> {
        let log = log.new(o!(
            "component" => "planner",
            "resource_type" => schema.resource_type().to_string(),
        ));
        Planner { log, schema, switches }
    }

    pub fn schema(&self) -> &ResourceSchema {
        self.schema
    }

    fn check_kind(
        declaration: &AttributeDeclaration,
        value: &AttrValue,
    ) -> Result<(), PlanError> {
        if value.kind() != declaration.kind {
            return Err(PlanError::KindMismatch {
                attribute: declaration.name.clone(),
                expected: declaration.kind,
                actual: value.kind(),
            });
        }
        Ok(())
    }

    /// Returns the value the remote system will hold for `declaration` after
    /// a create: the desired value if one is configured, else the server
    /// default.
    pub fn plan_for_create(
        &self,
        declaration: &AttributeDeclaration,
        desired: &DesiredValue,
    ) -> Result<AttrValue, PlanError> {
        let server_value = match desired {
            DesiredValue::Present(value) => {
                Self::check_kind(declaration, value)?;
                value.clone()
            }
            DesiredValue::Absent => declaration.server_default.clone(),
        };
        debug!(
            self.log, "planned create";
            "attribute" => &declaration.name,
            "server_value" => %server_value,
            "defaulted" => desired.is_absent(),
        );
        Ok(server_value)
    }

    /// Plans the transition of one attribute on an existing resource from
    /// `prior_observed` to `desired`.
    ///
    /// Removal of a previously-set value is defined as reverting to the
    /// server default: the remote system has no way to truly unset an
    /// attribute.  When the observed value already equals the default, the
    /// revert is a no-op and no diff is shown, which is what makes repeated
    /// applies of an absent attribute idempotent.
    pub fn plan_for_update(
        &self,
        declaration: &AttributeDeclaration,
        prior_observed: &AttrValue,
        desired: &DesiredValue,
    ) -> Result<AttributePlan, PlanError> {
        Self::check_kind(declaration, prior_observed)?;
        let target = match desired {
            DesiredValue::Present(value) => {
                Self::check_kind(declaration, value)?;
                value
            }
            DesiredValue::Absent => &declaration.server_default,
        };
        let plan = if target == prior_observed {
            AttributePlan { action: PlannedAction::NoOp, diff_visible: false }
        } else {
            AttributePlan {
                action: PlannedAction::Set(target.clone()),
                diff_visible: true,
            }
        };
        debug!(
            self.log, "planned update";
            "attribute" => &declaration.name,
            "prior_observed" => %prior_observed,
            "desired" => %desired,
            "diff_visible" => plan.diff_visible,
        );
        Ok(plan)
    }

    /// Reconciles one attribute against `observed`, freshly read from the
    /// remote system, producing the values to store back.
    ///
    /// This is the Optional+Computed contract: an unconfigured attribute
    /// observed at its server default is expected and silent.  An
    /// unconfigured attribute observed elsewhere has drifted out-of-band;
    /// the observed value is surfaced as computed state without forcing the
    /// user's configuration to change, and a plan diff is raised only when
    /// `strict_default_enforcement` is set.
    pub fn reconcile_on_refresh(
        &self,
        declaration: &AttributeDeclaration,
        desired: &DesiredValue,
        observed: &AttrValue,
    ) -> Result<RefreshOutcome, PlanError> {
        Self::check_kind(declaration, observed)?;
        let outcome = match desired {
            DesiredValue::Absent => {
                if *observed == declaration.server_default {
                    RefreshOutcome {
                        desired: DesiredValue::Absent,
                        computed: observed.clone(),
                        drift: None,
                        plan_diff: false,
                    }
                } else {
                    RefreshOutcome {
                        desired: DesiredValue::Absent,
                        computed: observed.clone(),
                        drift: Some(observed.clone()),
                        plan_diff: self.switches.strict_default_enforcement,
                    }
                }
            }
            DesiredValue::Present(value) => {
                Self::check_kind(declaration, value)?;
                if observed == value {
                    RefreshOutcome {
                        desired: desired.clone(),
                        computed: observed.clone(),
                        drift: None,
                        plan_diff: false,
                    }
                } else {
                    // Drift on a configured attribute: the next apply should
                    // restore the configured value.
                    RefreshOutcome {
                        desired: desired.clone(),
                        computed: observed.clone(),
                        drift: Some(observed.clone()),
                        plan_diff: true,
                    }
                }
            }
        };
        if let Some(drift) = &outcome.drift {
            debug!(
                self.log, "drift detected on refresh";
                "attribute" => &declaration.name,
                "desired" => %desired,
                "observed" => %drift,
                "plan_diff" => outcome.plan_diff,
            );
        }
        Ok(outcome)
    }

    /// Plans the creation of a resource: one write per schema attribute,
    /// with explicitly-configured values surfaced as user-visible changes.
    pub fn plan_create(
        &self,
        desired: &BTreeMap<String, DesiredValue>,
    ) -> Result<ResourcePlan, PlanError> {
        self.check_known_attributes(desired.keys())?;
        let mut plan = ResourcePlan::new(self.schema.resource_type());
        for declaration in self.schema.attributes() {
            let desired = desired
                .get(&declaration.name)
                .unwrap_or(&DesiredValue::Absent);
            let server_value = self.plan_for_create(declaration, desired)?;
            plan.record_write(&declaration.name, server_value.clone());
            if desired.as_present().is_some() {
                plan.record_change(&declaration.name, None, server_value);
            }
        }
        Ok(plan)
    }

    /// Plans an update of an existing resource.
    ///
    /// `prior_desired` is the desired state stored by the last apply and is
    /// what distinguishes "removed after having been set" (plan a revert to
    /// the server default) from "never set" (the Optional+Computed case,
    /// where drift is adopted unless `strict_default_enforcement` is on).
    pub fn plan_update(
        &self,
        prior_desired: &BTreeMap<String, DesiredValue>,
        prior_observed: &BTreeMap<String, AttrValue>,
        desired: &BTreeMap<String, DesiredValue>,
    ) -> Result<ResourcePlan, PlanError> {
        self.check_known_attributes(desired.keys())?;
        let mut plan = ResourcePlan::new(self.schema.resource_type());
        for declaration in self.schema.attributes() {
            let observed = prior_observed.get(&declaration.name).ok_or_else(
                || PlanError::MissingObservation {
                    attribute: declaration.name.clone(),
                },
            )?;
            let new_desired = desired
                .get(&declaration.name)
                .unwrap_or(&DesiredValue::Absent);
            let was_desired = prior_desired
                .get(&declaration.name)
                .unwrap_or(&DesiredValue::Absent);

            let attr_plan = if new_desired.is_absent() && was_desired.is_absent()
            {
                // Never configured: this is the Optional+Computed path, and
                // the refresh contract decides whether the drifted value is
                // adopted or planned back to the default.
                let outcome = self.reconcile_on_refresh(
                    declaration,
                    new_desired,
                    observed,
                )?;
                if outcome.plan_diff {
                    AttributePlan {
                        action: PlannedAction::Set(
                            declaration.server_default.clone(),
                        ),
                        diff_visible: true,
                    }
                } else {
                    AttributePlan {
                        action: PlannedAction::NoOp,
                        diff_visible: false,
                    }
                }
            } else {
                self.plan_for_update(declaration, observed, new_desired)?
            };

            if let PlannedAction::Set(value) = &attr_plan.action {
                plan.record_write(&declaration.name, value.clone());
                if attr_plan.diff_visible {
                    plan.record_change(
                        &declaration.name,
                        Some(observed.clone()),
                        value.clone(),
                    );
                }
            }
        }
        Ok(plan)
    }

    fn check_known_attributes<'b>(
        &self,
        names: impl Iterator<Item = &'b String>,
    ) -> Result<(), PlanError> {
        for name in names {
            if self.schema.attribute(name).is_none() {
                return Err(PlanError::UnknownAttribute {
                    resource_type: String::from(self.schema.resource_type()),
                    attribute: name.clone(),
                });
            }
        }
        Ok(())
    }
}
