// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Post-apply consistency checking
//!
//! A plan is a promise: after the apply, the remote system must hold exactly
//! the planned values.  A violation is a contract bug somewhere between this
//! engine and the remote system and must be surfaced as a fatal error.
//! Callers must never retry past it, since replaying a non-idempotent remote
//! write could duplicate side effects.

use netdoc_types::value::AttrValue;
use std::collections::BTreeMap;

#[derive(Debug, thiserror::Error)]
pub enum InconsistentResult {
    #[error(
        "inconsistent result after apply: attribute {attribute} was planned \
         to {promised} but the server returned {observed}"
    )]
    ValueMismatch {
        attribute: String,
        promised: AttrValue,
        observed: AttrValue,
    },
    #[error(
        "inconsistent result after apply: attribute {attribute} was planned \
         to {promised} but is missing from the server response"
    )]
    MissingAttribute { attribute: String, promised: AttrValue },
}

/// Checks one attribute's post-apply observation against its plan.
pub fn check_apply_consistency(
    attribute: &str,
    promised: &AttrValue,
    observed: &AttrValue,
) -> Result<(), InconsistentResult> {
    if promised != observed {
        return Err(InconsistentResult::ValueMismatch {
            attribute: String::from(attribute),
            promised: promised.clone(),
            observed: observed.clone(),
        });
    }
    Ok(())
}

/// Checks every promised write against the post-apply observations.
///
/// Observed attributes that were not part of the plan are ignored: the plan
/// only promises the values it set.
pub fn check_resource_consistency(
    promised: &BTreeMap<String, AttrValue>,
    observed: &BTreeMap<String, AttrValue>,
) -> Result<(), InconsistentResult> {
    for (attribute, value) in promised {
        match observed.get(attribute) {
            Some(observed) => {
                check_apply_consistency(attribute, value, observed)?
            }
            None => {
                return Err(InconsistentResult::MissingAttribute {
                    attribute: attribute.clone(),
                    promised: value.clone(),
                })
            }
        }
    }
    Ok(())
}
