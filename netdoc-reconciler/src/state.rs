// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-instance lifecycle of a reconciled attribute
//!
//! Each attribute of each resource instance moves through a small state
//! machine over the instance's lifetime:
//!
//! ```text
//! Unmanaged --create--> DefaultedAbsent | ExplicitSet(v)
//! DefaultedAbsent --refresh--> DefaultedAbsent | DriftedAbsent(observed)
//! ExplicitSet(v) --update(absent)--> DefaultedAbsent   (plans a revert)
//! any --delete--> Unmanaged                            (terminal)
//! ```
//!
//! The machine carries no references to the remote system; the caller feeds
//! it desired values on create/update and observed values on refresh.

use netdoc_types::schema::AttributeDeclaration;
use netdoc_types::value::AttrValue;
use netdoc_types::value::DesiredValue;

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("attribute {0} is not managed yet (resource not created)")]
    NotCreated(String),
    #[error("attribute {0} is already managed (resource exists)")]
    AlreadyCreated(String),
}

/// Lifecycle state of one attribute on one resource instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeState {
    /// The resource has not been created.
    Unmanaged,

    /// Created (or updated) with the attribute unconfigured; the remote
    /// system holds the server default.
    DefaultedAbsent,

    /// Explicitly configured to this value.
    ExplicitSet(AttrValue),

    /// Unconfigured, but the remote value has moved off the server default
    /// out-of-band.
    DriftedAbsent(AttrValue),
}

impl AttributeState {
    /// Returns the value the remote system holds for this attribute, if the
    /// resource exists.
    pub fn observed<'a>(
        &'a self,
        declaration: &'a AttributeDeclaration,
    ) -> Option<&'a AttrValue> {
        match self {
            AttributeState::Unmanaged => None,
            AttributeState::DefaultedAbsent => {
                Some(&declaration.server_default)
            }
            AttributeState::ExplicitSet(value) => Some(value),
            AttributeState::DriftedAbsent(observed) => Some(observed),
        }
    }

    /// Creates the attribute with the given desired value.  The value
    /// written to the remote system is the desired value, or the server
    /// default when the attribute is unconfigured.
    pub fn on_create(
        &self,
        declaration: &AttributeDeclaration,
        desired: &DesiredValue,
    ) -> Result<(AttributeState, AttrValue), StateError> {
        if !matches!(self, AttributeState::Unmanaged) {
            return Err(StateError::AlreadyCreated(declaration.name.clone()));
        }
        Ok(match desired {
            DesiredValue::Absent => (
                AttributeState::DefaultedAbsent,
                declaration.server_default.clone(),
            ),
            DesiredValue::Present(value) => {
                (AttributeState::ExplicitSet(value.clone()), value.clone())
            }
        })
    }

    /// Applies a configuration change to an existing attribute.  Returns the
    /// new state and the value to write, if a write is needed.
    ///
    /// `ExplicitSet -> DefaultedAbsent` happens only through an explicit
    /// update to an absent desired value, and always writes the server
    /// default back.
    pub fn on_update(
        &self,
        declaration: &AttributeDeclaration,
        desired: &DesiredValue,
    ) -> Result<(AttributeState, Option<AttrValue>), StateError> {
        let observed = self
            .observed(declaration)
            .ok_or_else(|| StateError::NotCreated(declaration.name.clone()))?;
        Ok(match desired {
            DesiredValue::Present(value) => {
                let write =
                    (value != observed).then(|| value.clone());
                (AttributeState::ExplicitSet(value.clone()), write)
            }
            DesiredValue::Absent => {
                let write = (*observed != declaration.server_default)
                    .then(|| declaration.server_default.clone());
                (AttributeState::DefaultedAbsent, write)
            }
        })
    }

    /// Folds a freshly-observed remote value into the state.
    pub fn on_refresh(
        &self,
        declaration: &AttributeDeclaration,
        observed: &AttrValue,
    ) -> Result<AttributeState, StateError> {
        match self {
            AttributeState::Unmanaged => {
                Err(StateError::NotCreated(declaration.name.clone()))
            }
            AttributeState::ExplicitSet(value) => {
                // Drift on a configured attribute does not change the
                // configuration; the planner surfaces it as a diff.
                Ok(AttributeState::ExplicitSet(value.clone()))
            }
            AttributeState::DefaultedAbsent
            | AttributeState::DriftedAbsent(_) => {
                if *observed == declaration.server_default {
                    Ok(AttributeState::DefaultedAbsent)
                } else {
                    Ok(AttributeState::DriftedAbsent(observed.clone()))
                }
            }
        }
    }

    /// Deletes the resource; terminal.
    pub fn on_delete(self) -> AttributeState {
        AttributeState::Unmanaged
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn decl() -> AttributeDeclaration {
        AttributeDeclaration::updatable("positions", AttrValue::Integer(1))
    }

    #[test]
    fn test_create_transitions() {
        let declaration = decl();
        let (state, written) = AttributeState::Unmanaged
            .on_create(&declaration, &DesiredValue::Absent)
            .unwrap();
        assert_eq!(state, AttributeState::DefaultedAbsent);
        assert_eq!(written, AttrValue::Integer(1));

        let (state, written) = AttributeState::Unmanaged
            .on_create(
                &declaration,
                &DesiredValue::Present(AttrValue::Integer(4)),
            )
            .unwrap();
        assert_eq!(state, AttributeState::ExplicitSet(AttrValue::Integer(4)));
        assert_eq!(written, AttrValue::Integer(4));

        let error = state
            .on_create(&declaration, &DesiredValue::Absent)
            .unwrap_err();
        assert!(matches!(error, StateError::AlreadyCreated(_)));
    }

    #[test]
    fn test_explicit_to_absent_writes_default() {
        let declaration = decl();
        let state = AttributeState::ExplicitSet(AttrValue::Integer(4));
        let (state, write) =
            state.on_update(&declaration, &DesiredValue::Absent).unwrap();
        assert_eq!(state, AttributeState::DefaultedAbsent);
        assert_eq!(write, Some(AttrValue::Integer(1)));

        // Already at the default: removal writes nothing.
        let (state, write) =
            state.on_update(&declaration, &DesiredValue::Absent).unwrap();
        assert_eq!(state, AttributeState::DefaultedAbsent);
        assert_eq!(write, None);
    }

    #[test]
    fn test_update_same_value_is_noop() {
        let declaration = decl();
        let state = AttributeState::ExplicitSet(AttrValue::Integer(4));
        let (state, write) = state
            .on_update(
                &declaration,
                &DesiredValue::Present(AttrValue::Integer(4)),
            )
            .unwrap();
        assert_eq!(state, AttributeState::ExplicitSet(AttrValue::Integer(4)));
        assert_eq!(write, None);
    }

    #[test]
    fn test_refresh_transitions() {
        let declaration = decl();

        // Default observed: stays defaulted.
        let state = AttributeState::DefaultedAbsent
            .on_refresh(&declaration, &AttrValue::Integer(1))
            .unwrap();
        assert_eq!(state, AttributeState::DefaultedAbsent);

        // Out-of-band change: drifted.
        let state = state
            .on_refresh(&declaration, &AttrValue::Integer(6))
            .unwrap();
        assert_eq!(state, AttributeState::DriftedAbsent(AttrValue::Integer(6)));

        // Reverted out-of-band: back to defaulted.
        let state = state
            .on_refresh(&declaration, &AttrValue::Integer(1))
            .unwrap();
        assert_eq!(state, AttributeState::DefaultedAbsent);
    }

    #[test]
    fn test_delete_is_terminal() {
        let state = AttributeState::ExplicitSet(AttrValue::Integer(4));
        assert_eq!(state.on_delete(), AttributeState::Unmanaged);
    }

    #[test]
    fn test_unmanaged_rejects_update_and_refresh() {
        let declaration = decl();
        assert!(matches!(
            AttributeState::Unmanaged
                .on_update(&declaration, &DesiredValue::Absent),
            Err(StateError::NotCreated(_))
        ));
        assert!(matches!(
            AttributeState::Unmanaged
                .on_refresh(&declaration, &AttrValue::Integer(1)),
            Err(StateError::NotCreated(_))
        ));
    }
}
