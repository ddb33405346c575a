// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Resource-level plan reports
//!
//! A [`ResourcePlan`] collects two things: the writes the remote system
//! should be asked to perform, and the subset of those transitions that are
//! user-visible as changes.  The two differ: creating a resource writes
//! every attribute (defaults included), but applying a server default the
//! user never asked about is not a user-visible change.

use netdoc_types::value::AttrValue;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// One user-visible attribute change
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeChange {
    pub attribute: String,

    /// prior observed value, if the resource already existed
    pub old: Option<AttrValue>,

    /// value the plan will converge the attribute to
    pub new: AttrValue,
}

impl fmt::Display for AttributeChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.old {
            Some(old) => {
                write!(f, "{}: {} -> {}", self.attribute, old, self.new)
            }
            None => write!(f, "{}: {}", self.attribute, self.new),
        }
    }
}

/// Everything the engine decided for one pass over a resource instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourcePlan {
    resource_type: String,

    /// values to send to the remote system, keyed by attribute name
    writes: BTreeMap<String, AttrValue>,

    /// transitions to surface to the user
    changes: Vec<AttributeChange>,
}

impl ResourcePlan {
    pub(crate) fn new(resource_type: &str) -> ResourcePlan {
        ResourcePlan {
            resource_type: String::from(resource_type),
            writes: BTreeMap::new(),
            changes: Vec::new(),
        }
    }

    pub(crate) fn record_write(&mut self, attribute: &str, value: AttrValue) {
        self.writes.insert(String::from(attribute), value);
    }

    pub(crate) fn record_change(
        &mut self,
        attribute: &str,
        old: Option<AttrValue>,
        new: AttrValue,
    ) {
        self.changes.push(AttributeChange {
            attribute: String::from(attribute),
            old,
            new,
        });
    }

    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    pub fn writes(&self) -> &BTreeMap<String, AttrValue> {
        &self.writes
    }

    pub fn changes(&self) -> &[AttributeChange] {
        &self.changes
    }

    /// Returns whether the plan reflects no user-visible changes.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

impl fmt::Display for ResourcePlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return writeln!(f, "{}: no changes", self.resource_type);
        }
        writeln!(f, "plan for {}:", self.resource_type)?;
        for change in &self.changes {
            writeln!(f, "  {}", change)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_display() {
        let mut plan = ResourcePlan::new("rack");
        assert!(plan.is_empty());
        assert_eq!(format!("{}", plan), "rack: no changes\n");

        plan.record_write("status", AttrValue::string("active"));
        // A write with no recorded change stays invisible.
        assert!(plan.is_empty());

        plan.record_change(
            "status",
            Some(AttrValue::string("offline")),
            AttrValue::string("active"),
        );
        plan.record_change("positions", None, AttrValue::Integer(4));
        assert_eq!(
            format!("{}", plan),
            "plan for rack:\n\
             \x20 status: \"offline\" -> \"active\"\n\
             \x20 positions: 4\n"
        );
    }
}
