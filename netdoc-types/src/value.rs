// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Values held by reconcilable attributes

use schemars::JsonSchema;
use serde::Deserialize;
use serde::Serialize;
use std::fmt;
use strum::EnumIter;

/// The kind of value an attribute holds
///
/// Comparison within a kind is exact: strings are never case-folded or
/// otherwise normalized, and numeric attributes are integers, never floats.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    String,
    Bool,
    Integer,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ValueKind::String => "string",
            ValueKind::Bool => "bool",
            ValueKind::Integer => "integer",
        };
        write!(f, "{}", s)
    }
}

/// A single attribute value of one kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum AttrValue {
    String(String),
    Bool(bool),
    Integer(i64),
}

impl AttrValue {
    pub fn string(s: impl Into<String>) -> AttrValue {
        AttrValue::String(s.into())
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            AttrValue::String(_) => ValueKind::String,
            AttrValue::Bool(_) => ValueKind::Bool,
            AttrValue::Integer(_) => ValueKind::Integer,
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::String(s) => write!(f, "{:?}", s),
            AttrValue::Bool(b) => write!(f, "{}", b),
            AttrValue::Integer(n) => write!(f, "{}", n),
        }
    }
}

/// The user's configuration state for one attribute
///
/// `Absent` means the attribute does not appear in the configuration at all.
/// The remote system has no such concept: once a resource exists, every
/// attribute has a concrete [`AttrValue`] there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum DesiredValue {
    Absent,
    Present(AttrValue),
}

impl DesiredValue {
    pub fn is_absent(&self) -> bool {
        matches!(self, DesiredValue::Absent)
    }

    pub fn as_present(&self) -> Option<&AttrValue> {
        match self {
            DesiredValue::Absent => None,
            DesiredValue::Present(value) => Some(value),
        }
    }

    /// Returns the kind of the configured value, if one is configured.
    pub fn kind(&self) -> Option<ValueKind> {
        self.as_present().map(AttrValue::kind)
    }
}

impl fmt::Display for DesiredValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DesiredValue::Absent => write!(f, "(absent)"),
            DesiredValue::Present(value) => write!(f, "{}", value),
        }
    }
}
