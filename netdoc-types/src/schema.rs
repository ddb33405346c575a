// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Static description of a resource type's reconcilable attributes

use crate::value::AttrValue;
use crate::value::ValueKind;
use schemars::JsonSchema;
use serde::Deserialize;
use serde::Serialize;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

/// Whether an attribute may change without replacing the resource
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Mutability {
    /// The attribute can be changed by an update to the existing resource.
    InPlace,

    /// Changing the attribute requires destroying and recreating the
    /// resource.
    RequiresReplacement,
}

/// Static description of one reconcilable attribute
///
/// A declaration is immutable once its schema is built.  `server_default` is
/// the value the remote system assigns when the attribute is omitted from a
/// create request; it may well be the kind's zero value (empty string,
/// `false`, or a numeric constant like `1000`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AttributeDeclaration {
    /// identifier, unique within the resource schema
    pub name: String,

    /// value kind, determining comparison and serialization semantics
    pub kind: ValueKind,

    /// the value the server assigns when the attribute is omitted at create
    pub server_default: AttrValue,

    /// whether the attribute can be updated without replacement
    pub mutability: Mutability,
}

impl AttributeDeclaration {
    /// Returns a declaration for an attribute updatable in place, the common
    /// case for Optional+Computed fields.
    pub fn updatable(
        name: impl Into<String>,
        server_default: AttrValue,
    ) -> AttributeDeclaration {
        let kind = server_default.kind();
        AttributeDeclaration {
            name: name.into(),
            kind,
            server_default,
            mutability: Mutability::InPlace,
        }
    }
}

/// A resource type's reconcilable attributes, unique by name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ResourceSchema {
    resource_type: String,
    attributes: BTreeMap<String, AttributeDeclaration>,
}

impl ResourceSchema {
    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeDeclaration> {
        self.attributes.get(name)
    }

    pub fn attributes(
        &self,
    ) -> impl Iterator<Item = &AttributeDeclaration> + '_ {
        self.attributes.values()
    }

    // Convert this `ResourceSchema` back into a [`ResourceSchemaBuilder`]
    //
    // This is primarily useful for tests that want to extend an existing
    // schema.
    pub fn into_builder(self) -> ResourceSchemaBuilder {
        ResourceSchemaBuilder {
            resource_type: self.resource_type,
            attributes: self.attributes,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SchemaBuildError {
    #[error("duplicate attribute name: {0}")]
    DuplicateAttribute(String),
    #[error(
        "attribute {name} declares kind {kind} \
         but its server default is a {default_kind}"
    )]
    DefaultKindMismatch {
        name: String,
        kind: ValueKind,
        default_kind: ValueKind,
    },
}

/// Constructor for [`ResourceSchema`]
#[derive(Debug, Clone)]
pub struct ResourceSchemaBuilder {
    resource_type: String,
    attributes: BTreeMap<String, AttributeDeclaration>,
}

impl ResourceSchemaBuilder {
    pub fn new(resource_type: impl Into<String>) -> ResourceSchemaBuilder {
        ResourceSchemaBuilder {
            resource_type: resource_type.into(),
            attributes: BTreeMap::new(),
        }
    }

    pub fn add_attribute(
        &mut self,
        declaration: AttributeDeclaration,
    ) -> Result<(), SchemaBuildError> {
        if declaration.server_default.kind() != declaration.kind {
            return Err(SchemaBuildError::DefaultKindMismatch {
                name: declaration.name,
                kind: declaration.kind,
                default_kind: declaration.server_default.kind(),
            });
        }
        match self.attributes.entry(declaration.name.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(declaration);
                Ok(())
            }
            Entry::Occupied(_) => Err(SchemaBuildError::DuplicateAttribute(
                declaration.name,
            )),
        }
    }

    pub fn build(self) -> ResourceSchema {
        ResourceSchema {
            resource_type: self.resource_type,
            attributes: self.attributes,
        }
    }
}
