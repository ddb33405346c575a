// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory stand-in for the remote documentation service
//!
//! [`FakeRemote`] models the one behavior of the real service that the
//! reconciliation contract depends on: a create request with an attribute
//! omitted stores the schema's server default, and thereafter every
//! attribute always has a concrete value.  `set_out_of_band` mutates an
//! object behind the engine's back, for drift tests.

use anyhow::anyhow;
use anyhow::bail;
use anyhow::Result;
use netdoc_reconciler::equivalence::ReferenceId;
use netdoc_reconciler::equivalence::ReferenceResolver;
use netdoc_types::schema::ResourceSchema;
use netdoc_types::value::AttrValue;
use std::collections::BTreeMap;

/// Server-side identifier of a created object
pub type RemoteObjectId = u64;

/// One object stored by the fake service
#[derive(Debug, Clone)]
pub struct RemoteObject {
    pub resource_type: String,
    pub attributes: BTreeMap<String, AttrValue>,
}

#[derive(Debug)]
pub struct FakeRemote {
    next_id: RemoteObjectId,
    objects: BTreeMap<RemoteObjectId, RemoteObject>,
    references: BTreeMap<(String, String), ReferenceId>,
}

impl FakeRemote {
    pub fn new() -> FakeRemote {
        FakeRemote {
            next_id: 1,
            objects: BTreeMap::new(),
            references: BTreeMap::new(),
        }
    }

    /// Creates an object, filling the server default for every schema
    /// attribute not present in `writes`.
    pub fn create(
        &mut self,
        schema: &ResourceSchema,
        writes: &BTreeMap<String, AttrValue>,
    ) -> Result<RemoteObjectId> {
        let mut attributes = BTreeMap::new();
        for declaration in schema.attributes() {
            let value = match writes.get(&declaration.name) {
                Some(value) => {
                    if value.kind() != declaration.kind {
                        bail!(
                            "create {}: attribute {} expects a {} value",
                            schema.resource_type(),
                            declaration.name,
                            declaration.kind,
                        );
                    }
                    value.clone()
                }
                None => declaration.server_default.clone(),
            };
            attributes.insert(declaration.name.clone(), value);
        }
        for name in writes.keys() {
            if schema.attribute(name).is_none() {
                bail!(
                    "create {}: unknown attribute {}",
                    schema.resource_type(),
                    name,
                );
            }
        }
        let id = self.next_id;
        self.next_id += 1;
        self.objects.insert(
            id,
            RemoteObject {
                resource_type: String::from(schema.resource_type()),
                attributes,
            },
        );
        Ok(id)
    }

    pub fn get(&self, id: RemoteObjectId) -> Result<&RemoteObject> {
        self.objects
            .get(&id)
            .ok_or_else(|| anyhow!("no such object: {}", id))
    }

    /// Applies `writes` to an existing object.  Unlisted attributes keep
    /// their current values: the service has no concept of unsetting.
    pub fn update(
        &mut self,
        id: RemoteObjectId,
        writes: &BTreeMap<String, AttrValue>,
    ) -> Result<()> {
        let object = self
            .objects
            .get_mut(&id)
            .ok_or_else(|| anyhow!("no such object: {}", id))?;
        for (name, value) in writes {
            let current = object.attributes.get(name).ok_or_else(|| {
                anyhow!(
                    "update {}: unknown attribute {}",
                    object.resource_type,
                    name,
                )
            })?;
            if value.kind() != current.kind() {
                bail!(
                    "update {}: attribute {} expects a {} value",
                    object.resource_type,
                    name,
                    current.kind(),
                );
            }
            object.attributes.insert(name.clone(), value.clone());
        }
        Ok(())
    }

    pub fn delete(&mut self, id: RemoteObjectId) -> Result<()> {
        self.objects
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| anyhow!("no such object: {}", id))
    }

    pub fn exists(&self, id: RemoteObjectId) -> bool {
        self.objects.contains_key(&id)
    }

    /// Mutates an attribute behind the engine's back, simulating a change
    /// made by another client.  No kind checking: out-of-band writers do not
    /// consult our schema.
    pub fn set_out_of_band(
        &mut self,
        id: RemoteObjectId,
        attribute: &str,
        value: AttrValue,
    ) -> Result<()> {
        let object = self
            .objects
            .get_mut(&id)
            .ok_or_else(|| anyhow!("no such object: {}", id))?;
        object.attributes.insert(String::from(attribute), value);
        Ok(())
    }

    /// Registers a spelling (ID, slug, or name) for reference resolution.
    pub fn register_reference(
        &mut self,
        resource_type: &str,
        spelling: &str,
        id: ReferenceId,
    ) {
        self.references.insert(
            (String::from(resource_type), String::from(spelling)),
            id,
        );
    }
}

impl Default for FakeRemote {
    fn default() -> Self {
        Self::new()
    }
}

impl ReferenceResolver for FakeRemote {
    fn resolve(
        &self,
        resource_type: &str,
        identifier: &str,
    ) -> Option<ReferenceId> {
        self.references
            .get(&(String::from(resource_type), String::from(identifier)))
            .copied()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use netdoc_types::schema::AttributeDeclaration;
    use netdoc_types::schema::ResourceSchemaBuilder;

    fn schema() -> ResourceSchema {
        let mut builder = ResourceSchemaBuilder::new("role");
        builder
            .add_attribute(AttributeDeclaration::updatable(
                "weight",
                AttrValue::Integer(1000),
            ))
            .unwrap();
        builder.build()
    }

    #[test]
    fn test_create_fills_defaults() {
        let schema = schema();
        let mut remote = FakeRemote::new();
        let id = remote.create(&schema, &BTreeMap::new()).unwrap();
        assert_eq!(
            remote.get(id).unwrap().attributes.get("weight"),
            Some(&AttrValue::Integer(1000))
        );
    }

    #[test]
    fn test_kind_checked_writes() {
        let schema = schema();
        let mut remote = FakeRemote::new();
        let writes = BTreeMap::from([(
            String::from("weight"),
            AttrValue::string("heavy"),
        )]);
        assert!(remote.create(&schema, &writes).is_err());
    }

    #[test]
    fn test_delete() {
        let schema = schema();
        let mut remote = FakeRemote::new();
        let id = remote.create(&schema, &BTreeMap::new()).unwrap();
        assert!(remote.exists(id));
        remote.delete(id).unwrap();
        assert!(!remote.exists(id));
        assert!(remote.delete(id).is_err());
    }
}
