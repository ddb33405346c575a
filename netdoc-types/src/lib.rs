// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Data model for default-reconciling resource attributes
//!
//! A resource in the remote documentation system is described by a
//! [`schema::ResourceSchema`]: a set of named attributes, each with a value
//! kind and the default the server assigns when the attribute is omitted at
//! creation.  The user's configuration supplies a [`value::DesiredValue`]
//! per attribute; the remote system always holds a concrete
//! [`value::AttrValue`] once the resource exists.
//!
//! The decision logic that reconciles desired against observed values lives
//! in the `netdoc-reconciler` crate; this crate is just the shared
//! vocabulary.

pub mod schema;
pub mod value;
