// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Runtime policy toggles for the reconciler

use schemars::JsonSchema;
use serde::Deserialize;
use serde::Serialize;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema,
)]
pub struct ReconcilerSwitches {
    /// When set, out-of-band drift on an unset Optional+Computed attribute
    /// is planned back to the declared server default.  When unset (the
    /// default), drift on an unset attribute is adopted as computed state
    /// and no plan diff is raised, since the user never specified a value
    /// to enforce.
    pub strict_default_enforcement: bool,
}

impl Default for ReconcilerSwitches {
    fn default() -> Self {
        Self { strict_default_enforcement: false }
    }
}
