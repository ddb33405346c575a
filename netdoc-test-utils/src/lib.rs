// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Test support for the reconciliation engine
//!
//! Facilities intended for the test suite; none of this should be used in
//! production code.  [`remote::FakeRemote`] stands in for the remote
//! documentation service, and [`harness::ScenarioHarness`] drives a managed
//! resource through plan/apply/refresh cycles the way the orchestration
//! engine would, cleaning up everything it created when dropped.

pub mod dev;
pub mod harness;
pub mod names;
pub mod remote;
