// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Decision engine for Optional+Computed attribute reconciliation
//!
//! An Optional+Computed attribute may be specified by the user but, when
//! omitted, is filled in by the server with a known default.  The contract
//! implemented here makes such attributes converge across plan/apply/refresh
//! cycles without spurious diffs:
//!
//! - creating with the attribute omitted yields the server default;
//! - an explicitly-set value sticks, and refreshing raises no diff;
//! - removing a previously-set value plans a revert to the server default;
//! - an unset attribute observed at its default is silent on refresh,
//!   forever;
//! - out-of-band drift is surfaced, never silently adopted as a new default.
//!
//! The engine is a pure decision function: it performs no I/O and holds no
//! shared mutable state.  The caller supplies desired values (parsed from
//! configuration), observed values (read from the remote system), and
//! consumes plans and diff decisions.  See [`planner::Planner`].

pub mod consistency;
pub mod equivalence;
pub mod planner;
pub mod report;
pub mod state;
pub mod switches;
