// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Reference-attribute equivalence against the fake remote's resolver

use netdoc_reconciler::equivalence::references_equivalent;
use netdoc_reconciler::equivalence::refresh_reference;
use netdoc_reconciler::equivalence::ReferenceId;
use netdoc_test_utils::remote::FakeRemote;

fn remote_with_tenants() -> FakeRemote {
    let mut remote = FakeRemote::new();
    for (spelling, id) in [
        ("7", 7),
        ("production-environment", 7),
        ("Production Environment", 7),
        ("12", 12),
        ("staging-environment", 12),
    ] {
        remote.register_reference("tenant", spelling, ReferenceId(id));
    }
    remote
}

#[test]
fn test_equivalent_spellings_suppress_diff() {
    let remote = remote_with_tenants();
    // A user switching between spellings of the same tenant sees no diff.
    assert!(references_equivalent(
        &remote,
        "tenant",
        "7",
        "production-environment"
    ));
    assert!(references_equivalent(
        &remote,
        "tenant",
        "Production Environment",
        "7"
    ));
    // Pointing at a different tenant is a real change.
    assert!(!references_equivalent(
        &remote,
        "tenant",
        "production-environment",
        "staging-environment"
    ));
    // Unknown spellings only match themselves.
    assert!(!references_equivalent(&remote, "tenant", "7", "typo-tenant"));
    assert!(references_equivalent(
        &remote,
        "tenant",
        "typo-tenant",
        "typo-tenant"
    ));
}

#[test]
fn test_resolution_is_scoped_by_resource_type() {
    let remote = remote_with_tenants();
    // The same spellings under a different resource type resolve to
    // nothing, so only exact matches are equivalent.
    assert!(!references_equivalent(
        &remote,
        "site",
        "7",
        "production-environment"
    ));
}

#[test]
fn test_refresh_keeps_stable_spelling_across_cycles() {
    // Whatever spelling the user chose, repeated refreshes keep it
    // verbatim as long as it still denotes the same referent.
    for spelling in ["7", "production-environment", "Production Environment"]
    {
        let mut current = Some(String::from(spelling));
        for _ in 0..3 {
            current = refresh_reference(
                current.as_deref(),
                "Production Environment",
                "production-environment",
                ReferenceId(7),
            );
            assert_eq!(current.as_deref(), Some(spelling));
        }
    }

    // A numeric spelling of the wrong referent converges to the API's ID.
    let current = refresh_reference(
        Some("12"),
        "Production Environment",
        "production-environment",
        ReferenceId(7),
    );
    assert_eq!(current.as_deref(), Some("7"));
}
