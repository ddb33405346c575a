// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Diff suppression for reference attributes
//!
//! A reference attribute names another resource and accepts three spellings:
//! the referent's numeric ID, its slug, or its human-readable name.  Two
//! spellings that resolve to the same referent must not produce a diff, or
//! every plan would propose rewriting `"7"` to `"production-environment"`
//! and back.  Resolution requires a lookup against the remote system, so it
//! sits behind the [`ReferenceResolver`] trait; the engine itself stays free
//! of I/O.

use std::fmt;

/// Numeric ID of a referenced resource in the remote system
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ReferenceId(pub i64);

impl fmt::Display for ReferenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lookup seam for resolving reference spellings
pub trait ReferenceResolver {
    /// Resolves an ID, slug, or name spelling to the referent's numeric ID,
    /// or `None` if no such resource is known.
    fn resolve(
        &self,
        resource_type: &str,
        identifier: &str,
    ) -> Option<ReferenceId>;
}

/// Returns whether two spellings of a reference attribute denote the same
/// referent and the diff between them should be suppressed.
///
/// Empty-to-value and value-to-empty are real changes, never suppressed.
/// A spelling that does not resolve is never equivalent to anything but its
/// exact self.
pub fn references_equivalent(
    resolver: &dyn ReferenceResolver,
    resource_type: &str,
    old: &str,
    new: &str,
) -> bool {
    if old == new {
        return true;
    }
    if old.is_empty() || new.is_empty() {
        return false;
    }
    match (
        resolver.resolve(resource_type, old),
        resolver.resolve(resource_type, new),
    ) {
        (Some(old_id), Some(new_id)) => old_id == new_id,
        _ => false,
    }
}

/// Computes the reference spelling to store after a refresh.
///
/// The user's spelling is preserved whenever it still denotes the referent
/// the API reports: exact matches against the API's name, slug, or ID, and
/// case-insensitive matches against name or slug.  A non-numeric spelling
/// that matches nothing is kept too; it may be a stale name that still
/// resolves, and the next apply's lookup will validate it.  Only a numeric
/// spelling that disagrees with the API's ID is actual drift, and is
/// replaced by the API's ID.
///
/// A `None` current value stays `None`: the user never configured the
/// reference, and storing the API's value would manufacture drift.
pub fn refresh_reference(
    current: Option<&str>,
    api_name: &str,
    api_slug: &str,
    api_id: ReferenceId,
) -> Option<String> {
    let value = current?;
    let api_id_str = api_id.to_string();

    if value == api_name || value == api_slug || value == api_id_str {
        return Some(String::from(value));
    }
    if !api_name.is_empty() && value.eq_ignore_ascii_case(api_name) {
        return Some(String::from(value));
    }
    if !api_slug.is_empty() && value.eq_ignore_ascii_case(api_slug) {
        return Some(String::from(value));
    }
    if value.parse::<i64>().is_err() {
        return Some(String::from(value));
    }
    Some(api_id_str)
}

#[cfg(test)]
mod test {
    use super::*;
    use std::collections::BTreeMap;

    struct FixedResolver {
        entries: BTreeMap<(String, String), ReferenceId>,
    }

    impl FixedResolver {
        fn new(entries: &[(&str, &str, i64)]) -> FixedResolver {
            FixedResolver {
                entries: entries
                    .iter()
                    .map(|(rt, ident, id)| {
                        (
                            (String::from(*rt), String::from(*ident)),
                            ReferenceId(*id),
                        )
                    })
                    .collect(),
            }
        }
    }

    impl ReferenceResolver for FixedResolver {
        fn resolve(
            &self,
            resource_type: &str,
            identifier: &str,
        ) -> Option<ReferenceId> {
            self.entries
                .get(&(
                    String::from(resource_type),
                    String::from(identifier),
                ))
                .copied()
        }
    }

    fn tenant_resolver() -> FixedResolver {
        FixedResolver::new(&[
            ("tenant", "7", 7),
            ("tenant", "production-environment", 7),
            ("tenant", "Production Environment", 7),
            ("tenant", "12", 12),
            ("tenant", "staging-environment", 12),
            ("site", "15", 15),
            ("site", "datacenter-east", 15),
        ])
    }

    #[test]
    fn test_equivalence_table() {
        let resolver = tenant_resolver();
        let cases: &[(&str, &str, &str, bool)] = &[
            // exact matches always suppress
            ("tenant", "7", "7", true),
            ("tenant", "production-environment", "production-environment", true),
            // ID <-> slug <-> name of the same referent
            ("tenant", "7", "production-environment", true),
            ("tenant", "production-environment", "7", true),
            ("tenant", "7", "Production Environment", true),
            ("tenant", "Production Environment", "production-environment", true),
            // different referents
            ("tenant", "7", "12", false),
            ("tenant", "production-environment", "staging-environment", false),
            ("tenant", "7", "staging-environment", false),
            // other resource types work the same way
            ("site", "15", "datacenter-east", true),
            // empty edge cases
            ("tenant", "", "", true),
            ("tenant", "", "7", false),
            ("tenant", "7", "", false),
            // unresolvable spellings
            ("tenant", "99999", "production-environment", false),
            ("tenant", "7", "non-existent-tenant", false),
        ];
        for (resource_type, old, new, expected) in cases {
            assert_eq!(
                references_equivalent(&resolver, resource_type, old, new),
                *expected,
                "references_equivalent({:?}, {:?}, {:?})",
                resource_type,
                old,
                new,
            );
        }
    }

    #[test]
    fn test_refresh_preserves_user_spelling() {
        let id = ReferenceId(7);
        let name = "Production Environment";
        let slug = "production-environment";

        // not configured: stays unconfigured
        assert_eq!(refresh_reference(None, name, slug, id), None);
        // exact matches keep the user's spelling
        for spelling in [name, slug, "7"] {
            assert_eq!(
                refresh_reference(Some(spelling), name, slug, id).as_deref(),
                Some(spelling)
            );
        }
        // case-insensitive matches keep the user's casing
        assert_eq!(
            refresh_reference(Some("PRODUCTION-ENVIRONMENT"), name, slug, id)
                .as_deref(),
            Some("PRODUCTION-ENVIRONMENT")
        );
        // an unrecognized name is kept for the next resolve
        assert_eq!(
            refresh_reference(Some("Old Tenant Name"), name, slug, id)
                .as_deref(),
            Some("Old Tenant Name")
        );
        // a mismatched numeric ID is real drift
        assert_eq!(
            refresh_reference(Some("12"), name, slug, id).as_deref(),
            Some("7")
        );
    }
}
