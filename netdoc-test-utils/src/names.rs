// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Collision-avoiding name generation for test resources

use rand::distributions::Alphanumeric;
use rand::Rng;

fn random_suffix(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(|c| (c as char).to_ascii_lowercase())
        .collect()
}

/// Returns a test resource name like `test-rack-x7k2m9qa`.
pub fn random_name(prefix: &str) -> String {
    format!("{}-{}", prefix, random_suffix(8))
}

/// Returns a slug (lowercase, hyphenated) with a random suffix.
pub fn random_slug(prefix: &str) -> String {
    format!("{}-{}", prefix.to_ascii_lowercase().replace(' ', "-"), random_suffix(8))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_names_are_distinct() {
        let a = random_name("test-rack");
        let b = random_name("test-rack");
        assert_ne!(a, b);
        assert!(a.starts_with("test-rack-"));
    }

    #[test]
    fn test_slug_shape() {
        let slug = random_slug("Test Mfr");
        assert!(slug.starts_with("test-mfr-"));
        assert!(slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
    }
}
