// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Logging setup for tests

use slog::o;
use slog::Drain;
use slog::Logger;

/// Sets up a `slog::Logger` appropriate for a test named `test_name`
///
/// Output goes to stderr, where the test runner captures it and shows it
/// only for failing tests.
pub fn test_setup_log(test_name: &str) -> Logger {
    let decorator = slog_term::PlainSyncDecorator::new(std::io::stderr());
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    Logger::root(drain, o!("test" => String::from(test_name)))
}
