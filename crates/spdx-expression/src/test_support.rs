//! Shared fixtures for unit tests.

use std::sync::Once;

use spdx_expression_catalog::StaticCatalog;

struct NoopLogger;

impl log::Log for NoopLogger {
    fn enabled(&self, _: &log::Metadata<'_>) -> bool {
        true
    }
    fn log(&self, _: &log::Record<'_>) {}
    fn flush(&self) {}
}

static LOGGER: NoopLogger = NoopLogger;
static INIT_LOGGER: Once = Once::new();

/// Install a logger that accepts every record so trace and debug paths run.
#[rstest::fixture]
pub(crate) fn logger() {
    INIT_LOGGER.call_once(|| {
        let _ = log::set_logger(&LOGGER);
        log::set_max_level(log::LevelFilter::Trace);
    });
}

/// A small catalog independent of the bundled lists.
pub(crate) fn test_catalog() -> StaticCatalog {
    StaticCatalog::new(
        ["MIT", "ISC", "Apache-2.0", "BSD-3-Clause", "GPL-2.0"],
        ["GCC-exception-3.1", "Classpath-exception-2.0"],
    )
}
