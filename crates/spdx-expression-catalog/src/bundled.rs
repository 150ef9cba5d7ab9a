//! SPDX identifier lists compiled into the crate.

use std::sync::OnceLock;

use crate::static_catalog::StaticCatalog;

const LICENSES: &str = include_str!("../data/licenses.json");
const EXCEPTIONS: &str = include_str!("../data/exceptions.json");

static BUNDLED: OnceLock<StaticCatalog> = OnceLock::new();

/// SPDX License List release the bundled identifiers track.
pub const SPDX_LIST_VERSION: &str = "3.24";

/// Catalog of the SPDX license and exception identifiers shipped with this
/// crate, deprecated identifiers included.
///
/// The lists are decoded once per process on first use.
///
/// # Examples
/// ```
/// use spdx_expression_catalog::{IdentifierCatalog, bundled};
///
/// assert!(bundled().is_valid_license_id("MIT"));
/// assert!(bundled().is_valid_exception_id("GCC-exception-3.1"));
/// ```
#[must_use]
pub fn bundled() -> &'static StaticCatalog {
    BUNDLED.get_or_init(|| {
        StaticCatalog::from_json(LICENSES, EXCEPTIONS).unwrap_or_else(|err| {
            log::error!(
                "bundled SPDX {SPDX_LIST_VERSION} lists failed to decode, \
                 every identifier will be rejected: {err}"
            );
            StaticCatalog::default()
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::IdentifierCatalog;
    use rstest::rstest;

    #[test]
    fn embedded_lists_decode() {
        if let Err(err) = StaticCatalog::from_json(LICENSES, EXCEPTIONS) {
            panic!("bundled lists should decode: {err}");
        }
    }

    #[rstest]
    #[case("MIT")]
    #[case("Apache-2.0")]
    #[case("BSD-3-Clause")]
    #[case("BSD-3-Clause-Modification")]
    #[case("CC-BY-4.0")]
    #[case("AFL-1.1")]
    #[case("GPL-3.0")]
    #[case("GPL-2.0-only")]
    #[case("Unicode-3.0")]
    #[case("Elastic-2.0")]
    #[case("any-OSI")]
    fn knows_common_licenses(#[case] id: &str) {
        assert!(bundled().is_valid_license_id(id));
    }

    #[rstest]
    #[case("GCC-exception-3.1")]
    #[case("Classpath-exception-2.0")]
    #[case("LLVM-exception")]
    #[case("Asterisk-exception")]
    fn knows_common_exceptions(#[case] id: &str) {
        assert!(bundled().is_valid_exception_id(id));
    }

    #[test]
    fn does_not_cross_lists() {
        assert!(!bundled().is_valid_exception_id("MIT"));
        assert!(!bundled().is_valid_license_id("LLVM-exception"));
    }
}
