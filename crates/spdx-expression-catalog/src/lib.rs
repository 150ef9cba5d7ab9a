//! Canonical SPDX identifier lists for `spdx-expression`.
//!
//! The parser never inspects list data directly. It asks an
//! [`IdentifierCatalog`] two questions: is this a known license identifier,
//! and is this a known exception identifier. This crate defines that seam,
//! an in-memory [`StaticCatalog`], and a [`bundled`] catalog built from the
//! SPDX license and exception lists shipped with the crate, tracking the
//! release named by [`SPDX_LIST_VERSION`].

mod bundled;
mod errors;
mod static_catalog;

pub use bundled::{SPDX_LIST_VERSION, bundled};
pub use errors::CatalogError;
pub use static_catalog::StaticCatalog;

/// Read-only lookup of canonical license and exception identifiers.
///
/// Implementations must be safe to query from several threads at once, since
/// a single catalog is typically shared by every parse in a process.
///
/// # Examples
/// ```
/// use spdx_expression_catalog::IdentifierCatalog;
///
/// struct OnlyMit;
///
/// impl IdentifierCatalog for OnlyMit {
///     fn is_valid_license_id(&self, id: &str) -> bool {
///         id == "MIT"
///     }
///
///     fn is_valid_exception_id(&self, _id: &str) -> bool {
///         false
///     }
/// }
///
/// assert!(OnlyMit.is_valid_license_id("MIT"));
/// assert!(!OnlyMit.is_valid_exception_id("GCC-exception-3.1"));
/// ```
pub trait IdentifierCatalog: Send + Sync {
    /// Return `true` when `id` names a license in the catalog.
    fn is_valid_license_id(&self, id: &str) -> bool;

    /// Return `true` when `id` names a license exception in the catalog.
    fn is_valid_exception_id(&self, id: &str) -> bool;
}

impl<T: IdentifierCatalog + ?Sized> IdentifierCatalog for &T {
    fn is_valid_license_id(&self, id: &str) -> bool {
        (**self).is_valid_license_id(id)
    }

    fn is_valid_exception_id(&self, id: &str) -> bool {
        (**self).is_valid_exception_id(id)
    }
}
