//! In-memory catalog backed by hash sets.

use std::collections::HashSet;

use crate::IdentifierCatalog;
use crate::errors::CatalogError;

/// Catalog holding owned sets of license and exception identifiers.
///
/// Lookups are exact-case: `MIT` is known, `mit` is not. Callers wanting
/// case-insensitive matching normalise identifiers before they reach the
/// catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticCatalog {
    licenses: HashSet<String>,
    exceptions: HashSet<String>,
}

impl StaticCatalog {
    /// Build a catalog from license and exception identifiers.
    ///
    /// # Examples
    /// ```
    /// use spdx_expression_catalog::{IdentifierCatalog, StaticCatalog};
    ///
    /// let catalog = StaticCatalog::new(["MIT", "Apache-2.0"], ["LLVM-exception"]);
    /// assert!(catalog.is_valid_license_id("Apache-2.0"));
    /// assert!(catalog.is_valid_exception_id("LLVM-exception"));
    /// assert!(!catalog.is_valid_license_id("LLVM-exception"));
    /// ```
    #[must_use]
    pub fn new<L, E>(licenses: L, exceptions: E) -> Self
    where
        L: IntoIterator,
        L::Item: Into<String>,
        E: IntoIterator,
        E::Item: Into<String>,
    {
        Self {
            licenses: licenses.into_iter().map(Into::into).collect(),
            exceptions: exceptions.into_iter().map(Into::into).collect(),
        }
    }

    /// Build a catalog from two JSON arrays of strings.
    ///
    /// # Errors
    /// Returns [`CatalogError::Json`] naming the list whose document could not
    /// be decoded.
    ///
    /// # Examples
    /// ```
    /// use spdx_expression_catalog::{IdentifierCatalog, StaticCatalog};
    ///
    /// let catalog = StaticCatalog::from_json(r#"["MIT"]"#, r#"["Classpath-exception-2.0"]"#)
    ///     .unwrap_or_else(|err| panic!("lists should decode: {err}"));
    /// assert!(catalog.is_valid_license_id("MIT"));
    /// ```
    pub fn from_json(licenses: &str, exceptions: &str) -> Result<Self, CatalogError> {
        let licenses: Vec<String> = serde_json::from_str(licenses)
            .map_err(|source| CatalogError::Json {
                list: "license",
                source,
            })?;
        let exceptions: Vec<String> =
            serde_json::from_str(exceptions).map_err(|source| CatalogError::Json {
                list: "exception",
                source,
            })?;
        Ok(Self::new(licenses, exceptions))
    }

    /// Number of license identifiers held.
    #[must_use]
    pub fn license_count(&self) -> usize {
        self.licenses.len()
    }

    /// Number of exception identifiers held.
    #[must_use]
    pub fn exception_count(&self) -> usize {
        self.exceptions.len()
    }
}

impl IdentifierCatalog for StaticCatalog {
    fn is_valid_license_id(&self, id: &str) -> bool {
        self.licenses.contains(id)
    }

    fn is_valid_exception_id(&self, id: &str) -> bool {
        self.exceptions.contains(id)
    }
}
