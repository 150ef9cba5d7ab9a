//! Errors raised while loading identifier lists.

use thiserror::Error;

/// Errors surfaced while building a [`StaticCatalog`](crate::StaticCatalog)
/// from serialized list data.
///
/// # Examples
/// ```
/// use spdx_expression_catalog::{CatalogError, StaticCatalog};
///
/// let Err(err) = StaticCatalog::from_json("not json", "[]") else {
///     panic!("malformed license list should be rejected");
/// };
/// assert!(matches!(err, CatalogError::Json { list: "license", .. }));
/// ```
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The JSON document for the named list could not be decoded as an array
    /// of strings.
    #[error("failed to decode {list} list: {source}")]
    Json {
        /// Which list failed: `"license"` or `"exception"`.
        list: &'static str,
        /// Underlying decoder error.
        #[source]
        source: serde_json::Error,
    },
}
