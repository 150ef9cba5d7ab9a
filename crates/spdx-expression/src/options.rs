//! Parse configuration: relaxed mode, identifier hooks, catalog, and limits.
//!
//! Options are passed explicitly to every parse. [`ParseOptions::from_env`]
//! offers a way to seed the plain settings from the process environment; the
//! parser itself never reads it.

use std::fmt;

use spdx_expression_catalog::{IdentifierCatalog, bundled};

use crate::resolve::{Normalize, Resolve};

/// Default bound on parenthesis nesting.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Default bound on operator nesting in the parsed tree.
///
/// A run of `n` operands folds into a tree `n - 1` levels deep, so this also
/// caps the length of a single `AND` or `OR` chain.
pub const DEFAULT_MAX_TREE_DEPTH: usize = 512;

/// Environment variable read by [`ParseOptions::from_env`] for relaxed mode.
pub const RELAXED_ENV: &str = "SPDX_EXPRESSION_RELAXED";

/// Environment variable read by [`ParseOptions::from_env`] for the nesting
/// bound.
pub const MAX_DEPTH_ENV: &str = "SPDX_EXPRESSION_MAX_DEPTH";

/// Environment variable read by [`ParseOptions::from_env`] for the tree
/// height bound.
pub const MAX_TREE_DEPTH_ENV: &str = "SPDX_EXPRESSION_MAX_TREE_DEPTH";

/// Settings for a single call to [`parse_with`](crate::parse_with).
///
/// Hooks and the catalog are borrowed, so one set of options can be shared by
/// any number of concurrent parses.
///
/// # Examples
/// ```
/// use spdx_expression::{ParseOptions, parse_with};
///
/// let options = ParseOptions::default().relaxed(true);
/// let node = parse_with("MIT OR Commercial", &options)
///     .unwrap_or_else(|err| panic!("relaxed parse should succeed: {err}"));
/// assert_eq!(node.to_string(), "MIT OR Commercial");
/// ```
#[derive(Clone, Copy)]
pub struct ParseOptions<'a> {
    relaxed: bool,
    license_visitor: Option<&'a dyn Normalize>,
    license_ref_lookup: Option<&'a dyn Resolve>,
    catalog: &'a dyn IdentifierCatalog,
    max_depth: usize,
    max_tree_depth: usize,
}

impl Default for ParseOptions<'_> {
    fn default() -> Self {
        Self {
            relaxed: false,
            license_visitor: None,
            license_ref_lookup: None,
            catalog: bundled(),
            max_depth: DEFAULT_MAX_DEPTH,
            max_tree_depth: DEFAULT_MAX_TREE_DEPTH,
        }
    }
}

impl fmt::Debug for ParseOptions<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParseOptions")
            .field("relaxed", &self.relaxed)
            .field("license_visitor", &self.license_visitor.is_some())
            .field("license_ref_lookup", &self.license_ref_lookup.is_some())
            .field("max_depth", &self.max_depth)
            .field("max_tree_depth", &self.max_tree_depth)
            .finish_non_exhaustive()
    }
}

impl<'a> ParseOptions<'a> {
    /// Degrade unknown identifiers to no-assertion leaves instead of failing.
    #[must_use]
    pub fn relaxed(mut self, relaxed: bool) -> Self {
        self.relaxed = relaxed;
        self
    }

    /// Normalise every raw license and exception identifier before it is
    /// validated.
    #[must_use]
    pub fn license_visitor(mut self, visitor: &'a dyn Normalize) -> Self {
        self.license_visitor = Some(visitor);
        self
    }

    /// Map identifiers the catalog rejects onto `LicenseRef-…` forms.
    #[must_use]
    pub fn license_ref_lookup(mut self, lookup: &'a dyn Resolve) -> Self {
        self.license_ref_lookup = Some(lookup);
        self
    }

    /// Validate identifiers against `catalog` instead of the bundled SPDX
    /// lists.
    #[must_use]
    pub fn catalog(mut self, catalog: &'a dyn IdentifierCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Bound parenthesis nesting; deeper input fails with a syntax error.
    #[must_use]
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Bound the height of the parsed tree; longer chains or deeper mixes of
    /// operators fail with a syntax error.
    ///
    /// [`Node`](crate::Node) drops and displays iteratively at any height,
    /// but its derived `Clone`, `PartialEq`, `Hash`, `Debug`, and serde impls
    /// recurse once per level. Raise this only when those stay unused on
    /// very tall trees.
    #[must_use]
    pub fn max_tree_depth(mut self, max_tree_depth: usize) -> Self {
        self.max_tree_depth = max_tree_depth;
        self
    }

    /// Whether relaxed mode is enabled.
    #[must_use]
    pub fn is_relaxed(&self) -> bool {
        self.relaxed
    }

    /// The configured nesting bound.
    #[must_use]
    pub fn depth_limit(&self) -> usize {
        self.max_depth
    }

    /// The configured tree height bound.
    #[must_use]
    pub fn tree_depth_limit(&self) -> usize {
        self.max_tree_depth
    }

    pub(crate) fn visitor(&self) -> Option<&'a dyn Normalize> {
        self.license_visitor
    }

    pub(crate) fn lookup(&self) -> Option<&'a dyn Resolve> {
        self.license_ref_lookup
    }

    pub(crate) fn identifier_catalog(&self) -> &'a dyn IdentifierCatalog {
        self.catalog
    }
}

impl ParseOptions<'static> {
    /// Seed options from `SPDX_EXPRESSION_RELAXED`,
    /// `SPDX_EXPRESSION_MAX_DEPTH`, and `SPDX_EXPRESSION_MAX_TREE_DEPTH`.
    ///
    /// Unset variables keep their defaults; unparseable values are logged and
    /// ignored.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Seed options from an arbitrary key lookup, using the same keys and
    /// rules as [`from_env`](Self::from_env).
    ///
    /// # Examples
    /// ```
    /// use spdx_expression::ParseOptions;
    ///
    /// let options = ParseOptions::from_lookup(|key| match key {
    ///     "SPDX_EXPRESSION_RELAXED" => Some("yes".to_owned()),
    ///     "SPDX_EXPRESSION_MAX_DEPTH" => Some("16".to_owned()),
    ///     _ => None,
    /// });
    /// assert!(options.is_relaxed());
    /// assert_eq!(options.depth_limit(), 16);
    /// ```
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut options = Self::default();
        if let Some(value) = lookup(RELAXED_ENV) {
            match parse_env_bool(&value) {
                Some(relaxed) => options.relaxed = relaxed,
                None => log::warn!("ignoring {RELAXED_ENV}={value:?}: expected a boolean"),
            }
        }
        if let Some(depth) = lookup_limit(&lookup, MAX_DEPTH_ENV) {
            options.max_depth = depth;
        }
        if let Some(depth) = lookup_limit(&lookup, MAX_TREE_DEPTH_ENV) {
            options.max_tree_depth = depth;
        }
        options
    }
}

fn lookup_limit(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<usize> {
    let value = lookup(key)?;
    match value.trim().parse::<usize>() {
        Ok(limit) if limit > 0 => Some(limit),
        _ => {
            log::warn!("ignoring {key}={value:?}: expected a positive integer");
            None
        }
    }
}

fn parse_env_bool(value: &str) -> Option<bool> {
    match value.trim() {
        "1" | "true" | "TRUE" | "True" | "yes" | "YES" | "Yes" | "on" | "ON" | "On" => Some(true),
        "0" | "false" | "FALSE" | "False" | "no" | "NO" | "No" | "off" | "OFF" | "Off" => {
            Some(false)
        }
        _ => None,
    }
}
