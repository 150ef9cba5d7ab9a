//! Parser for SPDX license expressions.
//!
//! Expressions such as `MIT AND BSD-3-Clause WITH GCC-exception-3.1 OR
//! Apache-2.0` are tokenised, parsed with `OR` binding loosest and `WITH`
//! tightest, and every identifier is checked against a catalog of known
//! licenses and exceptions. Two hooks can rewrite identifiers on the way: a
//! visitor that normalises spelling and a lookup that maps otherwise unknown
//! names to `LicenseRef-…` references. In relaxed mode unknown identifiers
//! become no-assertion leaves instead of errors.
//!
//! # Examples
//! ```
//! use serde_json::json;
//! use spdx_expression::parse;
//!
//! let node = parse("MIT OR Apache-2.0")
//!     .unwrap_or_else(|err| panic!("expression should parse: {err}"));
//! let value = serde_json::to_value(&node)
//!     .unwrap_or_else(|err| panic!("tree should serialise: {err}"));
//! assert_eq!(
//!     value,
//!     json!({
//!         "left": {"license": "MIT"},
//!         "conjunction": "or",
//!         "right": {"license": "Apache-2.0"}
//!     })
//! );
//! ```

mod errors;
mod lexer;
mod node;
mod options;
mod parser;
mod resolve;
#[cfg(test)]
mod test_support;

pub use errors::{
    IdentifierKind, LexError, LexErrorKind, ParseError, SyntaxError, SyntaxErrorKind,
    ValidationError,
};
pub use lexer::{Token, TokenKind, tokenize};
pub use node::{Compound, Conjunction, NOASSERTION, NoAssertion, Node, SimpleLicense};
pub use options::{
    DEFAULT_MAX_DEPTH, DEFAULT_MAX_TREE_DEPTH, MAX_DEPTH_ENV, MAX_TREE_DEPTH_ENV, ParseOptions,
    RELAXED_ENV,
};
pub use parser::parse_tokens;
pub use resolve::{Normalize, Resolve};
pub use spdx_expression_catalog::{IdentifierCatalog, SPDX_LIST_VERSION, StaticCatalog, bundled};

/// Parse `expression` in strict mode against the bundled SPDX lists.
///
/// # Errors
/// Returns [`ParseError`] when the expression is malformed or names an
/// unknown license or exception.
///
/// # Examples
/// ```
/// use spdx_expression::{ParseError, parse};
///
/// assert!(parse("GPL-2.0+ WITH Classpath-exception-2.0").is_ok());
/// assert!(matches!(parse("unknownLicense"), Err(ParseError::Validation(_))));
/// ```
pub fn parse(expression: &str) -> Result<Node, ParseError> {
    parse_with(expression, &ParseOptions::default())
}

/// Parse `expression` with explicit options.
///
/// # Errors
/// Returns [`ParseError::Lex`] for malformed characters,
/// [`ParseError::Syntax`] for grammar violations, and
/// [`ParseError::Validation`] for unknown identifiers when relaxed mode is
/// off.
///
/// # Examples
/// ```
/// use spdx_expression::{Node, ParseOptions, SimpleLicense, parse_with};
///
/// let options = ParseOptions::default().relaxed(true);
/// let node = parse_with("MIT WITH unknownException", &options)
///     .unwrap_or_else(|err| panic!("relaxed parse should succeed: {err}"));
/// assert_eq!(
///     node,
///     Node::from(SimpleLicense::new("MIT").with_exception("NOASSERTION"))
/// );
/// ```
pub fn parse_with(expression: &str, options: &ParseOptions<'_>) -> Result<Node, ParseError> {
    let tokens = tokenize(expression)?;
    parse_tokens(tokens, options)
}
