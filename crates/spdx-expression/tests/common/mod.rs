//! Helpers shared by the integration tests.
//!
//! Each test binary compiles this module on its own and uses a different
//! subset of it, so unused helpers are expected per binary.

#![allow(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    dead_code,
    reason = "each test binary uses a different subset of helpers"
)]

use serde_json::Value;
use spdx_expression::{Node, ParseError, ParseOptions, parse_with};

/// Parse `input` and render the tree as JSON, panicking on failure.
pub fn parse_json(input: &str, options: &ParseOptions<'_>) -> Value {
    let node = parse_ok(input, options);
    match serde_json::to_value(&node) {
        Ok(value) => value,
        Err(err) => panic!("tree for `{input}` should serialise: {err}"),
    }
}

/// Parse `input`, panicking on failure.
pub fn parse_ok(input: &str, options: &ParseOptions<'_>) -> Node {
    match parse_with(input, options) {
        Ok(node) => node,
        Err(err) => panic!("`{input}` should parse: {err}"),
    }
}

/// Parse `input`, panicking if it succeeds.
pub fn parse_err(input: &str, options: &ParseOptions<'_>) -> ParseError {
    match parse_with(input, options) {
        Ok(node) => panic!("`{input}` should fail to parse, got {node:?}"),
        Err(err) => err,
    }
}
