//! Recursive-descent parser building [`Node`] trees from tokens.
//!
//! Precedence from loosest to tightest is `OR`, `AND`, `WITH`, then atoms.
//! Runs of the same operator fold to the right, so `a AND b AND c` becomes
//! `a AND (b AND c)`. Operands of a run are collected iteratively and folded
//! afterwards; only parentheses add recursion, and their depth is bounded.
//! Folding charges every new compound against a separate tree-height budget,
//! since the derived traits on [`Node`] still walk it recursively.

use std::iter::Peekable;
use std::vec;

use crate::errors::{IdentifierKind, ParseError, SyntaxErrorKind, syntax_error};
use crate::lexer::{Token, TokenKind};
use crate::node::{Conjunction, NOASSERTION, Node, SimpleLicense};
use crate::options::ParseOptions;
use crate::resolve::{Resolution, Resolver};

const EXPECTED_LICENSE: &str = "a license identifier or `(`";
const EXPECTED_EXCEPTION: &str = "an exception identifier";
const EXPECTED_CLOSE: &str = "`)`";

/// An exception operand as written and as resolved.
struct Exception {
    raw: String,
    resolved: String,
}

/// A parsed node and the number of compound levels beneath it.
#[derive(Debug, PartialEq)]
struct Subtree {
    node: Node,
    height: usize,
}

impl Subtree {
    fn leaf(node: Node) -> Self {
        Self { node, height: 0 }
    }
}

/// An operand of a run together with the offset of the operator before it.
struct Operand {
    operator: usize,
    subtree: Subtree,
}

struct Parser<'o, 'a> {
    tokens: Peekable<vec::IntoIter<Token>>,
    resolver: Resolver<'o, 'a>,
    max_depth: usize,
    max_tree_depth: usize,
    depth: usize,
}

/// Join two subtrees, failing once the result would exceed `limit` levels.
fn join(
    left: Subtree,
    conjunction: Conjunction,
    right: Subtree,
    operator: usize,
    limit: usize,
) -> Result<Subtree, ParseError> {
    let height = left.height.max(right.height) + 1;
    if height > limit {
        return Err(syntax_error(
            SyntaxErrorKind::ExpressionTooDeep { limit },
            Some(operator),
        ));
    }
    Ok(Subtree {
        node: Node::compound(left.node, conjunction, right.node),
        height,
    })
}

/// Fold `first OP rest[0] OP rest[1] …` into a right-nested tree.
fn fold_right(
    first: Subtree,
    conjunction: Conjunction,
    mut rest: Vec<Operand>,
    limit: usize,
) -> Result<Subtree, ParseError> {
    let Some(Operand {
        mut operator,
        subtree: mut folded,
    }) = rest.pop()
    else {
        return Ok(first);
    };
    while let Some(left) = rest.pop() {
        folded = join(left.subtree, conjunction, folded, operator, limit)?;
        operator = left.operator;
    }
    join(first, conjunction, folded, operator, limit)
}

fn unexpected(token: Token, expected: &'static str) -> ParseError {
    syntax_error(
        SyntaxErrorKind::UnexpectedToken {
            found: token.kind.to_string(),
            expected,
        },
        Some(token.offset),
    )
}

impl<'o, 'a> Parser<'o, 'a> {
    fn new(tokens: Vec<Token>, options: &'o ParseOptions<'a>) -> Self {
        Self {
            tokens: tokens.into_iter().peekable(),
            resolver: Resolver::new(options),
            max_depth: options.depth_limit(),
            max_tree_depth: options.tree_depth_limit(),
            depth: 0,
        }
    }

    fn next_token(&mut self) -> Option<Token> {
        let token = self.tokens.next();
        if let Some(token) = &token {
            log::trace!("consumed `{}` at byte {}", token.kind, token.offset);
        }
        token
    }

    fn next_if_kind(&mut self, kind: &TokenKind) -> Option<Token> {
        self.tokens.next_if(|token| token.kind == *kind)
    }

    fn parse_root(mut self) -> Result<Node, ParseError> {
        if self.tokens.peek().is_none() {
            return Err(syntax_error(SyntaxErrorKind::EmptyExpression, None));
        }
        let root = self.parse_or()?;
        match self.next_token() {
            None => Ok(root.node),
            Some(Token {
                kind: TokenKind::CloseParen,
                offset,
            }) => Err(syntax_error(
                SyntaxErrorKind::UnmatchedParenthesis,
                Some(offset),
            )),
            Some(token) => Err(syntax_error(
                SyntaxErrorKind::TrailingInput {
                    found: token.kind.to_string(),
                },
                Some(token.offset),
            )),
        }
    }

    fn parse_or(&mut self) -> Result<Subtree, ParseError> {
        let first = self.parse_and()?;
        let mut rest = Vec::new();
        while let Some(operator) = self.next_if_kind(&TokenKind::Or) {
            rest.push(Operand {
                operator: operator.offset,
                subtree: self.parse_and()?,
            });
        }
        fold_right(first, Conjunction::Or, rest, self.max_tree_depth)
    }

    fn parse_and(&mut self) -> Result<Subtree, ParseError> {
        let first = self.parse_with()?;
        let mut rest = Vec::new();
        while let Some(operator) = self.next_if_kind(&TokenKind::And) {
            rest.push(Operand {
                operator: operator.offset,
                subtree: self.parse_with()?,
            });
        }
        fold_right(first, Conjunction::And, rest, self.max_tree_depth)
    }

    fn parse_with(&mut self) -> Result<Subtree, ParseError> {
        let atom = self.parse_atom()?;
        let Some(with) = self.next_if_kind(&TokenKind::With) else {
            return Ok(atom);
        };
        match atom.node {
            Node::License(license) if license.exception.is_none() => {
                let exception = self.parse_exception()?;
                Ok(Subtree::leaf(
                    license.with_exception(exception.resolved).into(),
                ))
            }
            Node::NoAssertion(leaf) => {
                // The whole term stays unasserted; keep the text it came from.
                let exception = self.parse_exception()?;
                Ok(Subtree::leaf(Node::no_assertion(format!(
                    "{} WITH {}",
                    leaf.original, exception.raw
                ))))
            }
            Node::License(_) | Node::Compound(_) => Err(syntax_error(
                SyntaxErrorKind::ExceptionOnCompound,
                Some(with.offset),
            )),
        }
    }

    fn parse_exception(&mut self) -> Result<Exception, ParseError> {
        let Some(token) = self.next_token() else {
            return Err(syntax_error(
                SyntaxErrorKind::UnexpectedEnd {
                    expected: EXPECTED_EXCEPTION,
                },
                None,
            ));
        };
        match token.kind {
            TokenKind::Identifier { text, plus: false } => {
                let resolved = match self.resolver.resolve(&text, IdentifierKind::Exception)? {
                    Resolution::Accepted(id) => id,
                    Resolution::Degraded(_) => NOASSERTION.to_owned(),
                };
                Ok(Exception {
                    raw: text,
                    resolved,
                })
            }
            TokenKind::Identifier { text, plus: true } => Err(syntax_error(
                SyntaxErrorKind::PlusOnException { exception: text },
                Some(token.offset),
            )),
            _ => Err(unexpected(token, EXPECTED_EXCEPTION)),
        }
    }

    fn parse_atom(&mut self) -> Result<Subtree, ParseError> {
        let Some(token) = self.next_token() else {
            return Err(syntax_error(
                SyntaxErrorKind::UnexpectedEnd {
                    expected: EXPECTED_LICENSE,
                },
                None,
            ));
        };
        match token.kind {
            TokenKind::Identifier { text, plus } => {
                self.parse_license(text, plus).map(Subtree::leaf)
            }
            TokenKind::LicenseRef(reference) => {
                Ok(Subtree::leaf(SimpleLicense::new(reference).into()))
            }
            TokenKind::OpenParen => self.parse_group(token.offset),
            _ => Err(unexpected(token, EXPECTED_LICENSE)),
        }
    }

    fn parse_license(&self, text: String, plus: bool) -> Result<Node, ParseError> {
        let node = match self.resolver.resolve(&text, IdentifierKind::License)? {
            Resolution::Accepted(id) => {
                let license = SimpleLicense::new(id);
                if plus {
                    license.with_plus().into()
                } else {
                    license.into()
                }
            }
            Resolution::Degraded(_) if plus => Node::no_assertion(format!("{text}+")),
            Resolution::Degraded(_) => Node::no_assertion(text),
        };
        Ok(node)
    }

    fn parse_group(&mut self, open: usize) -> Result<Subtree, ParseError> {
        if self.depth >= self.max_depth {
            return Err(syntax_error(
                SyntaxErrorKind::NestingTooDeep {
                    limit: self.max_depth,
                },
                Some(open),
            ));
        }
        self.depth += 1;
        let inner = self.parse_or()?;
        self.depth -= 1;

        if self.next_if_kind(&TokenKind::CloseParen).is_some() {
            return Ok(inner);
        }
        match self.next_token() {
            None => Err(syntax_error(
                SyntaxErrorKind::UnmatchedParenthesis,
                Some(open),
            )),
            Some(token) => Err(unexpected(token, EXPECTED_CLOSE)),
        }
    }
}

/// Build an expression tree from tokens produced by
/// [`tokenize`](crate::tokenize).
///
/// # Errors
/// Returns [`ParseError::Syntax`] when the tokens do not form an expression
/// and [`ParseError::Validation`] when an identifier is unknown and relaxed
/// mode is off.
///
/// # Examples
/// ```
/// use spdx_expression::{ParseOptions, parse_tokens, tokenize};
///
/// let tokens = tokenize("MIT OR ISC")
///     .unwrap_or_else(|err| panic!("expression should tokenize: {err}"));
/// let node = parse_tokens(tokens, &ParseOptions::default())
///     .unwrap_or_else(|err| panic!("tokens should parse: {err}"));
/// assert_eq!(node.to_string(), "MIT OR ISC");
/// ```
pub fn parse_tokens(tokens: Vec<Token>, options: &ParseOptions<'_>) -> Result<Node, ParseError> {
    Parser::new(tokens, options).parse_root()
}
