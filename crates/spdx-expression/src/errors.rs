//! Error types raised while tokenising, parsing, and validating expressions.

use std::fmt;
use thiserror::Error;

/// The lexical rule an input string broke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexErrorKind {
    /// A tab, carriage return, or newline appeared in the input.
    ForbiddenWhitespace {
        /// The offending character.
        character: char,
    },
    /// A `+` was separated from the preceding identifier by whitespace.
    SpaceBeforePlus,
    /// A `+` that does not directly follow a license identifier.
    UnexpectedPlus,
    /// A `:` outside a `DocumentRef-…:LicenseRef-…` pair.
    UnexpectedColon,
    /// A `DocumentRef-` or `LicenseRef-` form missing one of its parts.
    MalformedReference {
        /// The reference text read so far.
        reference: String,
    },
}

impl fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ForbiddenWhitespace { character } => write!(
                f,
                "tab and newline characters are not allowed (found {character:?})"
            ),
            Self::SpaceBeforePlus => f.write_str("space before `+` is not allowed"),
            Self::UnexpectedPlus => f.write_str("`+` must directly follow a license identifier"),
            Self::UnexpectedColon => {
                f.write_str("`:` may only join a DocumentRef to a LicenseRef")
            }
            Self::MalformedReference { reference } => {
                write!(f, "malformed license reference `{reference}`")
            }
        }
    }
}

/// Malformed character sequence found by the tokenizer.
///
/// # Examples
/// ```
/// use spdx_expression::{LexError, LexErrorKind};
///
/// let err = LexError::new(LexErrorKind::SpaceBeforePlus, 4);
/// assert_eq!(err.to_string(), "space before `+` is not allowed at byte 4");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at byte {offset}")]
pub struct LexError {
    /// Which rule was broken.
    pub kind: LexErrorKind,
    /// Zero-based byte offset of the offending character.
    pub offset: usize,
}

impl LexError {
    /// Create a lexical error at `offset`.
    #[must_use]
    pub fn new(kind: LexErrorKind, offset: usize) -> Self {
        Self { kind, offset }
    }
}

/// The grammar rule a token sequence broke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    /// The expression held no tokens.
    EmptyExpression,
    /// A token appeared where the grammar does not allow it.
    UnexpectedToken {
        /// The token as written.
        found: String,
        /// What the parser was looking for.
        expected: &'static str,
    },
    /// Input ended while an operand was still required.
    UnexpectedEnd {
        /// What the parser was looking for.
        expected: &'static str,
    },
    /// A `(` without its `)`, or a `)` without its `(`.
    UnmatchedParenthesis,
    /// Tokens left over after a complete expression.
    TrailingInput {
        /// The first unconsumed token as written.
        found: String,
    },
    /// An exception identifier carried a `+` suffix.
    PlusOnException {
        /// The exception identifier.
        exception: String,
    },
    /// `WITH` followed something other than a single license.
    ExceptionOnCompound,
    /// Parentheses nested deeper than the configured limit.
    NestingTooDeep {
        /// The configured limit.
        limit: usize,
    },
    /// Operators nested, through chaining or grouping, deeper than the
    /// configured tree height.
    ExpressionTooDeep {
        /// The configured limit.
        limit: usize,
    },
}

impl fmt::Display for SyntaxErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyExpression => f.write_str("empty license expression"),
            Self::UnexpectedToken { found, expected } => {
                write!(f, "unexpected `{found}`, expected {expected}")
            }
            Self::UnexpectedEnd { expected } => {
                write!(f, "unexpected end of expression, expected {expected}")
            }
            Self::UnmatchedParenthesis => f.write_str("unmatched parenthesis"),
            Self::TrailingInput { found } => {
                write!(f, "unexpected `{found}` after a complete expression")
            }
            Self::PlusOnException { exception } => {
                write!(f, "exception `{exception}` cannot take a `+` suffix")
            }
            Self::ExceptionOnCompound => {
                f.write_str("`WITH` must follow a single license identifier")
            }
            Self::NestingTooDeep { limit } => {
                write!(f, "parentheses nested deeper than {limit} levels")
            }
            Self::ExpressionTooDeep { limit } => {
                write!(f, "expression tree deeper than {limit} operators")
            }
        }
    }
}

/// Grammar violation found by the parser.
///
/// # Examples
/// ```
/// use spdx_expression::{SyntaxError, SyntaxErrorKind};
///
/// let err = SyntaxError::new(SyntaxErrorKind::UnmatchedParenthesis, Some(0));
/// assert_eq!(err.to_string(), "unmatched parenthesis at byte 0");
///
/// let err = SyntaxError::new(SyntaxErrorKind::EmptyExpression, None);
/// assert_eq!(err.to_string(), "empty license expression");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct SyntaxError {
    /// Which rule was broken.
    pub kind: SyntaxErrorKind,
    /// Byte offset of the offending token, when one exists.
    pub offset: Option<usize>,
}

impl SyntaxError {
    /// Create a syntax error, optionally anchored at a byte offset.
    #[must_use]
    pub fn new(kind: SyntaxErrorKind, offset: Option<usize>) -> Self {
        Self { kind, offset }
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.offset {
            Some(offset) => write!(f, "{} at byte {offset}", self.kind),
            None => write!(f, "{}", self.kind),
        }
    }
}

/// Grammar position an identifier occupied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentifierKind {
    /// A license term.
    License,
    /// The operand of `WITH`.
    Exception,
}

impl IdentifierKind {
    /// Lower-case name used in messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::License => "license",
            Self::Exception => "exception",
        }
    }
}

impl fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier missing from the catalog and not resolved by a lookup hook.
///
/// # Examples
/// ```
/// use spdx_expression::{IdentifierKind, ValidationError};
///
/// let err = ValidationError::new("unknownException", IdentifierKind::Exception);
/// assert_eq!(
///     err.to_string(),
///     "`unknownException` is not a valid exception name"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("`{identifier}` is not a valid {kind} name")]
pub struct ValidationError {
    /// The identifier exactly as written in the expression.
    pub identifier: String,
    /// Whether it stood in license or exception position.
    pub kind: IdentifierKind,
}

impl ValidationError {
    /// Create a validation error for `identifier`.
    #[must_use]
    pub fn new(identifier: impl Into<String>, kind: IdentifierKind) -> Self {
        Self {
            identifier: identifier.into(),
            kind,
        }
    }
}

/// Any failure raised by [`parse`](crate::parse) and friends.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The input could not be tokenised.
    #[error(transparent)]
    Lex(#[from] LexError),
    /// The tokens do not form a valid expression.
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    /// An identifier is not a known license or exception.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

pub(crate) fn syntax_error(kind: SyntaxErrorKind, offset: Option<usize>) -> ParseError {
    ParseError::Syntax(SyntaxError::new(kind, offset))
}
