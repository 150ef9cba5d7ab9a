//! Expression lexer converting license-expression strings into tokens.

use std::fmt;
use std::iter::Peekable;
use std::str::CharIndices;

use crate::errors::{LexError, LexErrorKind};

const DOCUMENT_REF_PREFIX: &str = "DocumentRef-";
const LICENSE_REF_PREFIX: &str = "LicenseRef-";

/// Lexical category of a [`Token`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// A license or exception identifier. Which one it is depends on where it
    /// sits in the grammar, not on its spelling.
    Identifier {
        /// The identifier as written, without any `+` suffix.
        text: String,
        /// Whether a `+` directly followed the identifier.
        plus: bool,
    },
    /// A `LicenseRef-…` or `DocumentRef-…:LicenseRef-…` reference with the
    /// spaces around the colon removed.
    LicenseRef(String),
    /// The `AND` keyword.
    And,
    /// The `OR` keyword.
    Or,
    /// The `WITH` keyword.
    With,
    /// `(`
    OpenParen,
    /// `)`
    CloseParen,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identifier { text, plus: true } => write!(f, "{text}+"),
            Self::Identifier { text, plus: false } | Self::LicenseRef(text) => f.write_str(text),
            Self::And => f.write_str("AND"),
            Self::Or => f.write_str("OR"),
            Self::With => f.write_str("WITH"),
            Self::OpenParen => f.write_str("("),
            Self::CloseParen => f.write_str(")"),
        }
    }
}

/// A token together with the byte offset it started at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// What was read.
    pub kind: TokenKind,
    /// Zero-based byte offset of the token's first character.
    pub offset: usize,
}

impl Token {
    /// Create a token starting at `offset`.
    #[must_use]
    pub fn new(kind: TokenKind, offset: usize) -> Self {
        Self { kind, offset }
    }
}

type Chars<'a> = Peekable<CharIndices<'a>>;

fn is_forbidden(ch: char) -> bool {
    matches!(ch, '\t' | '\n' | '\r')
}

fn is_delimiter(ch: char) -> bool {
    ch.is_whitespace() || matches!(ch, '(' | ')' | '+' | ':')
}

fn skip_whitespace(chars: &mut Chars<'_>) -> bool {
    let mut skipped = false;
    while chars.next_if(|&(_, ch)| ch.is_whitespace()).is_some() {
        skipped = true;
    }
    skipped
}

fn read_word(chars: &mut Chars<'_>) -> String {
    let mut word = String::new();
    while let Some((_, ch)) = chars.next_if(|&(_, ch)| !is_delimiter(ch)) {
        word.push(ch);
    }
    word
}

fn has_reference_body(word: &str, prefix: &str) -> bool {
    word.strip_prefix(prefix).is_some_and(|body| !body.is_empty())
}

fn malformed(reference: String, offset: usize) -> LexError {
    LexError::new(LexErrorKind::MalformedReference { reference }, offset)
}

/// Merge `DocumentRef-x : LicenseRef-y` into a single reference token.
fn lex_document_ref(
    chars: &mut Chars<'_>,
    document: String,
    offset: usize,
) -> Result<TokenKind, LexError> {
    if !has_reference_body(&document, DOCUMENT_REF_PREFIX) {
        return Err(malformed(document, offset));
    }
    skip_whitespace(chars);
    if chars.next_if(|&(_, ch)| ch == ':').is_none() {
        return Err(malformed(document, offset));
    }
    skip_whitespace(chars);
    let license = read_word(chars);
    if !has_reference_body(&license, LICENSE_REF_PREFIX) {
        return Err(malformed(format!("{document}:{license}"), offset));
    }
    Ok(TokenKind::LicenseRef(format!("{document}:{license}")))
}

fn lex_word(chars: &mut Chars<'_>, offset: usize) -> Result<Token, LexError> {
    let word = read_word(chars);
    let kind = match word.as_str() {
        "AND" => TokenKind::And,
        "OR" => TokenKind::Or,
        "WITH" => TokenKind::With,
        _ if word.starts_with(DOCUMENT_REF_PREFIX) => lex_document_ref(chars, word, offset)?,
        _ if word.starts_with(LICENSE_REF_PREFIX) => {
            if !has_reference_body(&word, LICENSE_REF_PREFIX) {
                return Err(malformed(word, offset));
            }
            TokenKind::LicenseRef(word)
        }
        _ => {
            let plus = chars.next_if(|&(_, ch)| ch == '+').is_some();
            TokenKind::Identifier { text: word, plus }
        }
    };
    Ok(Token::new(kind, offset))
}

fn stray_plus(previous: Option<&Token>, spaced: bool, offset: usize) -> LexError {
    let follows_identifier = previous.is_some_and(|token| {
        matches!(
            token.kind,
            TokenKind::Identifier { .. } | TokenKind::LicenseRef(_)
        )
    });
    let kind = if spaced && follows_identifier {
        LexErrorKind::SpaceBeforePlus
    } else {
        LexErrorKind::UnexpectedPlus
    };
    LexError::new(kind, offset)
}

/// Split a license expression into tokens.
///
/// Runs of whitespace separate tokens and are otherwise ignored. Keywords are
/// matched case-sensitively; any other run of characters that is not
/// whitespace, a parenthesis, `+`, or `:` becomes an identifier, leaving
/// validation to the parser.
///
/// # Errors
/// Returns [`LexError`] when the input contains a tab or newline, when a `+`
/// is separated from its identifier or attached to anything else, or when a
/// `DocumentRef`/`LicenseRef` reference is incomplete.
///
/// # Examples
/// ```
/// use spdx_expression::{TokenKind, tokenize};
///
/// let tokens = tokenize("GPL-2.0+ OR MIT")
///     .unwrap_or_else(|err| panic!("expression should tokenize: {err}"));
/// let kinds: Vec<_> = tokens.into_iter().map(|token| token.kind).collect();
/// assert_eq!(
///     kinds,
///     vec![
///         TokenKind::Identifier { text: "GPL-2.0".into(), plus: true },
///         TokenKind::Or,
///         TokenKind::Identifier { text: "MIT".into(), plus: false },
///     ]
/// );
/// ```
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    if let Some((offset, character)) = input.char_indices().find(|&(_, ch)| is_forbidden(ch)) {
        return Err(LexError::new(
            LexErrorKind::ForbiddenWhitespace { character },
            offset,
        ));
    }

    let mut chars = input.char_indices().peekable();
    let mut tokens: Vec<Token> = Vec::new();

    loop {
        let spaced = skip_whitespace(&mut chars);
        let Some(&(offset, ch)) = chars.peek() else {
            break;
        };
        let token = match ch {
            '(' => {
                chars.next();
                Token::new(TokenKind::OpenParen, offset)
            }
            ')' => {
                chars.next();
                Token::new(TokenKind::CloseParen, offset)
            }
            '+' => return Err(stray_plus(tokens.last(), spaced, offset)),
            ':' => return Err(LexError::new(LexErrorKind::UnexpectedColon, offset)),
            _ => lex_word(&mut chars, offset)?,
        };
        log::trace!("lexed `{}` at byte {}", token.kind, token.offset);
        tokens.push(token);
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn kinds(input: &str) -> Vec<TokenKind> {
        match tokenize(input) {
            Ok(tokens) => tokens.into_iter().map(|token| token.kind).collect(),
            Err(err) => panic!("`{input}` should tokenize: {err}"),
        }
    }

    fn lex_err(input: &str) -> LexError {
        match tokenize(input) {
            Ok(tokens) => panic!("`{input}` should fail to tokenize, got {tokens:?}"),
            Err(err) => err,
        }
    }

    fn ident(text: &str) -> TokenKind {
        TokenKind::Identifier {
            text: text.into(),
            plus: false,
        }
    }

    #[test]
    fn tokenises_keywords_and_parentheses() {
        assert_eq!(
            kinds("(MIT OR Apache-2.0) AND BSD-3-Clause WITH GCC-exception-3.1"),
            vec![
                TokenKind::OpenParen,
                ident("MIT"),
                TokenKind::Or,
                ident("Apache-2.0"),
                TokenKind::CloseParen,
                TokenKind::And,
                ident("BSD-3-Clause"),
                TokenKind::With,
                ident("GCC-exception-3.1"),
            ]
        );
    }

    #[test]
    fn records_byte_offsets() {
        let tokens = match tokenize("  MIT  AND (ISC)") {
            Ok(tokens) => tokens,
            Err(err) => panic!("should tokenize: {err}"),
        };
        let offsets: Vec<usize> = tokens.iter().map(|token| token.offset).collect();
        assert_eq!(offsets, vec![2, 7, 11, 12, 15]);
    }

    #[rstest]
    #[case("and")]
    #[case("Or")]
    #[case("with")]
    fn keywords_are_case_sensitive(#[case] word: &str) {
        assert_eq!(kinds(word), vec![ident(word)]);
    }

    #[test]
    fn attaches_plus_to_identifier() {
        assert_eq!(
            kinds("GPL-2.0+"),
            vec![TokenKind::Identifier {
                text: "GPL-2.0".into(),
                plus: true,
            }]
        );
    }

    #[rstest]
    #[case("MIT\t")]
    #[case("\nMIT")]
    #[case("MIT OR\r\nISC")]
    fn rejects_tabs_and_newlines(#[case] input: &str) {
        assert!(matches!(
            lex_err(input).kind,
            LexErrorKind::ForbiddenWhitespace { .. }
        ));
    }

    #[test]
    fn rejects_space_before_plus() {
        let err = lex_err("MIT +");
        assert_eq!(err.kind, LexErrorKind::SpaceBeforePlus);
        assert_eq!(err.offset, 4);
    }

    #[rstest]
    #[case("+MIT")]
    #[case("(MIT)+")]
    #[case("MIT++")]
    #[case("LicenseRef-foo+")]
    fn rejects_detached_plus(#[case] input: &str) {
        assert_eq!(lex_err(input).kind, LexErrorKind::UnexpectedPlus);
    }

    #[rstest]
    #[case("DocumentRef-spdx-tool-1.2:LicenseRef-MIT-Style-2")]
    #[case("DocumentRef-spdx-tool-1.2 : LicenseRef-MIT-Style-2")]
    #[case("DocumentRef-spdx-tool-1.2   :LicenseRef-MIT-Style-2")]
    fn merges_document_references(#[case] input: &str) {
        assert_eq!(
            kinds(input),
            vec![TokenKind::LicenseRef(
                "DocumentRef-spdx-tool-1.2:LicenseRef-MIT-Style-2".into()
            )]
        );
    }

    #[test]
    fn keeps_bare_license_references() {
        assert_eq!(
            kinds("LicenseRef-something AND MIT"),
            vec![
                TokenKind::LicenseRef("LicenseRef-something".into()),
                TokenKind::And,
                ident("MIT"),
            ]
        );
    }

    #[rstest]
    #[case("DocumentRef-tool")]
    #[case("DocumentRef-tool : MIT")]
    #[case("DocumentRef-tool :")]
    #[case("DocumentRef-:LicenseRef-x")]
    #[case("LicenseRef-")]
    fn rejects_malformed_references(#[case] input: &str) {
        assert!(matches!(
            lex_err(input).kind,
            LexErrorKind::MalformedReference { .. }
        ));
    }

    #[test]
    fn rejects_stray_colon() {
        let err = lex_err("MIT:ISC");
        assert_eq!(err.kind, LexErrorKind::UnexpectedColon);
        assert_eq!(err.offset, 3);
    }

    #[test]
    fn accepts_unicode_identifiers() {
        assert_eq!(kinds("Lizenz-Ä"), vec![ident("Lizenz-Ä")]);
    }

    #[test]
    fn empty_input_has_no_tokens() {
        assert!(kinds("   ").is_empty());
    }
}
