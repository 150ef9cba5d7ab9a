//! Parsed expression tree and its renderings.
//!
//! Nodes serialise to the object shape used by SPDX tooling
//! (`{"license": …}`, `{"noassertion": …}`, `{"left": …, "conjunction": …,
//! "right": …}`) and display as canonical expression text that parses back to
//! an equal tree.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Placeholder recorded for an exception relaxed mode could not validate.
pub const NOASSERTION: &str = "NOASSERTION";

/// Binary operator joining two sub-expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Conjunction {
    /// Both operands apply.
    And,
    /// Either operand applies.
    Or,
}

impl Conjunction {
    /// Lower-case name used in serialised output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Or => "or",
        }
    }

    /// Upper-case keyword used in expression text.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

impl fmt::Display for Conjunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// A single license term, optionally qualified by `+` and `WITH`.
///
/// # Examples
/// ```
/// use spdx_expression::SimpleLicense;
///
/// let license = SimpleLicense::new("GPL-2.0")
///     .with_plus()
///     .with_exception("Classpath-exception-2.0");
/// assert_eq!(license.to_string(), "GPL-2.0+ WITH Classpath-exception-2.0");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SimpleLicense {
    /// License identifier or `LicenseRef-…` reference.
    #[serde(rename = "license")]
    pub id: String,
    /// Exception identifier, or [`NOASSERTION`] in relaxed mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exception: Option<String>,
    /// Whether the identifier carried a `+` suffix.
    #[serde(default, skip_serializing_if = "is_false")]
    pub plus: bool,
}

impl SimpleLicense {
    /// A bare license term.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            exception: None,
            plus: false,
        }
    }

    /// Attach a `WITH` exception.
    #[must_use]
    pub fn with_exception(mut self, exception: impl Into<String>) -> Self {
        self.exception = Some(exception.into());
        self
    }

    /// Mark the term as "or later".
    #[must_use]
    pub fn with_plus(mut self) -> Self {
        self.plus = true;
        self
    }
}

impl fmt::Display for SimpleLicense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)?;
        if self.plus {
            f.write_str("+")?;
        }
        if let Some(exception) = &self.exception {
            write!(f, " WITH {exception}")?;
        }
        Ok(())
    }
}

/// Leaf for a license identifier relaxed mode could not validate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NoAssertion {
    /// The identifier exactly as the user wrote it.
    #[serde(rename = "noassertion")]
    pub original: String,
}

/// Two sub-expressions joined by `AND` or `OR`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Compound {
    /// Left operand.
    pub left: Box<Node>,
    /// Operator joining the operands.
    pub conjunction: Conjunction,
    /// Right operand.
    pub right: Box<Node>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

impl Compound {
    /// An operand needs parentheses when its operator binds more loosely than
    /// this one, or when it shares this operator but sits on the left, since
    /// unparenthesised chains fold to the right.
    fn needs_parens(&self, operand: &Node, side: Side) -> bool {
        let Node::Compound(inner) = operand else {
            return false;
        };
        match (inner.conjunction, self.conjunction) {
            (Conjunction::Or, Conjunction::And) => true,
            (child, parent) => child == parent && side == Side::Left,
        }
    }

    /// Queue this compound's rendering steps in reverse so they pop in
    /// source order.
    fn push_steps<'n>(&'n self, pending: &mut Vec<Step<'n>>) {
        for (operand, side) in [(&*self.right, Side::Right), (&*self.left, Side::Left)] {
            let parens = self.needs_parens(operand, side);
            if parens {
                pending.push(Step::Text(")"));
            }
            pending.push(Step::Node(operand));
            if parens {
                pending.push(Step::Text("("));
            }
            if side == Side::Right {
                pending.push(Step::Keyword(self.conjunction));
            }
        }
    }

    /// Move compound children out so they can be dropped from a work list.
    fn detach_compounds(&mut self, pending: &mut Vec<Node>) {
        for child in [&mut self.left, &mut self.right] {
            if matches!(**child, Node::Compound(_)) {
                pending.push(std::mem::replace(&mut **child, Node::no_assertion("")));
            }
        }
    }
}

/// One unit of canonical text output.
enum Step<'n> {
    Node(&'n Node),
    Keyword(Conjunction),
    Text(&'static str),
}

/// Render queued steps without recursing per tree level, so long operator
/// chains print on a bounded stack.
fn write_steps(f: &mut fmt::Formatter<'_>, mut pending: Vec<Step<'_>>) -> fmt::Result {
    while let Some(step) = pending.pop() {
        match step {
            Step::Text(text) => f.write_str(text)?,
            Step::Keyword(conjunction) => write!(f, " {} ", conjunction.keyword())?,
            Step::Node(Node::License(license)) => fmt::Display::fmt(license, f)?,
            Step::Node(Node::NoAssertion(leaf)) => f.write_str(&leaf.original)?,
            Step::Node(Node::Compound(compound)) => compound.push_steps(&mut pending),
        }
    }
    Ok(())
}

impl fmt::Display for Compound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut pending = Vec::new();
        self.push_steps(&mut pending);
        write_steps(f, pending)
    }
}

impl Drop for Compound {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.detach_compounds(&mut pending);
        while let Some(mut node) = pending.pop() {
            if let Node::Compound(compound) = &mut node {
                compound.detach_compounds(&mut pending);
            }
        }
    }
}

/// A parsed license expression.
///
/// # Examples
/// ```
/// use spdx_expression::{Conjunction, Node, SimpleLicense};
///
/// let node = Node::compound(
///     SimpleLicense::new("MIT").into(),
///     Conjunction::Or,
///     SimpleLicense::new("Apache-2.0").into(),
/// );
/// assert_eq!(node.to_string(), "MIT OR Apache-2.0");
/// assert_eq!(node.licenses(), vec!["MIT", "Apache-2.0"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    /// A single license term.
    License(SimpleLicense),
    /// An unvalidated license kept verbatim by relaxed mode.
    NoAssertion(NoAssertion),
    /// A binary conjunction.
    Compound(Compound),
}

impl Node {
    /// Join two nodes with `conjunction`.
    #[must_use]
    pub fn compound(left: Self, conjunction: Conjunction, right: Self) -> Self {
        Self::Compound(Compound {
            left: Box::new(left),
            conjunction,
            right: Box::new(right),
        })
    }

    /// A no-assertion leaf preserving `original`.
    #[must_use]
    pub fn no_assertion(original: impl Into<String>) -> Self {
        Self::NoAssertion(NoAssertion {
            original: original.into(),
        })
    }

    /// Leaf identifiers in source order: each license followed by its
    /// exception, and the original text of no-assertion leaves.
    #[must_use]
    pub fn licenses(&self) -> Vec<&str> {
        let mut found = Vec::new();
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            match node {
                Self::License(license) => {
                    found.push(license.id.as_str());
                    if let Some(exception) = &license.exception {
                        found.push(exception.as_str());
                    }
                }
                Self::NoAssertion(leaf) => found.push(leaf.original.as_str()),
                Self::Compound(compound) => {
                    pending.push(&compound.right);
                    pending.push(&compound.left);
                }
            }
        }
        found
    }

    /// Whether any leaf in the tree records a no-assertion, either as a
    /// license or as an exception.
    #[must_use]
    pub fn has_no_assertion(&self) -> bool {
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            match node {
                Self::License(license) => {
                    if license.exception.as_deref() == Some(NOASSERTION) {
                        return true;
                    }
                }
                Self::NoAssertion(_) => return true,
                Self::Compound(compound) => {
                    pending.push(&compound.left);
                    pending.push(&compound.right);
                }
            }
        }
        false
    }
}

impl From<SimpleLicense> for Node {
    fn from(license: SimpleLicense) -> Self {
        Self::License(license)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_steps(f, vec![Step::Node(self)])
    }
}
