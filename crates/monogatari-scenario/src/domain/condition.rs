//! Choice conditions — the AST and the narrow parser that produces it.
//!
//! Two forms are recognised:
//!
//! - `affection <op> <integer>` with `<op>` one of `>=`, `>`, `<=`, `<`, `==`
//! - `flags.<name>`
//!
//! Anything else parses to [`Condition::Malformed`], which evaluates to true
//! so that an option can never be hidden by a typo.

use std::fmt;

/// The numeric stat a comparison reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatField {
    /// The heroine's affection score.
    Affection,
}

impl StatField {
    const fn keyword(self) -> &'static str {
        match self {
            Self::Affection => "affection",
        }
    }
}

/// Comparison operators supported in conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// `>=`
    Ge,
    /// `>`
    Gt,
    /// `<=`
    Le,
    /// `<`
    Lt,
    /// `==`
    Eq,
}

impl CompareOp {
    fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            ">=" => Some(Self::Ge),
            ">" => Some(Self::Gt),
            "<=" => Some(Self::Le),
            "<" => Some(Self::Lt),
            "==" => Some(Self::Eq),
            _ => None,
        }
    }

    const fn symbol(self) -> &'static str {
        match self {
            Self::Ge => ">=",
            Self::Gt => ">",
            Self::Le => "<=",
            Self::Lt => "<",
            Self::Eq => "==",
        }
    }

    /// Applies the operator to `lhs` and `rhs`.
    #[must_use]
    pub fn holds(self, lhs: i32, rhs: i32) -> bool {
        match self {
            Self::Ge => lhs >= rhs,
            Self::Gt => lhs > rhs,
            Self::Le => lhs <= rhs,
            Self::Lt => lhs < rhs,
            Self::Eq => lhs == rhs,
        }
    }
}

/// A compiled choice condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// `affection >= 80` and friends.
    Comparison {
        /// The stat being compared.
        field: StatField,
        /// The operator.
        op: CompareOp,
        /// The right-hand side.
        value: i32,
    },
    /// `flags.some_flag`: true iff the flag is set.
    FlagTest {
        /// The flag name.
        name: String,
    },
    /// An expression in no supported form. Kept verbatim for diagnostics.
    Malformed(String),
}

impl Condition {
    /// Parses a condition expression. Never fails: unrecognised input yields
    /// [`Condition::Malformed`].
    #[must_use]
    pub fn parse(expression: &str) -> Self {
        if let Some(comparison) = parse_comparison(expression, StatField::Affection) {
            return comparison;
        }

        if let Some((_, rest)) = expression.split_once("flags.") {
            // A second `flags.` ends the name, e.g. `flags.a flags.b` reads `a`.
            let name = rest.split("flags.").next().unwrap_or_default().trim();
            if !name.is_empty() {
                return Self::FlagTest {
                    name: name.to_owned(),
                };
            }
        }

        Self::Malformed(expression.to_owned())
    }

    /// Returns true for [`Condition::Malformed`].
    #[must_use]
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed(_))
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Comparison { field, op, value } => {
                write!(f, "{} {} {value}", field.keyword(), op.symbol())
            }
            Self::FlagTest { name } => write!(f, "flags.{name}"),
            Self::Malformed(raw) => f.write_str(raw),
        }
    }
}

/// Scans every occurrence of the field keyword for `keyword \s* op \s* digits`.
/// An operator run that is not one of the five supported symbols does not
/// match, so the expression falls through to the flag form.
fn parse_comparison(expression: &str, field: StatField) -> Option<Condition> {
    let keyword = field.keyword();
    for (at, _) in expression.match_indices(keyword) {
        let rest = expression[at + keyword.len()..].trim_start();
        let op_len = rest
            .find(|c: char| !matches!(c, '<' | '>' | '='))
            .unwrap_or(rest.len());
        if op_len == 0 {
            continue;
        }
        let (symbol, rest) = rest.split_at(op_len);
        let rest = rest.trim_start();
        let digits_len = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        if digits_len == 0 {
            continue;
        }

        let Some(op) = CompareOp::from_symbol(symbol) else {
            return None;
        };
        let Ok(value) = rest[..digits_len].parse::<i32>() else {
            return None;
        };
        return Some(Condition::Comparison { field, op, value });
    }
    None
}
