//! Placeholder substitution for queries, file names, variables and formulas.
//!
//! # Syntax
//!
//! ```text
//! SELECT * FROM sales WHERE day BETWEEN '{part.beg}' AND '{part.end}'
//! report-{num}-{part.beg}
//! SUM(C10:C{rows.last})
//! ```
//!
//! Only the closed set of [`Token`]s is recognised. Anything else between
//! braces is literal text and is copied through unchanged.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::Result;
use crate::partition::Partition;

/// Placeholder names understood by [`resolve`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Token {
    /// First day of the partition (`{part.beg}`)
    PartBeg,
    /// Last day of the partition (`{part.end}`)
    PartEnd,
    /// Last written data row (`{rows.last}`), totalizations only
    RowsLast,
    /// Running partition number across all sources (`{num}`)
    Num,
}

impl Token {
    /// Every token, in declaration order
    pub const ALL: [Token; 4] = [Token::PartBeg, Token::PartEnd, Token::RowsLast, Token::Num];

    /// Name as written between braces
    pub fn name(self) -> &'static str {
        match self {
            Token::PartBeg => "part.beg",
            Token::PartEnd => "part.end",
            Token::RowsLast => "rows.last",
            Token::Num => "num",
        }
    }

    /// Look up a token by its name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.name())
    }
}

/// Values available to [`resolve`] for one partition
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceholderContext {
    values: BTreeMap<Token, String>,
}

impl PlaceholderContext {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Context for one partition: `part.beg`, `part.end` and `num`
    pub fn for_partition(partition: &Partition, time_format: &str, num: usize) -> Result<Self> {
        let (begin, end) = partition.format(time_format)?;
        Ok(Self::new()
            .with(Token::PartBeg, begin)
            .with(Token::PartEnd, end)
            .with(Token::Num, num))
    }

    /// Builder-style setter
    pub fn with(mut self, token: Token, value: impl ToString) -> Self {
        self.set(token, value);
        self
    }

    /// Set or replace the value of a token
    pub fn set(&mut self, token: Token, value: impl ToString) {
        self.values.insert(token, value.to_string());
    }

    /// Value of a token, if set
    pub fn get(&self, token: Token) -> Option<&str> {
        self.values.get(&token).map(String::as_str)
    }
}

/// Substitute every `{token}` that has a value in `context`
///
/// A single left-to-right pass: substituted values are never rescanned, and
/// unknown or unset names stay as written.
pub fn resolve(template: &str, context: &PlaceholderContext) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        let Some(close) = after.find('}') else {
            out.push_str(&rest[open..]);
            return out;
        };

        match Token::from_name(&after[..close]).and_then(|t| context.get(t)) {
            Some(value) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                // Keep the brace and rescan from the next character so that
                // "{{num}}" still resolves its inner token
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}
