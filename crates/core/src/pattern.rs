//! Label patterns
//!
//! A [`LabelPattern`] selects stored labels hierarchically.
//!
//! # Pattern Syntax
//!
//! | Segment | Meaning |
//! |---------|---------|
//! | `name` | exactly the segment `name` |
//! | `*` (not last) | any one segment |
//! | `*` (last) | one or more trailing segments: the descendants |
//! | `**` (last only) | zero or more trailing segments: the node and its descendants |
//!
//! So `x.*` is everything under `x`, `x.**` additionally matches `x` itself,
//! and `a.*.c` matches `a.b.c` but not `a.b.d.c`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::label::{validate_segment, Label, ReservedSegment, SEPARATOR};

/// Error type for pattern compilation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PatternParseError {
    /// Pattern text was empty
    #[error("pattern is empty")]
    Empty,
    /// Empty segment in pattern
    #[error("empty segment at index {0}")]
    EmptySegment(usize),
    /// `**` used anywhere but the final position
    #[error("subtree wildcard at index {0} must be the final segment")]
    MisplacedSubtree(usize),
    /// Literal segment contains a reserved character
    #[error("segment {segment:?} contains reserved character '{ch}'")]
    ReservedChar {
        /// The offending segment
        segment: String,
        /// The reserved character found
        ch: char,
    },
}

/// One position in a [`LabelPattern`]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Matcher {
    /// Exact segment
    Literal(String),
    /// Any single segment (`*` before the end)
    AnyOne,
    /// One or more trailing segments (trailing `*`)
    Descendants,
    /// Zero or more trailing segments (`**`)
    Subtree,
}

impl fmt::Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Matcher::Literal(s) => f.write_str(s),
            Matcher::AnyOne | Matcher::Descendants => f.write_str("*"),
            Matcher::Subtree => f.write_str("**"),
        }
    }
}

/// A compiled hierarchical label pattern
///
/// # Examples
///
/// ```
/// use nemestrix_core::{Label, LabelPattern};
///
/// let label: Label = "a.b.c".parse().unwrap();
///
/// assert!(LabelPattern::compile("a.*.c").unwrap().matches(&label));
/// assert!(!LabelPattern::compile("a.b").unwrap().matches(&label));
/// assert!(LabelPattern::compile("a.**").unwrap().matches(&label));
/// assert!(LabelPattern::compile("**").unwrap().matches(&label));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LabelPattern {
    matchers: Vec<Matcher>,
}

impl LabelPattern {
    /// Compile a dot-separated pattern
    pub fn compile(text: &str) -> Result<Self, PatternParseError> {
        if text.is_empty() {
            return Err(PatternParseError::Empty);
        }
        let parts: Vec<&str> = text.split(SEPARATOR).collect();
        let last = parts.len() - 1;
        let mut matchers = Vec::with_capacity(parts.len());

        for (idx, part) in parts.into_iter().enumerate() {
            let matcher = match part {
                "**" if idx == last => Matcher::Subtree,
                "**" => return Err(PatternParseError::MisplacedSubtree(idx)),
                "*" if idx == last => Matcher::Descendants,
                "*" => Matcher::AnyOne,
                literal => {
                    match validate_segment(literal) {
                        Ok(()) => {}
                        Err(ReservedSegment::Empty) => {
                            return Err(PatternParseError::EmptySegment(idx))
                        }
                        Err(ReservedSegment::Char(ch)) => {
                            return Err(PatternParseError::ReservedChar {
                                segment: literal.to_string(),
                                ch,
                            })
                        }
                    }
                    Matcher::Literal(literal.to_string())
                }
            };
            matchers.push(matcher);
        }

        Ok(LabelPattern { matchers })
    }

    /// Pattern matching exactly one label
    pub fn exact(label: &Label) -> Self {
        LabelPattern {
            matchers: label
                .segments()
                .iter()
                .cloned()
                .map(Matcher::Literal)
                .collect(),
        }
    }

    /// Pattern matching every strict descendant of `label` (`label.*`)
    pub fn descendants_of(label: &Label) -> Self {
        let mut pattern = Self::exact(label);
        pattern.matchers.push(Matcher::Descendants);
        pattern
    }

    /// Pattern matching `label` and everything under it (`label.**`)
    pub fn subtree_of(label: &Label) -> Self {
        let mut pattern = Self::exact(label);
        pattern.matchers.push(Matcher::Subtree);
        pattern
    }

    /// Get the compiled matchers
    pub fn matchers(&self) -> &[Matcher] {
        &self.matchers
    }

    /// Leading literal segments, used to narrow ordered scans
    pub fn literal_prefix(&self) -> Vec<&str> {
        self.matchers
            .iter()
            .map_while(|m| match m {
                Matcher::Literal(s) => Some(s.as_str()),
                _ => None,
            })
            .collect()
    }

    /// True if the pattern has no wildcards
    pub fn is_exact(&self) -> bool {
        self.matchers
            .iter()
            .all(|m| matches!(m, Matcher::Literal(_)))
    }

    /// Test a label against the pattern
    pub fn matches(&self, label: &Label) -> bool {
        let segments = label.segments();
        for (idx, matcher) in self.matchers.iter().enumerate() {
            match matcher {
                Matcher::Subtree => return true,
                Matcher::Descendants => return segments.len() > idx,
                Matcher::AnyOne => {
                    if idx >= segments.len() {
                        return false;
                    }
                }
                Matcher::Literal(lit) => match segments.get(idx) {
                    Some(seg) if seg == lit => {}
                    _ => return false,
                },
            }
        }
        segments.len() == self.matchers.len()
    }
}

impl FromStr for LabelPattern {
    type Err = PatternParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LabelPattern::compile(s)
    }
}

impl fmt::Display for LabelPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, matcher) in self.matchers.iter().enumerate() {
            if idx > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", matcher)?;
        }
        Ok(())
    }
}

impl TryFrom<String> for LabelPattern {
    type Error = PatternParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        LabelPattern::compile(&value)
    }
}

impl From<LabelPattern> for String {
    fn from(pattern: LabelPattern) -> Self {
        pattern.to_string()
    }
}
