//! Hierarchical labels
//!
//! A [`Label`] is the path a leaf is stored under: an ordered, non-empty
//! sequence of segments rendered with `.` as the separator.
//!
//! | Text | Segments |
//! |------|----------|
//! | `a` | `["a"]` |
//! | `a.b.0.c` | `["a", "b", "0", "c"]` |
//! | `a..b` | error: empty segment |
//!
//! Array indices are plain decimal segments. Nothing in the rendered form
//! distinguishes `items.0` written from an array from `items.0` written from
//! an object with a `"0"` key.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Separator between label segments
pub const SEPARATOR: char = '.';

/// Error type for label parsing and construction
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LabelParseError {
    /// Label text or segment list was empty
    #[error("label has no segments")]
    Empty,
    /// Empty segment (e.g. `a..b`)
    #[error("empty segment at index {0}")]
    EmptySegment(usize),
    /// Segment contains a reserved character
    #[error("segment {segment:?} contains reserved character '{ch}'")]
    ReservedChar {
        /// The offending segment
        segment: String,
        /// The reserved character found
        ch: char,
    },
}

/// Check that a single segment can appear in a label
///
/// Segments must be non-empty and must not contain `.`, `[` or `]`.
pub fn validate_segment(segment: &str) -> Result<(), ReservedSegment> {
    if segment.is_empty() {
        return Err(ReservedSegment::Empty);
    }
    match segment.chars().find(|c| matches!(c, '.' | '[' | ']')) {
        Some(ch) => Err(ReservedSegment::Char(ch)),
        None => Ok(()),
    }
}

/// Reason a segment was rejected by [`validate_segment`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservedSegment {
    /// Segment is empty
    Empty,
    /// Segment contains a reserved character
    Char(char),
}

impl fmt::Display for ReservedSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReservedSegment::Empty => write!(f, "empty segment"),
            ReservedSegment::Char(ch) => write!(f, "reserved character '{}'", ch),
        }
    }
}

/// A hierarchical identifier: one or more non-empty segments
///
/// Ordering is lexicographic over segments, so a label sorts immediately
/// before all of its descendants and descendants are contiguous.
///
/// # Examples
///
/// ```
/// use nemestrix_core::Label;
///
/// let parent: Label = "x.z".parse().unwrap();
/// let child: Label = "x.z.0".parse().unwrap();
///
/// assert!(parent.is_ancestor_of(&child));
/// assert!(!child.is_ancestor_of(&parent));
/// assert!(!parent.is_ancestor_of(&parent));
/// assert_eq!(child.to_string(), "x.z.0");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Label {
    segments: Vec<String>,
}

impl Label {
    /// Parse a dot-separated label
    pub fn parse(text: &str) -> Result<Self, LabelParseError> {
        text.parse()
    }

    /// Build a label from an ordered list of segments
    pub fn from_segments<I, S>(segments: I) -> Result<Self, LabelParseError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() {
            return Err(LabelParseError::Empty);
        }
        for (idx, segment) in segments.iter().enumerate() {
            match validate_segment(segment) {
                Ok(()) => {}
                Err(ReservedSegment::Empty) => return Err(LabelParseError::EmptySegment(idx)),
                Err(ReservedSegment::Char(ch)) => {
                    return Err(LabelParseError::ReservedChar {
                        segment: segment.clone(),
                        ch,
                    })
                }
            }
        }
        Ok(Label { segments })
    }

    /// Get the label segments
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of segments (always at least one)
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Last segment
    pub fn leaf_segment(&self) -> &str {
        // A label always holds at least one segment.
        self.segments.last().map(String::as_str).unwrap_or_default()
    }

    /// Parent label, or `None` for a single-segment label
    pub fn parent(&self) -> Option<Label> {
        if self.segments.len() < 2 {
            return None;
        }
        Some(Label {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// Append a segment (builder pattern)
    pub fn child(&self, segment: impl Into<String>) -> Result<Label, LabelParseError> {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Label::from_segments(segments)
    }

    /// Check if this label is a strict ancestor of another
    ///
    /// True iff `self` is a proper prefix of `other`. A label is not its
    /// own ancestor.
    pub fn is_ancestor_of(&self, other: &Label) -> bool {
        self.segments.len() < other.segments.len() && other.has_prefix(&self.segments)
    }

    /// Check if this label is a strict descendant of another
    pub fn is_descendant_of(&self, other: &Label) -> bool {
        other.is_ancestor_of(self)
    }

    /// Check if two labels are equal or one contains the other
    ///
    /// Two overlapping labels cannot both be stored.
    pub fn overlaps(&self, other: &Label) -> bool {
        self == other || self.is_ancestor_of(other) || other.is_ancestor_of(self)
    }

    /// Check if the label starts with the given segments
    pub fn has_prefix<S: AsRef<str>>(&self, prefix: &[S]) -> bool {
        prefix.len() <= self.segments.len()
            && prefix
                .iter()
                .zip(self.segments.iter())
                .all(|(p, s)| p.as_ref() == s)
    }

    /// Strip a strict ancestor from the front of this label
    ///
    /// Returns `None` unless `ancestor.is_ancestor_of(self)`.
    pub fn relative_to(&self, ancestor: &Label) -> Option<Label> {
        if !ancestor.is_ancestor_of(self) {
            return None;
        }
        Some(Label {
            segments: self.segments[ancestor.len()..].to_vec(),
        })
    }

    /// Iterate over proper ancestors, nearest first
    pub fn ancestors(&self) -> impl Iterator<Item = Label> + '_ {
        (1..self.segments.len()).rev().map(move |end| Label {
            segments: self.segments[..end].to_vec(),
        })
    }

    /// Render as dot-separated text
    pub fn render(&self) -> String {
        self.segments.join(".")
    }
}

impl FromStr for Label {
    type Err = LabelParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(LabelParseError::Empty);
        }
        Label::from_segments(s.split(SEPARATOR))
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl TryFrom<String> for Label {
    type Error = LabelParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Label> for String {
    fn from(label: Label) -> Self {
        label.render()
    }
}
