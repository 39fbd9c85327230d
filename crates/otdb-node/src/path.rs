//! Namespace paths
//!
//! Provides [`NodePath`] for addressing nodes in stores whose names are
//! delimited strings (`solver.chi`, `x:y`) rather than parent/child ids.

use std::fmt::{self, Display, Formatter};

/// Default segment separator for namespace names
pub const DEFAULT_SEPARATOR: char = '.';

/// Segmented path within a namespace store
///
/// # Examples
/// - `solver.chi` with separator `.` → `["solver", "chi"]`
/// - `x:y` with separator `:` → `["x", "y"]`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct NodePath(Vec<String>);

impl NodePath {
    /// Create path from segments
    #[inline]
    #[must_use]
    pub fn new(segments: Vec<String>) -> Self {
        Self(segments)
    }

    /// Empty path (namespace root)
    #[inline]
    #[must_use]
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Parse a delimited name
    ///
    /// An empty string is the root path.
    ///
    /// # Errors
    /// Returns error if any segment between separators is empty
    pub fn parse(raw: &str, separator: char) -> Result<Self, PathError> {
        if raw.is_empty() {
            return Ok(Self::root());
        }
        raw.split(separator)
            .map(|seg| {
                if seg.is_empty() {
                    Err(PathError::EmptySegment {
                        raw: raw.to_string(),
                    })
                } else {
                    Ok(seg.to_string())
                }
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }

    /// Get path segments
    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Get number of segments
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if path is the root
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Last segment, the display name of the addressed node
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// Parent path (if not root)
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        self.0
            .split_last()
            .map(|(_, rest)| Self(rest.to_vec()))
    }

    /// Append a segment, returning new path
    #[must_use]
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut new = self.clone();
        new.0.push(segment.into());
        new
    }

    /// Check if this path is a prefix of another
    #[inline]
    #[must_use]
    pub fn is_prefix_of(&self, other: &Self) -> bool {
        other.0.starts_with(&self.0)
    }

    /// Segments of `self` below `prefix`, or `None` if `prefix` does not lead here
    #[inline]
    #[must_use]
    pub fn strip_prefix(&self, prefix: &Self) -> Option<&[String]> {
        self.0.strip_prefix(prefix.0.as_slice())
    }

    /// Join segments with the given separator
    #[must_use]
    pub fn join(&self, separator: char) -> String {
        let mut out = String::new();
        for (i, seg) in self.0.iter().enumerate() {
            if i > 0 {
                out.push(separator);
            }
            out.push_str(seg);
        }
        out
    }

    /// Query pattern matching every name below this path
    ///
    /// The root matches everything (`*`), any other path matches
    /// `<path><sep>*`.
    #[must_use]
    pub fn descendant_pattern(&self, separator: char) -> String {
        if self.is_empty() {
            "*".to_string()
        } else {
            format!("{}{separator}*", self.join(separator))
        }
    }
}

impl Display for NodePath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.join(DEFAULT_SEPARATOR))
    }
}

impl From<Vec<String>> for NodePath {
    fn from(segments: Vec<String>) -> Self {
        Self(segments)
    }
}

/// Errors related to namespace paths
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// Empty segment in path
    #[error("name '{raw}' contains an empty segment")]
    EmptySegment { raw: String },
}
