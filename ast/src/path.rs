//! Root-to-node sibling index chains

use smallvec::SmallVec;
use snafu::Snafu;
use std::{fmt, str::FromStr};

/// Chain of sibling indices from a root to a node, displayed as `"0,2,1"`
///
/// Paths are recomputed on every annotation pass and are only meaningful within the tree
/// they came from. Persistent references use [`crate::Identity`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Path(SmallVec<[u32; 8]>);

#[derive(Debug, Snafu, PartialEq, Eq)]
#[snafu(display("Invalid path segment {segment:?} in {input:?}"))]
pub struct PathParseError {
    input: String,
    segment: String,
}

impl Path {
    pub fn root(index: u32) -> Self {
        let mut segments = SmallVec::new();
        segments.push(index);
        Self(segments)
    }

    pub fn from_segments(segments: &[u32]) -> Self {
        Self(SmallVec::from_slice(segments))
    }

    pub fn segments(&self) -> &[u32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Path of the `index`th child of the node at this path
    pub fn child(&self, index: u32) -> Self {
        let mut segments = self.0.clone();
        segments.push(index);
        Self(segments)
    }

    /// Path with the last segment removed, or `None` for a root path
    pub fn parent(&self) -> Option<Self> {
        match self.0.split_last() {
            Some((_, rest)) if !rest.is_empty() => Some(Self::from_segments(rest)),
            _ => None,
        }
    }

    /// Longest shared leading run of segments
    pub fn common_prefix(&self, other: &Path) -> Path {
        let shared = self
            .0
            .iter()
            .zip(other.0.iter())
            .take_while(|(a, b)| a == b)
            .count();
        Self::from_segments(&self.0[..shared])
    }

    /// Whether `self` is `other` or one of its ancestors
    pub fn is_prefix_of(&self, other: &Path) -> bool {
        other.0.starts_with(&self.0)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl FromStr for Path {
    type Err = PathParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(Self::default());
        }
        s.split(',')
            .map(|segment| {
                segment.trim().parse::<u32>().map_err(|_| PathParseError {
                    input: s.to_string(),
                    segment: segment.to_string(),
                })
            })
            .collect::<Result<SmallVec<_>, _>>()
            .map(Self)
    }
}
