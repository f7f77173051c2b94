//! Indexing expressions.
//!
//! A [`Subspace`] selects elements of an array either wholesale ([`Subspace::All`]) or with one [`DimensionIndex`] per dimension.
//! Each dimension is indexed independently (orthogonal indexing): a list on one dimension does not pair up with a list on another.

use std::ops::{Range, RangeFrom, RangeFull, RangeTo};

use thiserror::Error;

/// An indexing error.
#[derive(Clone, Debug, Error)]
pub enum IndexerError {
    /// The subspace dimensionality is incompatible with the array.
    #[error("subspace has dimensionality {got}, expected {expected}")]
    IncompatibleDimensionality {
        /// The subspace dimensionality.
        got: usize,
        /// The array dimensionality.
        expected: usize,
    },
    /// A list index is out of bounds.
    #[error("index {index} is out of bounds for axis {axis} with size {size}")]
    OutOfBounds {
        /// The requested index.
        index: i64,
        /// The axis.
        axis: usize,
        /// The size of the axis.
        size: u64,
    },
    /// A slice with a zero step.
    #[error("slice step cannot be zero")]
    ZeroStep,
}

impl IndexerError {
    /// Create a new [`IndexerError`] where the dimensionality is incompatible.
    #[must_use]
    pub fn new_incompatible_dimensionality(got: usize, expected: usize) -> Self {
        Self::IncompatibleDimensionality { got, expected }
    }

    /// Create a new [`IndexerError`] representing an out-of-bounds index.
    #[must_use]
    pub fn new_oob(index: i64, axis: usize, size: u64) -> Self {
        Self::OutOfBounds { index, axis, size }
    }
}

/// A slice with optional start and stop and a non-zero step.
///
/// Negative bounds count from the end of the axis and out of range bounds are clipped.
/// A negative step walks the axis backwards.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SliceIndex {
    start: Option<i64>,
    stop: Option<i64>,
    step: i64,
}

impl Default for SliceIndex {
    fn default() -> Self {
        Self::full()
    }
}

impl SliceIndex {
    /// Create a new slice.
    ///
    /// # Errors
    /// Returns [`IndexerError::ZeroStep`] if `step` is zero.
    pub fn new(start: Option<i64>, stop: Option<i64>, step: i64) -> Result<Self, IndexerError> {
        if step == 0 {
            Err(IndexerError::ZeroStep)
        } else {
            Ok(Self { start, stop, step })
        }
    }

    /// A slice spanning a whole axis.
    #[must_use]
    pub const fn full() -> Self {
        Self {
            start: None,
            stop: None,
            step: 1,
        }
    }

    /// Return the start.
    #[must_use]
    pub const fn start(&self) -> Option<i64> {
        self.start
    }

    /// Return the stop (exclusive).
    #[must_use]
    pub const fn stop(&self) -> Option<i64> {
        self.stop
    }

    /// Return the step.
    #[must_use]
    pub const fn step(&self) -> i64 {
        self.step
    }

    /// Resolve the slice to the positions it selects on an axis of length `size`.
    #[must_use]
    pub fn resolve(&self, size: u64) -> Vec<usize> {
        let n = i64::try_from(size).unwrap_or(i64::MAX);
        let wrap = |bound: i64| if bound < 0 { bound + n } else { bound };
        let (start, stop) = if self.step > 0 {
            (
                self.start.map_or(0, |s| wrap(s).clamp(0, n)),
                self.stop.map_or(n, |s| wrap(s).clamp(0, n)),
            )
        } else {
            (
                self.start.map_or(n - 1, |s| wrap(s).clamp(-1, n - 1)),
                self.stop.map_or(-1, |s| wrap(s).clamp(-1, n - 1)),
            )
        };

        let mut positions = Vec::new();
        let mut i = start;
        while (self.step > 0 && i < stop) || (self.step < 0 && i > stop) {
            // i lies in [0, n) here
            positions.push(usize::try_from(i).unwrap_or_default());
            match i.checked_add(self.step) {
                Some(next) => i = next,
                None => break,
            }
        }
        positions
    }
}

impl From<Range<i64>> for SliceIndex {
    fn from(range: Range<i64>) -> Self {
        Self {
            start: Some(range.start),
            stop: Some(range.end),
            step: 1,
        }
    }
}

impl From<RangeFrom<i64>> for SliceIndex {
    fn from(range: RangeFrom<i64>) -> Self {
        Self {
            start: Some(range.start),
            stop: None,
            step: 1,
        }
    }
}

impl From<RangeTo<i64>> for SliceIndex {
    fn from(range: RangeTo<i64>) -> Self {
        Self {
            start: None,
            stop: Some(range.end),
            step: 1,
        }
    }
}

impl From<RangeFull> for SliceIndex {
    fn from(_: RangeFull) -> Self {
        Self::full()
    }
}

/// The index of a single dimension.
#[derive(Clone, Debug, PartialEq, Eq, Hash, derive_more::From)]
pub enum DimensionIndex {
    /// A slice.
    Slice(SliceIndex),
    /// A list of positions. Negative positions count from the end of the axis.
    List(Vec<i64>),
}

impl From<Range<i64>> for DimensionIndex {
    fn from(range: Range<i64>) -> Self {
        Self::Slice(range.into())
    }
}

impl From<RangeFull> for DimensionIndex {
    fn from(range: RangeFull) -> Self {
        Self::Slice(range.into())
    }
}

impl From<&[i64]> for DimensionIndex {
    fn from(list: &[i64]) -> Self {
        Self::List(list.to_vec())
    }
}

impl DimensionIndex {
    /// Resolve the index to the positions it selects on `axis` of length `size`.
    ///
    /// # Errors
    /// Returns [`IndexerError::OutOfBounds`] if a list position is out of bounds.
    pub fn resolve(&self, axis: usize, size: u64) -> Result<Vec<usize>, IndexerError> {
        match self {
            Self::Slice(slice) => Ok(slice.resolve(size)),
            Self::List(list) => list
                .iter()
                .map(|&index| {
                    let n = i64::try_from(size).unwrap_or(i64::MAX);
                    let wrapped = if index < 0 { index + n } else { index };
                    if (0..n).contains(&wrapped) {
                        usize::try_from(wrapped).map_err(|_| IndexerError::new_oob(index, axis, size))
                    } else {
                        Err(IndexerError::new_oob(index, axis, size))
                    }
                })
                .collect(),
        }
    }
}

/// An indexing expression for an N-dimensional array.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Subspace {
    /// Every element.
    #[default]
    All,
    /// One index per dimension.
    Dimensions(Vec<DimensionIndex>),
}

impl From<Vec<DimensionIndex>> for Subspace {
    fn from(indices: Vec<DimensionIndex>) -> Self {
        Self::Dimensions(indices)
    }
}

impl Subspace {
    /// Create a subspace with one index per dimension.
    #[must_use]
    pub fn new(indices: impl IntoIterator<Item = impl Into<DimensionIndex>>) -> Self {
        Self::Dimensions(indices.into_iter().map(Into::into).collect())
    }

    /// Resolve the subspace to the selected positions of each axis of an array with `shape`.
    ///
    /// # Errors
    /// Returns an [`IndexerError`] if the dimensionality differs from `shape` or a list position is out of bounds.
    pub fn resolve(&self, shape: &[u64]) -> Result<Vec<Vec<usize>>, IndexerError> {
        match self {
            Self::All => shape
                .iter()
                .map(|&size| Ok((0..usize::try_from(size).unwrap_or(usize::MAX)).collect()))
                .collect(),
            Self::Dimensions(indices) => {
                if indices.len() != shape.len() {
                    return Err(IndexerError::new_incompatible_dimensionality(
                        indices.len(),
                        shape.len(),
                    ));
                }
                indices
                    .iter()
                    .zip(shape)
                    .enumerate()
                    .map(|(axis, (index, &size))| index.resolve(axis, size))
                    .collect()
            }
        }
    }
}
