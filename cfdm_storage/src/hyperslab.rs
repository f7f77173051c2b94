//! Hyperslabs.
//!
//! A [`Hyperslab`] is a rectangular region of a variable, defined by a start index and a shape per dimension.

use std::fmt::Display;
use std::ops::Range;

use itertools::izip;
use thiserror::Error;

/// An invalid hyperslab error.
#[derive(Clone, Debug, Error)]
#[allow(missing_docs)]
pub enum InvalidHyperslabError {
    /// Incompatible start and shape.
    #[error("incompatible start {start:?} with shape {shape:?}")]
    IncompatibleStartShape { start: Vec<u64>, shape: Vec<u64> },
    /// Incompatible dimensionality.
    #[error("hyperslab has dimensionality {got}, expected {expected}")]
    IncompatibleDimensionality { got: usize, expected: usize },
    /// Out of bounds.
    #[error("hyperslab {hyperslab} is out of bounds of variable shape {array_shape:?}")]
    OutOfBounds {
        hyperslab: Hyperslab,
        array_shape: Vec<u64>,
    },
}

/// A rectangular region of a variable.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct Hyperslab {
    start: Vec<u64>,
    shape: Vec<u64>,
}

impl Display for Hyperslab {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.to_ranges())
    }
}

/// A run of contiguous elements in the row-major linearisation of a variable.
#[derive(Copy, Clone, Eq, PartialEq, Debug, derive_more::Display)]
#[display("{offset}+{length}")]
pub struct HyperslabRun {
    /// The linearised element offset of the run.
    pub offset: u64,
    /// The number of elements in the run.
    pub length: u64,
}

impl Hyperslab {
    /// Create a new hyperslab.
    ///
    /// # Errors
    /// Returns [`InvalidHyperslabError`] if the lengths of `start` and `shape` differ.
    pub fn new(start: Vec<u64>, shape: Vec<u64>) -> Result<Self, InvalidHyperslabError> {
        if start.len() == shape.len() {
            Ok(Self { start, shape })
        } else {
            Err(InvalidHyperslabError::IncompatibleStartShape { start, shape })
        }
    }

    /// Create a new hyperslab with `shape` starting at the origin.
    #[must_use]
    pub fn new_with_shape(shape: Vec<u64>) -> Self {
        Self {
            start: vec![0; shape.len()],
            shape,
        }
    }

    /// Create a new hyperslab from a list of [`Range`]s.
    #[must_use]
    pub fn new_with_ranges(ranges: &[Range<u64>]) -> Self {
        let (start, shape) = ranges
            .iter()
            .map(|range| (range.start, range.end.saturating_sub(range.start)))
            .unzip();
        Self { start, shape }
    }

    /// Return the start.
    #[must_use]
    pub fn start(&self) -> &[u64] {
        &self.start
    }

    /// Return the shape.
    #[must_use]
    pub fn shape(&self) -> &[u64] {
        &self.shape
    }

    /// Return the dimensionality.
    #[must_use]
    pub fn dimensionality(&self) -> usize {
        self.start.len()
    }

    /// Return the hyperslab as a list of ranges.
    #[must_use]
    pub fn to_ranges(&self) -> Vec<Range<u64>> {
        izip!(&self.start, &self.shape)
            .map(|(&start, &size)| start..start + size)
            .collect()
    }

    /// Return the number of elements in the hyperslab.
    #[must_use]
    pub fn num_elements(&self) -> u64 {
        self.shape.iter().product()
    }

    /// Check that the hyperslab fits within a variable of shape `array_shape`.
    ///
    /// # Errors
    /// Returns [`InvalidHyperslabError`] if the dimensionality differs or the hyperslab extends past `array_shape`.
    pub fn validate(&self, array_shape: &[u64]) -> Result<(), InvalidHyperslabError> {
        if self.dimensionality() != array_shape.len() {
            return Err(InvalidHyperslabError::IncompatibleDimensionality {
                got: self.dimensionality(),
                expected: array_shape.len(),
            });
        }
        let inbounds = izip!(&self.start, &self.shape, array_shape)
            .all(|(&start, &size, &extent)| start.saturating_add(size) <= extent);
        if inbounds {
            Ok(())
        } else {
            Err(InvalidHyperslabError::OutOfBounds {
                hyperslab: self.clone(),
                array_shape: array_shape.to_vec(),
            })
        }
    }

    /// Return the contiguous runs of the hyperslab within a variable of shape `array_shape`, in row-major order.
    ///
    /// Trailing dimensions fully spanned by the hyperslab are merged into a single run.
    ///
    /// # Errors
    /// Returns [`InvalidHyperslabError`] if the hyperslab does not fit within `array_shape`.
    pub fn contiguous_runs(
        &self,
        array_shape: &[u64],
    ) -> Result<Vec<HyperslabRun>, InvalidHyperslabError> {
        self.validate(array_shape)?;
        if self.num_elements() == 0 {
            return Ok(vec![]);
        }

        // Dimensions from `split` on are read as one run
        let mut split = self.dimensionality();
        while split > 0 {
            let d = split - 1;
            split = d;
            if self.start[d] != 0 || self.shape[d] != array_shape[d] {
                break;
            }
        }
        let length: u64 = self.shape[split..].iter().product();

        let mut strides = vec![1u64; array_shape.len()];
        for d in (0..array_shape.len().saturating_sub(1)).rev() {
            strides[d] = strides[d + 1] * array_shape[d + 1];
        }

        let outer_shape = &self.shape[..split];
        let num_runs: u64 = outer_shape.iter().product();
        let mut runs = Vec::with_capacity(usize::try_from(num_runs).unwrap_or(0));
        let mut outer = vec![0u64; split];
        for _ in 0..num_runs {
            let offset = izip!(&self.start, &strides)
                .enumerate()
                .map(|(d, (&start, &stride))| {
                    let index = if d < split { start + outer[d] } else { start };
                    index * stride
                })
                .sum();
            runs.push(HyperslabRun { offset, length });

            for d in (0..split).rev() {
                outer[d] += 1;
                if outer[d] < outer_shape[d] {
                    break;
                }
                outer[d] = 0;
            }
        }
        Ok(runs)
    }
}
