//! Dense array views of netCDF variables.
//!
//! Every array in this module implements [`DenseArrayTraits`]: it has a fixed shape and data type, and [`DenseArrayTraits::retrieve`] reads a [`Subspace`] of it into a [`MaskedArray`].
//!
//!  - [`FileBackedArray`]: a variable as stored on disk.
//!  - [`CompressedArray`]: a gathered or ragged variable presented with its uncompressed shape.
//!  - [`VariableArray`]: either of the above, as returned by [`Dataset::array`](crate::dataset::Dataset::array).

mod array_errors;
pub mod compressed_array;
mod file_backed_array;
mod masked_array;

pub use array_errors::ArrayError;
pub use compressed_array::{
    CompressedArray, GatheredArray, RaggedContiguousArray, RaggedIndexedArray,
    RaggedIndexedContiguousArray,
};
pub use file_backed_array::FileBackedArray;
pub use masked_array::MaskedArray;

pub use crate::indexer::{DimensionIndex, SliceIndex, Subspace};
pub use cfdm_data_type::{DataType, Element};

/// An array shape. Dimensions are ordered slowest varying first.
pub type ArrayShape = Vec<u64>;

/// The indices of an element of an array.
pub type ArrayIndices = Vec<u64>;

/// The interface shared by every dense array.
pub trait DenseArrayTraits {
    /// Return the shape of the array.
    fn shape(&self) -> &[u64];

    /// Return the data type of the array.
    fn data_type(&self) -> DataType;

    /// Return the dimensionality of the array.
    fn ndim(&self) -> usize {
        self.shape().len()
    }

    /// Return the number of elements of the array.
    fn size(&self) -> u64 {
        self.shape().iter().product()
    }

    /// Read the elements selected by `subspace`.
    ///
    /// # Errors
    /// Returns an [`ArrayError`] if
    ///  - `T` does not match the data type of the array,
    ///  - the subspace is incompatible with the shape of the array,
    ///  - the stored compression parameters are inconsistent, or
    ///  - there is an underlying storage error.
    fn retrieve<T: Element>(&self, subspace: &Subspace) -> Result<MaskedArray<T>, ArrayError>;
}

/// Convert an array shape to `usize` dimensions.
pub(crate) fn shape_to_usize(shape: &[u64]) -> Result<Vec<usize>, ArrayError> {
    shape
        .iter()
        .map(|&size| usize::try_from(size).map_err(|err| ArrayError::Other(err.to_string())))
        .collect()
}

/// Ravel ND indices to a linearised index in row-major order.
///
/// Returns [`None`] if the indices are out of bounds of `shape`.
#[must_use]
pub fn ravel_indices(indices: &[u64], shape: &[u64]) -> Option<u64> {
    if indices.len() != shape.len() {
        return None;
    }
    let mut index: u64 = 0;
    let mut count = 1;
    for (i, s) in std::iter::zip(indices, shape).rev() {
        if i >= s {
            return None;
        }
        index += i * count;
        count *= s;
    }
    Some(index)
}

/// Unravel a linearised index to ND indices in row-major order.
///
/// Indices are found by repeated division against the suffix products of `shape`, most significant axis first.
/// Returns [`None`] if `index` is out of bounds of `shape`.
#[must_use]
pub fn unravel_index(index: u64, shape: &[u64]) -> Option<ArrayIndices> {
    let total_size = shape
        .iter()
        .try_fold(1u64, |acc, &dim| acc.checked_mul(dim))?;
    if index >= total_size {
        return None;
    }
    let mut remainder = index;
    let mut stride = total_size;
    let mut indices = Vec::with_capacity(shape.len());
    for &size in shape {
        stride /= size;
        indices.push(remainder / stride);
        remainder %= stride;
    }
    Some(indices)
}

/// An array returned by [`Dataset::array`](crate::dataset::Dataset::array).
#[derive(Clone, Debug)]
pub enum VariableArray {
    /// A variable read as stored.
    Uncompressed(FileBackedArray),
    /// A compressed variable read with its uncompressed shape.
    Compressed(CompressedArray),
}

impl VariableArray {
    /// Returns true if the variable is decompressed on retrieval.
    #[must_use]
    pub const fn is_compressed(&self) -> bool {
        matches!(self, Self::Compressed(_))
    }
}

impl DenseArrayTraits for VariableArray {
    fn shape(&self) -> &[u64] {
        match self {
            Self::Uncompressed(array) => array.shape(),
            Self::Compressed(array) => array.shape(),
        }
    }

    fn data_type(&self) -> DataType {
        match self {
            Self::Uncompressed(array) => array.data_type(),
            Self::Compressed(array) => array.data_type(),
        }
    }

    fn retrieve<T: Element>(&self, subspace: &Subspace) -> Result<MaskedArray<T>, ArrayError> {
        match self {
            Self::Uncompressed(array) => array.retrieve(subspace),
            Self::Compressed(array) => array.retrieve(subspace),
        }
    }
}
