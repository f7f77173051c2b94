use cfdm_data_type::ElementError;
use cfdm_storage::StorageError;
use thiserror::Error;

use crate::indexer::IndexerError;

/// An array error.
#[derive(Clone, Debug, Error)]
#[non_exhaustive]
pub enum ArrayError {
    /// A store error.
    #[error(transparent)]
    StorageError(#[from] StorageError),
    /// An indexing error.
    #[error(transparent)]
    IndexerError(#[from] IndexerError),
    /// An element error, such as an element type that does not match the data type.
    #[error(transparent)]
    ElementError(#[from] ElementError),
    /// A gathered list index outside of the implied array.
    #[error("gathered list index {index} is out of bounds of the implied array with {size} elements")]
    InvalidGatheredIndex {
        /// The stored list index.
        index: i64,
        /// The number of elements of the implied array.
        size: u64,
    },
    /// A ragged index naming an instance outside of the instance dimension.
    #[error("ragged index {index} is out of bounds of the instance dimension with size {instance_size}")]
    InvalidInstanceIndex {
        /// The stored instance index.
        index: i64,
        /// The size of the instance dimension.
        instance_size: u64,
    },
    /// A sample position beyond the compressed length.
    #[error("sample position {index} is beyond the compressed length {length}")]
    SampleIndexOutOfBounds {
        /// The sample position.
        index: u64,
        /// The length of the sample dimension.
        length: u64,
    },
    /// An indexed contiguous ragged array has more profile counts than profile instance indices.
    #[error("{profile_counts} profile counts but only {profile_instances} profile instance indices")]
    ProfileCountMismatch {
        /// The number of profile counts of the count variable.
        profile_counts: usize,
        /// The number of entries of the index variable.
        profile_instances: usize,
    },
    /// Implied indices outside of the uncompressed shape.
    #[error("implied indices {_0:?} are out of bounds of implied shape {_1:?}")]
    ImpliedIndicesOutOfBounds(Vec<u64>, Vec<u64>),
    /// The sample axis is not a dimension of the compressed array.
    #[error("sample axis {_0} is out of bounds of an array with dimensionality {_1}")]
    InvalidSampleAxis(usize, usize),
    /// Invalid data shape.
    #[error("data has shape {_0:?}, expected {_1:?}")]
    InvalidDataShape(Vec<usize>, Vec<usize>),
    /// Any other error.
    #[error("{_0}")]
    Other(String),
}
