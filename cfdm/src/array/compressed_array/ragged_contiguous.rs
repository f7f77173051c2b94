use std::sync::Arc;

use super::{Placement, decompress, uncompressed_shape};
use crate::array::{ArrayError, DataType, DenseArrayTraits, Element, FileBackedArray, MaskedArray};
use crate::compression::{CompressionDescriptor, RaggedContiguousDescriptor};
use crate::indexer::Subspace;

/// A contiguous ragged array.
///
/// The sample dimension of the wrapped array is replaced by `(instance, element)`.
/// Instance `i` holds the `counts[i]` samples following those of the earlier instances. Rows shorter than the longest are padded with masked elements.
#[derive(Clone, Debug)]
pub struct RaggedContiguousArray {
    array: FileBackedArray,
    descriptor: Arc<RaggedContiguousDescriptor>,
    sample_axis: usize,
    implied_shape: Vec<u64>,
    shape: Vec<u64>,
}

impl RaggedContiguousArray {
    /// Create a new contiguous ragged array.
    ///
    /// # Errors
    /// Returns [`ArrayError::InvalidSampleAxis`] if `sample_axis` is not an axis of `array`.
    pub fn new(
        array: FileBackedArray,
        descriptor: Arc<RaggedContiguousDescriptor>,
        sample_axis: usize,
    ) -> Result<Self, ArrayError> {
        let implied_shape =
            CompressionDescriptor::RaggedContiguous(descriptor.clone()).implied_shape();
        let shape = uncompressed_shape(array.shape(), sample_axis, &implied_shape)?;
        Ok(Self {
            array,
            descriptor,
            sample_axis,
            implied_shape,
            shape,
        })
    }

    /// Return the descriptor.
    #[must_use]
    pub fn descriptor(&self) -> &Arc<RaggedContiguousDescriptor> {
        &self.descriptor
    }

    /// Return the wrapped on-disk array.
    #[must_use]
    pub fn compressed_array(&self) -> &FileBackedArray {
        &self.array
    }

    /// Return the sample axis of the wrapped array.
    #[must_use]
    pub fn sample_axis(&self) -> usize {
        self.sample_axis
    }

    fn placements(&self) -> Vec<Placement> {
        let mut placements = Vec::new();
        let mut offset = 0;
        for (instance, &count) in self.descriptor.counts.iter().enumerate() {
            placements.extend((0..count).map(|element| (offset + element, vec![instance as u64, element])));
            offset += count;
        }
        placements
    }
}

impl DenseArrayTraits for RaggedContiguousArray {
    fn shape(&self) -> &[u64] {
        &self.shape
    }

    fn data_type(&self) -> DataType {
        self.array.data_type()
    }

    fn retrieve<T: Element>(&self, subspace: &Subspace) -> Result<MaskedArray<T>, ArrayError> {
        decompress(
            &self.array,
            self.sample_axis,
            &self.shape,
            &self.implied_shape,
            &self.placements(),
            subspace,
        )
    }
}
