use std::sync::Arc;

use super::{Placement, decompress, uncompressed_shape};
use crate::array::{
    ArrayError, DataType, DenseArrayTraits, Element, FileBackedArray, MaskedArray, unravel_index,
};
use crate::compression::GatheredDescriptor;
use crate::indexer::Subspace;

/// A gathered array.
///
/// The list dimension of the wrapped array is replaced by the dimensions named in the `compress` attribute of the list variable.
/// Elements of the implied array not listed in the list variable are masked.
#[derive(Clone, Debug)]
pub struct GatheredArray {
    array: FileBackedArray,
    descriptor: Arc<GatheredDescriptor>,
    sample_axis: usize,
    shape: Vec<u64>,
}

impl GatheredArray {
    /// Create a new gathered array.
    ///
    /// # Errors
    /// Returns [`ArrayError::InvalidSampleAxis`] if `sample_axis` is not an axis of `array`.
    pub fn new(
        array: FileBackedArray,
        descriptor: Arc<GatheredDescriptor>,
        sample_axis: usize,
    ) -> Result<Self, ArrayError> {
        let shape = uncompressed_shape(array.shape(), sample_axis, &descriptor.implied_shape)?;
        Ok(Self {
            array,
            descriptor,
            sample_axis,
            shape,
        })
    }

    /// Return the descriptor.
    #[must_use]
    pub fn descriptor(&self) -> &Arc<GatheredDescriptor> {
        &self.descriptor
    }

    /// Return the wrapped on-disk array.
    #[must_use]
    pub fn compressed_array(&self) -> &FileBackedArray {
        &self.array
    }

    /// Return the list axis of the wrapped array.
    #[must_use]
    pub fn sample_axis(&self) -> usize {
        self.sample_axis
    }

    /// Unravel each list index against the implied shape, most significant axis first.
    fn placements(&self) -> Result<Vec<Placement>, ArrayError> {
        let implied_shape = &self.descriptor.implied_shape;
        let size: u64 = implied_shape.iter().product();
        self.descriptor
            .indices
            .iter()
            .enumerate()
            .map(|(sample, &index)| {
                let implied = u64::try_from(index)
                    .ok()
                    .and_then(|index| unravel_index(index, implied_shape))
                    .ok_or(ArrayError::InvalidGatheredIndex { index, size })?;
                Ok((sample as u64, implied))
            })
            .collect()
    }
}

impl DenseArrayTraits for GatheredArray {
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
            &self.descriptor.implied_shape,
            &self.placements()?,
            subspace,
        )
    }
}
