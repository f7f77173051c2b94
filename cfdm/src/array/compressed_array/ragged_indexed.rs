use std::sync::Arc;

use super::{Placement, decompress, uncompressed_shape};
use crate::array::{ArrayError, DataType, DenseArrayTraits, Element, FileBackedArray, MaskedArray};
use crate::compression::{CompressionDescriptor, RaggedIndexedDescriptor};
use crate::indexer::Subspace;

/// An indexed ragged array.
///
/// The sample dimension of the wrapped array is replaced by `(instance, element)`.
/// Instance `i` holds every sample whose index is `i`, in on-disk order. Rows shorter than the longest are padded with masked elements.
#[derive(Clone, Debug)]
pub struct RaggedIndexedArray {
    array: FileBackedArray,
    descriptor: Arc<RaggedIndexedDescriptor>,
    sample_axis: usize,
    implied_shape: Vec<u64>,
    shape: Vec<u64>,
}

/// Rank each entry of `index` among the earlier entries with the same instance.
///
/// Returns `(instance, rank)` for each entry, or [`ArrayError::InvalidInstanceIndex`] for an index outside `[0, instance_size)`.
pub(super) fn rank_by_instance(
    index: &[i64],
    instance_size: u64,
) -> Result<Vec<(u64, u64)>, ArrayError> {
    let mut ranks = vec![0u64; usize::try_from(instance_size).unwrap_or(0)];
    index
        .iter()
        .map(|&i| {
            let rank = usize::try_from(i)
                .ok()
                .and_then(|i| ranks.get_mut(i))
                .ok_or(ArrayError::InvalidInstanceIndex {
                    index: i,
                    instance_size,
                })?;
            let j = *rank;
            *rank += 1;
            Ok((i.unsigned_abs(), j))
        })
        .collect()
}

impl RaggedIndexedArray {
    /// Create a new indexed ragged array.
    ///
    /// # Errors
    /// Returns [`ArrayError::InvalidSampleAxis`] if `sample_axis` is not an axis of `array`.
    pub fn new(
        array: FileBackedArray,
        descriptor: Arc<RaggedIndexedDescriptor>,
        sample_axis: usize,
    ) -> Result<Self, ArrayError> {
        let implied_shape = CompressionDescriptor::RaggedIndexed(descriptor.clone()).implied_shape();
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
    pub fn descriptor(&self) -> &Arc<RaggedIndexedDescriptor> {
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

    fn placements(&self) -> Result<Vec<Placement>, ArrayError> {
        let ranks = rank_by_instance(&self.descriptor.index, self.descriptor.instance_size)?;
        Ok(ranks
            .into_iter()
            .enumerate()
            .map(|(sample, (instance, element))| (sample as u64, vec![instance, element]))
            .collect())
    }
}

impl DenseArrayTraits for RaggedIndexedArray {
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
            &self.placements()?,
            subspace,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_in_encounter_order() {
        assert_eq!(
            rank_by_instance(&[1, 0, 1, 0, 1], 2).unwrap(),
            vec![(1, 0), (0, 0), (1, 1), (0, 1), (1, 2)]
        );
        assert!(matches!(
            rank_by_instance(&[0, 2], 2),
            Err(ArrayError::InvalidInstanceIndex {
                index: 2,
                instance_size: 2
            })
        ));
        assert!(rank_by_instance(&[-1], 2).is_err());
    }
}
