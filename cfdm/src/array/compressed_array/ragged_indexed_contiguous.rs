use std::sync::Arc;

use super::ragged_indexed::rank_by_instance;
use super::{Placement, decompress, uncompressed_shape};
use crate::array::{ArrayError, DataType, DenseArrayTraits, Element, FileBackedArray, MaskedArray};
use crate::compression::{CompressionDescriptor, RaggedIndexedContiguousDescriptor};
use crate::indexer::Subspace;

/// An indexed contiguous ragged array.
///
/// The sample dimension of the wrapped array is replaced by `(instance, profile, element)`.
/// Profile `p` holds the samples `[sum(count[..p]), sum(count[..=p]))` and is placed as the `j`th profile of its instance,
/// where `j` is the number of earlier profiles of that instance.
#[derive(Clone, Debug)]
pub struct RaggedIndexedContiguousArray {
    array: FileBackedArray,
    descriptor: Arc<RaggedIndexedContiguousDescriptor>,
    sample_axis: usize,
    implied_shape: Vec<u64>,
    shape: Vec<u64>,
}

impl RaggedIndexedContiguousArray {
    /// Create a new indexed contiguous ragged array.
    ///
    /// # Errors
    /// Returns [`ArrayError::InvalidSampleAxis`] if `sample_axis` is not an axis of `array`.
    pub fn new(
        array: FileBackedArray,
        descriptor: Arc<RaggedIndexedContiguousDescriptor>,
        sample_axis: usize,
    ) -> Result<Self, ArrayError> {
        let implied_shape =
            CompressionDescriptor::RaggedIndexedContiguous(descriptor.clone()).implied_shape();
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
    pub fn descriptor(&self) -> &Arc<RaggedIndexedContiguousDescriptor> {
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
        let profile_counts = self.descriptor.profile_counts();
        let profile_instance = self.descriptor.profile_instance();
        if profile_counts.len() > profile_instance.len() {
            return Err(ArrayError::ProfileCountMismatch {
                profile_counts: profile_counts.len(),
                profile_instances: profile_instance.len(),
            });
        }
        let ranks = rank_by_instance(profile_instance, self.descriptor.indexed.instance_size)?;

        let mut placements = Vec::new();
        let mut offset = 0;
        for (&count, &(instance, profile)) in profile_counts.iter().zip(&ranks) {
            placements.extend(
                (0..count).map(|element| (offset + element, vec![instance, profile, element])),
            );
            offset += count;
        }
        Ok(placements)
    }
}

impl DenseArrayTraits for RaggedIndexedContiguousArray {
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
    use cfdm_data_type::DataType;
    use cfdm_storage::store::MemoryStore;
    use cfdm_storage::{ReadableStorageTraits, VariableMetadata};

    use super::*;
    use crate::compression::{RaggedContiguousDescriptor, RaggedIndexedDescriptor};

    #[test]
    fn ragged_indexed_contiguous_profile_count_mismatch() {
        let store = MemoryStore::new();
        store.add_dimension("obs", 3);
        store
            .add_variable(
                VariableMetadata::new("temp", DataType::Float32, vec!["obs".to_string()]),
                &[1.0f32, 2.0, 3.0],
            )
            .unwrap();
        let metadata = store.metadata().unwrap();
        let array = FileBackedArray::new(Arc::new(store), &metadata, "temp").unwrap();

        let contiguous = RaggedContiguousDescriptor::new(
            "obs".to_string(),
            "row_size".to_string(),
            "profile".to_string(),
            vec![1, 1, 1],
            "profile_1".to_string(),
        );
        let indexed = RaggedIndexedDescriptor::new(
            "profile".to_string(),
            "station_index".to_string(),
            "station".to_string(),
            1,
            vec![0, 0],
            "timeseries".to_string(),
        );
        let descriptor = RaggedIndexedContiguousDescriptor::new(contiguous, indexed).unwrap();
        let array = RaggedIndexedContiguousArray::new(array, Arc::new(descriptor), 0).unwrap();
        assert_eq!(array.shape(), &[1, 2, 1]);
        assert!(matches!(
            array.retrieve::<f32>(&Subspace::All),
            Err(ArrayError::ProfileCountMismatch {
                profile_counts: 3,
                profile_instances: 2
            })
        ));
    }
}
