//! A synchronous in-memory store.

use std::collections::BTreeMap;

use bytes::BytesMut;
use cfdm_data_type::Element;
use parking_lot::Mutex;

use crate::{
    AttributeValue, Bytes, DatasetMetadata, Dimension, Hyperslab, ReadableStorageTraits,
    StorageError, VariableMetadata,
};

#[derive(Debug, Default)]
struct MemoryDataset {
    metadata: DatasetMetadata,
    data_map: BTreeMap<String, Bytes>,
}

/// A synchronous in-memory store.
///
/// Holds a dataset header and the native-endian bytes of each variable.
#[derive(Debug)]
pub struct MemoryStore {
    dataset: Mutex<MemoryDataset>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Create a new empty memory store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            dataset: Mutex::default(),
        }
    }

    /// Add (or replace) a fixed size dimension.
    pub fn add_dimension(&self, name: &str, size: u64) {
        self.dataset
            .lock()
            .metadata
            .push_dimension(Dimension::new(name, size));
    }

    /// Add (or replace) an unlimited dimension with its current size.
    pub fn add_unlimited_dimension(&self, name: &str, size: u64) {
        self.dataset
            .lock()
            .metadata
            .push_dimension(Dimension::new_unlimited(name, size));
    }

    /// Set a global attribute.
    pub fn set_global_attribute(&self, name: &str, value: impl Into<AttributeValue>) {
        self.dataset
            .lock()
            .metadata
            .set_attribute(name.to_string(), value.into());
    }

    /// Add (or replace) a variable holding `elements` in row-major order.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if
    ///  - the element type does not match the data type of `variable`,
    ///  - a dimension of `variable` has not been added, or
    ///  - the number of elements does not match the shape of `variable`.
    pub fn add_variable<T: Element>(
        &self,
        variable: VariableMetadata,
        elements: &[T],
    ) -> Result<(), StorageError> {
        T::validate_data_type(variable.data_type())
            .map_err(|err| StorageError::InvalidMetadata(variable.name().to_string(), err.to_string()))?;

        let mut dataset = self.dataset.lock();
        let mut num_elements: u64 = 1;
        for name in variable.dimensions() {
            let dimension = dataset.metadata.dimension(name).ok_or_else(|| {
                StorageError::UnknownDimension(name.clone(), variable.name().to_string())
            })?;
            num_elements *= dimension.size();
        }
        if num_elements != elements.len() as u64 {
            return Err(StorageError::InvalidMetadata(
                variable.name().to_string(),
                format!(
                    "{} elements supplied for a variable with {num_elements} elements",
                    elements.len()
                ),
            ));
        }

        let bytes = Bytes::from(T::to_ne_bytes_vec(elements));
        dataset
            .data_map
            .insert(variable.name().to_string(), bytes);
        dataset.metadata.push_variable(variable);
        Ok(())
    }
}

impl ReadableStorageTraits for MemoryStore {
    fn metadata(&self) -> Result<DatasetMetadata, StorageError> {
        Ok(self.dataset.lock().metadata.clone())
    }

    fn get_hyperslab(&self, variable: &str, hyperslab: &Hyperslab) -> Result<Bytes, StorageError> {
        let dataset = self.dataset.lock();
        let metadata = dataset
            .metadata
            .variable(variable)
            .ok_or_else(|| StorageError::UnknownVariable(variable.to_string()))?;
        let element_size = metadata.data_type().size();
        let array_shape = dataset.metadata.variable_shape(variable)?;
        let data = dataset
            .data_map
            .get(variable)
            .ok_or_else(|| StorageError::UnknownVariable(variable.to_string()))?;

        let runs = hyperslab.contiguous_runs(&array_shape)?;
        if let [run] = runs.as_slice() {
            let start = usize::try_from(run.offset).map_err(|err| err.to_string())? * element_size;
            let length = usize::try_from(run.length).map_err(|err| err.to_string())? * element_size;
            return Ok(data.slice(start..start + length));
        }

        let num_bytes = usize::try_from(hyperslab.num_elements()).map_err(|err| err.to_string())?
            * element_size;
        let mut out = BytesMut::with_capacity(num_bytes);
        for run in runs {
            let start = usize::try_from(run.offset).map_err(|err| err.to_string())? * element_size;
            let length = usize::try_from(run.length).map_err(|err| err.to_string())? * element_size;
            out.extend_from_slice(&data[start..start + length]);
        }
        Ok(out.freeze())
    }
}
