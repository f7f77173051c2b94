//! A read session over one dataset.

mod read_options;

pub use read_options::ReadOptions;

use cfdm_storage::{DatasetMetadata, Dimension, ReadableStorage, StorageError};

use crate::array::{ArrayError, CompressedArray, FileBackedArray, VariableArray};
use crate::compression::{
    CompressionError, CompressionMap, CompressionScan, CompressionScanner, Diagnostic,
    DimensionMapper,
};

/// An open dataset.
///
/// The header is read and scanned for compression once, when the dataset is opened.
/// Variables are read lazily through the arrays returned by [`Dataset::array`].
#[derive(Clone)]
pub struct Dataset {
    storage: ReadableStorage,
    metadata: DatasetMetadata,
    scan: CompressionScan,
    options: ReadOptions,
}

impl std::fmt::Debug for Dataset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dataset")
            .field("metadata", &self.metadata)
            .field("scan", &self.scan)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Dataset {
    /// Open a dataset with default [`ReadOptions`].
    ///
    /// # Errors
    /// Returns a [`CompressionError`] if the header cannot be read or the compression scan fails.
    pub fn open(storage: ReadableStorage) -> Result<Self, CompressionError> {
        Self::open_opt(storage, ReadOptions::default())
    }

    /// Open a dataset with non-default [`ReadOptions`].
    ///
    /// # Errors
    /// See [`Dataset::open`].
    pub fn open_opt(storage: ReadableStorage, options: ReadOptions) -> Result<Self, CompressionError> {
        let metadata = storage.metadata()?;
        let scan = CompressionScanner::new(&*storage, &metadata).scan()?;
        log::debug!(
            "opened dataset with {} variables and {} compressed sample dimensions",
            metadata.variables().len(),
            scan.compression().len()
        );
        Ok(Self {
            storage,
            metadata,
            scan,
            options,
        })
    }

    /// Return the dataset header.
    #[must_use]
    pub const fn metadata(&self) -> &DatasetMetadata {
        &self.metadata
    }

    /// Return the read options.
    #[must_use]
    pub const fn options(&self) -> &ReadOptions {
        &self.options
    }

    /// Return the global `featureType` attribute, if present.
    #[must_use]
    pub fn feature_type(&self) -> Option<&str> {
        self.scan.feature_type()
    }

    /// Return the compression descriptors keyed by sample dimension.
    #[must_use]
    pub const fn compression(&self) -> &CompressionMap {
        self.scan.compression()
    }

    /// Return the diagnostics of malformed compression attributes.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.scan.diagnostics()
    }

    /// Return the names of the data variables: every variable that is not a list, count or index variable.
    #[must_use]
    pub fn field_variables(&self) -> Vec<&str> {
        self.metadata
            .variables()
            .iter()
            .map(|variable| variable.name())
            .filter(|name| !self.scan.non_field_variables().contains(*name))
            .collect()
    }

    /// Return the names of the list, count and index variables.
    #[must_use]
    pub fn non_field_variables(&self) -> Vec<&str> {
        self.scan
            .non_field_variables()
            .iter()
            .map(String::as_str)
            .collect()
    }

    /// Return the dimensions of the dataset followed by the element dimensions synthesized for ragged arrays.
    #[must_use]
    pub fn domain_axes(&self) -> Vec<Dimension> {
        self.metadata
            .dimensions()
            .iter()
            .chain(self.scan.synthesized_dimensions())
            .cloned()
            .collect()
    }

    fn is_uncompressed(&self, variable: &str) -> bool {
        !self.options.uncompress() || self.scan.non_field_variables().contains(variable)
    }

    /// Return the dimensions of `variable` as presented by [`Dataset::array`].
    ///
    /// # Errors
    /// Returns [`StorageError::UnknownVariable`] if `variable` is not in the dataset.
    pub fn implied_dimensions(&self, variable: &str) -> Result<Vec<String>, StorageError> {
        let dimensions = self
            .metadata
            .variable(variable)
            .ok_or_else(|| StorageError::UnknownVariable(variable.to_string()))?
            .dimensions();
        if self.is_uncompressed(variable) {
            Ok(dimensions.to_vec())
        } else {
            Ok(DimensionMapper::new(self.scan.compression()).implied_dimensions(dimensions))
        }
    }

    /// Return the array of `variable`.
    ///
    /// A variable spanning a compressed sample dimension is returned as a [`CompressedArray`] with its uncompressed shape,
    /// unless uncompression is disabled in the [`ReadOptions`].
    ///
    /// # Errors
    /// Returns an [`ArrayError`] if `variable` is not in the dataset.
    pub fn array(&self, variable: &str) -> Result<VariableArray, ArrayError> {
        let array = FileBackedArray::new(self.storage.clone(), &self.metadata, variable)?
            .with_mask(self.options.mask());
        if self.is_uncompressed(variable) {
            return Ok(VariableArray::Uncompressed(array));
        }

        let dimensions = self
            .metadata
            .variable(variable)
            .map(|metadata| metadata.dimensions())
            .unwrap_or_default();
        match DimensionMapper::new(self.scan.compression()).compressed_axis(dimensions) {
            Some((sample_axis, descriptor)) => {
                log::debug!(
                    "{variable} is compressed by {} along axis {sample_axis}",
                    descriptor.compression_type()
                );
                Ok(VariableArray::Compressed(CompressedArray::new(
                    array,
                    descriptor,
                    sample_axis,
                )?))
            }
            None => Ok(VariableArray::Uncompressed(array)),
        }
    }

    /// Close the dataset, dropping its storage handle.
    ///
    /// The storage is released once the last handle is dropped.
    /// Arrays returned by [`Dataset::array`] and clones of the dataset hold their own handle and remain readable.
    pub fn close(self) {
        log::debug!("closing dataset");
        drop(self.storage);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use cfdm_data_type::DataType;
    use cfdm_storage::VariableMetadata;
    use cfdm_storage::store::MemoryStore;

    use super::*;
    use crate::array::DenseArrayTraits;
    use crate::indexer::Subspace;

    fn gathered_store() -> MemoryStore {
        let store = MemoryStore::new();
        store.add_dimension("lat", 2);
        store.add_dimension("lon", 3);
        store.add_dimension("list", 2);
        store
            .add_variable(
                VariableMetadata::new("list", DataType::Int32, vec!["list".to_string()])
                    .with_attribute("compress", "lat lon"),
                &[1i32, 5],
            )
            .unwrap();
        store
            .add_variable(
                VariableMetadata::new("pr", DataType::Float32, vec!["list".to_string()]),
                &[10.0f32, 20.0],
            )
            .unwrap();
        store
    }

    #[test]
    fn dataset_field_variables() {
        let dataset = Dataset::open(Arc::new(gathered_store())).unwrap();
        assert_eq!(dataset.field_variables(), vec!["pr"]);
        assert_eq!(dataset.non_field_variables(), vec!["list"]);
        assert_eq!(dataset.implied_dimensions("pr").unwrap(), vec!["lat", "lon"]);
        assert_eq!(dataset.implied_dimensions("list").unwrap(), vec!["list"]);
        assert!(dataset.implied_dimensions("missing").is_err());
        assert_eq!(dataset.feature_type(), None);
        assert_eq!(dataset.domain_axes().len(), 3);

        let list = dataset.array("list").unwrap();
        assert!(!list.is_compressed());
        let pr = dataset.array("pr").unwrap();
        assert!(pr.is_compressed());
        assert_eq!(pr.shape(), &[2, 3]);
        dataset.close();
    }

    #[test]
    fn dataset_close_releases_storage() {
        let store = Arc::new(gathered_store());
        let dataset = Dataset::open(store.clone()).unwrap();
        let pr = dataset.array("pr").unwrap();
        let handles = Arc::strong_count(&store);
        dataset.close();
        assert_eq!(Arc::strong_count(&store), handles - 1);

        let values = pr.retrieve::<f32>(&Subspace::All).unwrap();
        assert_eq!(values.compressed(), vec![10.0, 20.0]);
    }

    #[test]
    fn dataset_uncompress_disabled() {
        let options = ReadOptions::default().with_uncompress(false);
        let dataset = Dataset::open_opt(Arc::new(gathered_store()), options).unwrap();
        assert!(!dataset.options().uncompress());
        assert_eq!(dataset.implied_dimensions("pr").unwrap(), vec!["list"]);
        let pr = dataset.array("pr").unwrap();
        assert!(!pr.is_compressed());
        assert_eq!(pr.shape(), &[2]);
    }

    #[test]
    fn read_options() {
        let mut options = ReadOptions::default();
        assert!(options.uncompress());
        assert!(options.mask());
        options.set_mask(false).set_uncompress(false);
        assert!(!options.mask());
        assert!(!options.uncompress());
    }
}
