use auto_impl::auto_impl;

use super::{Bytes, DatasetMetadata, Hyperslab, StorageError};

/// Readable storage traits.
#[auto_impl(Arc, &)]
pub trait ReadableStorageTraits: Send + Sync {
    /// Retrieve the dataset header: dimensions, variables and global attributes.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if there is an underlying storage error.
    fn metadata(&self) -> Result<DatasetMetadata, StorageError>;

    /// Retrieve the native-endian bytes of `hyperslab` of `variable` in row-major order.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if the variable does not exist, the hyperslab is out of bounds, or there is an underlying storage error.
    fn get_hyperslab(&self, variable: &str, hyperslab: &Hyperslab) -> Result<Bytes, StorageError>;

    /// Retrieve the native-endian bytes of every element of `variable`.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if the variable does not exist or there is an underlying storage error.
    fn get_variable(&self, variable: &str) -> Result<Bytes, StorageError> {
        let shape = self.metadata()?.variable_shape(variable)?;
        self.get_hyperslab(variable, &Hyperslab::new_with_shape(shape))
    }
}
