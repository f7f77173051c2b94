//! The storage API for the `cfdm` crate.
//!
//! A store exposes the header of a netCDF dataset (dimensions, variables and attributes) as [`DatasetMetadata`]
//! and serves the raw native-endian bytes of rectangular regions ([`Hyperslab`]s) of its variables.
//!
//! This crate includes an in-memory store implementation ([`store::MemoryStore`]).
//! A store backed by the netCDF C library is available with the `netcdf` feature ([`store::NetcdfStore`]).
//!
//! ## Licence
//! `cfdm_storage` is licensed under either of
//! - the Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> or
//! - the MIT license <http://opensource.org/licenses/MIT>, at your option.
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

mod hyperslab;
mod metadata;
mod storage_sync;
pub mod store;

use std::sync::Arc;

use thiserror::Error;

pub use hyperslab::{Hyperslab, HyperslabRun, InvalidHyperslabError};
pub use metadata::{
    AttributeValue, Attributes, DatasetMetadata, Dimension, VariableMetadata,
};
pub use storage_sync::ReadableStorageTraits;

/// [`Arc`] wrapped readable storage.
pub type ReadableStorage = Arc<dyn ReadableStorageTraits>;

/// The type for bytes returned by store reads.
///
/// An alias for [`bytes::Bytes`].
pub type Bytes = bytes::Bytes;

/// A storage error.
#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum StorageError {
    /// An IO error.
    #[error(transparent)]
    IOError(#[from] Arc<std::io::Error>),
    /// The store has no variable with this name.
    #[error("unknown variable {0}")]
    UnknownVariable(String),
    /// The store has no dimension with this name.
    #[error("unknown dimension {0} of variable {1}")]
    UnknownDimension(String, String),
    /// An invalid hyperslab.
    #[error(transparent)]
    InvalidHyperslab(#[from] InvalidHyperslabError),
    /// Inconsistent metadata.
    #[error("invalid metadata for {0}: {1}")]
    InvalidMetadata(String, String),
    /// Unsupported operation or data type.
    #[error("unsupported: {0}")]
    Unsupported(String),
    /// Any other error.
    #[error("{0}")]
    Other(String),
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        Self::IOError(Arc::new(err))
    }
}

impl From<&str> for StorageError {
    fn from(err: &str) -> Self {
        Self::Other(err.to_string())
    }
}

impl From<String> for StorageError {
    fn from(err: String) -> Self {
        Self::Other(err)
    }
}
