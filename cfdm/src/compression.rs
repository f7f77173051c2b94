//! Compression bookkeeping.
//!
//! [`scan`] inspects the header of a dataset for the CF compression encodings:
//!  - a list variable with a `compress` attribute (compression by gathering),
//!  - a count variable with a `sample_dimension` attribute (contiguous ragged array), and
//!  - an index variable with an `instance_dimension` attribute (indexed ragged array).
//!
//! Count and index variables are only recognised when the dataset has a global `featureType` attribute.
//! When a count variable partitions samples into profiles and an index variable assigns those profiles to instances,
//! the two are composed into an indexed contiguous ragged array.
//!
//! The result is a [`CompressionMap`] from each compressed sample dimension to its [`CompressionDescriptor`].
//! A [`DimensionMapper`] uses the map to find the implied (uncompressed) dimensions of a variable.

mod descriptor;
mod diagnostics;
mod dimension_mapper;
mod scanner;

use std::collections::BTreeMap;

pub use descriptor::{
    CompressionDescriptor, CompressionType, GatheredDescriptor, RaggedContiguousDescriptor,
    RaggedIndexedContiguousDescriptor, RaggedIndexedDescriptor,
};
pub use diagnostics::{Diagnostic, DiagnosticCode};
pub use dimension_mapper::DimensionMapper;
pub use scanner::{CompressionError, CompressionScan, CompressionScanner, scan};

/// Compression descriptors keyed by the name of their compressed sample dimension.
#[derive(Clone, Debug, Default, PartialEq, Eq, derive_more::Deref)]
pub struct CompressionMap(BTreeMap<String, CompressionDescriptor>);

impl CompressionMap {
    /// Create an empty compression map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `descriptor` keyed by its sample dimension, returning any descriptor it replaces.
    pub fn insert(&mut self, descriptor: CompressionDescriptor) -> Option<CompressionDescriptor> {
        self.0
            .insert(descriptor.sample_dimension().to_string(), descriptor)
    }

    /// Remove the descriptor of `sample_dimension`.
    pub fn remove(&mut self, sample_dimension: &str) -> Option<CompressionDescriptor> {
        self.0.remove(sample_dimension)
    }
}

impl FromIterator<CompressionDescriptor> for CompressionMap {
    fn from_iter<I: IntoIterator<Item = CompressionDescriptor>>(iter: I) -> Self {
        let mut map = Self::new();
        for descriptor in iter {
            map.insert(descriptor);
        }
        map
    }
}
