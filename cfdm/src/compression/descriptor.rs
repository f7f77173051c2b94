use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// The compression scheme of a sample dimension.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[serde(rename_all = "snake_case")]
pub enum CompressionType {
    /// Compression by gathering.
    #[display("gathered")]
    Gathered,
    /// A contiguous ragged array.
    #[display("ragged_contiguous")]
    RaggedContiguous,
    /// An indexed ragged array.
    #[display("ragged_indexed")]
    RaggedIndexed,
    /// An indexed contiguous ragged array.
    #[display("ragged_indexed_contiguous")]
    RaggedIndexedContiguous,
}

fn max_or_zero(values: &[u64]) -> u64 {
    values.iter().copied().max().unwrap_or(0)
}

/// The parameters of compression by gathering.
///
/// The list variable holds, for each element of the sample (list) dimension, the row-major flat index of the element in the implied array spanned by the compressed dimensions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GatheredDescriptor {
    pub(crate) sample_dimension: String,
    pub(crate) list_variable: String,
    pub(crate) indices: Vec<i64>,
    pub(crate) implied_dimensions: Vec<String>,
    pub(crate) implied_shape: Vec<u64>,
}

impl GatheredDescriptor {
    /// Create a new gathered descriptor.
    #[must_use]
    pub fn new(
        sample_dimension: String,
        list_variable: String,
        indices: Vec<i64>,
        implied_dimensions: Vec<String>,
        implied_shape: Vec<u64>,
    ) -> Self {
        Self {
            sample_dimension,
            list_variable,
            indices,
            implied_dimensions,
            implied_shape,
        }
    }

    /// Return the name of the list variable.
    #[must_use]
    pub fn list_variable(&self) -> &str {
        &self.list_variable
    }

    /// Return the stored flat indices.
    #[must_use]
    pub fn indices(&self) -> &[i64] {
        &self.indices
    }
}

/// The parameters of a contiguous ragged array.
///
/// Instance `i` owns the `counts[i]` consecutive samples following those of instance `i - 1`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RaggedContiguousDescriptor {
    pub(crate) sample_dimension: String,
    pub(crate) count_variable: String,
    pub(crate) instance_dimension: String,
    pub(crate) counts: Vec<u64>,
    pub(crate) element_dimension: String,
}

impl RaggedContiguousDescriptor {
    /// Create a new contiguous ragged array descriptor.
    #[must_use]
    pub fn new(
        sample_dimension: String,
        count_variable: String,
        instance_dimension: String,
        counts: Vec<u64>,
        element_dimension: String,
    ) -> Self {
        Self {
            sample_dimension,
            count_variable,
            instance_dimension,
            counts,
            element_dimension,
        }
    }

    /// Return the name of the count variable.
    #[must_use]
    pub fn count_variable(&self) -> &str {
        &self.count_variable
    }

    /// Return the instance dimension: the dimension of the count variable.
    #[must_use]
    pub fn instance_dimension(&self) -> &str {
        &self.instance_dimension
    }

    /// Return the number of elements of each instance.
    #[must_use]
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Return the name of the synthesized element dimension.
    #[must_use]
    pub fn element_dimension(&self) -> &str {
        &self.element_dimension
    }

    /// Return the size of the element dimension: the largest count.
    #[must_use]
    pub fn element_size(&self) -> u64 {
        max_or_zero(&self.counts)
    }
}

/// The parameters of an indexed ragged array.
///
/// Sample `s` belongs to instance `index[s]`. The elements of an instance keep their on-disk order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RaggedIndexedDescriptor {
    pub(crate) sample_dimension: String,
    pub(crate) index_variable: String,
    pub(crate) instance_dimension: String,
    pub(crate) instance_size: u64,
    pub(crate) index: Vec<i64>,
    pub(crate) counts: Vec<u64>,
    pub(crate) element_dimension: String,
}

impl RaggedIndexedDescriptor {
    /// Create a new indexed ragged array descriptor.
    ///
    /// The number of elements of each instance is derived from `index`. Indices outside `[0, instance_size)` are not counted.
    #[must_use]
    pub fn new(
        sample_dimension: String,
        index_variable: String,
        instance_dimension: String,
        instance_size: u64,
        index: Vec<i64>,
        element_dimension: String,
    ) -> Self {
        let mut counts = vec![0u64; usize::try_from(instance_size).unwrap_or(0)];
        for &instance in &index {
            if let Some(count) = usize::try_from(instance).ok().and_then(|i| counts.get_mut(i)) {
                *count += 1;
            }
        }
        Self {
            sample_dimension,
            index_variable,
            instance_dimension,
            instance_size,
            index,
            counts,
            element_dimension,
        }
    }

    /// Return the name of the index variable.
    #[must_use]
    pub fn index_variable(&self) -> &str {
        &self.index_variable
    }

    /// Return the instance dimension named by the `instance_dimension` attribute.
    #[must_use]
    pub fn instance_dimension(&self) -> &str {
        &self.instance_dimension
    }

    /// Return the owning instance of each sample.
    #[must_use]
    pub fn index(&self) -> &[i64] {
        &self.index
    }

    /// Return the number of elements of each instance.
    #[must_use]
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Return the name of the synthesized element dimension.
    #[must_use]
    pub fn element_dimension(&self) -> &str {
        &self.element_dimension
    }

    /// Return the size of the element dimension: the largest count.
    #[must_use]
    pub fn element_size(&self) -> u64 {
        max_or_zero(&self.counts)
    }

    /// Return the first index outside `[0, instance_size)`, if any.
    #[must_use]
    pub fn invalid_index(&self) -> Option<i64> {
        let instance_size = i64::try_from(self.instance_size).unwrap_or(i64::MAX);
        self.index
            .iter()
            .copied()
            .find(|&i| !(0..instance_size).contains(&i))
    }
}

/// The parameters of an indexed contiguous ragged array.
///
/// Samples are grouped into contiguous profiles (`profile_counts`), and each profile belongs to instance `profile_instance[p]`.
/// Profile `p` is placed as the `j`th profile of its instance, where `j` counts the earlier profiles of that instance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RaggedIndexedContiguousDescriptor {
    pub(crate) contiguous: RaggedContiguousDescriptor,
    pub(crate) indexed: RaggedIndexedDescriptor,
}

impl RaggedIndexedContiguousDescriptor {
    /// Compose a contiguous descriptor (samples into profiles) with an indexed descriptor (profiles into instances).
    ///
    /// Returns [`None`] unless the instance dimension of `contiguous` is the sample dimension of `indexed`.
    #[must_use]
    pub fn new(
        contiguous: RaggedContiguousDescriptor,
        indexed: RaggedIndexedDescriptor,
    ) -> Option<Self> {
        if contiguous.instance_dimension == indexed.sample_dimension {
            Some(Self {
                contiguous,
                indexed,
            })
        } else {
            None
        }
    }

    /// Return the contiguous half: samples into profiles.
    #[must_use]
    pub const fn contiguous(&self) -> &RaggedContiguousDescriptor {
        &self.contiguous
    }

    /// Return the indexed half: profiles into instances.
    #[must_use]
    pub const fn indexed(&self) -> &RaggedIndexedDescriptor {
        &self.indexed
    }

    /// Return the profile dimension.
    #[must_use]
    pub fn profile_dimension(&self) -> &str {
        &self.indexed.sample_dimension
    }

    /// Return the number of elements of each profile.
    #[must_use]
    pub fn profile_counts(&self) -> &[u64] {
        &self.contiguous.counts
    }

    /// Return the owning instance of each profile.
    #[must_use]
    pub fn profile_instance(&self) -> &[i64] {
        &self.indexed.index
    }

    /// Return the number of profiles of each instance.
    #[must_use]
    pub fn profiles_per_instance(&self) -> &[u64] {
        &self.indexed.counts
    }
}

/// The compression of a sample dimension.
///
/// Descriptors are immutable and shared by every array spanning the sample dimension.
#[derive(Clone, Debug, PartialEq, Eq, derive_more::From)]
pub enum CompressionDescriptor {
    /// Compression by gathering.
    Gathered(Arc<GatheredDescriptor>),
    /// A contiguous ragged array.
    RaggedContiguous(Arc<RaggedContiguousDescriptor>),
    /// An indexed ragged array.
    RaggedIndexed(Arc<RaggedIndexedDescriptor>),
    /// An indexed contiguous ragged array.
    RaggedIndexedContiguous(Arc<RaggedIndexedContiguousDescriptor>),
}

impl CompressionDescriptor {
    /// Return the compression type.
    #[must_use]
    pub const fn compression_type(&self) -> CompressionType {
        match self {
            Self::Gathered(_) => CompressionType::Gathered,
            Self::RaggedContiguous(_) => CompressionType::RaggedContiguous,
            Self::RaggedIndexed(_) => CompressionType::RaggedIndexed,
            Self::RaggedIndexedContiguous(_) => CompressionType::RaggedIndexedContiguous,
        }
    }

    /// Return the compressed sample dimension.
    #[must_use]
    pub fn sample_dimension(&self) -> &str {
        match self {
            Self::Gathered(d) => &d.sample_dimension,
            Self::RaggedContiguous(d) => &d.sample_dimension,
            Self::RaggedIndexed(d) => &d.sample_dimension,
            Self::RaggedIndexedContiguous(d) => &d.contiguous.sample_dimension,
        }
    }

    /// Return the variables holding the compression parameters (list, count and index variables).
    #[must_use]
    pub fn parameter_variables(&self) -> Vec<&str> {
        match self {
            Self::Gathered(d) => vec![d.list_variable.as_str()],
            Self::RaggedContiguous(d) => vec![d.count_variable.as_str()],
            Self::RaggedIndexed(d) => vec![d.index_variable.as_str()],
            Self::RaggedIndexedContiguous(d) => vec![
                d.contiguous.count_variable.as_str(),
                d.indexed.index_variable.as_str(),
            ],
        }
    }

    /// Return the names of the implied dimensions that replace the sample dimension.
    #[must_use]
    pub fn implied_dimensions(&self) -> Vec<String> {
        match self {
            Self::Gathered(d) => d.implied_dimensions.clone(),
            Self::RaggedContiguous(d) => {
                vec![d.instance_dimension.clone(), d.element_dimension.clone()]
            }
            Self::RaggedIndexed(d) => {
                vec![d.instance_dimension.clone(), d.element_dimension.clone()]
            }
            Self::RaggedIndexedContiguous(d) => vec![
                d.indexed.instance_dimension.clone(),
                d.indexed.element_dimension.clone(),
                d.contiguous.element_dimension.clone(),
            ],
        }
    }

    /// Return the sizes of the implied dimensions.
    ///
    /// Ragged shapes are rectangular: each element dimension is as long as the longest instance.
    #[must_use]
    pub fn implied_shape(&self) -> Vec<u64> {
        match self {
            Self::Gathered(d) => d.implied_shape.clone(),
            Self::RaggedContiguous(d) => vec![d.counts.len() as u64, d.element_size()],
            Self::RaggedIndexed(d) => vec![d.instance_size, d.element_size()],
            Self::RaggedIndexedContiguous(d) => vec![
                d.indexed.instance_size,
                d.indexed.element_size(),
                d.contiguous.element_size(),
            ],
        }
    }

    /// Return the number of samples described by the compression parameters.
    #[must_use]
    pub fn compressed_size(&self) -> u64 {
        match self {
            Self::Gathered(d) => d.indices.len() as u64,
            Self::RaggedContiguous(d) => d.counts.iter().sum(),
            Self::RaggedIndexed(d) => d.index.len() as u64,
            Self::RaggedIndexedContiguous(d) => d.contiguous.counts.iter().sum(),
        }
    }
}
