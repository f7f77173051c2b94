//! Compressed arrays.
//!
//! A compressed array wraps the on-disk variable of a gathered or ragged sample dimension and presents it with its uncompressed shape:
//! the sample axis is replaced in place by the implied axes of the [`CompressionDescriptor`].
//!
//! ## Materialization
//! Every retrieval reads the whole compressed variable, scatters each sample into a fully masked array of the uncompressed shape,
//! and then selects the requested subspace. Nothing is cached between retrievals.
//! Elements with no stored sample, such as the padding of short ragged rows, stay masked.

mod gathered;
mod ragged_contiguous;
mod ragged_indexed;
mod ragged_indexed_contiguous;

pub use gathered::GatheredArray;
pub use ragged_contiguous::RaggedContiguousArray;
pub use ragged_indexed::RaggedIndexedArray;
pub use ragged_indexed_contiguous::RaggedIndexedContiguousArray;

use ndarray::{ArrayD, Axis, Slice};

use super::{
    ArrayError, DataType, DenseArrayTraits, Element, FileBackedArray, MaskedArray,
    shape_to_usize,
};
use crate::compression::{CompressionDescriptor, CompressionType};
use crate::indexer::Subspace;

/// The destination of a compressed sample: its position along the sample axis and its indices along the implied axes.
pub(crate) type Placement = (u64, Vec<u64>);

/// A compressed variable presented with its uncompressed shape.
#[derive(Clone, Debug)]
pub enum CompressedArray {
    /// A gathered array.
    Gathered(GatheredArray),
    /// A contiguous ragged array.
    RaggedContiguous(RaggedContiguousArray),
    /// An indexed ragged array.
    RaggedIndexed(RaggedIndexedArray),
    /// An indexed contiguous ragged array.
    RaggedIndexedContiguous(RaggedIndexedContiguousArray),
}

impl CompressedArray {
    /// Wrap `array`, whose axis `sample_axis` is compressed as described by `descriptor`.
    ///
    /// # Errors
    /// Returns [`ArrayError::InvalidSampleAxis`] if `sample_axis` is not an axis of `array`.
    pub fn new(
        array: FileBackedArray,
        descriptor: &CompressionDescriptor,
        sample_axis: usize,
    ) -> Result<Self, ArrayError> {
        Ok(match descriptor {
            CompressionDescriptor::Gathered(d) => {
                Self::Gathered(GatheredArray::new(array, d.clone(), sample_axis)?)
            }
            CompressionDescriptor::RaggedContiguous(d) => {
                Self::RaggedContiguous(RaggedContiguousArray::new(array, d.clone(), sample_axis)?)
            }
            CompressionDescriptor::RaggedIndexed(d) => {
                Self::RaggedIndexed(RaggedIndexedArray::new(array, d.clone(), sample_axis)?)
            }
            CompressionDescriptor::RaggedIndexedContiguous(d) => Self::RaggedIndexedContiguous(
                RaggedIndexedContiguousArray::new(array, d.clone(), sample_axis)?,
            ),
        })
    }

    /// Return the compression type.
    #[must_use]
    pub fn compression_type(&self) -> CompressionType {
        self.descriptor().compression_type()
    }

    /// Return the compression descriptor.
    #[must_use]
    pub fn descriptor(&self) -> CompressionDescriptor {
        match self {
            Self::Gathered(a) => a.descriptor().clone().into(),
            Self::RaggedContiguous(a) => a.descriptor().clone().into(),
            Self::RaggedIndexed(a) => a.descriptor().clone().into(),
            Self::RaggedIndexedContiguous(a) => a.descriptor().clone().into(),
        }
    }

    /// Return the wrapped on-disk array.
    #[must_use]
    pub fn compressed_array(&self) -> &FileBackedArray {
        match self {
            Self::Gathered(a) => a.compressed_array(),
            Self::RaggedContiguous(a) => a.compressed_array(),
            Self::RaggedIndexed(a) => a.compressed_array(),
            Self::RaggedIndexedContiguous(a) => a.compressed_array(),
        }
    }

    /// Return the compressed axis of the wrapped array.
    #[must_use]
    pub fn sample_axis(&self) -> usize {
        match self {
            Self::Gathered(a) => a.sample_axis(),
            Self::RaggedContiguous(a) => a.sample_axis(),
            Self::RaggedIndexed(a) => a.sample_axis(),
            Self::RaggedIndexedContiguous(a) => a.sample_axis(),
        }
    }
}

impl DenseArrayTraits for CompressedArray {
    fn shape(&self) -> &[u64] {
        match self {
            Self::Gathered(a) => a.shape(),
            Self::RaggedContiguous(a) => a.shape(),
            Self::RaggedIndexed(a) => a.shape(),
            Self::RaggedIndexedContiguous(a) => a.shape(),
        }
    }

    fn data_type(&self) -> DataType {
        self.compressed_array().data_type()
    }

    fn retrieve<T: Element>(&self, subspace: &Subspace) -> Result<MaskedArray<T>, ArrayError> {
        match self {
            Self::Gathered(a) => a.retrieve(subspace),
            Self::RaggedContiguous(a) => a.retrieve(subspace),
            Self::RaggedIndexed(a) => a.retrieve(subspace),
            Self::RaggedIndexedContiguous(a) => a.retrieve(subspace),
        }
    }
}

/// Return the uncompressed shape: `compressed_shape` with `sample_axis` replaced by `implied_shape`.
pub(crate) fn uncompressed_shape(
    compressed_shape: &[u64],
    sample_axis: usize,
    implied_shape: &[u64],
) -> Result<Vec<u64>, ArrayError> {
    if sample_axis >= compressed_shape.len() {
        return Err(ArrayError::InvalidSampleAxis(
            sample_axis,
            compressed_shape.len(),
        ));
    }
    let mut shape = Vec::with_capacity(compressed_shape.len() + implied_shape.len() - 1);
    shape.extend_from_slice(&compressed_shape[..sample_axis]);
    shape.extend_from_slice(implied_shape);
    shape.extend_from_slice(&compressed_shape[sample_axis + 1..]);
    Ok(shape)
}

/// Copy the slab at `sample` along `sample_axis` of `src` to `implied` along the implied axes of `dst`.
fn place<A: Clone>(
    dst: &mut ArrayD<A>,
    src: &ArrayD<A>,
    sample_axis: usize,
    sample: usize,
    implied: &[usize],
) {
    let k = implied.len();
    let mut slab = src.index_axis(Axis(sample_axis), sample);
    for _ in 0..k {
        slab = slab.insert_axis(Axis(sample_axis));
    }
    let mut target = dst.slice_each_axis_mut(|axis| {
        let a = axis.axis.index();
        if (sample_axis..sample_axis + k).contains(&a) {
            let i = implied[a - sample_axis];
            Slice::from(i..i + 1)
        } else {
            Slice::from(..)
        }
    });
    target.assign(&slab);
}

/// Decompress `array` by placing each sample as listed in `placements`, then select `subspace`.
///
/// `shape` is the uncompressed shape and `implied_shape` the shape of the implied axes.
pub(crate) fn decompress<T: Element>(
    array: &FileBackedArray,
    sample_axis: usize,
    shape: &[u64],
    implied_shape: &[u64],
    placements: &[Placement],
    subspace: &Subspace,
) -> Result<MaskedArray<T>, ArrayError> {
    let positions = subspace.resolve(shape)?;
    let compressed = array.retrieve::<T>(&Subspace::All)?;
    let length = compressed.shape()[sample_axis] as u64;
    log::debug!(
        "decompressing {} with shape {:?} to shape {shape:?} from {} samples",
        array.variable(),
        compressed.shape(),
        placements.len(),
    );

    let mut uncompressed = MaskedArray::masked_all(&shape_to_usize(shape)?, T::zeroed());
    for (sample, implied) in placements {
        if *sample >= length {
            return Err(ArrayError::SampleIndexOutOfBounds {
                index: *sample,
                length,
            });
        }
        if implied.len() != implied_shape.len()
            || implied.iter().zip(implied_shape).any(|(i, size)| i >= size)
        {
            return Err(ArrayError::ImpliedIndicesOutOfBounds(
                implied.clone(),
                implied_shape.to_vec(),
            ));
        }
        let sample = usize::try_from(*sample).map_err(|err| ArrayError::Other(err.to_string()))?;
        let implied = shape_to_usize(implied)?;
        place(
            uncompressed.data_mut(),
            compressed.data(),
            sample_axis,
            sample,
            &implied,
        );
        place(
            uncompressed.mask_mut(),
            compressed.mask(),
            sample_axis,
            sample,
            &implied,
        );
    }
    Ok(uncompressed.select(&positions))
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    #[test]
    fn uncompressed_shape_in_place() {
        assert_eq!(uncompressed_shape(&[5], 0, &[2, 3]).unwrap(), vec![2, 3]);
        assert_eq!(
            uncompressed_shape(&[4, 5, 6], 1, &[2, 3]).unwrap(),
            vec![4, 2, 3, 6]
        );
        assert!(matches!(
            uncompressed_shape(&[5], 1, &[2, 3]),
            Err(ArrayError::InvalidSampleAxis(1, 1))
        ));
    }

    #[test]
    fn place_slab_on_interior_axis() {
        // compressed (time: 2, sample: 3), uncompressed (time: 2, instance: 2, element: 2)
        let src = array![[1, 2, 3], [4, 5, 6]].into_dyn();
        let mut dst = ArrayD::from_elem(ndarray::IxDyn(&[2, 2, 2]), 0);
        place(&mut dst, &src, 1, 2, &[1, 0]);
        assert_eq!(dst[[0, 1, 0]], 3);
        assert_eq!(dst[[1, 1, 0]], 6);
        assert_eq!(dst.iter().filter(|&&v| v != 0).count(), 2);
    }
}
