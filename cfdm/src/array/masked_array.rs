use ndarray::{ArrayD, Axis, IxDyn, Slice};

use super::ArrayError;

/// An in-memory N-dimensional array with a mask.
///
/// An element is masked where the mask is `true`. Masked elements have no value: the data under them is unspecified.
#[derive(Clone, Debug)]
pub struct MaskedArray<T> {
    data: ArrayD<T>,
    mask: ArrayD<bool>,
}

impl<T: Clone> MaskedArray<T> {
    /// Create a new masked array.
    ///
    /// # Errors
    /// Returns [`ArrayError::InvalidDataShape`] if the shapes of `data` and `mask` differ.
    pub fn new(data: ArrayD<T>, mask: ArrayD<bool>) -> Result<Self, ArrayError> {
        if data.shape() == mask.shape() {
            Ok(Self { data, mask })
        } else {
            Err(ArrayError::InvalidDataShape(
                mask.shape().to_vec(),
                data.shape().to_vec(),
            ))
        }
    }

    /// Create a new masked array with no masked elements.
    #[must_use]
    pub fn from_data(data: ArrayD<T>) -> Self {
        let mask = ArrayD::from_elem(data.raw_dim(), false);
        Self { data, mask }
    }

    /// Create a new masked array of `shape` with every element masked.
    ///
    /// `fill` is the data under the mask.
    #[must_use]
    pub fn masked_all(shape: &[usize], fill: T) -> Self {
        Self {
            data: ArrayD::from_elem(IxDyn(shape), fill),
            mask: ArrayD::from_elem(IxDyn(shape), true),
        }
    }

    /// Return the shape.
    #[must_use]
    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    /// Return the data, including the unspecified data under the mask.
    #[must_use]
    pub const fn data(&self) -> &ArrayD<T> {
        &self.data
    }

    /// Return the mask.
    #[must_use]
    pub const fn mask(&self) -> &ArrayD<bool> {
        &self.mask
    }

    pub(crate) fn data_mut(&mut self) -> &mut ArrayD<T> {
        &mut self.data
    }

    pub(crate) fn mask_mut(&mut self) -> &mut ArrayD<bool> {
        &mut self.mask
    }

    /// Consume the masked array and return its data and mask.
    #[must_use]
    pub fn into_parts(self) -> (ArrayD<T>, ArrayD<bool>) {
        (self.data, self.mask)
    }

    /// Return the element at `index`.
    ///
    /// Returns [`None`] if the element is masked or `index` is out of bounds.
    #[must_use]
    pub fn get(&self, index: &[usize]) -> Option<&T> {
        match self.mask.get(index) {
            Some(false) => self.data.get(index),
            _ => None,
        }
    }

    /// Returns true if any element is masked.
    #[must_use]
    pub fn is_masked(&self) -> bool {
        self.mask.iter().any(|&masked| masked)
    }

    /// Return the number of unmasked elements.
    #[must_use]
    pub fn count(&self) -> usize {
        self.mask.iter().filter(|&&masked| !masked).count()
    }

    /// Return the unmasked elements in row-major order.
    #[must_use]
    pub fn compressed(&self) -> Vec<T> {
        self.data
            .iter()
            .zip(self.mask.iter())
            .filter(|(_, masked)| !**masked)
            .map(|(value, _)| value.clone())
            .collect()
    }

    /// Return the data with masked elements replaced by `fill`.
    #[must_use]
    pub fn filled(&self, fill: T) -> ArrayD<T> {
        let mut data = self.data.clone();
        data.zip_mut_with(&self.mask, |value, &masked| {
            if masked {
                *value = fill.clone();
            }
        });
        data
    }

    /// Select the positions `indices[axis]` along each axis.
    ///
    /// The indices must be within bounds. Axes selecting every position in order are left untouched.
    #[must_use]
    pub(crate) fn select(&self, indices: &[Vec<usize>]) -> Self {
        let mut data = self.data.clone();
        let mut mask = self.mask.clone();
        for (axis, positions) in indices.iter().enumerate() {
            let size = data.len_of(Axis(axis));
            if positions.len() == size && positions.iter().enumerate().all(|(i, &p)| i == p) {
                continue;
            }
            if positions.is_empty() {
                data = data.slice_axis(Axis(axis), Slice::from(0..0)).to_owned();
                mask = mask.slice_axis(Axis(axis), Slice::from(0..0)).to_owned();
            } else {
                data = data.select(Axis(axis), positions);
                mask = mask.select(Axis(axis), positions);
            }
        }
        Self { data, mask }
    }
}

impl<T: PartialEq> PartialEq for MaskedArray<T> {
    /// Masked arrays are equal if their masks are equal and their unmasked elements are equal.
    fn eq(&self, other: &Self) -> bool {
        self.mask == other.mask
            && self
                .data
                .iter()
                .zip(other.data.iter())
                .zip(self.mask.iter())
                .all(|((a, b), &masked)| masked || a == b)
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    #[test]
    fn masked_array_values() {
        let data = array![[1, 2, 3], [4, 5, 6]].into_dyn();
        let mask = array![[false, false, false], [false, false, true]].into_dyn();
        let masked = MaskedArray::new(data, mask).unwrap();
        assert_eq!(masked.shape(), &[2, 3]);
        assert!(masked.is_masked());
        assert_eq!(masked.count(), 5);
        assert_eq!(masked.compressed(), vec![1, 2, 3, 4, 5]);
        assert_eq!(masked.get(&[1, 1]), Some(&5));
        assert_eq!(masked.get(&[1, 2]), None);
        assert_eq!(masked.get(&[2, 0]), None);
        assert_eq!(
            masked.filled(-1),
            array![[1, 2, 3], [4, 5, -1]].into_dyn()
        );
    }

    #[test]
    fn masked_array_shape_mismatch() {
        let data = array![1, 2].into_dyn();
        let mask = array![false].into_dyn();
        assert!(MaskedArray::new(data, mask).is_err());
    }

    #[test]
    fn masked_array_equality_ignores_masked_data() {
        let mut a = MaskedArray::masked_all(&[2], 0);
        let mut b = MaskedArray::masked_all(&[2], 7);
        assert_eq!(a, b);
        a.data_mut()[[0]] = 1;
        a.mask_mut()[[0]] = false;
        assert_ne!(a, b);
        b.data_mut()[[0]] = 1;
        b.mask_mut()[[0]] = false;
        assert_eq!(a, b);
    }

    #[test]
    fn masked_array_select() {
        let masked = MaskedArray::from_data(array![[1, 2, 3], [4, 5, 6]].into_dyn());
        let selected = masked.select(&[vec![1], vec![2, 0, 0]]);
        assert_eq!(selected.data(), &array![[6, 4, 4]].into_dyn());
        let empty = masked.select(&[vec![], vec![0, 1, 2]]);
        assert_eq!(empty.shape(), &[0, 3]);
        assert_eq!(masked.select(&[vec![0, 1], vec![0, 1, 2]]), masked);
    }
}
