use super::{CompressionDescriptor, CompressionMap};

/// Maps the dimensions of a variable to its implied (uncompressed) dimensions.
#[derive(Clone, Copy, Debug)]
pub struct DimensionMapper<'a> {
    compression: &'a CompressionMap,
}

impl<'a> DimensionMapper<'a> {
    /// Create a new dimension mapper.
    #[must_use]
    pub const fn new(compression: &'a CompressionMap) -> Self {
        Self { compression }
    }

    /// Return the axis and descriptor of the first dimension of `dimensions` that is a compressed sample dimension.
    #[must_use]
    pub fn compressed_axis<S: AsRef<str>>(
        &self,
        dimensions: &[S],
    ) -> Option<(usize, &'a CompressionDescriptor)> {
        dimensions.iter().enumerate().find_map(|(axis, dimension)| {
            self.compression
                .get(dimension.as_ref())
                .map(|descriptor| (axis, descriptor))
        })
    }

    /// Return `dimensions` with the compressed sample dimension replaced in place by its implied dimensions.
    ///
    /// The dimensions are returned unchanged if none is compressed.
    #[must_use]
    pub fn implied_dimensions<S: AsRef<str>>(&self, dimensions: &[S]) -> Vec<String> {
        let mut implied: Vec<String> = dimensions.iter().map(|d| d.as_ref().to_string()).collect();
        if let Some((axis, descriptor)) = self.compressed_axis(dimensions) {
            implied.splice(axis..=axis, descriptor.implied_dimensions());
        }
        implied
    }

    /// Return `shape` with the size of the compressed sample dimension replaced in place by the implied shape.
    #[must_use]
    pub fn implied_shape<S: AsRef<str>>(&self, dimensions: &[S], shape: &[u64]) -> Vec<u64> {
        let mut implied = shape.to_vec();
        if let Some((axis, descriptor)) = self.compressed_axis(dimensions) {
            if axis < implied.len() {
                implied.splice(axis..=axis, descriptor.implied_shape());
            }
        }
        implied
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::compression::{GatheredDescriptor, RaggedContiguousDescriptor};

    fn compression() -> CompressionMap {
        let descriptors: [CompressionDescriptor; 2] = [
            Arc::new(GatheredDescriptor::new(
                "list".to_string(),
                "list".to_string(),
                vec![0, 4],
                vec!["lat".to_string(), "lon".to_string()],
                vec![2, 3],
            ))
            .into(),
            Arc::new(RaggedContiguousDescriptor::new(
                "obs".to_string(),
                "row_size".to_string(),
                "station".to_string(),
                vec![3, 2],
                "timeseries".to_string(),
            ))
            .into(),
        ];
        descriptors.into_iter().collect()
    }

    #[test]
    fn dimension_mapper_substitutes_in_place() {
        let compression = compression();
        let mapper = DimensionMapper::new(&compression);
        assert_eq!(
            mapper.implied_dimensions(&["time", "list", "depth"]),
            vec!["time", "lat", "lon", "depth"]
        );
        assert_eq!(mapper.implied_shape(&["time", "list", "depth"], &[4, 2, 7]), vec![4, 2, 3, 7]);
        assert_eq!(mapper.implied_dimensions(&["obs"]), vec!["station", "timeseries"]);
        assert_eq!(mapper.implied_shape(&["obs"], &[5]), vec![2, 3]);
    }

    #[test]
    fn dimension_mapper_uncompressed() {
        let compression = compression();
        let mapper = DimensionMapper::new(&compression);
        assert!(mapper.compressed_axis(&["lat", "lon"]).is_none());
        assert_eq!(mapper.implied_dimensions(&["lat", "lon"]), vec!["lat", "lon"]);
        assert_eq!(mapper.implied_shape::<&str>(&[], &[]), Vec::<u64>::new());
        let (axis, descriptor) = mapper.compressed_axis(&["time", "obs"]).unwrap();
        assert_eq!(axis, 1);
        assert_eq!(descriptor.sample_dimension(), "obs");
    }
}
