use cfdm_data_type::{DataType, Element};
use cfdm_storage::{AttributeValue, DatasetMetadata, Hyperslab, ReadableStorage, StorageError};
use ndarray::{ArrayD, IxDyn};
use num::NumCast;

use super::{ArrayError, DenseArrayTraits, MaskedArray};
use crate::indexer::Subspace;

/// A variable as stored on disk.
///
/// Retrieval reads the bounding hyperslab of the selected positions from storage and then selects from it in memory.
/// When masking is enabled, elements equal to the variable's `_FillValue` (or the netCDF default fill value of its data type) or `missing_value` are masked.
/// Mask values are compared in the element type of the variable.
#[derive(Clone)]
pub struct FileBackedArray {
    storage: ReadableStorage,
    variable: String,
    data_type: DataType,
    shape: Vec<u64>,
    fill_value: Option<AttributeValue>,
    missing_value: Option<AttributeValue>,
    mask: bool,
}

impl std::fmt::Debug for FileBackedArray {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileBackedArray")
            .field("variable", &self.variable)
            .field("data_type", &self.data_type)
            .field("shape", &self.shape)
            .finish_non_exhaustive()
    }
}

/// Convert the values of a numeric attribute to `T`, skipping values `T` cannot represent.
fn attribute_elements<T: Element>(value: &AttributeValue) -> Vec<T> {
    match value {
        AttributeValue::Text(_) => Vec::new(),
        // unsigned 64-bit attributes are held as their i64 bit pattern
        #[allow(clippy::cast_sign_loss)]
        AttributeValue::Int(values) => values
            .iter()
            .filter_map(|&v| <T as NumCast>::from(v).or_else(|| <T as NumCast>::from(v as u64)))
            .collect(),
        AttributeValue::Float(values) => values
            .iter()
            .filter_map(|&v| <T as NumCast>::from(v))
            .collect(),
    }
}

impl FileBackedArray {
    /// Create a new file backed array for `variable`.
    ///
    /// Masking is enabled.
    ///
    /// # Errors
    /// Returns [`StorageError`] if `variable` or one of its dimensions is not in `metadata`.
    pub fn new(
        storage: ReadableStorage,
        metadata: &DatasetMetadata,
        variable: &str,
    ) -> Result<Self, StorageError> {
        let variable_metadata = metadata
            .variable(variable)
            .ok_or_else(|| StorageError::UnknownVariable(variable.to_string()))?;
        let shape = metadata.variable_shape(variable)?;

        Ok(Self {
            storage,
            variable: variable.to_string(),
            data_type: variable_metadata.data_type(),
            shape,
            fill_value: variable_metadata.attribute("_FillValue").cloned(),
            missing_value: variable_metadata.attribute("missing_value").cloned(),
            mask: true,
        })
    }

    /// Enable or disable masking of fill and missing values.
    #[must_use]
    pub fn with_mask(mut self, mask: bool) -> Self {
        self.mask = mask;
        self
    }

    /// Return the variable name.
    #[must_use]
    pub fn variable(&self) -> &str {
        &self.variable
    }

    /// Return the values masked on retrieval as elements of type `T`.
    ///
    /// Without a `_FillValue` attribute the netCDF default fill value is used, except for byte variables.
    /// Returns an empty vector if masking is disabled.
    #[must_use]
    pub fn mask_values<T: Element>(&self) -> Vec<T> {
        if !self.mask {
            return Vec::new();
        }
        let mut mask_values = match &self.fill_value {
            Some(fill_value) => attribute_elements(fill_value),
            None => match self.data_type {
                DataType::Int8 | DataType::UInt8 => Vec::new(),
                data_type => T::from_fill_value(&data_type.default_fill_value())
                    .into_iter()
                    .collect(),
            },
        };
        if let Some(missing_value) = &self.missing_value {
            mask_values.extend(attribute_elements::<T>(missing_value));
        }
        mask_values
    }

    fn mask_elements<T: Element>(&self, data: &ArrayD<T>) -> ArrayD<bool> {
        let mask_values = self.mask_values::<T>();
        if mask_values.is_empty() {
            ArrayD::from_elem(data.raw_dim(), false)
        } else {
            data.map(|value| mask_values.contains(value))
        }
    }
}

impl DenseArrayTraits for FileBackedArray {
    fn shape(&self) -> &[u64] {
        &self.shape
    }

    fn data_type(&self) -> DataType {
        self.data_type
    }

    fn retrieve<T: Element>(&self, subspace: &Subspace) -> Result<MaskedArray<T>, ArrayError> {
        T::validate_data_type(self.data_type)?;
        let positions = subspace.resolve(&self.shape)?;

        if positions.iter().any(Vec::is_empty) {
            let shape: Vec<usize> = positions.iter().map(Vec::len).collect();
            return Ok(MaskedArray::from_data(ArrayD::from_elem(
                IxDyn(&shape),
                T::zeroed(),
            )));
        }

        // Read the bounding hyperslab of the selection
        let mut offsets = Vec::with_capacity(positions.len());
        let mut shape = Vec::with_capacity(positions.len());
        for axis_positions in &positions {
            let min = axis_positions.iter().copied().min().unwrap_or_default();
            let max = axis_positions.iter().copied().max().unwrap_or_default();
            offsets.push(min);
            shape.push(max - min + 1);
        }
        let to_u64 = |v: &Vec<usize>| v.iter().map(|&i| i as u64).collect::<Vec<u64>>();
        let hyperslab =
            Hyperslab::new(to_u64(&offsets), to_u64(&shape)).map_err(StorageError::from)?;
        log::trace!("reading {} hyperslab {hyperslab}", self.variable);
        let bytes = self.storage.get_hyperslab(&self.variable, &hyperslab)?;
        let elements = T::from_ne_bytes_vec(self.data_type, &bytes)?;
        let num_elements = elements.len();
        let data = ArrayD::from_shape_vec(IxDyn(&shape), elements)
            .map_err(|_| ArrayError::InvalidDataShape(vec![num_elements], shape.clone()))?;

        let mask = self.mask_elements(&data);
        let bounding = MaskedArray::new(data, mask)?;
        let relative: Vec<Vec<usize>> = positions
            .iter()
            .zip(&offsets)
            .map(|(axis_positions, &offset)| axis_positions.iter().map(|&p| p - offset).collect())
            .collect();
        Ok(bounding.select(&relative))
    }
}
