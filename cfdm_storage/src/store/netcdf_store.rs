//! A store backed by the netCDF C library.

use std::ops::Range;
use std::path::Path;

use cfdm_data_type::{DataType, Element};
use netcdf::types::{FloatType, IntType, NcVariableType};
use parking_lot::Mutex;

use crate::{
    AttributeValue, Attributes, Bytes, DatasetMetadata, Dimension, Hyperslab,
    ReadableStorageTraits, StorageError, VariableMetadata,
};

/// A read-only store for a netCDF file opened with the netCDF C library.
///
/// The header is read once on open.
/// Variables of unsupported types (`char`, `string`, compound, ...) are omitted from the metadata.
pub struct NetcdfStore {
    file: Mutex<netcdf::File>,
    metadata: DatasetMetadata,
}

impl std::fmt::Debug for NetcdfStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetcdfStore")
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}

fn netcdf_error(err: netcdf::Error) -> StorageError {
    StorageError::Other(err.to_string())
}

fn data_type(vartype: &NcVariableType) -> Option<DataType> {
    match vartype {
        NcVariableType::Int(IntType::I8) => Some(DataType::Int8),
        NcVariableType::Int(IntType::U8) => Some(DataType::UInt8),
        NcVariableType::Int(IntType::I16) => Some(DataType::Int16),
        NcVariableType::Int(IntType::U16) => Some(DataType::UInt16),
        NcVariableType::Int(IntType::I32) => Some(DataType::Int32),
        NcVariableType::Int(IntType::U32) => Some(DataType::UInt32),
        NcVariableType::Int(IntType::I64) => Some(DataType::Int64),
        NcVariableType::Int(IntType::U64) => Some(DataType::UInt64),
        NcVariableType::Float(FloatType::F32) => Some(DataType::Float32),
        NcVariableType::Float(FloatType::F64) => Some(DataType::Float64),
        _ => None,
    }
}

#[allow(clippy::cast_possible_wrap)]
fn attribute_value(value: netcdf::AttributeValue) -> Option<AttributeValue> {
    use netcdf::AttributeValue as V;
    fn ints<T: Into<i64>>(values: Vec<T>) -> AttributeValue {
        AttributeValue::Int(values.into_iter().map(Into::into).collect())
    }
    Some(match value {
        V::Str(text) => AttributeValue::Text(text),
        V::Strs(texts) => AttributeValue::Text(texts.join(" ")),
        V::Schar(v) => ints(vec![v]),
        V::Schars(v) => ints(v),
        V::Uchar(v) => ints(vec![v]),
        V::Uchars(v) => ints(v),
        V::Short(v) => ints(vec![v]),
        V::Shorts(v) => ints(v),
        V::Ushort(v) => ints(vec![v]),
        V::Ushorts(v) => ints(v),
        V::Int(v) => ints(vec![v]),
        V::Ints(v) => ints(v),
        V::Uint(v) => ints(vec![v]),
        V::Uints(v) => ints(v),
        V::Longlong(v) => ints(vec![v]),
        V::Longlongs(v) => ints(v),
        V::Ulonglong(v) => AttributeValue::Int(vec![v as i64]),
        V::Ulonglongs(v) => AttributeValue::Int(v.into_iter().map(|v| v as i64).collect()),
        V::Float(v) => AttributeValue::Float(vec![f64::from(v)]),
        V::Floats(v) => AttributeValue::Float(v.into_iter().map(f64::from).collect()),
        V::Double(v) => AttributeValue::Float(vec![v]),
        V::Doubles(v) => AttributeValue::Float(v),
        #[allow(unreachable_patterns)]
        _ => return None,
    })
}

fn attributes<'a>(iter: impl Iterator<Item = netcdf::Attribute<'a>>) -> Attributes {
    iter.filter_map(|attribute| {
        let value = attribute.value().ok().and_then(attribute_value)?;
        Some((attribute.name().to_string(), value))
    })
    .collect()
}

fn read_metadata(file: &netcdf::File) -> DatasetMetadata {
    let dimensions = file
        .dimensions()
        .map(|dimension| {
            let size = dimension.len() as u64;
            if dimension.is_unlimited() {
                Dimension::new_unlimited(dimension.name(), size)
            } else {
                Dimension::new(dimension.name(), size)
            }
        })
        .collect();
    let variables = file
        .variables()
        .filter_map(|variable| {
            let data_type = data_type(&variable.vartype())?;
            let dimensions = variable.dimensions().iter().map(|d| d.name()).collect();
            let mut metadata = VariableMetadata::new(variable.name(), data_type, dimensions);
            for (name, value) in attributes(variable.attributes()) {
                metadata = metadata.with_attribute(name, value);
            }
            Some(metadata)
        })
        .collect();
    DatasetMetadata::new(dimensions, variables, attributes(file.attributes()))
}

fn get_values<T: Element + netcdf::NcTypeDescriptor>(
    variable: &netcdf::Variable<'_>,
    ranges: &[Range<usize>],
) -> Result<Vec<u8>, StorageError> {
    let values: Vec<T> = if ranges.is_empty() {
        variable.get_values::<T, _>(..).map_err(netcdf_error)?
    } else {
        variable.get_values::<T, _>(ranges).map_err(netcdf_error)?
    };
    Ok(T::to_ne_bytes_vec(&values))
}

impl NetcdfStore {
    /// Open the netCDF file at `path` for reading.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if the file cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let file = netcdf::open(path.as_ref()).map_err(netcdf_error)?;
        let metadata = read_metadata(&file);
        Ok(Self {
            file: Mutex::new(file),
            metadata,
        })
    }
}

impl ReadableStorageTraits for NetcdfStore {
    fn metadata(&self) -> Result<DatasetMetadata, StorageError> {
        Ok(self.metadata.clone())
    }

    fn get_hyperslab(&self, variable: &str, hyperslab: &Hyperslab) -> Result<Bytes, StorageError> {
        let metadata = self
            .metadata
            .variable(variable)
            .ok_or_else(|| StorageError::UnknownVariable(variable.to_string()))?;
        hyperslab.validate(&self.metadata.variable_shape(variable)?)?;
        let ranges = hyperslab
            .to_ranges()
            .into_iter()
            .map(|range| -> Result<Range<usize>, StorageError> {
                let start = usize::try_from(range.start).map_err(|err| err.to_string())?;
                let end = usize::try_from(range.end).map_err(|err| err.to_string())?;
                Ok(start..end)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let file = self.file.lock();
        let nc_variable = file
            .variable(variable)
            .ok_or_else(|| StorageError::UnknownVariable(variable.to_string()))?;
        let bytes = match metadata.data_type() {
            DataType::Int8 => get_values::<i8>(&nc_variable, &ranges),
            DataType::UInt8 => get_values::<u8>(&nc_variable, &ranges),
            DataType::Int16 => get_values::<i16>(&nc_variable, &ranges),
            DataType::UInt16 => get_values::<u16>(&nc_variable, &ranges),
            DataType::Int32 => get_values::<i32>(&nc_variable, &ranges),
            DataType::UInt32 => get_values::<u32>(&nc_variable, &ranges),
            DataType::Int64 => get_values::<i64>(&nc_variable, &ranges),
            DataType::UInt64 => get_values::<u64>(&nc_variable, &ranges),
            DataType::Float32 => get_values::<f32>(&nc_variable, &ranges),
            DataType::Float64 => get_values::<f64>(&nc_variable, &ranges),
        }?;
        Ok(Bytes::from(bytes))
    }
}
