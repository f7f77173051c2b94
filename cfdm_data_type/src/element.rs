use std::fmt::Debug;

use crate::{DataType, FillValue};

use ElementError::IncompatibleElementType as IET;

/// An element error.
#[derive(Clone, Debug, thiserror::Error)]
pub enum ElementError {
    /// Incompatible element type for data type.
    #[error("incompatible element type {element} for data type {data_type}")]
    IncompatibleElementType {
        /// The requested element data type.
        element: DataType,
        /// The stored data type.
        data_type: DataType,
    },
    /// The number of bytes is not a multiple of the element size.
    #[error("{0} bytes is not a multiple of the element size {1}")]
    InvalidByteLength(usize, usize),
    /// Invalid element value.
    #[error("invalid element value: {0}")]
    InvalidElementValue(String),
}

/// A trait representing a fixed size numeric array element type.
pub trait Element:
    bytemuck::Pod + num::NumCast + PartialEq + Debug + Send + Sync + 'static
{
    /// The data type of the element.
    const DATA_TYPE: DataType;

    /// Validate the data type.
    ///
    /// # Errors
    /// Returns [`ElementError::IncompatibleElementType`] if `data_type` is not [`Element::DATA_TYPE`].
    fn validate_data_type(data_type: DataType) -> Result<(), ElementError> {
        if data_type == Self::DATA_TYPE {
            Ok(())
        } else {
            Err(IET {
                element: Self::DATA_TYPE,
                data_type,
            })
        }
    }

    /// Convert native-endian bytes of `data_type` into a vector of elements.
    ///
    /// # Errors
    /// Returns an [`ElementError`] if the data type is incompatible or the byte length is not a multiple of the element size.
    fn from_ne_bytes_vec(data_type: DataType, bytes: &[u8]) -> Result<Vec<Self>, ElementError> {
        Self::validate_data_type(data_type)?;
        let size = std::mem::size_of::<Self>();
        if bytes.len() % size != 0 {
            return Err(ElementError::InvalidByteLength(bytes.len(), size));
        }
        Ok(bytemuck::pod_collect_to_vec(bytes))
    }

    /// Convert a slice of elements into native-endian bytes.
    #[must_use]
    fn to_ne_bytes_vec(elements: &[Self]) -> Vec<u8> {
        bytemuck::cast_slice(elements).to_vec()
    }

    /// Interpret a fill value as an element.
    ///
    /// # Errors
    /// Returns [`ElementError::InvalidByteLength`] if the fill value size does not match the element size.
    fn from_fill_value(fill_value: &FillValue) -> Result<Self, ElementError> {
        let bytes = fill_value.as_ne_bytes();
        bytemuck::try_pod_read_unaligned(bytes).map_err(|_| {
            ElementError::InvalidByteLength(bytes.len(), std::mem::size_of::<Self>())
        })
    }
}

macro_rules! impl_element_pod {
    ($raw_type:ty, $data_type:expr) => {
        impl Element for $raw_type {
            const DATA_TYPE: DataType = $data_type;
        }
    };
}

impl_element_pod!(i8, DataType::Int8);
impl_element_pod!(u8, DataType::UInt8);
impl_element_pod!(i16, DataType::Int16);
impl_element_pod!(u16, DataType::UInt16);
impl_element_pod!(i32, DataType::Int32);
impl_element_pod!(u32, DataType::UInt32);
impl_element_pod!(i64, DataType::Int64);
impl_element_pod!(u64, DataType::UInt64);
impl_element_pod!(f32, DataType::Float32);
impl_element_pod!(f64, DataType::Float64);

fn to_i64<T: Element>(data_type: DataType, bytes: &[u8]) -> Result<Vec<i64>, ElementError> {
    T::from_ne_bytes_vec(data_type, bytes)?
        .into_iter()
        .map(|value| {
            <i64 as num::NumCast>::from(value)
                .ok_or_else(|| ElementError::InvalidElementValue(format!("{value:?}")))
        })
        .collect()
}

/// Decode native-endian bytes of an integer `data_type` as `i64` values.
///
/// Used to read list, count and index variables regardless of their on-disk integer width.
///
/// # Errors
/// Returns an [`ElementError`] if `data_type` is a floating point type, the byte length is invalid, or a `uint64` value exceeds [`i64::MAX`].
pub fn integers_from_ne_bytes(data_type: DataType, bytes: &[u8]) -> Result<Vec<i64>, ElementError> {
    match data_type {
        DataType::Int8 => to_i64::<i8>(data_type, bytes),
        DataType::UInt8 => to_i64::<u8>(data_type, bytes),
        DataType::Int16 => to_i64::<i16>(data_type, bytes),
        DataType::UInt16 => to_i64::<u16>(data_type, bytes),
        DataType::Int32 => to_i64::<i32>(data_type, bytes),
        DataType::UInt32 => to_i64::<u32>(data_type, bytes),
        DataType::Int64 => to_i64::<i64>(data_type, bytes),
        DataType::UInt64 => to_i64::<u64>(data_type, bytes),
        DataType::Float32 | DataType::Float64 => Err(IET {
            element: DataType::Int64,
            data_type,
        }),
    }
}
