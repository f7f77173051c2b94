use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::FillValue;

/// A netCDF numeric data type.
///
/// Names follow CDL (`byte`, `short`, `int`, ...).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// `byte`: a signed 8-bit integer.
    #[serde(rename = "byte")]
    Int8,
    /// `ubyte`: an unsigned 8-bit integer.
    #[serde(rename = "ubyte")]
    UInt8,
    /// `short`: a signed 16-bit integer.
    #[serde(rename = "short")]
    Int16,
    /// `ushort`: an unsigned 16-bit integer.
    #[serde(rename = "ushort")]
    UInt16,
    /// `int`: a signed 32-bit integer.
    #[serde(rename = "int")]
    Int32,
    /// `uint`: an unsigned 32-bit integer.
    #[serde(rename = "uint")]
    UInt32,
    /// `int64`: a signed 64-bit integer.
    Int64,
    /// `uint64`: an unsigned 64-bit integer.
    UInt64,
    /// `float`: an IEEE 754 single-precision floating point number.
    #[serde(rename = "float")]
    Float32,
    /// `double`: an IEEE 754 double-precision floating point number.
    #[serde(rename = "double")]
    Float64,
}

impl DataType {
    /// Return the CDL name of the data type.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Int8 => "byte",
            Self::UInt8 => "ubyte",
            Self::Int16 => "short",
            Self::UInt16 => "ushort",
            Self::Int32 => "int",
            Self::UInt32 => "uint",
            Self::Int64 => "int64",
            Self::UInt64 => "uint64",
            Self::Float32 => "float",
            Self::Float64 => "double",
        }
    }

    /// Return the size in bytes of an element of the data type.
    #[must_use]
    pub const fn size(&self) -> usize {
        match self {
            Self::Int8 | Self::UInt8 => 1,
            Self::Int16 | Self::UInt16 => 2,
            Self::Int32 | Self::UInt32 | Self::Float32 => 4,
            Self::Int64 | Self::UInt64 | Self::Float64 => 8,
        }
    }

    /// Returns true if the data type is an integer type.
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        !matches!(self, Self::Float32 | Self::Float64)
    }

    /// Return the netCDF default fill value of the data type (`NC_FILL_*`).
    ///
    /// This is the value of unwritten elements when a variable has no `_FillValue` attribute.
    #[must_use]
    pub fn default_fill_value(&self) -> FillValue {
        match self {
            Self::Int8 => FillValue::from(-127i8),
            Self::UInt8 => FillValue::from(255u8),
            Self::Int16 => FillValue::from(-32_767i16),
            Self::UInt16 => FillValue::from(65_535u16),
            Self::Int32 => FillValue::from(-2_147_483_647i32),
            Self::UInt32 => FillValue::from(4_294_967_295u32),
            Self::Int64 => FillValue::from(-9_223_372_036_854_775_806i64),
            Self::UInt64 => FillValue::from(18_446_744_073_709_551_614u64),
            Self::Float32 => FillValue::from(9.969_209_968_386_869e36_f32),
            Self::Float64 => FillValue::from(9.969_209_968_386_869e36_f64),
        }
    }
}

impl Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_type_sizes() {
        assert_eq!(DataType::Int8.size(), 1);
        assert_eq!(DataType::UInt16.size(), 2);
        assert_eq!(DataType::Float32.size(), 4);
        assert_eq!(DataType::Int64.size(), 8);
        for data_type in [DataType::Int32, DataType::Float64, DataType::UInt8] {
            assert_eq!(
                data_type.default_fill_value().as_ne_bytes().len(),
                data_type.size()
            );
        }
    }

    #[test]
    fn data_type_names() {
        assert_eq!(DataType::Float64.to_string(), "double");
        assert!(DataType::Int16.is_integer());
        assert!(!DataType::Float32.is_integer());
        assert_eq!(
            serde_json::to_string(&DataType::Int32).unwrap(),
            r#""int""#
        );
        assert_eq!(
            serde_json::from_str::<DataType>(r#""uint64""#).unwrap(),
            DataType::UInt64
        );
    }
}
