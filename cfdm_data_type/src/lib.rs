//! The data type API for the `cfdm` crate.
//!
//! netCDF variables hold elements of one of the classic or enhanced numeric types.
//! This crate provides:
//!  - [`DataType`]: the supported numeric data types,
//!  - [`FillValue`]: a native-endian element value, such as the netCDF default fill value of a data type, and
//!  - [`Element`]: a trait binding a Rust primitive to its [`DataType`] with byte conversion helpers.
//!
//! ## Licence
//! `cfdm_data_type` is licensed under either of
//!  - the Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> or
//!  - the MIT license <http://opensource.org/licenses/MIT>, at your option.

mod data_type;
mod element;
mod fill_value;

pub use data_type::DataType;
pub use element::{integers_from_ne_bytes, Element, ElementError};
pub use fill_value::FillValue;
