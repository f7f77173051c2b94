//! `cfdm` reads CF-netCDF datasets and presents compressed variables as dense arrays.
//!
//! The CF conventions define several ways to store data compactly on disk:
//!  - **gathered** arrays, where a list variable holds the flat indices of the stored elements of a sparse array,
//!  - **contiguous ragged** arrays, where a count variable holds the number of elements of each feature instance,
//!  - **indexed ragged** arrays, where an index variable holds the owning instance of each element, and
//!  - **indexed contiguous ragged** arrays, a two level combination of the above used for time series of profiles and trajectories of profiles.
//!
//! A [`Dataset`](dataset::Dataset) scans the dataset header once with [`compression::scan`] to find these encodings.
//! [`Dataset::array`](dataset::Dataset::array) then returns a [`VariableArray`](array::VariableArray) for any variable.
//! Compressed variables are wrapped in a [`CompressedArray`](array::CompressedArray), which has the uncompressed shape and is decompressed when indexed.
//!
//! All arrays implement [`DenseArrayTraits`](array::DenseArrayTraits).
//! Retrieved data are returned as a [`MaskedArray`](array::MaskedArray): elements with no stored counterpart (such as the padding of short ragged rows) are masked.
//!
//! ## Storage
//! Datasets are read through the [`cfdm_storage`] API.
//! An in-memory store is always available, and the `netcdf` feature adds a store backed by the netCDF C library.
//!
//! ## Example
//! ```rust
//! # use std::sync::Arc;
//! use cfdm::array::{DenseArrayTraits, Subspace};
//! use cfdm::dataset::Dataset;
//! use cfdm_data_type::DataType;
//! use cfdm_storage::{store::MemoryStore, VariableMetadata};
//!
//! // Two time series with 3 and 2 observations in a contiguous ragged array
//! let store = MemoryStore::new();
//! store.set_global_attribute("featureType", "timeSeries");
//! store.add_dimension("station", 2);
//! store.add_dimension("obs", 5);
//! store.add_variable(
//!     VariableMetadata::new("row_size", DataType::Int32, vec!["station".into()])
//!         .with_attribute("sample_dimension", "obs"),
//!     &[3i32, 2],
//! )?;
//! store.add_variable(
//!     VariableMetadata::new("temp", DataType::Float64, vec!["obs".into()]),
//!     &[1.0f64, 2.0, 3.0, 4.0, 5.0],
//! )?;
//!
//! let dataset = Dataset::open(Arc::new(store))?;
//! let temp = dataset.array("temp")?;
//! assert_eq!(temp.shape(), &[2, 3]);
//! let data = temp.retrieve::<f64>(&Subspace::All)?;
//! assert_eq!(data.compressed(), vec![1.0, 2.0, 3.0, 4.0, 5.0]);
//! assert_eq!(data.get(&[1, 2]), None); // padding
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Logging
//! `cfdm` logs information and warnings using the [`log`] crate.
//! A logging implementation must be enabled to capture logs.
//! See the [`log`] crate documentation for more details.
//!
//! Malformed compression attributes are reported as [`Diagnostic`](compression::Diagnostic)s and also logged as warnings.
//!
//! ## Licence
//! `cfdm` is licensed under either of
//!  - the Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> or
//!  - the MIT license <http://opensource.org/licenses/MIT>, at your option.
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod array;
pub mod compression;
pub mod dataset;
pub mod indexer;

pub use cfdm_data_type as data_type;
pub use cfdm_storage as storage;
