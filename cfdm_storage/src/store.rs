//! Stores.

mod memory_store;
pub use memory_store::MemoryStore;

#[cfg(feature = "netcdf")]
mod netcdf_store;
#[cfg(feature = "netcdf")]
pub use netcdf_store::NetcdfStore;
