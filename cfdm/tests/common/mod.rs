#![allow(dead_code)]

use std::sync::Arc;

use cfdm::data_type::DataType;
use cfdm::storage::VariableMetadata;
use cfdm::storage::store::MemoryStore;

pub fn variable(name: &str, data_type: DataType, dimensions: &[&str]) -> VariableMetadata {
    VariableMetadata::new(
        name,
        data_type,
        dimensions.iter().map(ToString::to_string).collect(),
    )
}

/// A 2x3 (lat, lon) field gathered into a list of 4 land points, with 2 time steps.
///
/// ```text
/// time 0:  1  .  2    time 1:  5  .  6
///          3  .  4             7  .  8
/// ```
pub fn gathered_store() -> Arc<MemoryStore> {
    let store = MemoryStore::new();
    store.add_dimension("time", 2);
    store.add_dimension("lat", 2);
    store.add_dimension("lon", 3);
    store.add_dimension("landpoint", 4);
    store
        .add_variable(
            variable("landpoint", DataType::Int32, &["landpoint"]).with_attribute("compress", "lat lon"),
            &[0i32, 2, 3, 5],
        )
        .unwrap();
    store
        .add_variable(
            variable("pr", DataType::Float32, &["time", "landpoint"]),
            &[1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0],
        )
        .unwrap();
    store
        .add_variable(variable("time", DataType::Float64, &["time"]), &[0.0f64, 1.0])
        .unwrap();
    Arc::new(store)
}

/// Two time series of 3 and 2 observations in a contiguous ragged array.
pub fn contiguous_store() -> Arc<MemoryStore> {
    let store = MemoryStore::new();
    store.set_global_attribute("featureType", "timeSeries");
    store.add_dimension("station", 2);
    store.add_dimension("obs", 5);
    store
        .add_variable(
            variable("row_size", DataType::Int32, &["station"]).with_attribute("sample_dimension", "obs"),
            &[3i32, 2],
        )
        .unwrap();
    store
        .add_variable(
            variable("lat", DataType::Float64, &["station"]),
            &[10.0f64, 20.0],
        )
        .unwrap();
    store
        .add_variable(
            variable("temp", DataType::Float64, &["obs"]),
            &[1.0f64, 2.0, 3.0, 4.0, 5.0],
        )
        .unwrap();
    Arc::new(store)
}

/// Two time series of 2 observations each, interleaved in an indexed ragged array.
pub fn indexed_store() -> Arc<MemoryStore> {
    let store = MemoryStore::new();
    store.set_global_attribute("featureType", "timeSeries");
    store.add_dimension("station", 2);
    store.add_dimension("obs", 4);
    store
        .add_variable(
            variable("stationIndex", DataType::Int32, &["obs"])
                .with_attribute("instance_dimension", "station"),
            &[1i32, 0, 1, 0],
        )
        .unwrap();
    store
        .add_variable(
            variable("humidity", DataType::Int16, &["obs"]),
            &[1i16, 2, 3, 4],
        )
        .unwrap();
    Arc::new(store)
}

/// Two stations with 3 profiles of 2, 3 and 1 observations in an indexed contiguous ragged array.
///
/// Profiles 0 and 2 belong to station 0, profile 1 to station 1.
pub fn indexed_contiguous_store() -> Arc<MemoryStore> {
    let store = MemoryStore::new();
    store.set_global_attribute("featureType", "timeSeriesProfile");
    store.add_dimension("station", 2);
    store.add_dimension("profile", 3);
    store.add_dimension("obs", 6);
    store
        .add_variable(
            variable("row_size", DataType::Int32, &["profile"]).with_attribute("sample_dimension", "obs"),
            &[2i32, 3, 1],
        )
        .unwrap();
    store
        .add_variable(
            variable("station_index", DataType::Int32, &["profile"])
                .with_attribute("instance_dimension", "station"),
            &[0i32, 1, 0],
        )
        .unwrap();
    store
        .add_variable(
            variable("time", DataType::Float64, &["profile"]),
            &[10.0f64, 20.0, 30.0],
        )
        .unwrap();
    store
        .add_variable(
            variable("temp", DataType::Float32, &["obs"]),
            &[1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0],
        )
        .unwrap();
    Arc::new(store)
}
