#![allow(missing_docs)]

mod common;

use std::sync::Arc;

use cfdm::array::{ArrayError, DenseArrayTraits, DimensionIndex, Subspace, VariableArray};
use cfdm::compression::{CompressionDescriptor, CompressionError, CompressionType, DiagnosticCode};
use cfdm::data_type::DataType;
use cfdm::dataset::Dataset;
use cfdm::storage::Dimension;
use cfdm::storage::store::MemoryStore;
use ndarray::array;

use common::{contiguous_store, indexed_contiguous_store, indexed_store, variable};

fn compression_type(array: &VariableArray) -> Option<CompressionType> {
    match array {
        VariableArray::Compressed(array) => Some(array.compression_type()),
        VariableArray::Uncompressed(_) => None,
    }
}

#[rustfmt::skip]
#[test]
fn ragged_contiguous() -> Result<(), Box<dyn std::error::Error>> {
    let dataset = Dataset::open(contiguous_store())?;
    assert_eq!(dataset.feature_type(), Some("timeSeries"));
    assert_eq!(dataset.field_variables(), vec!["lat", "temp"]);
    assert_eq!(dataset.non_field_variables(), vec!["row_size"]);
    assert_eq!(dataset.implied_dimensions("temp")?, vec!["station", "timeseries"]);
    assert_eq!(dataset.domain_axes().last(), Some(&Dimension::new("timeseries", 3)));

    let temp = dataset.array("temp")?;
    assert_eq!(compression_type(&temp), Some(CompressionType::RaggedContiguous));
    assert_eq!(temp.shape(), &[2, 3]);
    assert_eq!(temp.size(), temp.shape().iter().product::<u64>());

    let data = temp.retrieve::<f64>(&Subspace::All)?;
    assert_eq!(data.filled(0.0), array![[1.0, 2.0, 3.0], [4.0, 5.0, 0.0]].into_dyn());
    assert_eq!(data.mask(), &array![[false, false, false], [false, false, true]].into_dyn());

    let row = temp.retrieve::<f64>(&Subspace::new([DimensionIndex::from(1..2), DimensionIndex::from(..)]))?;
    assert_eq!(row.compressed(), vec![4.0, 5.0]);
    assert!(row.is_masked());

    let lat = dataset.array("lat")?;
    assert_eq!(compression_type(&lat), None);
    assert_eq!(lat.retrieve::<f64>(&Subspace::All)?.compressed(), vec![10.0, 20.0]);
    Ok(())
}

#[rustfmt::skip]
#[test]
fn ragged_indexed() -> Result<(), Box<dyn std::error::Error>> {
    let dataset = Dataset::open(indexed_store())?;
    let humidity = dataset.array("humidity")?;
    assert_eq!(compression_type(&humidity), Some(CompressionType::RaggedIndexed));
    assert_eq!(humidity.shape(), &[2, 2]);

    // samples of each station keep their on-disk order
    let data = humidity.retrieve::<i16>(&Subspace::All)?;
    assert_eq!(data.filled(0), array![[2, 4], [1, 3]].into_dyn());
    assert!(!data.is_masked());
    assert_eq!(humidity.retrieve::<i16>(&Subspace::All)?, data);
    Ok(())
}

#[test]
fn ragged_indexed_instance_out_of_range() -> Result<(), Box<dyn std::error::Error>> {
    let store = MemoryStore::new();
    store.set_global_attribute("featureType", "timeSeries");
    store.add_dimension("station", 2);
    store.add_dimension("obs", 3);
    store.add_variable(
        variable("stationIndex", DataType::Int32, &["obs"])
            .with_attribute("instance_dimension", "station"),
        &[0i32, 2, 1],
    )?;
    store.add_variable(variable("humidity", DataType::Int16, &["obs"]), &[1i16, 2, 3])?;

    let dataset = Dataset::open(Arc::new(store))?;
    assert_eq!(dataset.diagnostics().len(), 1);
    assert_eq!(
        dataset.diagnostics()[0].code,
        DiagnosticCode::InstanceIndexOutOfRange
    );

    let humidity = dataset.array("humidity")?;
    assert!(matches!(
        humidity.retrieve::<i16>(&Subspace::All),
        Err(ArrayError::InvalidInstanceIndex {
            index: 2,
            instance_size: 2
        })
    ));
    Ok(())
}

#[rustfmt::skip]
#[test]
fn ragged_indexed_contiguous() -> Result<(), Box<dyn std::error::Error>> {
    let dataset = Dataset::open(indexed_contiguous_store())?;
    assert_eq!(dataset.non_field_variables(), vec!["row_size", "station_index"]);
    assert_eq!(dataset.implied_dimensions("temp")?, vec!["station", "timeseries", "profile_1"]);
    assert_eq!(dataset.implied_dimensions("time")?, vec!["station", "timeseries"]);

    let Some(CompressionDescriptor::RaggedIndexedContiguous(descriptor)) = dataset.compression().get("obs") else {
        panic!("obs is not an indexed contiguous sample dimension");
    };
    assert_eq!(descriptor.profile_dimension(), "profile");
    assert_eq!(descriptor.profiles_per_instance(), &[2, 1]);

    let temp = dataset.array("temp")?;
    assert_eq!(compression_type(&temp), Some(CompressionType::RaggedIndexedContiguous));
    assert_eq!(temp.shape(), &[2, 2, 3]);
    let data = temp.retrieve::<f32>(&Subspace::All)?;
    assert_eq!(
        data.filled(0.0),
        array![
            [[1.0, 2.0, 0.0], [6.0, 0.0, 0.0]],
            [[3.0, 4.0, 5.0], [0.0, 0.0, 0.0]],
        ].into_dyn()
    );
    assert_eq!(data.count(), 6);
    assert_eq!(data.get(&[1, 1, 0]), None);

    // per-profile variables are indexed ragged arrays of the profile dimension
    let time = dataset.array("time")?;
    assert_eq!(compression_type(&time), Some(CompressionType::RaggedIndexed));
    let data = time.retrieve::<f64>(&Subspace::All)?;
    assert_eq!(data.filled(-1.0), array![[10.0, 30.0], [20.0, -1.0]].into_dyn());

    let subspace = Subspace::new([
        DimensionIndex::List(vec![0]),
        DimensionIndex::from(..),
        DimensionIndex::from(0..1),
    ]);
    assert_eq!(temp.retrieve::<f32>(&subspace)?.compressed(), vec![1.0, 6.0]);
    Ok(())
}

#[test]
fn ragged_incompatible_composition() -> Result<(), Box<dyn std::error::Error>> {
    let store = MemoryStore::new();
    store.set_global_attribute("featureType", "trajectoryProfile");
    store.add_dimension("trajectory", 2);
    store.add_dimension("profile", 3);
    store.add_dimension("obs", 5);
    store.add_dimension("other", 3);
    store.add_variable(
        variable("row_size", DataType::Int32, &["profile"]).with_attribute("sample_dimension", "obs"),
        &[2i32, 2, 1],
    )?;
    store.add_variable(
        variable("trajectory_index", DataType::Int32, &["other"])
            .with_attribute("instance_dimension", "trajectory"),
        &[0i32, 1, 1],
    )?;
    let error = Dataset::open(Arc::new(store)).unwrap_err();
    assert!(matches!(
        error,
        CompressionError::IncompatibleRaggedComposition { .. }
    ));
    assert!(error.to_string().contains("row_size"));
    Ok(())
}

#[test]
fn ragged_without_feature_type() -> Result<(), Box<dyn std::error::Error>> {
    let store = MemoryStore::new();
    store.add_dimension("station", 2);
    store.add_dimension("obs", 3);
    store.add_variable(
        variable("row_size", DataType::Int32, &["station"]).with_attribute("sample_dimension", "obs"),
        &[2i32, 1],
    )?;
    store.add_variable(variable("temp", DataType::Float64, &["obs"]), &[1.0f64, 2.0, 3.0])?;

    let dataset = Dataset::open(Arc::new(store))?;
    assert_eq!(dataset.feature_type(), None);
    let temp = dataset.array("temp")?;
    assert_eq!(compression_type(&temp), None);
    assert_eq!(temp.shape(), &[3]);
    Ok(())
}

#[test]
fn ragged_counts_exceed_samples() -> Result<(), Box<dyn std::error::Error>> {
    let store = MemoryStore::new();
    store.set_global_attribute("featureType", "trajectory");
    store.add_dimension("trajectory", 2);
    store.add_dimension("obs", 3);
    store.add_variable(
        variable("row_size", DataType::Int32, &["trajectory"]).with_attribute("sample_dimension", "obs"),
        &[2i32, 2],
    )?;
    store.add_variable(variable("temp", DataType::Float64, &["obs"]), &[1.0f64, 2.0, 3.0])?;

    let dataset = Dataset::open(Arc::new(store))?;
    assert_eq!(dataset.implied_dimensions("temp")?, vec!["trajectory", "trajectory_1"]);
    let temp = dataset.array("temp")?;
    assert!(matches!(
        temp.retrieve::<f64>(&Subspace::All),
        Err(ArrayError::SampleIndexOutOfBounds { index: 3, length: 3 })
    ));
    Ok(())
}

#[test]
fn ragged_fill_value_is_masked() -> Result<(), Box<dyn std::error::Error>> {
    let store = MemoryStore::new();
    store.set_global_attribute("featureType", "timeSeries");
    store.add_dimension("station", 2);
    store.add_dimension("obs", 3);
    store.add_variable(
        variable("row_size", DataType::Int32, &["station"]).with_attribute("sample_dimension", "obs"),
        &[1i32, 2],
    )?;
    store.add_variable(
        variable("temp", DataType::Float64, &["obs"]).with_attribute("_FillValue", -999.0),
        &[1.0f64, -999.0, 3.0],
    )?;
    let store = Arc::new(store);

    let dataset = Dataset::open(store.clone())?;
    let data = dataset.array("temp")?.retrieve::<f64>(&Subspace::All)?;
    assert_eq!(data.mask(), &array![[false, true], [true, false]].into_dyn());
    assert_eq!(data.compressed(), vec![1.0, 3.0]);

    let options = cfdm::dataset::ReadOptions::default().with_mask(false);
    let dataset = Dataset::open_opt(store, options)?;
    let data = dataset.array("temp")?.retrieve::<f64>(&Subspace::All)?;
    assert_eq!(data.compressed(), vec![1.0, -999.0, 3.0]);
    Ok(())
}
