#![allow(missing_docs)]

mod common;

use cfdm::array::{ArrayError, DenseArrayTraits, DimensionIndex, Subspace, VariableArray};
use cfdm::compression::CompressionType;
use cfdm::data_type::DataType;
use cfdm::dataset::Dataset;
use cfdm::storage::store::MemoryStore;
use ndarray::array;

use common::{gathered_store, variable};

#[rustfmt::skip]
#[test]
fn gathered_sample_axis_not_first() -> Result<(), Box<dyn std::error::Error>> {
    let dataset = Dataset::open(gathered_store())?;
    assert_eq!(dataset.implied_dimensions("pr")?, vec!["time", "lat", "lon"]);

    let pr = dataset.array("pr")?;
    let VariableArray::Compressed(compressed) = &pr else {
        panic!("pr is not compressed");
    };
    assert_eq!(compressed.compression_type(), CompressionType::Gathered);
    assert_eq!(compressed.sample_axis(), 1);
    assert_eq!(compressed.compressed_array().shape(), &[2, 4]);
    assert_eq!(pr.shape(), &[2, 2, 3]);
    assert_eq!(pr.ndim(), 3);
    assert_eq!(pr.size(), 12);
    assert_eq!(pr.data_type(), DataType::Float32);

    let data = pr.retrieve::<f32>(&Subspace::All)?;
    assert_eq!(data.shape(), &[2, 2, 3]);
    assert_eq!(data.count(), 8);
    assert_eq!(
        data.filled(-1.0),
        array![
            [[1.0, -1.0, 2.0], [3.0, -1.0, 4.0]],
            [[5.0, -1.0, 6.0], [7.0, -1.0, 8.0]],
        ].into_dyn()
    );
    assert_eq!(data.get(&[1, 1, 0]), Some(&7.0));
    assert_eq!(data.get(&[0, 0, 1]), None);
    Ok(())
}

#[rustfmt::skip]
#[test]
fn gathered_subspace() -> Result<(), Box<dyn std::error::Error>> {
    let dataset = Dataset::open(gathered_store())?;
    let pr = dataset.array("pr")?;

    let subspace = Subspace::new([
        DimensionIndex::from(1..2),
        DimensionIndex::from(..),
        DimensionIndex::List(vec![2, 0, -2]),
    ]);
    let data = pr.retrieve::<f32>(&subspace)?;
    assert_eq!(data.shape(), &[1, 2, 3]);
    assert_eq!(data.filled(0.0), array![[[6.0, 5.0, 0.0], [8.0, 7.0, 0.0]]].into_dyn());
    assert_eq!(data.mask(), &array![[[false, false, true], [false, false, true]]].into_dyn());

    // retrieval is repeatable
    assert_eq!(pr.retrieve::<f32>(&subspace)?, data);

    assert!(matches!(
        pr.retrieve::<f32>(&Subspace::new([DimensionIndex::from(..)])),
        Err(ArrayError::IndexerError(_))
    ));
    assert!(matches!(
        pr.retrieve::<f64>(&Subspace::All),
        Err(ArrayError::ElementError(_))
    ));
    Ok(())
}

#[test]
fn gathered_invalid_index() -> Result<(), Box<dyn std::error::Error>> {
    let store = MemoryStore::new();
    store.add_dimension("lat", 2);
    store.add_dimension("lon", 3);
    store.add_dimension("list", 2);
    store.add_variable(
        variable("list", DataType::Int64, &["list"]).with_attribute("compress", "lat lon"),
        &[1i64, 6],
    )?;
    store.add_variable(variable("pr", DataType::Float32, &["list"]), &[1.0f32, 2.0])?;

    let dataset = Dataset::open(std::sync::Arc::new(store))?;
    let pr = dataset.array("pr")?;
    assert_eq!(pr.shape(), &[2, 3]);
    assert!(matches!(
        pr.retrieve::<f32>(&Subspace::All),
        Err(ArrayError::InvalidGatheredIndex { index: 6, size: 6 })
    ));
    Ok(())
}

#[test]
fn gathered_missing_dimension_is_diagnosed() -> Result<(), Box<dyn std::error::Error>> {
    testing_logger::setup();
    let store = MemoryStore::new();
    store.add_dimension("lat", 2);
    store.add_dimension("list", 2);
    store.add_variable(
        variable("list", DataType::Int32, &["list"]).with_attribute("compress", "lat lon"),
        &[0i32, 1],
    )?;
    store.add_variable(variable("pr", DataType::Float32, &["list"]), &[1.0f32, 2.0])?;

    let dataset = Dataset::open(std::sync::Arc::new(store))?;
    assert!(dataset.compression().is_empty());
    assert_eq!(dataset.field_variables(), vec!["list", "pr"]);

    let diagnostics = dataset.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].variable, "list");
    assert_eq!(diagnostics[0].attribute, "compress");
    assert_eq!(diagnostics[0].value.as_deref(), Some("lat lon"));
    let json = serde_json::to_value(&diagnostics[0])?;
    assert_eq!(json["code"], "missing_dimension");

    let pr = dataset.array("pr")?;
    assert!(!pr.is_compressed());
    assert_eq!(pr.retrieve::<f32>(&Subspace::All)?.compressed(), vec![1.0, 2.0]);

    testing_logger::validate(|captured_logs| {
        let warnings: Vec<_> = captured_logs
            .iter()
            .filter(|log| log.level == log::Level::Warn)
            .collect();
        assert_eq!(warnings.len(), 1);
        assert_eq!(
            warnings[0].body,
            r#"list:compress = "lat lon": dimension lon is not in the dataset (missing dimension)"#
        );
    });
    Ok(())
}
