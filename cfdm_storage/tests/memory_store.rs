use std::error::Error;
use std::sync::Arc;

use cfdm_data_type::{DataType, Element};
use cfdm_storage::{
    store::MemoryStore, AttributeValue, Hyperslab, ReadableStorage, ReadableStorageTraits,
    VariableMetadata,
};

#[test]
fn memory_store_metadata() -> Result<(), Box<dyn Error>> {
    let store = MemoryStore::new();
    store.add_dimension("station", 2);
    store.add_unlimited_dimension("obs", 5);
    store.set_global_attribute("featureType", "timeSeries");
    store.add_variable(
        VariableMetadata::new("row_size", DataType::Int32, vec!["station".to_string()])
            .with_attribute("sample_dimension", "obs"),
        &[3i32, 2],
    )?;

    let storage: ReadableStorage = Arc::new(store);
    let metadata = storage.metadata()?;
    assert_eq!(
        metadata.global_attribute("featureType"),
        Some(&AttributeValue::Text("timeSeries".to_string()))
    );
    let row_size = metadata.variable("row_size").unwrap();
    assert_eq!(row_size.data_type(), DataType::Int32);
    assert_eq!(
        row_size
            .attribute("sample_dimension")
            .and_then(AttributeValue::as_text),
        Some("obs")
    );
    assert_eq!(metadata.variable_shape("row_size")?, vec![2]);
    assert_eq!(metadata.dimensions().len(), 2);

    let json = serde_json::to_value(&metadata)?;
    assert_eq!(json["attributes"]["featureType"], "timeSeries");
    Ok(())
}

#[test]
fn memory_store_hyperslab_3d() -> Result<(), Box<dyn Error>> {
    let store = MemoryStore::new();
    store.add_dimension("t", 2);
    store.add_dimension("y", 2);
    store.add_dimension("x", 3);
    store.add_variable(
        VariableMetadata::new(
            "v",
            DataType::Float64,
            vec!["t".to_string(), "y".to_string(), "x".to_string()],
        ),
        &(0..12).map(f64::from).collect::<Vec<_>>(),
    )?;

    let bytes = store.get_hyperslab("v", &Hyperslab::new_with_ranges(&[0..2, 1..2, 1..3]))?;
    assert_eq!(
        f64::from_ne_bytes_vec(DataType::Float64, &bytes)?,
        vec![4.0, 5.0, 10.0, 11.0]
    );

    let bytes = store.get_hyperslab("v", &Hyperslab::new_with_ranges(&[1..2, 0..2, 0..3]))?;
    assert_eq!(
        f64::from_ne_bytes_vec(DataType::Float64, &bytes)?,
        vec![6.0, 7.0, 8.0, 9.0, 10.0, 11.0]
    );
    Ok(())
}
