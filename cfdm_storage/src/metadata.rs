//! Dataset header metadata.

use std::collections::BTreeMap;

use cfdm_data_type::DataType;
use serde::{Deserialize, Serialize};

use crate::StorageError;

/// A netCDF dimension.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimension {
    name: String,
    size: u64,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    unlimited: bool,
}

impl Dimension {
    /// Create a new fixed size dimension.
    #[must_use]
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
            unlimited: false,
        }
    }

    /// Create a new unlimited (record) dimension with its current size.
    #[must_use]
    pub fn new_unlimited(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
            unlimited: true,
        }
    }

    /// Return the dimension name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Return the dimension size.
    #[must_use]
    pub const fn size(&self) -> u64 {
        self.size
    }

    /// Returns true if the dimension is unlimited.
    #[must_use]
    pub const fn is_unlimited(&self) -> bool {
        self.unlimited
    }
}

/// A netCDF attribute value.
///
/// Integer attributes of every width are held as `i64`, floating point attributes as `f64`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, derive_more::From)]
#[serde(untagged)]
pub enum AttributeValue {
    /// A text attribute.
    Text(String),
    /// An integer attribute.
    Int(Vec<i64>),
    /// A floating point attribute.
    Float(Vec<f64>),
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        Self::Int(vec![value])
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        Self::Float(vec![value])
    }
}

impl AttributeValue {
    /// Return the text of a text attribute.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        if let Self::Text(text) = self {
            Some(text)
        } else {
            None
        }
    }

    /// Return the values of a numeric attribute as `f64`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn to_f64_vec(&self) -> Option<Vec<f64>> {
        match self {
            Self::Text(_) => None,
            Self::Int(values) => Some(values.iter().map(|&v| v as f64).collect()),
            Self::Float(values) => Some(values.clone()),
        }
    }
}

impl std::fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Int(values) => write!(f, "{}", itertools::join(values, " ")),
            Self::Float(values) => write!(f, "{}", itertools::join(values, " ")),
        }
    }
}

/// Named attributes.
pub type Attributes = BTreeMap<String, AttributeValue>;

/// The metadata of a netCDF variable.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VariableMetadata {
    name: String,
    data_type: DataType,
    dimensions: Vec<String>,
    #[serde(default, skip_serializing_if = "Attributes::is_empty")]
    attributes: Attributes,
}

impl VariableMetadata {
    /// Create new variable metadata without attributes.
    #[must_use]
    pub fn new(name: impl Into<String>, data_type: DataType, dimensions: Vec<String>) -> Self {
        Self {
            name: name.into(),
            data_type,
            dimensions,
            attributes: Attributes::new(),
        }
    }

    /// Set an attribute.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Return the variable name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Return the data type.
    #[must_use]
    pub const fn data_type(&self) -> DataType {
        self.data_type
    }

    /// Return the dimension names, slowest varying first.
    #[must_use]
    pub fn dimensions(&self) -> &[String] {
        &self.dimensions
    }

    /// Return the attributes.
    #[must_use]
    pub const fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Return the attribute `name`, if present.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }
}

/// The header of a netCDF dataset.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetMetadata {
    dimensions: Vec<Dimension>,
    variables: Vec<VariableMetadata>,
    #[serde(default, skip_serializing_if = "Attributes::is_empty")]
    attributes: Attributes,
}

impl DatasetMetadata {
    /// Create new dataset metadata.
    #[must_use]
    pub fn new(
        dimensions: Vec<Dimension>,
        variables: Vec<VariableMetadata>,
        attributes: Attributes,
    ) -> Self {
        Self {
            dimensions,
            variables,
            attributes,
        }
    }

    /// Return the dimensions in definition order.
    #[must_use]
    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    /// Return the variables in definition order.
    #[must_use]
    pub fn variables(&self) -> &[VariableMetadata] {
        &self.variables
    }

    /// Return the global attributes.
    #[must_use]
    pub const fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Return the dimension `name`, if present.
    #[must_use]
    pub fn dimension(&self, name: &str) -> Option<&Dimension> {
        self.dimensions.iter().find(|d| d.name == name)
    }

    /// Return the variable `name`, if present.
    #[must_use]
    pub fn variable(&self, name: &str) -> Option<&VariableMetadata> {
        self.variables.iter().find(|v| v.name == name)
    }

    /// Return the global attribute `name`, if present.
    #[must_use]
    pub fn global_attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }

    /// Return the shape of `variable` from the sizes of its dimensions.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if the variable or one of its dimensions does not exist.
    pub fn variable_shape(&self, variable: &str) -> Result<Vec<u64>, StorageError> {
        let metadata = self
            .variable(variable)
            .ok_or_else(|| StorageError::UnknownVariable(variable.to_string()))?;
        metadata
            .dimensions
            .iter()
            .map(|name| {
                self.dimension(name).map(Dimension::size).ok_or_else(|| {
                    StorageError::UnknownDimension(name.clone(), variable.to_string())
                })
            })
            .collect()
    }

    pub(crate) fn push_dimension(&mut self, dimension: Dimension) {
        self.dimensions.retain(|d| d.name != dimension.name);
        self.dimensions.push(dimension);
    }

    pub(crate) fn push_variable(&mut self, variable: VariableMetadata) {
        self.variables.retain(|v| v.name != variable.name);
        self.variables.push(variable);
    }

    pub(crate) fn set_attribute(&mut self, name: String, value: AttributeValue) {
        self.attributes.insert(name, value);
    }
}
