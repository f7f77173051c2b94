use std::collections::BTreeSet;
use std::sync::Arc;

use cfdm_data_type::{ElementError, integers_from_ne_bytes};
use cfdm_storage::{
    AttributeValue, DatasetMetadata, Dimension, ReadableStorageTraits, StorageError,
    VariableMetadata,
};
use thiserror::Error;

use super::{
    CompressionDescriptor, CompressionMap, Diagnostic, DiagnosticCode, GatheredDescriptor,
    RaggedContiguousDescriptor, RaggedIndexedContiguousDescriptor, RaggedIndexedDescriptor,
};

/// A fatal compression scan error.
#[derive(Clone, Debug, Error)]
#[non_exhaustive]
pub enum CompressionError {
    /// A store error.
    #[error(transparent)]
    StorageError(#[from] StorageError),
    /// The content of a list, count or index variable could not be decoded as integers.
    #[error("invalid content of {variable}: {source}")]
    InvalidContent {
        /// The variable.
        variable: String,
        /// The decoding error.
        #[source]
        source: ElementError,
    },
    /// A count variable holds a negative count.
    #[error("count variable {variable} has a negative count {count}")]
    NegativeCount {
        /// The count variable.
        variable: String,
        /// The negative count.
        count: i64,
    },
    /// Count and index variables that do not form an indexed contiguous ragged array.
    #[error(
        "count variable {count_variable} (instance dimension {profile_dimension}) cannot be composed with index variable {index_variable} (sample dimension {sample_dimension})"
    )]
    IncompatibleRaggedComposition {
        /// The count variable.
        count_variable: String,
        /// The dimension of the count variable.
        profile_dimension: String,
        /// The index variable.
        index_variable: String,
        /// The dimension of the index variable.
        sample_dimension: String,
    },
}

/// The result of a compression scan.
#[derive(Clone, Debug, Default)]
pub struct CompressionScan {
    compression: CompressionMap,
    diagnostics: Vec<Diagnostic>,
    non_field_variables: BTreeSet<String>,
    synthesized_dimensions: Vec<Dimension>,
    feature_type: Option<String>,
}

impl CompressionScan {
    /// Return the compression descriptors keyed by sample dimension.
    #[must_use]
    pub const fn compression(&self) -> &CompressionMap {
        &self.compression
    }

    /// Return the diagnostics of malformed compression attributes.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Return the list, count and index variables. These hold compression parameters rather than data.
    #[must_use]
    pub const fn non_field_variables(&self) -> &BTreeSet<String> {
        &self.non_field_variables
    }

    /// Return the element dimensions synthesized for ragged arrays, which are not in the dataset.
    #[must_use]
    pub fn synthesized_dimensions(&self) -> &[Dimension] {
        &self.synthesized_dimensions
    }

    /// Return the global `featureType` attribute, if present.
    #[must_use]
    pub fn feature_type(&self) -> Option<&str> {
        self.feature_type.as_deref()
    }
}

/// Scan the dataset of `storage` for compression.
///
/// # Errors
/// Returns a [`CompressionError`] if the list, count or index variables cannot be read,
/// or if count and index variables are present but do not compose. Malformed attributes are reported as diagnostics instead.
pub fn scan(storage: &dyn ReadableStorageTraits) -> Result<CompressionScan, CompressionError> {
    let metadata = storage.metadata()?;
    CompressionScanner::new(storage, &metadata).scan()
}

/// Return the base name of a synthesized element dimension.
fn element_dimension_base(feature_type: &str, indexed: bool) -> &'static str {
    match feature_type.to_ascii_lowercase().as_str() {
        "timeseries" => "timeseries",
        "trajectory" => "trajectory",
        "profile" => "profile",
        "timeseriesprofile" if indexed => "timeseries",
        "trajectoryprofile" if indexed => "trajectory",
        "timeseriesprofile" | "trajectoryprofile" => "profile",
        _ => "element",
    }
}

/// A compression scanner for the header of one dataset.
pub struct CompressionScanner<'a> {
    storage: &'a dyn ReadableStorageTraits,
    metadata: &'a DatasetMetadata,
    scan: CompressionScan,
}

impl<'a> CompressionScanner<'a> {
    /// Create a new compression scanner.
    #[must_use]
    pub fn new(storage: &'a dyn ReadableStorageTraits, metadata: &'a DatasetMetadata) -> Self {
        Self {
            storage,
            metadata,
            scan: CompressionScan::default(),
        }
    }

    /// Run the scan.
    ///
    /// # Errors
    /// See [`scan`].
    pub fn scan(mut self) -> Result<CompressionScan, CompressionError> {
        let metadata = self.metadata;
        self.scan_gathered()?;

        match metadata.global_attribute("featureType") {
            Some(AttributeValue::Text(feature_type)) => {
                log::debug!("featureType {feature_type}");
                self.scan.feature_type = Some(feature_type.clone());
                let contiguous = self.scan_contiguous(feature_type)?;
                let indexed = self.scan_indexed(feature_type)?;
                self.compose(contiguous, indexed)?;
            }
            Some(value) => {
                log::warn!("ignoring non-text featureType {value}");
            }
            None => {}
        }
        Ok(self.scan)
    }

    fn diagnose(
        &mut self,
        variable: &VariableMetadata,
        code: DiagnosticCode,
        attribute: &str,
        message: String,
    ) {
        let diagnostic = Diagnostic {
            variable: variable.name().to_string(),
            code,
            attribute: attribute.to_string(),
            value: variable.attribute(attribute).map(ToString::to_string),
            message,
        };
        log::warn!("{diagnostic}");
        self.scan.diagnostics.push(diagnostic);
    }

    /// Return the text of `attribute`, recording a diagnostic if it is not text.
    fn text_attribute<'b>(
        &mut self,
        variable: &'b VariableMetadata,
        attribute: &str,
    ) -> Option<&'b str> {
        match variable.attribute(attribute)? {
            AttributeValue::Text(text) => Some(text),
            _ => {
                self.diagnose(
                    variable,
                    DiagnosticCode::InvalidAttributeValue,
                    attribute,
                    format!("{attribute} must be text"),
                );
                None
            }
        }
    }

    fn check_dimension_exists(
        &mut self,
        variable: &VariableMetadata,
        attribute: &str,
        dimension: &str,
    ) -> bool {
        if self.metadata.dimension(dimension).is_some() {
            true
        } else {
            self.diagnose(
                variable,
                DiagnosticCode::MissingDimension,
                attribute,
                format!("dimension {dimension} is not in the dataset"),
            );
            false
        }
    }

    /// Check that a list, count or index variable is a one dimensional integer variable.
    fn check_parameter_variable(&mut self, variable: &VariableMetadata, attribute: &str) -> bool {
        if variable.dimensions().len() == 1 && variable.data_type().is_integer() {
            true
        } else {
            self.diagnose(
                variable,
                DiagnosticCode::InvalidVariable,
                attribute,
                format!(
                    "expected a one dimensional integer variable, got {} with dimensions {:?}",
                    variable.data_type(),
                    variable.dimensions()
                ),
            );
            false
        }
    }

    fn check_sample_dimension_unused(
        &mut self,
        variable: &VariableMetadata,
        attribute: &str,
        sample_dimension: &str,
        pending: &[&str],
    ) -> bool {
        if self.scan.compression.contains_key(sample_dimension)
            || pending.contains(&sample_dimension)
        {
            self.diagnose(
                variable,
                DiagnosticCode::DuplicateSampleDimension,
                attribute,
                format!("sample dimension {sample_dimension} is already compressed"),
            );
            false
        } else {
            true
        }
    }

    fn read_integers(&self, variable: &VariableMetadata) -> Result<Vec<i64>, CompressionError> {
        let bytes = self.storage.get_variable(variable.name())?;
        integers_from_ne_bytes(variable.data_type(), &bytes).map_err(|source| {
            CompressionError::InvalidContent {
                variable: variable.name().to_string(),
                source,
            }
        })
    }

    /// Return an unused dimension name derived from `base` and register it with `size`.
    fn synthesize_dimension(&mut self, base: &str, size: u64) -> String {
        let is_used = |name: &str| {
            self.metadata.dimension(name).is_some()
                || self
                    .scan
                    .synthesized_dimensions
                    .iter()
                    .any(|d| d.name() == name)
        };
        let mut name = base.to_string();
        let mut n = 0;
        while is_used(&name) {
            n += 1;
            name = format!("{base}_{n}");
        }
        self.scan
            .synthesized_dimensions
            .push(Dimension::new(name.clone(), size));
        name
    }

    fn scan_gathered(&mut self) -> Result<(), CompressionError> {
        const ATTRIBUTE: &str = "compress";
        let metadata = self.metadata;
        for variable in metadata.variables() {
            if variable.dimensions() != [variable.name()] {
                continue;
            }
            let Some(compress) = self.text_attribute(variable, ATTRIBUTE) else {
                continue;
            };
            let implied_dimensions: Vec<String> =
                compress.split_whitespace().map(str::to_string).collect();
            if implied_dimensions.is_empty() {
                self.diagnose(
                    variable,
                    DiagnosticCode::InvalidAttributeValue,
                    ATTRIBUTE,
                    "no compressed dimensions named".to_string(),
                );
                continue;
            }
            let mut implied_shape = Vec::with_capacity(implied_dimensions.len());
            for dimension in &implied_dimensions {
                if self.check_dimension_exists(variable, ATTRIBUTE, dimension) {
                    implied_shape.extend(metadata.dimension(dimension).map(Dimension::size));
                }
            }
            if implied_shape.len() != implied_dimensions.len()
                || !self.check_parameter_variable(variable, ATTRIBUTE)
            {
                continue;
            }

            let indices = self.read_integers(variable)?;
            log::debug!(
                "list variable {} gathers {implied_dimensions:?} with shape {implied_shape:?}",
                variable.name()
            );
            self.scan.compression.insert(
                Arc::new(GatheredDescriptor::new(
                    variable.name().to_string(),
                    variable.name().to_string(),
                    indices,
                    implied_dimensions,
                    implied_shape,
                ))
                .into(),
            );
            self.scan
                .non_field_variables
                .insert(variable.name().to_string());
        }
        Ok(())
    }

    fn scan_contiguous(
        &mut self,
        feature_type: &str,
    ) -> Result<Vec<RaggedContiguousDescriptor>, CompressionError> {
        const ATTRIBUTE: &str = "sample_dimension";
        let metadata = self.metadata;
        let mut descriptors: Vec<RaggedContiguousDescriptor> = Vec::new();
        for variable in metadata.variables() {
            let Some(sample_dimension) = self.text_attribute(variable, ATTRIBUTE) else {
                continue;
            };
            let pending: Vec<&str> = descriptors
                .iter()
                .map(|d| d.sample_dimension.as_str())
                .collect();
            if !self.check_dimension_exists(variable, ATTRIBUTE, sample_dimension)
                || !self.check_parameter_variable(variable, ATTRIBUTE)
                || !self.check_sample_dimension_unused(
                    variable,
                    ATTRIBUTE,
                    sample_dimension,
                    &pending,
                )
            {
                continue;
            }

            let counts = self
                .read_integers(variable)?
                .into_iter()
                .map(|count| {
                    u64::try_from(count).map_err(|_| CompressionError::NegativeCount {
                        variable: variable.name().to_string(),
                        count,
                    })
                })
                .collect::<Result<Vec<u64>, _>>()?;
            let element_size = counts.iter().copied().max().unwrap_or(0);
            let element_dimension =
                self.synthesize_dimension(element_dimension_base(feature_type, false), element_size);
            let instance_dimension = variable.dimensions()[0].clone();
            log::debug!(
                "count variable {} compresses {sample_dimension} to ({instance_dimension}, {element_dimension})",
                variable.name()
            );
            descriptors.push(RaggedContiguousDescriptor::new(
                sample_dimension.to_string(),
                variable.name().to_string(),
                instance_dimension,
                counts,
                element_dimension,
            ));
            self.scan
                .non_field_variables
                .insert(variable.name().to_string());
        }
        Ok(descriptors)
    }

    fn scan_indexed(
        &mut self,
        feature_type: &str,
    ) -> Result<Vec<RaggedIndexedDescriptor>, CompressionError> {
        const ATTRIBUTE: &str = "instance_dimension";
        let metadata = self.metadata;
        let mut descriptors: Vec<RaggedIndexedDescriptor> = Vec::new();
        for variable in metadata.variables() {
            let Some(instance_dimension) = self.text_attribute(variable, ATTRIBUTE) else {
                continue;
            };
            if !self.check_dimension_exists(variable, ATTRIBUTE, instance_dimension)
                || !self.check_parameter_variable(variable, ATTRIBUTE)
            {
                continue;
            }
            let sample_dimension = variable.dimensions()[0].clone();
            let pending: Vec<&str> = descriptors
                .iter()
                .map(|d| d.sample_dimension.as_str())
                .collect();
            if !self.check_sample_dimension_unused(variable, ATTRIBUTE, &sample_dimension, &pending)
            {
                continue;
            }

            let instance_size = metadata
                .dimension(instance_dimension)
                .map_or(0, Dimension::size);
            let index = self.read_integers(variable)?;
            let mut descriptor = RaggedIndexedDescriptor::new(
                sample_dimension.clone(),
                variable.name().to_string(),
                instance_dimension.to_string(),
                instance_size,
                index,
                String::new(),
            );
            if let Some(invalid) = descriptor.invalid_index() {
                self.diagnose(
                    variable,
                    DiagnosticCode::InstanceIndexOutOfRange,
                    ATTRIBUTE,
                    format!(
                        "index {invalid} is out of range of instance dimension {instance_dimension} with size {instance_size}"
                    ),
                );
            }
            descriptor.element_dimension = self.synthesize_dimension(
                element_dimension_base(feature_type, true),
                descriptor.element_size(),
            );
            log::debug!(
                "index variable {} compresses {sample_dimension} to ({instance_dimension}, {})",
                variable.name(),
                descriptor.element_dimension
            );
            descriptors.push(descriptor);
            self.scan
                .non_field_variables
                .insert(variable.name().to_string());
        }
        Ok(descriptors)
    }

    /// Compose count variables whose instance dimension is the sample dimension of an index variable.
    ///
    /// The composed descriptor replaces the contiguous descriptor of the same sample dimension.
    /// Indexed descriptors are kept, so that per-profile variables uncompress to `(instance, profile)`.
    fn compose(
        &mut self,
        contiguous: Vec<RaggedContiguousDescriptor>,
        indexed: Vec<RaggedIndexedDescriptor>,
    ) -> Result<(), CompressionError> {
        if let (Some(first_contiguous), Some(first_indexed)) = (contiguous.first(), indexed.first())
        {
            let pairs = contiguous.iter().any(|c| {
                indexed
                    .iter()
                    .any(|i| i.sample_dimension == c.instance_dimension)
            });
            if !pairs {
                return Err(CompressionError::IncompatibleRaggedComposition {
                    count_variable: first_contiguous.count_variable.clone(),
                    profile_dimension: first_contiguous.instance_dimension.clone(),
                    index_variable: first_indexed.index_variable.clone(),
                    sample_dimension: first_indexed.sample_dimension.clone(),
                });
            }
        }

        for descriptor in contiguous {
            let partner = indexed
                .iter()
                .find(|i| i.sample_dimension == descriptor.instance_dimension)
                .cloned();
            let descriptor: CompressionDescriptor = match partner
                .and_then(|partner| RaggedIndexedContiguousDescriptor::new(descriptor.clone(), partner))
            {
                Some(composed) => {
                    log::debug!(
                        "composing {} and {} into an indexed contiguous ragged array",
                        composed.contiguous.count_variable,
                        composed.indexed.index_variable
                    );
                    Arc::new(composed).into()
                }
                None => Arc::new(descriptor).into(),
            };
            self.scan.compression.insert(descriptor);
        }
        for descriptor in indexed {
            self.scan.compression.insert(Arc::new(descriptor).into());
        }
        Ok(())
    }
}
