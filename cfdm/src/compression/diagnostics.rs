use serde::{Deserialize, Serialize};

/// The kind of a malformed compression attribute or variable.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticCode {
    /// The attribute names a dimension that is not in the dataset.
    #[display("missing dimension")]
    MissingDimension,
    /// The attribute value is not text.
    #[display("invalid attribute value")]
    InvalidAttributeValue,
    /// The list, count or index variable is not a one dimensional integer variable.
    #[display("invalid variable")]
    InvalidVariable,
    /// A sample dimension is compressed by more than one variable.
    #[display("duplicate sample dimension")]
    DuplicateSampleDimension,
    /// An index variable names an instance outside of the instance dimension.
    #[display("instance index out of range")]
    InstanceIndexOutOfRange,
}

/// A non-fatal problem found while scanning for compression.
///
/// A variable with a diagnostic is read as stored unless the diagnostic says otherwise.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The variable carrying the attribute.
    pub variable: String,
    /// The kind of problem.
    pub code: DiagnosticCode,
    /// The attribute.
    pub attribute: String,
    /// The attribute value, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// A description of the problem.
    pub message: String,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.variable, self.attribute)?;
        if let Some(value) = &self.value {
            write!(f, " = {value:?}")?;
        }
        write!(f, ": {} ({})", self.message, self.code)
    }
}
