use std::fmt;

/// Rejected balance configuration.
#[derive(Clone, Debug, PartialEq)]
pub enum TuningError {
    /// The JSON document could not be parsed
    Parse(String),
    /// A `min`/`max` pair is inverted
    InvertedRange {
        field: &'static str,
        min: f32,
        max: f32,
    },
    /// A value that must be strictly positive is not
    NonPositive { field: &'static str, value: f32 },
    /// A ratio or probability outside `[0, 1]`
    OutOfUnitRange { field: &'static str, value: f64 },
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(msg) => write!(f, "tuning parse error: {msg}"),
            Self::InvertedRange { field, min, max } => {
                write!(f, "{field}: min {min} is greater than max {max}")
            }
            Self::NonPositive { field, value } => {
                write!(f, "{field} must be positive, got {value}")
            }
            Self::OutOfUnitRange { field, value } => {
                write!(f, "{field} must lie in [0, 1], got {value}")
            }
        }
    }
}

impl std::error::Error for TuningError {}

impl From<serde_json::Error> for TuningError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}
