use thiserror::Error;

/// Validation failures raised by screen setters and the command builder
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScreenError {
    #[error("Output {0} is off")]
    InvalidState(String),

    #[error("Requested resolution {width}x{height} is not supported by {output}")]
    UnsupportedResolution {
        output: String,
        width: u32,
        height: u32,
    },

    #[error("Cannot apply settings without an output name")]
    MissingName,

    #[error("Invalid rotation value: {0}")]
    InvalidRotation(String),

    #[error("Invalid position relation: {0}")]
    InvalidRelation(String),

    #[error("--off cannot be combined with other options on {0}")]
    ConflictingOptions(String),

    #[error("Malformed {key} value: {value:?}")]
    FormatError { key: String, value: String },

    #[error("{output} does not report {key}")]
    MissingDetail { output: String, key: String },
}
