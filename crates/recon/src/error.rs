use std::fmt;

#[derive(Debug)]
pub enum ReconError {
    /// Bad input submission (missing path, wrong extension, duplicate file).
    Input(String),
    /// Neither (or both) inputs carry the source-distinguishing column.
    SourceDetect(String),
    /// Missing required column in input data.
    MissingColumn { source: String, column: String },
    /// Amount value could not be normalized to a number.
    AmountParse { source: String, key: String, value: String },
    /// IO error (file read, unwritable report destination).
    Io(String),
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input(msg) => write!(f, "input error: {msg}"),
            Self::SourceDetect(msg) => write!(f, "source detection error: {msg}"),
            Self::MissingColumn { source, column } => {
                write!(f, "source '{source}': missing column '{column}'")
            }
            Self::AmountParse { source, key, value } => {
                write!(f, "source '{source}', row '{key}': cannot parse amount '{value}'")
            }
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for ReconError {}
