use thiserror::Error;

/// Error returned when a transform rejects its input.
#[derive(Debug, Error)]
pub enum MinifyError {
    /// The input is not valid UTF-8, or the output of a transform is not.
    #[error("content is not valid UTF-8")]
    Utf8(#[from] std::str::Utf8Error),

    /// CSS could not be tokenized.
    #[error("invalid CSS at line {line}, column {column}: {message}")]
    Css {
        line: u32,
        column: u32,
        message: String,
    },

    /// JSON could not be parsed.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// XML could not be parsed or written back.
    #[error("invalid XML: {0}")]
    Xml(#[from] quick_xml::Error),
}
