use thiserror::Error;

/// Errors emitted while building or encoding a table.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("invalid delimiter '{0}': expected ',' or tab")]
    InvalidDelimiter(String),
    #[error("must pass fields in order to build rows")]
    MissingFields,
    #[error("row count must be greater than zero")]
    MissingRowCount,
    #[error("unknown function '{0}'")]
    UnknownFunction(String),
    #[error("invalid params: {0}")]
    InvalidParams(String),
    #[error("generator '{function}' failed: {message}")]
    Generator { function: String, message: String },
    #[error("unable to decode field: {0}")]
    FieldDecode(String),
    #[error("csv error: {0}")]
    Encoding(#[from] csv::Error),
}
