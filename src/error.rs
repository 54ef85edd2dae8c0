//! Error type for table configuration and caller misuse.

/// Errors raised by the table engine.
///
/// Runtime data problems (missing fields, unknown filter kinds) never surface
/// here; they degrade to pass-through behaviour instead.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// Two columns share the same `data_field`.
    #[error("Duplicate column data field '{field}'")]
    DuplicateColumn { field: String },

    /// A sortable or filtered column has an empty `data_field`.
    #[error("Column '{text}' is {role} but has no data field")]
    MissingDataField { text: String, role: &'static str },

    /// The table was configured without a key field.
    #[error("Key field must not be empty")]
    EmptyKeyField,

    /// An action referenced a field no column declares.
    #[error("Column '{field}' not found in table")]
    UnknownColumn { field: String },

    /// An action referenced a field whose column has no filter.
    #[error("Column '{field}' has no filter")]
    NoFilter { field: String },

    /// Pages are 1-based.
    #[error("Page {page} is invalid; pages start at 1")]
    InvalidPage { page: usize },

    /// A filter value of the wrong shape was supplied for a column's filter kind.
    #[error("Filter on '{field}' expects a {expected} value")]
    FilterKindMismatch { field: String, expected: &'static str },

    /// Options or rows could not be parsed.
    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

impl TableError {
    pub fn unknown_column(field: impl Into<String>) -> Self {
        Self::UnknownColumn { field: field.into() }
    }
}

pub type Result<T> = std::result::Result<T, TableError>;
