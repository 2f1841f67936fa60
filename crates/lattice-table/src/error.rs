//! Error types for the table pipeline.

use crate::row::RowKey;

/// Boxed error reported by a host collaborator (extractor or renderer).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type alias for table operations.
pub type Result<T> = std::result::Result<T, TableError>;

/// Errors that can occur while driving a table.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// Malformed column or table configuration. Indicates a caller bug.
    #[error("invalid table configuration: {0}")]
    Configuration(String),

    /// A filter pattern is not a valid regular expression.
    #[error("invalid filter pattern '{pattern}' for column {column}: {source}")]
    FilterSyntax {
        column: usize,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A function extractor or renderer failed for one cell.
    #[error("failed to extract cell content for row {row}, column {column}: {source}")]
    Extraction {
        row: usize,
        column: usize,
        #[source]
        source: BoxError,
    },

    /// A renderer instance could not be created for a renderer column.
    #[error("failed to create renderer for column {column}: {source}")]
    RendererUnavailable {
        column: usize,
        #[source]
        source: BoxError,
    },

    /// A trigger referenced a column that does not exist.
    #[error("column index {index} out of range ({count} columns)")]
    ColumnOutOfRange { index: usize, count: usize },

    /// A selection toggle referenced a key outside the current data set.
    #[error("row key {0} is not part of the current data set")]
    UnknownRowKey(RowKey),

    /// The trigger needs a model, but none has been set.
    #[error("no model has been set")]
    NoModel,

    /// Rows cannot be selected on this table.
    #[error("row selection is disabled for this table")]
    SelectionDisabled,

    /// Table configuration text could not be parsed.
    #[error("failed to parse table configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

impl TableError {
    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Create an extraction error.
    pub fn extraction(row: usize, column: usize, source: BoxError) -> Self {
        Self::Extraction {
            row,
            column,
            source,
        }
    }

    /// Returns `true` for errors that indicate a caller bug rather than a
    /// transient condition.
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, Self::Configuration(_) | Self::ConfigParse(_))
    }
}
