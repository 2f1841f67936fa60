//! Table configuration.
//!
//! [`TableConfig`] holds the settings a host can tune without touching
//! code. It can be built in code or loaded from TOML text:
//!
//! ```
//! use lattice_table::{RendererPoolingMode, TableConfig};
//!
//! let config = TableConfig::from_toml_str(r#"
//! title = "Inventory"
//! page_size = 25
//! pooling = "per_cell"
//! "#).unwrap();
//!
//! assert_eq!(config.page_size, 25);
//! assert_eq!(config.pooling, RendererPoolingMode::PerCell);
//! assert!(config.selectable);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Result, TableError};

/// Default number of rows shown per page.
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// How renderer instances are allocated while rows are processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RendererPoolingMode {
    /// A fresh renderer per cell, released right after that cell.
    PerCell,
    /// One renderer per column, reused for every record and released when
    /// processing ends.
    #[default]
    PerColumn,
}

/// Settings for a table controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Caption shown above the table.
    pub title: String,
    /// Rows per page. Must be greater than zero.
    pub page_size: usize,
    /// Whether rows can be selected.
    pub selectable: bool,
    /// Renderer allocation policy.
    pub pooling: RendererPoolingMode,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            page_size: DEFAULT_PAGE_SIZE,
            selectable: true,
            pooling: RendererPoolingMode::default(),
        }
    }
}

impl TableConfig {
    /// Parses and validates a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: TableConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes the configuration to TOML text.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| TableError::configuration(e.to_string()))
    }

    /// Checks the invariants the pipeline relies on.
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(TableError::configuration("page_size must be greater than zero"));
        }
        Ok(())
    }

    /// Sets the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the page size.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Sets whether rows can be selected.
    pub fn with_selectable(mut self, selectable: bool) -> Self {
        self.selectable = selectable;
        self
    }

    /// Sets the renderer pooling mode.
    pub fn with_pooling(mut self, pooling: RendererPoolingMode) -> Self {
        self.pooling = pooling;
        self
    }
}
