//! Column model.
//!
//! A column describes how to extract the canonical content of one cell from
//! a record. It is either a [`FunctionColumn`], which applies a plain
//! extraction function, or a [`RendererColumn`], which delegates to a
//! host-provided [`CellRenderer`](crate::CellRenderer).
//!
//! # Example
//!
//! ```
//! use lattice_table::{CellContent, Column};
//!
//! struct Item {
//!     first: u32,
//!     second: String,
//! }
//!
//! let columns: Vec<Column<Item>> = vec![
//!     Column::function("Id", |item: &Item| CellContent::from(item.first)).numeric(true),
//!     Column::function("Name", |item: &Item| CellContent::from(&item.second)),
//! ];
//! assert!(columns[0].is_numeric());
//! ```

use std::fmt;
use std::sync::Arc;

use crate::content::CellContent;
use crate::error::{BoxError, Result, TableError};
use crate::renderer::{RendererFactory, RendererHandle};

/// Type alias for a cell extraction function.
pub type ExtractFn<R> = Arc<dyn Fn(&R) -> std::result::Result<CellContent, BoxError> + Send + Sync>;

/// A column whose content is computed by an extraction function.
pub struct FunctionColumn<R> {
    title: String,
    extract: ExtractFn<R>,
    numeric: bool,
}

impl<R> FunctionColumn<R> {
    /// Applies the extraction function to a record.
    pub fn extract(&self, record: &R) -> std::result::Result<CellContent, BoxError> {
        (self.extract)(record)
    }
}

/// A column whose content is computed by a cell renderer.
pub struct RendererColumn<R> {
    title: String,
    renderer: RendererHandle<R>,
    numeric: bool,
}

impl<R> RendererColumn<R> {
    /// Returns the renderer handle of this column.
    pub fn renderer(&self) -> &RendererHandle<R> {
        &self.renderer
    }
}

/// A column definition.
pub enum Column<R> {
    /// Content produced by an extraction function.
    Function(FunctionColumn<R>),
    /// Content produced by a cell renderer.
    Renderer(RendererColumn<R>),
}

impl<R: 'static> Column<R> {
    /// Creates a function column from an infallible extractor.
    pub fn function<F, C>(title: impl Into<String>, extract: F) -> Self
    where
        F: Fn(&R) -> C + Send + Sync + 'static,
        C: Into<CellContent>,
    {
        Column::try_function(
            title,
            move |record: &R| -> std::result::Result<CellContent, BoxError> {
                Ok(extract(record).into())
            },
        )
    }

    /// Creates a function column from a fallible extractor.
    pub fn try_function<F>(title: impl Into<String>, extract: F) -> Self
    where
        F: Fn(&R) -> std::result::Result<CellContent, BoxError> + Send + Sync + 'static,
    {
        Column::Function(FunctionColumn {
            title: title.into(),
            extract: Arc::new(extract),
            numeric: false,
        })
    }

    /// Creates a renderer column.
    pub fn renderer<F>(title: impl Into<String>, factory: F) -> Self
    where
        F: RendererFactory<R> + 'static,
    {
        Column::with_renderer(title, RendererHandle::new(factory))
    }

    /// Creates a renderer column from an existing handle.
    pub fn with_renderer(title: impl Into<String>, renderer: RendererHandle<R>) -> Self {
        Column::Renderer(RendererColumn {
            title: title.into(),
            renderer,
            numeric: false,
        })
    }

    /// Starts building a column whose form is decided at build time.
    pub fn builder(title: impl Into<String>) -> ColumnBuilder<R> {
        ColumnBuilder::new(title)
    }
}

impl<R> Column<R> {
    /// Sets whether the column sorts numerically.
    pub fn numeric(mut self, numeric: bool) -> Self {
        match &mut self {
            Column::Function(c) => c.numeric = numeric,
            Column::Renderer(c) => c.numeric = numeric,
        }
        self
    }

    /// Returns the column title.
    pub fn title(&self) -> &str {
        match self {
            Column::Function(c) => &c.title,
            Column::Renderer(c) => &c.title,
        }
    }

    /// Returns `true` if the column sorts numerically.
    pub fn is_numeric(&self) -> bool {
        match self {
            Column::Function(c) => c.numeric,
            Column::Renderer(c) => c.numeric,
        }
    }
}

impl<R> Clone for Column<R> {
    fn clone(&self) -> Self {
        match self {
            Column::Function(c) => Column::Function(FunctionColumn {
                title: c.title.clone(),
                extract: c.extract.clone(),
                numeric: c.numeric,
            }),
            Column::Renderer(c) => Column::Renderer(RendererColumn {
                title: c.title.clone(),
                renderer: c.renderer.clone(),
                numeric: c.numeric,
            }),
        }
    }
}

impl<R> fmt::Debug for Column<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            Column::Function(_) => "function",
            Column::Renderer(_) => "renderer",
        };
        f.debug_struct("Column")
            .field("title", &self.title())
            .field("kind", &kind)
            .field("numeric", &self.is_numeric())
            .finish()
    }
}

/// Builder for columns assembled from optional parts, such as columns
/// described by host configuration.
///
/// Exactly one of [`extract`](Self::extract) or [`renderer`](Self::renderer)
/// must be supplied; [`build`](Self::build) rejects any other shape with a
/// configuration error.
pub struct ColumnBuilder<R> {
    title: String,
    extract: Option<ExtractFn<R>>,
    renderer: Option<RendererHandle<R>>,
    numeric: bool,
}

impl<R: 'static> ColumnBuilder<R> {
    /// Creates a new builder with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            extract: None,
            renderer: None,
            numeric: false,
        }
    }

    /// Adds an extraction function.
    pub fn extract<F, C>(mut self, f: F) -> Self
    where
        F: Fn(&R) -> C + Send + Sync + 'static,
        C: Into<CellContent>,
    {
        let extract: ExtractFn<R> =
            Arc::new(move |record: &R| -> std::result::Result<CellContent, BoxError> {
                Ok(f(record).into())
            });
        self.extract = Some(extract);
        self
    }

    /// Adds a renderer.
    pub fn renderer(mut self, renderer: RendererHandle<R>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Sets the numeric sort hint.
    pub fn numeric(mut self, numeric: bool) -> Self {
        self.numeric = numeric;
        self
    }

    /// Builds the column.
    pub fn build(self) -> Result<Column<R>> {
        let column = match (self.extract, self.renderer) {
            (Some(extract), None) => Column::Function(FunctionColumn {
                title: self.title,
                extract,
                numeric: self.numeric,
            }),
            (None, Some(renderer)) => Column::Renderer(RendererColumn {
                title: self.title,
                renderer,
                numeric: self.numeric,
            }),
            (None, None) => {
                return Err(TableError::configuration(format!(
                    "column '{}' has neither an extraction function nor a renderer",
                    self.title
                )));
            }
            (Some(_), Some(_)) => {
                return Err(TableError::configuration(format!(
                    "column '{}' has both an extraction function and a renderer",
                    self.title
                )));
            }
        };
        Ok(column)
    }
}
