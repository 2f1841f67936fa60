//! Cell renderers for complex column content.
//!
//! A renderer is a host-provided object that turns a record into the
//! canonical content of one cell. The table never depends on how a renderer
//! works internally; it relies only on the capability described by
//! [`CellRenderer`] and on [`RendererFactory`] to instantiate renderers.
//!
//! # Lifecycle
//!
//! Renderer instances are scoped resources. The pipeline acquires an
//! instance through [`RendererHandle::acquire`], which wraps it in a
//! [`RendererLease`]. Dropping the lease calls [`CellRenderer::dispose`], so
//! every instance is released on every exit path, including failed
//! extractions.
//!
//! # Example
//!
//! ```
//! use lattice_table::{BoxError, CellContent, CellRenderer, RendererHandle};
//!
//! struct Tags {
//!     tags: Vec<String>,
//! }
//!
//! #[derive(Default)]
//! struct TagListRenderer {
//!     buffer: String,
//! }
//!
//! impl CellRenderer<Tags> for TagListRenderer {
//!     fn render(&mut self, record: &Tags) -> Result<CellContent, BoxError> {
//!         self.buffer.clear();
//!         self.buffer.push_str(&record.tags.join(""));
//!         Ok(CellContent::from(self.buffer.as_str()))
//!     }
//! }
//!
//! let handle = RendererHandle::new(TagListRenderer::default);
//! let mut lease = handle.acquire().unwrap();
//! let content = lease.render(&Tags { tags: vec!["a1".into(), "b1".into()] }).unwrap();
//! assert_eq!(content.as_text(), "a1b1");
//! ```

use std::fmt;
use std::sync::Arc;

use crate::content::CellContent;
use crate::error::BoxError;

/// The capability a renderer offers to the pipeline.
pub trait CellRenderer<R>: Send {
    /// Renders `record` and returns the displayable output.
    ///
    /// The pipeline captures the output by its string form.
    fn render(&mut self, record: &R) -> Result<CellContent, BoxError>;

    /// Releases any host-side resources held by this instance.
    ///
    /// Called exactly once, when the owning [`RendererLease`] is dropped.
    fn dispose(&mut self) {}
}

/// Creates renderer instances for a renderer column.
///
/// Any `Fn() -> impl CellRenderer<R>` closure is a factory.
pub trait RendererFactory<R>: Send + Sync {
    /// Instantiates a new renderer.
    fn create(&self) -> Result<Box<dyn CellRenderer<R>>, BoxError>;
}

impl<R, F, C> RendererFactory<R> for F
where
    F: Fn() -> C + Send + Sync,
    C: CellRenderer<R> + 'static,
{
    fn create(&self) -> Result<Box<dyn CellRenderer<R>>, BoxError> {
        Ok(Box::new(self()))
    }
}

/// A shared reference to a renderer factory, held by a renderer column.
pub struct RendererHandle<R> {
    factory: Arc<dyn RendererFactory<R>>,
}

impl<R> Clone for RendererHandle<R> {
    fn clone(&self) -> Self {
        Self {
            factory: self.factory.clone(),
        }
    }
}

impl<R> fmt::Debug for RendererHandle<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RendererHandle").finish_non_exhaustive()
    }
}

impl<R: 'static> RendererHandle<R> {
    /// Creates a handle from a factory.
    pub fn new<F>(factory: F) -> Self
    where
        F: RendererFactory<R> + 'static,
    {
        Self {
            factory: Arc::new(factory),
        }
    }

    /// Creates a handle from an already shared factory.
    pub fn from_shared(factory: Arc<dyn RendererFactory<R>>) -> Self {
        Self { factory }
    }

    /// Instantiates a renderer wrapped in a lease that disposes it on drop.
    pub fn acquire(&self) -> Result<RendererLease<R>, BoxError> {
        let renderer = self.factory.create()?;
        Ok(RendererLease { renderer })
    }
}

/// An acquired renderer instance.
///
/// Dropping the lease disposes the renderer.
pub struct RendererLease<R> {
    renderer: Box<dyn CellRenderer<R>>,
}

impl<R> RendererLease<R> {
    /// Feeds `record` to the renderer and captures its output as text.
    pub fn render(&mut self, record: &R) -> Result<CellContent, BoxError> {
        let output = self.renderer.render(record)?;
        Ok(match output {
            text @ CellContent::Text(_) => text,
            other => CellContent::Text(other.to_string()),
        })
    }
}

impl<R> Drop for RendererLease<R> {
    fn drop(&mut self) {
        self.renderer.dispose();
    }
}
