//! Core systems for Lattice Table.
//!
//! This crate provides the plumbing shared by the table widget crates:
//!
//! - **Signal/Slot System**: Type-safe notifications from a widget to its host
//! - **Logging**: `tracing` target names and performance spans
//!
//! # Signal/Slot Example
//!
//! ```
//! use lattice_table_core::Signal;
//!
//! // Create a signal that notifies when a value changes
//! let value_changed = Signal::<i32>::new();
//!
//! // Connect a slot to handle the signal
//! let conn_id = value_changed.connect(|value| {
//!     println!("Value changed to: {}", value);
//! });
//!
//! // Emit the signal
//! value_changed.emit(42);
//!
//! // Disconnect when done
//! value_changed.disconnect(conn_id);
//! ```

pub mod logging;
pub mod signal;

pub use logging::PerfSpan;
pub use signal::{ConnectionId, Signal};
