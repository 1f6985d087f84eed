//! The routing graph between a logger's printer and its outputs.
//!
//! Every node implements [`Sink`]. Intermediate nodes own an ordered list of
//! downstream sinks and derive their channel flags from them once, at
//! construction: a subtree only asks for styled text if some output below it
//! renders styled text, and likewise for raw text. Nodes keep no state
//! between calls.

mod filter;
mod mapper;
mod pipe;
pub mod predicate;
mod record;
mod transformer;

pub use filter::Filter;
pub use mapper::{MapFn, Mapper, Mapping};
pub use pipe::Pipe;
pub use predicate::Predicate;
pub use record::{CallSite, Metadata, Payload};
pub use transformer::Transformer;

use std::sync::Arc;

/// A node of the sink graph.
///
/// `Send + Sync` so one graph can be shared by every logger that references it.
pub trait Sink: Send + Sync {
    /// Whether anything below this node consumes styled text.
    fn uses_pretty(&self) -> bool;

    /// Whether anything below this node consumes raw text.
    fn uses_raw(&self) -> bool;

    /// Routes one record. `None` means the channel was not produced.
    ///
    /// Runs while the writing logger holds its state lock. Logging through
    /// that same logger from here is dropped and reported through
    /// [`crate::internal`]; other loggers may be used freely.
    ///
    /// # Errors
    /// I/O errors from an output; intermediate nodes still write every child
    /// and report the first failure.
    fn write(
        &self,
        pretty: Option<&Payload>,
        raw: Option<&Payload>,
        meta: &Metadata,
    ) -> Result<(), crate::Error>;
}

/// Sinks are shared between loggers and registry entries.
pub type SharedSink = Arc<dyn Sink>;
