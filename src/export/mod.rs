//! PDF export for Markdown PDF Forge
//!
//! - `controller`: busy flag and the layout → render → deliver pipeline
//! - `filename`: title, slug and timestamped output name
//! - `sink`: where finished documents go

pub mod controller;
pub mod filename;
pub mod sink;

pub use controller::{ExportController, ExportOutcome, ExportReport};
pub use filename::derive_title;
pub use sink::{ArtifactSink, DirectorySink};
