//! Track lifecycle actions for Cascade transport.
//!
//! This crate converts pending tracks into occupied slots and vacated
//! slots back into capacity: primary ingestion, secondary extension,
//! slot initialization, the optional by-action partition, and the
//! end-of-pipeline consistency check.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod initialize;
pub mod primaries;
pub mod secondaries;
pub mod sort;
pub mod status_check;

pub use initialize::InitializeTracksAction;
pub use primaries::extend_from_primaries;
pub use secondaries::ExtendFromSecondariesAction;
pub use sort::SortTracksAction;
pub use status_check::StatusCheckAction;
