//! # ovupload-sync
//!
//! The upload module: one synchronous pass over every trackor flagged for
//! upload. Call [`Module::start`] once per integration run.

pub mod error;
pub mod pipeline;
pub mod report;

pub use error::SyncError;
pub use pipeline::{Module, ModuleConfig};
pub use report::{RecordOutcome, SyncReport};
