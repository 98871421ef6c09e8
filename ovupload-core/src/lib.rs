//! ovupload core library: domain types, errors, collaborator traits, settings.
//!
//! - [`types`]: newtypes, fetched trackor rows, update payloads
//! - [`error`]: [`ModuleError`], [`UploadError`], [`LogError`]
//! - [`ports`]: traits the sync module is generic over
//! - [`log`]: [`LogLevel`] and the tracing-only [`TracingLog`] sink
//! - [`settings`]: `settings.json` / `ihub_parameters.json` loading

pub mod error;
pub mod log;
pub mod ports;
pub mod settings;
pub mod types;

pub use error::{LogError, ModuleError, UploadError};
pub use log::{LogLevel, TracingLog};
pub use ports::{FileUploader, ModuleLog, TrackorConnector, TrackorStore};
pub use settings::{IhubParameters, Settings, SettingsError};
pub use types::{
    AccessParameters, FieldMap, FileField, Filters, Trackor, TrackorId, TrackorType, UpdatePayload,
};
