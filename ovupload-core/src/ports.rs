//! Collaborator traits the sync module is generic over.
//!
//! The OneVizion and OpenAI crates implement these against the real
//! services; tests implement them with in-memory fakes.

use serde_json::Value;

use crate::error::{LogError, ModuleError, UploadError};
use crate::log::LogLevel;
use crate::types::{FieldMap, Filters, Trackor, TrackorId, TrackorType};

/// Read and update access to trackors of one trackor type.
pub trait TrackorStore {
    /// Fetch every trackor matching `filters`, retrieving `fields`.
    ///
    /// Either all rows are returned or a single [`ModuleError`]; never a
    /// partial result.
    fn read_by_filters(
        &self,
        fields: &[String],
        filters: &Filters,
    ) -> Result<Vec<Trackor>, ModuleError>;

    /// Apply `fields` to trackor `id`, returning the raw service response.
    fn update_by_id(&self, id: TrackorId, fields: &FieldMap) -> Result<Value, ModuleError>;
}

/// Produces a [`TrackorStore`] bound to a trackor type.
///
/// Changing the trackor type means calling `configure` again and using the
/// new handle; handles are never rebound in place.
pub trait TrackorConnector {
    type Store: TrackorStore;

    fn configure(&self, trackor_type: &TrackorType) -> Self::Store;
}

/// Stores file content remotely and returns the assigned file id.
pub trait FileUploader {
    fn upload_file(&self, data: &str, file_name: Option<&str>) -> Result<String, UploadError>;
}

/// Sink for integration-run log events.
pub trait ModuleLog {
    fn add(&self, level: LogLevel, message: &str, description: &str) -> Result<(), LogError>;
}

impl<T: TrackorConnector + ?Sized> TrackorConnector for &T {
    type Store = T::Store;

    fn configure(&self, trackor_type: &TrackorType) -> Self::Store {
        (**self).configure(trackor_type)
    }
}

impl<T: FileUploader + ?Sized> FileUploader for &T {
    fn upload_file(&self, data: &str, file_name: Option<&str>) -> Result<String, UploadError> {
        (**self).upload_file(data, file_name)
    }
}

impl<T: ModuleLog + ?Sized> ModuleLog for &T {
    fn add(&self, level: LogLevel, message: &str, description: &str) -> Result<(), LogError> {
        (**self).add(level, message, description)
    }
}

impl<T: ModuleLog + ?Sized> ModuleLog for Box<T> {
    fn add(&self, level: LogLevel, message: &str, description: &str) -> Result<(), LogError> {
        (**self).add(level, message, description)
    }
}
