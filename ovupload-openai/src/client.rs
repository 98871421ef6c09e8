//! OpenAI Files API uploader.

use std::fmt;
use std::time::Duration;

use tracing::{debug, info};
use ureq::{Agent, AgentBuilder};

use ovupload_core::{FileUploader, UploadError};

use crate::multipart::Form;
use crate::types::FileObject;

pub const DEFAULT_API_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_PURPOSE: &str = "assistants";

/// File name sent when the trackor's file carries none.
const FALLBACK_FILE_NAME: &str = "upload";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Uploads file content under a fixed purpose. One attempt per call.
#[derive(Clone)]
pub struct OpenAiUploader {
    agent: Agent,
    api_key: String,
    purpose: String,
    api_url: String,
}

impl OpenAiUploader {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            agent: AgentBuilder::new().timeout(REQUEST_TIMEOUT).build(),
            api_key: api_key.into(),
            purpose: DEFAULT_PURPOSE.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
        }
    }

    pub fn with_purpose(mut self, purpose: impl Into<String>) -> Self {
        self.purpose = purpose.into();
        self
    }

    /// Point the uploader at another API root (proxies, tests).
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into().trim_end_matches('/').to_owned();
        self
    }

    pub fn purpose(&self) -> &str {
        &self.purpose
    }

    fn files_url(&self) -> String {
        format!("{}/files", self.api_url)
    }
}

impl fmt::Debug for OpenAiUploader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiUploader")
            .field("purpose", &self.purpose)
            .field("api_url", &self.api_url)
            .finish_non_exhaustive()
    }
}

impl FileUploader for OpenAiUploader {
    fn upload_file(&self, data: &str, file_name: Option<&str>) -> Result<String, UploadError> {
        let file_name = file_name.unwrap_or(FALLBACK_FILE_NAME);
        let (content_type, body) = Form::new()
            .text("purpose", &self.purpose)
            .file("file", file_name, data.as_bytes().to_vec())
            .encode();

        debug!(file_name, bytes = data.len(), purpose = %self.purpose, "uploading file");
        let response = self
            .agent
            .post(&self.files_url())
            .set("Authorization", &format!("Bearer {}", self.api_key))
            .set("Content-Type", &content_type)
            .send_bytes(&body)
            .map_err(|err| match err {
                ureq::Error::Status(status, response) => UploadError::Status {
                    status,
                    body: response.into_string().unwrap_or_default(),
                },
                ureq::Error::Transport(transport) => UploadError::Transport(transport.to_string()),
            })?;

        let file: FileObject = response
            .into_json()
            .map_err(|e| UploadError::Decode(e.to_string()))?;
        info!(file_id = %file.id, file_name, "file stored");
        Ok(file.id)
    }
}
