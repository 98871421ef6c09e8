//! # ovupload-openai
//!
//! Uploads file content to the OpenAI Files API and returns the stored file id.

pub mod client;
mod multipart;
pub mod types;

pub use client::{OpenAiUploader, DEFAULT_API_URL, DEFAULT_PURPOSE};
pub use types::FileObject;
